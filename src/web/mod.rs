pub mod auth;
pub mod feedback;
pub mod report;
pub mod responses;
pub mod router;
pub mod state;
pub mod templates;

pub use responses::{
    ApiMessage, JsonError, LoginSuccess, SavedFeedback, json_error, rejected_body,
};
pub use state::AppState;
pub use templates::{escape_html, render_page};
