pub mod export;
pub mod filter;
pub mod history;
pub mod memory;
pub mod model;
pub mod postgres;
pub mod service;
pub mod stats;
pub mod store;
pub mod suggestions;

pub use filter::FeedbackFilters;
pub use memory::MemoryFeedbackStore;
pub use model::{FeedbackRecord, NewFeedback};
pub use postgres::PgFeedbackStore;
pub use service::{FeedbackError, FeedbackService};
pub use stats::RatingDistribution;
pub use store::{FeedbackStore, StorageUnavailable, StoreResult};
pub use suggestions::SuggestionView;
