use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::{error, info};

use crate::{
    credentials::{self, CredentialError},
    web::{ApiMessage, AppState, JsonError, LoginSuccess, json_error, rejected_body},
};

#[derive(Deserialize)]
pub struct CredentialForm {
    #[serde(alias = "username")]
    pub email: String,
    pub password: String,
}

impl CredentialForm {
    fn is_complete(&self) -> bool {
        !self.email.trim().is_empty() && !self.password.is_empty()
    }
}

pub async fn signup(
    State(state): State<AppState>,
    form: Result<Json<CredentialForm>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiMessage>), JsonError> {
    let Json(form) = form.map_err(rejected_body)?;
    if !form.is_complete() {
        return Err(json_error(
            StatusCode::BAD_REQUEST,
            "Email and password are required.",
        ));
    }

    match credentials::register_credential(state.credentials(), &form.email, &form.password).await
    {
        Ok(()) => {
            info!(identity = %form.email.trim(), "registered new identity");
            Ok((StatusCode::CREATED, Json(ApiMessage::new("Success"))))
        }
        Err(CredentialError::AlreadyExists) => {
            Err(json_error(StatusCode::BAD_REQUEST, "User already exists."))
        }
        Err(err) => {
            error!(?err, "failed to register identity");
            Err(json_error(StatusCode::INTERNAL_SERVER_ERROR, "Signup failed"))
        }
    }
}

pub async fn login(
    State(state): State<AppState>,
    form: Result<Json<CredentialForm>, JsonRejection>,
) -> Result<Json<LoginSuccess>, JsonError> {
    let Json(form) = form.map_err(rejected_body)?;
    match credentials::verify_credential(state.credentials(), &form.email, &form.password).await {
        Ok(identity) => Ok(Json(LoginSuccess {
            message: "Login Successful",
            identity,
        })),
        Err(CredentialError::Invalid) => {
            Err(json_error(StatusCode::UNAUTHORIZED, "Invalid credentials"))
        }
        Err(err) => {
            error!(?err, "failed to verify credentials");
            Err(json_error(StatusCode::INTERNAL_SERVER_ERROR, "Login failed"))
        }
    }
}
