//! API handlers for GoodCard REST endpoints

pub mod auth;
pub mod health;
pub mod openapi;
pub mod records;
pub mod submissions;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};

use crate::{error::AppError, services::Session, AppState};

/// Header carrying the records-view shared secret
pub const ACCESS_KEY_HEADER: &str = "x-access-key";

/// Extractor gating the records view behind the shared secret.
///
/// A matching `X-Access-Key` header yields an authenticated [`Session`] that
/// handlers pass into the records service. There is no server-side session
/// state; the secret travels with every gated request.
pub struct RecordsAccess(pub Session);

#[async_trait]
impl FromRequestParts<AppState> for RecordsAccess {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let key = parts
            .headers
            .get(ACCESS_KEY_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing access key header".to_string()))?;

        if key != state.config.auth.access_key {
            return Err(AppError::Authentication("Invalid access key".to_string()));
        }

        Ok(RecordsAccess(Session::authenticated()))
    }
}
