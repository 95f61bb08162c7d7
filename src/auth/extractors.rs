use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, HeaderValue},
};
use tracing::warn;

use crate::{error::AppError, state::AppState};

const MASTER_KEY_HEADER: &str = "x-master-key";

/// Guard for routes that require the shared master key.
///
/// Reads `x-master-key`, falling back to `authorization`, and compares the
/// raw header bytes against the configured key.
#[derive(Debug)]
pub struct MasterKey;

#[async_trait]
impl FromRequestParts<AppState> for MasterKey {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        check_master_key(&parts.headers, &state.config.master_key)?;
        Ok(MasterKey)
    }
}

fn candidate(headers: &HeaderMap) -> Option<&[u8]> {
    [headers.get(MASTER_KEY_HEADER), headers.get(AUTHORIZATION)]
        .into_iter()
        .flatten()
        .map(HeaderValue::as_bytes)
        .find(|v| !v.is_empty())
}

pub fn check_master_key(headers: &HeaderMap, expected: &str) -> Result<(), AppError> {
    let Some(provided) = candidate(headers) else {
        warn!("request without master key");
        return Err(AppError::Unauthenticated);
    };
    if provided != expected.as_bytes() {
        warn!("request with invalid master key");
        return Err(AppError::Forbidden);
    }
    Ok(())
}
