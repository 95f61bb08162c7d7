use std::future::Future;

use tracing::info;

use crate::error::AppError;
use crate::nutrition::repo_types::{NewNutritionEntry, NutritionEntry};
use crate::state::AppState;

pub const STORE_FAILED: &str = "Error storing nutrition data";
pub const FETCH_FAILED: &str = "Error fetching nutrition data";

async fn bounded<T>(
    st: &AppState,
    message: &'static str,
    op: impl Future<Output = anyhow::Result<T>>,
) -> Result<T, AppError> {
    let timeout = st.config.storage_timeout();
    match tokio::time::timeout(timeout, op).await {
        Ok(Ok(v)) => Ok(v),
        Ok(Err(e)) => Err(AppError::Storage {
            message,
            detail: format!("{e:#}"),
        }),
        Err(_) => Err(AppError::Storage {
            message,
            detail: format!("storage operation timed out after {}s", timeout.as_secs()),
        }),
    }
}

pub async fn create_entry(
    st: &AppState,
    entry: NewNutritionEntry,
) -> Result<NutritionEntry, AppError> {
    let created = bounded(st, STORE_FAILED, st.store.insert(entry)).await?;
    info!(id = %created.id, "nutrition entry stored");
    Ok(created)
}

pub async fn list_entries(st: &AppState) -> Result<Vec<NutritionEntry>, AppError> {
    bounded(st, FETCH_FAILED, st.store.list_recent_first()).await
}
