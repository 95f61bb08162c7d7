use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Nutrition entry as stored in the database.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct NutritionEntry {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub total_calorie: f64,
    #[serde(rename = "totalProtien")] // wire spelling kept for existing clients
    pub total_protein: f64,
    pub total_fats: Option<f64>,
    pub total_carbs: Option<f64>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Validated values for an insert; the store fills in id and timestamps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewNutritionEntry {
    pub total_calorie: f64,
    pub total_protein: f64,
    pub total_fats: Option<f64>,
    pub total_carbs: Option<f64>,
}
