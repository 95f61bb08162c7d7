use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

use crate::nutrition::repo_types::{NewNutritionEntry, NutritionEntry};

#[async_trait]
pub trait NutritionStore: Send + Sync {
    async fn insert(&self, entry: NewNutritionEntry) -> anyhow::Result<NutritionEntry>;
    /// All entries, most recently created first.
    async fn list_recent_first(&self) -> anyhow::Result<Vec<NutritionEntry>>;
}

#[derive(Clone)]
pub struct PgNutritionStore {
    db: PgPool,
}

impl PgNutritionStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NutritionStore for PgNutritionStore {
    async fn insert(&self, entry: NewNutritionEntry) -> anyhow::Result<NutritionEntry> {
        let row = sqlx::query_as::<_, NutritionEntry>(
            r#"
            INSERT INTO nutrition_entries (total_calorie, total_protein, total_fats, total_carbs)
            VALUES ($1, $2, $3, $4)
            RETURNING id, total_calorie, total_protein, total_fats, total_carbs,
                      created_at, updated_at
            "#,
        )
        .bind(entry.total_calorie)
        .bind(entry.total_protein)
        .bind(entry.total_fats)
        .bind(entry.total_carbs)
        .fetch_one(&self.db)
        .await
        .context("insert nutrition entry")?;
        Ok(row)
    }

    async fn list_recent_first(&self) -> anyhow::Result<Vec<NutritionEntry>> {
        let rows = sqlx::query_as::<_, NutritionEntry>(
            r#"
            SELECT id, total_calorie, total_protein, total_fats, total_carbs,
                   created_at, updated_at
              FROM nutrition_entries
             ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list nutrition entries")?;
        Ok(rows)
    }
}
