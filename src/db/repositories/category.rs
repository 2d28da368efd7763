use anyhow::{Context, Result};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};

use crate::entities::{categories, prelude::*};
use crate::models::Category;

pub struct CategoryRepository {
    conn: DatabaseConnection,
}

impl CategoryRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Result<Vec<Category>> {
        let rows = Categories::find()
            .order_by_asc(categories::Column::Name)
            .all(&self.conn)
            .await
            .context("Failed to list categories")?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    pub async fn get(&self, id: i64) -> Result<Option<Category>> {
        let row = Categories::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query category")?;

        Ok(row.map(Category::from))
    }
}
