use async_trait::async_trait;
use chrono::Utc;
use migrations::sqlx::{self, types::Json, PgPool};
use uuid::Uuid;

use super::ArticleStore;
use crate::{
    schema::cms::{parse_id, Article, ArticleDocument, ArticleFields},
    DatabaseError, SqlxResultExt,
};

type ArticleRow = (Uuid, Json<ArticleDocument>);

fn from_row((id, Json(document)): ArticleRow) -> Article {
    Article::new(id, document)
}

/// Stores each article as a JSONB document in the `articles` table.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Expects the `articles` migrations to have been applied to `pool`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ArticleStore for PostgresStore {
    async fn find_all(&self) -> Result<Vec<Article>, DatabaseError> {
        let rows = sqlx::query_as::<_, ArticleRow>(
            "SELECT id, document FROM articles ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await
        .map_database_error()?;

        Ok(rows.into_iter().map(from_row).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Article>, DatabaseError> {
        let id = match parse_id(id) {
            Some(id) => id,
            None => return Ok(None),
        };

        let row = sqlx::query_as::<_, ArticleRow>("SELECT id, document FROM articles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_database_error()?;

        Ok(row.map(from_row))
    }

    async fn create(&self, fields: ArticleFields) -> Result<Article, DatabaseError> {
        let document = fields.into_new_document(Utc::now())?;

        let row = sqlx::query_as::<_, ArticleRow>(
            "INSERT INTO articles (id, document) VALUES ($1, $2) RETURNING id, document",
        )
        .bind(Uuid::new_v4())
        .bind(Json(&document))
        .fetch_one(&self.pool)
        .await
        .map_database_error()?;

        Ok(from_row(row))
    }

    async fn update_by_id(
        &self,
        id: Uuid,
        fields: ArticleFields,
    ) -> Result<Article, DatabaseError> {
        let mut tx = self.pool.begin().await.map_database_error()?;

        let (id, Json(mut document)) = sqlx::query_as::<_, ArticleRow>(
            "SELECT id, document FROM articles WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .map_database_error()?;

        fields.overwrite(&mut document)?;

        sqlx::query("UPDATE articles SET document = $2 WHERE id = $1")
            .bind(id)
            .bind(Json(&document))
            .execute(&mut *tx)
            .await
            .map_database_error()?;

        tx.commit().await.map_database_error()?;

        Ok(Article::new(id, document))
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<Article, DatabaseError> {
        let row = sqlx::query_as::<_, ArticleRow>(
            "DELETE FROM articles WHERE id = $1 RETURNING id, document",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_database_error()?;

        Ok(from_row(row))
    }
}
