//! The article collection.
//!
//! Handlers never talk to a database directly. They receive a [`SharedStore`]
//! at startup and issue exactly these five operations against it.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    schema::cms::{Article, ArticleFields},
    DatabaseError,
};

mod memory;
mod postgres;

pub use self::{memory::MemoryStore, postgres::PostgresStore};

pub type SharedStore = Arc<dyn ArticleStore>;

#[async_trait]
pub trait ArticleStore: Send + Sync + 'static {
    /// Every article, in the store's natural order.
    async fn find_all(&self) -> Result<Vec<Article>, DatabaseError>;

    /// Looks up an article by its raw identifier. Identifiers the store could
    /// never have issued resolve to `None`.
    async fn find_by_id(&self, id: &str) -> Result<Option<Article>, DatabaseError>;

    async fn create(&self, fields: ArticleFields) -> Result<Article, DatabaseError>;

    /// Overwrites `name`, `body` and `published`, returning the stored result.
    async fn update_by_id(&self, id: Uuid, fields: ArticleFields)
        -> Result<Article, DatabaseError>;

    /// Removes the article, returning what was removed.
    async fn delete_by_id(&self, id: Uuid) -> Result<Article, DatabaseError>;
}
