use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::ArticleStore;
use crate::{
    schema::cms::{parse_id, Article, ArticleFields},
    DatabaseError,
};

/// Keeps articles in insertion order for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    articles: RwLock<Vec<Article>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ArticleStore for MemoryStore {
    async fn find_all(&self) -> Result<Vec<Article>, DatabaseError> {
        Ok(self.articles.read().await.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Article>, DatabaseError> {
        let id = match parse_id(id) {
            Some(id) => id,
            None => return Ok(None),
        };

        let articles = self.articles.read().await;
        Ok(articles.iter().find(|article| article.id == id).cloned())
    }

    async fn create(&self, fields: ArticleFields) -> Result<Article, DatabaseError> {
        let document = fields.into_new_document(Utc::now())?;
        let article = Article::new(Uuid::new_v4(), document);

        self.articles.write().await.push(article.clone());

        Ok(article)
    }

    async fn update_by_id(
        &self,
        id: Uuid,
        fields: ArticleFields,
    ) -> Result<Article, DatabaseError> {
        let mut articles = self.articles.write().await;
        let article = articles
            .iter_mut()
            .find(|article| article.id == id)
            .ok_or(DatabaseError::RowNotFound)?;

        fields.overwrite(&mut article.document)?;

        Ok(article.clone())
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<Article, DatabaseError> {
        let mut articles = self.articles.write().await;
        let index = articles
            .iter()
            .position(|article| article.id == id)
            .ok_or(DatabaseError::RowNotFound)?;

        Ok(articles.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::MemoryStore;
    use crate::{schema::cms::ArticleFields, ArticleStore, DatabaseError};

    fn fields(name: &str, body: &str, published: &str) -> ArticleFields {
        ArticleFields {
            name: Some(name.to_owned()),
            body: Some(body.to_owned()),
            published: Some(published.to_owned()),
        }
    }

    #[tokio::test]
    async fn create_then_find() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        let created = store.create(fields("A", "B", "2020-01-01")).await?;

        let found = store
            .find_by_id(&created.id.to_string())
            .await?
            .expect("article should exist");
        assert_eq!(found, created);
        assert_eq!(found.document.name.as_deref(), Some("A"));
        assert_eq!(found.document.body.as_deref(), Some("B"));
        assert_eq!(found.published_date(), "2020-01-01");

        Ok(())
    }

    #[tokio::test]
    async fn find_all_returns_everything() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        for i in 0..3 {
            store
                .create(fields(&format!("article {}", i), "", "2020-01-01"))
                .await?;
        }

        let mut names = store
            .find_all()
            .await?
            .into_iter()
            .filter_map(|article| article.document.name)
            .collect::<Vec<_>>();
        names.sort();
        assert_eq!(names, vec!["article 0", "article 1", "article 2"]);

        Ok(())
    }

    #[tokio::test]
    async fn unknown_and_malformed_ids_are_missing() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        store.create(fields("A", "B", "2020-01-01")).await?;

        assert!(store.find_by_id(&Uuid::new_v4().to_string()).await?.is_none());
        assert!(store.find_by_id("not-an-id").await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn update_overwrites_all_fields() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        let created = store.create(fields("A", "B", "2020-01-01")).await?;

        let update = ArticleFields {
            name: Some(String::from("C")),
            ..ArticleFields::default()
        };
        let updated = store.update_by_id(created.id, update).await?;

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.document.name.as_deref(), Some("C"));
        assert_eq!(updated.document.body, None);
        assert_eq!(updated.document.published, None);

        Ok(())
    }

    #[tokio::test]
    async fn failed_create_stores_nothing() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        let result = store.create(fields("A", "B", "someday")).await;

        assert!(matches!(result, Err(DatabaseError::Cast { .. })));
        assert!(store.find_all().await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn delete_removes() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        let created = store.create(fields("A", "B", "2020-01-01")).await?;

        let deleted = store.delete_by_id(created.id).await?;
        assert_eq!(deleted, created);
        assert!(store.find_by_id(&created.id.to_string()).await?.is_none());
        assert!(matches!(
            store.delete_by_id(created.id).await,
            Err(DatabaseError::RowNotFound)
        ));

        Ok(())
    }
}
