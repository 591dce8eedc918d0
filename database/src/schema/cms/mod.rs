mod article;

pub use self::article::{parse_id, Article, ArticleDocument, ArticleFields};
