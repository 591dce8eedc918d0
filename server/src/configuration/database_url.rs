use super::Configuration;

/// Postgres connection string. Unset means articles live in memory.
pub struct DatabaseUrl;

impl Configuration for DatabaseUrl {
    type Type = String;

    fn default() -> Option<Self::Type> {
        None
    }

    fn key() -> &'static str {
        "database_url"
    }
}
