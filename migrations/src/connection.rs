use sqlx::{postgres::PgPoolOptions, PgPool};

const MAXIMUM_CONNECTIONS: u32 = 5;

pub async fn connect(database_url: &str) -> sqlx::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(MAXIMUM_CONNECTIONS)
        .connect(database_url)
        .await
}
