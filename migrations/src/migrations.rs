use sqlx::{
    migrate::{MigrateError, Migrator},
    PgPool,
};

static MIGRATOR: Migrator = sqlx::migrate!("./sql");

pub fn migrator() -> &'static Migrator {
    &MIGRATOR
}

pub async fn run_all(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}
