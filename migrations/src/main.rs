use std::env;

use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenv::dotenv();
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL not set")?;

    let pool = articles_migrations::connect(&database_url)
        .await
        .context("Error initializing postgres pool")?;
    articles_migrations::run_all(&pool).await?;

    for migration in articles_migrations::migrator().iter() {
        println!("{} {}", migration.version, migration.description);
    }

    Ok(())
}
