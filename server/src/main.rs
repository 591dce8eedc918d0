#[macro_use]
extern crate rocket;

use std::sync::Arc;

use anyhow::Context;
use log::warn;

use database::{MemoryStore, PostgresStore, SharedStore};

use crate::configuration::{ConfigurationManager, DatabaseUrl};

mod configuration;
mod webserver;

#[cfg(test)]
mod test_helpers;

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenv::dotenv();

    let figment = webserver::figment();
    let database_url = ConfigurationManager::from_figment(&figment).get::<DatabaseUrl>();

    let store: SharedStore = match &database_url {
        Some(database_url) => {
            let pool = database::migrations::connect(database_url)
                .await
                .context("Error initializing postgres pool")?;
            database::migrations::run_all(&pool)
                .await
                .context("Error running migrations")?;
            Arc::new(PostgresStore::new(pool))
        }
        None => Arc::new(MemoryStore::new()),
    };

    let rocket = webserver::rocket_server(figment, store)
        .ignite()
        .await
        .map_err(|err| anyhow::anyhow!("{}", err))?;
    if database_url.is_none() {
        warn!("database_url is not set, articles will only be kept in memory");
    }
    rocket
        .launch()
        .await
        .map_err(|err| anyhow::anyhow!("{}", err))?;

    Ok(())
}
