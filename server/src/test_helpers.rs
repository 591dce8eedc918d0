use std::sync::Arc;

use database::{MemoryStore, SharedStore};
use rocket::local::asynchronous::Client;

use crate::webserver::{figment, rocket_server};

/// A client for a server backed by a fresh, empty in-memory store.
pub async fn client() -> Client {
    client_with_store(Arc::new(MemoryStore::new())).await
}

pub async fn client_with_store(store: SharedStore) -> Client {
    Client::tracked(rocket_server(figment(), store))
        .await
        .expect("valid rocket instance")
}
