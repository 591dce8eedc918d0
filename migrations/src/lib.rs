mod connection;
mod migrations;

pub use self::{
    connection::connect,
    migrations::{migrator, run_all},
};
pub use sqlx;
