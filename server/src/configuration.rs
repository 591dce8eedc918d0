mod database_url;
mod site_name;

pub use self::{database_url::DatabaseUrl, site_name::SiteName};

use log::error;
use rocket::figment::Figment;
use rocket_dyn_templates::tera;
use serde::{de::DeserializeOwned, Serialize};
use std::{
    collections::HashMap,
    marker::PhantomData,
    sync::{Arc, RwLock},
};

pub trait Configuration {
    type Type: Serialize + DeserializeOwned;

    fn default() -> Option<Self::Type>;
    fn key() -> &'static str;
}

/// Typed access to the application keys of the Rocket figment. Cloning is
/// cheap and every clone observes the same values.
#[derive(Clone, Debug, Default)]
pub struct ConfigurationManager {
    active_configuration: Arc<RwLock<HashMap<String, serde_json::Value>>>,
}

impl ConfigurationManager {
    pub fn from_figment(figment: &Figment) -> Self {
        let manager = Self::default();
        manager.load::<SiteName>(figment);
        manager.load::<DatabaseUrl>(figment);
        manager
    }

    fn load<T: Configuration>(&self, figment: &Figment) {
        if let Ok(value) = figment.extract_inner::<T::Type>(T::key()) {
            self.set::<T>(value);
        }
    }

    pub fn get<T: Configuration>(&self) -> Option<T::Type> {
        let configuration = self.active_configuration.read().ok()?;
        configuration
            .get(T::key())
            .and_then(|v| serde_json::value::from_value(v.clone()).ok())
            .or_else(T::default)
    }

    pub fn set<T: Configuration>(&self, value: T::Type) {
        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(err) => {
                error!("unserializable value for {}: {:?}", T::key(), err);
                return;
            }
        };

        if let Ok(mut configuration) = self.active_configuration.write() {
            configuration.insert(T::key().to_owned(), value);
        }
    }
}

/// Exposes a configuration value to templates as a zero-argument function.
pub struct TeraConfiguration<T> {
    manager: ConfigurationManager,
    _phantom: PhantomData<T>,
}

impl<T> TeraConfiguration<T> {
    pub fn new(manager: ConfigurationManager) -> Self {
        Self {
            manager,
            _phantom: PhantomData,
        }
    }
}

impl<T> tera::Function for TeraConfiguration<T>
where
    T: Configuration + Send + Sync,
    T::Type: ToString,
{
    fn call(&self, _args: &HashMap<String, tera::Value>) -> tera::Result<tera::Value> {
        let value = self
            .manager
            .get::<T>()
            .ok_or_else(|| tera::Error::msg("no value found"))?;
        Ok(tera::Value::String(value.to_string()))
    }
}
