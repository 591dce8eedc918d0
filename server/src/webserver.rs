use std::{
    env,
    path::{Path, PathBuf},
};

use log::error;
use rocket::{
    figment::{providers::Env, Figment},
    fs::FileServer,
    http::Status,
    serde::json::Json,
    Build, Request, Rocket,
};
use rocket_dyn_templates::Template;
use serde::Serialize;

use database::{DatabaseError, SharedStore};

use crate::configuration::{ConfigurationManager, SiteName, TeraConfiguration};

use self::{method_override::MethodOverride, negotiation::ResponseFormat};

mod articles;
mod method_override;
mod negotiation;

/// The workspace root, where `templates/` and `static/` live.
fn root_path() -> PathBuf {
    env::var("CARGO_MANIFEST_DIR")
        .ok()
        .and_then(|value| PathBuf::from(value).parent().map(Path::to_path_buf))
        .or_else(|| env::current_dir().ok())
        .unwrap_or_default()
}

/// Rocket's own configuration sources, plus `DATABASE_URL` and the default
/// template and static directories.
pub fn figment() -> Figment {
    let root_path = root_path();

    rocket::Config::figment()
        .merge(Env::raw().only(&["database_url"]))
        .join(("template_dir", root_path.join("templates")))
        .join(("static_dir", root_path.join("static")))
}

pub fn rocket_server(figment: Figment, store: SharedStore) -> Rocket<Build> {
    let configuration = ConfigurationManager::from_figment(&figment);
    let static_dir = figment
        .extract_inner::<PathBuf>("static_dir")
        .unwrap_or_else(|_| root_path().join("static"));

    rocket::custom(figment)
        .manage(store)
        .attach(MethodOverride)
        .attach(Template::custom(move |engines| {
            engines.tera.register_function(
                "site_name",
                TeraConfiguration::<SiteName>::new(configuration.clone()),
            );
        }))
        .mount(
            "/articles",
            routes![
                articles::list_articles,
                articles::create_article,
                articles::new_article,
                articles::view_article,
                articles::edit_article,
                articles::update_article,
                articles::delete_article,
            ],
        )
        .mount("/static", FileServer::from(static_dir))
        .register("/", catchers![error_page])
}

#[derive(Serialize)]
struct ErrorContext {
    title: String,
    status: u16,
    message: String,
}

#[derive(Responder)]
enum ErrorPage {
    Page(Template),
    Document(Json<serde_json::Value>),
    Text(String),
}

/// Answers every error status in the representation the client asked for.
#[catch(default)]
fn error_page(status: Status, request: &Request<'_>) -> ErrorPage {
    let message = status.reason_lossy().to_owned();
    if status == Status::NotAcceptable {
        return ErrorPage::Text(message);
    }

    match ResponseFormat::negotiate(request.headers().get_one("Accept")) {
        Some(ResponseFormat::Json) => ErrorPage::Document(Json(serde_json::json!({
            "message": format!("{} Error: {}", status.code, message),
        }))),
        _ => ErrorPage::Page(Template::render(
            "error",
            ErrorContext {
                title: message.clone(),
                status: status.code,
                message,
            },
        )),
    }
}

trait ResultExt<T> {
    fn map_to_failure(self) -> Result<T, Failure>;
}

impl<T> ResultExt<T> for Result<T, DatabaseError> {
    fn map_to_failure(self) -> Result<T, Failure> {
        self.map_err(|err| match err {
            DatabaseError::RowNotFound => Failure::not_found(),
            other_error => {
                error!("unexpected database error: {:?}", other_error);
                Failure::Status(Status::InternalServerError)
            }
        })
    }
}

#[derive(Debug, Responder)]
pub enum Failure {
    Status(Status),
}

impl<E> From<E> for Failure
where
    E: std::error::Error,
{
    fn from(error: E) -> Self {
        error!("error processing request: {:?}", error);

        Failure::Status(Status::InternalServerError)
    }
}

impl Failure {
    pub fn not_found() -> Self {
        Self::Status(Status::NotFound)
    }
}
