use log::{error, info, warn};
use rocket::{
    data::{self, Data, FromData},
    form::Form,
    http::Status,
    request::{self, FromRequest},
    response::Redirect,
    serde::json::Json,
    Request, State,
};
use rocket_dyn_templates::Template;
use serde::{Deserialize, Serialize};

use database::{
    schema::cms::{Article, ArticleFields},
    SharedStore,
};

use super::{negotiation::ResponseFormat, Failure, ResultExt};

/// The two shapes every article route can answer with, plus the redirects and
/// plain-text failures of the write paths.
#[derive(Responder)]
pub enum Rendered {
    Page(Template),
    Redirect(Redirect),
    Document(Json<serde_json::Value>),
    Message(String),
}

impl Rendered {
    fn document<T: Serialize>(value: &T) -> Result<Self, Failure> {
        Ok(Self::Document(Json(serde_json::to_value(value)?)))
    }
}

/// The article named by the route's `<id>` segment, loaded before the
/// handler runs. Unknown identifiers end the request with a 404.
pub struct LoadedArticle(pub Article);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for LoadedArticle {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let id = match request.routed_segment(0) {
            Some(id) => id,
            None => return request::Outcome::Forward(Status::NotFound),
        };
        let store = match request.rocket().state::<SharedStore>() {
            Some(store) => store,
            None => {
                error!("no article store is being managed");
                return request::Outcome::Error((Status::InternalServerError, ()));
            }
        };

        match store.find_by_id(id).await {
            Ok(Some(article)) => request::Outcome::Success(LoadedArticle(article)),
            Ok(None) => {
                info!("{} was not found", id);
                request::Outcome::Error((Status::NotFound, ()))
            }
            Err(err) => {
                warn!("{} was not found: {}", id, err);
                request::Outcome::Error((Status::NotFound, ()))
            }
        }
    }
}

#[derive(FromForm, Debug, Default)]
pub struct ArticleForm {
    name: Option<String>,
    body: Option<String>,
    published: Option<String>,
}

impl From<ArticleForm> for ArticleFields {
    fn from(form: ArticleForm) -> Self {
        Self {
            name: form.name,
            body: form.body,
            published: form.published,
        }
    }
}

/// The JSON counterpart of [`ArticleForm`]. Values of any type are accepted
/// here and left for the store to cast.
#[derive(Deserialize, Debug, Default)]
pub struct ArticleDocumentInput {
    name: Option<serde_json::Value>,
    body: Option<serde_json::Value>,
    published: Option<serde_json::Value>,
}

impl From<ArticleDocumentInput> for ArticleFields {
    fn from(input: ArticleDocumentInput) -> Self {
        Self {
            name: input.name.and_then(scalar_text),
            body: input.body.and_then(scalar_text),
            published: input.published.and_then(scalar_text),
        }
    }
}

fn scalar_text(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

/// `name`, `body` and `published` from either a urlencoded form or a JSON
/// object. Any other body is read as no fields at all.
pub struct ArticleInput(ArticleFields);

impl ArticleInput {
    pub fn into_fields(self) -> ArticleFields {
        self.0
    }
}

#[rocket::async_trait]
impl<'r> FromData<'r> for ArticleInput {
    type Error = String;

    async fn from_data(request: &'r Request<'_>, data: Data<'r>) -> data::Outcome<'r, Self> {
        let content_type = request.content_type();
        if content_type.map_or(false, |content_type| content_type.is_json()) {
            match Json::<ArticleDocumentInput>::from_data(request, data).await {
                data::Outcome::Success(Json(form)) => data::Outcome::Success(Self(form.into())),
                data::Outcome::Error((status, err)) => {
                    data::Outcome::Error((status, err.to_string()))
                }
                data::Outcome::Forward(forward) => data::Outcome::Forward(forward),
            }
        } else if content_type.map_or(false, |content_type| {
            content_type.is_form() || content_type.is_form_data()
        }) {
            match Form::<ArticleForm>::from_data(request, data).await {
                data::Outcome::Success(form) => data::Outcome::Success(Self(form.into_inner().into())),
                data::Outcome::Error((status, errors)) => {
                    data::Outcome::Error((status, errors.to_string()))
                }
                data::Outcome::Forward(forward) => data::Outcome::Forward(forward),
            }
        } else {
            data::Outcome::Success(Self(ArticleFields::default()))
        }
    }
}

#[derive(Serialize)]
struct ListArticlesContext {
    title: &'static str,
    articles: Vec<Article>,
}

#[get("/")]
pub async fn list_articles(
    format: ResponseFormat,
    store: &State<SharedStore>,
) -> Result<Rendered, Failure> {
    let articles = store.find_all().await.map_to_failure()?;

    match format {
        ResponseFormat::Html => Ok(Rendered::Page(Template::render(
            "articles/index",
            ListArticlesContext {
                title: "All my Articles",
                articles,
            },
        ))),
        ResponseFormat::Json => Rendered::document(&articles),
    }
}

#[post("/", data = "<input>")]
pub async fn create_article(
    format: ResponseFormat,
    store: &State<SharedStore>,
    input: ArticleInput,
) -> Result<Rendered, Failure> {
    let article = match store.create(input.into_fields()).await {
        Ok(article) => article,
        Err(err) => {
            warn!("error creating article: {}", err);
            return Ok(Rendered::Message(String::from(
                "There was a problem adding the information to the database.",
            )));
        }
    };

    info!("POST creating new article: {}", article.id);
    match format {
        ResponseFormat::Html => Ok(Rendered::Redirect(Redirect::found("/articles"))),
        ResponseFormat::Json => Rendered::document(&article),
    }
}

#[derive(Serialize)]
struct NewArticleContext {
    title: &'static str,
}

#[get("/new")]
pub fn new_article() -> Template {
    Template::render(
        "articles/new",
        NewArticleContext {
            title: "Add New Article",
        },
    )
}

#[derive(Serialize)]
struct ViewArticleContext {
    title: String,
    published_date: String,
    article: Article,
}

fn render_article(
    template: &'static str,
    title: String,
    format: ResponseFormat,
    article: Article,
) -> Result<Rendered, Failure> {
    match format {
        ResponseFormat::Html => Ok(Rendered::Page(Template::render(
            template,
            ViewArticleContext {
                title,
                published_date: article.published_date(),
                article,
            },
        ))),
        ResponseFormat::Json => Rendered::document(&article),
    }
}

#[get("/<id>")]
pub async fn view_article(
    id: &str,
    format: ResponseFormat,
    article: LoadedArticle,
) -> Result<Rendered, Failure> {
    let LoadedArticle(article) = article;
    info!("GET Retrieving ID: {}", id);

    let title = article.document.name.clone().unwrap_or_default();
    render_article("articles/show", title, format, article)
}

#[get("/<id>/edit")]
pub async fn edit_article(
    id: &str,
    format: ResponseFormat,
    article: LoadedArticle,
) -> Result<Rendered, Failure> {
    let LoadedArticle(article) = article;
    info!("GET Retrieving ID: {}", id);

    let title = format!("Article{}", article.id);
    render_article("articles/edit", title, format, article)
}

#[put("/<id>", data = "<input>")]
pub async fn update_article(
    id: &str,
    format: ResponseFormat,
    store: &State<SharedStore>,
    article: LoadedArticle,
    input: ArticleInput,
) -> Result<Rendered, Failure> {
    let LoadedArticle(article) = article;

    if let Err(err) = store.update_by_id(article.id, input.into_fields()).await {
        warn!("error updating article {}: {}", id, err);
        return Ok(Rendered::Message(format!(
            "There was a problem updating the information to the database: {}",
            err
        )));
    }

    info!("PUT updating ID: {}", id);
    match format {
        ResponseFormat::Html => Ok(Rendered::Redirect(Redirect::found(format!(
            "/articles/{}",
            article.id
        )))),
        // Confirms with the record as it was before the update.
        ResponseFormat::Json => Rendered::document(&article),
    }
}

#[derive(Serialize)]
struct DeletedArticle {
    message: &'static str,
    item: Article,
}

#[delete("/<id>")]
pub async fn delete_article(
    id: &str,
    format: ResponseFormat,
    store: &State<SharedStore>,
    article: LoadedArticle,
) -> Result<Rendered, Failure> {
    let LoadedArticle(article) = article;
    let item = store.delete_by_id(article.id).await.map_to_failure()?;

    info!("DELETE removing ID: {}", id);
    match format {
        ResponseFormat::Html => Ok(Rendered::Redirect(Redirect::found("/articles"))),
        ResponseFormat::Json => Rendered::document(&DeletedArticle {
            message: "deleted",
            item,
        }),
    }
}
