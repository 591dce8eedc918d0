use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::DatabaseError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: Uuid,
    #[serde(flatten)]
    pub document: ArticleDocument,
}

/// The persisted portion of an article. Stored as-is by every
/// [`ArticleStore`](crate::store::ArticleStore) implementation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleDocument {
    pub name: Option<String>,
    pub body: Option<String>,
    #[serde(default, with = "timestamp")]
    pub published: Option<DateTime<Utc>>,
    #[serde(rename = "isLoved")]
    pub is_loved: Option<bool>,
}

impl Article {
    pub fn new(id: Uuid, document: ArticleDocument) -> Self {
        Self { id, document }
    }

    /// The calendar date (UTC) of `published`, without the time of day.
    pub fn published_date(&self) -> String {
        self.document
            .published
            .map(|published| published.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }
}

/// Untyped input for a create or update, exactly as the client sent it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleFields {
    pub name: Option<String>,
    pub body: Option<String>,
    pub published: Option<String>,
}

impl ArticleFields {
    /// Casts the fields into a fresh document. A missing `published`
    /// defaults to `now`.
    pub fn into_new_document(self, now: DateTime<Utc>) -> Result<ArticleDocument, DatabaseError> {
        let published = cast_date("published", self.published.as_deref())?.or(Some(now));

        Ok(ArticleDocument {
            name: self.name,
            body: self.body,
            published,
            is_loved: None,
        })
    }

    /// Replaces `name`, `body` and `published` on `document`. Fields missing
    /// from the input are cleared rather than kept. Nothing is written if a
    /// cast fails.
    pub fn overwrite(self, document: &mut ArticleDocument) -> Result<(), DatabaseError> {
        let published = cast_date("published", self.published.as_deref())?;

        document.name = self.name;
        document.body = self.body;
        document.published = published;

        Ok(())
    }
}

pub fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw).ok()
}

fn cast_date(
    path: &'static str,
    value: Option<&str>,
) -> Result<Option<DateTime<Utc>>, DatabaseError> {
    let value = match value.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(value) => value,
    };

    // Numbers too large to be a year are milliseconds since the epoch.
    if let Ok(millis) = value.parse::<i64>() {
        if !(-271_820..275_761).contains(&millis) {
            if let Some(timestamp) = Utc.timestamp_millis_opt(millis).single() {
                return Ok(Some(timestamp));
            }
        }
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(Some(timestamp.with_timezone(&Utc)));
    }

    for format in &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(Some(Utc.from_utc_datetime(&naive)));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(Some(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))));
    }

    Err(DatabaseError::Cast {
        kind: "Date",
        value: value.to_owned(),
        path,
    })
}

// ISO-8601 with millisecond precision and a `Z` suffix.
mod timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(timestamp) => {
                serializer.serialize_str(&timestamp.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        Option::<DateTime<Utc>>::deserialize(deserializer)
    }
}
