//! Schema-checked decoding of request bodies.
//!
//! Handlers receive the raw body bytes and turn them into typed, validated
//! field structs here before anything reaches storage. Every failure is a
//! [`CoreError::Validation`], which the API layer reports as 422.
//!
//! Rules:
//! - the body must be a JSON object;
//! - required fields must be present and of the right JSON type;
//! - text fields that carry identity (`title`, `name`) must not be blank;
//! - `release_date` is a `YYYY-MM-DD` calendar date;
//! - `age` is an integer >= 0;
//! - unknown fields are ignored.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::CoreError;
use crate::types::Date;

/// The two entity kinds the API manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Movie,
    Actor,
}

impl EntityKind {
    /// Name used in error messages (`"Movie with id 3 not found"`).
    pub const fn name(self) -> &'static str {
        match self {
            EntityKind::Movie => "Movie",
            EntityKind::Actor => "Actor",
        }
    }
}

// ---------------------------------------------------------------------------
// Field structs
// ---------------------------------------------------------------------------

/// Validated fields for a new movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct MovieFields {
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    #[serde(deserialize_with = "calendar_date::deserialize")]
    pub release_date: Date,
}

/// Validated fields for a new actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ActorFields {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[validate(range(min = 0, message = "age must be >= 0"))]
    pub age: i32,
    pub gender: String,
}

/// Partial update for a movie. `None` (absent or `null`) leaves the column as is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct MoviePatch {
    #[validate(custom(function = "not_blank"))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "calendar_date::deserialize_option")]
    pub release_date: Option<Date>,
}

/// Partial update for an actor. `None` (absent or `null`) leaves the column as is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct ActorPatch {
    #[validate(custom(function = "not_blank"))]
    pub name: Option<String>,
    #[validate(range(min = 0, message = "age must be >= 0"))]
    pub age: Option<i32>,
    pub gender: Option<String>,
}

impl MoviePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.release_date.is_none()
    }
}

impl ActorPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.age.is_none() && self.gender.is_none()
    }
}

/// `release_date` accepts only the canonical `YYYY-MM-DD` spelling, so the
/// value echoed back is byte-for-byte what the client sent.
mod calendar_date {
    use serde::{de, Deserialize, Deserializer};

    use crate::types::Date;

    const FORMAT: &str = "%Y-%m-%d";

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(de::Error::custom)
    }

    pub fn deserialize_option<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Date>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| parse(&raw))
            .transpose()
            .map_err(de::Error::custom)
    }

    pub(super) fn parse(raw: &str) -> Result<Date, String> {
        let date = Date::parse_from_str(raw, FORMAT)
            .map_err(|e| format!("release_date `{raw}` is not a date: {e}"))?;
        if date.format(FORMAT).to_string() != raw {
            return Err(format!("release_date `{raw}` must be written as YYYY-MM-DD"));
        }
        Ok(date)
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be empty".into());
        return Err(err);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tagged variants
// ---------------------------------------------------------------------------

/// A decoded create body, tagged by entity kind.
///
/// Serializes as the bare field object, which is what a create echoes back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CreatePayload {
    Movie(MovieFields),
    Actor(ActorFields),
}

/// A decoded partial-update body, tagged by entity kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchPayload {
    Movie(MoviePatch),
    Actor(ActorPatch),
}

/// Decode a create body for `kind`.
pub fn decode_create(kind: EntityKind, body: &[u8]) -> Result<CreatePayload, CoreError> {
    match kind {
        EntityKind::Movie => decode_movie(body).map(CreatePayload::Movie),
        EntityKind::Actor => decode_actor(body).map(CreatePayload::Actor),
    }
}

/// Decode a partial-update body for `kind`.
pub fn decode_patch(kind: EntityKind, body: &[u8]) -> Result<PatchPayload, CoreError> {
    match kind {
        EntityKind::Movie => decode_movie_patch(body).map(PatchPayload::Movie),
        EntityKind::Actor => decode_actor_patch(body).map(PatchPayload::Actor),
    }
}

pub fn decode_movie(body: &[u8]) -> Result<MovieFields, CoreError> {
    decode_validated(body)
}

pub fn decode_actor(body: &[u8]) -> Result<ActorFields, CoreError> {
    decode_validated(body)
}

pub fn decode_movie_patch(body: &[u8]) -> Result<MoviePatch, CoreError> {
    let patch: MoviePatch = decode_validated(body)?;
    if patch.is_empty() {
        return Err(no_fields_error(&["title", "release_date"]));
    }
    Ok(patch)
}

pub fn decode_actor_patch(body: &[u8]) -> Result<ActorPatch, CoreError> {
    let patch: ActorPatch = decode_validated(body)?;
    if patch.is_empty() {
        return Err(no_fields_error(&["name", "age", "gender"]));
    }
    Ok(patch)
}

fn no_fields_error(fields: &[&str]) -> CoreError {
    CoreError::Validation(format!(
        "request body must contain at least one of: {}",
        fields.join(", ")
    ))
}

/// Parse `body` as a JSON object, deserialize it into `T`, then run `T`'s
/// field rules.
fn decode_validated<T>(body: &[u8]) -> Result<T, CoreError>
where
    T: DeserializeOwned + Validate,
{
    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| CoreError::Validation(format!("request body is not valid JSON: {e}")))?;

    if !value.is_object() {
        return Err(CoreError::Validation(
            "request body must be a JSON object".to_string(),
        ));
    }

    let decoded: T =
        serde_json::from_value(value).map_err(|e| CoreError::Validation(e.to_string()))?;

    decoded
        .validate()
        .map_err(|e| CoreError::Validation(e.to_string()))?;

    Ok(decoded)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
