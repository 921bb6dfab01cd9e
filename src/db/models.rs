use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use crate::db::dates;
use crate::db::error::StoreError;

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Exercise {
    pub id: String,
    pub user_id: String,
    pub description: String,
    pub duration: f64,
    pub date: NaiveDate,
}

/// Projection of an exercise returned by log queries. Carries neither the
/// exercise id nor the owner.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct LogEntry {
    pub description: String,
    pub duration: f64,
    pub date: NaiveDate,
}

/// A user document before the store has assigned it an id.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub username: Option<String>,
}

impl NewUser {
    pub fn new(username: Option<String>) -> Self {
        Self { username }
    }

    pub(crate) fn validate(self) -> Result<String, StoreError> {
        required("username", self.username)
    }
}

/// An exercise document as submitted, fields still uncoerced.
#[derive(Debug, Clone, Default)]
pub struct NewExercise {
    pub user_id: String,
    pub description: Option<String>,
    pub duration: Option<String>,
    /// `None` or blank means "today".
    pub date: Option<String>,
}

pub(crate) struct ValidExercise {
    pub user_id: String,
    pub description: String,
    pub duration: f64,
    pub date: NaiveDate,
}

impl NewExercise {
    pub(crate) fn validate(self) -> Result<ValidExercise, StoreError> {
        if self.user_id.is_empty() {
            return Err(StoreError::required("userId"));
        }
        let description = required("description", self.description)?;
        let duration = parse_duration(&required("duration", self.duration)?)?;
        let date = match self.date.as_deref().map(str::trim) {
            None | Some("") => dates::today(),
            Some(raw) => dates::parse_date(raw).ok_or_else(|| StoreError::cast("date", "date", raw))?,
        };

        Ok(ValidExercise {
            user_id: self.user_id,
            description,
            duration,
            date,
        })
    }
}

fn required(path: &'static str, value: Option<String>) -> Result<String, StoreError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(StoreError::required(path)),
    }
}

fn parse_duration(raw: &str) -> Result<f64, StoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(StoreError::required("duration"));
    }
    match trimmed.parse::<f64>() {
        Ok(minutes) if minutes.is_finite() => Ok(minutes),
        _ => Err(StoreError::cast("Number", "duration", raw)),
    }
}

/// Writes whole numbers as JSON integers (`30`, not `30.0`).
pub fn serialize_duration<S>(minutes: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if minutes.fract() == 0.0 && minutes.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*minutes as i64)
    } else {
        serializer.serialize_f64(*minutes)
    }
}
