use serde::{Deserialize, Serialize};

use crate::db::dates::format_date;
use crate::db::models::{LogEntry, serialize_duration};

// Every field is optional on the way in: presence is enforced by the store,
// so a missing field turns into a validation error rather than a rejection.

#[derive(Debug, Default, Deserialize)]
pub struct CreateUserForm {
    pub username: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExerciseForm {
    pub description: Option<String>,
    pub duration: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LogQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<String>,
}

impl LogQuery {
    /// `None` unless `limit` is a non-negative number; fractions round down.
    pub fn limit(&self) -> Option<usize> {
        let limit: f64 = self.limit.as_deref()?.trim().parse().ok()?;
        (limit.is_finite() && limit >= 0.0).then(|| limit.floor() as usize)
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedUser {
    pub username: String,
    #[serde(rename = "_id")]
    pub id: String,
}

/// Reply to a logged exercise. `id` is the owning user's id.
#[derive(Debug, Serialize)]
pub struct ExerciseResponse {
    pub username: String,
    pub description: String,
    #[serde(serialize_with = "serialize_duration")]
    pub duration: f64,
    pub date: String,
    #[serde(rename = "_id")]
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct LogItem {
    pub description: String,
    #[serde(serialize_with = "serialize_duration")]
    pub duration: f64,
    pub date: String,
}

impl From<LogEntry> for LogItem {
    fn from(entry: LogEntry) -> Self {
        Self {
            description: entry.description,
            duration: entry.duration,
            date: format_date(entry.date),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LogResponse {
    pub username: String,
    pub count: usize,
    #[serde(rename = "_id")]
    pub id: String,
    pub log: Vec<LogItem>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(limit: Option<&str>) -> LogQuery {
        LogQuery {
            limit: limit.map(str::to_string),
            ..LogQuery::default()
        }
    }

    #[test]
    fn test_limit_parsing() {
        assert_eq!(query(Some("2")).limit(), Some(2));
        assert_eq!(query(Some("0")).limit(), Some(0));
        assert_eq!(query(Some(" 7 ")).limit(), Some(7));
        assert_eq!(query(Some("2.5")).limit(), Some(2));
        assert_eq!(query(Some("0.9")).limit(), Some(0));
        assert_eq!(query(Some("-1")).limit(), None);
        assert_eq!(query(Some("NaN")).limit(), None);
        assert_eq!(query(Some("ten")).limit(), None);
        assert_eq!(query(None).limit(), None);
    }

    #[test]
    fn test_log_item_formats_date() {
        let item = LogItem::from(LogEntry {
            description: "swim".to_string(),
            duration: 45.0,
            date: chrono::NaiveDate::from_ymd_opt(2023, 1, 15).unwrap(),
        });
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"description": "swim", "duration": 45, "date": "Sun Jan 15 2023"})
        );
    }
}
