use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{error::AppError, models::place::MAX_PHOTO_LEN};

/// A city event listed on the events page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub location: String,
    #[serde(deserialize_with = "calendar_date::deserialize")]
    pub date: NaiveDate,
    /// Time of day as entered, `HH:MM`
    pub time: String,
    pub max_participants: i32,
    pub photo: String,
    pub external_link: String,
    pub user_id: String,
    pub user_email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Event {
    /// Minutes since midnight, `None` when the stored time is malformed
    pub fn minutes_of_day(&self) -> Option<u16> {
        parse_time_of_day(&self.time)
    }
}

/// Parses a 24-hour `H:MM` / `HH:MM` string into minutes since midnight.
pub fn parse_time_of_day(time: &str) -> Option<u16> {
    let (hours, minutes) = time.trim().split_once(':')?;

    if hours.is_empty() || hours.len() > 2 || minutes.len() != 2 {
        return None;
    }
    if !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let hours: u16 = hours.parse().ok()?;
    let minutes: u16 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }

    Some(hours * 60 + minutes)
}

/// Event submission from the "new event" form
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub location: String,
    #[serde(deserialize_with = "calendar_date::deserialize")]
    pub date: NaiveDate,
    pub time: String,
    pub max_participants: i32,
    #[serde(default)]
    pub photo: String,
    #[serde(default)]
    pub external_link: String,
}

impl NewEvent {
    pub fn validate(&self) -> Result<(), AppError> {
        min_chars("title", &self.title, 2)?;
        min_chars("description", &self.description, 10)?;
        min_chars("location", &self.location, 2)?;

        if parse_time_of_day(&self.time).is_none() {
            return Err(AppError::InvalidInput(format!(
                "Invalid time format: {:?}, expected HH:MM",
                self.time
            )));
        }
        if self.max_participants < 1 {
            return Err(AppError::InvalidInput(
                "There must be at least 1 participant".to_string(),
            ));
        }
        if self.photo.trim().is_empty() {
            return Err(AppError::InvalidInput("A photo is required".to_string()));
        }
        if self.photo.chars().count() > MAX_PHOTO_LEN {
            return Err(AppError::InvalidInput(format!(
                "Photo URL must be at most {} characters",
                MAX_PHOTO_LEN
            )));
        }

        let link = self.external_link.trim();
        let is_http = ["http://", "https://"]
            .iter()
            .any(|scheme| link.starts_with(scheme) && link.len() > scheme.len());
        if !is_http {
            return Err(AppError::InvalidInput(format!(
                "External link must be an http(s) URL, got {:?}",
                self.external_link
            )));
        }

        Ok(())
    }
}

fn min_chars(field: &str, value: &str, min: usize) -> Result<(), AppError> {
    if value.trim().chars().count() < min {
        return Err(AppError::InvalidInput(format!(
            "{} must have at least {} characters",
            field, min
        )));
    }
    Ok(())
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp. Timestamps are moved to UTC
/// before the day is taken, so grouping never depends on the server's zone.
pub mod calendar_date {
    use super::*;

    pub fn parse(raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Some(date);
        }
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|ts| ts.with_timezone(&Utc).date_naive())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date: {}", raw)))
    }
}
