use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use crate::error::AppError;

/// Closed set of place categories offered by the place form
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PlaceCategory {
    Restaurant,
    Cafe,
    Bar,
    Park,
    Museum,
    Shopping,
    Entertainment,
    Other,
}

impl PlaceCategory {
    pub const ALL: [PlaceCategory; 8] = [
        PlaceCategory::Restaurant,
        PlaceCategory::Cafe,
        PlaceCategory::Bar,
        PlaceCategory::Park,
        PlaceCategory::Museum,
        PlaceCategory::Shopping,
        PlaceCategory::Entertainment,
        PlaceCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlaceCategory::Restaurant => "restaurant",
            PlaceCategory::Cafe => "cafe",
            PlaceCategory::Bar => "bar",
            PlaceCategory::Park => "park",
            PlaceCategory::Museum => "museum",
            PlaceCategory::Shopping => "shopping",
            PlaceCategory::Entertainment => "entertainment",
            PlaceCategory::Other => "other",
        }
    }
}

impl Display for PlaceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PlaceCategory {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        PlaceCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == needle)
            .ok_or_else(|| AppError::InvalidInput(format!("Unknown place category: {}", s)))
    }
}

/// A point of interest shown on the map
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: i32,
    pub name: String,
    pub category: PlaceCategory,
    pub description: Option<String>,
    pub main_photo: String,
    #[serde(default)]
    pub gallery: Vec<String>,
    pub lat: f64,
    pub lng: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Place submission from the "add place" form
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlace {
    pub name: String,
    pub category: PlaceCategory,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(alias = "mainPhotoUrl")]
    pub main_photo: String,
    #[serde(default)]
    pub gallery: Vec<String>,
    pub lat: f64,
    pub lng: f64,
}

const MAX_NAME_LEN: usize = 256;
/// Photo columns are `VARCHAR(256)`
pub const MAX_PHOTO_LEN: usize = 256;
const MAX_DESCRIPTION_LEN: usize = 1024;

impl NewPlace {
    /// Checks the column limits and coordinate ranges
    pub fn validate(&self) -> Result<(), AppError> {
        let name = self.name.trim();
        if name.is_empty() || name.chars().count() > MAX_NAME_LEN {
            return Err(AppError::InvalidInput(format!(
                "Place name must be between 1 and {} characters",
                MAX_NAME_LEN
            )));
        }
        if self.main_photo.trim().is_empty() {
            return Err(AppError::InvalidInput("Main photo is required".to_string()));
        }
        if self.main_photo.chars().count() > MAX_PHOTO_LEN {
            return Err(AppError::InvalidInput(format!(
                "Main photo URL must be at most {} characters",
                MAX_PHOTO_LEN
            )));
        }
        if let Some(description) = &self.description {
            if description.chars().count() > MAX_DESCRIPTION_LEN {
                return Err(AppError::InvalidInput(format!(
                    "Description must be at most {} characters",
                    MAX_DESCRIPTION_LEN
                )));
            }
        }
        if !(-90.0..=90.0).contains(&self.lat) || !(-180.0..=180.0).contains(&self.lng) {
            return Err(AppError::InvalidInput(format!(
                "Coordinates out of range: ({}, {})",
                self.lat, self.lng
            )));
        }
        Ok(())
    }
}
