use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// A user's rating and comment on a place
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: i32,
    pub place_id: i32,
    pub user_id: String,
    pub user_email: String,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/reviews`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub place_id: i32,
    pub rating: i32,
    #[serde(default)]
    pub comment: Option<String>,
}

impl NewReview {
    pub fn validate(&self) -> Result<(), AppError> {
        if !(1..=5).contains(&self.rating) {
            return Err(AppError::InvalidInput(format!(
                "Rating must be between 1 and 5, got {}",
                self.rating
            )));
        }
        if let Some(comment) = &self.comment {
            if comment.chars().count() > 1024 {
                return Err(AppError::InvalidInput(
                    "Comment must be at most 1024 characters".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Aggregate shown above a place's review list
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    pub count: usize,
    pub average_rating: Option<f64>,
}

impl ReviewSummary {
    pub fn from_reviews(reviews: &[Review]) -> Self {
        let count = reviews.len();
        let average_rating = (count > 0).then(|| {
            let total: i64 = reviews.iter().map(|r| i64::from(r.rating)).sum();
            total as f64 / count as f64
        });
        Self {
            count,
            average_rating,
        }
    }
}
