use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Kind of a stored interaction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    Like,
    View,
    Review,
}

impl InteractionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionKind::Like => "like",
            InteractionKind::View => "view",
            InteractionKind::Review => "review",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "like" => Some(InteractionKind::Like),
            "view" => Some(InteractionKind::View),
            "review" => Some(InteractionKind::Review),
            _ => None,
        }
    }
}

/// What an interaction points at. Exactly one of place or event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum InteractionTarget {
    PlaceId(i32),
    EventId(i32),
}

impl InteractionTarget {
    /// Builds a target from the two optional ids of a request or a row
    pub fn from_parts(place_id: Option<i32>, event_id: Option<i32>) -> Result<Self, AppError> {
        match (place_id, event_id) {
            (Some(place_id), None) => Ok(InteractionTarget::PlaceId(place_id)),
            (None, Some(event_id)) => Ok(InteractionTarget::EventId(event_id)),
            (None, None) => Err(AppError::InvalidInput(
                "Either placeId or eventId must be provided".to_string(),
            )),
            (Some(_), Some(_)) => Err(AppError::InvalidInput(
                "Only one of placeId or eventId may be provided".to_string(),
            )),
        }
    }

    pub fn place_id(&self) -> Option<i32> {
        match self {
            InteractionTarget::PlaceId(id) => Some(*id),
            InteractionTarget::EventId(_) => None,
        }
    }

    pub fn event_id(&self) -> Option<i32> {
        match self {
            InteractionTarget::EventId(id) => Some(*id),
            InteractionTarget::PlaceId(_) => None,
        }
    }
}

/// A recorded user action against a place or an event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    pub id: i32,
    pub user_id: String,
    #[serde(flatten)]
    pub target: InteractionTarget,
    #[serde(rename = "interactionType")]
    pub kind: InteractionKind,
    pub rating: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl Interaction {
    /// Place id of a `like` on a place, if this is one
    pub fn liked_place(&self) -> Option<i32> {
        match self.kind {
            InteractionKind::Like => self.target.place_id(),
            _ => None,
        }
    }
}

/// Interaction to be stored for a user
#[derive(Debug, Clone, PartialEq)]
pub struct NewInteraction {
    pub target: InteractionTarget,
    pub kind: InteractionKind,
    pub rating: Option<i32>,
}

/// Wire kinds accepted by the preferences endpoint; `unlike` removes likes
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RequestedKind {
    Like,
    View,
    Review,
    Unlike,
}

/// Body of `POST /api/preferences`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionRequest {
    #[serde(default)]
    pub place_id: Option<i32>,
    #[serde(default)]
    pub event_id: Option<i32>,
    pub interaction_type: RequestedKind,
    #[serde(default)]
    pub rating: Option<i32>,
}

/// What the store has to do for an interaction request
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionAction {
    Record(NewInteraction),
    Unlike(InteractionTarget),
}

impl InteractionRequest {
    pub fn into_action(self) -> Result<InteractionAction, AppError> {
        let target = InteractionTarget::from_parts(self.place_id, self.event_id)?;

        if let Some(rating) = self.rating {
            if !(1..=5).contains(&rating) {
                return Err(AppError::InvalidInput(format!(
                    "Rating must be between 1 and 5, got {}",
                    rating
                )));
            }
        }

        let kind = match self.interaction_type {
            RequestedKind::Unlike => return Ok(InteractionAction::Unlike(target)),
            RequestedKind::Like => InteractionKind::Like,
            RequestedKind::View => InteractionKind::View,
            RequestedKind::Review => InteractionKind::Review,
        };

        Ok(InteractionAction::Record(NewInteraction {
            target,
            kind,
            rating: self.rating,
        }))
    }
}
