//! Place suggestions derived from a user's likes.
//!
//! The engine picks one liked place as the anchor, takes its category as the
//! user's preference and returns up to [`SUGGESTION_LIMIT`] catalog places of
//! that category. Users without likes get places from [`FALLBACK_CATEGORY`].
//!
//! Everything here is a pure function of its inputs. Loading interactions and
//! the catalog is the store's job.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::models::{Interaction, Place, PlaceCategory};

/// Maximum number of suggested places
pub const SUGGESTION_LIMIT: usize = 5;

/// Category used when the user has no usable like
pub const FALLBACK_CATEGORY: PlaceCategory = PlaceCategory::Restaurant;

/// Which like decides the preferred category
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LikeAnchor {
    /// Latest `created_at`; ties go to the earlier interaction in the input
    #[default]
    MostRecent,
    /// Whatever like the store returned first
    FirstReturned,
}

/// Knobs for the suggestion engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestionPolicy {
    pub anchor: LikeAnchor,
    /// Skip places the user already liked
    pub exclude_liked: bool,
}

impl Default for SuggestionPolicy {
    fn default() -> Self {
        Self {
            anchor: LikeAnchor::MostRecent,
            exclude_liked: true,
        }
    }
}

impl SuggestionPolicy {
    /// First-returned anchor, liked places not excluded
    pub fn first_returned_unfiltered() -> Self {
        Self {
            anchor: LikeAnchor::FirstReturned,
            exclude_liked: false,
        }
    }
}

/// Result of one suggestion run
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestions {
    pub category: PlaceCategory,
    pub places: Vec<Place>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SuggestionEngine {
    policy: SuggestionPolicy,
}

impl SuggestionEngine {
    pub fn new(policy: SuggestionPolicy) -> Self {
        Self { policy }
    }

    /// Suggests places for `user_id`.
    ///
    /// Interactions belonging to other users are ignored. An empty catalog
    /// yields an empty list, never an error.
    pub fn suggest(
        &self,
        user_id: &str,
        interactions: &[Interaction],
        places: &[Place],
    ) -> Suggestions {
        let likes: Vec<&Interaction> = interactions
            .iter()
            .filter(|i| i.user_id == user_id && i.liked_place().is_some())
            .collect();

        let category = self
            .anchor_like(&likes)
            .and_then(|like| like.liked_place())
            .and_then(|place_id| places.iter().find(|p| p.id == place_id))
            .map(|place| place.category)
            .unwrap_or(FALLBACK_CATEGORY);

        let liked: HashSet<i32> = if self.policy.exclude_liked {
            likes.iter().filter_map(|i| i.liked_place()).collect()
        } else {
            HashSet::new()
        };

        let places = places
            .iter()
            .filter(|p| p.category == category && !liked.contains(&p.id))
            .take(SUGGESTION_LIMIT)
            .cloned()
            .collect();

        Suggestions { category, places }
    }

    fn anchor_like<'a>(&self, likes: &[&'a Interaction]) -> Option<&'a Interaction> {
        match self.policy.anchor {
            LikeAnchor::FirstReturned => likes.first().copied(),
            LikeAnchor::MostRecent => likes.iter().copied().reduce(|best, candidate| {
                if candidate.created_at > best.created_at {
                    candidate
                } else {
                    best
                }
            }),
        }
    }
}
