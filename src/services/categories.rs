//! Display categories for events, inferred from their titles.

use serde::{Deserialize, Serialize};

use crate::models::Event;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Concert,
    Festival,
    Theatre,
    Film,
    Exhibition,
    Other,
}

/// Keyword table in priority order; the first row with a matching keyword wins.
/// Keywords are lowercase and matched as substrings of the lowercased title.
/// Short keywords such as `art` also hit inside words ("party", "Mozart"), so
/// those titles land in [`EventCategory::Exhibition`].
const KEYWORDS: &[(&[&str], EventCategory)] = &[
    (&["concert", "music", "muzica"], EventCategory::Concert),
    (&["festival"], EventCategory::Festival),
    (&["theatre", "theater", "teatru"], EventCategory::Theatre),
    (&["film", "movie", "cinema"], EventCategory::Film),
    (&["exhibition", "expozitie", "art"], EventCategory::Exhibition),
];

pub fn infer_category(title: &str) -> EventCategory {
    let title = title.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| title.contains(k)))
        .map(|(_, category)| *category)
        .unwrap_or(EventCategory::Other)
}

/// Search text and category filter from the events page
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventFilter {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub category: Option<EventCategory>,
}

impl EventFilter {
    pub fn matches(&self, event: &Event) -> bool {
        let query_matches = match self.q.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => {
                let q = q.to_lowercase();
                [&event.title, &event.description, &event.location]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&q))
            }
            _ => true,
        };

        let category_matches = self
            .category
            .map_or(true, |category| infer_category(&event.title) == category);

        query_matches && category_matches
    }

    pub fn apply(&self, events: Vec<Event>) -> Vec<Event> {
        events.into_iter().filter(|e| self.matches(e)).collect()
    }
}
