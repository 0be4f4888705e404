pub mod categories;
pub mod mailer;
pub mod schedule;
pub mod suggestions;

pub use categories::{infer_category, EventCategory, EventFilter};
pub use mailer::{ContactMailer, HttpMailer};
pub use schedule::{group_by_day, upcoming_months, Agenda};
pub use suggestions::{SuggestionEngine, SuggestionPolicy, Suggestions};
