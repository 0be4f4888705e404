pub mod contact;
pub mod event;
pub mod interaction;
pub mod place;
pub mod review;

pub use contact::ContactMessage;
pub use event::{parse_time_of_day, Event, NewEvent};
pub use interaction::{
    Interaction, InteractionAction, InteractionKind, InteractionRequest, InteractionTarget,
    NewInteraction,
};
pub use place::{NewPlace, Place, PlaceCategory};
pub use review::{NewReview, Review, ReviewSummary};
