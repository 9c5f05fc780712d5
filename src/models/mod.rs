mod campaign;
mod list;
mod subscriber;

pub use campaign::Campaign;
pub use list::{List, ListVisibility, OptinMode};
pub use subscriber::{
    CreatedSubscriber, EngagementSummary, ListRelation, Subscriber, SubscriptionStatus,
};
