mod new_subscriber;
mod public_id;
mod subscriber_email;
mod subscriber_name;

pub use new_subscriber::NewSubscriber;
pub use public_id::PublicId;
pub use subscriber_email::SubscriberEmail;
pub use subscriber_name::SubscriberName;
