use crate::domain::{SubscriberEmail, SubscriberName};

/// A validated signup from the public subscription form.
pub struct NewSubscriber {
    pub email: SubscriberEmail,
    pub name: SubscriberName,
}
