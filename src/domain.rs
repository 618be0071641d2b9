mod new_subscription;
mod newsletter_topic;
mod source_label;
mod subscriber_email;
mod topic_preferences;
mod unsubscribe_token;

pub use new_subscription::*;
pub use newsletter_topic::*;
pub use source_label::*;
pub use subscriber_email::*;
pub use topic_preferences::*;
pub use unsubscribe_token::*;
