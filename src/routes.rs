mod blog;
mod health_check;
mod json_body;
mod newsletter_preferences;
mod newsletter_subscribe;
mod newsletter_unsubscribe;

pub use blog::*;
pub use health_check::*;
pub use json_body::*;
pub use newsletter_preferences::*;
pub use newsletter_subscribe::*;
pub use newsletter_unsubscribe::*;
