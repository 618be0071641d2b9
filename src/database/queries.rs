mod preference_queries;
mod subscriber_queries;

pub use preference_queries::*;
pub use subscriber_queries::*;
