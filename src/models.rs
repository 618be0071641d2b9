use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{NewSubscription, UnsubscribeToken};

#[derive(Insertable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::subscribers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Subscribers {
    pub id: Uuid,
    pub email: String,
    pub unsubscribe_token: String,
    pub active: bool,
    pub source: Option<String>,
    pub subscribed_at: DateTime<Utc>,
    pub unsubscribed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl Subscribers {
    pub fn new(
        subscription: &NewSubscription,
        token: &UnsubscribeToken,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            email: subscription.email.as_ref().to_string(),
            unsubscribe_token: token.as_ref().to_string(),
            active: true,
            source: subscription
                .source
                .as_ref()
                .map(|s| s.as_ref().to_string()),
            subscribed_at: now,
            unsubscribed_at: None,
            updated_at: now,
        }
    }
}

#[derive(Insertable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::subscriber_preferences)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SubscriberPreferences {
    pub subscriber_id: Uuid,
    pub topic: String,
    pub subscribed: bool,
    pub updated_at: DateTime<Utc>,
}

impl SubscriberPreferences {
    pub fn new(subscriber_id: &Uuid, topic: &str, subscribed: bool) -> Self {
        Self {
            subscriber_id: *subscriber_id,
            topic: topic.to_string(),
            subscribed,
            updated_at: Utc::now(),
        }
    }
}
