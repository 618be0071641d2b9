use crate::database::DatabaseConnection;
use crate::domain::{NewsletterTopic, TopicPreferences};
use crate::models::SubscriberPreferences;
use crate::schema::subscriber_preferences;
use chrono::Utc;
use diesel::prelude::*;
use diesel::result::Error;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

/// Replace semantics used by subscribe: every existing preference row is
/// dropped and exactly the submitted topics are inserted as subscribed.
#[tracing::instrument(
    name = "Replacing preference set",
    skip(connection, topics)
)]
pub async fn replace_preferences(
    connection: &mut DatabaseConnection,
    subscriber_id: &Uuid,
    topics: &[NewsletterTopic],
) -> Result<(), Error> {
    diesel::delete(
        subscriber_preferences::table
            .filter(subscriber_preferences::subscriber_id.eq(subscriber_id)),
    )
    .execute(connection)
    .await?;
    let rows: Vec<SubscriberPreferences> = topics
        .iter()
        .map(|topic| {
            SubscriberPreferences::new(subscriber_id, topic.as_str(), true)
        })
        .collect();
    diesel::insert_into(subscriber_preferences::table)
        .values(&rows)
        .execute(connection)
        .await?;
    Ok(())
}

/// Value-update semantics used by the preference endpoint: all four
/// enumerated topics are upserted with the requested boolean, rows that
/// never existed included. Unlisted rows are never deleted here.
#[tracing::instrument(
    name = "Upserting preference values",
    skip(connection, preferences)
)]
pub async fn upsert_preferences(
    connection: &mut DatabaseConnection,
    subscriber_id: &Uuid,
    preferences: &TopicPreferences,
) -> Result<(), Error> {
    for (topic, subscribed) in preferences.entries() {
        let row = SubscriberPreferences::new(
            subscriber_id,
            topic.as_str(),
            subscribed,
        );
        diesel::insert_into(subscriber_preferences::table)
            .values(&row)
            .on_conflict((
                subscriber_preferences::subscriber_id,
                subscriber_preferences::topic,
            ))
            .do_update()
            .set((
                subscriber_preferences::subscribed.eq(subscribed),
                subscriber_preferences::updated_at.eq(Utc::now()),
            ))
            .execute(connection)
            .await?;
    }
    Ok(())
}

/// Topics without a stored row read back as false.
#[tracing::instrument(name = "Loading preferences", skip(connection))]
pub async fn load_preferences(
    connection: &mut DatabaseConnection,
    subscriber_id: &Uuid,
) -> Result<TopicPreferences, Error> {
    let rows = subscriber_preferences::table
        .filter(subscriber_preferences::subscriber_id.eq(subscriber_id))
        .select(SubscriberPreferences::as_select())
        .load(connection)
        .await?;
    let mut preferences = TopicPreferences::none();
    for row in rows {
        if let Ok(topic) = NewsletterTopic::try_from(row.topic.as_str()) {
            preferences.set(topic, row.subscribed);
        }
    }
    Ok(preferences)
}

#[tracing::instrument(
    name = "Clearing all preferences",
    skip(connection)
)]
pub async fn clear_preferences(
    connection: &mut DatabaseConnection,
    subscriber_id: &Uuid,
) -> Result<(), Error> {
    diesel::update(
        subscriber_preferences::table
            .filter(subscriber_preferences::subscriber_id.eq(subscriber_id)),
    )
    .set((
        subscriber_preferences::subscribed.eq(false),
        subscriber_preferences::updated_at.eq(Utc::now()),
    ))
    .execute(connection)
    .await?;
    Ok(())
}
