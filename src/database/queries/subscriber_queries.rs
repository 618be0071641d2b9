use crate::database::DatabaseConnection;
use crate::domain::{NewSubscription, UnsubscribeToken};
use crate::models::Subscribers;
use crate::schema::subscribers;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::result::Error;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

/// Creates the subscriber row or reactivates an existing one.
///
/// On email conflict the stored token is left untouched, so the value
/// returned here is the token the subscriber was originally issued.
/// A freshly supplied source label wins over the stored one; an absent
/// label leaves the stored one in place.
#[tracing::instrument(
    name = "Upserting subscriber into database.",
    skip(subscription, token, connection)
)]
pub async fn upsert_subscriber(
    connection: &mut DatabaseConnection,
    subscription: &NewSubscription,
    token: &UnsubscribeToken,
) -> Result<(Uuid, String), Error> {
    let subscriber_entry = Subscribers::new(subscription, token);
    match diesel::insert_into(subscribers::table)
        .values(&subscriber_entry)
        .on_conflict(subscribers::email)
        .do_update()
        .set((
            subscribers::active.eq(true),
            subscribers::unsubscribed_at.eq(None::<DateTime<Utc>>),
            subscribers::updated_at.eq(Utc::now()),
            subscribers::source.eq(diesel::dsl::sql::<
                diesel::sql_types::Nullable<diesel::sql_types::Text>,
            >(
                "COALESCE(excluded.source, subscribers.source)"
            )),
        ))
        .returning((subscribers::id, subscribers::unsubscribe_token))
        .get_result::<(Uuid, String)>(connection)
        .await
    {
        Ok(row) => {
            tracing::info!("Subscriber details have been saved");
            Ok(row)
        }
        Err(e) => {
            tracing::error!("Failed to execute query {:?}", e);
            Err(e)
        }
    }
}

#[tracing::instrument(
    name = "Looking up subscriber by token",
    skip(token, connection)
)]
pub async fn find_subscriber_by_token(
    connection: &mut DatabaseConnection,
    token: &UnsubscribeToken,
) -> Result<Option<Subscribers>, Error> {
    subscribers::table
        .filter(subscribers::unsubscribe_token.eq(token.as_ref()))
        .select(Subscribers::as_select())
        .first(connection)
        .await
        .optional()
}

#[tracing::instrument(name = "Reactivating subscriber", skip(connection))]
pub async fn reactivate_subscriber(
    connection: &mut DatabaseConnection,
    subscriber_id: &Uuid,
) -> Result<(), Error> {
    diesel::update(subscribers::table.find(subscriber_id))
        .set((
            subscribers::active.eq(true),
            subscribers::unsubscribed_at.eq(None::<DateTime<Utc>>),
            subscribers::updated_at.eq(Utc::now()),
        ))
        .execute(connection)
        .await?;
    Ok(())
}

#[tracing::instrument(
    name = "Soft-unsubscribing subscriber",
    skip(connection)
)]
pub async fn deactivate_subscriber(
    connection: &mut DatabaseConnection,
    subscriber_id: &Uuid,
) -> Result<(), Error> {
    diesel::update(subscribers::table.find(subscriber_id))
        .set((
            subscribers::active.eq(false),
            subscribers::unsubscribed_at.eq(Some(Utc::now())),
            subscribers::updated_at.eq(Utc::now()),
        ))
        .execute(connection)
        .await?;
    Ok(())
}

/// Removes the subscriber row; preference rows go with it through the
/// foreign-key cascade.
#[tracing::instrument(name = "Hard-deleting subscriber", skip(connection))]
pub async fn delete_subscriber(
    connection: &mut DatabaseConnection,
    subscriber_id: &Uuid,
) -> Result<(), Error> {
    diesel::delete(subscribers::table.find(subscriber_id))
        .execute(connection)
        .await?;
    Ok(())
}
