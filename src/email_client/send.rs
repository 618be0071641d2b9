use crate::domain::{NewsletterTopic, SubscriberEmail};
use crate::TEMPLATES;

use super::{EmailClient, EmailClientError};

fn preferences_link(base_url: &str, token: &str) -> String {
    format!("{}/newsletter/preferences?token={}", base_url, token)
}

#[tracing::instrument(
    name = "Send a welcome email to the new subscriber",
    skip(email_client, recipient, topics, token)
)]
pub async fn send_welcome_email(
    email_client: &EmailClient,
    recipient: &SubscriberEmail,
    topics: &[NewsletterTopic],
    base_url: &str,
    token: &str,
) -> Result<(), EmailClientError> {
    let link = preferences_link(base_url, token);
    let topic_names: Vec<&str> =
        topics.iter().map(NewsletterTopic::as_str).collect();
    let mut tera_context = tera::Context::new();
    tera_context.insert("link", &link);
    tera_context.insert("topics", &topic_names);
    let html_body =
        TEMPLATES.render("emails/welcome.html", &tera_context)?;
    let plain_text_body = format!(
        "Welcome aboard!\nYou are subscribed to: {}.\nManage your subscription at {}",
        topic_names.join(", "),
        link
    );
    email_client
        .send_email(
            recipient,
            &plain_text_body,
            &html_body,
            "Welcome to the newsletter!",
        )
        .await
}

#[tracing::instrument(
    name = "Send a preference update confirmation",
    skip(email_client, recipient, newly_active_topics, token)
)]
pub async fn send_preference_update_email(
    email_client: &EmailClient,
    recipient: &SubscriberEmail,
    newly_active_topics: &[NewsletterTopic],
    base_url: &str,
    token: &str,
) -> Result<(), EmailClientError> {
    let link = preferences_link(base_url, token);
    let topic_names: Vec<&str> = newly_active_topics
        .iter()
        .map(NewsletterTopic::as_str)
        .collect();
    let mut tera_context = tera::Context::new();
    tera_context.insert("link", &link);
    tera_context.insert("topics", &topic_names);
    let html_body =
        TEMPLATES.render("emails/preference_update.html", &tera_context)?;
    let plain_text_body = format!(
        "Your preferences were updated.\nNewly activated topics: {}.\nManage your subscription at {}",
        topic_names.join(", "),
        link
    );
    email_client
        .send_email(
            recipient,
            &plain_text_body,
            &html_body,
            "Your newsletter preferences were updated",
        )
        .await
}

#[tracing::instrument(
    name = "Send a goodbye email",
    skip(email_client, recipient)
)]
pub async fn send_goodbye_email(
    email_client: &EmailClient,
    recipient: &SubscriberEmail,
    base_url: &str,
) -> Result<(), EmailClientError> {
    let mut tera_context = tera::Context::new();
    tera_context.insert("link", &base_url);
    let html_body =
        TEMPLATES.render("emails/goodbye.html", &tera_context)?;
    let plain_text_body = format!(
        "You have been unsubscribed from all topics.\nCome back any time: {}",
        base_url
    );
    email_client
        .send_email(
            recipient,
            &plain_text_body,
            &html_body,
            "Sorry to see you go",
        )
        .await
}
