use crate::routes::SubscribeBody;

use super::{NewsletterTopic, SourceLabel, SubscriberEmail};

/// Validated subscribe request: the topic list is non-empty and
/// duplicate-free, in first-seen order.
#[derive(Debug)]
pub struct NewSubscription {
    pub email: SubscriberEmail,
    pub topics: Vec<NewsletterTopic>,
    pub source: Option<SourceLabel>,
}

#[derive(Debug, serde::Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(thiserror::Error, Debug)]
#[error("{}", self.summary())]
pub struct InvalidSubscription(pub Vec<FieldError>);

impl InvalidSubscription {
    fn summary(&self) -> String {
        self.0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl TryFrom<SubscribeBody> for NewSubscription {
    type Error = InvalidSubscription;

    fn try_from(body: SubscribeBody) -> Result<Self, Self::Error> {
        let mut errors = Vec::new();

        let email = match SubscriberEmail::try_from(body.email) {
            Ok(email) => Some(email),
            Err(message) => {
                errors.push(FieldError {
                    field: "email",
                    message,
                });
                None
            }
        };

        let mut topics: Vec<NewsletterTopic> = Vec::new();
        for topic in body.newsletter_types {
            if !topics.contains(&topic) {
                topics.push(topic);
            }
        }
        if topics.is_empty() {
            errors.push(FieldError {
                field: "newsletterTypes",
                message: "At least one newsletter type is required."
                    .to_string(),
            });
        }

        let source = match body.source {
            None => None,
            Some(raw) => match SourceLabel::try_from(raw) {
                Ok(label) => Some(label),
                Err(e) => {
                    errors.push(FieldError {
                        field: "source",
                        message: e.to_string(),
                    });
                    None
                }
            },
        };

        if !errors.is_empty() {
            return Err(InvalidSubscription(errors));
        }
        Ok(NewSubscription {
            email: email.expect("email is present when no errors collected"),
            topics,
            source,
        })
    }
}
