use crate::domain::SubscriberEmail;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};

pub mod send;

pub struct EmailClient {
    api_token: Secret<String>,
    sender: SubscriberEmail,
    http_client: Client,
    base_url: reqwest::Url,
}

impl EmailClient {
    pub fn new(
        base_url: &str,
        sender: SubscriberEmail,
        api_token: Secret<String>,
        timeout: std::time::Duration,
    ) -> Self {
        Self {
            base_url: reqwest::Url::try_from(base_url).expect("Invalid url!"),
            sender,
            http_client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Could not build http client"),
            api_token,
        }
    }
    pub async fn send_email(
        &self,
        recipient: &SubscriberEmail,
        text_content: &str,
        html_content: &str,
        subject: &str,
    ) -> Result<(), EmailClientError> {
        let url = reqwest::Url::join(&self.base_url, "/email")
            .map_err(|_| EmailClientError::InvalidUrl)?;
        let request_body = SendEmailRequest {
            from: self.sender.as_ref().to_owned(),
            to: recipient.as_ref().to_owned(),
            subject: subject.to_owned(),
            html_body: html_content.to_owned(),
            text_body: text_content.to_owned(),
        };

        self.http_client
            .post(url)
            .header("X-Postmark-Server-Token", self.api_token.expose_secret())
            .json(&request_body)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum EmailClientError {
    #[error("Email endpoint url is invalid.")]
    InvalidUrl,
    #[error("Email request failed.")]
    Request(#[from] reqwest::Error),
    #[error("Email template failed to render.")]
    Template(#[from] tera::Error),
}

#[derive(serde::Serialize)]
struct SendEmailRequest {
    from: String,
    to: String,
    subject: String,
    html_body: String,
    text_body: String,
}
