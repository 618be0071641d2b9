use std::net::SocketAddr;
use std::sync::Arc;

use axum::{extract::Request, routing, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info_span;
use uuid::Uuid;

use crate::configuration::Settings;
use crate::content::ContentStore;
use crate::database::{create_connection_pool, DatabaseConnectionPool};
use crate::email_client::EmailClient;
use crate::rate_limit::RateLimiter;
use crate::routes;

#[derive(Clone)]
pub struct ApplicationState {
    pub database_pool: DatabaseConnectionPool,
    pub email_client: Arc<EmailClient>,
    pub rate_limiter: Arc<RateLimiter>,
    pub content: Arc<ContentStore>,
    pub base_url: String,
    pub environment_name: String,
    pub settings: Settings,
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
    pool: DatabaseConnectionPool,
}

impl Application {
    pub async fn build(
        configuration: Settings,
    ) -> Result<Application, std::io::Error> {
        let pool = create_connection_pool(&configuration.database);
        let sender = configuration
            .email_client
            .sender()
            .expect("Sender email is invalid.");
        let email_client = EmailClient::new(
            &configuration.email_client.base_url,
            sender,
            configuration.email_client.api_token.clone(),
            configuration.email_client.timeout(),
        );
        let content = ContentStore::load(&configuration.content.posts_dir)
            .map_err(std::io::Error::other)?;

        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(address).await?;
        let port = listener.local_addr()?.port();

        let state = ApplicationState {
            database_pool: pool.clone(),
            email_client: Arc::new(email_client),
            rate_limiter: Arc::new(RateLimiter::new()),
            content: Arc::new(content),
            base_url: configuration.application.base_url.clone(),
            environment_name: crate::configuration::current_environment()
                .as_str()
                .to_string(),
            settings: configuration,
        };
        Ok(Application {
            port,
            listener,
            router: build_router(state),
            pool,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn pool(&self) -> DatabaseConnectionPool {
        self.pool.clone()
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        axum::serve(
            self.listener,
            self.router
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
    }
}

pub fn build_router(state: ApplicationState) -> Router {
    Router::new()
        .route("/api/health", routing::get(routes::health_check))
        .route(
            "/api/newsletter/subscribe",
            routing::post(routes::subscribe),
        )
        .route(
            "/api/newsletter/preferences",
            routing::patch(routes::update_preferences),
        )
        .route(
            "/api/newsletter/preferences/:token",
            routing::get(routes::get_preferences),
        )
        .route(
            "/api/newsletter/unsubscribe",
            routing::delete(routes::unsubscribe),
        )
        .route("/blog", routing::get(routes::blog_index))
        .route("/blog/:slug", routing::get(routes::blog_post))
        .layer(TraceLayer::new_for_http().make_span_with(
            |request: &Request<_>| {
                let request_id = Uuid::now_v7();
                info_span!("Http Request", %request_id, request_uri = %request.uri())
            },
        ))
        .with_state(state)
}
