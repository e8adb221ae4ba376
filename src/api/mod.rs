//! HTTP server wiring: pool and store construction, router, tracing layers,
//! and the serve loop.

use crate::{
    auth::{guard, password::PasswordHasher, AuthService},
    cli::globals::GlobalArgs,
    email::{smtp::SmtpMailer, LogMailer, Mailer},
    store::{ephemeral::RedisStore, users::PgUserStore},
};
use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderName, HeaderValue, Request},
    middleware,
    routing::{delete, get, post},
    Extension, Router,
};
use sqlx::postgres::PgPoolOptions;
use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;

pub mod handlers;
mod openapi;

pub use openapi::ApiDoc;

/// Build the application router around an already-wired auth service and
/// pool. Split out from [`new`] so tests can drive it without sockets.
#[must_use]
pub fn app(auth: Arc<AuthService>, pool: sqlx::PgPool) -> Router {
    let protected = Router::new()
        .route("/posts", post(handlers::posts::create))
        .route("/posts/:post_id", delete(handlers::posts::delete))
        .route(
            "/posts/:post_id/comments",
            post(handlers::comments::create),
        )
        .route(
            "/posts/:post_id/comments/:comment_id",
            delete(handlers::comments::delete),
        )
        .route_layer(middleware::from_fn(guard::session_middleware));

    Router::new()
        .route("/users", post(handlers::users::register))
        .route("/verify", post(handlers::users::verify_email))
        .route("/login", post(handlers::users::login))
        .route("/users/:user_id/posts", get(handlers::posts::list))
        .route("/posts/:post_id/comments", get(handlers::comments::list))
        .route("/health", get(handlers::health::health))
        .route("/openapi.json", get(openapi::openapi_json))
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(Extension(auth))
                .layer(Extension(pool)),
        )
}

/// Start the server
/// # Errors
/// Return error if failed to start the server
pub async fn new(port: u16, dsn: String, redis_url: String, globals: &GlobalArgs) -> Result<()> {
    // Connect to database
    let pool = PgPoolOptions::new()
        .min_connections(1)
        .max_connections(5)
        .max_lifetime(Duration::from_secs(60 * 2))
        .test_before_acquire(true)
        .connect(&dsn)
        .await
        .context("Failed to connect to database")?;

    let redis =
        redis::Client::open(redis_url.as_str()).context("Failed to create Redis client")?;
    let codes = Arc::new(RedisStore::new(redis.clone(), "code"));
    let sessions = Arc::new(RedisStore::new(redis, "session"));

    let mailer: Arc<dyn Mailer> = match globals.smtp_config() {
        Some(config) => {
            Arc::new(SmtpMailer::new(&config).context("Failed to build SMTP mailer")?)
        }
        None => {
            info!("no SMTP host configured, logging outbound mail instead");
            Arc::new(LogMailer)
        }
    };

    let auth = Arc::new(AuthService::new(
        Arc::new(PgUserStore::new(pool.clone())),
        codes,
        sessions,
        mailer,
        PasswordHasher::default(),
    ));

    let app = app(auth, pool);

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Gracefully shutdown");
        })
        .await?;

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}
