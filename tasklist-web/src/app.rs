/// Application state and router builder
///
/// This module defines the shared application state, the session auth gate
/// and the function that assembles the Axum router.
///
/// # Example
///
/// ```no_run
/// use tasklist_web::{app::{build_router, AppState}, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let app = build_router(AppState::new(pool, config));
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    error::AppError,
    middleware::security::SecurityHeadersLayer,
    routes::{self, with_cookie},
};
use axum::{
    extract::{Request, State},
    middleware::{from_fn_with_state, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tasklist_shared::auth::{middleware::authenticate, session::clear_session_cookie};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request via Axum's `State` extractor; holds no mutable data.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Key used to sign and verify session tokens
    pub fn session_secret(&self) -> &str {
        &self.config.session.secret
    }

    /// How long a new session lasts
    pub fn session_ttl(&self) -> chrono::Duration {
        self.config.session.ttl()
    }

    /// Whether cookies carry the `Secure` attribute
    pub fn secure_cookies(&self) -> bool {
        self.config.api.production
    }
}

/// Builds the complete router
///
/// ```text
/// /health                     GET       public
/// /login/                     GET POST  public, redirects away when logged in
/// /register/                  GET POST  public, redirects away when logged in
/// /logout/                    POST      session
/// /                           GET       session   (?q= search)
/// /task/:id/                  GET       session + owner
/// /task/create/               GET POST  session
/// /task/update/:id/           GET POST  session + owner
/// /task/delete/:id/           GET POST  session + owner
/// ```
///
/// Anything else renders the 404 page.
pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route(
            "/login/",
            get(routes::auth::login_page).post(routes::auth::login),
        )
        .route(
            "/register/",
            get(routes::auth::register_page).post(routes::auth::register),
        );

    let protected_routes = Router::new()
        .route("/logout/", post(routes::auth::logout))
        .route("/", get(routes::tasks::list_tasks))
        .route("/task/:id/", get(routes::tasks::task_detail))
        .route(
            "/task/create/",
            get(routes::tasks::create_task_page).post(routes::tasks::create_task),
        )
        .route(
            "/task/update/:id/",
            get(routes::tasks::update_task_page).post(routes::tasks::update_task),
        )
        .route(
            "/task/delete/:id/",
            get(routes::tasks::delete_task_page).post(routes::tasks::delete_task),
        )
        .route_layer(from_fn_with_state(state.clone(), session_auth_layer));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .fallback(routes::not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// Session auth gate
///
/// Resolves the session cookie into an `AuthContext` and inserts it into
/// request extensions. Requests without a valid session are redirected to the
/// login page before the handler runs; a stale cookie is cleared on the way.
async fn session_auth_layer(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    match authenticate(&state.db, req.headers(), state.session_secret()).await {
        Ok(auth) => {
            req.extensions_mut().insert(auth);
            next.run(req).await
        }
        Err(err) => {
            let stale_cookie = err.has_stale_cookie();
            tracing::debug!(error = %err, path = %req.uri().path(), "Rejected unauthenticated request");

            let response = AppError::from(err).into_response();
            if stale_cookie {
                with_cookie(response, &clear_session_cookie(state.secure_cookies()))
            } else {
                response
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiConfig, DatabaseConfig, LogConfig, SessionConfig};
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    /// Router over a pool that never connects; only paths that don't touch
    /// the database can be exercised.
    fn test_app() -> Router {
        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                production: false,
            },
            database: DatabaseConfig {
                url: "postgres://localhost/tasklist_unused".to_string(),
                max_connections: 1,
            },
            session: SessionConfig {
                secret: SECRET.to_string(),
                ttl_hours: 1,
            },
            log: LogConfig { json: false },
        };
        let pool = PgPoolOptions::new()
            .connect_lazy(&config.database.url)
            .expect("URL should parse");

        build_router(AppState::new(pool, config))
    }

    async fn send(request: Request<Body>) -> Response {
        test_app().oneshot(request).await.unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn form_request(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_protected_routes_redirect_to_login() {
        for uri in ["/", "/?q=milk", "/task/1/", "/task/create/", "/task/update/1/", "/task/delete/1/"] {
            let response = send(get_request(uri)).await;

            assert_eq!(response.status(), StatusCode::SEE_OTHER, "{}", uri);
            assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login/");
            assert!(response.headers().get(header::SET_COOKIE).is_none());
        }
    }

    #[tokio::test]
    async fn test_protected_post_redirects_without_mutation() {
        let response = send(form_request("/task/create/", "title=Buy+milk")).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login/");

        let response = send(form_request("/logout/", "")).await;
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login/");
    }

    #[tokio::test]
    async fn test_garbage_cookie_is_cleared() {
        let request = Request::builder()
            .uri("/")
            .header(header::COOKIE, "tasklist_session=not-a-token")
            .body(Body::empty())
            .unwrap();

        let response = send(request).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let cookie = response.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
        assert!(cookie.starts_with("tasklist_session=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn test_login_page_renders() {
        let response = send(get_request("/login/")).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get("Content-Security-Policy").is_some());
        let body = body_text(response).await;
        assert!(body.contains(r#"action="/login/""#));
    }

    #[tokio::test]
    async fn test_register_page_renders() {
        let response = send(get_request("/register/")).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains(r#"name="password_confirm""#));
    }

    #[tokio::test]
    async fn test_login_with_blank_fields_redisplays_form() {
        let response = send(form_request("/login/", "username=+&password=")).await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        assert!(body_text(response).await.contains("This field is required."));
    }

    #[tokio::test]
    async fn test_register_with_invalid_fields_redisplays_form() {
        let response = send(form_request(
            "/register/",
            "username=bad+name%21&password=correct+horse+battery&password_confirm=other",
        ))
        .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(response.headers().get(header::SET_COOKIE).is_none());

        let body = body_text(response).await;
        assert!(body.contains("Enter a valid username."));
        assert!(body.contains("didn&#x27;t match"));
        assert!(body.contains(r#"value="bad name!""#));
    }

    #[tokio::test]
    async fn test_unknown_route_renders_not_found() {
        let response = send(get_request("/no/such/page")).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("does not exist"));
    }
}
