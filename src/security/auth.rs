//! Credential gate (HTTP Basic) in front of the blob handler.
//!
//! # Design Decisions
//! - Reads (GET/HEAD) may skip authentication when public read is enabled
//! - No credentials, or unparseable ones: 401 with a Basic challenge
//! - Credentials that do not match a configured user: 403
//! - The gate never touches the filesystem

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::http::request::RequestIdExt;

const CHALLENGE: &str = "Basic realm=\"dav-blobstore\"";

/// Outcome of checking a request against the configured users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthDecision {
    Allow,
    Unauthenticated,
    Forbidden,
}

/// Configured identities and the public-read toggle.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    users: HashMap<String, String>,
    public_read: bool,
}

impl Credentials {
    pub fn new(users: HashMap<String, String>, public_read: bool) -> Self {
        Self { users, public_read }
    }

    /// Decide whether a request with `method` and `headers` may proceed.
    pub fn check(&self, method: &Method, headers: &HeaderMap) -> AuthDecision {
        if self.public_read && (method == Method::GET || method == Method::HEAD) {
            return AuthDecision::Allow;
        }

        let Some((user, password)) = basic_credentials(headers) else {
            return AuthDecision::Unauthenticated;
        };

        match self.users.get(&user) {
            Some(expected) if *expected == password => AuthDecision::Allow,
            _ => AuthDecision::Forbidden,
        }
    }
}

/// Extract `(user, password)` from an `Authorization: Basic ...` header.
pub fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, password) = decoded.split_once(':')?;
    Some((user.to_string(), password.to_string()))
}

/// Middleware enforcing [`Credentials`] before the wrapped handler runs.
pub async fn credential_gate(
    State(credentials): State<Arc<Credentials>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    match credentials.check(request.method(), request.headers()) {
        AuthDecision::Allow => next.run(request).await,
        AuthDecision::Unauthenticated => {
            tracing::debug!(
                request_id = %request.request_id(),
                method = %request.method(),
                "Missing credentials"
            );
            (
                StatusCode::UNAUTHORIZED,
                [(header::WWW_AUTHENTICATE, HeaderValue::from_static(CHALLENGE))],
            )
                .into_response()
        }
        AuthDecision::Forbidden => {
            tracing::warn!(
                request_id = %request.request_id(),
                method = %request.method(),
                "Credentials rejected"
            );
            StatusCode::FORBIDDEN.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{middleware, routing::any, Router};
    use tower::ServiceExt;

    const ALL_METHODS: [&str; 7] = ["GET", "HEAD", "PUT", "POST", "DELETE", "MKCOL", "UNKNOWN"];

    fn app(credentials: Credentials) -> Router {
        Router::new()
            .route("/", any(|| async { StatusCode::OK }))
            .layer(middleware::from_fn_with_state(Arc::new(credentials), credential_gate))
    }

    fn users() -> HashMap<String, String> {
        HashMap::from([("user".to_string(), "password".to_string())])
    }

    fn basic(user: &str, password: &str) -> String {
        format!("Basic {}", STANDARD.encode(format!("{user}:{password}")))
    }

    async fn status(app: &Router, method: &str, auth: Option<&str>) -> StatusCode {
        let mut builder = Request::builder().method(method).uri("/");
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        let request = builder.body(Body::empty()).unwrap();
        app.clone().oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_unauthenticated_requests_are_challenged() {
        let app = app(Credentials::new(users(), false));

        for method in ALL_METHODS {
            assert_eq!(status(&app, method, None).await, StatusCode::UNAUTHORIZED, "{method}");
        }

        let request = Request::put("/").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.headers()[header::WWW_AUTHENTICATE], CHALLENGE);
    }

    #[tokio::test]
    async fn test_public_read_allows_only_reads() {
        let app = app(Credentials::new(HashMap::new(), true));

        assert_eq!(status(&app, "GET", None).await, StatusCode::OK);
        assert_eq!(status(&app, "HEAD", None).await, StatusCode::OK);
        for method in ["PUT", "POST", "DELETE", "MKCOL", "UNKNOWN"] {
            assert_eq!(status(&app, method, None).await, StatusCode::UNAUTHORIZED, "{method}");
        }
    }

    #[tokio::test]
    async fn test_wrong_password_is_forbidden() {
        let app = app(Credentials::new(users(), false));
        let auth = basic("user", "bad-password");

        for method in ALL_METHODS {
            assert_eq!(status(&app, method, Some(&auth)).await, StatusCode::FORBIDDEN, "{method}");
        }
    }

    #[tokio::test]
    async fn test_unknown_user_is_forbidden_even_with_empty_password() {
        let app = app(Credentials::new(users(), false));
        let auth = basic("stranger", "");

        assert_eq!(status(&app, "PUT", Some(&auth)).await, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_no_configured_users_forbids_everyone() {
        let app = app(Credentials::default());
        let auth = basic("user", "password");

        assert_eq!(status(&app, "GET", Some(&auth)).await, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_matching_credentials_are_accepted() {
        let app = app(Credentials::new(users(), false));
        let auth = basic("user", "password");

        for method in ALL_METHODS {
            assert_eq!(status(&app, method, Some(&auth)).await, StatusCode::OK, "{method}");
        }
    }

    #[test]
    fn test_basic_credentials_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(basic_credentials(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer token"));
        assert_eq!(basic_credentials(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic !!notbase64"));
        assert_eq!(basic_credentials(&headers), None);

        // "user:pa:ss" - only the first colon separates
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("basic dXNlcjpwYTpzcw=="));
        assert_eq!(
            basic_credentials(&headers),
            Some(("user".to_string(), "pa:ss".to_string()))
        );
    }
}
