use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::State;
use axum::http::{self, header, HeaderMap, HeaderName, Method, Request};
use axum::middleware::Next;
use axum::response::Response;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use thiserror::Error;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tracing::warn;

use crate::error::AppError;
use crate::AppState;

/// Authenticated principal resolved from the bearer credential.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: String,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("cabeçalho Authorization ausente")]
    MissingAuthorization,
    #[error("credencial inválida: {0}")]
    InvalidToken(String),
}

/// Maps a bearer credential to an authenticated principal. Kept behind a
/// trait so tests can substitute the identity collaborator.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve(&self, token: &str) -> Result<AuthContext, AuthError>;
}

/// HS256 JWT resolver used in production deployments.
pub struct JwtIdentityResolver {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityResolver {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

#[async_trait]
impl IdentityResolver for JwtIdentityResolver {
    async fn resolve(&self, token: &str) -> Result<AuthContext, AuthError> {
        let data = decode::<AuthClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|err| AuthError::InvalidToken(err.to_string()))?;

        Ok(AuthContext {
            user_id: data.claims.sub,
        })
    }
}

#[derive(Debug, Deserialize)]
struct AuthClaims {
    sub: String,
    #[allow(dead_code)]
    exp: Option<i64>,
}

/// CORS policy shared by every route: any origin, the headers the web
/// client sends, and the verbs the resource surface accepts. The layer
/// also answers the OPTIONS preflight before authentication runs.
pub fn cors_layer() -> CorsLayer {
    let methods = vec![
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];

    let headers = vec![
        header::AUTHORIZATION,
        HeaderName::from_static("x-client-info"),
        HeaderName::from_static("apikey"),
        header::CONTENT_TYPE,
    ];

    CorsLayer::new()
        .allow_methods(AllowMethods::list(methods))
        .allow_origin(AllowOrigin::any())
        .allow_headers(AllowHeaders::list(headers))
}

/// Middleware enforcing the authentication gate: every guarded request
/// must carry a resolvable bearer credential before any store access.
pub async fn enforce_auth(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path().to_string();

    let token = extract_bearer(request.headers()).ok_or_else(|| {
        audit_failure(&AuthError::MissingAuthorization, &path);
        AppError::unauthorized()
    })?;

    let context = match state.resolver.resolve(&token).await {
        Ok(context) => context,
        Err(err) => {
            audit_failure(&err, &path);
            return Err(AppError::unauthorized());
        }
    };

    request.extensions_mut().insert(context);

    Ok(next.run(request).await)
}

fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|value| value.trim().to_string())
}

fn audit_failure(reason: &AuthError, path: &str) {
    warn!(?reason, path, "falha de autenticação detectada");
}

/// Convenience wrapper for wiring a resolver into the application state.
pub type SharedResolver = Arc<dyn IdentityResolver>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_extraction_trims_and_requires_prefix() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer  token-123 ".parse().unwrap());
        assert_eq!(extract_bearer(&headers).as_deref(), Some("token-123"));

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Basic abc".parse().unwrap());
        assert_eq!(extract_bearer(&headers), None);
    }

    #[tokio::test]
    async fn jwt_resolver_rejects_garbage() {
        let resolver = JwtIdentityResolver::new("segredo");
        let err = resolver.resolve("not-a-jwt").await.expect_err("must fail");
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }
}
