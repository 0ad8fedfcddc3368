use crate::auth::jwt::{Claims, TokenCodec};
use crate::types::AppError;
use crate::AppState;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

/// The caller of the current request, as resolved by [`authenticate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    Anonymous,
    Authenticated(Claims),
}

impl Principal {
    pub fn claims(&self) -> Option<&Claims> {
        match self {
            Principal::Anonymous => None,
            Principal::Authenticated(claims) => Some(claims),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Principal::Authenticated(_))
    }
}

/// Pulls the token out of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Resolves the principal for a set of request headers.
///
/// Never fails: a missing, malformed, or unverifiable token is simply an
/// anonymous caller.
pub fn resolve_principal(headers: &HeaderMap, codec: &TokenCodec) -> Principal {
    let Some(token) = bearer_token(headers) else {
        return Principal::Anonymous;
    };

    match codec.verify(token) {
        Ok(claims) => Principal::Authenticated(claims),
        Err(e) => {
            tracing::debug!("Ignoring bearer token: {}", e);
            Principal::Anonymous
        }
    }
}

/// Authentication gate applied to every route.
///
/// Always forwards the request, with the resolved [`Principal`] stored in
/// the request extensions. Rejection is left to the guards.
pub async fn authenticate(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let principal = resolve_principal(req.headers(), &state.tokens);
    req.extensions_mut().insert(principal);

    next.run(req).await
}

impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Principal>().cloned().ok_or_else(|| {
            AppError::Internal("Principal requested before the authentication gate ran".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::Identity;
    use axum::http::HeaderValue;

    fn codec() -> TokenCodec {
        TokenCodec::new("gate-test-secret", Some(900))
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_no_header_is_anonymous() {
        assert_eq!(
            resolve_principal(&HeaderMap::new(), &codec()),
            Principal::Anonymous
        );
    }

    #[test]
    fn test_malformed_header_is_anonymous() {
        let codec = codec();
        for value in ["Basic abc", "Bearer", "Bearer ", "token-without-scheme"] {
            assert_eq!(
                resolve_principal(&headers_with(value), &codec),
                Principal::Anonymous,
                "header {value:?} should degrade to anonymous"
            );
        }
    }

    #[test]
    fn test_bad_signature_is_anonymous() {
        let other = TokenCodec::new("some-other-secret", Some(900));
        let token = other.issue(&Identity::new("alice", true)).unwrap();

        let principal = resolve_principal(&headers_with(&format!("Bearer {token}")), &codec());

        assert_eq!(principal, Principal::Anonymous);
    }

    #[test]
    fn test_valid_token_is_authenticated() {
        let codec = codec();
        let token = codec.issue(&Identity::new("alice", false)).unwrap();

        let principal = resolve_principal(&headers_with(&format!("Bearer {token}")), &codec);

        let claims = principal.claims().expect("should be authenticated");
        assert_eq!(claims.username, "alice");
        assert!(!claims.is_admin);
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token(&headers_with("Bearer abc.def")), Some("abc.def"));
        assert_eq!(bearer_token(&headers_with("bearer abc.def")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
