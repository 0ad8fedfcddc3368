use crate::types::{AppError, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Who a token speaks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub username: String,
    pub is_admin: bool,
}

impl Identity {
    pub fn new(username: impl Into<String>, is_admin: bool) -> Self {
        Self {
            username: username.into(),
            is_admin,
        }
    }
}

/// Signed token payload.
///
/// Both identity fields are mandatory on decode, so a verified token
/// always yields a complete identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub username: String,
    pub is_admin: bool,
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl Claims {
    pub fn identity(&self) -> Identity {
        Identity::new(self.username.clone(), self.is_admin)
    }
}

/// Issues and verifies HS256 bearer tokens.
///
/// The signing secret is owned by the codec instance; two codecs built with
/// different secrets never accept each other's tokens.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry: Option<i64>,
}

impl TokenCodec {
    /// Creates a new TokenCodec.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens
    /// * `expiry` - Token validity in seconds, `None` for tokens that never expire
    pub fn new(secret: &str, expiry: Option<i64>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expiry,
        }
    }

    pub fn expiry(&self) -> Option<i64> {
        self.expiry
    }

    /// Signs a token for the given identity.
    pub fn issue(&self, identity: &Identity) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            username: identity.username.clone(),
            is_admin: identity.is_admin,
            iat: now.timestamp(),
            exp: self
                .expiry
                .map(|secs| (now + Duration::seconds(secs)).timestamp()),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Verifies a token's signature (and expiry, when configured) and
    /// returns its claims.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        if self.expiry.is_none() {
            validation.required_spec_claims.clear();
        }

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::Auth(format!("Invalid token: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-that-is-at-least-32-chars";

    fn create_test_codec() -> TokenCodec {
        TokenCodec::new(SECRET, Some(900))
    }

    /// Swaps one character inside the signature segment.
    fn tamper_signature(token: &str) -> String {
        let (head, signature) = token.rsplit_once('.').expect("token has three segments");
        let mut chars: Vec<char> = signature.chars().collect();
        chars[0] = if chars[0] == 'A' { 'B' } else { 'A' };
        format!("{}.{}", head, chars.into_iter().collect::<String>())
    }

    #[test]
    fn test_round_trip() {
        let codec = create_test_codec();
        let identity = Identity::new("alice", false);

        let token = codec.issue(&identity).expect("should issue");
        let claims = codec.verify(&token).expect("should verify");

        assert_eq!(claims.identity(), identity);
    }

    #[test]
    fn test_round_trip_admin() {
        let codec = create_test_codec();
        let identity = Identity::new("root", true);

        let token = codec.issue(&identity).expect("should issue");
        let claims = codec.verify(&token).expect("should verify");

        assert!(claims.is_admin);
        assert_eq!(claims.username, "root");
    }

    #[test]
    fn test_tampered_signature_is_rejected() {
        let codec = create_test_codec();
        let token = codec
            .issue(&Identity::new("alice", false))
            .expect("should issue");

        let result = codec.verify(&tamper_signature(&token));

        assert!(matches!(result, Err(AppError::Auth(_))));
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let codec = create_test_codec();
        let token = codec
            .issue(&Identity::new("alice", false))
            .expect("should issue");
        let forged = codec
            .issue(&Identity::new("alice", true))
            .expect("should issue");

        // Admin payload spliced onto the non-admin signature.
        let mut parts: Vec<&str> = token.split('.').collect();
        let forged_parts: Vec<&str> = forged.split('.').collect();
        parts[1] = forged_parts[1];

        assert!(codec.verify(&parts.join(".")).is_err());
    }

    #[test]
    fn test_garbage_is_rejected() {
        let codec = create_test_codec();

        assert!(codec.verify("invalid.token.here").is_err());
        assert!(codec.verify("").is_err());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let codec1 = TokenCodec::new("secret-one-that-is-32-chars-long", Some(900));
        let codec2 = TokenCodec::new("secret-two-that-is-32-chars-long", Some(900));

        let token = codec1
            .issue(&Identity::new("alice", false))
            .expect("should issue");

        assert!(codec2.verify(&token).is_err());
    }

    #[test]
    fn test_claims_expiration() {
        let codec = create_test_codec();
        let token = codec
            .issue(&Identity::new("alice", false))
            .expect("should issue");
        let claims = codec.verify(&token).expect("should verify");

        let now = Utc::now().timestamp();
        assert!(claims.iat <= now && claims.iat >= now - 5);

        let exp = claims.exp.expect("exp should be set");
        assert!(exp >= claims.iat + 895 && exp <= claims.iat + 905);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let codec = TokenCodec::new(SECRET, Some(-3600));
        let token = codec
            .issue(&Identity::new("alice", false))
            .expect("should issue");

        assert!(codec.verify(&token).is_err());
    }

    #[test]
    fn test_unbounded_tokens_carry_no_expiry() {
        let codec = TokenCodec::new(SECRET, None);
        let token = codec
            .issue(&Identity::new("alice", false))
            .expect("should issue");
        let claims = codec.verify(&token).expect("should verify");

        assert_eq!(claims.exp, None);
    }

    #[test]
    fn test_expiring_codec_requires_exp() {
        let unbounded = TokenCodec::new(SECRET, None);
        let expiring = TokenCodec::new(SECRET, Some(900));

        let token = unbounded
            .issue(&Identity::new("alice", false))
            .expect("should issue");

        assert!(expiring.verify(&token).is_err());
    }
}
