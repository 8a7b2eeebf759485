//! Connection authentication gate.

use std::sync::Arc;

use tracing::debug;

use courier_auth::JwtDecoder;
use courier_core::error::AppError;
use courier_core::result::AppResult;
use courier_entity::UserId;

/// Identity bound to a connection for its entire lifetime.
///
/// There is no mid-connection re-authentication: the pair below is fixed
/// at handshake time and travels with the connection until it closes.
#[derive(Debug, Clone)]
pub struct AuthenticatedClient {
    /// Verified user id.
    pub user_id: UserId,
    /// Display name at token issuance time.
    pub username: String,
}

/// Verifies handshake credentials before any directory mutation.
#[derive(Debug, Clone)]
pub struct ConnectionAuthenticator {
    decoder: Arc<JwtDecoder>,
}

impl ConnectionAuthenticator {
    /// Create an authenticator over a token decoder.
    pub fn new(decoder: Arc<JwtDecoder>) -> Self {
        Self { decoder }
    }

    /// Authenticate a handshake credential.
    ///
    /// An absent or empty token refuses with `MissingCredential`; an
    /// invalid or expired one with `InvalidCredential`. Neither path
    /// touches any directory state, so a refused connection is never
    /// partially registered.
    pub fn authenticate(&self, token: Option<&str>) -> AppResult<AuthenticatedClient> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::missing_credential("Connection handshake carried no token"))?;

        let claims = self.decoder.decode(token)?;
        debug!(user_id = claims.sub, "Connection credential verified");

        Ok(AuthenticatedClient {
            user_id: claims.sub,
            username: claims.username,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_auth::JwtEncoder;
    use courier_core::config::auth::AuthConfig;
    use courier_core::error::ErrorKind;

    fn authenticator() -> (ConnectionAuthenticator, JwtEncoder) {
        let config = AuthConfig {
            jwt_secret: "test-secret".to_string(),
            token_ttl_hours: 1,
        };
        (
            ConnectionAuthenticator::new(Arc::new(JwtDecoder::new(&config))),
            JwtEncoder::new(&config),
        )
    }

    #[test]
    fn test_missing_token_is_refused() {
        let (auth, _) = authenticator();
        let err = auth.authenticate(None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MissingCredential);
    }

    #[test]
    fn test_empty_token_is_refused() {
        let (auth, _) = authenticator();
        let err = auth.authenticate(Some("")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MissingCredential);
    }

    #[test]
    fn test_garbage_token_is_refused() {
        let (auth, _) = authenticator();
        let err = auth.authenticate(Some("garbage")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidCredential);
    }

    #[test]
    fn test_valid_token_binds_identity() {
        let (auth, encoder) = authenticator();
        let issued = encoder.issue(9, "carol").unwrap();

        let client = auth.authenticate(Some(&issued.token)).unwrap();
        assert_eq!(client.user_id, 9);
        assert_eq!(client.username, "carol");
    }
}
