use hangman_types::PlayerId;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Missing authorization header")]
    MissingHeader,
    #[error("Invalid authorization token")]
    InvalidToken,
}

/// Resolve the calling user from an `Authorization` header. The bearer token
/// is the user's id; no further verification happens here.
pub fn caller_from_header(auth_header: Option<&str>) -> Result<PlayerId, AuthError> {
    let auth_header = auth_header.ok_or(AuthError::MissingHeader)?;
    let token = auth_header
        .strip_prefix("Bearer ")
        .unwrap_or(auth_header)
        .trim();

    Uuid::parse_str(token).map_err(|e| {
        tracing::warn!("Rejected authorization token: {}", e);
        AuthError::InvalidToken
    })
}
