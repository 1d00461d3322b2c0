//! Bearer-token authentication and ownership checks.
//!
//! Tokens are opaque credentials configured at startup as `token=principal`
//! pairs. When no tokens are configured, authentication is off and mutating
//! routes run anonymously.

use crate::{errors::AppError, models::upload::UploadRecord, state::AppState};
use anyhow::bail;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;

/// Principal attached to the request after bearer authentication.
#[derive(Clone, Debug, PartialEq)]
pub struct CurrentUser(pub String);

/// Static token-to-principal table.
#[derive(Clone, Debug, Default)]
pub struct AuthTokens {
    tokens: HashMap<String, String>,
}

impl AuthTokens {
    /// Parse `token=principal[,token=principal...]`.
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let mut tokens = HashMap::new();
        for pair in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let Some((token, principal)) = pair.split_once('=') else {
                bail!("auth token entry `{pair}` is not of the form token=principal");
            };
            let (token, principal) = (token.trim(), principal.trim());
            if token.is_empty() || principal.is_empty() {
                bail!("auth token entry `{pair}` has an empty token or principal");
            }
            tokens.insert(token.to_string(), principal.to_string());
        }
        if tokens.is_empty() {
            bail!("auth token list is empty");
        }
        Ok(Self { tokens })
    }

    pub fn principal_for(&self, token: &str) -> Option<&str> {
        self.tokens.get(token).map(String::as_str)
    }
}

/// Middleware for mutating routes.
///
/// With auth configured, requires a valid `Authorization: Bearer` header and
/// attaches the matching principal as a `CurrentUser` extension. With auth
/// off, passes the request through untouched.
pub async fn require_bearer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(tokens) = state.auth.as_ref() else {
        return Ok(next.run(request).await);
    };

    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::unauthorized("missing authorization header"))?;

    let token = header_value
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::unauthorized("invalid authorization header format"))?;

    let principal = tokens
        .principal_for(token)
        .ok_or_else(|| AppError::unauthorized("invalid bearer token"))?;

    request
        .extensions_mut()
        .insert(CurrentUser(principal.to_string()));

    Ok(next.run(request).await)
}

/// Only the owner may mutate an owned record. Records created without auth
/// have no owner and stay mutable by any authenticated caller.
pub fn require_ownership(user: Option<&CurrentUser>, record: &UploadRecord) -> Result<(), AppError> {
    if let (Some(CurrentUser(principal)), Some(owner)) = (user, record.owner.as_ref()) {
        if principal != owner {
            return Err(AppError::forbidden("you do not own this upload"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn record(owner: Option<&str>) -> UploadRecord {
        UploadRecord {
            id: Uuid::new_v4(),
            url: "https://bucket.example/cat.png".into(),
            owner: owner.map(str::to_string),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn parses_token_pairs() {
        let tokens = AuthTokens::parse("secret=alice, hunter2=bob").unwrap();
        assert_eq!(tokens.principal_for("secret"), Some("alice"));
        assert_eq!(tokens.principal_for("hunter2"), Some("bob"));
        assert_eq!(tokens.principal_for("nope"), None);
    }

    #[test]
    fn rejects_malformed_token_lists() {
        assert!(AuthTokens::parse("").is_err());
        assert!(AuthTokens::parse("justatoken").is_err());
        assert!(AuthTokens::parse("=alice").is_err());
        assert!(AuthTokens::parse("secret=").is_err());
    }

    #[test]
    fn ownership_allows_owner_and_unowned_records() {
        let alice = CurrentUser("alice".into());
        assert!(require_ownership(Some(&alice), &record(Some("alice"))).is_ok());
        assert!(require_ownership(Some(&alice), &record(None)).is_ok());
        assert!(require_ownership(None, &record(Some("alice"))).is_ok());
    }

    #[test]
    fn ownership_rejects_other_principals() {
        let bob = CurrentUser("bob".into());
        let err = require_ownership(Some(&bob), &record(Some("alice"))).unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::FORBIDDEN);
    }
}
