//! Caller identity derived from decoded claims.

use serde::{Deserialize, Serialize};

use cr_domain::error::{Error, Result};
use cr_domain::trace::TraceEvent;

use crate::claims::Claims;

/// The authenticated caller for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    /// Taken from `sub`.
    pub id: String,
    pub email: String,
    pub username: String,
}

/// Derive the caller identity from `claims`.
///
/// Requires a non-empty `email` and at least one non-empty username claim,
/// otherwise [`Error::MissingUserInfo`]. The username is resolved from
/// `name`, then `preferred_username`, then `cognito:username`. A missing
/// `sub` yields an empty id.
pub fn extract_identity(claims: &Claims) -> Result<UserIdentity> {
    let email = present(&claims.email);
    let username = present(&claims.name)
        .or_else(|| present(&claims.preferred_username))
        .or_else(|| present(&claims.cognito_username));

    let (Some(email), Some(username)) = (email, username) else {
        return Err(Error::MissingUserInfo);
    };

    let id = present(&claims.sub).unwrap_or_default();
    if id.is_empty() {
        tracing::warn!(email = %email, "id_token has no sub claim; using empty user id");
    }

    TraceEvent::IdentityResolved {
        user_id: id.to_owned(),
        username: username.to_owned(),
    }
    .emit();

    Ok(UserIdentity {
        id: id.to_owned(),
        email: email.to_owned(),
        username: username.to_owned(),
    })
}

/// Treat empty strings the same as absent claims.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims() -> Claims {
        Claims {
            sub: Some("test-user-id".into()),
            email: Some("test@example.com".into()),
            name: Some("Test User".into()),
            ..Claims::default()
        }
    }

    #[test]
    fn maps_sub_email_and_name() {
        let user = extract_identity(&claims()).unwrap();
        assert_eq!(user.id, "test-user-id");
        assert_eq!(user.email, "test@example.com");
        assert_eq!(user.username, "Test User");
    }

    #[test]
    fn name_wins_over_other_username_claims() {
        let c = Claims {
            preferred_username: Some("pref".into()),
            cognito_username: Some("cog".into()),
            ..claims()
        };
        assert_eq!(extract_identity(&c).unwrap().username, "Test User");
    }

    #[test]
    fn preferred_username_wins_over_cognito() {
        let c = Claims {
            name: None,
            preferred_username: Some("pref".into()),
            cognito_username: Some("cog".into()),
            ..claims()
        };
        assert_eq!(extract_identity(&c).unwrap().username, "pref");
    }

    #[test]
    fn falls_back_to_cognito_username() {
        let c = Claims {
            name: None,
            cognito_username: Some("cog".into()),
            ..claims()
        };
        assert_eq!(extract_identity(&c).unwrap().username, "cog");
    }

    #[test]
    fn empty_name_falls_through() {
        let c = Claims {
            name: Some(String::new()),
            preferred_username: Some("pref".into()),
            ..claims()
        };
        assert_eq!(extract_identity(&c).unwrap().username, "pref");
    }

    #[test]
    fn empty_claims_are_missing_user_info() {
        assert!(matches!(
            extract_identity(&Claims::default()),
            Err(Error::MissingUserInfo)
        ));
    }

    #[test]
    fn missing_email_is_missing_user_info() {
        let c = Claims {
            email: None,
            ..claims()
        };
        assert!(matches!(extract_identity(&c), Err(Error::MissingUserInfo)));
    }

    #[test]
    fn missing_every_username_is_missing_user_info() {
        let c = Claims {
            name: None,
            ..claims()
        };
        assert!(matches!(extract_identity(&c), Err(Error::MissingUserInfo)));
    }

    #[test]
    fn missing_sub_gives_empty_id() {
        let c = Claims {
            sub: None,
            ..claims()
        };
        assert_eq!(extract_identity(&c).unwrap().id, "");
    }
}
