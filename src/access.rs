//! Per-request access decisions.
//!
//! Each view declares an [`AccessPolicy`] and checks it against the explicit
//! [`Caller`] before running its query. Decisions are pure: nothing is kept
//! between requests.

use crate::{
    error::{AppError, AppResult},
    models::Caller,
};

/// Permission held by librarians, allowing them to see every loan
pub const CAN_MARK_RETURNED: &str = "catalog.can_mark_returned";

/// Query parameter carrying the page to come back to after logging in
pub const REDIRECT_FIELD: &str = "next";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPolicy {
    Public,
    LoginRequired,
    PermissionRequired(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Allow,
    Deny(Denial),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    /// Send the caller to the login entry point, then back to `next`
    Login { next: String },
    /// Authenticated, but missing `permission`
    Forbidden { permission: &'static str },
}

impl AccessPolicy {
    /// Decide whether `caller` may see `requested` (path and query)
    pub fn check(self, caller: &Caller, requested: &str) -> Access {
        let login = || {
            Access::Deny(Denial::Login {
                next: requested.to_string(),
            })
        };

        match self {
            AccessPolicy::Public => Access::Allow,
            AccessPolicy::LoginRequired if caller.is_authenticated() => Access::Allow,
            AccessPolicy::LoginRequired => login(),
            AccessPolicy::PermissionRequired(permission) => {
                if caller.has_permission(permission) {
                    Access::Allow
                } else if caller.is_authenticated() {
                    Access::Deny(Denial::Forbidden { permission })
                } else {
                    login()
                }
            }
        }
    }

    /// Check and turn a denial into the matching error
    pub fn enforce(self, caller: &Caller, requested: &str, login_url: &str) -> AppResult<()> {
        match self.check(caller, requested) {
            Access::Allow => Ok(()),
            Access::Deny(denial) => {
                tracing::debug!(policy = ?self, ?denial, "access denied");
                Err(denial.into_error(login_url))
            }
        }
    }
}

impl Denial {
    pub fn into_error(self, login_url: &str) -> AppError {
        match self {
            Denial::Login { next } => AppError::LoginRequired {
                location: login_redirect(login_url, &next),
            },
            Denial::Forbidden { permission } => {
                AppError::Authorization(format!("Permission {} required", permission))
            }
        }
    }
}

/// Login URL with the originally requested destination appended
pub fn login_redirect(login_url: &str, next: &str) -> String {
    let separator = if login_url.contains('?') { '&' } else { '?' };
    format!(
        "{}{}{}={}",
        login_url,
        separator,
        REDIRECT_FIELD,
        urlencoding::encode(next)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserClaims;

    fn user(permissions: &[&str]) -> Caller {
        Caller::User(UserClaims {
            sub: "reader".to_string(),
            user_id: 3,
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
            exp: i64::MAX,
            iat: 0,
        })
    }

    #[test]
    fn public_allows_everyone() {
        assert_eq!(
            AccessPolicy::Public.check(&Caller::Anonymous, "/catalog/authors"),
            Access::Allow
        );
    }

    #[test]
    fn login_required_redirects_anonymous_with_destination() {
        let access = AccessPolicy::LoginRequired.check(&Caller::Anonymous, "/catalog/books?page=2");
        assert_eq!(
            access,
            Access::Deny(Denial::Login {
                next: "/catalog/books?page=2".to_string()
            })
        );
        assert_eq!(
            AccessPolicy::LoginRequired.check(&user(&[]), "/catalog/books"),
            Access::Allow
        );
    }

    #[test]
    fn permission_required() {
        let policy = AccessPolicy::PermissionRequired(CAN_MARK_RETURNED);

        assert_eq!(policy.check(&user(&[CAN_MARK_RETURNED]), "/catalog/borrowed"), Access::Allow);
        assert_eq!(
            policy.check(&user(&["catalog.other"]), "/catalog/borrowed"),
            Access::Deny(Denial::Forbidden {
                permission: CAN_MARK_RETURNED
            })
        );
        assert!(matches!(
            policy.check(&Caller::Anonymous, "/catalog/borrowed"),
            Access::Deny(Denial::Login { .. })
        ));
    }

    #[test]
    fn redirect_preserves_encoded_destination() {
        assert_eq!(
            login_redirect("/accounts/login/", "/catalog/books?page=2"),
            "/accounts/login/?next=%2Fcatalog%2Fbooks%3Fpage%3D2"
        );
        assert_eq!(
            login_redirect("https://id.example.org/login?app=catalog", "/catalog"),
            "https://id.example.org/login?app=catalog&next=%2Fcatalog"
        );
    }

    #[test]
    fn enforce_maps_denials_to_errors() {
        let err = AccessPolicy::LoginRequired
            .enforce(&Caller::Anonymous, "/catalog", "/accounts/login/")
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::LoginRequired { ref location } if location == "/accounts/login/?next=%2Fcatalog"
        ));

        let err = AccessPolicy::PermissionRequired(CAN_MARK_RETURNED)
            .enforce(&user(&[]), "/catalog/borrowed", "/accounts/login/")
            .unwrap_err();
        assert!(matches!(err, AppError::Authorization(_)));
    }
}
