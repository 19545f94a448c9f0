use serde::{Deserialize, Serialize};

use crate::audit::{OperationStatus, log_operation};

/// Raised by the `require_*` checks on [`SecurityContext`] when the caller may not run an operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("access denied: {reason}")]
pub struct AccessDenied {
    pub reason: &'static str,
}

/// `SecurityContext` carries the identity of the caller of an operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityContext {
    subject_id: i32,
    username: String,
    email: String,
    authenticated: bool,
    admin: bool,
}

impl SecurityContext {
    /// Create a new `SecurityContext` builder
    #[must_use]
    pub fn builder() -> SecurityContextBuilder {
        SecurityContextBuilder::default()
    }

    /// Unauthenticated caller with no capabilities
    #[must_use]
    pub fn anonymous() -> Self {
        SecurityContextBuilder::default().build()
    }

    #[must_use]
    pub fn subject_id(&self) -> i32 {
        self.subject_id
    }

    /// Subject id to attribute an operation to; `None` for anonymous callers.
    #[must_use]
    pub fn actor_id(&self) -> Option<i32> {
        self.authenticated.then_some(self.subject_id)
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.authenticated && self.admin
    }

    /// # Errors
    /// Returns [`AccessDenied`] for anonymous callers.
    pub fn require_authenticated(&self) -> Result<(), AccessDenied> {
        if !self.authenticated {
            return Err(AccessDenied {
                reason: "not authenticated",
            });
        }
        Ok(())
    }

    /// Check the admin capability.
    ///
    /// # Errors
    /// Returns [`AccessDenied`] for anonymous callers and for authenticated non-admins.
    pub fn require_admin(&self) -> Result<(), AccessDenied> {
        self.require_authenticated()?;
        if !self.admin {
            return Err(AccessDenied {
                reason: "not an administrator",
            });
        }
        Ok(())
    }

    /// Same as [`Self::require_admin`] but records refusals in the audit trail.
    ///
    /// # Errors
    /// Returns [`AccessDenied`] when the caller is not an authenticated administrator.
    pub fn require_admin_for(&self, operation: &str) -> Result<(), AccessDenied> {
        self.require_admin().inspect_err(|denied| {
            log_operation(
                "Admin Access Attempt",
                OperationStatus::Failure,
                self.actor_id(),
                &serde_json::json!({
                    "operation": operation,
                    "username": self.username,
                    "reason": denied.reason,
                }),
            );
        })
    }
}

#[derive(Default)]
pub struct SecurityContextBuilder {
    subject_id: Option<i32>,
    username: Option<String>,
    email: Option<String>,
    admin: bool,
}

impl SecurityContextBuilder {
    /// Setting a subject marks the context as authenticated.
    #[must_use]
    pub fn subject_id(mut self, subject_id: i32) -> Self {
        self.subject_id = Some(subject_id);
        self
    }

    #[must_use]
    pub fn username(mut self, username: &str) -> Self {
        self.username = Some(username.to_owned());
        self
    }

    #[must_use]
    pub fn email(mut self, email: &str) -> Self {
        self.email = Some(email.to_owned());
        self
    }

    #[must_use]
    pub fn admin(mut self, admin: bool) -> Self {
        self.admin = admin;
        self
    }

    #[must_use]
    pub fn build(self) -> SecurityContext {
        SecurityContext {
            authenticated: self.subject_id.is_some(),
            subject_id: self.subject_id.unwrap_or_default(),
            username: self.username.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            admin: self.admin,
        }
    }
}
