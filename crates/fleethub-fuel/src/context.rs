//! Request context carrying the authenticated caller.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use fleethub_entity::user::UserRole;

/// Context for the current authenticated request.
///
/// Extracted at the API boundary and passed into service methods so that
/// every operation knows *who* is acting and in *which* organisation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The caller's organisation.
    pub organisation_id: Uuid,
    /// The authenticated user's ID.
    pub user_id: Uuid,
    /// The user's role.
    pub role: UserRole,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(organisation_id: Uuid, user_id: Uuid, role: UserRole) -> Self {
        Self {
            organisation_id,
            user_id,
            role,
        }
    }

    /// Returns whether the caller carries admin-scoped privileges.
    pub fn is_admin_scoped(&self) -> bool {
        self.role.is_admin_scoped()
    }
}
