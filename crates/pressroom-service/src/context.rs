//! Edit context carrying the acting user and the tenant perspective.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pressroom_entity::scope::Scope;

/// Context for one edit submission.
///
/// The tenant perspective is threaded through every pipeline call as an
/// explicit parameter — never process-wide state — so concurrent requests
/// for different tenants cannot contaminate each other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditContext {
    /// The acting user's ID.
    pub actor_id: Uuid,
    /// The tenant the post will belong to after this edit.
    pub scope: Scope,
    /// The tenant the post belonged to before this edit, when the edit
    /// transfers the post between tenants. Source paths are planned from
    /// this scope's directory.
    pub original_scope: Option<Scope>,
    /// When the edit was received.
    pub request_time: DateTime<Utc>,
}

impl EditContext {
    /// Creates a new edit context.
    pub fn new(actor_id: Uuid, scope: Scope, original_scope: Option<Scope>) -> Self {
        Self {
            actor_id,
            scope,
            original_scope,
            request_time: Utc::now(),
        }
    }

    /// The scope whose directory uploads are currently located in.
    pub fn origin_scope(&self) -> &Scope {
        self.original_scope.as_ref().unwrap_or(&self.scope)
    }
}
