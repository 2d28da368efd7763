//! Ownership/admin checks applied to every mutation of a post or
//! comment.

use thiserror::Error;

use crate::models::User;

/// Why a mutation was refused. `Unauthorized` means nobody is logged
/// in; `Forbidden` means somebody is, but they are neither the owner
/// nor an admin. The two map to different status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("authentication required")]
    Unauthorized,

    #[error("insufficient permissions")]
    Forbidden,
}

/// Owner or admin may proceed; anyone else gets `Forbidden`.
pub fn require_owner_or_admin(
    resource_owner_id: i64,
    acting_user: Option<&User>,
) -> Result<(), AccessError> {
    let user = acting_user.ok_or(AccessError::Unauthorized)?;

    if user.id == resource_owner_id || user.is_admin {
        Ok(())
    } else {
        Err(AccessError::Forbidden)
    }
}
