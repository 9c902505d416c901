//! Object-level write policies. Each policy is a pure decision over
//! (requester, target owner, method safety); handlers pass `safe = false`
//! for mutations and never consult a policy on reads.

use carpool_lib::user::User;

use crate::{auth::Requester, error::ApiError};

/// Safe methods always pass; unsafe methods need a non-anonymous requester.
pub fn authenticated_or_read_only(requester: &Requester, safe: bool) -> bool {
    safe || !requester.is_anonymous()
}

/// Safe methods always pass; unsafe methods only for the owning user.
pub fn owner_or_read_only(requester: &Requester, owner_id: i64, safe: bool) -> bool {
    safe || requester.user().is_some_and(|user| user.user_id == owner_id)
}

/// Safe methods always pass; unsafe methods only when the target record is
/// the requester's own.
pub fn self_or_read_only(requester: &Requester, target_user_id: i64, safe: bool) -> bool {
    safe || requester.user().is_some_and(|user| user.user_id == target_user_id)
}

/// Create gate: there is no object to own yet, only
/// authenticated-or-read-only applies.
pub fn require_authenticated(requester: &Requester) -> Result<&User, ApiError> {
    requester.user().ok_or(ApiError::AuthenticationRequired)
}

/// Write gate for owned resources: anonymous writers get the
/// authentication-required denial, authenticated non-owners the
/// permission denial.
pub fn check_owner_write(requester: &Requester, owner_id: i64) -> Result<(), ApiError> {
    if !authenticated_or_read_only(requester, false) {
        return Err(ApiError::AuthenticationRequired);
    }
    if !owner_or_read_only(requester, owner_id, false) {
        return Err(ApiError::PermissionDenied);
    }
    Ok(())
}

/// Write gate for the user resource itself.
pub fn check_self_write(requester: &Requester, target_user_id: i64) -> Result<(), ApiError> {
    if !authenticated_or_read_only(requester, false) {
        return Err(ApiError::AuthenticationRequired);
    }
    if !self_or_read_only(requester, target_user_id, false) {
        return Err(ApiError::PermissionDenied);
    }
    Ok(())
}
