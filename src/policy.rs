//! Access policy: role predicates and row scoping.
//!
//! Every operation consults these before touching the ledger. Admins manage the
//! catalog and see every row; members borrow, return and pay, and only ever see
//! rows tied to their own borrow records.

use crate::{
    error::{AppError, AppResult},
    models::user::Role,
};

/// Which rows a caller may read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Every row
    All,
    /// Only rows belonging to this user
    Own(i32),
}

impl Scope {
    /// Scope for a caller with the given identity and role
    pub fn for_caller(user_id: i32, role: Role) -> Self {
        match role {
            Role::Admin => Scope::All,
            Role::Member => Scope::Own(user_id),
        }
    }

    /// User filter to apply to a query, `None` meaning unrestricted
    pub fn user_filter(&self) -> Option<i32> {
        match self {
            Scope::All => None,
            Scope::Own(id) => Some(*id),
        }
    }

    /// Whether a row owned by `owner_id` is visible in this scope
    pub fn permits(&self, owner_id: i32) -> bool {
        match self {
            Scope::All => true,
            Scope::Own(id) => *id == owner_id,
        }
    }
}

pub fn can_administer(role: Role) -> bool {
    match role {
        Role::Admin => true,
        Role::Member => false,
    }
}

/// Borrowing, returning and paying are member-only; admins never borrow.
pub fn can_transact_as_member(role: Role) -> bool {
    match role {
        Role::Member => true,
        Role::Admin => false,
    }
}

pub fn require_admin(role: Role) -> AppResult<()> {
    if can_administer(role) {
        Ok(())
    } else {
        Err(AppError::Authorization("Administrator privileges required".to_string()))
    }
}

pub fn require_member(role: Role) -> AppResult<()> {
    if can_transact_as_member(role) {
        Ok(())
    } else {
        Err(AppError::Authorization("Only members can perform this action".to_string()))
    }
}

/// Caller must be the target user or an admin
pub fn require_self_or_admin(caller_id: i32, role: Role, target_id: i32) -> AppResult<()> {
    if caller_id == target_id || can_administer(role) {
        Ok(())
    } else {
        Err(AppError::Authorization("Cannot access another user's account".to_string()))
    }
}
