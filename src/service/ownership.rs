//! Ownership Guard
//!
//! The rule that only a resource's creator may mutate or delete it.

use uuid::Uuid;

/// True iff the acting user owns the resource
///
/// Pure decision function, no side effects. Checked before every update or
/// delete on posts and comments; a violation surfaces as `Forbidden`,
/// distinct from `Unauthenticated`.
pub fn can_mutate(resource_owner: Uuid, acting_user: Uuid) -> bool {
    resource_owner == acting_user
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_can_mutate() {
        let owner = Uuid::new_v4();
        assert!(can_mutate(owner, owner));
    }

    #[test]
    fn test_non_owner_cannot_mutate() {
        assert!(!can_mutate(Uuid::new_v4(), Uuid::new_v4()));
    }
}
