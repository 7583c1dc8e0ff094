//! Access scope resolution for developer keys.
//!
//! Every data-access call first resolves the caller's developer key to a
//! scope; all visibility filtering in tp-db dispatches on this enum instead
//! of a nullable org id with a `-1` admin sentinel.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::Organization;

/// The authorization scope of one API caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AccessScope {
    /// No organization matched the developer key (or no key was supplied).
    /// Sees only approved rows.
    Anonymous,
    /// Member of a regular organization. Sees approved rows plus rows the
    /// organization owns.
    Organization(i64),
    /// Administrator organization. Sees everything.
    Admin,
}

impl AccessScope {
    /// Compute the scope from an organization lookup result.
    #[must_use]
    pub fn from_org(org: Option<&Organization>) -> Self {
        match org {
            None => Self::Anonymous,
            Some(org) if org.is_admin => Self::Admin,
            Some(org) => Self::Organization(org.id),
        }
    }

    /// Whether this scope bypasses all visibility filters.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    /// The owning organization id, when scoped to one.
    #[must_use]
    pub const fn org_id(self) -> Option<i64> {
        match self {
            Self::Organization(id) => Some(id),
            Self::Anonymous | Self::Admin => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn org(id: i64, is_admin: bool) -> Organization {
        Organization {
            id,
            developer_key: format!("key-{id}"),
            is_admin,
        }
    }

    #[test]
    fn missing_org_is_anonymous() {
        assert_eq!(AccessScope::from_org(None), AccessScope::Anonymous);
    }

    #[test]
    fn admin_org_is_admin() {
        let scope = AccessScope::from_org(Some(&org(3, true)));
        assert_eq!(scope, AccessScope::Admin);
        assert!(scope.is_admin());
        assert_eq!(scope.org_id(), None);
    }

    #[test]
    fn regular_org_is_scoped() {
        let scope = AccessScope::from_org(Some(&org(7, false)));
        assert_eq!(scope, AccessScope::Organization(7));
        assert_eq!(scope.org_id(), Some(7));
    }
}
