//! Role lookup against the realtime database.

use welding_admin_firebase::{Provider, ProviderError};

/// What the role store holds for a uid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleLookup {
    Assigned(String),
    /// No record, or a record without a `role` field.
    Unassigned,
}

impl RoleLookup {
    pub fn is(&self, role: &str) -> bool {
        matches!(self, RoleLookup::Assigned(assigned) if assigned == role)
    }
}

pub struct RoleResolver<'a> {
    provider: &'a Provider,
}

impl<'a> RoleResolver<'a> {
    pub fn new(provider: &'a Provider) -> Self {
        Self { provider }
    }

    pub async fn resolve(&self, uid: &str) -> Result<RoleLookup, ProviderError> {
        let record = self
            .provider
            .call(self.provider.roles().fetch_role_record(uid))
            .await?;

        Ok(match record.and_then(|r| r.role) {
            Some(role) => RoleLookup::Assigned(role),
            None => RoleLookup::Unassigned,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_comparison_is_exact() {
        let lookup = RoleLookup::Assigned("supervisor".to_string());
        assert!(lookup.is("supervisor"));
        assert!(!lookup.is("Supervisor"));
        assert!(!RoleLookup::Unassigned.is("supervisor"));
    }
}
