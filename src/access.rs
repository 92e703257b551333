use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// which side of the loan a caller is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Creditor,
    Debtor,
}

/// maps a presented credential to a role
pub trait Authenticator {
    /// `None` when the credential is not recognised
    fn authenticate(&self, credential: &str) -> Option<Role>;
}

/// in-memory credential table, matched case-insensitively
#[derive(Debug, Clone, Default)]
pub struct CredentialTable {
    entries: HashMap<String, Role>,
}

impl CredentialTable {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn with_credential(mut self, credential: &str, role: Role) -> Self {
        self.insert(credential, role);
        self
    }

    pub fn insert(&mut self, credential: &str, role: Role) {
        self.entries.insert(credential.to_lowercase(), role);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Authenticator for CredentialTable {
    fn authenticate(&self, credential: &str) -> Option<Role> {
        let role = self.entries.get(&credential.to_lowercase()).copied();
        if role.is_none() {
            tracing::debug!("credential rejected");
        }
        role
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> CredentialTable {
        CredentialTable::new()
            .with_credential("martin", Role::Creditor)
            .with_credential("Tristan", Role::Debtor)
    }

    #[test]
    fn test_known_credentials_map_to_roles() {
        let auth = table();
        assert_eq!(auth.authenticate("martin"), Some(Role::Creditor));
        assert_eq!(auth.authenticate("tristan"), Some(Role::Debtor));
        assert_eq!(auth.len(), 2);
    }

    #[test]
    fn test_matching_ignores_case() {
        let auth = table();
        assert_eq!(auth.authenticate("MARTIN"), Some(Role::Creditor));
        assert_eq!(auth.authenticate("tRiStAn"), Some(Role::Debtor));
    }

    #[test]
    fn test_unknown_or_empty_credential() {
        let auth = table();
        assert_eq!(auth.authenticate("mallory"), None);
        assert_eq!(auth.authenticate(""), None);
        assert!(CredentialTable::new().is_empty());
    }

    #[test]
    fn test_substitutable_behind_trait() {
        struct DenyAll;
        impl Authenticator for DenyAll {
            fn authenticate(&self, _credential: &str) -> Option<Role> {
                None
            }
        }

        let backends: Vec<Box<dyn Authenticator>> = vec![Box::new(table()), Box::new(DenyAll)];
        let roles: Vec<_> = backends.iter().map(|b| b.authenticate("martin")).collect();
        assert_eq!(roles, vec![Some(Role::Creditor), None]);
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Role::Creditor).unwrap(), "creditor");
    }
}
