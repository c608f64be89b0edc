use serde::{Deserialize, Serialize};

use crate::domain::types::ClientId;

/// Descriptive client record attached to every assignment.
///
/// Contact fields are kept as received: a malformed phone or email must not
/// hide the client from the employee's roster.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Client {
    pub client_id: ClientId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl Client {
    #[must_use]
    pub fn new(
        client_id: ClientId,
        name: String,
        email: Option<String>,
        phone: Option<String>,
        address: Option<String>,
    ) -> Self {
        Self {
            client_id,
            name: name.trim().to_string(),
            email: email
                .map(|s| s.to_lowercase().trim().to_string())
                .filter(|s| !s.is_empty()),
            phone: phone
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            address: address
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }

    /// Case-insensitive substring match against the client name.
    pub fn name_matches(&self, term: &str) -> bool {
        self.name.to_lowercase().contains(&term.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_trims_and_drops_blank_contacts() {
        let client = Client::new(
            ClientId::new("C1").unwrap(),
            " Acme Corp ".to_string(),
            Some(" Books@Acme.com ".to_string()),
            Some("  ".to_string()),
            None,
        );
        assert_eq!(client.name, "Acme Corp");
        assert_eq!(client.email.as_deref(), Some("books@acme.com"));
        assert_eq!(client.phone, None);
    }

    #[test]
    fn name_match_ignores_case() {
        let client = Client::new(
            ClientId::new("C1").unwrap(),
            "Acme Corp".to_string(),
            None,
            None,
            None,
        );
        assert!(client.name_matches("acme"));
        assert!(client.name_matches("CORP"));
        assert!(!client.name_matches("other"));
    }
}
