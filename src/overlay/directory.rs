//! User directory lookups for mention display names

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Resolves a username to the name shown in the overlay
pub trait UserDirectory {
    /// `None` when the user is unknown; the raw username is shown instead
    fn display_name(&self, username: &str) -> Option<String>;
}

impl<F> UserDirectory for F
where
    F: Fn(&str) -> Option<String>,
{
    fn display_name(&self, username: &str) -> Option<String> {
        self(username)
    }
}

/// Directory entry for hydration
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UserData {
    pub username: String,
    pub display_name: String,
}

/// In-memory directory, hydrated from the host's user store
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    names: HashMap<String, String>,
}

impl StaticDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, username: &str, display_name: &str) {
        self.names.insert(username.to_string(), display_name.to_string());
    }

    /// Replace the directory contents
    pub fn hydrate(&mut self, users: Vec<UserData>) {
        self.names.clear();
        for user in users {
            self.names.insert(user.username, user.display_name);
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl UserDirectory for StaticDirectory {
    fn display_name(&self, username: &str) -> Option<String> {
        self.names.get(username).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_directory_lookup() {
        let mut directory = StaticDirectory::new();
        directory.insert("bob", "Bob Builder");
        assert_eq!(directory.display_name("bob").as_deref(), Some("Bob Builder"));
        assert_eq!(directory.display_name("alice"), None);
    }

    #[test]
    fn test_hydrate_replaces_contents() {
        let mut directory = StaticDirectory::new();
        directory.insert("old", "Old Name");

        let users: Vec<UserData> = serde_json::from_str(
            r#"[{"username":"ann","display_name":"Ann"},{"username":"ben","display_name":"Ben"}]"#,
        )
        .unwrap();
        directory.hydrate(users);

        assert_eq!(directory.len(), 2);
        assert_eq!(directory.display_name("old"), None);
        assert_eq!(directory.display_name("ben").as_deref(), Some("Ben"));
    }

    #[test]
    fn test_closure_directory() {
        let directory = |name: &str| (name == "me").then(|| "Myself".to_string());
        assert_eq!(directory.display_name("me").as_deref(), Some("Myself"));
        assert_eq!(directory.display_name("you"), None);
    }
}
