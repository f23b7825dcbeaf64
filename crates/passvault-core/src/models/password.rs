use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::contains_ignore_case;

/// Maximum characters of notes shown in list rows
const NOTES_PREVIEW_LENGTH: usize = 20;

/// A stored secret as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordEntry {
    pub id: String,
    pub key: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, alias = "loginUri")]
    pub login_uri: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_id: String,
}

impl PasswordEntry {
    pub fn matches_search(&self, query: &str) -> bool {
        query.is_empty() || contains_ignore_case(&self.key, query)
    }

    /// Notes shortened for a list row.
    pub fn notes_preview(&self) -> Option<String> {
        self.notes
            .as_deref()
            .filter(|n| !n.is_empty())
            .map(|n| {
                if n.chars().count() < NOTES_PREVIEW_LENGTH {
                    n.to_string()
                } else {
                    let head: String = n.chars().take(NOTES_PREVIEW_LENGTH).collect();
                    format!("{}...", head)
                }
            })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewPasswordEntry {
    pub key: String,
    pub value: String,
    pub notes: Option<String>,
    pub login_uri: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PasswordUpdate {
    pub value: String,
    pub notes: Option<String>,
    pub login_uri: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct Credentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: &str, notes: Option<&str>) -> PasswordEntry {
        PasswordEntry {
            id: "1".to_string(),
            key: key.to_string(),
            value: "secret".to_string(),
            notes: notes.map(str::to_string),
            login_uri: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            user_id: "u".to_string(),
        }
    }

    #[test]
    fn test_matches_search_case_insensitive() {
        let e = entry("Gmail", None);
        assert!(e.matches_search(""));
        assert!(e.matches_search("gma"));
        assert!(e.matches_search("MAIL"));
        assert!(!e.matches_search("bank"));
    }

    #[test]
    fn test_notes_preview() {
        assert_eq!(entry("k", None).notes_preview(), None);
        assert_eq!(entry("k", Some("")).notes_preview(), None);
        assert_eq!(entry("k", Some("short")).notes_preview().as_deref(), Some("short"));
        assert_eq!(
            entry("k", Some("this is a much longer note")).notes_preview().as_deref(),
            Some("this is a much longe...")
        );
        assert_eq!(
            entry("k", Some("exactly twenty chars")).notes_preview().as_deref(),
            Some("exactly twenty chars...")
        );
    }

    #[test]
    fn test_parse_entry_with_camel_case_uri() {
        let json = r#"{
            "id": "7f1c", "key": "Bank", "value": "pw", "notes": null,
            "loginUri": "https://bank.example",
            "created_at": "2026-01-01T00:00:00Z",
            "updated_at": "2026-01-02T00:00:00Z",
            "user_id": "u1"
        }"#;
        let parsed: PasswordEntry = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.login_uri.as_deref(), Some("https://bank.example"));
        assert_eq!(parsed.notes, None);
    }
}
