use serde::{Deserialize, Serialize};

/// A directory entry.
///
/// The remote source returns records with many more fields (address,
/// phone, company, ...); only these four are kept. Unknown fields are
/// ignored during deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub email: String,
}

impl User {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            username: username.into(),
            email: email.into(),
        }
    }
}

/// Form state for a user being added.
/// Id assignment happens in the store, not here.
#[derive(Debug, Clone, Default)]
pub struct UserDraft {
    pub name: String,
    pub username: String,
    pub email: String,
}

impl UserDraft {
    /// All three fields are required; whitespace-only input doesn't count.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.username.trim().is_empty()
            && !self.email.trim().is_empty()
    }

    pub fn clear(&mut self) {
        self.name.clear();
        self.username.clear();
        self.email.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_remote_user_record() {
        // Full jsonplaceholder /users shape - extra fields must be ignored
        let json = r#"{
            "id": 1,
            "name": "Leanne Graham",
            "username": "Bret",
            "email": "Sincere@april.biz",
            "address": {
                "street": "Kulas Light",
                "suite": "Apt. 556",
                "city": "Gwenborough",
                "zipcode": "92998-3874",
                "geo": {"lat": "-37.3159", "lng": "81.1496"}
            },
            "phone": "1-770-736-8031 x56442",
            "website": "hildegard.org",
            "company": {
                "name": "Romaguera-Crona",
                "catchPhrase": "Multi-layered client-server neural-net",
                "bs": "harness real-time e-markets"
            }
        }"#;

        let user: User = serde_json::from_str(json).expect("Failed to parse user record");
        assert_eq!(user.id, 1);
        assert_eq!(user.name, "Leanne Graham");
        assert_eq!(user.username, "Bret");
        assert_eq!(user.email, "Sincere@april.biz");
    }

    #[test]
    fn test_user_serde_round_trip() {
        let user = User::new(7, "Ann Lee", "ann1", "ann@example.com");
        let json = serde_json::to_string(&user).expect("serialize");
        let back: User = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, user);
    }

    #[test]
    fn test_draft_completeness() {
        let mut draft = UserDraft::default();
        assert!(!draft.is_complete());

        draft.name = "Bo".to_string();
        draft.username = "bo99".to_string();
        assert!(!draft.is_complete());

        draft.email = "   ".to_string();
        assert!(!draft.is_complete());

        draft.email = "bo@example.com".to_string();
        assert!(draft.is_complete());

        draft.clear();
        assert!(!draft.is_complete());
        assert!(draft.name.is_empty());
    }
}
