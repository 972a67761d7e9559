/// Persisted records and their public views

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A user account as stored. Never serialized directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub hashed_password: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_chirpy_red: bool,
}

/// What clients are allowed to see of a [`User`]
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UserProfile {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email: String,
    pub is_chirpy_red: bool,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            created_at: user.created_at,
            updated_at: user.updated_at,
            email: user.email.clone(),
            is_chirpy_red: user.is_chirpy_red,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Chirp {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub body: String,
    pub user_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_omits_password() {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: "a@example.com".to_string(),
            hashed_password: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            created_at: now,
            updated_at: now,
            is_chirpy_red: false,
        };

        let profile = UserProfile::from(&user);
        let json = serde_json::to_value(&profile).unwrap();

        assert_eq!(profile.id, user.id);
        assert_eq!(json["email"], "a@example.com");
        assert_eq!(json["is_chirpy_red"], false);
        assert!(json.get("hashed_password").is_none());
        assert!(!json.to_string().contains("argon2"));
    }
}
