/// Deterministic Gravatar avatar derivation.
use sha2::{Digest, Sha256};

const AVATAR_SIZE: &str = "200";
const AVATAR_RATING: &str = "pg";
const AVATAR_DEFAULT: &str = "mm";

/// Derive the Gravatar URL for an email address.
/// Pure: the same email always maps to the same URL.
pub fn avatar_url(email: &str) -> String {
    let normalized = email.trim().to_lowercase();
    let digest = hex::encode(Sha256::digest(normalized.as_bytes()));
    format!(
        "https://www.gravatar.com/avatar/{}?s={}&r={}&d={}",
        digest, AVATAR_SIZE, AVATAR_RATING, AVATAR_DEFAULT
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_avatar_url_is_deterministic() {
        let first = avatar_url("ada@example.com");
        let second = avatar_url("ada@example.com");
        assert_eq!(first, second);
    }

    #[test]
    fn test_avatar_url_normalizes_case_and_whitespace() {
        assert_eq!(avatar_url("Ada@Example.COM  "), avatar_url("ada@example.com"));
    }

    #[test]
    fn test_avatar_url_carries_fixed_params() {
        let url = avatar_url("ada@example.com");
        assert!(url.starts_with("https://www.gravatar.com/avatar/"));
        assert!(url.ends_with("?s=200&r=pg&d=mm"));
    }

    #[test]
    fn test_distinct_emails_get_distinct_avatars() {
        assert_ne!(avatar_url("ada@example.com"), avatar_url("grace@example.com"));
    }
}
