pub mod comments;
pub mod health;
pub mod posts;
pub mod users;

// common functions for the handlers
use regex::Regex;

pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").map_or(false, |re| re.is_match(email))
}

pub fn valid_password(password: &str) -> bool {
    // minimum 8 characters, no other policy
    password.len() >= 8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email() {
        assert!(valid_email("a@example.com"));
        assert!(valid_email("a.b+c@sub.example.com"));
        assert!(!valid_email("a@example"));
        assert!(!valid_email("not-an-email"));
        assert!(!valid_email("a b@example.com"));
        assert!(!valid_email(""));
    }

    #[test]
    fn test_valid_password() {
        assert!(valid_password("password123"));
        assert!(!valid_password("short"));
        assert!(!valid_password(""));
    }
}
