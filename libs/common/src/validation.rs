//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

/// Maximum accepted length of a guest wish
pub const MAX_WISH_LENGTH: usize = 1000;

/// Maximum party size a single invitation may cover
pub const MAX_PARTY_SIZE: u32 = 20;

/// Validate a required free-text field
pub fn validate_required(label: &str, value: &str, max_len: usize) -> Result<(), String> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(format!("{} is required", label));
    }

    if trimmed.chars().count() > max_len {
        return Err(format!("{} must be at most {} characters long", label, max_len));
    }

    Ok(())
}

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate a login password
///
/// Complexity rules belong to account creation on the server; sign-in only
/// checks that something plausible was typed.
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    if password.len() < 6 {
        return Err("Password must be at least 6 characters long".to_string());
    }

    if password.len() > 128 {
        return Err("Password must be at most 128 characters long".to_string());
    }

    Ok(())
}

/// Validate a wedding slug (lowercase, digits and single hyphens)
pub fn validate_slug(slug: &str) -> Result<(), String> {
    if slug.is_empty() {
        return Err("Slug is required".to_string());
    }

    if slug.len() < 3 {
        return Err("Slug must be at least 3 characters long".to_string());
    }

    if slug.len() > 64 {
        return Err("Slug must be at most 64 characters long".to_string());
    }

    static SLUG_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = SLUG_REGEX.get_or_init(|| {
        Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("Failed to compile slug regex")
    });

    if !regex.is_match(slug) {
        return Err(
            "Slug can only contain lowercase letters, numbers, and single hyphens".to_string(),
        );
    }

    Ok(())
}

/// Validate an optional phone number
pub fn validate_phone(phone: &str) -> Result<(), String> {
    static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = PHONE_REGEX.get_or_init(|| {
        Regex::new(r"^\+?[0-9][0-9 ()-]{5,18}[0-9]$").expect("Failed to compile phone regex")
    });

    if !regex.is_match(phone.trim()) {
        return Err("Invalid phone number".to_string());
    }

    Ok(())
}

/// Validate the number of people covered by one guest record
pub fn validate_party_size(party_size: u32) -> Result<(), String> {
    if party_size < 1 {
        return Err("Party size must be at least 1".to_string());
    }

    if party_size > MAX_PARTY_SIZE {
        return Err(format!("Party size must be at most {}", MAX_PARTY_SIZE));
    }

    Ok(())
}

/// Validate a bank account number (digits, optional spaces or dashes)
pub fn validate_account_number(account_number: &str) -> Result<(), String> {
    let digits: String = account_number
        .chars()
        .filter(|c| !matches!(c, ' ' | '-'))
        .collect();

    if digits.is_empty() {
        return Err("Account number is required".to_string());
    }

    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err("Account number can only contain digits".to_string());
    }

    if !(5..=30).contains(&digits.len()) {
        return Err("Account number must be between 5 and 30 digits".to_string());
    }

    Ok(())
}

/// Derive a URL-safe slug from a free-text title
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else if c == '&' {
            if !slug.is_empty() {
                slug.push('-');
            }
            slug.push_str("and");
            pending_hyphen = true;
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@wedding.com").is_ok());
        assert_eq!(validate_email("").unwrap_err(), "Email is required");
        assert_eq!(validate_email("user@").unwrap_err(), "Invalid email format");
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("123456").is_ok());
        assert!(validate_password("12345").is_err());
        assert_eq!(validate_password("").unwrap_err(), "Password is required");
    }

    #[test]
    fn test_validate_slug() {
        assert!(validate_slug("anna-and-ben").is_ok());
        assert!(validate_slug("Anna-Ben").is_err());
        assert!(validate_slug("anna--ben").is_err());
        assert!(validate_slug("-anna").is_err());
        assert!(validate_slug("ab").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("+62 812-3456-7890").is_ok());
        assert!(validate_phone("(021) 555 0199").is_err());
        assert!(validate_phone("call me").is_err());
    }

    #[test]
    fn test_validate_party_size() {
        assert!(validate_party_size(1).is_ok());
        assert!(validate_party_size(0).is_err());
        assert!(validate_party_size(MAX_PARTY_SIZE + 1).is_err());
    }

    #[test]
    fn test_validate_account_number() {
        assert!(validate_account_number("1234-5678 90").is_ok());
        assert!(validate_account_number("12ab5678").is_err());
        assert!(validate_account_number("123").is_err());
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Anna & Ben"), "anna-and-ben");
        assert_eq!(slugify("  The Wedding of  Rina!! "), "the-wedding-of-rina");
        assert_eq!(slugify("2025 Summer"), "2025-summer");
    }
}
