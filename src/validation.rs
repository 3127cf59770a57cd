use once_cell::sync::Lazy;
use regex::Regex;

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_TITLE_LENGTH: usize = 120;
pub const MAX_DESCRIPTION_LENGTH: usize = 5000;
pub const MAX_PHOTO_REF_LENGTH: usize = 2048;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
        .expect("email pattern is valid")
});

/// Trims and lowercases an email address for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn is_valid_email(email: &str) -> bool {
    email.len() <= 254 && EMAIL_PATTERN.is_match(email)
}

/// Returns the trimmed value, or `None` when it is absent or blank.
pub fn required(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Blank photo references are stored as absent.
pub fn normalize_photo(photo: Option<String>) -> Option<String> {
    photo
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
}

pub fn is_valid_price(price: f64) -> bool {
    price.is_finite() && price > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(is_valid_email("usuario1@exemplo.com"));
        assert!(is_valid_email("a.b+c@sub.dominio.com.br"));
        assert!(!is_valid_email("sem-arroba"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email("  Maria@Exemplo.COM "), "maria@exemplo.com");
    }

    #[test]
    fn required_rejects_blank() {
        assert_eq!(required(Some("  x ")), Some("x"));
        assert_eq!(required(Some("   ")), None);
        assert_eq!(required(None), None);
    }

    #[test]
    fn price_must_be_positive_and_finite() {
        assert!(is_valid_price(0.01));
        assert!(!is_valid_price(0.0));
        assert!(!is_valid_price(-5.0));
        assert!(!is_valid_price(f64::NAN));
        assert!(!is_valid_price(f64::INFINITY));
    }

    #[test]
    fn blank_photos_become_none() {
        assert_eq!(normalize_photo(Some(" ".into())), None);
        assert_eq!(
            normalize_photo(Some(" blob:x ".into())),
            Some("blob:x".to_string())
        );
    }
}
