use crate::error::{DomainError, DomainResult};

pub(crate) const MAX_TITLE_LEN: usize = 256;
pub(crate) const MAX_NAME_LEN: usize = 150;

/// Collects field errors so a client sees all of them at once.
#[derive(Default)]
pub(crate) struct Validator {
    errors: Vec<String>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&mut self, ok: bool, message: impl Into<String>) -> &mut Self {
        if !ok {
            self.errors.push(message.into());
        }
        self
    }

    pub fn not_blank(&mut self, field: &str, value: &str) -> &mut Self {
        self.check(!value.trim().is_empty(), format!("{field} must not be empty"))
    }

    pub fn max_len(&mut self, field: &str, value: &str, max: usize) -> &mut Self {
        self.check(
            value.chars().count() <= max,
            format!("{field} must be at most {max} characters"),
        )
    }

    pub fn finish(&mut self) -> DomainResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(std::mem::take(&mut self.errors)))
        }
    }
}

pub(crate) fn is_slug(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

pub(crate) fn is_username(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_every_error() {
        let err = Validator::new()
            .not_blank("title", " ")
            .max_len("name", "abcdef", 3)
            .finish()
            .unwrap_err();

        match err {
            DomainError::Validation(errors) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_slug_charset() {
        assert!(is_slug("travel_notes-2023"));
        assert!(!is_slug("travel notes"));
        assert!(!is_slug(""));
    }

    #[test]
    fn test_username_charset() {
        assert!(is_username("leo.tolstoy+blog@home"));
        assert!(!is_username("leo tolstoy"));
    }
}
