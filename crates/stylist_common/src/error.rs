//! Error types shared across the stylist crates.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StylistError {
    #[error("Catalog lookup failed: {0}")]
    Catalog(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl StylistError {
    pub fn code(&self) -> i32 {
        match self {
            StylistError::Catalog(_) => -32001,
            StylistError::Session(_) => -32003,
            StylistError::InvalidRequest(_) => -32600,
        }
    }
}

pub type Result<T> = std::result::Result<T, StylistError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct() {
        let errors = [
            StylistError::Catalog(String::new()),
            StylistError::Session(String::new()),
            StylistError::InvalidRequest(String::new()),
        ];
        let mut codes: Vec<i32> = errors.iter().map(|e| e.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_display_carries_detail() {
        let err = StylistError::InvalidRequest("prompt too long".to_string());
        assert_eq!(err.to_string(), "Invalid request: prompt too long");
        assert_eq!(err.code(), -32600);
    }
}
