//! Layout Settings Model (storefront branding)

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

pub const MAX_SLIDES: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CarouselSlide {
    #[validate(length(min = 1), custom(function = "validate_url"))]
    pub image_url: String,
    #[validate(length(max = 120))]
    pub title: Option<String>,
    #[validate(custom(function = "validate_url"))]
    pub link: Option<String>,
}

/// Singleton layout row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSettings {
    pub logo_url: Option<String>,
    pub background_url: Option<String>,
    pub slides: Vec<CarouselSlide>,
    /// Instagram handle without the leading `@`
    pub instagram: Option<String>,
    pub updated_at: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LayoutUpdate {
    #[validate(custom(function = "validate_url"))]
    pub logo_url: Option<String>,
    #[validate(custom(function = "validate_url"))]
    pub background_url: Option<String>,
    #[validate(length(max = 10), nested)]
    pub slides: Option<Vec<CarouselSlide>>,
    pub instagram: Option<String>,
}

/// Absolute http(s) URL or a site-relative path; empty clears the field
pub fn validate_url(url: &str) -> Result<(), ValidationError> {
    if url.is_empty() {
        return Ok(());
    }
    let ok = url.starts_with("https://") || url.starts_with("http://") || url.starts_with('/');
    if ok && url.len() <= 500 && !url.chars().any(char::is_whitespace) {
        Ok(())
    } else {
        Err(ValidationError::new("url"))
    }
}

/// Strip a leading `@` and URL prefix; handles are 1-30 of `[A-Za-z0-9._]`.
/// An empty input clears the handle.
pub fn normalize_instagram(raw: &str) -> Result<Option<String>, ValidationError> {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .trim_start_matches("https://")
        .trim_start_matches("www.")
        .trim_start_matches("instagram.com/")
        .trim_start_matches('@')
        .trim_end_matches('/');
    if trimmed.is_empty() {
        return Ok(None);
    }
    let valid = trimmed.len() <= 30
        && trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_');
    if valid {
        Ok(Some(trimmed.to_string()))
    } else {
        Err(ValidationError::new("instagram"))
    }
}
