use serde::{Deserialize, Serialize};

/// Collapse every whitespace run to one space and trim both ends.
pub fn normalize_address(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Province, district, and the free-text remainder ("동 이름 + 번지").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressQuery {
    pub province: String,
    pub district: String,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("detail address '{detail}' must contain a neighborhood and a lot number (e.g. 개포동 12)")]
    IncompleteDetail { detail: String },
}

impl AddressQuery {
    pub fn new(
        province: impl Into<String>,
        district: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            province: province.into(),
            district: district.into(),
            detail: detail.into(),
        }
    }

    /// The detail must carry at least two whitespace separated tokens.
    pub fn validate(&self) -> Result<(), AddressError> {
        if self.detail.split_whitespace().count() < 2 {
            return Err(AddressError::IncompleteDetail {
                detail: self.detail.clone(),
            });
        }
        Ok(())
    }

    /// "province district detail" as sent to the geocoder, already normalized.
    pub fn search_text(&self) -> String {
        normalize_address(&format!(
            "{} {} {}",
            self.province, self.district, self.detail
        ))
    }
}
