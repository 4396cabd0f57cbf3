//! Run configuration: the toggle set and loader options.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScrubError};
use crate::rules::phone::parse_region;

/// Default region used to parse phone numbers without a country code.
pub const DEFAULT_PHONE_REGION: &str = "CA";

/// Selects which optional rules run, and their parameters.
///
/// Fixed for the duration of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Toggles {
    /// Remove duplicate rows.
    pub dedupe: bool,
    /// Columns forming the dedupe key (empty = whole row).
    pub dedupe_key: Vec<String>,
    /// Lowercase and trim email columns.
    pub normalize_emails: bool,
    /// Rewrite dates as YYYY-MM-DD where they parse.
    pub normalize_dates: bool,
    /// Flag email values that don't look like addresses.
    pub validate_emails: bool,
    /// Rewrite valid phone numbers as E.164 and flag the rest.
    pub normalize_phones: bool,
    /// Two-letter region for numbers without a country code.
    pub phone_region: String,
}

impl Default for Toggles {
    fn default() -> Self {
        Self {
            dedupe: false,
            dedupe_key: Vec::new(),
            normalize_emails: false,
            normalize_dates: false,
            validate_emails: false,
            normalize_phones: false,
            phone_region: DEFAULT_PHONE_REGION.to_string(),
        }
    }
}

impl Toggles {
    /// Toggle set with every optional rule enabled and full-row dedupe.
    pub fn all() -> Self {
        Self {
            dedupe: true,
            normalize_emails: true,
            normalize_dates: true,
            validate_emails: true,
            normalize_phones: true,
            ..Self::default()
        }
    }

    /// Split a comma-separated column list, trimming names and dropping blanks.
    pub fn parse_key_list(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }

    /// Set the dedupe key columns (enables dedupe).
    pub fn with_dedupe_key<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dedupe = true;
        self.dedupe_key = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Set the default phone region.
    pub fn with_phone_region(mut self, region: impl Into<String>) -> Self {
        self.phone_region = region.into();
        self
    }

    /// Check the toggles before any rule runs.
    ///
    /// An unknown phone region is a configuration error, but only matters when
    /// phone normalization is enabled.
    pub fn validate(&self) -> Result<()> {
        if self.normalize_phones && parse_region(&self.phone_region).is_none() {
            return Err(ScrubError::Config(format!(
                "Unknown phone region '{}'",
                self.phone_region
            )));
        }
        Ok(())
    }
}

/// Options for reading delimited files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Delimiter to use (None = from extension, then auto-detect).
    pub delimiter: Option<u8>,
    /// Whether the file has a header row.
    pub has_header: bool,
    /// Quote character.
    pub quote: u8,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            quote: b'"',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let toggles = Toggles::default();
        assert!(!toggles.dedupe);
        assert!(toggles.dedupe_key.is_empty());
        assert_eq!(toggles.phone_region, "CA");
    }

    #[test]
    fn test_parse_key_list() {
        assert_eq!(
            Toggles::parse_key_list(" Email , Phone 1,,  "),
            vec!["Email".to_string(), "Phone 1".to_string()]
        );
        assert!(Toggles::parse_key_list("").is_empty());
    }

    #[test]
    fn test_validate_region_only_when_phones_enabled() {
        let bad = Toggles::default().with_phone_region("ZZ");
        assert!(bad.validate().is_ok());

        let bad = Toggles {
            normalize_phones: true,
            ..bad
        };
        assert!(matches!(bad.validate(), Err(ScrubError::Config(_))));

        let lower = Toggles {
            normalize_phones: true,
            ..Toggles::default().with_phone_region("us")
        };
        assert!(lower.validate().is_ok());
    }

    #[test]
    fn test_deserialize_partial_toggles() {
        let toggles: Toggles = serde_json::from_str(r#"{"dedupe": true}"#).unwrap();
        assert!(toggles.dedupe);
        assert_eq!(toggles.phone_region, "CA");
    }
}
