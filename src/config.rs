//! Configuration types and defaults for the bulk scanner

use serde::{Deserialize, Serialize};

/// Prefix every bulk-scan token must start with. `aHR` is what `http`
/// encodes to, so the default only picks up encoded web URLs.
pub const DEFAULT_PREFIX: &str = "aHR";

/// Tokens longer than this are counted and skipped without decoding
pub const DEFAULT_MAX_TOKEN_LENGTH: usize = 8192;

/// Alphabet characters required after the prefix before padding
pub const DEFAULT_MIN_TAIL_LENGTH: usize = 6;

/// Configuration for a bulk scan
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScanConfig {
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default = "default_max_token_length")]
    pub max_token_length: usize,
    #[serde(default = "default_min_tail_length")]
    pub min_tail_length: usize,
}

fn default_prefix() -> String { DEFAULT_PREFIX.to_string() }
fn default_max_token_length() -> usize { DEFAULT_MAX_TOKEN_LENGTH }
fn default_min_tail_length() -> usize { DEFAULT_MIN_TAIL_LENGTH }

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            max_token_length: DEFAULT_MAX_TOKEN_LENGTH,
            min_tail_length: DEFAULT_MIN_TAIL_LENGTH,
        }
    }
}

impl ScanConfig {
    /// Default limits with a different token prefix
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            ..Self::default()
        }
    }

    /// Same limits, prefix overridden when the request carries one
    pub fn for_request(&self, prefix: Option<&str>) -> Self {
        match prefix {
            Some(p) => Self {
                prefix: p.to_string(),
                ..self.clone()
            },
            None => self.clone(),
        }
    }
}
