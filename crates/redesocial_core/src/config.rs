//! Store limits applied by the registries.
//!
//! # Invariants
//! - Every limit is positive; `StoreLimits::validate()` enforces this before a
//!   registry accepts the configuration.

use crate::model::validation::ValidationError;

const DEFAULT_MAX_POST_CHARS: usize = 280;
const DEFAULT_MAX_COMMENT_CHARS: usize = 280;
const DEFAULT_MIN_SECRET_CHARS: usize = 6;

/// Length rules for user-supplied text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreLimits {
    /// Maximum post length in characters, measured after trim.
    pub max_post_chars: usize,
    /// Maximum comment length in characters, measured after trim.
    pub max_comment_chars: usize,
    /// Minimum secret length in characters.
    pub min_secret_chars: usize,
}

impl Default for StoreLimits {
    fn default() -> Self {
        Self {
            max_post_chars: DEFAULT_MAX_POST_CHARS,
            max_comment_chars: DEFAULT_MAX_COMMENT_CHARS,
            min_secret_chars: DEFAULT_MIN_SECRET_CHARS,
        }
    }
}

impl StoreLimits {
    /// Rejects zero-valued limits.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_post_chars == 0 {
            return Err(ValidationError::InvalidLimit("max_post_chars"));
        }
        if self.max_comment_chars == 0 {
            return Err(ValidationError::InvalidLimit("max_comment_chars"));
        }
        if self.min_secret_chars == 0 {
            return Err(ValidationError::InvalidLimit("min_secret_chars"));
        }
        Ok(())
    }
}
