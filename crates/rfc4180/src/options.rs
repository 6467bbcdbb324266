use crate::error::ConfigError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Reader configuration.
///
/// Applied through [`Reader::new`](crate::Reader::new) or
/// [`Reader::reconfigure`](crate::Reader::reconfigure), both of which run
/// [`Options::validate`] first.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Options {
    /// Field delimiter.
    pub comma: char,
    pub quote: char,
    /// Lines starting with this character are skipped entirely.
    pub comment: Option<char>,
    /// Strip leading ASCII spaces before each field (default: true)
    pub trim_leading_space: bool,
    /// Tolerate bare quotes in unquoted fields and lone quotes in quoted fields.
    pub lazy_quotes: bool,
    /// Fields per record. 0 infers the count from the first record.
    pub expected_fields: usize,
    /// Record streams propagate field count mismatches instead of skipping them.
    pub strict: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            comma: ',',
            quote: '"',
            comment: None,
            trim_leading_space: true,
            lazy_quotes: false,
            expected_fields: 0,
            strict: false,
        }
    }
}

impl Options {
    pub fn with_comma(mut self, comma: char) -> Self {
        self.comma = comma;
        self
    }

    pub fn with_quote(mut self, quote: char) -> Self {
        self.quote = quote;
        self
    }

    pub fn with_comment(mut self, comment: Option<char>) -> Self {
        self.comment = comment;
        self
    }

    pub fn with_trim_leading_space(mut self, trim: bool) -> Self {
        self.trim_leading_space = trim;
        self
    }

    pub fn with_lazy_quotes(mut self, lazy: bool) -> Self {
        self.lazy_quotes = lazy;
        self
    }

    pub fn with_expected_fields(mut self, n: usize) -> Self {
        self.expected_fields = n;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Comma, quote and comment must be distinct, and none may be a line
    /// terminator or the replacement character.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !valid_delim(self.comma) {
            return Err(ConfigError::InvalidComma(self.comma));
        }
        if !valid_delim(self.quote) {
            return Err(ConfigError::InvalidQuote(self.quote));
        }
        if self.comma == self.quote {
            return Err(ConfigError::CommaIsQuote(self.comma));
        }
        if let Some(c) = self.comment {
            if !valid_delim(c) {
                return Err(ConfigError::InvalidComment(c));
            }
            if c == self.comma {
                return Err(ConfigError::CommaIsComment(c));
            }
            if c == self.quote {
                return Err(ConfigError::QuoteIsComment(c));
            }
        }
        Ok(())
    }
}

#[inline]
fn valid_delim(c: char) -> bool {
    !matches!(c, '\r' | '\n' | char::REPLACEMENT_CHARACTER)
}
