//! Typed access to exposure file headers
//!
//! The extractor never touches a file format directly. It asks a
//! [`HeaderReader`] to open a path and then pulls typed keyword values out of
//! the returned [`HeaderSource`]. Keyword failures come back as [`KeyError`]s
//! carrying the conventional numeric status so the status log can quote them.

pub mod fits;

pub use fits::{FitsHeader, FitsHeaderReader};

use crate::constants::status_codes;
use std::path::Path;

/// Raw value of one header keyword
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderValue {
    /// Quoted character string, trailing blanks removed
    Text(String),
    /// Unquoted literal: integer, real, logical or complex
    Literal(String),
    /// Keyword present with an empty value field
    Undefined,
}

/// Failure to obtain a typed keyword value
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum KeyError {
    #[error("keyword {keyword} does not exist")]
    NotFound { keyword: String },

    #[error("keyword {keyword} has no value")]
    Undefined { keyword: String },

    #[error("keyword {keyword} cannot be read as {expected}: '{found}'")]
    TypeMismatch {
        keyword: String,
        expected: &'static str,
        found: String,
    },
}

impl KeyError {
    /// Numeric status in the usual FITS library numbering
    pub fn status_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } => status_codes::KEY_NOT_FOUND,
            Self::Undefined { .. } => status_codes::VALUE_UNDEFINED,
            Self::TypeMismatch { expected, .. } => match *expected {
                "integer" => status_codes::BAD_INTEGER,
                "float" => status_codes::BAD_FLOAT,
                "double" => status_codes::BAD_DOUBLE,
                _ => status_codes::BAD_LOGICAL,
            },
        }
    }

    /// Check whether the keyword simply carries no value
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Undefined { .. })
    }

    fn mismatch(keyword: &str, expected: &'static str, found: &str) -> Self {
        Self::TypeMismatch {
            keyword: keyword.to_string(),
            expected,
            found: found.to_string(),
        }
    }
}

/// File-level header failures
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum HeaderError {
    #[error("cannot open '{path}' ({code}): {message}")]
    Open {
        path: String,
        code: i32,
        message: String,
    },

    #[error("error closing '{path}' ({code})")]
    Close { path: String, code: i32 },
}

impl HeaderError {
    pub fn status_code(&self) -> i32 {
        match self {
            Self::Open { code, .. } | Self::Close { code, .. } => *code,
        }
    }
}

/// An opened header that keyword values can be read from
pub trait HeaderSource {
    /// Raw lookup of a keyword; the first occurrence wins
    fn value(&self, keyword: &str) -> Option<&HeaderValue>;

    /// Read a keyword as a string
    ///
    /// Literals are returned exactly as written, so numeric keywords can be
    /// read as text too.
    fn read_string(&self, keyword: &str) -> Result<String, KeyError> {
        match self.value(keyword) {
            Some(HeaderValue::Text(text)) | Some(HeaderValue::Literal(text)) => Ok(text.clone()),
            Some(HeaderValue::Undefined) => Err(KeyError::Undefined {
                keyword: keyword.to_string(),
            }),
            None => Err(KeyError::NotFound {
                keyword: keyword.to_string(),
            }),
        }
    }

    fn read_f64(&self, keyword: &str) -> Result<f64, KeyError> {
        let text = self.read_string(keyword)?;
        parse_real(&text).ok_or_else(|| KeyError::mismatch(keyword, "double", &text))
    }

    fn read_f32(&self, keyword: &str) -> Result<f32, KeyError> {
        let text = self.read_string(keyword)?;
        parse_real(&text)
            .map(|value| value as f32)
            .ok_or_else(|| KeyError::mismatch(keyword, "float", &text))
    }

    /// Read a keyword as an integer; reals are truncated toward zero
    fn read_i32(&self, keyword: &str) -> Result<i32, KeyError> {
        let text = self.read_string(keyword)?;
        let trimmed = text.trim();

        if let Ok(value) = trimmed.parse::<i32>() {
            return Ok(value);
        }

        match parse_real(trimmed) {
            Some(value) if value.is_finite() && value.abs() <= i32::MAX as f64 => {
                Ok(value.trunc() as i32)
            }
            _ => Err(KeyError::mismatch(keyword, "integer", &text)),
        }
    }

    /// Release the underlying file
    fn close(self) -> Result<(), HeaderError>
    where
        Self: Sized,
    {
        Ok(())
    }
}

/// Opens header sources and probes for files
pub trait HeaderReader {
    type Source: HeaderSource;

    fn open(&self, path: &Path) -> Result<Self::Source, HeaderError>;

    /// Check whether a file exists and can be read
    fn exists(&self, path: &Path) -> bool;
}

/// Parse a real number, accepting the Fortran `D` exponent
fn parse_real(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    trimmed
        .parse::<f64>()
        .ok()
        .or_else(|| trimmed.replace(['D', 'd'], "E").parse::<f64>().ok())
}
