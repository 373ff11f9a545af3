//! Tests for the metadata extraction module
//!
//! Headers are served from memory so every keyword combination can be set up
//! without writing FITS files.


use crate::app::services::filename_classifier::ClassifiedName;
use crate::app::services::header_reader::{
    HeaderError, HeaderReader, HeaderSource, HeaderValue,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Header held in memory, optionally failing on close
#[derive(Debug, Clone, Default)]
pub struct MemoryHeader {
    values: HashMap<String, HeaderValue>,
    close_error: Option<i32>,
}

impl MemoryHeader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, keyword: &str, value: &str) -> Self {
        self.values
            .insert(keyword.to_string(), HeaderValue::Text(value.to_string()));
        self
    }

    pub fn literal(mut self, keyword: &str, value: &str) -> Self {
        self.values
            .insert(keyword.to_string(), HeaderValue::Literal(value.to_string()));
        self
    }

    pub fn undefined(mut self, keyword: &str) -> Self {
        self.values
            .insert(keyword.to_string(), HeaderValue::Undefined);
        self
    }

    pub fn without(mut self, keyword: &str) -> Self {
        self.values.remove(keyword);
        self
    }

    pub fn failing_close(mut self, code: i32) -> Self {
        self.close_error = Some(code);
        self
    }
}

impl HeaderSource for MemoryHeader {
    fn value(&self, keyword: &str) -> Option<&HeaderValue> {
        self.values.get(keyword)
    }

    fn close(self) -> Result<(), HeaderError> {
        match self.close_error {
            Some(code) => Err(HeaderError::Close {
                path: "memory".to_string(),
                code,
            }),
            None => Ok(()),
        }
    }
}

/// Directory of in-memory headers keyed by path
///
/// A path mapped to `None` exists on disk but cannot be opened.
#[derive(Debug, Clone, Default)]
pub struct MemoryHeaderReader {
    files: HashMap<PathBuf, Option<MemoryHeader>>,
}

impl MemoryHeaderReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, header: MemoryHeader) -> Self {
        self.files.insert(path.into(), Some(header));
        self
    }

    pub fn with_unreadable(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.insert(path.into(), None);
        self
    }
}

impl HeaderReader for MemoryHeaderReader {
    type Source = MemoryHeader;

    fn open(&self, path: &Path) -> Result<MemoryHeader, HeaderError> {
        match self.files.get(path) {
            Some(Some(header)) => Ok(header.clone()),
            _ => Err(HeaderError::Open {
                path: path.display().to_string(),
                code: 104,
                message: "could not open the named file".to_string(),
            }),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }
}

/// Data directory used by the in-memory fixtures
pub const DATA_DIR: &str = "/data/20240311";

pub fn data_path(file_name: &str) -> PathBuf {
    Path::new(DATA_DIR).join(file_name)
}

pub fn classified(file_name: &str) -> ClassifiedName {
    ClassifiedName::parse(file_name).expect("test filename should follow the convention")
}

/// Header of a fully reduced frame with every keyword populated and healthy
pub fn reduced_header() -> MemoryHeader {
    MemoryHeader::new()
        .text("INSTRUME", "IO:O")
        .text("PROPID", "PL24A01")
        .text("RA", "02:42:40.771")
        .text("DEC", "-00:00:47.84")
        .text("UTSTART", "21:14:05.123")
        .literal("EXPTIME", "120.0")
        .literal("AIRMASS", "1.234")
        .literal("CCDXBIN", "2")
        .literal("L1SEESEC", "1.42")
        .literal("L1PHOTOM", "0.05")
        .literal("SCHEDSKY", "20.7")
        .text("CAT-NAME", "NGC 1068")
        .text("OBJECT", "ngc1068-field")
        .text("GROUPID", "Seyfert monitoring 2024")
        .text("DATE-OBS", "2024-03-11T21:14:05.123")
        .literal("MJD", "60380.88478")
        .text("FILTER1", "SDSS-R")
        .text("FILTER2", "Clear")
        .text("FILTER3", "NONE")
        .text("GRATID", "600R")
        .literal("L1STATOV", "1")
        .literal("L1STATZE", "1")
        .literal("L1STATTR", "-1")
        .literal("L1STATFL", "1")
        .literal("L1STATDA", "1")
        .literal("L1STATFR", "1")
}
