//! FITS fixtures shared by the integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

const BLOCK: usize = 2880;
const CARD: usize = 80;

/// Primary header built card by card and written to disk
#[derive(Debug, Clone)]
pub struct FitsFile {
    cards: Vec<String>,
}

impl FitsFile {
    pub fn new() -> Self {
        Self {
            cards: vec![
                literal_card("SIMPLE", "T"),
                literal_card("BITPIX", "16"),
                literal_card("NAXIS", "0"),
            ],
        }
    }

    pub fn text(mut self, keyword: &str, value: &str) -> Self {
        let escaped = value.replace('\'', "''");
        self.cards
            .push(format!("{:<8}= '{:<8}'", keyword, escaped));
        self
    }

    pub fn literal(mut self, keyword: &str, value: &str) -> Self {
        self.cards.push(literal_card(keyword, value));
        self
    }

    pub fn bytes(&self) -> Vec<u8> {
        let mut text = String::new();
        for card in &self.cards {
            text.push_str(&format!("{:<80}", card));
        }
        text.push_str(&format!("{:<80}", "END"));

        let mut bytes = text.into_bytes();
        assert_eq!(bytes.len() % CARD, 0);
        let padded = bytes.len().div_ceil(BLOCK) * BLOCK;
        bytes.resize(padded, b' ');
        bytes
    }

    pub fn write(&self, directory: &Path, file_name: &str) -> PathBuf {
        let path = directory.join(file_name);
        fs::write(&path, self.bytes()).expect("fixture should be writable");
        path
    }
}

fn literal_card(keyword: &str, value: &str) -> String {
    format!("{:<8}= {:>20}", keyword, value)
}

/// Healthy reduced frame observed at `date_obs`
pub fn reduced_frame(object: &str, date_obs: &str, mjd: &str) -> FitsFile {
    FitsFile::new()
        .text("INSTRUME", "IO:O")
        .text("PROPID", "PL24A01")
        .text("RA", "02:42:40.771")
        .text("DEC", "-00:00:47.84")
        .text("UTSTART", "00:00:00.000")
        .literal("EXPTIME", "120.0")
        .literal("AIRMASS", "1.234")
        .literal("CCDXBIN", "2")
        .literal("L1SEESEC", "1.42")
        .literal("L1PHOTOM", "0.05")
        .literal("SCHEDSKY", "20.7")
        .text("CAT-NAME", object)
        .text("GROUPID", "Seyfert monitoring")
        .text("DATE-OBS", date_obs)
        .literal("MJD", mjd)
        .text("FILTER1", "SDSS-R")
        .text("FILTER2", "Clear")
        .text("GRATID", "NA")
        .literal("L1STATOV", "1")
        .literal("L1STATZE", "1")
        .literal("L1STATTR", "-1")
        .literal("L1STATFL", "1")
        .literal("L1STATDA", "1")
        .literal("L1STATFR", "1")
        .text("FILTERI1", "SDSS-R")
        .text("FILTERI2", "None")
}

/// Unreduced frame: no pipeline keywords at all
pub fn raw_frame(object: &str, date_obs: &str, mjd: &str) -> FitsFile {
    FitsFile::new()
        .text("INSTRUME", "IO:O")
        .text("PROPID", "PL24A01")
        .text("UTSTART", "00:00:00.000")
        .literal("EXPTIME", "10.0")
        .text("OBJECT", object)
        .text("DATE-OBS", date_obs)
        .literal("MJD", mjd)
        .text("FILTER1", "Bessel-V")
        .text("FILTERI1", "Bessel-V")
        .text("FILTERI2", "None")
}

pub fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("cannot read {}: {}", path.display(), e))
}
