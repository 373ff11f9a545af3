//! FITS primary header reader
//!
//! Reads 2880-byte header blocks of 80-character cards until the `END` card and
//! keeps every valued keyword. The data unit is never read.

use super::{HeaderError, HeaderReader, HeaderSource, HeaderValue};
use crate::constants::{FITS_BLOCK_SIZE, FITS_CARD_SIZE, MAX_HEADER_BLOCKS, status_codes};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;
use tracing::trace;

/// Parsed primary header of one FITS file
#[derive(Debug, Clone, Default)]
pub struct FitsHeader {
    cards: HashMap<String, HeaderValue>,
}

impl FitsHeader {
    /// Parse a primary header from any byte stream
    pub fn from_reader<R: Read>(reader: &mut R, path: &str) -> Result<Self, HeaderError> {
        let mut header = Self::default();
        let mut block = [0u8; FITS_BLOCK_SIZE];

        for block_index in 0..MAX_HEADER_BLOCKS {
            reader.read_exact(&mut block).map_err(|e| {
                let (code, message) = if e.kind() == ErrorKind::UnexpectedEof {
                    (
                        status_codes::END_OF_FILE,
                        "header ended before END card".to_string(),
                    )
                } else {
                    (status_codes::FILE_NOT_OPENED, e.to_string())
                };
                HeaderError::Open {
                    path: path.to_string(),
                    code,
                    message,
                }
            })?;

            for (card_index, card_bytes) in block.chunks_exact(FITS_CARD_SIZE).enumerate() {
                let card = String::from_utf8_lossy(card_bytes);

                if block_index == 0 && card_index == 0 && !card.starts_with("SIMPLE  =") {
                    return Err(HeaderError::Open {
                        path: path.to_string(),
                        code: status_codes::FILE_NOT_OPENED,
                        message: "first card is not SIMPLE".to_string(),
                    });
                }

                if is_end_card(&card) {
                    trace!("{}: {} header keywords", path, header.cards.len());
                    return Ok(header);
                }

                if let Some((keyword, value)) = parse_card(&card) {
                    header.cards.entry(keyword).or_insert(value);
                }
            }
        }

        Err(HeaderError::Open {
            path: path.to_string(),
            code: status_codes::END_OF_FILE,
            message: format!("no END card within {} blocks", MAX_HEADER_BLOCKS),
        })
    }

    /// Number of valued keywords
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl HeaderSource for FitsHeader {
    fn value(&self, keyword: &str) -> Option<&HeaderValue> {
        self.cards.get(keyword)
    }
}

/// Header reader backed by FITS files on disk
#[derive(Debug, Clone, Copy, Default)]
pub struct FitsHeaderReader;

impl HeaderReader for FitsHeaderReader {
    type Source = FitsHeader;

    fn open(&self, path: &Path) -> Result<FitsHeader, HeaderError> {
        let display = path.display().to_string();
        let file = File::open(path).map_err(|e| HeaderError::Open {
            path: display.clone(),
            code: status_codes::FILE_NOT_OPENED,
            message: e.to_string(),
        })?;

        let mut reader = BufReader::new(file);
        FitsHeader::from_reader(&mut reader, &display)
    }

    fn exists(&self, path: &Path) -> bool {
        File::open(path).is_ok()
    }
}

fn is_end_card(card: &str) -> bool {
    card.starts_with("END") && card.get(3..).is_some_and(|rest| rest.trim().is_empty())
}

/// Split one card into keyword and value
///
/// Cards without a value indicator in columns 9-10 (COMMENT, HISTORY, blank)
/// yield `None`.
fn parse_card(card: &str) -> Option<(String, HeaderValue)> {
    if card.get(8..10) != Some("= ") {
        return None;
    }

    let keyword = card.get(..8)?.trim_end();
    if keyword.is_empty() {
        return None;
    }

    Some((keyword.to_string(), parse_value(card.get(10..)?)))
}

fn parse_value(field: &str) -> HeaderValue {
    let field = field.trim_start();

    if let Some(quoted) = field.strip_prefix('\'') {
        return HeaderValue::Text(parse_quoted(quoted));
    }

    let literal = match field.find('/') {
        Some(slash) => &field[..slash],
        None => field,
    }
    .trim();

    if literal.is_empty() {
        HeaderValue::Undefined
    } else {
        HeaderValue::Literal(literal.to_string())
    }
}

/// Read a quoted string body; `''` is an embedded quote
fn parse_quoted(body: &str) -> String {
    let mut text = String::new();
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\'' {
            if chars.peek() == Some(&'\'') {
                text.push('\'');
                chars.next();
            } else {
                break;
            }
        } else {
            text.push(c);
        }
    }

    text.trim_end().to_string()
}
