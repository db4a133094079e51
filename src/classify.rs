//! Binary/text classification by sampling file content.
//!
//! The extension is never consulted. The head of the file is decoded with each
//! encoding in [`PRIORITY`] order; the first decoding that is overwhelmingly
//! printable marks the file as text.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::encoding::{TextEncoding, PRIORITY};
use crate::settings::{CHUNK_SIZE, PRINTABLE_RATIO};

/// Check whether a file should be treated as binary.
///
/// Empty files are text. Files that cannot be opened or read are binary.
pub fn is_binary_file(path: &Path) -> bool {
    match read_sample(path) {
        Ok(sample) => is_binary_sample(&sample),
        Err(e) => {
            log::debug!("Treating unreadable file as binary: {} ({})", path.display(), e);
            true
        }
    }
}

/// Classify an in-memory sample, as read from the head of a file.
pub fn is_binary_sample(sample: &[u8]) -> bool {
    if sample.is_empty() {
        return false;
    }
    detect_encoding(sample).is_none()
}

/// First encoding whose strict decoding of `sample` looks like text.
pub fn detect_encoding(sample: &[u8]) -> Option<TextEncoding> {
    PRIORITY.into_iter().find(|encoding| {
        encoding
            .decode(sample)
            .is_some_and(|decoded| printable_ratio(&decoded) > PRINTABLE_RATIO)
    })
}

fn read_sample(path: &Path) -> std::io::Result<Vec<u8>> {
    let file = File::open(path)?;
    let mut sample = Vec::with_capacity(CHUNK_SIZE);
    file.take(CHUNK_SIZE as u64).read_to_end(&mut sample)?;
    Ok(sample)
}

/// Fraction of characters that are printable or whitespace; 0.0 when empty.
pub fn printable_ratio(text: &str) -> f64 {
    let mut total = 0usize;
    let mut printable = 0usize;
    for c in text.chars() {
        total += 1;
        if is_printable_or_space(c) {
            printable += 1;
        }
    }
    if total == 0 {
        return 0.0;
    }
    printable as f64 / total as f64
}

fn is_printable_or_space(c: char) -> bool {
    if c.is_whitespace() || ('\u{1C}'..='\u{1F}').contains(&c) {
        return true;
    }
    !(c.is_control() || is_format_or_private(c))
}

/// Non-printing code points outside the control range: common format
/// characters, private use and noncharacters.
fn is_format_or_private(c: char) -> bool {
    matches!(
        c,
        '\u{AD}'
            | '\u{600}'..='\u{605}'
            | '\u{200B}'..='\u{200F}'
            | '\u{202A}'..='\u{202E}'
            | '\u{2060}'..='\u{2064}'
            | '\u{FEFF}'
            | '\u{FFF9}'..='\u{FFFB}'
            | '\u{E000}'..='\u{F8FF}'
            | '\u{FFFE}'
            | '\u{FFFF}'
            | '\u{F0000}'..='\u{10FFFF}'
    )
}
