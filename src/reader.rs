//! Reading text files into strings, with truncation of oversized files.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::encoding::TextEncoding;
use crate::settings::MAX_FILE_SIZE;

/// Read a text file's content.
///
/// Returns `Some("")` for empty files and `None` when the file cannot be
/// stat'ed or read. Files above [`MAX_FILE_SIZE`] are cut to their first
/// quarter-ceiling bytes, minus the last (likely partial) line, followed by a
/// truncation notice.
pub fn read_file_content(path: &Path) -> Option<String> {
    read_file_content_with_limit(path, MAX_FILE_SIZE)
}

/// [`read_file_content`] with an explicit size ceiling.
pub fn read_file_content_with_limit(path: &Path, max_size: u64) -> Option<String> {
    match try_read(path, max_size) {
        Ok(content) => Some(content),
        Err(e) => {
            log::warn!("Error reading file {}: {}", path.display(), e);
            None
        }
    }
}

fn try_read(path: &Path, max_size: u64) -> std::io::Result<String> {
    let file_size = std::fs::metadata(path)?.len();
    if file_size == 0 {
        return Ok(String::new());
    }

    if file_size > max_size {
        let window = max_size / 4;
        let mut bytes = Vec::with_capacity(window as usize);
        File::open(path)?.take(window).read_to_end(&mut bytes)?;

        let text = decode_text(&bytes);
        let mut lines: Vec<&str> = text.lines().collect();
        if lines.len() > 1 {
            lines.pop();
        }

        let mut content = lines.join("\n");
        content.push_str(&truncation_notice(bytes.len() as u64, file_size));
        return Ok(content);
    }

    let bytes = std::fs::read(path)?;
    Ok(decode_text(&bytes))
}

/// Lossy UTF-8 is the first encoding in the priority list and never fails, so
/// it wins for every buffer except one opening with a UTF-16 byte-order mark.
/// Malformed bytes, including a sequence cut off by truncation, are dropped.
fn decode_text(bytes: &[u8]) -> String {
    match bytes {
        [0xFF, 0xFE, ..] | [0xFE, 0xFF, ..] => TextEncoding::Utf16.decode_lossy(bytes),
        _ => TextEncoding::Utf8.decode_lossy(bytes),
    }
}

/// Notice appended to truncated content.
///
/// `shown` is the number of bytes actually read (a quarter of the ceiling),
/// not the ceiling itself, so a 16 KB ceiling reports `showing first 4.0 KB`.
pub fn truncation_notice(shown: u64, total: u64) -> String {
    format!(
        "\n\n... [File truncated - showing first {} of {}]",
        format_file_size(shown),
        format_file_size(total)
    )
}

/// Format a byte count as `B`, `KB` or `MB`.
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    }
}

/// Number of lines in `content`, without counting a trailing newline as an
/// extra line.
pub fn count_lines(content: &str) -> usize {
    content.lines().count()
}
