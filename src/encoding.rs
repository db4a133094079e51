//! Text encodings tried, in priority order, when classifying and reading files.
//!
//! Each encoding offers a strict decode (fails on malformed input) and a lossy
//! decode (malformed sequences are dropped, never replaced).

/// A text encoding from the fixed priority list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    /// UTF-16 with optional byte-order mark; little-endian when absent.
    Utf16,
    Utf16Le,
    Utf16Be,
    Latin1,
    Windows1252,
}

/// Order in which encodings are attempted.
pub const PRIORITY: [TextEncoding; 6] = [
    TextEncoding::Utf8,
    TextEncoding::Utf16,
    TextEncoding::Utf16Le,
    TextEncoding::Utf16Be,
    TextEncoding::Latin1,
    TextEncoding::Windows1252,
];

impl std::fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Utf16 => "utf-16",
            TextEncoding::Utf16Le => "utf-16-le",
            TextEncoding::Utf16Be => "utf-16-be",
            TextEncoding::Latin1 => "latin-1",
            TextEncoding::Windows1252 => "cp1252",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy)]
enum Endian {
    Little,
    Big,
}

impl TextEncoding {
    /// Decode `bytes`, failing on any malformed sequence.
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_owned),
            TextEncoding::Utf16 | TextEncoding::Utf16Le | TextEncoding::Utf16Be => {
                if bytes.len() % 2 != 0 {
                    return None;
                }
                let (body, endian) = self.utf16_layout(bytes);
                char::decode_utf16(utf16_units(body, endian))
                    .collect::<Result<String, _>>()
                    .ok()
            }
            TextEncoding::Latin1 => Some(decode_latin1(bytes)),
            TextEncoding::Windows1252 => bytes.iter().map(|&b| cp1252_char(b)).collect(),
        }
    }

    /// Decode `bytes`, silently dropping malformed sequences.
    pub fn decode_lossy(self, bytes: &[u8]) -> String {
        match self {
            TextEncoding::Utf8 => bytes.utf8_chunks().map(|chunk| chunk.valid()).collect(),
            TextEncoding::Utf16 | TextEncoding::Utf16Le | TextEncoding::Utf16Be => {
                let even = &bytes[..bytes.len() - bytes.len() % 2];
                let (body, endian) = self.utf16_layout(even);
                char::decode_utf16(utf16_units(body, endian))
                    .filter_map(Result::ok)
                    .collect()
            }
            TextEncoding::Latin1 => decode_latin1(bytes),
            TextEncoding::Windows1252 => bytes.iter().filter_map(|&b| cp1252_char(b)).collect(),
        }
    }

    /// Strip a byte-order mark (plain UTF-16 only) and pick the byte order.
    fn utf16_layout(self, bytes: &[u8]) -> (&[u8], Endian) {
        match self {
            TextEncoding::Utf16 => match bytes {
                [0xFF, 0xFE, rest @ ..] => (rest, Endian::Little),
                [0xFE, 0xFF, rest @ ..] => (rest, Endian::Big),
                _ => (bytes, Endian::Little),
            },
            TextEncoding::Utf16Be => (bytes, Endian::Big),
            _ => (bytes, Endian::Little),
        }
    }
}

fn utf16_units(bytes: &[u8], endian: Endian) -> impl Iterator<Item = u16> + '_ {
    bytes.chunks_exact(2).map(move |pair| match endian {
        Endian::Little => u16::from_le_bytes([pair[0], pair[1]]),
        Endian::Big => u16::from_be_bytes([pair[0], pair[1]]),
    })
}

fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Windows-1252 differs from Latin-1 only in 0x80..=0x9F; five of those bytes
/// are unassigned.
fn cp1252_char(byte: u8) -> Option<char> {
    const HIGH: [Option<char>; 32] = [
        Some('\u{20AC}'), None, Some('\u{201A}'), Some('\u{0192}'),
        Some('\u{201E}'), Some('\u{2026}'), Some('\u{2020}'), Some('\u{2021}'),
        Some('\u{02C6}'), Some('\u{2030}'), Some('\u{0160}'), Some('\u{2039}'),
        Some('\u{0152}'), None, Some('\u{017D}'), None,
        None, Some('\u{2018}'), Some('\u{2019}'), Some('\u{201C}'),
        Some('\u{201D}'), Some('\u{2022}'), Some('\u{2013}'), Some('\u{2014}'),
        Some('\u{02DC}'), Some('\u{2122}'), Some('\u{0161}'), Some('\u{203A}'),
        Some('\u{0153}'), None, Some('\u{017E}'), Some('\u{0178}'),
    ];

    match byte {
        0x80..=0x9F => HIGH[usize::from(byte - 0x80)],
        _ => Some(char::from(byte)),
    }
}
