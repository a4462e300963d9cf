use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{MediaSyncError, Result};

/// Text encodings understood when reading a source's index file.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Latin1,
    Ascii,
}

impl TextEncoding {
    pub fn name(self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "UTF-8",
            TextEncoding::Latin1 => "ISO-8859-1",
            TextEncoding::Ascii => "US-ASCII",
        }
    }

    /// Decode `bytes` read from `path`. The path is only used for error reporting.
    pub fn decode(self, bytes: Vec<u8>, path: &Path) -> Result<String> {
        let fail = || MediaSyncError::Decode {
            path: path.to_path_buf(),
            encoding: self.name(),
        };

        match self {
            TextEncoding::Utf8 => String::from_utf8(bytes).map_err(|_| fail()),
            // Every byte is the code point of the same value.
            TextEncoding::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
            TextEncoding::Ascii => {
                if bytes.is_ascii() {
                    String::from_utf8(bytes).map_err(|_| fail())
                } else {
                    Err(fail())
                }
            }
        }
    }
}

impl FromStr for TextEncoding {
    type Err = MediaSyncError;

    fn from_str(label: &str) -> Result<Self> {
        let key: String = label
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match key.as_str() {
            "utf8" => Ok(TextEncoding::Utf8),
            "iso88591" | "latin1" | "l1" => Ok(TextEncoding::Latin1),
            "ascii" | "usascii" => Ok(TextEncoding::Ascii),
            _ => Err(MediaSyncError::UnsupportedEncoding(label.to_string())),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_case_and_punctuation_insensitive() {
        assert_eq!("ISO-8859-1".parse::<TextEncoding>().unwrap(), TextEncoding::Latin1);
        assert_eq!("latin_1".parse::<TextEncoding>().unwrap(), TextEncoding::Latin1);
        assert_eq!("utf8".parse::<TextEncoding>().unwrap(), TextEncoding::Utf8);
        assert_eq!(" UTF-8 ".parse::<TextEncoding>().unwrap(), TextEncoding::Utf8);
        assert_eq!("us-ascii".parse::<TextEncoding>().unwrap(), TextEncoding::Ascii);
    }

    #[test]
    fn unknown_label_is_rejected() {
        let err = "shift_jis".parse::<TextEncoding>().unwrap_err();
        assert!(matches!(err, MediaSyncError::UnsupportedEncoding(ref l) if l == "shift_jis"));
    }

    #[test]
    fn latin1_maps_high_bytes_to_matching_code_points() {
        let text = TextEncoding::Latin1
            .decode(vec![b'B', 0xE9, b'b', 0xE9], Path::new("x"))
            .unwrap();
        assert_eq!(text, "Bébé");
    }

    #[test]
    fn invalid_utf8_is_a_decode_error() {
        let err = TextEncoding::Utf8
            .decode(vec![0xff, 0xfe, b'a'], Path::new("/tmp/list.m3u8"))
            .unwrap_err();
        assert!(matches!(err, MediaSyncError::Decode { encoding: "UTF-8", .. }));
    }

    #[test]
    fn ascii_rejects_non_ascii_bytes() {
        assert!(TextEncoding::Ascii.decode(b"plain".to_vec(), Path::new("x")).is_ok());
        assert!(TextEncoding::Ascii.decode(vec![0xE9], Path::new("x")).is_err());
    }
}
