//! Log file decoding.
//!
//! Serial captures arrive as UTF-16LE (with BOM) from some terminal tools,
//! UTF-8 with or without BOM from others. Invalid sequences are replaced
//! rather than rejected.

use std::path::Path;

use tracing::debug;

use crate::error::{CliError, Result};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16LE_BOM: &[u8] = &[0xFF, 0xFE];
const REPLACEMENT_UNIT: u16 = 0xFFFD;

/// Detected text encoding of a log file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogEncoding {
    Utf16Le,
    Utf8Bom,
    Utf8,
}

/// Read a log file and decode it to text
pub fn read_log(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(CliError::log_not_found(path));
    }
    let bytes = std::fs::read(path).map_err(|e| CliError::log_read(path, e))?;
    let (encoding, text) = decode(&bytes);
    debug!(
        path = %path.display(),
        ?encoding,
        bytes = bytes.len(),
        "log decoded"
    );
    Ok(text)
}

/// Decode raw log bytes by byte-order mark
pub fn decode(bytes: &[u8]) -> (LogEncoding, String) {
    if let Some(body) = bytes.strip_prefix(UTF16LE_BOM) {
        let units: Vec<u16> = body
            .chunks(2)
            .map(|pair| match pair {
                [lo, hi] => u16::from_le_bytes([*lo, *hi]),
                // odd trailing byte
                _ => REPLACEMENT_UNIT,
            })
            .collect();
        (LogEncoding::Utf16Le, String::from_utf16_lossy(&units))
    } else if let Some(body) = bytes.strip_prefix(UTF8_BOM) {
        (
            LogEncoding::Utf8Bom,
            String::from_utf8_lossy(body).into_owned(),
        )
    } else {
        (LogEncoding::Utf8, String::from_utf8_lossy(bytes).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn utf16le_with_bom(text: &str) -> Vec<u8> {
        let mut bytes = UTF16LE_BOM.to_vec();
        for unit in text.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        bytes
    }

    #[test]
    fn test_decode_utf16le() {
        let bytes = utf16le_with_bom("I (10) MOTOR_TASK: Cycle starts ACTIVE\r\n");
        let (encoding, text) = decode(&bytes);
        assert_eq!(encoding, LogEncoding::Utf16Le);
        assert_eq!(text, "I (10) MOTOR_TASK: Cycle starts ACTIVE\r\n");
    }

    #[test]
    fn test_decode_utf8_bom_and_plain() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice("rtt=5 μs".as_bytes());
        assert_eq!(decode(&bytes), (LogEncoding::Utf8Bom, "rtt=5 μs".to_string()));

        let (encoding, text) = decode(b"abc\xffdef");
        assert_eq!(encoding, LogEncoding::Utf8);
        assert_eq!(text, "abc\u{FFFD}def");
    }

    #[test]
    fn test_decode_odd_utf16_tail() {
        let mut bytes = utf16le_with_bom("ok");
        bytes.push(0x41);
        let (_, text) = decode(&bytes);
        assert_eq!(text, "ok\u{FFFD}");
    }

    #[test]
    fn test_read_log_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&utf16le_with_bom("line one\nline two\n"))
            .unwrap();

        let text = read_log(file.path()).unwrap();
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn test_read_missing_log() {
        let err = read_log(Path::new("/definitely/not/here.log")).unwrap_err();
        assert!(matches!(err, CliError::LogNotFound { .. }));
    }
}
