//! Transfer metadata carried by block 0 as a JSON object.

use serde::{Deserialize, Serialize};

use crate::error::MetadataError;

/// File identity and chunking announced by the broadcaster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferMetadata {
    pub file_name: String,
    pub file_length: u64,
    /// Payload size of a full data block. Informational; placement uses each block's own offset.
    pub block_size: u32,
    /// Data blocks are numbered 1..=last_block_index.
    pub last_block_index: u32,
}

impl TransferMetadata {
    /// Whether `other` describes the same file (name and declared length).
    pub fn same_file(&self, other: &TransferMetadata) -> bool {
        self.file_name == other.file_name && self.file_length == other.file_length
    }

    /// Serialize to the block-0 payload form.
    pub fn to_payload(&self) -> Vec<u8> {
        // Plain struct of strings and integers; serialization cannot fail.
        serde_json::to_vec(self).unwrap_or_default()
    }
}

/// Parse a block-0 payload. All four fields are required; unknown fields are ignored.
pub fn parse_metadata(payload: &[u8]) -> Result<TransferMetadata, MetadataError> {
    let text = std::str::from_utf8(payload)?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let meta: TransferMetadata = serde_json::from_str(text.trim())?;
    if meta.file_name.is_empty() {
        return Err(MetadataError::EmptyFileName);
    }
    Ok(meta)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_fields() {
        let meta = parse_metadata(
            br#"{"fileName":"a.bin","fileLength":20,"blockSize":10,"lastBlockIndex":2}"#,
        )
        .unwrap();
        assert_eq!(
            meta,
            TransferMetadata {
                file_name: "a.bin".into(),
                file_length: 20,
                block_size: 10,
                last_block_index: 2,
            }
        );
    }

    #[test]
    fn ignores_unknown_fields_and_whitespace() {
        let meta = parse_metadata(
            "\u{feff}  {\"fileName\":\"r\u{e9}sum\u{e9}.pdf\",\"fileLength\":1,\"blockSize\":1,\"lastBlockIndex\":1,\"mime\":\"x\"}\n"
                .as_bytes(),
        )
        .unwrap();
        assert_eq!(meta.file_name, "r\u{e9}sum\u{e9}.pdf");
    }

    #[test]
    fn missing_field_is_malformed() {
        let err = parse_metadata(br#"{"fileName":"a","fileLength":20,"blockSize":10}"#).unwrap_err();
        assert!(matches!(err, MetadataError::Json(_)));
    }

    #[test]
    fn non_numeric_length_is_malformed() {
        for payload in [
            &br#"{"fileName":"a","fileLength":"20","blockSize":10,"lastBlockIndex":2}"#[..],
            &br#"{"fileName":"a","fileLength":-1,"blockSize":10,"lastBlockIndex":2}"#[..],
            &br#"{"fileName":"a","fileLength":2.5,"blockSize":10,"lastBlockIndex":2}"#[..],
            &br#"{"fileName":"a","fileLength":20,"blockSize":10,"lastBlockIndex":4294967296}"#[..],
        ] {
            assert!(matches!(parse_metadata(payload), Err(MetadataError::Json(_))));
        }
    }

    #[test]
    fn not_utf8_is_malformed() {
        assert!(matches!(
            parse_metadata(&[0x7b, 0xff, 0xfe, 0x7d]),
            Err(MetadataError::NotUtf8(_))
        ));
    }

    #[test]
    fn not_json_is_malformed() {
        assert!(matches!(parse_metadata(b"hello"), Err(MetadataError::Json(_))));
        assert!(matches!(parse_metadata(b""), Err(MetadataError::Json(_))));
    }

    #[test]
    fn empty_file_name_rejected() {
        assert!(matches!(
            parse_metadata(br#"{"fileName":"","fileLength":1,"blockSize":1,"lastBlockIndex":1}"#),
            Err(MetadataError::EmptyFileName)
        ));
    }

    #[test]
    fn to_payload_parses_back() {
        let meta = TransferMetadata {
            file_name: "photo.jpg".into(),
            file_length: 12345,
            block_size: 512,
            last_block_index: 25,
        };
        assert_eq!(parse_metadata(&meta.to_payload()).unwrap(), meta);
    }
}
