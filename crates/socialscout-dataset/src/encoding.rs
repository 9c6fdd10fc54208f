//! Byte-level decoding and encoding for the configured text encodings.

use std::borrow::Cow;

use socialscout_core::TextEncoding;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Strictly decodes `bytes` as `encoding`. Returns `None` on any malformed
/// sequence, or for [`TextEncoding::Utf8Bom`] when the mark is absent.
#[must_use]
pub fn decode(bytes: &[u8], encoding: TextEncoding) -> Option<String> {
    match encoding {
        TextEncoding::Utf8Bom => {
            let rest = bytes.strip_prefix(UTF8_BOM)?;
            decode_utf8(rest)
        }
        TextEncoding::Utf8 => decode_utf8(bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)),
        TextEncoding::Cp932 => encoding_rs::SHIFT_JIS
            .decode_without_bom_handling_and_without_replacement(bytes)
            .map(Cow::into_owned),
    }
}

fn decode_utf8(bytes: &[u8]) -> Option<String> {
    encoding_rs::UTF_8
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(Cow::into_owned)
}

/// Tries each encoding of `chain` in order; the first clean decode wins.
#[must_use]
pub fn decode_with_fallback(bytes: &[u8], chain: &[TextEncoding]) -> Option<(String, TextEncoding)> {
    chain
        .iter()
        .find_map(|&encoding| decode(bytes, encoding).map(|text| (text, encoding)))
}

/// Encoded bytes plus whether any character had no representation in the
/// target encoding.
pub struct Encoded {
    pub bytes: Vec<u8>,
    pub lossy: bool,
}

/// Encodes `text` as `encoding`. Characters CP932 cannot represent are
/// dropped and reported through [`Encoded::lossy`].
#[must_use]
pub fn encode(text: &str, encoding: TextEncoding) -> Encoded {
    match encoding {
        TextEncoding::Utf8Bom => {
            let mut bytes = Vec::with_capacity(UTF8_BOM.len() + text.len());
            bytes.extend_from_slice(UTF8_BOM);
            bytes.extend_from_slice(text.as_bytes());
            Encoded {
                bytes,
                lossy: false,
            }
        }
        TextEncoding::Utf8 => Encoded {
            bytes: text.as_bytes().to_vec(),
            lossy: false,
        },
        TextEncoding::Cp932 => encode_cp932(text),
    }
}

fn encode_cp932(text: &str) -> Encoded {
    let (bytes, _, had_errors) = encoding_rs::SHIFT_JIS.encode(text);
    if !had_errors {
        return Encoded {
            bytes: bytes.into_owned(),
            lossy: false,
        };
    }

    // encoding_rs substitutes numeric character references; re-encode char
    // by char so unmappable characters are dropped instead.
    let mut out = Vec::with_capacity(text.len() * 2);
    let mut buf = [0u8; 4];
    for ch in text.chars() {
        let (encoded, _, unmappable) = encoding_rs::SHIFT_JIS.encode(ch.encode_utf8(&mut buf));
        if !unmappable {
            out.extend_from_slice(&encoded);
        }
    }
    Encoded {
        bytes: out,
        lossy: true,
    }
}
