// src/column/text.rs

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};

use super::value::{Input, Value};
use crate::error::ConversionError;

/// Raw bytes must already be UTF-8 for plain string columns.
pub(crate) fn parse_string(input: Input<'_>) -> Result<Value, ConversionError> {
    match input {
        Input::Text(s) => Ok(Value::Str(s.to_string())),
        Input::Bytes(b) => std::str::from_utf8(b)
            .map(|s| Value::Str(s.to_string()))
            .map_err(|_| ConversionError::Undecodable {
                encoding: UTF_8.name(),
                raw: String::from_utf8_lossy(b).into_owned(),
            }),
        Input::Value(v @ Value::Str(_)) => Ok(v),
        Input::Value(other) => Err(mismatch(&other)),
    }
}

pub(crate) fn serialize_string(value: &Value) -> Result<String, ConversionError> {
    match value {
        Value::Str(s) => Ok(s.clone()),
        other => Err(mismatch(other)),
    }
}

/// Decode raw bytes with `encoding`. A leading byte-order mark wins over the
/// configured encoding and is stripped; malformed sequences are an error
/// rather than being replaced.
pub(crate) fn parse_unicode(
    encoding: &'static Encoding,
    input: Input<'_>,
) -> Result<Value, ConversionError> {
    match input {
        Input::Bytes(bytes) => {
            let (enc, body) = match Encoding::for_bom(bytes) {
                Some((sniffed, bom_len)) => (sniffed, &bytes[bom_len..]),
                None => (encoding, bytes),
            };
            enc.decode_without_bom_handling_and_without_replacement(body)
                .map(|text| Value::Str(text.into_owned()))
                .ok_or_else(|| ConversionError::Undecodable {
                    encoding: enc.name(),
                    raw: String::from_utf8_lossy(bytes).into_owned(),
                })
        }
        other => parse_string(other),
    }
}

/// Encode text with `encoding`. UTF-16 output is prefixed with its byte-order
/// mark so it decodes unambiguously.
pub(crate) fn encode_unicode(
    encoding: &'static Encoding,
    value: &Value,
) -> Result<Vec<u8>, ConversionError> {
    let text = match value {
        Value::Str(s) => s,
        other => return Err(mismatch(other)),
    };

    if encoding == UTF_16LE || encoding == UTF_16BE {
        let little = encoding == UTF_16LE;
        let mut out = Vec::with_capacity(2 + text.len() * 2);
        let bom: [u8; 2] = if little { [0xFF, 0xFE] } else { [0xFE, 0xFF] };
        out.extend_from_slice(&bom);
        for unit in text.encode_utf16() {
            let bytes = if little {
                unit.to_le_bytes()
            } else {
                unit.to_be_bytes()
            };
            out.extend_from_slice(&bytes);
        }
        return Ok(out);
    }

    let (bytes, used, had_errors) = encoding.encode(text);
    if had_errors || used != encoding {
        return Err(ConversionError::Unencodable {
            encoding: encoding.name(),
            text: text.clone(),
        });
    }
    Ok(bytes.into_owned())
}

fn mismatch(found: &Value) -> ConversionError {
    ConversionError::TypeMismatch {
        expected: "string",
        found: found.type_name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPINAL_TAP: &str = "Spin\u{308}al Tap";

    #[test]
    fn utf8_round_trip() {
        let raw = b"Spin\xcc\x88al Tap";
        let v = parse_unicode(UTF_8, Input::Bytes(raw)).unwrap();
        assert_eq!(v, Value::Str(SPINAL_TAP.into()));
        assert_eq!(encode_unicode(UTF_8, &v).unwrap(), raw.to_vec());
    }

    #[test]
    fn utf16_round_trip_with_bom() {
        let raw: &[u8] = b"\xff\xfeS\x00p\x00i\x00n\x00\x08\x03a\x00l\x00 \x00T\x00a\x00p\x00";
        let v = parse_unicode(UTF_16LE, Input::Bytes(raw)).unwrap();
        assert_eq!(v, Value::Str(SPINAL_TAP.into()));
        assert_eq!(encode_unicode(UTF_16LE, &v).unwrap(), raw.to_vec());
    }

    #[test]
    fn bom_overrides_configured_order() {
        let raw: &[u8] = b"\xfe\xff\x00h\x00i";
        let v = parse_unicode(UTF_16LE, Input::Bytes(raw)).unwrap();
        assert_eq!(v, Value::Str("hi".into()));
    }

    #[test]
    fn malformed_bytes_are_rejected() {
        let err = parse_unicode(UTF_8, Input::Bytes(b"\xff\x00abc")).unwrap_err();
        assert!(matches!(err, ConversionError::Undecodable { .. }));
        assert!(parse_string(Input::Bytes(b"\xc3\x28")).is_err());
    }

    #[test]
    fn unencodable_text_is_an_error() {
        let latin1 = Encoding::for_label(b"latin1").unwrap();
        let err = encode_unicode(latin1, &Value::Str("snow \u{2603}".into())).unwrap_err();
        assert!(matches!(err, ConversionError::Unencodable { .. }));
        assert_eq!(
            encode_unicode(latin1, &Value::Str("caf\u{e9}".into())).unwrap(),
            b"caf\xe9".to_vec()
        );
    }

    #[test]
    fn non_text_values_mismatch() {
        assert!(matches!(
            parse_string(Input::Value(Value::Int(1))),
            Err(ConversionError::TypeMismatch { .. })
        ));
        assert!(serialize_string(&Value::Bool(true)).is_err());
    }
}
