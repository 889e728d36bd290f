use crate::error::{PixError, Result};
use std::fmt;

/// Largest value a two-digit decimal length prefix can describe.
pub const MAX_VALUE_LEN: usize = 99;

/// A two-digit EMV field identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(u8);

impl Tag {
    pub const PAYLOAD_FORMAT: Self = Self(0);
    pub const MERCHANT_ACCOUNT: Self = Self(26);
    pub const MERCHANT_CATEGORY_CODE: Self = Self(52);
    pub const TRANSACTION_CURRENCY: Self = Self(53);
    pub const TRANSACTION_AMOUNT: Self = Self(54);
    pub const COUNTRY_CODE: Self = Self(58);
    pub const MERCHANT_NAME: Self = Self(59);
    pub const MERCHANT_CITY: Self = Self(60);
    pub const ADDITIONAL_DATA: Self = Self(62);
    pub const CRC: Self = Self(63);

    // Sub-tags inside the merchant account template (26).
    pub const GUI: Self = Self(0);
    pub const PIX_KEY: Self = Self(1);

    // Sub-tag inside the additional data template (62).
    pub const REFERENCE_LABEL: Self = Self(5);
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

/// A single Tag-Length-Value field.
///
/// The value is kept as text. Templates (tags 26 and 62) carry the already
/// serialized sub-fields as their value, so the outer length is the byte
/// length of the whole inner string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlvField {
    tag: Tag,
    value: String,
}

impl TlvField {
    /// Creates a field, rejecting values the length prefix cannot describe.
    pub fn new(tag: Tag, value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.len() > MAX_VALUE_LEN {
            return Err(PixError::EncodingOverflow {
                tag: tag.to_string(),
                length: value.len(),
            });
        }
        Ok(Self { tag, value })
    }

    /// Creates a template field whose value is the concatenation of `children`.
    pub fn template(tag: Tag, children: &[TlvField]) -> Result<Self> {
        let inner: String = children.iter().map(ToString::to_string).collect();
        Self::new(tag, inner)
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Parses the value as nested sub-fields.
    pub fn children(&self) -> Result<Vec<TlvField>> {
        parse(&self.value)
    }
}

impl fmt::Display for TlvField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:02}{}", self.tag, self.value.len(), self.value)
    }
}

/// Splits `input` into consecutive top-level fields.
pub fn parse(input: &str) -> Result<Vec<TlvField>> {
    let bytes = input.as_bytes();
    let mut fields = Vec::new();
    let mut offset = 0;

    while offset < bytes.len() {
        let header = bytes
            .get(offset..offset + 4)
            .ok_or_else(|| malformed(offset, "truncated field header"))?;
        let tag = two_digits(&header[..2])
            .ok_or_else(|| malformed(offset, "tag is not two decimal digits"))?;
        let len = two_digits(&header[2..])
            .ok_or_else(|| malformed(offset + 2, "length is not two decimal digits"))?;

        let start = offset + 4;
        let end = start + usize::from(len);
        let value = input
            .get(start..end)
            .ok_or_else(|| malformed(start, "value runs past the end of the input"))?;

        fields.push(TlvField {
            tag: Tag(tag),
            value: value.to_owned(),
        });
        offset = end;
    }

    Ok(fields)
}

fn two_digits(bytes: &[u8]) -> Option<u8> {
    match bytes {
        [hi @ b'0'..=b'9', lo @ b'0'..=b'9'] => Some((hi - b'0') * 10 + (lo - b'0')),
        _ => None,
    }
}

fn malformed(offset: usize, reason: &str) -> PixError {
    PixError::MalformedPayload {
        offset,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_serialization_pads_length() {
        let field = TlvField::new(Tag::COUNTRY_CODE, "BR").unwrap();
        assert_eq!(field.to_string(), "5802BR");
    }

    #[test]
    fn test_length_counts_utf8_bytes() {
        // "SÃO" is three characters but four bytes.
        let field = TlvField::new(Tag::MERCHANT_CITY, "SÃO").unwrap();
        assert_eq!(field.to_string(), "6004SÃO");
    }

    #[test]
    fn test_template_wraps_serialized_children() {
        let gui = TlvField::new(Tag::GUI, "br.gov.bcb.pix").unwrap();
        let key = TlvField::new(Tag::PIX_KEY, "test@pix.com").unwrap();
        let account = TlvField::template(Tag::MERCHANT_ACCOUNT, &[gui, key]).unwrap();
        assert_eq!(
            account.to_string(),
            "26340014br.gov.bcb.pix0112test@pix.com"
        );
    }

    #[test]
    fn test_value_at_capacity_is_accepted() {
        assert!(TlvField::new(Tag::MERCHANT_NAME, "x".repeat(99)).is_ok());
    }

    #[test]
    fn test_value_over_capacity_is_rejected() {
        let result = TlvField::new(Tag::MERCHANT_NAME, "x".repeat(100));
        assert!(matches!(
            result,
            Err(PixError::EncodingOverflow { ref tag, length: 100 }) if tag == "59"
        ));
    }

    #[test]
    fn test_template_overflow_is_rejected() {
        let key = TlvField::new(Tag::PIX_KEY, "k".repeat(90)).unwrap();
        let gui = TlvField::new(Tag::GUI, "br.gov.bcb.pix").unwrap();
        assert!(matches!(
            TlvField::template(Tag::MERCHANT_ACCOUNT, &[gui, key]),
            Err(PixError::EncodingOverflow { .. })
        ));
    }

    #[test]
    fn test_parse_nested_fields() {
        let fields = parse("00020126340014br.gov.bcb.pix0112test@pix.com").unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].tag(), Tag::PAYLOAD_FORMAT);
        assert_eq!(fields[0].value(), "01");

        let children = fields[1].children().unwrap();
        assert_eq!(children[0].value(), "br.gov.bcb.pix");
        assert_eq!(children[1].tag(), Tag::PIX_KEY);
        assert_eq!(children[1].value(), "test@pix.com");
    }

    #[test]
    fn test_parse_truncated_value() {
        assert!(matches!(
            parse("5905JOAO"),
            Err(PixError::MalformedPayload { offset: 4, .. })
        ));
    }

    #[test]
    fn test_parse_truncated_header() {
        assert!(matches!(
            parse("000201590"),
            Err(PixError::MalformedPayload { offset: 6, .. })
        ));
    }

    #[test]
    fn test_parse_non_numeric_length() {
        assert!(matches!(
            parse("59XXJOAO"),
            Err(PixError::MalformedPayload { offset: 2, .. })
        ));
    }

    #[test]
    fn test_parse_rejects_split_character() {
        // A length of 2 would cut "Ã" (two bytes) in half.
        assert!(parse("6002SÃ").is_err());
    }
}
