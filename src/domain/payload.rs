use super::crc::checksum_hex;
use super::tlv::{self, Tag, TlvField};
use crate::error::{PixError, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

pub const PAYLOAD_FORMAT_VERSION: &str = "01";
pub const PIX_GUI: &str = "br.gov.bcb.pix";
pub const MERCHANT_CATEGORY_CODE: &str = "0000";
/// ISO 4217 numeric code for the Brazilian real.
pub const CURRENCY_BRL: &str = "986";
pub const COUNTRY_CODE: &str = "BR";
pub const DEFAULT_REFERENCE_LABEL: &str = "***";
pub const CHECKSUM_LEN: usize = 4;

/// A complete BR Code: TLV fields followed by the CRC16 field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BrCodePayload(String);

impl BrCodePayload {
    pub(crate) fn from_encoded(payload: String) -> Self {
        Self(payload)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// The trailing four hex digits.
    pub fn checksum(&self) -> &str {
        &self.0[self.0.len() - CHECKSUM_LEN..]
    }

    pub fn fields(&self) -> Result<Vec<TlvField>> {
        tlv::parse(&self.0)
    }

    pub fn field(&self, tag: Tag) -> Option<TlvField> {
        self.fields().ok()?.into_iter().find(|f| f.tag() == tag)
    }

    pub fn key(&self) -> Option<String> {
        self.field(Tag::MERCHANT_ACCOUNT)?
            .children()
            .ok()?
            .into_iter()
            .find(|f| f.tag() == Tag::PIX_KEY)
            .map(|f| f.value().to_owned())
    }

    pub fn merchant_name(&self) -> Option<String> {
        self.field(Tag::MERCHANT_NAME).map(|f| f.value().to_owned())
    }

    pub fn merchant_city(&self) -> Option<String> {
        self.field(Tag::MERCHANT_CITY).map(|f| f.value().to_owned())
    }

    /// `None` for an open-amount payload.
    pub fn amount(&self) -> Option<Decimal> {
        self.field(Tag::TRANSACTION_AMOUNT)?.value().parse().ok()
    }
}

impl fmt::Display for BrCodePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BrCodePayload {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for BrCodePayload {
    type Err = PixError;

    fn from_str(s: &str) -> Result<Self> {
        verify(s)
    }
}

/// Parses `payload` and checks its framing and CRC.
///
/// The payload must start with the format indicator, end with a four-digit
/// CRC field, and that CRC must match the checksum of everything before the
/// digits (the `6304` prefix included). Hex digits compare case-insensitively.
pub fn verify(payload: &str) -> Result<BrCodePayload> {
    let fields = tlv::parse(payload)?;

    match fields.first() {
        Some(f) if f.tag() == Tag::PAYLOAD_FORMAT && f.value() == PAYLOAD_FORMAT_VERSION => {}
        _ => {
            return Err(PixError::MalformedPayload {
                offset: 0,
                reason: "payload must start with the format indicator 000201".to_string(),
            });
        }
    }

    let crc = match fields.last() {
        Some(f) if f.tag() == Tag::CRC && f.value().len() == CHECKSUM_LEN => f,
        _ => {
            return Err(PixError::MalformedPayload {
                offset: payload.len().saturating_sub(CHECKSUM_LEN + 4),
                reason: "payload must end with a four-digit CRC16 field".to_string(),
            });
        }
    };

    // The last field is 4 bytes long, so this split lands on its value.
    let body = &payload[..payload.len() - CHECKSUM_LEN];
    let expected = checksum_hex(body);
    if !expected.eq_ignore_ascii_case(crc.value()) {
        return Err(PixError::ChecksumMismatch {
            expected,
            found: crc.value().to_owned(),
        });
    }

    Ok(BrCodePayload(payload.to_owned()))
}
