use crate::domain::merchant::PixMerchantInfo;
use crate::error::{PixError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use std::io::Read;
use std::str::FromStr;

/// One row of an orders CSV: `key,name,city,amount[,reference]`.
///
/// An empty or missing amount is an open-amount payment.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct OrderRecord {
    pub key: String,
    pub name: String,
    pub city: String,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub reference: Option<String>,
}

/// Parses the amount from the raw field text.
///
/// Deserializing `Decimal` directly lets csv hand over an `f64` for numeric
/// looking fields, which drops digits past f64 precision.
fn deserialize_amount<'de, D>(deserializer: D) -> std::result::Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(text) if !text.is_empty() => Decimal::from_str(&text)
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

impl TryFrom<OrderRecord> for PixMerchantInfo {
    type Error = PixError;

    fn try_from(record: OrderRecord) -> Result<Self> {
        let info = PixMerchantInfo::new(
            record.key,
            record.name,
            record.city,
            record.amount.unwrap_or_default(),
        )?;
        Ok(match record.reference {
            Some(reference) => info.with_reference_label(reference),
            None => info,
        })
    }
}

/// Reads orders from a CSV source.
///
/// Wraps `csv::Reader` with whitespace trimming and flexible record lengths,
/// so the optional trailing columns may be left out.
pub struct OrderReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> OrderReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily deserializes orders, one `Result` per row.
    pub fn orders(self) -> impl Iterator<Item = Result<OrderRecord>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(PixError::from))
    }
}
