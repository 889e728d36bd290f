use crate::error::{PixError, Result};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A non-negative payment amount with two decimal places.
///
/// Wraps `rust_decimal::Decimal` so a negative value can never reach the
/// encoder. Zero means an open amount: the payer chooses how much to send.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct TransactionAmount(Decimal);

impl TransactionAmount {
    pub const OPEN: Self = Self(Decimal::ZERO);

    /// Rounds to cents (midpoint away from zero).
    ///
    /// Rejects negatives, and positive values that would round to zero: a
    /// fixed charge must not turn into an open amount.
    pub fn new(value: Decimal) -> Result<Self> {
        if value < Decimal::ZERO {
            return Err(PixError::InvalidAmount(value));
        }
        let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        if rounded.is_zero() && !value.is_zero() {
            return Err(PixError::InvalidAmount(value));
        }
        Ok(Self(rounded))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_open(&self) -> bool {
        self.0.is_zero()
    }

    /// Two fractional digits, `.` separator, no grouping.
    pub fn to_field_value(&self) -> String {
        format!("{:.2}", self.0)
    }
}

impl TryFrom<Decimal> for TransactionAmount {
    type Error = PixError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

impl From<TransactionAmount> for Decimal {
    fn from(amount: TransactionAmount) -> Self {
        amount.0
    }
}

/// The merchant and payment data a BR Code is built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PixMerchantInfo {
    /// Pix key: e-mail, phone, tax id or random token.
    pub key: String,
    pub beneficiary_name: String,
    pub city: String,
    #[serde(default)]
    pub amount: TransactionAmount,
    /// Reference label for the additional data template. `None` encodes the
    /// `***` placeholder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_label: Option<String>,
}

impl PixMerchantInfo {
    pub fn new(
        key: impl Into<String>,
        beneficiary_name: impl Into<String>,
        city: impl Into<String>,
        amount: Decimal,
    ) -> Result<Self> {
        let info = Self {
            key: key.into(),
            beneficiary_name: beneficiary_name.into(),
            city: city.into(),
            amount: TransactionAmount::new(amount)?,
            reference_label: None,
        };
        info.validate()?;
        Ok(info)
    }

    pub fn with_reference_label(mut self, label: impl Into<String>) -> Self {
        let label = label.into();
        self.reference_label = (!label.is_empty()).then_some(label);
        self
    }

    /// Checks that every required field is present.
    ///
    /// Lengths are not checked here; the 99-byte limit is enforced when the
    /// fields are serialized.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("key", &self.key),
            ("beneficiary_name", &self.beneficiary_name),
            ("city", &self.city),
        ];
        match required.into_iter().find(|(_, value)| value.is_empty()) {
            Some((field, _)) => Err(PixError::MissingField { field }),
            None => Ok(()),
        }
    }
}
