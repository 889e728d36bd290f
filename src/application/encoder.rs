use crate::domain::crc::checksum_hex;
use crate::domain::merchant::PixMerchantInfo;
use crate::domain::payload::{
    BrCodePayload, CHECKSUM_LEN, COUNTRY_CODE, CURRENCY_BRL, DEFAULT_REFERENCE_LABEL,
    MERCHANT_CATEGORY_CODE, PAYLOAD_FORMAT_VERSION, PIX_GUI,
};
use crate::domain::tlv::{Tag, TlvField};
use crate::error::Result;
use tracing::debug;

/// Builds the BR Code payload for `info`.
///
/// Fields are emitted in the order scanners expect: format indicator,
/// merchant account, category, currency, amount (skipped for open amounts),
/// country, name, city, additional data, and finally the CRC16 field. The
/// checksum covers every preceding character including the `6304` prefix of
/// its own field.
///
/// # Errors
///
/// * `MissingField` if the key, beneficiary name or city is empty.
/// * `EncodingOverflow` if any value, nested templates included, is longer
///   than 99 bytes.
pub fn encode(info: &PixMerchantInfo) -> Result<BrCodePayload> {
    info.validate()?;

    let merchant_account = TlvField::template(
        Tag::MERCHANT_ACCOUNT,
        &[
            TlvField::new(Tag::GUI, PIX_GUI)?,
            TlvField::new(Tag::PIX_KEY, info.key.as_str())?,
        ],
    )?;

    let reference_label = info
        .reference_label
        .as_deref()
        .unwrap_or(DEFAULT_REFERENCE_LABEL);
    let additional_data = TlvField::template(
        Tag::ADDITIONAL_DATA,
        &[TlvField::new(Tag::REFERENCE_LABEL, reference_label)?],
    )?;

    let mut fields = vec![
        TlvField::new(Tag::PAYLOAD_FORMAT, PAYLOAD_FORMAT_VERSION)?,
        merchant_account,
        TlvField::new(Tag::MERCHANT_CATEGORY_CODE, MERCHANT_CATEGORY_CODE)?,
        TlvField::new(Tag::TRANSACTION_CURRENCY, CURRENCY_BRL)?,
    ];
    if !info.amount.is_open() {
        fields.push(TlvField::new(
            Tag::TRANSACTION_AMOUNT,
            info.amount.to_field_value(),
        )?);
    }
    fields.extend([
        TlvField::new(Tag::COUNTRY_CODE, COUNTRY_CODE)?,
        TlvField::new(Tag::MERCHANT_NAME, info.beneficiary_name.as_str())?,
        TlvField::new(Tag::MERCHANT_CITY, info.city.as_str())?,
        additional_data,
    ]);

    let mut payload: String = fields.iter().map(ToString::to_string).collect();
    payload.push_str(&format!("{}{:02}", Tag::CRC, CHECKSUM_LEN));
    let checksum = checksum_hex(&payload);
    payload.push_str(&checksum);

    debug!(
        bytes = payload.len(),
        open_amount = info.amount.is_open(),
        %checksum,
        "encoded BR Code payload"
    );

    Ok(BrCodePayload::from_encoded(payload))
}
