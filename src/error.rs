use miette::Diagnostic;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum PixError {
    #[error("missing required field `{field}`")]
    #[diagnostic(
        code(pixqr::missing_field),
        help("payment key, beneficiary name and city must all be non-empty")
    )]
    MissingField { field: &'static str },

    #[error("invalid amount {0}: must be zero or at least 0.01")]
    #[diagnostic(code(pixqr::invalid_amount))]
    InvalidAmount(Decimal),

    #[error("field {tag} is {length} bytes long, the TLV length prefix allows at most 99")]
    #[diagnostic(code(pixqr::encoding_overflow))]
    EncodingOverflow { tag: String, length: usize },

    #[error("QR rendering failed: {0}")]
    #[diagnostic(
        code(pixqr::render),
        help("the payload text is still valid and can be copied manually")
    )]
    Render(String),

    #[error("malformed payload at byte {offset}: {reason}")]
    #[diagnostic(code(pixqr::malformed_payload))]
    MalformedPayload { offset: usize, reason: String },

    #[error("checksum mismatch: expected {expected}, found {found}")]
    #[diagnostic(code(pixqr::checksum_mismatch))]
    ChecksumMismatch { expected: String, found: String },

    #[error("CSV error: {0}")]
    #[diagnostic(code(pixqr::csv))]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    #[diagnostic(code(pixqr::io))]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    #[diagnostic(code(pixqr::json))]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PixError>;
