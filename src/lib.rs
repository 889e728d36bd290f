//! Pix BR Code generation.
//!
//! [`encode`] turns a [`PixMerchantInfo`] into the EMV-style TLV payload
//! with its CRC16 checksum, [`render`] turns that payload into a PNG QR code,
//! and [`verify`] parses a payload back and checks it.

pub mod application;
pub mod domain;
pub mod error;
pub mod interfaces;

pub use application::encoder::encode;
pub use application::renderer::{QrImage, RenderOptions, render, render_with};
pub use domain::merchant::{PixMerchantInfo, TransactionAmount};
pub use domain::payload::{BrCodePayload, verify};
pub use error::{PixError, Result};
