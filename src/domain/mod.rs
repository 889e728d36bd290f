//! Domain layer: the BR Code data model and its wire format.
//!
//! `tlv` implements the EMV Tag-Length-Value grammar, `crc` the trailing
//! checksum, and `payload` the finished, verifiable payload string.

pub mod crc;
pub mod merchant;
pub mod payload;
pub mod tlv;
