//! Application layer: the two pure transforms callers use.
//!
//! `encoder` builds the BR Code payload from merchant data and `renderer`
//! turns a finished payload into a PNG QR code.

pub mod encoder;
pub mod renderer;
