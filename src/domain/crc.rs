//! CRC16-CCITT as required for the trailing BR Code checksum field.
//!
//! Polynomial `0x1021`, initial register `0xFFFF`, MSB-first, no reflection
//! and no final XOR (the "CCITT-FALSE" parameterisation).

const POLY: u16 = 0x1021;
const INIT: u16 = 0xFFFF;

pub fn crc16_ccitt(data: &[u8]) -> u16 {
    data.iter().fold(INIT, |crc, &byte| {
        let mut crc = crc ^ (u16::from(byte) << 8);
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ POLY
            } else {
                crc << 1
            };
        }
        crc
    })
}

/// Checksum of `data` as four uppercase, zero-padded hex digits.
pub fn checksum_hex(data: &str) -> String {
    format!("{:04X}", crc16_ccitt(data.as_bytes()))
}
