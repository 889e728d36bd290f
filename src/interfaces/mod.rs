//! Adapters between the outside world and the encoder: CSV batches in and out.

pub mod csv;
