use crate::domain::payload::BrCodePayload;
use crate::error::{PixError, Result};
use serde::Serialize;
use std::io::Write;

/// Outcome of encoding one order row.
///
/// Exactly one of `payload` and `error` is set.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct PayloadRecord {
    /// 1-based data row of the input, header excluded.
    pub row: u64,
    pub payload: Option<String>,
    pub error: Option<String>,
}

impl PayloadRecord {
    pub fn encoded(row: u64, payload: BrCodePayload) -> Self {
        Self {
            row,
            payload: Some(payload.into_string()),
            error: None,
        }
    }

    pub fn failed(row: u64, error: &PixError) -> Self {
        Self {
            row,
            payload: None,
            error: Some(error.to_string()),
        }
    }
}

/// Writes `row,payload,error` records to a CSV sink.
pub struct PayloadWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> PayloadWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write(&mut self, record: &PayloadRecord) -> Result<()> {
        self.writer.serialize(record)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
