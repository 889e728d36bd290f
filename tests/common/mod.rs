#![allow(dead_code)]

use std::fs::File;
use std::io::Error;
use std::path::Path;

pub const KEY: &str = "test@pix.com";
pub const NAME: &str = "JOAO SILVA";
pub const CITY: &str = "SAO PAULO";

/// Expected payload for KEY / NAME / CITY and an amount of 10.50.
pub const SAMPLE_PAYLOAD: &str = "00020126340014br.gov.bcb.pix0112test@pix.com520400005303986540510.505802BR5910JOAO SILVA6009SAO PAULO62070503***6304019E";

/// Writes an orders CSV with `rows` valid orders, amounts 1.00, 2.00, ...
pub fn generate_orders_csv(path: &Path, rows: usize) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(["key", "name", "city", "amount", "reference"])?;
    for i in 1..=rows {
        wtr.write_record([
            KEY,
            NAME,
            CITY,
            format!("{i}.00").as_str(),
            format!("PEDIDO{i}").as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
