use clap::{Args, Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result};
use pixqr::domain::tlv::Tag;
use pixqr::interfaces::csv::order_reader::OrderReader;
use pixqr::interfaces::csv::payload_writer::{PayloadRecord, PayloadWriter};
use pixqr::{PixMerchantInfo, encode, render, verify};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encode one payment as a BR Code payload and QR image
    Encode(EncodeArgs),
    /// Encode every order of a CSV file (key,name,city,amount[,reference])
    Batch {
        /// Input orders CSV file
        input: PathBuf,
    },
    /// Check the structure and checksum of a BR Code payload
    Verify {
        payload: String,
    },
}

#[derive(Args)]
struct EncodeArgs {
    /// Pix key of the beneficiary (e-mail, phone, tax id or random key)
    #[arg(long, env = "PIX_KEY")]
    key: Option<String>,

    /// Beneficiary name shown by the payer's bank app
    #[arg(long, env = "PIX_NAME")]
    name: Option<String>,

    /// Beneficiary city
    #[arg(long, env = "PIX_CITY")]
    city: Option<String>,

    /// Amount in BRL. Omit or pass 0 for an open amount.
    #[arg(long, allow_negative_numbers = true)]
    amount: Option<Decimal>,

    /// Order reference for the additional data field
    #[arg(long)]
    reference: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Print the payload only, without rendering the QR image
    #[arg(long)]
    no_image: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Serialize)]
struct EncodeOutput<'a> {
    payload: &'a str,
    qr_png_base64: Option<String>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Encode(args) => run_encode(args),
        Command::Batch { input } => run_batch(input),
        Command::Verify { payload } => run_verify(&payload),
    }
}

fn run_encode(args: EncodeArgs) -> Result<()> {
    let key = args.key.unwrap_or_default();
    let encoded = PixMerchantInfo::new(
        key.clone(),
        args.name.unwrap_or_default(),
        args.city.unwrap_or_default(),
        args.amount.unwrap_or_default(),
    )
    .map(|info| match args.reference {
        Some(reference) => info.with_reference_label(reference),
        None => info,
    })
    .and_then(|info| encode(&info));

    let payload = match encoded {
        Ok(payload) => payload,
        Err(err) => {
            // No usable payload: point the payer at the key instead.
            if key.is_empty() {
                eprintln!("Pix QR unavailable. Contact the store for payment instructions.");
            } else {
                eprintln!("Pix QR unavailable. Pay manually using the Pix key: {key}");
            }
            return Err(err.into());
        }
    };

    // A failed render still leaves a usable copy-and-paste payload.
    let image = if args.no_image {
        None
    } else {
        match render(&payload) {
            Ok(image) => Some(image),
            Err(err) => {
                warn!(error = %err, "QR rendering failed, showing the payload text only");
                None
            }
        }
    };

    match args.format {
        OutputFormat::Text => {
            println!("{payload}");
            if let Some(image) = image {
                println!("{}", image.data_uri());
            }
        }
        OutputFormat::Json => {
            let output = EncodeOutput {
                payload: payload.as_str(),
                qr_png_base64: image.map(|image| image.to_base64()),
            };
            println!("{}", serde_json::to_string(&output).into_diagnostic()?);
        }
    }

    Ok(())
}

fn run_batch(input: PathBuf) -> Result<()> {
    let file = File::open(input).into_diagnostic()?;
    let reader = OrderReader::new(file);

    let stdout = io::stdout();
    let mut writer = PayloadWriter::new(stdout.lock());

    for (index, order) in reader.orders().enumerate() {
        let row = index as u64 + 1;
        let outcome = order
            .and_then(PixMerchantInfo::try_from)
            .and_then(|info| encode(&info));

        let record = match outcome {
            Ok(payload) => PayloadRecord::encoded(row, payload),
            Err(err) => {
                eprintln!("Error encoding order {row}: {err}");
                PayloadRecord::failed(row, &err)
            }
        };
        writer.write(&record)?;
    }

    writer.flush()?;
    Ok(())
}

fn run_verify(input: &str) -> Result<()> {
    let payload = verify(input)?;

    for field in payload.fields()? {
        println!("{} {}", field.tag(), field.value());
        if field.tag() == Tag::MERCHANT_ACCOUNT || field.tag() == Tag::ADDITIONAL_DATA {
            for child in field.children()? {
                println!("  {} {}", child.tag(), child.value());
            }
        }
    }
    println!("checksum OK ({})", payload.checksum());

    Ok(())
}
