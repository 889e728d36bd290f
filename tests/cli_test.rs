use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

mod common;

fn pixqr() -> Command {
    let mut cmd = Command::new(cargo_bin!("pixqr"));
    cmd.env_remove("PIX_KEY")
        .env_remove("PIX_NAME")
        .env_remove("PIX_CITY")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_encode_text() {
    pixqr()
        .args(["encode", "--key", common::KEY, "--name", common::NAME])
        .args(["--city", common::CITY, "--amount", "10.50"])
        .assert()
        .success()
        .stdout(predicate::str::contains(common::SAMPLE_PAYLOAD))
        .stdout(predicate::str::contains("data:image/png;base64,iVBOR"));
}

#[test]
fn test_cli_encode_reads_environment() {
    pixqr()
        .env("PIX_KEY", common::KEY)
        .env("PIX_NAME", common::NAME)
        .env("PIX_CITY", common::CITY)
        .args(["encode", "--amount", "10.50", "--no-image"])
        .assert()
        .success()
        .stdout(predicate::str::diff(format!("{}\n", common::SAMPLE_PAYLOAD)));
}

#[test]
fn test_cli_encode_json() -> Result<(), Box<dyn std::error::Error>> {
    let output = pixqr()
        .args(["encode", "--key", common::KEY, "--name", common::NAME])
        .args(["--city", common::CITY, "--amount", "10.50", "--format", "json"])
        .output()?;
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(json["payload"], common::SAMPLE_PAYLOAD);
    assert!(json["qr_png_base64"].as_str().is_some_and(|s| !s.is_empty()));
    Ok(())
}

#[test]
fn test_cli_encode_missing_city_falls_back_to_manual_key() {
    pixqr()
        .args(["encode", "--key", common::KEY, "--name", common::NAME])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Pay manually using the Pix key: test@pix.com",
        ))
        .stderr(predicate::str::contains("missing required field `city`"));
}

#[test]
fn test_cli_encode_negative_amount() {
    pixqr()
        .args(["encode", "--key", common::KEY, "--name", common::NAME])
        .args(["--city", common::CITY, "--amount=-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid amount -1"));
}

#[test]
fn test_cli_encode_negative_amount_as_separate_value() {
    pixqr()
        .args(["encode", "--key", common::KEY, "--name", common::NAME])
        .args(["--city", common::CITY, "--amount", "-5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Pay manually using the Pix key: test@pix.com",
        ))
        .stderr(predicate::str::contains("invalid amount -5"));
}

#[test]
fn test_cli_encode_sub_cent_amount_is_rejected() {
    pixqr()
        .args(["encode", "--key", common::KEY, "--name", common::NAME])
        .args(["--city", common::CITY, "--amount", "0.004", "--no-image"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("invalid amount 0.004"));
}

#[test]
fn test_cli_verify_valid_payload() {
    pixqr()
        .args(["verify", common::SAMPLE_PAYLOAD])
        .assert()
        .success()
        .stdout(predicate::str::contains("59 JOAO SILVA"))
        .stdout(predicate::str::contains("  01 test@pix.com"))
        .stdout(predicate::str::contains("checksum OK (019E)"));
}

#[test]
fn test_cli_verify_tampered_payload() {
    let tampered = common::SAMPLE_PAYLOAD.replace("JOAO", "JOSE");
    pixqr()
        .args(["verify", &tampered])
        .assert()
        .failure()
        .stderr(predicate::str::contains("checksum mismatch"));
}
