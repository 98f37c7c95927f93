// tests/integration.rs
#![allow(deprecated)]

use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;

const CYRILLIC_KEY: &str = "алексеевалексеевалексеевалексеев";

#[test]
fn test_cli_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("gost89")?;
    cmd.arg("--help");
    cmd.assert().success();
    Ok(())
}

#[test]
fn test_cli_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("gost89")?;
    cmd.arg("--version");
    cmd.assert().success().stdout(predicates::str::contains("v0.1.0"));
    Ok(())
}

#[test]
fn test_encrypt_latin_hex() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("gost89")?;
    cmd.args(["encrypt", "hello world", "--lang", "l", "--format", "hex", "--key", CYRILLIC_KEY]);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("afaf4eb12e1355ede58bf76a65316da7"));
    Ok(())
}

#[test]
fn test_latin_characters_in_key_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("gost89")?;
    cmd.args([
        "encrypt",
        "hello world",
        "--lang",
        "l",
        "--key",
        "abcdefghijklmnopqrstuvwxyzABCDEF",
    ]);
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("cannot be encoded"));
    Ok(())
}

#[test]
fn test_decrypt_cyrillic_bin() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("gost89")?;
    cmd.args([
        "decrypt",
        "0000011010110101100010000100001011011001100110100000000100110010",
        "--lang",
        "c",
        "--format",
        "bin",
        "--key",
        CYRILLIC_KEY,
    ]);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("decrypted message in characters: кулешов "));
    Ok(())
}

#[test]
fn test_wrong_key_length_fails() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("gost89")?;
    cmd.args(["encrypt", "hello", "--lang", "l", "--key", "tooshort"]);
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("key must be exactly 32 characters"));
    Ok(())
}

#[test]
fn test_missing_key_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = assert_fs::TempDir::new()?;
    let config_file = temp_dir.child("config.toml");
    config_file.write_str("[cipher]\nlang = \"l\"\n")?;

    let mut cmd = Command::cargo_bin("gost89")?;
    cmd.args(["--config", config_file.path().to_str().unwrap(), "encrypt", "hello"]);
    cmd.assert().failure().stderr(predicates::str::contains("No key given"));
    Ok(())
}

#[test]
fn test_keygen_and_key_file_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = assert_fs::TempDir::new()?;
    let key_file = temp_dir.child("master.key");

    let mut cmd = Command::cargo_bin("gost89")?;
    cmd.args(["keygen", "--hex", "--output", key_file.path().to_str().unwrap()]);
    cmd.assert().success().stdout(predicates::str::contains("Key saved to"));
    key_file.assert(predicate::path::exists());

    // повторная генерация без --force запрещена
    let mut cmd = Command::cargo_bin("gost89")?;
    cmd.args(["keygen", "--output", key_file.path().to_str().unwrap()]);
    cmd.assert().failure();

    let config_file = temp_dir.child("config.toml");
    config_file.write_str(&format!(
        "[cipher]\nlang = \"l\"\nformat = \"hex\"\nkey_path = \"{}\"\n",
        key_file.path().display()
    ))?;
    let config_arg = config_file.path().to_str().unwrap();

    let output = Command::cargo_bin("gost89")?
        .args(["--config", config_arg, "encrypt", "attack at dawn"])
        .output()?;
    assert!(output.status.success());
    let ciphertext = String::from_utf8(output.stdout)?.trim().to_string();
    assert_eq!(ciphertext.len(), 32);

    let mut cmd = Command::cargo_bin("gost89")?;
    cmd.args(["--config", config_arg, "decrypt", &ciphertext]);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("in characters: attack at dawn  "));
    Ok(())
}

#[test]
fn test_interactive_session() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("gost89")?;
    cmd.args(["interactive", "--format", "hex"]);
    cmd.write_stdin(format!("hello world\n{}\nl\nenc\nhi\n{}\nl\nxor\n", CYRILLIC_KEY, CYRILLIC_KEY));
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("encrypted message: afaf4eb12e1355ede58bf76a65316da7"))
        .stdout(predicates::str::contains("unexpected option"));
    Ok(())
}

#[test]
fn test_init_config_and_show() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = assert_fs::TempDir::new()?;
    let config_file = temp_dir.child("gost89/config.toml");

    let mut cmd = Command::cargo_bin("gost89")?;
    cmd.args(["init-config", "--output", config_file.path().to_str().unwrap()]);
    cmd.assert().success().stdout(predicates::str::contains("Configuration saved"));
    config_file.assert(predicate::str::contains("[cipher]"));

    let mut cmd = Command::cargo_bin("gost89")?;
    cmd.args(["--config", config_file.path().to_str().unwrap(), "show-config"]);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("lang: cyrillic"))
        .stdout(predicates::str::contains("format: bin"));
    Ok(())
}
