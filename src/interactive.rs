// src/interactive.rs
//! Интерактивный цикл: сообщение, ключ, режим языка, операция.

use crate::config::Config;
use crate::crypto::{Direction, GostCipher};
use crate::text::{self, BlockFormat, LangMode};
use anyhow::Result;
use log::debug;
use std::io::{BufRead, Write};

#[derive(Debug, Clone)]
pub struct Settings {
    pub lang: LangMode,
    pub format: BlockFormat,
    pub prompt_lang: bool,
    pub echo_cleartext: bool,
}

impl Settings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            lang: config.cipher.lang,
            format: config.cipher.format,
            prompt_lang: config.interactive.prompt_lang,
            echo_cleartext: config.interactive.echo_cleartext,
        }
    }
}

/// Печатает вопрос и читает строку. `None` - конец ввода.
fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<Option<String>> {
    write!(output, "{}", question)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

pub fn run_session<R: BufRead, W: Write>(mut input: R, mut output: W, settings: &Settings) -> Result<()> {
    loop {
        let Some(message) = ask(
            &mut input,
            &mut output,
            "message to encrypt/decrypt (max 64 bit - 8 characters): ",
        )?
        else {
            break;
        };
        if matches!(message.trim(), "quit" | "exit") {
            break;
        }

        let Some(key) = ask(
            &mut input,
            &mut output,
            "encryption key (max 256 bit - 32 characters): ",
        )?
        else {
            break;
        };

        let lang = if settings.prompt_lang {
            let Some(answer) = ask(
                &mut input,
                &mut output,
                "choose language mode (c: cyrillic, l: latin): ",
            )?
            else {
                break;
            };
            match answer.parse::<LangMode>() {
                Ok(lang) => lang,
                Err(e) => {
                    writeln!(output, "{}\ntry again", e)?;
                    continue;
                }
            }
        } else {
            settings.lang
        };

        let Some(mode) = ask(
            &mut input,
            &mut output,
            "choose mode (enc: encrypting, dec: decryption): ",
        )?
        else {
            break;
        };
        let direction = match mode.parse::<Direction>() {
            Ok(direction) => direction,
            Err(_) => {
                writeln!(output, "unexpected option\ntry again")?;
                continue;
            }
        };

        if let Err(e) = step(&mut output, settings, &message, &key, lang, direction) {
            debug!("interactive step failed: {:#}", e);
            writeln!(output, "error: {}\ntry again", e)?;
        }
    }

    writeln!(output)?;
    Ok(())
}

fn step<W: Write>(
    output: &mut W,
    settings: &Settings,
    message: &str,
    key: &str,
    lang: LangMode,
    direction: Direction,
) -> Result<()> {
    let cipher = GostCipher::new(text::key_from_text(key)?);

    match direction {
        Direction::Encrypt => {
            let blocks = text::split_into_blocks(message, lang)?;
            if settings.echo_cleartext {
                for block in &blocks {
                    writeln!(output, "cleartext: {:064b}", block)?;
                }
            }
            let encrypted = cipher.encrypt_blocks(&blocks);
            writeln!(
                output,
                "encrypted message: {}\n",
                text::format_blocks(&encrypted, settings.format)
            )?;
        }
        Direction::Decrypt => {
            let blocks = text::parse_blocks(message, settings.format)?;
            let decrypted = cipher.decrypt_blocks(&blocks);
            writeln!(
                output,
                "\ndecrypted message: {}",
                text::format_blocks(&decrypted, BlockFormat::Bin)
            )?;
            writeln!(
                output,
                "decrypted message in characters: {}\n",
                text::join_blocks(&decrypted, lang)
            )?;
        }
    }

    Ok(())
}
