// src/text.rs
//! Текстовый слой: символы <-> байты, разбиение сообщения на 64-битные блоки,
//! отображение шифртекста.
//!
//! Каждый символ кодируется ровно одним байтом. Пробел всегда кодируется
//! как `0b0001_0000`.

use crate::crypto::{BLOCK_SIZE, KEY_SIZE};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const SPACE_CODE: u8 = 0b0001_0000;

const CYRILLIC_OFFSET: u32 = 880;
const LATIN_OFFSET: u32 = 100;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TextError {
    #[error("character '{ch}' cannot be encoded in {mode} mode")]
    UnencodableChar { ch: char, mode: LangMode },

    #[error("key must be exactly 32 characters (256 bit), got {actual}")]
    KeyLength { actual: usize },

    #[error("hex key must be exactly 64 hex digits")]
    HexKey,

    #[error("ciphertext length {actual} is not a multiple of {width}")]
    CiphertextLength { actual: usize, width: usize },

    #[error("invalid digit '{0}' in ciphertext")]
    InvalidDigit(char),

    #[error("unknown language mode '{0}': expected 'c' or 'l'")]
    UnknownMode(String),

    #[error("unknown block format '{0}': expected 'bin' or 'hex'")]
    UnknownFormat(String),
}

/// Режим языка сообщения
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LangMode {
    #[default]
    #[serde(rename = "c")]
    Cyrillic,
    #[serde(rename = "l")]
    Latin,
}

impl FromStr for LangMode {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "c" | "cyrillic" => Ok(LangMode::Cyrillic),
            "l" | "latin" => Ok(LangMode::Latin),
            other => Err(TextError::UnknownMode(other.to_string())),
        }
    }
}

impl fmt::Display for LangMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LangMode::Cyrillic => write!(f, "cyrillic"),
            LangMode::Latin => write!(f, "latin"),
        }
    }
}

impl LangMode {
    pub fn encode_char(self, ch: char) -> Result<u8, TextError> {
        if ch == ' ' {
            return Ok(SPACE_CODE);
        }

        let cp = ch as u32;
        let code = match self {
            LangMode::Cyrillic => cp.checked_sub(CYRILLIC_OFFSET),
            LangMode::Latin => cp.checked_add(LATIN_OFFSET),
        };

        match code {
            Some(c) if c <= u8::MAX as u32 && c != SPACE_CODE as u32 => Ok(c as u8),
            _ => Err(TextError::UnencodableChar { ch, mode: self }),
        }
    }

    pub fn decode_byte(self, byte: u8) -> Option<char> {
        if byte == SPACE_CODE {
            return Some(' ');
        }

        let cp = match self {
            LangMode::Cyrillic => Some(byte as u32 + CYRILLIC_OFFSET),
            LangMode::Latin => (byte as u32).checked_sub(LATIN_OFFSET),
        };
        cp.and_then(char::from_u32)
    }

    /// Алфавит для генерации ключей
    pub fn alphabet(self) -> Vec<char> {
        match self {
            LangMode::Cyrillic => ('а'..='я').chain('А'..='Я').collect(),
            LangMode::Latin => ('a'..='z').chain('A'..='Z').chain('0'..='9').collect(),
        }
    }
}

/// Формат отображения зашифрованных блоков
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockFormat {
    #[default]
    Bin,
    Hex,
}

impl FromStr for BlockFormat {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bin" | "binary" => Ok(BlockFormat::Bin),
            "hex" => Ok(BlockFormat::Hex),
            other => Err(TextError::UnknownFormat(other.to_string())),
        }
    }
}

impl BlockFormat {
    fn width(self) -> usize {
        match self {
            BlockFormat::Bin => 64,
            BlockFormat::Hex => 16,
        }
    }

    fn radix(self) -> u32 {
        match self {
            BlockFormat::Bin => 2,
            BlockFormat::Hex => 16,
        }
    }
}

pub fn encode_text(text: &str, mode: LangMode) -> Result<Vec<u8>, TextError> {
    text.chars().map(|ch| mode.encode_char(ch)).collect()
}

/// Байты, не имеющие обратного отображения, заменяются на U+FFFD
pub fn decode_bytes(bytes: &[u8], mode: LangMode) -> String {
    bytes
        .iter()
        .map(|&b| {
            mode.decode_byte(b).unwrap_or_else(|| {
                warn!("byte {:#04x} has no {} character", b, mode);
                char::REPLACEMENT_CHARACTER
            })
        })
        .collect()
}

/// Разбивает сообщение на блоки по 8 символов, дополняя последний пробелами.
/// Первый символ блока попадает в старший байт (левую половину).
pub fn split_into_blocks(text: &str, mode: LangMode) -> Result<Vec<u64>, TextError> {
    let mut codes = encode_text(text, mode)?;
    if codes.is_empty() || codes.len() % BLOCK_SIZE != 0 {
        let padded = codes.len().div_ceil(BLOCK_SIZE).max(1) * BLOCK_SIZE;
        codes.resize(padded, SPACE_CODE);
    }

    Ok(codes
        .chunks_exact(BLOCK_SIZE)
        .map(|chunk| {
            let mut bytes = [0u8; BLOCK_SIZE];
            bytes.copy_from_slice(chunk);
            u64::from_be_bytes(bytes)
        })
        .collect())
}

pub fn join_blocks(blocks: &[u64], mode: LangMode) -> String {
    let bytes: Vec<u8> = blocks.iter().flat_map(|b| b.to_be_bytes()).collect();
    decode_bytes(&bytes, mode)
}

/// Ключ из 32 символов, каждый символ - один байт.
///
/// Ключ всегда кодируется кириллической таблицей, независимо от режима сообщения.
pub fn key_from_text(key: &str) -> Result<[u8; KEY_SIZE], TextError> {
    let count = key.chars().count();
    if count != KEY_SIZE {
        return Err(TextError::KeyLength { actual: count });
    }

    let codes = encode_text(key, LangMode::Cyrillic)?;
    let mut out = [0u8; KEY_SIZE];
    out.copy_from_slice(&codes);
    Ok(out)
}

pub fn key_from_hex(key: &str) -> Result<[u8; KEY_SIZE], TextError> {
    let bytes = hex::decode(key.trim()).map_err(|_| TextError::HexKey)?;
    bytes.try_into().map_err(|_| TextError::HexKey)
}

pub fn format_blocks(blocks: &[u64], format: BlockFormat) -> String {
    blocks
        .iter()
        .map(|b| match format {
            BlockFormat::Bin => format!("{:064b}", b),
            BlockFormat::Hex => format!("{:016x}", b),
        })
        .collect()
}

/// Разбирает шифртекст, пробельные символы игнорируются
pub fn parse_blocks(input: &str, format: BlockFormat) -> Result<Vec<u64>, TextError> {
    let digits: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if let Some(bad) = digits.chars().find(|c| !c.is_digit(format.radix())) {
        return Err(TextError::InvalidDigit(bad));
    }

    let width = format.width();
    if digits.is_empty() || digits.len() % width != 0 {
        return Err(TextError::CiphertextLength {
            actual: digits.len(),
            width,
        });
    }

    digits
        .as_bytes()
        .chunks(width)
        .map(|chunk| {
            // после фильтрации выше в куске только ASCII-цифры
            let s = std::str::from_utf8(chunk).map_err(|_| TextError::InvalidDigit('?'))?;
            u64::from_str_radix(s, format.radix()).map_err(|_| TextError::InvalidDigit('?'))
        })
        .collect()
}
