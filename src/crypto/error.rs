// src/crypto/error.rs
use thiserror::Error;

/// Нарушения контракта ядра шифра.
///
/// Все ошибки обнаруживаются до первого раунда: ядро не выполняет
/// частичную обработку.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CipherError {
    #[error("invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("invalid block length: expected {expected} bytes, got {actual}")]
    InvalidBlockLength { expected: usize, actual: usize },

    #[error("invalid direction '{0}': expected 'enc' or 'dec'")]
    InvalidDirection(String),

    #[error("invalid substitution table entry [{row}][{column}] = {value}, must be < 16")]
    InvalidSubstitutionTable { row: usize, column: usize, value: u8 },
}
