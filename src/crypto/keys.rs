// src/crypto/keys.rs
use super::error::CipherError;
use std::fmt;
use std::str::FromStr;
use zeroize::{Zeroize, ZeroizeOnDrop};

pub const KEY_SIZE: usize = 32; // 256 бит
pub const SUBKEYS: usize = 8;
pub const ROUNDS: usize = 32;

/// Направление работы шифра
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Encrypt,
    Decrypt,
}

impl FromStr for Direction {
    type Err = CipherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "e" | "enc" | "encrypt" => Ok(Direction::Encrypt),
            "d" | "dec" | "decrypt" => Ok(Direction::Decrypt),
            other => Err(CipherError::InvalidDirection(other.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Encrypt => write!(f, "enc"),
            Direction::Decrypt => write!(f, "dec"),
        }
    }
}

/// Ключевое запоминающее устройство: 8 подключей K0..K7 по 32 бита
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct KeySchedule {
    subkeys: [u32; SUBKEYS],
}

impl KeySchedule {
    /// Разбивает 256 бит ключа на 8 слов в порядке следования (big-endian)
    pub fn derive_subkeys(key: &[u8]) -> Result<Self, CipherError> {
        if key.len() != KEY_SIZE {
            return Err(CipherError::InvalidKeyLength {
                expected: KEY_SIZE,
                actual: key.len(),
            });
        }

        let mut bytes = [0u8; KEY_SIZE];
        bytes.copy_from_slice(key);
        Ok(Self::from_key(&bytes))
    }

    /// Разбиение ключа фиксированной длины, K0 - первые 4 байта
    pub fn from_key(key: &[u8; KEY_SIZE]) -> Self {
        let mut subkeys = [0u32; SUBKEYS];
        for (word, chunk) in subkeys.iter_mut().zip(key.chunks_exact(4)) {
            *word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Self { subkeys }
    }

    pub fn from_words(subkeys: [u32; SUBKEYS]) -> Self {
        Self { subkeys }
    }

    pub fn subkeys(&self) -> &[u32; SUBKEYS] {
        &self.subkeys
    }

    pub fn subkey(&self, index: usize) -> u32 {
        self.subkeys[index]
    }
}

impl fmt::Debug for KeySchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeySchedule")
            .field("subkeys", &"<redacted>")
            .finish()
    }
}

/// Индекс подключа для следующего раунда.
///
/// `prev` - индекс, использованный в раунде `round`. Результат всегда в 0..8.
fn next_key_index(prev: usize, round: usize, direction: Direction) -> usize {
    let next = match direction {
        Direction::Encrypt => {
            if round == 23 {
                7
            } else if round < 23 {
                prev + 1
            } else {
                prev + SUBKEYS - 1
            }
        }
        Direction::Decrypt => {
            if prev == 0 && round != 0 {
                7
            } else if round == 7 {
                7
            } else if round < 7 {
                prev + 1
            } else {
                prev + SUBKEYS - 1
            }
        }
    };
    next % SUBKEYS
}

/// Последовательность индексов подключей на все 32 раунда
pub fn round_key_order(direction: Direction) -> [usize; ROUNDS] {
    let mut order = [0usize; ROUNDS];
    let mut index = 0;
    for (round, slot) in order.iter_mut().enumerate() {
        *slot = index;
        index = next_key_index(index, round, direction);
    }
    order
}
