// src/crypto/gost.rs
//! 64-битный блочный шифр в стиле ГОСТ 28147-89.
//!
//! Сеть Фейстеля из 32 раундов. Раундовая функция:
//! сложение по модулю 2^32 с подключом, замена по S-блоку,
//! циклический сдвиг влево на 11 бит, XOR с левой половиной.

use super::error::CipherError;
use super::keys::{round_key_order, Direction, KeySchedule};
use super::sbox::{SubstitutionTable, DEFAULT_SBOX};
use log::trace;

pub const BLOCK_SIZE: usize = 8; // 64 бита
pub const ROTATION: u32 = 11;

/// Одна итерация: f(L, R, K) = ((R + K) mod 2^32 -> S -> <<< 11) XOR L
pub fn round_function(left: u32, right: u32, subkey: u32, table: &SubstitutionTable) -> u32 {
    let sum = right.wrapping_add(subkey);
    let substituted = table.substitute(sum);
    substituted.rotate_left(ROTATION) ^ left
}

fn split(block: u64) -> (u32, u32) {
    ((block >> 32) as u32, block as u32)
}

fn join(high: u32, low: u32) -> u64 {
    ((high as u64) << 32) | low as u64
}

#[derive(Debug, Clone)]
pub struct Gost<'t> {
    schedule: KeySchedule,
    table: &'t SubstitutionTable,
}

impl Gost<'static> {
    pub fn new(schedule: KeySchedule) -> Self {
        Self {
            schedule,
            table: &DEFAULT_SBOX,
        }
    }

    pub fn from_key(key: &[u8]) -> Result<Self, CipherError> {
        Ok(Self::new(KeySchedule::derive_subkeys(key)?))
    }
}

impl<'t> Gost<'t> {
    /// Шифр с внешней таблицей замен
    pub fn with_table(schedule: KeySchedule, table: &'t SubstitutionTable) -> Self {
        Self { schedule, table }
    }

    pub fn table(&self) -> &SubstitutionTable {
        self.table
    }

    /// 32 раунда над блоком. На выходе половины идут в порядке R || L.
    pub fn run(&self, block: u64, direction: Direction) -> u64 {
        let order = round_key_order(direction);
        let (mut left, mut right) = split(block);

        for (round, &index) in order.iter().enumerate() {
            let new_right = round_function(left, right, self.schedule.subkey(index), self.table);
            left = right;
            right = new_right;
            trace!("round {:2} K{}: L={:08x} R={:08x}", round, index, left, right);
        }

        join(right, left)
    }

    pub fn encrypt_block(&self, block: u64) -> u64 {
        self.run(block, Direction::Encrypt)
    }

    pub fn decrypt_block(&self, block: u64) -> u64 {
        self.run(block, Direction::Decrypt)
    }

    /// Обработка блока, заданного байтами (big-endian)
    pub fn process_block(&self, block: &[u8], direction: Direction) -> Result<[u8; BLOCK_SIZE], CipherError> {
        let bytes: [u8; BLOCK_SIZE] = block.try_into().map_err(|_| CipherError::InvalidBlockLength {
            expected: BLOCK_SIZE,
            actual: block.len(),
        })?;
        Ok(self.run(u64::from_be_bytes(bytes), direction).to_be_bytes())
    }
}
