// src/crypto/sbox.rs
//! Таблица замен (S-блок) для раундовой функции.
//!
//! Строка таблицы выбирается значением 4-битного полубайта, столбец -
//! позицией полубайта в 32-битном слове (0 - старший полубайт).

use super::error::CipherError;

pub const ROWS: usize = 16;
pub const COLUMNS: usize = 8;

/// Таблица замен по умолчанию
pub const DEFAULT_SBOX: SubstitutionTable = SubstitutionTable([
    [1, 13, 4, 6, 7, 5, 14, 4],
    [15, 11, 11, 12, 13, 8, 11, 10],
    [13, 4, 10, 7, 10, 1, 4, 9],
    [0, 1, 0, 1, 1, 13, 12, 2],
    [5, 3, 7, 5, 0, 10, 6, 13],
    [7, 15, 2, 15, 8, 3, 13, 8],
    [10, 5, 1, 13, 9, 4, 15, 0],
    [4, 9, 13, 8, 15, 2, 10, 14],
    [9, 0, 3, 4, 14, 14, 2, 6],
    [2, 10, 6, 10, 4, 15, 3, 11],
    [3, 14, 8, 9, 6, 12, 8, 1],
    [14, 7, 5, 14, 12, 7, 1, 12],
    [6, 6, 9, 0, 11, 6, 0, 7],
    [11, 8, 12, 3, 2, 0, 7, 15],
    [8, 2, 15, 11, 5, 9, 5, 5],
    [12, 12, 14, 2, 3, 11, 9, 3],
]);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutionTable([[u8; COLUMNS]; ROWS]);

impl SubstitutionTable {
    /// Создает таблицу, проверяя что все значения укладываются в 4 бита
    pub fn new(rows: [[u8; COLUMNS]; ROWS]) -> Result<Self, CipherError> {
        for (row, values) in rows.iter().enumerate() {
            for (column, &value) in values.iter().enumerate() {
                if value > 0x0F {
                    return Err(CipherError::InvalidSubstitutionTable { row, column, value });
                }
            }
        }
        Ok(Self(rows))
    }

    pub fn lookup(&self, nibble: u8, position: usize) -> u8 {
        self.0[nibble as usize][position]
    }

    /// Замена восьми полубайтов слова, начиная со старшего
    pub fn substitute(&self, word: u32) -> u32 {
        let mut out = 0u32;
        for position in 0..COLUMNS {
            let shift = 28 - 4 * position;
            let nibble = ((word >> shift) & 0x0F) as u8;
            out |= (self.lookup(nibble, position) as u32) << shift;
        }
        out
    }

    pub fn rows(&self) -> &[[u8; COLUMNS]; ROWS] {
        &self.0
    }
}

impl Default for SubstitutionTable {
    fn default() -> Self {
        DEFAULT_SBOX
    }
}
