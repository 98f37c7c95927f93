// src/crypto/mod.rs
mod error;
mod gost;
mod keys;
mod sbox;

use anyhow::{anyhow, Context, Result};
use log::debug;
use rand::rngs::OsRng;
use rand::RngCore;
use rayon::prelude::*;
use std::path::Path;

pub use error::CipherError;
pub use gost::{round_function, Gost, BLOCK_SIZE, ROTATION};
pub use keys::{round_key_order, Direction, KeySchedule, KEY_SIZE, ROUNDS, SUBKEYS};
pub use sbox::{SubstitutionTable, DEFAULT_SBOX};

/// Главный криптографический модуль: шифр поверх последовательности блоков
#[derive(Debug, Clone)]
pub struct GostCipher {
    engine: Gost<'static>,
}

impl GostCipher {
    /// Создает шифр из 256-битного ключа
    pub fn new(key: [u8; KEY_SIZE]) -> Self {
        Self {
            engine: Gost::new(KeySchedule::from_key(&key)),
        }
    }

    /// Создает шифр из ключа произвольной длины (проверяется длина)
    pub fn from_key_slice(key: &[u8]) -> Result<Self, CipherError> {
        Ok(Self {
            engine: Gost::from_key(key)?,
        })
    }

    pub fn engine(&self) -> &Gost<'static> {
        &self.engine
    }

    pub fn encrypt_block(&self, block: u64) -> u64 {
        self.engine.encrypt_block(block)
    }

    pub fn decrypt_block(&self, block: u64) -> u64 {
        self.engine.decrypt_block(block)
    }

    /// Обрабатывает блоки независимо друг от друга, порядок сохраняется
    pub fn process_blocks(&self, blocks: &[u64], direction: Direction) -> Vec<u64> {
        debug!("{} {} block(s)", direction, blocks.len());
        blocks
            .par_iter()
            .map(|&b| self.engine.run(b, direction))
            .collect()
    }

    pub fn encrypt_blocks(&self, blocks: &[u64]) -> Vec<u64> {
        self.process_blocks(blocks, Direction::Encrypt)
    }

    pub fn decrypt_blocks(&self, blocks: &[u64]) -> Vec<u64> {
        self.process_blocks(blocks, Direction::Decrypt)
    }

    /// Генерирует новый ключ шифрования
    pub fn generate_key() -> [u8; KEY_SIZE] {
        let mut key = [0u8; KEY_SIZE];
        OsRng.fill_bytes(&mut key);
        key
    }

    /// Сохраняет ключ в файл (hex)
    pub fn save_key(key: &[u8; KEY_SIZE], path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, hex::encode(key))
            .with_context(|| format!("Failed to write key file: {}", path.display()))?;
        Ok(())
    }

    /// Загружает ключ из файла (hex)
    pub fn load_key(path: &Path) -> Result<[u8; KEY_SIZE]> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read key file: {}", path.display()))?;
        let bytes = hex::decode(data.trim()).context("Key file is not valid hex")?;
        if bytes.len() != KEY_SIZE {
            return Err(anyhow!(CipherError::InvalidKeyLength {
                expected: KEY_SIZE,
                actual: bytes.len(),
            }));
        }

        let mut key = [0u8; KEY_SIZE];
        key.copy_from_slice(&bytes);
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use std::thread;
    use tempfile::tempdir;

    #[test]
    fn test_new_matches_derive_subkeys() {
        let key = GostCipher::generate_key();
        let a = GostCipher::new(key);
        let b = GostCipher::from_key_slice(&key).unwrap();
        assert_eq!(a.encrypt_block(7), b.encrypt_block(7));
    }

    #[test]
    fn test_process_blocks_keeps_order() {
        let mut rng = rand::thread_rng();
        let cipher = GostCipher::new(GostCipher::generate_key());
        let blocks: Vec<u64> = (0..1000).map(|_| rng.gen()).collect();

        let encrypted = cipher.encrypt_blocks(&blocks);
        let one_by_one: Vec<u64> = blocks.iter().map(|&b| cipher.encrypt_block(b)).collect();
        assert_eq!(encrypted, one_by_one);
        assert_eq!(cipher.decrypt_blocks(&encrypted), blocks);
    }

    #[test]
    fn test_blocks_are_independent() {
        let cipher = GostCipher::new([0x5A; KEY_SIZE]);
        let a = 0x1111_2222_3333_4444;
        let b = 0x5555_6666_7777_8888;

        let forward = cipher.encrypt_blocks(&[a, b]);
        let backward = cipher.encrypt_blocks(&[b, a]);
        assert_eq!(forward[0], backward[1]);
        assert_eq!(forward[1], backward[0]);

        let (ca, cb) = thread::scope(|s| {
            let ha = s.spawn(|| cipher.encrypt_block(a));
            let hb = s.spawn(|| cipher.encrypt_block(b));
            (ha.join().unwrap(), hb.join().unwrap())
        });
        assert_eq!(vec![ca, cb], forward);
    }

    #[test]
    fn test_empty_input() {
        let cipher = GostCipher::new([0; KEY_SIZE]);
        assert!(cipher.encrypt_blocks(&[]).is_empty());
    }

    #[test]
    fn test_save_and_load_key() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("keys/master.key");
        let key = GostCipher::generate_key();

        GostCipher::save_key(&key, &path).unwrap();
        assert_eq!(GostCipher::load_key(&path).unwrap(), key);
    }

    #[test]
    fn test_load_key_rejects_wrong_size() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("short.key");
        std::fs::write(&path, "00ff").unwrap();
        assert!(GostCipher::load_key(&path).is_err());
    }
}
