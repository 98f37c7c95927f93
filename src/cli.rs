// src/cli.rs
use crate::config::Config;
use crate::crypto::{GostCipher, KEY_SIZE};
use crate::text::{self, BlockFormat, LangMode};
use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{debug, info};
use rand::seq::SliceRandom;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "gost89",
    about = "GOST89 v0.1.0",
    long_about = "GOST89 v0.1.0\n64-bit Feistel block cipher in the style of GOST 28147-89 for short text messages",
    version = "v0.1.0"
)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Language mode of the message: c (cyrillic) or l (latin)
    #[arg(long, global = true)]
    pub lang: Option<LangMode>,

    /// Ciphertext format: bin or hex
    #[arg(long, global = true)]
    pub format: Option<BlockFormat>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Источник ключа
#[derive(Args, Debug, Default)]
pub struct KeyArgs {
    /// Key as 32 cyrillic characters (independent of --lang)
    #[arg(short, long, conflicts_with_all = ["hex_key", "key_file"])]
    pub key: Option<String>,

    /// Key as 64 hex digits
    #[arg(long, conflicts_with = "key_file")]
    pub hex_key: Option<String>,

    /// File containing the key as 64 hex digits
    #[arg(long)]
    pub key_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Encrypt a message
    ///
    /// Example: gost89 encrypt "hello world" --lang l --key алексеевалексеевалексеевалексеев
    #[command(name = "encrypt")]
    Encrypt {
        /// Message text (split into 8-character blocks, last block padded with spaces)
        #[arg(required = true)]
        message: String,

        #[command(flatten)]
        key: KeyArgs,
    },

    /// Decrypt a ciphertext produced by `encrypt`
    ///
    /// Example: gost89 decrypt afaf4eb12e1355ed --format hex --lang l --key ...
    #[command(name = "decrypt")]
    Decrypt {
        /// Ciphertext blocks (64 binary digits or 16 hex digits per block)
        #[arg(required = true)]
        ciphertext: String,

        #[command(flatten)]
        key: KeyArgs,
    },

    /// Prompt for message, key, language mode and operation in a loop
    #[command(name = "interactive")]
    Interactive,

    /// Generate a random key
    ///
    /// Example: gost89 keygen --hex
    #[command(name = "keygen")]
    Keygen {
        /// Print the key as 64 hex digits instead of characters
        #[arg(long)]
        hex: bool,

        /// Also save the key (hex) to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite an existing key file
        #[arg(long)]
        force: bool,
    },

    /// Initialize configuration file with defaults
    #[command(name = "init-config")]
    InitConfig {
        /// Output configuration file path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show effective configuration
    #[command(name = "show-config")]
    ShowConfig,
}

impl Cli {
    /// Main entry point: dispatch to subcommand
    pub fn execute(&self) -> Result<()> {
        match &self.command {
            Commands::Encrypt { message, key } => self.cmd_encrypt(message, key),
            Commands::Decrypt { ciphertext, key } => self.cmd_decrypt(ciphertext, key),
            Commands::Interactive => self.cmd_interactive(),
            Commands::Keygen { hex, output, force } => self.cmd_keygen(*hex, output.as_deref(), *force),
            Commands::InitConfig { output, force } => self.cmd_init_config(output.as_deref(), *force),
            Commands::ShowConfig => self.cmd_show_config(),
        }
    }

    // ------------------------------------------------------------------------
    // Command implementations
    // ------------------------------------------------------------------------

    fn cmd_encrypt(&self, message: &str, key_args: &KeyArgs) -> Result<()> {
        let config = self.config()?;
        let lang = self.lang(&config);
        let cipher = resolve_cipher(key_args, &config)?;

        let blocks = text::split_into_blocks(message, lang)?;
        info!("Encrypting {} block(s) in {} mode", blocks.len(), lang);
        let encrypted = cipher.encrypt_blocks(&blocks);

        println!("{}", text::format_blocks(&encrypted, self.format(&config)));
        Ok(())
    }

    fn cmd_decrypt(&self, ciphertext: &str, key_args: &KeyArgs) -> Result<()> {
        let config = self.config()?;
        let lang = self.lang(&config);
        let format = self.format(&config);
        let cipher = resolve_cipher(key_args, &config)?;

        let blocks = text::parse_blocks(ciphertext, format)?;
        info!("Decrypting {} block(s)", blocks.len());
        let decrypted = cipher.decrypt_blocks(&blocks);

        println!("decrypted message: {}", text::format_blocks(&decrypted, format));
        println!(
            "decrypted message in characters: {}",
            text::join_blocks(&decrypted, lang)
        );
        Ok(())
    }

    fn cmd_interactive(&self) -> Result<()> {
        let config = self.config()?;
        let mut settings = crate::interactive::Settings::from_config(&config);
        if let Some(lang) = self.lang {
            settings.lang = lang;
            settings.prompt_lang = false;
        }
        if let Some(format) = self.format {
            settings.format = format;
        }

        let stdin = io::stdin();
        let stdout = io::stdout();
        crate::interactive::run_session(stdin.lock(), stdout.lock(), &settings)
    }

    fn cmd_keygen(&self, as_hex: bool, output: Option<&Path>, force: bool) -> Result<()> {
        let key_bytes = if as_hex {
            let key = GostCipher::generate_key();
            println!("{}", hex::encode(key));
            key
        } else {
            // текстовый ключ всегда кириллический
            let alphabet = LangMode::Cyrillic.alphabet();
            let mut rng = rand::thread_rng();
            let key: String = (0..KEY_SIZE)
                .map(|_| *alphabet.choose(&mut rng).unwrap_or(&' '))
                .collect();
            println!("{}", key);
            text::key_from_text(&key)?
        };

        if let Some(path) = output {
            if path.exists() && !force {
                return Err(anyhow!(
                    "Key file already exists: {}. Use --force to overwrite",
                    path.display()
                ));
            }
            GostCipher::save_key(&key_bytes, path)?;
            println!("Key saved to: {}", path.display());
        }

        Ok(())
    }

    fn cmd_init_config(&self, output: Option<&Path>, force: bool) -> Result<()> {
        crate::config::init_config(output, force)?;
        Ok(())
    }

    fn cmd_show_config(&self) -> Result<()> {
        let config = self.config()?;
        let mut entries: Vec<_> = config.info().into_iter().collect();
        entries.sort();

        println!("Configuration:");
        for (name, value) in entries {
            println!("  {}: {}", name, value);
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Helper methods
    // ------------------------------------------------------------------------

    fn config(&self) -> Result<Config> {
        Config::load_or_default(self.config.as_deref()).with_context(|| match &self.config {
            Some(path) => format!("Failed to load config: {}", path.display()),
            None => "Failed to load config".to_string(),
        })
    }

    /// Флаг командной строки важнее конфигурации
    fn lang(&self, config: &Config) -> LangMode {
        self.lang.unwrap_or(config.cipher.lang)
    }

    fn format(&self, config: &Config) -> BlockFormat {
        self.format.unwrap_or(config.cipher.format)
    }
}

/// Порядок: --key, --hex-key, --key-file, key_path из конфигурации
pub fn resolve_cipher(args: &KeyArgs, config: &Config) -> Result<GostCipher> {
    let key = if let Some(key) = &args.key {
        text::key_from_text(key)?
    } else if let Some(hex_key) = &args.hex_key {
        text::key_from_hex(hex_key)?
    } else if let Some(path) = args.key_file.as_ref().or(config.cipher.key_path.as_ref()) {
        debug!("Reading key from {}", path.display());
        GostCipher::load_key(path)?
    } else {
        return Err(anyhow!(
            "No key given. Use --key, --hex-key, --key-file or set cipher.key_path in config"
        ));
    };

    Ok(GostCipher::new(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tempfile::tempdir;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::try_parse_from([
            "gost89", "encrypt", "hello", "--lang", "l", "--format", "hex", "-k", "x",
        ])
        .unwrap();
        assert_eq!(cli.lang, Some(LangMode::Latin));
        assert_eq!(cli.format, Some(BlockFormat::Hex));
        assert!(matches!(cli.command, Commands::Encrypt { .. }));
    }

    #[test]
    fn test_key_sources_conflict() {
        let parsed = Cli::try_parse_from([
            "gost89", "encrypt", "hi", "--key", "a", "--hex-key", "00",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_resolve_cipher_sources() {
        let config = Config::default();
        let text_key = KeyArgs {
            key: Some("алексеевалексеевалексеевалексеев".to_string()),
            ..Default::default()
        };
        let from_text = resolve_cipher(&text_key, &config).unwrap();
        // латинский блок "hello wo" под кириллическим ключом
        assert_eq!(from_text.encrypt_block(0xccc9_d0d0_d310_dbd3), 0xafaf_4eb1_2e13_55ed);

        let bytes = text::key_from_text("алексеевалексеевалексеевалексеев").unwrap();
        let hex_key = KeyArgs {
            hex_key: Some(hex::encode(bytes)),
            ..Default::default()
        };
        let from_hex = resolve_cipher(&hex_key, &config).unwrap();
        assert_eq!(from_hex.encrypt_block(1), from_text.encrypt_block(1));

        let dir = tempdir().unwrap();
        let path = dir.path().join("master.key");
        GostCipher::save_key(&bytes, &path).unwrap();
        let mut with_path = Config::default();
        with_path.cipher.key_path = Some(path);
        let from_file = resolve_cipher(&KeyArgs::default(), &with_path).unwrap();
        assert_eq!(from_file.encrypt_block(1), from_text.encrypt_block(1));
    }

    #[test]
    fn test_raw_latin_key_bytes_via_hex() {
        // байты латинского ключа можно передать только через --hex-key
        let latin = text::encode_text("abcdefghijklmnopqrstuvwxyzABCDEF", LangMode::Latin).unwrap();
        assert!(text::key_from_text("abcdefghijklmnopqrstuvwxyzABCDEF").is_err());

        let args = KeyArgs {
            hex_key: Some(hex::encode(latin)),
            ..Default::default()
        };
        let cipher = resolve_cipher(&args, &Config::default()).unwrap();
        assert_eq!(cipher.encrypt_block(0xccc9_d0d0_d310_dbd3), 0x6df3_690f_776d_21b3);
    }

    #[test]
    fn test_resolve_cipher_missing_key() {
        assert!(resolve_cipher(&KeyArgs::default(), &Config::default()).is_err());
    }
}
