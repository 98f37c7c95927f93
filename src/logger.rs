// src/logger.rs
use env_logger::Env;

/// Инициализирует логирование в stderr. `RUST_LOG` имеет приоритет.
pub fn init(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    // повторная инициализация (например, в тестах) игнорируется
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(default))
        .format_timestamp(None)
        .try_init();
}
