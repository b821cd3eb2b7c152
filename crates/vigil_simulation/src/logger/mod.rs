//! Logger — pluggable LogPrinter с level filter
//!
//! Хост (CLI, тесты, внешний движок) ставит свой printer через `set_logger`.
//! Без printer'а логи молча отбрасываются.

use once_cell::sync::Lazy;
use std::sync::Mutex;

static LOGGER: Lazy<Mutex<Option<Box<dyn LogPrinter>>>> = Lazy::new(|| Mutex::new(None));

static LOGGER_LEVEL: Lazy<Mutex<LogLevel>> = Lazy::new(|| Mutex::new(LogLevel::Debug));

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }
}

pub trait LogPrinter: Send + Sync {
    fn log(&self, level: LogLevel, message: &str);
}

pub fn set_logger(logger: Box<dyn LogPrinter>) {
    if let Ok(mut slot) = LOGGER.lock() {
        *slot = Some(logger);
    }
}

pub fn set_logger_if_needed(logger: Box<dyn LogPrinter>) {
    if let Ok(mut slot) = LOGGER.lock() {
        if slot.is_none() {
            *slot = Some(logger);
        }
    }
}

pub fn set_log_level(level: LogLevel) {
    if let Ok(mut current) = LOGGER_LEVEL.lock() {
        *current = level;
    }
}

pub fn log_level() -> LogLevel {
    LOGGER_LEVEL
        .lock()
        .map(|level| *level)
        .unwrap_or(LogLevel::Debug)
}

pub fn log(message: &str) {
    log_with_level(LogLevel::Debug, message);
}

pub fn log_info(message: &str) {
    log_with_level(LogLevel::Info, message);
}

pub fn log_warning(message: &str) {
    log_with_level(LogLevel::Warning, message);
}

pub fn log_error(message: &str) {
    log_with_level(LogLevel::Error, message);
}

pub fn log_with_level(level: LogLevel, message: &str) {
    if level < log_level() {
        return;
    }
    // Timestamp добавляем здесь, printer'ы его не форматируют
    if let Ok(slot) = LOGGER.lock() {
        if let Some(logger) = slot.as_ref() {
            let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
            logger.log(level, &format!("[{}] {}", timestamp, message));
        }
    }
}

pub struct ConsoleLogger;

impl LogPrinter for ConsoleLogger {
    fn log(&self, level: LogLevel, message: &str) {
        println!("[{}] {}", level.as_str(), message);
    }
}

pub fn init_logger() {
    set_logger_if_needed(Box::new(ConsoleLogger));
}
