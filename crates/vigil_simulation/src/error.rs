//! Ошибки ядра координации
//!
//! - ConfigurationError: фатальные, при сборке актора (archetype validation)
//! - PoolError: операции над ResourcePool (InvalidOperation до initialize)
//!
//! Policy no-ops (урон по invincible/dead, select_movement вне боя): НЕ ошибки.

use thiserror::Error;

use crate::vitals::Gauge;

/// Невалидные load-time параметры archetype
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("{gauge:?} maximum must be positive and finite, got {max}")]
    NonPositiveMaximum { gauge: Gauge, max: f32 },

    #[error("{what} range is inverted: min {min} > max {max}")]
    InvertedRange {
        what: &'static str,
        min: f32,
        max: f32,
    },

    #[error("{what} must be non-negative, got {value}")]
    NegativeValue { what: &'static str, value: f32 },

    #[error("{what} must be finite, got {value}")]
    NonFinite { what: &'static str, value: f32 },

    #[error("{what} must lie in [{min}, {max}], got {value}")]
    OutOfRange {
        what: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
}

/// Ошибки операций ResourcePool
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PoolError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// damage/heal/consume до initialize()
    #[error("invalid operation: {0} called before the pool was initialized")]
    InvalidOperation(&'static str),
}
