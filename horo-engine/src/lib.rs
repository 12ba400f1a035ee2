//! horo-engine library - Horoscope resolution and caching
//!
//! Resolves zodiac signs from dates, selects deterministic readings from a
//! locale-scoped content bank, and serves them through a read-through cache
//! with per-key single-flight generation.

pub mod cache;
pub mod compatibility;
pub mod config;
pub mod content;
pub mod error;
pub mod evictor;
pub mod flight;
pub mod reading;
pub mod selector;
pub mod service;
pub mod state;
pub mod store;
pub mod zodiac;

pub use cache::ReadingCache;
pub use compatibility::{assess_with, describe, Compatibility, CompatibilityLevel};
pub use content::{ContentCatalog, ContentError};
pub use error::{Error, Result};
pub use evictor::{CacheEvictor, RetentionPolicy};
pub use reading::{HoroscopeCategory, Reading, WeeklyReading};
pub use service::{CacheStats, EvictionReport, HoroscopeService};
pub use state::CacheState;
pub use store::{MemoryReadingStore, ReadingStore, SqliteReadingStore};
pub use zodiac::{Element, Quality, Sign, SignInfo};
