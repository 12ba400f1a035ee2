//! Zodiac signs and date-to-sign resolution

pub mod resolver;
pub mod sign;

pub use resolver::{info, resolve, SignInfo, DEFAULT_SIGN};
pub use sign::{Element, Quality, Sign};
