//! Utilities shared by every Typerace package.

pub mod logger;
pub mod time;
