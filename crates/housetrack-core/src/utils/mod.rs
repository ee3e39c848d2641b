//! Utility functions for currency, date and string formatting.

pub mod format;

// Re-export commonly used functions at module level
pub use format::{
    contains_ignore_case, format_currency, format_date, format_phone, parse_currency, parse_date,
    percentage,
};
