//! # Domain Types
//!
//! Validated primitives shared by series, sets and the quote layer.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Normalized ticker symbol |
//! | [`DATE_FORMAT`] | The fixed `YYYY-MM-DD` calendar format |
//!
//! Dates are stored as [`time::Date`] once parsed; string forms only exist
//! at the boundary (quote payloads and presentation).

mod date;
mod symbol;

pub use date::{
    add_months, format_date, fractional_years, months_between, parse_date, parse_date_str,
    DATE_FORMAT,
};
pub use symbol::Symbol;
