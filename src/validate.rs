//! Range checks for numeric identifiers arriving as text.
//!
//! Inside the crate appids are `u32` and steamids are `u64`, so the type
//! system carries the invariant. These helpers guard the edges where the
//! values come in as strings: command-line arguments and the decimal
//! steamids the service puts in its JSON.

use crate::{Error, Result};

/// Parse an AppID, accepting `0..=u32::MAX`.
pub fn parse_appid(value: &str) -> Result<u32> {
    parse_in_range("appid", value, u32::MAX as i128).map(|v| v as u32)
}

/// Parse a steamid, accepting `0..=u64::MAX`.
pub fn parse_steamid(value: &str) -> Result<u64> {
    parse_in_range("steamid", value, u64::MAX as i128).map(|v| v as u64)
}

fn parse_in_range(name: &'static str, value: &str, max: i128) -> Result<i128> {
    let parsed: i128 = value.trim().parse().map_err(|_| Error::InvalidArgument {
        name,
        reason: format!("{value:?} is not an integer"),
    })?;
    if !(0..=max).contains(&parsed) {
        return Err(Error::InvalidArgument {
            name,
            reason: format!("{parsed} is outside 0..={max}"),
        });
    }
    Ok(parsed)
}
