//! Entry cost, size display and size-threshold parsing.

use crate::error::ParseSizeError;
use std::fs::Metadata;

/// `st_blocks` is counted in 512-byte units.
const BLOCK_SIZE: u64 = 512;

const UNITS: &[&str] = &["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];

/// Which number stands for the cost of an entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SizeMode {
    /// Allocated blocks, in bytes (what `du` reports).
    #[default]
    Physical,
    /// Byte length of the entry (`st_size`).
    Logical,
}

impl SizeMode {
    /// Cost of an entry from its (not followed) metadata.
    pub fn cost(self, meta: &Metadata) -> u64 {
        match self {
            SizeMode::Logical => meta.len(),
            SizeMode::Physical => physical_size(meta),
        }
    }
}

#[cfg(unix)]
fn physical_size(meta: &Metadata) -> u64 {
    use std::os::unix::fs::MetadataExt;
    meta.blocks().saturating_mul(BLOCK_SIZE)
}

#[cfg(not(unix))]
fn physical_size(meta: &Metadata) -> u64 {
    // No block count available; round the length up to whole blocks.
    meta.len().div_ceil(BLOCK_SIZE).saturating_mul(BLOCK_SIZE)
}

/// How sizes are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SizeFormat {
    #[default]
    Raw,
    /// Binary units, switching up once the value reaches ten of the next unit.
    Human,
}

impl SizeFormat {
    pub fn display(self, size: u64) -> String {
        match self {
            SizeFormat::Raw => size.to_string(),
            SizeFormat::Human => human_size(size),
        }
    }
}

fn human_size(size: u64) -> String {
    let size = u128::from(size);
    let mut factor: u128 = 1;
    let mut unit = 0;
    while unit + 1 < UNITS.len() && size >= factor * 10 * 1024 {
        factor *= 1024;
        unit += 1;
    }
    let scaled = (size + factor / 2) / factor;
    format!("{} {}", scaled, UNITS[unit])
}

/// Parse a size threshold such as `42`, `42K` (×1000) or `42Ki` (×1024).
///
/// Suffixes are `K`/`k`, `M`, `G`, `T`, `P`, `E`. Leading and trailing
/// whitespace is accepted; anything else after the suffix is rejected.
/// A `0x` prefix reads the digits as hexadecimal.
pub fn parse_size(input: &str) -> Result<u64, ParseSizeError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(ParseSizeError::Empty);
    }
    let invalid = || ParseSizeError::Invalid(input.to_string());

    let (radix, body) = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(rest) => (16, rest),
        None => (10, s),
    };
    let digits_end = body
        .char_indices()
        .find(|(_, c)| !c.is_digit(radix))
        .map_or(body.len(), |(i, _)| i);
    let (digits, suffix) = body.split_at(digits_end);
    if digits.is_empty() {
        return Err(invalid());
    }
    let value =
        u64::from_str_radix(digits, radix).map_err(|_| ParseSizeError::Overflow(input.to_string()))?;

    let mut rest = suffix.chars();
    let exponent = match rest.clone().next() {
        None => return Ok(value),
        Some('K' | 'k') => 1,
        Some('M') => 2,
        Some('G') => 3,
        Some('T') => 4,
        Some('P') => 5,
        Some('E') => 6,
        Some(_) => return Err(invalid()),
    };
    rest.next();
    let base: u64 = if rest.as_str().starts_with('i') {
        rest.next();
        1024
    } else {
        1000
    };
    if !rest.as_str().trim().is_empty() {
        return Err(invalid());
    }

    base.checked_pow(exponent)
        .and_then(|m| value.checked_mul(m))
        .ok_or_else(|| ParseSizeError::Overflow(input.to_string()))
}
