//! Unit normalization for ASA counters.
//!
//! Converts human-readable byte counts (`1.4TB`, `131.8GB`, `14395`) and
//! durations (`390.0d`, `2h39m`, `1Y25D`) into bytes and whole seconds, and
//! formats them back for display. Byte units are binary (1024 per step),
//! matching the Mbps rate formula.

use super::model::FormatError;

const SECONDS_PER_MINUTE: f64 = 60.0;
const SECONDS_PER_HOUR: f64 = 3_600.0;
const SECONDS_PER_DAY: f64 = 86_400.0;
const SECONDS_PER_YEAR: f64 = 365.0 * SECONDS_PER_DAY;

const BYTE_UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

/// Parse a byte count such as `512B`, `131.8GB` or a bare `14395`.
pub fn parse_bytes(raw: &str) -> Result<u64, FormatError> {
    let token = clean(raw);
    if token.is_empty() {
        return Err(FormatError::Empty("bytes"));
    }

    let (number, unit) = split_numeric(token);
    let value = parse_number(number, token)?;
    let multiplier = byte_multiplier(unit)
        .ok_or_else(|| FormatError::UnknownUnit(token.to_string()))?;

    whole(value * multiplier, token)
}

/// Parse a plain unsigned counter (ring numbers and the like).
pub fn parse_counter(raw: &str) -> Result<u64, FormatError> {
    let token = clean(raw);
    token
        .parse()
        .map_err(|_| FormatError::InvalidCounter(token.to_string()))
}

/// Parse a duration into whole seconds.
///
/// Accepts one or more `<number><unit>` segments with units `s`, `m`, `h`,
/// `d`/`D` and `y`/`Y` (365 days). A bare integer is taken as seconds.
pub fn parse_duration(raw: &str) -> Result<u64, FormatError> {
    let token = clean(raw);
    if token.is_empty() {
        return Err(FormatError::Empty("duration"));
    }
    if token.bytes().all(|b| b.is_ascii_digit()) {
        return parse_counter(token);
    }

    let mut rest = token;
    let mut total = 0.0f64;

    while !rest.is_empty() {
        let (number, tail) = split_numeric(rest);
        let value = parse_number(number, token)?;

        let mut chars = tail.chars();
        let seconds = chars
            .next()
            .and_then(duration_unit)
            .ok_or_else(|| FormatError::UnknownUnit(token.to_string()))?;

        total += value * seconds;
        rest = chars.as_str();
    }

    whole(total, token)
}

/// `86400` -> `1.0d`, `9000` -> `2.5h`, `115` -> `1.9m`, `21` -> `21s`.
pub fn format_duration(seconds: u64) -> String {
    let secs = seconds as f64;
    if secs >= SECONDS_PER_DAY {
        format!("{:.1}d", secs / SECONDS_PER_DAY)
    } else if secs >= SECONDS_PER_HOUR {
        format!("{:.1}h", secs / SECONDS_PER_HOUR)
    } else if secs >= SECONDS_PER_MINUTE {
        format!("{:.1}m", secs / SECONDS_PER_MINUTE)
    } else {
        format!("{}s", seconds)
    }
}

/// Binary-unit display, one decimal: `141519172403` -> `131.8GB`.
pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{}B", bytes);
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < BYTE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1}{}", value, BYTE_UNITS[unit])
}

pub fn format_rate(mbps: f64) -> String {
    if mbps >= 1000.0 {
        format!("{:.1}Gbps", mbps / 1000.0)
    } else if mbps >= 1.0 {
        format!("{:.1}Mbps", mbps)
    } else if mbps >= 0.001 {
        format!("{:.1}Kbps", mbps * 1000.0)
    } else {
        format!("{:.0}bps", mbps * 1_000_000.0)
    }
}

fn clean(raw: &str) -> &str {
    raw.trim().trim_end_matches(',').trim()
}

/// Split at the first character that is neither a digit nor a dot.
fn split_numeric(text: &str) -> (&str, &str) {
    let end = text
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(text.len());
    text.split_at(end)
}

fn parse_number(number: &str, token: &str) -> Result<f64, FormatError> {
    if number.is_empty() || number == "." {
        return Err(FormatError::InvalidNumber(token.to_string()));
    }
    number
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| FormatError::InvalidNumber(token.to_string()))
}

/// Round to a whole count; anything that does not fit in `u64` is an error.
fn whole(value: f64, token: &str) -> Result<u64, FormatError> {
    let rounded = value.round();
    // u64::MAX as f64 rounds up to 2^64, which itself does not fit
    if !rounded.is_finite() || rounded >= u64::MAX as f64 {
        return Err(FormatError::Overflow(token.to_string()));
    }
    Ok(rounded as u64)
}

fn byte_multiplier(unit: &str) -> Option<f64> {
    let exponent = match unit.to_ascii_uppercase().as_str() {
        "" | "B" => 0,
        "K" | "KB" | "KIB" => 1,
        "M" | "MB" | "MIB" => 2,
        "G" | "GB" | "GIB" => 3,
        "T" | "TB" | "TIB" => 4,
        "P" | "PB" | "PIB" => 5,
        _ => return None,
    };
    Some(1024f64.powi(exponent))
}

fn duration_unit(unit: char) -> Option<f64> {
    match unit {
        's' => Some(1.0),
        'm' => Some(SECONDS_PER_MINUTE),
        'h' => Some(SECONDS_PER_HOUR),
        'd' | 'D' => Some(SECONDS_PER_DAY),
        'y' | 'Y' => Some(SECONDS_PER_YEAR),
        _ => None,
    }
}
