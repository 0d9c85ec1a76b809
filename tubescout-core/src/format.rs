//! Human-readable renderings of platform values.

use chrono::DateTime;
use once_cell::sync::Lazy;
use regex::Regex;

static ISO_DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^P(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?)?$")
        .expect("duration regex should compile")
});

/// `PT1H2M3S` -> `01:02:03`, `PT4M13S` -> `04:13`.
///
/// Days fold into hours. Returns `None` for empty or unparsable input,
/// including components too large to represent.
pub fn readable_duration(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let caps = ISO_DURATION.captures(raw)?;
    let part = |idx: usize| -> Option<u64> {
        caps.get(idx).map_or(Some(0), |m| m.as_str().parse().ok())
    };

    let hours = part(1)?.checked_mul(24)?.checked_add(part(2)?)?;
    let minutes = part(3)?;
    let seconds = part(4)?;

    Some(if hours > 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    })
}

/// Compact counter: `999`, `1.2K`, `3.4M`, `1.0B`.
pub fn format_count(count: u64) -> String {
    const UNITS: [(u64, &str); 3] = [
        (1_000_000_000, "B"),
        (1_000_000, "M"),
        (1_000, "K"),
    ];
    for (scale, suffix) in UNITS {
        if count >= scale {
            return format!("{:.1}{suffix}", count as f64 / scale as f64);
        }
    }
    count.to_string()
}

/// RFC 3339 timestamp -> `October 25, 2009`.
pub fn format_published_date(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return "Unknown".to_string();
    };
    match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => parsed.format("%B %d, %Y").to_string(),
        Err(_) => raw.chars().take(10).collect(),
    }
}
