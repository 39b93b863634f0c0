//! Parsing helpers for tags and durations.

use chrono::Duration;

/// Flatten repeated and comma-separated `--tag` values, dropping blanks and
/// duplicates while keeping first-seen order.
pub fn parse_tags(values: &[String]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in values.iter().flat_map(|v| v.split(',')) {
        let tag = tag.trim();
        if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// Parse a duration string (e.g., "7d", "24h").
pub fn parse_duration(value: &str) -> anyhow::Result<Duration> {
    if value.len() < 2 {
        return Err(anyhow::anyhow!(
            "Invalid duration: {} (expected <number><unit>)",
            value
        ));
    }

    let (num_str, unit) = value.split_at(value.len() - 1);
    let amount: i64 = num_str
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid duration number: {}", value))?;
    if amount <= 0 {
        return Err(anyhow::anyhow!("Duration must be positive: {}", value));
    }

    match unit {
        "d" => Ok(Duration::days(amount)),
        "h" => Ok(Duration::hours(amount)),
        "m" => Ok(Duration::minutes(amount)),
        "s" => Ok(Duration::seconds(amount)),
        _ => Err(anyhow::anyhow!(
            "Invalid duration unit: {} (use d/h/m/s)",
            unit
        )),
    }
}
