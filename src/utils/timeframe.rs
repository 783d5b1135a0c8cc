use crate::error::{NntcError, Result};
use chrono::Duration;

/// Parse an exchange timeframe string ("5m", "1h", "1d", "1w") into a duration
pub fn timeframe_to_duration(timeframe: &str) -> Result<Duration> {
    let timeframe = timeframe.trim();
    let split = timeframe
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(|| invalid(timeframe))?;
    let (amount, unit) = timeframe.split_at(split);

    let amount: i64 = amount.parse().map_err(|_| invalid(timeframe))?;
    if amount <= 0 {
        return Err(invalid(timeframe));
    }

    match unit {
        "m" => Ok(Duration::minutes(amount)),
        "h" => Ok(Duration::hours(amount)),
        "d" => Ok(Duration::days(amount)),
        "w" => Ok(Duration::weeks(amount)),
        _ => Err(invalid(timeframe)),
    }
}

pub fn timeframe_to_minutes(timeframe: &str) -> Result<i64> {
    Ok(timeframe_to_duration(timeframe)?.num_minutes())
}

/// Number of whole bars covered by `hours` at the given timeframe; at least one
pub fn hours_to_bars(hours: f64, timeframe: &str) -> Result<usize> {
    let minutes = timeframe_to_minutes(timeframe)? as f64;
    let bars = (hours * 60.0 / minutes).floor();
    if !bars.is_finite() || bars < 0.0 {
        return Err(NntcError::Configuration(format!(
            "Cannot convert {} hours at timeframe {} into bars",
            hours, timeframe
        )));
    }
    if bars < 1.0 {
        return Err(NntcError::Configuration(format!(
            "Lookahead of {} hours is shorter than one {} bar",
            hours, timeframe
        )));
    }
    Ok(bars as usize)
}

fn invalid(timeframe: &str) -> NntcError {
    NntcError::Configuration(format!("Invalid timeframe: '{}'", timeframe))
}
