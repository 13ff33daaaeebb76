use crate::error::{Error, Result};

/// Parses an exam duration in `HH:MM:SS` form into whole seconds.
pub fn parse_duration(raw: &str) -> Result<u32> {
    let parts: Vec<&str> = raw.trim().split(':').collect();
    if parts.len() != 3 {
        return Err(Error::BadRequest(format!(
            "Invalid duration '{}': expected HH:MM:SS",
            raw
        )));
    }

    let mut fields = [0u32; 3];
    for (i, part) in parts.iter().enumerate() {
        fields[i] = part.parse().map_err(|_| {
            Error::BadRequest(format!("Invalid duration '{}': expected HH:MM:SS", raw))
        })?;
    }

    let [hours, minutes, seconds] = fields;
    if minutes > 59 || seconds > 59 {
        return Err(Error::BadRequest(format!(
            "Invalid duration '{}': minutes and seconds must be below 60",
            raw
        )));
    }

    Ok(hours * 3600 + minutes * 60 + seconds)
}

/// Renders remaining time as `H:MM:SS` at one hour or more, `M:SS` below.
/// The leading unit is unpadded, the rest zero-padded.
pub fn format_clock(seconds: u32) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// Renders a total duration in the wire form `HH:MM:SS`.
pub fn format_duration(seconds: u32) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}
