//! Note title derivation from the creation timestamp.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Local, Utc};

/// Display format used when none (or an invalid one) is configured.
pub const DEFAULT_TITLE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Returns whether `format` is a non-empty strftime pattern chrono can render.
pub fn is_valid_title_format(format: &str) -> bool {
    !format.trim().is_empty()
        && StrftimeItems::new(format).all(|item| !matches!(item, Item::Error))
}

/// Renders `epoch_ms` with `format`.
///
/// `utc_offset_minutes = None` renders in the host's local zone.
pub fn format_title(epoch_ms: i64, format: &str, utc_offset_minutes: Option<i32>) -> String {
    let Some(utc) = DateTime::<Utc>::from_timestamp_millis(epoch_ms) else {
        return epoch_ms.to_string();
    };
    let format = if is_valid_title_format(format) {
        format
    } else {
        DEFAULT_TITLE_FORMAT
    };

    match utc_offset_minutes
        .and_then(|minutes| minutes.checked_mul(60))
        .and_then(FixedOffset::east_opt)
    {
        Some(offset) => utc.with_timezone(&offset).format(format).to_string(),
        None => utc.with_timezone(&Local).format(format).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{format_title, is_valid_title_format, DEFAULT_TITLE_FORMAT};

    #[test]
    fn formats_in_fixed_offset() {
        assert_eq!(
            format_title(1_700_000_000_000, DEFAULT_TITLE_FORMAT, Some(0)),
            "2023-11-14 22:13:20"
        );
        assert_eq!(
            format_title(1_700_000_000_000, DEFAULT_TITLE_FORMAT, Some(480)),
            "2023-11-15 06:13:20"
        );
    }

    #[test]
    fn invalid_format_falls_back_to_default() {
        assert!(!is_valid_title_format("%Q"));
        assert!(!is_valid_title_format("  "));
        assert_eq!(format_title(0, "%Q", Some(0)), "1970-01-01 00:00:00");
    }
}
