//! Display formatting for exported reports.

/// Compact human formatting for large counts: millions as "1.5M", tens of
/// thousands as "45K" (one decimal, trailing zero dropped), thousands with
/// comma grouping, everything below verbatim. Negative values keep the sign.
pub fn format_large_number(value: i64) -> String {
    let sign = if value < 0 { "-" } else { "" };
    let magnitude = value.unsigned_abs();

    if magnitude >= 1_000_000 {
        format!("{sign}{}", scaled(magnitude as f64 / 1_000_000.0, "M"))
    } else if magnitude >= 10_000 {
        format!("{sign}{}", scaled(magnitude as f64 / 1_000.0, "K"))
    } else if magnitude >= 1_000 {
        format!("{sign}{}", group_thousands(magnitude))
    } else {
        format!("{sign}{magnitude}")
    }
}

fn scaled(value: f64, suffix: &str) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{}{suffix}", rounded as u64)
    } else {
        format!("{rounded:.1}{suffix}")
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Format a 0-1 ratio as a percentage with the given decimal places.
pub fn format_percentage(ratio: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, ratio * 100.0)
}

/// US-dollar formatting with comma grouping, e.g. "$1,234.56".
pub fn format_currency(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let cents = (value.abs() * 100.0).round() as u64;
    format!("{sign}${}.{:02}", group_thousands(cents / 100), cents % 100)
}

/// Readable label for an hour count: "< 1 hour", "14 hours", "3 days".
pub fn hours_label(hours: f64) -> String {
    if hours < 1.0 {
        "< 1 hour".to_string()
    } else if hours < 24.0 {
        format!("{} hours", hours.round() as u64)
    } else {
        let days = (hours / 24.0).round() as u64;
        if days > 1 {
            format!("{days} days")
        } else {
            format!("{days} day")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_large_number_tiers() {
        assert_eq!(format_large_number(1_500_000), "1.5M");
        assert_eq!(format_large_number(2_000_000), "2M");
        assert_eq!(format_large_number(45_000), "45K");
        assert_eq!(format_large_number(12_345), "12.3K");
        assert_eq!(format_large_number(4_650), "4,650");
        assert_eq!(format_large_number(999), "999");
        assert_eq!(format_large_number(0), "0");
        assert_eq!(format_large_number(-2_325), "-2,325");
    }

    #[test]
    fn test_percentage() {
        assert_eq!(format_percentage(0.0031, 3), "0.310%");
        assert_eq!(format_percentage(0.383, 1), "38.3%");
    }

    #[test]
    fn test_currency() {
        assert_eq!(format_currency(173_212.5), "$173,212.50");
        assert_eq!(format_currency(74.5), "$74.50");
        assert_eq!(format_currency(-5.0), "-$5.00");
    }

    #[test]
    fn test_hours_label() {
        assert_eq!(hours_label(0.5), "< 1 hour");
        assert_eq!(hours_label(14.2), "14 hours");
        assert_eq!(hours_label(24.0), "1 day");
        assert_eq!(hours_label(72.0), "3 days");
    }
}
