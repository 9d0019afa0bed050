//! Number formatting utilities.

/// Format a percentage for display.
#[must_use]
pub fn format_percent(value: f64) -> String {
    format!("{value:.0}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_percent_rounds() {
        assert_eq!(format_percent(99.8), "100%");
        assert_eq!(format_percent(0.2), "0%");
    }

    #[test]
    fn format_percent_negative() {
        assert_eq!(format_percent(-5.4), "-5%");
    }
}
