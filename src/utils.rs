use std::time::Instant;

/// Trims a request field, treating blank values as absent.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Collapses model output onto one line.
pub fn single_line(text: &str) -> String {
    text.trim().replace(['\r', '\n'], " ")
}

/// Whole milliseconds elapsed since `start`.
pub fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  123 ".to_string())), Some("123".to_string()));
        assert_eq!(non_blank(Some("   ".to_string())), None);
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn test_single_line() {
        assert_eq!(single_line(" Asks about\nshipping costs\n"), "Asks about shipping costs");
        assert_eq!(single_line("a\r\nb"), "a  b");
    }

    #[test]
    fn test_elapsed_ms() {
        let start = Instant::now();
        std::thread::sleep(Duration::from_millis(5));
        assert!(elapsed_ms(start) >= 5);
    }
}
