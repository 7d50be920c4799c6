use sha2::{Digest, Sha256};

/// Deterministic name for an uploaded roster:
/// `{sanitized_stem}--{short_hash(content)}.csv`. The same file
/// uploaded twice lands on the same name instead of piling up copies.
pub fn upload_filename(original: &str, content: &[u8]) -> String {
    let stem = original
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(original);
    format!("{}--{}.csv", sanitize(stem), short_hash(content))
}

/// Result artifact name derived from the run's start time:
/// `results_{YYYYMMDD_HHMMSS}.csv`.
pub fn results_filename(now_rfc3339: &str) -> String {
    format!("results_{}.csv", compact_stamp(now_rfc3339))
}

/// Compress an RFC3339 timestamp into `YYYYMMDD_HHMMSS` for filenames.
pub fn compact_stamp(rfc3339: &str) -> String {
    let digits: String = rfc3339.chars().filter(char::is_ascii_digit).take(14).collect();
    if digits.len() < 14 {
        return digits;
    }
    format!("{}_{}", &digits[..8], &digits[8..])
}

/// Filesystem-safe, deterministic name fragment.
pub fn sanitize(input: &str) -> String {
    let mut cleaned: String = input
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    cleaned = cleaned.trim_matches(&['_', ' ', '.'][..]).to_string();
    if cleaned.is_empty() {
        cleaned = "roster".to_string();
    }
    // Collapse multiple underscores
    let mut compacted = String::with_capacity(cleaned.len());
    let mut prev_underscore = false;
    for c in cleaned.chars() {
        if c == '_' {
            if !prev_underscore {
                compacted.push(c);
            }
            prev_underscore = true;
        } else {
            compacted.push(c);
            prev_underscore = false;
        }
    }
    let mut final_name = compacted;
    if final_name.len() > 80 {
        final_name.truncate(80);
    }
    if is_reserved_windows_name(&final_name) {
        final_name.push('_');
    }
    final_name
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}

fn short_hash(input: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input);
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(8);
    for byte in digest.iter().take(4) {
        use std::fmt::Write;
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}

#[cfg(test)]
mod tests {
    use super::{compact_stamp, results_filename, sanitize, upload_filename};

    #[test]
    fn upload_names_are_deterministic() {
        let a = upload_filename("My Investors.csv", b"row1\nrow2\n");
        let b = upload_filename("My Investors.csv", b"row1\nrow2\n");
        assert_eq!(a, b);
        assert!(a.starts_with("My Investors--"));
        assert!(a.ends_with(".csv"));
    }

    #[test]
    fn upload_names_differ_by_content() {
        let a = upload_filename("list.csv", b"alpha");
        let b = upload_filename("list.csv", b"beta");
        assert_ne!(a, b);
    }

    #[test]
    fn traversal_characters_are_scrubbed() {
        let name = upload_filename("../../etc/passwd", b"x");
        assert!(!name.contains('/'));
        assert!(!name.contains(".."));
    }

    #[test]
    fn compact_stamp_strips_punctuation() {
        assert_eq!(
            compact_stamp("2026-08-06T09:15:42+00:00"),
            "20260806_091542"
        );
        assert_eq!(
            compact_stamp("2026-08-06T09:15:42.123+00:00"),
            "20260806_091542"
        );
    }

    #[test]
    fn results_names_carry_the_stamp() {
        assert_eq!(
            results_filename("2026-08-06T09:15:42+00:00"),
            "results_20260806_091542.csv"
        );
    }

    #[test]
    fn reserved_names_get_suffixed() {
        assert_eq!(sanitize("CON"), "CON_");
    }
}
