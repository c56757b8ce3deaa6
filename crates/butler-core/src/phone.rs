//! Phone number keystroke filter and display formatting.

/// Longest number allowed by E.164
const MAX_PHONE_DIGITS: usize = 15;

/// Characters the phone field accepts as keystrokes
pub fn is_phone_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '+' | '-' | '(' | ')' | ' ')
}

/// Reformat partial phone input for redisplay.
///
/// A leading `+` is kept, everything else except digits is dropped.
/// German (`+49`) and Polish (`+48`) numbers are grouped, national numbers
/// starting with `0` get a space after the four-digit trunk prefix.
pub fn format_phone(raw: &str) -> String {
    let trimmed = raw.trim_start();
    let international = trimmed.starts_with('+');
    let digits: String = trimmed
        .chars()
        .filter(char::is_ascii_digit)
        .take(MAX_PHONE_DIGITS)
        .collect();

    if international {
        if let Some(rest) = digits.strip_prefix("49") {
            return join_groups("+49", rest, &[3]);
        }
        if let Some(rest) = digits.strip_prefix("48") {
            return join_groups("+48", rest, &[3, 3]);
        }
        return format!("+{}", digits);
    }

    if digits.starts_with('0') && digits.len() > 4 {
        return format!("{} {}", &digits[..4], &digits[4..]);
    }

    digits
}

/// `head`, then `rest` split into the given group sizes with the remainder
/// as a final group
fn join_groups(head: &str, rest: &str, groups: &[usize]) -> String {
    let mut out = head.to_string();
    let mut remaining = rest;

    for &size in groups {
        if remaining.is_empty() {
            return out;
        }
        let take = size.min(remaining.len());
        out.push(' ');
        out.push_str(&remaining[..take]);
        remaining = &remaining[take..];
    }

    if !remaining.is_empty() {
        out.push(' ');
        out.push_str(remaining);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_keystroke_filter() {
        for c in "0123456789+-() ".chars() {
            assert!(is_phone_char(c), "{:?} should be accepted", c);
        }
        for c in "a.#/x".chars() {
            assert!(!is_phone_char(c));
        }
    }

    #[test]
    fn test_format_german() {
        assert_eq!(format_phone("+"), "+");
        assert_eq!(format_phone("+4"), "+4");
        assert_eq!(format_phone("+49"), "+49");
        assert_eq!(format_phone("+4915"), "+49 15");
        assert_eq!(format_phone("+49 (151) 2345-6789"), "+49 151 23456789");
    }

    #[test]
    fn test_format_polish() {
        assert_eq!(format_phone("+48123456789"), "+48 123 456 789");
        assert_eq!(format_phone("+481234"), "+48 123 4");
    }

    #[test]
    fn test_format_national_and_other() {
        assert_eq!(format_phone("015123456789"), "0151 23456789");
        assert_eq!(format_phone("0151"), "0151");
        assert_eq!(format_phone("+1 555 0100"), "+15550100");
        assert_eq!(format_phone("555-0100"), "5550100");
    }

    #[test]
    fn test_format_caps_digits() {
        let formatted = format_phone("+4912345678901234567");
        assert_eq!(formatted.chars().filter(char::is_ascii_digit).count(), 15);
    }

    #[test]
    fn test_format_is_stable_on_output() {
        for input in ["+49 151 23456789", "+48 123 456 789", "0151 23456789", "+15550100"] {
            assert_eq!(format_phone(input), input);
        }
    }
}
