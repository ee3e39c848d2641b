use chrono::NaiveDate;

/// Currency prefix used by the seed data and the edit forms.
const CURRENCY_PREFIX: &str = "Rs.";

/// Extract a whole-rupee amount from a formatted currency string.
///
/// Accepts the forms found in the beneficiary data: `"Rs. 1,20,000"`,
/// `"₹ 1,20,000"`, `"120000"`. Anything before the first digit is treated as
/// a prefix; a `-` directly in front of the digits negates the value. Digits
/// are read until a `.` or any character other than `,` or a space. Paise
/// are dropped.
///
/// Empty input, input without digits, or an amount that does not fit in an
/// `i64` yields 0.
pub fn parse_currency(value: &str) -> i64 {
    let Some(start) = value.find(|c: char| c.is_ascii_digit()) else {
        return 0;
    };

    let negative = value[..start].trim_end().ends_with('-');

    let mut amount: i64 = 0;
    for c in value[start..].chars() {
        match c {
            '0'..='9' => {
                let digit = i64::from(c as u8 - b'0');
                amount = match amount.checked_mul(10).and_then(|a| a.checked_add(digit)) {
                    Some(a) => a,
                    None => return 0,
                };
            }
            ',' | ' ' => continue,
            _ => break,
        }
    }

    if negative {
        -amount
    } else {
        amount
    }
}

/// Format a rupee amount with Indian digit grouping: `120000` -> `"Rs. 1,20,000"`.
pub fn format_currency(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let sign = if amount < 0 { "-" } else { "" };
    format!("{} {}{}", CURRENCY_PREFIX, sign, group_indian(&digits))
}

/// Group a run of digits as lakhs/crores: last three digits, then pairs.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

/// Format an Indian mobile number for display as `+91 98765 43210`.
/// Returns the input unchanged when it isn't a recognizable 10-digit number.
pub fn format_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    let local = match digits.len() {
        10 => &digits[..],
        12 if digits.starts_with("91") => &digits[2..],
        _ => return phone.to_string(),
    };
    format!("+91 {} {}", &local[0..5], &local[5..10])
}

/// Parse a `YYYY-MM-DD` date, also accepting a full RFC 3339 timestamp.
pub fn parse_date(date: &str) -> Option<NaiveDate> {
    let date = date.trim();
    if date.is_empty() {
        return None;
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(date) {
        return Some(dt.date_naive());
    }
    let day: String = date.chars().take(10).collect();
    NaiveDate::parse_from_str(&day, "%Y-%m-%d").ok()
}

/// Format a date string to a more readable format
pub fn format_date(date: &str) -> String {
    match parse_date(date) {
        Some(d) => d.format("%b %d, %Y").to_string(),
        None => date.to_string(),
    }
}

/// Case-insensitive substring match. An empty needle always matches.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Integer percentage of `part` in `whole`, rounded half away from zero.
/// Zero when `whole` is zero.
pub fn percentage(part: i64, whole: i64) -> i64 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as i64
}
