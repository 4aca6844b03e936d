use chrono::{DateTime, Utc};

/// Formats a timestamp for display
///
/// # Arguments
///
/// * `date` - The UTC timestamp to format
///
/// # Returns
///
/// A `String` in the "dd-mm-yyyy" format
pub fn format_date(date: DateTime<Utc>) -> String {
    date.format("%d-%m-%Y").to_string()
}

/// Formats an amount of money with two decimals, e.g. "৳ 12.50".
pub fn format_price(amount: f64) -> String {
    format!("৳ {:.2}", amount)
}

/// Cuts text down for buttons and list rows
///
/// # Arguments
///
/// * `text` - The text to shorten
/// * `max` - The maximum number of characters, including the marker
///
/// # Returns
///
/// `text` unchanged when it fits, otherwise its first `max - 1` characters
/// followed by "…"
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

/// Last eight characters of an identifier, upper-cased, as shown to users.
pub fn short_id(id: &str) -> String {
    let chars: Vec<char> = id.chars().collect();
    let start = chars.len().saturating_sub(8);
    chars[start..].iter().collect::<String>().to_uppercase()
}
