//! Display formatting for tiles and charts. Fixed to the Indian locale.

use chrono::{DateTime, NaiveDate};

/// Rupees rounded to whole units with lakh grouping: `₹1,23,457`.
pub fn inr(amount: f64) -> String {
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{}₹{}", sign, group_lakh(rounded.abs() as u64))
}

/// `12.5%`. Whole values keep one decimal (`40.0%`).
pub fn percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// `05 Jan 2025` from an ISO date or timestamp; anything else is returned as is.
pub fn date(raw: &str) -> String {
    let raw = raw.trim();
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .ok()
        .or_else(|| NaiveDate::parse_from_str(raw.get(..10).unwrap_or(raw), "%Y-%m-%d").ok());
    match parsed {
        Some(d) => d.format("%d %b %Y").to_string(),
        None => raw.to_string(),
    }
}

fn group_lakh(n: u64) -> String {
    let digits = n.to_string();
    if digits.len() <= 3 {
        return digits;
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inr_lakh_grouping() {
        assert_eq!(inr(0.0), "₹0");
        assert_eq!(inr(999.0), "₹999");
        assert_eq!(inr(1000.0), "₹1,000");
        assert_eq!(inr(123456.5), "₹1,23,457");
        assert_eq!(inr(12345678.0), "₹1,23,45,678");
        assert_eq!(inr(-2500.0), "-₹2,500");
    }

    #[test]
    fn test_percent_and_date() {
        assert_eq!(percent(12.5), "12.5%");
        assert_eq!(percent(40.0), "40.0%");
        assert_eq!(date("2025-01-05"), "05 Jan 2025");
        assert_eq!(date("2025-01-05T18:30:00.000Z"), "05 Jan 2025");
        assert_eq!(date("soon"), "soon");
    }
}
