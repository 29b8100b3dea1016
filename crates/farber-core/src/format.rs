//! Display formatting for money and dates

use chrono::NaiveDate;

use crate::models::Settings;

/// Placeholder shown for a missing date
pub const MISSING_DATE: &str = "—";

/// Format a date as `dd/mm/yyyy`
pub fn format_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => date.format("%d/%m/%Y").to_string(),
        None => MISSING_DATE.to_string(),
    }
}

/// Money formatting derived from the business settings
///
/// Amounts use Argentine separators: `.` between thousands and `,` before
/// the cents, e.g. `$ 1.500,00`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoneyFormat {
    pub symbol: String,
    pub show_cents: bool,
}

impl Default for MoneyFormat {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for MoneyFormat {
    fn from(settings: &Settings) -> Self {
        Self {
            symbol: settings.currency_symbol.clone(),
            show_cents: settings.show_cents,
        }
    }
}

impl MoneyFormat {
    pub fn format(&self, amount: f64) -> String {
        let amount = if amount.is_finite() { amount } else { 0.0 };
        let decimals = if self.show_cents { 2 } else { 0 };
        let digits = format!("{:.*}", decimals, amount.abs());

        let (integer, cents) = match digits.split_once('.') {
            Some((integer, cents)) => (integer, Some(cents)),
            None => (digits.as_str(), None),
        };

        // "-0,00" reads as noise
        let is_zero = digits.chars().all(|c| c == '0' || c == '.');
        let sign = if amount < 0.0 && !is_zero { "-" } else { "" };

        let mut out = if self.symbol.is_empty() {
            format!("{}{}", sign, group_thousands(integer))
        } else {
            format!("{}{} {}", sign, self.symbol, group_thousands(integer))
        };
        if let Some(cents) = cents {
            out.push(',');
            out.push_str(cents);
        }
        out
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_with_cents() {
        let money = MoneyFormat::default();
        assert_eq!(money.format(1500.0), "$ 1.500,00");
        assert_eq!(money.format(1234567.891), "$ 1.234.567,89");
        assert_eq!(money.format(0.0), "$ 0,00");
        assert_eq!(money.format(999.5), "$ 999,50");
    }

    #[test]
    fn test_money_without_cents() {
        let money = MoneyFormat {
            symbol: "US$".to_string(),
            show_cents: false,
        };
        assert_eq!(money.format(1500.6), "US$ 1.501");
        assert_eq!(money.format(12.0), "US$ 12");
    }

    #[test]
    fn test_money_negative_and_garbage() {
        let money = MoneyFormat::default();
        assert_eq!(money.format(-2500.0), "-$ 2.500,00");
        assert_eq!(money.format(-0.001), "$ 0,00");
        assert_eq!(money.format(f64::NAN), "$ 0,00");
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7);
        assert_eq!(format_date(date), "07/03/2024");
        assert_eq!(format_date(None), MISSING_DATE);
    }
}
