use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Sub},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{Currency, EngineError};

/// Signed money amount represented as **integer cents**.
///
/// Use this type for **all** monetary values (expense and budget amounts,
/// filter bounds, aggregate totals) to avoid floating-point drift.
///
/// # Examples
///
/// ```rust
/// use engine::{Currency, Money};
///
/// let amount = Money::new(12_34);
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// assert_eq!(amount.format(Currency::Usd), "$12.34");
/// ```
///
/// Parsing form input (accepts `.` or `,` as decimal separator; rejects
/// more than 2 significant decimals). Server amounts go through
/// [`Money::from_wire`] instead, which rounds:
///
/// ```rust
/// use engine::Money;
///
/// assert_eq!("10".parse::<Money>().unwrap().cents(), 1000);
/// assert_eq!("10,5".parse::<Money>().unwrap().cents(), 1050);
/// assert_eq!("10.500".parse::<Money>().unwrap().cents(), 1050);
/// assert!("12.345".parse::<Money>().is_err());
/// assert_eq!(Money::from_wire("12.345").unwrap().cents(), 1234);
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Parses an amount as the server sends it.
    ///
    /// Unlike [`FromStr`], any number of decimals is accepted and rounded to
    /// cents (half to even), and exponent notation (`1e2`, `1.5E-1`) is
    /// understood. Fails only on text that is not a decimal number or on a
    /// value outside the cent range.
    pub fn from_wire(s: &str) -> Result<Self, EngineError> {
        let invalid = || EngineError::InvalidAmount(format!("invalid amount: {}", s.trim()));
        let overflow = || EngineError::InvalidAmount("amount too large".to_string());

        let trimmed = s.trim();
        let (negative, rest) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };

        let (mantissa, exponent) = match rest.find(['e', 'E']) {
            Some(at) => {
                let exp = &rest[at + 1..];
                let exp = exp.strip_prefix('+').unwrap_or(exp);
                (&rest[..at], exp.parse::<i64>().map_err(|_| invalid())?)
            }
            None => (rest, 0),
        };

        let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        let well_formed = !(int_part.is_empty() && frac_part.is_empty())
            && int_part.bytes().all(|b| b.is_ascii_digit())
            && frac_part.bytes().all(|b| b.is_ascii_digit());
        if !well_formed {
            return Err(invalid());
        }

        // value = digits * 10^(exponent - frac_len); cents keep the first `cut` digits
        let digits = format!("{int_part}{frac_part}");
        let digits = digits.trim_start_matches('0');
        let len = i64::try_from(digits.len()).map_err(|_| overflow())?;
        let frac_len = i64::try_from(frac_part.len()).map_err(|_| overflow())?;
        let cut = exponent
            .checked_sub(frac_len)
            .and_then(|shift| shift.checked_add(len + 2))
            .ok_or_else(overflow)?;

        let cents = if digits.is_empty() {
            0
        } else if cut > len {
            let zeros = usize::try_from(cut - len).map_err(|_| overflow())?;
            if zeros > 18 {
                return Err(overflow());
            }
            format!("{digits}{}", "0".repeat(zeros))
                .parse::<i64>()
                .map_err(|_| overflow())?
        } else if cut < 0 {
            0
        } else {
            let (kept, dropped) = digits.split_at(cut as usize);
            let kept: i64 = if kept.is_empty() {
                0
            } else {
                kept.parse().map_err(|_| overflow())?
            };
            if rounds_up(kept, dropped) {
                kept.checked_add(1).ok_or_else(overflow)?
            } else {
                kept
            }
        };

        Ok(Money(if negative { -cents } else { cents }))
    }

    /// Formats the amount with the currency symbol, e.g. `$1,234.50` or
    /// `1,234.50€`.
    #[must_use]
    pub fn format(self, currency: Currency) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let major = group_thousands(abs / 100);
        let minor = abs % 100;
        match currency {
            Currency::Usd => format!("{sign}{}{major}.{minor:02}", currency.symbol()),
            Currency::Eur => format!("{sign}{major}.{minor:02}{}", currency.symbol()),
        }
    }
}

/// Half-to-even rounding decision for the digits cut off below one cent.
fn rounds_up(kept: i64, dropped: &str) -> bool {
    let mut rest = dropped.bytes();
    match rest.next() {
        Some(b'6'..=b'9') => true,
        Some(b'5') => rest.any(|b| b != b'0') || kept % 2 == 1,
        _ => false,
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Plain decimal form (`12.34`, `-0.05`), the shape the API accepts.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Money> for i64 {
    fn from(value: Money) -> Self {
        value.0
    }
}

/// Addition saturates at the `i64` cent range instead of overflowing.
impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Self::Output {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        *self = *self + rhs;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Self::Output {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl FromStr for Money {
    type Err = EngineError;

    /// Parses a decimal string into cents.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`.
    ///
    /// Validation rules:
    /// - at most 2 significant fractional digits (`12.50` and `12.500` are
    ///   fine, `12.345` is rejected)
    /// - rejects empty/invalid strings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let empty = || EngineError::InvalidAmount("empty amount".to_string());
        let invalid = || EngineError::InvalidAmount(format!("invalid amount: {}", s.trim()));
        let overflow = || EngineError::InvalidAmount("amount too large".to_string());

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(empty());
        }

        let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (true, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (false, stripped)
        } else {
            (false, trimmed)
        };

        let rest = rest.trim();
        if rest.is_empty() {
            return Err(empty());
        }

        let rest = rest.replace(',', ".");
        let mut parts = rest.split('.');
        let major_str = parts.next().ok_or_else(invalid)?;
        let frac_str = parts.next();

        if parts.next().is_some() {
            return Err(invalid());
        }

        if major_str.is_empty() || !major_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let major: i64 = major_str.parse().map_err(|_| overflow())?;

        let cents: i64 = match frac_str {
            None | Some("") => 0,
            Some(frac) => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                let (significant, tail) = frac.split_at(frac.len().min(2));
                if tail.chars().any(|c| c != '0') {
                    return Err(EngineError::InvalidAmount("too many decimals".to_string()));
                }
                let value: i64 = significant.parse().map_err(|_| invalid())?;
                if significant.len() == 1 { value * 10 } else { value }
            }
        };

        let total = major
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .ok_or_else(overflow)?;

        let signed = if negative {
            total.checked_neg().ok_or_else(overflow)?
        } else {
            total
        };

        Ok(Money(signed))
    }
}
