//! Currency conversion through a pivot-currency rate table.

use std::collections::HashMap;
use std::str::FromStr;

use super::error::FinsightError;

pub const DEFAULT_PIVOT: &str = "USD";

/// Rate used for codes the table does not know under [`UnknownCurrencyPolicy::Fallback`].
const UNKNOWN_CODE_RATE: f64 = 1.0;

const POPULAR_CODES: [&str; 8] = ["EUR", "GBP", "JPY", "CAD", "AUD", "CHF", "CNY", "INR"];

const CURRENCY_NAMES: [(&str, &str); 15] = [
    ("USD", "US Dollar"),
    ("EUR", "Euro"),
    ("GBP", "British Pound"),
    ("JPY", "Japanese Yen"),
    ("CAD", "Canadian Dollar"),
    ("AUD", "Australian Dollar"),
    ("CHF", "Swiss Franc"),
    ("CNY", "Chinese Yuan"),
    ("INR", "Indian Rupee"),
    ("SGD", "Singapore Dollar"),
    ("KRW", "South Korean Won"),
    ("BRL", "Brazilian Real"),
    ("MXN", "Mexican Peso"),
    ("RUB", "Russian Ruble"),
    ("ZAR", "South African Rand"),
];

const FALLBACK_USD_RATES: [(&str, f64); 15] = [
    ("USD", 1.0),
    ("EUR", 0.85),
    ("GBP", 0.73),
    ("JPY", 110.0),
    ("CAD", 1.25),
    ("AUD", 1.35),
    ("CHF", 0.92),
    ("CNY", 6.45),
    ("INR", 83.2),
    ("SGD", 1.35),
    ("KRW", 1300.0),
    ("BRL", 5.2),
    ("MXN", 17.5),
    ("RUB", 90.0),
    ("ZAR", 15.8),
];

fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// Rates of every currency against one pivot. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    pivot: String,
    rates: HashMap<String, f64>,
}

impl RateTable {
    /// Build a table, inserting the pivot at 1.0 when it is absent.
    pub fn new(
        pivot: &str,
        rates: impl IntoIterator<Item = (String, f64)>,
    ) -> Result<Self, FinsightError> {
        let pivot = normalize_code(pivot);
        if pivot.is_empty() {
            return Err(FinsightError::invalid_input("pivot", "currency code is empty"));
        }

        let mut table = HashMap::new();
        for (code, rate) in rates {
            let code = normalize_code(&code);
            if code.is_empty() {
                return Err(FinsightError::invalid_input("rates", "currency code is empty"));
            }
            if !rate.is_finite() || rate <= 0.0 {
                return Err(FinsightError::invalid_input(
                    "rates",
                    format!("rate for {code} must be a positive number, got {rate}"),
                ));
            }
            table.insert(code, rate);
        }

        match table.get(&pivot) {
            None => {
                table.insert(pivot.clone(), 1.0);
            }
            Some(&rate) if (rate - 1.0).abs() > f64::EPSILON => {
                return Err(FinsightError::invalid_input(
                    "rates",
                    format!("pivot {pivot} must have rate 1.0, got {rate}"),
                ));
            }
            Some(_) => {}
        }

        Ok(Self {
            pivot,
            rates: table,
        })
    }

    pub fn pivot(&self) -> &str {
        &self.pivot
    }

    pub fn get(&self, code: &str) -> Option<f64> {
        self.rates.get(&normalize_code(code)).copied()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Re-express the table against another pivot already present in it.
    pub fn rebased(&self, pivot: &str) -> Result<RateTable, FinsightError> {
        let pivot = normalize_code(pivot);
        if pivot == self.pivot {
            return Ok(self.clone());
        }
        let divisor = self.get(&pivot).ok_or_else(|| FinsightError::UnknownCurrency {
            code: pivot.clone(),
        })?;
        let rates = self
            .rates
            .iter()
            .map(|(code, rate)| {
                let rate = if *code == pivot { 1.0 } else { rate / divisor };
                (code.clone(), rate)
            })
            .collect();
        Ok(RateTable { pivot, rates })
    }

    /// Currency codes in ascending order.
    pub fn codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.rates.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }
}

/// The built-in USD table used when no live rates can be fetched.
pub fn fallback_rates() -> RateTable {
    let rates: HashMap<String, f64> = FALLBACK_USD_RATES
        .iter()
        .map(|(code, rate)| (code.to_string(), *rate))
        .collect();
    RateTable {
        pivot: DEFAULT_PIVOT.to_string(),
        rates,
    }
}

/// What to do when a requested code is missing from the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownCurrencyPolicy {
    /// Treat the code as trading at par with the pivot.
    #[default]
    Fallback,
    /// Fail with [`FinsightError::UnknownCurrency`].
    Reject,
}

impl FromStr for UnknownCurrencyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fallback" => Ok(UnknownCurrencyPolicy::Fallback),
            "reject" => Ok(UnknownCurrencyPolicy::Reject),
            other => Err(format!("expected 'fallback' or 'reject', got '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub amount: f64,
    pub from_currency: String,
    pub to_currency: String,
}

impl ConversionRequest {
    pub fn new(amount: f64, from_currency: &str, to_currency: &str) -> Self {
        Self {
            amount,
            from_currency: normalize_code(from_currency),
            to_currency: normalize_code(to_currency),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionResult {
    pub converted_amount: f64,
    pub effective_rate: f64,
}

fn resolve_rate(
    rates: &RateTable,
    code: &str,
    policy: UnknownCurrencyPolicy,
) -> Result<f64, FinsightError> {
    match (rates.get(code), policy) {
        (Some(rate), _) => Ok(rate),
        (None, UnknownCurrencyPolicy::Fallback) => Ok(UNKNOWN_CODE_RATE),
        (None, UnknownCurrencyPolicy::Reject) => Err(FinsightError::UnknownCurrency {
            code: code.to_string(),
        }),
    }
}

/// Convert via the pivot: `amount / rate(from) * rate(to)`.
pub fn convert(
    request: &ConversionRequest,
    rates: &RateTable,
    policy: UnknownCurrencyPolicy,
) -> Result<ConversionResult, FinsightError> {
    if !request.amount.is_finite() {
        return Err(FinsightError::invalid_input("amount", "must be a finite number"));
    }
    let from = normalize_code(&request.from_currency);
    let to = normalize_code(&request.to_currency);
    if from.is_empty() {
        return Err(FinsightError::invalid_input("from_currency", "currency code is empty"));
    }
    if to.is_empty() {
        return Err(FinsightError::invalid_input("to_currency", "currency code is empty"));
    }

    if from == to {
        return Ok(ConversionResult {
            converted_amount: request.amount,
            effective_rate: 1.0,
        });
    }

    let from_rate = resolve_rate(rates, &from, policy)?;
    let to_rate = resolve_rate(rates, &to, policy)?;
    let pivot_amount = request.amount / from_rate;

    Ok(ConversionResult {
        converted_amount: pivot_amount * to_rate,
        effective_rate: to_rate / from_rate,
    })
}

/// Display name for a code; unknown codes are returned unchanged.
pub fn currency_name(code: &str) -> String {
    let code = normalize_code(code);
    CURRENCY_NAMES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| name.to_string())
        .unwrap_or(code)
}

/// Commonly quoted currencies present in the table, in display order.
pub fn popular_rates(rates: &RateTable) -> Vec<(&'static str, f64)> {
    POPULAR_CODES
        .iter()
        .filter_map(|code| rates.get(code).map(|rate| (*code, rate)))
        .collect()
}

/// Precision shrinks as the rate grows: 2, 4 or 6 decimals.
pub fn format_rate(rate: f64) -> String {
    if rate >= 100.0 {
        format!("{rate:.2}")
    } else if rate >= 1.0 {
        format!("{rate:.4}")
    } else {
        format!("{rate:.6}")
    }
}

/// Lenient amount parsing: keep digits and '.', blank means 1.
pub fn parse_amount(text: &str) -> Result<f64, FinsightError> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return Ok(1.0);
    }
    cleaned
        .parse::<f64>()
        .map_err(|_| FinsightError::invalid_input("amount", format!("'{}' is not a number", text.trim())))
}
