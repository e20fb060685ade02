//! Systematic Investment Plan projection.
//!
//! Monthly contributions compound at `annual_rate_percent / 12` per month.
//! Each contribution earns one extra period of growth (annuity-due), so the
//! future value is `P * ((1 + r)^n - 1) / r * (1 + r)`.

use super::error::FinsightError;

/// Upper bound on the projection horizon; bounds the length of the yearly series.
pub const MAX_DURATION_YEARS: f64 = 1_200.0;

const DEFAULT_MONTHLY: f64 = 5_000.0;
const DEFAULT_YEARS: f64 = 10.0;
const DEFAULT_RATE: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionInput {
    monthly_contribution: f64,
    duration_years: f64,
    annual_rate_percent: f64,
}

impl ProjectionInput {
    pub fn new(
        monthly_contribution: f64,
        duration_years: f64,
        annual_rate_percent: f64,
    ) -> Result<Self, FinsightError> {
        if !monthly_contribution.is_finite() || monthly_contribution <= 0.0 {
            return Err(FinsightError::invalid_input(
                "monthly_contribution",
                "must be a positive number",
            ));
        }
        if !duration_years.is_finite() || duration_years <= 0.0 {
            return Err(FinsightError::invalid_input(
                "duration_years",
                "must be a positive number",
            ));
        }
        if duration_years > MAX_DURATION_YEARS {
            return Err(FinsightError::invalid_input(
                "duration_years",
                format!("must not exceed {MAX_DURATION_YEARS} years"),
            ));
        }
        if !annual_rate_percent.is_finite() || annual_rate_percent < 0.0 {
            return Err(FinsightError::invalid_input(
                "annual_rate_percent",
                "must be zero or a positive number",
            ));
        }
        let input = Self {
            monthly_contribution,
            duration_years,
            annual_rate_percent,
        };
        if !future_value(monthly_contribution, input.monthly_rate(), input.months()).is_finite() {
            return Err(FinsightError::invalid_input(
                "duration_years",
                "projected value overflows at this rate and duration",
            ));
        }
        Ok(input)
    }

    pub fn monthly_contribution(&self) -> f64 {
        self.monthly_contribution
    }

    pub fn duration_years(&self) -> f64 {
        self.duration_years
    }

    pub fn annual_rate_percent(&self) -> f64 {
        self.annual_rate_percent
    }

    /// Monthly compounding rate as a fraction.
    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate_percent / 100.0 / 12.0
    }

    /// Number of monthly contributions; fractional when the duration is.
    pub fn months(&self) -> f64 {
        self.duration_years * 12.0
    }
}

/// Parse the three text fields of a SIP form.
///
/// Blank fields take the form defaults (5000 per month, 10 years, 12%).
pub fn parse_projection_input(
    monthly: &str,
    years: &str,
    rate: &str,
) -> Result<ProjectionInput, FinsightError> {
    let monthly = parse_field("monthly_contribution", monthly, DEFAULT_MONTHLY)?;
    let years = parse_field("duration_years", years, DEFAULT_YEARS)?;
    let rate = parse_field("annual_rate_percent", rate, DEFAULT_RATE)?;
    ProjectionInput::new(monthly, years, rate)
}

fn parse_field(field: &str, text: &str, default: f64) -> Result<f64, FinsightError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(default);
    }
    trimmed
        .parse::<f64>()
        .map_err(|_| FinsightError::invalid_input(field, format!("'{trimmed}' is not a number")))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearPoint {
    pub year: u32,
    pub invested: f64,
    pub projected_value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionResult {
    pub total_invested: f64,
    pub future_value: f64,
    pub total_gain: f64,
    pub yearly_series: Vec<YearPoint>,
}

impl ProjectionResult {
    /// Gain as a fraction of the invested principal.
    pub fn gain_ratio(&self) -> f64 {
        if self.total_invested > 0.0 {
            self.total_gain / self.total_invested
        } else {
            0.0
        }
    }
}

/// Future value of `months` contributions of `monthly` at `monthly_rate`.
pub fn future_value(monthly: f64, monthly_rate: f64, months: f64) -> f64 {
    monthly * annuity_due_factor(monthly_rate, months)
}

fn annuity_due_factor(monthly_rate: f64, months: f64) -> f64 {
    // r == 0 is the limit of the annuity formula; dividing would be 0/0.
    if monthly_rate > 0.0 {
        ((1.0 + monthly_rate).powf(months) - 1.0) / monthly_rate * (1.0 + monthly_rate)
    } else {
        months
    }
}

pub fn project(input: &ProjectionInput) -> ProjectionResult {
    let monthly = input.monthly_contribution();
    let r = input.monthly_rate();
    let n = input.months();

    let value = future_value(monthly, r, n);
    let total_invested = monthly * n;

    let whole_years = input.duration_years().floor() as u32;
    let yearly_series = (1..=whole_years)
        .map(|year| {
            let months = 12.0 * f64::from(year);
            YearPoint {
                year,
                invested: monthly * months,
                projected_value: future_value(monthly, r, months),
            }
        })
        .collect();

    ProjectionResult {
        total_invested,
        future_value: value,
        total_gain: value - total_invested,
        yearly_series,
    }
}
