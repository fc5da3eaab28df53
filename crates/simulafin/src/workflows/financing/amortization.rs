use serde::{Deserialize, Serialize};

use super::money::{format_brl_whole, parse_currency};

/// Fixed nominal annual rate offered by the simulator.
pub const ANNUAL_RATE: f64 = 0.12;
pub const MIN_DOWN_PAYMENT_PERCENTAGE: f64 = 20.0;
pub const MAX_DOWN_PAYMENT_PERCENTAGE: f64 = 90.0;
pub const MIN_TERM_YEARS: u32 = 1;
pub const MAX_TERM_YEARS: u32 = 35;
/// Largest property value accepted, R$ 1 trillion. Keeps every figure exact to the cent.
pub const MAX_PROPERTY_VALUE: f64 = 1_000_000_000_000.0;

/// Rejected simulation parameters. Raised before anything is persisted.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AmortizationError {
    #[error("property value '{raw}' is not a number")]
    NonNumericPropertyValue { raw: String },
    #[error("property value must be greater than zero (found {0})")]
    NonPositivePropertyValue(f64),
    #[error("property value cannot exceed R$ 1.000.000.000.000 (found {0})")]
    PropertyValueAboveMaximum(f64),
    #[error("minimum down payment is 20% (found {0}%)")]
    DownPaymentBelowMinimum(f64),
    #[error("down payment cannot exceed 90% (found {0}%)")]
    DownPaymentAboveMaximum(f64),
    #[error("term must be between 1 and 35 years (found {0})")]
    TermOutOfRange(u32),
    #[error("annual rate must be a non-negative number (found {0})")]
    InvalidRate(f64),
}

/// Parameters for a single SAC simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationInput {
    pub property_value: f64,
    pub down_payment_percentage: f64,
    pub term_years: u32,
    pub annual_rate: f64,
}

impl SimulationInput {
    /// Input at the simulator's fixed annual rate.
    pub fn new(property_value: f64, down_payment_percentage: f64, term_years: u32) -> Self {
        Self {
            property_value,
            down_payment_percentage,
            term_years,
            annual_rate: ANNUAL_RATE,
        }
    }

    /// Build an input from the display-formatted property value typed by the user.
    pub fn parse(
        raw_property_value: &str,
        down_payment_percentage: f64,
        term_years: u32,
    ) -> Result<Self, AmortizationError> {
        let property_value = parse_currency(raw_property_value)?;
        Ok(Self::new(property_value, down_payment_percentage, term_years))
    }

    pub fn total_months(&self) -> u32 {
        self.term_years * 12
    }

    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate / 12.0
    }

    pub fn validate(&self) -> Result<(), AmortizationError> {
        if !self.property_value.is_finite() || self.property_value <= 0.0 {
            return Err(AmortizationError::NonPositivePropertyValue(
                self.property_value,
            ));
        }
        if self.property_value > MAX_PROPERTY_VALUE {
            return Err(AmortizationError::PropertyValueAboveMaximum(
                self.property_value,
            ));
        }
        // NaN compares false against both bounds, so check it explicitly.
        if self.down_payment_percentage.is_nan()
            || self.down_payment_percentage < MIN_DOWN_PAYMENT_PERCENTAGE
        {
            return Err(AmortizationError::DownPaymentBelowMinimum(
                self.down_payment_percentage,
            ));
        }
        if self.down_payment_percentage > MAX_DOWN_PAYMENT_PERCENTAGE {
            return Err(AmortizationError::DownPaymentAboveMaximum(
                self.down_payment_percentage,
            ));
        }
        if !(MIN_TERM_YEARS..=MAX_TERM_YEARS).contains(&self.term_years) {
            return Err(AmortizationError::TermOutOfRange(self.term_years));
        }
        if !self.annual_rate.is_finite() || self.annual_rate < 0.0 {
            return Err(AmortizationError::InvalidRate(self.annual_rate));
        }
        Ok(())
    }

    pub fn down_payment(&self) -> f64 {
        self.property_value * self.down_payment_percentage / 100.0
    }

    pub fn financed_amount(&self) -> f64 {
        self.property_value - self.down_payment()
    }

    /// Full month-by-month schedule. Validates first so the iterator is always finite.
    pub fn schedule(&self) -> Result<AmortizationSchedule, AmortizationError> {
        self.validate()?;
        Ok(AmortizationSchedule::new(
            self.financed_amount(),
            self.monthly_rate(),
            self.total_months(),
        ))
    }
}

/// Summary of a computed SAC schedule. Values are unrounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub down_payment: f64,
    pub financed_amount: f64,
    pub monthly_amortization: f64,
    /// Largest installment of the schedule, surfaced as "the" monthly payment.
    pub first_monthly_payment: f64,
    pub total_interest: f64,
    pub total_amount: f64,
}

/// One row of the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Installment {
    pub month: u32,
    pub amortization: f64,
    pub interest: f64,
    pub payment: f64,
    /// Balance left after this installment.
    pub remaining_balance: f64,
}

/// Lazy iterator over the installments of a SAC loan.
#[derive(Debug, Clone)]
pub struct AmortizationSchedule {
    amortization: f64,
    monthly_rate: f64,
    balance: f64,
    month: u32,
    total_months: u32,
}

impl AmortizationSchedule {
    fn new(financed_amount: f64, monthly_rate: f64, total_months: u32) -> Self {
        Self {
            amortization: financed_amount / f64::from(total_months),
            monthly_rate,
            balance: financed_amount,
            month: 0,
            total_months,
        }
    }
}

impl Iterator for AmortizationSchedule {
    type Item = Installment;

    fn next(&mut self) -> Option<Self::Item> {
        if self.month >= self.total_months {
            return None;
        }

        let interest = self.balance * self.monthly_rate;
        self.balance -= self.amortization;
        self.month += 1;

        Some(Installment {
            month: self.month,
            amortization: self.amortization,
            interest,
            payment: self.amortization + interest,
            remaining_balance: self.balance,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.total_months - self.month) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for AmortizationSchedule {}

/// Compute the SAC summary for the given loan parameters.
pub fn compute_sac(
    property_value: f64,
    down_payment_percentage: f64,
    term_years: u32,
    annual_rate: f64,
) -> Result<SimulationResult, AmortizationError> {
    SimulationInput {
        property_value,
        down_payment_percentage,
        term_years,
        annual_rate,
    }
    .compute()
}

impl SimulationInput {
    pub fn compute(&self) -> Result<SimulationResult, AmortizationError> {
        let schedule = self.schedule()?;
        let financed_amount = self.financed_amount();
        let monthly_amortization = financed_amount / f64::from(self.total_months());
        let first_monthly_payment = monthly_amortization + financed_amount * self.monthly_rate();

        let total_interest: f64 = schedule.map(|installment| installment.interest).sum();

        Ok(SimulationResult {
            down_payment: self.down_payment(),
            financed_amount,
            monthly_amortization,
            first_monthly_payment,
            total_interest,
            total_amount: financed_amount + total_interest,
        })
    }
}

/// Column set shared by persisted simulations and submissions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancingSummary {
    /// Display string of the property value, kept for search and the proposal document.
    pub property_value: String,
    pub down_payment: f64,
    pub down_payment_percentage: f64,
    pub financed_amount: f64,
    pub monthly_payment: f64,
    pub total_amount: f64,
    pub total_interest: f64,
    pub term_years: u32,
}

impl FinancingSummary {
    pub fn new(input: &SimulationInput, result: &SimulationResult) -> Self {
        Self {
            property_value: format_brl_whole(input.property_value),
            down_payment: result.down_payment,
            down_payment_percentage: input.down_payment_percentage,
            financed_amount: result.financed_amount,
            monthly_payment: result.first_monthly_payment,
            total_amount: result.total_amount,
            total_interest: result.total_interest,
            term_years: input.term_years,
        }
    }

    pub fn installments(&self) -> u32 {
        self.term_years * 12
    }
}
