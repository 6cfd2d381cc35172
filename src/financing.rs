//! Financing Valuation
//!
//! Values a bullet (interest-only) loan drawn against the purchase budget. The
//! loan raises `principal` today; its obligations (monthly interest plus the
//! principal at maturity) are discounted at the market rate rather than the
//! loan's own rate. The difference is the net financing value.

use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

const MONTHS_PER_YEAR: u32 = 12;

/// Errors raised while valuing a loan.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FinancingError {
    /// Decimal arithmetic overflowed or a result did not fit in minor units.
    #[error("financing arithmetic overflowed")]
    Overflow,
}

/// Terms of the loan drawn against the budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoanTerms {
    /// Fraction of the budget financed by debt, in `[0, 1]`
    pub ltv: Decimal,

    /// Annual interest rate charged on the loan (0.06 = 6%)
    pub annual_rate: Decimal,

    /// Loan term in whole years
    pub period_years: u32,
}

impl LoanTerms {
    /// Create loan terms.
    #[must_use]
    pub const fn new(ltv: Decimal, annual_rate: Decimal, period_years: u32) -> Self {
        Self {
            ltv,
            annual_rate,
            period_years,
        }
    }

    /// Terms describing an all-equity purchase.
    #[must_use]
    pub const fn unleveraged() -> Self {
        Self::new(Decimal::ZERO, Decimal::ZERO, 0)
    }
}

/// Valuation of a financing arrangement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Financing<'a> {
    /// Amount borrowed
    pub principal: Money<'a, Currency>,

    /// Interest paid each month
    pub monthly_payment: Money<'a, Currency>,

    /// Number of monthly payments
    pub months: u32,

    /// Present value of the interest payments
    pub pv_payments: Money<'a, Currency>,

    /// Present value of the principal repaid at maturity
    pub pv_principal: Money<'a, Currency>,

    /// Principal minus the present value of all obligations
    pub net_value: Money<'a, Currency>,
}

impl<'a> Financing<'a> {
    /// A financing arrangement with no cash flows beyond the principal.
    fn inert(principal: Money<'a, Currency>) -> Self {
        let zero = Money::from_minor(0, principal.currency());

        Self {
            principal,
            monthly_payment: zero,
            months: 0,
            pv_payments: zero,
            pv_principal: zero,
            net_value: zero,
        }
    }
}

/// Value the loan described by `terms` against `budget`.
///
/// All amounts are computed in minor units and rounded to whole minor units.
/// A non-positive principal or a zero-year term yields a zero net value. A zero
/// discount rate values the interest stream at its undiscounted sum.
///
/// # Errors
///
/// Returns [`FinancingError::Overflow`] if decimal arithmetic overflows.
pub fn valuate<'a>(
    budget: &Money<'a, Currency>,
    terms: &LoanTerms,
    discount_rate: Decimal,
) -> Result<Financing<'a>, FinancingError> {
    let currency = budget.currency();
    let budget_minor = Decimal::from(budget.to_minor_units());

    let principal = budget_minor
        .checked_mul(terms.ltv)
        .ok_or(FinancingError::Overflow)?;

    let principal_minor = to_minor(principal)?;
    let principal = Decimal::from(principal_minor);

    if principal_minor <= 0 || terms.period_years == 0 {
        return Ok(Financing::inert(Money::from_minor(principal_minor, currency)));
    }

    let months = terms
        .period_years
        .checked_mul(MONTHS_PER_YEAR)
        .ok_or(FinancingError::Overflow)?;

    let months_dec = Decimal::from(months);
    let twelve = Decimal::from(MONTHS_PER_YEAR);

    let monthly_loan_rate = terms.annual_rate / twelve;
    let monthly_discount = discount_rate / twelve;

    let payment = principal
        .checked_mul(monthly_loan_rate)
        .ok_or(FinancingError::Overflow)?;

    let (pv_payments, pv_principal) = if monthly_discount.is_zero() {
        let pv_payments = payment
            .checked_mul(months_dec)
            .ok_or(FinancingError::Overflow)?;

        (pv_payments, principal)
    } else {
        let growth = (Decimal::ONE + monthly_discount)
            .checked_powi(i64::from(months))
            .ok_or(FinancingError::Overflow)?;

        let discount_factor = Decimal::ONE
            .checked_div(growth)
            .ok_or(FinancingError::Overflow)?;

        let pv_payments = payment
            .checked_mul(Decimal::ONE - discount_factor)
            .and_then(|value| value.checked_div(monthly_discount))
            .ok_or(FinancingError::Overflow)?;

        let pv_principal = principal
            .checked_mul(discount_factor)
            .ok_or(FinancingError::Overflow)?;

        (pv_payments, pv_principal)
    };

    let net_value = pv_payments
        .checked_add(pv_principal)
        .and_then(|obligations| principal.checked_sub(obligations))
        .ok_or(FinancingError::Overflow)?;

    Ok(Financing {
        principal: Money::from_minor(principal_minor, currency),
        monthly_payment: Money::from_minor(to_minor(payment)?, currency),
        months,
        pv_payments: Money::from_minor(to_minor(pv_payments)?, currency),
        pv_principal: Money::from_minor(to_minor(pv_principal)?, currency),
        net_value: Money::from_minor(to_minor(net_value)?, currency),
    })
}

fn to_minor(value: Decimal) -> Result<i64, FinancingError> {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(FinancingError::Overflow)
}
