// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! EMI quoting and reducing-balance amortization.
//!
//! Months are counted on the calendar: a loan started on the 28th has one
//! month elapsed as soon as the next calendar month begins. Completion is the
//! share of tenure iterations run, not the share of principal repaid.

use crate::error::LedgerError;
use crate::models::Loan;
use crate::utils::{month_key, round_money, serialize_money_str};
use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Per-loan position as of an evaluation date.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanView {
    pub id: i64,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub emi: Decimal,
    pub tenure: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub interest: Decimal,
    pub start_date: NaiveDate,
    pub months_paid: u32,
    pub completion: u32,
    #[serde(serialize_with = "serialize_money_str")]
    pub interest_paid: Decimal,
    #[serde(serialize_with = "serialize_money_str")]
    pub principal_paid: Decimal,
    #[serde(serialize_with = "serialize_money_str")]
    pub principal_remaining: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRow {
    pub installment: u32,
    pub month: String,
    #[serde(serialize_with = "serialize_money_str")]
    pub payment: Decimal,
    #[serde(serialize_with = "serialize_money_str")]
    pub interest: Decimal,
    #[serde(serialize_with = "serialize_money_str")]
    pub principal: Decimal,
    #[serde(serialize_with = "serialize_money_str")]
    pub balance: Decimal,
}

/// One simulated monthly payment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Installment {
    pub interest: Decimal,
    pub principal: Decimal,
    pub balance: Decimal,
}

/// Walks the payment schedule month by month. Stops after the payment that
/// takes the balance to zero or below.
#[derive(Debug, Clone)]
pub struct Amortizer {
    balance: Decimal,
    rate: Decimal,
    emi: Decimal,
    paid_off: bool,
}

impl Amortizer {
    pub fn new(principal: Decimal, annual_rate: Decimal, emi: Decimal) -> Self {
        Self {
            balance: principal,
            rate: monthly_rate(annual_rate),
            emi,
            paid_off: false,
        }
    }

    pub fn for_loan(loan: &Loan) -> Self {
        Self::new(loan.principal, loan.annual_rate, loan.emi)
    }
}

impl Iterator for Amortizer {
    type Item = Installment;

    fn next(&mut self) -> Option<Installment> {
        if self.paid_off {
            return None;
        }
        let interest = self.balance * self.rate;
        let mut principal = self.emi - interest;
        // final payment never overshoots what is owed
        if principal > self.balance {
            principal = self.balance;
        }
        self.balance -= principal;
        if self.balance <= Decimal::ZERO {
            self.paid_off = true;
        }
        Some(Installment {
            interest,
            principal,
            balance: self.balance,
        })
    }
}

fn monthly_rate(annual_rate: Decimal) -> Decimal {
    annual_rate / dec!(12) / dec!(100)
}

/// Rejects terms no loan can have: a non-positive principal, a negative
/// rate or a zero tenure.
pub fn validate_terms(
    principal: Decimal,
    annual_rate: Decimal,
    tenure_months: u32,
) -> Result<(), LedgerError> {
    if principal <= Decimal::ZERO {
        return Err(LedgerError::InvalidLoan {
            field: "amount",
            reason: format!("principal must be positive, got {}", principal),
        });
    }
    if annual_rate < Decimal::ZERO {
        return Err(LedgerError::InvalidLoan {
            field: "interest",
            reason: format!("annual rate must not be negative, got {}", annual_rate),
        });
    }
    if tenure_months == 0 {
        return Err(LedgerError::InvalidLoan {
            field: "tenure",
            reason: "tenure must be at least one month".into(),
        });
    }
    Ok(())
}

/// Theoretical fixed installment: `P·r·(1+r)^N / ((1+r)^N − 1)`.
///
/// A zero rate degenerates to `P / N`. The result is unrounded; loans store
/// [`quote_emi_rounded`].
pub fn quote_emi(
    principal: Decimal,
    annual_rate: Decimal,
    tenure_months: u32,
) -> Result<Decimal, LedgerError> {
    validate_terms(principal, annual_rate, tenure_months)?;

    let r = monthly_rate(annual_rate);
    if r.is_zero() {
        return Ok(principal / Decimal::from(tenure_months));
    }

    let overflow = || LedgerError::InvalidLoan {
        field: "tenure",
        reason: format!(
            "{} months at {}% is out of range",
            tenure_months, annual_rate
        ),
    };
    let growth = Decimal::ONE + r;
    let mut factor = Decimal::ONE;
    for _ in 0..tenure_months {
        factor = factor.checked_mul(growth).ok_or_else(overflow)?;
    }
    let numerator = principal
        .checked_mul(r)
        .and_then(|v| v.checked_mul(factor))
        .ok_or_else(overflow)?;
    Ok(numerator / (factor - Decimal::ONE))
}

/// EMI as persisted on a loan, rounded to cents.
pub fn quote_emi_rounded(
    principal: Decimal,
    annual_rate: Decimal,
    tenure_months: u32,
) -> Result<Decimal, LedgerError> {
    quote_emi(principal, annual_rate, tenure_months).map(round_money)
}

/// Whole calendar months between `start` and `today`, ignoring the day of
/// month. Never negative.
pub fn months_elapsed(start: NaiveDate, today: NaiveDate) -> u32 {
    let months =
        (today.year() - start.year()) * 12 + (today.month() as i32 - start.month() as i32);
    months.max(0) as u32
}

/// `round(months_paid / tenure * 100)` half up, capped at 100. Zero tenure
/// reports 0.
pub fn completion_percent(months_paid: u32, tenure: u32) -> u32 {
    if tenure == 0 {
        return 0;
    }
    let k = u64::from(months_paid);
    let n = u64::from(tenure);
    ((200 * k + n) / (2 * n)).min(100) as u32
}

pub fn compute_loan_view(loan: &Loan, today: NaiveDate) -> LoanView {
    let months_paid = months_elapsed(loan.start_date, today).min(loan.tenure_months);

    let mut interest_paid = Decimal::ZERO;
    let mut principal_paid = Decimal::ZERO;
    let mut balance = loan.principal;
    for step in Amortizer::for_loan(loan).take(months_paid as usize) {
        interest_paid += step.interest;
        principal_paid += step.principal;
        balance = step.balance;
    }
    let remaining = if balance > Decimal::ZERO {
        balance
    } else {
        Decimal::ZERO
    };

    LoanView {
        id: loan.id,
        name: loan.name.clone(),
        total_amount: loan.principal,
        emi: loan.emi,
        tenure: loan.tenure_months,
        interest: loan.annual_rate,
        start_date: loan.start_date,
        months_paid,
        completion: completion_percent(months_paid, loan.tenure_months),
        interest_paid: round_money(interest_paid),
        principal_paid: round_money(principal_paid),
        principal_remaining: round_money(remaining),
    }
}

/// Full schedule over the declared tenure, one row per payment. The `month`
/// column is the calendar month in which the payment counts as made.
pub fn amortization_schedule(loan: &Loan) -> Vec<ScheduleRow> {
    Amortizer::for_loan(loan)
        .take(loan.tenure_months as usize)
        .zip(1u32..)
        .map(|(step, n)| {
            let month = loan
                .start_date
                .checked_add_months(Months::new(n))
                .map(month_key)
                .unwrap_or_default();
            let balance = if step.balance > Decimal::ZERO {
                step.balance
            } else {
                Decimal::ZERO
            };
            ScheduleRow {
                installment: n,
                month,
                payment: round_money(step.interest + step.principal),
                interest: round_money(step.interest),
                principal: round_money(step.principal),
                balance: round_money(balance),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn months_elapsed_ignores_day_of_month() {
        assert_eq!(months_elapsed(date(2026, 1, 28), date(2026, 2, 1)), 1);
        assert_eq!(months_elapsed(date(2026, 1, 1), date(2026, 1, 31)), 0);
        assert_eq!(months_elapsed(date(2025, 11, 15), date(2026, 2, 3)), 3);
    }

    #[test]
    fn months_elapsed_clamps_future_start() {
        assert_eq!(months_elapsed(date(2027, 3, 1), date(2026, 10, 19)), 0);
    }

    #[test]
    fn completion_rounds_half_up() {
        assert_eq!(completion_percent(1, 8), 13); // 12.5
        assert_eq!(completion_percent(1, 3), 33);
        assert_eq!(completion_percent(2, 3), 67);
        assert_eq!(completion_percent(6, 12), 50);
        assert_eq!(completion_percent(12, 12), 100);
        assert_eq!(completion_percent(5, 0), 0);
    }

    #[test]
    fn quote_emi_standard_case() {
        let emi = quote_emi(dec!(100000), dec!(12), 12).unwrap();
        assert!((emi - dec!(8884.8788)).abs() < dec!(0.0001));
        assert_eq!(
            quote_emi_rounded(dec!(100000), dec!(12), 12).unwrap(),
            dec!(8884.88)
        );
    }

    #[test]
    fn quote_emi_zero_rate_is_flat() {
        assert_eq!(quote_emi(dec!(120000), dec!(0), 12).unwrap(), dec!(10000));
    }

    #[test]
    fn quote_emi_rejects_bad_terms() {
        assert!(matches!(
            quote_emi(dec!(0), dec!(12), 12),
            Err(LedgerError::InvalidLoan { field: "amount", .. })
        ));
        assert!(matches!(
            quote_emi(dec!(1000), dec!(-1), 12),
            Err(LedgerError::InvalidLoan { field: "interest", .. })
        ));
        assert!(matches!(
            quote_emi(dec!(1000), dec!(12), 0),
            Err(LedgerError::InvalidLoan { field: "tenure", .. })
        ));
    }
}
