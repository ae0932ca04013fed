// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Cross-loan aggregation and monthly budget reconciliation.
//!
//! Spend is lifetime while income and budget are monthly. Spendable income is
//! anchored on the budget limit, not on income earned.

use crate::amortization::{LoanView, compute_loan_view};
use crate::error::LedgerError;
use crate::models::{Loan, LoanStatus};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    #[serde(with = "rust_decimal::serde::float")]
    pub income: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub budget_limit: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub remaining_budget: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub spendable_income: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_spent: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub financials: FinancialSummary,
    pub active_loans: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_monthly_emi: Decimal,
    pub loans: Vec<LoanView>,
}

/// Builds the analysis for one user from an already-loaded snapshot.
///
/// `loans` should hold the user's Active loans; any Closed loan that slips
/// through is ignored. Loan order is kept as given.
pub fn compute_analysis(
    loans: &[Loan],
    total_expenses: Decimal,
    current_month_income: Decimal,
    budget_limit: Decimal,
    today: NaiveDate,
) -> Result<Analysis, LedgerError> {
    let active: Vec<&Loan> = loans
        .iter()
        .filter(|l| l.status == LoanStatus::Active)
        .collect();

    let total_monthly_emi = active
        .iter()
        .try_fold(Decimal::ZERO, |acc, l| acc.checked_add(l.emi))
        .ok_or(LedgerError::Overflow("EMI"))?;
    let remaining_budget = budget_limit
        .checked_sub(total_expenses)
        .ok_or(LedgerError::Overflow("Remaining budget"))?;
    let spendable_income = remaining_budget
        .checked_sub(total_monthly_emi)
        .ok_or(LedgerError::Overflow("Spendable income"))?;
    let views: Vec<LoanView> = active
        .iter()
        .map(|l| compute_loan_view(l, today))
        .collect();

    Ok(Analysis {
        financials: FinancialSummary {
            income: current_month_income,
            budget_limit,
            remaining_budget,
            spendable_income,
            total_spent: total_expenses,
        },
        active_loans: views.len(),
        total_monthly_emi,
        loans: views,
    })
}
