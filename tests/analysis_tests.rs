// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use loanlens::analysis::compute_analysis;
use loanlens::error::LedgerError;
use loanlens::models::{Loan, LoanStatus};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn loan(id: i64, name: &str, emi: Decimal, status: LoanStatus) -> Loan {
    Loan {
        id,
        user_id: 7,
        name: name.into(),
        principal: dec!(100000),
        annual_rate: dec!(12),
        tenure_months: 12,
        emi,
        start_date: date(2026, 4, 1),
        status,
    }
}

#[test]
fn budget_anchored_reconciliation() {
    let loans = vec![loan(1, "Car", dec!(8884.88), LoanStatus::Active)];
    let a = compute_analysis(&loans, dec!(5000), dec!(50000), dec!(30000), date(2026, 10, 19)).unwrap();
    assert_eq!(a.total_monthly_emi, dec!(8884.88));
    assert_eq!(a.financials.spendable_income, dec!(16115.12));
    assert_eq!(a.financials.remaining_budget, dec!(25000));
    assert_eq!(a.financials.total_spent, dec!(5000));
    assert_eq!(a.financials.income, dec!(50000));
    assert_eq!(a.financials.budget_limit, dec!(30000));
    assert_eq!(a.active_loans, 1);
    assert_eq!(a.loans[0].months_paid, 6);
}

#[test]
fn no_loans_means_no_emi_burden() {
    let a = compute_analysis(&[], dec!(1200.50), dec!(0), dec!(20000), date(2026, 10, 19)).unwrap();
    assert_eq!(a.active_loans, 0);
    assert_eq!(a.total_monthly_emi, Decimal::ZERO);
    assert!(a.loans.is_empty());
    assert_eq!(a.financials.spendable_income, dec!(18799.50));
    assert_eq!(a.financials.remaining_budget, dec!(18799.50));
}

#[test]
fn unset_budget_goes_negative() {
    let loans = vec![loan(1, "Car", dec!(8884.88), LoanStatus::Active)];
    let a = compute_analysis(&loans, dec!(700), dec!(0), Decimal::ZERO, date(2026, 10, 19)).unwrap();
    assert_eq!(a.financials.remaining_budget, dec!(-700));
    assert_eq!(a.financials.spendable_income, dec!(-9584.88));
}

#[test]
fn closed_loans_contribute_nothing() {
    let loans = vec![
        loan(1, "Car", dec!(8884.88), LoanStatus::Active),
        loan(2, "Phone", dec!(2500), LoanStatus::Closed),
        loan(3, "Home", dec!(15000), LoanStatus::Active),
    ];
    let a = compute_analysis(&loans, dec!(0), dec!(0), dec!(40000), date(2026, 10, 19)).unwrap();
    assert_eq!(a.active_loans, 2);
    assert_eq!(a.total_monthly_emi, dec!(23884.88));
    let ids: Vec<i64> = a.loans.iter().map(|l| l.id).collect();
    assert_eq!(ids, vec![1, 3]);
}

#[test]
fn emi_counts_in_full_after_loan_finishes() {
    let loans = vec![loan(1, "Car", dec!(8884.88), LoanStatus::Active)];
    let a = compute_analysis(&loans, dec!(0), dec!(0), dec!(10000), date(2030, 1, 1)).unwrap();
    assert_eq!(a.loans[0].completion, 100);
    assert_eq!(a.total_monthly_emi, dec!(8884.88));
}

#[test]
fn loan_order_is_preserved() {
    let loans = vec![
        loan(9, "Zeta", dec!(100), LoanStatus::Active),
        loan(2, "Alpha", dec!(200), LoanStatus::Active),
    ];
    let a = compute_analysis(&loans, dec!(0), dec!(0), dec!(0), date(2026, 10, 19)).unwrap();
    assert_eq!(a.loans[0].name, "Zeta");
    assert_eq!(a.loans[1].name, "Alpha");
}

#[test]
fn json_shape_matches_dashboard_contract() {
    let loans = vec![loan(1, "Car", dec!(8884.88), LoanStatus::Active)];
    let a = compute_analysis(&loans, dec!(5000), dec!(50000), dec!(30000), date(2026, 10, 19)).unwrap();
    let v = serde_json::to_value(&a).unwrap();

    let fin = &v["financials"];
    for key in [
        "income",
        "budgetLimit",
        "remainingBudget",
        "spendableIncome",
        "totalSpent",
    ] {
        assert!(fin[key].is_number(), "financials.{} should be numeric", key);
    }
    assert!((fin["spendableIncome"].as_f64().unwrap() - 16115.12).abs() < 1e-9);
    assert_eq!(v["activeLoans"], 1);
    assert!((v["totalMonthlyEmi"].as_f64().unwrap() - 8884.88).abs() < 1e-9);

    let l = &v["loans"][0];
    let keys: Vec<&str> = l.as_object().unwrap().keys().map(String::as_str).collect();
    for key in [
        "id",
        "name",
        "totalAmount",
        "emi",
        "tenure",
        "interest",
        "startDate",
        "monthsPaid",
        "completion",
        "interestPaid",
        "principalPaid",
        "principalRemaining",
    ] {
        assert!(keys.contains(&key), "missing loans[].{}", key);
    }
    assert_eq!(keys.len(), 12);
    assert!(l["principalRemaining"].is_string());
}

#[test]
fn repeated_runs_are_byte_identical() {
    let loans = vec![
        loan(1, "Car", dec!(8884.88), LoanStatus::Active),
        loan(2, "Home", dec!(15000), LoanStatus::Active),
    ];
    let today = date(2026, 10, 19);
    let first = compute_analysis(&loans, dec!(5000), dec!(100), dec!(30000), today).unwrap();
    let second = compute_analysis(&loans, dec!(5000), dec!(100), dec!(30000), today).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn overflowing_totals_are_reported() {
    let loans = vec![
        loan(1, "Car", Decimal::MAX, LoanStatus::Active),
        loan(2, "Home", Decimal::MAX, LoanStatus::Active),
    ];
    let err = compute_analysis(&loans, dec!(0), dec!(0), dec!(0), date(2026, 10, 19)).unwrap_err();
    assert!(matches!(err, LedgerError::Overflow("EMI")));

    let err = compute_analysis(&[], Decimal::MAX, dec!(0), Decimal::MIN, date(2026, 10, 19))
        .unwrap_err();
    assert!(matches!(err, LedgerError::Overflow(_)));
}
