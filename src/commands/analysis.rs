// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analysis::{Analysis, compute_analysis};
use crate::commands::budgets::budget_limit_for;
use crate::commands::entries::{EXPENSES, INCOMES, sum_amounts};
use crate::commands::loans::loans_for_user;
use crate::utils::{
    fmt_money, maybe_print_json, month_key, parse_date, pretty_table, resolve_user, today,
};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;

pub fn handle(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (user_id, user) = resolve_user(conn, sub)?;
    let as_of = match sub.get_one::<String>("today") {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    let analysis = analyze(conn, user_id, as_of)?;

    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &analysis)? {
        print_report(&user, as_of, &analysis);
    }
    Ok(())
}

/// Loads the user's snapshot as of `as_of` and runs the engine over it.
/// Expenses are lifetime; income and budget are those of the month of `as_of`.
pub fn analyze(conn: &Connection, user_id: i64, as_of: NaiveDate) -> Result<Analysis> {
    let month = month_key(as_of);
    let loans = loans_for_user(conn, user_id, false)?;
    let total_expenses = sum_amounts(conn, EXPENSES, user_id, None)?;
    let income = sum_amounts(conn, INCOMES, user_id, Some(&month))?;
    let budget_limit = budget_limit_for(conn, user_id, &month)?;
    tracing::debug!(
        user_id,
        month = %month,
        loans = loans.len(),
        %total_expenses,
        %income,
        %budget_limit,
        "analysis snapshot loaded"
    );
    Ok(compute_analysis(
        &loans,
        total_expenses,
        income,
        budget_limit,
        as_of,
    )?)
}

fn print_report(user: &str, as_of: NaiveDate, a: &Analysis) {
    let f = &a.financials;
    let summary = vec![
        vec!["Income (this month)".to_string(), fmt_money(f.income)],
        vec!["Budget limit".to_string(), fmt_money(f.budget_limit)],
        vec!["Total spent".to_string(), fmt_money(f.total_spent)],
        vec!["Remaining budget".to_string(), fmt_money(f.remaining_budget)],
        vec!["Spendable income".to_string(), fmt_money(f.spendable_income)],
        vec!["Active loans".to_string(), a.active_loans.to_string()],
        vec!["Total monthly EMI".to_string(), fmt_money(a.total_monthly_emi)],
    ];
    println!("Analysis for {} as of {}", user, as_of);
    println!("{}", pretty_table(&["Metric", "Value"], summary));

    if a.loans.is_empty() {
        println!("No active loans found.");
        return;
    }
    let rows = a
        .loans
        .iter()
        .map(|l| {
            vec![
                l.id.to_string(),
                l.name.clone(),
                fmt_money(l.total_amount),
                fmt_money(l.emi),
                format!("{}/{}", l.months_paid, l.tenure),
                format!("{}%", l.completion),
                fmt_money(l.interest_paid),
                fmt_money(l.principal_paid),
                fmt_money(l.principal_remaining),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &[
                "ID",
                "Loan",
                "Amount",
                "EMI",
                "Paid",
                "Done",
                "Interest Paid",
                "Principal Paid",
                "Remaining",
            ],
            rows
        )
    );
}
