// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::amortization::{
    amortization_schedule, quote_emi, quote_emi_rounded, validate_terms,
};
use crate::error::LedgerError;
use crate::models::{Loan, LoanStatus};
use crate::utils::{
    decimal_column, fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table,
    resolve_user, today,
};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("close", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            set_status(conn, id, LoanStatus::Closed)?;
            println!("Loan {} marked as Closed", id);
        }
        Some(("reopen", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            set_status(conn, id, LoanStatus::Active)?;
            println!("Loan {} marked as Active", id);
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            if conn.execute("DELETE FROM loans WHERE id=?1", params![id])? == 0 {
                return Err(LedgerError::RecordNotFound { kind: "Loan", id }.into());
            }
            println!("Loan {} deleted", id);
        }
        Some(("list", sub)) => list(conn, sub)?,
        Some(("quote", sub)) => quote(sub)?,
        Some(("schedule", sub)) => schedule(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Loan terms as entered, before they are stored.
#[derive(Debug, Clone)]
pub struct LoanTerms {
    pub name: String,
    pub principal: Decimal,
    pub annual_rate: Decimal,
    pub tenure_months: u32,
    pub emi: Option<Decimal>,
    pub start_date: NaiveDate,
}

impl LoanTerms {
    /// Validates the terms and settles the EMI: a supplied EMI is kept as
    /// given, otherwise it is quoted and rounded to cents. Either way the
    /// settled EMI must be positive.
    pub fn settle_emi(&self) -> Result<Decimal, LedgerError> {
        validate_terms(self.principal, self.annual_rate, self.tenure_months)?;
        let emi = match self.emi {
            Some(emi) => emi,
            None => quote_emi_rounded(self.principal, self.annual_rate, self.tenure_months)?,
        };
        if emi <= Decimal::ZERO {
            return Err(LedgerError::InvalidLoan {
                field: "emi",
                reason: format!("EMI must be positive, got {}", emi),
            });
        }
        Ok(emi)
    }
}

pub fn insert_loan(conn: &Connection, user_id: i64, terms: &LoanTerms) -> Result<i64> {
    let emi = terms.settle_emi()?;
    conn.execute(
        "INSERT INTO loans(user_id, name, total_amount, interest_rate, tenure, emi_amount, start_date, status)
         VALUES (?1,?2,?3,?4,?5,?6,?7,'Active')",
        params![
            user_id,
            terms.name,
            terms.principal.to_string(),
            terms.annual_rate.to_string(),
            terms.tenure_months,
            emi.to_string(),
            terms.start_date.to_string()
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (user_id, user) = resolve_user(conn, sub)?;
    let terms = LoanTerms {
        name: sub.get_one::<String>("name").unwrap().trim().to_string(),
        principal: parse_decimal(sub.get_one::<String>("amount").unwrap())?,
        annual_rate: parse_decimal(sub.get_one::<String>("interest").unwrap())?,
        tenure_months: *sub.get_one::<u32>("tenure").unwrap(),
        emi: match sub.get_one::<String>("emi") {
            Some(e) => Some(parse_decimal(e)?),
            None => None,
        },
        start_date: match sub.get_one::<String>("start") {
            Some(d) => parse_date(d)?,
            None => today(),
        },
    };
    let id = insert_loan(conn, user_id, &terms)?;
    let loan = load_loan(conn, id)?;
    tracing::info!(id, user = %user, "loan added");
    println!(
        "Loan '{}' added (id {}): EMI {} for {} months from {}",
        loan.name,
        id,
        fmt_money(loan.emi),
        loan.tenure_months,
        loan.start_date
    );
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let current = load_loan(conn, id)?;

    let principal = match sub.get_one::<String>("amount") {
        Some(a) => parse_decimal(a)?,
        None => current.principal,
    };
    let annual_rate = match sub.get_one::<String>("interest") {
        Some(r) => parse_decimal(r)?,
        None => current.annual_rate,
    };
    let tenure_months = sub
        .get_one::<u32>("tenure")
        .copied()
        .unwrap_or(current.tenure_months);
    let terms_changed = principal != current.principal
        || annual_rate != current.annual_rate
        || tenure_months != current.tenure_months;
    let emi = match sub.get_one::<String>("emi") {
        Some(e) => Some(parse_decimal(e)?),
        None if terms_changed => None,
        None => Some(current.emi),
    };
    let terms = LoanTerms {
        name: sub
            .get_one::<String>("name")
            .map(|s| s.trim().to_string())
            .unwrap_or(current.name),
        principal,
        annual_rate,
        tenure_months,
        emi,
        start_date: match sub.get_one::<String>("start") {
            Some(d) => parse_date(d)?,
            None => current.start_date,
        },
    };
    update_loan(conn, id, &terms)?;
    println!("Loan {} updated", id);
    Ok(())
}

pub fn update_loan(conn: &Connection, id: i64, terms: &LoanTerms) -> Result<()> {
    let emi = terms.settle_emi()?;
    let changed = conn.execute(
        "UPDATE loans SET name=?1, total_amount=?2, interest_rate=?3, tenure=?4, emi_amount=?5, start_date=?6
         WHERE id=?7",
        params![
            terms.name,
            terms.principal.to_string(),
            terms.annual_rate.to_string(),
            terms.tenure_months,
            emi.to_string(),
            terms.start_date.to_string(),
            id
        ],
    )?;
    if changed == 0 {
        return Err(LedgerError::RecordNotFound { kind: "Loan", id }.into());
    }
    Ok(())
}

pub fn set_status(conn: &Connection, id: i64, status: LoanStatus) -> Result<()> {
    let changed = conn.execute(
        "UPDATE loans SET status=?1 WHERE id=?2",
        params![status.as_str(), id],
    )?;
    if changed == 0 {
        return Err(LedgerError::RecordNotFound { kind: "Loan", id }.into());
    }
    tracing::info!(id, %status, "loan status changed");
    Ok(())
}

const LOAN_COLUMNS: &str =
    "id, user_id, name, total_amount, interest_rate, tenure, emi_amount, start_date, status";

type RawLoan = (i64, i64, String, String, String, u32, String, String, String);

fn raw_loan(r: &Row<'_>) -> rusqlite::Result<RawLoan> {
    Ok((
        r.get(0)?,
        r.get(1)?,
        r.get(2)?,
        r.get(3)?,
        r.get(4)?,
        r.get(5)?,
        r.get(6)?,
        r.get(7)?,
        r.get(8)?,
    ))
}

fn build_loan(raw: RawLoan) -> Result<Loan> {
    let (id, user_id, name, amount, rate, tenure, emi, start, status) = raw;
    Ok(Loan {
        id,
        user_id,
        name,
        principal: decimal_column(&amount, "loan amount")?,
        annual_rate: decimal_column(&rate, "interest rate")?,
        tenure_months: tenure,
        emi: decimal_column(&emi, "EMI")?,
        start_date: parse_date(&start)?,
        status: status.parse()?,
    })
}

pub fn load_loan(conn: &Connection, id: i64) -> Result<Loan> {
    let sql = format!("SELECT {} FROM loans WHERE id=?1", LOAN_COLUMNS);
    let raw = conn
        .query_row(&sql, params![id], raw_loan)
        .optional()?
        .ok_or(LedgerError::RecordNotFound { kind: "Loan", id })?;
    build_loan(raw)
}

/// A user's loans in insertion order; only Active ones unless `include_closed`.
pub fn loans_for_user(conn: &Connection, user_id: i64, include_closed: bool) -> Result<Vec<Loan>> {
    let mut sql = format!("SELECT {} FROM loans WHERE user_id=?1", LOAN_COLUMNS);
    if !include_closed {
        sql.push_str(" AND status='Active'");
    }
    sql.push_str(" ORDER BY id");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![user_id], raw_loan)?;
    let mut loans = Vec::new();
    for row in rows {
        loans.push(build_loan(row?)?);
    }
    Ok(loans)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (user_id, _) = resolve_user(conn, sub)?;
    let loans = loans_for_user(conn, user_id, sub.get_flag("all"))?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &loans)? {
        let data = loans
            .into_iter()
            .map(|l| {
                vec![
                    l.id.to_string(),
                    l.name,
                    fmt_money(l.principal),
                    format!("{}%", l.annual_rate.normalize()),
                    l.tenure_months.to_string(),
                    fmt_money(l.emi),
                    l.start_date.to_string(),
                    l.status.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Name", "Amount", "Rate", "Tenure", "EMI", "Start", "Status"],
                data
            )
        );
    }
    Ok(())
}

fn quote(sub: &clap::ArgMatches) -> Result<()> {
    let principal = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let rate = parse_decimal(sub.get_one::<String>("interest").unwrap())?;
    let tenure = *sub.get_one::<u32>("tenure").unwrap();
    let exact = quote_emi(principal, rate, tenure)?;
    let emi = quote_emi_rounded(principal, rate, tenure)?;
    let total = emi * Decimal::from(tenure);
    let rows = vec![
        vec!["EMI".to_string(), fmt_money(emi)],
        vec!["EMI (unrounded)".to_string(), exact.round_dp(6).to_string()],
        vec!["Total repayment".to_string(), fmt_money(total)],
        vec!["Total interest".to_string(), fmt_money(total - principal)],
    ];
    println!("{}", pretty_table(&["Quote", "Value"], rows));
    Ok(())
}

fn schedule(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let loan = load_loan(conn, id)?;
    let rows = amortization_schedule(&loan);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        let data = rows
            .into_iter()
            .map(|r| {
                vec![
                    r.installment.to_string(),
                    r.month,
                    fmt_money(r.payment),
                    fmt_money(r.interest),
                    fmt_money(r.principal),
                    fmt_money(r.balance),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["#", "Month", "Payment", "Interest", "Principal", "Balance"],
                data
            )
        );
    }
    Ok(())
}
