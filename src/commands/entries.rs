// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Expenses and incomes share one shape: amount, a label column (category
//! or source), a description and a date.

use crate::error::LedgerError;
use crate::models::{Expense, Income};
use crate::utils::{
    decimal_column, fmt_money, maybe_print_json, parse_date, parse_decimal, parse_month,
    pretty_table, resolve_user, today,
};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy)]
pub struct EntryKind {
    pub table: &'static str,
    pub label: &'static str,
    pub noun: &'static str,
}

pub const EXPENSES: EntryKind = EntryKind {
    table: "expenses",
    label: "category",
    noun: "Expense",
};

pub const INCOMES: EntryKind = EntryKind {
    table: "incomes",
    label: "source",
    noun: "Income",
};

/// Row shared by both tables before it is turned into a model.
#[derive(Debug, Clone)]
pub struct EntryRow {
    pub id: i64,
    pub user_id: i64,
    pub amount: Decimal,
    pub label: String,
    pub description: String,
    pub date: NaiveDate,
}

impl From<EntryRow> for Expense {
    fn from(r: EntryRow) -> Self {
        Expense {
            id: r.id,
            user_id: r.user_id,
            amount: r.amount,
            category: r.label,
            description: r.description,
            date: r.date,
        }
    }
}

impl From<EntryRow> for Income {
    fn from(r: EntryRow) -> Self {
        Income {
            id: r.id,
            user_id: r.user_id,
            amount: r.amount,
            source: r.label,
            description: r.description,
            date: r.date,
        }
    }
}

pub fn handle(conn: &Connection, kind: EntryKind, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, kind, sub)?,
        Some(("list", sub)) => list(conn, kind, sub)?,
        Some(("edit", sub)) => edit(conn, kind, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            delete_entry(conn, kind, id)?;
            println!("{} {} deleted", kind.noun, id);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, kind: EntryKind, sub: &clap::ArgMatches) -> Result<()> {
    let (user_id, user) = resolve_user(conn, sub)?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let label = sub.get_one::<String>(kind.label).unwrap().trim();
    let description = sub.get_one::<String>("description").unwrap().trim();
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    let id = insert_entry(conn, kind, user_id, amount, label, description, date)?;
    tracing::info!(table = kind.table, id, user = %user, "entry recorded");
    println!(
        "{} added (id {}): {} on {} for {}",
        kind.noun,
        id,
        fmt_money(amount),
        date,
        user
    );
    Ok(())
}

pub fn insert_entry(
    conn: &Connection,
    kind: EntryKind,
    user_id: i64,
    amount: Decimal,
    label: &str,
    description: &str,
    date: NaiveDate,
) -> Result<i64> {
    let sql = format!(
        "INSERT INTO {}(user_id, amount, {}, description, date) VALUES (?1,?2,?3,?4,?5)",
        kind.table, kind.label
    );
    conn.execute(
        &sql,
        params![
            user_id,
            amount.to_string(),
            label,
            description,
            date.to_string()
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn list(conn: &Connection, kind: EntryKind, sub: &clap::ArgMatches) -> Result<()> {
    let (user_id, _) = resolve_user(conn, sub)?;
    let month = match sub.get_one::<String>("month") {
        Some(m) => Some(parse_month(m)?),
        None => None,
    };
    let limit = sub.get_one::<usize>("limit").copied();
    let rows = query_entries(conn, kind, user_id, month.as_deref(), limit)?;

    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let printed = if kind.table == EXPENSES.table {
        let items: Vec<Expense> = rows.iter().cloned().map(Expense::from).collect();
        maybe_print_json(json_flag, jsonl_flag, &items)?
    } else {
        let items: Vec<Income> = rows.iter().cloned().map(Income::from).collect();
        maybe_print_json(json_flag, jsonl_flag, &items)?
    };
    if !printed {
        let total: Decimal = rows.iter().map(|r| r.amount).sum();
        let mut data: Vec<Vec<String>> = rows
            .into_iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.to_string(),
                    fmt_money(r.amount),
                    r.label,
                    r.description,
                ]
            })
            .collect();
        data.push(vec![
            String::new(),
            "Total".into(),
            fmt_money(total),
            String::new(),
            String::new(),
        ]);
        let label_header = if kind.label == "category" {
            "Category"
        } else {
            "Source"
        };
        println!(
            "{}",
            pretty_table(&["ID", "Date", "Amount", label_header, "Description"], data)
        );
    }
    Ok(())
}

pub fn query_entries(
    conn: &Connection,
    kind: EntryKind,
    user_id: i64,
    month: Option<&str>,
    limit: Option<usize>,
) -> Result<Vec<EntryRow>> {
    let mut sql = format!(
        "SELECT id, user_id, amount, {}, description, date FROM {} WHERE user_id=?1",
        kind.label, kind.table
    );
    let mut params_vec: Vec<String> = vec![user_id.to_string()];
    if let Some(m) = month {
        sql.push_str(" AND substr(date,1,7)=?2");
        params_vec.push(m.to_string());
    }
    sql.push_str(" ORDER BY date DESC, id DESC");
    if let Some(limit) = limit {
        sql.push_str(&format!(" LIMIT {}", limit));
    }

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(rusqlite::params_from_iter(params_vec.iter()))?;
    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let amount: String = r.get(2)?;
        let date: String = r.get(5)?;
        data.push(EntryRow {
            id: r.get(0)?,
            user_id: r.get(1)?,
            amount: decimal_column(&amount, "amount")?,
            label: r.get(3)?,
            description: r.get(4)?,
            date: parse_date(&date)?,
        });
    }
    Ok(data)
}

/// Sum of amounts for a user, optionally restricted to one `YYYY-MM` month
/// by date prefix.
pub fn sum_amounts(
    conn: &Connection,
    kind: EntryKind,
    user_id: i64,
    month: Option<&str>,
) -> Result<Decimal> {
    let mut sql = format!("SELECT amount FROM {} WHERE user_id=?1", kind.table);
    let mut params_vec: Vec<String> = vec![user_id.to_string()];
    if let Some(m) = month {
        sql.push_str(" AND substr(date,1,7)=?2");
        params_vec.push(m.to_string());
    }
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(rusqlite::params_from_iter(params_vec.iter()))?;
    let mut total = Decimal::ZERO;
    while let Some(r) = rows.next()? {
        let amount: String = r.get(0)?;
        total = total
            .checked_add(decimal_column(&amount, "amount")?)
            .ok_or(LedgerError::Overflow(kind.noun))?;
    }
    Ok(total)
}

fn edit(conn: &Connection, kind: EntryKind, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let amount = match sub.get_one::<String>("amount") {
        Some(a) => Some(parse_decimal(a)?.to_string()),
        None => None,
    };
    let date = match sub.get_one::<String>("date") {
        Some(d) => Some(parse_date(d)?.to_string()),
        None => None,
    };
    let label = sub.get_one::<String>(kind.label).map(|s| s.trim().to_string());
    let description = sub
        .get_one::<String>("description")
        .map(|s| s.trim().to_string());

    let sql = format!(
        "UPDATE {t} SET amount=COALESCE(?1, amount), {l}=COALESCE(?2, {l}),
         description=COALESCE(?3, description), date=COALESCE(?4, date) WHERE id=?5",
        t = kind.table,
        l = kind.label
    );
    let changed = conn.execute(&sql, params![amount, label, description, date, id])?;
    if changed == 0 {
        return Err(LedgerError::RecordNotFound {
            kind: kind.noun,
            id,
        }
        .into());
    }
    println!("{} {} updated", kind.noun, id);
    Ok(())
}

pub fn delete_entry(conn: &Connection, kind: EntryKind, id: i64) -> Result<()> {
    let sql = format!("DELETE FROM {} WHERE id=?1", kind.table);
    let changed = conn.execute(&sql, params![id])?;
    if changed == 0 {
        return Err(LedgerError::RecordNotFound {
            kind: kind.noun,
            id,
        }
        .into());
    }
    Ok(())
}
