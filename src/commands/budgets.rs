// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::MonthlyFinancialSetting;
use crate::utils::{
    decimal_column, fmt_money, maybe_print_json, month_key, parse_decimal, parse_month,
    pretty_table, resolve_user, today,
};
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (user_id, user) = resolve_user(conn, sub)?;
    let month = match sub.get_one::<String>("month") {
        Some(m) => parse_month(m)?,
        None => month_key(today()),
    };
    let limit = parse_decimal(sub.get_one::<String>("limit").unwrap())?;
    upsert_budget(conn, user_id, &month, limit)?;
    println!("Budget for {} / {} = {}", user, month, fmt_money(limit));
    Ok(())
}

/// At most one row per (user, month); setting again overwrites.
pub fn upsert_budget(conn: &Connection, user_id: i64, month: &str, limit: Decimal) -> Result<()> {
    conn.execute(
        "INSERT INTO financials(user_id, month, budget_limit) VALUES (?1,?2,?3)
         ON CONFLICT(user_id, month) DO UPDATE SET budget_limit=excluded.budget_limit",
        params![user_id, month, limit.to_string()],
    )?;
    tracing::debug!(user_id, month, %limit, "budget upserted");
    Ok(())
}

/// Budget limit for a month, zero when none was set.
pub fn budget_limit_for(conn: &Connection, user_id: i64, month: &str) -> Result<Decimal> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT budget_limit FROM financials WHERE user_id=?1 AND month=?2",
            params![user_id, month],
            |r| r.get(0),
        )
        .optional()?;
    match raw {
        Some(s) => decimal_column(&s, "budget limit"),
        None => Ok(Decimal::ZERO),
    }
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let (user_id, _) = resolve_user(conn, sub)?;
    let mut stmt = conn.prepare(
        "SELECT month, budget_limit FROM financials WHERE user_id=?1 ORDER BY month DESC",
    )?;
    let rows = stmt.query_map(params![user_id], |r| {
        Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?))
    })?;
    let mut settings = Vec::new();
    for row in rows {
        let (month, limit) = row?;
        settings.push(MonthlyFinancialSetting {
            user_id,
            month,
            budget_limit: decimal_column(&limit, "budget limit")?,
        });
    }
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &settings)? {
        let data = settings
            .into_iter()
            .map(|s| vec![s.month, fmt_money(s.budget_limit)])
            .collect();
        println!("{}", pretty_table(&["Month", "Budget Limit"], data));
    }
    Ok(())
}
