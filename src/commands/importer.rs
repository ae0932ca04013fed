// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::entries::{EXPENSES, insert_entry};
use crate::utils::{parse_date, parse_decimal, resolve_user};
use anyhow::{Context, Result, bail};
use csv::ReaderBuilder;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("expenses", sub)) => {
            let (user_id, user) = resolve_user(conn, sub)?;
            let path = sub.get_one::<String>("path").unwrap().trim();
            let count = import_expenses(conn, user_id, path)?;
            println!("Imported {} expenses for {} from {}", count, user, path);
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Imports `date,amount,category,description` rows in one transaction. Any bad
/// row aborts the whole file.
pub fn import_expenses(conn: &mut Connection, user_id: i64, path: &str) -> Result<usize> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;

    let tx = conn.transaction()?;
    let mut count = 0usize;
    for (idx, result) in rdr.records().enumerate() {
        let line = idx + 2;
        let rec = result.with_context(|| format!("Malformed CSV at line {}", line))?;
        if rec.iter().all(|f| f.is_empty()) {
            continue;
        }
        let date_raw = rec.get(0).context("date missing")?;
        let amount_raw = rec.get(1).context("amount missing")?;
        let category = rec.get(2).unwrap_or("");
        let description = rec.get(3).unwrap_or("");

        let date = parse_date(date_raw)
            .with_context(|| format!("Invalid expense date '{}' at line {}", date_raw, line))?;
        let amount = parse_decimal(amount_raw)
            .with_context(|| format!("Invalid amount '{}' at line {}", amount_raw, line))?;

        insert_entry(&tx, EXPENSES, user_id, amount, category, description, date)?;
        count += 1;
    }
    if count == 0 {
        bail!("No expenses found in {}", path);
    }
    tx.commit()?;
    tracing::info!(user_id, count, path, "expense batch imported");
    Ok(count)
}
