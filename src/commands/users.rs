// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::User;
use crate::utils::{
    DEFAULT_USER_KEY, clear_setting, get_setting, id_for_user, maybe_print_json, pretty_table,
};
use anyhow::{Context, Result};
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            let email = sub.get_one::<String>("email").unwrap().trim();
            conn.execute(
                "INSERT INTO users(name, email) VALUES (?1, ?2)",
                params![name, email],
            )
            .with_context(|| format!("User '{}' or email '{}' already exists", name, email))?;
            tracing::info!(user = name, "user registered");
            println!("Added user '{}' <{}>", name, email);
        }
        Some(("list", sub)) => {
            let users = list_users(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &users)? {
                let data = users
                    .into_iter()
                    .map(|u| vec![u.id.to_string(), u.name, u.email])
                    .collect();
                println!("{}", pretty_table(&["ID", "Name", "Email"], data));
            }
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            remove_user(conn, name)?;
            println!("Removed user '{}' and their records", name);
        }
        _ => {}
    }
    Ok(())
}

/// Deletes a user along with their records. A default-user setting naming
/// them is cleared too.
pub fn remove_user(conn: &Connection, name: &str) -> Result<()> {
    let id = id_for_user(conn, name)?;
    conn.execute("DELETE FROM users WHERE id=?1", params![id])?;
    if get_setting(conn, DEFAULT_USER_KEY)?.as_deref() == Some(name) {
        clear_setting(conn, DEFAULT_USER_KEY)?;
    }
    tracing::info!(user = name, "user removed");
    Ok(())
}

pub fn list_users(conn: &Connection) -> Result<Vec<User>> {
    let mut stmt = conn.prepare("SELECT id, name, email FROM users ORDER BY name")?;
    let rows = stmt.query_map([], |r| {
        Ok(User {
            id: r.get(0)?,
            name: r.get(1)?,
            email: r.get(2)?,
        })
    })?;
    let mut users = Vec::new();
    for row in rows {
        users.push(row?);
    }
    Ok(users)
}
