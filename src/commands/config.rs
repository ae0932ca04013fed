// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{DEFAULT_USER_KEY, clear_setting, get_setting, id_for_user, set_setting};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => {
            let user = get_setting(conn, DEFAULT_USER_KEY)?;
            println!("default user: {}", user.as_deref().unwrap_or("(none)"));
        }
        Some(("set-user", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            id_for_user(conn, name)?;
            set_setting(conn, DEFAULT_USER_KEY, name)?;
            println!("Default user set to '{}'", name);
        }
        Some(("clear-user", _)) => {
            clear_setting(conn, DEFAULT_USER_KEY)?;
            println!("Default user cleared");
        }
        _ => {}
    }
    Ok(())
}
