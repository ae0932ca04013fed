// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use loanlens::commands::{entries, importer};
use loanlens::{cli, db};
use rusqlite::Connection;
use rust_decimal_macros::dec;
use std::io::Write;
use tempfile::NamedTempFile;

fn base_conn() -> (Connection, i64) {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn.execute(
        "INSERT INTO users(name, email) VALUES ('ravi', 'ravi@example.com')",
        [],
    )
    .unwrap();
    let id = conn.last_insert_rowid();
    (conn, id)
}

fn csv_file(body: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", body).unwrap();
    file.flush().unwrap();
    file
}

fn expense_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM expenses", [], |r| r.get(0))
        .unwrap()
}

#[test]
fn importer_trims_cli_path_argument() {
    let (mut conn, uid) = base_conn();
    let file = csv_file(
        "date,amount,category,description\n2026-10-03,450.00,Food,Groceries\n2026-10-04, 99.5 , Travel , Metro card \n",
    );
    let path = file.path().to_str().unwrap().to_string();
    let padded = format!("  {}  ", path);
    let matches = cli::build_cli().get_matches_from([
        "loanlens", "import", "expenses", "--user", "ravi", "--path", &padded,
    ]);
    if let Some(("import", import_m)) = matches.subcommand() {
        importer::handle(&mut conn, import_m).unwrap();
    } else {
        panic!("no import subcommand");
    }

    assert_eq!(expense_count(&conn), 2);
    let rows = entries::query_entries(&conn, entries::EXPENSES, uid, None, None).unwrap();
    assert_eq!(rows[0].amount, dec!(99.5));
    assert_eq!(rows[0].label, "Travel");
    assert_eq!(rows[0].description, "Metro card");
    let total = entries::sum_amounts(&conn, entries::EXPENSES, uid, None).unwrap();
    assert_eq!(total, dec!(549.50));
}

#[test]
fn importer_accepts_missing_optional_columns() {
    let (mut conn, uid) = base_conn();
    let file = csv_file("date,amount,category,description\n2026-10-03,12\n");
    let n = importer::import_expenses(&mut conn, uid, file.path().to_str().unwrap()).unwrap();
    assert_eq!(n, 1);
    let rows = entries::query_entries(&conn, entries::EXPENSES, uid, None, None).unwrap();
    assert_eq!(rows[0].label, "");
}

#[test]
fn bad_row_rolls_back_whole_batch() {
    let (mut conn, uid) = base_conn();
    let file = csv_file(
        "date,amount,category,description\n2026-10-03,450.00,Food,\n2026-10-04,abc,Food,\n",
    );
    let err = importer::import_expenses(&mut conn, uid, file.path().to_str().unwrap())
        .unwrap_err();
    assert!(format!("{:#}", err).contains("line 3"));
    assert_eq!(expense_count(&conn), 0);
}

#[test]
fn bad_date_rolls_back_whole_batch() {
    let (mut conn, uid) = base_conn();
    let file = csv_file("date,amount,category,description\n03/10/2026,450.00,Food,\n");
    assert!(importer::import_expenses(&mut conn, uid, file.path().to_str().unwrap()).is_err());
    assert_eq!(expense_count(&conn), 0);
}

#[test]
fn empty_file_is_an_error() {
    let (mut conn, uid) = base_conn();
    let file = csv_file("date,amount,category,description\n");
    assert!(importer::import_expenses(&mut conn, uid, file.path().to_str().unwrap()).is_err());
}
