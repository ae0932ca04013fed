// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn user_arg() -> Arg {
    Arg::new("user")
        .long("user")
        .short('u')
        .help("User name (defaults to `config set-user`)")
}

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn id_arg() -> Arg {
    Arg::new("id")
        .long("id")
        .required(true)
        .value_parser(value_parser!(i64))
}

fn ledger_entry(name: &'static str, about: &'static str, label: &'static str) -> Command {
    Command::new(name)
        .about(about)
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Record an entry")
                .arg(user_arg())
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(Arg::new(label).long(label).default_value(""))
                .arg(Arg::new("description").long("description").default_value(""))
                .arg(Arg::new("date").long("date").help("YYYY-MM-DD, defaults to today")),
        )
        .subcommand(json_flags(
            Command::new("list")
                .about("List entries, newest first")
                .arg(user_arg())
                .arg(Arg::new("month").long("month").help("YYYY-MM"))
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(usize)),
                ),
        ))
        .subcommand(
            Command::new("edit")
                .about("Update fields of an entry")
                .arg(id_arg())
                .arg(Arg::new("amount").long("amount"))
                .arg(Arg::new(label).long(label))
                .arg(Arg::new("description").long("description"))
                .arg(Arg::new("date").long("date")),
        )
        .subcommand(Command::new("rm").about("Delete an entry").arg(id_arg()))
}

pub fn build_cli() -> Command {
    Command::new("loanlens")
        .version(clap::crate_version!())
        .about("Personal finance tracker: incomes, expenses, loans and monthly budget analysis")
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .env("LOANLENS_DB")
                .help("Path to the SQLite ledger"),
        )
        .subcommand(Command::new("init").about("Create the ledger database"))
        .subcommand(
            Command::new("config")
                .about("Show or change settings")
                .subcommand_required(true)
                .subcommand(Command::new("show").about("Print current settings"))
                .subcommand(
                    Command::new("set-user")
                        .about("Set the default user")
                        .arg(Arg::new("name").required(true)),
                )
                .subcommand(Command::new("clear-user").about("Forget the default user")),
        )
        .subcommand(
            Command::new("user")
                .about("Manage users")
                .subcommand_required(true)
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("email").long("email").required(true)),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(Command::new("rm").arg(Arg::new("name").long("name").required(true))),
        )
        .subcommand(ledger_entry("expense", "Record and review expenses", "category"))
        .subcommand(ledger_entry("income", "Record and review incomes", "source"))
        .subcommand(
            Command::new("loan")
                .about("Manage loans")
                .subcommand_required(true)
                .subcommand(
                    Command::new("add")
                        .arg(user_arg())
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("interest")
                                .long("interest")
                                .required(true)
                                .help("Annual rate in percent"),
                        )
                        .arg(
                            Arg::new("tenure")
                                .long("tenure")
                                .required(true)
                                .value_parser(value_parser!(u32))
                                .help("Months"),
                        )
                        .arg(
                            Arg::new("emi")
                                .long("emi")
                                .help("Fixed monthly installment; quoted when omitted"),
                        )
                        .arg(
                            Arg::new("start")
                                .long("start")
                                .help("Start date YYYY-MM-DD, defaults to today"),
                        ),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(id_arg())
                        .arg(Arg::new("name").long("name"))
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("interest").long("interest"))
                        .arg(
                            Arg::new("tenure")
                                .long("tenure")
                                .value_parser(value_parser!(u32)),
                        )
                        .arg(Arg::new("emi").long("emi"))
                        .arg(Arg::new("start").long("start")),
                )
                .subcommand(Command::new("close").about("Mark a loan Closed").arg(id_arg()))
                .subcommand(Command::new("reopen").about("Mark a loan Active").arg(id_arg()))
                .subcommand(Command::new("rm").arg(id_arg()))
                .subcommand(json_flags(
                    Command::new("list").arg(user_arg()).arg(
                        Arg::new("all")
                            .long("all")
                            .action(ArgAction::SetTrue)
                            .help("Include closed loans"),
                    ),
                ))
                .subcommand(
                    Command::new("quote")
                        .about("Quote the EMI for a set of terms")
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("interest").long("interest").required(true))
                        .arg(
                            Arg::new("tenure")
                                .long("tenure")
                                .required(true)
                                .value_parser(value_parser!(u32)),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("schedule")
                        .about("Print the amortization schedule of a loan")
                        .arg(id_arg()),
                )),
        )
        .subcommand(
            Command::new("budget")
                .about("Monthly budget limit")
                .subcommand_required(true)
                .subcommand(
                    Command::new("set")
                        .arg(user_arg())
                        .arg(Arg::new("month").long("month").help("YYYY-MM, defaults to current"))
                        .arg(Arg::new("limit").long("limit").required(true)),
                )
                .subcommand(json_flags(Command::new("list").arg(user_arg()))),
        )
        .subcommand(json_flags(
            Command::new("analysis")
                .about("Loan progress and budget reconciliation")
                .arg(user_arg())
                .arg(
                    Arg::new("today")
                        .long("today")
                        .help("Evaluate as of YYYY-MM-DD instead of the current date"),
                ),
        ))
        .subcommand(
            Command::new("import")
                .about("Import records from CSV")
                .subcommand_required(true)
                .subcommand(
                    Command::new("expenses")
                        .about("CSV columns: date,amount,category,description")
                        .arg(user_arg())
                        .arg(Arg::new("path").long("path").required(true)),
                ),
        )
}
