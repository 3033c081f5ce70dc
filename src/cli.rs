// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, ArgGroup, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON object per line"),
    )
}

fn month_arg() -> Arg {
    Arg::new("month")
        .long("month")
        .value_name("MONTH")
        .help("Calendar month 1-12, or 'all'")
}

pub fn build_cli() -> Command {
    Command::new("fintrack")
        .version(clap::crate_version!())
        .about("Track income and expenses, with per-category monthly budgets")
        .subcommand(Command::new("init").about("Create the data file and show where it lives"))
        .subcommand(
            Command::new("tx")
                .about("Record, list and remove transactions")
                .subcommand(
                    Command::new("add")
                        .about("Record a transaction")
                        .arg(Arg::new("description").long("description").short('d').required(true))
                        .arg(Arg::new("amount").long("amount").short('a').required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .short('t')
                                .default_value("expense")
                                .help("income or expense"),
                        )
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .short('c')
                                .required(true)
                                .help("Category id or label"),
                        )
                        .arg(Arg::new("date").long("date").help("YYYY-MM-DD, defaults to today")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List transactions, newest first")
                        .arg(Arg::new("search").long("search").short('s'))
                        .arg(Arg::new("category").long("category").short('c'))
                        .arg(Arg::new("type").long("type").short('t'))
                        .arg(month_arg())
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    Command::new("rm")
                        .about("Delete a transaction")
                        .arg(Arg::new("id").required(true)),
                )
                .subcommand(
                    Command::new("clear")
                        .about("Delete every transaction (categories and settings stay)")
                        .arg(
                            Arg::new("yes")
                                .long("yes")
                                .short('y')
                                .action(ArgAction::SetTrue)
                                .help("Skip the confirmation prompt"),
                        ),
                ),
        )
        .subcommand(
            Command::new("category")
                .about("Manage categories")
                .subcommand(json_flags(Command::new("list")))
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("label").required(true))
                        .arg(Arg::new("color").long("color").help("#rrggbb"))
                        .arg(Arg::new("budget").long("budget")),
                )
                .subcommand(
                    Command::new("rename")
                        .arg(Arg::new("category").required(true))
                        .arg(Arg::new("label").required(true)),
                )
                .subcommand(Command::new("rm").arg(Arg::new("category").required(true))),
        )
        .subcommand(
            Command::new("budget")
                .about("Monthly spending ceilings per category")
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("category").required(true))
                        .arg(Arg::new("amount").required(true)),
                )
                .subcommand(Command::new("clear").arg(Arg::new("category").required(true)))
                .subcommand(json_flags(
                    Command::new("status").about("Spent versus budget").arg(month_arg()),
                )),
        )
        .subcommand(
            Command::new("report")
                .about("Totals and chart data")
                .subcommand(json_flags(Command::new("summary").arg(month_arg())))
                .subcommand(json_flags(Command::new("by-category").arg(month_arg())))
                .subcommand(json_flags(
                    Command::new("cashflow").arg(
                        Arg::new("months")
                            .long("months")
                            .value_parser(value_parser!(usize))
                            .default_value("12"),
                    ),
                )),
        )
        .subcommand(
            Command::new("settings")
                .about("Display preferences")
                .subcommand(Command::new("show"))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("name").long("name"))
                        .arg(Arg::new("currency").long("currency").help("BRL, USD or EUR"))
                        .arg(Arg::new("language").long("language").help("pt-BR or en-US"))
                        .group(
                            ArgGroup::new("changes")
                                .args(["name", "currency", "language"])
                                .multiple(true)
                                .required(true),
                        ),
                ),
        )
        .subcommand(
            Command::new("export").about("Write data to a file").subcommand(
                Command::new("transactions")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .default_value("csv")
                            .help("csv or json"),
                    )
                    .arg(Arg::new("out").long("out").short('o').required(true)),
            ),
        )
        .subcommand(Command::new("doctor").about("Check the document for problems"))
}
