// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;

use clap::{Arg, ArgAction, Command, value_parser};

use crate::chart::DEFAULT_CANVAS;

fn json_args(cmd: Command) -> Command {
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

fn period_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("period")
            .long("period")
            .value_name("daily|weekly|monthly|yearly|custom")
            .help("Report window type; defaults to custom with --from/--to, else monthly"),
    )
    .arg(
        Arg::new("from")
            .long("from")
            .value_name("YYYY-MM-DD")
            .help("First day of the period (inclusive)"),
    )
    .arg(
        Arg::new("to")
            .long("to")
            .value_name("YYYY-MM-DD")
            .help("Last day of the period (inclusive)"),
    )
}

fn id_arg(required: bool) -> Arg {
    Arg::new("id")
        .long("id")
        .value_parser(value_parser!(i64))
        .required(required)
}

pub fn build_cli() -> Command {
    Command::new("finorg")
        .version(clap::crate_version!())
        .about("Personal income/expense ledger with period reports")
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .help("Database file (defaults to $FINORG_DB or the platform data dir)"),
        )
        .subcommand(Command::new("init").about("Create the database and seed default categories"))
        .subcommand(
            Command::new("category")
                .about("Manage categories")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("type").long("type").required(true))
                        .arg(id_arg(false)),
                )
                .subcommand(json_args(Command::new("list"))),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and inspect transactions")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("description")
                                .long("description")
                                .short('d')
                                .required(true),
                        )
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .value_parser(value_parser!(i64))
                                .required(true),
                        )
                        .arg(Arg::new("type").long("type").required(true))
                        .arg(Arg::new("date").long("date").help("Defaults to now"))
                        .arg(id_arg(false)),
                )
                .subcommand(
                    Command::new("update")
                        .about("Replace a transaction; omitted fields keep their stored value")
                        .arg(id_arg(true))
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("description").long("description").short('d'))
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("type").long("type"))
                        .arg(Arg::new("date").long("date")),
                )
                .subcommand(Command::new("rm").arg(id_arg(true)))
                .subcommand(json_args(
                    Command::new("list")
                        .arg(Arg::new("from").long("from").value_name("YYYY-MM-DD"))
                        .arg(Arg::new("to").long("to").value_name("YYYY-MM-DD"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                )),
        )
        .subcommand(
            Command::new("report")
                .about("Financial reports")
                .subcommand(json_args(period_args(
                    Command::new("summary").about("Totals, category breakdown and monthly trend"),
                )))
                .subcommand(period_args(
                    Command::new("chart")
                        .about("Category breakdown as a chart payload (JSON)")
                        .arg(Arg::new("canvas").long("canvas").default_value(DEFAULT_CANVAS))
                        .arg(
                            Arg::new("all-types")
                                .long("all-types")
                                .action(ArgAction::SetTrue)
                                .help("Include income categories"),
                        ),
                )),
        )
        .subcommand(
            Command::new("export").about("Export reports").subcommand(period_args(
                Command::new("report")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .required(true)
                            .value_name("csv|json"),
                    )
                    .arg(Arg::new("out").long("out").required(true)),
            )),
        )
        .subcommand(
            Command::new("config")
                .about("Show or change settings")
                .subcommand(json_args(Command::new("show")))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").required(true))
                        .arg(Arg::new("value").required(true)),
                ),
        )
}
