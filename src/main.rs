// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;

use anyhow::Result;

use finorg::{cli, commands, db, utils};

fn main() -> Result<()> {
    utils::init_tracing();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let db_arg = matches.get_one::<PathBuf>("db").cloned();
    let mut conn = db::open_or_init(db_arg.as_deref())?;

    match matches.subcommand() {
        Some(("init", _)) => {
            let (mut ledger, _) = commands::open_ledger(&conn)?;
            let seeded = commands::categories::seed_defaults(&mut ledger)?;
            if seeded > 0 {
                db::save_ledger(&mut conn, &ledger)?;
            }
            println!(
                "Database initialized at {} ({} categories seeded)",
                db::db_path(db_arg.as_deref())?.display(),
                seeded
            );
        }
        Some(("category", sub)) => commands::categories::handle(&mut conn, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&mut conn, sub)?,
        Some(("report", sub)) => commands::reports::handle(&conn, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, sub)?,
        Some(("config", sub)) => commands::settings::handle(&conn, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
