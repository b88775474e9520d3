// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version};

pub fn build_cli() -> Command {
    Command::new("finmind")
        .version(crate_version!())
        .about("FinMind: personal-finance tracker with a rule-based insights engine")
        .subcommand(Command::new("init").about("Initialize the local database"))
        .subcommand(
            Command::new("serve")
                .about("Run the HTTP API")
                .arg(
                    Arg::new("addr")
                        .long("addr")
                        .value_name("HOST:PORT")
                        .default_value("127.0.0.1:8080")
                        .help("Address to listen on"),
                )
                .arg(
                    Arg::new("db")
                        .long("db")
                        .value_name("PATH")
                        .help("SQLite database path (defaults to the platform data dir)"),
                )
                .arg(
                    Arg::new("memory")
                        .long("memory")
                        .action(ArgAction::SetTrue)
                        .help("Use the in-memory store instead of SQLite"),
                )
                .arg(
                    Arg::new("demo")
                        .long("demo")
                        .action(ArgAction::SetTrue)
                        .help("In-memory store seeded with a demo account"),
                )
                .arg(
                    Arg::new("advice-url")
                        .long("advice-url")
                        .value_name("URL")
                        .help("Advice generator endpoint (or FINMIND_ADVICE_URL)"),
                )
                .arg(
                    Arg::new("advice-token")
                        .long("advice-token")
                        .value_name("TOKEN")
                        .help("Advice generator bearer token (or FINMIND_ADVICE_TOKEN)"),
                ),
        )
}
