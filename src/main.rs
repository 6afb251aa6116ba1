// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

use std::process::ExitCode;

use clap::Parser;
use morphoscan::bootstrap::{init_tracing, run};
use morphoscan::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env before clap reads env-backed arguments
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = init_tracing() {
        eprintln!("{e}");
        return ExitCode::from(1);
    }

    if let Err(e) = run(cli).await {
        tracing::error!("morphoscan error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}
