// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::process::ExitCode;

use clap::Parser as _;
use playlog_cli::{CLIError, Cli};

fn main() -> ExitCode {
    // Always capture backtraces for logging, whether they are displayed is
    // decided by verbosity level
    if std::env::var_os("RUST_BACKTRACE").is_none() {
        // SAFETY: No other threads are running yet
        unsafe {
            std::env::set_var("RUST_BACKTRACE", "1");
        }
    }

    let args = match Cli::try_parse() {
        Ok(args) => args,
        Err(err) => {
            // Help and version requests are not errors
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(playlog_cli::EXIT_USAGE_ERROR)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("{}", CLIError::failure(err).pretty(false));
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(playlog_cli::run(args)) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => err.exit_code(),
    }
}
