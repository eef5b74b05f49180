// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::path::PathBuf;

use observability::logging::LogFormat;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, clap::Parser)]
#[command(name = crate::BINARY_NAME)]
#[command(version = crate::VERSION)]
#[command(
    about = "Builds a star schema of song plays from catalog and activity records",
    long_about = None
)]
#[command(after_help = r#"
Reads song catalog records and user activity logs (JSON lines), derives the
songs, artists, users, time and songplays tables, and writes each of them as
a directory of Parquet files under the output root.

Locations are local paths, `file://` URLs or S3 URLs (`s3://`, `s3a://`,
`s3n://`). S3 credentials are taken from the config file or from the
AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY and AWS_REGION variables.

**Examples:**

Run using `playlog.yaml` in the current directory:

    playlog

Process local inputs:

    playlog --song-data data/song_data --log-data data/log_data --output out/
"#)]
pub struct Cli {
    /// Path to the YAML configuration file [default: playlog.yaml]
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Location of the song catalog records
    #[arg(long, value_name = "LOCATION")]
    pub song_data: Option<String>,

    /// Location of the user activity records
    #[arg(long, value_name = "LOCATION")]
    pub log_data: Option<String>,

    /// Root location of the output tables
    #[arg(long, value_name = "LOCATION")]
    pub output: Option<String>,

    /// Format of the log output written to STDERR
    #[arg(long, value_enum, default_value_t = CliLogFormat::Pretty)]
    pub log_format: CliLogFormat,

    /// Sets the level of verbosity (repeat for more)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliLogFormat {
    Pretty,
    Json,
}

impl From<CliLogFormat> for LogFormat {
    fn from(value: CliLogFormat) -> Self {
        match value {
            CliLogFormat::Pretty => LogFormat::Pretty,
            CliLogFormat::Json => LogFormat::Json,
        }
    }
}
