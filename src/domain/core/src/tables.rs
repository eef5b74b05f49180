// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Tables of the star schema produced by a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OutputTable {
    Songs,
    Artists,
    Users,
    Time,
    Songplays,
}

impl OutputTable {
    /// All tables in the order they are written by a run
    pub const ALL: [OutputTable; 5] = [
        OutputTable::Songs,
        OutputTable::Artists,
        OutputTable::Users,
        OutputTable::Time,
        OutputTable::Songplays,
    ];

    /// Directory name of the table under the output root
    pub fn name(&self) -> &'static str {
        match self {
            OutputTable::Songs => "songs",
            OutputTable::Artists => "artists",
            OutputTable::Users => "users",
            OutputTable::Time => "time",
            OutputTable::Songplays => "songplays",
        }
    }

    /// Columns encoded as `key=value` directories rather than stored in files
    pub fn partition_columns(&self) -> &'static [&'static str] {
        match self {
            OutputTable::Songs => &["year", "artist_id"],
            OutputTable::Artists | OutputTable::Users => &[],
            OutputTable::Time | OutputTable::Songplays => &["year", "month"],
        }
    }

    pub fn is_partitioned(&self) -> bool {
        !self.partition_columns().is_empty()
    }
}

impl std::fmt::Display for OutputTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
