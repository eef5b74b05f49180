// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

pub mod config;
pub mod errors;
pub mod location;
pub mod schema;
pub mod sink;
pub mod tables;

pub use config::*;
pub use errors::*;
pub use location::*;
pub use sink::*;
pub use tables::*;
