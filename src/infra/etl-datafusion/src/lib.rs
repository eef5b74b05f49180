// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

pub mod activity;
pub mod catalog;
mod lookup;
mod pipeline;
pub mod readers;
mod session;
pub mod sinks;

pub use lookup::*;
pub use pipeline::*;
pub use playlog_core::*;
pub use readers::*;
pub use session::*;
pub use sinks::*;
