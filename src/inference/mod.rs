// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod session;

pub use session::{build_session, has_input, SessionOptions};
