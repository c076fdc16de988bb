// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Per-search bookkeeping that is not part of the working graph.

pub mod statistics;

pub use statistics::{Counters, Statistics};
