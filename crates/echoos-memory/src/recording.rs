// SPDX-FileCopyrightText: 2026 EchoOS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric names and helpers for the memory pipeline.

use metrics::{counter, describe_counter};

pub const VECTOR_SYNC_FAILURES: &str = "echoos_vector_sync_failures_total";

/// Registers metric descriptions with the installed recorder, if any.
pub fn register_metrics() {
    describe_counter!(
        VECTOR_SYNC_FAILURES,
        "Best-effort vector index writes that failed after the store committed"
    );
}

/// Counts a failed best-effort index write. `operation` is `upsert` or `delete`.
pub fn record_sync_failure(operation: &'static str) {
    counter!(VECTOR_SYNC_FAILURES, "operation" => operation).increment(1);
}
