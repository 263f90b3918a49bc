// SPDX-FileCopyrightText: 2026 EchoOS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mood classification for EchoOS.

pub mod classifier;
pub mod keywords;

pub use classifier::{quick_read, MoodClassifier, MoodResult, TurnMood};
