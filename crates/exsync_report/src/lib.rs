//! # ExSync Report
//!
//! Diagnostics collection and outcome assembly for synchronization runs.
//!
//! A [`DiagnosticsSink`] accepts leveled messages and retains those at or
//! above its configured minimum level, in log order. A [`ReportBuilder`]
//! assembles the final outcome record handed back across the engine
//! boundary: success flag, joined diagnostics text, and named payload
//! fields. Building is side-effect-free and repeatable.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod sink;

pub use builder::{ReportBuilder, SyncReport};
pub use sink::{DiagnosticLevel, DiagnosticsSink};
