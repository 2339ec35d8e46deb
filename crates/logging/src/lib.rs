#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` routes deltasync diagnostics through [`tracing`]. Library crates
//! emit events with the per-subsystem macros ([`trace_index!`],
//! [`trace_delta!`], [`debug_delta!`], [`warn_integrity!`], [`trace_recv!`],
//! [`trace_stats!`], [`trace_batch!`]); binaries install a subscriber with [`init_tracing`],
//! which maps a `-v` count to per-target levels via [`VerbosityConfig`].
//!
//! # Examples
//!
//! ```
//! use logging::VerbosityConfig;
//!
//! let config = VerbosityConfig::from_verbose_level(2);
//! logging::init_tracing(&config);
//! logging::trace_stats!(bytes = 42, "done");
//! ```

mod config;
mod init;
mod tracing_macros;

pub use config::{TARGETS, VerbosityConfig};
pub use init::{LOG_ENV, build_filter, init_tracing};

#[doc(hidden)]
pub use tracing;
