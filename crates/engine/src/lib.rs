#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `engine` turns responses back into files and drives whole exchanges.
//!
//! - [`reconstruct`] and [`reconstruct_to_writer`] replay a
//!   [`matching::Response`] against the reference it was computed from.
//!   File output is staged in a temporary sibling and atomically renamed, so
//!   in-place updates never leave a half-written reference.
//! - [`sync_files`] runs a local exchange end to end: index the reference,
//!   scan the source, rebuild the destination.
//! - [`write_batch`] and [`apply_batch`] split an exchange across machines
//!   through a [`batch::BatchFile`].
//!
//! # Examples
//!
//! ```
//! use engine::{ExchangeOptions, sync_files};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let dir = std::env::temp_dir().join(format!("deltasync-doc-{}", std::process::id()));
//! # std::fs::create_dir_all(&dir)?;
//! let source = dir.join("new.txt");
//! let reference = dir.join("old.txt");
//! std::fs::write(&source, b"fresh contents")?;
//! std::fs::write(&reference, b"stale contents")?;
//!
//! let report = sync_files(&source, &reference, &ExchangeOptions::new())?;
//! assert_eq!(std::fs::read(&reference)?, b"fresh contents");
//! assert_eq!(report.written_bytes, 14);
//! # std::fs::remove_dir_all(&dir)?;
//! # Ok(())
//! # }
//! ```

mod error;
mod exchange;
mod guard;
mod offline;
mod reconstruct;

pub use error::{ExchangeError, ReconstructError};
pub use exchange::{ExchangeOptions, ExchangeReport, sync_files};
pub use offline::{apply_batch, write_batch};
pub use reconstruct::{Destination, reconstruct, reconstruct_to_writer};
