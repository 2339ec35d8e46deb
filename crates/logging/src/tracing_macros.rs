//! crates/logging/src/tracing_macros.rs
//! Convenience macros for deltasync-specific tracing.
//!
//! These macros wrap the standard tracing macros with the per-subsystem
//! targets that [`VerbosityConfig`](crate::VerbosityConfig) filters on.

/// Emit a chunk index trace.
///
/// # Example
/// ```ignore
/// trace_index!(chunks = 12, "built chunk index");
/// ```
#[macro_export]
macro_rules! trace_index {
    ($($arg:tt)*) => {
        $crate::tracing::debug!(target: "deltasync::index", $($arg)*);
    };
}

/// Emit a delta scan trace.
///
/// # Example
/// ```ignore
/// trace_delta!(index = 3, "matched chunk");
/// ```
#[macro_export]
macro_rules! trace_delta {
    ($($arg:tt)*) => {
        $crate::tracing::trace!(target: "deltasync::delta", $($arg)*);
    };
}

/// Emit a delta scan event at debug level, for per-buffer rather than
/// per-packet progress.
///
/// # Example
/// ```ignore
/// debug_delta!(kept = 12, "refilled scan buffer");
/// ```
#[macro_export]
macro_rules! debug_delta {
    ($($arg:tt)*) => {
        $crate::tracing::debug!(target: "deltasync::delta", $($arg)*);
    };
}

/// Emit an integrity warning raised by a weak checksum collision.
///
/// # Example
/// ```ignore
/// warn_integrity!(weak = 0x1234, "strong hash mismatch");
/// ```
#[macro_export]
macro_rules! warn_integrity {
    ($($arg:tt)*) => {
        $crate::tracing::warn!(target: "deltasync::integrity", $($arg)*);
    };
}

/// Emit a reconstruction trace.
///
/// # Example
/// ```ignore
/// trace_recv!(packets = 4, "reconstructing target");
/// ```
#[macro_export]
macro_rules! trace_recv {
    ($($arg:tt)*) => {
        $crate::tracing::debug!(target: "deltasync::recv", $($arg)*);
    };
}

/// Emit a statistics trace.
///
/// # Example
/// ```ignore
/// trace_stats!(literal_bytes = 100, "exchange complete");
/// ```
#[macro_export]
macro_rules! trace_stats {
    ($($arg:tt)*) => {
        $crate::tracing::info!(target: "deltasync::stats", $($arg)*);
    };
}

/// Emit a batch file trace.
///
/// # Example
/// ```ignore
/// trace_batch!(path = %path.display(), "wrote batch");
/// ```
#[macro_export]
macro_rules! trace_batch {
    ($($arg:tt)*) => {
        $crate::tracing::debug!(target: "deltasync::batch", $($arg)*);
    };
}

#[cfg(test)]
mod tests {
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    use crate::{VerbosityConfig, build_filter};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("lock").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture(level: u8, emit: impl FnOnce()) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(build_filter(&VerbosityConfig::from_verbose_level(level)))
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .without_time()
            .finish();
        tracing::subscriber::with_default(subscriber, emit);
        let bytes = captured.0.lock().expect("lock").clone();
        String::from_utf8(bytes).expect("utf-8")
    }

    #[test]
    fn delta_debug_events_appear_at_level_two() {
        if std::env::var(crate::LOG_ENV).is_ok() {
            return;
        }
        let output = capture(2, || {
            crate::debug_delta!(kept = 3, "refilled scan buffer");
            crate::trace_delta!(index = 0, "B");
        });
        assert!(output.contains("refilled scan buffer"), "{output}");
        assert!(!output.contains("TRACE"), "{output}");
    }

    #[test]
    fn delta_events_are_silent_by_default() {
        if std::env::var(crate::LOG_ENV).is_ok() {
            return;
        }
        let output = capture(0, || {
            crate::debug_delta!(kept = 3, "refilled scan buffer");
        });
        assert!(output.is_empty(), "{output}");
    }
}
