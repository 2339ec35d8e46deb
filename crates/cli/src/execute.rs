//! Dispatch of parsed invocations to the engine.

use std::io::Write;
use std::path::Path;

use engine::{
    Destination, ExchangeError, ExchangeOptions, ExchangeReport, apply_batch, sync_files,
    write_batch,
};

use crate::command::{Action, ParsedArgs};

pub(crate) fn execute<Out: Write>(
    parsed: &ParsedArgs,
    stdout: &mut Out,
) -> Result<(), ExchangeError> {
    let (label, target, report) = match &parsed.action {
        Action::Sync {
            source,
            destination,
            output,
            chunk_size,
        } => {
            let mut options = ExchangeOptions::new().with_chunk_size(*chunk_size);
            if let Some(output) = output {
                options = options.with_output(output);
            }
            let report = sync_files(source, destination, &options)?;
            ("synced", output.as_deref().unwrap_or(destination), report)
        }
        Action::Delta {
            source,
            reference,
            batch,
            chunk_size,
        } => {
            let report = write_batch(source, reference, batch, *chunk_size)?;
            ("recorded", batch.as_path(), report)
        }
        Action::Patch {
            reference,
            batch,
            output,
        } => {
            let destination = output
                .clone()
                .map_or(Destination::InPlace, Destination::Output);
            let report = apply_batch(batch, reference, &destination)?;
            ("patched", output.as_deref().unwrap_or(reference), report)
        }
    };

    if parsed.verbose > 0 {
        let _ = writeln!(stdout, "{}", summary(label, target, &report));
    }
    Ok(())
}

fn summary(label: &str, target: &Path, report: &ExchangeReport) -> String {
    let mut line = format!(
        "{label} {}: {} packets, {} literal bytes, {} matched bytes",
        target.display(),
        report.packets,
        report.literal_bytes,
        report.matched_bytes,
    );
    if report.written_bytes > 0 {
        line.push_str(&format!(", {} bytes written", report.written_bytes));
    }
    if report.integrity_warnings > 0 {
        line.push_str(&format!(
            ", {} weak checksum collisions",
            report.integrity_warnings
        ));
    }
    if report.created_reference {
        line.push_str(" (created)");
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::parse_args;
    use std::ffi::OsStr;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn summary_lists_counters() {
        let report = ExchangeReport {
            packets: 3,
            literal_bytes: 10,
            matched_bytes: 8192,
            written_bytes: 8202,
            integrity_warnings: 1,
            ..ExchangeReport::default()
        };
        let line = summary("synced", Path::new("out.bin"), &report);
        assert_eq!(
            line,
            "synced out.bin: 3 packets, 10 literal bytes, 8192 matched bytes, \
             8202 bytes written, 1 weak checksum collisions"
        );
    }

    #[test]
    fn verbose_sync_prints_summary() {
        let temp = tempdir().expect("tempdir");
        let source = temp.path().join("src.txt");
        let destination = temp.path().join("dst.txt");
        fs::write(&source, b"hello").expect("write");

        let parsed = parse_args([
            OsStr::new("deltasync"),
            OsStr::new("-v"),
            OsStr::new("sync"),
            source.as_os_str(),
            destination.as_os_str(),
        ])
        .expect("parse");
        let mut stdout = Vec::new();
        execute(&parsed, &mut stdout).expect("execute");

        let printed = String::from_utf8(stdout).expect("utf-8");
        assert!(printed.starts_with("synced "));
        assert!(printed.contains("5 literal bytes"));
        assert!(printed.trim_end().ends_with("(created)"));
        assert_eq!(fs::read(&destination).expect("read"), b"hello");
    }

    #[test]
    fn quiet_run_prints_nothing() {
        let temp = tempdir().expect("tempdir");
        let source = temp.path().join("src.txt");
        let destination = temp.path().join("dst.txt");
        fs::write(&source, b"abc").expect("write");
        fs::write(&destination, b"xyz").expect("write");

        let parsed = parse_args([
            OsStr::new("deltasync"),
            OsStr::new("sync"),
            source.as_os_str(),
            destination.as_os_str(),
        ])
        .expect("parse");
        let mut stdout = Vec::new();
        execute(&parsed, &mut stdout).expect("execute");
        assert!(stdout.is_empty());
    }
}
