//! Argument definitions and parsing.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::builder::OsStringValueParser;
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use signature::ChunkSize;

/// Program name used when the argument list is empty.
pub const PROGRAM_NAME: &str = "deltasync";

/// A fully parsed invocation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct ParsedArgs {
    pub(crate) verbose: u8,
    pub(crate) action: Action,
}

/// Subcommand with its operands.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Action {
    Sync {
        source: PathBuf,
        destination: PathBuf,
        output: Option<PathBuf>,
        chunk_size: ChunkSize,
    },
    Delta {
        source: PathBuf,
        reference: PathBuf,
        batch: PathBuf,
        chunk_size: ChunkSize,
    },
    Patch {
        reference: PathBuf,
        batch: PathBuf,
        output: Option<PathBuf>,
    },
}

fn path_arg(id: &'static str, value_name: &'static str, help: &'static str) -> Arg {
    Arg::new(id)
        .value_name(value_name)
        .help(help)
        .required(true)
        .value_parser(OsStringValueParser::new())
}

fn output_arg() -> Arg {
    Arg::new("output")
        .long("output")
        .short('o')
        .value_name("PATH")
        .help("Write the result to PATH instead of replacing the reference.")
        .value_parser(OsStringValueParser::new())
}

fn batch_arg() -> Arg {
    Arg::new("batch")
        .long("batch")
        .value_name("FILE")
        .help("Batch file holding the recorded delta.")
        .required(true)
        .value_parser(OsStringValueParser::new())
}

fn chunk_size_arg() -> Arg {
    Arg::new("chunk-size")
        .long("chunk-size")
        .short('B')
        .value_name("BYTES")
        .help("Chunk size in bytes (default 4096).")
        .value_parser(value_parser!(ChunkSize))
}

pub(crate) fn clap_command() -> Command {
    Command::new(PROGRAM_NAME)
        .version(env!("CARGO_PKG_VERSION"))
        .about("Rolling-checksum delta synchronisation of single files.")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Increase diagnostic output (repeatable).")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(
            Command::new("sync")
                .about("Bring DEST up to date with SRC.")
                .arg(path_arg("source", "SRC", "File with the wanted contents."))
                .arg(path_arg(
                    "destination",
                    "DEST",
                    "Reference file; replaced in place unless --output is given.",
                ))
                .arg(output_arg())
                .arg(chunk_size_arg()),
        )
        .subcommand(
            Command::new("delta")
                .about("Record the delta from REFERENCE to SRC in a batch file.")
                .arg(path_arg("source", "SRC", "File with the wanted contents."))
                .arg(path_arg(
                    "reference",
                    "REFERENCE",
                    "File the receiver already holds.",
                ))
                .arg(batch_arg())
                .arg(chunk_size_arg()),
        )
        .subcommand(
            Command::new("patch")
                .about("Apply a batch file to REFERENCE.")
                .arg(path_arg(
                    "reference",
                    "REFERENCE",
                    "File the batch was recorded against.",
                ))
                .arg(batch_arg())
                .arg(output_arg()),
        )
}

fn path(matches: &ArgMatches, id: &str) -> Option<PathBuf> {
    matches.get_one::<OsString>(id).map(PathBuf::from)
}

fn required_path(matches: &ArgMatches, id: &str) -> PathBuf {
    path(matches, id).unwrap_or_default()
}

fn chunk_size(matches: &ArgMatches) -> ChunkSize {
    matches
        .get_one::<ChunkSize>("chunk-size")
        .copied()
        .unwrap_or_default()
}

pub(crate) fn parse_args<I, S>(arguments: I) -> Result<ParsedArgs, clap::Error>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut args: Vec<OsString> = arguments.into_iter().map(Into::into).collect();
    if args.is_empty() {
        args.push(OsString::from(PROGRAM_NAME));
    }

    let matches = clap_command().try_get_matches_from(args)?;
    let mut verbose = matches.get_count("verbose");
    if let Some((_, sub)) = matches.subcommand() {
        verbose = verbose.max(sub.get_count("verbose"));
    }

    let action = match matches.subcommand() {
        Some(("sync", sub)) => Action::Sync {
            source: required_path(sub, "source"),
            destination: required_path(sub, "destination"),
            output: path(sub, "output"),
            chunk_size: chunk_size(sub),
        },
        Some(("delta", sub)) => Action::Delta {
            source: required_path(sub, "source"),
            reference: required_path(sub, "reference"),
            batch: required_path(sub, "batch"),
            chunk_size: chunk_size(sub),
        },
        Some(("patch", sub)) => Action::Patch {
            reference: required_path(sub, "reference"),
            batch: required_path(sub, "batch"),
            output: path(sub, "output"),
        },
        _ => {
            return Err(clap_command().error(
                clap::error::ErrorKind::MissingSubcommand,
                "a subcommand is required",
            ));
        }
    };

    Ok(ParsedArgs { verbose, action })
}
