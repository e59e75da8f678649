use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser};
use log::debug;

mod printer;

use dosattrib_engine::{Policy, TreeWalker, WalkSummary};
use dosattrib_fs::{WalkOptions, WalkOrder, XattrStore};
use dosattrib_record::{ATTRIBUTE_TABLE, AttributeFlags, FlagsError};
use dosattrib_runtime::{DOSATTRIB_XATTR_NAME, PROGRAM_NAME, logging};
use printer::{OutputFormat, PrinterConfig, make_printer};

#[derive(Debug, Parser)]
#[command(
    name = "dosattrib",
    version,
    about = "Inspect and repair DOSATTRIB extended attributes",
    after_help = "FLAGS are runs of attribute letters, e.g. RH. See --list-flags."
)]
pub struct Cli {
    /// Compute and report changes without writing them
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Report every entry; repeat for more record detail
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Rewrite records even when nothing changed
    #[arg(short, long)]
    pub force: bool,

    /// Raise the log level to debug; repeat for trace
    #[arg(short, long, action = ArgAction::Count)]
    pub debug: u8,

    /// Continue past inaccessible entries and unreadable records
    #[arg(short, long)]
    pub ignore_errors: bool,

    /// Also process entries that have no record yet
    #[arg(short, long)]
    pub all: bool,

    /// Add a missing create time, or lower it to the file's birth time
    #[arg(short = 'u', long)]
    pub repair: bool,

    /// Recurse into directories
    #[arg(short, long)]
    pub recursive: bool,

    /// Dump old and new raw blobs
    #[arg(short, long)]
    pub print_blobs: bool,

    /// Output reports as NDJSON (one JSON object per line)
    #[arg(long)]
    pub json: bool,

    /// Record layout to write
    #[arg(
        short = 't',
        long,
        value_name = "VERSION",
        value_parser = clap::value_parser!(u16).range(1..=5)
    )]
    pub target_version: Option<u16>,

    /// Turn attributes on
    #[arg(short, long = "set", value_name = "FLAGS", value_parser = parse_flags)]
    pub set: Vec<AttributeFlags>,

    /// Turn attributes off
    #[arg(short, long = "clear", value_name = "FLAGS", value_parser = parse_flags)]
    pub clear: Vec<AttributeFlags>,

    /// Replace the attributes with exactly these
    #[arg(short = 'e', long = "assign", value_name = "FLAGS", value_parser = parse_flags)]
    pub assign: Option<AttributeFlags>,

    /// Only process entries with any of these attributes
    #[arg(short, long = "match", value_name = "FLAGS", value_parser = parse_flags)]
    pub match_flags: Option<AttributeFlags>,

    /// Print the attribute letters and exit
    #[arg(long)]
    pub list_flags: bool,

    /// Files and directories to process
    #[arg(required_unless_present = "list_flags")]
    pub paths: Vec<PathBuf>,
}

fn parse_flags(s: &str) -> Result<AttributeFlags, FlagsError> {
    AttributeFlags::from_chars(s)
}

impl Cli {
    pub fn policy(&self) -> Policy {
        let mut policy = Policy {
            match_mask: self.match_flags.unwrap_or_default(),
            target_version: self.target_version,
            process_all: self.all,
            repair: self.repair,
            verbose: self.verbose > 0,
            force: self.force,
            dry_run: self.dry_run,
            ignore_errors: self.ignore_errors,
            ..Policy::default()
        };

        if let Some(bits) = self.assign {
            policy.assign(bits);
        }
        // Both masks move together so --set and --clear also apply on top
        // of --assign.
        for bits in &self.set {
            policy.or_mask |= *bits;
            policy.and_mask |= *bits;
        }
        for bits in &self.clear {
            policy.or_mask -= *bits;
            policy.and_mask -= *bits;
        }

        policy
    }

    pub fn walk_options(&self) -> WalkOptions {
        WalkOptions {
            recursive: self.recursive,
            order: WalkOrder::Pre,
        }
    }

    pub fn printer_config(&self) -> PrinterConfig {
        PrinterConfig {
            format: if self.json {
                OutputFormat::Json
            } else {
                OutputFormat::Human
            },
            verbosity: self.verbose,
            print_blobs: self.print_blobs,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_with(logging::level_for_debug_count(cli.debug)).ok();

    match run(&cli) {
        Ok(summary) if summary.is_success() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(1),
        Err(e) => {
            eprintln!("{PROGRAM_NAME}: error: {e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: &Cli) -> Result<WalkSummary> {
    if cli.list_flags {
        list_flags();
        return Ok(WalkSummary::default());
    }

    if !XattrStore::platform_supported() {
        bail!("extended attributes are not supported on this platform");
    }

    let policy = cli.policy();
    debug!("[main] {policy:?}");

    let store = XattrStore::new(DOSATTRIB_XATTR_NAME);
    let mut printer = make_printer(cli.printer_config());

    let summary = TreeWalker::new(&policy, &store, printer.as_reporter())
        .run(&cli.paths, &cli.walk_options())
        .context("failed to write report")?;

    printer
        .finish(&summary)
        .context("failed to write summary")?;

    Ok(summary)
}

fn list_flags() {
    for info in ATTRIBUTE_TABLE {
        println!("  {}  0x{:04x}  {}", info.code, info.flag.bits(), info.description);
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
