use super::*;
use clap::{CommandFactory, error::ErrorKind};

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("dosattrib").chain(args.iter().copied()))
        .expect("valid arguments")
}

fn parse_err(args: &[&str]) -> clap::Error {
    Cli::try_parse_from(std::iter::once("dosattrib").chain(args.iter().copied()))
        .expect_err("invalid arguments")
}

#[test]
fn command_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn defaults_leave_attributes_alone() {
    let cli = parse(&["some/file"]);
    assert_eq!(cli.paths, vec![PathBuf::from("some/file")]);
    assert_eq!(cli.policy(), Policy::default());
    assert!(!cli.walk_options().recursive);
    assert_eq!(cli.printer_config().format, OutputFormat::Human);
}

#[test]
fn short_switches_combine() {
    let cli = parse(&["-nvvfiaur", "-dd", "-p", "dir"]);
    let policy = cli.policy();

    assert!(policy.dry_run);
    assert!(policy.verbose);
    assert!(policy.force);
    assert!(policy.ignore_errors);
    assert!(policy.process_all);
    assert!(policy.repair);
    assert!(cli.walk_options().recursive);
    assert_eq!(cli.debug, 2);
    assert_eq!(cli.printer_config().verbosity, 2);
    assert!(cli.printer_config().print_blobs);
}

#[test]
fn set_and_clear_build_the_masks() {
    let cli = parse(&["-s", "RH", "--set", "S", "-c", "A", "file"]);
    let policy = cli.policy();

    assert_eq!(
        policy.or_mask,
        AttributeFlags::READONLY | AttributeFlags::HIDDEN | AttributeFlags::SYSTEM
    );
    assert_eq!(policy.and_mask, AttributeFlags::keep_all() - AttributeFlags::ARCHIVE);
    assert!(!policy.and_mask.contains(AttributeFlags::ARCHIVE));
    assert_eq!(policy.and_mask.bits() | AttributeFlags::ARCHIVE.bits(), u32::MAX);
}

#[test]
fn assign_then_adjust() {
    let cli = parse(&["-e", "RA", "-s", "H", "-c", "R", "file"]);
    let policy = cli.policy();

    let old = dosattrib_record::AttributeRecord {
        valid: dosattrib_record::ValidFields::ATTRIB,
        attribs: AttributeFlags::SYSTEM | AttributeFlags::READONLY,
        ..dosattrib_record::AttributeRecord::new(5)
    };
    let out = policy
        .reconcile(Some(&old), dosattrib_fs::EntryKind::File, None)
        .expect("processed");
    assert_eq!(out.new.attribs, AttributeFlags::ARCHIVE | AttributeFlags::HIDDEN);
}

#[test]
fn match_and_target_version() {
    let cli = parse(&["-m", "HS", "-t", "3", "--json", "file"]);
    let policy = cli.policy();

    assert_eq!(policy.match_mask, AttributeFlags::HIDDEN | AttributeFlags::SYSTEM);
    assert_eq!(policy.target_version, Some(3));
    assert_eq!(cli.printer_config().format, OutputFormat::Json);
}

#[test]
fn invalid_attribute_letter_is_rejected() {
    let err = parse_err(&["-s", "RX", "file"]);
    assert_eq!(err.kind(), ErrorKind::ValueValidation);
    assert!(err.to_string().contains("invalid attribute letter 'X'"));
}

#[test]
fn target_version_out_of_range_is_rejected() {
    assert_eq!(parse_err(&["-t", "0", "file"]).kind(), ErrorKind::ValueValidation);
    assert_eq!(parse_err(&["-t", "6", "file"]).kind(), ErrorKind::ValueValidation);
}

#[test]
fn paths_are_required_unless_listing_flags() {
    assert_eq!(
        parse_err(&["-r"]).kind(),
        ErrorKind::MissingRequiredArgument
    );

    let cli = parse(&["--list-flags"]);
    assert!(cli.list_flags);
    assert!(cli.paths.is_empty());
}
