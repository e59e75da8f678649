use std::io::{self, Write};

use dosattrib_engine::{EntryReport, Reporter, UpdateStatus, WalkSummary};
use dosattrib_record::{AttributeRecord, ValidFields, nttime};
use serde::Serialize;
use serde_json::json;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One line per entry, plus optional blob dumps.
    #[default]
    Human,
    /// NDJSON (newline-delimited JSON) for machine consumption.
    Json,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PrinterConfig {
    pub format: OutputFormat,
    /// Detail level for records; each `-v` adds one.
    pub verbosity: u8,
    /// Dump old and new raw blobs.
    pub print_blobs: bool,
}

/// A `Reporter` that also closes the run with the walk counters.
pub trait ReportPrinter: Reporter {
    fn as_reporter(&mut self) -> &mut dyn Reporter;

    fn finish(&mut self, summary: &WalkSummary) -> io::Result<()>;
}

pub fn make_printer(cfg: PrinterConfig) -> Box<dyn ReportPrinter> {
    match cfg.format {
        OutputFormat::Human => Box::new(HumanPrinter::new(io::stdout(), io::stderr(), cfg)),
        OutputFormat::Json => Box::new(JsonPrinter::new(io::stdout(), io::stderr(), cfg)),
    }
}

/// Render a record at `verbosity`: letter codes, then the raw value, then
/// every valid field.
pub fn describe_record(record: &AttributeRecord, verbosity: u8) -> String {
    let letters = record.attribs.to_chars();
    let mut out = if letters.is_empty() {
        "-".to_owned()
    } else {
        letters
    };

    if verbosity >= 1 {
        out.push_str(&format!(" (0x{:02x})", record.attribs.bits()));
    }

    if verbosity >= 2 {
        let mut fields = vec![format!("version={}", record.version)];
        if record.version > 1 {
            fields.push(format!("valid_flags=0x{:02x}", record.valid.bits()));
        }
        if record.is_valid(ValidFields::EA_SIZE) {
            fields.push(format!("ea_size={}", record.ea_size));
        }
        if record.is_valid(ValidFields::SIZE) {
            fields.push(format!("size={}", record.size));
        }
        if record.is_valid(ValidFields::ALLOC_SIZE) {
            fields.push(format!("alloc_size={}", record.alloc_size));
        }
        if record.is_valid(ValidFields::CREATE_TIME) {
            fields.push(format!("create_time={}", nttime::format(record.create_time)));
        }
        if record.is_valid(ValidFields::CHANGE_TIME) {
            fields.push(format!("change_time={}", nttime::format(record.change_time)));
        }
        if record.is_valid(ValidFields::ITIME) {
            fields.push(format!("itime={}", nttime::format(record.itime)));
        }

        out.push_str(", ");
        out.push_str(&fields.join(", "));
    }

    out
}

/// Space separated lowercase hex bytes.
pub fn hex_bytes(blob: &[u8]) -> String {
    blob.iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

pub struct HumanPrinter<W: Write, E: Write> {
    out: W,
    err: E,
    cfg: PrinterConfig,
}

impl<W: Write, E: Write> HumanPrinter<W, E> {
    pub fn new(out: W, err: E, cfg: PrinterConfig) -> Self {
        Self { out, err, cfg }
    }

    fn status_suffix(status: &UpdateStatus) -> String {
        match status {
            UpdateStatus::Unchanged => String::new(),
            UpdateStatus::Updated => ": updated".to_owned(),
            UpdateStatus::NotUpdated => ": not updated (dry run)".to_owned(),
            UpdateStatus::Failed(reason) => format!(": update failed: {reason}"),
        }
    }
}

impl<W: Write, E: Write> Reporter for HumanPrinter<W, E> {
    fn report(&mut self, entry: &EntryReport) -> io::Result<()> {
        let verbosity = self.cfg.verbosity;
        let mut line = format!(
            "{}: {}",
            entry.path.display(),
            describe_record(&entry.old, verbosity)
        );
        if let Some(new) = &entry.new {
            line.push_str(" -> ");
            line.push_str(&describe_record(new, verbosity));
        }
        line.push_str(&Self::status_suffix(&entry.status));
        writeln!(self.out, "{line}")?;

        if self.cfg.print_blobs {
            writeln!(self.out, "  Old:\t{}", hex_bytes(&entry.old_blob))?;
            if !entry.new_blob.is_empty() {
                writeln!(self.out, "  New:\t{}", hex_bytes(&entry.new_blob))?;
            }
        }

        Ok(())
    }
}

impl<W: Write, E: Write> ReportPrinter for HumanPrinter<W, E> {
    fn as_reporter(&mut self) -> &mut dyn Reporter {
        self
    }

    fn finish(&mut self, summary: &WalkSummary) -> io::Result<()> {
        self.out.flush()?;

        if self.cfg.verbosity > 0 {
            writeln!(
                self.err,
                "\n{} visited, {} reported, {} updated, {} failed, {} corrupt{}",
                summary.visited,
                summary.reported,
                summary.updated,
                summary.failed,
                summary.corrupt,
                if summary.aborted { " (aborted)" } else { "" }
            )?;
        }

        Ok(())
    }
}

/// JSON view of a record.
#[derive(Debug, Serialize)]
struct JsonRecord {
    version: u16,
    attribs: u32,
    flags: String,
    valid_flags: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    create_time: Option<u64>,
}

impl From<&AttributeRecord> for JsonRecord {
    fn from(record: &AttributeRecord) -> Self {
        Self {
            version: record.version,
            attribs: record.attribs.bits(),
            flags: record.attribs.to_chars(),
            valid_flags: record.valid.bits(),
            create_time: record.create_time(),
        }
    }
}

pub struct JsonPrinter<W: Write, E: Write> {
    out: W,
    err: E,
    cfg: PrinterConfig,
}

impl<W: Write, E: Write> JsonPrinter<W, E> {
    pub fn new(out: W, err: E, cfg: PrinterConfig) -> Self {
        Self { out, err, cfg }
    }
}

impl<W: Write, E: Write> Reporter for JsonPrinter<W, E> {
    fn report(&mut self, entry: &EntryReport) -> io::Result<()> {
        let error = match &entry.status {
            UpdateStatus::Failed(reason) => Some(reason.as_str()),
            _ => None,
        };

        let mut obj = json!({
            "path": entry.path.to_string_lossy(),
            "kind": entry.kind.as_str(),
            "status": entry.status.as_str(),
            "error": error,
            "old": JsonRecord::from(&entry.old),
            "new": entry.new.as_ref().map(JsonRecord::from),
        });

        if self.cfg.print_blobs {
            obj["old_blob"] = json!(hex_bytes(&entry.old_blob));
            obj["new_blob"] = json!(hex_bytes(&entry.new_blob));
        }

        writeln!(self.out, "{obj}")
    }
}

impl<W: Write, E: Write> ReportPrinter for JsonPrinter<W, E> {
    fn as_reporter(&mut self) -> &mut dyn Reporter {
        self
    }

    fn finish(&mut self, summary: &WalkSummary) -> io::Result<()> {
        self.out.flush()?;

        let obj = json!({
            "type": "summary",
            "visited": summary.visited,
            "reported": summary.reported,
            "updated": summary.updated,
            "failed": summary.failed,
            "corrupt": summary.corrupt,
            "aborted": summary.aborted,
        });
        writeln!(self.err, "{obj}")
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
