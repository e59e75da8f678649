use std::{
    io,
    ops::ControlFlow,
    path::{Path, PathBuf},
};

use dosattrib_fs::{AttributeStore, EntryKind, FsEntry, WalkOptions, walk_tree};
use dosattrib_record::{AttributeRecord, Decoded, encode, nttime, parse};
use dosattrib_runtime::BLOB_CAPACITY;
use log::{debug, error, info, warn};

use crate::{
    policy::{CreateTimeRepair, Policy},
    report::{EntryReport, Reporter, UpdateStatus, WalkSummary},
};

/// Applies a `Policy` to every entry of a physical tree walk.
///
/// Per entry: fetch the blob, decode it, reconcile, encode the new record,
/// write it back and report. Failures on one entry are logged and counted;
/// only an inaccessible entry (without `ignore_errors`) or a failing
/// reporter stops the walk.
pub struct TreeWalker<'a> {
    policy: &'a Policy,
    store: &'a dyn AttributeStore,
    reporter: &'a mut dyn Reporter,
    summary: WalkSummary,
    output_error: Option<io::Error>,
}

impl<'a> TreeWalker<'a> {
    pub fn new(
        policy: &'a Policy,
        store: &'a dyn AttributeStore,
        reporter: &'a mut dyn Reporter,
    ) -> Self {
        Self {
            policy,
            store,
            reporter,
            summary: WalkSummary::default(),
            output_error: None,
        }
    }

    /// Walk `roots` and return the counters. Errors only when the reporter
    /// fails to write.
    pub fn run(mut self, roots: &[PathBuf], options: &WalkOptions) -> io::Result<WalkSummary> {
        debug!("[walk] starting with {:?}", self.policy);

        let flow = walk_tree(roots, options, |entry| self.visit(entry));
        if flow.is_break() {
            self.summary.aborted = true;
        }

        debug!("[walk] finished: {:?}", self.summary);

        match self.output_error.take() {
            Some(e) => Err(e),
            None => Ok(self.summary),
        }
    }

    fn visit(&mut self, entry: FsEntry) -> ControlFlow<()> {
        self.summary.visited += 1;

        if entry.kind == EntryKind::Inaccessible {
            return self.inaccessible(&entry);
        }

        self.process(&entry)
    }

    fn inaccessible(&mut self, entry: &FsEntry) -> ControlFlow<()> {
        let reason = entry
            .error
            .as_ref()
            .map_or_else(|| "unknown error".to_owned(), ToString::to_string);

        if self.policy.ignore_errors {
            warn!(
                "[walk] {}: unable to access [ignored]: {reason}",
                entry.full_path.display()
            );
            return ControlFlow::Continue(());
        }

        error!("[walk] {}: unable to access: {reason}", entry.full_path.display());
        self.summary.failed += 1;
        ControlFlow::Break(())
    }

    fn process(&mut self, entry: &FsEntry) -> ControlFlow<()> {
        let path = entry.full_path.as_path();

        let old_blob = match self.store.get(path) {
            Ok(blob) => blob,
            Err(e) if self.policy.ignore_errors => {
                warn!("[walk] {e} [treated as absent]");
                None
            }
            Err(e) => {
                warn!("[walk] {e}");
                self.summary.failed += 1;
                return ControlFlow::Continue(());
            }
        };

        let old = match old_blob.as_deref() {
            None => None,
            Some(blob) => match parse(blob) {
                Ok(decoded) => stored_record(decoded),
                Err(e) => {
                    self.summary.corrupt += 1;
                    if !self.policy.ignore_errors {
                        warn!("[walk] {}: corrupt DOSATTRIB, skipped: {e}", path.display());
                        return ControlFlow::Continue(());
                    }
                    warn!(
                        "[walk] {}: corrupt DOSATTRIB, treated as absent: {e}",
                        path.display()
                    );
                    None
                }
            },
        };

        let birth_time = entry.birth_time.map(nttime::from_system_time);
        let Some(outcome) = self.policy.reconcile(old.as_ref(), entry.kind, birth_time) else {
            debug!("[walk] {}: skipped", path.display());
            return ControlFlow::Continue(());
        };

        match outcome.repair {
            Some(CreateTimeRepair::Added(ticks)) => info!(
                "[repair] {}: adding create time {}",
                path.display(),
                nttime::format(ticks)
            ),
            Some(CreateTimeRepair::Lowered { from, to }) => info!(
                "[repair] {}: lowering create time {} -> {}",
                path.display(),
                nttime::format(from),
                nttime::format(to)
            ),
            None => {}
        }

        if !outcome.reportable {
            return ControlFlow::Continue(());
        }

        let mut report = EntryReport {
            path: entry.full_path.clone(),
            kind: entry.kind,
            old: outcome.old,
            new: None,
            old_blob: old_blob.unwrap_or_default(),
            new_blob: Vec::new(),
            status: UpdateStatus::Unchanged,
        };

        if outcome.needs_write(self.policy) {
            report.new = Some(outcome.new);
            (report.status, report.new_blob) = self.write(path, &outcome.new);
        }

        self.summary.reported += 1;
        if let Err(e) = self.reporter.report(&report) {
            error!("[walk] failed to write report: {e}");
            self.output_error = Some(e);
            return ControlFlow::Break(());
        }

        ControlFlow::Continue(())
    }

    fn write(&mut self, path: &Path, record: &AttributeRecord) -> (UpdateStatus, Vec<u8>) {
        let mut buf = [0u8; BLOB_CAPACITY];
        let len = match encode(record, record.version, &mut buf) {
            Ok(len) => len,
            Err(e) => {
                warn!(
                    "[walk] {}: cannot encode version {} record: {e}",
                    path.display(),
                    record.version
                );
                self.summary.failed += 1;
                return (UpdateStatus::Failed(e.to_string()), Vec::new());
            }
        };
        let blob = buf[..len].to_vec();

        if self.policy.dry_run {
            return (UpdateStatus::NotUpdated, blob);
        }

        match self.store.set(path, &blob) {
            Ok(()) => {
                debug!("[walk] {}: wrote {len} byte record", path.display());
                self.summary.updated += 1;
                (UpdateStatus::Updated, blob)
            }
            Err(e) => {
                warn!("[walk] {e}");
                self.summary.failed += 1;
                (UpdateStatus::Failed(e.io_error().to_string()), blob)
            }
        }
    }
}

/// Record carried by a decoded blob. A blob holding only the legacy text
/// prefix stands for a record with just those attribs.
fn stored_record(decoded: Decoded) -> Option<AttributeRecord> {
    match (decoded.record, decoded.legacy_attribs) {
        (Some(record), _) => Some(record),
        (None, Some(attribs)) => Some(AttributeRecord {
            attribs,
            ..AttributeRecord::synthesized()
        }),
        (None, None) => None,
    }
}

#[cfg(test)]
#[path = "walk_tests.rs"]
mod tests;
