use dosattrib_fs::EntryKind;
use dosattrib_record::{AttributeFlags, AttributeRecord, ValidFields};

/// What a walk does to each entry's record. Built once and shared read-only
/// by every walk step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
    /// Bits forced on.
    pub or_mask: AttributeFlags,
    /// Bits kept; everything outside is forced off.
    pub and_mask: AttributeFlags,
    /// When nonzero, only entries whose old attribs share a bit with it are
    /// processed.
    pub match_mask: AttributeFlags,
    /// Layout for rewritten records; `None` keeps the old layout.
    pub target_version: Option<u16>,
    /// Synthesize a record for entries that have none.
    pub process_all: bool,
    /// Fill in or lower the create time from the filesystem birth time.
    pub repair: bool,
    /// Report every processed entry.
    pub verbose: bool,
    /// Rewrite records even when nothing changed.
    pub force: bool,
    pub dry_run: bool,
    pub ignore_errors: bool,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            or_mask: AttributeFlags::empty(),
            and_mask: AttributeFlags::keep_all(),
            match_mask: AttributeFlags::empty(),
            target_version: None,
            process_all: false,
            repair: false,
            verbose: false,
            force: false,
            dry_run: false,
            ignore_errors: false,
        }
    }
}

/// How repair touched the create time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateTimeRepair {
    Added(u64),
    Lowered { from: u64, to: u64 },
}

/// Outcome of applying a `Policy` to one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciled {
    /// Record found on the entry, or the synthesized stand-in.
    pub old: AttributeRecord,
    pub new: AttributeRecord,
    pub changed: bool,
    pub reportable: bool,
    pub repair: Option<CreateTimeRepair>,
}

impl Reconciled {
    /// Whether the new record should be encoded and written back.
    #[inline]
    pub fn needs_write(&self, policy: &Policy) -> bool {
        self.changed || policy.force
    }
}

impl Policy {
    /// Replace the attribs outright: `bits` on, everything else off.
    pub fn assign(&mut self, bits: AttributeFlags) {
        self.or_mask = bits;
        self.and_mask = bits;
    }

    /// Compute the new record for an entry.
    ///
    /// `old` is `None` when the entry has no record. Returns `None` when the
    /// entry is skipped: no record and `process_all` off, or a match mask
    /// that the old attribs miss. `birth_time` is in NT ticks.
    pub fn reconcile(
        &self,
        old: Option<&AttributeRecord>,
        kind: EntryKind,
        birth_time: Option<u64>,
    ) -> Option<Reconciled> {
        let old = match old {
            Some(record) => *record,
            None if self.process_all => AttributeRecord::synthesized(),
            None => return None,
        };

        if !self.match_mask.is_empty() && !self.match_mask.intersects(old.attribs) {
            return None;
        }

        let mut new = old;
        if let Some(version) = self.target_version {
            new.version = version;
        }

        new.attribs = (old.attribs | self.or_mask) & self.and_mask;
        new.attribs = directory_corrected(new.attribs, kind);
        new.valid.insert(ValidFields::ATTRIB);

        let repair = match birth_time {
            Some(birth) if self.repair => repair_create_time(&mut new, birth),
            _ => None,
        };

        let changed = new != old;
        let reportable = self.verbose
            || changed
            || self.force
            || self.match_mask.intersects(old.attribs);

        Some(Reconciled {
            old,
            new,
            changed,
            reportable,
            repair,
        })
    }
}

/// Make the Directory bit agree with the entry type. Symlinks and
/// inaccessible entries are left alone.
fn directory_corrected(attribs: AttributeFlags, kind: EntryKind) -> AttributeFlags {
    match kind {
        EntryKind::Dir | EntryKind::DirPost => attribs | AttributeFlags::DIRECTORY,
        EntryKind::File => attribs - AttributeFlags::DIRECTORY,
        EntryKind::Symlink | EntryKind::Inaccessible => attribs,
    }
}

/// Never raises an existing create time.
fn repair_create_time(record: &mut AttributeRecord, birth: u64) -> Option<CreateTimeRepair> {
    match record.create_time() {
        None => {
            record.set_create_time(birth);
            Some(CreateTimeRepair::Added(birth))
        }
        Some(current) if birth < current => {
            record.set_create_time(birth);
            Some(CreateTimeRepair::Lowered {
                from: current,
                to: birth,
            })
        }
        Some(_) => None,
    }
}

#[cfg(test)]
#[path = "policy_tests.rs"]
mod tests;
