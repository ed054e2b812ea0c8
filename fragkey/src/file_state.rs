//! Per-file bookkeeping for the fragment key pass.
//!
//! Every unit being transformed gets exactly one [`FileState`], looked up
//! through a caller-owned [`FileStateRegistry`]. The registry is passed into
//! [`crate::transform()`] explicitly; nothing here is global, so independent
//! runs never observe each other's counters.

use std::collections::HashMap;

use crate::constants::{KEY_INFIX, UNKNOWN_FILE};

/// Opaque identity of one input unit.
///
/// Only ever used as a lookup key. Units without a filename all share the
/// `unknown_file` sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceFile(String);

impl SourceFile {
	/// Creates a handle from an (optional) filename.
	pub fn new(filename: Option<&str>) -> Self {
		Self(filename.unwrap_or(UNKNOWN_FILE).to_string())
	}

	/// The filename this handle was created with, or the sentinel.
	pub fn name(&self) -> &str {
		&self.0
	}
}

/// Mutable state for a single unit's transformation pass.
#[derive(Debug, Default)]
pub struct FileState {
	/// The next key suffix to hand out. Never decreases.
	counter: usize,
}

impl FileState {
	/// Returns the suffix the next generated key will carry.
	pub fn counter(&self) -> usize {
		self.counter
	}

	/// Formats `<component>_frag_<n>` from the current counter and advances it.
	///
	/// Only call this for a fragment that is actually being keyed; discarded
	/// keys leave gaps in the numbering.
	pub fn next_key(&mut self, component_name: &str) -> String {
		let key = format!("{component_name}{KEY_INFIX}{}", self.counter);
		self.counter += 1;
		key
	}
}

/// Lazily-populated map from unit handle to its [`FileState`].
#[derive(Debug, Default)]
pub struct FileStateRegistry {
	/// The live records, one per unit currently being transformed.
	states: HashMap<SourceFile, FileState>,
}

impl FileStateRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the record for `file`, creating a zeroed one on first use.
	///
	/// Repeated calls hand back the same record, not a copy.
	pub fn get_or_create(&mut self, file: &SourceFile) -> &mut FileState {
		self.states.entry(file.clone()).or_default()
	}

	/// Discards the record for `file` once its pass is over.
	pub fn release(&mut self, file: &SourceFile) -> Option<FileState> {
		self.states.remove(file)
	}

	/// The number of units with a live record.
	pub fn len(&self) -> usize {
		self.states.len()
	}

	/// Whether no unit currently has a live record.
	pub fn is_empty(&self) -> bool {
		self.states.is_empty()
	}
}
