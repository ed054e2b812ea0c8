//! # Fragkey
//! This is the core library for the `add-fragment-key` pass.
//!
//! The pass gives every fragment returned at the top level of a function
//! component a stable `key`, so the renderer can tell fragment instances
//! apart across hot updates:
//!
//! ```jsx
//! function Foo() { return <>{a}{b}</>; }
//! // becomes
//! import { Fragment as _Fragment } from "preact/jsx-runtime";
//! function Foo() { return <_Fragment key="Foo_frag_0">{a}{b}</_Fragment>; }
//! ```
//!
//! Only the outermost returned value is considered. Fragments nested in
//! conditionals, arrays or children, and returns of nested helpers, are
//! left untouched.

mod component_name;
mod constants;
mod file_state;
mod scanner;
mod traverser;

use oxc::{allocator::Allocator, ast::ast::Program, semantic::Scoping};

pub use crate::file_state::{FileState, FileStateRegistry, SourceFile};
use crate::traverser::FragmentKeyTraverser;

/// Return value from [`transform()`].
pub struct FragmentKeyResult {
	/// The [`Scoping`] instance after transformation.
	pub scoping: Scoping,
	/// The keys generated during this pass, in the order they were attached.
	pub keys: Vec<String>,
}

impl FragmentKeyResult {
	/// Whether any fragment received a key.
	pub fn performed_transformation(&self) -> bool {
		!self.keys.is_empty()
	}
}

/// Keys the top-level fragments of every function component in
/// [`Program`], in-place.
///
/// `file` selects the counter in `registry` that key suffixes are drawn
/// from; it is created on first use and keeps counting across calls until
/// the caller [releases](FileStateRegistry::release) it.
pub fn transform<'a>(
	allocator: &'a Allocator,
	program: &mut Program<'a>,
	scoping: Scoping,
	registry: &mut FileStateRegistry,
	file: &SourceFile,
) -> FragmentKeyResult {
	let mut traverser = FragmentKeyTraverser::new_in(registry, file, allocator);
	let scoping = oxc_traverse::traverse_mut(&mut traverser, allocator, program, scoping);

	tracing::debug!(
		pass = constants::PASS_NAME,
		file = file.name(),
		keyed = traverser.keys.len(),
		"pass complete"
	);

	FragmentKeyResult {
		scoping,
		keys: traverser.keys,
	}
}

#[cfg(test)]
mod tests;
