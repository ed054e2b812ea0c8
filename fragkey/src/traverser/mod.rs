mod inject;
mod oxc_impl;

use std::cell::Cell;

use oxc::{
	allocator::{Allocator, Vec},
	ast::ast::{
		BindingIdentifier, FunctionBody, IdentifierName, IdentifierReference, ImportDeclaration,
		ImportDeclarationSpecifier, ImportOrExportKind, ImportSpecifier, JSXElementName,
		ModuleExportName, Program, Statement, StringLiteral,
	},
	semantic::{ReferenceFlags, SymbolFlags, SymbolId},
	span::{Atom, Span},
};
use oxc_traverse::TraverseCtx;

use crate::{
	constants::{FRAGMENT, FRAGMENT_IDENT, FRAGMENT_SOURCE},
	file_state::{FileStateRegistry, SourceFile},
	scanner::top_level_returns,
};

/// The local binding that names the grouping element in this unit.
#[derive(Debug, Clone, Copy)]
pub struct FragmentBinding<'a> {
	/// The local name, e.g. `Fragment` or `_Fragment`.
	pub name: Atom<'a>,
	/// The symbol the name is bound to.
	pub sym: SymbolId,
	/// Whether the binding was created by this pass and still needs an
	/// import declaration emitted for it.
	pub generated: bool,
}

/// Traverser that keys the top-level fragments of function components.
pub struct FragmentKeyTraverser<'a, 's> {
	/// Per-file counters, owned by the caller.
	pub registry: &'s mut FileStateRegistry,
	/// The unit being transformed.
	pub file: &'s SourceFile,
	/// The grouping element binding, once resolved or created.
	pub fragment_binding: Option<FragmentBinding<'a>>,
	/// Every key generated during this pass, in generation order.
	pub keys: std::vec::Vec<String>,
	/// The underlying Bumpalo allocator.
	pub allocator: &'a Allocator,
}

impl<'a, 's> FragmentKeyTraverser<'a, 's> {
	/// Creates a new traverser for `file` using the given Bumpalo allocator.
	pub fn new_in(
		registry: &'s mut FileStateRegistry,
		file: &'s SourceFile,
		allocator: &'a Allocator,
	) -> Self {
		Self {
			registry,
			file,
			fragment_binding: None,
			keys: std::vec::Vec::new(),
			allocator,
		}
	}

	/// Scans a component body and keys every fragment it returns at its own
	/// top level, in the order the returns appear.
	pub(crate) fn process_component(
		&mut self,
		body: &mut FunctionBody<'a>,
		expression_body: bool,
		component: Atom<'a>,
		ctx: &mut TraverseCtx<'a>,
	) {
		tracing::trace!(component = %component, "scanning component");

		for candidate in top_level_returns(body, expression_body) {
			self.inject_if_needed(candidate, component, ctx);
		}
	}

	/// Generates the next key for `component` from this unit's counter.
	fn next_key(&mut self, component: Atom<'a>) -> String {
		let key = self
			.registry
			.get_or_create(self.file)
			.next_key(component.as_str());
		self.keys.push(key.clone());
		key
	}

	/// Returns the grouping element binding, generating a fresh root-scope
	/// name for it on first use if the unit does not import one already.
	fn resolve_fragment_binding(&mut self, ctx: &mut TraverseCtx<'a>) -> FragmentBinding<'a> {
		if let Some(binding) = self.fragment_binding {
			return binding;
		}

		let bound = ctx.generate_uid_in_root_scope(FRAGMENT_IDENT, SymbolFlags::Import);
		tracing::debug!(
			file = self.file.name(),
			local = %bound.name,
			"binding {FRAGMENT_IDENT} from {FRAGMENT_SOURCE}"
		);

		let binding = FragmentBinding {
			name: bound.name,
			sym: bound.symbol_id,
			generated: true,
		};
		self.fragment_binding = Some(binding);
		binding
	}

	/// Builds `import { Fragment as <local> } from "preact/jsx-runtime";`.
	fn import_declaration(
		&self,
		binding: FragmentBinding<'a>,
		ctx: &mut TraverseCtx<'a>,
	) -> Statement<'a> {
		Statement::ImportDeclaration(ctx.alloc(ImportDeclaration {
			import_kind: ImportOrExportKind::Value,
			phase: None,
			span: Span::empty(0),
			specifiers: Some(Vec::from_array_in(
				[ImportDeclarationSpecifier::ImportSpecifier(ctx.alloc(
					ImportSpecifier {
						span: Span::empty(0),
						imported: ModuleExportName::IdentifierName(IdentifierName {
							span: Span::empty(0),
							name: FRAGMENT,
						}),
						local: BindingIdentifier {
							span: Span::empty(0),
							name: binding.name,
							symbol_id: Cell::new(Some(binding.sym)),
						},
						import_kind: ImportOrExportKind::Value,
					},
				))],
				self.allocator,
			)),
			source: StringLiteral {
				lossy: false,
				raw: None,
				value: Atom::new_const(FRAGMENT_SOURCE),
				span: Span::empty(0),
			},
			with_clause: None,
		}))
	}
}

/// Creates a fresh tag name referencing the grouping element binding.
fn fragment_tag<'a>(binding: FragmentBinding<'a>, ctx: &mut TraverseCtx<'a>) -> JSXElementName<'a> {
	let reference_id =
		ctx.create_reference(binding.name.as_str(), Some(binding.sym), ReferenceFlags::Read);

	JSXElementName::IdentifierReference(ctx.alloc(IdentifierReference {
		span: Span::default(),
		name: binding.name,
		reference_id: Cell::new(Some(reference_id)),
	}))
}

/// Finds an existing value import of the grouping element in `program`.
fn find_fragment_import<'a>(program: &Program<'a>) -> Option<FragmentBinding<'a>> {
	program.body.iter().find_map(|stmt| {
		let Statement::ImportDeclaration(decl) = stmt else {
			return None;
		};

		if decl.source.value.as_str() != FRAGMENT_SOURCE || decl.import_kind.is_type() {
			return None;
		}

		decl.specifiers.as_ref()?.iter().find_map(|specifier| match specifier {
			ImportDeclarationSpecifier::ImportSpecifier(specifier)
				if specifier.import_kind.is_value()
					&& specifier.imported.name().as_str() == FRAGMENT_IDENT =>
			{
				Some(FragmentBinding {
					name: specifier.local.name,
					sym: specifier.local.symbol_id.get()?,
					generated: false,
				})
			}
			_ => None,
		})
	})
}
