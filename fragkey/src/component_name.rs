//! Derives a human-readable label for a function-like node.
//!
//! The label is only ever used as the prefix of a generated key; uniqueness
//! comes from the per-file counter, so two anonymous components sharing a
//! label is fine.

use oxc::{
	ast::ast::{BindingPatternKind, PropertyKind},
	span::Atom,
};
use oxc_traverse::{Ancestor, TraverseCtx};

use crate::constants::{
	ANONYMOUS_ARROW_FUNCTION, ANONYMOUS_FUNCTION_DECLARATION, ANONYMOUS_FUNCTION_EXPRESSION,
};

/// The three syntactic forms a component definition can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionForm {
	/// `function Foo() {}`
	Declaration,
	/// `const Foo = function () {}`
	Expression,
	/// `const Foo = () => {}`
	Arrow,
}

impl FunctionForm {
	/// The label used when no name can be derived from the context.
	pub fn anonymous_label(self) -> Atom<'static> {
		match self {
			Self::Declaration => Atom::new_const(ANONYMOUS_FUNCTION_DECLARATION),
			Self::Expression => Atom::new_const(ANONYMOUS_FUNCTION_EXPRESSION),
			Self::Arrow => Atom::new_const(ANONYMOUS_ARROW_FUNCTION),
		}
	}
}

/// Resolves the component name for the function currently being entered.
///
/// Declarations use their own identifier. Expressions and arrows use the
/// identifier they are bound to by a variable declarator, looking through
/// any wrapping parentheses; their own name (for named function expressions)
/// is deliberately ignored.
pub fn resolve_name<'a>(
	form: FunctionForm,
	declared: Option<Atom<'a>>,
	ctx: &TraverseCtx<'a>,
) -> Atom<'a> {
	let resolved = match form {
		FunctionForm::Declaration => declared,
		FunctionForm::Expression | FunctionForm::Arrow => declarator_name(ctx),
	};

	resolved.unwrap_or_else(|| form.anonymous_label())
}

/// Returns the identifier of the variable declarator whose initializer is
/// the current node, if any.
fn declarator_name<'a>(ctx: &TraverseCtx<'a>) -> Option<Atom<'a>> {
	for ancestor in ctx.ancestors() {
		match ancestor {
			Ancestor::ParenthesizedExpressionExpression(_) => {}
			Ancestor::VariableDeclaratorInit(declarator) => {
				return match &declarator.id().kind {
					BindingPatternKind::BindingIdentifier(ident) => Some(ident.name),
					_ => None,
				};
			}
			_ => return None,
		}
	}

	None
}

/// Whether the current function is the value of a class or object-literal
/// method, getter or setter. Those are not function components.
pub fn is_method(ctx: &TraverseCtx<'_>) -> bool {
	match ctx.parent() {
		Ancestor::MethodDefinitionValue(_) => true,
		Ancestor::ObjectPropertyValue(prop) => *prop.method() || *prop.kind() != PropertyKind::Init,
		_ => false,
	}
}
