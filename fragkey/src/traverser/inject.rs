use oxc::{
	allocator::{CloneIn, FromIn, Vec},
	ast::ast::{
		Expression, JSXAttribute, JSXAttributeItem, JSXAttributeName, JSXAttributeValue,
		JSXClosingElement, JSXElement, JSXElementName, JSXIdentifier, JSXOpeningElement,
		StringLiteral,
	},
	semantic::ReferenceFlags,
	span::{Atom, Span},
};
use oxc_traverse::TraverseCtx;

use super::fragment_tag;
use crate::constants::{FRAGMENT_IDENT, KEY, KEY_ATTR};

impl<'a> super::FragmentKeyTraverser<'a, '_> {
	/// Keys `candidate` if it is a fragment that does not carry a key yet.
	///
	/// `<>...</>` is replaced outright by `<Fragment key="...">...</Fragment>`
	/// (under whatever local name the grouping element is bound to), since the
	/// shorthand form has no attribute list. `<Fragment>` gets a key appended
	/// in place unless it already has one. Anything else is left alone.
	pub(crate) fn inject_if_needed(
		&mut self,
		candidate: &mut Expression<'a>,
		component: Atom<'a>,
		ctx: &mut TraverseCtx<'a>,
	) {
		match candidate {
			Expression::JSXFragment(fragment) => {
				let binding = self.resolve_fragment_binding(ctx);
				let key = self.next_key(component);
				tracing::debug!(file = self.file.name(), %key, "keying shorthand fragment");

				let opening_name = fragment_tag(binding, ctx);
				let closing_name = fragment_tag(binding, ctx);
				let opening_element = ctx.alloc(JSXOpeningElement {
					span: fragment.opening_fragment.span,
					self_closing: false,
					name: opening_name,
					attributes: Vec::from_array_in([self.key_attribute(&key, ctx)], self.allocator),
					type_arguments: None,
				});
				let closing_element = ctx.alloc(JSXClosingElement {
					span: fragment.closing_fragment.span,
					name: closing_name,
				});
				let children =
					std::mem::replace(&mut fragment.children, Vec::new_in(self.allocator));

				let element = JSXElement {
					span: fragment.span,
					opening_element,
					closing_element: Some(closing_element),
					children,
				};
				*candidate = Expression::JSXElement(ctx.alloc(element));
			}
			Expression::JSXElement(element) if is_fragment_tag(&element.opening_element.name) => {
				if has_key(&element.opening_element.attributes) {
					return;
				}

				let key = self.next_key(component);
				tracing::debug!(file = self.file.name(), %key, "keying {FRAGMENT_IDENT} element");

				let attribute = self.key_attribute(&key, ctx);
				element.opening_element.attributes.push(attribute);

				if element.closing_element.is_none() {
					let name = self.closing_name(&element.opening_element.name, ctx);
					element.opening_element.self_closing = false;
					element.closing_element = Some(ctx.alloc(JSXClosingElement {
						span: Span::default(),
						name,
					}));
				}
			}
			_ => {}
		}
	}

	/// Builds the closing tag name matching an opening tag `name`, with a
	/// reference of its own to whatever the opening tag resolves to.
	fn closing_name(
		&self,
		name: &JSXElementName<'a>,
		ctx: &mut TraverseCtx<'a>,
	) -> JSXElementName<'a> {
		let JSXElementName::IdentifierReference(ident) = name else {
			return name.clone_in(self.allocator);
		};

		let symbol_id = ident
			.reference_id
			.get()
			.and_then(|reference_id| ctx.scoping().get_reference(reference_id).symbol_id());
		let reference =
			ctx.create_ident_reference(Span::default(), ident.name, symbol_id, ReferenceFlags::Read);

		JSXElementName::IdentifierReference(ctx.alloc(reference))
	}

	/// Builds a `key="<key>"` attribute.
	fn key_attribute(&self, key: &str, ctx: &TraverseCtx<'a>) -> JSXAttributeItem<'a> {
		JSXAttributeItem::Attribute(ctx.alloc(JSXAttribute {
			span: Span::default(),
			name: JSXAttributeName::Identifier(ctx.alloc(JSXIdentifier {
				span: Span::default(),
				name: KEY,
			})),
			value: Some(JSXAttributeValue::StringLiteral(ctx.alloc(StringLiteral {
				lossy: false,
				raw: None,
				value: Atom::from_in(key, self.allocator),
				span: Span::default(),
			}))),
		}))
	}
}

/// Whether a tag is literally named `Fragment`.
///
/// This is a textual check; what the name resolves to is not consulted, so
/// an aliased import of the grouping element is not recognized and an
/// unrelated component named `Fragment` is.
fn is_fragment_tag(name: &JSXElementName<'_>) -> bool {
	match name {
		JSXElementName::Identifier(ident) => ident.name.as_str() == FRAGMENT_IDENT,
		JSXElementName::IdentifierReference(ident) => ident.name.as_str() == FRAGMENT_IDENT,
		JSXElementName::NamespacedName(_)
		| JSXElementName::MemberExpression(_)
		| JSXElementName::ThisExpression(_) => false,
	}
}

/// Whether an attribute list already carries a plain `key` attribute.
fn has_key(attributes: &[JSXAttributeItem<'_>]) -> bool {
	attributes.iter().any(|attr| match attr {
		JSXAttributeItem::Attribute(attr) => {
			matches!(&attr.name, JSXAttributeName::Identifier(ident) if ident.name.as_str() == KEY_ATTR)
		}
		JSXAttributeItem::SpreadAttribute(_) => false,
	})
}
