//! Holds constant string values used throughout the fragment key pass.
#![allow(clippy::missing_docs_in_private_items)]
use oxc::span::Atom;

pub const PASS_NAME: &str = "add-fragment-key";

pub const FRAGMENT_IDENT: &str = "Fragment";
pub const FRAGMENT_SOURCE: &str = "preact/jsx-runtime";

pub const KEY_ATTR: &str = "key";
pub const KEY_INFIX: &str = "_frag_";

pub const UNKNOWN_FILE: &str = "unknown_file";

pub const ANONYMOUS_FUNCTION_DECLARATION: &str = "AnonymousFunctionDeclaration";
pub const ANONYMOUS_FUNCTION_EXPRESSION: &str = "AnonymousFunctionExpression";
pub const ANONYMOUS_ARROW_FUNCTION: &str = "AnonymousArrowFunction";

pub const FRAGMENT: Atom<'static> = Atom::new_const(FRAGMENT_IDENT);
pub const KEY: Atom<'static> = Atom::new_const(KEY_ATTR);
