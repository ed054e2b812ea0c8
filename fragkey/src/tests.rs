use oxc::{
	allocator::Allocator, codegen::Codegen, parser::Parser, semantic::SemanticBuilder,
	span::SourceType,
};

use crate::{FileStateRegistry, SourceFile, transform};

/// The printed program and the keys generated for it.
struct Output {
	code: String,
	keys: Vec<String>,
}

fn transform_in(
	registry: &mut FileStateRegistry,
	file: &SourceFile,
	source_type: SourceType,
	source: &str,
) -> Output {
	let allocator = Allocator::default();
	let parsed = Parser::new(&allocator, source, source_type).parse();
	assert!(parsed.errors.is_empty(), "fixture failed to parse: {source}");
	let mut program = parsed.program;

	let semantic = SemanticBuilder::new().build(&program);
	assert!(semantic.errors.is_empty(), "fixture has semantic errors");
	let scoping = semantic.semantic.into_scoping();

	let result = transform(&allocator, &mut program, scoping, registry, file);

	Output {
		code: Codegen::new().build(&program).code,
		keys: result.keys,
	}
}

fn transform_source(source: &str) -> Output {
	let mut registry = FileStateRegistry::new();
	let file = SourceFile::new(Some("component.jsx"));
	transform_in(&mut registry, &file, SourceType::jsx(), source)
}

/// Prints `source` without running the pass.
fn print(source: &str) -> String {
	let allocator = Allocator::default();
	let parsed = Parser::new(&allocator, source, SourceType::jsx()).parse();
	assert!(parsed.errors.is_empty(), "fixture failed to parse: {source}");
	Codegen::new().build(&parsed.program).code
}

#[test]
fn shorthand_fragment_becomes_keyed_element() {
	let out = transform_source("function Foo() { return <>{a}{b}</>; }");

	assert_eq!(out.keys, ["Foo_frag_0"]);
	assert!(out.code.contains("Fragment as _Fragment"), "{}", out.code);
	assert!(out.code.contains("preact/jsx-runtime"), "{}", out.code);
	assert!(
		out.code.contains(r#"<_Fragment key="Foo_frag_0">{a}{b}</_Fragment>"#),
		"{}",
		out.code
	);
	assert!(!out.code.contains("<>"), "{}", out.code);
}

#[test]
fn explicit_fragment_gains_key_in_place() {
	let out = transform_source("const Bar = () => <Fragment>{x}</Fragment>;");

	assert_eq!(out.keys, ["Bar_frag_0"]);
	assert!(
		out.code.contains(r#"<Fragment key="Bar_frag_0">{x}</Fragment>"#),
		"{}",
		out.code
	);
	assert!(!out.code.contains("import"), "{}", out.code);
}

#[test]
fn keyed_fragment_is_untouched() {
	let source = r#"const Baz = () => <Fragment key="already">{x}</Fragment>;"#;
	let out = transform_source(source);

	assert!(out.keys.is_empty());
	assert_eq!(out.code, print(source));
}

#[test]
fn counter_is_shared_by_the_whole_file() {
	let out = transform_source(
		"function Foo() { return <>{a}</>; }
		function Bar() { return <>{b}</>; }",
	);

	assert_eq!(out.keys, ["Foo_frag_0", "Bar_frag_1"]);
	assert_eq!(out.code.matches("preact/jsx-runtime").count(), 1, "{}", out.code);
}

#[test]
fn nested_helper_is_not_keyed_by_the_outer_scan() {
	let out = transform_source(
		"function Qux() { function helper() { return <>{z}</>; } return <div/>; }",
	);

	assert_eq!(out.keys, ["helper_frag_0"]);
	assert!(!out.code.contains("Qux_frag"), "{}", out.code);
}

#[test]
fn nested_component_is_keyed_under_its_own_name() {
	let out = transform_source(
		"function Outer() {
			const Inner = () => <>{i}</>;
			items.map(function () { return <div/>; });
			return <>{o}</>;
		}",
	);

	assert_eq!(out.keys, ["Outer_frag_0", "Inner_frag_1"]);
}

#[test]
fn keys_follow_traversal_order() {
	let out = transform_source(
		"function A() { if (x) { return <>{a}</>; } return <Fragment>{b}</Fragment>; }
		const B = function () { return (<>{c}</>); };
		export default () => <>{d}</>;",
	);

	assert_eq!(
		out.keys,
		[
			"A_frag_0",
			"A_frag_1",
			"B_frag_2",
			"AnonymousArrowFunction_frag_3"
		]
	);
}

#[test]
fn names_fall_back_by_function_form() {
	let out = transform_source(
		"export default function () { return <>{a}</>; }
		const named = function inner() { return <>{b}</>; };
		call(function () { return <>{c}</>; });
		call(() => <>{d}</>);
		const wrapped = (() => <>{e}</>);
		let assigned;
		assigned = () => <>{f}</>;",
	);

	assert_eq!(
		out.keys,
		[
			"AnonymousFunctionDeclaration_frag_0",
			"named_frag_1",
			"AnonymousFunctionExpression_frag_2",
			"AnonymousArrowFunction_frag_3",
			"wrapped_frag_4",
			"AnonymousArrowFunction_frag_5",
		]
	);
}

#[test]
fn methods_are_not_components() {
	let out = transform_source(
		"class A { render() { return <>{a}</>; } }
		const o = {
			render() { return <>{b}</>; },
			get g() { return <>{c}</>; },
			prop: function () { return <>{d}</>; },
		};",
	);

	assert_eq!(out.keys, ["AnonymousFunctionExpression_frag_0"]);
}

#[test]
fn self_closing_fragment_gets_closing_tag() {
	let out = transform_source("const E = () => <Fragment />;");

	assert_eq!(out.keys, ["E_frag_0"]);
	assert!(
		out.code.contains(r#"<Fragment key="E_frag_0"></Fragment>"#),
		"{}",
		out.code
	);
}

#[test]
fn closing_tag_of_self_closing_fragment_is_a_tracked_reference() {
	let allocator = Allocator::default();
	let source = r#"import { Fragment } from "preact"; const E = () => <Fragment />;"#;
	let mut program = Parser::new(&allocator, source, SourceType::jsx()).parse().program;
	let scoping = SemanticBuilder::new().build(&program).semantic.into_scoping();

	let mut registry = FileStateRegistry::new();
	let file = SourceFile::new(Some("component.jsx"));
	let result = transform(&allocator, &mut program, scoping, &mut registry, &file);
	assert_eq!(result.keys, ["E_frag_0"]);

	let fragment = result
		.scoping
		.get_root_binding("Fragment")
		.expect("Fragment is imported");
	assert_eq!(result.scoping.get_resolved_reference_ids(fragment).len(), 2);
}

#[test]
fn only_the_outermost_fragment_is_keyed() {
	let out = transform_source(
		"function F() { return <>{cond ? <>{x}</> : null}<div><>{y}</></div></>; }
		function G() { return cond ? <>{x}</> : null; }
		function H() { return [<>{x}</>]; }",
	);

	assert_eq!(out.keys, ["F_frag_0"]);
	assert_eq!(out.code.matches("key=").count(), 1, "{}", out.code);
}

#[test]
fn plain_elements_and_values_pass_through() {
	let source = "function Plain() { return <div>{a}</div>; }
		const Nothing = () => null;
		const Text = () => { return 'text'; };
		function Early() { if (x) return; return <span/>; }";
	let out = transform_source(source);

	assert!(out.keys.is_empty());
	assert_eq!(out.code, print(source));
}

#[test]
fn existing_runtime_import_is_reused() {
	let out = transform_source(
		r#"import { Fragment as F } from "preact/jsx-runtime";
		function Foo() { return <>{a}</>; }"#,
	);

	assert_eq!(out.keys, ["Foo_frag_0"]);
	assert!(out.code.contains(r#"<F key="Foo_frag_0">{a}</F>"#), "{}", out.code);
	assert_eq!(out.code.matches("preact/jsx-runtime").count(), 1, "{}", out.code);
	assert!(!out.code.contains("_Fragment"), "{}", out.code);
}

#[test]
fn generated_binding_avoids_existing_names() {
	let out = transform_source(
		"const _Fragment = 1;
		function Foo() { return <>{a}</>; }",
	);

	assert_eq!(out.keys, ["Foo_frag_0"]);
	assert!(out.code.contains(r#"key="Foo_frag_0""#), "{}", out.code);
	assert!(!out.code.contains("<_Fragment key="), "{}", out.code);
}

#[test]
fn no_import_without_shorthand_fragments() {
	let out = transform_source("function Foo() { return <Fragment>{a}</Fragment>; }");

	assert_eq!(out.keys, ["Foo_frag_0"]);
	assert!(!out.code.contains("preact/jsx-runtime"), "{}", out.code);
}

#[test]
fn second_run_changes_nothing() {
	let first = transform_source(
		"function Foo() { return <>{a}{b}</>; }
		const Bar = () => <Fragment>{x}</Fragment>;
		const Baz = () => <Fragment />;",
	);
	assert_eq!(first.keys, ["Foo_frag_0", "Bar_frag_1", "Baz_frag_2"]);

	let second = transform_source(&first.code);
	assert!(second.keys.is_empty(), "{:?}", second.keys);
	assert_eq!(second.code, first.code);
}

#[test]
fn registry_counter_spans_passes_until_released() {
	let mut registry = FileStateRegistry::new();
	let file = SourceFile::new(Some("a.jsx"));
	let source = "const A = () => <>{a}</>;";

	let first = transform_in(&mut registry, &file, SourceType::jsx(), source);
	let second = transform_in(&mut registry, &file, SourceType::jsx(), source);
	assert_eq!(first.keys, ["A_frag_0"]);
	assert_eq!(second.keys, ["A_frag_1"]);

	registry.release(&file);
	let third = transform_in(&mut registry, &file, SourceType::jsx(), source);
	assert_eq!(third.keys, ["A_frag_0"]);
}

#[test]
fn typescript_declarations_are_skipped() {
	let mut registry = FileStateRegistry::new();
	let file = SourceFile::new(Some("component.tsx"));
	let out = transform_in(
		&mut registry,
		&file,
		SourceType::tsx(),
		"declare function Ambient(): any;
		function Foo(props: { a: string }): any { return <>{props.a}</>; }
		const Bar = (): any => (<Fragment>{1}</Fragment>);",
	);

	assert_eq!(out.keys, ["Foo_frag_0", "Bar_frag_1"]);
}
