#![allow(
	missing_docs,
	clippy::missing_docs_in_private_items,
	clippy::similar_names
)]

use std::{collections::HashMap, io::Write, path::PathBuf};

use quote::quote;

#[derive(Debug, Default)]
struct TestSuite {
	jsx_file: Option<PathBuf>,
	keys_file: Option<PathBuf>,
}

fn main() {
	println!("cargo:rerun-if-changed=tests/");
	println!("cargo:rerun-if-changed=build.rs");

	let suites = discover_suites();
	let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap());
	let dest_path = out_dir.join("tests.rs");

	let mut file = std::fs::File::create(dest_path).unwrap();

	let mut names: Vec<&String> = suites.keys().collect();
	names.sort();

	for suite_name in names {
		let suite = &suites[suite_name];
		let jsx_file = suite.jsx_file.as_ref().unwrap();
		let keys_file = suite.keys_file.as_ref().unwrap();

		let jsx_src = std::fs::read_to_string(jsx_file).unwrap_or_else(|_| {
			panic!("Failed to read JSX fixture file: {}", jsx_file.display())
		});
		let keys_src = std::fs::read_to_string(keys_file).unwrap_or_else(|_| {
			panic!("Failed to read expected keys file: {}", keys_file.display())
		});

		let expected_keys: Vec<&str> = keys_src
			.lines()
			.map(str::trim)
			.filter(|line| !line.is_empty())
			.collect();

		let suite_path = jsx_file.to_string_lossy().to_string();
		let mod_name = syn::Ident::new(suite_name, cs());

		let ts = quote! {
			#[cfg(test)]
			mod #mod_name {
				const JSX_SRC: &str = #jsx_src;
				const EXPECTED_KEYS: &[&str] = &[#(#expected_keys),*];

				fn args() -> fragkey_cli::Args {
					fragkey_cli::Args {
						output: None,
						out_dir: None,
						filename: None,
						warnings_as_errors: true,
						minify: false,
						generate_sourcemaps: false,
						typescript: false,
						log_level: fragkey_cli::LogLevel::Warn,
						entry_points: vec![],
					}
				}

				fn compile(source: &str) -> fragkey_cli::Compilation {
					let mut registry = fragkey::FileStateRegistry::new();
					let output = fragkey_cli::run(source.to_string(), Some(#suite_path), &args(), &mut registry)
						.expect("Compilation failed");

					assert!(output.warnings.is_empty(), "fragkey emitted warnings when asked not to");

					if !output.errors.is_empty() {
						for error in &output.errors {
							eprintln!("{error}");
						}
						panic!("compilation failed");
					}

					assert!(registry.is_empty(), "file state outlived its pass");

					eprintln!("--------------- OUTPUT ---------------");
					eprintln!("{}", output.code);

					output
				}

				#[test]
				fn keys() {
					let output = compile(JSX_SRC);

					assert_eq!(output.keys, EXPECTED_KEYS);
					for key in EXPECTED_KEYS {
						assert!(output.code.contains(key), "key {key} missing from output");
					}
				}

				#[test]
				fn idempotent() {
					let first = compile(JSX_SRC);
					let second = compile(&first.code);

					assert!(second.keys.is_empty(), "second run added keys: {:?}", second.keys);
					assert_eq!(second.code, first.code);
				}
			}
		};

		let f = syn::parse2::<syn::File>(ts).unwrap();

		write!(file, "{}", prettyplease::unparse(&f)).unwrap();
	}
}

fn cs() -> proc_macro2::Span {
	proc_macro2::Span::call_site()
}

fn discover_suites() -> HashMap<String, TestSuite> {
	// 1. Crawl `CARGO_MANIFEST_DIR/tests` for `.jsx` and `.keys` files.
	// 2. Suites are `<suite>.jsx`; expectations are `<suite>.keys`.
	// 3. Panic on any folders.
	// 4. Panic on any suite missing either half.
	// 5. Panic on any filenames that do not match the above patterns.
	// 6. Suite names must be valid Rust identifiers. Panic if not.
	let mut suites: HashMap<String, TestSuite> = HashMap::new();
	let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap();
	let tests_dir = PathBuf::from(manifest_dir).join("tests");
	for entry in std::fs::read_dir(tests_dir).unwrap() {
		let entry = entry.unwrap();
		let path = entry.path();
		assert!(
			!path.is_dir(),
			"Directories are not allowed in the tests/ folder: {}",
			path.display()
		);
		let filename = path.file_name().unwrap().to_string_lossy().to_string();
		if let Some(suite_name) = filename.strip_suffix(".jsx") {
			assert!(
				is_valid_rust_identifier(suite_name),
				"Suite name is not a valid Rust identifier: {suite_name}"
			);
			suites.entry(suite_name.to_string()).or_default().jsx_file = Some(path);
		} else if let Some(suite_name) = filename.strip_suffix(".keys") {
			assert!(
				is_valid_rust_identifier(suite_name),
				"Suite name is not a valid Rust identifier: {suite_name}"
			);
			suites.entry(suite_name.to_string()).or_default().keys_file = Some(path);
		} else {
			panic!("Invalid file in tests/ folder: {filename}");
		}
	}
	for (suite_name, suite) in &suites {
		assert!(
			suite.jsx_file.is_some(),
			"Suite '{suite_name}' has expected keys but no .jsx source"
		);
		assert!(
			suite.keys_file.is_some(),
			"Suite '{suite_name}' has no .keys file"
		);
	}
	suites
}

fn is_valid_rust_identifier(name: &str) -> bool {
	let mut chars = name.chars();
	match chars.next() {
		Some(c) if c.is_ascii_alphabetic() || c == '_' => (),
		_ => return false,
	}
	for c in chars {
		if !(c.is_ascii_alphanumeric() || c == '_') {
			return false;
		}
	}
	true
}
