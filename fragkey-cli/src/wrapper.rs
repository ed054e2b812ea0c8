//! High level CLI-as-a-library for the fragment key pass.
//!
//! This is directly called to by the `fragkey` CLI binary and by the
//! fixture tests. It is the host side of the pass: it parses the source,
//! builds the semantic model, runs [`fragkey::transform()`] and prints the
//! result back out.
use std::{
	collections::HashMap,
	path::{Path, PathBuf},
	sync::Arc,
};

use clap::{Parser, ValueEnum};
use fragkey::{FileStateRegistry, SourceFile};
use oxc::{
	allocator::Allocator,
	codegen::{Codegen, CodegenOptions},
	diagnostics::{OxcDiagnostic, Severity},
	semantic::SemanticBuilder,
	span::SourceType,
};
use thiserror::Error;

/// Keys the top-level fragments returned by function components.
#[derive(Debug, Parser)]
pub struct Args {
	/// Where to write the output when a single source is given.
	/// Defaults to stdout; intermediate folders must exist
	#[arg(short = 'o', long = "output")]
	pub output: Option<String>,
	/// Directory to write each output to when several sources are given
	#[arg(short = 'd', long = "out-dir")]
	pub out_dir: Option<String>,
	/// The filename to key stdin input under
	#[arg(long = "filename")]
	pub filename: Option<String>,
	/// Treat warnings as errors
	#[arg(short = 'W')]
	pub warnings_as_errors: bool,
	/// Minify the output. Bindings keep their names, since JSX tags are
	/// resolved by name
	#[arg(long = "minify")]
	pub minify: bool,
	/// When set, enables sourcemaps (embedded in the output).
	#[arg(short = 'm', long = "map")]
	pub generate_sourcemaps: bool,
	/// Allow typescript syntax in the input
	#[arg(short = 'T', long = "typescript")]
	pub typescript: bool,
	/// Log verbosity (`RUST_LOG` takes precedence)
	#[arg(long = "log-level", value_enum, default_value_t = LogLevel::Warn)]
	pub log_level: LogLevel,
	/// The source files to transform (defaults to stdin)
	pub entry_points: Vec<String>,
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogLevel {
	/// Everything, including every component visited.
	Trace,
	/// Every key and import generated.
	Debug,
	/// Informational messages.
	Info,
	/// Warnings only.
	Warn,
	/// Errors only.
	Error,
}

impl LogLevel {
	/// Converts to the equivalent [`tracing::Level`].
	pub fn to_tracing_level(self) -> tracing::Level {
		match self {
			LogLevel::Trace => tracing::Level::TRACE,
			LogLevel::Debug => tracing::Level::DEBUG,
			LogLevel::Info => tracing::Level::INFO,
			LogLevel::Warn => tracing::Level::WARN,
			LogLevel::Error => tracing::Level::ERROR,
		}
	}
}

/// Fatal errors that prevent a run from completing.
///
/// Syntax errors are not fatal; they are reported through
/// [`Compilation::errors`].
#[derive(Debug, Error)]
pub enum RunError {
	/// The parser gave up without saying why.
	#[error("parser panicked, but no errors were reported")]
	ParserPanicked,
	/// A source could not be read.
	#[error("failed to read {path}: {source}")]
	Read {
		/// The path that was being read.
		path: String,
		/// The underlying I/O error.
		source: std::io::Error,
	},
	/// An output could not be written.
	#[error("failed to write {path}: {source}")]
	Write {
		/// The path that was being written.
		path: String,
		/// The underlying I/O error.
		source: std::io::Error,
	},
	/// Several sources were given without somewhere to put them.
	#[error("--out-dir is required when transforming more than one file")]
	MissingOutDir,
	/// Two sources would be written to the same output file.
	#[error("{first} and {second} would both be written to {output}")]
	OutputCollision {
		/// The source that claimed the output first.
		first: String,
		/// The source that collided with it.
		second: String,
		/// The contested output path.
		output: String,
	},
}

/// Maps every entry point to its output file under `out_dir`.
///
/// Outputs are named after each entry's file name, so two entries sharing a
/// file name are rejected before anything is written.
pub fn output_paths(entries: &[String], out_dir: &Path) -> Result<Vec<PathBuf>, RunError> {
	let mut claimed: HashMap<PathBuf, &str> = HashMap::with_capacity(entries.len());
	let mut outputs = Vec::with_capacity(entries.len());

	for entry in entries {
		let file_name = Path::new(entry)
			.file_name()
			.map_or_else(|| PathBuf::from(entry), PathBuf::from);
		let output = out_dir.join(file_name);

		if let Some(first) = claimed.insert(output.clone(), entry) {
			return Err(RunError::OutputCollision {
				first: first.into(),
				second: entry.clone(),
				output: output.display().to_string(),
			});
		}

		outputs.push(output);
	}

	Ok(outputs)
}

/// The `Ok` result type for the [`run`] function.
pub struct Compilation {
	/// The generated code.
	pub code: String,
	/// The keys attached during the pass, in order.
	pub keys: Vec<String>,
	/// Any warnings
	pub warnings: Vec<String>,
	/// Any errors; if non-empty, `code` will be empty.
	pub errors: Vec<String>,
}

impl Compilation {
	/// Renders `diagnostics` into this compilation, returning how many of
	/// them were errors.
	fn record(
		&mut self,
		diagnostics: Vec<OxcDiagnostic>,
		source: &Arc<String>,
		args: &Args,
	) -> usize {
		let mut errors = 0;

		for mut diagnostic in diagnostics {
			if args.warnings_as_errors {
				diagnostic = diagnostic.with_severity(Severity::Error);
			}

			let is_error = diagnostic.severity == Severity::Error;
			let rendered = format!("{:?}", diagnostic.with_source_code(Arc::clone(source)));
			if is_error {
				errors += 1;
				self.errors.push(rendered);
			} else {
				self.warnings.push(rendered);
			}
		}

		errors
	}
}

/// Runs the fragment key pass over `source`.
///
/// `source_name` identifies the unit; its counter is taken from `registry`
/// and released again once the output has been generated.
///
/// `Err` results indicate fatal errors that prevent compilation from completing.
/// This does **not** include warnings or syntax errors, which are included in the [`Compilation`]
/// result.
pub fn run(
	source: String,
	source_name: Option<&str>,
	args: &Args,
	registry: &mut FileStateRegistry,
) -> Result<Compilation, RunError> {
	let mut result = Compilation {
		code: String::new(),
		keys: Vec::new(),
		warnings: Vec::new(),
		errors: Vec::new(),
	};

	let source = Arc::new(source);

	let source_type = if args.typescript {
		SourceType::tsx()
	} else {
		SourceType::jsx()
	};

	let allocator = Allocator::default();
	let parse_result = oxc::parser::Parser::new(&allocator, &source, source_type).parse();

	if parse_result.panicked || !parse_result.errors.is_empty() {
		if parse_result.errors.is_empty() {
			return Err(RunError::ParserPanicked);
		}

		if result.record(parse_result.errors, &source, args) > 0 {
			return Ok(result);
		}
	}

	let mut program = parse_result.program;

	let semantic = SemanticBuilder::new()
		.with_check_syntax_error(true)
		.build(&program);

	if !semantic.errors.is_empty() && result.record(semantic.errors, &source, args) > 0 {
		return Ok(result);
	}

	let file = SourceFile::new(source_name);
	let scoping = semantic.semantic.into_scoping();
	let pass_result = fragkey::transform(&allocator, &mut program, scoping, registry, &file);
	registry.release(&file);

	tracing::info!(file = file.name(), keyed = pass_result.keys.len(), "transformed");

	let codegen_options = CodegenOptions {
		minify: args.minify,
		comments: !args.minify,
		source_map_path: if args.generate_sourcemaps {
			Some(source_name.map_or_else(|| PathBuf::from("fragkey.js.map"), PathBuf::from))
		} else {
			None
		},
		..CodegenOptions::default()
	};

	let generated = Codegen::new()
		.with_options(codegen_options)
		.with_scoping(Some(pass_result.scoping))
		.build(&program);

	let sourcemap_string = if args.generate_sourcemaps {
		if let Some(ref sourcemap) = generated.map {
			Some(sourcemap.to_data_url())
		} else {
			tracing::warn!("sourcemap generation requested, but no sourcemap was generated");
			result
				.warnings
				.push("sourcemap generation requested, but no sourcemap was generated".into());
			None
		}
	} else {
		None
	};

	result.code = generated.code;
	result.keys = pass_result.keys;
	if let Some(ref sm) = sourcemap_string {
		result.code.push_str("\n//# sourceMappingURL=");
		result.code.push_str(sm);
	}

	Ok(result)
}
