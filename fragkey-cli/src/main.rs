//! CLI for the fragment key pass.
use std::{
	io::{self, Read, Write},
	path::Path,
	process::ExitCode,
};

use clap::Parser;
use fragkey::FileStateRegistry;
use fragkey_cli::{Args, LogLevel, RunError};

fn main() -> ExitCode {
	let args = Args::parse();
	init_tracing(args.log_level);

	match execute(&args) {
		Ok(0) => ExitCode::SUCCESS,
		Ok(errors) => {
			eprintln!("\nexiting due to {errors} errors");
			ExitCode::FAILURE
		}
		Err(error) => {
			eprintln!("error: {error}");
			ExitCode::FAILURE
		}
	}
}

/// Initialize tracing subscriber.
fn init_tracing(level: LogLevel) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_target(false)
		.with_writer(io::stderr)
		.init();
}

/// Transforms every requested source, returning the number of errors
/// reported.
fn execute(args: &Args) -> Result<usize, RunError> {
	let mut registry = FileStateRegistry::new();

	match args.entry_points.as_slice() {
		[] => {
			let mut source = String::with_capacity(4096);
			io::stdin()
				.read_to_string(&mut source)
				.map_err(|source| RunError::Read {
					path: "<stdin>".into(),
					source,
				})?;
			transform_one(
				source,
				args.filename.as_deref(),
				args.output.as_deref().map(Path::new),
				args,
				&mut registry,
			)
		}
		[entry] if args.out_dir.is_none() => {
			let source = read_source(entry)?;
			transform_one(
				source,
				Some(entry.as_str()),
				args.output.as_deref().map(Path::new),
				args,
				&mut registry,
			)
		}
		entries => {
			let out_dir = args.out_dir.as_deref().ok_or(RunError::MissingOutDir)?;
			let outputs = fragkey_cli::output_paths(entries, Path::new(out_dir))?;
			let mut errors = 0;

			for (entry, output) in entries.iter().zip(&outputs) {
				let source = read_source(entry)?;
				errors += transform_one(
					source,
					Some(entry.as_str()),
					Some(output.as_path()),
					args,
					&mut registry,
				)?;
			}

			Ok(errors)
		}
	}
}

/// Reads a source file from disk.
fn read_source(path: &str) -> Result<String, RunError> {
	std::fs::read_to_string(path).map_err(|source| RunError::Read {
		path: path.into(),
		source,
	})
}

/// Transforms one source and writes it to `output` (or stdout), printing
/// its diagnostics to stderr. Returns the number of errors reported.
fn transform_one(
	source: String,
	source_name: Option<&str>,
	output: Option<&Path>,
	args: &Args,
	registry: &mut FileStateRegistry,
) -> Result<usize, RunError> {
	let compilation = fragkey_cli::run(source, source_name, args, registry)?;

	for warning in &compilation.warnings {
		eprintln!("{warning}");
	}
	for error in &compilation.errors {
		eprintln!("{error}");
	}

	if !compilation.errors.is_empty() {
		return Ok(compilation.errors.len());
	}

	if let Some(output) = output {
		std::fs::write(output, compilation.code.as_bytes()).map_err(|source| RunError::Write {
			path: output.display().to_string(),
			source,
		})?;
	} else {
		io::stdout()
			.write_all(compilation.code.as_bytes())
			.map_err(|source| RunError::Write {
				path: "<stdout>".into(),
				source,
			})?;
	}

	Ok(0)
}
