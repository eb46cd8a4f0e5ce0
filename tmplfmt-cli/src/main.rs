//! Command-line interface for tmplfmt
//! Formats component templates in place, or reports the files that would change.
//!
//! Usage:
//!   tmplfmt `<paths>...`                  - Rewrite files whose formatting changed
//!   tmplfmt --check `<paths>...`          - Print a diff per unformatted file, exit 1 if any
//!   tmplfmt < input                      - Format standard input to standard output
//!
//! Exit codes: 0 success, 1 check found unformatted files, 2 a file failed to format.

mod files;

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use similar::TextDiff;
use tmplfmt_config::{Loader, TmplfmtConfig, PROJECT_FILE};

use files::{discover, format_template, format_tree, is_tree, read_file, FileError};

const EXIT_UNFORMATTED: i32 = 1;
const EXIT_ERROR: i32 = 2;

fn main() {
    env_logger::init();

    let matches = Command::new("tmplfmt")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A formatter for component templates")
        .arg(
            Arg::new("paths")
                .help("Files or directories to format (standard input when omitted)")
                .value_parser(value_parser!(PathBuf))
                .num_args(0..)
                .index(1),
        )
        .arg(
            Arg::new("check")
                .long("check")
                .help("Do not write files; print a diff and exit 1 when formatting would change them")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Configuration file layered over the defaults and ./tmplfmt.toml")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("line-length")
                .long("line-length")
                .help("Line length budget for opening tags and expressions")
                .value_parser(value_parser!(u32)),
        )
        .arg(
            Arg::new("extension")
                .long("extension")
                .short('e')
                .help("File extension to pick up when walking directories (repeatable)")
                .action(ArgAction::Append),
        )
        .get_matches();

    let config = match load_config(&matches) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Configuration error: {}", err);
            std::process::exit(EXIT_ERROR);
        }
    };

    let paths: Vec<PathBuf> = matches
        .get_many::<PathBuf>("paths")
        .map(|paths| paths.cloned().collect())
        .unwrap_or_default();
    let check = matches.get_flag("check");

    let code = if paths.is_empty() {
        handle_stdin(&config)
    } else {
        handle_paths(&paths, &config, check)
    };
    std::process::exit(code);
}

fn load_config(matches: &ArgMatches) -> Result<TmplfmtConfig, tmplfmt_config::ConfigError> {
    let mut loader = Loader::new().with_optional_file(PROJECT_FILE);
    if let Some(path) = matches.get_one::<PathBuf>("config") {
        loader = loader.with_file(path);
    }
    if let Some(line_length) = matches.get_one::<u32>("line-length") {
        loader = loader.set_override("format.line_length", i64::from(*line_length))?;
    }
    if let Some(extensions) = matches.get_many::<String>("extension") {
        let extensions: Vec<String> = extensions
            .map(|ext| ext.trim_start_matches('.').to_string())
            .collect();
        loader = loader.set_override("files.extensions", extensions)?;
    }
    loader.build()
}

/// Format standard input to standard output
fn handle_stdin(config: &TmplfmtConfig) -> i32 {
    let mut source = String::new();
    if let Err(err) = io::stdin().read_to_string(&mut source) {
        eprintln!("Error reading standard input: {}", err);
        return EXIT_ERROR;
    }
    match format_template(&source, config) {
        Ok(formatted) => {
            print!("{}", formatted);
            0
        }
        Err(err) => {
            eprintln!("<stdin>: {}", err);
            EXIT_ERROR
        }
    }
}

/// Format every discovered file, in place or in check mode
fn handle_paths(paths: &[PathBuf], config: &TmplfmtConfig, check: bool) -> i32 {
    let files = match discover(paths, &config.files.extensions) {
        Ok(files) => files,
        Err(err) => {
            eprintln!("{}", err);
            return EXIT_ERROR;
        }
    };
    log::info!("formatting {} files", files.len());

    let mut failed = false;
    let mut unformatted = false;
    for path in &files {
        match handle_file(path, config, check) {
            Ok(changed) => unformatted |= changed,
            Err(err) => {
                eprintln!("{}: {}", path.display(), err);
                failed = true;
            }
        }
    }

    if failed {
        EXIT_ERROR
    } else if unformatted {
        EXIT_UNFORMATTED
    } else {
        0
    }
}

/// Returns whether the file needed formatting (only reported in check mode).
fn handle_file(path: &Path, config: &TmplfmtConfig, check: bool) -> Result<bool, FileError> {
    let source = read_file(path)?;

    if is_tree(path) {
        // Trees are an input format only; their rendering goes to stdout.
        let formatted = format_tree(&source, config)?;
        print!("{}", formatted);
        return Ok(false);
    }

    let formatted = format_template(&source, config)?;
    if formatted == source {
        log::debug!("{}: unchanged", path.display());
        return Ok(false);
    }

    if check {
        print_diff(path, &source, &formatted)?;
        return Ok(true);
    }
    std::fs::write(path, &formatted)?;
    log::info!("{}: formatted", path.display());
    Ok(false)
}

fn print_diff(path: &Path, original: &str, formatted: &str) -> io::Result<()> {
    let name = path.display().to_string();
    let diff = TextDiff::from_lines(original, formatted);
    let mut stdout = io::stdout().lock();
    write!(
        stdout,
        "{}",
        diff.unified_diff()
            .context_radius(3)
            .header(&name, &format!("{} (formatted)", name))
    )
}
