//! Input discovery and per-file formatting

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use tmplfmt_config::TmplfmtConfig;
use tmplfmt_core::template::ast::Node;
use tmplfmt_core::template::testing::{read, ReadError};
use tmplfmt_core::{FormatError, Formatter};

/// Extension of serialized trees.
pub const TREE_EXTENSION: &str = "json";

/// Expand `paths` into the files to format.
///
/// Files named explicitly are always taken. Directories are walked honoring
/// `.gitignore` and hidden-file rules, keeping files whose extension is listed.
/// Fails on the first input path that does not exist.
pub fn discover(paths: &[PathBuf], extensions: &[String]) -> Result<Vec<PathBuf>, FileError> {
    if let Some(missing) = paths.iter().find(|path| !path.exists()) {
        return Err(FileError::Missing(missing.clone()));
    }
    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            files.push(path.clone());
            continue;
        }
        let mut found = Vec::new();
        for entry in WalkBuilder::new(path).require_git(false).build() {
            match entry {
                Ok(entry) => {
                    let candidate = entry.path();
                    if candidate.is_file() && has_extension(candidate, extensions) {
                        found.push(candidate.to_path_buf());
                    }
                }
                Err(err) => log::warn!("skipping entry: {}", err),
            }
        }
        found.sort();
        log::debug!("{}: {} files", path.display(), found.len());
        files.extend(found);
    }
    Ok(files)
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|wanted| wanted == ext))
}

pub fn is_tree(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some(TREE_EXTENSION)
}

/// Everything that can go wrong with one input
#[derive(Debug)]
pub enum FileError {
    Missing(PathBuf),
    Io(io::Error),
    Read(ReadError),
    Tree(serde_json::Error),
    Format(FormatError),
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileError::Missing(path) => {
                write!(f, "{}: no such file or directory", path.display())
            }
            FileError::Io(err) => write!(f, "{}", err),
            FileError::Read(err) => write!(f, "could not read template: {}", err),
            FileError::Tree(err) => write!(f, "invalid tree: {}", err),
            FileError::Format(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for FileError {}

impl From<io::Error> for FileError {
    fn from(err: io::Error) -> Self {
        FileError::Io(err)
    }
}

impl From<ReadError> for FileError {
    fn from(err: ReadError) -> Self {
        FileError::Read(err)
    }
}

impl From<serde_json::Error> for FileError {
    fn from(err: serde_json::Error) -> Self {
        FileError::Tree(err)
    }
}

impl From<FormatError> for FileError {
    fn from(err: FormatError) -> Self {
        FileError::Format(err)
    }
}

/// Format template source.
pub fn format_template(source: &str, config: &TmplfmtConfig) -> Result<String, FileError> {
    let nodes = read(source)?;
    let options = config.format.options(source.ends_with('\n'));
    Ok(Formatter::new(options).format(nodes)?)
}

/// Format a serialized tree.
pub fn format_tree(json: &str, config: &TmplfmtConfig) -> Result<String, FileError> {
    let nodes: Vec<Node> = serde_json::from_str(json)?;
    let options = config.format.options(true);
    Ok(Formatter::new(options).format(nodes)?)
}

pub fn read_file(path: &Path) -> Result<String, FileError> {
    Ok(fs::read_to_string(path)?)
}
