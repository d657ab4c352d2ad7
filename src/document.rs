//! The persisted form of a flattened AST and the entry points producing it.
//!
//! A document looks like
//! ```text
//! {"version": 1, "file": "src/test.py", "AST": [{"type": "node", ...}, ...]}
//! {"version": 1, "code": "def func(a, b): pass", "AST": [...]}
//! ```
//! Exactly one of `file` and `code` is present. Documents without `version` are read as
//! version 1. When saving in append mode several documents end up in one file, one after
//! another; `load_documents` returns all of them.

use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DocumentError, Result};
use crate::frontend::{self, flatten::FlattenOptions};
use crate::json_format::{write_styled, Separators};
use crate::record::FlatRecord;

pub const FORMAT_VERSION: u32 = 1;

fn legacy_version() -> u32 {
    1
}

/// Where the flattened source came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin<'a> {
    File(&'a str),
    Code(&'a str),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AstDocument {
    #[serde(default = "legacy_version")]
    version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    code: Option<String>,
    #[serde(rename = "AST")]
    ast: Vec<FlatRecord>,
}

impl AstDocument {
    pub fn from_file(path: &str, ast: Vec<FlatRecord>) -> Self {
        Self {
            version: FORMAT_VERSION,
            file: Some(path.to_string()),
            code: None,
            ast,
        }
    }

    pub fn from_code(code: &str, ast: Vec<FlatRecord>) -> Self {
        Self {
            version: FORMAT_VERSION,
            file: None,
            code: Some(code.to_string()),
            ast,
        }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// The source of the document. Fails unless exactly one of `file` and `code` is set,
    /// which the constructors guarantee and `load_documents` checks for read documents.
    pub fn origin(&self) -> std::result::Result<Origin<'_>, DocumentError> {
        match (&self.file, &self.code) {
            (Some(file), None) => Ok(Origin::File(file)),
            (None, Some(code)) => Ok(Origin::Code(code)),
            _ => Err(DocumentError::Origin),
        }
    }

    pub fn ast(&self) -> &[FlatRecord] {
        &self.ast
    }

    pub fn into_ast(self) -> Vec<FlatRecord> {
        self.ast
    }

    /// Check the parts of a loaded document serde cannot check on its own.
    pub fn validate(&self) -> std::result::Result<(), DocumentError> {
        if self.version != FORMAT_VERSION {
            return Err(DocumentError::UnsupportedVersion {
                found: self.version,
            });
        }
        self.origin().map(|_| ())
    }

    /// Write the document to `path`, appending to or replacing the file.
    pub fn save(&self, path: &Path, options: &SaveOptions) -> Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(options.append)
            .truncate(!options.append)
            .open(path)?;
        let mut writer = BufWriter::new(file);
        write_styled(&mut writer, self, options.indent, &options.separators())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        log::info!(
            "{} AST document with {} records to {}",
            if options.append { "appended" } else { "wrote" },
            self.ast.len(),
            path.display()
        );
        Ok(())
    }

    /// Print the document in a human readable form: a header line naming the source, then
    /// one line per record prefixed with its index.
    pub fn write_listing<W: Write>(&self, out: &mut W) -> Result<()> {
        match self.origin()? {
            Origin::File(file) => writeln!(out, "file: {}", file)?,
            Origin::Code(code) => writeln!(out, "code: \"{}\"", code)?,
        }
        writeln!(out, "AST: [")?;
        for (i, record) in self.ast.iter().enumerate() {
            writeln!(out, "{}:\t{}", i, record)?;
        }
        writeln!(out, "]")?;
        Ok(())
    }
}

/// How a document is written to disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveOptions {
    /// Append to an existing file instead of replacing it.
    pub append: bool,
    /// Indent nested values by this many spaces and put every item on its own line.
    pub indent: Option<usize>,
    /// Item and key separators. Defaults depend on `indent`, see `Separators::default_for`.
    pub separators: Option<Separators>,
}

impl SaveOptions {
    pub fn separators(&self) -> Separators {
        self.separators
            .clone()
            .unwrap_or_else(|| Separators::default_for(self.indent))
    }
}

/// Load every document stored in `path`.
pub fn load_documents(path: &Path) -> Result<Vec<AstDocument>> {
    let text = fs::read_to_string(path)?;
    let mut documents = Vec::new();
    for document in serde_json::Deserializer::from_str(&text).into_iter::<AstDocument>() {
        let document = document?;
        document.validate()?;
        documents.push(document);
    }
    if documents.is_empty() {
        return Err(DocumentError::NoDocument {
            path: PathBuf::from(path),
        }
        .into());
    }
    log::debug!("loaded {} documents from {}", documents.len(), path.display());
    Ok(documents)
}

/// Read the record list of one document in `path`, the last one unless `entry` is given.
pub fn read_ast(path: &Path, entry: Option<usize>) -> Result<Vec<FlatRecord>> {
    let mut documents = load_documents(path)?;
    let count = documents.len();
    let index = entry.unwrap_or(count - 1);
    if index >= count {
        return Err(DocumentError::EntryOutOfRange {
            entry: index,
            count,
        }
        .into());
    }
    Ok(documents.swap_remove(index).into_ast())
}

/// Parse the Python file at `path`.
pub fn parse_file(path: &Path, options: &FlattenOptions) -> Result<AstDocument> {
    let source = fs::read_to_string(path)?;
    let ast = frontend::flatten_source(&source, options)?;
    Ok(AstDocument::from_file(&path.to_string_lossy(), ast))
}

/// Parse Python source given as a string.
pub fn parse_source(code: &str, options: &FlattenOptions) -> Result<AstDocument> {
    let ast = frontend::flatten_source(code, options)?;
    Ok(AstDocument::from_code(code, ast))
}

pub fn parse_file_with_save(
    path: &Path,
    save_path: &Path,
    options: &FlattenOptions,
    save: &SaveOptions,
) -> Result<()> {
    parse_file(path, options)?.save(save_path, save)
}

pub fn parse_source_with_save(
    code: &str,
    save_path: &Path,
    options: &FlattenOptions,
    save: &SaveOptions,
) -> Result<()> {
    parse_source(code, options)?.save(save_path, save)
}

pub fn print_parse_file(path: &Path, options: &FlattenOptions) -> Result<()> {
    let document = parse_file(path, options)?;
    document.write_listing(&mut io::stdout().lock())
}

pub fn print_parse_source(code: &str, options: &FlattenOptions) -> Result<()> {
    let document = parse_source(code, options)?;
    document.write_listing(&mut io::stdout().lock())
}
