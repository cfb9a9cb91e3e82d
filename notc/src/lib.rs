pub mod builtins;
pub mod codegen;
pub mod lex;
pub mod parse;
pub mod semantics;

pub use ast::{DebugToken, Token};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Settings for one compilation. Each call to [`compile`] gets its own.
#[derive(Clone, Debug)]
pub struct Config {
    pub class_name: String,
    pub output_dir: PathBuf,
    pub stage: Option<CompileStage>,
}

impl Config {
    /// Class named after the file stem, written next to the current directory.
    pub fn for_source(path: &Path) -> Result<Self, Error> {
        let class_name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default()
            .to_owned();
        validate_class_name(&class_name)?;
        Ok(Self {
            class_name,
            output_dir: PathBuf::from("."),
            stage: None,
        })
    }
}

#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum CompileStage {
    Lex,
    Parse,
    Validate,
    Codegen,
}

pub fn validate_class_name(name: &str) -> Result<(), Error> {
    let mut bytes = name.bytes();
    let valid = bytes
        .next()
        .is_some_and(|b| b.is_ascii_alphabetic() || b == b'_')
        && bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_');
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidClassName(name.to_owned()))
    }
}

/// Runs the whole pipeline over `source` and returns the Jasmin module text.
pub fn compile_source(source: &str, class_name: &str) -> Result<String, Error> {
    validate_class_name(class_name)?;
    let tokens = lex::tokenize(source)?;
    let ast = parse::parse(tokens)?;
    let program = semantics::check(&ast)?;
    Ok(codegen::generate(&program, class_name))
}

/// Compiles the file at `path` and writes `<output_dir>/<class_name>.j`.
///
/// Returns `Ok(None)` when `config.stage` stops the pipeline before code
/// generation. Nothing is written unless every stage succeeds.
pub fn compile(path: &Path, config: &Config) -> Result<Option<PathBuf>, Error> {
    validate_class_name(&config.class_name)?;
    let source = fs::read_to_string(path)?;
    let stage = config.stage;

    let tokens = lex::tokenize(&source)?;
    debug!(tokens = tokens.len(), "lexed {}", path.display());
    if stage == Some(CompileStage::Lex) {
        return Ok(None);
    }

    let ast = parse::parse(tokens)?;
    debug!(functions = ast.0.len(), "parsed");
    if stage == Some(CompileStage::Parse) {
        return Ok(None);
    }

    let program = semantics::check(&ast)?;
    debug!("validated");
    if stage == Some(CompileStage::Validate) {
        return Ok(None);
    }

    let code = codegen::generate(&program, &config.class_name);
    let out = config.output_dir.join(format!("{}.j", config.class_name));
    fs::write(&out, code)?;
    info!("wrote {}", out.display());
    Ok(Some(out))
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("invalid class name {0:?}")]
    InvalidClassName(String),
    #[error("Lexing: {0}")]
    Lexing(lex::Error),
    #[error("Parsing: {0}")]
    Parsing(parse::Error),
    #[error("Semantics: {0}")]
    Semantics(semantics::Error),
}

impl Error {
    /// Lexing and parsing failures.
    pub const fn is_syntax(&self) -> bool {
        matches!(self, Self::Lexing(_) | Self::Parsing(_))
    }

    pub const fn is_semantic(&self) -> bool {
        matches!(self, Self::Semantics(_))
    }
}

impl From<semantics::Error> for Error {
    fn from(e: semantics::Error) -> Self {
        Error::Semantics(e)
    }
}

impl From<lex::Error> for Error {
    fn from(e: lex::Error) -> Self {
        Error::Lexing(e)
    }
}

impl From<parse::Error> for Error {
    fn from(e: parse::Error) -> Self {
        Error::Parsing(e)
    }
}
