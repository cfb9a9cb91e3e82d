use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use notc::{CompileStage, Config};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};
use tracing_subscriber::EnvFilter;

/// Compile a NotC source file to Jasmin assembly for the JVM.
#[derive(Parser, Debug)]
#[command(name = "notc", version, about)]
struct Cli {
    /// Source file to compile.
    source: PathBuf,

    /// Name of the generated class (defaults to the file stem).
    #[arg(short, long)]
    class: Option<String>,

    /// Directory the `.j` (and `.class`) files are written to.
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Stop after the given stage.
    #[arg(long, value_enum)]
    stage: Option<Stage>,

    /// Path to jasmin.jar; when given the module is assembled with `java -jar`.
    #[arg(long, value_name = "JAR")]
    jasmin: Option<PathBuf>,

    /// More logging (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Stage {
    Lex,
    Parse,
    Validate,
    Codegen,
}

impl From<Stage> for CompileStage {
    fn from(stage: Stage) -> Self {
        match stage {
            Stage::Lex => CompileStage::Lex,
            Stage::Parse => CompileStage::Parse,
            Stage::Validate => CompileStage::Validate,
            Stage::Codegen => CompileStage::Codegen,
        }
    }
}

const EXIT_SYNTAX: u8 = 1;
const EXIT_SEMANTIC: u8 = 2;
const EXIT_IO: u8 = 3;
const EXIT_ASSEMBLER: u8 = 4;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(EXIT_IO);
        }
    };

    let output = match notc::compile(&cli.source, &config) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("{}: {e}", cli.source.display());
            return ExitCode::from(exit_code(&e));
        }
    };

    match (output, &cli.jasmin) {
        (Some(module), Some(jar)) if config.stage.is_none() => {
            if let Err(e) = assemble(&module, jar, &config.output_dir) {
                eprintln!("error: {e:#}");
                return ExitCode::from(EXIT_ASSEMBLER);
            }
        }
        _ => {}
    }
    ExitCode::SUCCESS
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn config(cli: &Cli) -> Result<Config, notc::Error> {
    let mut config = match &cli.class {
        Some(class_name) => {
            notc::validate_class_name(class_name)?;
            Config {
                class_name: class_name.clone(),
                output_dir: PathBuf::new(),
                stage: None,
            }
        }
        None => Config::for_source(&cli.source)?,
    };
    config.output_dir.clone_from(&cli.output);
    config.stage = cli.stage.map(CompileStage::from);
    Ok(config)
}

const fn exit_code(e: &notc::Error) -> u8 {
    if e.is_syntax() {
        EXIT_SYNTAX
    } else if e.is_semantic() {
        EXIT_SEMANTIC
    } else {
        EXIT_IO
    }
}

fn assemble(module: &Path, jar: &Path, output_dir: &Path) -> Result<()> {
    let status = Command::new("java")
        .arg("-jar")
        .arg(jar)
        .arg("-d")
        .arg(output_dir)
        .arg(module)
        .status()
        .context("failed to run java")?;
    if !status.success() {
        bail!("jasmin exited with {status}");
    }
    Ok(())
}
