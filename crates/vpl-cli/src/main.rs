use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use ariadne::{Config, Label, Report, ReportKind, Source};
use clap::{Parser as ClapParser, Subcommand};
use log::info;
use vpl::{CompiledProgram, Program};

#[derive(ClapParser)]
#[command(name = "vpl")]
#[command(about = "Visual rule compiler")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a saved rule program and print the script
    Compile {
        /// Path to the program JSON, `-` for stdin
        file: PathBuf,
        /// Compile in advanced mode, whatever the file says
        #[arg(long)]
        advanced: bool,
        /// Point at the code generated for this rule
        #[arg(long, value_name = "RULE")]
        highlight: Option<usize>,
        /// Print the rule to segment and line table
        #[arg(long)]
        map: bool,
        /// Print each segment separately
        #[arg(long)]
        segments: bool,
    },
    /// Check that a program compiles, without printing the script
    Check {
        /// Path to the program JSON, `-` for stdin
        file: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_default_env().init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Compile {
            file,
            advanced,
            highlight,
            map,
            segments,
        } => {
            let mut program = load_program(&file)?;
            if advanced {
                program.set_advanced_mode(true);
            }
            let compiled = compile(&program, &file)?;

            if segments {
                for (index, segment) in compiled.segments().iter().enumerate() {
                    println!("-- segment {index}");
                    print!("{segment}");
                }
            } else {
                print!("{}", compiled.text());
            }
            if map {
                for (rule, segment) in compiled.rule_to_segment().iter().enumerate() {
                    let line = compiled.line_of_rule(rule).unwrap_or_default();
                    println!("-- rule {rule} -> segment {segment}, line {}", line + 1);
                }
            }
            if let Some(rule) = highlight {
                report_rule(&compiled, rule, &file.display().to_string())?;
            }
        }
        Commands::Check { file } => {
            let program = load_program(&file)?;
            let compiled = compile(&program, &file)?;
            let features = compiled.features();
            eprintln!(
                "{}: {} rules, {} segments, features: {features:?}",
                file.display(),
                program.len(),
                compiled.segments().len(),
            );
        }
    }
    Ok(())
}

fn load_program(file: &Path) -> anyhow::Result<Program> {
    let json = if file.as_os_str() == "-" {
        let mut json = String::new();
        io::stdin()
            .read_to_string(&mut json)
            .context("failed to read program from stdin")?;
        json
    } else {
        fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))?
    };
    let program: Program =
        serde_json::from_str(&json).with_context(|| format!("{} is not a valid program", file.display()))?;
    info!("loaded {} rules from {}", program.len(), file.display());
    Ok(program)
}

fn compile(program: &Program, file: &Path) -> anyhow::Result<CompiledProgram> {
    vpl::compile(program).with_context(|| format!("failed to compile {}", file.display()))
}

/// Render the script with the rule's code labelled.
fn report_rule(compiled: &CompiledProgram, rule: usize, filename: &str) -> anyhow::Result<()> {
    let Some(segment) = compiled.segment_of_rule(rule) else {
        bail!("program has no rule {rule}");
    };
    let start: usize = compiled.segments()[..segment].iter().map(String::len).sum();
    let span = start..start + compiled.segments()[segment].len();
    let text = compiled.text();

    Report::build(ReportKind::Advice, (filename, span.clone()))
        .with_config(Config::default().with_color(false))
        .with_message(format!("code generated for rule {rule}"))
        .with_label(Label::new((filename, span)).with_message(format!("segment {segment}")))
        .finish()
        .eprint((filename, Source::from(text.as_str())))
        .context("failed to write report")?;
    Ok(())
}
