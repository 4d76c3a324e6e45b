use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use jarhealth::config::parse_sections;
use jarhealth::{
    AnalysisConfig, Classpath, JarFileLoader, LoadPolicy, ProvidedClasses, Report, load_inputs,
    run_analyzers,
};

const REPORT_TITLE: &str = "Classpath Report";

/// CLI arguments for jarhealth execution.
#[derive(Parser, Debug)]
#[command(
    name = "jarhealth",
    about = "Fast, deterministic health report for the JAR and WAR files of a Java classpath.",
    version
)]
struct Cli {
    /// JAR files, WAR files or directories; `@FILE` reads one path per line.
    #[arg(long, value_name = "PATH", num_args = 1.., required = true)]
    input: Vec<String>,
    /// Classes provided by the runtime: a JAR file or a class-name list.
    #[arg(long, value_name = "PATH", num_args = 1..)]
    provided: Vec<PathBuf>,
    /// Do not treat `java.*` classes as provided.
    #[arg(long)]
    no_platform: bool,
    /// Report sections in order, comma separated, or `@FILE`.
    #[arg(long, value_name = "ID[,ID...]|@FILE")]
    sections: Vec<String>,
    /// Skip malformed class files instead of failing.
    #[arg(long)]
    tolerant: bool,
    /// Where to write the JSON report; `-` is stdout.
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
    #[arg(long)]
    quiet: bool,
    #[arg(long)]
    timing: bool,
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);
    run(cli)
}

fn init_logging(cli: &Cli) {
    let env_filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("jarhealth=debug")
    } else if cli.quiet {
        EnvFilter::new("jarhealth=error")
    } else {
        EnvFilter::new("jarhealth=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    debug!(verbose = cli.verbose, "logging initialized");
}

fn run(cli: Cli) -> Result<()> {
    let started_at = Instant::now();
    let base_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let inputs =
        expand_path_args(&cli.input, &base_dir).context("failed to expand --input arguments")?;
    if inputs.is_empty() {
        anyhow::bail!("no input paths provided");
    }

    let policy = if cli.tolerant {
        LoadPolicy::Tolerant
    } else {
        LoadPolicy::FailFast
    };
    let jar_files = load_inputs(&inputs, policy).context("failed to load inputs")?;
    let config = AnalysisConfig {
        sections: parse_sections(&cli.sections).context("invalid --sections")?,
        provided: build_provided(&cli.provided, !cli.no_platform, policy)?,
    };

    let classpath = Classpath::new(jar_files);
    let class_count: usize = classpath
        .jar_files()
        .iter()
        .map(|jar_file| jar_file.class_defs().len())
        .sum();
    let analyzers = config.build_analyzers();
    let report = run_analyzers(&analyzers, &classpath, REPORT_TITLE);

    let mut writer = output_writer(cli.output.as_deref())?;
    write_report(&mut writer, &report)?;

    if cli.timing && !cli.quiet {
        eprintln!(
            "timing: total_ms={} jars={} classes={} sections={}",
            started_at.elapsed().as_millis(),
            classpath.jar_files().len(),
            class_count,
            report.sections.len()
        );
    }

    Ok(())
}

fn build_provided(paths: &[PathBuf], platform: bool, policy: LoadPolicy) -> Result<ProvidedClasses> {
    let mut provided = if platform {
        ProvidedClasses::java_platform()
    } else {
        ProvidedClasses::none()
    };
    for path in paths {
        let is_jar = path
            .extension()
            .is_some_and(|extension| extension.eq_ignore_ascii_case("jar"));
        provided = if is_jar {
            let jar_file = JarFileLoader::new(policy)
                .load(path)
                .with_context(|| format!("failed to load provided JAR {}", path.display()))?;
            provided.with_jar_files(&[jar_file])
        } else {
            provided
                .with_list_file(path)
                .with_context(|| format!("failed to read provided classes {}", path.display()))?
        };
    }
    Ok(provided)
}

fn expand_path_args(args: &[String], base_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut expanded = Vec::new();
    for arg in args {
        let Some(list) = arg.strip_prefix('@') else {
            expanded.push(PathBuf::from(arg));
            continue;
        };
        if list.is_empty() {
            anyhow::bail!("empty @file reference");
        }
        let list_path = base_dir.join(list);
        let content = fs::read_to_string(&list_path)
            .with_context(|| format!("failed to read {}", list_path.display()))?;
        let list_dir = list_path.parent().unwrap_or(base_dir);
        for line in content.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            expanded.push(list_dir.join(line));
        }
    }
    Ok(expanded)
}

fn write_report(writer: &mut dyn Write, report: &Report) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, report).context("failed to serialize report")?;
    writer.write_all(b"\n").context("failed to write report")?;
    writer.flush().context("failed to flush report")
}

fn output_writer(output: Option<&Path>) -> Result<Box<dyn Write>> {
    match output {
        Some(path) if path == Path::new("-") => Ok(Box::new(io::stdout())),
        Some(path) => Ok(Box::new(
            File::create(path).with_context(|| format!("failed to open {}", path.display()))?,
        )),
        None => Ok(Box::new(io::stdout())),
    }
}
