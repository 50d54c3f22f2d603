use anyhow::{bail, Context, Result};
use clap::Parser;
use digit_probe::cli::{AnalyzeArgs, Cli, Command, CompareArgs, GenerateArgs, OutputFormat, Preset};
use digit_probe::config::ProbeConfig;
use digit_probe::csv_output::CsvComparisonOutput;
use digit_probe::report::{analyze, compare_reports, AnalysisReport, LabeledReport};
use digit_probe::sequence::{SequenceMode, SymbolSequence};
use digit_probe::{input, output, synth};
use std::io::Write;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber; `--debug` forces TRACE, otherwise RUST_LOG applies
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Base configuration from --config or --preset, then command-line overrides
fn build_config(args: &AnalyzeArgs) -> Result<ProbeConfig> {
    let mut config = match &args.config {
        Some(path) => ProbeConfig::from_toml(path)?,
        None => match args.preset {
            Preset::Default => ProbeConfig::default(),
            Preset::Quick => ProbeConfig::quick(),
            Preset::Thorough => ProbeConfig::thorough(),
        },
    };

    if let Some(window) = args.schur_window {
        config.schur_window = window;
    }
    if let Some(lags) = &args.lags {
        config.lags = lags.clone();
    }
    if let Some(orders) = &args.orders {
        config.ngram_orders = orders.clone();
    }
    if let Some(null) = args.schur_null {
        config.schur_null = null;
    }
    if let Some(workers) = args.workers {
        config.workers = workers;
    }
    if args.no_parallel {
        config.parallel = false;
    }

    if let Err(e) = config.validate() {
        bail!("Invalid configuration: {}", e);
    }
    Ok(config)
}

fn load_sequence(args: &AnalyzeArgs) -> Result<(SymbolSequence, Option<i64>)> {
    let path = &args.file;
    if args.integers {
        let alphabet = args
            .alphabet
            .context("--integers requires --alphabet > 0")?;
        input::read_integers_file(path, alphabet, args.limit)
            .with_context(|| format!("Failed to read integers from {}", path.display()))
    } else {
        let seq = input::read_digits_file(path, args.limit)
            .with_context(|| format!("Failed to read digits from {}", path.display()))?;
        Ok((seq, None))
    }
}

fn run_analyze(args: &AnalyzeArgs) -> Result<()> {
    let config = build_config(args)?;
    let (seq, max_observed) = load_sequence(args)?;

    if seq.is_empty() {
        tracing::warn!(file = %args.file.display(), "no symbols found; every metric will be undefined");
    }

    let report = analyze(&seq, &config)
        .context("Analysis failed")?
        .with_max_observed(max_observed);

    match args.format {
        OutputFormat::Text => print!("{}", output::render_report(&report)),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }

    if let Some(path) = &args.report_json {
        std::fs::write(path, report.to_json()?)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        eprintln!("[json] written: {}", path.display());
    }

    Ok(())
}

fn label_for(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn load_labeled(path: &Path) -> Result<LabeledReport> {
    let report = AnalysisReport::load(path)
        .with_context(|| format!("Failed to load report {}", path.display()))?;
    Ok(LabeledReport::new(label_for(path), report))
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

fn run_compare(args: &CompareArgs) -> Result<()> {
    let configured_policy = match &args.config {
        Some(path) => ProbeConfig::from_toml(path)?.scoring_policy,
        None => ProbeConfig::default().scoring_policy,
    };
    let policy = args.policy.unwrap_or(configured_policy);

    let reports = args
        .reports
        .iter()
        .map(|path| load_labeled(path))
        .collect::<Result<Vec<_>>>()?;

    // The baseline may be one of the compared reports
    let baseline = match &args.baseline {
        Some(path) => match args.reports.iter().position(|p| same_file(p, path)) {
            Some(idx) => Some(reports[idx].clone()),
            None => Some(load_labeled(path)?),
        },
        None => None,
    };

    let comparison = compare_reports(&reports, baseline.as_ref(), policy)?;

    match args.format {
        OutputFormat::Text => print!("{}", output::render_comparison(&comparison)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&comparison)?),
    }

    if let Some(path) = &args.csv {
        std::fs::write(path, CsvComparisonOutput::from_comparison(&comparison).to_csv())
            .with_context(|| format!("Failed to write CSV to {}", path.display()))?;
        eprintln!("[csv] written: {}", path.display());
    }

    if let Some(path) = &args.md {
        std::fs::write(path, output::render_markdown(&comparison))
            .with_context(|| format!("Failed to write Markdown to {}", path.display()))?;
        eprintln!("[md] written: {}", path.display());
    }

    Ok(())
}

fn run_generate(args: &GenerateArgs) -> Result<()> {
    let alphabet = synth::alphabet_for(args.kind, args.alphabet);
    let symbols = synth::generate(args.kind, args.n, alphabet, args.seed);
    let mode = if alphabet <= 10 {
        SequenceMode::Digits
    } else {
        SequenceMode::Integers
    };
    let encoded = SymbolSequence::new(symbols, alphabet, mode)?.encode();

    match &args.output {
        Some(path) => std::fs::write(path, &encoded)
            .with_context(|| format!("Failed to write sequence to {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&encoded)?;
            stdout.flush()?;
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match &cli.command {
        Command::Analyze(args) => run_analyze(args),
        Command::Compare(args) => run_compare(args),
        Command::Generate(args) => run_generate(args),
    }
}
