use std::path::PathBuf;

use clap::{error::ErrorKind, Args, CommandFactory, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use tis_rs::{
    BatchSource, DatasetConfig, InputMode, InputSource, ModelConfig, PredictConfig,
    PredictorBuilder,
};
use tracing_subscriber::filter::LevelFilter;

#[derive(Debug, Parser)]
#[command(name = "tis-predict")]
#[command(about = "Predict translation initiation sites on transcript sequences")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run a trained model and write the site table and raw outputs.
    Predict(PredictArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InputType {
    /// JSON dataset config pointing at a transcript store.
    Config,
    /// A single RNA or DNA sequence given inline.
    Rna,
    /// A FASTA file.
    Fa,
}

#[derive(Debug, Args)]
struct PredictArgs {
    #[arg(long, value_enum)]
    input_type: InputType,
    /// Sequence string, FASTA path or dataset config path, per `--input-type`.
    #[arg(long)]
    input_data: String,
    #[arg(long, env = "TIS_MODEL")]
    model: PathBuf,
    #[arg(long, default_value = "cpu")]
    device: String,
    #[arg(long, default_value_t = PredictConfig::DEFAULT_MIN_PROB)]
    min_prob: f32,
    #[arg(long, default_value_t = PredictConfig::DEFAULT_MAX_SEQ_LEN)]
    max_seq_len: usize,
    /// Writes `<PREFIX>.csv` (sites) and `<PREFIX>.npy.json` (raw outputs as a
    /// JSON array of `[id, probabilities]` rows, in place of a pickled `.npy`).
    #[arg(long, value_name = "PREFIX")]
    out_prefix: PathBuf,
    /// One of off, error, warn, info, debug, trace.
    #[arg(long, default_value = "info", value_parser = parse_log_level)]
    log_level: LevelFilter,
}

fn parse_log_level(value: &str) -> Result<LevelFilter, String> {
    value
        .parse::<LevelFilter>()
        .map_err(|_| format!("unknown log level '{value}'"))
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            eprintln!("{err}");
            eprintln!("{}", Cli::command().render_usage());
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Predict(args) => predict(args),
    };
    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn predict(args: PredictArgs) -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let input = match args.input_type {
        InputType::Config => InputMode::Dataset(
            DatasetConfig::from_json(&PathBuf::from(&args.input_data))
                .map_err(|e| e.to_string())?,
        ),
        InputType::Rna => InputMode::Sequence(args.input_data),
        InputType::Fa => InputMode::Fasta(PathBuf::from(args.input_data)),
    };

    let mut config = PredictConfig::new(input, args.out_prefix);
    config.min_prob = args.min_prob;
    config.max_seq_len = args.max_seq_len;
    config.model = ModelConfig {
        model_path: args.model.to_string_lossy().into_owned(),
        device: args.device,
    };
    config.validate().map_err(|e| e.to_string())?;

    let predictor = PredictorBuilder::new(config.model.clone())
        .build()
        .map_err(|e| e.to_string())?;
    let source = InputSource::from_config(&config).map_err(|e| e.to_string())?;

    let progress = ProgressBar::new(source.len() as u64);
    progress.set_style(
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} batches ({eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-"),
    );
    let summary = predictor
        .run_with_source(&source, &config, |done| progress.set_position(done as u64))
        .map_err(|e| e.to_string())?;
    progress.finish_and_clear();

    match &summary.table_path {
        Some(path) => println!("--> Sites of interest saved to '{}'", path.display()),
        None => println!(
            "!-> No sites of interest found (omitted creation of '{}')",
            config.table_path().display()
        ),
    }
    println!("--> Raw model outputs saved to '{}'", summary.raw_path.display());
    Ok(())
}
