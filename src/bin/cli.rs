use clap::{Parser, Subcommand};
use request_schema::cli::{OutputFormat, describe_schema, load_json, load_schema, render};
use request_schema::{Place, Validator, ValidatorConfig};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "request-schema")]
#[command(about = "Check JSON documents against declarative request schemas")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a data document against a schema
    Check {
        /// Path to the schema file
        #[arg(short, long)]
        schema: PathBuf,
        /// Path to the data file
        #[arg(short, long)]
        data: PathBuf,
        /// Validation context (body, params, query or a dotted body path)
        #[arg(short, long, default_value = "body")]
        place: String,
        /// Maximum nesting depth descended into
        #[arg(long)]
        max_depth: Option<usize>,
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Parse a schema and print its fields and rules
    Inspect {
        /// Path to the schema file
        #[arg(short, long)]
        schema: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("❌ {}", e);
            ExitCode::from(2)
        }
    }
}

fn run(command: Commands) -> request_schema::Result<ExitCode> {
    match command {
        Commands::Check {
            schema,
            data,
            place,
            max_depth,
            format,
        } => {
            let schema = load_schema(&schema)?;
            let data = load_json(&data)?;
            let place: Place = place.parse()?;

            let mut config = ValidatorConfig::default();
            if let Some(max_depth) = max_depth {
                config = config.with_max_depth(max_depth);
            }

            let errors = Validator::with_config(config).check(&data, &schema, &place);
            println!("{}", render(&errors, format)?);

            Ok(if errors.is_empty() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            })
        }
        Commands::Inspect { schema } => {
            let schema = load_schema(&schema)?;
            print!("{}", describe_schema(&schema));
            Ok(ExitCode::SUCCESS)
        }
    }
}
