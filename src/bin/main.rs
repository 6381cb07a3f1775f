use std::error::Error;
use std::io::IsTerminal;
use std::process::ExitCode;

use clap::Parser;
use key_rotator::backend::KeyBackend;
use key_rotator::backend::rotator::KeyRotator;
use key_rotator::lifecycle::KeyLifecycle;
use key_rotator::parameters::{Cli, Commands, OutputFormat};
use key_rotator::persistence::LocalFileWriter;
use key_rotator::report::KeyPairReport;
use key_rotator::secret_store::parameter_store::ParameterStore;
use tracing::Level;

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(Level::from(cli.log_level))
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    // Bad input is reported before the output directory is looked at.
    cli.command.validate_inputs()?;

    let writer = LocalFileWriter::try_from(cli.output_dir.clone())
        .map_err(|e| format!("error preparing output directory: {}", e))?;

    let report = match &cli.command {
        Commands::Generate(args) => KeyLifecycle::new(KeyRotator::local(), writer)
            .generate(&args.name_args.name, &args.size)?,
        Commands::Store(args) => {
            remote_lifecycle(&cli, writer)?.rotate_and_store(&args.name_args.name, &args.size)?
        }
        Commands::Fetch(args) => remote_lifecycle(&cli, writer)?.fetch_existing(&args.name)?,
    };

    print_report(&report, cli.output_format)
}

fn remote_lifecycle(
    cli: &Cli,
    writer: LocalFileWriter,
) -> Result<KeyLifecycle<impl KeyBackend, LocalFileWriter>, Box<dyn Error>> {
    let config = cli.store.store_config()?;
    let store = ParameterStore::try_new(&config)
        .map_err(|e| format!("error creating parameter store client: {}", e))?;
    Ok(KeyLifecycle::new(KeyRotator::new(store), writer))
}

fn print_report(report: &KeyPairReport, format: OutputFormat) -> Result<(), Box<dyn Error>> {
    match format {
        OutputFormat::Plain => println!("{}", report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
    }
    Ok(())
}
