use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::Level;

use crate::key_size::{DEFAULT_KEY_SIZE, KeySize};
use crate::lifecycle::LifecycleError;
use crate::naming::KeyName;
use crate::secret_store::config::{StoreConfig, StoreConfigError};

#[derive(Parser, Debug)]
#[command(
    name = "key-rotator",
    version,
    about = "Generate, rotate and fetch RSA key pairs stored in AWS Parameter Store"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory where the key files are written
    #[arg(long, global = true, default_value = ".")]
    pub output_dir: PathBuf,

    /// Select how the result is printed
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Plain)]
    pub output_format: OutputFormat,

    /// Verbosity of the diagnostics written to stderr
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Options for reaching the remote store (ignored by `generate`)
    #[command(flatten)]
    pub store: StoreArgs,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generates a new RSA key pair and saves it locally only.
    Generate(KeyArgs),
    /// Generates a new RSA key pair, overwrites the remote key pair with it and saves it locally.
    ///
    /// EXAMPLE:
    /// key-rotator store --name myapp/signing --size 4096
    Store(KeyArgs),
    /// Downloads the stored RSA key pair and saves it locally.
    Fetch(NameArgs),
}

impl Commands {
    /// Checks the key name and size of the command without performing it.
    pub fn validate_inputs(&self) -> Result<(), LifecycleError> {
        match self {
            Commands::Generate(args) | Commands::Store(args) => {
                KeyName::try_from(args.name_args.name.as_str())?;
                KeySize::validate(&args.size)?;
            }
            Commands::Fetch(args) => {
                KeyName::try_from(args.name.as_str())?;
            }
        }
        Ok(())
    }
}

#[derive(Args, Debug, Clone)]
pub struct NameArgs {
    /// Key name; `_pub.pem` and `_priv.pem` are appended to build the artifact names
    #[arg(long, short, required = true)]
    pub name: String,
}

#[derive(Args, Debug, Clone)]
pub struct KeyArgs {
    #[command(flatten)]
    pub name_args: NameArgs,

    /// RSA modulus size in bits, between 2048 and 4096
    #[arg(long, short, default_value_t = DEFAULT_KEY_SIZE.to_string())]
    pub size: String,
}

#[derive(Args, Debug, Clone, Default)]
pub struct StoreArgs {
    /// AWS region of the Parameter Store. Defaults to AWS_REGION or AWS_DEFAULT_REGION
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// Custom Parameter Store endpoint, e.g. a local emulator
    #[arg(long, global = true)]
    pub endpoint_url: Option<String>,

    /// Named profile from the shared AWS config files
    #[arg(long, global = true)]
    pub profile: Option<String>,
}

impl StoreArgs {
    /// Builds the store configuration, falling back to the region from the environment.
    pub fn store_config(&self) -> Result<StoreConfig, StoreConfigError> {
        StoreConfig::new(
            self.region.clone(),
            self.endpoint_url.clone(),
            self.profile.clone(),
        )?
        .try_with_region_from_env()
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
pub enum OutputFormat {
    /// Human readable summary
    #[value(name = "Plain")]
    Plain,
    /// Full report in json format
    #[value(name = "Json")]
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use clap::error::ErrorKind;

    use super::*;

    #[test]
    fn parse_generate_with_defaults() {
        let cli = Cli::try_parse_from(["key-rotator", "generate", "--name", "foo"]).unwrap();

        assert_matches!(cli.command, Commands::Generate(args) => {
            assert_eq!(args.name_args.name, "foo");
            assert_eq!(args.size, "2048");
        });
        assert_eq!(cli.output_dir, PathBuf::from("."));
        assert_eq!(cli.output_format, OutputFormat::Plain);
        assert_eq!(cli.log_level, LogLevel::Info);
        assert_eq!(cli.store.region, None);
    }

    #[test]
    fn parse_store_with_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "key-rotator",
            "store",
            "-n",
            "myapp/signing",
            "-s",
            "4096",
            "--region",
            "eu-west-1",
            "--endpoint-url",
            "http://localhost:4566",
            "--output-format",
            "Json",
            "--output-dir",
            "/tmp/keys",
        ])
        .unwrap();

        assert_matches!(cli.command, Commands::Store(args) => {
            assert_eq!(args.name_args.name, "myapp/signing");
            assert_eq!(args.size, "4096");
        });
        assert_eq!(cli.output_format, OutputFormat::Json);
        assert_eq!(cli.output_dir, PathBuf::from("/tmp/keys"));
        assert_eq!(cli.store.region.as_deref(), Some("eu-west-1"));
        assert_eq!(
            cli.store.endpoint_url.as_deref(),
            Some("http://localhost:4566")
        );
    }

    #[test]
    fn size_is_kept_as_text() {
        // Validation happens after parsing so the error message mentions the raw input.
        let cli =
            Cli::try_parse_from(["key-rotator", "generate", "-n", "foo", "-s", "huge"]).unwrap();
        assert_matches!(cli.command, Commands::Generate(args) => {
            assert_eq!(args.size, "huge");
        });
    }

    #[test]
    fn fetch_requires_a_name() {
        let err = Cli::try_parse_from(["key-rotator", "fetch"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);

        let err = Cli::try_parse_from(["key-rotator", "fetch", "-n", "foo", "-s", "2048"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn inputs_are_validated_regardless_of_output_dir() {
        let cli = Cli::try_parse_from([
            "key-rotator",
            "generate",
            "--name",
            "bad name",
            "--output-dir",
            "/non-existent-dir",
        ])
        .unwrap();
        assert_matches!(
            cli.command.validate_inputs(),
            Err(LifecycleError::InvalidName(_))
        );

        let cli =
            Cli::try_parse_from(["key-rotator", "store", "-n", "foo", "-s", "1024"]).unwrap();
        assert_matches!(
            cli.command.validate_inputs(),
            Err(LifecycleError::InvalidKeySize(_))
        );

        let cli = Cli::try_parse_from(["key-rotator", "fetch", "-n", "/foo"]).unwrap();
        assert_matches!(
            cli.command.validate_inputs(),
            Err(LifecycleError::InvalidName(_))
        );

        let cli = Cli::try_parse_from(["key-rotator", "fetch", "-n", "app/foo"]).unwrap();
        assert_matches!(cli.command.validate_inputs(), Ok(()));
    }

    #[test]
    fn unknown_subcommand_is_rejected() {
        let err = Cli::try_parse_from(["key-rotator", "rotate", "-n", "foo"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
    }

    #[test]
    fn log_level_maps_to_tracing_level() {
        let cli =
            Cli::try_parse_from(["key-rotator", "--log-level", "debug", "fetch", "-n", "foo"])
                .unwrap();
        assert_eq!(Level::from(cli.log_level), Level::DEBUG);
    }

    #[test]
    fn store_config_from_arguments() {
        let args = StoreArgs {
            region: Some("us-east-2".to_string()),
            endpoint_url: Some("https://ssm.us-east-2.amazonaws.com".to_string()),
            profile: None,
        };
        let config = args.store_config().unwrap();
        assert_eq!(config.region(), Some("us-east-2"));

        let args = StoreArgs {
            endpoint_url: Some("not a url".to_string()),
            ..Default::default()
        };
        assert_matches!(
            args.store_config(),
            Err(StoreConfigError::InvalidEndpointUrl(..))
        );
    }
}
