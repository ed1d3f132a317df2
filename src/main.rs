use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};

mod api;
mod config;
mod connector;
mod consts;
mod errors;
mod models;

use crate::config::settings::{mask_secret, AssetConfig, Settings};
use crate::connector::host::{self, HostRequest};
use crate::errors::ConnectorError;

#[derive(Parser)]
#[command(name = "zendesk-connector")]
#[command(version = "0.1.0")]
#[command(about = "Run Zendesk connector actions outside the automation platform", long_about = None)]
struct Cli {
    /// for debugging purposes
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an action described by a test JSON file
    Run {
        /// JSON file with "identifier", "parameters" and optionally "config"
        input_test_json: PathBuf,

        /// Overrides the asset username
        #[arg(short, long)]
        username: Option<String>,

        /// Overrides the asset password (prompted for when only a username is given)
        #[arg(short, long)]
        password: Option<String>,

        /// Force server certificate verification
        #[arg(short, long)]
        verify: bool,
    },

    /// List supported action identifiers
    Actions,

    /// Manage the stored default asset
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Display current configuration (with masked secrets)
    Show,

    /// Set a specific configuration value
    Set {
        /// Configuration key (e.g., asset.url, asset.api_token)
        key: String,
        /// New value
        value: String,
    },

    /// Validate configuration by running the connectivity test
    Validate,

    /// Get the path to the config file
    Path,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run {
            input_test_json,
            username,
            password,
            verify,
        } => handle_run(&input_test_json, username, password, verify).await,

        Commands::Actions => handle_actions(),

        Commands::Config { action } => handle_config(action).await,
    };

    if let Err(e) = result {
        match e.downcast_ref::<ConnectorError>() {
            Some(err) => eprintln!("\n{}", err.render()),
            None => eprintln!("\n{} {:#}", "Error:".red().bold(), e),
        }
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::new();

    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    } else if std::env::var("RUST_LOG").is_ok() {
        builder.parse_default_env();
    } else {
        builder.filter_level(log::LevelFilter::Warn);
    }

    builder.target(env_logger::Target::Stderr).init();
}

async fn handle_run(
    input_test_json: &Path,
    username: Option<String>,
    password: Option<String>,
    verify: bool,
) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(input_test_json)
        .with_context(|| format!("Failed to read {}", input_test_json.display()))?;
    let request: HostRequest =
        serde_json::from_str(&raw).context("Failed to parse input test JSON")?;

    println!("{}", format!("Running '{}'...", request.identifier).cyan().bold());
    println!("{}", serde_json::to_string_pretty(&request.parameters)?);
    println!();

    let mut asset = match &request.config {
        Some(config) => AssetConfig::from_value(config.clone())?,
        None => Settings::load()?.asset,
    };

    let password = match (&username, password) {
        (Some(_), None) => Some(prompt_password("Password")?),
        (_, password) => password,
    };
    apply_overrides(&mut asset, username, password, verify);

    let report = host::run(&request, &asset).await;

    println!("{}", serde_json::to_string_pretty(&report)?);
    println!();

    if report.is_success() {
        println!("{}", format!("✓ {}", report.message).green().bold());
        Ok(())
    } else {
        anyhow::bail!("{}", report.message)
    }
}

fn apply_overrides(
    asset: &mut AssetConfig,
    username: Option<String>,
    password: Option<String>,
    verify: bool,
) {
    if let Some(username) = username {
        asset.username = username;
    }
    if let Some(password) = password {
        asset.password = Some(password);
    }
    if verify {
        asset.verify_server_cert = true;
    }
}

fn prompt_password(message: &str) -> anyhow::Result<String> {
    let password = dialoguer::Password::new()
        .with_prompt(message)
        .interact()?;
    Ok(password)
}

fn handle_actions() -> anyhow::Result<()> {
    println!("{}", "Supported actions".cyan().bold());
    println!();
    for id in consts::ACTION_IDS {
        println!("  {}", id.bright_white());
    }
    Ok(())
}

fn set_config_value(asset: &mut AssetConfig, key: &str, value: &str) -> anyhow::Result<()> {
    let field = key
        .strip_prefix("asset.")
        .ok_or_else(|| anyhow::anyhow!("Invalid key format. Use format: asset.field (e.g., asset.url)"))?;

    match field {
        "url" => asset.url = value.to_string(),
        "username" => asset.username = value.to_string(),
        "password" => asset.password = Some(value.to_string()),
        "api_token" => asset.api_token = Some(value.to_string()),
        "verify_server_cert" => {
            asset.verify_server_cert = value
                .parse()
                .with_context(|| format!("'{}' is not true or false", value))?
        }
        "timeout_secs" => {
            asset.timeout_secs = value
                .parse()
                .with_context(|| format!("'{}' is not a number of seconds", value))?
        }
        _ => anyhow::bail!("Unknown configuration key: {}", key),
    }

    Ok(())
}

async fn handle_config(action: ConfigAction) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            let settings = Settings::load()?;
            let asset = &settings.asset;

            println!("{}", "Current Configuration".cyan().bold());
            println!();

            println!("{}", "[asset]".bold());
            println!("  {} {}", "url:".dimmed(), asset.url.bright_white());
            println!("  {} {}", "username:".dimmed(), asset.username.bright_white());
            if let Some(password) = &asset.password {
                println!("  {} {}", "password:".dimmed(), mask_secret(password).yellow());
            }
            if let Some(token) = &asset.api_token {
                println!("  {} {}", "api_token:".dimmed(), mask_secret(token).yellow());
            }
            println!(
                "  {} {}",
                "verify_server_cert:".dimmed(),
                asset.verify_server_cert.to_string().bright_white()
            );
            println!(
                "  {} {}",
                "timeout_secs:".dimmed(),
                asset.timeout_secs.to_string().bright_white()
            );

            Ok(())
        }

        ConfigAction::Set { key, value } => {
            let mut settings = match Settings::load() {
                Ok(settings) => settings,
                Err(ConnectorError::ConfigNotFound) => Settings {
                    asset: AssetConfig::default(),
                },
                Err(e) => return Err(e.into()),
            };

            set_config_value(&mut settings.asset, &key, &value)?;
            settings.save()?;

            let shown = if key.ends_with("password") || key.ends_with("api_token") {
                mask_secret(&value)
            } else {
                value
            };
            println!("{}", format!("✓ Updated {} to: {}", key, shown).green().bold());
            println!();
            println!("{}", "Configuration saved successfully!".green());

            Ok(())
        }

        ConfigAction::Validate => {
            println!("{}", "Validating configuration...".cyan().bold());
            println!();

            let settings = Settings::load()?;

            print!("{}", "  Testing Zendesk connection... ".dimmed());
            std::io::Write::flush(&mut std::io::stdout())?;

            let mut connector = connector::ZendeskConnector::new(&settings.asset)?;
            let result = connector
                .handle_action(consts::ACTION_ID_TEST_CONNECTIVITY, serde_json::Map::new())
                .await;

            if result.is_success() {
                println!("{}", "✓".green().bold());
                println!();
                println!("{}", format!("✓ {}", result.message).green().bold());
                Ok(())
            } else {
                println!("{}", "✗".red().bold());
                println!();
                println!("{}", format!("  {}", result.message).red());
                anyhow::bail!("Zendesk validation failed")
            }
        }

        ConfigAction::Path => {
            let config_path = Settings::config_path()?;
            println!("{}", config_path.display());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_run() {
        let cli = Cli::try_parse_from([
            "zendesk-connector",
            "run",
            "create_ticket.json",
            "-u",
            "agent@example.com",
            "-v",
        ])
        .unwrap();

        match cli.command {
            Commands::Run {
                input_test_json,
                username,
                password,
                verify,
            } => {
                assert_eq!(input_test_json, PathBuf::from("create_ticket.json"));
                assert_eq!(username.as_deref(), Some("agent@example.com"));
                assert!(password.is_none());
                assert!(verify);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_overrides_replace_credentials() {
        let mut asset = AssetConfig {
            url: "https://example.zendesk.com".to_string(),
            username: "stored@example.com".to_string(),
            verify_server_cert: false,
            ..AssetConfig::default()
        };

        apply_overrides(
            &mut asset,
            Some("agent@example.com".to_string()),
            Some("hunter2".to_string()),
            true,
        );

        assert_eq!(asset.username, "agent@example.com");
        assert_eq!(asset.password.as_deref(), Some("hunter2"));
        assert!(asset.verify_server_cert);
    }

    #[test]
    fn test_overrides_keep_stored_values_when_absent() {
        let mut asset = AssetConfig {
            username: "stored@example.com".to_string(),
            api_token: Some("abc123".to_string()),
            verify_server_cert: false,
            ..AssetConfig::default()
        };

        apply_overrides(&mut asset, None, None, false);

        assert_eq!(asset.username, "stored@example.com");
        assert!(asset.password.is_none());
        assert!(!asset.verify_server_cert);
    }

    #[test]
    fn test_set_config_value() {
        let mut asset = AssetConfig::default();
        set_config_value(&mut asset, "asset.url", "https://example.zendesk.com").unwrap();
        set_config_value(&mut asset, "asset.timeout_secs", "10").unwrap();
        set_config_value(&mut asset, "asset.verify_server_cert", "false").unwrap();

        assert_eq!(asset.url, "https://example.zendesk.com");
        assert_eq!(asset.timeout_secs, 10);
        assert!(!asset.verify_server_cert);
    }

    #[test]
    fn test_set_config_value_rejects_unknown_keys() {
        let mut asset = AssetConfig::default();
        assert!(set_config_value(&mut asset, "url", "x").is_err());
        assert!(set_config_value(&mut asset, "asset.color", "blue").is_err());
        assert!(set_config_value(&mut asset, "asset.timeout_secs", "soon").is_err());
    }
}
