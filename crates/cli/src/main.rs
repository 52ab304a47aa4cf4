mod commands;

use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use beanstalk_api::{ApiError, Client, ClientConfig};
use beanstalk_config::{Config, Profile};
use beanstalk_output::{OutputFormat, OutputRenderer};
use clap::{Parser, Subcommand};
use commands::auth::{self, AuthCommand};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "beanstalk", version, about = "Command-line client for the Beanstalk API", long_about = None)]
struct Cli {
    /// Profile to use from config file
    #[arg(short, long, global = true)]
    profile: Option<String>,

    /// Path to config file (defaults to ~/.beanstalk-cli/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format for command results
    #[arg(long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    output: OutputFormat,

    /// Enable verbose logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: BeanstalkCommand,
}

#[derive(Subcommand, Debug, Clone)]
enum BeanstalkCommand {
    /// Profile management commands
    #[command(subcommand)]
    Auth(AuthCommand),
    /// Show the user the active credentials belong to
    Whoami,
    /// Repository commands
    Repos(commands::repos::ReposArgs),
    /// User commands
    Users(commands::users::UsersArgs),
    /// Changeset commands
    Changesets(commands::changesets::ChangesetsArgs),
    /// Send a raw request to the API
    Request(commands::request::RequestArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug)?;

    let result = run(cli).await;
    if let Err(err) = &result {
        if let Some(hint) = err.downcast_ref::<ApiError>().and_then(ApiError::suggestion) {
            eprintln!("hint: {hint}");
        }
    }
    result
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load(cli.config.as_ref())?;
    let renderer = OutputRenderer::new(cli.output);

    let command = match cli.command {
        BeanstalkCommand::Auth(command) => {
            return auth::handle(
                command,
                &mut config,
                cli.config.as_deref(),
                cli.profile.as_deref(),
                &renderer,
            );
        }
        command => command,
    };

    let (name, profile) = config
        .resolve_profile(cli.profile.as_deref())
        .ok_or_else(|| match cli.profile.as_deref() {
            Some(name) => anyhow!("Profile '{name}' does not exist."),
            None => anyhow!("No profile configured. Run `beanstalk auth login` first."),
        })?;
    let client = build_client(name, profile, |key| std::env::var(key).ok())?;

    match command {
        BeanstalkCommand::Whoami => commands::users::whoami(&client, &renderer).await,
        BeanstalkCommand::Repos(args) => commands::repos::execute(args, &client, &renderer).await,
        BeanstalkCommand::Users(args) => commands::users::execute(args, &client, &renderer).await,
        BeanstalkCommand::Changesets(args) => {
            commands::changesets::execute(args, &client, &renderer).await
        }
        BeanstalkCommand::Request(args) => {
            commands::request::execute(args, &client, &renderer).await
        }
        BeanstalkCommand::Auth(_) => unreachable!("auth commands return early"),
    }
}

fn init_tracing(debug: bool) -> Result<()> {
    let default = if debug {
        "info,beanstalk=debug,beanstalk_api=debug,beanstalk_config=debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!("failed to initialize logger: {err}"))
}

fn build_client<F>(name: &str, profile: &Profile, env: F) -> Result<Client>
where
    F: Fn(&str) -> Option<String>,
{
    let config = match (&profile.base_url, &profile.account) {
        (Some(url), _) => ClientConfig::new(url)?,
        (None, Some(account)) => ClientConfig::for_account(account)?,
        (None, None) => bail!("Profile '{name}' needs either an account or a base_url."),
    };

    let username = profile
        .username
        .clone()
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| anyhow!("Profile '{name}' is missing a username."))?;
    let password = resolve_password(name, profile, env).ok_or_else(|| {
        anyhow!(
            "No password found for profile '{name}'. Set {} or BEANSTALK_PASSWORD, or run `beanstalk auth login --profile {name} --password ...`",
            password_env_var(name)
        )
    })?;

    let config = config
        .with_basic_auth(username, password)
        .with_user_agent(format!("beanstalk-cli/{}", env!("CARGO_PKG_VERSION")))?;
    Ok(Client::from_config(config, None)?)
}

/// Profile-specific env var, then the generic one, then the config file.
fn resolve_password<F>(name: &str, profile: &Profile, env: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    env(&password_env_var(name))
        .filter(|p| !p.trim().is_empty())
        .or_else(|| env("BEANSTALK_PASSWORD").filter(|p| !p.trim().is_empty()))
        .or_else(|| profile.password.clone())
}

fn password_env_var(profile: &str) -> String {
    format!(
        "BEANSTALK_PASSWORD_{}",
        profile.to_uppercase().replace('-', "_")
    )
}
