use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use beanstalk_config::{Config, Profile};
use beanstalk_output::OutputRenderer;
use clap::{Args, Subcommand};
use serde::Serialize;

#[derive(Subcommand, Debug, Clone)]
pub enum AuthCommand {
    /// Add or update the profile named by --profile
    Login(LoginArgs),
    /// Remove the profile named by --profile
    Logout,
    /// List configured profiles
    List,
}

#[derive(Args, Debug, Clone)]
pub struct LoginArgs {
    /// Beanstalk account name (the subdomain of beanstalkapp.com).
    #[arg(long, conflicts_with = "base_url", required_unless_present = "base_url")]
    pub account: Option<String>,
    /// Full API root, for self-hosted or test servers.
    #[arg(long)]
    pub base_url: Option<String>,
    /// Beanstalk username.
    #[arg(long)]
    pub username: String,
    /// Password or access token. Left out of the config file when omitted;
    /// supply it through BEANSTALK_PASSWORD instead.
    #[arg(long)]
    pub password: Option<String>,
    /// Mark this profile as the default one.
    #[arg(long)]
    pub default: bool,
}

pub fn handle(
    command: AuthCommand,
    config: &mut Config,
    config_path: Option<&Path>,
    profile: Option<&str>,
    renderer: &OutputRenderer,
) -> Result<()> {
    match command {
        AuthCommand::Login(args) => login(args, required(profile)?, config, config_path),
        AuthCommand::Logout => logout(required(profile)?, config, config_path),
        AuthCommand::List => list_profiles(config, renderer),
    }
}

fn required(profile: Option<&str>) -> Result<&str> {
    match profile.map(str::trim) {
        Some(name) if !name.is_empty() => Ok(name),
        _ => bail!("A profile name is required, pass --profile <NAME>"),
    }
}

fn login(
    args: LoginArgs,
    name: &str,
    config: &mut Config,
    config_path: Option<&Path>,
) -> Result<()> {
    if args.username.trim().is_empty() {
        bail!("Username cannot be empty");
    }

    // Validate before persisting anything.
    let client_config = match (&args.base_url, &args.account) {
        (Some(url), _) => beanstalk_api::ClientConfig::new(url),
        (None, Some(account)) => beanstalk_api::ClientConfig::for_account(account),
        (None, None) => bail!("Either --account or --base-url is required"),
    }
    .context("Invalid Beanstalk location")?;

    let profile = Profile {
        account: args.account.clone(),
        base_url: args.base_url.clone(),
        username: Some(args.username.trim().to_string()),
        password: args.password.filter(|p| !p.is_empty()),
    };
    config.upsert_profile(name, profile, args.default);

    config
        .save(config_path)
        .context("Unable to persist configuration file")?;

    tracing::info!(
        profile = %name,
        base_url = %client_config.base_url(),
        "Profile saved"
    );
    Ok(())
}

fn logout(name: &str, config: &mut Config, config_path: Option<&Path>) -> Result<()> {
    config
        .remove_profile(name)
        .ok_or_else(|| anyhow!("Profile '{name}' does not exist"))?;

    config
        .save(config_path)
        .context("Unable to persist configuration file")?;
    tracing::info!(profile = %name, "Profile removed");
    Ok(())
}

fn list_profiles(config: &Config, renderer: &OutputRenderer) -> Result<()> {
    #[derive(Serialize)]
    struct Row<'a> {
        name: &'a str,
        location: &'a str,
        username: &'a str,
        has_password: bool,
        is_default: bool,
    }

    let rows: Vec<Row<'_>> = config
        .profiles
        .iter()
        .map(|(name, profile)| Row {
            name,
            location: profile
                .base_url
                .as_deref()
                .or(profile.account.as_deref())
                .unwrap_or(""),
            username: profile.username.as_deref().unwrap_or(""),
            has_password: profile.password.is_some(),
            is_default: config.default_profile.as_deref() == Some(name.as_str()),
        })
        .collect();

    if rows.is_empty() {
        tracing::info!("No profiles configured. Run `beanstalk auth login` first.");
        return Ok(());
    }

    renderer.render(&rows)
}
