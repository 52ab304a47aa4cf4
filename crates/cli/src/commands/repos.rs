use anyhow::{Context, Result};
use beanstalk_api::resources::repositories;
use beanstalk_api::Client;
use beanstalk_output::OutputRenderer;
use clap::{Args, Subcommand};
use serde::Serialize;

#[derive(Args, Debug, Clone)]
pub struct ReposArgs {
    #[command(subcommand)]
    command: ReposCommand,
}

#[derive(Subcommand, Debug, Clone)]
enum ReposCommand {
    /// List repositories in the account
    List,
    /// Show a single repository
    Get {
        /// Repository ID
        id: u64,
    },
}

#[derive(Serialize)]
struct Row<'a> {
    id: u64,
    name: &'a str,
    title: &'a str,
    vcs: &'a str,
    default_branch: &'a str,
    last_commit_at: &'a str,
}

impl<'a> From<&'a repositories::Repository> for Row<'a> {
    fn from(repo: &'a repositories::Repository) -> Self {
        Row {
            id: repo.id,
            name: &repo.name,
            title: repo.title.as_deref().unwrap_or(""),
            vcs: repo.vcs.as_deref().unwrap_or(""),
            default_branch: repo.default_branch.as_deref().unwrap_or(""),
            last_commit_at: repo.last_commit_at.as_deref().unwrap_or(""),
        }
    }
}

pub async fn execute(args: ReposArgs, client: &Client, renderer: &OutputRenderer) -> Result<()> {
    match args.command {
        ReposCommand::List => {
            let repos = repositories::list(client)
                .await
                .context("Failed to list repositories")?;
            if repos.is_empty() {
                tracing::info!("No repositories found for this account.");
                return Ok(());
            }
            let rows: Vec<Row<'_>> = repos.iter().map(Row::from).collect();
            renderer.render(&rows)
        }
        ReposCommand::Get { id } => {
            let repo = repositories::get(client, id)
                .await
                .with_context(|| format!("Failed to get repository {id}"))?;
            renderer.render(&repo)
        }
    }
}
