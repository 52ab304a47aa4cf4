use anyhow::{Context, Result};
use beanstalk_api::resources::changesets;
use beanstalk_api::Client;
use beanstalk_output::OutputRenderer;
use clap::{Args, Subcommand};
use serde::Serialize;

#[derive(Args, Debug, Clone)]
pub struct ChangesetsArgs {
    #[command(subcommand)]
    command: ChangesetsCommand,
}

#[derive(Subcommand, Debug, Clone)]
enum ChangesetsCommand {
    /// List recent changesets
    List {
        /// Only changesets of this repository
        #[arg(long)]
        repository: Option<u64>,
        /// Page number, starting at 1
        #[arg(long)]
        page: Option<u32>,
        /// Changesets per page (at most 30)
        #[arg(long)]
        per_page: Option<u32>,
    },
}

pub async fn execute(
    args: ChangesetsArgs,
    client: &Client,
    renderer: &OutputRenderer,
) -> Result<()> {
    let ChangesetsCommand::List {
        repository,
        page,
        per_page,
    } = args.command;

    let changesets = match repository {
        Some(id) => changesets::for_repository(client, id, page, per_page)
            .await
            .with_context(|| format!("Failed to list changesets for repository {id}"))?,
        None => changesets::list(client, page, per_page)
            .await
            .context("Failed to list changesets")?,
    };

    #[derive(Serialize)]
    struct Row<'a> {
        repository_id: u64,
        revision: &'a str,
        author: &'a str,
        time: &'a str,
        message: &'a str,
    }

    let rows: Vec<Row<'_>> = changesets
        .iter()
        .map(|changeset| Row {
            repository_id: changeset.repository_id,
            revision: &changeset.revision,
            author: changeset.author.as_deref().unwrap_or(""),
            time: changeset.time.as_deref().unwrap_or(""),
            message: changeset
                .message
                .as_deref()
                .and_then(|m| m.lines().next())
                .unwrap_or(""),
        })
        .collect();

    if rows.is_empty() {
        tracing::info!("No changesets found.");
        return Ok(());
    }

    renderer.render(&rows)
}
