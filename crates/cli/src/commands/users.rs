use anyhow::{Context, Result};
use beanstalk_api::resources::users::{self, User};
use beanstalk_api::Client;
use beanstalk_output::OutputRenderer;
use clap::{Args, Subcommand};
use serde::Serialize;

#[derive(Args, Debug, Clone)]
pub struct UsersArgs {
    #[command(subcommand)]
    command: UsersCommand,
}

#[derive(Subcommand, Debug, Clone)]
enum UsersCommand {
    /// List users in the account
    List,
    /// Show a single user
    Get {
        /// User ID
        id: u64,
    },
}

#[derive(Serialize)]
struct Row<'a> {
    id: u64,
    login: &'a str,
    name: &'a str,
    email: &'a str,
    admin: bool,
    owner: bool,
}

impl<'a> From<&'a User> for Row<'a> {
    fn from(user: &'a User) -> Self {
        Row {
            id: user.id,
            login: &user.login,
            name: user.name.as_deref().unwrap_or(""),
            email: user.email.as_deref().unwrap_or(""),
            admin: user.admin,
            owner: user.owner,
        }
    }
}

pub async fn execute(args: UsersArgs, client: &Client, renderer: &OutputRenderer) -> Result<()> {
    match args.command {
        UsersCommand::List => {
            let all = users::list(client).await.context("Failed to list users")?;
            let rows: Vec<Row<'_>> = all.iter().map(Row::from).collect();
            renderer.render(&rows)
        }
        UsersCommand::Get { id } => {
            let user = users::get(client, id)
                .await
                .with_context(|| format!("Failed to get user {id}"))?;
            renderer.render(&user)
        }
    }
}

pub async fn whoami(client: &Client, renderer: &OutputRenderer) -> Result<()> {
    let user = users::current(client)
        .await
        .context("Failed to fetch the current user")?;
    renderer.render(&Row::from(&user))
}
