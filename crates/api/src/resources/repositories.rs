use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Repository {
    pub id: u64,
    #[serde(default)]
    pub account_id: Option<u64>,
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub vcs: Option<String>,
    #[serde(rename = "type", default)]
    pub repository_type: Option<String>,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub color_label: Option<String>,
    #[serde(default)]
    pub storage_used_bytes: Option<u64>,
    #[serde(default)]
    pub last_commit_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Deserialize)]
struct Envelope {
    repository: Repository,
}

pub async fn list(client: &Client) -> Result<Vec<Repository>> {
    let envelopes: Vec<Envelope> = client.get("repositories.json").await?;
    Ok(envelopes.into_iter().map(|e| e.repository).collect())
}

pub async fn get(client: &Client, id: u64) -> Result<Repository> {
    let envelope: Envelope = client.get(&format!("repositories/{id}.json")).await?;
    Ok(envelope.repository)
}
