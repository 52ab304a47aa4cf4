use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: u64,
    #[serde(default)]
    pub account_id: Option<u64>,
    pub login: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub owner: bool,
    #[serde(default)]
    pub admin: bool,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Deserialize)]
struct Envelope {
    user: User,
}

/// The account the client's credentials belong to.
pub async fn current(client: &Client) -> Result<User> {
    let envelope: Envelope = client.get("users/current.json").await?;
    Ok(envelope.user)
}

pub async fn list(client: &Client) -> Result<Vec<User>> {
    let envelopes: Vec<Envelope> = client.get("users.json").await?;
    Ok(envelopes.into_iter().map(|e| e.user).collect())
}

pub async fn get(client: &Client, id: u64) -> Result<User> {
    let envelope: Envelope = client.get(&format!("users/{id}.json")).await?;
    Ok(envelope.user)
}
