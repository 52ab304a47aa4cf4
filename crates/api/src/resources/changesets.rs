use serde::{Deserialize, Serialize};

use crate::client::Client;
use crate::error::Result;
use crate::request::Request;

/// The API caps `per_page` at 30.
pub const MAX_PER_PAGE: u32 = 30;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Changeset {
    #[serde(default)]
    pub id: Option<u64>,
    pub repository_id: u64,
    pub revision: String,
    #[serde(default)]
    pub hash_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<u64>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
}

#[derive(Deserialize)]
struct Envelope {
    revision_cache: Changeset,
}

/// Recent changesets across every repository of the account.
pub async fn list(
    client: &Client,
    page: Option<u32>,
    per_page: Option<u32>,
) -> Result<Vec<Changeset>> {
    let request = paginate(Request::get("changesets.json"), page, per_page);
    fetch(client, &request).await
}

pub async fn for_repository(
    client: &Client,
    repository_id: u64,
    page: Option<u32>,
    per_page: Option<u32>,
) -> Result<Vec<Changeset>> {
    let request = Request::get("changesets/repository.json").query("repository_id", repository_id);
    let request = paginate(request, page, per_page);
    fetch(client, &request).await
}

fn paginate(mut request: Request, page: Option<u32>, per_page: Option<u32>) -> Request {
    if let Some(page) = page {
        request = request.query("page", page);
    }
    if let Some(per_page) = per_page {
        request = request.query("per_page", per_page.clamp(1, MAX_PER_PAGE));
    }
    request
}

async fn fetch(client: &Client, request: &Request) -> Result<Vec<Changeset>> {
    let envelopes: Vec<Envelope> = client.fetch(request).await?;
    Ok(envelopes.into_iter().map(|e| e.revision_cache).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginate_orders_and_caps() {
        let request = paginate(
            Request::get("changesets/repository.json").query("repository_id", 4),
            Some(2),
            Some(100),
        );
        let query: Vec<(&str, &str)> = request
            .query
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(
            query,
            vec![("repository_id", "4"), ("page", "2"), ("per_page", "30")]
        );
    }

    #[test]
    fn test_paginate_skips_missing_values() {
        let request = paginate(Request::get("changesets.json"), None, None);
        assert!(request.query.is_empty());
    }
}
