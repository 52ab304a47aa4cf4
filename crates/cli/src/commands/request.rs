use anyhow::{anyhow, Context, Result};
use beanstalk_api::{Client, Method, Request};
use beanstalk_output::OutputRenderer;
use clap::{Args, ValueEnum};
use serde_json::Value;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Method::Get,
            HttpMethod::Post => Method::Post,
            HttpMethod::Put => Method::Put,
            HttpMethod::Delete => Method::Delete,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct RequestArgs {
    /// HTTP method
    #[arg(value_enum, ignore_case = true)]
    pub method: HttpMethod,
    /// Path relative to the API root (e.g. repositories.json)
    pub path: String,
    /// Query parameter as key=value (repeatable, order is kept)
    #[arg(short, long = "query", value_name = "KEY=VALUE", value_parser = parse_query_pair)]
    pub query: Vec<(String, String)>,
    /// JSON request body
    #[arg(long)]
    pub data: Option<String>,
}

pub fn parse_query_pair(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{raw}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

pub async fn execute(args: RequestArgs, client: &Client, renderer: &OutputRenderer) -> Result<()> {
    let mut request = Request::new(args.method.into(), args.path.clone());
    request.query = args.query;

    let response = match args.data {
        Some(raw) => {
            let body: Value = serde_json::from_str(&raw)
                .map_err(|err| anyhow!("--data is not valid JSON: {err}"))?;
            client.execute(&request.body(body)).await
        }
        None => client.execute(&request).await,
    }
    .with_context(|| format!("{} {} failed", Method::from(args.method), args.path))?;

    let value: Value = client
        .decode(&response)
        .context("Response body is not valid JSON")?;
    if value.is_null() {
        tracing::info!(status = response.status, "Request succeeded with an empty body");
        return Ok(());
    }

    renderer.render(&value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query_pair() {
        assert_eq!(
            parse_query_pair("repository_id=4").unwrap(),
            ("repository_id".to_string(), "4".to_string())
        );
        assert_eq!(
            parse_query_pair("q=a=b").unwrap(),
            ("q".to_string(), "a=b".to_string())
        );
        assert_eq!(
            parse_query_pair("flag=").unwrap(),
            ("flag".to_string(), String::new())
        );
        assert!(parse_query_pair("novalue").is_err());
        assert!(parse_query_pair("=x").is_err());
    }
}
