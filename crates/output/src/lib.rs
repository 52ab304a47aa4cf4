use std::collections::BTreeSet;

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;
use serde_json::{Map, Value};
use tabled::builder::Builder;
use tabled::settings::Style;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
}

pub struct OutputRenderer {
    format: OutputFormat,
}

impl OutputRenderer {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn render<T: Serialize>(&self, value: &T) -> Result<()> {
        println!("{}", self.render_to_string(value)?);
        Ok(())
    }

    /// Render `value` in the configured format without printing it.
    ///
    /// JSON and YAML show the payload as given; only tables strip record
    /// envelopes.
    pub fn render_to_string<T: Serialize>(&self, value: &T) -> Result<String> {
        let value = serde_json::to_value(value)?;

        let rendered = match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&value)?,
            OutputFormat::Yaml => serde_yaml::to_string(&value)?.trim_end().to_string(),
            OutputFormat::Table => {
                let value = unwrap_envelopes(value);
                match table(&value) {
                    Some(table) => table,
                    None => serde_json::to_string_pretty(&value)?,
                }
            }
        };

        Ok(rendered)
    }
}

/// Strip Beanstalk's single-key record wrappers, so
/// `[{"user": {...}}, ...]` renders as `[{...}, ...]`.
fn unwrap_envelopes(value: Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.into_iter().map(unwrap_record).collect()),
        other => unwrap_record(other),
    }
}

fn unwrap_record(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.len() == 1 && map.values().all(Value::is_object) => {
            map.values_mut().next().map(Value::take).unwrap_or(Value::Null)
        }
        other => other,
    }
}

fn table(value: &Value) -> Option<String> {
    let records: Vec<&Map<String, Value>> = match value {
        Value::Array(items) if !items.is_empty() => {
            items.iter().map(Value::as_object).collect::<Option<_>>()?
        }
        Value::Object(map) => vec![map],
        _ => return None,
    };

    let headers: BTreeSet<&str> = records
        .iter()
        .flat_map(|record| record.keys().map(String::as_str))
        .collect();
    if headers.is_empty() {
        return None;
    }

    let mut builder = Builder::default();
    builder.push_record(headers.iter().copied());
    for record in &records {
        builder.push_record(
            headers
                .iter()
                .map(|header| record.get(*header).map(cell).unwrap_or_default()),
        );
    }

    Some(builder.build().with(Style::rounded()).to_string())
}

fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}
