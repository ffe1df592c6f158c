use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use serde_json::Value;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Pretty
        } else {
            Self::Raw
        }
    }
}

/// One completed exchange, as printed by `call` and `send`.
#[derive(Debug, Serialize)]
pub struct Exchange<'a> {
    pub pipe: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<&'a str>,
    pub request_size: usize,
    pub response_size: usize,
    pub response: Value,
}

impl<'a> Exchange<'a> {
    /// The response is embedded as JSON when it parses as JSON and as a string
    /// otherwise.
    pub fn new(pipe: &'a str, service: Option<&'a str>, request: &str, response: &str) -> Self {
        Self {
            pipe,
            service,
            request_size: request.len(),
            response_size: response.len(),
            response: serde_json::from_str(response)
                .unwrap_or_else(|_| Value::String(response.to_string())),
        }
    }
}

pub fn print_exchange(exchange: &Exchange<'_>, raw_response: &str, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(exchange).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["PIPE", "SERVICE", "SENT", "RECEIVED", "RESPONSE"])
                .add_row(vec![
                    exchange.pipe.to_string(),
                    exchange.service.unwrap_or("-").to_string(),
                    exchange.request_size.to_string(),
                    exchange.response_size.to_string(),
                    raw_response.to_string(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => match &exchange.response {
            Value::String(text) => println!("{text}"),
            value => println!(
                "{}",
                serde_json::to_string_pretty(value).unwrap_or_else(|_| raw_response.to_string())
            ),
        },
        OutputFormat::Raw => print_raw(raw_response.as_bytes()),
    }
}

/// Print a single key/value record (used by `path`).
pub fn print_record(fields: &[(&str, &str)], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let map: serde_json::Map<String, Value> = fields
                .iter()
                .map(|(key, value)| (key.to_string(), Value::String(value.to_string())))
                .collect();
            println!("{}", Value::Object(map));
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "VALUE"]);
            for (key, value) in fields {
                table.add_row(vec![key.to_string(), value.to_string()]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for (key, value) in fields {
                println!("{key}: {value}");
            }
        }
        OutputFormat::Raw => {
            if let Some((_, value)) = fields.last() {
                println!("{value}");
            }
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_response_is_embedded() {
        let exchange = Exchange::new("seafile", Some("rpc"), "[]", r#"{"ret":1}"#);

        let encoded = serde_json::to_value(&exchange).unwrap();

        assert_eq!(encoded["response"]["ret"], 1);
        assert_eq!(encoded["service"], "rpc");
        assert_eq!(encoded["request_size"], 2);
    }

    #[test]
    fn text_response_stays_a_string() {
        let exchange = Exchange::new("seafile", None, "ping", "ok");

        let encoded = serde_json::to_value(&exchange).unwrap();

        assert_eq!(encoded["response"], "ok");
        assert_eq!(encoded["response_size"], 2);
        assert!(encoded.get("service").is_none());
    }
}
