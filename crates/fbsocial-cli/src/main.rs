//! fbsocial - inspect Facebook Graph API failures from the command line

mod cli;

use std::process;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use fbsocial_graph::{
    classify, ApiFailure, FacebookClient, FailureCategory, GraphConfig, GraphError, RawResponse,
    RequestContext,
};
use reqwest::StatusCode;
use serde::Serialize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// JSON shape printed for a classified response
#[derive(Debug, Serialize)]
struct FailureReport<'a> {
    category: FailureCategory,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    required_permission: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<u16>,
    reauthorize: bool,
}

impl<'a> FailureReport<'a> {
    fn new(failure: &'a ApiFailure) -> Self {
        let status = match failure {
            ApiFailure::Uncategorized { status, .. } => Some(*status),
            _ => None,
        };
        Self {
            category: failure.category(),
            message: failure.message(),
            required_permission: failure.required_permission(),
            status,
            reauthorize: failure.requires_reauthorization(),
        }
    }
}

fn classify_file(
    status: u16,
    body: &std::path::Path,
    token_supplied: bool,
) -> anyhow::Result<Option<ApiFailure>> {
    let status = StatusCode::from_u16(status)
        .with_context(|| format!("Invalid HTTP status {}", status))?;
    let bytes =
        std::fs::read(body).with_context(|| format!("Failed to read {}", body.display()))?;

    let context = RequestContext { token_supplied };
    Ok(classify(&RawResponse::new(status, bytes), context))
}

/// Split `id` or `id/connection` into its parts. Deeper paths are rejected.
fn graph_path(path: &str) -> anyhow::Result<(&str, Option<&str>)> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    match segments.as_slice() {
        [object_id] => Ok((*object_id, None)),
        [object_id, connection] => Ok((*object_id, Some(*connection))),
        [] => anyhow::bail!("Empty Graph path"),
        _ => anyhow::bail!(
            "Graph path '{}' has {} segments, expected `id` or `id/connection`",
            path,
            segments.len()
        ),
    }
}

async fn fetch(
    object_id: &str,
    connection: Option<&str>,
    anonymous: bool,
) -> Result<serde_json::Value, GraphError> {
    let mut config = GraphConfig::from_env();
    if anonymous {
        config = config.without_access_token();
    }
    let client = FacebookClient::new(config)?;

    match connection {
        Some(connection) => {
            let data: Vec<serde_json::Value> =
                client.fetch_connections(object_id, connection).await?;
            Ok(serde_json::Value::Array(data))
        }
        None => client.fetch_object(object_id).await,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("fbsocial=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Classify {
            status,
            body,
            token_supplied,
        } => {
            match classify_file(status, &body, token_supplied)? {
                Some(failure) => {
                    tracing::info!("Classified {} as {:?}", body.display(), failure.category());
                    println!("{}", serde_json::to_string_pretty(&FailureReport::new(&failure))?);
                }
                None => println!("{}", serde_json::json!({ "category": null })),
            }
        }
        Commands::Get { path, anonymous } => {
            let (object_id, connection) = graph_path(&path)?;
            match fetch(object_id, connection, anonymous).await {
                Ok(value) => println!("{}", serde_json::to_string_pretty(&value)?),
                Err(GraphError::Api(failure)) => {
                    println!("{}", serde_json::to_string_pretty(&FailureReport::new(&failure))?);
                    process::exit(1);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_includes_permission() {
        let failure = ApiFailure::InsufficientPermission {
            message: "The operation requires 'rsvp_event' permission.".to_string(),
            required_permission: Some("rsvp_event".to_string()),
        };
        let json = serde_json::to_value(FailureReport::new(&failure)).unwrap();
        assert_eq!(json["category"], "insufficient_permission");
        assert_eq!(json["required_permission"], "rsvp_event");
        assert_eq!(json["reauthorize"], false);
        assert!(json.get("status").is_none());
    }

    #[test]
    fn test_report_keeps_uncategorized_status() {
        let failure = ApiFailure::Uncategorized {
            message: "Unexpected 400 Bad Request response from Graph API".to_string(),
            status: 400,
            body: "<html></html>".to_string(),
        };
        let json = serde_json::to_value(FailureReport::new(&failure)).unwrap();
        assert_eq!(json["category"], "uncategorized");
        assert_eq!(json["status"], 400);
    }

    #[test]
    fn test_classify_file_reads_body() {
        let path = std::env::temp_dir().join(format!("fbsocial-cli-{}.json", process::id()));
        std::fs::write(
            &path,
            r#"{"error":{"message":"Unknown path components: /boguspath","code":2500}}"#,
        )
        .unwrap();

        let failure = classify_file(400, &path, true).unwrap().unwrap();
        assert_eq!(failure.category(), FailureCategory::ResourceNotFound);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_graph_path_segments() {
        assert_eq!(graph_path("me").unwrap(), ("me", None));
        assert_eq!(
            graph_path("/me/friendlists/").unwrap(),
            ("me", Some("friendlists"))
        );
        assert!(graph_path("a/b/c").is_err());
        assert!(graph_path("/").is_err());
    }

    #[test]
    fn test_classify_file_rejects_bad_status() {
        let path = std::env::temp_dir().join("does-not-matter.json");
        assert!(classify_file(1000, &path, false).is_err());
    }
}
