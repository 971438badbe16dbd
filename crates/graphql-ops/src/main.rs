use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::bail;
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};
use graphql_ops::header::{HeaderMap, HeaderName, HeaderValue};
use graphql_ops::{HttpClient, Namespace, graphql};
use serde_json::Value;
use tracing::info;
use url::Url;

mod runtime;

/// Clap styling
const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// Arguments to the graphql-ops runner
#[derive(Debug, clap::Parser)]
#[command(
    styles = STYLES,
    about = "graphql-ops - run named GraphQL operations against an endpoint",
)]
struct Args {
    /// Path to the YAML config file declaring the endpoint and operations
    #[arg(long, short = 'c', env = "GRAPHQL_OPS_CONFIG")]
    config: Option<PathBuf>,

    /// Override the GraphQL endpoint from the config
    #[arg(long, short = 'e')]
    endpoint: Option<Url>,

    /// Headers to send to the endpoint, as `name: value`
    #[arg(long = "header", action = clap::ArgAction::Append)]
    headers: Vec<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run a named query
    Query(Invocation),

    /// Run a named mutation
    Mutation(Invocation),

    /// List the configured operations
    List,
}

#[derive(Debug, clap::Args)]
struct Invocation {
    /// The operation name
    name: String,

    /// The variables, as a JSON object
    #[arg(long, short = 'v')]
    variables: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => runtime::read_config(path)?,
        None => runtime::read_config_from_env()?,
    };
    let _guard = runtime::setup_logging(&config)?;

    let mut client_config = config.client_config();
    if let Some(endpoint) = args.endpoint {
        client_config.url = endpoint;
    }
    client_config.headers.extend(parse_headers(args.headers)?);

    let app = graphql(config.operations);

    match args.command {
        Command::List => {
            for name in app.queries().names() {
                println!("query {name}");
            }
            for name in app.mutations().names() {
                println!("mutation {name}");
            }
            Ok(())
        }
        Command::Query(invocation) => {
            app.initialize(Arc::new(HttpClient::new(client_config)?));
            run(app.queries(), invocation).await
        }
        Command::Mutation(invocation) => {
            app.initialize(Arc::new(HttpClient::new(client_config)?));
            run(app.mutations(), invocation).await
        }
    }
}

async fn run(namespace: &Namespace, invocation: Invocation) -> anyhow::Result<()> {
    let variables = invocation
        .variables
        .as_deref()
        .map(parse_variables)
        .transpose()?;

    info!("running {} {}", namespace.kind(), invocation.name);
    let result = namespace.call(&invocation.name, variables, None)?.await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn parse_variables(variables: &str) -> anyhow::Result<Value> {
    let value = serde_json::from_str::<Value>(variables)?;
    if !value.is_object() {
        bail!("variables must be a JSON object, got {value}");
    }
    Ok(value)
}

fn parse_headers(headers: Vec<String>) -> anyhow::Result<HeaderMap> {
    let mut parsed = HeaderMap::new();
    for header in headers {
        match header.split_once(':') {
            Some((key, value)) => {
                parsed.append(
                    HeaderName::from_str(key.trim())?,
                    HeaderValue::from_str(value.trim())?,
                );
            }
            None => bail!("invalid header: {header}"),
        }
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphql_ops::header::AUTHORIZATION;

    #[test]
    fn test_parse_headers_empty() {
        let result = parse_headers(vec![]).unwrap();

        assert!(result.is_empty());
    }

    #[test]
    fn test_parse_headers_with_colon_in_value() {
        let headers = vec!["Authorization: Bearer a:b:c".to_string()];

        let result = parse_headers(headers).unwrap();

        assert_eq!(result.get(AUTHORIZATION).unwrap(), "Bearer a:b:c");
    }

    #[test]
    fn test_parse_headers_repeated() {
        let headers = vec!["x-tag: a".to_string(), "x-tag: b".to_string()];

        let result = parse_headers(headers).unwrap();

        assert_eq!(result.get_all("x-tag").iter().count(), 2);
    }

    #[test]
    fn test_parse_headers_missing_colon() {
        let headers = vec!["Authorization; Bearer 1234567890".to_string()];

        let error = parse_headers(headers).unwrap_err();

        assert_eq!(
            error.to_string(),
            "invalid header: Authorization; Bearer 1234567890"
        );
    }

    #[test]
    fn test_parse_variables_requires_an_object() {
        assert_eq!(
            parse_variables(r#"{ "id": 1 }"#).unwrap(),
            serde_json::json!({ "id": 1 })
        );
        assert!(parse_variables("[1, 2]").is_err());
        assert!(parse_variables("not json").is_err());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "graphql-ops",
            "--config",
            "ops.yaml",
            "--header",
            "x-team: core",
            "query",
            "getUser",
            "--variables",
            r#"{"id":1}"#,
        ])
        .unwrap();

        assert_eq!(args.config, Some(PathBuf::from("ops.yaml")));
        assert_eq!(args.headers, ["x-team: core"]);
        assert!(matches!(
            args.command,
            Command::Query(Invocation { ref name, ref variables })
                if name == "getUser" && variables.as_deref() == Some(r#"{"id":1}"#)
        ));
    }
}
