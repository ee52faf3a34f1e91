use clap::{Parser, Subcommand};
use limo_gateway_sdk::{ClientError, GatewayClient, GatewayRequest, Payload};
use reqwest::Method;
use serde_json::Value;

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Command-line client for the limo booking gateway", long_about = None)]
struct Cli {
    /// Gateway endpoint, including the mount path.
    #[arg(short, long, default_value = "http://localhost:8080/api.php")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// GET an upstream path through the gateway
    Get {
        path: String,
        /// Extra query pairs, as key=value
        #[arg(short, long = "query", value_parser = parse_pair)]
        query: Vec<(String, String)>,
    },
    /// Send a request with an optional JSON body
    Send {
        method: Method,
        path: String,
        #[arg(long)]
        json: Option<String>,
    },
    /// Check gateway liveness
    Health,
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got `{}`", raw))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = GatewayClient::new(&cli.url)?;

    let result = match cli.command {
        Commands::Get { path, query } => {
            let mut req = GatewayRequest::get();
            req.query = query;
            client.request(&path, req).await
        }
        Commands::Send { method, path, json } => {
            let body = json.map(|raw| serde_json::from_str::<Value>(&raw)).transpose()?;
            let req = GatewayRequest {
                method,
                query: Vec::new(),
                body,
            };
            client.request(&path, req).await
        }
        Commands::Health => {
            let health = health_url(&cli.url)?;
            let res = reqwest::get(health).await?;
            let status = res.status();
            let text = res.text().await?;
            if !status.is_success() {
                eprintln!("Error: gateway returned status {}", status);
            }
            println!("{}", text);
            return Ok(());
        }
    };

    match result {
        Ok(payload) => print_payload(&payload)?,
        Err(ClientError::Gateway { status, message }) => {
            eprintln!("Error: gateway returned status {}: {}", status, message);
            std::process::exit(1);
        }
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

fn health_url(endpoint: &str) -> Result<url::Url, url::ParseError> {
    let mut url = url::Url::parse(endpoint)?;
    url.set_path("/healthz");
    url.set_query(None);
    Ok(url)
}

fn print_payload(payload: &Payload) -> Result<(), serde_json::Error> {
    match payload {
        Payload::Json(value) => println!("{}", serde_json::to_string_pretty(value)?),
        Payload::Text(text) => println!("{}", text),
    }
    Ok(())
}
