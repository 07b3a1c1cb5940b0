//! Syntestify Server CLI
//!
//! Starts the HTTP server for project, requirement, and test-case
//! management plus test-case generation.

use anyhow::Context;
use std::env;
use std::process;
use syntestify_server::config::ServerConfig;
use syntestify_server::start_server;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut config = if args.len() > 2 && args[1] == "--config" {
        let config_path = &args[2];
        ServerConfig::from_file(config_path)
            .with_context(|| format!("loading {}", config_path))?
    } else if args.len() > 1 && args[1] == "--help" {
        print_help();
        process::exit(0);
    } else {
        eprintln!("Warning: No config file specified, using default configuration");
        eprintln!("Usage: syntestify-server --config <path-to-config.toml>");
        eprintln!();
        ServerConfig::default_config()
    };

    // One-time environment fallback for the credential; handlers never read
    // the environment themselves
    if config.openai.api_key.is_none() {
        if let Ok(key) = env::var("OPENAI_API_KEY") {
            if !key.is_empty() {
                config.openai.api_key = Some(key);
            }
        }
    }

    start_server(config).await?;

    Ok(())
}

fn print_help() {
    println!("Syntestify Server - Requirements and Test-Case Generation API");
    println!();
    println!("USAGE:");
    println!("    syntestify-server --config <path-to-config.toml>");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file");
    println!("    --help             Print this help message");
    println!();
    println!("CONFIGURATION:");
    println!("    The TOML config file may contain:");
    println!("    - bind_address: IP address to bind (default: '127.0.0.1')");
    println!("    - bind_port: Port number (default: 8080)");
    println!("    - database_path: SQLite database file (default: 'syntestify.db')");
    println!("    - [openai] api_key, endpoint, model");
    println!();
    println!("    When [openai].api_key is absent, the OPENAI_API_KEY environment");
    println!("    variable is read once at startup as a fallback.");
    println!();
}
