use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, ValueEnum};

use patternfly_mcp::options::Options;
use patternfly_mcp::server;

#[derive(Parser, Debug)]
#[command(version, about = "PatternFly Documentation MCP Server")]
struct Cli {
    /// Type of server to run
    #[arg(short, long, value_enum, default_value_t = ServerType::Stdio)]
    server_type: ServerType,

    /// Address for the SSE server
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    address: String,

    /// Root directory for local documentation files
    #[arg(long)]
    docs_path: Option<PathBuf>,

    /// Serve local documentation from the working directory root
    #[arg(long)]
    docs_host: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ServerType {
    /// Start a stdio server
    Stdio,
    /// Start an SSE server
    Sse,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let options = Arc::new(Options::new(cli.docs_path, cli.docs_host));

    match cli.server_type {
        ServerType::Sse => {
            println!("Starting SSE server on {}", cli.address);
            server::start_sse_server(&cli.address, options).await?;
        }
        ServerType::Stdio => {
            server::start_stdio_server(options).await?;
        }
    }

    Ok(())
}
