use std::sync::Arc;

use rmcp::transport::sse_server::SseServer;
use rmcp::{ServiceExt, transport::stdio};
use tracing_subscriber::{self, layer::SubscriberExt, util::SubscriberInitExt};

use crate::mcp::PatternFlyDocs;
use crate::options::Options;

// start sse server
pub async fn start_sse_server(addr: &str, options: Arc<Options>) -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".to_string().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let service = PatternFlyDocs::new(options);
    let ct = SseServer::serve(addr.parse()?)
        .await?
        .with_service(move || service.clone());

    tokio::signal::ctrl_c().await?;
    ct.cancel();
    Ok(())
}

// start stdio server
pub async fn start_stdio_server(options: Arc<Options>) -> anyhow::Result<()> {
    // Log to stderr: stdout carries the MCP protocol stream.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    tracing::info!(
        "{} v{} running on stdio, docs path {}",
        options.name,
        options.version,
        options.docs_path.display()
    );

    let service = PatternFlyDocs::new(options)
        .serve(stdio())
        .await
        .inspect_err(|e| {
            tracing::error!("serving error: {:?}", e);
        })?;

    service.waiting().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::{CallToolRequestParam, ClientCapabilities, ClientInfo, Implementation};
    use rmcp::{ServiceExt, transport::SseTransport};
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_sse_server_round_trip() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("welcome.md"), "  # Welcome  ").unwrap();
        let options = Arc::new(Options::new(Some(dir.path().to_path_buf()), false));

        let server = SseServer::serve("127.0.0.1:0".parse().unwrap())
            .await
            .unwrap();
        let port = server.config.bind.port();
        let service = PatternFlyDocs::new(options);
        let ct = server.with_service(move || service.clone());

        let transport = SseTransport::start(&format!("http://127.0.0.1:{port}/sse"))
            .await
            .unwrap();

        let client_info = ClientInfo {
            protocol_version: Default::default(),
            capabilities: ClientCapabilities::default(),
            client_info: Implementation {
                name: "test sse client".to_string(),
                version: "0.0.1".to_string(),
            },
        };
        let client = client_info.serve(transport).await.unwrap();

        let tools = client.list_tools(Default::default()).await.unwrap();
        let names: Vec<_> = tools.tools.iter().map(|t| t.name.clone()).collect();
        assert!(names.iter().any(|name| name == "usePatternFlyDocs"));
        assert!(names.iter().any(|name| name == "fetchDocs"));

        let result = client
            .call_tool(CallToolRequestParam {
                name: "fetchDocs".into(),
                arguments: serde_json::json!({ "urlList": ["welcome.md"] })
                    .as_object()
                    .cloned(),
            })
            .await
            .unwrap();

        ct.cancel();

        assert!(
            result
                .content
                .iter()
                .any(|c| c.as_text().unwrap().text == "# Welcome")
        );
    }
}
