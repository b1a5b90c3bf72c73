//! Example MCP client for a running SSE server.
//!
//! Start the server first:
//!
//! ```sh
//! cargo run -- --server-type sse --address 127.0.0.1:8080
//! ```

use rmcp::model::{CallToolRequestParam, ClientCapabilities, ClientInfo, Implementation};
use rmcp::{ServiceExt, transport::SseTransport};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let transport = SseTransport::start("http://127.0.0.1:8080/sse").await?;

    let client_info = ClientInfo {
        protocol_version: Default::default(),
        capabilities: ClientCapabilities::default(),
        client_info: Implementation {
            name: "patternfly-mcp demo client".to_string(),
            version: "0.0.1".to_string(),
        },
    };
    let client = client_info.serve(transport).await?;

    let tools = client.list_tools(Default::default()).await?;
    println!(
        "Available tools: {:?}",
        tools.tools.iter().map(|t| t.name.clone()).collect::<Vec<_>>()
    );

    let result = client
        .call_tool(CallToolRequestParam {
            name: "fetchDocs".into(),
            arguments: serde_json::json!({
                "urlList": [
                    "https://raw.githubusercontent.com/patternfly/patternfly-org/refs/heads/main/packages/documentation-site/patternfly-docs/content/accessibility/about-accessibility.md"
                ]
            })
            .as_object()
            .cloned(),
        })
        .await?;

    for content in result.content {
        if let Some(text) = content.as_text() {
            let preview: String = text.text.chars().take(400).collect();
            println!("Response preview: {preview}...");
        }
    }

    Ok(())
}
