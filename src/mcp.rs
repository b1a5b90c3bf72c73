//! MCP surface: the two documentation tools and the protocol handler.
//!
//! Tools are registered through a hand-written [`ServerHandler`]
//! implementation rather than the declarative `#[tool]` macro: the tool
//! contract fixes the exact validation messages for a malformed `urlList`
//! argument, and those must be produced before any cache lookup or fetch.

use std::sync::Arc;

use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, Implementation, JsonObject, ListToolsResult,
    PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::RequestContext;
use rmcp::{Error as McpError, RoleServer, ServerHandler};

use crate::cache::{MemoCache, cache_key};
use crate::docs::{DocFetcher, DocsError};
use crate::options::Options;

pub const FETCH_DOCS: &str = "fetchDocs";
pub const USE_PATTERNFLY_DOCS: &str = "usePatternFlyDocs";

/// MCP server handler exposing the documentation tools.
///
/// Holds one [`DocFetcher`] (with its two resource-level caches) plus an
/// isolated tool-level cache per tool.
#[derive(Clone)]
pub struct PatternFlyDocs {
    fetcher: Arc<DocFetcher>,
    options: Arc<Options>,
    pf_docs_cache: MemoCache<String, DocsError>,
    fetch_docs_cache: MemoCache<String, DocsError>,
}

impl PatternFlyDocs {
    pub fn new(options: Arc<Options>) -> Self {
        Self {
            fetcher: Arc::new(DocFetcher::new(&options)),
            pf_docs_cache: MemoCache::new(options.use_patternfly_docs_memo),
            fetch_docs_cache: MemoCache::new(options.fetch_docs_memo),
            options,
        }
    }

    /// `usePatternFlyDocs` callback: PatternFly-aware documentation lookup.
    pub async fn use_patternfly_docs(
        &self,
        arguments: Option<&JsonObject>,
    ) -> Result<CallToolResult, McpError> {
        let url_list = parse_url_list(arguments)?;
        self.bundle(&self.pf_docs_cache, &url_list).await
    }

    /// `fetchDocs` callback: generic path/URL documentation lookup.
    pub async fn fetch_docs(
        &self,
        arguments: Option<&JsonObject>,
    ) -> Result<CallToolResult, McpError> {
        let url_list = parse_url_list(arguments)?;
        self.bundle(&self.fetch_docs_cache, &url_list).await
    }

    async fn bundle(
        &self,
        cache: &MemoCache<String, DocsError>,
        url_list: &[String],
    ) -> Result<CallToolResult, McpError> {
        let key = cache_key(url_list);
        let fetcher = &self.fetcher;

        match cache.get_or_compute(&key, || fetcher.resolve(url_list)).await {
            Ok(text) => Ok(CallToolResult::success(vec![Content::text(text)])),
            Err(err) => {
                tracing::error!("Documentation resolution failed: {err}");
                Err(McpError::internal_error("Failed to fetch documentation", None))
            }
        }
    }

    pub fn tools(&self) -> Vec<Tool> {
        vec![
            Tool::new(
                USE_PATTERNFLY_DOCS,
                pf_docs_description(&self.options),
                url_list_schema(
                    "PatternFly documentation paths or URLs to load, e.g. \
                     [\"components/button.md\"]",
                ),
            ),
            Tool::new(
                FETCH_DOCS,
                "Fetch one or more documentation files by local path or absolute URL \
                 and return their combined content."
                    .to_string(),
                url_list_schema("Documentation file paths or absolute http(s) URLs"),
            ),
        ]
    }
}

/// Validates the raw `urlList` argument before any cache lookup or fetch.
fn parse_url_list(arguments: Option<&JsonObject>) -> Result<Vec<String>, McpError> {
    let value = match arguments.and_then(|args| args.get("urlList")) {
        None | Some(serde_json::Value::Null) => {
            return Err(McpError::invalid_params(
                "Missing required parameter: urlList",
                None,
            ));
        }
        Some(value) => value,
    };

    let invalid_type = || McpError::invalid_params("urlList must be an array of strings", None);

    value
        .as_array()
        .ok_or_else(invalid_type)?
        .iter()
        .map(|item| item.as_str().map(str::to_string).ok_or_else(invalid_type))
        .collect()
}

fn url_list_schema(description: &str) -> Arc<JsonObject> {
    let schema = serde_json::json!({
        "type": "object",
        "properties": {
            "urlList": {
                "type": "array",
                "items": { "type": "string" },
                "description": description,
            }
        },
        "required": ["urlList"],
    });

    match schema {
        serde_json::Value::Object(map) => Arc::new(map),
        _ => unreachable!("schema literal is an object"),
    }
}

fn pf_docs_description(options: &Options) -> String {
    format!(
        "Load PatternFly documentation for components, layouts, charts and \
         accessibility. Request the llms.txt index first to discover available \
         files, then pass the specific paths you need. Well-known external roots:\n\
         - Docs content: {}\n\
         - Design guidelines: {}\n\
         - Component guidelines: {}\n\
         - Layout guidelines: {}\n\
         - Accessibility: {}\n\
         - Charts: {}\n\
         - Chart components: {}\n\
         - Chart design guidelines: {}",
        options.pf_external,
        options.pf_external_design,
        options.pf_external_design_components,
        options.pf_external_design_layouts,
        options.pf_external_accessibility,
        options.pf_external_charts,
        options.pf_external_charts_components,
        options.pf_external_charts_design,
    )
}

impl ServerHandler for PatternFlyDocs {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "This server provides PatternFly documentation from local files and \
                 the external PatternFly mirrors. Use 'usePatternFlyDocs' for \
                 PatternFly component, layout, chart and accessibility guidance, or \
                 'fetchDocs' to load arbitrary documentation paths and URLs. Pass a \
                 'urlList' array of paths or absolute URLs; results are combined and \
                 cached for repeated access."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: PaginatedRequestParam,
        _: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            next_cursor: None,
            tools: self.tools(),
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        match request.name.as_ref() {
            USE_PATTERNFLY_DOCS => self.use_patternfly_docs(request.arguments.as_ref()).await,
            FETCH_DOCS => self.fetch_docs(request.arguments.as_ref()).await,
            other => Err(McpError::invalid_params(
                format!("Unknown tool: {other}"),
                None,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn setup_handler(docs_path: std::path::PathBuf) -> PatternFlyDocs {
        PatternFlyDocs::new(Arc::new(Options::new(Some(docs_path), false)))
    }

    fn url_list_args(value: serde_json::Value) -> Option<JsonObject> {
        serde_json::json!({ "urlList": value }).as_object().cloned()
    }

    fn result_text(result: &CallToolResult) -> String {
        result
            .content
            .iter()
            .filter_map(|content| content.as_text())
            .map(|text| text.text.clone())
            .collect()
    }

    #[test]
    fn test_tool_listing() {
        let dir = tempdir().unwrap();
        let handler = setup_handler(dir.path().to_path_buf());

        let tools = handler.tools();
        assert_eq!(tools.len(), 2);

        let names: Vec<_> = tools.iter().map(|tool| tool.name.as_ref()).collect();
        assert_eq!(names, vec!["usePatternFlyDocs", "fetchDocs"]);

        for tool in &tools {
            assert!(!tool.description.is_empty());
            let required = tool.input_schema.get("required").unwrap();
            assert_eq!(required, &serde_json::json!(["urlList"]));
        }
    }

    #[test]
    fn test_pf_tool_description_carries_url_catalog() {
        let dir = tempdir().unwrap();
        let handler = setup_handler(dir.path().to_path_buf());

        let tools = handler.tools();
        let description = tools[0].description.as_ref();

        assert!(description.contains("design-guidelines"));
        assert!(description.contains("accessibility"));
        assert!(description.contains("react-charts"));
    }

    #[tokio::test]
    async fn test_missing_url_list_parameter() {
        let dir = tempdir().unwrap();
        let handler = setup_handler(dir.path().to_path_buf());

        let empty: JsonObject = serde_json::Map::new();
        for arguments in [None, Some(&empty)] {
            let error = handler.fetch_docs(arguments).await.unwrap_err();
            assert!(error.message.contains("Missing required parameter: urlList"));
        }
    }

    #[tokio::test]
    async fn test_null_url_list_parameter() {
        let dir = tempdir().unwrap();
        let handler = setup_handler(dir.path().to_path_buf());

        let arguments = url_list_args(serde_json::Value::Null);
        let error = handler
            .use_patternfly_docs(arguments.as_ref())
            .await
            .unwrap_err();

        assert!(error.message.contains("Missing required parameter: urlList"));
    }

    #[tokio::test]
    async fn test_url_list_must_be_an_array() {
        let dir = tempdir().unwrap();
        let handler = setup_handler(dir.path().to_path_buf());

        let arguments = url_list_args(serde_json::json!("not-an-array"));
        let error = handler.fetch_docs(arguments.as_ref()).await.unwrap_err();

        assert!(error.message.contains("must be an array of strings"));
    }

    #[tokio::test]
    async fn test_url_list_items_must_be_strings() {
        let dir = tempdir().unwrap();
        let handler = setup_handler(dir.path().to_path_buf());

        let arguments = url_list_args(serde_json::json!(["fine.md", 42]));
        let error = handler.fetch_docs(arguments.as_ref()).await.unwrap_err();

        assert!(error.message.contains("must be an array of strings"));
    }

    #[tokio::test]
    async fn test_successful_call_wraps_bundle_as_text() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("components")).unwrap();
        std::fs::write(dir.path().join("components/button.md"), "  Button docs  ").unwrap();

        let handler = setup_handler(dir.path().to_path_buf());
        let arguments = url_list_args(serde_json::json!(["components/button.md"]));

        let result = handler
            .use_patternfly_docs(arguments.as_ref())
            .await
            .unwrap();

        assert_eq!(result_text(&result), "Button docs");
    }

    #[tokio::test]
    async fn test_empty_url_list_yields_empty_text() {
        let dir = tempdir().unwrap();
        let handler = setup_handler(dir.path().to_path_buf());

        let arguments = url_list_args(serde_json::json!([]));
        let result = handler.fetch_docs(arguments.as_ref()).await.unwrap();

        assert_eq!(result_text(&result), "");
    }

    #[tokio::test]
    async fn test_resolution_failure_is_normalized() {
        let dir = tempdir().unwrap();
        let handler = setup_handler(dir.path().to_path_buf());

        let arguments = url_list_args(serde_json::json!(["missing.md"]));
        let error = handler.fetch_docs(arguments.as_ref()).await.unwrap_err();

        // The backend failure detail is not leaked to the caller.
        assert_eq!(error.message, "Failed to fetch documentation");
    }

    #[tokio::test]
    async fn test_tool_level_cache_replays_bundle() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("doc.md"), "original").unwrap();

        let handler = setup_handler(dir.path().to_path_buf());
        let arguments = url_list_args(serde_json::json!(["doc.md"]));

        let first = handler.fetch_docs(arguments.as_ref()).await.unwrap();
        assert_eq!(result_text(&first), "original");

        // Within the ttl the bundle is replayed without re-reading the file.
        std::fs::write(dir.path().join("doc.md"), "changed").unwrap();
        let second = handler.fetch_docs(arguments.as_ref()).await.unwrap();
        assert_eq!(result_text(&second), "original");
    }

    #[tokio::test]
    async fn test_tool_caches_are_isolated() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("doc.md"), "original").unwrap();

        let handler = setup_handler(dir.path().to_path_buf());
        let arguments = url_list_args(serde_json::json!(["doc.md"]));

        let first = handler.fetch_docs(arguments.as_ref()).await.unwrap();
        assert_eq!(result_text(&first), "original");
        assert_eq!(handler.fetch_docs_cache.len().await, 1);
        assert!(handler.pf_docs_cache.is_empty().await);
    }
}
