use std::path::PathBuf;
use std::time::Duration;

use crate::cache::MemoPolicy;

/// Separator inserted between documents when a request resolves more than one.
pub const DEFAULT_SEPARATOR: &str = "\n\n---\n\n";

/// PatternFly documentation content root.
const PF_EXTERNAL: &str = "https://raw.githubusercontent.com/patternfly/patternfly-org/refs/heads/main/packages/documentation-site/patternfly-docs/content";

/// PatternFly charts source root.
const PF_EXTERNAL_CHARTS: &str = "https://raw.githubusercontent.com/patternfly/patternfly-react/refs/heads/main/packages/react-charts/src";

/// Immutable run-time configuration.
///
/// Built once at startup from CLI arguments and passed explicitly to the
/// components that need it, so tests can construct isolated instances.
#[derive(Debug, Clone)]
pub struct Options {
    pub name: &'static str,
    pub version: &'static str,

    /// Root directory for local documentation files.
    pub docs_path: PathBuf,
    /// Serve local documentation from the working directory root instead of
    /// its `documentation/` subdirectory.
    pub docs_host: bool,
    /// Separator between joined document contents.
    pub separator: String,

    /// Resource-level cache policy for remote URL fetches.
    pub fetch_url_memo: MemoPolicy,
    /// Resource-level cache policy for local file reads.
    pub read_file_memo: MemoPolicy,
    /// Tool-level cache policy for the `usePatternFlyDocs` tool.
    pub use_patternfly_docs_memo: MemoPolicy,
    /// Tool-level cache policy for the `fetchDocs` tool.
    pub fetch_docs_memo: MemoPolicy,

    /// PatternFly docs content root URL.
    pub pf_external: String,
    /// PatternFly design guidelines URL.
    pub pf_external_design: String,
    /// PatternFly design guidelines' components' URL.
    pub pf_external_design_components: String,
    /// PatternFly design guidelines' layouts' URL.
    pub pf_external_design_layouts: String,
    /// PatternFly accessibility URL.
    pub pf_external_accessibility: String,
    /// PatternFly charts root URL.
    pub pf_external_charts: String,
    /// PatternFly charts' components' URL.
    pub pf_external_charts_components: String,
    /// PatternFly charts' design guidelines URL.
    pub pf_external_charts_design: String,
}

impl Options {
    pub fn new(docs_path: Option<PathBuf>, docs_host: bool) -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let docs_path = match docs_path {
            Some(path) => path,
            None if docs_host => cwd,
            None => cwd.join("documentation"),
        };

        let pf_external_design = format!("{PF_EXTERNAL}/design-guidelines");

        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            docs_path,
            docs_host,
            separator: DEFAULT_SEPARATOR.to_string(),
            fetch_url_memo: MemoPolicy {
                capacity: 100,
                ttl: Duration::from_secs(3 * 60),
                cache_failures: false,
            },
            read_file_memo: MemoPolicy {
                capacity: 50,
                ttl: Duration::from_secs(2 * 60),
                cache_failures: false,
            },
            use_patternfly_docs_memo: MemoPolicy {
                capacity: 10,
                ttl: Duration::from_secs(60),
                cache_failures: false,
            },
            fetch_docs_memo: MemoPolicy {
                capacity: 15,
                ttl: Duration::from_secs(60),
                cache_failures: false,
            },
            pf_external_design_components: format!("{pf_external_design}/components"),
            pf_external_design_layouts: format!("{pf_external_design}/layouts"),
            pf_external_design,
            pf_external_accessibility: format!("{PF_EXTERNAL}/accessibility"),
            pf_external_charts_components: format!("{PF_EXTERNAL_CHARTS}/victory/components"),
            pf_external_charts_design: format!("{PF_EXTERNAL_CHARTS}/charts"),
            pf_external: PF_EXTERNAL.to_string(),
            pf_external_charts: PF_EXTERNAL_CHARTS.to_string(),
        }
    }
}
