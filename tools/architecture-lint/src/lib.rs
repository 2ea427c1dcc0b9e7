//! Repo-local architectural lint for the layer invocation contract.
//!
//! The backend is layered as Handler → Service → Repository / Adapter and
//! laid out hexagonally (`domain` + ports, inbound adapters, outbound
//! adapters). This crate parses the backend sources with `syn` and reports:
//!
//! - `domain` code depending on adapter modules (`inbound`, `outbound`) or
//!   on HTTP framework/client crates
//! - `inbound` code depending on `outbound` modules or the HTTP client
//! - `inbound` code naming a driven port (`*Repository`, `*Gateway`), which
//!   would let a handler skip the service layer
//! - `outbound` code depending on `inbound` modules or the HTTP framework
//! - `inbound` route registrations `.to(handler)` whose handler is not a
//!   `boundary(...)` call
//!
//! Run with `cargo run -p architecture-lint`.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use syn::visit::Visit;

/// Name of the backend library crate as seen from integration code.
const BACKEND_CRATE: &str = "crud_backend";

/// Wrapper every route handler must be registered through.
const BOUNDARY_FN: &str = "boundary";

/// A single boundary violation discovered by the linter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File path relative to `backend/src`.
    pub file: PathBuf,
    /// Human-readable description of the violated rule.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file.display(), self.message)
    }
}

/// Failure modes returned by the architecture lint.
#[derive(Debug, thiserror::Error)]
pub enum ArchitectureLintError {
    /// Filesystem traversal or reading failed.
    #[error("I/O error while linting architecture: {0}")]
    Io(#[from] io::Error),
    /// Rust source parsing failed.
    #[error("failed to parse {} while linting architecture: {message}", file.display())]
    Parse {
        /// Offending file relative to `backend/src`.
        file: PathBuf,
        /// Parser message.
        message: String,
    },
    /// One or more boundary violations were found.
    #[error("{}", render_violations(.0))]
    Violations(Vec<Violation>),
}

fn render_violations(violations: &[Violation]) -> String {
    let mut out = String::from("Architecture boundary violations:");
    for violation in violations {
        out.push_str("\n- ");
        out.push_str(&violation.to_string());
    }
    out
}

/// Lint the backend crate sources on disk.
///
/// `backend_dir` must be the `backend/` directory at the repository root.
pub fn lint_backend_sources(backend_dir: &Path) -> Result<(), ArchitectureLintError> {
    let src_dir = backend_dir.join("src");
    let sources = collect_lint_sources(&src_dir)?;
    lint_sources(&sources)
}

/// Lint the provided Rust sources. Intended for unit and behaviour tests.
pub fn lint_sources(sources: &[LintSource]) -> Result<(), ArchitectureLintError> {
    let mut violations = Vec::new();

    for source in sources {
        let layer = Layer::infer_from_path(&source.file).ok_or_else(|| {
            ArchitectureLintError::Parse {
                file: source.file.clone(),
                message: "unable to infer layer from file path".to_owned(),
            }
        })?;
        let parsed =
            syn::parse_file(&source.contents).map_err(|err| ArchitectureLintError::Parse {
                file: source.file.clone(),
                message: err.to_string(),
            })?;
        violations.extend(
            check_file(layer, &parsed)
                .into_iter()
                .map(|message| Violation {
                    file: source.file.clone(),
                    message,
                }),
        );
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ArchitectureLintError::Violations(violations))
    }
}

/// A Rust source file to be linted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintSource {
    /// Path relative to `backend/src`.
    pub file: PathBuf,
    /// File contents.
    pub contents: String,
}

/// Layer inferred from the first path component under `backend/src`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    Domain,
    Inbound,
    Outbound,
}

impl Layer {
    fn infer_from_path(relative_path: &Path) -> Option<Self> {
        let first = relative_path
            .components()
            .next()?
            .as_os_str()
            .to_string_lossy();
        match first.as_ref() {
            "domain" => Some(Self::Domain),
            "inbound" => Some(Self::Inbound),
            "outbound" => Some(Self::Outbound),
            _ => None,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
        }
    }

    fn forbidden_modules(self) -> &'static [&'static str] {
        match self {
            Self::Domain => &["inbound", "outbound"],
            Self::Inbound => &["outbound"],
            Self::Outbound => &["inbound"],
        }
    }

    fn forbids_crate(self, root: &str) -> bool {
        let framework = root == "actix" || root.starts_with("actix_");
        let client = matches!(root, "reqwest" | "awc");
        match self {
            Self::Domain => framework || client,
            Self::Inbound => root == "reqwest",
            Self::Outbound => framework,
        }
    }
}

fn check_file(layer: Layer, parsed: &syn::File) -> BTreeSet<String> {
    let mut collector = Collector::default();
    collector.visit_file(parsed);
    let name = layer.name();

    let mut messages = BTreeSet::new();
    for segments in &collector.paths {
        if let Some(root) = internal_module_root(segments)
            .filter(|root| layer.forbidden_modules().contains(root))
        {
            messages.insert(format!("{name} module must not depend on crate::{root}"));
        }
        if let Some(root) = external_crate_root(segments).filter(|root| layer.forbids_crate(root)) {
            messages.insert(format!(
                "{name} module must not depend on external crate `{root}`"
            ));
        }
        if layer == Layer::Inbound {
            if let Some(port) = segments.iter().find(|s| is_driven_port(s)) {
                messages.insert(format!(
                    "inbound module must reach services through driving ports, not `{port}`"
                ));
            }
        }
    }
    if layer == Layer::Inbound {
        for handler in &collector.unwrapped_routes {
            messages.insert(format!(
                "route handler `{handler}` must be registered through {BOUNDARY_FN}(...)"
            ));
        }
    }
    messages
}

fn is_driven_port(segment: &str) -> bool {
    ["Repository", "Gateway"]
        .iter()
        .any(|suffix| segment.len() > suffix.len() && segment.ends_with(suffix))
}

fn is_relative_module_segment(segment: &str) -> bool {
    matches!(segment, "crate" | "self" | "super")
}

fn internal_module_root(segments: &[String]) -> Option<&str> {
    let first = segments.first()?.as_str();
    if matches!(first, "domain" | "inbound" | "outbound") {
        return Some(first);
    }
    let start = match first {
        "crate" | "self" | "super" => segments
            .iter()
            .position(|segment| !is_relative_module_segment(segment))?,
        BACKEND_CRATE => 1,
        _ => return None,
    };
    segments.get(start).map(String::as_str)
}

fn external_crate_root(segments: &[String]) -> Option<&str> {
    let root = segments.first()?.as_str();
    if is_relative_module_segment(root) || root == BACKEND_CRATE {
        return None;
    }
    Some(root)
}

fn is_boundary_call(expr: &syn::Expr) -> bool {
    match expr {
        syn::Expr::Call(call) => match call.func.as_ref() {
            syn::Expr::Path(path) => path
                .path
                .segments
                .last()
                .is_some_and(|segment| segment.ident == BOUNDARY_FN),
            _ => false,
        },
        syn::Expr::Paren(inner) => is_boundary_call(&inner.expr),
        _ => false,
    }
}

fn describe_expr(expr: &syn::Expr) -> String {
    match expr {
        syn::Expr::Path(path) => path
            .path
            .segments
            .iter()
            .map(|segment| segment.ident.to_string())
            .collect::<Vec<_>>()
            .join("::"),
        syn::Expr::Call(call) => format!("{}(...)", describe_expr(&call.func)),
        syn::Expr::Closure(_) => "<closure>".to_owned(),
        _ => "<expression>".to_owned(),
    }
}

#[derive(Default)]
struct Collector {
    paths: BTreeSet<Vec<String>>,
    unwrapped_routes: BTreeSet<String>,
}

impl Collector {
    fn record_path(&mut self, path: &syn::Path) {
        let segments: Vec<String> = path
            .segments
            .iter()
            .map(|segment| segment.ident.to_string())
            .collect();
        if !segments.is_empty() {
            self.paths.insert(segments);
        }
    }

    fn record_use_tree(&mut self, tree: &syn::UseTree, mut prefix: Vec<String>) {
        match tree {
            syn::UseTree::Path(path) => {
                prefix.push(path.ident.to_string());
                self.record_use_tree(&path.tree, prefix);
            }
            syn::UseTree::Name(name) => {
                prefix.push(name.ident.to_string());
                self.paths.insert(prefix);
            }
            syn::UseTree::Rename(rename) => {
                prefix.push(rename.ident.to_string());
                self.paths.insert(prefix);
            }
            syn::UseTree::Glob(_) => {
                prefix.push("*".to_owned());
                self.paths.insert(prefix);
            }
            syn::UseTree::Group(group) => {
                for item in &group.items {
                    self.record_use_tree(item, prefix.clone());
                }
            }
        }
    }
}

impl<'ast> Visit<'ast> for Collector {
    fn visit_path(&mut self, node: &'ast syn::Path) {
        self.record_path(node);
        syn::visit::visit_path(self, node);
    }

    fn visit_item_use(&mut self, node: &'ast syn::ItemUse) {
        self.record_use_tree(&node.tree, Vec::new());
    }

    fn visit_expr_method_call(&mut self, node: &'ast syn::ExprMethodCall) {
        if node.method == "to" && node.args.len() == 1 {
            if let Some(handler) = node.args.first().filter(|arg| !is_boundary_call(arg)) {
                self.unwrapped_routes.insert(describe_expr(handler));
            }
        }
        syn::visit::visit_expr_method_call(self, node);
    }
}

fn collect_lint_sources(src_dir: &Path) -> Result<Vec<LintSource>, ArchitectureLintError> {
    let mut sources = Vec::new();
    for layer_dir in ["domain", "inbound", "outbound"] {
        let dir = src_dir.join(layer_dir);
        if dir.exists() {
            collect_sources_under(src_dir, &dir, &mut sources)?;
        }
    }
    Ok(sources)
}

fn collect_sources_under(
    src_root: &Path,
    current: &Path,
    sources: &mut Vec<LintSource>,
) -> Result<(), ArchitectureLintError> {
    let mut entries = fs::read_dir(current)?.collect::<Result<Vec<_>, _>>()?;
    entries.sort_by_key(fs::DirEntry::path);
    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            collect_sources_under(src_root, &path, sources)?;
            continue;
        }
        if path.extension().and_then(|ext| ext.to_str()) != Some("rs") {
            continue;
        }
        let relative = path
            .strip_prefix(src_root)
            .map_err(|err| ArchitectureLintError::Parse {
                file: path.clone(),
                message: err.to_string(),
            })?
            .to_path_buf();
        let contents = fs::read_to_string(&path)?;
        sources.push(LintSource {
            file: relative,
            contents,
        });
    }
    Ok(())
}
