use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler, ServiceExt,
};
use async_trait::async_trait;
use rigshift_core::{
    catalog, AiSettings, BuildKind, ComponentCategory, ExportFormat, FileSlotStore, PcParts, SlotStore,
    Workbench,
};
use rigshift_guide::{GuideError, LlmBackend, TutorialBackend, TutorialService};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing_subscriber::EnvFilter;

// --- Request types ---

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct ListOptionsRequest {
    /// Which build the options are for: "current" or "new"
    build: BuildKind,
    /// Limit to one category; all categories when omitted
    #[serde(default)]
    category: Option<ComponentCategory>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct SetPartRequest {
    /// "current" or "new"
    build: BuildKind,
    /// One of cpu, gpu, ram, motherboard, storage, psu, os
    category: ComponentCategory,
    /// Free-text part name, e.g. "AMD Ryzen 7 5800X". Blank clears the slot.
    description: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct RemovePartRequest {
    /// "current" or "new"
    build: BuildKind,
    /// Category to clear
    category: ComponentCategory,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct CheckCompatibilityRequest {
    /// "current" or "new"
    build: BuildKind,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct ExportRequest {
    /// "text" or "pdf"
    format: ExportFormat,
    /// Directory to write into; defaults to the working directory
    #[serde(default)]
    directory: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
struct SaveAiSettingsRequest {
    /// openai, anthropic, google, ollama, groq, mistral or deepseek
    #[serde(default)]
    provider: Option<String>,
    /// Model name for the provider, e.g. "gemini-2.5-flash"
    #[serde(default)]
    model: Option<String>,
    /// API key; omitted or empty keeps the stored key
    #[serde(default)]
    api_key: Option<String>,
    /// Sampling temperature
    #[serde(default)]
    temperature: Option<f32>,
}

// --- Settings ---

type SharedSettings = Arc<Mutex<AiSettings>>;

fn lock_settings(settings: &SharedSettings) -> MutexGuard<'_, AiSettings> {
    settings.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Builds an [`LlmBackend`] from the shared settings on every request, so a
/// saved change applies to the next generation.
struct SettingsBackend(SharedSettings);

#[async_trait]
impl TutorialBackend for SettingsBackend {
    async fn complete(&self, prompt: &str, schema: &serde_json::Value) -> Result<String, GuideError> {
        let settings = lock_settings(&self.0).clone();
        LlmBackend::new(settings).complete(prompt, schema).await
    }
}

/// Masked view of the settings: never the key itself.
fn settings_view(settings: &AiSettings) -> serde_json::Value {
    serde_json::json!({
        "provider": settings.provider,
        "model": settings.model,
        "temperature": display_temperature(settings.temperature),
        "hasKey": !settings.api_key.is_empty(),
        "configured": rigshift_core::ai_configured(settings),
    })
}

/// Widen through the shortest decimal form so 0.2 stays 0.2.
fn display_temperature(t: f32) -> f64 {
    t.to_string().parse().unwrap_or(f64::from(t))
}

// --- Server ---

#[derive(Clone)]
pub struct RigshiftServer {
    tool_router: ToolRouter<Self>,
    workbench: Arc<Mutex<Workbench>>,
    store: Arc<dyn SlotStore>,
    guide: Arc<TutorialService<Arc<dyn TutorialBackend>>>,
    settings: SharedSettings,
    settings_path: PathBuf,
}

#[tool_router]
impl RigshiftServer {
    pub fn new(
        store: Arc<dyn SlotStore>,
        backend: Arc<dyn TutorialBackend>,
        settings: SharedSettings,
        settings_path: PathBuf,
    ) -> Self {
        Self {
            tool_router: Self::tool_router(),
            workbench: Arc::new(Mutex::new(Workbench::new())),
            store,
            guide: Arc::new(TutorialService::new(backend)),
            settings,
            settings_path,
        }
    }

    fn workbench(&self) -> MutexGuard<'_, Workbench> {
        self.workbench.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    #[tool(description = "List the predefined part options for a build, optionally for a single category. Any free-text part name is also accepted by set_part.")]
    fn list_options(
        &self,
        Parameters(req): Parameters<ListOptionsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let categories: Vec<ComponentCategory> = match req.category {
            Some(c) => vec![c],
            None => ComponentCategory::ALL.to_vec(),
        };
        let mut out = String::new();
        for category in categories {
            out.push_str(&format!("{} ({}):\n", category.label(), category));
            for option in catalog::options(req.build, category) {
                out.push_str("  - ");
                out.push_str(option);
                out.push('\n');
            }
        }
        Ok(CallToolResult::success(vec![Content::text(out)]))
    }

    #[tool(description = "Plain-language glossary of the seven component categories: what each part does and what it looks like.")]
    fn glossary(&self) -> Result<CallToolResult, McpError> {
        json_result(&catalog::glossary())
    }

    #[tool(description = "Set (or replace) the part for one category in the current or new build. Returns the build's compatibility warnings after the change.")]
    fn set_part(
        &self,
        Parameters(req): Parameters<SetPartRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut wb = self.workbench();
        wb.set_part(req.build, req.category, &req.description);
        tracing::debug!(build = %req.build, category = %req.category, "part set");
        let text = format!(
            "Updated {} build.\n{}",
            req.build,
            format_warnings(&wb, req.build)
        );
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(description = "Clear one category in the current or new build. Clearing an empty slot is a no-op.")]
    fn remove_part(
        &self,
        Parameters(req): Parameters<RemovePartRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut wb = self.workbench();
        wb.remove_part(req.build, req.category);
        tracing::debug!(build = %req.build, category = %req.category, "part removed");
        let text = format!(
            "Removed {} from {} build.\n{}",
            req.category,
            req.build,
            format_warnings(&wb, req.build)
        );
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(description = "Get both builds as {current: {cpu, gpu, ram, motherboard, storage, psu, os}, new: {...}, warnings: {current: [...], new: [...]}}. Unset categories are empty strings.")]
    fn get_builds(&self) -> Result<CallToolResult, McpError> {
        let wb = self.workbench();
        let (current, new) = wb.snapshot();
        let warnings = |kind| {
            wb.warnings(kind)
                .into_iter()
                .map(|w| w.message)
                .collect::<Vec<_>>()
        };
        json_result(&serde_json::json!({
            "current": current,
            "new": new,
            "warnings": {
                "current": warnings(BuildKind::Current),
                "new": warnings(BuildKind::New),
            },
        }))
    }

    #[tool(description = "Run the heuristic compatibility checks (CPU/motherboard vendor, RAM/motherboard DDR generation, GPU/PSU wattage) on one build. Matching is by keywords in part names, so unrecognized names produce no warning.")]
    fn check_compatibility(
        &self,
        Parameters(req): Parameters<CheckCompatibilityRequest>,
    ) -> Result<CallToolResult, McpError> {
        let wb = self.workbench();
        Ok(CallToolResult::success(vec![Content::text(format_warnings(&wb, req.build))]))
    }

    #[tool(description = "Save both builds, overwriting any previously saved configuration.")]
    fn save_config(&self) -> Result<CallToolResult, McpError> {
        match self.workbench().save(self.store.as_ref()) {
            Ok(()) => Ok(CallToolResult::success(vec![Content::text("Configuration saved.")])),
            Err(e) => {
                tracing::error!("save failed: {e}");
                Ok(CallToolResult::error(vec![Content::text(format!("Failed to save configuration: {e}"))]))
            }
        }
    }

    #[tool(description = "Replace both builds with the saved configuration. A corrupted save is discarded and reported as absent.")]
    fn load_config(&self) -> Result<CallToolResult, McpError> {
        let mut wb = self.workbench();
        match wb.load(self.store.as_ref()) {
            Ok(true) => {
                let (current, new) = wb.snapshot();
                let text = format!(
                    "Configuration loaded.\n\nCurrent build:\n{}\nNew build:\n{}",
                    format_parts(&current),
                    format_parts(&new)
                );
                Ok(CallToolResult::success(vec![Content::text(text)]))
            }
            Ok(false) => Ok(CallToolResult::success(vec![Content::text(
                "No saved configuration found.",
            )])),
            Err(e) => {
                tracing::error!("load failed: {e}");
                Ok(CallToolResult::error(vec![Content::text(format!("Failed to load configuration: {e}"))]))
            }
        }
    }

    #[tool(description = "Report whether a saved configuration exists.")]
    fn has_saved_config(&self) -> Result<CallToolResult, McpError> {
        match self.workbench().has_saved(self.store.as_ref()) {
            Ok(saved) => Ok(CallToolResult::success(vec![Content::text(saved.to_string())])),
            Err(e) => Ok(CallToolResult::error(vec![Content::text(e.to_string())])),
        }
    }

    #[tool(description = "Generate a step-by-step upgrade tutorial from the current build to the new build using the configured AI provider. Requires at least one part in the new build. Only one generation can run at a time. Returns {warnings: [...], tutorial: [{step, title, details}]}.")]
    async fn generate_tutorial(&self) -> Result<CallToolResult, McpError> {
        let configured = rigshift_core::ai_configured(&lock_settings(&self.settings));
        if !configured {
            return Ok(CallToolResult::error(vec![Content::text(
                "No AI provider configured. Use save_ai_settings to set provider, model and apiKey, or export RIGSHIFT_API_KEY.",
            )]));
        }

        // Later edits must not affect this request.
        let (current, new) = self.workbench().snapshot();

        match self.guide.generate(&current, &new).await {
            Ok(response) => {
                let result = json_result(&response);
                self.workbench().set_tutorial(response);
                result
            }
            Err(e) => {
                if matches!(e, GuideError::Request(_) | GuideError::Format(_)) {
                    tracing::error!("tutorial generation failed: {e}");
                }
                Ok(CallToolResult::error(vec![Content::text(e.user_message())]))
            }
        }
    }

    #[tool(description = "Get the most recently generated tutorial as JSON.")]
    fn get_tutorial(&self) -> Result<CallToolResult, McpError> {
        match self.workbench().tutorial() {
            Some(t) => json_result(t),
            None => Ok(CallToolResult::error(vec![Content::text(
                "No tutorial yet. Use generate_tutorial first.",
            )])),
        }
    }

    #[tool(description = "Write the most recent tutorial to pc-upgrade-guide.txt or pc-upgrade-guide.pdf and return the file path.")]
    fn export_tutorial(
        &self,
        Parameters(req): Parameters<ExportRequest>,
    ) -> Result<CallToolResult, McpError> {
        let doc = match self.workbench().export(req.format) {
            Ok(doc) => doc,
            Err(e) => return Ok(CallToolResult::error(vec![Content::text(e.to_string())])),
        };
        let dir = req.directory.map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
        let path = dir.join(doc.file_name);
        match std::fs::create_dir_all(&dir).and_then(|_| std::fs::write(&path, &doc.bytes)) {
            Ok(()) => {
                tracing::info!(path = %path.display(), bytes = doc.bytes.len(), "tutorial exported");
                Ok(CallToolResult::success(vec![Content::text(format!(
                    "Wrote {} ({}, {} bytes)",
                    path.display(),
                    doc.mime_type,
                    doc.bytes.len()
                ))]))
            }
            Err(e) => Ok(CallToolResult::error(vec![Content::text(format!(
                "Failed to write {}: {e}",
                path.display()
            ))])),
        }
    }

    #[tool(description = "Show the AI provider settings in use (the API key is masked).")]
    fn get_ai_settings(&self) -> Result<CallToolResult, McpError> {
        json_result(&settings_view(&lock_settings(&self.settings)))
    }

    #[tool(description = "Update the AI provider settings used by generate_tutorial and save them to ~/.rigshift/settings.json. Omitted fields keep their current value; an empty apiKey keeps the stored key.")]
    fn save_ai_settings(
        &self,
        Parameters(req): Parameters<SaveAiSettingsRequest>,
    ) -> Result<CallToolResult, McpError> {
        if req.temperature.is_some_and(|t| !(0.0..=2.0).contains(&t)) {
            return Ok(CallToolResult::error(vec![Content::text(
                "temperature must be between 0 and 2",
            )]));
        }

        // The file never receives the environment key override.
        let mut stored = rigshift_core::read_settings_from(&self.settings_path);
        if let Some(provider) = req.provider.filter(|p| !p.trim().is_empty()) {
            stored.provider = provider.trim().to_lowercase();
        }
        if let Some(model) = req.model.filter(|m| !m.trim().is_empty()) {
            stored.model = model.trim().to_string();
        }
        if let Some(key) = req.api_key.filter(|k| !k.trim().is_empty()) {
            stored.api_key = key.trim().to_string();
        }
        if let Some(t) = req.temperature {
            stored.temperature = t;
        }

        if let Err(e) = rigshift_core::write_settings_to(&self.settings_path, &stored) {
            tracing::error!("saving settings failed: {e}");
            return Ok(CallToolResult::error(vec![Content::text(e.to_string())]));
        }

        let mut live = lock_settings(&self.settings);
        *live = rigshift_core::with_env_key(stored);
        json_result(&settings_view(&live))
    }
}

#[tool_handler]
impl ServerHandler for RigshiftServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

// --- Helpers ---

fn json_result<T: serde::Serialize + ?Sized>(value: &T) -> Result<CallToolResult, McpError> {
    match serde_json::to_string_pretty(value) {
        Ok(json) => Ok(CallToolResult::success(vec![Content::text(json)])),
        Err(e) => Ok(CallToolResult::error(vec![Content::text(format!("Serialization error: {e}"))])),
    }
}

fn format_warnings(wb: &Workbench, kind: BuildKind) -> String {
    let warnings = wb.warnings(kind);
    if warnings.is_empty() {
        return format!("No compatibility warnings for the {kind} build.");
    }
    let mut out = format!("Compatibility warnings for the {kind} build:\n");
    for w in warnings {
        out.push_str("- ");
        out.push_str(&w.message);
        out.push('\n');
    }
    out
}

fn format_parts(parts: &PcParts) -> String {
    let mut out = String::new();
    for category in ComponentCategory::ALL {
        let value = parts.get(category);
        out.push_str(&format!(
            "  {}: {}\n",
            category.label(),
            if value.is_empty() { "(empty)" } else { value }
        ));
    }
    out
}

const INSTRUCTIONS: &str = r#"rigshift plans PC upgrades. It keeps two builds in memory: the user's "current" PC and the "new" configuration they are moving to. Each build has at most one part per category (cpu, gpu, ram, motherboard, storage, psu, os), named in free text.

## Workflow
1. Use `list_options` for suggested part names, or pass any free-text name to `set_part`.
2. After each change, `set_part` reports heuristic compatibility warnings for that build. These are keyword checks, not a certified compatibility database: no warning does not prove two parts work together.
3. `save_config` / `load_config` persist both builds between sessions.
4. When the new build has at least one part, call `generate_tutorial`. It returns ordered steps and model-detected warnings. If no AI provider is configured, set one with `save_ai_settings` (check with `get_ai_settings`).
5. `export_tutorial` writes the latest tutorial as text or PDF."#;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,rigshift=debug"));
    // stdout carries the MCP protocol; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if std::env::args().nth(1).as_deref() == Some("init") {
        return run_init();
    }

    init_tracing();

    let settings_path = rigshift_core::settings_path();
    let settings = rigshift_core::read_settings();
    if !rigshift_core::ai_configured(&settings) {
        tracing::warn!("AI provider not configured; generate_tutorial fails until save_ai_settings is called");
    }
    let settings: SharedSettings = Arc::new(Mutex::new(settings));
    let store = FileSlotStore::default_location();
    tracing::info!(dir = %store.dir().display(), "using configuration store");

    let backend = Arc::new(SettingsBackend(settings.clone()));
    let service = RigshiftServer::new(Arc::new(store), backend, settings, settings_path)
        .serve(rmcp::transport::io::stdio())
        .await
        .inspect_err(|e| tracing::error!("MCP server error: {e}"))?;
    service.waiting().await?;
    Ok(())
}

// --- `rigshift-mcp init` ---

type BoxError = Box<dyn std::error::Error>;

/// A coding agent that discovers MCP servers from a project-local file.
struct AgentTarget {
    /// Executable looked up on PATH.
    command: &'static str,
    label: &'static str,
    /// Config file relative to the project root.
    config: &'static str,
    merge: fn(Option<&str>, &str) -> Result<String, BoxError>,
}

const AGENT_TARGETS: [AgentTarget; 2] = [
    AgentTarget {
        command: "claude",
        label: "Claude Code",
        config: ".mcp.json",
        merge: claude_config,
    },
    AgentTarget {
        command: "codex",
        label: "Codex",
        config: ".codex/config.toml",
        merge: codex_config,
    },
];

fn run_init() -> Result<(), BoxError> {
    let binary = std::env::current_exe()?.canonicalize()?;
    let cwd = std::env::current_dir()?;

    let written = register_agents(&cwd, &binary.to_string_lossy(), on_path)?;
    if written.is_empty() {
        eprintln!("Neither `claude` nor `codex` found in PATH.");
        eprintln!("Install Claude Code or OpenAI Codex first, then re-run `rigshift-mcp init`.");
        std::process::exit(1);
    }
    for (_, path) in &written {
        eprintln!("Wrote {}", path.display());
    }
    let labels: Vec<&str> = written.iter().map(|(label, _)| *label).collect();
    eprintln!("\nDone. {} will use rigshift in this project.", labels.join(" and "));
    Ok(())
}

/// Point every installed agent at `binary`, merging into existing config
/// files under `root`. Returns the agents configured and the files written.
fn register_agents(
    root: &Path,
    binary: &str,
    installed: impl Fn(&str) -> bool,
) -> Result<Vec<(&'static str, PathBuf)>, BoxError> {
    let mut written = Vec::new();
    for target in AGENT_TARGETS.iter().filter(|t| installed(t.command)) {
        let path = root.join(target.config);
        let existing = match std::fs::read_to_string(&path) {
            Ok(text) => Some(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };
        let merged = (target.merge)(existing.as_deref(), binary)?;
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(&path, merged)?;
        written.push((target.label, path));
    }
    Ok(written)
}

fn on_path(command: &str) -> bool {
    let Some(paths) = std::env::var_os("PATH") else {
        return false;
    };
    std::env::split_paths(&paths).any(|dir| {
        dir.join(command).is_file() || dir.join(format!("{command}.exe")).is_file()
    })
}

/// `.mcp.json` with a `rigshift` stdio entry; other servers are kept and an
/// unreadable file is replaced.
fn claude_config(existing: Option<&str>, binary: &str) -> Result<String, BoxError> {
    let mut root = existing
        .and_then(|s| serde_json::from_str::<serde_json::Value>(s).ok())
        .filter(serde_json::Value::is_object)
        .unwrap_or_else(|| serde_json::json!({}));

    if !root["mcpServers"].is_object() {
        root["mcpServers"] = serde_json::json!({});
    }
    root["mcpServers"]["rigshift"] = serde_json::json!({
        "type": "stdio",
        "command": binary,
        "args": [],
    });
    Ok(serde_json::to_string_pretty(&root)?)
}

/// `.codex/config.toml` with an `[mcp_servers.rigshift]` table.
fn codex_config(existing: Option<&str>, binary: &str) -> Result<String, BoxError> {
    let mut doc: toml_edit::DocumentMut = existing
        .and_then(|s| s.parse().ok())
        .unwrap_or_default();

    if !doc.contains_table("mcp_servers") {
        doc["mcp_servers"] = toml_edit::table();
    }
    let mut server = toml_edit::Table::new();
    server.insert("command", toml_edit::value(binary));
    server.insert("args", toml_edit::value(toml_edit::Array::new()));
    doc["mcp_servers"]["rigshift"] = toml_edit::Item::Table(server);
    Ok(doc.to_string())
}
