//! Configuration management for the Mentor workshop tools.
//!
//! Configuration is merged from several sources, later ones winning:
//! - Built-in defaults
//! - Config file (`.mentor/config.yaml`)
//! - Environment variables
//! - Command-line flags
//!
//! Workspace state (the vector store file) lives under `.mentor/`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Providers the factories know how to build.
pub const KNOWN_PROVIDERS: [&str; 3] = ["ollama", "gemini", "mock"];

/// Default environment variable holding the hosted provider key.
pub const DEFAULT_GEMINI_KEY_ENV: &str = "GEMINI_API_KEY";

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .mentor/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Active LLM provider ("ollama", "gemini", "mock")
    pub provider: String,

    /// Chat model identifier
    pub model: String,

    /// Explicit API key (MENTOR_API_KEY), wins over provider key env vars
    pub api_key: Option<String>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// LLM provider configurations from config.yaml
    pub llm: Option<LlmConfig>,

    /// Retrieval pipeline settings
    pub knowledge: KnowledgeSettings,

    /// Prompt template settings
    pub prompts: PromptSettings,
}

/// LLM configuration from config.yaml.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(rename = "activeProvider")]
    pub active_provider: String,

    pub providers: HashMap<String, ProviderConfig>,
}

/// Provider-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProviderConfig {
    Gemini {
        #[serde(rename = "apiKeyEnv")]
        api_key_env: String,
        model: String,
        #[serde(rename = "embeddingModel")]
        embedding_model: Option<String>,
        endpoint: Option<String>,
    },
    Ollama {
        endpoint: String,
        model: String,
        #[serde(rename = "embeddingModel")]
        embedding_model: Option<String>,
        timeout: Option<u64>,
    },
    Mock {
        model: Option<String>,
    },
}

impl ProviderConfig {
    /// Chat model configured for this provider.
    pub fn model(&self) -> Option<&str> {
        match self {
            ProviderConfig::Gemini { model, .. } | ProviderConfig::Ollama { model, .. } => {
                Some(model)
            }
            ProviderConfig::Mock { model } => model.as_deref(),
        }
    }
}

/// Retrieval pipeline settings (`knowledge:` section).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeSettings {
    /// Vector store collection name
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Markdown files or directories to ingest
    #[serde(default = "default_documents")]
    pub documents: Vec<PathBuf>,

    /// Maximum chunk size in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Overlap between character-split chunks
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    /// Number of passages to retrieve
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Passages scoring at or below this are dropped
    #[serde(default)]
    pub similarity_threshold: Option<f32>,

    /// Embedding vector dimension
    #[serde(default = "default_embedding_dimensions")]
    pub embedding_dimensions: usize,
}

fn default_collection() -> String {
    "workshop_docs".to_string()
}

fn default_documents() -> Vec<PathBuf> {
    vec![PathBuf::from("data")]
}

fn default_chunk_size() -> usize {
    6000
}

fn default_chunk_overlap() -> usize {
    200
}

fn default_top_k() -> usize {
    5
}

fn default_embedding_dimensions() -> usize {
    768
}

impl Default for KnowledgeSettings {
    fn default() -> Self {
        Self {
            collection: default_collection(),
            documents: default_documents(),
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            top_k: default_top_k(),
            similarity_threshold: None,
            embedding_dimensions: default_embedding_dimensions(),
        }
    }
}

/// Prompt template settings (`prompts:` section).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptSettings {
    /// Directory holding `*.txt` templates
    #[serde(default = "default_prompts_dir")]
    pub dir: PathBuf,

    /// System prompt version (`system_prompt_<version>.txt`)
    #[serde(default = "default_prompt_version")]
    pub version: String,
}

fn default_prompts_dir() -> PathBuf {
    PathBuf::from("prompts")
}

fn default_prompt_version() -> String {
    "v1".to_string()
}

impl Default for PromptSettings {
    fn default() -> Self {
        Self {
            dir: default_prompts_dir(),
            version: default_prompt_version(),
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    llm: Option<LlmConfig>,
    workspace: Option<WorkspaceConfig>,
    logging: Option<LoggingConfig>,
    knowledge: Option<KnowledgeSettings>,
    prompts: Option<PromptSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WorkspaceConfig {
    path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            provider: "ollama".to_string(),
            model: default_model_for("ollama").to_string(),
            api_key: None,
            log_level: None,
            verbose: false,
            no_color: false,
            llm: None,
            knowledge: KnowledgeSettings::default(),
            prompts: PromptSettings::default(),
        }
    }
}

/// Built-in chat model for a provider.
pub fn default_model_for(provider: &str) -> &'static str {
    match provider {
        "gemini" => "gemini-2.5-flash",
        "mock" => "mock-echo",
        _ => "llama3.2:3b",
    }
}

impl AppConfig {
    /// Load configuration from defaults, the config file and environment.
    ///
    /// Environment variables:
    /// - `MENTOR_WORKSPACE`: Override workspace path
    /// - `MENTOR_CONFIG`: Path to config file
    /// - `MENTOR_PROVIDER`: LLM provider
    /// - `MENTOR_MODEL`: Model identifier
    /// - `MENTOR_API_KEY`: API key
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use mentor_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Workspace: {:?}", config.workspace);
    /// ```
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(workspace) = std::env::var("MENTOR_WORKSPACE") {
            config.workspace = PathBuf::from(workspace);
        }

        if let Ok(config_file) = std::env::var("MENTOR_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| config.mentor_dir().join("config.yaml"));

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        if let Ok(provider) = std::env::var("MENTOR_PROVIDER") {
            config.model = config.model_for(&provider);
            config.provider = provider;
        }

        if let Ok(model) = std::env::var("MENTOR_MODEL") {
            config.model = model;
        }

        config.api_key = std::env::var("MENTOR_API_KEY").ok();
        config.log_level = std::env::var("RUST_LOG").ok();

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        self.merge_yaml_str(&contents)
            .map_err(|e| AppError::Config(format!("Failed to parse config file {:?}: {}", path, e)))
    }

    fn merge_yaml_str(&self, contents: &str) -> Result<Self, serde_yaml::Error> {
        let config_file: ConfigFile = serde_yaml::from_str(contents)?;
        let mut result = self.clone();

        if let Some(path) = config_file.workspace.and_then(|ws| ws.path) {
            result.workspace = PathBuf::from(path);
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        if let Some(knowledge) = config_file.knowledge {
            result.knowledge = knowledge;
        }

        if let Some(prompts) = config_file.prompts {
            result.prompts = prompts;
        }

        if let Some(llm) = config_file.llm {
            result.provider = llm.active_provider.clone();
            result.llm = Some(llm);
            result.model = result.model_for(&result.provider);
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Flags win over environment variables and the config file. Switching
    /// provider without naming a model picks that provider's model.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        workspace: Option<PathBuf>,
        config_file: Option<PathBuf>,
        provider: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(workspace) = workspace {
            self.workspace = workspace;
        }

        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(provider) = provider {
            self.model = self.model_for(&provider);
            self.provider = provider.to_lowercase();
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Chat model for `provider`: config file first, then the built-in default.
    fn model_for(&self, provider: &str) -> String {
        self.get_provider_config(provider)
            .and_then(|pc| pc.model().map(str::to_string))
            .unwrap_or_else(|| default_model_for(provider).to_string())
    }

    /// Get the path to the .mentor directory.
    pub fn mentor_dir(&self) -> PathBuf {
        self.workspace.join(".mentor")
    }

    /// Ensure the .mentor directory exists.
    pub fn ensure_mentor_dir(&self) -> AppResult<()> {
        let mentor_dir = self.mentor_dir();
        if !mentor_dir.exists() {
            std::fs::create_dir_all(&mentor_dir).map_err(|e| {
                AppError::Config(format!("Failed to create .mentor directory: {}", e))
            })?;
        }
        Ok(())
    }

    /// Path of the on-disk vector store.
    pub fn vector_db_path(&self) -> PathBuf {
        self.mentor_dir().join("vector_db").join("store.sqlite")
    }

    /// Prompt directory, resolved against the workspace when relative.
    pub fn prompts_dir(&self) -> PathBuf {
        self.resolve(&self.prompts.dir)
    }

    /// Document paths to ingest, resolved against the workspace.
    pub fn document_paths(&self) -> Vec<PathBuf> {
        self.knowledge
            .documents
            .iter()
            .map(|p| self.resolve(p))
            .collect()
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workspace.join(path)
        }
    }

    /// Get a provider's configuration block, if the config file has one.
    pub fn get_provider_config(&self, provider: &str) -> Option<ProviderConfig> {
        self.llm
            .as_ref()
            .and_then(|llm| llm.providers.get(provider).cloned())
    }

    /// Endpoint override for a provider.
    pub fn resolve_endpoint(&self, provider: &str) -> Option<String> {
        match self.get_provider_config(provider) {
            Some(ProviderConfig::Ollama { endpoint, .. }) => Some(endpoint),
            Some(ProviderConfig::Gemini { endpoint, .. }) => endpoint,
            _ if provider == "ollama" => std::env::var("OLLAMA_URL").ok(),
            _ => None,
        }
    }

    /// Embedding model for a provider, if one is configured.
    pub fn embedding_model(&self, provider: &str) -> Option<String> {
        match self.get_provider_config(provider) {
            Some(ProviderConfig::Ollama {
                embedding_model, ..
            })
            | Some(ProviderConfig::Gemini {
                embedding_model, ..
            }) => embedding_model,
            _ => None,
        }
    }

    /// Request timeout in seconds for a provider, if configured.
    pub fn timeout_secs(&self, provider: &str) -> Option<u64> {
        match self.get_provider_config(provider) {
            Some(ProviderConfig::Ollama { timeout, .. }) => timeout,
            _ => None,
        }
    }

    /// Name of the environment variable holding a provider's API key.
    pub fn api_key_env(&self, provider: &str) -> Option<String> {
        match self.get_provider_config(provider) {
            Some(ProviderConfig::Gemini { api_key_env, .. }) => Some(api_key_env),
            _ if provider == "gemini" => Some(DEFAULT_GEMINI_KEY_ENV.to_string()),
            _ => None,
        }
    }

    /// Resolve the API key for a provider.
    pub fn resolve_api_key(&self, provider: &str) -> Option<String> {
        if let Some(ref key) = self.api_key {
            return Some(key.clone());
        }

        self.api_key_env(provider)
            .and_then(|env_var| std::env::var(env_var).ok())
            .filter(|key| !key.trim().is_empty())
    }

    /// Validate configuration for the active provider.
    pub fn validate(&self) -> AppResult<()> {
        let provider = self.provider.as_str();

        if !KNOWN_PROVIDERS.contains(&provider) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }

        if let Some(env_var) = self.api_key_env(provider) {
            if self.resolve_api_key(provider).is_none() {
                return Err(AppError::Config(format!(
                    "API key not found in environment variable: {}",
                    env_var
                )));
            }
        }

        if self.knowledge.top_k == 0 {
            return Err(AppError::Config("knowledge.topK must be at least 1".to_string()));
        }

        if self.knowledge.chunk_overlap >= self.knowledge.chunk_size {
            return Err(AppError::Config(format!(
                "knowledge.chunkOverlap ({}) must be smaller than chunkSize ({})",
                self.knowledge.chunk_overlap, self.knowledge.chunk_size
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.provider, "ollama");
        assert_eq!(config.model, "llama3.2:3b");
        assert_eq!(config.knowledge.collection, "workshop_docs");
        assert_eq!(config.knowledge.top_k, 5);
        assert_eq!(config.prompts.version, "v1");
        assert!(!config.verbose);
    }

    #[test]
    fn test_mentor_paths() {
        let config = AppConfig {
            workspace: PathBuf::from("/tmp/ws"),
            ..AppConfig::default()
        };
        assert!(config.mentor_dir().ends_with(".mentor"));
        assert_eq!(
            config.vector_db_path(),
            PathBuf::from("/tmp/ws/.mentor/vector_db/store.sqlite")
        );
        assert_eq!(config.prompts_dir(), PathBuf::from("/tmp/ws/prompts"));
        assert_eq!(config.document_paths(), vec![PathBuf::from("/tmp/ws/data")]);
    }

    #[test]
    fn test_with_overrides_switches_model_with_provider() {
        let config = AppConfig::default();
        let overridden =
            config.with_overrides(None, None, Some("gemini".to_string()), None, None, true, false);

        assert_eq!(overridden.provider, "gemini");
        assert_eq!(overridden.model, "gemini-2.5-flash");
        assert!(overridden.verbose);
        assert_eq!(overridden.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_with_overrides_explicit_model_wins() {
        let config = AppConfig::default();
        let overridden = config.with_overrides(
            None,
            None,
            Some("ollama".to_string()),
            Some("qwen2.5".to_string()),
            None,
            false,
            false,
        );
        assert_eq!(overridden.model, "qwen2.5");
    }

    #[test]
    fn test_merge_yaml() {
        let yaml = r#"
llm:
  activeProvider: gemini
  providers:
    gemini:
      apiKeyEnv: MENTOR_TEST_UNSET_KEY
      model: gemini-2.5-pro
      embeddingModel: gemini-embedding-001
    ollama:
      endpoint: http://gpu-box:11434
      model: llama3.2:3b
      timeout: 60
knowledge:
  collection: waml_docs
  topK: 3
  similarityThreshold: 0.75
prompts:
  version: v2
logging:
  level: info
  color: false
"#;
        let merged = AppConfig::default().merge_yaml_str(yaml).unwrap();

        assert_eq!(merged.provider, "gemini");
        assert_eq!(merged.model, "gemini-2.5-pro");
        assert_eq!(merged.knowledge.collection, "waml_docs");
        assert_eq!(merged.knowledge.top_k, 3);
        assert_eq!(merged.knowledge.similarity_threshold, Some(0.75));
        assert_eq!(merged.knowledge.chunk_size, 6000);
        assert_eq!(merged.prompts.version, "v2");
        assert!(merged.no_color);
        assert_eq!(
            merged.resolve_endpoint("ollama"),
            Some("http://gpu-box:11434".to_string())
        );
        assert_eq!(merged.timeout_secs("ollama"), Some(60));
        assert_eq!(
            merged.embedding_model("gemini"),
            Some("gemini-embedding-001".to_string())
        );
        assert_eq!(
            merged.api_key_env("gemini"),
            Some("MENTOR_TEST_UNSET_KEY".to_string())
        );
    }

    #[test]
    fn test_merge_yaml_file_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "knowledge: [not, a, map]").unwrap();

        let err = AppConfig::default().merge_yaml(&path).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_validate_unknown_provider() {
        let config = AppConfig {
            provider: "unknown".to_string(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_ollama_and_mock() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_ok());
        config.provider = "mock".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_gemini_requires_key() {
        let yaml = r#"
llm:
  activeProvider: gemini
  providers:
    gemini:
      apiKeyEnv: MENTOR_TEST_DEFINITELY_UNSET_KEY
      model: gemini-2.5-flash
"#;
        let mut config = AppConfig::default().merge_yaml_str(yaml).unwrap();
        config.api_key = None;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("MENTOR_TEST_DEFINITELY_UNSET_KEY"));

        config.api_key = Some("explicit".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_overlap_smaller_than_chunk() {
        let mut config = AppConfig::default();
        config.knowledge.chunk_overlap = config.knowledge.chunk_size;
        assert!(config.validate().is_err());
    }
}
