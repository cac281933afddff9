//! Default values for Delve configuration.
//!
//! All hardcoded defaults are centralized here for easy maintenance.

// ============================================================================
// LLM Defaults
// ============================================================================

/// Default LLM provider.
pub const DEFAULT_LLM_PROVIDER: &str = "openai";

/// Default max tokens for LLM responses.
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Default timeout for a single LLM request, in seconds.
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 120;

// OpenAI defaults
/// Default OpenAI API URL.
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";
/// Default OpenAI model.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4.1-mini";

// Anthropic defaults
/// Default Anthropic API URL.
pub const DEFAULT_ANTHROPIC_URL: &str = "https://api.anthropic.com/v1/messages";
/// Default Anthropic model.
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-20250514";
/// Default Anthropic API version.
pub const DEFAULT_ANTHROPIC_API_VERSION: &str = "2023-06-01";

// Ollama defaults
/// Default Ollama API URL.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434/v1";
/// Default Ollama model.
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3";

// OpenRouter defaults
/// Default OpenRouter API URL.
pub const DEFAULT_OPENROUTER_URL: &str = "https://openrouter.ai/api/v1";

// ============================================================================
// Search Defaults
// ============================================================================

/// Default search/extract service URL.
pub const DEFAULT_SEARCH_URL: &str = "https://api.parallel.ai";

/// Default value of the `parallel-beta` header.
pub const DEFAULT_SEARCH_BETA_VERSION: &str = "search-extract-2025-10-10";

/// Default timeout for one search or extract call, in seconds.
pub const DEFAULT_SEARCH_TIMEOUT_SECS: u64 = 60;

// ============================================================================
// Exploration Defaults
// ============================================================================

/// URLs kept per task after search.
pub const DEFAULT_MAX_URLS_PER_TASK: usize = 5;

/// Evidence items a single task may contribute.
pub const DEFAULT_MAX_EVIDENCE_PER_TASK: usize = 12;

/// Excerpt budget per search result.
pub const DEFAULT_MAX_SEARCH_EXCERPT_CHARS: usize = 200;

/// Excerpt budget per extracted page.
pub const DEFAULT_MAX_EXTRACT_CHARS: usize = 1000;

/// Concurrent task cap. Zero means one in-flight unit per task.
pub const DEFAULT_MAX_CONCURRENT_TASKS: usize = 0;

// ============================================================================
// Evidence Defaults
// ============================================================================

/// Evidence items forwarded to the summarizer.
pub const DEFAULT_EVIDENCE_MAX_ITEMS: usize = 80;

/// Serialized evidence budget forwarded to the summarizer.
pub const DEFAULT_EVIDENCE_MAX_CHARS: usize = 18_000;

// ============================================================================
// Server Defaults
// ============================================================================

/// Default bind host for `delve serve`.
pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";

/// Default port for `delve serve`.
pub const DEFAULT_SERVER_PORT: u16 = 8000;

// ============================================================================
// File Locations
// ============================================================================

/// Project-local config file name.
pub const DEFAULT_CONFIG_FILE: &str = "delve.toml";

/// Directory under the user config dir.
pub const DEFAULT_CONFIG_DIR: &str = "delve";
