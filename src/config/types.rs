use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Cookie carrying the Moodle session token
pub const DEFAULT_COOKIE_NAME: &str = "MoodleSession";

/// Browser user agent presented to the forum
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Output file name used when neither the config nor `OUT_FILE` names one
pub const DEFAULT_OUTPUT_FILE: &str = "foro_exportado.txt";

/// Directory, next to the executable, that receives exports
pub const DEFAULT_OUTPUT_DIR: &str = "outputdata";

/// Environment variable overriding the output file name
pub const OUTPUT_FILE_ENV: &str = "OUT_FILE";

/// Main configuration structure
///
/// Every section is optional in the TOML file; missing keys take defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub session: SessionConfig,
    pub crawler: CrawlerConfig,
    pub output: OutputConfig,
}

/// Authenticated HTTP session settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Name of the cookie carrying the session token
    #[serde(rename = "cookie-name")]
    pub cookie_name: String,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Whole-request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
        }
    }
}

impl SessionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Pagination and pacing settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Delay applied after every discussion visit (milliseconds)
    #[serde(rename = "request-delay-ms")]
    pub request_delay_ms: u64,

    /// Maximum number of index pages walked per forum
    #[serde(rename = "max-pages")]
    pub max_pages: u32,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            request_delay_ms: 1000,
            max_pages: 1000,
        }
    }
}

impl CrawlerConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

/// Export destination settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving the export; defaults to `outputdata/` next to the executable
    pub directory: Option<PathBuf>,

    /// File name of the export inside `directory`
    #[serde(rename = "file-name")]
    pub file_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: None,
            file_name: DEFAULT_OUTPUT_FILE.to_string(),
        }
    }
}

impl OutputConfig {
    /// Directory the export is written to
    pub fn resolved_directory(&self) -> PathBuf {
        match &self.directory {
            Some(dir) => dir.clone(),
            None => default_output_dir(),
        }
    }

    /// Full path of the export file
    pub fn output_path(&self) -> PathBuf {
        self.resolved_directory().join(&self.file_name)
    }
}

/// `outputdata/` beside the running executable, or in the working directory
/// when the executable location is unknown
fn default_output_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_OUTPUT_DIR)))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
}

impl Config {
    /// Applies environment overrides using the given lookup
    ///
    /// `OUT_FILE` replaces the output file name when set and non-empty.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(file_name) = lookup(OUTPUT_FILE_ENV).filter(|v| !v.is_empty()) {
            self.output.file_name = file_name;
        }
    }
}
