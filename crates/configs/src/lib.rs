use anyhow::anyhow;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// The three independently deployed catalog services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    BookRegistry,
    ReviewLedger,
    UserDirectory,
}

impl ServiceKind {
    pub fn name(self) -> &'static str {
        match self {
            ServiceKind::BookRegistry => "book-registry",
            ServiceKind::ReviewLedger => "review-ledger",
            ServiceKind::UserDirectory => "user-directory",
        }
    }

    pub fn default_port(self) -> u16 {
        match self {
            ServiceKind::BookRegistry => 5001,
            ServiceKind::ReviewLedger => 5002,
            ServiceKind::UserDirectory => 5000,
        }
    }

    pub fn default_database_url(self) -> &'static str {
        match self {
            ServiceKind::BookRegistry => "sqlite://books.db?mode=rwc",
            ServiceKind::ReviewLedger => "sqlite://reviews.db?mode=rwc",
            ServiceKind::UserDirectory => "sqlite://users.db?mode=rwc",
        }
    }

    pub fn default_config_file(self) -> String {
        format!("{}.toml", self.name())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    /// Where the existence check (and the review ledger's book lookups) go.
    pub book_registry: RemoteServiceConfig,
    /// Used by the book registry's HTML detail page to pull reviews.
    pub review_ledger: RemoteServiceConfig,
    #[serde(default)]
    pub api: ApiConfig,
    /// Service this configuration was built for.
    #[serde(skip)]
    kind: Option<ServiceKind>,
    /// Whether `book_registry.base_url` came from the file or the environment.
    #[serde(skip)]
    book_registry_pinned: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteServiceConfig {
    pub base_url: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_remote_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Mount the read-style `GET /api/update/...` paths next to PATCH.
    #[serde(default = "default_true")]
    pub legacy_update_routes: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { legacy_update_routes: true }
    }
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 1 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }
fn default_request_timeout_ms() -> u64 { 5000 }
fn default_remote_connect_timeout_ms() -> u64 { 2000 }
fn default_true() -> bool { true }

impl DatabaseConfig {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in the config file or DATABASE_URL"));
        }
        if !self.url.to_lowercase().starts_with("sqlite:") {
            return Err(anyhow!("database.url must start with sqlite:"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

impl RemoteServiceConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout_ms: default_request_timeout_ms(),
            connect_timeout_ms: default_remote_connect_timeout_ms(),
        }
    }

    fn validate(&self, section: &str) -> Result<()> {
        let lower = self.base_url.to_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) {
            return Err(anyhow!("{section}.base_url must start with http:// or https://"));
        }
        if self.request_timeout_ms == 0 || self.connect_timeout_ms == 0 {
            return Err(anyhow!("{section} timeouts must be positive milliseconds"));
        }
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "0.0.0.0".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        if self.worker_threads == Some(0) {
            self.worker_threads = None;
        }
        Ok(())
    }
}

impl AppConfig {
    /// Built-in configuration for a service when no file is present.
    pub fn defaults_for(kind: ServiceKind) -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".into(),
                port: kind.default_port(),
                worker_threads: None,
            },
            database: DatabaseConfig::with_url(kind.default_database_url()),
            book_registry: RemoteServiceConfig::with_base_url(format!(
                "http://127.0.0.1:{}",
                ServiceKind::BookRegistry.default_port()
            )),
            review_ledger: RemoteServiceConfig::with_base_url(format!(
                "http://127.0.0.1:{}",
                ServiceKind::ReviewLedger.default_port()
            )),
            api: ApiConfig::default(),
            kind: Some(kind),
            book_registry_pinned: false,
        }
    }

    /// Layer a TOML document over the service defaults; keys absent from the
    /// document keep their default values.
    pub fn from_toml_for(kind: ServiceKind, content: &str) -> Result<Self> {
        let mut base = toml::Value::try_from(Self::defaults_for(kind))?;
        let overlay: toml::Value = toml::from_str(content)?;
        let pinned = overlay
            .get("book_registry")
            .and_then(|section| section.get("base_url"))
            .is_some();
        merge(&mut base, overlay);
        let mut cfg: Self = base.try_into()?;
        cfg.kind = Some(kind);
        cfg.book_registry_pinned = pinned;
        cfg.follow_own_port();
        Ok(cfg)
    }

    /// Apply environment overrides through `lookup` (normally `std::env::var`).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("SERVER_PORT").and_then(|p| p.parse::<u16>().ok()) {
            self.server.port = port;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(url) = lookup("BOOK_REGISTRY_URL") {
            self.book_registry.base_url = url;
            self.book_registry_pinned = true;
        }
        if let Some(url) = lookup("REVIEW_LEDGER_URL") {
            self.review_ledger.base_url = url;
        }
        if let Some(w) = lookup("TOKIO_WORKER_THREADS").and_then(|v| v.parse::<usize>().ok()) {
            self.server.worker_threads = Some(w);
        }
        self.follow_own_port();
    }

    /// The book registry checks existence against its own read endpoint.
    /// Unless that URL was set explicitly, it tracks `server.host`/`server.port`.
    fn follow_own_port(&mut self) {
        if self.kind != Some(ServiceKind::BookRegistry) || self.book_registry_pinned {
            return;
        }
        let host = match self.server.host.trim() {
            "" | "0.0.0.0" | "::" | "[::]" => "127.0.0.1".to_string(),
            h if h.contains(':') && !h.starts_with('[') => format!("[{h}]"),
            h => h.to_string(),
        };
        self.book_registry.base_url = format!("http://{}:{}", host, self.server.port);
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.validate()?;
        self.book_registry.validate("book_registry")?;
        self.review_ledger.validate("review_ledger")?;
        Ok(())
    }
}

/// Load a service's configuration: `CONFIG_PATH` (or `<service>.toml`),
/// falling back to defaults when the file does not exist, then environment
/// overrides, then validation.
pub fn load_for(kind: ServiceKind) -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| kind.default_config_file());
    let mut cfg = match std::fs::read_to_string(&path) {
        Ok(content) => AppConfig::from_toml_for(kind, &content)
            .map_err(|e| anyhow!("invalid config file {path}: {e}"))?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => AppConfig::defaults_for(kind),
        Err(e) => return Err(anyhow!("cannot read config file {path}: {e}")),
    };
    cfg.apply_overrides(|key| std::env::var(key).ok());
    cfg.normalize_and_validate()?;
    Ok(cfg)
}

fn merge(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}
