use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

pub const TOKEN_SECRET_ENV: &str = "AUTH_TOKEN_SECRET";

/// Longest accepted token lifetime (100 years). Keeps `now + ttl` inside the
/// range a timestamp can represent.
pub const MAX_TOKEN_TTL_SECS: u64 = 100 * 365 * 24 * 60 * 60;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub hashing: HashingSettings,
    #[serde(default)]
    pub token: TokenSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Input rules applied before any store access.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    #[serde(default = "default_username_min_length")]
    pub username_min_length: usize,
    #[serde(default = "default_password_min_length")]
    pub password_min_length: usize,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self { username_min_length: default_username_min_length(), password_min_length: default_password_min_length() }
    }
}

/// Argon2 cost parameters. Defaults match the argon2 crate's recommended values.
#[derive(Debug, Clone, Deserialize)]
pub struct HashingSettings {
    #[serde(default = "default_memory_kib")]
    pub memory_kib: u32,
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

impl Default for HashingSettings {
    fn default() -> Self {
        Self { memory_kib: default_memory_kib(), iterations: default_iterations(), parallelism: default_parallelism() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenSettings {
    #[serde(default)]
    pub secret: String,
    #[serde(default = "default_issuer")]
    pub issuer: String,
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self { secret: String::new(), issuer: default_issuer(), ttl_secs: default_ttl_secs() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    #[serde(default = "default_users_path")]
    pub users_path: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self { users_path: default_users_path() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self { format: default_log_format() }
    }
}

fn default_username_min_length() -> usize { 2 }
fn default_password_min_length() -> usize { 6 }
fn default_memory_kib() -> u32 { 19 * 1024 }
fn default_iterations() -> u32 { 2 }
fn default_parallelism() -> u32 { 1 }
fn default_issuer() -> String { "twitter".into() }
fn default_ttl_secs() -> u64 { 12 * 60 * 60 }
fn default_users_path() -> String { "data/users.json".into() }
fn default_log_format() -> String { "compact".into() }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    from_toml_str(&content)
}

pub fn from_toml_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`), falling back to defaults when the file is absent.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = match load_default() {
            Ok(cfg) => cfg,
            Err(e) if is_missing_file(&e) => AppConfig::default(),
            Err(e) => return Err(e),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.token.normalize_from_env();
        self.auth.validate()?;
        self.hashing.validate()?;
        self.token.validate()?;
        self.storage.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

fn is_missing_file(e: &anyhow::Error) -> bool {
    e.downcast_ref::<std::io::Error>()
        .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound)
}

impl AuthSettings {
    fn validate(&self) -> Result<()> {
        if self.username_min_length == 0 {
            return Err(anyhow!("auth.username_min_length must be >= 1"));
        }
        if self.password_min_length == 0 {
            return Err(anyhow!("auth.password_min_length must be >= 1"));
        }
        Ok(())
    }
}

impl HashingSettings {
    fn validate(&self) -> Result<()> {
        if self.iterations == 0 || self.parallelism == 0 {
            return Err(anyhow!("hashing.iterations and hashing.parallelism must be >= 1"));
        }
        if self.memory_kib < 8 * self.parallelism {
            return Err(anyhow!("hashing.memory_kib must be at least 8 * hashing.parallelism"));
        }
        Ok(())
    }
}

impl TokenSettings {
    /// Fill an empty secret from the environment; a secret in the file wins.
    pub fn normalize_from_env(&mut self) {
        if self.secret.trim().is_empty() {
            if let Ok(secret) = std::env::var(TOKEN_SECRET_ENV) {
                self.secret = secret;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.secret.trim().is_empty() {
            return Err(anyhow!("token.secret is empty; set it in config.toml or {TOKEN_SECRET_ENV}"));
        }
        if self.issuer.trim().is_empty() {
            return Err(anyhow!("token.issuer must not be empty"));
        }
        if self.ttl_secs == 0 {
            return Err(anyhow!("token.ttl_secs must be a positive number of seconds"));
        }
        if self.ttl_secs > MAX_TOKEN_TTL_SECS {
            return Err(anyhow!("token.ttl_secs must be at most {MAX_TOKEN_TTL_SECS}, got {}", self.ttl_secs));
        }
        Ok(())
    }
}

impl StorageSettings {
    fn validate(&self) -> Result<()> {
        if self.users_path.trim().is_empty() {
            return Err(anyhow!("storage.users_path must not be empty"));
        }
        Ok(())
    }
}

impl LoggingSettings {
    fn validate(&self) -> Result<()> {
        match self.format.as_str() {
            "compact" | "json" => Ok(()),
            other => Err(anyhow!("logging.format must be \"compact\" or \"json\", got {other:?}")),
        }
    }
}
