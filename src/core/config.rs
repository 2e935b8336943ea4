use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub reports: ReportConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
    /// Server-side `statement_timeout` applied to every pooled connection
    pub statement_timeout_ms: u64,
}

/// Report execution settings: timeouts and retry policy for unavailable storage
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub default_timeout: Duration,
    pub max_timeout: Duration,
    pub retry_max_attempts: u32,
    pub retry_initial_backoff: Duration,
    pub retry_max_backoff: Duration,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                tracing::warn!("Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            reports: ReportConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

/// Read a numeric env var, falling back to `default` when unset
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T, String> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| format!("{} must be a valid number", key)),
        Err(_) => Ok(default),
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    // Default values for database connection pool (conservative defaults for small-medium apps)
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes
    const DEFAULT_STATEMENT_TIMEOUT_MS: u64 = 30_000;

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        Ok(Self {
            url,
            max_connections: parse_env("DB_MAX_CONNECTIONS", Self::DEFAULT_MAX_CONNECTIONS)?,
            min_connections: parse_env("DB_MIN_CONNECTIONS", Self::DEFAULT_MIN_CONNECTIONS)?,
            acquire_timeout_secs: parse_env(
                "DB_ACQUIRE_TIMEOUT_SECS",
                Self::DEFAULT_ACQUIRE_TIMEOUT_SECS,
            )?,
            idle_timeout_secs: parse_env("DB_IDLE_TIMEOUT_SECS", Self::DEFAULT_IDLE_TIMEOUT_SECS)?,
            max_lifetime_secs: parse_env("DB_MAX_LIFETIME_SECS", Self::DEFAULT_MAX_LIFETIME_SECS)?,
            statement_timeout_ms: parse_env(
                "DB_STATEMENT_TIMEOUT_MS",
                Self::DEFAULT_STATEMENT_TIMEOUT_MS,
            )?,
        })
    }
}

impl ReportConfig {
    const DEFAULT_TIMEOUT_MS: u64 = 5_000;
    const DEFAULT_MAX_TIMEOUT_MS: u64 = 30_000;
    const DEFAULT_RETRY_MAX_ATTEMPTS: u32 = 3;
    const DEFAULT_RETRY_INITIAL_BACKOFF_MS: u64 = 100;
    const DEFAULT_RETRY_MAX_BACKOFF_MS: u64 = 2_000;

    pub fn from_env() -> Result<Self, String> {
        let default_timeout_ms = parse_env("REPORT_TIMEOUT_MS", Self::DEFAULT_TIMEOUT_MS)?;
        let max_timeout_ms = parse_env("REPORT_MAX_TIMEOUT_MS", Self::DEFAULT_MAX_TIMEOUT_MS)?;
        if default_timeout_ms == 0 || default_timeout_ms > max_timeout_ms {
            return Err(
                "REPORT_TIMEOUT_MS must be positive and not exceed REPORT_MAX_TIMEOUT_MS"
                    .to_string(),
            );
        }

        let retry_max_attempts =
            parse_env("RETRY_MAX_ATTEMPTS", Self::DEFAULT_RETRY_MAX_ATTEMPTS)?;
        if retry_max_attempts == 0 {
            return Err("RETRY_MAX_ATTEMPTS must be at least 1".to_string());
        }

        Ok(Self {
            default_timeout: Duration::from_millis(default_timeout_ms),
            max_timeout: Duration::from_millis(max_timeout_ms),
            retry_max_attempts,
            retry_initial_backoff: Duration::from_millis(parse_env(
                "RETRY_INITIAL_BACKOFF_MS",
                Self::DEFAULT_RETRY_INITIAL_BACKOFF_MS,
            )?),
            retry_max_backoff: Duration::from_millis(parse_env(
                "RETRY_MAX_BACKOFF_MS",
                Self::DEFAULT_RETRY_MAX_BACKOFF_MS,
            )?),
        })
    }

    /// Resolve a caller-supplied timeout, clamped to the configured maximum
    pub fn effective_timeout(&self, requested_ms: Option<u64>) -> Duration {
        match requested_ms {
            Some(0) | None => self.default_timeout,
            Some(ms) => Duration::from_millis(ms).min(self.max_timeout),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            default_timeout: Duration::from_millis(Self::DEFAULT_TIMEOUT_MS),
            max_timeout: Duration::from_millis(Self::DEFAULT_MAX_TIMEOUT_MS),
            retry_max_attempts: Self::DEFAULT_RETRY_MAX_ATTEMPTS,
            retry_initial_backoff: Duration::from_millis(Self::DEFAULT_RETRY_INITIAL_BACKOFF_MS),
            retry_max_backoff: Duration::from_millis(Self::DEFAULT_RETRY_MAX_BACKOFF_MS),
        }
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title =
            env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Commerce Reports API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "Reporting API over the commerce schema".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}
