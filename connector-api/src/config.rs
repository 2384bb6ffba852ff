/// Configuration management for the API server
///
/// Settings are layered, later sources overriding earlier ones:
///
/// 1. Built-in defaults
/// 2. `config/default.{toml,yaml,json}` relative to the working directory (optional)
/// 3. Environment variables (a `.env` file is loaded first if present)
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 5000)
/// - `CORS_ORIGINS`: Comma-separated allowed origins, `*` for any (default: *)
/// - `DATABASE_URL`: PostgreSQL connection string; unset selects the in-memory store
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `JWT_SECRET`: Secret key for JWT signing (required, at least 32 characters)
/// - `JWT_EXPIRATION_SECONDS`: Token lifetime (default: 360000, at most 10 years)
///
/// # Example
///
/// ```no_run
/// use connector_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use axum::http::HeaderValue;
use config::{Environment, File, Source};
use serde::{Deserialize, Serialize};

/// Minimum accepted length of `JWT_SECRET`
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Maximum accepted `JWT_EXPIRATION_SECONDS` (10 years)
pub const MAX_JWT_EXPIRATION_SECONDS: i64 = 10 * 365 * 24 * 60 * 60;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT configuration
    pub jwt: JwtConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins (`*` allows any)
    pub cors_origins: Vec<String>,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL, `None` for in-memory storage
    pub url: Option<String>,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Secret key for JWT signing
    ///
    /// Generate with: `openssl rand -hex 32`
    pub secret: String,

    /// Lifetime of issued tokens in seconds
    pub expiration_seconds: i64,
}

/// Flat view of every setting, as the sources provide them
#[derive(Debug, Deserialize)]
struct RawSettings {
    api_host: String,
    api_port: u16,
    cors_origins: String,
    database_url: Option<String>,
    database_max_connections: u32,
    jwt_secret: Option<String>,
    jwt_expiration_seconds: i64,
}

impl Config {
    /// Loads configuration from defaults, the optional config file and
    /// environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `JWT_SECRET` is missing or shorter than 32 characters
    /// - `JWT_EXPIRATION_SECONDS` is not between 1 and 10 years
    /// - A `CORS_ORIGINS` entry is not a valid header value
    /// - A value cannot be parsed (e.g. a non-numeric `API_PORT`)
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        Self::from_source(Environment::default())
    }

    /// Loads configuration with `source` as the highest-priority layer
    pub fn from_source<S>(source: S) -> anyhow::Result<Self>
    where
        S: Source + Send + Sync + 'static,
    {
        let raw: RawSettings = config::Config::builder()
            .set_default("api_host", "0.0.0.0")?
            .set_default("api_port", 5000_i64)?
            .set_default("cors_origins", "*")?
            .set_default("database_max_connections", 10_i64)?
            .set_default("jwt_expiration_seconds", 360_000_i64)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(source)
            .build()?
            .try_deserialize()?;

        Self::from_raw(raw)
    }

    fn from_raw(raw: RawSettings) -> anyhow::Result<Self> {
        let jwt_secret = raw
            .jwt_secret
            .ok_or_else(|| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;

        if jwt_secret.len() < MIN_JWT_SECRET_LEN {
            anyhow::bail!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LEN
            );
        }

        if raw.jwt_expiration_seconds <= 0 {
            anyhow::bail!("JWT_EXPIRATION_SECONDS must be positive");
        }

        if raw.jwt_expiration_seconds > MAX_JWT_EXPIRATION_SECONDS {
            anyhow::bail!(
                "JWT_EXPIRATION_SECONDS must be at most {} (10 years)",
                MAX_JWT_EXPIRATION_SECONDS
            );
        }

        let cors_origins: Vec<String> = raw
            .cors_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        if let Some(bad) = cors_origins
            .iter()
            .find(|origin| origin.parse::<HeaderValue>().is_err())
        {
            anyhow::bail!("CORS_ORIGINS entry {:?} is not a valid origin", bad);
        }

        let database_url = raw.database_url.filter(|url| !url.trim().is_empty());

        Ok(Self {
            api: ApiConfig {
                host: raw.api_host,
                port: raw.api_port,
                cors_origins,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections: raw.database_max_connections,
            },
            jwt: JwtConfig {
                secret: jwt_secret,
                expiration_seconds: raw.jwt_expiration_seconds,
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// Whether any origin may call the API
    pub fn allows_any_origin(&self) -> bool {
        self.api.cors_origins.iter().any(|origin| origin == "*")
    }
}
