use std::net::IpAddr;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: IpAddr,
    pub port: u16,
    pub media_root: PathBuf,
    pub max_body_size: usize,
    pub log_level: String,
    pub superuser: Option<SuperuserConfig>,
}

/// Credentials for the superuser created at startup when missing.
#[derive(Debug, Clone)]
pub struct SuperuserConfig {
    pub email: String,
    pub password: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_required("DATABASE_URL")?;

        let host: IpAddr = env_or("RECIPE_API_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid RECIPE_API_HOST: {e}"))?;

        let port: u16 = env_or("RECIPE_API_PORT", "8000")
            .parse()
            .map_err(|e| format!("Invalid RECIPE_API_PORT: {e}"))?;

        let media_root = PathBuf::from(env_or("RECIPE_API_MEDIA_ROOT", "media"));

        let max_body_size: usize = env_or("RECIPE_API_MAX_BODY_SIZE", "10485760")
            .parse()
            .map_err(|e| format!("Invalid RECIPE_API_MAX_BODY_SIZE: {e}"))?;

        let log_level = env_or("RECIPE_API_LOG_LEVEL", "info");

        let superuser = match (
            std::env::var("RECIPE_API_SUPERUSER_EMAIL").ok(),
            std::env::var("RECIPE_API_SUPERUSER_PASSWORD").ok(),
        ) {
            (Some(email), Some(password)) if !email.is_empty() => {
                Some(SuperuserConfig { email, password })
            }
            _ => None,
        };

        Ok(Config {
            database_url,
            host,
            port,
            media_root,
            max_body_size,
            log_level,
            superuser,
        })
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
