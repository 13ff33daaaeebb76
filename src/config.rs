use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub session_file: PathBuf,
    pub login_timeout_secs: u64,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let api_url = env::var("EXAMERA_API_URL")
            .unwrap_or_else(|_| "http://localhost:5000/api".to_string());
        let api_url = api_url.trim_end_matches('/').to_string();

        let session_file = match env::var("EXAMERA_SESSION_FILE") {
            Ok(path) => PathBuf::from(path),
            Err(_) => default_session_file()?,
        };

        let login_timeout_secs = match env::var("EXAMERA_LOGIN_TIMEOUT_SECS") {
            Ok(raw) => raw.parse().map_err(|e| {
                Error::Config(format!("Invalid value for EXAMERA_LOGIN_TIMEOUT_SECS: {}", e))
            })?,
            Err(_) => 30,
        };

        Ok(Self {
            api_url,
            session_file,
            login_timeout_secs,
        })
    }
}

fn default_session_file() -> Result<PathBuf> {
    let base = dirs::data_dir()
        .ok_or_else(|| Error::Config("Could not determine a data directory; set EXAMERA_SESSION_FILE".to_string()))?;
    Ok(base.join("examera").join("session.json"))
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
