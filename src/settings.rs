use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Process configuration, read from the environment once at startup.
///
/// The upstream host is derived from `BACKEND_SUBDOMAIN` and `ENV_TYPE`
/// unless `UPSTREAM_BASE_URL` overrides it outright (tests and local
/// development point this at a stub).
#[derive(Debug, Clone)]
pub struct Settings {
    pub port: u16,
    pub database_path: String,
    pub data_dir: PathBuf,
    pub upstream_base_url: String,
    pub renderer_command: String,
    pub renderer_script: PathBuf,
    pub render_timeout_secs: u64,
    pub log_level: Option<String>,
}

impl Settings {
    pub fn from_env() -> Self {
        let subdomain = env::var("BACKEND_SUBDOMAIN").unwrap_or_else(|_| "api".to_string());
        let env_type = env::var("ENV_TYPE").unwrap_or_default();
        let upstream_base_url = env::var("UPSTREAM_BASE_URL")
            .unwrap_or_else(|_| default_upstream_url(&subdomain, &env_type));

        Self {
            port: env_parse("PORT", 4200),
            database_path: env::var("DATABASE_PATH").unwrap_or_else(|_| "grantflow.db".to_string()),
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
            upstream_base_url,
            renderer_command: env::var("RENDERER_COMMAND").unwrap_or_else(|_| "node".to_string()),
            renderer_script: env::var("RENDERER_SCRIPT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("renderer/render-chart.js")),
            render_timeout_secs: env_parse("RENDER_TIMEOUT_SECS", 30),
            log_level: env::var("LOG_LEVEL").ok(),
        }
    }
}

fn default_upstream_url(subdomain: &str, env_type: &str) -> String {
    match env_type {
        "" | "prod" | "production" => format!("https://{}.grantsdata.org/v4/odata", subdomain),
        other => format!("https://{}-{}.grantsdata.org/v4/odata", subdomain, other),
    }
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_url_without_env_suffix() {
        assert_eq!(
            default_upstream_url("api", ""),
            "https://api.grantsdata.org/v4/odata"
        );
    }

    #[test]
    fn upstream_url_with_env_suffix() {
        assert_eq!(
            default_upstream_url("api", "staging"),
            "https://api-staging.grantsdata.org/v4/odata"
        );
    }
}
