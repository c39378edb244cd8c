use crate::application::poller::WatermarkPolicy;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    pub backend: BackendSettings,
    pub polling: PollingSettings,
    pub downloads: DownloadSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendSettings {
    pub base_url: String,
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PollingSettings {
    pub interval_ms: u64,
    #[serde(default)]
    pub watermark_policy: WatermarkPolicy,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DownloadSettings {
    pub dir: PathBuf,
}

impl BackendSettings {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

impl PollingSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    load_dashboard_config_from("config/dashboard")
}

pub fn load_dashboard_config_from(path: &str) -> anyhow::Result<DashboardConfig> {
    load_with_environment(path, dashboard_environment())
}

/// `DASHBOARD_POLLING__INTERVAL_MS=250` sets `polling.interval_ms`.
fn dashboard_environment() -> config::Environment {
    config::Environment::with_prefix("DASHBOARD")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

fn load_with_environment(
    path: &str,
    environment: config::Environment,
) -> anyhow::Result<DashboardConfig> {
    let settings = config::Config::builder()
        .set_default("backend.base_url", "http://127.0.0.1:5000")?
        .set_default("polling.interval_ms", 1000)?
        .set_default("polling.watermark_policy", "any_change")?
        .set_default("downloads.dir", "downloads")?
        .add_source(config::File::with_name(path).required(false))
        .add_source(environment)
        .build()?;

    let mut config: DashboardConfig = settings.try_deserialize()?;
    config.backend.base_url = normalize_base_url(&config.backend.base_url);

    if config.polling.interval_ms == 0 {
        anyhow::bail!("polling.interval_ms must be greater than zero");
    }

    Ok(config)
}

pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_config(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "rectifier-dashboard-config-{}-{}",
            name,
            std::process::id()
        ));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("dashboard.toml");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_defaults_without_file() {
        let config = load_dashboard_config_from("does/not/exist/dashboard").unwrap();

        assert_eq!(config.backend.base_url, "http://127.0.0.1:5000");
        assert_eq!(config.backend.request_timeout(), None);
        assert_eq!(config.polling.interval(), Duration::from_millis(1000));
        assert_eq!(config.polling.watermark_policy, WatermarkPolicy::AnyChange);
        assert_eq!(config.downloads.dir, PathBuf::from("downloads"));
    }

    #[test]
    fn test_file_values_override_defaults() {
        let path = write_config(
            "override",
            r#"
[backend]
base_url = "http://rectifier.local:8080/"
request_timeout_ms = 2500

[polling]
interval_ms = 500
watermark_policy = "increasing"
"#,
        );

        let config = load_dashboard_config_from(path.to_str().unwrap()).unwrap();

        assert_eq!(config.backend.base_url, "http://rectifier.local:8080");
        assert_eq!(
            config.backend.request_timeout(),
            Some(Duration::from_millis(2500))
        );
        assert_eq!(config.polling.interval_ms, 500);
        assert_eq!(config.polling.watermark_policy, WatermarkPolicy::Increasing);
        assert_eq!(config.downloads.dir, PathBuf::from("downloads"));
    }

    #[test]
    fn test_environment_overrides_file() {
        let path = write_config(
            "environment",
            "[polling]\ninterval_ms = 500\n\n[backend]\nbase_url = \"http://file:5000\"\n",
        );
        let vars = config::Map::from([
            ("DASHBOARD_POLLING__INTERVAL_MS".to_string(), "250".to_string()),
            (
                "DASHBOARD_POLLING__WATERMARK_POLICY".to_string(),
                "increasing".to_string(),
            ),
            ("OTHER_POLLING__INTERVAL_MS".to_string(), "9".to_string()),
        ]);

        let config = load_with_environment(
            path.to_str().unwrap(),
            dashboard_environment().source(Some(vars)),
        )
        .unwrap();

        assert_eq!(config.polling.interval_ms, 250);
        assert_eq!(config.polling.watermark_policy, WatermarkPolicy::Increasing);
        assert_eq!(config.backend.base_url, "http://file:5000");
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let path = write_config("zero", "[polling]\ninterval_ms = 0\n");

        assert!(load_dashboard_config_from(path.to_str().unwrap()).is_err());
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url(" http://host:5000// "), "http://host:5000");
        assert_eq!(normalize_base_url("http://host"), "http://host");
    }
}
