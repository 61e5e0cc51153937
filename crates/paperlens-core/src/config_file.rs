use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::Config;

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub model: Option<ModelSection>,
    pub download: Option<DownloadSection>,
    pub server: Option<ServerSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelSection {
    pub name: Option<String>,
    pub api_base: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DownloadSection {
    pub timeout_secs: Option<u64>,
    pub max_pdf_mb: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub cors_origin: Option<String>,
}

/// Where and how the HTTP server listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// The single origin allowed by CORS; `*` allows any.
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
            cors_origin: "http://localhost:3000".to_string(),
        }
    }
}

/// Platform config directory path: `<config_dir>/paperlens/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("paperlens").join("config.toml"))
}

/// Load config by cascading CWD `.paperlens.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".paperlens.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(file) => Some(file),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparseable config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let base_model = base.model.unwrap_or_default();
    let over_model = overlay.model.unwrap_or_default();
    let base_download = base.download.unwrap_or_default();
    let over_download = overlay.download.unwrap_or_default();
    let base_server = base.server.unwrap_or_default();
    let over_server = overlay.server.unwrap_or_default();

    ConfigFile {
        model: Some(ModelSection {
            name: over_model.name.or(base_model.name),
            api_base: over_model.api_base.or(base_model.api_base),
            timeout_secs: over_model.timeout_secs.or(base_model.timeout_secs),
        }),
        download: Some(DownloadSection {
            timeout_secs: over_download.timeout_secs.or(base_download.timeout_secs),
            max_pdf_mb: over_download.max_pdf_mb.or(base_download.max_pdf_mb),
        }),
        server: Some(ServerSection {
            host: over_server.host.or(base_server.host),
            port: over_server.port.or(base_server.port),
            cors_origin: over_server.cors_origin.or(base_server.cors_origin),
        }),
    }
}

/// Resolve the analysis [`Config`]: environment > file > defaults.
///
/// `env` looks up a variable by name; pass `|k| std::env::var(k).ok()` in
/// binaries. The API key is only ever taken from the environment.
pub fn resolve(file: &ConfigFile, env: impl Fn(&str) -> Option<String>) -> Config {
    let defaults = Config::default();
    let model = file.model.clone().unwrap_or_default();
    let download = file.download.clone().unwrap_or_default();

    Config {
        api_key: env("OPENAI_API_KEY").filter(|k| !k.trim().is_empty()),
        model: env("PAPERLENS_MODEL")
            .or(model.name)
            .unwrap_or(defaults.model),
        api_base: env("PAPERLENS_API_BASE")
            .or(model.api_base)
            .unwrap_or(defaults.api_base),
        model_timeout_secs: env("PAPERLENS_MODEL_TIMEOUT")
            .and_then(|v| v.parse().ok())
            .or(model.timeout_secs)
            .unwrap_or(defaults.model_timeout_secs),
        download_timeout_secs: env("PAPERLENS_DOWNLOAD_TIMEOUT")
            .and_then(|v| v.parse().ok())
            .or(download.timeout_secs)
            .unwrap_or(defaults.download_timeout_secs),
        max_pdf_bytes: download
            .max_pdf_mb
            .map(|mb| mb.saturating_mul(1024 * 1024))
            .unwrap_or(defaults.max_pdf_bytes),
    }
}

/// Resolve the [`ServerConfig`]: environment > file > defaults.
pub fn resolve_server(file: &ConfigFile, env: impl Fn(&str) -> Option<String>) -> ServerConfig {
    let defaults = ServerConfig::default();
    let server = file.server.clone().unwrap_or_default();

    ServerConfig {
        host: env("PAPERLENS_HOST")
            .or(server.host)
            .unwrap_or(defaults.host),
        port: env("PAPERLENS_PORT")
            .and_then(|v| v.parse().ok())
            .or(server.port)
            .unwrap_or(defaults.port),
        cors_origin: env("PAPERLENS_CORS_ORIGIN")
            .or(server.cors_origin)
            .unwrap_or(defaults.cors_origin),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_without_file_or_env() {
        let config = resolve(&ConfigFile::default(), env_from(&[]));
        assert!(config.api_key.is_none());
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.model_timeout_secs, 60);
        assert_eq!(config.download_timeout_secs, 60);

        let server = resolve_server(&ConfigFile::default(), env_from(&[]));
        assert_eq!(server, ServerConfig::default());
    }

    #[test]
    fn env_overrides_file() {
        let file: ConfigFile = toml::from_str(
            "[model]\nname = \"from-file\"\ntimeout_secs = 30\n\n[server]\nport = 8080\n",
        )
        .unwrap();
        let env = env_from(&[
            ("PAPERLENS_MODEL", "from-env"),
            ("OPENAI_API_KEY", "sk-test"),
            ("PAPERLENS_PORT", "9000"),
        ]);
        let config = resolve(&file, &env);
        assert_eq!(config.model, "from-env");
        assert_eq!(config.model_timeout_secs, 30);
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(resolve_server(&file, &env).port, 9000);
    }

    #[test]
    fn blank_api_key_counts_as_unset() {
        let config = resolve(&ConfigFile::default(), env_from(&[("OPENAI_API_KEY", "  ")]));
        assert!(config.api_key.is_none());
    }

    #[test]
    fn unparseable_env_number_falls_back() {
        let config = resolve(
            &ConfigFile::default(),
            env_from(&[("PAPERLENS_MODEL_TIMEOUT", "soon")]),
        );
        assert_eq!(config.model_timeout_secs, 60);
    }

    #[test]
    fn max_pdf_mb_converts_to_bytes() {
        let file: ConfigFile = toml::from_str("[download]\nmax_pdf_mb = 2\n").unwrap();
        assert_eq!(resolve(&file, env_from(&[])).max_pdf_bytes, 2 * 1024 * 1024);
    }

    #[test]
    fn huge_max_pdf_mb_saturates() {
        let file = ConfigFile {
            download: Some(DownloadSection {
                max_pdf_mb: Some(usize::MAX / 1024),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(resolve(&file, env_from(&[])).max_pdf_bytes, usize::MAX);
    }

    #[test]
    fn merge_overlay_wins_and_base_fills_gaps() {
        let base: ConfigFile =
            toml::from_str("[model]\nname = \"base\"\napi_base = \"http://base\"\n").unwrap();
        let overlay: ConfigFile = toml::from_str("[model]\nname = \"overlay\"\n").unwrap();
        let merged = merge(base, overlay);
        let model = merged.model.unwrap();
        assert_eq!(model.name.as_deref(), Some("overlay"));
        assert_eq!(model.api_base.as_deref(), Some("http://base"));
    }

    #[test]
    fn load_from_path_reads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\ncors_origin = \"https://papers.example\"\n").unwrap();
        let file = load_from_path(&path).unwrap();
        assert_eq!(
            file.server.unwrap().cors_origin.as_deref(),
            Some("https://papers.example")
        );
    }

    #[test]
    fn load_from_path_missing_or_invalid_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_from_path(&dir.path().join("absent.toml")).is_none());
        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[server\nport = ").unwrap();
        assert!(load_from_path(&bad).is_none());
    }
}
