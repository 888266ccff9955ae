use anyhow::Context as _;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Optional `<home>/config.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct UserConfig {
    pub logging: Option<LoggingCfg>,
    pub export: Option<ExportCfg>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoggingCfg {
    pub to_file: Option<bool>,
    pub dir: Option<String>,
    pub json: Option<bool>,
    pub compact: Option<bool>,
    pub pretty: Option<bool>,
    pub level: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExportCfg {
    /// Ollama server, e.g. `http://localhost:11434`.
    pub ollama_host: Option<String>,
    /// LM Studio data directory (presets go under `config-presets/`).
    pub lmstudio_home: Option<String>,
    /// Default directory for flat config exports.
    pub output_dir: Option<String>,
}

pub fn load_user_config(home: &Path) -> anyhow::Result<Option<UserConfig>> {
    let path = home.join("config.toml");
    if !path.exists() {
        return Ok(None);
    }
    let s = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let cfg: UserConfig =
        toml::from_str(&s).with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(Some(cfg))
}

pub fn expand_home(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Ok(home) = std::env::var("HOME")
    {
        return PathBuf::from(home).join(stripped);
    }
    PathBuf::from(path)
}

/// `$HOME/<name>`, or `<cwd>/<name>` when `HOME` is unset.
pub fn home_subdir(name: &str) -> PathBuf {
    match std::env::var("HOME") {
        Ok(home) if !home.is_empty() => PathBuf::from(home).join(name),
        _ => std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_is_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(load_user_config(dir.path()).expect("load").is_none());
    }

    #[test]
    fn parses_logging_and_export_sections() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join("config.toml"),
            r#"
[logging]
level = "debug"
json = true

[export]
ollama_host = "http://gpu-box:11434"
lmstudio_home = "~/.lmstudio"
"#,
        )
        .expect("write config");
        let cfg = load_user_config(dir.path())
            .expect("load")
            .expect("present");
        let logging = cfg.logging.expect("logging");
        assert_eq!(logging.level.as_deref(), Some("debug"));
        assert_eq!(logging.json, Some(true));
        let export = cfg.export.expect("export");
        assert_eq!(export.ollama_host.as_deref(), Some("http://gpu-box:11434"));
        assert_eq!(export.lmstudio_home.as_deref(), Some("~/.lmstudio"));
        assert!(export.output_dir.is_none());
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("config.toml"), "[logging\nlevel=").expect("write");
        let err = load_user_config(dir.path()).expect_err("should fail");
        let msg = format!("{err:#}");
        assert!(msg.contains("failed to parse"), "{msg}");
        assert!(msg.contains("config.toml"), "{msg}");
    }

    #[test]
    fn expand_home_leaves_absolute_paths() {
        assert_eq!(expand_home("/opt/presets"), PathBuf::from("/opt/presets"));
    }
}
