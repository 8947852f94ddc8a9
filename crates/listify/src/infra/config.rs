//! Configuration management utilities.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));
static DEFAULT_WORKSPACE_CONFIG_PATH: &str = ".listify/config.toml";

/// Layered configuration loaded from defaults, user, workspace, and env.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub render: Render,
    #[serde(default)]
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Defaults {
    #[serde(default = "Defaults::default_format")]
    pub format: String,
    #[serde(default)]
    pub copy_to_clipboard: bool,
}

impl Defaults {
    fn default_format() -> String {
        "markdown".into()
    }
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            format: Self::default_format(),
            copy_to_clipboard: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Render {
    #[serde(default = "Render::default_bullet")]
    pub bullet: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    template: Option<String>,
}

impl Render {
    fn default_bullet() -> String {
        "•".into()
    }

    /// Custom template name or path, if one is configured.
    pub fn template(&self) -> Option<String> {
        self.template
            .clone()
            .filter(|template| !template.trim().is_empty())
    }
}

impl Default for Render {
    fn default() -> Self {
        Self {
            bullet: Self::default_bullet(),
            template: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    #[serde(default = "Status::default_show_info")]
    pub show_info: bool,
}

impl Status {
    fn default_show_info() -> bool {
        true
    }
}

impl Default for Status {
    fn default() -> Self {
        Self {
            show_info: Self::default_show_info(),
        }
    }
}

/// Settings read from one config file. Keys left unset keep the value from
/// the layers below.
#[derive(Debug, Default, Deserialize)]
struct ConfigLayer {
    #[serde(default)]
    defaults: DefaultsLayer,
    #[serde(default)]
    render: RenderLayer,
    #[serde(default)]
    status: StatusLayer,
}

#[derive(Debug, Default, Deserialize)]
struct DefaultsLayer {
    format: Option<String>,
    copy_to_clipboard: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct RenderLayer {
    bullet: Option<String>,
    template: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct StatusLayer {
    show_info: Option<bool>,
}

impl ConfigLayer {
    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&data).with_context(|| format!("invalid config file: {}", path.display()))
    }
}

/// Environment overrides for critical settings.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    format: Option<String>,
    bullet: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            format: env::var("LISTIFY_FORMAT").ok(),
            bullet: env::var("LISTIFY_BULLET").ok(),
        }
    }

    #[cfg(test)]
    fn for_tests(format: &str, bullet: &str) -> Self {
        Self {
            format: Some(format.to_owned()),
            bullet: Some(bullet.to_owned()),
        }
    }
}

impl Config {
    /// Load configuration from defaults, user/global config, workspace config, and env overrides.
    pub fn load() -> Result<Self> {
        let env = EnvOverrides::from_env();
        let global = global_config_path();
        let workspace = workspace_config_path()?;
        Self::load_with_layers(global, workspace, env)
    }

    /// Load with an explicit config file taking the place of the workspace layer.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("config file not found: {}", path.display());
        }
        let env = EnvOverrides::from_env();
        Self::load_with_layers(global_config_path(), Some(path.to_path_buf()), env)
    }

    fn load_with_layers(
        global: Option<PathBuf>,
        workspace: Option<PathBuf>,
        env_overrides: EnvOverrides,
    ) -> Result<Self> {
        let mut config = Self::from_str(&DEFAULT_CONFIG)?;

        if let Some(global_path) = global.filter(|path| path.exists()) {
            tracing::debug!(path = %global_path.display(), "loading global config");
            config = config.merge(ConfigLayer::from_file(&global_path)?);
        }

        if let Some(workspace_path) = workspace.filter(|path| path.exists()) {
            tracing::debug!(path = %workspace_path.display(), "loading workspace config");
            config = config.merge(ConfigLayer::from_file(&workspace_path)?);
        }

        Ok(apply_env_overrides(config, env_overrides))
    }

    fn from_str(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).with_context(|| "failed to parse TOML config".to_string())?;
        Ok(config)
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize configuration")
    }

    fn merge(self, layer: ConfigLayer) -> Self {
        Self {
            defaults: merge_defaults(self.defaults, layer.defaults),
            render: merge_render(self.render, layer.render),
            status: merge_status(self.status, layer.status),
        }
    }
}

fn merge_defaults(base: Defaults, overlay: DefaultsLayer) -> Defaults {
    Defaults {
        format: overlay.format.unwrap_or(base.format),
        copy_to_clipboard: overlay.copy_to_clipboard.unwrap_or(base.copy_to_clipboard),
    }
}

fn merge_render(base: Render, overlay: RenderLayer) -> Render {
    Render {
        bullet: overlay.bullet.unwrap_or(base.bullet),
        template: overlay.template.or(base.template),
    }
}

fn merge_status(base: Status, overlay: StatusLayer) -> Status {
    Status {
        show_info: overlay.show_info.unwrap_or(base.show_info),
    }
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("listify/config.toml"))
}

fn workspace_config_path() -> Result<Option<PathBuf>> {
    let cwd = env::current_dir()?;
    let root = find_repo_root(&cwd).unwrap_or(cwd);
    Ok(Some(root.join(DEFAULT_WORKSPACE_CONFIG_PATH)))
}

fn find_repo_root(start: &Path) -> Option<PathBuf> {
    let mut current = start;
    loop {
        if current.join(".git").exists() {
            return Some(current.to_path_buf());
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return None,
        }
    }
}

fn apply_env_overrides(mut config: Config, env: EnvOverrides) -> Config {
    if let Some(format) = env.format {
        config.defaults.format = format;
    }
    if let Some(bullet) = env.bullet {
        config.render.bullet = bullet;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_uses_defaults_when_no_files() {
        let config = Config::load_with_layers(None, None, EnvOverrides::default())
            .expect("load default config");
        assert_eq!(config.defaults.format, "markdown");
        assert_eq!(config.render.bullet, "•");
        assert_eq!(config.render.template(), None);
        assert!(config.status.show_info);
    }

    #[test]
    fn merge_global_and_workspace() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let global = temp.path().join("config.toml");
        fs::write(
            &global,
            r#"
[defaults]
format = "plain"
[render]
bullet = "+"
"#,
        )?;

        let workspace_dir = temp.path().join("repo");
        fs::create_dir_all(workspace_dir.join(".listify"))?;
        fs::create_dir_all(workspace_dir.join(".git"))?;
        fs::write(
            workspace_dir.join(".listify/config.toml"),
            r#"
[render]
template = "templates/list.j2"
[status]
show_info = false
"#,
        )?;

        let global_path = Some(global);
        let workspace_path = Some(workspace_dir.join(".listify/config.toml"));

        let config =
            Config::load_with_layers(global_path, workspace_path, EnvOverrides::default())?;

        assert_eq!(config.defaults.format, "plain");
        assert_eq!(config.render.bullet, "+");
        assert_eq!(config.render.template().as_deref(), Some("templates/list.j2"));
        assert!(!config.status.show_info);

        Ok(())
    }

    #[test]
    fn workspace_can_restore_values_the_global_layer_changed() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let global = temp.path().join("global.toml");
        fs::write(
            &global,
            r#"
[defaults]
format = "plain"
copy_to_clipboard = true
[status]
show_info = false
"#,
        )?;
        let workspace = temp.path().join("workspace.toml");
        fs::write(
            &workspace,
            r#"
[defaults]
format = "markdown"
copy_to_clipboard = false
[status]
show_info = true
"#,
        )?;

        let config =
            Config::load_with_layers(Some(global), Some(workspace), EnvOverrides::default())?;

        assert_eq!(config.defaults.format, "markdown");
        assert!(!config.defaults.copy_to_clipboard);
        assert!(config.status.show_info);
        Ok(())
    }

    #[test]
    fn env_overrides_take_precedence() -> Result<()> {
        let overrides = EnvOverrides::for_tests("json", "*");
        let config = Config::load_with_layers(None, None, overrides)?;
        assert_eq!(config.defaults.format, "json");
        assert_eq!(config.render.bullet, "*");
        Ok(())
    }

    #[test]
    fn find_repo_root_walks_up_to_git_dir() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let nested = temp.path().join("repo/a/b");
        fs::create_dir_all(&nested)?;
        fs::create_dir_all(temp.path().join("repo/.git"))?;
        assert_eq!(find_repo_root(&nested), Some(temp.path().join("repo")));
        Ok(())
    }

    #[test]
    fn effective_config_serializes_to_toml() -> Result<()> {
        let text = Config::default().to_toml()?;
        let reparsed = Config::from_str(&text)?;
        assert_eq!(reparsed, Config::default());
        Ok(())
    }

    #[test]
    fn invalid_config_returns_error() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let file = temp.path().join("broken.toml");
        fs::write(&file, "this is not toml")?;
        let result = ConfigLayer::from_file(&file);
        assert!(result.is_err());
        Ok(())
    }
}
