//! Rendering converted documents and writing the result.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use clap::ValueEnum;
use minijinja::Environment;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::infra::clipboard::Clipboard;
use crate::infra::config::Config;
use crate::infra::document::Block;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
#[value(rename_all = "kebab-case")]
pub enum RenderFormat {
    /// Markdown with `-` bullets.
    Markdown,
    /// Plain text with the configured bullet glyph.
    Plain,
    /// JSON array of blocks.
    Json,
}

impl RenderFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderFormat::Markdown => "markdown",
            RenderFormat::Plain => "plain",
            RenderFormat::Json => "json",
        }
    }

    /// Built-in template used when no custom template is configured.
    fn default_template(&self) -> Option<&'static str> {
        match self {
            RenderFormat::Markdown => Some(MARKDOWN_TEMPLATE_NAME),
            RenderFormat::Plain => Some(PLAIN_TEMPLATE_NAME),
            RenderFormat::Json => None,
        }
    }
}

impl FromStr for RenderFormat {
    type Err = RenderFormatParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(RenderFormat::Markdown),
            "plain" | "text" | "txt" => Ok(RenderFormat::Plain),
            "json" => Ok(RenderFormat::Json),
            other => Err(RenderFormatParseError::UnknownFormat(other.to_string())),
        }
    }
}

/// Error returned when parsing a [`RenderFormat`] fails.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum RenderFormatParseError {
    #[error("unknown output format '{0}'")]
    UnknownFormat(String),
}

/// Runtime options controlling rendering and output.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub format: RenderFormat,
    pub template: Option<String>,
    pub bullet: String,
    pub output_path: Option<PathBuf>,
    pub copy_to_clipboard: bool,
}

impl RenderOptions {
    /// Build options from configuration defaults.
    pub fn from_config(config: &Config) -> Self {
        let format = match config.defaults.format.parse::<RenderFormat>() {
            Ok(format) => format,
            Err(err) => {
                tracing::warn!(error = %err, "falling back to markdown output");
                RenderFormat::Markdown
            }
        };
        Self {
            format,
            template: config.render.template(),
            bullet: config.render.bullet.clone(),
            output_path: None,
            copy_to_clipboard: config.defaults.copy_to_clipboard,
        }
    }
}

/// Result of writing a rendered document.
#[derive(Debug, Clone)]
pub struct RenderResult {
    pub rendered: String,
    pub output_path: Option<PathBuf>,
    pub copied_to_clipboard: bool,
}

/// Renders document blocks and delivers the output.
pub struct Renderer {
    env: Environment<'static>,
    clipboard: Mutex<Clipboard>,
}

impl Renderer {
    /// Create a renderer with the built-in templates loaded.
    pub fn new() -> Result<Self> {
        Ok(Self {
            env: default_environment()?,
            clipboard: Mutex::new(Clipboard::new()),
        })
    }

    /// Render `blocks` into a string.
    pub fn render(&self, blocks: &[Block], options: &RenderOptions) -> Result<String> {
        let template = match (&options.template, options.format.default_template()) {
            (Some(custom), _) => custom.as_str(),
            (None, Some(builtin)) => builtin,
            (None, None) => {
                return serde_json::to_string_pretty(blocks)
                    .map(|json| json + "\n")
                    .context("failed to serialize document blocks");
            }
        };

        let context = build_template_context(blocks, options)?;
        self.render_with_template(&context, template)
    }

    /// Render `blocks` and write or copy the output according to `options`.
    pub fn emit(&self, blocks: &[Block], options: &RenderOptions) -> Result<RenderResult> {
        let rendered = self.render(blocks, options)?;

        if let Some(path) = &options.output_path {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create output directory: {}", parent.display())
                })?;
            }
            fs::write(path, &rendered)
                .with_context(|| format!("failed to write output to {}", path.display()))?;
            tracing::info!(path = %path.display(), "wrote rendered document");
        }

        if options.copy_to_clipboard {
            self.clipboard
                .lock()
                .map_err(|_| anyhow!("clipboard lock poisoned"))?
                .copy(&rendered)
                .context("failed to copy output to clipboard")?;
        }

        Ok(RenderResult {
            rendered,
            output_path: options.output_path.clone(),
            copied_to_clipboard: options.copy_to_clipboard,
        })
    }

    fn render_with_template(
        &self,
        context: &TemplateContext,
        template_name: &str,
    ) -> Result<String> {
        if let Ok(template) = self.env.get_template(template_name) {
            return template
                .render(context)
                .map_err(|err| anyhow!("failed to render template '{template_name}': {err}"));
        }

        let template_path = Path::new(template_name);
        if template_path.exists() {
            let source = fs::read_to_string(template_path).with_context(|| {
                format!(
                    "failed to load template from path {}",
                    template_path.display()
                )
            })?;
            let mut env = Environment::new();
            env.set_trim_blocks(true);
            env.set_lstrip_blocks(true);
            env.add_template("external", &source)
                .map_err(|err| anyhow!("invalid template '{template_name}': {err}"))?;
            return env
                .get_template("external")
                .and_then(|template| template.render(context))
                .map_err(|err| anyhow!("failed to render template '{template_name}': {err}"));
        }

        Err(anyhow!(
            "template '{}' not found (built-in or filesystem)",
            template_name
        ))
    }
}

fn default_environment() -> Result<Environment<'static>> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.add_template(MARKDOWN_TEMPLATE_NAME, MARKDOWN_TEMPLATE)
        .map_err(|err| anyhow!("failed to register markdown template: {err}"))?;
    env.add_template(PLAIN_TEMPLATE_NAME, PLAIN_TEMPLATE)
        .map_err(|err| anyhow!("failed to register plain template: {err}"))?;
    Ok(env)
}

fn build_template_context(blocks: &[Block], options: &RenderOptions) -> Result<TemplateContext> {
    let generated_at = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .context("failed to format render timestamp")?;

    Ok(TemplateContext {
        generated_at,
        format: options.format.as_str().to_string(),
        bullet: options.bullet.clone(),
        blocks: blocks.to_vec(),
    })
}

#[derive(Serialize)]
struct TemplateContext {
    generated_at: String,
    format: String,
    bullet: String,
    blocks: Vec<Block>,
}

const MARKDOWN_TEMPLATE_NAME: &str = "markdown_list";
const PLAIN_TEMPLATE_NAME: &str = "plain_list";

const MARKDOWN_TEMPLATE: &str = r#"{% for block in blocks %}
{% if block.kind == "list" %}
{% for item in block.items %}
- {{ item }}
{% endfor %}
{% else %}
{{ block.text }}
{% endif %}
{% endfor %}
"#;

const PLAIN_TEMPLATE: &str = r#"{% for block in blocks %}
{% if block.kind == "list" %}
{% for item in block.items %}
{{ bullet }} {{ item }}
{% endfor %}
{% else %}
{{ block.text }}
{% endif %}
{% endfor %}
"#;
