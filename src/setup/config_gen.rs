//! Launcher configuration generator.
//!
//! Reads `servers.config.json` (server definitions plus named presets) and
//! produces the `{"mcpServers": {...}}` document editors load to spawn the
//! adapters.

use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::core::error::{Error, Result};

pub const SERVERS_CONFIG_FILE: &str = "servers.config.json";

static ENV_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("static identifier pattern")
});

/// One adapter the launcher can spawn.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerEntry {
    #[serde(default)]
    pub description: String,
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

/// A named subset of servers with per-server defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Preset {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub servers: Option<Vec<String>>,
    /// server name -> parameter -> value
    #[serde(default)]
    pub default_params: BTreeMap<String, BTreeMap<String, Value>>,
}

/// Contents of `servers.config.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct ServersConfig {
    pub servers: BTreeMap<String, ServerEntry>,
    #[serde(default)]
    pub presets: BTreeMap<String, Preset>,
}

/// How the launcher starts one server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LauncherEntry {
    pub command: String,
    pub args: Vec<String>,
    pub env: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LauncherConfig {
    #[serde(rename = "mcpServers")]
    pub mcp_servers: BTreeMap<String, LauncherEntry>,
}

impl LauncherConfig {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl ServersConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json(&content)
            .map_err(|e| Error::config(format!("invalid {}: {e}", path.display())))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build the launcher document, optionally restricted to `preset`.
    ///
    /// Relative path arguments resolve against `root`; `${VAR}` placeholders
    /// in env values resolve through `lookup`.
    pub fn generate<F>(&self, preset: Option<&str>, root: &Path, lookup: F) -> Result<LauncherConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let (names, defaults) = match preset {
            Some(name) => {
                let preset = self.presets.get(name).ok_or_else(|| {
                    Error::config(format!(
                        "unknown preset '{name}' (available: {})",
                        self.presets.keys().cloned().collect::<Vec<_>>().join(", ")
                    ))
                })?;
                let names = preset
                    .servers
                    .clone()
                    .unwrap_or_else(|| self.servers.keys().cloned().collect());
                (names, Some(&preset.default_params))
            }
            None => (self.servers.keys().cloned().collect(), None),
        };

        let mut launcher = LauncherConfig::default();
        for name in names {
            let Some(server) = self.servers.get(&name) else {
                warn!("Server '{}' not found in config, skipping", name);
                continue;
            };

            let mut env: BTreeMap<String, String> = server
                .env
                .iter()
                .map(|(key, value)| (key.clone(), substitute_env(value, &lookup)))
                .collect();

            if let Some(params) = defaults.and_then(|d| d.get(&name)) {
                for (key, value) in params {
                    env.insert(default_param_key(&name, key), param_value(value));
                }
            }

            let entry = LauncherEntry {
                command: server.command.clone(),
                args: server.args.iter().map(|arg| resolve_arg(root, arg)).collect(),
                env,
            };

            let key = match preset {
                Some(preset) => format!("{name}-{preset}"),
                None => name.clone(),
            };
            debug!("Generated launcher entry {}", key);
            launcher.mcp_servers.insert(key, entry);
        }

        Ok(launcher)
    }

    /// Human-readable list of presets and servers.
    pub fn listing(&self) -> String {
        let mut out = String::from("Available presets:\n");
        if self.presets.is_empty() {
            out.push_str("  (none)\n");
        }
        for (name, preset) in &self.presets {
            let _ = writeln!(out, "  {name}: {}", preset.description);
        }
        out.push_str("\nAvailable servers:\n");
        for (name, server) in &self.servers {
            let _ = writeln!(out, "  {name}: {}", server.description);
        }
        out
    }
}

/// `DEFAULT_<SERVER>_<KEY>`, upper-cased, `-` mapped to `_`.
pub fn default_param_key(server: &str, key: &str) -> String {
    format!("DEFAULT_{}_{}", server, key)
        .to_uppercase()
        .replace('-', "_")
}

fn param_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn resolve_arg(root: &Path, arg: &str) -> String {
    let relative = if let Some(rest) = arg.strip_prefix("./") {
        rest
    } else if arg.starts_with("../") {
        arg
    } else {
        return arg.to_string();
    };
    root.join(relative).to_string_lossy().into_owned()
}

/// Replace `${VAR}` placeholders; unresolved ones stay as written.
pub fn substitute_env<F>(value: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    ENV_PLACEHOLDER
        .replace_all(value, |caps: &Captures| {
            let name = &caps[1];
            match lookup(name) {
                Some(resolved) => resolved,
                None => {
                    warn!("Environment variable {} is not set, leaving placeholder", name);
                    caps[0].to_string()
                }
            }
        })
        .into_owned()
}

/// Project root for a config path: the file's directory, made absolute so
/// generated launcher args work from any working directory.
pub fn project_root(config_path: &Path) -> Result<PathBuf> {
    let dir = match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::path::absolute(dir).map_err(|e| {
        Error::config(format!("cannot resolve project root of {}: {e}", config_path.display()))
    })
}
