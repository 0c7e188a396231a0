use crate::core::errors::{Error, Result};
use crate::lint::rules::RuleId;
use serde::{Deserialize, Serialize};

/// Root of a `.usetesting.toml` file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UseTestingConfig {
    #[serde(default)]
    pub rules: AnalyzerConfig,

    #[serde(default)]
    pub ignore: IgnoreConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IgnoreConfig {
    /// Glob patterns matched against file paths
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// Per-rule enable flags and the version-detection bypass.
///
/// Field names double as flag names for [`AnalyzerConfig::set`]; dashed
/// spellings (`os-mkdir-temp`) are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalyzerConfig {
    #[serde(default = "default_true", alias = "os-create-temp")]
    pub oscreatetemp: bool,

    #[serde(default = "default_true", alias = "os-mkdir-temp")]
    pub osmkdirtemp: bool,

    #[serde(default, alias = "os-temp-dir")]
    pub ostempdir: bool,

    #[serde(default, alias = "os-setenv")]
    pub ossetenv: bool,

    /// Requires Go 1.24
    #[serde(default = "default_true", alias = "os-chdir")]
    pub oschdir: bool,

    /// Requires Go 1.24
    #[serde(default, alias = "context-background")]
    pub contextbackground: bool,

    /// Requires Go 1.24
    #[serde(default, alias = "context-todo")]
    pub contexttodo: bool,

    /// Treat every unit as new enough for version-gated rules.
    #[serde(default, alias = "skip-go-version-detection")]
    pub skip_go_version_detection: bool,
}

fn default_true() -> bool {
    true
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            oscreatetemp: default_true(),
            osmkdirtemp: default_true(),
            ostempdir: false,
            ossetenv: false,
            oschdir: default_true(),
            contextbackground: false,
            contexttodo: false,
            skip_go_version_detection: false,
        }
    }
}

const SKIP_VERSION_FLAG: &str = "skipgoversiondetection";

impl AnalyzerConfig {
    /// Every rule enabled.
    pub fn all_enabled() -> Self {
        RuleId::ALL
            .into_iter()
            .fold(Self::default(), |config, id| config.with_rule(id, true))
    }

    pub fn with_rule(mut self, id: RuleId, enabled: bool) -> Self {
        self.set_enabled(id, enabled);
        self
    }

    pub fn is_enabled(&self, id: RuleId) -> bool {
        match id {
            RuleId::OsCreateTemp => self.oscreatetemp,
            RuleId::OsMkdirTemp => self.osmkdirtemp,
            RuleId::OsTempDir => self.ostempdir,
            RuleId::OsSetenv => self.ossetenv,
            RuleId::OsChdir => self.oschdir,
            RuleId::ContextBackground => self.contextbackground,
            RuleId::ContextTodo => self.contexttodo,
        }
    }

    pub fn set_enabled(&mut self, id: RuleId, enabled: bool) {
        let flag = match id {
            RuleId::OsCreateTemp => &mut self.oscreatetemp,
            RuleId::OsMkdirTemp => &mut self.osmkdirtemp,
            RuleId::OsTempDir => &mut self.ostempdir,
            RuleId::OsSetenv => &mut self.ossetenv,
            RuleId::OsChdir => &mut self.oschdir,
            RuleId::ContextBackground => &mut self.contextbackground,
            RuleId::ContextTodo => &mut self.contexttodo,
        };
        *flag = enabled;
    }

    pub fn any_enabled(&self) -> bool {
        RuleId::ALL.into_iter().any(|id| self.is_enabled(id))
    }

    /// Apply one flag by name, e.g. `set("oschdir", "false")`.
    pub fn set(&mut self, name: &str, value: &str) -> Result<()> {
        let key = normalize_flag_name(name);
        let enabled = parse_bool(value).ok_or_else(|| Error::InvalidFlagValue {
            name: name.to_string(),
            value: value.to_string(),
        })?;

        if key == SKIP_VERSION_FLAG {
            self.skip_go_version_detection = enabled;
            return Ok(());
        }

        let id = RuleId::from_flag_name(&key).ok_or_else(|| Error::UnknownFlag {
            name: name.to_string(),
        })?;
        self.set_enabled(id, enabled);
        Ok(())
    }

    /// Apply `name=value` assignments in order; a bare `name` means `name=true`.
    pub fn apply_assignments<'s>(
        &mut self,
        assignments: impl IntoIterator<Item = &'s str>,
    ) -> Result<()> {
        for assignment in assignments {
            let (name, value) = assignment
                .split_once('=')
                .map_or((assignment, "true"), |(name, value)| (name.trim(), value.trim()));
            self.set(name, value)?;
        }
        Ok(())
    }
}

fn normalize_flag_name(name: &str) -> String {
    name.trim()
        .chars()
        .filter(|c| *c != '-' && *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// The boolean spellings Go's flag package accepts.
fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
