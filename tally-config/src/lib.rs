//! Loader for run configuration with YAML + environment overlays.
//!
//! A `tubetally.yaml` file describes the topic sets to scrape, how the search
//! client talks to the site, whether a browser session is opened to pick up
//! consent cookies, and where the CSV reports land. Every key can be overridden
//! through `TALLY__`-prefixed environment variables (`TALLY__OUTPUT__DIR=/tmp`),
//! and `${VAR}` placeholders inside string values are expanded after merging.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

mod topics;

pub use topics::default_topic_sets;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct TallyConfig {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default = "default_topic_sets")]
    pub topic_sets: Vec<TopicSet>,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub on_query_error: QueryErrorPolicy,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// One named list of queries that is scraped and analysed together.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TopicSet {
    pub name: String,
    pub topics: Vec<String>,
}

impl TopicSet {
    /// Topics in the order they are searched (sorted, like the reports expect).
    pub fn sorted_topics(&self) -> Vec<String> {
        let mut topics = self.topics.clone();
        topics.sort();
        topics
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub base_url: String,
    pub user_agent: String,
    /// Value of the `PREF` cookie; pins the site's language and region so that
    /// relative ages come back in the "vor N Stunden" form.
    pub locale_cookie: String,
    pub timeout_secs: u64,
    pub retries: usize,
    /// Pause between two consecutive queries.
    pub delay_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.youtube.com".into(),
            user_agent:
                "Mozilla/5.0 (X11; Linux x86_64; rv:91.0) Gecko/20100101 Firefox/91.0".into(),
            locale_cookie: "f6=40000000&tz=Europe.Berlin&hl=de&gl=DE".into(),
            timeout_secs: 15,
            retries: 2,
            delay_ms: 0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub enabled: bool,
    pub webdriver_url: String,
    pub headless: bool,
    pub start_url: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            webdriver_url: "http://localhost:9515".into(),
            headless: false,
            start_url: "https://youtube.com".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    /// Also write every topic set before trimming.
    pub write_untrimmed: bool,
    /// Upper bound for the per-topic result count after trimming.
    pub max_length: Option<usize>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            write_untrimmed: false,
            max_length: None,
        }
    }
}

/// What the run does when fetching or parsing one query fails.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QueryErrorPolicy {
    #[default]
    Abort,
    Skip,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogEncoding {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub dir: Option<PathBuf>,
    pub format: LogEncoding,
    pub emit_stderr: bool,
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: None,
            format: LogEncoding::Text,
            emit_stderr: true,
            filter: "info".into(),
        }
    }
}

impl TallyConfig {
    fn validate(&self) -> Result<(), LoadError> {
        if self.topic_sets.is_empty() {
            return Err(LoadError::Invalid("no topic sets configured".into()));
        }
        let mut names = HashSet::new();
        for set in &self.topic_sets {
            if set.name.trim().is_empty() {
                return Err(LoadError::Invalid("topic set with empty name".into()));
            }
            if !names.insert(set.name.as_str()) {
                return Err(LoadError::Invalid(format!(
                    "duplicate topic set name: {}",
                    set.name
                )));
            }
            if set.topics.is_empty() {
                return Err(LoadError::Invalid(format!(
                    "topic set {} has no topics",
                    set.name
                )));
            }
            let mut seen = HashSet::new();
            if let Some(dup) = set.topics.iter().find(|t| !seen.insert(t.as_str())) {
                return Err(LoadError::Invalid(format!(
                    "topic set {} lists {dup:?} twice",
                    set.name
                )));
            }
        }
        Ok(())
    }
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct TallyConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for TallyConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl TallyConfigLoader {
    /// Start from built-in defaults. `TALLY__` env overrides are applied on
    /// top of every attached source when [`TallyConfigLoader::load`] runs.
    ///
    /// ```
    /// use tally_config::TallyConfigLoader;
    ///
    /// let config = TallyConfigLoader::new().load().expect("defaults load");
    /// assert_eq!(config.topic_sets.len(), 2);
    /// assert_eq!(config.search.base_url, "https://www.youtube.com");
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a YAML/TOML/JSON file that must exist.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that is merged only when present.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    ///
    /// ```
    /// use tally_config::{QueryErrorPolicy, TallyConfigLoader};
    ///
    /// let cfg = TallyConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// version: "test"
    /// on_query_error: skip
    /// topic_sets:
    ///   - name: "parties"
    ///     topics: ["SPD", "CDU"]
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.version.as_deref(), Some("test"));
    /// assert_eq!(cfg.topic_sets[0].sorted_topics(), vec!["CDU", "SPD"]);
    /// assert_eq!(cfg.on_query_error, QueryErrorPolicy::Skip);
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources into strongly typed config.
    ///
    /// `${VAR}` placeholders are expanded before the typed structs are built:
    ///
    /// ```
    /// use tally_config::TallyConfigLoader;
    ///
    /// unsafe { std::env::set_var("TALLY_DOC_OUT", "/tmp/reports"); }
    ///
    /// let config = TallyConfigLoader::new()
    ///     .with_yaml_str(r#"
    /// output:
    ///   dir: "${TALLY_DOC_OUT}/weekly"
    /// "#)
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(config.output.dir.to_str(), Some("/tmp/reports/weekly"));
    ///
    /// unsafe { std::env::remove_var("TALLY_DOC_OUT"); }
    /// ```
    pub fn load(self) -> Result<TallyConfig, LoadError> {
        // Added last so the environment beats every file.
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix("TALLY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: TallyConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;
        typed.validate()?;

        Ok(typed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expands_simple_string() {
        temp_env::with_var("FOO", Some("bar"), || {
            let mut v = json!("prefix-${FOO}-suffix");
            expand_env_in_value(&mut v);
            assert_eq!(v, json!("prefix-bar-suffix"));
        });
    }

    #[test]
    fn expands_in_array_and_object() {
        temp_env::with_vars([("CITY", Some("Berlin")), ("STATE", Some("BE"))], || {
            let mut v = json!([
                "hello-$CITY",
                { "loc": "${CITY}-${STATE}" },
                42,
                true,
                null
            ]);
            expand_env_in_value(&mut v);
            assert_eq!(
                v,
                json!(["hello-Berlin", { "loc": "Berlin-BE" }, 42, true, null])
            );
        });
    }

    #[test]
    fn stops_on_cycles() {
        temp_env::with_vars([("A", Some("${B}")), ("B", Some("${A}"))], || {
            let mut v = json!("x=${A}-y");
            expand_env_in_value(&mut v);
            let s = v.as_str().unwrap();
            assert!(s.starts_with("x=") && s.ends_with("-y"));
            assert!(s.contains("${"));
        });
    }

    #[test]
    fn unknown_vars_are_left_as_is() {
        let mut v = json!("hi-${DOES_NOT_EXIST_TALLY}");
        expand_env_in_value(&mut v);
        assert_eq!(v, json!("hi-${DOES_NOT_EXIST_TALLY}"));
    }

    #[test]
    fn rejects_duplicate_set_names() {
        let err = TallyConfigLoader::new()
            .with_yaml_str(
                r#"
topic_sets:
  - name: a
    topics: [x]
  - name: a
    topics: [y]
"#,
            )
            .load()
            .unwrap_err();
        assert!(matches!(err, LoadError::Invalid(msg) if msg.contains("duplicate")));
    }

    #[test]
    fn rejects_empty_topic_list() {
        let err = TallyConfigLoader::new()
            .with_yaml_str("topic_sets:\n  - name: a\n    topics: []\n")
            .load()
            .unwrap_err();
        assert!(matches!(err, LoadError::Invalid(_)));
    }

    #[test]
    fn rejects_repeated_topic() {
        let err = TallyConfigLoader::new()
            .with_yaml_str("topic_sets:\n  - name: a\n    topics: [x, x]\n")
            .load()
            .unwrap_err();
        assert!(matches!(err, LoadError::Invalid(msg) if msg.contains("twice")));
    }

    #[test]
    fn sub_sections_fall_back_to_defaults() {
        let cfg = TallyConfigLoader::new()
            .with_yaml_str("search:\n  delay_ms: 250\n")
            .load()
            .unwrap();
        assert_eq!(cfg.search.delay_ms, 250);
        assert_eq!(cfg.search.retries, 2);
        assert!(cfg.search.locale_cookie.contains("hl=de"));
        assert!(cfg.browser.enabled);
        assert_eq!(cfg.output.max_length, None);
        assert_eq!(cfg.on_query_error, QueryErrorPolicy::Abort);
        assert_eq!(cfg.logging.format, LogEncoding::Text);
    }
}
