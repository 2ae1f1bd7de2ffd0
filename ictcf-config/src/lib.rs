//! Loader for scraper configuration with YAML + environment overlays.
//!
//! Every section has defaults matching the public iCTCF resource, so an
//! empty document (or no file at all) yields a runnable configuration.
//! Environment variables use the `ICTCF__<SECTION>__<KEY>` form, e.g.
//! `ICTCF__EXPORT__DIR=/data/out`. String values may reference `${VAR}`.
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

pub const BODY_TEMPERATURE: &str = "Body temperature";
pub const UNDERLYING_DISEASES: &str = "Underlying diseases";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IctcfConfig {
    pub site: SiteConfig,
    pub browser: BrowserConfig,
    pub selectors: Selectors,
    /// Fields read from each patient's overview table, appended as columns
    /// in this order.
    pub overview_fields: Vec<OverviewField>,
    pub export: ExportConfig,
    /// Stop paginating after this many result pages.
    pub max_pages: Option<usize>,
}

impl Default for IctcfConfig {
    fn default() -> Self {
        Self {
            site: SiteConfig::default(),
            browser: BrowserConfig::default(),
            selectors: Selectors::default(),
            overview_fields: vec![
                OverviewField::new(BODY_TEMPERATURE, 3),
                OverviewField::new(UNDERLYING_DISEASES, 4),
            ],
            export: ExportConfig::default(),
            max_pages: None,
        }
    }
}

/// One overview value: found by `label` when the page labels its values,
/// otherwise taken from the value cell at `position` (0-based).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverviewField {
    pub label: String,
    pub position: usize,
}

impl OverviewField {
    pub fn new(label: impl Into<String>, position: usize) -> Self {
        Self {
            label: label.into(),
            position,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub base_url: String,
    pub resource_path: String,
    /// Query parameters for the resource page, kept in declaration order.
    pub query: Vec<QueryParam>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://ictcf.biocuckoo.cn/".into(),
            resource_path: "Resource.php".into(),
            query: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParam {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// WebDriver endpoint (chromedriver by default).
    pub webdriver_url: String,
    pub headless: bool,
    pub window_size: (u32, u32),
    pub user_agent: Option<String>,
    /// Upper bound when waiting for a selector to appear.
    pub wait_timeout_secs: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".into(),
            headless: true,
            window_size: (1920, 1080),
            user_agent: None,
            wait_timeout_secs: 30,
        }
    }
}

/// CSS selectors (and the pagination label) describing the site layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub submit: String,
    pub table: String,
    pub detail_links: String,
    /// Value cells of a patient's overview table.
    pub overview_values: String,
    /// Label cells of the same table, paired with the values in order.
    pub overview_labels: String,
    /// Visible text of the "next page" anchor (case-sensitive substring).
    pub next_label: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            submit: r#"input[name="Submit"]"#.into(),
            table: r#"table[id="Results"]"#.into(),
            detail_links: "td > a".into(),
            overview_values: "#Overview > #Info > table td.content".into(),
            overview_labels: "#Overview > #Info > table td:not(.content)".into(),
            next_label: "Next".into(),
        }
    }
}

impl Selectors {
    /// XPath locating the pagination anchor, relative to the pagination row.
    ///
    /// ```
    /// let selectors = ictcf_config::Selectors::default();
    /// assert_eq!(selectors.next_xpath(), r#".//a[contains(., "Next")]"#);
    /// ```
    pub fn next_xpath(&self) -> String {
        format!(r#".//a[contains(., "{}")]"#, self.next_label.replace('"', ""))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub dir: PathBuf,
    pub file_name: String,
    pub sheet_name: String,
    /// Save a `<page title>.png` of the results page next to the export.
    pub screenshot: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("export"),
            file_name: "iCTCF.xlsx".into(),
            sheet_name: "iCTCF".into(),
            screenshot: false,
        }
    }
}

impl ExportConfig {
    pub fn file_path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) if s.contains('$') => {
            let mut cur = std::mem::take(s);
            for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                let expanded = shellexpand::env(&cur)
                    .map(|cow| cow.into_owned())
                    .unwrap_or_else(|_| cur.clone());
                if expanded == cur {
                    break;
                }
                cur = expanded;
            }
            *s = cur;
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder over the `config` crate wiring (YAML + env overrides).
pub struct IctcfConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for IctcfConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl IctcfConfigLoader {
    /// Start from defaults with `ICTCF__` environment overrides.
    ///
    /// ```
    /// use ictcf_config::IctcfConfigLoader;
    ///
    /// let config = IctcfConfigLoader::new().load().expect("defaults load");
    /// assert_eq!(config.site.resource_path, "Resource.php");
    /// assert_eq!(config.export.file_name, "iCTCF.xlsx");
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a config file that must exist; format is inferred by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a config file that is skipped when missing.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet.
    ///
    /// ```
    /// use ictcf_config::IctcfConfigLoader;
    ///
    /// let cfg = IctcfConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// browser:
    ///   headless: false
    /// max_pages: 3
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert!(!cfg.browser.headless);
    /// assert_eq!(cfg.max_pages, Some(3));
    /// assert_eq!(cfg.overview_fields.len(), 2);
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Merge all sources, expand `${VAR}` placeholders, and deserialize.
    ///
    /// Environment overrides are applied last so they win over files.
    pub fn load(self) -> Result<IctcfConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix("ICTCF")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))
    }
}
