use crate::filter::PageFilterConfig;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// Sibling pages searched when no list is configured
pub const DEFAULT_PAGES: &[&str] = &[
    "http://gaspar.oab-sc.org.br/newprotocol/index.html",
    "http://gaspar.oab-sc.org.br/newprotocol/setores/secretaria.html",
    "http://gaspar.oab-sc.org.br/newprotocol/setores/tesouraria.html",
    "http://gaspar.oab-sc.org.br/newprotocol/setores/conselho.html",
    "http://gaspar.oab-sc.org.br/newprotocol/setores/comissoes.html",
    "http://gaspar.oab-sc.org.br/newprotocol/setores/consultas.html",
    "http://gaspar.oab-sc.org.br/newprotocol/setores/prerrogativas.html",
    "http://gaspar.oab-sc.org.br/newprotocol/setores/protocolos.html",
    "http://gaspar.oab-sc.org.br/newprotocol/setores/examedeordem.html",
    "http://gaspar.oab-sc.org.br/newprotocol/setores/inssdigital.html",
    "http://gaspar.oab-sc.org.br/newprotocol/setores/tecnologia.html",
    "http://gaspar.oab-sc.org.br/newprotocol/setores/esa.html",
    "http://gaspar.oab-sc.org.br/newprotocol/setores/ted.html",
    "http://gaspar.oab-sc.org.br/newprotocol/setores/cursoseventos.html",
    "http://gaspar.oab-sc.org.br/newprotocol/setores/controladoria.html",
    "http://gaspar.oab-sc.org.br/newprotocol/setores/fiscalizacao.html",
    "http://gaspar.oab-sc.org.br/newprotocol/manuais/manuais.html",
];

/// How pages are fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Plain HTTP GET
    #[default]
    Http,
    /// Render through a WebDriver-controlled browser
    WebDriver,
}

/// User-visible strings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub searching: String,
    pub no_results: String,
    pub failed: String,
    pub page_prefix: String,
    pub group_prefix: String,
    pub found_in_prefix: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            searching: "Buscando...".to_string(),
            no_results: "Nenhum resultado encontrado.".to_string(),
            failed: "Ocorreu um erro durante a pesquisa.".to_string(),
            page_prefix: "Página: ".to_string(),
            group_prefix: "Grupo: ".to_string(),
            found_in_prefix: "Encontrado em: ".to_string(),
        }
    }
}

/// Box model of the results panel, used to compute its natural height
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelGeometry {
    /// Height of one result link or message line
    pub row_height_px: f64,
    /// Vertical padding applied while the panel is active (top + bottom)
    pub padding_px: f64,
}

impl Default for PanelGeometry {
    fn default() -> Self {
        Self {
            row_height_px: 40.0,
            padding_px: 10.0,
        }
    }
}

/// Configuration for the site search and accordion behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Sibling pages to search, in result order
    #[serde(default = "default_pages")]
    pub pages: Vec<String>,

    /// Queries shorter than this (after trimming) do not search
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,

    /// Input quiescence before a search fires
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Quiescence before a resize is applied
    #[serde(default = "default_resize_debounce_ms")]
    pub resize_debounce_ms: u64,

    /// Per-page fetch timeout
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Append a `v=<millis>` query pair to each fetch
    #[serde(default = "default_cache_bust")]
    pub cache_bust: bool,

    /// Gap kept between the results panel and the footer
    #[serde(default = "default_results_margin_px")]
    pub results_margin_px: f64,

    /// Duration of height transitions
    #[serde(default = "default_transition_ms")]
    pub transition_ms: u64,

    /// Panels shorter than this open and close without animating
    #[serde(default = "default_empty_threshold_px")]
    pub empty_threshold_px: f64,

    /// Fetch backend
    #[serde(default)]
    pub backend: BackendKind,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Which configured pages are allowed
    #[serde(default)]
    pub filter: PageFilterConfig,

    #[serde(default)]
    pub messages: Messages,

    #[serde(default)]
    pub panel: PanelGeometry,
}

fn default_pages() -> Vec<String> {
    DEFAULT_PAGES.iter().map(|p| p.to_string()).collect()
}

fn default_min_query_len() -> usize {
    2
}

fn default_debounce_ms() -> u64 {
    350
}

fn default_resize_debounce_ms() -> u64 {
    150
}

fn default_fetch_timeout_secs() -> u64 {
    10
}

fn default_cache_bust() -> bool {
    true
}

fn default_results_margin_px() -> f64 {
    10.0
}

fn default_transition_ms() -> u64 {
    300
}

fn default_empty_threshold_px() -> f64 {
    5.0
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            pages: default_pages(),
            min_query_len: default_min_query_len(),
            debounce_ms: default_debounce_ms(),
            resize_debounce_ms: default_resize_debounce_ms(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            cache_bust: default_cache_bust(),
            results_margin_px: default_results_margin_px(),
            transition_ms: default_transition_ms(),
            empty_threshold_px: default_empty_threshold_px(),
            backend: BackendKind::default(),
            webdriver_url: default_webdriver_url(),
            filter: PageFilterConfig::default(),
            messages: Messages::default(),
            panel: PanelGeometry::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, Box<dyn Error>> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Apply environment overrides (`WEBDRIVER_URL`)
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.webdriver_url = webdriver_url;
            }
        }
        self
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }
}
