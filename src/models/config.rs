//! Application configuration structures.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{ElementMatcher, Seed};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Catalog site settings
    #[serde(default)]
    pub site: SiteConfig,

    /// Ordered category listings to traverse
    #[serde(default = "defaults::seeds")]
    pub seeds: Vec<Seed>,

    /// Publishers whose books get a synopsis
    #[serde(default = "defaults::publishers")]
    pub publishers: Vec<String>,

    /// Rendering waits and pacing
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Markers used to read listing cards and detail pages
    #[serde(default)]
    pub selectors: SelectorConfig,

    /// Export locations
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded configuration from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Config load failed from {:?}: {}. Using defaults.", path, e);
                Self::default()
            }
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if self.crawler.detail_delay_min_ms > self.crawler.detail_delay_max_ms {
            return Err(AppError::validation(
                "crawler.detail_delay_min_ms must not exceed crawler.detail_delay_max_ms",
            ));
        }
        if self.site.max_pages == 0 {
            return Err(AppError::validation("site.max_pages must be > 0"));
        }
        if self.site.page_param.trim().is_empty() {
            return Err(AppError::validation("site.page_param is empty"));
        }
        self.site.base()?;
        if self.seeds.is_empty() {
            return Err(AppError::validation("No seeds defined"));
        }
        for seed in &self.seeds {
            seed.validate()?;
        }
        if self.publishers.iter().any(|p| p.trim().is_empty()) {
            return Err(AppError::validation("publishers contains an empty entry"));
        }
        self.selectors.validate()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site: SiteConfig::default(),
            seeds: defaults::seeds(),
            publishers: defaults::publishers(),
            crawler: CrawlerConfig::default(),
            selectors: SelectorConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// Catalog site settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Origin that relative card links are resolved against
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Query parameter carrying the page number
    #[serde(default = "defaults::page_param")]
    pub page_param: String,

    /// Hard cap on pages visited per seed
    #[serde(default = "defaults::max_pages")]
    pub max_pages: u32,
}

impl SiteConfig {
    /// Parsed base URL.
    pub fn base(&self) -> Result<Url> {
        Url::parse(&self.base_url)
            .map_err(|e| AppError::config(format!("site.base_url '{}': {e}", self.base_url)))
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            page_param: defaults::page_param(),
            max_pages: defaults::max_pages(),
        }
    }
}

/// Rendering session and pacing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Wait for the consent button on the first page of a seed
    #[serde(default = "defaults::consent_wait")]
    pub consent_wait_ms: u64,

    /// Wait for the first listing card to appear
    #[serde(default = "defaults::list_wait")]
    pub list_wait_ms: u64,

    /// Wait for the detail page heading to appear
    #[serde(default = "defaults::detail_wait")]
    pub detail_wait_ms: u64,

    /// Pause between listing pages
    #[serde(default = "defaults::page_delay")]
    pub page_delay_ms: u64,

    /// Pause after scrolling a listing page
    #[serde(default = "defaults::scroll_settle")]
    pub scroll_settle_ms: u64,

    /// Lower bound of the randomized pause on detail pages
    #[serde(default = "defaults::detail_delay_min")]
    pub detail_delay_min_ms: u64,

    /// Upper bound of the randomized pause on detail pages
    #[serde(default = "defaults::detail_delay_max")]
    pub detail_delay_max_ms: u64,
}

impl CrawlerConfig {
    pub fn consent_wait(&self) -> Duration {
        Duration::from_millis(self.consent_wait_ms)
    }

    pub fn list_wait(&self) -> Duration {
        Duration::from_millis(self.list_wait_ms)
    }

    pub fn detail_wait(&self) -> Duration {
        Duration::from_millis(self.detail_wait_ms)
    }

    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    pub fn scroll_settle(&self) -> Duration {
        Duration::from_millis(self.scroll_settle_ms)
    }

    /// Random pause within the configured detail delay bounds.
    pub fn detail_delay(&self) -> Duration {
        let low = self.detail_delay_min_ms.min(self.detail_delay_max_ms);
        let high = self.detail_delay_max_ms.max(low);
        Duration::from_millis(fastrand::u64(low..=high))
    }

    /// Settings with every pause and wait set to zero.
    pub fn immediate() -> Self {
        Self {
            consent_wait_ms: 0,
            list_wait_ms: 0,
            detail_wait_ms: 0,
            page_delay_ms: 0,
            scroll_settle_ms: 0,
            detail_delay_min_ms: 0,
            detail_delay_max_ms: 0,
            ..Self::default()
        }
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            consent_wait_ms: defaults::consent_wait(),
            list_wait_ms: defaults::list_wait(),
            detail_wait_ms: defaults::detail_wait(),
            page_delay_ms: defaults::page_delay(),
            scroll_settle_ms: defaults::scroll_settle(),
            detail_delay_min_ms: defaults::detail_delay_min(),
            detail_delay_max_ms: defaults::detail_delay_max(),
        }
    }
}

/// Markers for listing cards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingSelectors {
    /// One product card
    pub card: ElementMatcher,
    /// Preferred title anchor
    pub title: ElementMatcher,
    /// Fallback title anchor; the first match with a resolvable target wins
    pub title_fallback: ElementMatcher,
    /// Container holding the cover image
    pub image_column: ElementMatcher,
    /// Cover image inside the container
    pub image: ElementMatcher,
    pub author: ElementMatcher,
    /// "publisher, year" text
    pub publisher: ElementMatcher,
    /// Cookie consent accept button
    pub consent_button: ElementMatcher,
    /// Leading words stripped from the author text (case-insensitive)
    pub author_prefixes: Vec<String>,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            card: defaults::matcher("div.cc-product-list-item"),
            title: defaults::matcher("a.title"),
            title_fallback: defaults::matcher("a[href]"),
            image_column: defaults::matcher("div.cc-col-img"),
            image: defaults::matcher("img"),
            author: defaults::matcher(".cc-author"),
            publisher: defaults::matcher(".cc-publisher"),
            consent_button: defaults::matcher("#onetrust-accept-btn-handler"),
            author_prefixes: vec!["di".to_string()],
        }
    }
}

/// Markers for book detail pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailSelectors {
    /// Element confirming the page loaded
    pub heading: ElementMatcher,
    /// Primary synopsis container
    pub body: ElementMatcher,
    /// Secondary container used when the primary one is missing
    pub secondary: ElementMatcher,
    /// Text block inside either container
    pub text: ElementMatcher,
}

impl Default for DetailSelectors {
    fn default() -> Self {
        Self {
            heading: defaults::matcher("h1"),
            body: defaults::matcher("div.cc-em-content-body"),
            secondary: defaults::matcher("div#description"),
            text: defaults::matcher("div").with_class_containing("cc-content-text"),
        }
    }
}

/// All markup markers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectorConfig {
    #[serde(default)]
    pub listing: ListingSelectors,
    #[serde(default)]
    pub detail: DetailSelectors,
}

impl SelectorConfig {
    pub fn validate(&self) -> Result<()> {
        let l = &self.listing;
        let d = &self.detail;
        for (name, matcher) in [
            ("listing.card", &l.card),
            ("listing.title", &l.title),
            ("listing.title_fallback", &l.title_fallback),
            ("listing.image_column", &l.image_column),
            ("listing.image", &l.image),
            ("listing.author", &l.author),
            ("listing.publisher", &l.publisher),
            ("listing.consent_button", &l.consent_button),
            ("detail.heading", &d.heading),
            ("detail.body", &d.body),
            ("detail.secondary", &d.secondary),
            ("detail.text", &d.text),
        ] {
            matcher.validate(name)?;
        }
        Ok(())
    }
}

/// Export locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving the export files
    #[serde(default = "defaults::output_dir")]
    pub dir: String,

    /// Every unique record
    #[serde(default = "defaults::records_file")]
    pub records_file: String,

    /// Priority publishers only
    #[serde(default = "defaults::priority_file")]
    pub priority_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: defaults::output_dir(),
            records_file: defaults::records_file(),
            priority_file: defaults::priority_file(),
        }
    }
}

mod defaults {
    use crate::models::{ElementMatcher, Seed};

    // Selector defaults
    pub fn matcher(css: &str) -> ElementMatcher {
        ElementMatcher::parse(css).expect("built-in selector is valid")
    }

    // Site defaults
    pub fn base_url() -> String {
        "https://www.ibs.it".into()
    }
    pub fn page_param() -> String {
        "page".into()
    }
    pub fn max_pages() -> u32 {
        50
    }

    // Crawler defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn consent_wait() -> u64 {
        2_000
    }
    pub fn list_wait() -> u64 {
        4_000
    }
    pub fn detail_wait() -> u64 {
        8_000
    }
    pub fn page_delay() -> u64 {
        500
    }
    pub fn scroll_settle() -> u64 {
        500
    }
    pub fn detail_delay_min() -> u64 {
        1_000
    }
    pub fn detail_delay_max() -> u64 {
        2_000
    }

    // Output defaults
    pub fn output_dir() -> String {
        "storage".into()
    }
    pub fn records_file() -> String {
        "books.json".into()
    }
    pub fn priority_file() -> String {
        "priority.json".into()
    }

    // Seed defaults
    pub fn seeds() -> Vec<Seed> {
        const LISTING: &str = "https://www.ibs.it/libri/ultima-settimana?useAsn=True&filterDepartment=";
        [
            ("Storia e archeologia", "Storia+e+archeologia"),
            (
                "Società, politica e comunicazione",
                "Societ%C3%A0%2c+politica+e+comunicazione",
            ),
            (
                "Scienze, geografia, ambiente",
                "Scienze%2c+geografia%2c+ambiente",
            ),
            (
                "Salute, famiglia e benessere personale",
                "Salute%2c+famiglia+e+benessere+personale",
            ),
            ("Religione e spiritualità", "Religione+e+spiritualit%C3%A0"),
            ("Psicologia", "Psicologia"),
            ("Biografie", "Biografie"),
        ]
        .into_iter()
        .map(|(name, department)| Seed::new(name, format!("{LISTING}{department}")))
        .collect()
    }

    // Publisher defaults
    pub fn publishers() -> Vec<String> {
        [
            "Adelphi",
            "Bollati Boringhieri",
            "Carabba",
            "Carocci",
            "Castelvecchi",
            "DeriveApprodi",
            "Donzelli",
            "Einaudi",
            "Feltrinelli",
            "Garzanti",
            "Giunti",
            "Gribaudo",
            "Hoepli",
            "Il Mulino",
            "Laterza",
            "Libreria Editrice Vaticana",
            "Longanesi",
            "Marsilio",
            "Mimesis",
            "Minimum Fax",
            "Mondadori",
            "Mondadori Electa",
            "Mondadori università",
            "Morcelliana",
            "Newton Compton",
            "Passigli",
            "Piemme",
            "Ponte alle Grazie",
            "Raffaello Cortina",
            "Rizzoli",
            "Ronzani",
            "Rubettino",
            "Rusconi libri",
            "San Paolo Edizioni",
            "Silvio Berlusconi Editore",
            "Solferino",
            "Sonzogno",
            "Sperling & Kupfer",
            "UTET",
            "Vallardi",
            "Vita e Pensiero",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }
}
