//! Behavior configuration.
//!
//! Every tunable the page behaviors read (thresholds, margins, durations,
//! footer content) lives in one typed [`FxConfig`], populated once before
//! the behaviors are constructed. Defaults match what the behaviors fall
//! back to when markup carries no override.
//!
//! ## Config File Location
//!
//! `site-fx.toml` in the config directory (the current directory unless
//! `--config-dir` says otherwise). The file is optional.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [motion]
//! respect_reduced_motion = true  # honour prefers-reduced-motion
//!
//! [reveal]
//! threshold = 0.1                # visible fraction that triggers a reveal
//! root_margin = "0px 0px -50px 0px"
//! markers = ["reveal", "text-reveal", "char-reveal"]
//!
//! [text]
//! char_stagger_ms = 30           # per-character transition delay step
//!
//! [counter]
//! duration_ms = 2000
//! threshold = 0.5
//! locale = "en-US"               # en-US | de-DE | fr-FR | none
//!
//! [parallax]
//! default_speed = 0.5
//!
//! [loader]
//! element_id = "page-loader"
//! min_display_ms = 500
//! max_wait_ms = 3000
//! exit_ms = 500
//!
//! [carousel]
//! interval_ms = 5000
//!
//! [smooth_scroll]
//! duration_ms = 600
//! offset_px = 0.0
//!
//! [footer]
//! template = "full"              # full | compact
//! organization = "..."
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [carousel]
//! interval_ms = 8000
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::effects::counter::NumberLocale;
use crate::footer::FooterTemplate;
use crate::intersection::{ObserverOptions, RootMargin};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the config directory.
pub const CONFIG_FILE: &str = "site-fx.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Complete behavior configuration loaded from `site-fx.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FxConfig {
    pub motion: MotionConfig,
    pub reveal: RevealConfig,
    pub text: TextConfig,
    pub counter: CounterConfig,
    pub parallax: ParallaxConfig,
    pub loader: LoaderConfig,
    pub carousel: CarouselConfig,
    pub smooth_scroll: SmoothScrollConfig,
    pub footer: FooterConfig,
}

impl FxConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.reveal.threshold) {
            return Err(ConfigError::Validation(
                "reveal.threshold must be between 0 and 1".into(),
            ));
        }
        if let Err(e) = self.reveal.root_margin.parse::<RootMargin>() {
            return Err(ConfigError::Validation(format!("reveal.root_margin: {e}")));
        }
        if self.reveal.markers.is_empty() {
            return Err(ConfigError::Validation(
                "reveal.markers must not be empty".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.counter.threshold) {
            return Err(ConfigError::Validation(
                "counter.threshold must be between 0 and 1".into(),
            ));
        }
        if self.counter.duration_ms == 0 {
            return Err(ConfigError::Validation(
                "counter.duration_ms must be positive".into(),
            ));
        }
        if !self.parallax.default_speed.is_finite() {
            return Err(ConfigError::Validation(
                "parallax.default_speed must be a finite number".into(),
            ));
        }
        if self.loader.element_id.is_empty() {
            return Err(ConfigError::Validation(
                "loader.element_id must not be empty".into(),
            ));
        }
        if self.carousel.interval_ms == 0 {
            return Err(ConfigError::Validation(
                "carousel.interval_ms must be positive".into(),
            ));
        }
        if self.smooth_scroll.duration_ms == 0 {
            return Err(ConfigError::Validation(
                "smooth_scroll.duration_ms must be positive".into(),
            ));
        }
        if self.footer.organization.trim().is_empty() {
            return Err(ConfigError::Validation(
                "footer.organization must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Reduced-motion handling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MotionConfig {
    /// When the page prefers reduced motion, skip every animation and show
    /// the final state immediately.
    pub respect_reduced_motion: bool,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            respect_reduced_motion: true,
        }
    }
}

/// Reveal-on-intersect settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevealConfig {
    /// Visible fraction (0-1) at which an element is revealed.
    pub threshold: f64,
    /// CSS margin shorthand applied to the viewport, e.g. `"0px 0px -50px 0px"`.
    pub root_margin: String,
    /// Classes that mark an element as revealable.
    pub markers: Vec<String>,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            root_margin: "0px 0px -50px 0px".to_string(),
            markers: vec![
                "reveal".to_string(),
                "text-reveal".to_string(),
                "char-reveal".to_string(),
            ],
        }
    }
}

impl RevealConfig {
    /// Observer options for elements without overrides.
    ///
    /// An unparsable margin falls back to no margin; [`FxConfig::validate`]
    /// reports it.
    pub fn observer_options(&self) -> ObserverOptions {
        let margin = self.root_margin.parse().unwrap_or_default();
        ObserverOptions::new(self.threshold, margin)
    }
}

/// Text/character splitter settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextConfig {
    /// Transition delay added per character index.
    pub char_stagger_ms: u64,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self { char_stagger_ms: 30 }
    }
}

/// Statistic counter settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CounterConfig {
    /// Animation length when the element has no `data-duration`.
    pub duration_ms: u64,
    /// Visible fraction that starts the animation.
    pub threshold: f64,
    /// Thousands separator convention.
    pub locale: NumberLocale,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            duration_ms: 2000,
            threshold: 0.5,
            locale: NumberLocale::EnUs,
        }
    }
}

/// Parallax settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParallaxConfig {
    /// Speed used when a layer has no valid `data-speed`.
    pub default_speed: f64,
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self { default_speed: 0.5 }
    }
}

/// Page loader overlay settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoaderConfig {
    pub element_id: String,
    /// Minimum time the loader stays up after the load event.
    pub min_display_ms: u64,
    /// Hide the loader after this long no matter what.
    pub max_wait_ms: u64,
    /// Time between hiding and detaching, for the exit transition.
    pub exit_ms: u64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            element_id: "page-loader".to_string(),
            min_display_ms: 500,
            max_wait_ms: 3000,
            exit_ms: 500,
        }
    }
}

/// Testimonial carousel settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CarouselConfig {
    pub interval_ms: u64,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self { interval_ms: 5000 }
    }
}

/// Smooth anchor scrolling settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SmoothScrollConfig {
    pub duration_ms: u64,
    /// Space left above the target, e.g. for a fixed header.
    pub offset_px: f64,
}

impl Default for SmoothScrollConfig {
    fn default() -> Self {
        Self {
            duration_ms: 600,
            offset_px: 0.0,
        }
    }
}

/// A labelled link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Link {
    pub label: String,
    pub href: String,
}

impl Link {
    fn new(label: &str, href: &str) -> Self {
        Self {
            label: label.to_string(),
            href: href.to_string(),
        }
    }
}

/// Contact block shown in the footer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContactConfig {
    pub address: Vec<String>,
    pub phone: String,
    pub email: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            address: vec![
                "1200 Harbor Road".to_string(),
                "Northbridge, NB 02114".to_string(),
            ],
            phone: "+1 (555) 010-2040".to_string(),
            email: "info@northbridge.example".to_string(),
        }
    }
}

/// Footer content and layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FooterConfig {
    pub template: FooterTemplate,
    pub organization: String,
    pub tagline: String,
    pub navigation: Vec<Link>,
    pub divisions: Vec<Link>,
    pub contact: ContactConfig,
    pub social: Vec<Link>,
}

impl Default for FooterConfig {
    fn default() -> Self {
        Self {
            template: FooterTemplate::Full,
            organization: "Northbridge Institute of Technology".to_string(),
            tagline: "Teaching, research and service for the region".to_string(),
            navigation: vec![
                Link::new("Home", "/"),
                Link::new("About", "/about.html"),
                Link::new("Admissions", "/admissions.html"),
                Link::new("Research", "/research.html"),
                Link::new("Contact", "#contact"),
            ],
            divisions: vec![
                Link::new("School of Engineering", "/engineering/"),
                Link::new("School of Sciences", "/sciences/"),
                Link::new("School of Humanities", "/humanities/"),
                Link::new("Continuing Education", "/continuing/"),
            ],
            contact: ContactConfig::default(),
            social: vec![
                Link::new("LinkedIn", "https://www.linkedin.com/"),
                Link::new("YouTube", "https://www.youtube.com/"),
                Link::new("Instagram", "https://www.instagram.com/"),
            ],
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(FxConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `site-fx.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<FxConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: FxConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `site-fx.toml` in the given directory, on top of the
/// stock defaults.
pub fn load_config(dir: &Path) -> Result<FxConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(dir)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `site-fx.toml` with every key.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# site-fx Configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Motion
# ---------------------------------------------------------------------------
[motion]
# When the visitor prefers reduced motion, show every element in its final
# state and skip all animations.
respect_reduced_motion = true

# ---------------------------------------------------------------------------
# Reveal on scroll
# ---------------------------------------------------------------------------
[reveal]
# Fraction of an element (0-1) that must be visible before it is revealed.
# Elements can override it with data-reveal-threshold.
threshold = 0.1

# Margin around the viewport (CSS shorthand, px or %). A negative bottom
# margin reveals elements slightly after they scroll into view.
# Elements can override it with data-reveal-margin.
root_margin = "0px 0px -50px 0px"

# Classes marking revealable elements.
markers = ["reveal", "text-reveal", "char-reveal"]

# ---------------------------------------------------------------------------
# Text splitting
# ---------------------------------------------------------------------------
[text]
# Per-character transition delay for .char-reveal elements.
char_stagger_ms = 30

# ---------------------------------------------------------------------------
# Statistic counters
# ---------------------------------------------------------------------------
[counter]
# Animation length, unless the element sets data-duration.
duration_ms = 2000

# Fraction of the counter that must be visible to start counting.
threshold = 0.5

# Thousands separators: "en-US" (1,000), "de-DE" (1.000), "fr-FR", "none".
locale = "en-US"

# ---------------------------------------------------------------------------
# Parallax
# ---------------------------------------------------------------------------
[parallax]
# Speed for layers without a valid data-speed attribute.
default_speed = 0.5

# ---------------------------------------------------------------------------
# Page loader
# ---------------------------------------------------------------------------
[loader]
element_id = "page-loader"

# Minimum time the loader stays visible after the load event.
min_display_ms = 500

# Hide the loader after this long even if the page never finishes loading.
max_wait_ms = 3000

# Delay between hiding and removing the element (exit transition).
exit_ms = 500

# ---------------------------------------------------------------------------
# Testimonial carousel
# ---------------------------------------------------------------------------
[carousel]
# Auto-advance period. Manual navigation does not reset it.
interval_ms = 5000

# ---------------------------------------------------------------------------
# Smooth anchor scrolling
# ---------------------------------------------------------------------------
[smooth_scroll]
duration_ms = 600

# Space left above the target, e.g. for a fixed header.
offset_px = 0.0

# ---------------------------------------------------------------------------
# Footer
# ---------------------------------------------------------------------------
[footer]
# "full" adds divisions and social links; "compact" is a single band.
template = "full"
organization = "Northbridge Institute of Technology"
tagline = "Teaching, research and service for the region"

navigation = [
    { label = "Home", href = "/" },
    { label = "About", href = "/about.html" },
    { label = "Admissions", href = "/admissions.html" },
    { label = "Research", href = "/research.html" },
    { label = "Contact", href = "#contact" },
]

divisions = [
    { label = "School of Engineering", href = "/engineering/" },
    { label = "School of Sciences", href = "/sciences/" },
    { label = "School of Humanities", href = "/humanities/" },
    { label = "Continuing Education", href = "/continuing/" },
]

social = [
    { label = "LinkedIn", href = "https://www.linkedin.com/" },
    { label = "YouTube", href = "https://www.youtube.com/" },
    { label = "Instagram", href = "https://www.instagram.com/" },
]

[footer.contact]
address = ["1200 Harbor Road", "Northbridge, NB 02114"]
phone = "+1 (555) 010-2040"
email = "info@northbridge.example"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_matches_documented_fallbacks() {
        let config = FxConfig::default();
        assert_eq!(config.reveal.threshold, 0.1);
        assert_eq!(config.reveal.root_margin, "0px 0px -50px 0px");
        assert_eq!(config.text.char_stagger_ms, 30);
        assert_eq!(config.counter.duration_ms, 2000);
        assert_eq!(config.counter.threshold, 0.5);
        assert_eq!(config.parallax.default_speed, 0.5);
        assert_eq!(config.loader.min_display_ms, 500);
        assert_eq!(config.loader.max_wait_ms, 3000);
        assert_eq!(config.loader.exit_ms, 500);
        assert_eq!(config.carousel.interval_ms, 5000);
        assert!(config.motion.respect_reduced_motion);
    }

    #[test]
    fn observer_options_from_reveal_config() {
        let options = RevealConfig::default().observer_options();
        assert_eq!(options.threshold, 0.1);
        assert_eq!(options.root_margin.to_string(), "0px 0px -50px 0px");
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[carousel]
interval_ms = 8000
"#;
        let config: FxConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.carousel.interval_ms, 8000);
        // Defaults preserved
        assert_eq!(config.counter.duration_ms, 2000);
        assert_eq!(config.footer.template, FooterTemplate::Full);
    }

    #[test]
    fn parse_locale_and_template() {
        let toml = r#"
[counter]
locale = "de-DE"

[footer]
template = "compact"
"#;
        let config: FxConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.counter.locale, NumberLocale::DeDe);
        assert_eq!(config.footer.template, FooterTemplate::Compact);
    }

    #[test]
    fn unknown_locale_rejected() {
        let toml = r#"
[counter]
locale = "xx-XX"
"#;
        let result: Result<FxConfig, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config, FxConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            r#"
[loader]
max_wait_ms = 4000

[footer]
organization = "Harbor College"
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.loader.max_wait_ms, 4000);
        assert_eq!(config.loader.min_display_ms, 500);
        assert_eq!(config.footer.organization, "Harbor College");
        assert_eq!(config.footer.divisions.len(), 4);
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "this is not valid toml [[[").unwrap();
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            r#"
[reveal]
threshold = 1.5
"#,
        )
        .unwrap();
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // Unknown key rejection tests
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let toml_str = r#"
[carousel]
intervall_ms = 4000
"#;
        let result: Result<FxConfig, _> = toml::from_str(toml_str);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<FxConfig, _> = toml::from_str("[sparkles]\nlevel = 3\n");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_link_key_rejected() {
        let toml_str = r#"
[footer]
social = [{ label = "X", url = "https://x.example" }]
"#;
        let result: Result<FxConfig, _> = toml::from_str(toml_str);
        assert!(result.is_err());
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(FxConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_threshold_bounds() {
        let mut config = FxConfig::default();
        config.reveal.threshold = 0.0;
        assert!(config.validate().is_ok());
        config.reveal.threshold = 1.0;
        assert!(config.validate().is_ok());
        config.reveal.threshold = -0.1;
        assert!(config.validate().is_err());

        let mut config = FxConfig::default();
        config.counter.threshold = 2.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("counter.threshold"));
    }

    #[test]
    fn validate_bad_root_margin() {
        let mut config = FxConfig::default();
        config.reveal.root_margin = "10em".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("root_margin"));
    }

    #[test]
    fn validate_zero_durations() {
        let mut config = FxConfig::default();
        config.counter.duration_ms = 0;
        assert!(config.validate().is_err());

        let mut config = FxConfig::default();
        config.carousel.interval_ms = 0;
        assert!(config.validate().is_err());

        let mut config = FxConfig::default();
        config.smooth_scroll.duration_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_empty_markers_and_organization() {
        let mut config = FxConfig::default();
        config.reveal.markers.clear();
        assert!(config.validate().is_err());

        let mut config = FxConfig::default();
        config.footer.organization = "  ".to_string();
        assert!(config.validate().is_err());
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_deep_nested() {
        let base: toml::Value = toml::from_str(
            r#"
[footer.contact]
phone = "1"
email = "a@b"
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[footer.contact]
phone = "2"
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let contact = merged.get("footer").unwrap().get("contact").unwrap();
        assert_eq!(contact.get("phone").unwrap().as_str(), Some("2"));
        assert_eq!(contact.get("email").unwrap().as_str(), Some("a@b"));
    }

    #[test]
    fn merge_toml_arrays_replace() {
        let base: toml::Value = toml::from_str(r#"markers = ["a", "b"]"#).unwrap();
        let overlay: toml::Value = toml::from_str(r#"markers = ["c"]"#).unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("markers").unwrap().as_array().unwrap().len(), 1);
    }

    #[test]
    fn resolve_config_with_overlay() {
        let overlay: toml::Value = toml::from_str(
            r#"
[counter]
duration_ms = 1000
"#,
        )
        .unwrap();
        let config = resolve_config(stock_defaults_value(), Some(overlay)).unwrap();
        assert_eq!(config.counter.duration_ms, 1000);
        assert_eq!(config.counter.threshold, 0.5);
    }

    #[test]
    fn resolve_config_rejects_invalid_values() {
        let overlay: toml::Value = toml::from_str(
            r#"
[smooth_scroll]
duration_ms = 0
"#,
        )
        .unwrap();
        let result = resolve_config(stock_defaults_value(), Some(overlay));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // stock_config_toml tests
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: FxConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, FxConfig::default());
    }

    #[test]
    fn stock_config_toml_contains_all_sections() {
        let content = stock_config_toml();
        for section in [
            "[motion]",
            "[reveal]",
            "[text]",
            "[counter]",
            "[parallax]",
            "[loader]",
            "[carousel]",
            "[smooth_scroll]",
            "[footer]",
            "[footer.contact]",
        ] {
            assert!(content.contains(section), "missing {section}");
        }
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let val = stock_defaults_value();
        assert!(val.is_table());
        for key in ["motion", "reveal", "counter", "loader", "carousel", "footer"] {
            assert!(val.get(key).is_some(), "missing {key}");
        }
    }
}
