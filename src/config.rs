//! Render options for both cards.
//!
//! The public structs mirror what a user can ask for and are all optional
//! or defaulted. `resolve()` turns them into the fully populated form the
//! renderers consume, so no renderer has to reason about missing values.

use crate::format::NumberFormat;
use crate::i18n;
use crate::stats::{DEFAULT_STATS, StatKind, parse_stat_keys};
use crate::theme::{CardColors, ColorOverrides, resolve_colors};

pub const DEFAULT_CARD_WIDTH: u32 = 467;
const DEFAULT_LINE_HEIGHT: u32 = 25;
const DEFAULT_BORDER_RADIUS: f32 = 4.5;
const MAX_NUMBER_PRECISION: u8 = 2;

#[derive(Debug, Clone)]
pub struct CardConfig {
    pub theme: String,
    pub colors: ColorOverrides,
    pub locale: String,
    /// Stat keys removed from the default set.
    pub hide: Vec<String>,
    /// Extra stat keys appended after the default set.
    pub show: Vec<String>,
    pub hide_title: bool,
    pub hide_border: bool,
    pub hide_rank: bool,
    pub show_icons: bool,
    pub custom_title: Option<String>,
    pub card_width: Option<u32>,
    pub line_height: u32,
    pub border_radius: f32,
    pub number_format: NumberFormat,
    pub number_precision: Option<u8>,
    pub disable_animations: bool,
    pub text_bold: bool,
    /// Commit count is all-time; only affects ranking.
    pub include_all_commits: bool,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            theme: "default".to_string(),
            colors: ColorOverrides::default(),
            locale: "en".to_string(),
            hide: Vec::new(),
            show: Vec::new(),
            hide_title: false,
            hide_border: false,
            hide_rank: false,
            show_icons: false,
            custom_title: None,
            card_width: None,
            line_height: DEFAULT_LINE_HEIGHT,
            border_radius: DEFAULT_BORDER_RADIUS,
            number_format: NumberFormat::Short,
            number_precision: None,
            disable_animations: false,
            text_bold: true,
            include_all_commits: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedCardConfig {
    pub colors: CardColors,
    pub locale: String,
    /// Visible stats in display order.
    pub stats: Vec<StatKind>,
    pub hide_title: bool,
    pub hide_border: bool,
    pub hide_rank: bool,
    pub show_icons: bool,
    pub custom_title: Option<String>,
    pub width: u32,
    pub line_height: u32,
    pub border_radius: f32,
    pub number_format: NumberFormat,
    pub number_precision: Option<u8>,
    pub disable_animations: bool,
    pub text_bold: bool,
    pub include_all_commits: bool,
}

fn resolve_locale(locale: &str) -> String {
    if i18n::is_supported(locale) {
        locale.to_string()
    } else {
        tracing::debug!("unsupported locale {locale:?}, using en");
        "en".to_string()
    }
}

/// Defaults minus `hide`, then `show` entries not already present. A key
/// both hidden and shown ends up appended.
pub fn visible_stats(hide: &[StatKind], show: &[StatKind]) -> Vec<StatKind> {
    let mut out: Vec<StatKind> = DEFAULT_STATS
        .into_iter()
        .filter(|kind| !hide.contains(kind))
        .collect();
    for kind in show {
        if !out.contains(kind) {
            out.push(*kind);
        }
    }
    out
}

impl CardConfig {
    pub fn resolve(&self) -> ResolvedCardConfig {
        let hide = parse_stat_keys(&self.hide);
        let show = parse_stat_keys(&self.show);

        ResolvedCardConfig {
            colors: resolve_colors(&self.theme, &self.colors),
            locale: resolve_locale(&self.locale),
            stats: visible_stats(&hide, &show),
            hide_title: self.hide_title,
            hide_border: self.hide_border,
            hide_rank: self.hide_rank,
            show_icons: self.show_icons,
            custom_title: self.custom_title.clone(),
            width: self.card_width.unwrap_or(DEFAULT_CARD_WIDTH),
            line_height: self.line_height,
            border_radius: self.border_radius,
            number_format: self.number_format,
            number_precision: self.number_precision.map(|p| p.min(MAX_NUMBER_PRECISION)),
            disable_animations: self.disable_animations,
            text_bold: self.text_bold,
            include_all_commits: self.include_all_commits,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ContribCardConfig {
    pub theme: String,
    pub colors: ColorOverrides,
    pub locale: String,
    pub custom_title: Option<String>,
    pub card_width: u32,
    pub hide_title: bool,
    pub hide_border: bool,
    pub border_radius: f32,
    pub disable_animations: bool,
}

impl Default for ContribCardConfig {
    fn default() -> Self {
        Self {
            theme: "default".to_string(),
            colors: ColorOverrides::default(),
            locale: "en".to_string(),
            custom_title: None,
            card_width: DEFAULT_CARD_WIDTH,
            hide_title: false,
            hide_border: false,
            border_radius: DEFAULT_BORDER_RADIUS,
            disable_animations: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedContribConfig {
    pub colors: CardColors,
    pub title: String,
    pub empty_message: &'static str,
    pub width: u32,
    pub hide_title: bool,
    pub hide_border: bool,
    pub border_radius: f32,
    pub disable_animations: bool,
}

impl ContribCardConfig {
    pub fn resolve(&self) -> ResolvedContribConfig {
        let locale = resolve_locale(&self.locale);
        ResolvedContribConfig {
            colors: resolve_colors(&self.theme, &self.colors),
            title: self
                .custom_title
                .clone()
                .unwrap_or_else(|| i18n::translate("contrib_title", &locale).to_string()),
            empty_message: i18n::translate("contrib_empty", &locale),
            width: self.card_width,
            hide_title: self.hide_title,
            hide_border: self.hide_border,
            border_radius: self.border_radius,
            disable_animations: self.disable_animations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_stats_are_visible_in_order() {
        let resolved = CardConfig::default().resolve();
        assert_eq!(resolved.stats, DEFAULT_STATS.to_vec());
        assert_eq!(resolved.width, DEFAULT_CARD_WIDTH);
    }

    #[test]
    fn hide_and_show_are_applied_once() {
        let config = CardConfig {
            hide: vec!["commits".to_string(), "issues".to_string()],
            show: vec![
                "reviews".to_string(),
                "stars".to_string(),
                "made_up".to_string(),
                "issues".to_string(),
            ],
            ..CardConfig::default()
        };
        assert_eq!(
            config.resolve().stats,
            vec![
                StatKind::Stars,
                StatKind::Prs,
                StatKind::Contribs,
                StatKind::Reviews,
                StatKind::Issues
            ]
        );
    }

    #[test]
    fn precision_is_clamped_and_locale_defaults() {
        let config = CardConfig {
            number_precision: Some(9),
            locale: "tlh".to_string(),
            ..CardConfig::default()
        };
        let resolved = config.resolve();
        assert_eq!(resolved.number_precision, Some(2));
        assert_eq!(resolved.locale, "en");
    }

    #[test]
    fn contrib_config_localizes_title() {
        let resolved = ContribCardConfig {
            locale: "de".to_string(),
            ..ContribCardConfig::default()
        }
        .resolve();
        assert_eq!(resolved.title, "Top-Beiträge");
        assert_eq!(resolved.empty_message, "Keine Beiträge gefunden");
    }
}
