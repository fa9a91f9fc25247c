use crate::config::{CardConfig, ResolvedCardConfig};
use crate::format::format_count;
use crate::i18n;
use crate::icons::icon_svg;
use crate::rank::{RankInput, RankResult, calculate_rank};
use crate::stats::{StatKind, StatValue, StatsRecord};
use crate::svg::{Frame, escape_xml, render_card};

const BASE_HEIGHT: u32 = 40;
const ICON_SHIFT: u32 = 25;
const VALUE_X: u32 = 220;
const ANIMATION_INITIAL_DELAY_MS: u32 = 450;
const ANIMATION_STAGGER_DELAY_MS: u32 = 150;
const RANK_RADIUS: f64 = 40.0;
const RANK_X_FROM_RIGHT: u32 = 77;

fn format_value(kind: StatKind, stats: &StatsRecord, cfg: &ResolvedCardConfig) -> String {
    match kind.value(stats) {
        StatValue::Count(n) => format_count(n, cfg.number_format, cfg.number_precision),
        StatValue::Percent(p) => format!("{p:.1}%"),
    }
}

/// `rows * line_height + 40`; five rows at the default line height give 165.
fn card_height(rows: usize, cfg: &ResolvedCardConfig) -> u32 {
    (rows as u32)
        .saturating_mul(cfg.line_height)
        .saturating_add(BASE_HEIGHT)
}

fn build_stat_row(
    index: usize,
    label: &str,
    value: &str,
    kind: StatKind,
    cfg: &ResolvedCardConfig,
) -> String {
    let delay = ANIMATION_INITIAL_DELAY_MS + index as u32 * ANIMATION_STAGGER_DELAY_MS;
    let y = (index as u32).saturating_mul(cfg.line_height);
    let (icon, label_x, value_x) = if cfg.show_icons {
        (icon_svg(kind), ICON_SHIFT, VALUE_X + ICON_SHIFT)
    } else {
        (String::new(), 0, VALUE_X)
    };
    let weight = if cfg.text_bold { "bold" } else { "not_bold" };

    format!(
        r#"<g transform="translate(0, {y})">
      <g class="stagger" style="animation-delay: {delay}ms" transform="translate(25, 0)">
        {icon}
        <text class="stat {weight}" x="{label_x}" y="12.5">{label}:</text>
        <text class="stat {weight}" x="{value_x}" y="12.5" data-testid="{key}">{value}</text>
      </g>
    </g>"#,
        label = escape_xml(label),
        value = escape_xml(value),
        key = kind.key(),
    )
}

fn rank_css(rank: &RankResult, cfg: &ResolvedCardConfig) -> String {
    let circumference = 2.0 * std::f64::consts::PI * RANK_RADIUS;
    let offset = rank.percentile / 100.0 * circumference;
    format!(
        r#".rank-text {{
    font: 800 24px 'Segoe UI', Ubuntu, Sans-Serif;
    fill: {text};
    animation: scaleInAnimation 0.3s ease-in-out forwards;
  }}
  .rank-circle-rim {{
    stroke: {ring};
    fill: none;
    stroke-width: 6;
    opacity: 0.2;
  }}
  .rank-circle {{
    stroke: {ring};
    stroke-dasharray: {circumference:.2};
    stroke-dashoffset: {offset:.2};
    fill: none;
    stroke-width: 6;
    stroke-linecap: round;
    opacity: 0.8;
    transform-origin: -10px 8px;
    transform: rotate(-90deg);
    animation: rankAnimation 1s forwards ease-in-out;
  }}
  @keyframes rankAnimation {{
    from {{ stroke-dashoffset: {circumference:.2}; }}
    to {{ stroke-dashoffset: {offset:.2}; }}
  }}
  @keyframes scaleInAnimation {{
    from {{ transform: translate(-5px, 5px) scale(0); }}
    to {{ transform: translate(-5px, 5px) scale(1); }}
  }}"#,
        text = cfg.colors.text,
        ring = cfg.colors.ring,
    )
}

fn rank_ring(rank: &RankResult, width: u32, height: u32) -> String {
    let x = width.saturating_sub(RANK_X_FROM_RIGHT);
    let y = (height / 2).saturating_sub(50);
    format!(
        r#"<g data-testid="rank-circle" transform="translate({x}, {y})">
      <circle class="rank-circle-rim" cx="-10" cy="8" r="40" />
      <circle class="rank-circle" cx="-10" cy="8" r="40" />
      <g class="rank-text">
        <text x="-5" y="3" alignment-baseline="central" dominant-baseline="central" text-anchor="middle" data-testid="level-rank-icon">{level}</text>
      </g>
    </g>"#,
        level = rank.level
    )
}

/// Renders the general stats card for `stats`.
pub fn render_stats_card(stats: &StatsRecord, config: &CardConfig) -> String {
    let cfg = config.resolve();

    let rank = calculate_rank(&RankInput {
        commits: stats.commits,
        prs: stats.prs,
        issues: stats.issues,
        reviews: stats.reviews,
        stars: stats.stars,
        followers: stats.followers,
        all_commits: cfg.include_all_commits,
    });

    let title = cfg
        .custom_title
        .clone()
        .unwrap_or_else(|| i18n::stats_title(&stats.name, &cfg.locale));

    let mut rows = Vec::with_capacity(cfg.stats.len());
    for (i, kind) in cfg.stats.iter().copied().enumerate() {
        let label = i18n::translate(kind.label_key(), &cfg.locale);
        let value = format_value(kind, stats, &cfg);
        rows.push(build_stat_row(i, label, &value, kind, &cfg));
    }

    let height = card_height(rows.len(), &cfg);
    let (ring, css) = if cfg.hide_rank {
        (String::new(), String::new())
    } else {
        (rank_ring(&rank, cfg.width, height), rank_css(&rank, &cfg))
    };

    let body = format!(
        r#"{ring}
    <svg x="0" y="0">
    {rows}
    </svg>"#,
        rows = rows.join("\n    ")
    );

    let a11y_desc = format!("{}'s GitHub statistics", stats.name);

    render_card(
        &Frame {
            title: &title,
            width: cfg.width,
            height,
            colors: &cfg.colors,
            hide_title: cfg.hide_title,
            hide_border: cfg.hide_border,
            border_radius: cfg.border_radius,
            disable_animations: cfg.disable_animations,
            a11y_title: &title,
            a11y_desc: &a11y_desc,
            extra_css: &css,
        },
        &body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::NumberFormat;

    fn sample() -> StatsRecord {
        StatsRecord {
            name: "Octo Cat".to_string(),
            login: "octocat".to_string(),
            commits: 6600,
            prs: 40,
            prs_merged: 30,
            issues: 12,
            stars: 1234,
            contributed_to: 7,
            followers: 99,
            reviews: 5,
            discussions_started: 3,
            discussions_answered: 2,
        }
    }

    #[test]
    fn default_card_shows_default_stats() {
        let svg = render_stats_card(&sample(), &CardConfig::default());
        assert!(svg.contains("Octo Cat&#39;s GitHub Stats"));
        assert!(svg.contains("Total Stars Earned:"));
        assert!(svg.contains("Total Commits:"));
        assert!(svg.contains(">6.6k</text>"));
        assert!(svg.contains(">1.2k</text>"));
        assert!(svg.contains("Contributed to (last year):"));
        assert!(!svg.contains("Total PRs Reviewed"));
        assert!(svg.contains("data-testid=\"rank-circle\""));
        assert!(svg.contains("animation-delay: 450ms"));
        assert!(svg.contains("animation-delay: 1050ms"));
        // 5 * 25 + 40
        assert!(svg.contains("height=\"165\""));
        assert!(svg.contains("<desc id=\"descId\">Octo Cat&#39;s GitHub statistics</desc>"));
    }

    #[test]
    fn hiding_a_stat_removes_it() {
        let config = CardConfig {
            hide: vec!["commits".to_string()],
            ..CardConfig::default()
        };
        let svg = render_stats_card(&sample(), &config);
        assert!(!svg.contains("Total Commits"));
        assert!(!svg.contains(">6.6k<"));
        assert!(svg.contains("Total Stars Earned:"));
    }

    #[test]
    fn shown_extra_stat_is_added_and_unknown_ignored() {
        let config = CardConfig {
            show: vec![
                "reviews".to_string(),
                "prs_merged_percentage".to_string(),
                "no_such_stat".to_string(),
            ],
            ..CardConfig::default()
        };
        let svg = render_stats_card(&sample(), &config);
        assert!(svg.contains("Total PRs Reviewed:"));
        assert!(svg.contains(">75.0%</text>"));
        assert!(!svg.contains("no_such_stat"));
        assert_eq!(svg.matches("class=\"stagger\"").count(), 7);
    }

    #[test]
    fn long_number_format_groups_digits() {
        let config = CardConfig {
            number_format: NumberFormat::Long,
            ..CardConfig::default()
        };
        let svg = render_stats_card(&sample(), &config);
        assert!(svg.contains(">6,600</text>"));
        assert!(svg.contains(">1,234</text>"));
    }

    #[test]
    fn rank_can_be_hidden_and_icons_shown() {
        let config = CardConfig {
            hide_rank: true,
            show_icons: true,
            hide_title: true,
            ..CardConfig::default()
        };
        let svg = render_stats_card(&sample(), &config);
        assert!(!svg.contains("rank-circle"));
        assert!(svg.contains("data-testid=\"icon-stars\""));
        assert!(svg.contains("x=\"245\""));
        // title does not change the height
        assert!(svg.contains("height=\"165\""));
    }

    #[test]
    fn level_label_matches_rank() {
        let stats = StatsRecord {
            name: "idle".to_string(),
            login: "idle".to_string(),
            ..StatsRecord::default()
        };
        let svg = render_stats_card(&stats, &CardConfig::default());
        assert!(svg.contains("data-testid=\"level-rank-icon\">C</text>"));
        assert!(svg.contains("idle&#39;s GitHub statistics"));
    }

    #[test]
    fn height_follows_row_count() {
        let config = CardConfig {
            hide: vec!["commits".into(), "prs".into(), "issues".into(), "contribs".into()],
            ..CardConfig::default()
        };
        let svg = render_stats_card(&sample(), &config);
        // 1 * 25 + 40
        assert!(svg.contains("height=\"65\""));
    }

    #[test]
    fn shown_key_overrides_hidden_key() {
        let config = CardConfig {
            hide: vec!["commits".to_string()],
            show: vec!["commits".to_string()],
            ..CardConfig::default()
        };
        let svg = render_stats_card(&sample(), &config);
        assert!(svg.contains("data-testid=\"commits\""));
        assert!(svg.contains("Total Commits:"));
    }

    #[test]
    fn huge_line_height_saturates() {
        let config = CardConfig {
            line_height: u32::MAX,
            ..CardConfig::default()
        };
        let svg = render_stats_card(&sample(), &config);
        assert!(svg.contains(&format!("height=\"{}\"", u32::MAX)));
    }
}
