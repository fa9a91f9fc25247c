//! Card color themes and user color overrides.
//!
//! Overrides are hex strings without the leading `#`. The background may
//! also be a gradient written as `angle,hex1,hex2[,hexN...]`.

#[derive(Debug, Clone, Copy)]
struct ThemeColors {
    title: &'static str,
    text: &'static str,
    icon: &'static str,
    bg: &'static str,
    border: &'static str,
}

const DEFAULT: ThemeColors = ThemeColors {
    title: "2f80ed",
    text: "434d58",
    icon: "4c71f2",
    bg: "fffefe",
    border: "e4e2e2",
};

const THEMES: &[(&str, ThemeColors)] = &[
    ("default", DEFAULT),
    (
        "dark",
        ThemeColors {
            title: "fff",
            text: "9f9f9f",
            icon: "79ff97",
            bg: "151515",
            border: "e4e2e2",
        },
    ),
    (
        "radical",
        ThemeColors {
            title: "fe428e",
            text: "a9fef7",
            icon: "f8d847",
            bg: "141321",
            border: "e4e2e2",
        },
    ),
    (
        "tokyonight",
        ThemeColors {
            title: "70a5fd",
            text: "38bdae",
            icon: "bf91f3",
            bg: "1a1b27",
            border: "e4e2e2",
        },
    ),
    (
        "gruvbox",
        ThemeColors {
            title: "fabd2f",
            text: "8ec07c",
            icon: "fe8019",
            bg: "282828",
            border: "e4e2e2",
        },
    ),
    (
        "transparent",
        ThemeColors {
            title: "006aff",
            text: "417e87",
            icon: "0579c3",
            bg: "ffffff00",
            border: "e4e2e2",
        },
    ),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Background {
    Solid(String),
    Gradient { angle: String, stops: Vec<String> },
}

/// Fully resolved colors, every value carrying its `#`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardColors {
    pub title: String,
    pub text: String,
    pub icon: String,
    pub ring: String,
    pub border: String,
    pub background: Background,
}

/// Per-field overrides as given by the user.
#[derive(Debug, Clone, Default)]
pub struct ColorOverrides {
    pub title: Option<String>,
    pub text: Option<String>,
    pub icon: Option<String>,
    pub ring: Option<String>,
    pub border: Option<String>,
    pub bg: Option<String>,
}

pub fn is_valid_hex(value: &str) -> bool {
    matches!(value.len(), 3 | 4 | 6 | 8) && value.chars().all(|c| c.is_ascii_hexdigit())
}

fn pick(over: Option<&String>, fallback: &str) -> String {
    match over.map(|s| s.trim_start_matches('#')) {
        Some(hex) if is_valid_hex(hex) => format!("#{hex}"),
        Some(bad) => {
            tracing::debug!("ignoring invalid color override {bad:?}");
            format!("#{fallback}")
        }
        None => format!("#{fallback}"),
    }
}

fn parse_gradient(value: &str) -> Option<Background> {
    let mut parts = value.split(',').map(str::trim);
    let angle = parts.next()?;
    if angle.parse::<f32>().is_err() {
        return None;
    }
    let stops: Vec<String> = parts.map(|s| s.trim_start_matches('#')).map(str::to_string).collect();
    if stops.len() < 2 || !stops.iter().all(|s| is_valid_hex(s)) {
        return None;
    }
    Some(Background::Gradient {
        angle: angle.to_string(),
        stops: stops.into_iter().map(|s| format!("#{s}")).collect(),
    })
}

/// Looks up `theme` (falling back to `default`) and applies overrides.
pub fn resolve_colors(theme: &str, overrides: &ColorOverrides) -> CardColors {
    let base = THEMES
        .iter()
        .find(|(name, _)| *name == theme)
        .map(|(_, colors)| *colors)
        .unwrap_or_else(|| {
            tracing::debug!("unknown theme {theme:?}, using default");
            DEFAULT
        });

    let title = pick(overrides.title.as_ref(), base.title);
    let ring = match overrides.ring.as_ref() {
        Some(r) if is_valid_hex(r.trim_start_matches('#')) => pick(Some(r), base.title),
        _ => title.clone(),
    };
    let background = overrides
        .bg
        .as_deref()
        .and_then(parse_gradient)
        .unwrap_or_else(|| Background::Solid(pick(overrides.bg.as_ref(), base.bg)));

    CardColors {
        title,
        text: pick(overrides.text.as_ref(), base.text),
        icon: pick(overrides.icon.as_ref(), base.icon),
        ring,
        border: pick(overrides.border.as_ref(), base.border),
        background,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_theme_uses_default() {
        let c = resolve_colors("no-such-theme", &ColorOverrides::default());
        assert_eq!(c.title, "#2f80ed");
        assert_eq!(c.background, Background::Solid("#fffefe".to_string()));
    }

    #[test]
    fn overrides_win_and_invalid_ones_are_ignored() {
        let overrides = ColorOverrides {
            title: Some("ff0000".to_string()),
            text: Some("not-a-color".to_string()),
            ..ColorOverrides::default()
        };
        let c = resolve_colors("dark", &overrides);
        assert_eq!(c.title, "#ff0000");
        assert_eq!(c.text, "#9f9f9f");
        assert_eq!(c.ring, "#ff0000");
    }

    #[test]
    fn invalid_ring_follows_overridden_title() {
        let overrides = ColorOverrides {
            title: Some("00ff00".to_string()),
            ring: Some("nope".to_string()),
            ..ColorOverrides::default()
        };
        let c = resolve_colors("dark", &overrides);
        assert_eq!(c.ring, "#00ff00");

        let overrides = ColorOverrides {
            ring: Some("#abcdef".to_string()),
            ..overrides
        };
        assert_eq!(resolve_colors("dark", &overrides).ring, "#abcdef");
    }

    #[test]
    fn gradient_background_is_parsed() {
        let overrides = ColorOverrides {
            bg: Some("35,f00,00ff00".to_string()),
            ..ColorOverrides::default()
        };
        let c = resolve_colors("default", &overrides);
        assert_eq!(
            c.background,
            Background::Gradient {
                angle: "35".to_string(),
                stops: vec!["#f00".to_string(), "#00ff00".to_string()],
            }
        );
    }

    #[test]
    fn malformed_gradient_falls_back_to_theme() {
        let overrides = ColorOverrides {
            bg: Some("35,zzz".to_string()),
            ..ColorOverrides::default()
        };
        let c = resolve_colors("default", &overrides);
        assert_eq!(c.background, Background::Solid("#fffefe".to_string()));
    }
}
