use crate::config::ContribCardConfig;
use crate::format::group_digits;
use crate::stats::{ContributorRecord, RepoEntry};
use crate::svg::{Frame, escape_xml, render_card};

const HEADER_HEIGHT: u32 = 55;
const ROW_HEIGHT: u32 = 30;
const BOTTOM_PADDING: u32 = 15;
const EMPTY_HEIGHT: u32 = 100;
const RIGHT_INSET: u32 = 50;

const AVATAR_CLIP: &str = r#"<defs>
      <clipPath id="avatar-clip">
        <circle cx="10" cy="10" r="10" />
      </clipPath>
    </defs>"#;

pub fn contrib_card_height(rows: usize) -> u32 {
    if rows == 0 {
        EMPTY_HEIGHT
    } else {
        HEADER_HEIGHT + rows as u32 * ROW_HEIGHT + BOTTOM_PADDING
    }
}

fn build_repo_row(index: usize, repo: &RepoEntry, right_edge: u32, placeholder: &str) -> String {
    let y = index as u32 * ROW_HEIGHT;
    let avatar = match &repo.avatar {
        Some(img) => format!(
            r#"<image x="0" y="-2" width="20" height="20" clip-path="url(#avatar-clip)" href="data:{mime};base64,{data}" />"#,
            mime = escape_xml(&img.mime),
            data = escape_xml(&img.data)
        ),
        None => format!(r#"<circle cx="10" cy="8" r="10" fill="{placeholder}" opacity="0.5" />"#),
    };

    format!(
        r#"<g transform="translate(25, {y})">
      {avatar}
      <text x="30" y="12.5" class="stat bold">{name}</text>
      <g transform="translate({right_edge}, 12.5)">
        <text text-anchor="end" class="stat">{stars} ★</text>
      </g>
    </g>"#,
        name = escape_xml(&repo.name),
        stars = group_digits(repo.stars),
    )
}

/// Renders the list of top contributed-to repositories.
///
/// Rows are rendered as given; selection and ordering happen while fetching.
pub fn render_contrib_card(record: &ContributorRecord, config: &ContribCardConfig) -> String {
    let cfg = config.resolve();
    let height = contrib_card_height(record.repos.len());

    let body = if record.repos.is_empty() {
        format!(
            r#"<text x="25" y="15" class="stat bold" fill="{color}" data-testid="empty">{message}</text>"#,
            color = cfg.colors.text,
            message = escape_xml(cfg.empty_message)
        )
    } else {
        let right_edge = cfg.width.saturating_sub(RIGHT_INSET);
        let rows: Vec<String> = record
            .repos
            .iter()
            .enumerate()
            .map(|(i, repo)| build_repo_row(i, repo, right_edge, &cfg.colors.icon))
            .collect();
        format!("{AVATAR_CLIP}\n    {}", rows.join("\n    "))
    };

    let a11y_desc = format!(
        "List of top {} repositories contributed to, sorted by stars.",
        record.repos.len()
    );

    render_card(
        &Frame {
            title: &cfg.title,
            width: cfg.width,
            height,
            colors: &cfg.colors,
            hide_title: cfg.hide_title,
            hide_border: cfg.hide_border,
            border_radius: cfg.border_radius,
            disable_animations: cfg.disable_animations,
            a11y_title: &cfg.title,
            a11y_desc: &a11y_desc,
            extra_css: "",
        },
        &body,
    )
}
