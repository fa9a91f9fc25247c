use crate::theme::{Background, CardColors};

const GRADIENT_ID: &str = "gradient";
const TITLE_BODY_OFFSET: u32 = 55;
const NO_TITLE_BODY_OFFSET: u32 = 25;

// Utilities for building SVG content

pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Container chrome shared by every card.
pub struct Frame<'a> {
    pub title: &'a str,
    pub width: u32,
    pub height: u32,
    pub colors: &'a CardColors,
    pub hide_title: bool,
    pub hide_border: bool,
    pub border_radius: f32,
    pub disable_animations: bool,
    pub a11y_title: &'a str,
    pub a11y_desc: &'a str,
    /// Extra CSS rules appended to the style block.
    pub extra_css: &'a str,
}

fn gradient_defs(background: &Background) -> (String, String) {
    match background {
        Background::Solid(color) => (String::new(), color.clone()),
        Background::Gradient { angle, stops } => {
            let step = 100.0 / (stops.len() - 1) as f32;
            let stops_svg: String = stops
                .iter()
                .enumerate()
                .map(|(i, color)| {
                    format!(
                        r#"<stop offset="{}%" stop-color="{color}" />"#,
                        (i as f32 * step).round()
                    )
                })
                .collect();
            let defs = format!(
                r#"<linearGradient id="{GRADIENT_ID}" gradientTransform="rotate({angle})" gradientUnits="userSpaceOnUse">{stops_svg}</linearGradient>"#
            );
            (defs, format!("url(#{GRADIENT_ID})"))
        }
    }
}

fn style_block(frame: &Frame) -> String {
    let c = frame.colors;
    let animation = if frame.disable_animations {
        "* { animation-duration: 0s !important; animation-delay: 0s !important; }".to_string()
    } else {
        r#".stagger {
    opacity: 0;
    animation: fadeInAnimation 0.3s ease-in-out forwards;
  }
  @keyframes fadeInAnimation {
    from { opacity: 0; }
    to { opacity: 1; }
  }"#
        .to_string()
    };

    format!(
        r#"<style>
  .header {{
    font: 600 18px 'Segoe UI', Ubuntu, Sans-Serif;
    fill: {title};
  }}
  .stat {{
    font: 600 14px 'Segoe UI', Ubuntu, "Helvetica Neue", Sans-Serif;
    fill: {text};
  }}
  .bold {{ font-weight: 700; }}
  .not_bold {{ font-weight: 400; }}
  .icon {{
    fill: {icon};
    display: block;
  }}
  {extra}
  {animation}
</style>"#,
        title = c.title,
        text = c.text,
        icon = c.icon,
        extra = frame.extra_css,
    )
}

/// Wraps `body` in the card container: accessibility tags, styles, border
/// and title. The body is shifted below the title region.
pub fn render_card(frame: &Frame, body: &str) -> String {
    let (defs, fill) = gradient_defs(&frame.colors.background);
    let style = style_block(frame);

    let title = if frame.hide_title {
        String::new()
    } else {
        format!(
            r#"<g data-testid="card-title" transform="translate(25, 35)">
    <text x="0" y="0" class="header" data-testid="header">{}</text>
  </g>"#,
            escape_xml(frame.title)
        )
    };
    let body_y = if frame.hide_title {
        NO_TITLE_BODY_OFFSET
    } else {
        TITLE_BODY_OFFSET
    };
    let border_opacity = if frame.hide_border { 0 } else { 1 };

    format!(
        r#"<svg width="{w}" height="{h}" viewBox="0 0 {w} {h}" fill="none" xmlns="http://www.w3.org/2000/svg" role="img" aria-labelledby="titleId descId">
  <title id="titleId">{a11y_title}</title>
  <desc id="descId">{a11y_desc}</desc>
  {style}
  <defs>{defs}</defs>
  <rect data-testid="card-bg" x="0.5" y="0.5" rx="{radius}" height="{rect_h}" stroke="{border}" width="{rect_w}" fill="{fill}" stroke-opacity="{border_opacity}"/>
  {title}
  <g data-testid="main-card-body" transform="translate(0, {body_y})">
    {body}
  </g>
</svg>
"#,
        w = frame.width,
        h = frame.height,
        rect_w = frame.width.saturating_sub(1),
        rect_h = frame.height.saturating_sub(1),
        radius = frame.border_radius,
        border = frame.colors.border,
        a11y_title = escape_xml(frame.a11y_title),
        a11y_desc = escape_xml(frame.a11y_desc),
    )
}
