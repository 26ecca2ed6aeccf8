use super::badge::status_badge;
use crate::api::{PullRequestSummary, UserData};
use crate::view::{ProfileView, ViewBranch};

const STYLE: &str = r#"
body { margin: 0; font-family: system-ui, sans-serif; }
.centered { display: flex; flex-direction: column; align-items: center; justify-content: center; height: 100vh; }
.message { color: #000; font-size: 1.25rem; }
.loader { width: 2.5rem; height: 2.5rem; border: 4px solid #d4d4d8; border-top-color: #18181b; border-radius: 50%; animation: spin 1s linear infinite; }
@keyframes spin { to { transform: rotate(360deg); } }
.page { min-height: 100vh; background: #000; color: #fff; padding: 8rem 2rem 2rem; }
.container { max-width: 48rem; margin: 0 auto; }
.header { display: flex; align-items: center; gap: 1rem; margin-bottom: 2rem; }
.avatar { position: relative; width: 6rem; height: 6rem; border-radius: 50%; overflow: hidden; background: #27272a; display: flex; align-items: center; justify-content: center; font-size: 2rem; }
.avatar img { position: absolute; inset: 0; width: 100%; height: 100%; object-fit: cover; }
.muted { color: #a1a1aa; }
.icon { flex-shrink: 0; }
.icon-sm { width: 1rem; height: 1rem; }
.icon-md { width: 1.25rem; height: 1.25rem; color: #a1a1aa; }
.handle { display: flex; align-items: center; gap: 0.5rem; }
.stats { display: grid; grid-template-columns: repeat(5, 1fr); gap: 1rem; margin-bottom: 2rem; }
.card { background: #18181b; padding: 1rem; border-radius: 0.5rem; }
.stat-value { font-size: 1.5rem; font-weight: 700; }
.prs { display: flex; flex-direction: column; gap: 0.5rem; }
.pr { display: flex; align-items: center; justify-content: space-between; }
.pr-main { display: flex; align-items: center; gap: 0.75rem; }
.pr-title { font-weight: 500; }
.pr-url { font-size: 0.875rem; }
.badge { color: #fff; padding: 0.25rem 0.5rem; border-radius: 0.25rem; font-size: 0.875rem; }
.bg-purple-500 { background: #a855f7; }
.bg-green-500 { background: #22c55e; }
.bg-red-500 { background: #ef4444; }
.bg-zinc-500 { background: #71717a; }
"#;

const PR_ICON_PATHS: &str = r#"<circle cx="18" cy="18" r="3"/><circle cx="6" cy="6" r="3"/><path d="M13 6h3a2 2 0 0 1 2 2v7"/><line x1="6" x2="6" y1="9" y2="21"/>"#;

/// Pull-request glyph; `size` is `sm` (header) or `md` (list rows).
fn pr_icon(size: &str) -> String {
    format!(
        r#"<svg class="icon icon-{size}" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" aria-hidden="true">{PR_ICON_PATHS}</svg>"#
    )
}

/// Render the whole page for the view's current state.
pub fn render_page(view: &ProfileView) -> String {
    let body = match view.branch() {
        ViewBranch::Error(message) => format!(
            "<div class=\"centered\"><p class=\"message\">{}</p></div>",
            escape_html(message)
        ),
        ViewBranch::Loading => {
            "<div class=\"centered\"><div class=\"loader\" role=\"status\"></div></div>".to_string()
        }
        ViewBranch::Profile(data) => render_profile(data),
    };

    let title = view.title().map(escape_html).unwrap_or_default();
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{body}\n</body>\n</html>\n"
    )
}

fn render_profile(data: &UserData) -> String {
    let mut out = String::new();
    out.push_str("<div class=\"page\"><div class=\"container\">\n");

    out.push_str("<div class=\"header\">");
    out.push_str(&render_avatar(data));
    out.push_str(&format!(
        "<div><h1>{}</h1><div class=\"muted handle\">{}{}</div><p class=\"muted\">{}</p></div>",
        escape_html(&data.name),
        pr_icon("sm"),
        escape_html(&data.username),
        escape_html(data.bio.as_deref().unwrap_or_default()),
    ));
    out.push_str("</div>\n");

    out.push_str("<div class=\"stats\">\n");
    for (label, value) in data.stats_strip() {
        out.push_str(&format!(
            "<div class=\"card\"><div class=\"stat-value\">{value}</div><div class=\"muted\">{label}</div></div>\n"
        ));
    }
    out.push_str("</div>\n");

    out.push_str("<h2>Recent Pull Requests</h2>\n<div class=\"prs\">\n");
    for pr in &data.prs {
        out.push_str(&render_pr_row(pr));
    }
    out.push_str("</div>\n</div></div>");
    out
}

fn render_avatar(data: &UserData) -> String {
    let fallback = data.initial().map(String::from).unwrap_or_default();
    let image = data
        .avatar
        .as_deref()
        .map(|src| {
            format!(
                "<img src=\"{}\" alt=\"{}\" onerror=\"this.remove()\">",
                escape_html(src),
                escape_html(&data.name)
            )
        })
        .unwrap_or_default();
    format!(
        "<div class=\"avatar\"><span>{}</span>{image}</div>",
        escape_html(&fallback)
    )
}

fn render_pr_row(pr: &PullRequestSummary) -> String {
    let badge = status_badge(&pr.state);
    format!(
        "<div class=\"card pr\"><div class=\"pr-main\">{}<div><div class=\"pr-title\">{}</div><div class=\"muted pr-url\">{}</div></div></div><span class=\"badge {}\">{}</span></div>\n",
        pr_icon("md"),
        escape_html(&pr.title),
        escape_html(&pr.url),
        badge.color.css_class(),
        escape_html(&badge.label),
    )
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, PrState};
    use crate::view::tests::alice;
    use crate::view::NOT_FOUND_MESSAGE;

    fn loaded(data: UserData) -> ProfileView {
        let mut view = ProfileView::new();
        let ticket = view.navigate(&data.username.clone());
        view.apply(&ticket, Ok(data));
        view
    }

    #[test]
    fn test_loading_page_has_only_loader() {
        let mut view = ProfileView::new();
        view.navigate("alice");
        let html = render_page(&view);
        assert!(html.contains("class=\"loader\""));
        assert!(!html.contains(NOT_FOUND_MESSAGE));
        assert!(!html.contains("class=\"stats\""));
        assert!(html.contains("<title></title>"));
    }

    #[test]
    fn test_error_page_has_only_message() {
        let mut view = ProfileView::new();
        let ticket = view.navigate("ghost");
        view.apply(&ticket, Err(ApiError::NotFound("ghost".to_string())));
        let html = render_page(&view);
        assert!(html.contains(NOT_FOUND_MESSAGE));
        assert!(!html.contains("class=\"loader\""));
        assert!(!html.contains("class=\"stats\""));
        assert!(html.contains("<title></title>"));
    }

    #[test]
    fn test_profile_page_scenario() {
        let html = render_page(&loaded(alice()));
        assert!(html.contains("<title>Profile | Alice</title>"));
        assert!(html.contains("<h1>Alice</h1>"));
        assert!(html.contains("<span>A</span>"));
        assert!(html.contains("src=\"a.png\" alt=\"Alice\""));
        assert!(html.contains("<span class=\"badge bg-purple-500\">Merged</span>"));
        assert!(html.contains("Fix bug"));
        assert!(html.contains("/pr/1"));
        assert!(!html.contains("class=\"loader\""));

        let values: Vec<usize> = ["10", "2", "3", "4", "5"]
            .iter()
            .map(|v| {
                html.find(&format!("<div class=\"stat-value\">{v}</div>"))
                    .unwrap()
            })
            .collect();
        assert!(values.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_pr_rows_keep_input_order() {
        let mut data = alice();
        data.prs = ["zeta", "alpha", "mid"]
            .iter()
            .map(|t| PullRequestSummary {
                title: t.to_string(),
                url: format!("/pr/{t}"),
                state: PrState::Open,
            })
            .collect();
        let html = render_page(&loaded(data));
        let zeta = html.find(">zeta<").unwrap();
        let alpha = html.find(">alpha<").unwrap();
        let mid = html.find(">mid<").unwrap();
        assert!(zeta < alpha && alpha < mid);
    }

    #[test]
    fn test_escapes_user_content() {
        let mut data = alice();
        data.bio = Some("<script>alert(1)</script> & co".to_string());
        let html = render_page(&loaded(data));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt; &amp; co"));
    }

    #[test]
    fn test_missing_avatar_uses_fallback_only() {
        let mut data = alice();
        data.avatar = None;
        let html = render_page(&loaded(data));
        assert!(html.contains("<div class=\"avatar\"><span>A</span></div>"));
    }

    #[test]
    fn test_icons_are_sized_by_stylesheet() {
        let html = render_page(&loaded(alice()));
        assert!(html.contains("<div class=\"muted handle\"><svg class=\"icon icon-sm\""));
        assert!(html.contains("<div class=\"pr-main\"><svg class=\"icon icon-md\""));
        for rule in [".icon {", ".icon-sm {", ".icon-md {"] {
            assert!(STYLE.contains(rule), "missing css rule {rule}");
        }
    }
}
