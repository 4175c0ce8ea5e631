//! Reviewer column rendering and shared column sizing.

use crate::models::{ReviewerResult, ReviewerState, RowId};
use crate::services::host_page::HostPage;

/// Custom property carrying the reviewer column width.
pub const COLUMN_WIDTH_PROPERTY: &str = "--reviewer-col-width";

/// Text of the toolbar header label.
pub const HEADER_LABEL: &str = "Reviewers";

// Column width components, in px
const CELL_PADDING: u32 = 24;
const AVATAR_SIZE: u32 = 30;
const AVATAR_GAP: u32 = 6;
const CHAR_WIDTH: f64 = 7.2;
const WIDTH_BUFFER: u32 = 8;

/// Column width fitting a login of `longest` characters at the 12px font.
pub fn column_width(longest: usize) -> u32 {
    let text = (longest as f64 * CHAR_WIDTH).ceil() as u32;
    CELL_PADDING + AVATAR_SIZE + AVATAR_GAP + text + WIDTH_BUFFER
}

/// One reviewer: a profile link wrapping an avatar and the login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewerLink {
    pub login: String,
    pub state: ReviewerState,
    pub href: String,
    pub hovercard_url: String,
    pub avatar_url: String,
}

impl ReviewerLink {
    /// Avatar tooltip: `login (state)`.
    pub fn title(&self) -> String {
        format!("{} ({})", self.login, self.state)
    }

    pub fn avatar_class(&self) -> String {
        format!("avatar reviewer-avatar review-{}", self.state)
    }

    pub fn to_html(&self) -> String {
        format!(
            r#"<a href="{href}" class="Link--muted reviewer-link" data-hovercard-type="user" data-hovercard-url="{hovercard}"><img src="{src}" alt="{alt}" title="{title}" class="{class}">{text}</a>"#,
            href = escape_html(&self.href),
            hovercard = escape_html(&self.hovercard_url),
            src = escape_html(&self.avatar_url),
            alt = escape_html(&self.login),
            title = escape_html(&self.title()),
            class = self.avatar_class(),
            text = escape_html(&self.login),
        )
    }
}

/// The reviewer column appended to one row. May be empty (kept for alignment).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewerColumn {
    pub links: Vec<ReviewerLink>,
}

impl ReviewerColumn {
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn to_html(&self) -> String {
        let links: String = self.links.iter().map(ReviewerLink::to_html).collect();
        format!(r#"<div class="reviewer-col">{}</div>"#, links)
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Builds and mounts reviewer columns.
#[derive(Debug, Clone)]
pub struct Renderer {
    avatar_base_url: String,
}

impl Renderer {
    pub fn new(avatar_base_url: impl Into<String>) -> Self {
        Self {
            avatar_base_url: avatar_base_url.into(),
        }
    }

    /// Build the column for an already filtered result.
    pub fn column(&self, reviewers: &ReviewerResult) -> ReviewerColumn {
        let base = self.avatar_base_url.trim_end_matches('/');
        let links = reviewers
            .iter()
            .map(|(login, state)| ReviewerLink {
                login: login.to_string(),
                state,
                href: format!("/{}", login),
                hovercard_url: format!("/users/{}/hovercard", login),
                avatar_url: format!("{}/{}.png?size=40", base, login),
            })
            .collect();

        ReviewerColumn { links }
    }

    /// Mount a column for `reviewers` into `row`.
    pub fn render_row<P: HostPage + ?Sized>(
        &self,
        page: &P,
        row: &RowId,
        reviewers: &ReviewerResult,
    ) {
        page.mount_column(row, self.column(reviewers));
    }

    /// Insert the header label if the page has a toolbar and no label yet.
    pub fn ensure_header<P: HostPage + ?Sized>(&self, page: &P) {
        if !page.has_header() && !page.insert_header(HEADER_LABEL) {
            log::debug!("[render] No toolbar, skipping header label");
        }
    }

    /// Remove every column and the header label.
    pub fn clear<P: HostPage + ?Sized>(&self, page: &P) {
        page.remove_columns();
        page.remove_header();
    }

    /// Size the column to the longest rendered login.
    ///
    /// # Returns
    /// The applied width, or `None` when nothing is rendered
    pub fn recompute_column_width<P: HostPage + ?Sized>(&self, page: &P) -> Option<u32> {
        let longest = page
            .rendered_logins()
            .iter()
            .map(|login| login.trim().chars().count())
            .max()
            .filter(|&len| len > 0)?;

        let width = column_width(longest);
        page.set_root_property(COLUMN_WIDTH_PROPERTY, &format!("{}px", width));
        page.set_header_width(width);
        Some(width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::host_page::ListPage;

    fn renderer() -> Renderer {
        Renderer::new("https://github.com/")
    }

    #[test]
    fn test_column_width_formula() {
        assert_eq!(column_width(10), 24 + 30 + 6 + 72 + 8);
        assert_eq!(column_width(3), 24 + 30 + 6 + 22 + 8);
    }

    #[test]
    fn test_column_links_follow_result_order() {
        let reviewers: ReviewerResult = [
            ("octocat", ReviewerState::Approved),
            ("hubot", ReviewerState::ChangesRequested),
        ]
        .into_iter()
        .collect();

        let column = renderer().column(&reviewers);

        assert_eq!(column.links.len(), 2);
        let first = &column.links[0];
        assert_eq!(first.href, "/octocat");
        assert_eq!(first.hovercard_url, "/users/octocat/hovercard");
        assert_eq!(first.avatar_url, "https://github.com/octocat.png?size=40");
        assert_eq!(first.title(), "octocat (approved)");
        assert_eq!(
            column.links[1].avatar_class(),
            "avatar reviewer-avatar review-changes_requested"
        );
    }

    #[test]
    fn test_to_html_escapes() {
        let link = ReviewerLink {
            login: "a\"<b>".to_string(),
            state: ReviewerState::Pending,
            href: "/a".to_string(),
            hovercard_url: "/users/a/hovercard".to_string(),
            avatar_url: "https://github.com/a.png?size=40&x=1".to_string(),
        };
        let html = link.to_html();
        assert!(html.contains("a&quot;&lt;b&gt;"));
        assert!(html.contains("size=40&amp;x=1"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_recompute_width_uses_longest_login() {
        let page = ListPage::new("/o/r/pulls");
        let row = page.push_row("issue_1", Some("/o/r/pull/1"));
        let renderer = renderer();
        renderer.ensure_header(&page);

        let reviewers: ReviewerResult = [
            ("abc", ReviewerState::Pending),
            ("abcdefghij", ReviewerState::Approved),
        ]
        .into_iter()
        .collect();
        renderer.render_row(&page, &row, &reviewers);

        assert_eq!(renderer.recompute_column_width(&page), Some(140));
        assert_eq!(page.root_property(COLUMN_WIDTH_PROPERTY).as_deref(), Some("140px"));
        assert_eq!(page.header().unwrap().width_px, Some(140));
    }

    #[test]
    fn test_recompute_width_without_links_is_a_no_op() {
        let page = ListPage::new("/o/r/pulls");
        let row = page.push_row("issue_1", None);
        let renderer = renderer();
        renderer.render_row(&page, &row, &ReviewerResult::new());

        assert_eq!(renderer.recompute_column_width(&page), None);
        assert_eq!(page.root_property(COLUMN_WIDTH_PROPERTY), None);
    }

    #[test]
    fn test_clear_removes_columns_and_header() {
        let page = ListPage::new("/o/r/pulls");
        let row = page.push_row("issue_1", Some("/o/r/pull/1"));
        let renderer = renderer();
        renderer.ensure_header(&page);
        renderer.render_row(&page, &row, &ReviewerResult::new());

        renderer.clear(&page);

        assert_eq!(page.column_count(), 0);
        assert!(page.header().is_none());
    }
}
