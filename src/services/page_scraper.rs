//! Reviewer extraction from a rendered pull request page.
//!
//! The reviewer sidebar form lists one `p.d-flex` row per requested reviewer:
//!
//! ```html
//! <form class="js-issue-sidebar-form" aria-label="Select reviewers">
//!   <p class="d-flex">
//!     <span data-assignee-name="octocat">...</span>
//!     <a id="review-status-octocat"><svg class="octicon octicon-check color-fg-success"></svg></a>
//!   </p>
//! </form>
//! ```
//!
//! The status icon's color class carries the review state.

use crate::error::AppError;
use crate::models::{ReviewerResult, ReviewerState};
use scraper::{ElementRef, Html, Selector};

const FORM_SELECTOR: &str = r#"form.js-issue-sidebar-form[aria-label="Select reviewers"]"#;
const REVIEWER_SELECTOR: &str = "p.d-flex > span[data-assignee-name]";
const STATUS_LINK_SELECTOR: &str = "a[id]";
const ICON_SELECTOR: &str = "svg";

fn selector(css: &str) -> Result<Selector, AppError> {
    Selector::parse(css).map_err(|e| AppError::internal(format!("Bad selector {}: {}", css, e)))
}

/// Map a status icon's class attribute to a review state.
///
/// `None` means the reviewer row has no icon at all (review still requested).
pub fn state_from_status_icon(icon_class: Option<&str>) -> ReviewerState {
    let Some(class) = icon_class else {
        return ReviewerState::Pending;
    };

    if class.contains("color-fg-success") {
        ReviewerState::Approved
    } else if class.contains("color-fg-danger") {
        ReviewerState::ChangesRequested
    } else {
        // octicon-comment, color-fg-muted, color-fg-attention and anything
        // unrecognized all count as a non-approving review
        ReviewerState::Commented
    }
}

/// Extract reviewers from pull request page markup.
///
/// # Returns
/// `None` when the page has no reviewer form (layout variant, logged out,
/// or no reviewers section), otherwise the reviewers in page order
pub fn parse_reviewer_sidebar(html: &str) -> Result<Option<ReviewerResult>, AppError> {
    let form_selector = selector(FORM_SELECTOR)?;
    let reviewer_selector = selector(REVIEWER_SELECTOR)?;
    let status_link_selector = selector(STATUS_LINK_SELECTOR)?;
    let icon_selector = selector(ICON_SELECTOR)?;

    let document = Html::parse_document(html);
    let Some(form) = document.select(&form_selector).next() else {
        return Ok(None);
    };

    let mut reviewers = ReviewerResult::new();

    for span in form.select(&reviewer_selector) {
        let Some(login) = span
            .value()
            .attr("data-assignee-name")
            .filter(|name| !name.is_empty())
        else {
            continue;
        };

        let status_id = format!("review-status-{}", login);
        let icon_class = span
            .parent()
            .and_then(ElementRef::wrap)
            .and_then(|row| {
                row.select(&status_link_selector)
                    .find(|link| link.value().id() == Some(status_id.as_str()))
            })
            .and_then(|link| link.select(&icon_selector).next())
            .map(|icon| icon.value().attr("class").unwrap_or(""));

        reviewers.set(login, state_from_status_icon(icon_class));
    }

    Ok(Some(reviewers))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(rows: &str) -> String {
        format!(
            r#"<html><body>
            <div class="Layout-sidebar">
              <form class="js-issue-sidebar-form" aria-label="Select reviewers" action="/o/r/pull/1/review-requests">
                {}
              </form>
              <form class="js-issue-sidebar-form" aria-label="Select assignees">
                <p class="d-flex"><span data-assignee-name="assignee-only"></span></p>
              </form>
            </div>
            </body></html>"#,
            rows
        )
    }

    fn row(login: &str, status: &str) -> String {
        format!(
            r#"<p class="d-flex">
                 <span data-assignee-name="{login}" class="css-truncate"><a class="assignee Link--primary"><span>{login}</span></a></span>
                 {status}
               </p>"#
        )
    }

    fn status(login: &str, svg_class: &str) -> String {
        format!(
            r#"<a id="review-status-{login}" href="/o/r/pull/1/files"><svg class="{svg_class}" aria-hidden="true"></svg></a>"#
        )
    }

    #[test]
    fn test_state_from_status_icon() {
        assert_eq!(state_from_status_icon(None), ReviewerState::Pending);
        assert_eq!(
            state_from_status_icon(Some("octicon octicon-check color-fg-success")),
            ReviewerState::Approved
        );
        assert_eq!(
            state_from_status_icon(Some("octicon octicon-file-diff color-fg-danger")),
            ReviewerState::ChangesRequested
        );
        assert_eq!(
            state_from_status_icon(Some("octicon octicon-comment")),
            ReviewerState::Commented
        );
        assert_eq!(
            state_from_status_icon(Some("octicon octicon-dot-fill color-fg-attention")),
            ReviewerState::Commented
        );
        assert_eq!(state_from_status_icon(Some("")), ReviewerState::Commented);
    }

    #[test]
    fn test_parses_every_indicator_in_page_order() {
        let html = page(&[
            row("mona", &status("mona", "octicon octicon-check color-fg-success")),
            row("hubot", &status("hubot", "octicon octicon-file-diff color-fg-danger")),
            row("octocat", ""),
            row("Lisa", &status("Lisa", "octicon octicon-comment color-fg-muted")),
        ]
        .concat());

        let reviewers = parse_reviewer_sidebar(&html).unwrap().unwrap();
        let entries: Vec<_> = reviewers.iter().collect();
        assert_eq!(
            entries,
            vec![
                ("mona", ReviewerState::Approved),
                ("hubot", ReviewerState::ChangesRequested),
                ("octocat", ReviewerState::Pending),
                ("Lisa", ReviewerState::Commented),
            ]
        );
    }

    #[test]
    fn test_status_link_for_other_login_is_ignored() {
        // A status link keyed to a different reviewer does not belong to this row
        let html = page(&row("mona", &status("someone-else", "color-fg-success")));

        let reviewers = parse_reviewer_sidebar(&html).unwrap().unwrap();
        assert_eq!(reviewers.get("mona"), Some(ReviewerState::Pending));
    }

    #[test]
    fn test_status_link_without_icon_is_pending() {
        let html = page(&row("mona", r#"<a id="review-status-mona"></a>"#));

        let reviewers = parse_reviewer_sidebar(&html).unwrap().unwrap();
        assert_eq!(reviewers.get("mona"), Some(ReviewerState::Pending));
    }

    #[test]
    fn test_missing_form_returns_none() {
        let html = r#"<html><body><form class="js-issue-sidebar-form" aria-label="Select assignees"></form></body></html>"#;
        assert!(parse_reviewer_sidebar(html).unwrap().is_none());
    }

    #[test]
    fn test_empty_form_returns_empty_result() {
        let reviewers = parse_reviewer_sidebar(&page("")).unwrap().unwrap();
        assert!(reviewers.is_empty());
    }

    #[test]
    fn test_assignee_form_is_not_read() {
        let reviewers = parse_reviewer_sidebar(&page("")).unwrap().unwrap();
        assert!(!reviewers.contains("assignee-only"));
    }
}
