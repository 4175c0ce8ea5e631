//! The pull request list page, as seen by the reviewer pipeline.
//!
//! `HostPage` is the seam to whatever owns the real document (a content
//! script bridge, a headless browser, a test). `ListPage` is an in-memory
//! implementation that keeps just enough structure for the pipeline.

use crate::models::RowId;
use crate::services::renderer::ReviewerColumn;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// One pull request row as discovered on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRow {
    pub id: RowId,
    /// `href` of the row's pull request link (`/owner/repo/pull/12`).
    pub pr_href: Option<String>,
    /// Whether the row has a container the reviewer column can go into.
    pub has_container: bool,
}

/// Document operations the pipeline needs.
///
/// Every method must tolerate missing anchors: a missing toolbar, header or
/// row is skipped, never an error.
pub trait HostPage: Send + Sync {
    /// Path of the current location (`/owner/repo/pulls`).
    fn location_path(&self) -> String;

    /// Rows currently in the document, in document order.
    fn rows(&self) -> Vec<PageRow>;

    /// Append a reviewer column to the row's container.
    fn mount_column(&self, row: &RowId, column: ReviewerColumn);

    /// Remove every reviewer column from every row.
    fn remove_columns(&self);

    /// Display text of every rendered reviewer link.
    fn rendered_logins(&self) -> Vec<String>;

    fn has_header(&self) -> bool;

    /// Append the header label to the toolbar. Returns false when the page
    /// has no toolbar.
    fn insert_header(&self, label: &str) -> bool;

    fn remove_header(&self);

    /// Size the header label to `px` (width, min-width, border-box).
    fn set_header_width(&self, px: u32);

    /// Set a custom property on the document root.
    fn set_root_property(&self, name: &str, value: &str);
}

/// Header label inserted into the list toolbar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderLabel {
    pub text: String,
    pub width_px: Option<u32>,
}

impl HeaderLabel {
    /// Inline style equivalent of the applied sizing.
    pub fn style(&self) -> Option<String> {
        self.width_px
            .map(|px| format!("width: {px}px; min-width: {px}px; box-sizing: border-box"))
    }
}

#[derive(Debug, Clone)]
struct ListRow {
    row: PageRow,
    columns: Vec<ReviewerColumn>,
}

#[derive(Debug, Default)]
struct ListPageState {
    path: String,
    has_toolbar: bool,
    header: Option<HeaderLabel>,
    rows: Vec<ListRow>,
    root_properties: BTreeMap<String, String>,
}

/// In-memory list page.
#[derive(Debug, Default)]
pub struct ListPage {
    state: Mutex<ListPageState>,
}

impl ListPage {
    /// A page at `path` with a toolbar and no rows.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(ListPageState {
                path: path.into(),
                has_toolbar: true,
                ..Default::default()
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, ListPageState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_toolbar(&self, present: bool) {
        let mut state = self.state();
        state.has_toolbar = present;
        if !present {
            state.header = None;
        }
    }

    /// Soft navigation: new path, rows replaced by the caller.
    pub fn navigate(&self, path: impl Into<String>) {
        let mut state = self.state();
        state.path = path.into();
        state.rows.clear();
        state.header = None;
    }

    /// Append a row with a container.
    pub fn push_row(&self, id: impl Into<String>, pr_href: Option<&str>) -> RowId {
        self.push_page_row(PageRow {
            id: RowId::new(id),
            pr_href: pr_href.map(str::to_string),
            has_container: true,
        })
    }

    pub fn push_page_row(&self, row: PageRow) -> RowId {
        let id = row.id.clone();
        self.state().rows.push(ListRow {
            row,
            columns: Vec::new(),
        });
        id
    }

    pub fn remove_row(&self, id: &RowId) {
        self.state().rows.retain(|r| &r.row.id != id);
    }

    /// Reviewer columns mounted in a row.
    pub fn columns(&self, id: &RowId) -> Vec<ReviewerColumn> {
        self.state()
            .rows
            .iter()
            .find(|r| &r.row.id == id)
            .map(|r| r.columns.clone())
            .unwrap_or_default()
    }

    pub fn column_count(&self) -> usize {
        self.state().rows.iter().map(|r| r.columns.len()).sum()
    }

    pub fn header(&self) -> Option<HeaderLabel> {
        self.state().header.clone()
    }

    pub fn root_property(&self, name: &str) -> Option<String> {
        self.state().root_properties.get(name).cloned()
    }
}

impl HostPage for ListPage {
    fn location_path(&self) -> String {
        self.state().path.clone()
    }

    fn rows(&self) -> Vec<PageRow> {
        self.state().rows.iter().map(|r| r.row.clone()).collect()
    }

    fn mount_column(&self, row: &RowId, column: ReviewerColumn) {
        let mut state = self.state();
        match state
            .rows
            .iter_mut()
            .find(|r| &r.row.id == row && r.row.has_container)
        {
            Some(target) => target.columns.push(column),
            None => log::debug!("[page] Row {} is gone, dropping column", row),
        }
    }

    fn remove_columns(&self) {
        for row in self.state().rows.iter_mut() {
            row.columns.clear();
        }
    }

    fn rendered_logins(&self) -> Vec<String> {
        self.state()
            .rows
            .iter()
            .flat_map(|r| r.columns.iter())
            .flat_map(|c| c.links.iter())
            .map(|link| link.login.clone())
            .collect()
    }

    fn has_header(&self) -> bool {
        self.state().header.is_some()
    }

    fn insert_header(&self, label: &str) -> bool {
        let mut state = self.state();
        if !state.has_toolbar {
            return false;
        }
        state.header = Some(HeaderLabel {
            text: label.to_string(),
            width_px: None,
        });
        true
    }

    fn remove_header(&self) {
        self.state().header = None;
    }

    fn set_header_width(&self, px: u32) {
        if let Some(header) = self.state().header.as_mut() {
            header.width_px = Some(px);
        }
    }

    fn set_root_property(&self, name: &str, value: &str) {
        self.state()
            .root_properties
            .insert(name.to_string(), value.to_string());
    }
}
