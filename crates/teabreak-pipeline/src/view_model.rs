//! ViewModel: the single structure a screen renders from.

use std::error::Error as StdError;

use serde::Serialize;

use teabreak_core::defaults::PAGE_SIZE;
use teabreak_core::Record;

use crate::paginator::{page_window, Page, PageWindow};

/// Pipeline lifecycle: `Idle -> Loading -> {Ready, Failed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Render-ready state of one list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewModel<T = Record> {
    pub items: Vec<T>,
    pub page_number: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_items: usize,
    /// One-based range of the items shown ("showing 11-20 of 45"), 0 when empty.
    pub first_item: usize,
    pub last_item: usize,
    pub window: PageWindow,
    pub status: PipelineStatus,
    pub is_loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Non-fatal problem, e.g. one of several sources failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl<T> ViewModel<T> {
    /// Nothing fetched yet.
    pub fn idle() -> Self {
        Self {
            items: Vec::new(),
            page_number: 1,
            page_size: PAGE_SIZE,
            total_pages: 1,
            total_items: 0,
            first_item: 0,
            last_item: 0,
            window: page_window(1, 1),
            status: PipelineStatus::Idle,
            is_loading: false,
            error_message: None,
            warning: None,
        }
    }

    pub fn with_warning(mut self, warning: Option<String>) -> Self {
        self.warning = warning;
        self
    }

    /// Convert the items, e.g. records into typed models.
    pub fn map_items<U>(self, f: impl FnMut(T) -> U) -> ViewModel<U> {
        ViewModel {
            items: self.items.into_iter().map(f).collect(),
            page_number: self.page_number,
            page_size: self.page_size,
            total_pages: self.total_pages,
            total_items: self.total_items,
            first_item: self.first_item,
            last_item: self.last_item,
            window: self.window,
            status: self.status,
            is_loading: self.is_loading,
            error_message: self.error_message,
            warning: self.warning,
        }
    }
}

/// Combine a page with loading and error state.
///
/// An error empties the items and marks the view failed; otherwise the view
/// is loading or ready according to `is_loading`.
pub fn assemble<T>(page: Page<T>, is_loading: bool, error: Option<&dyn StdError>) -> ViewModel<T> {
    let window = page.window();
    let (first_item, last_item) = match error {
        Some(_) => (0, 0),
        None => (page.first_item(), page.last_item()),
    };
    let (items, status, error_message) = match error {
        Some(err) => (Vec::new(), PipelineStatus::Failed, Some(err.to_string())),
        None if is_loading => (page.items, PipelineStatus::Loading, None),
        None => (page.items, PipelineStatus::Ready, None),
    };

    ViewModel {
        items,
        page_number: page.page_number,
        page_size: page.page_size,
        total_pages: page.total_pages,
        total_items: page.total_items,
        first_item,
        last_item,
        window,
        status,
        is_loading,
        error_message,
        warning: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FailedDescriptor, FetchError};
    use crate::paginator::paginate;
    use serde_json::json;

    #[test]
    fn test_assemble_ready() {
        let view = assemble(paginate(&[1, 2, 3], 1, 2), false, None);
        assert_eq!(view.items, vec![1, 2]);
        assert_eq!(view.total_pages, 2);
        assert_eq!(view.status, PipelineStatus::Ready);
        assert!(view.error_message.is_none());
        assert_eq!(view.window.pages, vec![1, 2]);
        assert_eq!((view.first_item, view.last_item), (1, 2));
    }

    #[test]
    fn test_assemble_loading_keeps_items() {
        let view = assemble(paginate(&[1, 2, 3], 1, 10), true, None);
        assert_eq!(view.status, PipelineStatus::Loading);
        assert_eq!(view.items.len(), 3);
    }

    #[test]
    fn test_assemble_error() {
        let err = FetchError::total(vec![FailedDescriptor {
            descriptor: "papers".to_string(),
            message: Some("HTTP 502".to_string()),
        }]);
        let view = assemble(paginate(&[1, 2], 1, 10), false, Some(&err));
        assert!(view.items.is_empty());
        assert_eq!(view.status, PipelineStatus::Failed);
        assert_eq!(view.last_item, 0);
        assert_eq!(view.error_message.as_deref(), Some("Failed to load: papers (HTTP 502)"));
    }

    #[test]
    fn test_view_model_serializes_camel_case() {
        let view: ViewModel<i32> = ViewModel::idle();
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["pageNumber"], json!(1));
        assert_eq!(value["isLoading"], json!(false));
        assert_eq!(value["status"], json!("idle"));
        assert!(value.get("errorMessage").is_none());
    }

    #[test]
    fn test_map_items() {
        let view = assemble(paginate(&[1, 2], 1, 10), false, None).map_items(|n| n * 10);
        assert_eq!(view.items, vec![10, 20]);
        assert_eq!(view.total_items, 2);
    }
}
