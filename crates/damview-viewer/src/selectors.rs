//! Selectors
//!
//! Pure projections of [`ViewerState`] used by presentation. None of these
//! perform I/O or mutate state.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use damview_core::models::{Asset, AssetDetail, TreeNode};

use crate::state::ViewerState;
use crate::tree::VisibleRow;

/// Shown until an asset's preview has been resolved, and when resolution fails.
pub const PLACEHOLDER_PREVIEW: &str =
    "https://s3-us-west-2.amazonaws.com/static.dmc/universal/icon/back.png";

/// Message rendered when a fully loaded query has no results.
pub const NO_ITEMS_MESSAGE: &str = "No items were found to match your search.";

/// Rendered in place of a missing published URL.
pub const NOT_PUBLISHED: &str = "Not published.";

const MAX_NAME_CHARS: usize = 150;
const NAME_HEAD_CHARS: usize = 142;
const NAME_TAIL_CHARS: usize = 5;

pub fn is_logged_in(state: &ViewerState) -> bool {
    state.auth.is_logged_in()
}

pub fn has_auth_error(state: &ViewerState) -> bool {
    state.auth.error().is_some()
}

pub fn tree(state: &ViewerState) -> &[TreeNode] {
    state.tree.roots()
}

pub fn visible_rows(state: &ViewerState) -> Vec<VisibleRow<'_>> {
    state.tree.visible_rows()
}

pub fn loaded_all(state: &ViewerState) -> bool {
    state.list.loaded_all()
}

pub fn loading(state: &ViewerState) -> bool {
    state.list.loading()
}

pub fn image_list(state: &ViewerState) -> &[Asset] {
    state.list.image_list()
}

pub fn preview_images(state: &ViewerState) -> &HashMap<String, String> {
    state.list.preview_images()
}

/// Resolved preview for an asset, or the placeholder.
pub fn preview_src<'a>(state: &'a ViewerState, asset_id: &str) -> &'a str {
    state.list.preview(asset_id).unwrap_or(PLACEHOLDER_PREVIEW)
}

pub fn detail<'a>(state: &'a ViewerState, content_id: &str) -> Option<&'a AssetDetail> {
    state.list.detail(content_id)
}

/// Detail of the asset whose detail pane is open.
pub fn selected_detail(state: &ViewerState) -> Option<&AssetDetail> {
    state
        .selected_content_id
        .as_deref()
        .and_then(|id| state.list.detail(id))
}

pub fn no_items(state: &ViewerState) -> bool {
    state.list.loaded_all() && state.list.image_list().is_empty()
}

pub fn selected_count(state: &ViewerState) -> usize {
    state.list.selected().len()
}

pub fn is_selected(state: &ViewerState, asset_id: &str) -> bool {
    state.list.is_selected(asset_id)
}

/// Shorten very long names to head + `...` + tail.
pub fn display_name(name: &str) -> String {
    let count = name.chars().count();
    if count <= MAX_NAME_CHARS {
        return name.to_string();
    }
    let head: String = name.chars().take(NAME_HEAD_CHARS).collect();
    let tail: String = name.chars().skip(count - NAME_TAIL_CHARS).collect();
    format!("{}...{}", head, tail)
}

/// Byte size rendered in whole kilobytes, rounded half up.
pub fn size_kb(bytes: u64) -> String {
    format!("{}KB", bytes / 1024 + u64::from(bytes % 1024 >= 512))
}

/// Render a `YYYYMMDDHHMMSSmmm` stamp as `YYYY-MM-DD HH:MM`.
///
/// Anything that does not parse is returned unchanged.
pub fn format_uploaded(stamp: &str) -> String {
    stamp
        .get(..14)
        .and_then(|head| NaiveDateTime::parse_from_str(head, "%Y%m%d%H%M%S").ok())
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| stamp.to_string())
}

pub fn created_time(detail: &AssetDetail) -> &str {
    detail.metadata_str("Create Date").unwrap_or("")
}

pub fn published_url(detail: &AssetDetail) -> Option<&str> {
    detail.additional_str("MDC Asset URL")
}

#[cfg(test)]
mod tests {
    use super::*;
    use damview_core::models::{AssetScheme, ListQuery, ListScheme, PageCursor, TokenData};
    use serde_json::json;

    fn loaded_state(items: Vec<Asset>, next: Option<PageCursor>) -> ViewerState {
        let mut state = ViewerState::default();
        let request = state.list.set_query(
            ListQuery::new(ListScheme::Image),
            TokenData::new("a", "acme.example.com"),
        );
        state.list.apply_page(request.ticket, items, next);
        state
    }

    #[test]
    fn short_names_are_unchanged() {
        assert_eq!(display_name("photo.jpg"), "photo.jpg");
        let exact = "x".repeat(150);
        assert_eq!(display_name(&exact), exact);
    }

    #[test]
    fn long_names_keep_head_and_tail() {
        let name = format!("{}{}", "a".repeat(200), "b.png");
        let shown = display_name(&name);
        assert_eq!(shown.chars().count(), 142 + 3 + 5);
        assert!(shown.starts_with(&"a".repeat(142)));
        assert!(shown.ends_with("b.png"));
    }

    #[test]
    fn long_names_are_cut_on_char_boundaries() {
        let name = "é".repeat(151);
        let shown = display_name(&name);
        assert_eq!(shown.chars().count(), 150);
    }

    #[test]
    fn sizes_round_to_kilobytes() {
        assert_eq!(size_kb(0), "0KB");
        assert_eq!(size_kb(511), "0KB");
        assert_eq!(size_kb(512), "1KB");
        assert_eq!(size_kb(1024 * 300), "300KB");
        assert_eq!(size_kb(u64::MAX), "18014398509481984KB");
    }

    #[test]
    fn upload_stamps_are_formatted() {
        assert_eq!(format_uploaded("20230115103045123"), "2023-01-15 10:30");
        assert_eq!(format_uploaded("20230115103045"), "2023-01-15 10:30");
        assert_eq!(format_uploaded("yesterday"), "yesterday");
        assert_eq!(format_uploaded("20231399999999000"), "20231399999999000");
    }

    #[test]
    fn detail_fields() {
        let mut detail = AssetDetail::new("c1", AssetScheme::Image, "c1.jpg");
        assert_eq!(created_time(&detail), "");
        assert_eq!(published_url(&detail), None);

        detail.metadata.insert("Create Date".into(), json!("2023:01:15 10:30:45"));
        detail
            .additional
            .insert("MDC Asset URL".into(), json!("https://cdn.example.com/c1.jpg"));
        assert_eq!(created_time(&detail), "2023:01:15 10:30:45");
        assert_eq!(published_url(&detail), Some("https://cdn.example.com/c1.jpg"));
    }

    #[test]
    fn empty_published_url_counts_as_missing() {
        let mut detail = AssetDetail::new("c1", AssetScheme::Image, "c1.jpg");
        detail.additional.insert("MDC Asset URL".into(), json!(""));
        assert_eq!(published_url(&detail), None);
    }

    #[test]
    fn no_items_only_once_loaded() {
        let state = ViewerState::default();
        assert!(!no_items(&state));

        let state = loaded_state(Vec::new(), Some(PageCursor::new("30")));
        assert!(!no_items(&state));

        let state = loaded_state(Vec::new(), None);
        assert!(no_items(&state));
        assert!(loaded_all(&state));
    }

    #[test]
    fn preview_src_falls_back_to_placeholder() {
        let mut state = loaded_state(
            vec![Asset::new("a1", AssetScheme::Image, "a1.jpg")],
            None,
        );
        assert_eq!(preview_src(&state, "a1"), PLACEHOLDER_PREVIEW);
        state.list.set_preview("a1", "data:image/png;base64,AAAA");
        assert_eq!(preview_src(&state, "a1"), "data:image/png;base64,AAAA");
        assert_eq!(preview_images(&state).len(), 1);
    }

    #[test]
    fn unknown_detail_is_none() {
        let state = ViewerState::default();
        assert!(detail(&state, "missing").is_none());
        assert!(selected_detail(&state).is_none());
    }

    #[test]
    fn selection_counts() {
        let mut state = loaded_state(
            vec![Asset::new("a1", AssetScheme::Image, "a1.jpg")],
            None,
        );
        state.list.toggle_selected("a1");
        assert_eq!(selected_count(&state), 1);
        assert!(is_selected(&state, "a1"));
        assert_eq!(image_list(&state).len(), 1);
    }
}
