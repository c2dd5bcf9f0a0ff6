//! Helpers for the `damview` binary: tracing setup, viewer wiring and the
//! rows printed by each command.

use std::sync::Arc;

use anyhow::Context;
use damview_api_client::ApiClient;
use damview_core::models::{AssetDetail, AssetScheme, NodeScheme};
use damview_core::ClientConfig;
use damview_viewer::{selectors, FileTokenStore, Navigator, Route, Viewer, ViewerState};
use serde::Serialize;

/// Initialize tracing for the CLI.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// A terminal has no views to switch; route changes are only logged.
#[derive(Debug, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, route: Route) {
        tracing::info!(route = %route, "Navigate");
    }
}

/// Wire a viewer to the HTTP client and the on-disk token store.
pub fn build_viewer(config: &ClientConfig) -> anyhow::Result<Viewer> {
    let client = ApiClient::from_config(config).context("Failed to create API client")?;
    let tokens = FileTokenStore::new(&config.token_dir, &config.app_id)
        .context("Failed to open token store")?;
    Ok(Viewer::new(
        Arc::new(client),
        Arc::new(tokens),
        Arc::new(LogNavigator),
    ))
}

pub fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeRow {
    pub id: String,
    pub name: String,
    pub scheme: NodeScheme,
    pub depth: usize,
    pub open: bool,
    pub loading: bool,
    pub size: u32,
}

pub fn tree_rows(state: &ViewerState) -> Vec<TreeRow> {
    selectors::visible_rows(state)
        .into_iter()
        .map(|row| TreeRow {
            id: row.node.id.clone(),
            name: row.node.name.clone(),
            scheme: row.node.scheme,
            depth: row.depth,
            open: row.node.open,
            loading: row.node.loading,
            size: row.node.size,
        })
        .collect()
}

/// Indented outline of the visible tree.
pub fn render_tree(rows: &[TreeRow]) -> String {
    rows.iter()
        .map(|row| {
            let marker = match row.scheme {
                NodeScheme::Folder if row.open => "-",
                NodeScheme::Folder => "+",
                NodeScheme::Album => "#",
                NodeScheme::Allfile => "*",
            };
            format!(
                "{}{} {} [{}]",
                "  ".repeat(row.depth),
                marker,
                row.name,
                row.id
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetRow {
    pub id: String,
    pub name: String,
    pub scheme: AssetScheme,
    pub size: String,
    pub preview: String,
    pub selected: bool,
}

pub fn asset_rows(state: &ViewerState) -> Vec<AssetRow> {
    selectors::image_list(state)
        .iter()
        .map(|asset| AssetRow {
            id: asset.id.clone(),
            name: selectors::display_name(&asset.name),
            scheme: asset.scheme,
            size: selectors::size_kb(asset.size),
            preview: selectors::preview_src(state, &asset.id).to_string(),
            selected: selectors::is_selected(state, &asset.id),
        })
        .collect()
}

/// Detail pane contents with presentation formatting applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailView {
    pub id: String,
    pub name: String,
    pub scheme: AssetScheme,
    pub size: String,
    pub uploaded: Option<String>,
    pub created: String,
    pub approval_status: Option<String>,
    pub copyright: Option<String>,
    pub terms_and_conditions: Option<String>,
    pub published_url: String,
    pub image: Option<String>,
}

pub fn detail_view(detail: &AssetDetail) -> DetailView {
    DetailView {
        id: detail.id.clone(),
        name: detail.name.clone(),
        scheme: detail.scheme,
        size: selectors::size_kb(detail.size),
        uploaded: detail
            .last_uploaded
            .as_deref()
            .map(selectors::format_uploaded),
        created: selectors::created_time(detail).to_string(),
        approval_status: detail.approval_status.clone(),
        copyright: detail.copyright.clone(),
        terms_and_conditions: detail.terms_and_conditions.clone(),
        published_url: selectors::published_url(detail)
            .unwrap_or(selectors::NOT_PUBLISHED)
            .to_string(),
        image: detail.image_url.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use damview_core::models::{Asset, ListQuery, ListScheme, TokenData, TreeNode};
    use serde_json::json;

    #[test]
    fn tree_outline_marks_schemes_and_depth() {
        let mut state = ViewerState::default();
        state.tree.load_root(vec![
            TreeNode::new("root", "Library", NodeScheme::Allfile),
            TreeNode::new("f1", "Campaigns", NodeScheme::Folder),
        ]);
        state.tree.begin_expand("f1");
        state.tree.finish_expand(
            "f1",
            vec![TreeNode::new("a1", "Spring", NodeScheme::Album)],
        );

        let rows = tree_rows(&state);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].depth, 1);

        assert_eq!(
            render_tree(&rows),
            "* Library [root]\n- Campaigns [f1]\n  # Spring [a1]"
        );
    }

    #[test]
    fn asset_rows_use_placeholder_until_preview_resolves() {
        let mut state = ViewerState::default();
        let request = state
            .list
            .set_query(ListQuery::new(ListScheme::Allfile), TokenData::new("t", "acme"));
        state.list.apply_page(
            request.ticket,
            vec![
                Asset::new("1", AssetScheme::Image, "a.png").with_size(2048),
                Asset::new("2", AssetScheme::Video, "b.mp4").with_size(100),
            ],
            None,
        );
        state.list.set_preview("1", "data:image/png;base64,AQID");
        state.list.toggle_selected("2");

        let rows = asset_rows(&state);
        assert_eq!(rows[0].size, "2KB");
        assert_eq!(rows[0].preview, "data:image/png;base64,AQID");
        assert_eq!(rows[1].preview, selectors::PLACEHOLDER_PREVIEW);
        assert!(rows[1].selected);
        assert!(!rows[0].selected);
    }

    #[test]
    fn detail_view_formats_fields() {
        let mut detail = AssetDetail::new("c1", AssetScheme::Image, "logo.png");
        detail.size = 1536;
        detail.last_uploaded = Some("20240305143012123".to_string());
        detail
            .metadata
            .insert("Create Date".to_string(), json!("2024:03:01 10:00:00"));

        let view = detail_view(&detail);
        assert_eq!(view.size, "2KB");
        assert_eq!(view.uploaded.as_deref(), Some("2024-03-05 14:30"));
        assert_eq!(view.created, "2024:03:01 10:00:00");
        assert_eq!(view.published_url, selectors::NOT_PUBLISHED);

        detail
            .additional
            .insert("MDC Asset URL".to_string(), json!("https://cdn.example.com/logo.png"));
        assert_eq!(
            detail_view(&detail).published_url,
            "https://cdn.example.com/logo.png"
        );
    }
}
