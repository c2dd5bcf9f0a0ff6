//! Damview CLI: browse a tenant asset library from the terminal.
//!
//! Set APP_ID and DAMVIEW_API_URL (the damview server). `login` stores the
//! token under DAMVIEW_TOKEN_DIR; the other commands reuse it.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use damview_cli::{
    asset_rows, build_viewer, detail_view, init_tracing, print_json, render_tree, tree_rows,
};
use damview_core::models::{AssetScheme, ListScheme, NodeScheme};
use damview_core::ClientConfig;
use damview_viewer::{selectors, Pending, StoreError, Viewer};
use serde_json::json;

#[derive(Parser)]
#[command(name = "damview", about = "Asset library viewer CLI")]
struct Cli {
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Exchange an OAuth2 authorization code and store the token
    Login {
        /// Code from the authorization redirect
        #[arg(long)]
        code: String,
    },
    /// Show the stored session
    Status,
    /// Show the folder/album tree
    Tree {
        /// Folder ids to expand, in order
        #[arg(long, value_delimiter = ',')]
        expand: Vec<String>,
    },
    /// List assets of the library, an album or a type filter
    List {
        /// Type filter: image, video, audio, document, presentation, other
        #[arg(long, conflicts_with = "album")]
        filter: Option<ListScheme>,
        /// Search keywords
        #[arg(long, conflicts_with = "album")]
        keywords: Option<String>,
        /// Album id
        #[arg(long)]
        album: Option<String>,
        /// Number of pages to load
        #[arg(long, default_value = "1")]
        pages: u32,
    },
    /// Show the detail of one asset
    Detail {
        /// Content id
        id: String,
        /// Asset scheme
        #[arg(long, default_value = "image")]
        scheme: AssetScheme,
        /// Preview URL to resolve alongside the detail
        #[arg(long, default_value = "")]
        preview: String,
    },
    /// Forget the stored token
    Logout,
}

fn check(error: Option<&StoreError>, what: &str) -> anyhow::Result<()> {
    match error {
        Some(e) => bail!("{} failed ({:?}): {}", what, e.kind, e.message),
        None => Ok(()),
    }
}

async fn run_pending(viewer: &mut Viewer, pending: Option<Pending>) {
    if let Some(pending) = pending {
        viewer.run(pending).await;
    }
}

async fn require_session(viewer: &mut Viewer) -> anyhow::Result<()> {
    if !viewer.initialize().await {
        bail!("Not logged in. Run `damview login --code <CODE>` first");
    }
    check(viewer.state().tree.error(), "Loading the tree")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = ClientConfig::from_env()
        .context("Invalid configuration. Set APP_ID and DAMVIEW_API_URL")?;
    let mut viewer = build_viewer(&config)?;

    match cli.command {
        Commands::Login { code } => {
            if !viewer.login(&code).await {
                check(viewer.state().auth.error(), "Login")?;
                bail!("Login failed");
            }
            let tenant = viewer.state().auth.token().tenant.clone();
            if cli.json {
                print_json(&json!({ "logged_in": true, "tenant": tenant }))?;
            } else {
                println!("Logged in to {}", tenant);
            }
        }
        Commands::Status => {
            let logged_in = viewer.initialize().await;
            let tenant = viewer.state().auth.token().tenant.clone();
            if cli.json {
                print_json(&json!({ "logged_in": logged_in, "tenant": tenant }))?;
            } else if logged_in {
                println!("Logged in to {}", tenant);
            } else {
                println!("Not logged in");
            }
        }
        Commands::Tree { expand } => {
            require_session(&mut viewer).await?;
            for id in &expand {
                let pending = viewer.select_node(NodeScheme::Folder, Some(id.as_str()));
                run_pending(&mut viewer, pending).await;
                check(viewer.state().tree.error(), "Expanding a folder")?;
            }
            let rows = tree_rows(viewer.state());
            if cli.json {
                print_json(&rows)?;
            } else {
                println!("{}", render_tree(&rows));
            }
        }
        Commands::List {
            filter,
            keywords,
            album,
            pages,
        } => {
            require_session(&mut viewer).await?;
            let first = match (album, filter) {
                (Some(album), _) => viewer.select_node(NodeScheme::Album, Some(album.as_str())),
                (None, Some(ListScheme::Album)) => bail!("Use --album <ID> to list an album"),
                (None, Some(filter)) => {
                    viewer.set_keywords(keywords.unwrap_or_default());
                    viewer.apply_filter(filter)
                }
                (None, None) => match keywords {
                    Some(keywords) => viewer.search(keywords),
                    None => viewer.select_node(NodeScheme::Allfile, None),
                },
            };
            run_pending(&mut viewer, first).await;
            check(viewer.state().list.error(), "Listing assets")?;

            for _ in 1..pages {
                let Some(next) = viewer.load_more() else {
                    break;
                };
                viewer.run(next).await;
                check(viewer.state().list.error(), "Loading more assets")?;
            }

            let state = viewer.state();
            let rows = asset_rows(state);
            if cli.json {
                print_json(&json!({
                    "items": rows,
                    "loaded_all": selectors::loaded_all(state),
                }))?;
            } else if selectors::no_items(state) {
                println!("{}", selectors::NO_ITEMS_MESSAGE);
            } else {
                for row in &rows {
                    println!("{}\t{}\t{}\t{}", row.id, row.scheme, row.size, row.name);
                }
                if !selectors::loaded_all(state) {
                    println!("... more available (use --pages)");
                }
            }
        }
        Commands::Detail {
            id,
            scheme,
            preview,
        } => {
            require_session(&mut viewer).await?;
            let pending = viewer.open_detail(&id, scheme, &preview);
            run_pending(&mut viewer, pending).await;
            check(viewer.state().list.detail_error(), "Loading the detail")?;

            let Some(detail) = selectors::selected_detail(viewer.state()) else {
                bail!("No detail returned for {}", id);
            };
            let view = detail_view(detail);
            if cli.json {
                print_json(&view)?;
            } else {
                println!("{} ({}, {})", view.name, view.scheme, view.size);
                if let Some(uploaded) = &view.uploaded {
                    println!("Uploaded: {}", uploaded);
                }
                if !view.created.is_empty() {
                    println!("Created: {}", view.created);
                }
                println!("Published URL: {}", view.published_url);
            }
        }
        Commands::Logout => {
            viewer.logout().await;
            if cli.json {
                print_json(&json!({ "logged_in": false }))?;
            } else {
                println!("Logged out");
            }
        }
    }

    Ok(())
}
