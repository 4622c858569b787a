//! Scroll-driven loading demo.
//!
//! Run with: cargo run --example scroll_demo
//!
//! Serves generated rows from memory unless DATAGRID_ENDPOINT is set in the
//! environment or a .env file, in which case pages come from that endpoint.
//! The "viewport" scrolls down one screen at a time until every row is loaded.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use datagrid_lib::api::query::Filter;
use datagrid_lib::grid::{ChannelRenderer, GridBuilder, GridUpdate};
use datagrid_lib::model::{ColumnModel, Record};
use datagrid_lib::scroll::Viewport;
use datagrid_lib::source::{MemoryFetcher, PageFetcher};
use datagrid_lib::{GridClient, GridConfig};
use simplelog::{ColorChoice, Config, LevelFilter, TerminalMode, TermLogger};
use tokio::sync::mpsc;

const SCREEN_ROWS: usize = 8;

fn fetcher() -> Result<Arc<dyn PageFetcher>, Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    if let Ok(endpoint) = env::var("DATAGRID_ENDPOINT") {
        println!("Fetching from {}\n", endpoint);
        let client = GridClient::builder()
            .endpoint(endpoint)
            .timeout(Duration::from_secs(30))
            .build()?;
        return Ok(Arc::new(client));
    }

    println!("Serving 42 generated rows from memory\n");
    let rows = (0..42)
        .map(|i| {
            Record::new()
                .set("id", format!("{:024x}", 0x5f3c_0000_u64 + i))
                .set("formula", if i % 3 == 0 { "Fe2O3" } else { "SiO2" })
                .set(
                    "data",
                    serde_json::json!({
                        "energy": {"value": -1.5 * i as f64, "unit": "eV"},
                        "volume": 10 + i,
                    }),
                )
        })
        .collect();
    Ok(Arc::new(MemoryFetcher::new(rows)))
}

fn print_update(update: &GridUpdate) {
    match update {
        GridUpdate::Header(rows) => {
            for row in rows {
                let cells: Vec<String> = row
                    .iter()
                    .map(|c| format!("{}[{}x{}]", c.label, c.colspan, c.rowspan))
                    .collect();
                println!("  | {}", cells.join(" | "));
            }
        }
        GridUpdate::Rows { rows, total } => {
            println!("  rows: {} of {:?}", rows.len(), total);
        }
        GridUpdate::Error(message) => println!("  error: {}", message),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    TermLogger::init(
        LevelFilter::Debug,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;

    let config = GridConfig::default().with_page_size(10);
    let model = ColumnModel::from_paths([
        "id",
        "formula",
        "data.energy.value",
        "data.energy.unit",
        "data.volume",
    ])?;

    let (renderer, mut updates) = ChannelRenderer::new();
    let mut grid = GridBuilder::new(model, fetcher()?)
        .config(config)
        .build(renderer);

    // The UI side reports its viewport over a channel.
    let (viewport_tx, mut viewports) = mpsc::unbounded_channel();
    viewport_tx.send(Viewport::empty())?;

    loop {
        tokio::select! {
            Some(update) = updates.recv() => {
                print_update(&update);
                match update {
                    GridUpdate::Rows { rows, total: Some(total) } if rows.len() < total => {
                        viewport_tx.send(Viewport::bottom(rows.len(), SCREEN_ROWS))?;
                    }
                    GridUpdate::Error(_) => break,
                    _ => {}
                }
            }
            Some(viewport) = viewports.recv() => {
                tokio::time::sleep(Duration::from_millis(100)).await;
                grid.on_viewport_change(viewport);
            }
            Some(_) = grid.next_completion(), if grid.has_pending() => {}
            else => break,
        }
        if !grid.has_pending() && grid.state().is_exhausted() && updates.is_empty() && viewports.is_empty() {
            break;
        }
    }

    let first = grid.render_cell(1, "id").map(|c| c.label()).unwrap_or_default();
    println!("\nLoaded {} rows; row 1 id renders as {:?}", grid.rows().len(), first);

    println!("\nHiding the energy unit column:");
    grid.hide(["data.energy.unit"]);
    if let Some(update) = updates.recv().await {
        print_update(&update);
    }

    println!("\nResetting with a filter on formula:");
    grid.set_filter(Filter::exact("formula", "Fe2O3"));
    grid.settle().await;
    while let Ok(update) = updates.try_recv() {
        print_update(&update);
    }

    Ok(())
}
