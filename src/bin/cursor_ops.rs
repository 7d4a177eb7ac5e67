//! cursor-ops: cursor arithmetic against a configured generation layout.
//!
//! ## Usage
//! ```text
//! cursor-ops [--config layout.yaml] distance <event_type> <partition> <order_a> <offset_a> <order_b> <offset_b>
//! cursor-ops [--config layout.yaml] unshift  <event_type> <partition> <order> <offset> <shift>
//! ```
//!
//! Offsets are given as plain numbers and rendered with `cursors.offset_width`
//! digits. The generation layout comes from the `timelines` section of the
//! configuration.
//!
//! ## Configuration
//! - CURSOR_CONFIG: Path to the YAML configuration (optional)
//! - CURSOR_LOG: Log filter (default: info)

use std::io::Write;
use std::sync::Arc;

use tracing::{error, info, warn};

use timeline_cursor::config::Config;
use timeline_cursor::domain::format_offset;
use timeline_cursor::interfaces::TimelineDirectory;
use timeline_cursor::utils::bootstrap::{init_tracing, split_config_arg};
use timeline_cursor::utils::ShutdownHooks;
use timeline_cursor::{Cursor, CursorOperationsService, DistanceQuery, ShiftedCursor, TimelineRef};

const USAGE: &str = "usage:
  cursor-ops [--config path] distance <event_type> <partition> <order_a> <offset_a> <order_b> <offset_b>
  cursor-ops [--config path] unshift <event_type> <partition> <order> <offset> <shift>";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let (config_path, args) = split_config_arg(std::env::args().skip(1));
    let config = Config::load(config_path.as_deref()).map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    let directory = Arc::new(config.build_directory().await);
    let service = CursorOperationsService::new(directory.clone());
    let width = config.cursors.offset_width;

    ShutdownHooks::global().add_hook("flush-stdout", || {
        if let Err(e) = std::io::stdout().flush() {
            warn!("Failed to flush stdout: {}", e);
        }
    });
    tokio::spawn(async {
        match ShutdownHooks::global().run_on_ctrl_c().await {
            Ok(()) => std::process::exit(130),
            Err(e) => warn!("Failed to listen for shutdown signal: {}", e),
        }
    });

    let outcome = match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["distance", event_type, partition, order_a, offset_a, order_b, offset_b] => {
            let initial = cursor(&*directory, event_type, partition, order_a, offset_a, width).await?;
            let final_cursor =
                cursor(&*directory, event_type, partition, order_b, offset_b, width).await?;
            service
                .calculate_distance(&DistanceQuery::new(initial, final_cursor))
                .await
                .map(|result| result.distance.to_string())
        }
        ["unshift", event_type, partition, order, offset, shift] => {
            let base = cursor(&*directory, event_type, partition, order, offset, width).await?;
            let shift: i64 = shift.parse()?;
            service
                .unshift_cursor(&ShiftedCursor::from_cursor(base, shift))
                .await
                .map(|c| format!("{} {} {}", c.timeline().order(), c.partition(), c.offset()))
        }
        _ => {
            eprintln!("{USAGE}");
            ShutdownHooks::global().run_all();
            std::process::exit(2);
        }
    };

    let result = match outcome {
        Ok(line) => {
            println!("{line}");
            Ok(())
        }
        Err(e) => {
            error!(reason = ?e.reason(), "Cursor operation failed: {}", e);
            Err(e.into())
        }
    };

    let ran = ShutdownHooks::global().run_all();
    info!(hooks = ran, "cursor-ops finished");
    result
}

async fn timeline(
    directory: &dyn TimelineDirectory,
    event_type: &str,
    order: i32,
) -> Result<TimelineRef, Box<dyn std::error::Error>> {
    directory
        .get_active_timelines_ordered(event_type)
        .await?
        .into_iter()
        .find(|t| t.order() == order)
        .ok_or_else(|| format!("No timeline with order {order} for event type '{event_type}'").into())
}

async fn cursor(
    directory: &dyn TimelineDirectory,
    event_type: &str,
    partition: &str,
    order: &str,
    offset: &str,
    width: usize,
) -> Result<Cursor, Box<dyn std::error::Error>> {
    let timeline = timeline(directory, event_type, order.parse()?).await?;
    let offset: u64 = offset.parse()?;
    Ok(Cursor::new(timeline, partition, format_offset(offset, width)))
}
