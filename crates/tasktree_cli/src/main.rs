//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `tasktree_core` linkage with deterministic output.
//! - Optionally ingest one bulk batch and print the resulting summary.

use clap::Parser;
use std::process::ExitCode;
use tasktree_core::{default_log_level, init_logging, TodoService};

#[derive(Parser, Debug)]
#[command(name = "tasktree_cli")]
#[command(about = "Smoke-test the tasktree engine with one bulk batch", long_about = None)]
struct Args {
    /// Batch text, e.g. `A;TODO|B;0;DONE`.
    batch: Option<String>,

    /// Absolute directory for rotated log files.
    #[arg(long)]
    log_dir: Option<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    println!("tasktree_core ping={}", tasktree_core::ping());
    println!("tasktree_core version={}", tasktree_core::core_version());

    run(args)
}

fn run(args: Args) -> ExitCode {
    if let Some(log_dir) = args.log_dir {
        if let Err(err) = init_logging(default_log_level(), &log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let Some(batch) = args.batch else {
        return ExitCode::SUCCESS;
    };

    let mut service = TodoService::in_memory();
    match service.create_items_bulk(&batch) {
        Ok(ids) => {
            println!("created={ids:?}");
            for item in service.state().items.iter().map(|item| item.view()) {
                println!(
                    "item id={} status={} score={:?} tags={:?}",
                    item.id, item.status, item.score, item.tag_ids
                );
            }
            for tag in service.list_tags() {
                println!("tag id={} name={}", tag.id, tag.name);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error kind={} message={err}", err.kind().as_str());
            ExitCode::FAILURE
        }
    }
}
