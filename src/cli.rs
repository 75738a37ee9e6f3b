//! Demo CLI (not part of the spec's core contract — see `SPEC_FULL.md`'s
//! ambient-stack CLI section). Grounded on the teacher's `cli.rs`/
//! `main.rs` clap-derive shape.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "daecch", about = "Customizable Contraction Hierarchies bike routing demo")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build the pipeline from a JSON fixture of raw segments and query a route.
    Route {
        /// Path to a JSON array of `{start_lat, start_lng, end_lat, end_lng}` records.
        fixture: PathBuf,

        #[arg(long, allow_hyphen_values = true)]
        from_lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        from_lng: f64,
        #[arg(long, allow_hyphen_values = true)]
        to_lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        to_lng: f64,

        /// Optional scenic bias multiplier; omit for the plain shortest path.
        #[arg(long)]
        scenic_bias: Option<f64>,
    },
}
