mod cli;

use clap::Parser;

use daecch::builder::RawSegment;
use daecch::routing::{RoutePreference, RoutingConfig, RoutingEngine};

fn main() -> std::process::ExitCode {
    daecch::init_tracing();
    let cli = cli::Cli::parse();

    match cli.command {
        cli::Command::Route {
            fixture,
            from_lat,
            from_lng,
            to_lat,
            to_lng,
            scenic_bias,
        } => run_route(&fixture, from_lat, from_lng, to_lat, to_lng, scenic_bias),
    }
}

fn run_route(
    fixture: &std::path::Path,
    from_lat: f64,
    from_lng: f64,
    to_lat: f64,
    to_lng: f64,
    scenic_bias: Option<f64>,
) -> std::process::ExitCode {
    let contents = match std::fs::read_to_string(fixture) {
        Ok(c) => c,
        Err(err) => {
            tracing::error!(%err, path = %fixture.display(), "failed to read fixture");
            return std::process::ExitCode::FAILURE;
        }
    };

    let segments: Vec<RawSegment> = match serde_json::from_str(&contents) {
        Ok(s) => s,
        Err(err) => {
            tracing::error!(%err, "failed to parse fixture as JSON");
            return std::process::ExitCode::FAILURE;
        }
    };

    let mut engine = RoutingEngine::new(RoutingConfig::default());
    if !engine.initialize(&segments) {
        eprintln!("initialization failed: no usable segments in fixture");
        return std::process::ExitCode::FAILURE;
    }

    let result = match scenic_bias {
        Some(bias) => engine.find_scenic_path(from_lat, from_lng, to_lat, to_lng, RoutePreference { scenic_bias: bias }),
        None => engine.find_path(from_lat, from_lng, to_lat, to_lng),
    };

    match result {
        Some(route) => {
            match serde_json::to_string_pretty(&route) {
                Ok(json) => println!("{json}"),
                Err(err) => {
                    tracing::error!(%err, "failed to serialize route result");
                    return std::process::ExitCode::FAILURE;
                }
            }
            std::process::ExitCode::SUCCESS
        }
        None => {
            eprintln!("no route found");
            std::process::ExitCode::FAILURE
        }
    }
}
