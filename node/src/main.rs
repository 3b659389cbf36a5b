use std::{env, fs};

use anyhow::{Context, Result};
use comms::{Serialize, msg::Msg, specs::RoundSpec};
use log::{info, warn};
use ml_core::Density;
use parameter_server::AggregatorBuilder;
use worker::{ClientBuilder, RoundReport};

/// Loads the round to run from the JSON file given as first argument, if any.
fn load_spec() -> Result<RoundSpec> {
    let Some(path) = env::args().nth(1) else {
        warn!("no round spec given, running the default one");
        return Ok(RoundSpec::default());
    };

    let json = fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    let spec = serde_json::from_str(&json).with_context(|| format!("parsing {path}"))?;
    info!(path = path.as_str(); "loaded round spec");
    Ok(spec)
}

fn print_report(client_id: usize, report: &RoundReport) {
    let sync = &report.sync;

    println!("client {client_id}");
    println!("  uploaded:   {:?}", report.upload.indices());
    println!("  downloaded: {:?}", sync.indices);

    let before: Vec<f32> = sync.indices.iter().map(|&i| sync.before[i]).collect();
    let after: Vec<f32> = sync.indices.iter().map(|&i| sync.after[i]).collect();
    println!("  before:     {before:?}");
    println!("  after:      {after:?}");
    println!("  diff:       {:?}", sync.diff());
}

fn main() -> Result<()> {
    env_logger::init();

    let spec = load_spec()?;
    let upload = Density::new(spec.theta_upload)?;
    let download = Density::new(spec.theta_download)?;

    let aggregator = AggregatorBuilder::new().build(&spec.aggregator)?;
    let builder = ClientBuilder::new();

    for client_spec in &spec.clients {
        let mut client = builder
            .build(client_spec, aggregator.clone())
            .with_context(|| format!("building client {}", client_spec.client_id))?;
        let report = client.round(&(), upload, download)?;

        let mut wire = Vec::new();
        Msg::Upload(report.upload.clone()).serialize(&mut wire)?;
        info!(client_id = client.id(), bytes = wire.len(); "encoded upload");

        print_report(client.id(), &report);
    }

    println!("global parameters: {:?}", aggregator.pull_params());
    println!("update counts:     {:?}", aggregator.update_counts());
    Ok(())
}
