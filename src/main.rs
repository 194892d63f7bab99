use anyhow::Context;
use linkprobe::harness::{RunConfig, SimulationHarness, TransportVariant};
use linkprobe::metrics::{install_exporter, MetricsConfig};
use tracing_subscriber::EnvFilter;

/// Usage: `linkprobe [VARIANT | CONFIG.json] [--baseline] [--trace] [--json OUT]`
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    install_exporter(MetricsConfig::from_env()?)?;

    let mut config = RunConfig::solar_flare();
    let mut json_out = None;
    let mut record_trace = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--baseline" => {
                let variant = config.variant;
                config = RunConfig::baseline().with_variant(variant);
            }
            "--trace" => record_trace = true,
            "--json" => {
                json_out = Some(args.next().context("--json needs an output path")?);
            }
            other if other.ends_with(".json") => {
                config = RunConfig::load(other)
                    .with_context(|| format!("failed to load run config {other}"))?;
            }
            other => {
                let variant: TransportVariant = other.parse()?;
                config = config.with_variant(variant);
            }
        }
    }
    config.record_trace |= record_trace;

    let report = tokio::task::spawn_blocking(move || {
        SimulationHarness::new(config).and_then(SimulationHarness::run)
    })
    .await
    .context("simulation task panicked")??;

    println!("\n{report}");

    if let Some(path) = json_out {
        report
            .save_json(&path)
            .with_context(|| format!("failed to write report to {path}"))?;
        println!("\nReport written to {path}");
    }

    Ok(())
}
