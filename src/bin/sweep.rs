use anyhow::Context;
use linkprobe::harness::{render_table, ComparisonSweep, RunConfig};
use linkprobe::metrics::{install_exporter, render_metrics, MetricsConfig};
use linkprobe::sim::parse_delay;
use tracing_subscriber::EnvFilter;

/// Usage: `linkprobe-sweep [--baseline] [--rates 0,1e-5,1e-4] [--delays 2ms,1.28s]`
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    install_exporter(MetricsConfig::from_env()?)?;

    let mut base = RunConfig::solar_flare();
    let mut rates = None;
    let mut delays = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--baseline" => base = RunConfig::baseline(),
            "--rates" => {
                let raw = args.next().context("--rates needs a comma separated list")?;
                let parsed = raw
                    .split(',')
                    .map(|r| r.trim().parse::<f64>())
                    .collect::<Result<Vec<_>, _>>()
                    .with_context(|| format!("invalid error rates '{raw}'"))?;
                rates = Some(parsed);
            }
            "--delays" => {
                let raw = args.next().context("--delays needs a comma separated list")?;
                let parsed = raw
                    .split(',')
                    .map(parse_delay)
                    .collect::<Result<Vec<_>, _>>()?;
                delays = Some(parsed);
            }
            other => anyhow::bail!("unknown argument '{other}'"),
        }
    }

    let mut sweep = ComparisonSweep::new(base);
    if let Some(rates) = rates {
        sweep = sweep.with_error_rates(rates);
    }
    if let Some(delays) = delays {
        sweep = sweep.with_delays(delays);
    }

    println!("Comparing {} configurations\n", sweep.total_combinations());

    let mut reports = Vec::new();
    for result in sweep.run().await {
        match result {
            Ok(report) => reports.push(report),
            Err(e) => tracing::error!("Run failed: {}", e),
        }
    }

    print!("{}", render_table(&reports));

    if std::env::var_os("LINKPROBE_DUMP_METRICS").is_some() {
        if let Some(text) = render_metrics() {
            println!("\n{text}");
        }
    }

    Ok(())
}
