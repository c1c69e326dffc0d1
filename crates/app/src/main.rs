//! Pet-store contract runner - Main Entry Point
//!
//! Loads the harness configuration from the environment, runs the
//! lifecycle scenario once against the configured service and exits
//! non-zero on the first failed step.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use petstore_application::{Scenario, ScenarioReport};
use petstore_infrastructure::{EnvConfigLoader, ReqwestHttpClient, SystemClock};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting petstore-contract v{}", env!("CARGO_PKG_VERSION"));

    match run().await {
        Ok(report) => {
            info!(
                run_id = %report.run_id,
                steps = report.steps.len(),
                user_id = report.state.user_id(),
                pet_id = report.state.pet_id(),
                order_id = report.state.order_id(),
                elapsed_ms = millis(report.total_elapsed()),
                "contract satisfied"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "contract violated");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<ScenarioReport, Box<dyn std::error::Error>> {
    let config = EnvConfigLoader::from_env().load()?;
    info!(
        base_url = %config.base_url,
        base_path = %config.base_path,
        wait = config.wait_policy.mode(),
        "configuration loaded"
    );

    let client = Arc::new(ReqwestHttpClient::from_config(&config)?);
    let mut scenario = Scenario::new(&config, client, SystemClock::new())?;

    match scenario.run().await {
        Ok(report) => Ok(report),
        Err(e) => {
            let report = scenario.report();
            for step in &report.steps {
                info!(
                    step = %step.step,
                    elapsed_ms = millis(step.elapsed),
                    "completed before failure"
                );
            }
            Err(e.into())
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
