//! Integration test to verify the workspace crates link together.

#![allow(clippy::panic)]

use std::sync::Arc;

use petstore_application::ports::Clock;
use petstore_application::{FixtureBuilder, HttpClient, Scenario};
use petstore_domain::{HarnessConfig, ScenarioStep};
use petstore_infrastructure::{EnvConfigLoader, ReqwestHttpClient, SystemClock};

#[test]
fn domain_crate_compiles() {
    let config = HarnessConfig::default();
    assert_eq!(
        config.endpoints().login(),
        "https://petstore.swagger.io/v2/user/login"
    );
    assert_eq!(ScenarioStep::first(), ScenarioStep::CreateAndLoginUser);
}

#[test]
fn application_crate_compiles() {
    let fixtures = FixtureBuilder::new(&HarnessConfig::default()).build();
    assert!(fixtures.is_ok());
}

#[test]
fn infrastructure_crate_compiles() {
    let clock = SystemClock::new();
    let _now = clock.now();

    let config = EnvConfigLoader::with_lookup(|_| Ok(None)).load();
    assert_eq!(config.ok(), Some(HarnessConfig::default()));
}

#[tokio::test]
async fn adapters_plug_into_scenario() {
    let config = HarnessConfig::default();
    let client: Arc<dyn HttpClient> = match ReqwestHttpClient::from_config(&config) {
        Ok(client) => Arc::new(client),
        Err(e) => panic!("client: {e}"),
    };
    let scenario = Scenario::new(&config, client, SystemClock::new());
    assert!(scenario.is_ok());
}
