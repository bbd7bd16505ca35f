//! # ladsimd — simulated absorbance reader daemon
//!
//! Composition root that wires all adapters together and starts the
//! simulation and the inspection server.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Build the virtual nodeset into an address space
//! - Construct the historian selected by configuration
//! - Discover readers, enable their history, and start the simulation loop
//! - Build the axum router and serve it until SIGINT
//! - Stop the simulation after the server has drained
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use ladsim_adapter_http_axum::state::AppState;
use ladsim_adapter_storage_memory::InMemoryHistoryRepository;
use ladsim_adapter_storage_sqlite_sqlx::Config as SqliteConfig;
use ladsim_adapter_virtual::VirtualNodeset;
use ladsim_app::host::InProcessHost;
use ladsim_app::ports::HistoryRepository;
use ladsim_app::scheduler::{IntervalTicker, SimulationScheduler};
use ladsim_app::services::device_setup::setup_devices;
use ladsim_app::services::historization::HistorizationConfigurator;
use ladsim_app::services::synthesis::{RandomPerturbation, SynthesisEngine, WellPlateModel};
use ladsim_domain::address_space::AddressSpace;

use crate::config::{Config, HistoryBackend};

type BoxError = Box<dyn std::error::Error>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    // Information model
    let space = VirtualNodeset::new(config.devices.clone()).build()?;

    // Historian
    match config.history.backend {
        HistoryBackend::Memory => {
            let history = match config.history.max_records_per_series {
                Some(capacity) => InMemoryHistoryRepository::with_capacity(capacity),
                None => InMemoryHistoryRepository::new(),
            };
            run(&config, space, Arc::new(history)).await
        }
        HistoryBackend::Sqlite => {
            let db = SqliteConfig::new(config.history.database_url.clone())
                .build()
                .await?;
            run(&config, space, Arc::new(db.history())).await
        }
    }
}

async fn run<R>(config: &Config, space: AddressSpace, history: Arc<R>) -> Result<(), BoxError>
where
    R: HistoryRepository + 'static,
{
    // Host and device setup
    let host = Arc::new(InProcessHost::new(space, Arc::clone(&history)));
    let configurator = HistorizationConfigurator::new(Arc::clone(&host));
    let devices = setup_devices(&host, &configurator).await?;
    tracing::info!(readers = devices.len(), "devices ready");

    // Simulation
    let perturbation = match config.simulation.seed {
        Some(seed) => RandomPerturbation::seeded(seed),
        None => RandomPerturbation::from_entropy(),
    };
    let engine = SynthesisEngine::new(Arc::clone(&host), WellPlateModel::default(), perturbation)
        .with_amplitude(config.simulation.amplitude);
    let scheduler = SimulationScheduler::new(engine, devices.clone(), config.tick_timeout());
    scheduler.start(IntervalTicker::new(config.period()));

    // HTTP
    let state = AppState::new(host, history, devices);
    let app = ladsim_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "ladsimd listening");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;
    scheduler.stop().await;
    served?;

    tracing::info!("ladsimd stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
