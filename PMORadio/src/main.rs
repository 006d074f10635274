use anyhow::bail;
use pmoconfig::{ConfigStore, FileConfigStore, get_config};
use pmoradio::{
    PlaybackController, Radio, RadioConfigExt, command_router,
    host::{LogAudioEngine, LogDisplay, NoEncoder, StdioSerial},
};
use pmoserver::Server;
use pmostations::{StationCatalog, StationsConfigExt};
use pmowifi::{
    ConnectivityManager, ConnectivityState, Credentials, HostNetwork, ProcessRestarter,
    ProvisioningState, WifiConfigExt, provisioning_router,
};
use std::net::Ipv4Addr;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ========== PHASE 1 : Infrastructure ==========
    let config = get_config();

    let mut server = Server::new_configured();
    server.init_logging().await;
    info!("📻 PMORadio {} starting", env!("CARGO_PKG_VERSION"));

    let store: Arc<dyn ConfigStore> = Arc::new(FileConfigStore::new(config.get_storage_dir()?));
    let credentials = Credentials::load(store.as_ref());

    let mut catalog = StationCatalog::new();
    let stations_file = config.get_stations_file()?;
    if let Err(e) = catalog.load_from_path(&stations_file) {
        warn!("⚠️ {}", e);
    }

    // ========== PHASE 2 : Réseau ==========
    let wifi = config.get_wifi_settings()?;
    let restart_delay = wifi.restart_delay;
    let mut net = HostNetwork::new();
    let mut manager = ConnectivityManager::new(credentials, wifi);

    info!("📡 Connecting to WiFi...");
    let state = manager.connect(&mut net).await.clone();

    match state {
        ConnectivityState::Connected { address } => {
            run_connected(server, store, catalog, address).await?;
        }
        ConnectivityState::ProvisioningActive { reason } => {
            warn!(?reason, "⚠️ Entering provisioning mode");
            let ip = manager.activate_provisioning(&mut net)?;
            let provisioning =
                ProvisioningState::new(store, Arc::new(ProcessRestarter), restart_delay);
            server.add_router("/", provisioning_router(provisioning)).await;
            server
                .add_route("/info", || async {
                    serde_json::json!({"version": env!("CARGO_PKG_VERSION"), "mode": "provisioning"})
                })
                .await;

            // ========== PHASE 3 : Démarrage du serveur ==========
            server.start().await;
            info!("--- END OF SETUP ---");
            info!("✅ Open http://{}:{}/ to configure the radio", ip, server.info().http_port);
            server.wait().await;
        }
        other => bail!("network bring-up ended in non-final state {:?}", other),
    }

    Ok(())
}

/// Mode connecté : boucle de contrôle + formulaire de commandes
async fn run_connected(
    mut server: Server,
    store: Arc<dyn ConfigStore>,
    catalog: StationCatalog,
    address: Ipv4Addr,
) -> anyhow::Result<()> {
    let config = get_config();
    let settings = config.get_radio_settings()?;
    let fallback_url = config.get_fallback_url()?;

    let mut playback =
        PlaybackController::new(catalog, Box::new(LogAudioEngine::new()), &settings);
    if settings.persist_playback {
        playback = playback.with_persistence(store);
    }
    playback.start(&fallback_url);

    let (radio, handle) = Radio::new(playback, &settings);
    let radio = radio
        .with_serial(Box::new(StdioSerial::spawn()))
        .with_encoder(Box::new(NoEncoder))
        .with_display(Box::new(LogDisplay::new()));

    server.add_router("/", command_router(handle)).await;
    server
        .add_route("/info", || async {
            serde_json::json!({"version": env!("CARGO_PKG_VERSION"), "mode": "connected"})
        })
        .await;

    // ========== PHASE 3 : Démarrage du serveur ==========
    info!("🌐 Starting HTTP server...");
    server.start().await;

    let cancel = server.cancellation_token();
    let control_loop = tokio::spawn(radio.run(cancel.clone()));

    info!("--- END OF SETUP ---");
    info!(
        "✅ PMORadio is ready at http://{}:{}/command",
        address,
        server.info().http_port
    );
    info!("Press Ctrl+C to stop...");
    server.wait().await;

    cancel.cancel();
    control_loop.await?;
    Ok(())
}
