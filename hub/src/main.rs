//! Console entry-point: wires file storage, the simulated services and the
//! line-oriented adapter.

use std::ffi::OsString;
use std::sync::Arc;

use camino::Utf8PathBuf;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tokio::io::BufReader;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use survivor_hub::config::HubSettings;
use survivor_hub::demo_data::{DemoDataSettings, seed_demo_users_on_startup};
use survivor_hub::domain::{
    AuthService, CharacterService, ChatService, MapService, MessagingService, ServiceRuntime,
    SessionStore, TimelineService,
};
use survivor_hub::inbound::console::Console;
use survivor_hub::outbound::storage::FileKeyValueStore;

/// Application bootstrap.
#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .with_writer(std::io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = HubSettings::load_from_iter(std::env::args_os())
        .map_err(|err| eyre!("failed to load hub settings: {err}"))?;
    let demo = DemoDataSettings::load_from_iter([OsString::from("survivor-hub")])
        .map_err(|err| eyre!("failed to load demo data settings: {err}"))?;

    let storage_dir = Utf8PathBuf::from_path_buf(settings.storage_dir()).map_err(|path| {
        eyre!("storage directory {} is not valid UTF-8", path.display())
    })?;
    let backend = FileKeyValueStore::open(&storage_dir)
        .wrap_err_with(|| format!("failed to open storage at {storage_dir}"))?;
    let store = SessionStore::new(Arc::new(backend));
    let runtime = ServiceRuntime::default();

    let auth = Arc::new(AuthService::start(
        store.clone(),
        runtime.clone(),
        settings.auth_latency(),
    ));
    seed_demo_users_on_startup(&demo, &auth).wrap_err("demo account seeding failed")?;

    let chat = ChatService::start(auth.clone(), runtime.clone(), settings.chat_settings());
    let messaging = MessagingService::start(
        auth.clone(),
        store.clone(),
        runtime,
        settings.messaging_settings(),
    );
    let map = Arc::new(MapService::start(store));
    info!(
        storage = %storage_dir,
        instant = settings.instant,
        authenticated = auth.is_authenticated(),
        "survivor hub started"
    );

    Console::new(
        auth,
        chat,
        messaging,
        map,
        Arc::new(CharacterService::default()),
        Arc::new(TimelineService::default()),
    )
        .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await
        .wrap_err("console session failed")?;
    info!("survivor hub stopped");
    Ok(())
}
