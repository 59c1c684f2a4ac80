use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use bikeshare_server::cache::StationCache;
use bikeshare_server::classify::StationClassifier;
use bikeshare_server::config::{AppConfig, FeedSource};
use bikeshare_server::feed::{FeedClient, MockFeed, StationFeed};
use bikeshare_server::graph::GraphStore;
use bikeshare_server::planner::RoutePlanner;
use bikeshare_server::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Fail fast on bad configuration
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("configuration error: {e}");
            std::process::exit(1);
        }
    };

    // Station feed: saved file or live API
    let feed: Arc<dyn StationFeed> = match &config.feed {
        FeedSource::MockFile(path) => {
            let mock = MockFeed::from_file(path).expect("Failed to load mock feed file");
            info!(path = %path.display(), stations = mock.len(), "using mock station feed");
            Arc::new(mock)
        }
        FeedSource::Live {
            api_key,
            contract,
            base_url,
        } => {
            let client_config = config.live_client_config(api_key, contract, base_url.as_deref());
            let client = FeedClient::new(client_config).expect("Failed to create feed client");
            info!(%contract, "using live JCDecaux feed");
            Arc::new(client)
        }
    };

    let classifier = StationClassifier::new(config.thresholds);
    let stations = StationCache::new(feed, classifier, config.cache_config());

    // Graphs are loaded once; the server does not start without them
    let graphs = GraphStore::load(&config.cycling_graph, &config.motor_graph)
        .expect("Failed to load route graphs");
    let planner = RoutePlanner::new(Arc::new(graphs));

    let state = AppState::new(stations, planner);
    let app = create_router(state);

    let addr = config.bind_addr;
    info!("bike-share server listening on http://{addr}");
    info!("  GET  /health                                 - Health check");
    info!("  GET  /api/stations                           - Classified stations");
    info!("  POST /api/itineraire/:lat1/:lon1/:lat2/:lon2 - Route between two points");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
