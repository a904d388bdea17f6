use super::{document::store::FsDocumentStore, service::CatalogService};
use tracing_subscriber::EnvFilter;

#[derive(Clone)]
pub struct AppState {
    /// Catalog services.
    pub services: ServiceState,
}

impl AppState {
    /// Load the application state using the provided configuration.
    pub async fn new(args: &crate::config::StartArgs) -> Self {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from(args.log()))
            .init();

        let postgres = crate::app::repo::pg::init(&args.db_url()).await;
        let store = FsDocumentStore::new(&args.upload_path());

        Self {
            services: ServiceState::new(CatalogService::new(postgres, store)),
        }
    }
}

#[derive(Clone)]
pub struct ServiceState {
    pub document: CatalogService,
}

impl ServiceState {
    pub fn new(document: CatalogService) -> Self {
        Self { document }
    }
}
