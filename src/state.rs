use std::sync::Arc;

use crate::bookings::store::BookingStore;
use crate::catalog::model::Catalog;
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub catalog: Arc<Catalog>,
    pub store: Arc<BookingStore>,
}

impl AppState {
    /// Build the state once at startup: config from the environment, the
    /// catalog read whole, and the booking store opened on its slot file.
    /// The store is owned here and handed around by reference — there is
    /// no global collection anywhere.
    pub fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let catalog = Arc::new(Catalog::load(config.catalog_path.as_deref())?);
        let store = Arc::new(BookingStore::open(&config.store_path));
        Ok(Self {
            config,
            catalog,
            store,
        })
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        catalog: Arc<Catalog>,
        store: Arc<BookingStore>,
    ) -> Self {
        Self {
            config,
            catalog,
            store,
        }
    }

    pub fn fake() -> Self {
        use crate::config::JwtConfig;

        let config = Arc::new(AppConfig {
            jwt: JwtConfig {
                secret: "test".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 5,
            },
            store_path: std::env::temp_dir()
                .join(format!("studyspot-test-{}.json", uuid::Uuid::new_v4())),
            catalog_path: None,
        });
        let catalog = Arc::new(Catalog::load(None).expect("bundled catalog parses"));
        let store = Arc::new(BookingStore::open(&config.store_path));
        Self {
            config,
            catalog,
            store,
        }
    }
}
