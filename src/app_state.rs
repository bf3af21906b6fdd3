use log::info;

use crate::admin_surface::AdminGate;
use crate::app_response::AppResponse;
use crate::content_store::ContentStore;
use crate::kv_storage::{KeyValueStorage, LmdbStorage};
use crate::persistence::PersistenceAdapter;
use crate::price_estimator::{PriceEstimator, PriceSimulationConfig};
use crate::store_config::StoreConfig;

/// Everything one FFI handle owns: the store, the admin gate and the
/// estimator memo.
pub struct AppState {
    store: ContentStore,
    admin: AdminGate,
    authenticated: bool,
    estimator: PriceEstimator,
}

impl AppState {
    /// Opens the LMDB environment named by `config` and hydrates the store.
    pub fn init(config: &StoreConfig) -> Result<Self, AppResponse> {
        let storage = LmdbStorage::init(&config.path, config.map_size)?;
        info!("Opening content store at {}", storage.path().display());
        Ok(Self::with_storage(Box::new(storage), config))
    }

    pub fn with_storage(storage: Box<dyn KeyValueStorage>, config: &StoreConfig) -> Self {
        let persistence = PersistenceAdapter::new(storage, config.key_prefix.clone());
        Self {
            store: ContentStore::open(persistence),
            admin: AdminGate::new(config.admin_password.clone()),
            authenticated: false,
            estimator: PriceEstimator::new(),
        }
    }

    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ContentStore {
        &mut self.store
    }

    /// Flushes storage and releases the handle.
    pub fn close(self) -> Result<(), AppResponse> {
        self.store.close()
    }

    pub fn login(&mut self, password: &str) -> Result<(), AppResponse> {
        self.admin.authenticate(password)?;
        self.authenticated = true;
        info!("Admin session opened");
        Ok(())
    }

    pub fn logout(&mut self) {
        self.authenticated = false;
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Gate for every mutating operation.
    pub fn require_admin(&self) -> Result<(), AppResponse> {
        if self.authenticated {
            Ok(())
        } else {
            Err(AppResponse::BadRequest("Admin login required".to_string()))
        }
    }

    /// Estimates against the live catalog, defaulting the material first.
    pub fn estimate(&mut self, config: &mut PriceSimulationConfig) -> i64 {
        let catalog = self.store.pricing_catalog();
        config.ensure_material(&catalog);
        self.estimator.estimate(config, &catalog)
    }
}
