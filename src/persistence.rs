//! Round-trips a [`StoreSnapshot`] through a [`KeyValueStorage`].
//!
//! Each collection and the settings record live under their own key as the
//! JSON serialization of the in-memory value:
//!
//! | slot              | value                      |
//! |-------------------|----------------------------|
//! | `projects`        | `Project[]`                |
//! | `testimonials`    | `Testimonial[]`            |
//! | `services`        | `ServiceItem[]`            |
//! | `products`        | `ProductItem[]`            |
//! | `hero`            | `HeroSlide[]`              |
//! | `pricing`         | `PricingItem[]`            |
//! | `gallery`         | `GalleryItem[]`            |
//! | `design_services` | `DesignServiceItem[]`      |
//! | `settings`        | `GeneralSettings`          |
//!
//! Keys are prefixed with the configured namespace (`kb_` by default).

use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::app_response::AppResponse;
use crate::content_model::{CollectionKind, Record};
use crate::content_store::{Collection, StoreSnapshot};
use crate::defaults;
use crate::kv_storage::KeyValueStorage;

pub const DEFAULT_KEY_PREFIX: &str = "kb_";
pub const SETTINGS_SLOT: &str = "settings";

pub struct PersistenceAdapter {
    storage: Box<dyn KeyValueStorage>,
    key_prefix: String,
}

impl PersistenceAdapter {
    pub fn new(storage: Box<dyn KeyValueStorage>, key_prefix: impl Into<String>) -> Self {
        Self {
            storage,
            key_prefix: key_prefix.into(),
        }
    }

    pub fn key_for(&self, slot: &str) -> String {
        format!("{}{}", self.key_prefix, slot)
    }

    pub fn storage(&self) -> &dyn KeyValueStorage {
        self.storage.as_ref()
    }

    /// Hydrates every slot, never failing.
    ///
    /// Missing slots take the built-in dataset. A slot that cannot be read or
    /// parsed is logged and also takes the built-in dataset; the stored value
    /// is left as is until the next save overwrites it.
    pub fn load(&self) -> StoreSnapshot {
        self.hydrate(false).unwrap_or_else(|e| {
            warn!("Unexpected hydration failure, using built-in dataset: {e}");
            StoreSnapshot::seeded()
        })
    }

    /// Hydrates every slot, surfacing the first unreadable or corrupt slot.
    pub fn load_strict(&self) -> Result<StoreSnapshot, AppResponse> {
        self.hydrate(true)
    }

    /// Serializes each slot independently and writes them in one batch.
    pub fn save(&mut self, snapshot: &StoreSnapshot) -> Result<(), AppResponse> {
        let entries = vec![
            self.entry(CollectionKind::Projects.slot(), &snapshot.projects)?,
            self.entry(CollectionKind::Testimonials.slot(), &snapshot.testimonials)?,
            self.entry(CollectionKind::Services.slot(), &snapshot.services)?,
            self.entry(CollectionKind::Products.slot(), &snapshot.products)?,
            self.entry(CollectionKind::Hero.slot(), &snapshot.hero_slides)?,
            self.entry(CollectionKind::Pricing.slot(), &snapshot.pricing_items)?,
            self.entry(CollectionKind::Gallery.slot(), &snapshot.gallery_items)?,
            self.entry(CollectionKind::DesignServices.slot(), &snapshot.design_services)?,
            self.entry(SETTINGS_SLOT, &snapshot.settings)?,
        ];
        self.storage.write_all(&entries)
    }

    /// Removes every slot so the next load seeds from the built-in dataset.
    pub fn clear(&mut self) -> Result<(), AppResponse> {
        self.storage.clear()
    }

    pub fn flush(&mut self) -> Result<(), AppResponse> {
        self.storage.flush()
    }

    fn entry<T: Serialize>(&self, slot: &str, value: &T) -> Result<(String, String), AppResponse> {
        Ok((self.key_for(slot), serde_json::to_string(value)?))
    }

    fn hydrate(&self, strict: bool) -> Result<StoreSnapshot, AppResponse> {
        Ok(StoreSnapshot {
            projects: self.load_collection(defaults::default_projects, strict)?,
            testimonials: self.load_collection(defaults::default_testimonials, strict)?,
            services: self.load_collection(defaults::default_services, strict)?,
            products: self.load_collection(defaults::default_products, strict)?,
            hero_slides: self.load_collection(defaults::default_hero_slides, strict)?,
            pricing_items: self.load_collection(defaults::default_pricing_items, strict)?,
            gallery_items: self.load_collection(defaults::default_gallery_items, strict)?,
            design_services: self.load_collection(defaults::default_design_services, strict)?,
            settings: self.load_slot(SETTINGS_SLOT, defaults::default_settings, strict)?,
        })
    }

    fn load_collection<T: Record>(
        &self,
        seed: fn() -> Vec<T>,
        strict: bool,
    ) -> Result<Collection<T>, AppResponse> {
        self.load_slot(T::KIND.slot(), || Collection::from(seed()), strict)
    }

    fn load_slot<T, F>(&self, slot: &str, seed: F, strict: bool) -> Result<T, AppResponse>
    where
        T: DeserializeOwned,
        F: FnOnce() -> T,
    {
        let key = self.key_for(slot);

        let stored = match self.storage.read(&key) {
            Ok(stored) => stored,
            Err(e) if strict => return Err(e),
            Err(e) => {
                warn!("Could not read '{key}', using built-in dataset: {e}");
                return Ok(seed());
            }
        };

        let Some(json) = stored else {
            info!("No stored value for '{key}', seeding built-in dataset");
            return Ok(seed());
        };

        match serde_json::from_str(&json) {
            Ok(value) => Ok(value),
            Err(e) if strict => Err(AppResponse::SerializationError(format!(
                "Corrupt value under '{key}': {e}"
            ))),
            Err(e) => {
                warn!("Corrupt value under '{key}', using built-in dataset: {e}");
                Ok(seed())
            }
        }
    }
}
