//! In-memory content store.
//!
//! [`ContentStore`] owns the eight collections and the settings record and is
//! the single source of truth for every consumer. It is handed to consumers
//! explicitly; nothing in the crate reaches it through a global. Each mutating
//! call writes a full snapshot through the [`PersistenceAdapter`] before
//! returning.

use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::app_response::AppResponse;
use crate::content_model::{
    DesignServiceItem, GalleryItem, GeneralSettings, HeroSlide, PricingItem, ProductItem, Project,
    Record, RecordId, ServiceItem, Testimonial,
};
use crate::defaults;
use crate::persistence::PersistenceAdapter;
use crate::price_estimator::PricingCatalog;

/// Ordered records of one kind. Serializes as a plain JSON array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection<T> {
    items: Vec<T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> From<Vec<T>> for Collection<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl<T: Record> Collection<T> {
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: RecordId) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.get(id).is_some()
    }

    pub fn max_id(&self) -> Option<RecordId> {
        self.items.iter().map(Record::id).max()
    }

    fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Replaces the record with the same id in place.
    fn replace(&mut self, item: T) -> bool {
        match self.items.iter_mut().find(|existing| existing.id() == item.id()) {
            Some(slot) => {
                *slot = item;
                true
            }
            None => false,
        }
    }

    fn remove(&mut self, id: RecordId) -> bool {
        match self.items.iter().position(|item| item.id() == id) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }
}

/// Every collection plus the settings record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub projects: Collection<Project>,
    pub testimonials: Collection<Testimonial>,
    pub services: Collection<ServiceItem>,
    pub products: Collection<ProductItem>,
    pub hero_slides: Collection<HeroSlide>,
    pub pricing_items: Collection<PricingItem>,
    pub gallery_items: Collection<GalleryItem>,
    pub design_services: Collection<DesignServiceItem>,
    pub settings: GeneralSettings,
}

impl StoreSnapshot {
    /// The built-in dataset.
    pub fn seeded() -> Self {
        Self {
            projects: defaults::default_projects().into(),
            testimonials: defaults::default_testimonials().into(),
            services: defaults::default_services().into(),
            products: defaults::default_products().into(),
            hero_slides: defaults::default_hero_slides().into(),
            pricing_items: defaults::default_pricing_items().into(),
            gallery_items: defaults::default_gallery_items().into(),
            design_services: defaults::default_design_services().into(),
            settings: defaults::default_settings(),
        }
    }

    pub fn collection<T: Record>(&self) -> &Collection<T> {
        T::collection(self)
    }
}

/// Issues record ids.
///
/// Ids stay close to the creation timestamp in milliseconds but are forced
/// strictly above both the last issued id and the largest id in the target
/// collection, so two creations within one clock tick still differ.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last_issued: RecordId,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self, largest_in_use: Option<RecordId>) -> RecordId {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as RecordId)
            .unwrap_or(0);
        let floor = largest_in_use.map_or(0, |id| id.saturating_add(1));

        let id = now.max(floor).max(self.last_issued.saturating_add(1));
        self.last_issued = id;
        id
    }
}

pub struct ContentStore {
    snapshot: StoreSnapshot,
    persistence: PersistenceAdapter,
    ids: IdGenerator,
}

impl ContentStore {
    /// Hydrates from `persistence`, seeding any slot it does not hold.
    pub fn open(persistence: PersistenceAdapter) -> Self {
        let snapshot = persistence.load();
        info!(
            "Content store ready: {} projects, {} pricing items, {} design packages",
            snapshot.projects.len(),
            snapshot.pricing_items.len(),
            snapshot.design_services.len()
        );

        Self {
            snapshot,
            persistence,
            ids: IdGenerator::new(),
        }
    }

    pub fn snapshot(&self) -> &StoreSnapshot {
        &self.snapshot
    }

    pub fn items<T: Record>(&self) -> &[T] {
        T::collection(&self.snapshot).items()
    }

    pub fn get<T: Record>(&self, id: RecordId) -> Option<&T> {
        T::collection(&self.snapshot).get(id)
    }

    pub fn settings(&self) -> &GeneralSettings {
        &self.snapshot.settings
    }

    pub fn pricing_catalog(&self) -> PricingCatalog<'_> {
        PricingCatalog::new(self.snapshot.pricing_items.items())
    }

    /// Assigns a fresh id, appends the record and returns the stored copy.
    ///
    /// Whatever id `item` carries is ignored.
    pub fn add<T: Record>(&mut self, mut item: T) -> T {
        let largest = T::collection(&self.snapshot).max_id();
        item.set_id(self.ids.next_id(largest));
        item.normalize();

        T::collection_mut(&mut self.snapshot).push(item.clone());
        debug!("Added {} record {}", T::KIND, item.id());
        self.persist();
        item
    }

    /// Replaces the record with the same id, keeping its position.
    ///
    /// An unknown id leaves the store untouched and returns `false`.
    pub fn update<T: Record>(&mut self, mut item: T) -> bool {
        item.normalize();
        let id = item.id();

        if !T::collection_mut(&mut self.snapshot).replace(item) {
            debug!("Ignoring update of unknown {} record {id}", T::KIND);
            return false;
        }
        self.persist();
        true
    }

    /// Removes the record with `id`; unknown ids are a no-op returning `false`.
    pub fn delete<T: Record>(&mut self, id: RecordId) -> bool {
        if !T::collection_mut(&mut self.snapshot).remove(id) {
            debug!("Ignoring delete of unknown {} record {id}", T::KIND);
            return false;
        }
        self.persist();
        true
    }

    pub fn replace_settings(&mut self, settings: GeneralSettings) {
        self.snapshot.settings = settings;
        self.persist();
    }

    /// Clears durable storage and re-seeds the in-memory state.
    ///
    /// Nothing is written back until the next mutation, so a later open also
    /// starts from the built-in dataset.
    pub fn reset(&mut self) -> Result<(), AppResponse> {
        self.persistence.clear()?;
        self.snapshot = self.persistence.load();
        info!("Content store reset to the built-in dataset");
        Ok(())
    }

    pub fn persistence(&self) -> &PersistenceAdapter {
        &self.persistence
    }

    pub fn into_persistence(self) -> PersistenceAdapter {
        self.persistence
    }

    /// Flushes durable storage and releases it.
    pub fn close(mut self) -> Result<(), AppResponse> {
        self.persistence.flush()?;
        info!("Content store closed");
        Ok(())
    }

    fn persist(&mut self) {
        if let Err(e) = self.persistence.save(&self.snapshot) {
            warn!("Failed to persist content store, keeping in-memory state: {e}");
        }
    }
}
