//! Price estimation for custom booth and cart orders.
//!
//! The estimate is a linear-meter approximation:
//!
//! ```text
//! volume_factor = (length + width) / 100
//! total         = volume_factor * material.price + sum(addon.price)
//! estimate      = round_half_up(total)
//! ```
//!
//! Height is collected with the other dimensions and carried into order
//! messages, but it does not take part in the formula.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::content_model::{PricingItem, PricingType, RecordId};

/// Dimensions in centimeters plus the selected catalog entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PriceSimulationConfig {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub material_id: RecordId,
    pub selected_addons: BTreeSet<RecordId>,
}

impl Default for PriceSimulationConfig {
    fn default() -> Self {
        Self {
            length: 100.0,
            width: 60.0,
            height: 200.0,
            material_id: 0,
            selected_addons: BTreeSet::new(),
        }
    }
}

impl PriceSimulationConfig {
    /// Selects the add-on if it was not selected, deselects it otherwise.
    pub fn toggle_addon(&mut self, addon_id: RecordId) {
        if !self.selected_addons.remove(&addon_id) {
            self.selected_addons.insert(addon_id);
        }
    }

    /// Points `material_id` at the first material when it does not resolve.
    ///
    /// Returns whether the selection changed. An empty catalog leaves the
    /// selection as is.
    pub fn ensure_material(&mut self, catalog: &PricingCatalog<'_>) -> bool {
        if catalog.material(self.material_id).is_some() {
            return false;
        }
        match catalog.materials().next() {
            Some(first) => {
                self.material_id = first.id;
                true
            }
            None => false,
        }
    }
}

/// Read-only view over the pricing collection.
#[derive(Debug, Clone, Copy)]
pub struct PricingCatalog<'a> {
    items: &'a [PricingItem],
}

impl<'a> PricingCatalog<'a> {
    pub fn new(items: &'a [PricingItem]) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &'a [PricingItem] {
        self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn materials(&self) -> impl Iterator<Item = &'a PricingItem> {
        self.of_kind(PricingType::Material)
    }

    pub fn addons(&self) -> impl Iterator<Item = &'a PricingItem> {
        self.of_kind(PricingType::Addon)
    }

    pub fn material(&self, id: RecordId) -> Option<&'a PricingItem> {
        self.materials().find(|item| item.id == id)
    }

    pub fn addon(&self, id: RecordId) -> Option<&'a PricingItem> {
        self.addons().find(|item| item.id == id)
    }

    fn of_kind(self, kind: PricingType) -> impl Iterator<Item = &'a PricingItem> {
        let items = self.items;
        items.iter().filter(move |item| item.kind == kind)
    }
}

/// Estimated price in whole rupiah.
///
/// An unresolved material contributes nothing and unresolved add-on ids are
/// skipped, so an empty catalog always yields `0`. Dimensions are not
/// validated; negative values simply produce a negative base.
pub fn estimate_price(config: &PriceSimulationConfig, catalog: &PricingCatalog<'_>) -> i64 {
    let volume_factor = (config.length + config.width) / 100.0;
    let price_per_meter = catalog.material(config.material_id).map_or(0, |m| m.price);

    let addons: i64 = config
        .selected_addons
        .iter()
        .filter_map(|id| catalog.addon(*id))
        .map(|addon| addon.price)
        .sum();

    let total = volume_factor * price_per_meter as f64 + addons as f64;
    (total + 0.5).floor() as i64
}

/// Recomputes only when the configuration or the catalog changed.
#[derive(Debug, Clone, Default)]
pub struct PriceEstimator {
    memo: Option<Memo>,
}

#[derive(Debug, Clone)]
struct Memo {
    config: PriceSimulationConfig,
    catalog: Vec<PricingItem>,
    price: i64,
}

impl PriceEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn estimate(&mut self, config: &PriceSimulationConfig, catalog: &PricingCatalog<'_>) -> i64 {
        if let Some(memo) = &self.memo {
            if memo.config == *config && memo.catalog.as_slice() == catalog.items() {
                return memo.price;
            }
        }

        let price = estimate_price(config, catalog);
        self.memo = Some(Memo {
            config: config.clone(),
            catalog: catalog.items().to_vec(),
            price,
        });
        price
    }

    pub fn is_cached(&self, config: &PriceSimulationConfig, catalog: &PricingCatalog<'_>) -> bool {
        self.memo
            .as_ref()
            .is_some_and(|memo| memo.config == *config && memo.catalog.as_slice() == catalog.items())
    }
}
