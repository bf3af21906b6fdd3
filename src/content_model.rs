//! Record types for the eight content collections and the settings singleton.
//!
//! Every record serializes to the same camelCase JSON shape the site has always
//! kept in durable storage, so previously stored values keep hydrating. Records
//! are tied to their collection through the [`Record`] trait, which is what the
//! store and the admin editing surface are generic over.

use std::fmt;
use std::str::FromStr;

use serde::de::{DeserializeOwned, Error as DeError};
use serde::{Deserialize, Deserializer, Serialize};

use crate::app_response::AppResponse;
use crate::content_store::{Collection, StoreSnapshot};
use crate::icon_registry::Icon;
use crate::order_message::format_thousands;

/// Numeric record identifier, unique within one collection.
pub type RecordId = u64;

/// Tag naming one of the eight collections.
///
/// The serde form doubles as the storage slot name and as the tag the host
/// passes across the FFI boundary (`"projects"`, `"design_services"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionKind {
    Projects,
    Testimonials,
    Services,
    Products,
    Hero,
    Pricing,
    Gallery,
    DesignServices,
}

impl CollectionKind {
    pub const ALL: [CollectionKind; 8] = [
        CollectionKind::Projects,
        CollectionKind::Testimonials,
        CollectionKind::Services,
        CollectionKind::Products,
        CollectionKind::Hero,
        CollectionKind::Pricing,
        CollectionKind::Gallery,
        CollectionKind::DesignServices,
    ];

    pub fn slot(self) -> &'static str {
        match self {
            CollectionKind::Projects => "projects",
            CollectionKind::Testimonials => "testimonials",
            CollectionKind::Services => "services",
            CollectionKind::Products => "products",
            CollectionKind::Hero => "hero",
            CollectionKind::Pricing => "pricing",
            CollectionKind::Gallery => "gallery",
            CollectionKind::DesignServices => "design_services",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CollectionKind::Projects => "Portofolio",
            CollectionKind::Testimonials => "Testimoni",
            CollectionKind::Services => "Layanan",
            CollectionKind::Products => "Produk",
            CollectionKind::Hero => "Banner Utama",
            CollectionKind::Pricing => "Harga Kalkulator",
            CollectionKind::Gallery => "Galeri & Video",
            CollectionKind::DesignServices => "Paket Desain",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slot())
    }
}

impl FromStr for CollectionKind {
    type Err = AppResponse;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        CollectionKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.slot() == tag)
            .ok_or_else(|| AppResponse::BadRequest(format!("Unknown collection: {tag}")))
    }
}

/// A record stored in one of the content collections.
pub trait Record: Serialize + DeserializeOwned + Clone + PartialEq + fmt::Debug {
    const KIND: CollectionKind;

    fn id(&self) -> RecordId;

    fn set_id(&mut self, id: RecordId);

    fn collection(snapshot: &StoreSnapshot) -> &Collection<Self>;

    fn collection_mut(snapshot: &mut StoreSnapshot) -> &mut Collection<Self>;

    /// Applied by the store before a record is added or replaced.
    fn normalize(&mut self) {}
}

macro_rules! impl_record {
    ($ty:ty, $kind:expr, $field:ident $(, normalize = $normalize:ident)?) => {
        impl Record for $ty {
            const KIND: CollectionKind = $kind;

            fn id(&self) -> RecordId {
                self.id
            }

            fn set_id(&mut self, id: RecordId) {
                self.id = id;
            }

            fn collection(snapshot: &StoreSnapshot) -> &Collection<Self> {
                &snapshot.$field
            }

            fn collection_mut(snapshot: &mut StoreSnapshot) -> &mut Collection<Self> {
                &mut snapshot.$field
            }

            $(
                fn normalize(&mut self) {
                    self.$normalize();
                }
            )?
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectCategory {
    Food,
    Retail,
    Service,
    Cafe,
    Pameran,
}

impl ProjectCategory {
    pub fn label(self) -> &'static str {
        match self {
            ProjectCategory::Food => "Kuliner",
            ProjectCategory::Retail => "Retail",
            ProjectCategory::Service => "Jasa",
            ProjectCategory::Cafe => "Cafe/Resto",
            ProjectCategory::Pameran => "Pameran",
        }
    }
}

/// Portfolio entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: RecordId,
    pub title: String,
    pub category: ProjectCategory,
    pub image: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Testimonial {
    pub id: RecordId,
    pub name: String,
    pub business: String,
    pub content: String,
    /// 1 to 5 by convention; only the form hints at the range.
    pub rating: u8,
    pub image: String,
}

/// Background style key of a service card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceColor {
    #[serde(rename = "bg-blue-500")]
    Blue,
    #[serde(rename = "bg-orange-500")]
    Orange,
    #[serde(rename = "bg-yellow-500")]
    Yellow,
    #[serde(rename = "bg-green-500")]
    Green,
    #[serde(rename = "bg-pink-500")]
    Pink,
    #[serde(rename = "bg-purple-500")]
    Purple,
    #[serde(rename = "bg-red-500")]
    Red,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceItem {
    pub id: RecordId,
    pub title: String,
    pub description: String,
    pub icon_name: String,
    pub color: ServiceColor,
}

impl ServiceItem {
    pub fn icon(&self) -> Icon {
        Icon::resolve(&self.icon_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductItem {
    pub id: RecordId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub icon_name: String,
}

impl ProductItem {
    pub fn icon(&self) -> Icon {
        Icon::resolve(&self.icon_name)
    }
}

/// Banner slide; display order is collection order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroSlide {
    pub id: RecordId,
    pub image: String,
    pub title: String,
    pub subtitle: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricingType {
    Material,
    Addon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PricingUnit {
    #[serde(rename = "m")]
    Meter,
    #[serde(rename = "unit")]
    Unit,
}

/// Catalog entry feeding the price estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingItem {
    pub id: RecordId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PricingType,
    /// Whole rupiah.
    pub price: i64,
    pub unit: PricingUnit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryItem {
    pub id: RecordId,
    pub title: String,
    pub image: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTheme {
    Blue,
    Orange,
    Purple,
    Green,
    Red,
}

/// A 3D design package.
///
/// `price` is the numeric amount in rupiah; [`DesignServiceItem::display_price`]
/// derives the `350.000` style string shown on the site. Stored values that
/// still carry the display string are parsed back on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignServiceItem {
    pub id: RecordId,
    pub title: String,
    #[serde(deserialize_with = "price_amount")]
    pub price: u64,
    pub unit: String,
    pub description: String,
    pub features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default)]
    pub popular: bool,
    pub icon_name: String,
    pub color_theme: ColorTheme,
}

impl DesignServiceItem {
    pub fn display_price(&self) -> String {
        format_thousands(self.price as i64)
    }

    pub fn icon(&self) -> Icon {
        Icon::resolve(&self.icon_name)
    }

    fn drop_blank_features(&mut self) {
        self.features.retain(|feature| !feature.trim().is_empty());
        if self.note.as_deref().is_some_and(|note| note.trim().is_empty()) {
            self.note = None;
        }
    }
}

/// Parses a display price such as `"1.000.000"` or `"Rp 350.000"`.
pub fn parse_display_price(display: &str) -> Option<u64> {
    let digits: String = display
        .trim()
        .trim_start_matches("Rp")
        .chars()
        .filter(|c| !matches!(c, '.' | ',' | ' ' | '\u{a0}'))
        .collect();

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn price_amount<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StoredPrice {
        Amount(u64),
        Display(String),
    }

    match StoredPrice::deserialize(deserializer)? {
        StoredPrice::Amount(amount) => Ok(amount),
        StoredPrice::Display(display) => parse_display_price(&display)
            .ok_or_else(|| D::Error::custom(format!("unrecognized price '{display}'"))),
    }
}

/// Site-wide settings singleton.
///
/// Missing fields deserialize from [`GeneralSettings::default`], so a record
/// stored before a field existed still hydrates with every field defined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneralSettings {
    pub about_title: String,
    pub about_description: String,
    pub about_image: String,
    pub whatsapp: String,
    pub address: String,
    pub instagram: String,
    pub email: String,
    pub workshop_video_url: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        crate::defaults::default_settings()
    }
}

impl_record!(Project, CollectionKind::Projects, projects);
impl_record!(Testimonial, CollectionKind::Testimonials, testimonials);
impl_record!(ServiceItem, CollectionKind::Services, services);
impl_record!(ProductItem, CollectionKind::Products, products);
impl_record!(HeroSlide, CollectionKind::Hero, hero_slides);
impl_record!(PricingItem, CollectionKind::Pricing, pricing_items);
impl_record!(GalleryItem, CollectionKind::Gallery, gallery_items);
impl_record!(
    DesignServiceItem,
    CollectionKind::DesignServices,
    design_services,
    normalize = drop_blank_features
);
