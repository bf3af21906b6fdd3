//! Admin editing surface.
//!
//! Every collection is edited through the same machinery. A static table maps
//! each [`CollectionKind`] to a [`CollectionEditor`]: the field schema, the
//! blank form for a new record, and the store operations for that record
//! type. A form travels as a JSON object ([`FormData`]) keyed by the
//! record's wire field names. On submit it is coerced against the schema,
//! validated, deserialized into the concrete record and handed to the
//! [`ContentStore`].

use log::{debug, warn};
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::app_response::AppResponse;
use crate::content_model::{
    parse_display_price, CollectionKind, DesignServiceItem, GalleryItem, GeneralSettings,
    HeroSlide, PricingItem, ProductItem, Project, Record, RecordId, ServiceItem, Testimonial,
};
use crate::content_store::ContentStore;
use crate::icon_registry::available_icons;
use crate::order_message::format_thousands;

pub type FormData = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    LongText,
    Url,
    Email,
    /// Bounds are shown to the user, not enforced.
    Number { min: Option<i64>, max: Option<i64> },
    Select { options: &'static [SelectOption] },
    /// Choice from the icon registry.
    Icon,
    Checkbox,
    /// Newline separated text stored as a list of non-blank lines.
    Lines,
    /// Amount typed either as a number or as a display string like `350.000`.
    Price,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    #[serde(flatten)]
    pub kind: FieldKind,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
}

const fn field(name: &'static str, label: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec {
        name,
        label,
        kind,
        required: true,
        placeholder: None,
    }
}

const fn hinted(name: &'static str, label: &'static str, kind: FieldKind, placeholder: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        label,
        kind,
        required: true,
        placeholder: Some(placeholder),
    }
}

const fn optional(name: &'static str, label: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec {
        name,
        label,
        kind,
        required: false,
        placeholder: None,
    }
}

const fn option(value: &'static str, label: &'static str) -> SelectOption {
    SelectOption { value, label }
}

const PROJECT_CATEGORIES: [SelectOption; 5] = [
    option("food", "Kuliner"),
    option("retail", "Retail"),
    option("service", "Jasa"),
    option("cafe", "Cafe/Resto"),
    option("pameran", "Pameran"),
];

const SERVICE_COLORS: [SelectOption; 7] = [
    option("bg-blue-500", "Biru"),
    option("bg-orange-500", "Orange"),
    option("bg-yellow-500", "Kuning"),
    option("bg-green-500", "Hijau"),
    option("bg-pink-500", "Pink"),
    option("bg-purple-500", "Ungu"),
    option("bg-red-500", "Merah"),
];

const PRICING_TYPES: [SelectOption; 2] = [
    option("material", "Material Utama"),
    option("addon", "Fitur Tambahan (Add-on)"),
];

const PRICING_UNITS: [SelectOption; 2] = [
    option("m", "Per Meter (m)"),
    option("unit", "Per Unit (fixed)"),
];

const COLOR_THEMES: [SelectOption; 5] = [
    option("blue", "Biru (Standard)"),
    option("orange", "Orange (Populer)"),
    option("purple", "Ungu (Premium)"),
    option("green", "Hijau (Fresh)"),
    option("red", "Merah (Bold)"),
];

const PROJECT_FIELDS: [FieldSpec; 4] = [
    field("title", "Judul Project", FieldKind::Text),
    field("category", "Kategori", FieldKind::Select { options: &PROJECT_CATEGORIES }),
    hinted("image", "URL Gambar", FieldKind::Url, "https://..."),
    field("description", "Deskripsi", FieldKind::LongText),
];

const TESTIMONIAL_FIELDS: [FieldSpec; 5] = [
    field("name", "Nama Pelanggan", FieldKind::Text),
    field("business", "Nama Usaha", FieldKind::Text),
    field("content", "Isi Testimoni", FieldKind::LongText),
    field("rating", "Rating (1-5)", FieldKind::Number { min: Some(1), max: Some(5) }),
    field("image", "Foto Profil URL", FieldKind::Url),
];

const SERVICE_FIELDS: [FieldSpec; 4] = [
    field("title", "Nama Layanan", FieldKind::Text),
    field("description", "Deskripsi Singkat", FieldKind::LongText),
    field("iconName", "Ikon", FieldKind::Icon),
    field("color", "Warna Background", FieldKind::Select { options: &SERVICE_COLORS }),
];

const PRODUCT_FIELDS: [FieldSpec; 3] = [
    field("name", "Nama Produk", FieldKind::Text),
    hinted("type", "Tipe", FieldKind::Text, "Contoh: Outdoor, Indoor, Mobile"),
    field("iconName", "Ikon", FieldKind::Icon),
];

const HERO_FIELDS: [FieldSpec; 3] = [
    field("title", "Judul Utama", FieldKind::Text),
    field("subtitle", "Sub Judul", FieldKind::LongText),
    hinted("image", "URL Gambar Banner", FieldKind::Url, "https://..."),
];

const PRICING_FIELDS: [FieldSpec; 4] = [
    hinted("name", "Nama Item", FieldKind::Text, "Contoh: Kayu Jati, Roda"),
    field("type", "Tipe", FieldKind::Select { options: &PRICING_TYPES }),
    field("price", "Harga (Rp)", FieldKind::Number { min: None, max: None }),
    field("unit", "Satuan", FieldKind::Select { options: &PRICING_UNITS }),
];

const GALLERY_FIELDS: [FieldSpec; 2] = [
    hinted("title", "Judul / Caption", FieldKind::Text, "Contoh: Proses Las"),
    hinted("image", "URL Gambar", FieldKind::Url, "https://..."),
];

const DESIGN_SERVICE_FIELDS: [FieldSpec; 9] = [
    field("title", "Nama Paket Desain", FieldKind::Text),
    hinted("price", "Harga Display", FieldKind::Price, "Contoh: 350.000"),
    hinted("unit", "Satuan", FieldKind::Text, "Contoh: / booth"),
    field("description", "Deskripsi", FieldKind::LongText),
    field("features", "Fitur (satu per baris)", FieldKind::Lines),
    optional("note", "Catatan Kecil (opsional)", FieldKind::Text),
    optional("popular", "Tandai sebagai Populer", FieldKind::Checkbox),
    field("iconName", "Ikon", FieldKind::Icon),
    field("colorTheme", "Tema Warna", FieldKind::Select { options: &COLOR_THEMES }),
];

pub const SETTINGS_FIELDS: [FieldSpec; 8] = [
    optional("aboutTitle", "Judul Tentang Kami", FieldKind::Text),
    optional("aboutDescription", "Deskripsi Tentang Kami", FieldKind::LongText),
    optional("aboutImage", "URL Gambar Tentang Kami", FieldKind::Url),
    optional("whatsapp", "Nomor WhatsApp", FieldKind::Text),
    optional("address", "Alamat Workshop", FieldKind::LongText),
    optional("instagram", "Instagram", FieldKind::Text),
    optional("email", "Email", FieldKind::Email),
    optional("workshopVideoUrl", "URL Video Workshop", FieldKind::Url),
];

fn blank_form(value: Value) -> FormData {
    match value {
        Value::Object(map) => map,
        _ => FormData::new(),
    }
}

fn project_form() -> FormData {
    blank_form(json!({ "category": "food", "title": "", "description": "", "image": "" }))
}

fn testimonial_form() -> FormData {
    blank_form(json!({ "rating": 5, "name": "", "business": "", "content": "", "image": "" }))
}

fn service_form() -> FormData {
    blank_form(json!({ "color": "bg-blue-500", "iconName": "PenTool", "title": "", "description": "" }))
}

fn product_form() -> FormData {
    blank_form(json!({ "iconName": "Store", "name": "", "type": "" }))
}

fn hero_form() -> FormData {
    blank_form(json!({ "title": "", "subtitle": "", "image": "" }))
}

fn pricing_form() -> FormData {
    blank_form(json!({ "name": "", "type": "material", "price": 0, "unit": "m" }))
}

fn gallery_form() -> FormData {
    blank_form(json!({ "title": "", "image": "" }))
}

fn design_service_form() -> FormData {
    blank_form(json!({
        "title": "",
        "price": "",
        "unit": "",
        "description": "",
        "features": "",
        "note": "",
        "popular": false,
        "iconName": "Monitor",
        "colorTheme": "blue"
    }))
}

/// Schema and store operations for one collection.
#[derive(Debug)]
pub struct CollectionEditor {
    pub kind: CollectionKind,
    pub fields: &'static [FieldSpec],
    blank: fn() -> FormData,
    load: fn(&ContentStore, RecordId) -> Option<Value>,
    list: fn(&ContentStore) -> Result<Value, AppResponse>,
    save: fn(&mut ContentStore, Option<RecordId>, Value) -> Result<Value, AppResponse>,
    delete: fn(&mut ContentStore, RecordId) -> bool,
}

impl CollectionEditor {
    pub fn blank_form(&self) -> FormData {
        (self.blank)()
    }

    /// Every record of the collection as a JSON array.
    pub fn list(&self, store: &ContentStore) -> Result<Value, AppResponse> {
        (self.list)(store)
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|spec| spec.name == name)
    }
}

fn load_record<T: Record>(store: &ContentStore, id: RecordId) -> Option<Value> {
    store
        .get::<T>(id)
        .and_then(|record| serde_json::to_value(record).ok())
}

fn list_records<T: Record>(store: &ContentStore) -> Result<Value, AppResponse> {
    Ok(serde_json::to_value(store.items::<T>())?)
}

fn save_record<T: Record>(
    store: &mut ContentStore,
    editing: Option<RecordId>,
    value: Value,
) -> Result<Value, AppResponse> {
    let mut record: T = serde_json::from_value(value)
        .map_err(|e| AppResponse::ValidationError(format!("Invalid {} record: {e}", T::KIND)))?;

    let stored = match editing {
        Some(id) => {
            record.set_id(id);
            record.normalize();
            if !store.update(record.clone()) {
                return Err(AppResponse::NotFound(format!("No {} record with id {id}", T::KIND)));
            }
            record
        }
        None => store.add(record),
    };
    Ok(serde_json::to_value(&stored)?)
}

fn delete_record<T: Record>(store: &mut ContentStore, id: RecordId) -> bool {
    store.delete::<T>(id)
}

macro_rules! editor {
    ($kind:expr, $ty:ty, $fields:expr, $blank:expr) => {
        CollectionEditor {
            kind: $kind,
            fields: &$fields,
            blank: $blank,
            load: load_record::<$ty>,
            list: list_records::<$ty>,
            save: save_record::<$ty>,
            delete: delete_record::<$ty>,
        }
    };
}

/// Indexed by [`CollectionKind`] declaration order.
static EDITORS: [CollectionEditor; 8] = [
    editor!(CollectionKind::Projects, Project, PROJECT_FIELDS, project_form),
    editor!(CollectionKind::Testimonials, Testimonial, TESTIMONIAL_FIELDS, testimonial_form),
    editor!(CollectionKind::Services, ServiceItem, SERVICE_FIELDS, service_form),
    editor!(CollectionKind::Products, ProductItem, PRODUCT_FIELDS, product_form),
    editor!(CollectionKind::Hero, HeroSlide, HERO_FIELDS, hero_form),
    editor!(CollectionKind::Pricing, PricingItem, PRICING_FIELDS, pricing_form),
    editor!(CollectionKind::Gallery, GalleryItem, GALLERY_FIELDS, gallery_form),
    editor!(CollectionKind::DesignServices, DesignServiceItem, DESIGN_SERVICE_FIELDS, design_service_form),
];

pub fn editor(kind: CollectionKind) -> &'static CollectionEditor {
    &EDITORS[kind.index()]
}

/// Schema description handed to the host for rendering a form.
#[derive(Debug, Clone, Serialize)]
pub struct FormSchema {
    pub kind: CollectionKind,
    pub label: &'static str,
    pub fields: &'static [FieldSpec],
    pub defaults: FormData,
    pub icons: Vec<&'static str>,
}

pub fn form_schema(kind: CollectionKind) -> FormSchema {
    let editor = editor(kind);
    FormSchema {
        kind,
        label: kind.label(),
        fields: editor.fields,
        defaults: editor.blank_form(),
        icons: available_icons(),
    }
}

/// A form opened for a new record or for an existing one.
#[derive(Debug, Clone)]
pub struct EditSession {
    editor: &'static CollectionEditor,
    editing: Option<RecordId>,
    form: FormData,
}

impl EditSession {
    /// Opens a blank form pre-filled with the collection's defaults.
    pub fn create(kind: CollectionKind) -> Self {
        let editor = editor(kind);
        Self {
            editor,
            editing: None,
            form: editor.blank_form(),
        }
    }

    /// Opens a form pre-filled from the stored record.
    pub fn edit(store: &ContentStore, kind: CollectionKind, id: RecordId) -> Result<Self, AppResponse> {
        let editor = editor(kind);
        let record = (editor.load)(store, id)
            .ok_or_else(|| AppResponse::NotFound(format!("No {kind} record with id {id}")))?;

        Ok(Self {
            editor,
            editing: Some(id),
            form: record_to_form(editor.fields, record),
        })
    }

    pub fn kind(&self) -> CollectionKind {
        self.editor.kind
    }

    pub fn is_new(&self) -> bool {
        self.editing.is_none()
    }

    pub fn editing_id(&self) -> Option<RecordId> {
        self.editing
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        self.editor.fields
    }

    pub fn form(&self) -> &FormData {
        &self.form
    }

    pub fn set_field(&mut self, name: &str, value: Value) -> Result<(), AppResponse> {
        if self.editor.field(name).is_none() {
            return Err(AppResponse::BadRequest(format!(
                "Unknown field '{name}' for {}",
                self.editor.kind
            )));
        }
        self.form.insert(name.to_string(), value);
        Ok(())
    }

    /// Copies every schema field present in `values`; other keys are ignored.
    pub fn apply(&mut self, values: &FormData) {
        for spec in self.editor.fields {
            if let Some(value) = values.get(spec.name) {
                self.form.insert(spec.name.to_string(), value.clone());
            }
        }
    }

    /// Validates the form and adds or updates the record.
    ///
    /// Returns the stored record as JSON.
    pub fn submit(self, store: &mut ContentStore) -> Result<Value, AppResponse> {
        let mut record = form_to_record(self.editor.fields, &self.form)?;
        record.insert("id".to_string(), json!(self.editing.unwrap_or(0)));

        let stored = (self.editor.save)(store, self.editing, Value::Object(record))?;
        debug!(
            "{} {} record via admin form",
            if self.editing.is_some() { "Updated" } else { "Created" },
            self.editor.kind
        );
        Ok(stored)
    }
}

/// Deletion awaiting the user's confirmation.
#[must_use = "a pending delete does nothing until confirmed"]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingDelete {
    pub kind: CollectionKind,
    pub id: RecordId,
}

pub fn request_delete(kind: CollectionKind, id: RecordId) -> PendingDelete {
    PendingDelete { kind, id }
}

impl PendingDelete {
    /// Returns whether a record was removed.
    pub fn confirm(self, store: &mut ContentStore) -> bool {
        (editor(self.kind).delete)(store, self.id)
    }

    pub fn cancel(self) {
        debug!("Delete of {} record {} cancelled", self.kind, self.id);
    }
}

/// Password check in front of the admin dashboard.
#[derive(Debug, Clone)]
pub struct AdminGate {
    password: String,
}

impl AdminGate {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
        }
    }

    pub fn authenticate(&self, attempt: &str) -> Result<(), AppResponse> {
        if attempt == self.password {
            Ok(())
        } else {
            warn!("Rejected admin login attempt");
            Err(AppResponse::ValidationError("Incorrect admin password".to_string()))
        }
    }
}

pub fn settings_form(store: &ContentStore) -> FormData {
    match serde_json::to_value(store.settings()) {
        Ok(Value::Object(map)) => map,
        _ => FormData::new(),
    }
}

/// Replaces the settings record from a settings form.
///
/// Fields absent from the form keep their default value.
pub fn submit_settings(store: &mut ContentStore, form: &FormData) -> Result<GeneralSettings, AppResponse> {
    let values = form_to_record(&SETTINGS_FIELDS, form)?;
    let settings: GeneralSettings = serde_json::from_value(Value::Object(values))
        .map_err(|e| AppResponse::ValidationError(format!("Invalid settings: {e}")))?;

    store.replace_settings(settings.clone());
    Ok(settings)
}

fn record_to_form(fields: &[FieldSpec], record: Value) -> FormData {
    let mut form = blank_form(record);
    form.remove("id");

    for spec in fields {
        let current = form.remove(spec.name);
        let value = match (spec.kind, current) {
            (FieldKind::Lines, Some(Value::Array(lines))) => Value::String(
                lines
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            (FieldKind::Price, Some(Value::Number(amount))) => match amount.as_i64() {
                Some(amount) => Value::String(format_thousands(amount)),
                None => Value::Number(amount),
            },
            (FieldKind::Checkbox, None) => Value::Bool(false),
            (_, Some(value)) => value,
            (_, None) => Value::String(String::new()),
        };
        form.insert(spec.name.to_string(), value);
    }
    form
}

fn form_to_record(fields: &[FieldSpec], form: &FormData) -> Result<FormData, AppResponse> {
    let mut record = FormData::new();
    for spec in fields {
        if let Some(value) = coerce_field(spec, form.get(spec.name))? {
            record.insert(spec.name.to_string(), value);
        }
    }
    Ok(record)
}

fn text_of(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn missing(spec: &FieldSpec) -> AppResponse {
    AppResponse::ValidationError(format!("Field '{}' is required", spec.label))
}

/// Coerces one form value into its stored JSON form.
///
/// `None` means the field is left out of the record.
fn coerce_field(spec: &FieldSpec, value: Option<&Value>) -> Result<Option<Value>, AppResponse> {
    match spec.kind {
        FieldKind::Text | FieldKind::LongText | FieldKind::Url | FieldKind::Email | FieldKind::Icon => {
            let text = text_of(value);
            if text.trim().is_empty() {
                if spec.required {
                    return Err(missing(spec));
                }
                if value.is_none() {
                    return Ok(None);
                }
            }
            Ok(Some(Value::String(text)))
        }
        FieldKind::Number { .. } => match value {
            Some(Value::Number(number)) => Ok(Some(Value::Number(number.clone()))),
            Some(Value::String(text)) if !text.trim().is_empty() => {
                let parsed: f64 = text.trim().parse().map_err(|_| {
                    AppResponse::ValidationError(format!("Field '{}' must be a number", spec.label))
                })?;
                if parsed.fract() == 0.0 {
                    Ok(Some(json!(parsed as i64)))
                } else {
                    Ok(Some(json!(parsed)))
                }
            }
            _ if spec.required => Err(missing(spec)),
            _ => Ok(None),
        },
        FieldKind::Select { options } => {
            let text = text_of(value);
            if text.is_empty() {
                return if spec.required { Err(missing(spec)) } else { Ok(None) };
            }
            if !options.iter().any(|option| option.value == text) {
                return Err(AppResponse::ValidationError(format!(
                    "'{text}' is not a valid choice for '{}'",
                    spec.label
                )));
            }
            Ok(Some(Value::String(text)))
        }
        FieldKind::Checkbox => {
            let checked = match value {
                Some(Value::Bool(checked)) => *checked,
                Some(Value::String(text)) => matches!(text.as_str(), "true" | "on" | "1"),
                Some(Value::Number(number)) => number.as_i64().is_some_and(|n| n != 0),
                _ => false,
            };
            Ok(Some(Value::Bool(checked)))
        }
        FieldKind::Lines => {
            let lines: Vec<Value> = match value {
                Some(Value::Array(items)) => items
                    .iter()
                    .filter_map(Value::as_str)
                    .filter(|line| !line.trim().is_empty())
                    .map(|line| Value::String(line.to_string()))
                    .collect(),
                other => text_of(other)
                    .lines()
                    .filter(|line| !line.trim().is_empty())
                    .map(|line| Value::String(line.to_string()))
                    .collect(),
            };
            if lines.is_empty() && spec.required {
                return Err(missing(spec));
            }
            Ok(Some(Value::Array(lines)))
        }
        FieldKind::Price => {
            let invalid = || AppResponse::ValidationError(format!("Field '{}' is not a valid price", spec.label));
            match value {
                Some(Value::Number(number)) => match number.as_u64() {
                    Some(amount) => Ok(Some(json!(amount))),
                    None => match number.as_f64() {
                        Some(amount) if amount.is_finite() && amount >= 0.0 && amount.fract() == 0.0 => {
                            Ok(Some(json!(amount as u64)))
                        }
                        _ => Err(invalid()),
                    },
                },
                Some(Value::String(text)) if !text.trim().is_empty() => {
                    parse_display_price(text).map(|amount| Some(json!(amount))).ok_or_else(invalid)
                }
                Some(Value::String(_)) | Some(Value::Null) | None => {
                    if spec.required {
                        Err(missing(spec))
                    } else {
                        Ok(None)
                    }
                }
                Some(_) => Err(invalid()),
            }
        }
    }
}
