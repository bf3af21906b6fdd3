//! Composition of outbound WhatsApp order messages.
//!
//! Orders are not submitted anywhere by this crate. The host opens the deep
//! link returned by [`whatsapp_link`] and no response is awaited.

use serde::{Deserialize, Serialize};

use crate::app_response::AppResponse;
use crate::content_model::GeneralSettings;
use crate::defaults::FALLBACK_WHATSAPP;
use crate::price_estimator::{estimate_price, PriceSimulationConfig, PricingCatalog};

/// Groups digits in threes with `.`, e.g. `3200000` -> `3.200.000`.
pub fn format_thousands(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    if amount < 0 {
        grouped.push('-');
    }
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    grouped
}

/// `Rp 3.200.000`; negative amounts render as `-Rp 3.200.000`.
///
/// The separator after `Rp` is a plain ASCII space, not the no-break space
/// emitted by `id-ID` locale currency formatting.
pub fn format_rupiah(amount: i64) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    format!("{sign}Rp {}", format_thousands(amount).trim_start_matches('-'))
}

/// Percent-encodes everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
pub fn encode_uri_component(text: &str) -> String {
    let mut encoded = String::with_capacity(text.len());
    for byte in text.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => encoded.push(byte as char),
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}

pub fn whatsapp_link(phone: &str, message: &str) -> String {
    format!("https://wa.me/{}?text={}", phone, encode_uri_component(message))
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}

fn require(value: &str, field: &str) -> Result<(), AppResponse> {
    if value.trim().is_empty() {
        return Err(AppResponse::ValidationError(format!("{field} is required")));
    }
    Ok(())
}

/// Customer details from the order form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderRequest {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub message: String,
    /// File the customer will send by hand once the chat is open.
    pub attachment_name: Option<String>,
}

impl OrderRequest {
    pub fn validate(&self) -> Result<(), AppResponse> {
        require(&self.name, "name")?;
        require(&self.phone, "phone")
    }
}

pub fn compose_order_message(
    order: &OrderRequest,
    config: &PriceSimulationConfig,
    catalog: &PricingCatalog<'_>,
    estimate: i64,
) -> String {
    let material = catalog
        .material(config.material_id)
        .map_or("-", |material| material.name.as_str());

    let addon_names: Vec<&str> = config
        .selected_addons
        .iter()
        .filter_map(|id| catalog.addon(*id))
        .map(|addon| addon.name.as_str())
        .collect();
    let addons = if addon_names.is_empty() {
        "Tidak ada".to_string()
    } else {
        addon_names.join(", ")
    };

    let attachment = match &order.attachment_name {
        Some(file) => format!(
            "\n*CATATAN*: Saya akan mengirimkan lampiran foto/desain ({file}) setelah chat ini terbuka."
        ),
        None => String::new(),
    };

    format!(
        "Halo KreasiBooth, saya ingin memesan/konsultasi:\n\
         \n\
         *DATA PEMESAN*\n\
         Nama: {name}\n\
         No WA: {phone}\n\
         Alamat: {address}\n\
         \n\
         *DETAIL ESTIMASI (Dari Website)*\n\
         Ukuran: {length} x {width} x {height} cm\n\
         Material: {material}\n\
         Add-ons: {addons}\n\
         *Estimasi Harga: {price}*\n\
         \n\
         *PESAN TAMBAHAN*\n\
         {message}\n\
         {attachment}",
        name = order.name,
        phone = order.phone,
        address = or_dash(&order.address),
        length = config.length,
        width = config.width,
        height = config.height,
        price = format_rupiah(estimate),
        message = or_dash(&order.message),
    )
}

/// Validates the order, prices it and returns the deep link to the business number.
pub fn order_link(
    order: &OrderRequest,
    config: &PriceSimulationConfig,
    catalog: &PricingCatalog<'_>,
    settings: &GeneralSettings,
) -> Result<String, AppResponse> {
    order.validate()?;
    let estimate = estimate_price(config, catalog);
    let message = compose_order_message(order, config, catalog, estimate);
    Ok(whatsapp_link(&settings.whatsapp, &message))
}

/// Request for one of the design packages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DesignOrderRequest {
    pub package: String,
    pub name: String,
    pub business_name: String,
    pub concept: String,
    pub attachment_name: Option<String>,
}

impl DesignOrderRequest {
    pub fn validate(&self) -> Result<(), AppResponse> {
        require(&self.package, "package")?;
        require(&self.name, "name")?;
        require(&self.concept, "concept")
    }
}

pub fn compose_design_order_message(order: &DesignOrderRequest) -> String {
    let attachment = match &order.attachment_name {
        Some(file) => format!(
            "\n*CATATAN*: Saya memiliki lampiran foto referensi ({file}) yang akan saya kirim setelah chat ini terbuka."
        ),
        None => String::new(),
    };

    format!(
        "Halo Admin, saya ingin memesan *Jasa Desain 3D*.\n\
         \n\
         *DETAIL ORDER*\n\
         Paket: {package}\n\
         Nama: {name}\n\
         Nama Usaha: {business}\n\
         \n\
         *KONSEP / REQUEST*\n\
         {concept}\n\
         {attachment}\n\
         \n\
         Mohon info selanjutnya untuk pembayaran dan proses pengerjaan. Terima kasih.",
        package = order.package,
        name = order.name,
        business = or_dash(&order.business_name),
        concept = order.concept,
    )
}

/// Falls back to the business number when settings hold none.
pub fn design_order_link(
    order: &DesignOrderRequest,
    settings: &GeneralSettings,
) -> Result<String, AppResponse> {
    order.validate()?;
    let phone = if settings.whatsapp.trim().is_empty() {
        FALLBACK_WHATSAPP
    } else {
        settings.whatsapp.as_str()
    };
    Ok(whatsapp_link(phone, &compose_design_order_message(order)))
}
