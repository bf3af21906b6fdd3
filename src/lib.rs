//! # KreasiBooth Core
//!
//! Content store, price estimator and admin form schemas behind the KreasiBooth
//! site, packaged as a local-first library for embedding through FFI. The host
//! renders pages; this crate owns the data.
//!
//! ## Pieces
//!
//! - **Content store**: eight ordered collections (projects, testimonials,
//!   services, products, hero slides, pricing items, gallery items, design
//!   packages) plus a settings singleton, see [`content_store::ContentStore`]
//! - **Persistence**: every mutation writes the whole snapshot to an LMDB
//!   environment, one JSON document per collection; startup rehydrates and
//!   seeds missing slots from built-in data, see [`persistence`]
//! - **Price estimator**: linear-meter pricing from the live pricing catalog,
//!   see [`price_estimator`]
//! - **Admin editing surface**: one form schema and store dispatch per
//!   collection, see [`admin_surface`]
//! - **Order messaging**: WhatsApp deep links for orders, see [`order_message`]
//!
//! ## FFI Functions
//!
//! Every function answers with a JSON-encoded [`app_response::AppResponse`]
//! C string that must be released with [`free_response`]:
//!
//! - [`create_store`] / [`close_store`] - open and release a store handle
//! - [`get_collection`], [`get_settings`], [`get_form_schema`] - reads
//! - [`admin_login`] / [`admin_logout`] - gate for every mutation
//! - [`add_record`], [`update_record`], [`delete_record`], [`replace_settings`]
//! - [`estimate_price`], [`order_whatsapp_link`], [`design_order_whatsapp_link`]
//! - [`reset_store`] - drop stored content and fall back to built-in data

pub mod admin_surface;
pub mod app_response;
pub mod app_state;
pub mod content_model;
pub mod content_store;
pub mod defaults;
pub mod design_assistant;
pub mod icon_registry;
pub mod kv_storage;
pub mod order_message;
pub mod persistence;
pub mod price_estimator;
pub mod store_config;
mod test;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::admin_surface::{editor, form_schema, request_delete, submit_settings, EditSession, FormData};
use crate::app_response::AppResponse;
use crate::app_state::AppState;
use crate::content_model::{CollectionKind, RecordId};
use crate::order_message::{design_order_link, format_rupiah, order_link, DesignOrderRequest, OrderRequest};
use crate::price_estimator::PriceSimulationConfig;
use crate::store_config::StoreConfig;

/// Opens a store handle.
///
/// `config_json` is a JSON [`StoreConfig`]; every field is optional and a null
/// pointer means all defaults. The LMDB environment lives at `<path>.lmdb`.
///
/// # Returns
///
/// A pointer to the [`AppState`], or null when the config is invalid or the
/// environment cannot be opened. Release it with [`close_store`].
///
/// # Examples
///
/// ```no_run
/// use std::ffi::CString;
/// use kreasibooth_core::create_store;
///
/// let config = CString::new(r#"{"path":"site_content","admin_password":"s3cret"}"#).unwrap();
/// let state = create_store(config.as_ptr());
/// assert!(!state.is_null());
/// ```
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn create_store(config_json: *const c_char) -> *mut AppState {
    let config = if config_json.is_null() {
        StoreConfig::default()
    } else {
        let json = match unsafe { CStr::from_ptr(config_json).to_str() } {
            Ok(s) => s,
            Err(e) => {
                warn!("Invalid UTF-8 in store config: {e}");
                return std::ptr::null_mut();
            }
        };
        match StoreConfig::from_json(json) {
            Ok(config) => config,
            Err(e) => {
                warn!("Rejected store config: {e}");
                return std::ptr::null_mut();
            }
        }
    };

    match AppState::init(&config) {
        Ok(state) => {
            info!("Store handle created for {}", config.path);
            Box::into_raw(Box::new(state))
        }
        Err(e) => {
            warn!("Failed to open store at {}.lmdb: {e}", config.path);
            std::ptr::null_mut()
        }
    }
}

/// Returns every record of the collection named by `kind` as a JSON array.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_collection(state: *mut AppState, kind: *const c_char) -> *const c_char {
    let state = match state_ref(state, "get_collection") {
        Ok(s) => s,
        Err(error_ptr) => return error_ptr,
    };
    let kind = match kind_from_ptr(kind) {
        Ok(kind) => kind,
        Err(error_ptr) => return error_ptr,
    };

    match editor(kind).list(state.store()) {
        Ok(records) => json_response(&records),
        Err(e) => response_to_c_string(&e),
    }
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_settings(state: *mut AppState) -> *const c_char {
    match state_ref(state, "get_settings") {
        Ok(state) => json_response(state.store().settings()),
        Err(error_ptr) => error_ptr,
    }
}

/// Field schema, blank form and icon names for one collection.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_form_schema(kind: *const c_char) -> *const c_char {
    match kind_from_ptr(kind) {
        Ok(kind) => json_response(&form_schema(kind)),
        Err(error_ptr) => error_ptr,
    }
}

/// Checks the admin password and opens the admin session on success.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn admin_login(state: *mut AppState, password: *const c_char) -> *const c_char {
    let state = match state_ref(state, "admin_login") {
        Ok(s) => s,
        Err(error_ptr) => return error_ptr,
    };
    let password = match c_ptr_to_string(password, "password") {
        Ok(p) => p,
        Err(error_ptr) => return error_ptr,
    };

    match state.login(&password) {
        Ok(()) => response_to_c_string(&AppResponse::success("Admin session opened")),
        Err(e) => response_to_c_string(&e),
    }
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn admin_logout(state: *mut AppState) -> *const c_char {
    match state_ref(state, "admin_logout") {
        Ok(state) => {
            state.logout();
            response_to_c_string(&AppResponse::success("Admin session closed"))
        }
        Err(error_ptr) => error_ptr,
    }
}

/// Creates a record from a form.
///
/// `form_json` is an object keyed by the record's field names; fields left
/// out take the collection's blank-form defaults. Any `id` is ignored.
///
/// # Returns
///
/// The stored record with its assigned id, a `ValidationError` for missing
/// or malformed fields, or `BadRequest` without an admin session.
///
/// # Examples
///
/// ```no_run
/// use std::ffi::CString;
/// use kreasibooth_core::{add_record, admin_login, create_store};
///
/// let state = create_store(std::ptr::null());
/// let password = CString::new("admin123").unwrap();
/// admin_login(state, password.as_ptr());
///
/// let kind = CString::new("gallery").unwrap();
/// let form = CString::new(r#"{"title":"Proses Las","image":"https://example.com/las.jpg"}"#).unwrap();
/// let result = add_record(state, kind.as_ptr(), form.as_ptr());
/// ```
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn add_record(
    state: *mut AppState,
    kind: *const c_char,
    form_json: *const c_char,
) -> *const c_char {
    let (state, kind, form) = match mutation_args(state, kind, form_json, "add_record") {
        Ok(args) => args,
        Err(error_ptr) => return error_ptr,
    };

    let mut session = EditSession::create(kind);
    session.apply(&form);
    match session.submit(state.store_mut()) {
        Ok(record) => json_response(&record),
        Err(e) => response_to_c_string(&e),
    }
}

/// Replaces an existing record from a form carrying its `id`.
///
/// Fields left out keep their stored value. An id that is not in the
/// collection answers `NotFound`.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn update_record(
    state: *mut AppState,
    kind: *const c_char,
    form_json: *const c_char,
) -> *const c_char {
    let (state, kind, form) = match mutation_args(state, kind, form_json, "update_record") {
        Ok(args) => args,
        Err(error_ptr) => return error_ptr,
    };

    let Some(id) = form.get("id").and_then(Value::as_u64) else {
        let error = AppResponse::BadRequest("update_record requires a numeric id".to_string());
        return response_to_c_string(&error);
    };

    let mut session = match EditSession::edit(state.store(), kind, id) {
        Ok(session) => session,
        Err(e) => return response_to_c_string(&e),
    };
    session.apply(&form);
    match session.submit(state.store_mut()) {
        Ok(record) => json_response(&record),
        Err(e) => response_to_c_string(&e),
    }
}

/// Deletes a record once the user has confirmed.
///
/// Without `confirmed` nothing is removed. A confirmed delete of an id that
/// is not present still answers `Ok`; the collection is left unchanged.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn delete_record(
    state: *mut AppState,
    kind: *const c_char,
    id: RecordId,
    confirmed: bool,
) -> *const c_char {
    let state = match state_ref(state, "delete_record") {
        Ok(s) => s,
        Err(error_ptr) => return error_ptr,
    };
    let kind = match kind_from_ptr(kind) {
        Ok(kind) => kind,
        Err(error_ptr) => return error_ptr,
    };
    if let Err(e) = state.require_admin() {
        return response_to_c_string(&e);
    }

    let pending = request_delete(kind, id);
    if !confirmed {
        pending.cancel();
        let error = AppResponse::BadRequest("Deletion requires confirmation".to_string());
        return response_to_c_string(&error);
    }

    let removed = pending.confirm(state.store_mut());
    response_to_c_string(&AppResponse::Ok(format!(r#"{{"removed":{removed}}}"#)))
}

/// Replaces the settings record. Fields left out take their default value.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn replace_settings(state: *mut AppState, settings_json: *const c_char) -> *const c_char {
    let state = match state_ref(state, "replace_settings") {
        Ok(s) => s,
        Err(error_ptr) => return error_ptr,
    };
    if let Err(e) = state.require_admin() {
        return response_to_c_string(&e);
    }
    let form: FormData = match parse_json(settings_json, "settings") {
        Ok(form) => form,
        Err(error_ptr) => return error_ptr,
    };

    match submit_settings(state.store_mut(), &form) {
        Ok(settings) => json_response(&settings),
        Err(e) => response_to_c_string(&e),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EstimateResult {
    price: i64,
    formatted: String,
    simulation: PriceSimulationConfig,
}

/// Prices a simulation against the live catalog.
///
/// `simulation_json` is a JSON [`PriceSimulationConfig`]; missing fields take
/// the simulator defaults and an unresolved `materialId` is pointed at the
/// first material. The echoed `simulation` shows the selection actually used.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn estimate_price(state: *mut AppState, simulation_json: *const c_char) -> *const c_char {
    let state = match state_ref(state, "estimate_price") {
        Ok(s) => s,
        Err(error_ptr) => return error_ptr,
    };
    let mut simulation: PriceSimulationConfig = match parse_json(simulation_json, "simulation") {
        Ok(simulation) => simulation,
        Err(error_ptr) => return error_ptr,
    };

    let price = state.estimate(&mut simulation);
    json_response(&EstimateResult {
        price,
        formatted: format_rupiah(price),
        simulation,
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OrderPayload {
    order: OrderRequest,
    simulation: PriceSimulationConfig,
}

/// Builds the WhatsApp link for a booth order: `{"order": {...}, "simulation": {...}}`.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn order_whatsapp_link(state: *mut AppState, order_json: *const c_char) -> *const c_char {
    let state = match state_ref(state, "order_whatsapp_link") {
        Ok(s) => s,
        Err(error_ptr) => return error_ptr,
    };
    let mut payload: OrderPayload = match parse_json(order_json, "order") {
        Ok(payload) => payload,
        Err(error_ptr) => return error_ptr,
    };

    let store = state.store();
    let catalog = store.pricing_catalog();
    payload.simulation.ensure_material(&catalog);

    match order_link(&payload.order, &payload.simulation, &catalog, store.settings()) {
        Ok(link) => response_to_c_string(&AppResponse::Ok(link)),
        Err(e) => response_to_c_string(&e),
    }
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn design_order_whatsapp_link(state: *mut AppState, order_json: *const c_char) -> *const c_char {
    let state = match state_ref(state, "design_order_whatsapp_link") {
        Ok(s) => s,
        Err(error_ptr) => return error_ptr,
    };
    let order: DesignOrderRequest = match parse_json(order_json, "order") {
        Ok(order) => order,
        Err(error_ptr) => return error_ptr,
    };

    match design_order_link(&order, state.store().settings()) {
        Ok(link) => response_to_c_string(&AppResponse::Ok(link)),
        Err(e) => response_to_c_string(&e),
    }
}

/// Clears durable storage and reloads the built-in datasets.
///
/// Requires an admin session. The store stays usable afterwards.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn reset_store(state: *mut AppState) -> *const c_char {
    let state = match state_ref(state, "reset_store") {
        Ok(s) => s,
        Err(error_ptr) => return error_ptr,
    };
    if let Err(e) = state.require_admin() {
        return response_to_c_string(&e);
    }

    match state.store_mut().reset() {
        Ok(()) => response_to_c_string(&AppResponse::success("Store reset to built-in data")),
        Err(e) => response_to_c_string(&e),
    }
}

/// Releases a handle from [`create_store`]; the pointer is invalid afterwards.
///
/// # Notes
///
/// Every mutation is committed when it returns; closing syncs the LMDB
/// environment to disk and releases it. The handle is freed even when the
/// sync fails. Hosts with hot restart should close before reopening the
/// same path.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn close_store(state: *mut AppState) -> *const c_char {
    if state.is_null() {
        let error = AppResponse::BadRequest("Null state pointer passed to close_store".to_string());
        return response_to_c_string(&error);
    }

    let state = unsafe { Box::from_raw(state) };
    match state.close() {
        Ok(()) => response_to_c_string(&AppResponse::success("Store closed")),
        Err(e) => response_to_c_string(&e),
    }
}

/// Releases a string returned by any function of this library.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn free_response(response: *const c_char) {
    if response.is_null() {
        return;
    }
    drop(unsafe { CString::from_raw(response as *mut c_char) });
}

/// Serializes the response to a C string. Null if that fails.
fn response_to_c_string(response: &AppResponse) -> *const c_char {
    let json = match serde_json::to_string(response) {
        Ok(j) => j,
        Err(e) => {
            warn!("Error serializing response: {e}");
            return std::ptr::null();
        }
    };

    match CString::new(json) {
        Ok(c_str) => c_str.into_raw(),
        Err(e) => {
            warn!("Error creating CString: {e}");
            std::ptr::null()
        }
    }
}

/// Wraps `value` as JSON inside an `Ok` response.
fn json_response<T: Serialize + ?Sized>(value: &T) -> *const c_char {
    match serde_json::to_string(value) {
        Ok(json) => response_to_c_string(&AppResponse::Ok(json)),
        Err(e) => response_to_c_string(&AppResponse::from(e)),
    }
}

/// Converts a C string pointer to a Rust String.
///
/// On failure the error is already encoded as a C string response.
fn c_ptr_to_string(ptr: *const c_char, field_name: &str) -> Result<String, *const c_char> {
    if ptr.is_null() {
        let error = AppResponse::BadRequest(format!("Null {field_name} pointer"));
        return Err(response_to_c_string(&error));
    }

    match unsafe { CStr::from_ptr(ptr).to_str() } {
        Ok(s) => Ok(s.to_string()),
        Err(e) => {
            let error = AppResponse::BadRequest(format!("Invalid UTF-8 in {field_name}: {e}"));
            Err(response_to_c_string(&error))
        }
    }
}

fn state_ref<'a>(state: *mut AppState, fn_name: &str) -> Result<&'a mut AppState, *const c_char> {
    match unsafe { state.as_mut() } {
        Some(state) => Ok(state),
        None => {
            let error = AppResponse::BadRequest(format!("Null state pointer passed to {fn_name}"));
            Err(response_to_c_string(&error))
        }
    }
}

fn kind_from_ptr(ptr: *const c_char) -> Result<CollectionKind, *const c_char> {
    let tag = c_ptr_to_string(ptr, "collection")?;
    tag.parse::<CollectionKind>()
        .map_err(|error| response_to_c_string(&error))
}

fn parse_json<T: DeserializeOwned>(ptr: *const c_char, field_name: &str) -> Result<T, *const c_char> {
    let json = c_ptr_to_string(ptr, field_name)?;
    serde_json::from_str(&json).map_err(|e| {
        let error = AppResponse::SerializationError(format!("Invalid {field_name} JSON: {e}"));
        response_to_c_string(&error)
    })
}

fn mutation_args<'a>(
    state: *mut AppState,
    kind: *const c_char,
    form_json: *const c_char,
    fn_name: &str,
) -> Result<(&'a mut AppState, CollectionKind, FormData), *const c_char> {
    let state = state_ref(state, fn_name)?;
    let kind = kind_from_ptr(kind)?;
    state
        .require_admin()
        .map_err(|error| response_to_c_string(&error))?;
    let form = parse_json(form_json, "form")?;
    Ok((state, kind, form))
}
