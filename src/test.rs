//! # Test Suite for KreasiBooth Core
//!
//! ## Test Categories
//!
//! ### 1. Content Store Tests
//! - CRUD per collection, id assignment, idempotent updates, no-op deletes
//!
//! ### 2. Persistence Tests
//! - Slot round-trips over [`MemoryStorage`] and LMDB, settings merge,
//!   corrupt slots, failing media, reset
//!
//! ### 3. Price Estimator Tests
//! - Reference simulation, empty catalog, rounding, memoization
//!
//! ### 4. Admin Editing Surface Tests
//! - Dispatch table, form coercion and validation, delete confirmation, login
//!
//! ### 5. Messaging and Design Assistant Tests
//!
//! ### 6. FFI Function Tests
//! - Every `extern "C"` function with success and error scenarios
//!
//! LMDB environments are created under the system temp directory with unique
//! names and removed by the test that created them.
//!
//! ```bash
//! cargo test test_ffi_        # FFI tests
//! cargo test test_persist     # persistence tests
//! ```
//!
//! [`MemoryStorage`]: crate::kv_storage::MemoryStorage

#[cfg(test)]
pub mod tests {
    use std::collections::BTreeSet;
    use std::ffi::{CStr, CString};
    use std::os::raw::c_char;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    use log::info;
    use serde_json::{json, Value};

    use crate::admin_surface::{
        editor, form_schema, request_delete, settings_form, submit_settings, AdminGate, EditSession,
        FieldKind, FormData,
    };
    use crate::app_response::AppResponse;
    use crate::app_state::AppState;
    use crate::content_model::{
        parse_display_price, CollectionKind, ColorTheme, DesignServiceItem, GalleryItem, PricingItem,
        PricingType, PricingUnit, Project, ProjectCategory, Record, Testimonial,
    };
    use crate::content_store::{ContentStore, IdGenerator, StoreSnapshot};
    use crate::defaults::{self, FALLBACK_WHATSAPP};
    use crate::design_assistant::{
        concept_prompt, DesignAssistant, DesignConsultant, ImagePayload, RequestGuard,
        CONCEPT_EMPTY_FALLBACK, CONCEPT_ERROR_FALLBACK,
    };
    use crate::icon_registry::{available_icons, Icon};
    use crate::kv_storage::{KeyValueStorage, LmdbStorage, MemoryStorage};
    use crate::order_message::{
        compose_design_order_message, compose_order_message, design_order_link, encode_uri_component,
        format_rupiah, format_thousands, order_link, DesignOrderRequest, OrderRequest,
    };
    use crate::persistence::{PersistenceAdapter, DEFAULT_KEY_PREFIX};
    use crate::price_estimator::{estimate_price, PriceEstimator, PriceSimulationConfig, PricingCatalog};
    use crate::store_config::StoreConfig;

    static STORE_COUNTER: AtomicU64 = AtomicU64::new(0);

    /// Unique LMDB path (without the `.lmdb` suffix) under the temp directory.
    fn unique_store_path(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let counter = STORE_COUNTER.fetch_add(1, Ordering::SeqCst);
        std::env::temp_dir()
            .join(format!("kreasibooth_test_{prefix}_{nanos}_{counter}"))
            .to_string_lossy()
            .into_owned()
    }

    fn cleanup_store(path: &str) {
        let dir = format!("{path}.lmdb");
        if let Err(e) = std::fs::remove_dir_all(&dir) {
            info!("Could not remove {dir}: {e}");
        }
    }

    fn memory_adapter() -> PersistenceAdapter {
        PersistenceAdapter::new(Box::new(MemoryStorage::new()), DEFAULT_KEY_PREFIX)
    }

    fn memory_store() -> ContentStore {
        ContentStore::open(memory_adapter())
    }

    fn adapter_with(entries: &[(&str, &str)]) -> PersistenceAdapter {
        let mut storage = MemoryStorage::new();
        for (key, value) in entries {
            storage.write(key, value).unwrap();
        }
        PersistenceAdapter::new(Box::new(storage), DEFAULT_KEY_PREFIX)
    }

    fn sample_project(title: &str) -> Project {
        Project {
            id: 0,
            title: title.to_string(),
            category: ProjectCategory::Cafe,
            image: "https://example.com/booth.jpg".to_string(),
            description: "Booth kopi".to_string(),
        }
    }

    fn reference_simulation() -> PriceSimulationConfig {
        PriceSimulationConfig {
            material_id: 1,
            selected_addons: BTreeSet::from([5, 6]),
            ..PriceSimulationConfig::default()
        }
    }

    fn form(value: Value) -> FormData {
        match value {
            Value::Object(map) => map,
            other => panic!("expected a JSON object, got {other}"),
        }
    }

    /// Medium whose reads find nothing and whose writes always fail.
    struct FailingStorage;

    impl KeyValueStorage for FailingStorage {
        fn read(&self, _key: &str) -> Result<Option<String>, AppResponse> {
            Ok(None)
        }

        fn write(&mut self, _key: &str, _value: &str) -> Result<(), AppResponse> {
            Err(AppResponse::DatabaseError("quota exceeded".to_string()))
        }

        fn clear(&mut self) -> Result<(), AppResponse> {
            Ok(())
        }
    }

    // ===============================
    // CONTENT STORE TESTS
    // ===============================

    #[test]
    fn test_empty_storage_seeds_every_collection() {
        let store = memory_store();

        assert_eq!(store.snapshot(), &StoreSnapshot::seeded());
        assert_eq!(store.items::<Project>().len(), 6);
        assert_eq!(store.items::<PricingItem>().len(), 7);
        assert_eq!(store.items::<DesignServiceItem>().len(), 3);
        assert_eq!(store.settings().whatsapp, FALLBACK_WHATSAPP);
    }

    #[test]
    fn test_add_assigns_fresh_id_and_appends() {
        let mut store = memory_store();

        let stored = store.add(sample_project("Kopi Nusantara"));

        assert!(stored.id > 6, "id must not collide with seeded ids");
        let projects = store.items::<Project>();
        assert_eq!(projects.len(), 7);
        assert_eq!(projects.last(), Some(&stored));
        assert_eq!(store.get::<Project>(stored.id).map(|p| p.title.as_str()), Some("Kopi Nusantara"));
    }

    #[test]
    fn test_rapid_adds_get_distinct_increasing_ids() {
        let mut store = memory_store();

        let ids: Vec<u64> = (0..20)
            .map(|i| store.add(sample_project(&format!("Booth {i}"))).id)
            .collect();

        for pair in ids.windows(2) {
            assert!(pair[1] > pair[0], "ids must increase: {pair:?}");
        }
    }

    #[test]
    fn test_add_ignores_supplied_id() {
        let mut store = memory_store();
        let mut project = sample_project("Duplicate");
        project.id = 1;

        let stored = store.add(project);

        assert_ne!(stored.id, 1);
        assert_eq!(store.get::<Project>(1).map(|p| p.title.as_str()), Some("Kopi Kenangan Senja"));
    }

    #[test]
    fn test_id_generator_stays_above_largest_id() {
        let mut ids = IdGenerator::new();
        let far_future = u64::MAX / 2;

        assert_eq!(ids.next_id(Some(far_future)), far_future + 1);
        assert_eq!(ids.next_id(None), far_future + 2);
    }

    #[test]
    fn test_update_replaces_in_place() {
        let mut store = memory_store();
        let mut second = store.items::<Project>()[1].clone();
        second.title = "Martabak Sultan Reborn".to_string();

        assert!(store.update(second.clone()));

        let projects = store.items::<Project>();
        assert_eq!(projects.len(), 6);
        assert_eq!(projects[1], second);
    }

    #[test]
    fn test_update_is_idempotent() {
        let mut store = memory_store();
        let mut slide = store.items::<crate::content_model::HeroSlide>()[0].clone();
        slide.subtitle = "Subjudul baru".to_string();

        store.update(slide.clone());
        let once = store.snapshot().clone();
        store.update(slide);

        assert_eq!(store.snapshot(), &once);
    }

    #[test]
    fn test_update_unknown_id_changes_nothing() {
        let mut store = memory_store();
        let before = store.snapshot().clone();
        let mut ghost = sample_project("Ghost");
        ghost.id = 999;

        assert!(!store.update(ghost));
        assert_eq!(store.snapshot(), &before);
    }

    #[test]
    fn test_delete_removes_only_that_record() {
        let mut store = memory_store();

        assert!(store.delete::<GalleryItem>(3));

        let ids: Vec<u64> = store.items::<GalleryItem>().iter().map(Record::id).collect();
        assert_eq!(ids, vec![1, 2, 4, 5]);
    }

    #[test]
    fn test_delete_nonexistent_leaves_store_unchanged() {
        let mut store = memory_store();
        let before = store.snapshot().clone();

        assert!(!store.delete::<Testimonial>(42));
        assert_eq!(store.snapshot(), &before);
    }

    #[test]
    fn test_mixed_sequence_matches_reference_vec() {
        let mut store = memory_store();
        let mut projects = defaults::default_projects();
        let mut gallery = defaults::default_gallery_items();

        let ids = |items: &[Project]| items.iter().map(|p| p.id).collect::<Vec<_>>();

        // projects: delete, add, update, delete the added one, add again
        assert!(store.delete::<Project>(2));
        projects.retain(|p| p.id != 2);

        let first = store.add(sample_project("Booth Satu"));
        projects.push(first.clone());

        let mut renamed = projects[0].clone();
        renamed.title = "Kopi Kenangan Pagi".to_string();
        assert!(store.update(renamed.clone()));
        projects[0] = renamed;

        assert!(store.delete::<Project>(first.id));
        projects.retain(|p| p.id != first.id);

        let second = store.add(sample_project("Booth Dua"));
        assert!(second.id > first.id, "ids are never reused after a delete");
        projects.push(second);

        let mut ghost = sample_project("Ghost");
        ghost.id = first.id;
        assert!(!store.update(ghost));

        // gallery: interleaved with the project operations above
        let added = store.add(GalleryItem {
            id: 0,
            title: "Pemasangan".to_string(),
            image: "pasang.jpg".to_string(),
        });
        gallery.push(added.clone());

        assert!(store.delete::<GalleryItem>(1));
        gallery.retain(|g| g.id != 1);

        let mut retitled = added;
        retitled.title = "Pemasangan di Lokasi".to_string();
        assert!(store.update(retitled.clone()));
        let slot = gallery.iter().position(|g| g.id == retitled.id).unwrap();
        gallery[slot] = retitled;

        let late = store.add(GalleryItem {
            id: 0,
            title: "Serah Terima".to_string(),
            image: "serah.jpg".to_string(),
        });
        gallery.push(late);

        assert_eq!(store.items::<Project>(), projects.as_slice());
        assert_eq!(ids(store.items::<Project>()), ids(&projects));
        assert_eq!(store.items::<GalleryItem>(), gallery.as_slice());

        let mut unique = ids(&projects);
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), projects.len());

        let reopened = ContentStore::open(store.into_persistence());
        assert_eq!(reopened.items::<Project>(), projects.as_slice());
        assert_eq!(reopened.items::<GalleryItem>(), gallery.as_slice());
    }

    #[test]
    fn test_design_service_normalized_on_add() {
        let mut store = memory_store();
        let package = DesignServiceItem {
            id: 0,
            title: "Kios Mall".to_string(),
            price: 750_000,
            unit: "/ kios".to_string(),
            description: "Kios di dalam mall".to_string(),
            features: vec!["3D".to_string(), "  ".to_string(), "Revisi".to_string()],
            note: Some(" ".to_string()),
            popular: false,
            icon_name: "Box".to_string(),
            color_theme: ColorTheme::Green,
        };

        let stored = store.add(package);

        assert_eq!(stored.features, vec!["3D", "Revisi"]);
        assert_eq!(stored.note, None);
        assert_eq!(stored.display_price(), "750.000");
        assert_eq!(stored.icon(), Icon::Box);
    }

    #[test]
    fn test_mutation_persists_before_returning() {
        let mut store = memory_store();

        let stored = store.add(sample_project("Persisted"));

        let raw = store
            .persistence()
            .storage()
            .read("kb_projects")
            .unwrap()
            .expect("projects slot written");
        let projects: Vec<Project> = serde_json::from_str(&raw).unwrap();
        assert_eq!(projects.last(), Some(&stored));
        assert!(store.persistence().storage().read("kb_settings").unwrap().is_some());
    }

    // ===============================
    // PERSISTENCE TESTS
    // ===============================

    #[test]
    fn test_persist_round_trip_through_memory_storage() {
        let mut store = memory_store();
        let added = store.add(sample_project("Round Trip"));
        store.delete::<PricingItem>(7);
        let expected = store.snapshot().clone();

        let reopened = ContentStore::open(store.into_persistence());

        assert_eq!(reopened.snapshot(), &expected);
        assert!(reopened.get::<Project>(added.id).is_some());
    }

    #[test]
    fn test_persist_settings_merge_missing_fields() {
        let adapter = adapter_with(&[("kb_settings", r#"{"whatsapp":"6281200000000"}"#)]);

        let snapshot = adapter.load();

        assert_eq!(snapshot.settings.whatsapp, "6281200000000");
        assert_eq!(snapshot.settings.instagram, "@kreasibooth");
        assert_eq!(snapshot.settings.email, "admin@kreasibooth.com");
    }

    #[test]
    fn test_persist_empty_collection_is_not_reseeded() {
        let adapter = adapter_with(&[("kb_gallery", "[]")]);

        let snapshot = adapter.load();

        assert!(snapshot.gallery_items.is_empty());
        assert_eq!(snapshot.projects.len(), 6);
    }

    #[test]
    fn test_persist_corrupt_slot_falls_back_to_defaults() {
        let adapter = adapter_with(&[
            ("kb_projects", "{not json"),
            ("kb_gallery", r#"[{"id":9,"title":"Las","image":"x.jpg"}]"#),
        ]);

        let snapshot = adapter.load();

        assert_eq!(snapshot.projects.items(), defaults::default_projects().as_slice());
        assert_eq!(snapshot.gallery_items.len(), 1);
        assert!(snapshot.gallery_items.contains(9));
    }

    #[test]
    fn test_persist_strict_load_reports_corrupt_slot() {
        let adapter = adapter_with(&[("kb_pricing", r#"[{"id":1}]"#)]);

        match adapter.load_strict() {
            Err(AppResponse::SerializationError(msg)) => assert!(msg.contains("kb_pricing"), "{msg}"),
            other => panic!("expected a serialization error, got {other:?}"),
        }
    }

    #[test]
    fn test_persist_legacy_display_price_is_parsed() {
        let legacy = r#"[{
            "id": 4,
            "title": "Booth Custom",
            "price": "1.250.000",
            "unit": "/ booth",
            "description": "Legacy record",
            "features": ["Desain"],
            "iconName": "Monitor",
            "colorTheme": "red"
        }]"#;
        let adapter = adapter_with(&[("kb_design_services", legacy)]);

        let snapshot = adapter.load_strict().unwrap();
        let package = snapshot.design_services.get(4).unwrap();

        assert_eq!(package.price, 1_250_000);
        assert!(!package.popular);
        assert_eq!(package.note, None);
    }

    #[test]
    fn test_persist_custom_key_prefix() {
        let mut adapter = PersistenceAdapter::new(Box::new(MemoryStorage::new()), "preview_");
        adapter.save(&StoreSnapshot::seeded()).unwrap();

        assert_eq!(adapter.key_for("hero"), "preview_hero");
        assert!(adapter.storage().read("preview_design_services").unwrap().is_some());
        assert!(adapter.storage().read("kb_design_services").unwrap().is_none());
    }

    #[test]
    fn test_persist_failure_keeps_in_memory_state() {
        let mut store = ContentStore::open(PersistenceAdapter::new(Box::new(FailingStorage), DEFAULT_KEY_PREFIX));

        let stored = store.add(sample_project("Offline"));

        assert_eq!(store.get::<Project>(stored.id), Some(&stored));
        assert_eq!(store.items::<Project>().len(), 7);
    }

    #[test]
    fn test_persist_reset_reseeds_and_clears_storage() {
        let mut store = memory_store();
        store.add(sample_project("Temporary"));
        store.delete::<Testimonial>(1);

        store.reset().unwrap();

        assert_eq!(store.snapshot(), &StoreSnapshot::seeded());
        assert!(store.persistence().storage().read("kb_projects").unwrap().is_none());
    }

    #[test]
    fn test_persist_lmdb_storage_operations() {
        let path = unique_store_path("kv");
        let mut storage = LmdbStorage::init(&path, 10 * 1024 * 1024).unwrap();

        storage.write("kb_a", "1").unwrap();
        storage
            .write_all(&[("kb_b".to_string(), "2".to_string()), ("kb_c".to_string(), "3".to_string())])
            .unwrap();
        assert_eq!(storage.read("kb_b").unwrap().as_deref(), Some("2"));
        assert_eq!(storage.read("missing").unwrap(), None);

        storage.write("kb_a", "4").unwrap();
        assert_eq!(storage.read("kb_a").unwrap().as_deref(), Some("4"));

        storage.clear().unwrap();
        assert_eq!(storage.read("kb_c").unwrap(), None);

        storage.flush().unwrap();
        cleanup_store(&path);
    }

    #[test]
    fn test_persist_lmdb_survives_restart() {
        let path = unique_store_path("restart");
        let config = StoreConfig {
            path: path.clone(),
            ..StoreConfig::default()
        };

        let added = {
            let mut state = AppState::init(&config).unwrap();
            let added = state.store_mut().add(sample_project("Hot Restart"));
            state.store_mut().delete::<Project>(2);
            added
        };

        let mut state = AppState::init(&config).unwrap();
        assert_eq!(state.store().get::<Project>(added.id), Some(&added));
        assert!(state.store().get::<Project>(2).is_none());
        state.store_mut().delete::<Project>(added.id);
        state.close().unwrap();

        let state = AppState::init(&config).unwrap();
        assert!(state.store().get::<Project>(added.id).is_none());
        assert_eq!(state.store().items::<Project>().len(), 5);

        state.close().unwrap();
        cleanup_store(&path);
    }

    // ===============================
    // PRICE ESTIMATOR TESTS
    // ===============================

    #[test]
    fn test_estimate_reference_simulation() {
        let items = defaults::default_pricing_items();
        let catalog = PricingCatalog::new(&items);

        assert_eq!(estimate_price(&reference_simulation(), &catalog), 3_200_000);
    }

    #[test]
    fn test_estimate_empty_catalog_is_zero() {
        let catalog = PricingCatalog::new(&[]);

        assert_eq!(estimate_price(&reference_simulation(), &catalog), 0);
    }

    #[test]
    fn test_estimate_ignores_height_and_unknown_addons() {
        let items = defaults::default_pricing_items();
        let catalog = PricingCatalog::new(&items);
        let mut config = reference_simulation();
        config.height = 5_000.0;
        config.selected_addons.insert(1);
        config.selected_addons.insert(404);

        assert_eq!(estimate_price(&config, &catalog), 3_200_000);
    }

    #[test]
    fn test_estimate_rounds_half_up() {
        let items = vec![PricingItem {
            id: 1,
            name: "Triplek".to_string(),
            kind: PricingType::Material,
            price: 1,
            unit: PricingUnit::Meter,
        }];
        let catalog = PricingCatalog::new(&items);
        let mut config = PriceSimulationConfig {
            length: 50.0,
            width: 0.0,
            material_id: 1,
            ..PriceSimulationConfig::default()
        };
        assert_eq!(estimate_price(&config, &catalog), 1);

        config.length = 40.0;
        assert_eq!(estimate_price(&config, &catalog), 0);
    }

    #[test]
    fn test_estimate_negative_dimensions_are_not_clamped() {
        let items = defaults::default_pricing_items();
        let catalog = PricingCatalog::new(&items);
        let config = PriceSimulationConfig {
            length: -300.0,
            width: 0.0,
            material_id: 1,
            ..PriceSimulationConfig::default()
        };

        assert_eq!(estimate_price(&config, &catalog), -4_500_000);
    }

    #[test]
    fn test_simulation_defaults_and_selection() {
        let items = defaults::default_pricing_items();
        let catalog = PricingCatalog::new(&items);
        let mut config = PriceSimulationConfig::default();
        assert_eq!((config.length, config.width, config.height), (100.0, 60.0, 200.0));

        assert!(config.ensure_material(&catalog));
        assert_eq!(config.material_id, 1);
        assert!(!config.ensure_material(&catalog));

        config.material_id = 4;
        config.toggle_addon(7);
        config.toggle_addon(5);
        config.toggle_addon(7);
        assert_eq!(config.material_id, 4);
        assert_eq!(config.selected_addons, BTreeSet::from([5]));

        // 1.6 * 2.500.000 + 500.000
        assert_eq!(estimate_price(&config, &catalog), 4_500_000);
    }

    #[test]
    fn test_ensure_material_on_empty_catalog_keeps_selection() {
        let mut config = PriceSimulationConfig::default();

        assert!(!config.ensure_material(&PricingCatalog::new(&[])));
        assert_eq!(config.material_id, 0);
    }

    #[test]
    fn test_estimator_memoizes_until_inputs_change() {
        let mut items = defaults::default_pricing_items();
        let mut estimator = PriceEstimator::new();
        let config = reference_simulation();

        assert_eq!(estimator.estimate(&config, &PricingCatalog::new(&items)), 3_200_000);
        assert!(estimator.is_cached(&config, &PricingCatalog::new(&items)));

        items[0].price = 2_000_000;
        assert!(!estimator.is_cached(&config, &PricingCatalog::new(&items)));
        assert_eq!(estimator.estimate(&config, &PricingCatalog::new(&items)), 4_000_000);
    }

    // ===============================
    // ADMIN EDITING SURFACE TESTS
    // ===============================

    #[test]
    fn test_editor_table_matches_collection_kinds() {
        for kind in CollectionKind::ALL {
            let editor = editor(kind);
            assert_eq!(editor.kind, kind);
            assert!(!editor.fields.is_empty(), "{kind} has no fields");
            for key in editor.blank_form().keys() {
                assert!(editor.field(key).is_some(), "{kind} default '{key}' is not a field");
            }
        }
    }

    #[test]
    fn test_collection_kind_tags() {
        assert_eq!("design_services".parse::<CollectionKind>().unwrap(), CollectionKind::DesignServices);
        assert_eq!(serde_json::to_string(&CollectionKind::Hero).unwrap(), r#""hero""#);
        assert!(matches!("booths".parse::<CollectionKind>(), Err(AppResponse::BadRequest(_))));
    }

    #[test]
    fn test_form_schema_lists_icons_and_defaults() {
        let schema = form_schema(CollectionKind::Services);

        assert_eq!(schema.label, "Layanan");
        assert_eq!(schema.icons, available_icons());
        assert_eq!(schema.icons.len(), 16);
        assert_eq!(schema.defaults.get("color"), Some(&json!("bg-blue-500")));
        assert!(schema.fields.iter().any(|f| f.name == "iconName" && f.kind == FieldKind::Icon));

        let rendered = serde_json::to_value(&schema).unwrap();
        assert_eq!(rendered["fields"][3]["type"], json!("select"));
        assert_eq!(rendered["fields"][3]["options"][0]["value"], json!("bg-blue-500"));
    }

    #[test]
    fn test_create_design_package_from_form() {
        let mut store = memory_store();
        let mut session = EditSession::create(CollectionKind::DesignServices);
        assert!(session.is_new());

        session.apply(&form(json!({
            "title": "Kios Mall",
            "price": "750.000",
            "unit": "/ kios",
            "description": "Kios modular",
            "features": "Desain 3D\n\n  \nFile Produksi\n",
            "popular": "on",
            "colorTheme": "green",
            "unrelated": "ignored"
        })));
        let stored = session.submit(&mut store).unwrap();

        assert_eq!(stored["price"], json!(750_000));
        assert_eq!(stored["features"], json!(["Desain 3D", "File Produksi"]));
        assert_eq!(stored["popular"], json!(true));
        assert_eq!(stored["iconName"], json!("Monitor"));
        assert!(stored.get("note").is_none());
        assert_eq!(store.items::<DesignServiceItem>().len(), 4);
    }

    #[test]
    fn test_edit_session_prefills_and_updates() {
        let mut store = memory_store();
        let mut session = EditSession::edit(&store, CollectionKind::DesignServices, 2).unwrap();

        assert_eq!(session.editing_id(), Some(2));
        assert_eq!(session.form()["price"], json!("600.000"));
        assert_eq!(
            session.form()["features"],
            json!("Desain Tematik\nLayouting Area\nDetail Branding\nFile Siap Produksi")
        );
        assert!(session.form().get("id").is_none());

        session.set_field("title", json!("Booth Expo")).unwrap();
        session.submit(&mut store).unwrap();

        let updated = store.get::<DesignServiceItem>(2).unwrap();
        assert_eq!(updated.title, "Booth Expo");
        assert_eq!(updated.price, 600_000);
        assert_eq!(updated.note.as_deref(), Some("*Tergantung luas area"));
        assert_eq!(store.items::<DesignServiceItem>().len(), 3);
    }

    #[test]
    fn test_edit_missing_record_is_not_found() {
        let store = memory_store();

        let result = EditSession::edit(&store, CollectionKind::Projects, 77);

        assert!(matches!(result, Err(AppResponse::NotFound(_))));
    }

    #[test]
    fn test_submit_after_record_deleted_is_not_found() {
        let mut store = memory_store();
        let mut session = EditSession::edit(&store, CollectionKind::Gallery, 1).unwrap();
        session.set_field("title", json!("Proses Las Ulang")).unwrap();

        assert!(request_delete(CollectionKind::Gallery, 1).confirm(&mut store));
        let before = store.snapshot().clone();

        assert!(matches!(session.submit(&mut store), Err(AppResponse::NotFound(_))));
        assert_eq!(store.snapshot(), &before);
        assert_eq!(store.items::<GalleryItem>().len(), 4);
    }

    #[test]
    fn test_form_price_accepts_whole_float() {
        let mut store = memory_store();
        let mut session = EditSession::create(CollectionKind::DesignServices);
        session.apply(&form(json!({
            "title": "Kios Mall",
            "price": 350000.0,
            "unit": "/ kios",
            "description": "Kios modular",
            "features": "Desain 3D"
        })));

        let stored = session.submit(&mut store).unwrap();

        assert_eq!(stored["price"], json!(350_000));
    }

    #[test]
    fn test_form_price_rejects_fractional_and_negative_numbers() {
        for price in [json!(350000.5), json!(-1), json!(-350000.0), json!(true)] {
            let mut store = memory_store();
            let mut session = EditSession::create(CollectionKind::DesignServices);
            session.apply(&form(json!({
                "title": "Kios Mall",
                "price": price.clone(),
                "unit": "/ kios",
                "description": "Kios modular",
                "features": "Desain 3D"
            })));

            let result = session.submit(&mut store);

            assert!(matches!(result, Err(AppResponse::ValidationError(_))), "price {price} accepted");
            assert_eq!(store.items::<DesignServiceItem>().len(), 3);
        }
    }

    #[test]
    fn test_form_required_field_rejected() {
        let mut store = memory_store();
        let mut session = EditSession::create(CollectionKind::Projects);
        session.apply(&form(json!({ "title": "  ", "image": "a.jpg", "description": "x" })));

        match session.submit(&mut store) {
            Err(AppResponse::ValidationError(msg)) => assert!(msg.contains("Judul Project"), "{msg}"),
            other => panic!("expected a validation error, got {other:?}"),
        }
        assert_eq!(store.items::<Project>().len(), 6);
    }

    #[test]
    fn test_form_select_rejects_unknown_choice() {
        let mut store = memory_store();
        let mut session = EditSession::create(CollectionKind::Pricing);
        session.apply(&form(json!({ "name": "Kaca", "type": "discount", "price": 10 })));

        assert!(matches!(session.submit(&mut store), Err(AppResponse::ValidationError(_))));
    }

    #[test]
    fn test_form_numbers_accept_text() {
        let mut store = memory_store();

        let mut session = EditSession::create(CollectionKind::Testimonials);
        session.apply(&form(json!({
            "name": "Rina",
            "business": "Seblak Rina",
            "content": "Cepat dan rapi",
            "rating": "4",
            "image": "rina.jpg"
        })));
        let stored = session.submit(&mut store).unwrap();
        assert_eq!(stored["rating"], json!(4));

        let mut session = EditSession::create(CollectionKind::Pricing);
        session.apply(&form(json!({ "name": "Lampu LED", "type": "addon", "price": "150000", "unit": "unit" })));
        let stored = session.submit(&mut store).unwrap();
        assert_eq!(stored["price"], json!(150_000));

        let mut session = EditSession::create(CollectionKind::Pricing);
        session.apply(&form(json!({ "name": "Lampu", "price": "murah" })));
        assert!(matches!(session.submit(&mut store), Err(AppResponse::ValidationError(_))));
    }

    #[test]
    fn test_set_field_rejects_unknown_name() {
        let mut session = EditSession::create(CollectionKind::Gallery);

        let result = session.set_field("rating", json!(5));

        assert!(matches!(result, Err(AppResponse::BadRequest(_))));
        assert_eq!(session.kind(), CollectionKind::Gallery);
    }

    #[test]
    fn test_parse_display_price() {
        assert_eq!(parse_display_price("350.000"), Some(350_000));
        assert_eq!(parse_display_price("Rp 1.000.000"), Some(1_000_000));
        assert_eq!(parse_display_price(" 600000 "), Some(600_000));
        assert_eq!(parse_display_price(""), None);
        assert_eq!(parse_display_price("mulai 300rb"), None);
    }

    #[test]
    fn test_pending_delete_requires_confirmation() {
        let mut store = memory_store();

        request_delete(CollectionKind::Products, 3).cancel();
        assert_eq!(store.items::<crate::content_model::ProductItem>().len(), 8);

        assert!(request_delete(CollectionKind::Products, 3).confirm(&mut store));
        assert!(!request_delete(CollectionKind::Products, 3).confirm(&mut store));
        assert_eq!(store.items::<crate::content_model::ProductItem>().len(), 7);
    }

    #[test]
    fn test_admin_gate() {
        let gate = AdminGate::new("admin123");

        assert!(gate.authenticate("admin123").is_ok());
        assert!(matches!(gate.authenticate("Admin123"), Err(AppResponse::ValidationError(_))));
    }

    #[test]
    fn test_settings_form_round_trip() {
        let mut store = memory_store();
        let mut values = settings_form(&store);
        assert_eq!(values["instagram"], json!("@kreasibooth"));

        values.insert("whatsapp".to_string(), json!("6285700000000"));
        values.insert("address".to_string(), json!("Bandung"));
        let saved = submit_settings(&mut store, &values).unwrap();

        assert_eq!(saved.whatsapp, "6285700000000");
        assert_eq!(store.settings(), &saved);
        assert_eq!(store.settings().email, "admin@kreasibooth.com");
    }

    #[test]
    fn test_icon_registry_fallback() {
        assert_eq!(Icon::from_name("PenTool"), Some(Icon::PenTool));
        assert_eq!(Icon::from_name("pentool"), None);
        assert_eq!(Icon::resolve("Layout"), Icon::DEFAULT);

        let seeded = defaults::default_design_services();
        assert_eq!(seeded[1].icon(), Icon::Store);
    }

    // ===============================
    // MESSAGING TESTS
    // ===============================

    #[test]
    fn test_rupiah_formatting() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1_000), "1.000");
        assert_eq!(format_rupiah(3_200_000), "Rp 3.200.000");
        assert_eq!(format_rupiah(-4_500_000), "-Rp 4.500.000");
        assert!(!format_rupiah(350_000).contains('\u{a0}'));
    }

    #[test]
    fn test_encode_uri_component() {
        assert_eq!(encode_uri_component("Halo, Kak!"), "Halo%2C%20Kak!");
        assert_eq!(encode_uri_component("*A*\n(b)"), "*A*%0A(b)");
        assert_eq!(encode_uri_component("é"), "%C3%A9");
    }

    #[test]
    fn test_compose_order_message() {
        let items = defaults::default_pricing_items();
        let catalog = PricingCatalog::new(&items);
        let order = OrderRequest {
            name: "Andi".to_string(),
            phone: "08123".to_string(),
            attachment_name: Some("denah.jpg".to_string()),
            ..OrderRequest::default()
        };

        let message = compose_order_message(&order, &reference_simulation(), &catalog, 3_200_000);

        assert!(message.starts_with("Halo KreasiBooth, saya ingin memesan/konsultasi:\n\n*DATA PEMESAN*\nNama: Andi\n"));
        assert!(message.contains("Alamat: -\n"));
        assert!(message.contains("Ukuran: 100 x 60 x 200 cm\n"));
        assert!(message.contains("Material: Kayu Jati Belanda\n"));
        assert!(message.contains("Add-ons: Atap / Kanopi, Roda Gerobak\n"));
        assert!(message.contains("*Estimasi Harga: Rp 3.200.000*"));
        assert!(message.contains("*PESAN TAMBAHAN*\n-\n"));
        assert!(message.ends_with("(denah.jpg) setelah chat ini terbuka."));
    }

    #[test]
    fn test_compose_order_message_without_selection() {
        let order = OrderRequest {
            name: "Andi".to_string(),
            phone: "08123".to_string(),
            message: "Ukuran bisa custom?".to_string(),
            ..OrderRequest::default()
        };

        let message = compose_order_message(&order, &PriceSimulationConfig::default(), &PricingCatalog::new(&[]), 0);

        assert!(message.contains("Material: -\n"));
        assert!(message.contains("Add-ons: Tidak ada\n"));
        assert!(message.contains("*Estimasi Harga: Rp 0*"));
        assert!(message.ends_with("Ukuran bisa custom?\n"));
    }

    #[test]
    fn test_order_link_validates_and_targets_business_number() {
        let store = memory_store();
        let catalog = store.pricing_catalog();
        let mut order = OrderRequest {
            name: "Andi".to_string(),
            ..OrderRequest::default()
        };

        let result = order_link(&order, &reference_simulation(), &catalog, store.settings());
        assert!(matches!(result, Err(AppResponse::ValidationError(_))));

        order.phone = "08123".to_string();
        let link = order_link(&order, &reference_simulation(), &catalog, store.settings()).unwrap();
        assert!(link.starts_with("https://wa.me/6281316426495?text=Halo%20KreasiBooth%2C%20saya"));
        assert!(link.contains("Rp%203.200.000"));
    }

    #[test]
    fn test_design_order_link_falls_back_to_business_number() {
        let mut settings = defaults::default_settings();
        settings.whatsapp = "  ".to_string();
        let order = DesignOrderRequest {
            package: "Booth Pameran".to_string(),
            name: "Sari".to_string(),
            concept: "Booth minimalis warna pastel".to_string(),
            ..DesignOrderRequest::default()
        };

        let message = compose_design_order_message(&order);
        assert!(message.contains("Paket: Booth Pameran\n"));
        assert!(message.contains("Nama Usaha: -\n"));
        assert!(message.ends_with("Terima kasih."));

        let link = design_order_link(&order, &settings).unwrap();
        assert!(link.starts_with(&format!("https://wa.me/{FALLBACK_WHATSAPP}?text=")));

        let incomplete = DesignOrderRequest {
            concept: String::new(),
            ..order
        };
        assert!(matches!(design_order_link(&incomplete, &settings), Err(AppResponse::ValidationError(_))));
    }

    // ===============================
    // DESIGN ASSISTANT TESTS
    // ===============================

    enum Reply {
        Text(&'static str),
        Empty,
        Failure,
    }

    struct ScriptedAssistant {
        reply: Reply,
    }

    impl DesignAssistant for ScriptedAssistant {
        fn design_concept(&self, prompt: &str) -> Result<Option<String>, AppResponse> {
            assert!(prompt.contains("kopi susu"));
            match self.reply {
                Reply::Text(text) => Ok(Some(text.to_string())),
                Reply::Empty => Ok(None),
                Reply::Failure => Err(AppResponse::BadRequest("timeout".to_string())),
            }
        }

        fn booth_image(&self, _prompt: &str) -> Result<Option<ImagePayload>, AppResponse> {
            match self.reply {
                Reply::Text(_) => Ok(Some(ImagePayload {
                    mime_type: "image/png".to_string(),
                    data: "iVBORw0".to_string(),
                })),
                Reply::Empty => Ok(None),
                Reply::Failure => Err(AppResponse::BadRequest("timeout".to_string())),
            }
        }
    }

    #[test]
    fn test_consultant_passes_through_answers() {
        let consultant = DesignConsultant::new(ScriptedAssistant { reply: Reply::Text("<p>Konsep</p>") });

        assert_eq!(consultant.generate_concept("kopi susu"), "<p>Konsep</p>");
        assert_eq!(
            consultant.generate_image("kopi susu").as_deref(),
            Some("data:image/png;base64,iVBORw0")
        );
        assert!(concept_prompt("kopi susu").contains("\"kopi susu\""));
    }

    #[test]
    fn test_consultant_fallbacks() {
        let empty = DesignConsultant::new(ScriptedAssistant { reply: Reply::Empty });
        assert_eq!(empty.generate_concept("kopi susu"), CONCEPT_EMPTY_FALLBACK);
        assert_eq!(empty.generate_image("kopi susu"), None);

        let failing = DesignConsultant::new(ScriptedAssistant { reply: Reply::Failure });
        assert_eq!(failing.generate_concept("kopi susu"), CONCEPT_ERROR_FALLBACK);
        assert_eq!(failing.generate_image("kopi susu"), None);
    }

    #[test]
    fn test_request_guard_drops_superseded_responses() {
        let mut guard = RequestGuard::new();
        let first = guard.issue();
        let second = guard.issue();

        assert!(!guard.is_current(first));
        assert_eq!(guard.accept(first, "stale"), None);
        assert_eq!(guard.accept(second, "fresh"), Some("fresh"));
    }

    // ===============================
    // CONFIG AND ERROR TESTS
    // ===============================

    #[test]
    fn test_store_config_parsing() {
        let config = StoreConfig::from_json("{}").unwrap();
        assert_eq!(config, StoreConfig::default());
        assert_eq!(config.key_prefix, "kb_");

        let config = StoreConfig::from_json(r#"{"path":"site","admin_password":"s3cret"}"#).unwrap();
        assert_eq!(config.path, "site");
        assert_eq!(config.admin_password, "s3cret");

        assert!(matches!(StoreConfig::from_json(r#"{"path":" "}"#), Err(AppResponse::ValidationError(_))));
        assert!(matches!(StoreConfig::from_json(r#"{"map_size":0}"#), Err(AppResponse::ValidationError(_))));
        assert!(matches!(StoreConfig::from_json("nope"), Err(AppResponse::SerializationError(_))));
    }

    #[test]
    fn test_lmdb_errors_map_to_responses() {
        assert!(matches!(AppResponse::from(lmdb::Error::NotFound), AppResponse::NotFound(_)));
        assert!(matches!(AppResponse::from(lmdb::Error::MapFull), AppResponse::DatabaseError(_)));
        assert!(AppResponse::success("done").is_ok());
    }

    #[test]
    fn test_app_state_requires_login_for_admin() {
        let mut state = AppState::with_storage(Box::new(MemoryStorage::new()), &StoreConfig::default());
        assert!(matches!(state.require_admin(), Err(AppResponse::BadRequest(_))));

        assert!(state.login("wrong").is_err());
        assert!(!state.is_authenticated());

        state.login("admin123").unwrap();
        assert!(state.require_admin().is_ok());

        state.logout();
        assert!(!state.is_authenticated());
    }

    #[test]
    fn test_app_state_estimate_defaults_material() {
        let mut state = AppState::with_storage(Box::new(MemoryStorage::new()), &StoreConfig::default());
        let mut config = PriceSimulationConfig {
            material_id: 99,
            selected_addons: BTreeSet::from([5, 6]),
            ..PriceSimulationConfig::default()
        };

        assert_eq!(state.estimate(&mut config), 3_200_000);
        assert_eq!(config.material_id, 1);
    }

    // ===============================
    // FFI FUNCTION TESTS
    // ===============================

    fn take_response(ptr: *const c_char) -> AppResponse {
        assert!(!ptr.is_null(), "FFI response should not be null");
        let json = unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_string();
        crate::free_response(ptr);
        serde_json::from_str(&json).unwrap()
    }

    fn take_ok_json(ptr: *const c_char) -> Value {
        match take_response(ptr) {
            AppResponse::Ok(body) => serde_json::from_str(&body).unwrap(),
            other => panic!("expected Ok, got {other:?}"),
        }
    }

    fn ffi_store(prefix: &str) -> (*mut AppState, String) {
        let path = unique_store_path(prefix);
        let config = CString::new(json!({ "path": &path, "admin_password": "rahasia" }).to_string()).unwrap();
        let state = crate::create_store(config.as_ptr());
        assert!(!state.is_null(), "store should open at {path}");
        (state, path)
    }

    fn ffi_login(state: *mut AppState) {
        let password = CString::new("rahasia").unwrap();
        assert!(take_response(crate::admin_login(state, password.as_ptr())).is_ok());
    }

    fn ffi_close(state: *mut AppState, path: &str) {
        assert!(take_response(crate::close_store(state)).is_ok());
        cleanup_store(path);
    }

    #[test]
    fn test_ffi_create_store_rejects_bad_config() {
        let config = CString::new(r#"{"path":""}"#).unwrap();
        assert!(crate::create_store(config.as_ptr()).is_null());

        let invalid_bytes: [u8; 4] = [0xFF, 0xFE, 0xFD, 0x00];
        assert!(crate::create_store(invalid_bytes.as_ptr() as *const c_char).is_null());
    }

    #[test]
    fn test_ffi_get_collection_and_settings() {
        let (state, path) = ffi_store("ffi_read");

        let kind = CString::new("pricing").unwrap();
        let pricing = take_ok_json(crate::get_collection(state, kind.as_ptr()));
        assert_eq!(pricing.as_array().map(Vec::len), Some(7));
        assert_eq!(pricing[0]["type"], json!("material"));
        assert_eq!(pricing[0]["unit"], json!("m"));

        let settings = take_ok_json(crate::get_settings(state));
        assert_eq!(settings["workshopVideoUrl"].as_str().map(|url| url.ends_with(".mp4")), Some(true));

        let unknown = CString::new("booths").unwrap();
        assert!(matches!(take_response(crate::get_collection(state, unknown.as_ptr())), AppResponse::BadRequest(_)));

        ffi_close(state, &path);
    }

    #[test]
    fn test_ffi_null_pointers() {
        assert!(matches!(take_response(crate::get_settings(std::ptr::null_mut())), AppResponse::BadRequest(_)));
        assert!(matches!(take_response(crate::close_store(std::ptr::null_mut())), AppResponse::BadRequest(_)));
        assert!(matches!(take_response(crate::get_form_schema(std::ptr::null())), AppResponse::BadRequest(_)));
        crate::free_response(std::ptr::null());
    }

    #[test]
    fn test_ffi_get_form_schema() {
        let kind = CString::new("design_services").unwrap();

        let schema = take_ok_json(crate::get_form_schema(kind.as_ptr()));

        assert_eq!(schema["kind"], json!("design_services"));
        assert_eq!(schema["defaults"]["colorTheme"], json!("blue"));
        assert!(schema["fields"].as_array().unwrap().iter().any(|f| f["type"] == json!("price")));
    }

    #[test]
    fn test_ffi_mutations_require_login() {
        let (state, path) = ffi_store("ffi_gate");
        let kind = CString::new("gallery").unwrap();
        let form = CString::new(r#"{"title":"Proses Las","image":"las.jpg"}"#).unwrap();

        let denied = take_response(crate::add_record(state, kind.as_ptr(), form.as_ptr()));
        assert!(matches!(denied, AppResponse::BadRequest(_)));

        let wrong = CString::new("admin123").unwrap();
        assert!(matches!(take_response(crate::admin_login(state, wrong.as_ptr())), AppResponse::ValidationError(_)));
        assert!(matches!(take_response(crate::reset_store(state)), AppResponse::BadRequest(_)));

        ffi_login(state);
        assert!(take_response(crate::add_record(state, kind.as_ptr(), form.as_ptr())).is_ok());

        assert!(take_response(crate::admin_logout(state)).is_ok());
        let denied = take_response(crate::delete_record(state, kind.as_ptr(), 1, true));
        assert!(matches!(denied, AppResponse::BadRequest(_)));

        ffi_close(state, &path);
    }

    #[test]
    fn test_ffi_add_update_delete_record() {
        let (state, path) = ffi_store("ffi_crud");
        ffi_login(state);
        let kind = CString::new("projects").unwrap();

        let form = CString::new(
            r#"{"id":3,"title":"Es Kopi","category":"cafe","image":"kopi.jpg","description":"Booth kopi"}"#,
        )
        .unwrap();
        let added = take_ok_json(crate::add_record(state, kind.as_ptr(), form.as_ptr()));
        let id = added["id"].as_u64().unwrap();
        assert!(id > 6);

        let update = CString::new(json!({ "id": id, "title": "Es Kopi Susu" }).to_string()).unwrap();
        let updated = take_ok_json(crate::update_record(state, kind.as_ptr(), update.as_ptr()));
        assert_eq!(updated["title"], json!("Es Kopi Susu"));
        assert_eq!(updated["category"], json!("cafe"));

        let missing = CString::new(r#"{"id":123456,"title":"Ghost"}"#).unwrap();
        assert!(matches!(
            take_response(crate::update_record(state, kind.as_ptr(), missing.as_ptr())),
            AppResponse::NotFound(_)
        ));
        let no_id = CString::new(r#"{"title":"Ghost"}"#).unwrap();
        assert!(matches!(
            take_response(crate::update_record(state, kind.as_ptr(), no_id.as_ptr())),
            AppResponse::BadRequest(_)
        ));

        let unconfirmed = take_response(crate::delete_record(state, kind.as_ptr(), id, false));
        assert!(matches!(unconfirmed, AppResponse::BadRequest(_)));
        assert_eq!(take_ok_json(crate::delete_record(state, kind.as_ptr(), id, true)), json!({ "removed": true }));
        assert_eq!(take_ok_json(crate::delete_record(state, kind.as_ptr(), id, true)), json!({ "removed": false }));

        let projects = take_ok_json(crate::get_collection(state, kind.as_ptr()));
        assert_eq!(projects.as_array().map(Vec::len), Some(6));

        ffi_close(state, &path);
    }

    #[test]
    fn test_ffi_invalid_form_json() {
        let (state, path) = ffi_store("ffi_bad_json");
        ffi_login(state);
        let kind = CString::new("hero").unwrap();
        let form = CString::new("{title:").unwrap();

        let result = take_response(crate::add_record(state, kind.as_ptr(), form.as_ptr()));

        assert!(matches!(result, AppResponse::SerializationError(_)));
        ffi_close(state, &path);
    }

    #[test]
    fn test_ffi_estimate_and_order_links() {
        let (state, path) = ffi_store("ffi_estimate");

        let simulation = CString::new(r#"{"selectedAddons":[5,6]}"#).unwrap();
        let estimate = take_ok_json(crate::estimate_price(state, simulation.as_ptr()));
        assert_eq!(estimate["price"], json!(3_200_000));
        assert_eq!(estimate["formatted"], json!("Rp 3.200.000"));
        assert_eq!(estimate["simulation"]["materialId"], json!(1));

        let order = CString::new(
            r#"{"order":{"name":"Andi","phone":"08123"},"simulation":{"materialId":1,"selectedAddons":[5,6]}}"#,
        )
        .unwrap();
        match take_response(crate::order_whatsapp_link(state, order.as_ptr())) {
            AppResponse::Ok(link) => assert!(link.starts_with("https://wa.me/6281316426495?text="), "{link}"),
            other => panic!("expected a link, got {other:?}"),
        }

        let design = CString::new(r#"{"package":"Cafe & Resto","name":"Sari"}"#).unwrap();
        assert!(matches!(
            take_response(crate::design_order_whatsapp_link(state, design.as_ptr())),
            AppResponse::ValidationError(_)
        ));

        ffi_close(state, &path);
    }

    #[test]
    fn test_ffi_replace_settings_and_reset() {
        let (state, path) = ffi_store("ffi_settings");
        ffi_login(state);

        let settings = CString::new(r#"{"whatsapp":"6289900000000","address":"Depok"}"#).unwrap();
        let saved = take_ok_json(crate::replace_settings(state, settings.as_ptr()));
        assert_eq!(saved["whatsapp"], json!("6289900000000"));

        let design = CString::new(r#"{"package":"Cafe & Resto","name":"Sari","concept":"Industrial"}"#).unwrap();
        match take_response(crate::design_order_whatsapp_link(state, design.as_ptr())) {
            AppResponse::Ok(link) => assert!(link.starts_with("https://wa.me/6289900000000?text="), "{link}"),
            other => panic!("expected a link, got {other:?}"),
        }

        assert!(take_response(crate::reset_store(state)).is_ok());
        let settings = take_ok_json(crate::get_settings(state));
        assert_eq!(settings["whatsapp"], json!(FALLBACK_WHATSAPP));

        ffi_close(state, &path);
    }
}
