//! PostgreSQL adapter tests
//!
//! These start a PostgreSQL container and are ignored by default:
//! `cargo test -p infra_db -- --ignored`

use std::sync::Arc;

use serde_json::json;

use core_kernel::{FormId, HealthCheckable};
use domain_forms::{FormDiscovery, LayoutFormIdExtractor, PagePort};
use domain_settings::{SettingsKey, SettingsPort, SettingsStore, SettingsUpdate};
use infra_db::{PostgresPageAdapter, PostgresSettingsAdapter};
use test_utils::assertions::assert_healthy;
use test_utils::database::create_isolated_test_database;
use test_utils::fixtures::{LayoutFixtures, STANDARD_MAPPING};

mod settings {
    use super::*;

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn test_get_set_round_trip() {
        let db = create_isolated_test_database().await.unwrap();
        let adapter = PostgresSettingsAdapter::new(db.pool().clone());

        assert_eq!(adapter.get("api_token").await.unwrap(), None);

        adapter.set("api_token", json!("pat-1")).await.unwrap();
        adapter.set("api_token", json!("pat-2")).await.unwrap();

        assert_eq!(adapter.get("api_token").await.unwrap(), Some(json!("pat-2")));
    }

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn test_add_if_absent_keeps_existing_value() {
        let db = create_isolated_test_database().await.unwrap();
        let adapter = PostgresSettingsAdapter::new(db.pool().clone());

        assert!(adapter.add_if_absent("field_mapping", json!("{}")).await.unwrap());
        assert!(!adapter.add_if_absent("field_mapping", json!("other")).await.unwrap());

        assert_eq!(adapter.get("field_mapping").await.unwrap(), Some(json!("{}")));
    }

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn test_store_install_and_save() {
        let db = create_isolated_test_database().await.unwrap();
        let store = SettingsStore::new(Arc::new(PostgresSettingsAdapter::new(db.pool().clone())));

        let installed = store.install_defaults().await.unwrap();
        assert!(installed.contains(&SettingsKey::FieldMapping));
        assert!(store.install_defaults().await.unwrap().is_empty());

        store
            .save(SettingsUpdate {
                api_token: Some("  pat-9 ".to_string()),
                enabled_form_ids: Some(vec![FormId::new(3), FormId::new(1)]),
                field_mapping: Some(STANDARD_MAPPING.to_string()),
            })
            .await
            .unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(store.api_token().await.unwrap(), "pat-9");
        assert_eq!(loaded.enabled_form_ids.len(), 2);
        assert_eq!(store.field_mapping().await.unwrap(), STANDARD_MAPPING);
    }

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn test_health_check() {
        let db = create_isolated_test_database().await.unwrap();
        let adapter = PostgresSettingsAdapter::new(db.pool().clone());

        let health = adapter.health_check().await;

        assert_healthy(&health);
        assert_eq!(health.adapter_id, "postgres-settings-adapter");
    }
}

mod pages {
    use super::*;

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn test_only_published_pages_in_menu_order() {
        let db = create_isolated_test_database().await.unwrap();
        let adapter = PostgresPageAdapter::new(db.pool().clone());
        let repo = adapter.repository();

        repo.upsert(10, "Contact", "publish", Some(LayoutFixtures::nested(&[3]).as_str())).await.unwrap();
        repo.upsert(11, "Draft", "draft", Some(LayoutFixtures::nested(&[4]).as_str())).await.unwrap();
        repo.upsert(12, "About", "publish", None).await.unwrap();
        sqlx::query("UPDATE pages SET menu_order = 1 WHERE page_id = 10")
            .execute(db.pool())
            .await
            .unwrap();

        let pages = adapter.published_pages().await.unwrap();

        let ids: Vec<u64> = pages.iter().map(|p| p.id.value()).collect();
        assert_eq!(ids, vec![12, 10]);
        assert!(pages[0].layout.is_none());
    }

    #[tokio::test]
    #[ignore = "requires docker"]
    async fn test_discovery_over_postgres() {
        let db = create_isolated_test_database().await.unwrap();
        let adapter = PostgresPageAdapter::new(db.pool().clone());
        adapter
            .repository()
            .upsert(20, "Contact", "publish", Some(LayoutFixtures::nested(&[7, 8]).as_str()))
            .await
            .unwrap();

        let discovery = FormDiscovery::new(Arc::new(adapter), Arc::new(LayoutFormIdExtractor));
        let forms = discovery.list_forms().await;

        let labels: Vec<&str> = forms.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Form #7 (Page: Contact)", "Form #8 (Page: Contact)"]
        );
    }
}
