//! Integration tests for the record store and registry against SQLite.

use vmhost::db::{Store, StoreError};
use vmhost::domain::{ClientId, IdentityOrigin, MachineSpec};
use vmhost::services::{Registry, RegistryError, SeaOrmRegistry};

async fn test_store() -> Store {
    let db_path =
        std::env::temp_dir().join(format!("vmhost-registry-test-{}.db", uuid::Uuid::new_v4()));
    Store::new(&format!("sqlite:{}", db_path.display()))
        .await
        .expect("failed to open store")
}

async fn test_registry() -> (Store, SeaOrmRegistry) {
    let store = test_store().await;
    (store.clone(), SeaOrmRegistry::new(store))
}

fn spec_2gb() -> MachineSpec {
    MachineSpec::new("2GB", "2", "500GB", "hdd_001")
}

async fn provision(registry: &SeaOrmRegistry, username: &str, spec: &MachineSpec) -> ClientId {
    let (client_id, origin) = registry
        .resolve_or_create_identity(username)
        .await
        .expect("resolve failed");
    assert_eq!(origin, IdentityOrigin::Created);
    registry
        .provision_machine(&client_id, spec)
        .await
        .expect("provision failed");
    client_id
}

#[tokio::test]
async fn fresh_usernames_get_distinct_machines() {
    let (_, registry) = test_registry().await;

    let a = provision(&registry, "alice", &spec_2gb()).await;
    let b = provision(&registry, "bob", &spec_2gb()).await;

    assert_ne!(a, b);
    assert!(registry.machine_exists(&a).await.unwrap());
    assert!(registry.machine_exists(&b).await.unwrap());
    assert_eq!(registry.stats().await.unwrap().machine_count, 2);
}

#[tokio::test]
async fn returning_user_keeps_client_id() {
    let (_, registry) = test_registry().await;
    let first = provision(&registry, "alice", &spec_2gb()).await;

    let (again, origin) = registry.resolve_or_create_identity("alice").await.unwrap();

    assert_eq!(origin, IdentityOrigin::Returning);
    assert_eq!(again, first);
}

#[tokio::test]
async fn empty_username_is_rejected() {
    let (_, registry) = test_registry().await;
    let err = registry.resolve_or_create_identity("").await.unwrap_err();
    assert!(matches!(err, RegistryError::Validation(_)));
}

#[tokio::test]
async fn duplicate_inserts_surface_as_conflicts() {
    let store = test_store().await;

    store.insert_identity("alice", "id1").await.unwrap();
    let err = store.insert_identity("alice", "id2").await.unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)));

    let err = store.insert_identity("bob", "id1").await.unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)));

    store.insert_machine("id1", &spec_2gb()).await.unwrap();
    let err = store.insert_machine("id1", &spec_2gb()).await.unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)));
}

#[tokio::test]
async fn liveness_accounting() {
    let (store, registry) = test_registry().await;
    let alice = provision(&registry, "alice", &spec_2gb()).await;
    let bob = provision(&registry, "bob", &spec_2gb()).await;

    registry.mark_connected(&alice).await.unwrap();
    registry.mark_connected(&alice).await.unwrap();
    registry.mark_connected(&bob).await.unwrap();

    let live: Vec<String> = registry
        .currently_connected()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.username)
        .collect();
    assert_eq!(live, vec!["alice", "bob"]);

    registry.mark_disconnected(&alice).await.unwrap();
    let live = registry.currently_connected().await.unwrap();
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].client_id, bob.as_str());

    assert_eq!(store.clear_live_connections().await.unwrap(), 1);
    assert!(registry.currently_connected().await.unwrap().is_empty());
    assert_eq!(registry.clear_live_connections().await.unwrap(), 0);

    // Ever-connected is unaffected by liveness.
    assert_eq!(registry.ever_connected().await.unwrap().len(), 2);
}

#[tokio::test]
async fn removal_cascades_to_identity_and_listings() {
    let (store, registry) = test_registry().await;
    let alice = provision(&registry, "alice", &spec_2gb()).await;
    registry.mark_connected(&alice).await.unwrap();

    registry.remove_virtual_machine(&alice).await.unwrap();

    assert!(!registry.machine_exists(&alice).await.unwrap());
    assert!(registry.ever_connected().await.unwrap().is_empty());
    assert!(registry.currently_connected().await.unwrap().is_empty());
    assert_eq!(store.find_identity_by_username("alice").await.unwrap(), None);

    // Idempotent.
    registry.remove_virtual_machine(&alice).await.unwrap();
}

#[tokio::test]
async fn update_round_trip() {
    let (store, registry) = test_registry().await;
    store.insert_identity("test_user", "id1").await.unwrap();
    store.insert_machine("id1", &spec_2gb()).await.unwrap();

    registry
        .update_machine(
            &ClientId::from("id1"),
            &MachineSpec::new("4GB", "4", "1TB", "hdd_002"),
        )
        .await
        .unwrap();

    let rows = registry.ever_connected().await.unwrap();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.client_id, "id1");
    assert_eq!(row.ram_size.as_deref(), Some("4GB"));
    assert_eq!(row.cpu_count.as_deref(), Some("4"));
    assert_eq!(row.hdd_size.as_deref(), Some("1TB"));
    assert_eq!(row.hdd_id.as_deref(), Some("hdd_002"));
}

#[tokio::test]
async fn update_of_missing_machine_is_not_found() {
    let (store, registry) = test_registry().await;

    assert!(!store.update_machine("ghost", &spec_2gb()).await.unwrap());

    let err = registry
        .update_machine(&ClientId::from("ghost"), &spec_2gb())
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::NotFound(id) if id.as_str() == "ghost"));
}

#[tokio::test]
async fn ever_connected_tolerates_missing_machine() {
    let store = test_store().await;
    store.insert_identity("orphan", "id9").await.unwrap();

    let rows = store.list_all_ever_connected().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].username, "orphan");
    assert_eq!(rows[0].client_id, "id9");
    assert_eq!(rows[0].ram_size, None);

    assert!(store.list_hard_disks().await.unwrap().is_empty());
}

#[tokio::test]
async fn single_row_deletes_are_idempotent() {
    let store = test_store().await;
    store.insert_identity("alice", "id1").await.unwrap();
    store.insert_machine("id1", &spec_2gb()).await.unwrap();

    store.delete_machine("id1").await.unwrap();
    store.delete_machine("id1").await.unwrap();
    assert!(!store.machine_exists("id1").await.unwrap());

    store.delete_identity("id1").await.unwrap();
    store.delete_identity("id1").await.unwrap();
    assert_eq!(store.find_identity_by_username("alice").await.unwrap(), None);

    store.remove_live_connection("id1").await.unwrap();
}

#[tokio::test]
async fn hard_disk_listing() {
    let (_, registry) = test_registry().await;
    provision(&registry, "test_user", &spec_2gb()).await;

    let disks = registry.hard_disks().await.unwrap();
    assert_eq!(disks.len(), 1);
    assert_eq!(disks[0].username, "test_user");
    assert_eq!(disks[0].hdd_size, "500GB");
}

#[tokio::test]
async fn stats_aggregation() {
    let (_, registry) = test_registry().await;
    provision(&registry, "a", &MachineSpec::new("2GB", "2", "500GB", "h1")).await;
    provision(&registry, "b", &MachineSpec::new("4GB", "4", "1TB", "h2")).await;

    let stats = registry.stats().await.unwrap();
    assert_eq!(stats.machine_count, 2);
    assert_eq!(stats.total_ram, "6GB");
    assert_eq!(stats.total_cpu, "6");
}

#[tokio::test]
async fn stats_on_empty_store() {
    let (store, _) = test_registry().await;
    store.ping().await.unwrap();

    let stats = store.total_stats().await.unwrap();
    assert_eq!(stats.machine_count, 0);
    assert_eq!(stats.total_ram, "0");
    assert_eq!(stats.total_cpu, "0");
}
