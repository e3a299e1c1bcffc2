//! Integration tests for MachineRegistry on the redb store.

#![cfg(feature = "redb")]

#[path = "../registry/support.rs"]
mod support;

use laundry_registry::{
    MachineFilter, MachineRegistry, MachineService, MachineStatus, RedbDocumentStore,
    RegistryConfig,
};
use support::washer;
use tempfile::TempDir;

fn registry() -> (TempDir, MachineRegistry<RedbDocumentStore>) {
    let dir = tempfile::tempdir().unwrap();
    let store = RedbDocumentStore::open(&dir.path().join("machines.redb")).unwrap();
    (dir, MachineRegistry::new(store))
}

#[test]
fn create_succeeds_once_per_position() {
    let (_dir, registry) = registry();
    support::check_create_once(&registry);
}

#[test]
fn find_by_filter() {
    let (_dir, registry) = registry();
    support::check_find(&registry);
}

#[test]
fn negative_duration_is_rejected_before_storage() {
    let (_dir, registry) = registry();
    support::check_negative_duration_rejected(&registry);
}

#[test]
fn update_merges_only_listed_fields() {
    let (_dir, registry) = registry();
    support::check_update(&registry);
}

#[test]
fn start_and_stop() {
    let (_dir, registry) = registry();
    support::check_start_stop(&registry);
}

#[test]
fn delete_removes_and_returns_machine() {
    let (_dir, registry) = registry();
    support::check_delete(&registry);
}

#[test]
fn machines_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("machines.redb");
    {
        let registry = MachineRegistry::new(RedbDocumentStore::open(&path).unwrap());
        registry.create(&washer(0, 0)).unwrap();
        registry.start(0, 0).unwrap();
    }

    let registry = MachineRegistry::new(RedbDocumentStore::open(&path).unwrap());
    let busy = registry
        .find(&MachineFilter::new().status(MachineStatus::InUse))
        .unwrap();
    assert_eq!(busy.len(), 1);
    assert_eq!((busy[0].floor, busy[0].pos), (0, 0));
}

#[test]
fn configured_store_backs_a_registry() {
    let dir = tempfile::tempdir().unwrap();
    let config = RegistryConfig {
        store: "redb".into(),
        redb_path: dir.path().join("configured.redb"),
        ..RegistryConfig::default()
    };

    let registry = MachineRegistry::new(config.open_store().unwrap());
    registry.create(&washer(2, 0)).unwrap();
    assert_eq!(registry.find(&MachineFilter::new().floor(2)).unwrap().len(), 1);
}
