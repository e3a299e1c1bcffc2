//! Integration tests for MachineRegistry on the in-memory store.

mod support;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use chrono::Duration;
use laundry_registry::{
    DocumentStore, InMemoryDocumentStore, ManualClock, MachineFilter, MachineRegistry,
    MachineService, MachineStatus, MachineType, MachineUpdate, MachineUpdateRecord,
    RegistryError,
};
use serde_json::json;
use support::{at, dryer, machine, positions, washer};

fn registry() -> MachineRegistry<InMemoryDocumentStore> {
    MachineRegistry::new(InMemoryDocumentStore::new())
}

#[test]
fn create_succeeds_once_per_position() {
    support::check_create_once(&registry());
}

#[test]
fn find_by_filter() {
    support::check_find(&registry());
}

#[test]
fn negative_duration_is_rejected_before_storage() {
    support::check_negative_duration_rejected(&registry());
}

#[test]
fn update_merges_only_listed_fields() {
    support::check_update(&registry());
}

#[test]
fn start_and_stop() {
    support::check_start_stop(&registry());
}

#[test]
fn delete_removes_and_returns_machine() {
    support::check_delete(&registry());
}

#[test]
fn conflict_leaves_stored_document_untouched() {
    let registry = registry();
    registry.create(&washer(0, 0)).unwrap();
    let before = registry.store().get("machine:0:0").unwrap();

    let err = registry.create(&dryer(0, 0)).unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(err.status_code(), 400);
    assert_eq!(registry.store().get("machine:0:0").unwrap(), before);
}

#[test]
fn start_stamps_clock_time() {
    let clock = ManualClock::new(at(9, 0));
    let registry = MachineRegistry::with_clock(InMemoryDocumentStore::new(), clock.clone());
    registry.create(&washer(0, 0)).unwrap();

    clock.set(at(18, 45));
    let started = registry.start(0, 0).unwrap();
    assert_eq!(started.status, MachineStatus::InUse);
    assert_eq!(started.last_started_at, at(18, 45));
    assert_eq!(started.duration, Duration::minutes(45));
}

#[test]
fn wire_patch_applies_present_fields() {
    let registry = registry();
    registry.create(&washer(1, 2)).unwrap();

    let record: MachineUpdateRecord =
        serde_json::from_value(json!({ "duration": 1500, "status": "finishing" })).unwrap();
    let patch = MachineUpdate::try_from(record).unwrap();
    let updated = registry.update(1, 2, &patch).unwrap();

    assert_eq!(updated.duration, Duration::seconds(1500));
    assert_eq!(updated.status, MachineStatus::Finishing);
    assert_eq!(updated.last_started_at, at(8, 0));

    let stored = registry.store().get("machine:1:2").unwrap().unwrap();
    assert_eq!(stored["duration"], json!(1500));
    assert_eq!(stored["status"], json!("finishing"));
}

#[test]
fn invalid_wire_patch_never_reaches_the_store() {
    let record: MachineUpdateRecord = serde_json::from_value(json!({ "duration": -30 })).unwrap();
    let err = MachineUpdate::try_from(record).unwrap_err();
    assert!(matches!(err, RegistryError::InvalidInput(_)));
    assert_eq!(err.status_code(), 422);
}

#[test]
fn find_returns_at_most_one_page() {
    let registry = registry();
    for pos in 0..25 {
        registry.create(&washer(4, pos)).unwrap();
    }

    let found = registry.find(&MachineFilter::new().floor(4)).unwrap();
    assert_eq!(found.len(), 20);
    // first page in insertion order
    assert_eq!(found[0].pos, 0);
    assert_eq!(found[19].pos, 19);
}

#[test]
fn find_by_duration_bounds() {
    let registry = registry();
    let quick = washer(0, 0);
    let mut long = washer(0, 1);
    long.duration = Duration::minutes(90);
    registry.create(&quick).unwrap();
    registry.create(&long).unwrap();

    let found = registry
        .find(&MachineFilter::new().min_duration(Duration::hours(1)))
        .unwrap();
    assert_eq!(found, vec![long]);

    let found = registry
        .find(&MachineFilter::new().max_duration(Duration::minutes(45)))
        .unwrap();
    assert_eq!(found, vec![quick]);
}

#[test]
fn type_is_not_part_of_identity() {
    let registry = registry();
    registry.create(&dryer(5, 5)).unwrap();
    assert!(registry.create(&washer(5, 5)).unwrap_err().is_conflict());

    registry.create(&washer(5, 6)).unwrap();
    let all = registry.find(&MachineFilter::new().floor(5)).unwrap();
    assert_eq!(positions(&all), vec![(5, 5), (5, 6)]);
}

#[test]
fn concurrent_creates_have_one_winner() {
    let registry = Arc::new(registry());
    let threads = 8;
    let barrier = Arc::new(Barrier::new(threads));
    let wins = Arc::new(AtomicUsize::new(0));
    let conflicts = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..threads)
        .map(|i| {
            let registry = Arc::clone(&registry);
            let barrier = Arc::clone(&barrier);
            let wins = Arc::clone(&wins);
            let conflicts = Arc::clone(&conflicts);
            thread::spawn(move || {
                let machine_type = if i % 2 == 0 {
                    MachineType::Washer
                } else {
                    MachineType::Dryer
                };
                let candidate = machine(7, 0, machine_type, MachineStatus::Idle);
                barrier.wait();
                match registry.create(&candidate) {
                    Ok(()) => wins.fetch_add(1, Ordering::SeqCst),
                    Err(RegistryError::Conflict { .. }) => conflicts.fetch_add(1, Ordering::SeqCst),
                    Err(other) => panic!("unexpected error: {}", other),
                };
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(wins.load(Ordering::SeqCst), 1);
    assert_eq!(conflicts.load(Ordering::SeqCst), threads - 1);
    assert_eq!(registry.find(&MachineFilter::new()).unwrap().len(), 1);
}

#[test]
fn registry_works_through_trait_object() {
    let service: Box<dyn MachineService> = Box::new(registry());
    service.create(&washer(0, 0)).unwrap();
    let stopped = service.stop(0, 0).unwrap();
    assert_eq!(stopped.status, MachineStatus::Idle);
}
