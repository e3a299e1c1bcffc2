//! Shared fixtures and backend-independent registry checks.
//!
//! Each `check_*` function runs against any `MachineService`, so the same
//! behaviour is asserted for every store backend.

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use laundry_registry::{
    Machine, MachineFilter, MachineService, MachineStatus, MachineType, MachineUpdate,
    RegistryError,
};

pub fn at(hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 4, 12, hour, min, 0).unwrap()
}

pub fn machine(floor: i32, pos: i32, machine_type: MachineType, status: MachineStatus) -> Machine {
    Machine::new(floor, pos, machine_type, status, Duration::minutes(45))
        .with_last_started_at(at(8, 0))
}

pub fn washer(floor: i32, pos: i32) -> Machine {
    machine(floor, pos, MachineType::Washer, MachineStatus::Idle)
}

pub fn dryer(floor: i32, pos: i32) -> Machine {
    machine(floor, pos, MachineType::Dryer, MachineStatus::Idle)
}

pub fn positions(machines: &[Machine]) -> Vec<(i32, i32)> {
    let mut positions: Vec<_> = machines.iter().map(|m| (m.floor, m.pos)).collect();
    positions.sort_unstable();
    positions
}

pub fn check_create_once(service: &impl MachineService) {
    let first = washer(0, 0);
    service.create(&first).unwrap();

    let second = machine(0, 0, MachineType::Dryer, MachineStatus::Error);
    let err = service.create(&second).unwrap_err();
    assert!(matches!(err, RegistryError::Conflict { floor: 0, pos: 0 }));

    let stored = service.find(&MachineFilter::new()).unwrap();
    assert_eq!(stored, vec![first]);
}

pub fn check_find(service: &impl MachineService) {
    assert!(service.find(&MachineFilter::new()).unwrap().is_empty());

    let idle_washer = washer(0, 0);
    let busy_dryer = machine(0, 1, MachineType::Dryer, MachineStatus::InUse);
    service.create(&idle_washer).unwrap();
    service.create(&busy_dryer).unwrap();

    let all = service.find(&MachineFilter::new()).unwrap();
    assert_eq!(positions(&all), vec![(0, 0), (0, 1)]);

    let idle = service
        .find(&MachineFilter::new().status(MachineStatus::Idle))
        .unwrap();
    assert_eq!(idle, vec![idle_washer]);

    let dryers = service
        .find(&MachineFilter::new().floor(0).machine_type(MachineType::Dryer))
        .unwrap();
    assert_eq!(dryers, vec![busy_dryer]);

    let nothing = service
        .find(
            &MachineFilter::new()
                .floor(0)
                .pos(1)
                .machine_type(MachineType::Washer)
                .status(MachineStatus::Finishing),
        )
        .unwrap();
    assert!(nothing.is_empty());
}

pub fn check_update(service: &impl MachineService) {
    let original = washer(2, 3);
    service.create(&original).unwrap();

    let unchanged = service.update(2, 3, &MachineUpdate::new()).unwrap();
    assert_eq!(unchanged, original);

    let updated = service
        .update(2, 3, &MachineUpdate::new().status(MachineStatus::InUse))
        .unwrap();
    assert_eq!(updated.status, MachineStatus::InUse);
    assert_eq!(updated.floor, original.floor);
    assert_eq!(updated.pos, original.pos);
    assert_eq!(updated.machine_type, original.machine_type);
    assert_eq!(updated.duration, original.duration);
    assert_eq!(updated.last_started_at, original.last_started_at);

    let stored = service.find(&MachineFilter::new().floor(2).pos(3)).unwrap();
    assert_eq!(stored, vec![updated]);

    let err = service
        .update(9, 9, &MachineUpdate::new().status(MachineStatus::Idle))
        .unwrap_err();
    assert!(matches!(err, RegistryError::NotFound { floor: 9, pos: 9 }));
}

pub fn check_start_stop(service: &impl MachineService) {
    service.create(&dryer(1, 0)).unwrap();

    let before = Utc::now();
    let started = service.start(1, 0).unwrap();
    assert_eq!(started.status, MachineStatus::InUse);
    assert!(started.last_started_at >= before);

    let stopped = service.stop(1, 0).unwrap();
    assert_eq!(stopped.status, MachineStatus::Idle);
    assert_eq!(stopped.last_started_at, started.last_started_at);

    // self-transitions are allowed
    assert_eq!(service.stop(1, 0).unwrap().status, MachineStatus::Idle);

    assert!(service.start(1, 7).unwrap_err().is_not_found());
    assert!(service.stop(1, 7).unwrap_err().is_not_found());
}

pub fn check_delete(service: &impl MachineService) {
    let machine = dryer(3, 1);
    service.create(&machine).unwrap();

    assert_eq!(service.delete(3, 1).unwrap(), machine);
    assert!(service.find(&MachineFilter::new()).unwrap().is_empty());
    assert!(matches!(
        service.delete(3, 1),
        Err(RegistryError::NotFound { floor: 3, pos: 1 })
    ));

    // the position is free again
    service.create(&washer(3, 1)).unwrap();
}

pub fn check_negative_duration_rejected(service: &impl MachineService) {
    let bad = Machine::new(0, 1, MachineType::Dryer, MachineStatus::Idle, Duration::seconds(-5));
    assert!(matches!(
        service.create(&bad),
        Err(RegistryError::InvalidInput(_))
    ));
    assert!(service.find(&MachineFilter::new()).unwrap().is_empty());

    let machine = washer(0, 0);
    service.create(&machine).unwrap();
    let err = service
        .update(0, 0, &MachineUpdate::new().duration(Duration::seconds(-1)))
        .unwrap_err();
    assert!(matches!(err, RegistryError::InvalidInput(_)));

    // nothing bad was written, so the whole registry still reads back
    assert_eq!(service.find(&MachineFilter::new()).unwrap(), vec![machine]);
}
