use crate::support::{connected_facade, open_session, report_state};
use serde_json::json;

#[test]
fn test_wcs_defaults_to_g54() {
    let (facade, _connector, transport) = connected_facade();
    assert_eq!(facade.work_coordinate_system(), "G54");

    report_state(&transport, "Grbl", json!({"modal": {}}));
    assert_eq!(facade.work_coordinate_system(), "G54");

    report_state(&transport, "Grbl", json!({"modal": {"wcs": ""}}));
    assert_eq!(facade.work_coordinate_system(), "G54");
}

#[test]
fn test_wcs_reported() {
    let (facade, _connector, transport) = connected_facade();
    for family in ["Grbl", "Smoothie", "TinyG"] {
        report_state(&transport, family, json!({"modal": {"wcs": "G56"}}));
        assert_eq!(facade.work_coordinate_system(), "G56", "{family}");
    }
}

#[test]
fn test_machine_state_needs_open_session() {
    let (facade, _connector, transport) = connected_facade();
    report_state(&transport, "Grbl", json!({"machineState": "Alarm"}));
    assert_eq!(facade.machine_state(), "");

    open_session(&transport, "port-1");
    report_state(&transport, "Grbl", json!({"machineState": "Alarm"}));
    assert_eq!(facade.machine_state(), "Alarm");
}
