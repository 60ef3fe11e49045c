use crate::support::{connected_facade, open_session, report_settings, report_state};
use cnckit_core::{ControllerFamily, Position};
use serde_json::json;

#[test]
fn test_grbl_millimeter_reports_untouched() {
    let (facade, _connector, transport) = connected_facade();
    open_session(&transport, "port-1");
    report_settings(&transport, "Grbl", json!({"settings": {"$13": "0"}}));
    report_state(
        &transport,
        "Grbl",
        json!({"mpos": {"x": "1.000", "y": "-2.500", "z": "0.100"}}),
    );

    let mpos = facade.machine_position();
    assert_eq!(mpos.x(), "1.000");
    assert_eq!(mpos.y(), "-2.500");
    assert_eq!(mpos.z(), "0.100");
    assert_eq!(mpos.a(), "0.000");
}

#[test]
fn test_grbl_inch_reports_converted() {
    let (facade, _connector, transport) = connected_facade();
    report_settings(&transport, "Grbl", json!({"settings": {"$13": "1"}}));
    report_state(
        &transport,
        "Grbl",
        json!({
            "mpos": {"x": "1.000", "y": "0.500"},
            "wpos": {"x": "-0.250"}
        }),
    );

    let mpos = facade.machine_position();
    assert_eq!(mpos.x(), "25.400");
    assert_eq!(mpos.y(), "12.700");
    assert_eq!(mpos.z(), "0.000");
    assert_eq!(facade.work_position().x(), "-6.350");
}

#[test]
fn test_grbl_top_level_setting_fallback() {
    let (facade, _connector, transport) = connected_facade();
    report_settings(&transport, "Grbl", json!({"$13": 1}));
    report_state(&transport, "Grbl", json!({"wpos": {"z": "2.000"}}));

    assert_eq!(facade.work_position().z(), "50.800");
}

#[test]
fn test_grbl_ignores_modal_units() {
    let (facade, _connector, transport) = connected_facade();
    report_settings(&transport, "Grbl", json!({"settings": {"$13": "0"}}));
    report_state(
        &transport,
        "Grbl",
        json!({"mpos": {"x": "1.000"}, "modal": {"units": "G20"}}),
    );

    assert_eq!(facade.machine_position().x(), "1.000");
}

#[test]
fn test_smoothie_follows_modal_units() {
    let (facade, _connector, transport) = connected_facade();
    report_state(
        &transport,
        "Smoothie",
        json!({
            "mpos": {"x": "2.000"},
            "wpos": {"y": "1.000"},
            "modal": {"units": "G20"}
        }),
    );

    assert_eq!(facade.controller_family(), ControllerFamily::Smoothie);
    assert_eq!(facade.machine_position().x(), "50.800");
    assert_eq!(facade.work_position().y(), "25.400");

    report_state(
        &transport,
        "Smoothie",
        json!({"mpos": {"x": "2.000"}, "modal": {"units": "G21"}}),
    );
    assert_eq!(facade.machine_position().x(), "2.000");
}

#[test]
fn test_tinyg_machine_position_always_metric() {
    let (facade, _connector, transport) = connected_facade();
    report_state(
        &transport,
        "TinyG",
        json!({
            "mpos": {"x": "1.000"},
            "wpos": {"x": "1.000"},
            "modal": {"units": "G20"}
        }),
    );

    assert_eq!(facade.machine_position().x(), "1.000");
    assert_eq!(facade.work_position().x(), "25.400");
}

#[test]
fn test_nested_status_positions() {
    let (facade, _connector, transport) = connected_facade();
    report_state(
        &transport,
        "Smoothie",
        json!({"status": {"mpos": {"x": "3.000"}, "wpos": {"x": "4.000"}}}),
    );

    assert_eq!(facade.machine_position().x(), "3.000");
    assert_eq!(facade.work_position().x(), "4.000");
}

#[test]
fn test_unparsable_axis_kept() {
    let (facade, _connector, transport) = connected_facade();
    report_settings(&transport, "Grbl", json!({"settings": {"$13": "1"}}));
    report_state(&transport, "Grbl", json!({"mpos": {"x": "n/a", "y": 1}}));

    let mpos = facade.machine_position();
    assert_eq!(mpos.x(), "n/a");
    assert_eq!(mpos.y(), "25.400");
}

#[test]
fn test_unknown_family_reports_zero() {
    let (facade, _connector, transport) = connected_facade();
    report_state(&transport, "Marlin", json!({"mpos": {"x": "9.000"}}));

    assert_eq!(facade.controller_family(), ControllerFamily::None);
    assert_eq!(facade.machine_position(), Position::default());
    assert_eq!(facade.work_position(), Position::default());
}

#[test]
fn test_controller_type_event_sets_family() {
    let (facade, _connector, transport) = connected_facade();
    transport.emit(cnckit_core::EventName::ControllerType, vec![json!("TinyG")]);
    assert_eq!(facade.controller_family(), ControllerFamily::TinyG);
}
