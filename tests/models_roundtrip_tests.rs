//! Round-trip tests for the persisted document shape.

use amr_schemas::api::{AmrParameters, Schema, SchemaId, TransportationCost, UserId, WorkStation};

fn populated_schema() -> Schema {
    let assembly = WorkStation::new("assembly", 3.0, 0.0, 0.0);
    let packing = WorkStation::new("packing", 5.5, 10.0, -4.0);
    let buffer = WorkStation::new("buffer", 1.25, -2.0, 7.5);

    let mut schema = Schema::new(Some(SchemaId::new(12)), UserId::new(4));
    schema.add_workstation(assembly.clone());
    schema.add_workstation(packing.clone());
    schema.add_workstation(buffer.clone());
    schema.set_transportation_cost(TransportationCost::new(
        assembly.clone(),
        packing.clone(),
        14.0,
    ));
    schema.set_transportation_cost(TransportationCost::new(packing, buffer, 3.75));
    schema.set_amr_parameters(AmrParameters::new(6, 120.0));
    schema
}

#[test]
fn document_shape_matches_the_persisted_form() {
    let value = serde_json::to_value(populated_schema()).unwrap();

    assert_eq!(value["id"], 12);
    assert_eq!(value["user_id"], 4);
    assert_eq!(value["workstations"].as_array().unwrap().len(), 3);
    assert_eq!(
        value["transportation_costs"][0]["from_station"]["name"],
        "assembly"
    );
    assert_eq!(value["amr_parameters"]["quantity"], 6);
    assert_eq!(value["amr_parameters"]["capacity"], 120.0);
}

#[test]
fn roundtrip_preserves_structural_equality() {
    let schema = populated_schema();
    let json = serde_json::to_string(&schema).unwrap();
    let decoded: Schema = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, schema);
}

#[test]
fn roundtrip_without_amr_parameters() {
    let mut schema = Schema::new(Some(SchemaId::new(1)), UserId::new(1));
    schema.add_workstation(WorkStation::new("solo", 9.0, 1.0, 1.0));

    let value = serde_json::to_value(&schema).unwrap();
    assert!(value["amr_parameters"].is_null());

    let decoded: Schema = serde_json::from_value(value).unwrap();
    assert_eq!(decoded, schema);
    assert!(decoded.amr_parameters().is_none());
}

#[test]
fn roundtrip_of_an_empty_schema() {
    let schema = Schema::new(Some(SchemaId::new(2)), UserId::new(8));
    let json = serde_json::to_string(&schema).unwrap();
    let decoded: Schema = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, schema);
}

#[test]
fn duplicate_entries_in_a_stored_document_collapse_on_read() {
    let station = serde_json::json!({"name": "a", "demand": 1.0, "x": 0.0, "y": 0.0});
    let cost = serde_json::json!({
        "from_station": station,
        "to_station": {"name": "b", "demand": 2.0, "x": 1.0, "y": 1.0},
        "cost": 5.0
    });
    let document = serde_json::json!({
        "id": 3,
        "user_id": 1,
        "workstations": [station, station],
        "transportation_costs": [cost, cost],
        "amr_parameters": null
    });

    let schema: Schema = serde_json::from_value(document).unwrap();
    assert_eq!(schema.workstations().len(), 1);
    assert_eq!(schema.transportation_costs().len(), 1);
}
