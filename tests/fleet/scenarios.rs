use fleet_monitor::envelope::{self, Paging, RequestContext};
use fleet_monitor::{
    project, DumpTruck, DumpTruckInput, EntityKind, Page, ServiceError, TruckFilter, TruckModel,
};
use serde_json::json;

use crate::support::Fleet;

// ============================================================================
// Scenarios A-E
// ============================================================================

#[test]
fn truck_within_capacity() {
    let fleet = Fleet::new();
    let belaz = fleet.model("BELAZ", 120);
    assert_eq!(belaz.id, 1);

    let truck = fleet.truck("101", 100, belaz.id);
    let figures = truck.load_figures().unwrap();
    assert_eq!(figures.load_percentage, 83.33);
    assert!(!figures.is_overloaded);
    assert_eq!(figures.overload_percentage, 0.0);

    let projected = project(&truck);
    assert_eq!(projected["board_number"], "101");
    assert_eq!(projected["model"]["name"], "BELAZ");
    assert_eq!(projected["is_overloaded"], false);
}

#[test]
fn overloaded_truck() {
    let fleet = Fleet::new();
    let belaz = fleet.model("BELAZ", 120);

    let truck = fleet.truck("102", 125, belaz.id);
    let projected = project(&truck);
    assert_eq!(projected["load_percentage"], json!(104.17));
    assert_eq!(projected["overload_percentage"], json!(4.17));
    assert_eq!(projected["is_overloaded"], true);
}

#[test]
fn model_names_collide_ignoring_case() {
    let fleet = Fleet::new();
    fleet.model("BELAZ", 120);

    let err = fleet
        .models
        .create(TruckModel::new("belaz", 50))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::DuplicateKey {
            entity: EntityKind::Model,
            ..
        }
    ));
    assert_eq!(err.status_code(), 409);
    assert_eq!(err.error_code(), "DuplicateModelName");
}

#[test]
fn model_in_use_cannot_be_deleted() {
    let fleet = Fleet::new();
    let belaz = fleet.model("BELAZ", 120);
    let a = fleet.truck("101", 100, belaz.id);
    let b = fleet.truck("102", 125, belaz.id);

    let err = fleet.models.delete(belaz.id).unwrap_err();
    assert!(matches!(err, ServiceError::InUse { id, .. } if id == belaz.id));

    fleet.trucks.delete(a.row.id).unwrap();
    assert!(fleet.models.delete(belaz.id).is_err());
    fleet.trucks.delete(b.row.id).unwrap();
    fleet.models.delete(belaz.id).unwrap();

    assert!(matches!(
        fleet.models.get(belaz.id),
        Err(ServiceError::NotFound { .. })
    ));
}

#[test]
fn middle_page_links_both_ways() {
    let fleet = Fleet::new();
    let belaz = fleet.model("BELAZ", 120);
    for board in ["101", "102", "103"] {
        fleet.truck(board, 60, belaz.id);
    }

    let (trucks, total) = fleet
        .trucks
        .list(&TruckFilter::default(), Page::from_number(2, 1))
        .unwrap();
    assert_eq!(trucks.len(), 1);
    assert_eq!(trucks[0].row.data.board_number, "102");

    let request = RequestContext::parse("http://fleet.local/api/v1/trucks?page=2&per_page=1");
    let response = envelope::success(
        Some(project(&trucks)),
        Some(Paging {
            total: total as u64,
            page: 2,
            per_page: 1,
        }),
        Some(&request),
        200,
    );
    let body = response.to_json();
    assert_eq!(body["meta"]["total_pages"], 3);
    assert_eq!(
        body["links"]["prev"],
        "http://fleet.local/api/v1/trucks?page=1&per_page=1"
    );
    assert_eq!(
        body["links"]["next"],
        "http://fleet.local/api/v1/trucks?page=3&per_page=1"
    );
}

// ============================================================================
// Ordering and idempotence
// ============================================================================

#[test]
fn missing_reference_beats_duplicate_board_number() {
    let fleet = Fleet::new();
    let belaz = fleet.model("BELAZ", 120);
    fleet.truck("101", 100, belaz.id);

    let err = fleet
        .trucks
        .create(DumpTruck::new("101", 10, 99))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::ReferenceNotFound { id: 99, .. }
    ));
}

#[test]
fn update_with_own_key_is_not_a_duplicate() {
    let fleet = Fleet::new();
    let belaz = fleet.model("BELAZ", 120);
    let truck = fleet.truck("101", 100, belaz.id);

    let updated = fleet
        .trucks
        .update(truck.row.id, DumpTruck::new("101", 130, belaz.id))
        .unwrap();
    assert!(updated.row.updated_at.is_some());
    assert!(updated.load_figures().unwrap().is_overloaded);

    let renamed = fleet
        .models
        .update(belaz.id, TruckModel::new("Belaz", 120))
        .unwrap();
    assert_eq!(renamed.data.name, "Belaz");
}

#[test]
fn board_numbers_are_normalized_before_the_uniqueness_check() {
    let fleet = Fleet::new();
    let belaz = fleet.model("BELAZ", 120);
    fleet.truck("K103", 0, belaz.id);

    let input: DumpTruckInput =
        serde_json::from_value(json!({"model_id": belaz.id, "board_number": " k103 "})).unwrap();
    let truck = input.validate().unwrap();
    assert_eq!(truck.board_number, "K103");
    assert_eq!(truck.current_weight, 0);

    let err = fleet.trucks.create(truck).unwrap_err();
    assert_eq!(err.error_code(), "DuplicateBoardNumber");
}

#[test]
fn model_name_filter_counts_like_it_pages() {
    let fleet = Fleet::new();
    let belaz = fleet.model("BELAZ", 120);
    let komatsu = fleet.model("Komatsu", 110);
    fleet.truck("101", 100, belaz.id);
    fleet.truck("102", 125, belaz.id);
    fleet.truck("K103", 120, komatsu.id);

    let filter = TruckFilter {
        model_name: Some("bel".into()),
        ..TruckFilter::default()
    };
    let (trucks, total) = fleet.trucks.list(&filter, Page::new(1, 10)).unwrap();
    assert_eq!(total, 2);
    assert_eq!(trucks.len(), 1);
    assert_eq!(trucks[0].row.data.board_number, "102");

    let (models, total) = fleet.models.list(Page::all()).unwrap();
    assert_eq!(total, 2);
    let names: Vec<_> = models.iter().map(|m| m.data.name.as_str()).collect();
    assert_eq!(names, vec!["BELAZ", "Komatsu"]);
}
