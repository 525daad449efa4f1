//! End-to-end flows through the public API against a real file.

use mogu::dispatch::{Command, ListingKind, Rejection};
use mogu::event::CommandEvent;
use mogu::render::render;
use mogu::{Dispatcher, Invoker, NewRestaurant, Outcome, Store};

fn dispatcher(dir: &tempfile::TempDir) -> Dispatcher {
    Dispatcher::new(Store::new(dir.path().join("data").join("restaurants.json")))
}

fn tonkotsu_king() -> NewRestaurant {
    NewRestaurant {
        name: "Tonkotsu King".to_string(),
        area: "Hongdae".to_string(),
        genre: "Ramen".to_string(),
        review: "Rich broth, long wait".to_string(),
        memo: Some("Go before 6pm".to_string()),
    }
}

fn list_total(d: &Dispatcher) -> usize {
    match d.dispatch(&Invoker::member("viewer"), Command::List).unwrap() {
        Outcome::Listing(listing) => listing.total,
        other => panic!("expected listing, got {other:?}"),
    }
}

#[test]
fn test_add_list_duplicate_delete_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let d = dispatcher(&dir);
    let member = Invoker::member("u1");
    let admin = Invoker::admin("boss");

    let added = d.dispatch(&member, Command::Add(tonkotsu_king())).unwrap();
    let Outcome::Added { restaurant } = &added else {
        panic!("expected added, got {added:?}");
    };
    assert_eq!(restaurant.created_by, "u1");
    assert_eq!(restaurant.memo, "Go before 6pm");
    assert_eq!(list_total(&d), 1);

    let again = d.dispatch(&member, Command::Add(tonkotsu_king())).unwrap();
    assert!(matches!(
        again,
        Outcome::Rejected {
            reason: Rejection::Duplicate { .. }
        }
    ));
    assert_eq!(list_total(&d), 1);

    let deleted = d.dispatch(&admin, Command::Delete { position: 1 }).unwrap();
    let Outcome::Deleted { restaurant } = &deleted else {
        panic!("expected deleted, got {deleted:?}");
    };
    assert_eq!(restaurant.name, "Tonkotsu King");
    assert_eq!(restaurant.area, "Hongdae");
    assert_eq!(restaurant.genre, "Ramen");
    assert!(render(&deleted).content.contains("Tonkotsu King"));
    assert_eq!(list_total(&d), 0);

    let missing = d.dispatch(&admin, Command::Delete { position: 1 }).unwrap();
    assert!(matches!(
        missing,
        Outcome::Rejected {
            reason: Rejection::OutOfRange { position: 1, len: 0 }
        }
    ));
}

#[test]
fn test_state_survives_new_dispatcher() {
    let dir = tempfile::tempdir().unwrap();
    dispatcher(&dir)
        .dispatch(&Invoker::member("u1"), Command::Add(tonkotsu_king()))
        .unwrap();

    let reopened = dispatcher(&dir);
    assert_eq!(list_total(&reopened), 1);

    let raw = std::fs::read_to_string(dir.path().join("data").join("restaurants.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json[0]["name"], "Tonkotsu King");
    assert_eq!(json[0]["createdBy"], "u1");
    assert!(json[0]["createdAt"].as_str().unwrap().ends_with('Z'));
}

#[test]
fn test_member_cannot_delete() {
    let dir = tempfile::tempdir().unwrap();
    let d = dispatcher(&dir);
    d.dispatch(&Invoker::member("u1"), Command::Add(tonkotsu_king()))
        .unwrap();

    let outcome = d
        .dispatch(&Invoker::member("u1"), Command::Delete { position: 1 })
        .unwrap();
    assert!(matches!(
        outcome,
        Outcome::Rejected {
            reason: Rejection::PermissionDenied
        }
    ));
    assert_eq!(list_total(&d), 1);
}

#[test]
fn test_configured_admin_can_delete() {
    let dir = tempfile::tempdir().unwrap();
    let d = dispatcher(&dir).with_admins(vec!["owner".to_string()]);
    d.dispatch(&Invoker::member("u1"), Command::Add(tonkotsu_king()))
        .unwrap();

    let outcome = d
        .dispatch(&Invoker::member("owner"), Command::Delete { position: 1 })
        .unwrap();
    assert!(matches!(outcome, Outcome::Deleted { .. }));
}

#[test]
fn test_korean_events_drive_same_operations() {
    let dir = tempfile::tempdir().unwrap();
    let d = dispatcher(&dir);

    let run = |raw: &str| {
        let event = CommandEvent::from_json(raw).unwrap();
        d.dispatch(&event.invoker(), event.to_command().unwrap())
            .unwrap()
    };

    let added = run(
        r#"{"command": "/맛집추가", "user": {"id": "7"},
            "options": {"이름": "Tonkotsu King", "지역": "Hongdae", "장르": "Ramen",
                        "한줄평": "Rich broth, long wait", "메모": "Go before 6pm"}}"#,
    );
    assert!(matches!(added, Outcome::Added { .. }));

    let found = run(
        r#"{"command": "맛집검색", "user": {"id": "8"}, "options": {"키워드": "  RAMEN "}}"#,
    );
    let Outcome::Listing(listing) = found else {
        panic!("expected listing");
    };
    assert_eq!(
        listing.kind,
        ListingKind::Search {
            keyword: "  RAMEN ".to_string()
        }
    );
    assert_eq!(listing.entries[0].number, 1);
    assert!(render(&Outcome::Listing(listing)).ephemeral);

    let deleted = run(
        r#"{"command": "맛집삭제", "user": {"id": "9", "admin": true}, "options": {"번호": 1}}"#,
    );
    assert!(matches!(deleted, Outcome::Deleted { .. }));

    let listed = run(r#"{"command": "맛집리스트", "user": {"id": "9"}}"#);
    assert!(matches!(listed, Outcome::Listing(ref l) if l.total == 0));
}

#[test]
fn test_listing_is_capped_but_counts_everything() {
    let dir = tempfile::tempdir().unwrap();
    let d = dispatcher(&dir);
    let member = Invoker::member("u1");

    for i in 0..25 {
        let input = NewRestaurant {
            name: format!("Place {i}"),
            area: "Seongsu".to_string(),
            genre: "Cafe".to_string(),
            review: "Fine".to_string(),
            memo: None,
        };
        d.dispatch(&member, Command::Add(input)).unwrap();
    }

    let Outcome::Listing(listing) = d.dispatch(&member, Command::List).unwrap() else {
        panic!("expected listing");
    };
    assert_eq!(listing.total, 25);
    assert_eq!(listing.entries.len(), mogu::dispatch::DISPLAY_LIMIT);
    assert_eq!(listing.entries[19].restaurant.name, "Place 19");
    assert!(listing.is_truncated());
}
