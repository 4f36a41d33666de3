use chrono::{Duration, TimeZone, Utc};
use xmlcontacts::db::*;
use xmlcontacts::error::ContactError;
use xmlcontacts::model::*;

fn contact(name: &str, phone: &str, email: &str, address: Option<&str>) -> NewContact {
    NewContact {
        name: name.into(),
        phone: phone.into(),
        email: email.into(),
        address: address.map(String::from),
    }
}

// ==========================================================================
// CONTACT REPO TESTS
// ==========================================================================

#[test]
fn contact_insert_and_find() {
    let conn = schema::test_connection();
    let ann = contact("Ann Lee", "+1 555-1234", "ann@x.com", Some("1 Main St"));

    let stored = contact_repo::insert(&conn, &ann).unwrap();
    let found = contact_repo::find_by_id(&conn, stored.id).unwrap().unwrap();

    assert_eq!(found.name, "Ann Lee");
    assert_eq!(found.phone, "+1 555-1234");
    assert_eq!(found.email, "ann@x.com");
    assert_eq!(found.address, Some("1 Main St".into()));
    assert_eq!(found.created_at, stored.created_at);
}

#[test]
fn contact_ids_are_assigned_by_the_store() {
    let conn = schema::test_connection();
    let a = contact_repo::insert(&conn, &contact("A", "1", "a@x.com", None)).unwrap();
    let b = contact_repo::insert(&conn, &contact("B", "2", "b@x.com", None)).unwrap();
    assert_ne!(a.id, b.id);
}

#[test]
fn contact_find_missing_returns_none() {
    let conn = schema::test_connection();
    assert!(contact_repo::find_by_id(&conn, Id::new(99)).unwrap().is_none());
}

#[test]
fn contact_insert_duplicate_triple_hits_constraint() {
    let conn = schema::test_connection();
    let ann = contact("Ann Lee", "+1 555-1234", "ann@x.com", None);
    contact_repo::insert(&conn, &ann).unwrap();

    let err = contact_repo::insert(&conn, &ann).unwrap_err();
    assert!(matches!(err, ContactError::DuplicateContact));
    assert_eq!(contact_repo::count(&conn).unwrap(), 1);
}

#[test]
fn contact_find_all_is_newest_first() {
    let conn = schema::test_connection();
    let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    contact_repo::insert_at(&conn, &contact("Old", "1", "old@x.com", None), t0).unwrap();
    contact_repo::insert_at(&conn, &contact("New", "2", "new@x.com", None), t0 + Duration::hours(2)).unwrap();
    contact_repo::insert_at(&conn, &contact("Mid", "3", "mid@x.com", None), t0 + Duration::hours(1)).unwrap();

    let names: Vec<_> = contact_repo::find_all(&conn)
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["New", "Mid", "Old"]);
}

#[test]
fn contact_same_timestamp_breaks_tie_by_id() {
    let conn = schema::test_connection();
    let t = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
    contact_repo::insert_at(&conn, &contact("First", "1", "f@x.com", None), t).unwrap();
    contact_repo::insert_at(&conn, &contact("Second", "2", "s@x.com", None), t).unwrap();

    let all = contact_repo::find_all(&conn).unwrap();
    assert_eq!(all[0].name, "Second");
}

#[test]
fn contact_update_keeps_created_at() {
    let conn = schema::test_connection();
    let t = Utc.with_ymd_and_hms(2023, 3, 3, 3, 3, 3).unwrap();
    let stored = contact_repo::insert_at(&conn, &contact("Ann", "1", "a@x.com", None), t).unwrap();

    let changed = contact_repo::update(&conn, stored.id, &contact("Anna", "2", "anna@x.com", Some("Home"))).unwrap();
    assert!(changed);

    let found = contact_repo::find_by_id(&conn, stored.id).unwrap().unwrap();
    assert_eq!(found.name, "Anna");
    assert_eq!(found.address, Some("Home".into()));
    assert_eq!(found.created_at, t);
}

#[test]
fn contact_update_missing_returns_false() {
    let conn = schema::test_connection();
    let changed = contact_repo::update(&conn, Id::new(5), &contact("A", "1", "a@x.com", None)).unwrap();
    assert!(!changed);
}

#[test]
fn contact_delete() {
    let conn = schema::test_connection();
    let stored = contact_repo::insert(&conn, &contact("Ann", "1", "a@x.com", None)).unwrap();

    assert!(contact_repo::delete(&conn, stored.id).unwrap());
    assert!(!contact_repo::delete(&conn, stored.id).unwrap());
    assert_eq!(contact_repo::count(&conn).unwrap(), 0);
}

// ==========================================================================
// SEARCH
// ==========================================================================

#[test]
fn search_matches_any_field_case_insensitively() {
    let conn = schema::test_connection();
    contact_repo::insert(&conn, &contact("Ann Lee", "111", "ann@x.com", None)).unwrap();
    contact_repo::insert(&conn, &contact("Bob Ray", "222", "bob@lee.org", None)).unwrap();
    contact_repo::insert(&conn, &contact("Cy Dee", "333", "cy@x.com", Some("Leeds Road"))).unwrap();
    contact_repo::insert(&conn, &contact("Di Fox", "444", "di@x.com", None)).unwrap();

    let mut names: Vec<_> = contact_repo::search(&conn, "LEE")
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    names.sort();
    assert_eq!(names, vec!["Ann Lee", "Bob Ray", "Cy Dee"]);

    let by_phone = contact_repo::search(&conn, "44").unwrap();
    assert_eq!(by_phone.len(), 1);
    assert_eq!(by_phone[0].name, "Di Fox");
}

#[test]
fn search_folds_non_ascii_case() {
    let conn = schema::test_connection();
    contact_repo::insert(&conn, &contact("Анна Ли", "1", "anna@x.com", None)).unwrap();

    let results = contact_repo::search(&conn, "анна").unwrap();
    assert_eq!(results.len(), 1);
}

#[test]
fn search_empty_query_returns_everything_newest_first() {
    let conn = schema::test_connection();
    let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    contact_repo::insert_at(&conn, &contact("A", "1", "a@x.com", None), t0).unwrap();
    contact_repo::insert_at(&conn, &contact("B", "2", "b@x.com", None), t0 + Duration::minutes(1)).unwrap();

    let all = contact_repo::search(&conn, "   ").unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].name, "B");
}

#[test]
fn search_treats_like_wildcards_literally() {
    let conn = schema::test_connection();
    contact_repo::insert(&conn, &contact("Ann", "1", "a@x.com", None)).unwrap();
    assert!(contact_repo::search(&conn, "%").unwrap().is_empty());
    assert!(contact_repo::search(&conn, "_").unwrap().is_empty());
}

// ==========================================================================
// DUPLICATE LOOKUP
// ==========================================================================

#[test]
fn exists_with_key_is_exact_and_case_sensitive() {
    let conn = schema::test_connection();
    let ann = contact("Ann Lee", "1", "ann@x.com", None);
    contact_repo::insert(&conn, &ann).unwrap();

    assert!(contact_repo::exists_with_key(&conn, ann.key(), None).unwrap());

    let upper = contact("ANN LEE", "1", "ann@x.com", None);
    assert!(!contact_repo::exists_with_key(&conn, upper.key(), None).unwrap());

    let partial = contact("Ann", "1", "ann@x.com", None);
    assert!(!contact_repo::exists_with_key(&conn, partial.key(), None).unwrap());
}

#[test]
fn exists_with_key_ignores_excluded_row() {
    let conn = schema::test_connection();
    let ann = contact("Ann Lee", "1", "ann@x.com", None);
    let stored = contact_repo::insert(&conn, &ann).unwrap();

    assert!(!contact_repo::exists_with_key(&conn, ann.key(), Some(stored.id)).unwrap());
    assert!(contact_repo::exists_with_key(&conn, ann.key(), Some(Id::new(stored.id.value + 1))).unwrap());
}
