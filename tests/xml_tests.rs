use xmlcontacts::model::*;
use xmlcontacts::xml::tree;
use xmlcontacts::xml::XmlContactStore;

fn store() -> (XmlContactStore, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let store = XmlContactStore::new(dir.path().join("contacts_xml").join("contacts.xml"));
    (store, dir)
}

fn contact(name: &str, address: Option<&str>) -> NewContact {
    NewContact {
        name: name.into(),
        phone: "+1 555-1234".into(),
        email: "ann@x.com".into(),
        address: address.map(String::from),
    }
}

#[test]
fn read_all_of_missing_file_is_empty() {
    let (store, _dir) = store();
    assert!(store.read_all().is_empty());
    assert!(store.try_read_all().unwrap().is_empty());
}

#[test]
fn append_creates_document_and_directory() {
    let (store, _dir) = store();
    store.append(&contact("Ann Lee", Some("1 Main St"))).unwrap();

    let text = std::fs::read_to_string(store.path()).unwrap();
    assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));

    let root = tree::parse(&text).unwrap();
    assert_eq!(root.name, "Contacts");
    let records: Vec<_> = root.children_named("Contact").collect();
    assert_eq!(records.len(), 1);
    let tags: Vec<_> = records[0].elements().map(|e| e.name.as_str()).collect();
    assert_eq!(tags, vec!["Name", "Phone", "Email", "Address"]);
}

#[test]
fn append_then_read_all_returns_submitted_fields() {
    let (store, _dir) = store();
    store.append(&contact("Ann Lee", None)).unwrap();

    let all = store.read_all();
    assert_eq!(
        all,
        vec![XmlContact {
            name: "Ann Lee".into(),
            phone: "+1 555-1234".into(),
            email: "ann@x.com".into(),
            address: String::new(),
        }]
    );
}

#[test]
fn append_adds_records_at_the_end_in_order() {
    let (store, _dir) = store();
    for name in ["First", "Second", "Third"] {
        store.append(&contact(name, None)).unwrap();
    }
    let names: Vec<_> = store.read_all().into_iter().map(|c| c.name).collect();
    assert_eq!(names, vec!["First", "Second", "Third"]);
}

#[test]
fn append_identical_contact_twice_keeps_both() {
    let (store, _dir) = store();
    let c = contact("Ann Lee", Some("Home"));
    store.append(&c).unwrap();
    store.append(&c).unwrap();

    let all = store.read_all();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0], all[1]);
}

#[test]
fn append_preserves_foreign_content_of_existing_document() {
    let (store, _dir) = store();
    std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    std::fs::write(
        store.path(),
        "<?xml version=\"1.0\"?>\n<Contacts source=\"import\"><Note>keep me</Note></Contacts>",
    )
    .unwrap();

    store.append(&contact("Ann Lee", None)).unwrap();

    let root = tree::parse_file(store.path()).unwrap();
    assert_eq!(root.attributes, vec![("source".to_string(), "import".to_string())]);
    assert_eq!(root.child("Note").unwrap().text().unwrap(), "keep me");
    assert_eq!(root.elements().last().unwrap().name, "Contact");
}

#[test]
fn append_escapes_markup_in_values() {
    let (store, _dir) = store();
    store.append(&contact("Ann Lee", Some("<b>Tom & Jerry</b>"))).unwrap();
    assert_eq!(store.read_all()[0].address, "<b>Tom & Jerry</b>");
}

#[test]
fn append_to_malformed_document_fails_and_leaves_it_alone() {
    let (store, _dir) = store();
    std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    std::fs::write(store.path(), "<Contacts><Contact>").unwrap();

    assert!(store.append(&contact("Ann Lee", None)).is_err());
    assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "<Contacts><Contact>");
}

#[test]
fn read_all_of_malformed_document_is_empty() {
    let (store, _dir) = store();
    std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    std::fs::write(store.path(), "not xml at all").unwrap();

    assert!(store.read_all().is_empty());
    assert!(store.try_read_all().is_err());
}

#[test]
fn read_all_tolerates_missing_fields() {
    let (store, _dir) = store();
    std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    std::fs::write(
        store.path(),
        "<Contacts><Contact><Name>Bo</Name></Contact><Contact/></Contacts>",
    )
    .unwrap();

    let all = store.read_all();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].name, "Bo");
    assert_eq!(all[0].phone, "");
    assert_eq!(all[1], XmlContact::default());
}

#[test]
fn read_all_only_reads_direct_children_of_root() {
    let (store, _dir) = store();
    std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    std::fs::write(
        store.path(),
        "<Contacts><Group><Contact><Name>Nested</Name></Contact></Group><Contact><Name>Top</Name></Contact></Contacts>",
    )
    .unwrap();

    let names: Vec<_> = store.read_all().into_iter().map(|c| c.name).collect();
    assert_eq!(names, vec!["Top"]);
}

#[test]
fn no_temporary_file_is_left_behind() {
    let (store, _dir) = store();
    store.append(&contact("Ann Lee", None)).unwrap();
    let entries: Vec<_> = std::fs::read_dir(store.path().parent().unwrap())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries, vec!["contacts.xml"]);
}
