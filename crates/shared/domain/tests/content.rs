use atelier_domain::content;

#[test]
fn catalog_is_complete() {
    let site = content::catalog();
    assert_eq!(site.services.len(), 4);
    assert_eq!(site.process.len(), 5);
    assert_eq!(site.projects.len(), 3);
    assert_eq!(site.faq.len(), 6);
    assert_eq!(site.nav.len(), 3);
    assert_eq!(site.studio.name, "Atelier");
}

#[test]
fn service_keys_are_unique_and_anchor_safe() {
    let mut keys: Vec<&str> = content::SERVICES.iter().map(|s| s.key).collect();
    keys.sort_unstable();
    keys.dedup();
    assert_eq!(keys.len(), content::SERVICES.len());
    for key in keys {
        assert!(key.chars().all(|c| c.is_ascii_lowercase()));
    }
}

#[test]
fn process_steps_are_ordered() {
    let numbers: Vec<&str> = content::PROCESS_STEPS.iter().map(|s| s.number).collect();
    assert_eq!(numbers, ["01", "02", "03", "04", "05"]);
}

#[test]
fn footer_services_point_at_service_anchors() {
    for link in content::FOOTER.services {
        let (_, anchor) = link.href.split_once('#').expect("anchored href");
        assert!(content::SERVICES.iter().any(|s| s.key == anchor), "no service for {anchor}");
    }
}

#[test]
fn catalog_serializes_with_camel_case_hero() {
    let json = serde_json::to_value(content::catalog()).expect("serialize catalog");
    assert_eq!(json["hero"]["headlineAccent"], "works while you sleep.");
    assert_eq!(json["services"][0]["key"], "websites");
    assert_eq!(json["footer"]["legal"][0]["label"], "Privacy");
}
