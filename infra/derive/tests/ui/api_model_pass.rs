use atelier_derive::api_model;

#[api_model]
pub struct LeadCard {
    pub id: String,
    pub display_name: String,
}

#[api_model(rename_all = "snake_case", deny_unknown_fields = false)]
pub struct LeadNote {
    pub body_text: String,
}

fn main() {
    let card = LeadCard { id: "q_1".to_owned(), display_name: "Avery".to_owned() };
    let json = serde_json::to_string(&card).unwrap();
    assert!(json.contains("displayName"), "camelCase policy applies: {json}");

    let strict: Result<LeadCard, _> =
        serde_json::from_str(r#"{"id":"q_2","displayName":"Sam","extra":1}"#);
    assert!(strict.is_err(), "unknown fields are rejected by default");

    let note: LeadNote = serde_json::from_str(r#"{"body_text":"call back","extra":true}"#).unwrap();
    assert_eq!(note.body_text, "call back");
}
