//! Staff account records and the auth wire DTOs.

use atelier_derive::api_model;

/// A staff account, as the API returns it. Never carries credentials.
#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct StaffUser {
    pub id: String,
    pub email: String,
    pub display_name: String,
    /// RFC 3339 UTC timestamp recorded at account creation.
    pub created_at: String,
}

/// `POST /api/auth/sign-in` body.
#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Successful sign-in: the bearer token plus the signed-in account.
#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct SessionResponse {
    pub token: String,
    pub user: StaffUser,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_serializes_in_camel_case_without_credentials() {
        let user = StaffUser {
            id: "u1".into(),
            email: "admin@atelier.dev".into(),
            display_name: "Studio Admin".into(),
            created_at: "2026-01-05T12:00:00Z".into(),
        };

        let json = serde_json::to_value(&user).expect("serialize");
        assert_eq!(json["displayName"], "Studio Admin");
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("salt").is_none());
    }

    #[test]
    fn sign_in_request_rejects_unknown_fields() {
        let raw = r#"{"email":"a@b.c","password":"pw","role":"root"}"#;
        assert!(serde_json::from_str::<SignInRequest>(raw).is_err());
    }
}
