use serde::{Deserialize, Serialize};

/// Request body for POST /auth/signup. At least one of email/phone must be
/// present; that rule is enforced in the handler, not here.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub message: String,
    pub user_id: i64,
}

/// Request body for POST /auth/login. `identifier` is an email or a phone
/// number; the lookup matches either column.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub identifier: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: PublicUser,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signup_request_accepts_phone_only() {
        let body = r#"{ "name": "A", "phone": "+1555", "password": "x" }"#;
        let req: SignupRequest = serde_json::from_str(body).expect("parses");
        assert!(req.email.is_none());
        assert_eq!(req.phone.as_deref(), Some("+1555"));
    }

    #[test]
    fn login_response_carries_bearer_token_type() {
        let response = LoginResponse {
            access_token: "t".into(),
            token_type: "bearer".into(),
            user: PublicUser {
                id: 1,
                name: "A".into(),
                email: None,
                phone: Some("+1555".into()),
            },
        };
        let json = serde_json::to_string(&response).expect("serializes");
        assert!(json.contains("\"token_type\":\"bearer\""));
        assert!(json.contains("\"email\":null"));
    }
}
