use serde::{Deserialize, Serialize};

/// Request body for POST /waitlist/add. At least one of email/mobile must be
/// present; enforced in the handler.
#[derive(Debug, Deserialize)]
pub struct WaitlistRequest {
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub objectives: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WaitlistResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_first_name_is_required_by_the_shape() {
        let req: WaitlistRequest =
            serde_json::from_str(r#"{ "first_name": "A" }"#).expect("parses");
        assert!(req.email.is_none());
        assert!(req.mobile.is_none());
    }
}
