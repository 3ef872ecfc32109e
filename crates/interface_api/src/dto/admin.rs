//! Admin action DTOs

use serde::{Deserialize, Serialize};

use domain_contact::CrmResult;

/// Denial message for a missing capability or a bad nonce
pub const PERMISSION_DENIED: &str = "You do not have permission to perform this action.";

#[derive(Debug, Serialize, Deserialize)]
pub struct AjaxMessage {
    pub message: String,
}

/// `{success, data: {message}}` envelope read by the settings screen script
#[derive(Debug, Serialize, Deserialize)]
pub struct AjaxResponse {
    pub success: bool,
    pub data: AjaxMessage,
}

impl AjaxResponse {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: AjaxMessage { message: message.into() },
        }
    }

    pub fn permission_denied() -> Self {
        Self::error(PERMISSION_DENIED)
    }
}

impl From<&CrmResult> for AjaxResponse {
    fn from(result: &CrmResult) -> Self {
        Self {
            success: result.is_success(),
            data: AjaxMessage { message: result.message().to_string() },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NonceQuery {
    pub action: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NonceResponse {
    pub nonce: String,
    pub action: String,
    pub expires_in: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_denial_shape() {
        let body = serde_json::to_value(AjaxResponse::permission_denied()).unwrap();
        assert_eq!(
            body,
            json!({"success": false, "data": {"message": PERMISSION_DENIED}})
        );
    }

    #[test]
    fn test_from_crm_result() {
        let ok = AjaxResponse::from(&CrmResult::success("connected", json!({})));
        assert!(ok.success);
        assert_eq!(ok.data.message, "connected");
    }
}
