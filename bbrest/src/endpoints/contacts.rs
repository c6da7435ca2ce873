//! Contact endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use bbrest_core::error::BbResult;

use crate::body::Body;
use crate::client::{ApiClient, Call};
use crate::endpoints::api_path;

/// A contact to create on the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateContactParams {
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    #[serde(rename = "phoneNumbers")]
    pub phone_numbers: Vec<String>,
    pub emails: Vec<String>,
}

/// Look contacts up by phone number or email.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactQuery {
    pub addresses: Vec<String>,
}

impl ApiClient {
    /// Get all contacts from the server.
    pub fn contact_list(&self) -> Call<'_, 'static, Vec<Value>> {
        self.get(api_path("/contact"))
    }

    /// Create a contact. The server answers with the created contacts.
    pub fn contact_create(&self, params: &CreateContactParams) -> BbResult<Call<'_, 'static, Vec<Value>>> {
        Ok(self.post(api_path("/contact")).body(Body::json(params)?))
    }

    /// Query contacts by addresses (phone numbers or emails).
    pub fn contact_query(&self, query: &ContactQuery) -> BbResult<Call<'_, 'static, Vec<Value>>> {
        Ok(self.post(api_path("/contact/query")).body(Body::json(query)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_contact_serialize() {
        let params = CreateContactParams {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            phone_numbers: vec!["+15550100".into()],
            ..Default::default()
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["firstName"], "Ada");
        assert_eq!(json["displayName"], "");
        assert_eq!(json["phoneNumbers"], serde_json::json!(["+15550100"]));
        assert_eq!(json["emails"], serde_json::json!([]));
    }
}
