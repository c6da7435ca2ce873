//! Mac control endpoints.

use serde_json::Value;

use crate::client::{ApiClient, Call};
use crate::endpoints::api_path;

impl ApiClient {
    /// Lock the Mac.
    pub fn mac_lock(&self) -> Call<'_, 'static, Value> {
        self.post(api_path("/mac/lock"))
    }

    /// Restart the Messages application on the Mac.
    pub fn mac_restart_imessage(&self) -> Call<'_, 'static, Value> {
        self.post(api_path("/mac/imessage/restart"))
    }
}
