//! General endpoints.

use crate::client::{ApiClient, Call};
use crate::endpoints::api_path;

impl ApiClient {
    /// Ping the server. A healthy server answers with `"pong"` as data.
    pub fn ping(&self) -> Call<'_, 'static, String> {
        self.get(api_path("/ping"))
    }
}
