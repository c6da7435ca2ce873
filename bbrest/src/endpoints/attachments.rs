//! Attachment endpoints.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use bbrest_core::error::BbResult;

use crate::client::{ApiClient, Call, Download};
use crate::endpoints::{api_path, CountResponse};
use crate::query::{expand_path, QueryParams, QueryValue};

/// Image quality the server converts to before sending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageQuality {
    Good,
    Better,
    Best,
}

impl ImageQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageQuality::Good => "good",
            ImageQuality::Better => "better",
            ImageQuality::Best => "best",
        }
    }
}

impl fmt::Display for ImageQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ImageQuality> for QueryValue {
    fn from(q: ImageQuality) -> Self {
        QueryValue::Text(q.as_str().to_string())
    }
}

/// Resize options for downloads and blurhash generation.
///
/// Aspect ratio is kept when only one of `width`/`height` is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageOptions {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub quality: Option<ImageQuality>,
}

impl ImageOptions {
    fn to_params(self) -> QueryParams {
        QueryParams::new()
            .opt_param("width", self.width)
            .opt_param("height", self.height)
            .opt_param("quality", self.quality)
    }
}

impl ApiClient {
    /// Get total attachment count.
    pub fn attachment_count(&self) -> Call<'_, 'static, CountResponse> {
        self.get(api_path("/attachment/count"))
    }

    /// Download an attachment's bytes.
    ///
    /// With `original` set the server skips its automatic conversions
    /// (HEIC, CAF).
    pub fn attachment_download(
        &self,
        guid: &str,
        options: ImageOptions,
        original: bool,
    ) -> BbResult<Download<'_>> {
        let path = expand_path(&api_path("/attachment/{0}/download"), &[guid])?;
        Ok(self.download(path, options.to_params().param("original", original)))
    }

    /// Compute the BlurHash of an image attachment.
    ///
    /// Expensive on the server; smaller `width`/`height` speed it up.
    pub fn attachment_blurhash(&self, guid: &str, options: ImageOptions) -> BbResult<Call<'_, 'static, String>> {
        let path = expand_path(&api_path("/attachment/{0}/blurhash"), &[guid])?;
        Ok(self.get(path).query(options.to_params()))
    }

    /// Get attachment metadata by GUID.
    pub fn attachment_find(&self, guid: &str) -> BbResult<Call<'_, 'static, Value>> {
        let path = expand_path(&api_path("/attachment/{0}"), &[guid])?;
        Ok(self.get(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_options_query() {
        let options = ImageOptions {
            width: Some(300),
            height: None,
            quality: Some(ImageQuality::Better),
        };
        assert_eq!(options.to_params().encode(), "width=300&quality=better");
        assert_eq!(ImageOptions::default().to_params().encode(), "");
    }

    #[test]
    fn test_download_query_always_has_original() {
        let client = ApiClient::from_url("http://localhost:1234", "pw").unwrap();
        let download = client
            .attachment_download("att 1", ImageOptions::default(), false)
            .unwrap();
        assert_eq!(download.path(), "/api/v1/attachment/att%201/download");
        assert_eq!(download.query().encode(), "original=0");
    }
}
