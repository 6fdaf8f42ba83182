use std::time::Duration;

use serde::Serialize;
use ureq::http::Response;
use ureq::{Agent, Body};

use crate::editor::SlideEdit;
use crate::error::{ApiError, ApiResult};
use crate::fonts::FontSettings;
use crate::model::{Id, PreviewPayload};
use crate::transform::{SlideLimit, TransformStyle};

/// Upper bound on downloaded media (audio tracks, slide images).
const MAX_MEDIA_BYTES: u64 = 200 * 1024 * 1024;

/// Presentation-level settings update (`PUT /presentations/:id`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PresentationUpdate {
    Theme {
        theme: String,
    },
    Fonts {
        #[serde(rename = "fontSettings")]
        font_settings: FontSettings,
    },
}

/// Blocking client for the admin funnel API. Every request carries the
/// session cookie; non-2xx responses become [`ApiError::Status`] with the
/// server's message.
pub struct FunnelClient {
    agent: Agent,
    base_url: String,
    session_cookie: Option<String>,
}

impl FunnelClient {
    pub fn new(base_url: &str, session_cookie: Option<String>, timeout: Duration) -> Self {
        let agent: Agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            session_cookie: session_cookie.filter(|c| !c.trim().is_empty()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn presentation_url(&self, id: &Id) -> String {
        format!("{}/api/admin/funnels/presentations/{id}", self.base_url)
    }

    pub fn preview_url(&self, id: &Id) -> String {
        format!("{}/preview", self.presentation_url(id))
    }

    pub fn slide_url(&self, id: &Id) -> String {
        format!("{}/api/admin/funnels/slides/{id}", self.base_url)
    }

    pub fn transform_url(&self, id: &Id, style: TransformStyle) -> String {
        format!("{}/{}", self.presentation_url(id), style.endpoint())
    }

    /// Where to send the user when the preview can't be shown.
    pub fn admin_url(&self) -> String {
        format!("{}/admin/funnels", self.base_url)
    }

    /// Resolve a media URL from the payload; relative paths are served by the API host.
    pub fn resolve_media_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else if url.starts_with('/') {
            format!("{}{url}", self.base_url)
        } else {
            format!("{}/{url}", self.base_url)
        }
    }

    pub fn fetch_preview(&self, id: &Id) -> ApiResult<PreviewPayload> {
        let url = self.preview_url(id);
        tracing::debug!("GET {url}");
        let mut request = self.agent.get(&url);
        if let Some(cookie) = &self.session_cookie {
            request = request.header("Cookie", cookie);
        }
        let mut response = check(request.call()?)?;
        let body = response.body_mut().read_to_string()?;
        let mut payload: PreviewPayload = serde_json::from_str(&body)?;
        payload.normalize();
        Ok(payload)
    }

    pub fn update_presentation(&self, id: &Id, update: &PresentationUpdate) -> ApiResult<()> {
        self.put_json(&self.presentation_url(id), update)
    }

    pub fn update_slide(&self, edit: &SlideEdit) -> ApiResult<()> {
        self.put_json(&self.slide_url(&edit.slide_id), &slide_patch(edit))
    }

    /// Ask the server to rewrite up to `limit` slides in the given style.
    pub fn apply_transform(
        &self,
        id: &Id,
        style: TransformStyle,
        limit: SlideLimit,
    ) -> ApiResult<()> {
        let url = self.transform_url(id, style);
        tracing::debug!("POST {url}");
        let mut request = self.agent.post(&url);
        if let Some(cookie) = &self.session_cookie {
            request = request.header("Cookie", cookie);
        }
        check(request.send_json(transform_body(limit))?)?;
        Ok(())
    }

    pub fn fetch_bytes(&self, url: &str) -> ApiResult<Vec<u8>> {
        let url = self.resolve_media_url(url);
        tracing::debug!("GET {url}");
        let mut request = self.agent.get(&url);
        if let Some(cookie) = &self.session_cookie {
            request = request.header("Cookie", cookie);
        }
        let mut response = check(request.call()?)?;
        let bytes = response
            .body_mut()
            .with_config()
            .limit(MAX_MEDIA_BYTES)
            .read_to_vec()?;
        Ok(bytes)
    }

    fn put_json(&self, url: &str, body: &impl Serialize) -> ApiResult<()> {
        tracing::debug!("PUT {url}");
        let mut request = self.agent.put(url);
        if let Some(cookie) = &self.session_cookie {
            request = request.header("Cookie", cookie);
        }
        check(request.send_json(body)?)?;
        Ok(())
    }
}

fn check(mut response: Response<Body>) -> ApiResult<Response<Body>> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.body_mut().read_to_string().unwrap_or_default();
    Err(ApiError::status(status.as_u16(), &body))
}

/// `{"headline": "..."}` / `{"body": null}`: exactly one field, null when cleared.
fn slide_patch(edit: &SlideEdit) -> serde_json::Value {
    let mut body = serde_json::Map::new();
    let value = match &edit.value {
        Some(text) => serde_json::Value::String(text.clone()),
        None => serde_json::Value::Null,
    };
    body.insert(edit.field.key().to_string(), value);
    serde_json::Value::Object(body)
}

fn transform_body(limit: SlideLimit) -> serde_json::Value {
    match limit.count() {
        Some(n) => serde_json::json!({ "limit": n }),
        None => serde_json::json!({}),
    }
}
