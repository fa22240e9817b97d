use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response, Window};

use smartnote_shared::{interpret_response, AnalysisError, AnalyzeRequest};

fn transport_error(error: JsValue) -> AnalysisError {
    AnalysisError::Transport(format!("{error:?}"))
}

/// Posts one analysis request and classifies the reply. No retries.
pub async fn post_analysis(
    window: &Window,
    url: &str,
    request: &AnalyzeRequest,
) -> Result<String, AnalysisError> {
    let body = serde_json::to_string(request)
        .map_err(|error| AnalysisError::Transport(error.to_string()))?;

    let headers = Headers::new().map_err(transport_error)?;
    headers
        .set("Content-Type", "application/json")
        .map_err(transport_error)?;
    let init = RequestInit::new();
    init.set_method("POST");
    init.set_headers(&headers);
    init.set_body(&JsValue::from_str(&body));
    let request = Request::new_with_str_and_init(url, &init).map_err(transport_error)?;

    log::debug!("POST {url} bytes={}", body.len());
    let response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(transport_error)?
        .dyn_into::<Response>()
        .map_err(transport_error)?;
    let status = response.status();
    let text = JsFuture::from(response.text().map_err(transport_error)?)
        .await
        .map_err(transport_error)?
        .as_string()
        .unwrap_or_default();
    log::debug!("analysis response status={status} bytes={}", text.len());
    interpret_response(status, &text)
}
