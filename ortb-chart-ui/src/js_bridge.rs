//! Typed wrappers around JS interop via `js_sys::eval()`, and the runtime
//! data fetches.
//!
//! D3.js rendering functions are split across `assets/js/*.js` and loaded at runtime.
//! They are evaluated as globals (no ES modules) and exposed via `window.*`.
//! This module provides Rust wrappers that serialize data and call those globals.

use flate2::read::GzDecoder;
use std::io::Read;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

// Embed all D3 JS files at compile time
static TOOLTIP_JS: &str = include_str!("../assets/js/tooltip.js");
static CHOROPLETH_JS: &str = include_str!("../assets/js/choropleth.js");
static DATA_TABLE_JS: &str = include_str!("../assets/js/data-table.js");
static DOWNLOAD_JS: &str = include_str!("../assets/js/download.js");

/// Functions the scripts define, promoted to `window` once evaluated.
const EXPORTED_FUNCTIONS: [&str; 7] = [
    "initTooltip",
    "showTooltip",
    "hideTooltip",
    "renderChoropleth",
    "renderDataTable",
    "destroyChart",
    "downloadText",
];

/// Quote a string as a JS string literal.
pub fn js_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| "''".to_string())
}

/// Execute arbitrary JS, wrapping in try/catch to avoid panics.
pub fn call_js(code: &str) {
    let wrapped = format!(
        "try {{ {} }} catch(e) {{ console.warn('ORTB JS call failed:', e); }}",
        code
    );
    let _ = js_sys::eval(&wrapped);
}

/// Initialize the scripts with a wait-for-D3 polling loop.
///
/// The scripts define their entry points via `function` declarations. To
/// make them globally accessible (not block-scoped inside the setInterval
/// callback) they are evaluated at global scope via an indirect `eval()`
/// once D3 is ready, then each function is promoted to `window.*`.
/// Calling this more than once is harmless.
pub fn init_charts() {
    let all_js = [TOOLTIP_JS, CHOROPLETH_JS, DATA_TABLE_JS, DOWNLOAD_JS].join("\n");
    let promote: String = EXPORTED_FUNCTIONS
        .iter()
        .map(|f| format!("if (typeof {f} !== 'undefined') window.{f} = {f};"))
        .collect();

    call_js(&format!(
        r#"
        if (!window.__ortbChartsRequested) {{
            window.__ortbChartsRequested = true;
            window.__ortbChartScripts = {scripts};
            var waitForD3 = setInterval(function() {{
                if (typeof d3 !== 'undefined') {{
                    clearInterval(waitForD3);
                    (0, eval)(window.__ortbChartScripts);
                    delete window.__ortbChartScripts;
                    {promote}
                    window.__ortbChartsReady = true;
                    console.log('ORTB charts initialized');
                }}
            }}, 100);
        }}
        "#,
        scripts = js_string(&all_js),
        promote = promote,
    ));
}

/// Call `window[function](container_id, ...args)` once the scripts are
/// initialized and the container exists in the DOM.
fn render_when_ready(function: &str, container_id: &str, args: &[String]) {
    let mut call_args = vec![js_string(container_id)];
    call_args.extend(args.iter().map(|a| js_string(a)));
    call_js(&format!(
        r#"
        (function() {{
            var poll = setInterval(function() {{
                if (window.__ortbChartsReady &&
                    typeof window.{function} !== 'undefined' &&
                    document.getElementById({id})) {{
                    clearInterval(poll);
                    try {{
                        window.{function}({args});
                    }} catch(e) {{ console.error('[ORTB] {function} error:', e); }}
                }}
            }}, 100);
        }})();
        "#,
        function = function,
        id = js_string(container_id),
        args = call_args.join(", "),
    ));
}

/// Render a choropleth map from a payload built by
/// `ChoroplethLayer::to_payload` (features, titles, legend).
pub fn render_choropleth(container_id: &str, payload_json: &str) {
    render_when_ready("renderChoropleth", container_id, &[payload_json.to_string()]);
}

/// Render a sortable data table.
///
/// `data_json` is an array of row arrays; `config_json` holds the column
/// names under `columns` and optional `numericColumns` / `maxRows`.
pub fn render_data_table(container_id: &str, data_json: &str, config_json: &str) {
    render_when_ready(
        "renderDataTable",
        container_id,
        &[data_json.to_string(), config_json.to_string()],
    );
}

/// Destroy/clean up a chart in the given container.
pub fn destroy_chart(container_id: &str) {
    let id = js_string(container_id);
    call_js(&format!(
        "if (window.destroyChart) {{ window.destroyChart({id}); }} \
         else {{ var el = document.getElementById({id}); if (el) el.innerHTML = ''; }}",
        id = id
    ));
}

/// Offer `content` as a CSV file download.
pub fn download_csv(file_name: &str, content: &str) {
    call_js(&format!(
        "if (window.downloadText) {{ window.downloadText({}, {}, 'text/csv;charset=utf-8'); }} \
         else {{ console.warn('[ORTB] download scripts not ready'); }}",
        js_string(file_name),
        js_string(content)
    ));
}

// ───────────────────── Runtime fetches ─────────────────────

/// Fetch a URL and return the response body.
pub async fn fetch_bytes(url: &str) -> Result<Vec<u8>, String> {
    let window = web_sys::window().ok_or_else(|| "No window available".to_string())?;
    let response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| format!("Fetch of {} failed: {:?}", url, e))?;
    let response: web_sys::Response = response
        .dyn_into()
        .map_err(|_| format!("Unexpected fetch result for {}", url))?;
    if !response.ok() {
        return Err(format!("HTTP {} for {}", response.status(), url));
    }
    // SPA dev servers answer unknown paths with index.html and a 200.
    let content_type = response.headers().get("content-type").ok().flatten();
    if content_type.is_some_and(|ct| ct.to_ascii_lowercase().starts_with("text/html")) {
        return Err(format!("{} served an HTML page, not a data file", url));
    }
    let buffer_promise = response
        .array_buffer()
        .map_err(|e| format!("Cannot read body of {}: {:?}", url, e))?;
    let buffer = JsFuture::from(buffer_promise)
        .await
        .map_err(|e| format!("Cannot read body of {}: {:?}", url, e))?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

/// True when a body is an HTML page rather than CSV or GeoJSON.
pub fn looks_like_html(text: &str) -> bool {
    text.trim_start_matches('\u{feff}').trim_start().starts_with('<')
}

/// Decode a body as UTF-8, gunzipping it first when it carries the gzip magic.
///
/// HTML bodies are rejected.
pub fn decode_text(bytes: Vec<u8>) -> Result<String, String> {
    let bytes = if bytes.starts_with(&[0x1f, 0x8b]) {
        let mut decoder = GzDecoder::new(&bytes[..]);
        let mut out = Vec::new();
        decoder
            .read_to_end(&mut out)
            .map_err(|e| format!("Decompression failed: {}", e))?;
        out
    } else {
        bytes
    };
    let text = String::from_utf8(bytes).map_err(|e| format!("Invalid UTF-8: {}", e))?;
    if looks_like_html(&text) {
        return Err("Received an HTML page instead of a data file".to_string());
    }
    Ok(text)
}

/// Fetch a text file, transparently gunzipping it.
pub async fn fetch_text(url: &str) -> Result<String, String> {
    decode_text(fetch_bytes(url).await?)
}

/// Fetch a CSV file, preferring its `.gz` variant when served.
pub async fn fetch_csv(url: &str) -> Result<String, String> {
    match fetch_text(&format!("{}.gz", url)).await {
        Ok(text) => Ok(text),
        Err(e) => {
            log::debug!("{} (falling back to plain CSV)", e);
            fetch_text(url).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    #[test]
    fn js_string_escapes_quotes_and_newlines() {
        assert_eq!(js_string("l'a\"b\nc"), r#""l'a\"b\nc""#);
    }

    #[test]
    fn decode_plain_and_gzipped_text() {
        let csv = "code_commune,indicateur\n35238,pop_tot\n";
        assert_eq!(decode_text(csv.as_bytes().to_vec()).unwrap(), csv);

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(csv.as_bytes()).unwrap();
        let gz = encoder.finish().unwrap();
        assert_eq!(decode_text(gz).unwrap(), csv);
    }

    #[test]
    fn decode_rejects_html_fallback_pages() {
        let page = "\n  <!DOCTYPE html>\n<html><head><title>ORTB</title></head><body><div id=\"ortb-root\"></div></body></html>";
        assert!(decode_text(page.as_bytes().to_vec()).is_err());

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(page.as_bytes()).unwrap();
        assert!(decode_text(encoder.finish().unwrap()).is_err());
    }

    #[test]
    fn looks_like_html_ignores_csv_and_geojson() {
        assert!(looks_like_html("\u{feff}<html>"));
        assert!(!looks_like_html("\u{feff}code_epci,nom,indicateur,date,valeur,unite\n"));
        assert!(!looks_like_html("{\"type\": \"FeatureCollection\", \"features\": []}"));
    }

    #[test]
    fn decode_rejects_invalid_utf8() {
        assert!(decode_text(vec![0xff, 0xfe, 0xfd]).is_err());
    }
}
