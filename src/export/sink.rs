//! Delivery of encoded export files.
//!
//! SYSTEM CONTEXT
//! ==============
//! In the browser an export is a download: the bytes become a `Blob` and a
//! temporary `<a download>` link is clicked. Native builds write the file
//! into a directory instead. Encoders never call into this module.

#[cfg(test)]
#[path = "sink_test.rs"]
mod sink_test;

use std::path::{Path, PathBuf};

use super::{ExportError, ExportFile};

/// Hands a finished export to the user.
pub trait ExportSink: Send + Sync {
    /// # Errors
    ///
    /// Returns [`ExportError::Delivery`] if the file could not be delivered.
    fn deliver(&self, file: &ExportFile) -> Result<(), ExportError>;
}

// =============================================================================
// DIRECTORY
// =============================================================================

/// Writes exports into a directory, creating it if needed.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ExportSink for DirectorySink {
    fn deliver(&self, file: &ExportFile) -> Result<(), ExportError> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| ExportError::Delivery(format!("{}: {e}", self.dir.display())))?;
        let path = self.dir.join(&file.filename);
        std::fs::write(&path, &file.bytes).map_err(|e| ExportError::Delivery(format!("{}: {e}", path.display())))?;
        tracing::debug!(path = %path.display(), "export written");
        Ok(())
    }
}

// =============================================================================
// BROWSER
// =============================================================================

/// Triggers a browser download of the file.
///
/// Client-side (hydrate): real download via `web-sys`.
/// Elsewhere: always fails, since there is no page to download into.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserDownloadSink;

#[cfg(feature = "hydrate")]
fn js_error(e: wasm_bindgen::JsValue) -> ExportError {
    ExportError::Delivery(format!("{e:?}"))
}

#[cfg(feature = "hydrate")]
fn trigger_download(file: &ExportFile) -> Result<(), ExportError> {
    use wasm_bindgen::JsCast;

    let window = web_sys::window().ok_or_else(|| ExportError::Delivery("no window".into()))?;
    let document = window
        .document()
        .ok_or_else(|| ExportError::Delivery("no document".into()))?;
    let body = document
        .body()
        .ok_or_else(|| ExportError::Delivery("no document body".into()))?;

    let parts = js_sys::Array::new();
    parts.push(&js_sys::Uint8Array::from(file.bytes.as_slice()));
    let options = web_sys::BlobPropertyBag::new();
    options.set_type(file.mime_type);
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options).map_err(js_error)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob).map_err(js_error)?;

    let link: web_sys::HtmlAnchorElement = document
        .create_element("a")
        .map_err(js_error)?
        .dyn_into()
        .map_err(|_| ExportError::Delivery("anchor element cast failed".into()))?;
    link.set_href(&url);
    link.set_download(&file.filename);
    body.append_child(&link).map_err(js_error)?;
    link.click();
    body.remove_child(&link).map_err(js_error)?;
    web_sys::Url::revoke_object_url(&url).map_err(js_error)?;
    Ok(())
}

impl ExportSink for BrowserDownloadSink {
    fn deliver(&self, file: &ExportFile) -> Result<(), ExportError> {
        #[cfg(feature = "hydrate")]
        {
            trigger_download(file)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Err(ExportError::Delivery(format!("cannot download {} outside the browser", file.filename)))
        }
    }
}
