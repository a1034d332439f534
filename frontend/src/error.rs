use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures while wiring behaviors onto the page.
///
/// A page that simply lacks the elements a behavior needs is not an error;
/// installers report that as `Ok(None)`.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("browser global `{0}` is unavailable")]
    MissingGlobal(&'static str),

    #[error("{context} failed: {message}")]
    Js {
        context: &'static str,
        message: String,
    },

    #[error("invalid site config: {0}")]
    Config(#[from] serde_json::Error),
}

impl SetupError {
    /// Adapter for `map_err` on web-sys calls that throw.
    pub fn js(context: &'static str) -> impl FnOnce(JsValue) -> Self {
        move |value| SetupError::Js {
            context,
            message: value.as_string().unwrap_or_else(|| format!("{:?}", value)),
        }
    }
}
