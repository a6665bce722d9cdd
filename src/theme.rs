// Dark mode toggle. Flips the theme class on <body> and persists the
// choice under a single localStorage key; the particle renderer only
// ever reads the class back.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlInputElement};

pub const THEME_CLASS: &str = "dark-theme";
pub const STORAGE_KEY: &str = "theme";

// The flag the render step keys its palette off, re-read every frame.
pub fn is_dark(document: &Document) -> bool {
    document
        .body()
        .map(|body| body.class_list().contains(THEME_CLASS))
        .unwrap_or(false)
}

fn apply(document: &Document, dark: bool) -> Result<(), JsValue> {
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("document has no body"))?;
    if dark {
        body.class_list().add_1(THEME_CLASS)?;
    } else {
        body.class_list().remove_1(THEME_CLASS)?;
    }
    Ok(())
}

#[wasm_bindgen]
pub struct ThemeToggle {
    checkbox: HtmlInputElement,
    on_change: Closure<dyn FnMut()>,
}

#[wasm_bindgen]
impl ThemeToggle {
    // Wires the checkbox with the given id and applies any persisted
    // choice, checking the box when the saved theme is dark.
    #[wasm_bindgen(constructor)]
    pub fn new(toggle_id: &str) -> Result<ThemeToggle, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window available"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document available"))?;
        let checkbox = document
            .get_element_by_id(toggle_id)
            .ok_or_else(|| JsValue::from_str("dark mode toggle element not found"))?
            .dyn_into::<HtmlInputElement>()?;

        if let Some(storage) = window.local_storage()? {
            if let Ok(Some(saved)) = storage.get_item(STORAGE_KEY) {
                if saved == "dark" {
                    apply(&document, true)?;
                    checkbox.set_checked(true);
                }
            }
        }

        let input = checkbox.clone();
        let on_change = Closure::wrap(Box::new(move || {
            let dark = input.checked();
            if let Some(window) = web_sys::window() {
                if let Some(document) = window.document() {
                    let _ = apply(&document, dark);
                }
                if let Ok(Some(storage)) = window.local_storage() {
                    let _ = storage.set_item(STORAGE_KEY, if dark { "dark" } else { "light" });
                }
            }
        }) as Box<dyn FnMut()>);
        checkbox.add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref())?;

        Ok(ThemeToggle { checkbox, on_change })
    }
}

impl Drop for ThemeToggle {
    fn drop(&mut self) {
        let _ = self
            .checkbox
            .remove_event_listener_with_callback("change", self.on_change.as_ref().unchecked_ref());
    }
}
