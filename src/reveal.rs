// Scroll-triggered reveal. Elements carrying the reveal class gain a
// visible class once their top edge crosses into the lower part of the
// viewport, evaluated on construction and on every scroll event.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Window};

const TARGET_SELECTOR: &str = ".reveal";
const VISIBLE_CLASS: &str = "visible";
// Fraction of the viewport height an element must rise above.
const VIEWPORT_FRACTION: f64 = 0.85;

fn reveal_in_view(window: &Window) -> Result<(), JsValue> {
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document available"))?;
    let viewport_height = window.inner_height()?.as_f64().unwrap_or(0.0);
    let threshold = viewport_height * VIEWPORT_FRACTION;

    let targets = document.query_selector_all(TARGET_SELECTOR)?;
    for i in 0..targets.length() {
        let element = match targets.item(i).and_then(|node| node.dyn_into::<Element>().ok()) {
            Some(element) => element,
            None => continue,
        };
        if element.get_bounding_client_rect().top() < threshold {
            element.class_list().add_1(VISIBLE_CLASS)?;
        }
    }
    Ok(())
}

#[wasm_bindgen]
pub struct ScrollReveal {
    window: Window,
    on_scroll: Closure<dyn FnMut()>,
}

#[wasm_bindgen]
impl ScrollReveal {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<ScrollReveal, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window available"))?;

        // Anything already in view reveals without waiting for a scroll.
        reveal_in_view(&window)?;

        let on_scroll = Closure::wrap(Box::new(move || {
            if let Some(window) = web_sys::window() {
                let _ = reveal_in_view(&window);
            }
        }) as Box<dyn FnMut()>);
        window.add_event_listener_with_callback("scroll", on_scroll.as_ref().unchecked_ref())?;

        Ok(ScrollReveal { window, on_scroll })
    }
}

impl Drop for ScrollReveal {
    fn drop(&mut self) {
        let _ = self
            .window
            .remove_event_listener_with_callback("scroll", self.on_scroll.as_ref().unchecked_ref());
    }
}
