// Mobile navigation drawer. The hamburger button toggles the drawer
// open; clicking any link inside it closes it again.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Element;

const OPEN_CLASS: &str = "open";

#[wasm_bindgen]
pub struct NavMenu {
    button: Element,
    nav: Element,
    on_toggle: Closure<dyn FnMut()>,
    on_link_click: Closure<dyn FnMut(web_sys::Event)>,
}

#[wasm_bindgen]
impl NavMenu {
    #[wasm_bindgen(constructor)]
    pub fn new(button_id: &str, nav_id: &str) -> Result<NavMenu, JsValue> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| JsValue::from_str("no document available"))?;
        let button = document
            .get_element_by_id(button_id)
            .ok_or_else(|| JsValue::from_str("menu button element not found"))?;
        let nav = document
            .get_element_by_id(nav_id)
            .ok_or_else(|| JsValue::from_str("nav element not found"))?;

        let drawer = nav.clone();
        let on_toggle = Closure::wrap(Box::new(move || {
            let _ = drawer.class_list().toggle(OPEN_CLASS);
        }) as Box<dyn FnMut()>);
        button.add_event_listener_with_callback("click", on_toggle.as_ref().unchecked_ref())?;

        // Following a nav link should collapse the drawer behind it.
        let drawer = nav.clone();
        let on_link_click = Closure::wrap(Box::new(move |event: web_sys::Event| {
            let is_link = event
                .target()
                .and_then(|target| target.dyn_into::<Element>().ok())
                .map(|element| element.tag_name() == "A")
                .unwrap_or(false);
            if is_link {
                let _ = drawer.class_list().remove_1(OPEN_CLASS);
            }
        }) as Box<dyn FnMut(web_sys::Event)>);
        nav.add_event_listener_with_callback("click", on_link_click.as_ref().unchecked_ref())?;

        Ok(NavMenu {
            button,
            nav,
            on_toggle,
            on_link_click,
        })
    }
}

impl Drop for NavMenu {
    fn drop(&mut self) {
        let _ = self
            .button
            .remove_event_listener_with_callback("click", self.on_toggle.as_ref().unchecked_ref());
        let _ = self
            .nav
            .remove_event_listener_with_callback("click", self.on_link_click.as_ref().unchecked_ref());
    }
}
