// Simulated contact form submission. Swallows the submit, shows a
// sending status, then reports success after a fixed delay and resets
// the fields. Nothing leaves the page.

use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, HtmlFormElement};

#[wasm_bindgen]
pub struct ContactForm {
    form: HtmlFormElement,
    on_submit: Closure<dyn FnMut(web_sys::Event)>,
    // Keeps the delayed callback alive past the submit handler, and the
    // timer handle so drop can cancel an in-flight "send".
    on_sent: Rc<Closure<dyn FnMut()>>,
    pending: Rc<Cell<Option<i32>>>,
}

impl ContactForm {
    pub const SEND_DELAY_MS: i32 = 1500;
    pub const SENDING_TEXT: &'static str = "Sending...";
    pub const SENT_TEXT: &'static str = "Message sent! I'll get back to you soon.";
}

#[wasm_bindgen]
impl ContactForm {
    #[wasm_bindgen(constructor)]
    pub fn new(form_id: &str, status_id: &str) -> Result<ContactForm, JsValue> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| JsValue::from_str("no document available"))?;
        let form = document
            .get_element_by_id(form_id)
            .ok_or_else(|| JsValue::from_str("contact form element not found"))?
            .dyn_into::<HtmlFormElement>()?;
        let status = document
            .get_element_by_id(status_id)
            .ok_or_else(|| JsValue::from_str("form status element not found"))?
            .dyn_into::<HtmlElement>()?;

        let pending = Rc::new(Cell::new(None));

        let sent_form = form.clone();
        let sent_status = status.clone();
        let sent_pending = Rc::clone(&pending);
        let on_sent = Rc::new(Closure::wrap(Box::new(move || {
            sent_pending.set(None);
            sent_status.set_text_content(Some(ContactForm::SENT_TEXT));
            sent_form.reset();
        }) as Box<dyn FnMut()>));

        let submit_status = status;
        let submit_pending = Rc::clone(&pending);
        let timer_callback = Rc::clone(&on_sent);
        let on_submit = Closure::wrap(Box::new(move |event: web_sys::Event| {
            event.prevent_default();
            submit_status.set_text_content(Some(ContactForm::SENDING_TEXT));
            if let Some(window) = web_sys::window() {
                // Resubmitting restarts the fake send from scratch.
                if let Some(handle) = submit_pending.take() {
                    window.clear_timeout_with_handle(handle);
                }
                let callback: &Closure<dyn FnMut()> = &timer_callback;
                submit_pending.set(
                    window
                        .set_timeout_with_callback_and_timeout_and_arguments_0(
                            callback.as_ref().unchecked_ref(),
                            ContactForm::SEND_DELAY_MS,
                        )
                        .ok(),
                );
            }
        }) as Box<dyn FnMut(web_sys::Event)>);
        form.add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref())?;

        Ok(ContactForm {
            form,
            on_submit,
            on_sent,
            pending,
        })
    }
}

impl Drop for ContactForm {
    fn drop(&mut self) {
        let _ = self
            .form
            .remove_event_listener_with_callback("submit", self.on_submit.as_ref().unchecked_ref());
        // With the timer cancelled, on_sent can drop with the struct.
        if let Some(handle) = self.pending.take() {
            if let Some(window) = web_sys::window() {
                window.clear_timeout_with_handle(handle);
            }
        }
    }
}
