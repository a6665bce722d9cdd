// Loop driver for the background particle network. One exported handle
// owns the canvas, the field, and every frame/event closure, with an
// explicit start/stop lifecycle so tearing the page section down does
// not leak the animation loop or its listeners.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlCanvasElement, MouseEvent, Window};

use crate::field::ParticleField;
use crate::renderer::Renderer;
use crate::theme;
use crate::utils::Timer;

type FrameClosure = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

struct NetworkState {
    field: ParticleField,
    renderer: Renderer,
    canvas: HtmlCanvasElement,
    container: Element,
    raf_handle: Option<i32>,
    debounce_handle: Option<i32>,
    running: bool,
}

impl NetworkState {
    fn container_size(&self) -> (f64, f64) {
        let rect = self.container.get_bounding_client_rect();
        (rect.width(), rect.height())
    }

    // Runs on every resize event, not just after the debounce settles,
    // so drawing never happens against stale canvas dimensions.
    fn sync_canvas_size(&self) {
        let (width, height) = self.container_size();
        self.canvas.set_width(width as u32);
        self.canvas.set_height(height as u32);
    }

    // Full store rebuild at the settled dimensions, with the count
    // re-chosen for the current viewport class.
    fn rebuild_store(&mut self, viewport_width: f64) {
        let _timer = Timer::new("ParticleNetwork::rebuild_store");
        let (width, height) = self.container_size();
        let count = ParticleField::count_for_viewport(viewport_width);
        self.field.reinitialize(width, height, count);
    }

    fn tick(&mut self, dark: bool) -> Result<(), JsValue> {
        self.field.update();
        self.renderer.render(&self.field, dark)
    }
}

#[wasm_bindgen]
pub struct ParticleNetwork {
    state: Rc<RefCell<NetworkState>>,
    frame: FrameClosure,
    reinit: Option<Rc<Closure<dyn FnMut()>>>,
    on_mouse_move: Option<Closure<dyn FnMut(MouseEvent)>>,
    on_mouse_leave: Option<Closure<dyn FnMut(MouseEvent)>>,
    on_resize: Option<Closure<dyn FnMut()>>,
}

impl ParticleNetwork {
    // Resize bursts quiet down for this long before the store rebuilds.
    pub const RESIZE_DEBOUNCE_MS: i32 = 100;
}

#[wasm_bindgen]
impl ParticleNetwork {
    // Looks up the canvas and the container whose measured box sizes
    // it. Either element missing is a page construction error, so the
    // constructor fails rather than retrying.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, container_id: &str) -> Result<ParticleNetwork, JsValue> {
        let window = browser_window()?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document available"))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str("particle canvas element not found"))?
            .dyn_into::<HtmlCanvasElement>()?;
        let container = document
            .get_element_by_id(container_id)
            .ok_or_else(|| JsValue::from_str("particle container element not found"))?;

        let renderer = Renderer::new(&canvas)?;

        let rect = container.get_bounding_client_rect();
        canvas.set_width(rect.width() as u32);
        canvas.set_height(rect.height() as u32);

        let viewport_width = window.inner_width()?.as_f64().unwrap_or(0.0);
        let field = ParticleField::new(
            rect.width(),
            rect.height(),
            ParticleField::count_for_viewport(viewport_width),
        );

        let state = Rc::new(RefCell::new(NetworkState {
            field,
            renderer,
            canvas,
            container,
            raf_handle: None,
            debounce_handle: None,
            running: false,
        }));

        Ok(ParticleNetwork {
            state,
            frame: Rc::new(RefCell::new(None)),
            reinit: None,
            on_mouse_move: None,
            on_mouse_leave: None,
            on_resize: None,
        })
    }

    // Wires the listeners and kicks off the frame loop. Idempotent
    // while already running.
    pub fn start(&mut self) -> Result<(), JsValue> {
        if self.state.borrow().running {
            return Ok(());
        }
        self.state.borrow_mut().running = true;

        let window = browser_window()?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document available"))?;

        // Pointer tracking in canvas-local coordinates; each move just
        // overwrites the previous position.
        let mouse_state = Rc::clone(&self.state);
        let on_mouse_move = Closure::wrap(Box::new(move |event: MouseEvent| {
            let mut state = mouse_state.borrow_mut();
            let rect = state.canvas.get_bounding_client_rect();
            let x = event.client_x() as f64 - rect.left();
            let y = event.client_y() as f64 - rect.top();
            state.field.set_mouse(x, y);
        }) as Box<dyn FnMut(MouseEvent)>);
        window.add_event_listener_with_callback("mousemove", on_mouse_move.as_ref().unchecked_ref())?;

        let leave_state = Rc::clone(&self.state);
        let on_mouse_leave = Closure::wrap(Box::new(move |_event: MouseEvent| {
            leave_state.borrow_mut().field.clear_mouse();
        }) as Box<dyn FnMut(MouseEvent)>);
        document
            .add_event_listener_with_callback("mouseleave", on_mouse_leave.as_ref().unchecked_ref())?;

        // The debounced rebuild every resize burst funnels into.
        let reinit_state = Rc::clone(&self.state);
        let reinit = Rc::new(Closure::wrap(Box::new(move || {
            let mut state = reinit_state.borrow_mut();
            state.debounce_handle = None;
            let viewport_width = web_sys::window()
                .and_then(|window| window.inner_width().ok())
                .and_then(|value| value.as_f64())
                .unwrap_or(0.0);
            state.rebuild_store(viewport_width);
        }) as Box<dyn FnMut()>));

        let resize_state = Rc::clone(&self.state);
        let resize_reinit = Rc::clone(&reinit);
        let on_resize = Closure::wrap(Box::new(move || {
            let mut state = resize_state.borrow_mut();
            state.sync_canvas_size();
            if let Some(window) = web_sys::window() {
                // Cancel and reschedule: the last event in the burst
                // decides the rebuild dimensions.
                if let Some(handle) = state.debounce_handle.take() {
                    window.clear_timeout_with_handle(handle);
                }
                let callback: &Closure<dyn FnMut()> = &resize_reinit;
                state.debounce_handle = window
                    .set_timeout_with_callback_and_timeout_and_arguments_0(
                        callback.as_ref().unchecked_ref(),
                        ParticleNetwork::RESIZE_DEBOUNCE_MS,
                    )
                    .ok();
            }
        }) as Box<dyn FnMut()>);
        window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;

        // The frame closure re-arms itself until `running` clears. The
        // theme flag is read fresh every frame so a toggle shows up on
        // the very next draw.
        let frame_state = Rc::clone(&self.state);
        let frame_slot = Rc::clone(&self.frame);
        *self.frame.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            let mut state = frame_state.borrow_mut();
            if !state.running {
                return;
            }
            let dark = web_sys::window()
                .and_then(|window| window.document())
                .map(|document| theme::is_dark(&document))
                .unwrap_or(false);
            if let Err(err) = state.tick(dark) {
                web_sys::console::error_1(&err);
            }
            state.raf_handle = request_frame(&frame_slot);
        }) as Box<dyn FnMut()>));
        self.state.borrow_mut().raf_handle = request_frame(&self.frame);

        crate::log!(
            "particle network running with {} particles",
            self.state.borrow().field.particles().len()
        );

        self.on_mouse_move = Some(on_mouse_move);
        self.on_mouse_leave = Some(on_mouse_leave);
        self.on_resize = Some(on_resize);
        self.reinit = Some(reinit);
        Ok(())
    }

    // Cancels the pending frame and debounce timer and removes every
    // listener. Safe to call more than once.
    pub fn stop(&mut self) {
        {
            let mut state = self.state.borrow_mut();
            if !state.running {
                return;
            }
            state.running = false;
            if let Some(window) = web_sys::window() {
                if let Some(handle) = state.raf_handle.take() {
                    let _ = window.cancel_animation_frame(handle);
                }
                if let Some(handle) = state.debounce_handle.take() {
                    window.clear_timeout_with_handle(handle);
                }
            }
        }

        if let Some(window) = web_sys::window() {
            if let Some(callback) = self.on_mouse_move.take() {
                let _ = window
                    .remove_event_listener_with_callback("mousemove", callback.as_ref().unchecked_ref());
            }
            if let Some(callback) = self.on_mouse_leave.take() {
                if let Some(document) = window.document() {
                    let _ = document.remove_event_listener_with_callback(
                        "mouseleave",
                        callback.as_ref().unchecked_ref(),
                    );
                }
            }
            if let Some(callback) = self.on_resize.take() {
                let _ = window
                    .remove_event_listener_with_callback("resize", callback.as_ref().unchecked_ref());
            }
        }

        *self.frame.borrow_mut() = None;
        self.reinit = None;
    }
}

impl Drop for ParticleNetwork {
    fn drop(&mut self) {
        self.stop();
    }
}

fn browser_window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window available"))
}

fn request_frame(slot: &FrameClosure) -> Option<i32> {
    let slot = slot.borrow();
    let closure = slot.as_ref()?;
    web_sys::window()?
        .request_animation_frame(closure.as_ref().unchecked_ref())
        .ok()
}
