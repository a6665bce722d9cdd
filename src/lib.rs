mod utils;

pub mod color;
pub mod contact;
pub mod field;
pub mod menu;
pub mod network;
pub mod particle;
pub mod renderer;
pub mod reveal;
pub mod theme;

use wasm_bindgen::prelude::*;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global allocator.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen]
pub fn initialize() {
    utils::set_panic_hook();
}
