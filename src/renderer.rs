// Renderer struct that owns the 2d context grabbed from the canvas and
// draws one frame of the field: a full clear, the connection lines,
// then the particle dots. Colors come in light and dark variants keyed
// off the theme flag passed in each frame.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::color::Color;
use crate::field::{Connection, ParticleField};

pub struct Renderer {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl Renderer {
    // Both themes fill the dots at the same alpha.
    const PARTICLE_ALPHA: f64 = 0.5;
    // Line alpha for a zero-distance pair, per theme.
    const LINK_ALPHA_DARK: f64 = 0.2;
    const LINK_ALPHA_LIGHT: f64 = 0.1;

    const PARTICLE_DARK: u32 = 0xe2e8f0ff;
    const PARTICLE_LIGHT: u32 = 0x334155ff;
    const LINK_DARK: u32 = 0x94a3b8ff;
    const LINK_LIGHT: u32 = 0x475569ff;

    // On creation grabs a reference to the 2d context from the canvas
    // on the DOM. A canvas without one is a page construction error.
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Renderer, JsValue> {
        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        Ok(Renderer {
            canvas: canvas.clone(),
            context,
        })
    }

    pub fn render(&self, field: &ParticleField, dark: bool) -> Result<(), JsValue> {
        self.clear_screen();
        self.draw_connections(&field.connections(), dark);
        self.draw_particles(field, dark)
    }

    // One whole-canvas clear per frame, before anything draws.
    fn clear_screen(&self) {
        self.context.clear_rect(
            0.0,
            0.0,
            self.canvas.width() as f64,
            self.canvas.height() as f64,
        );
    }

    fn draw_particles(&self, field: &ParticleField, dark: bool) -> Result<(), JsValue> {
        let fill = if dark {
            Color::from_u32(Self::PARTICLE_DARK)
        } else {
            Color::from_u32(Self::PARTICLE_LIGHT)
        };
        let style = JsValue::from_str(&fill.to_css_with_alpha(Self::PARTICLE_ALPHA));
        self.context.set_fill_style(&style);

        for particle in field.particles() {
            self.context.begin_path();
            self.context.arc(
                particle.pos[0],
                particle.pos[1],
                particle.size(),
                0.0,
                std::f64::consts::PI * 2.0,
            )?;
            self.context.fill();
        }
        Ok(())
    }

    fn draw_connections(&self, connections: &[Connection], dark: bool) {
        let (color, base_alpha) = if dark {
            (Color::from_u32(Self::LINK_DARK), Self::LINK_ALPHA_DARK)
        } else {
            (Color::from_u32(Self::LINK_LIGHT), Self::LINK_ALPHA_LIGHT)
        };
        self.context.set_line_width(1.0);

        for link in connections {
            let style = JsValue::from_str(&color.to_css_with_alpha(link.strength * base_alpha));
            self.context.set_stroke_style(&style);
            self.context.begin_path();
            self.context.move_to(link.from[0], link.from[1]);
            self.context.line_to(link.to[0], link.to[1]);
            self.context.stroke();
        }
    }
}
