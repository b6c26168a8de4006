use crate::constants::*;
use crate::dom::js_err;
use crate::field::{self, ParticleField};
use instant::Instant;
use rand::rngs::StdRng;
use rand::SeedableRng;
use stage_core::{css_hex, FrameSnapshot, SnapshotConsumer};
use wasm_bindgen::JsCast;
use web_sys as web;

/// Particle layer on a 2D canvas. Density, blur and link detail come from
/// the frame's effect budget; motion stops entirely under reduced motion.
pub struct ParticleCanvas {
    canvas: web::HtmlCanvasElement,
    ctx: web::CanvasRenderingContext2d,
    field: ParticleField,
    rng: StdRng,
    last_instant: Option<Instant>,
}

impl ParticleCanvas {
    pub fn new(canvas: web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(js_err)?
            .ok_or_else(|| anyhow::anyhow!("2d context unavailable"))?
            .dyn_into::<web::CanvasRenderingContext2d>()
            .map_err(|e| anyhow::anyhow!("unexpected context type: {:?}", e))?;
        Ok(Self {
            canvas,
            ctx,
            field: ParticleField::new(),
            rng: StdRng::from_entropy(),
            last_instant: None,
        })
    }

    fn draw(&self, snapshot: &FrameSnapshot) -> anyhow::Result<()> {
        let w = self.canvas.width() as f64;
        let h = self.canvas.height() as f64;
        let dpr = web::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
        let ctx = &self.ctx;
        ctx.clear_rect(0.0, 0.0, w, h);

        let effects = &snapshot.effects;
        let blur = effects.blur_px * PARTICLE_BLUR_SCALE;
        if blur > 0.0 {
            ctx.set_filter(&format!("blur({blur:.1}px)"));
        } else {
            ctx.set_filter("none");
        }
        let color = css_hex(snapshot.theme.particle_color);
        ctx.set_fill_style_str(&color);
        ctx.set_stroke_style_str(&color);

        let pattern = snapshot.theme.particle_pattern;
        let t = self.field.time();
        let particles = self.field.particles();
        for p in particles {
            ctx.set_global_alpha(field::alpha(pattern, p, t) as f64);
            ctx.begin_path();
            ctx.arc(
                p.pos.x as f64 * w,
                p.pos.y as f64 * h,
                p.radius_px as f64 * dpr,
                0.0,
                std::f64::consts::TAU,
            )
            .map_err(js_err)?;
            ctx.fill();
        }

        if pattern == stage_core::ParticlePattern::Constellation
            && effects.complexity >= CONSTELLATION_MIN_COMPLEXITY
        {
            ctx.set_global_alpha(0.25 * effects.complexity as f64);
            ctx.set_line_width(dpr);
            ctx.begin_path();
            for (i, a) in particles.iter().enumerate() {
                for b in &particles[i + 1..] {
                    if a.pos.distance(b.pos) < CONSTELLATION_LINK_DIST {
                        ctx.move_to(a.pos.x as f64 * w, a.pos.y as f64 * h);
                        ctx.line_to(b.pos.x as f64 * w, b.pos.y as f64 * h);
                    }
                }
            }
            ctx.stroke();
        }
        ctx.set_global_alpha(1.0);
        Ok(())
    }
}

impl SnapshotConsumer for ParticleCanvas {
    fn name(&self) -> &str {
        "particles"
    }

    fn on_snapshot(&mut self, snapshot: &FrameSnapshot) -> anyhow::Result<()> {
        let now = Instant::now();
        let dt = self
            .last_instant
            .map(|prev| (now - prev).as_secs_f32())
            .unwrap_or(0.0);
        self.last_instant = Some(now);

        let count = snapshot.effects.particle_count as usize;
        if count != self.field.len() {
            log::debug!("[scroll] particles {} -> {}", self.field.len(), count);
            self.field.resize_to(count, &mut self.rng);
        }
        if !snapshot.reduce_motion {
            self.field
                .advance(snapshot.theme.particle_pattern, dt, snapshot.effects.complexity);
        }
        self.draw(snapshot)
    }
}
