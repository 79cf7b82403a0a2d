use bloom_engine::*;
use glam::DVec3;

const LAYOUTS: [PlantingLayout; 4] = [
    PlantingLayout::Cluster,
    PlantingLayout::Spiral,
    PlantingLayout::Grid,
    PlantingLayout::Scatter,
];

/// Frames to wait on an empty garden before replanting.
const REST_FRAMES: u32 = 90;

/// Red spider lilies, sometimes edged with lavender. When every plant has
/// faded the garden rests briefly, then regrows in the next layout.
pub struct LycorisField {
    layout: usize,
    resting: u32,
}

impl LycorisField {
    pub fn new() -> Self {
        Self {
            layout: 0,
            resting: 0,
        }
    }

    fn plant(&mut self, ctx: &mut SketchContext) {
        let layout = LAYOUTS[self.layout % LAYOUTS.len()];
        let lilies = PlantingRequest::new(24).with_layout(layout);
        let planted = ctx.plant("lycoris", &lilies);

        // a centrepiece that always blooms in view
        if let Some(lycoris) = ctx.species("lycoris") {
            ctx.garden.plant_stem(DVec3::new(0.0, 300.0, 0.0), &lycoris);
        }

        let mut lavender = 0;
        if ctx.garden.rng().chance(0.5) {
            let border = PlantingRequest::new(12).with_bounds(
                (-160.0, 160.0),
                (-10.0, 10.0),
                (80.0, 140.0),
            );
            lavender = ctx.plant("lavender", &border);
        }
        log::info!(
            "lycoris-field: {:?} layout, {} lilies, {} lavender",
            layout,
            planted,
            lavender
        );
    }
}

impl Default for LycorisField {
    fn default() -> Self {
        Self::new()
    }
}

impl Sketch for LycorisField {
    fn config(&self) -> GardenConfig {
        GardenConfig {
            seed: 1337,
            view: ViewParams {
                angle_x: -0.25,
                ..ViewParams::default()
            },
            ..GardenConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut SketchContext) {
        ctx.register_species(SpeciesProfile::lycoris());
        ctx.register_species(SpeciesProfile::lavender());
        self.plant(ctx);
    }

    fn update(&mut self, ctx: &mut SketchContext) {
        if ctx.garden.scene().alive_count() > 0 {
            return;
        }
        self.resting += 1;
        if self.resting >= REST_FRAMES {
            self.resting = 0;
            self.layout += 1;
            ctx.garden.clear();
            self.plant(ctx);
        }
    }
}
