use bloom_engine::{
    BrushManifest, BrushRegistry, GardenConfig, Sketch, SketchContext, SpeciesProfile,
    StrokeBuffer,
};

/// Generic sketch runner that wires up the frame loop.
///
/// Each concrete sketch keeps one in a `thread_local!` and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export
/// generic structs directly. See `export_sketch!`.
pub struct SketchRunner<S: Sketch> {
    sketch: S,
    ctx: SketchContext,
    strokes: StrokeBuffer,
    config: GardenConfig,
    initialized: bool,
}

impl<S: Sketch> SketchRunner<S> {
    pub fn new(sketch: S) -> Self {
        let config = sketch.config();
        let ctx = SketchContext::new(&config);
        let strokes = StrokeBuffer::new(config.max_strokes);

        Self {
            sketch,
            ctx,
            strokes,
            config,
            initialized: false,
        }
    }

    /// Initialize the sketch. Call once after construction.
    pub fn init(&mut self) {
        self.sketch.init(&mut self.ctx);
        self.initialized = true;
    }

    /// Run one host tick: as many simulation frames as `dt` covers, each
    /// painted into the stroke buffer. Strokes accumulate across the frames
    /// of one tick and are cleared at the start of the next.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }

        self.strokes.clear();

        let steps = self.ctx.garden.accumulate(dt);
        for _ in 0..steps {
            self.sketch.update(&mut self.ctx);
            self.ctx.garden.step();
            self.ctx.garden.render(&mut self.strokes);
        }

        if self.strokes.dropped() > 0 {
            log::warn!(
                "stroke buffer full: {} strokes dropped this tick",
                self.strokes.dropped()
            );
        }
    }

    /// Install brushes from a JSON manifest. Invalid JSON keeps the current brushes.
    pub fn load_manifest(&mut self, json: &str) {
        match BrushManifest::from_json(json) {
            Ok(manifest) => {
                let registry = BrushRegistry::from_manifest(&manifest);
                self.ctx.garden.set_brushes(Box::new(registry));
                log::info!(
                    "loaded {} brushes in {} palettes",
                    manifest.brushes.len(),
                    manifest.palettes.len()
                );
            }
            Err(err) => log::warn!("brush manifest rejected: {}", err),
        }
    }

    /// Register a species profile from JSON.
    pub fn load_species(&mut self, json: &str) {
        match SpeciesProfile::from_json(json) {
            Ok(profile) => {
                let profile = self.ctx.register_species(profile);
                log::info!("registered species '{}'", profile.name);
            }
            Err(err) => log::warn!("species profile rejected: {}", err),
        }
    }

    /// Remove every particle; the sketch may replant on its next update.
    pub fn clear(&mut self) {
        self.ctx.garden.clear();
        self.strokes.clear();
    }

    /// Rotate the view. Takes effect on the next painted frame.
    pub fn set_view_angles(&mut self, x: f32, y: f32, z: f32) {
        let view = &mut self.ctx.garden.view;
        view.angle_x = x as f64;
        view.angle_y = y as f64;
        view.angle_z = z as f64;
    }

    pub fn context(&self) -> &SketchContext {
        &self.ctx
    }

    // ---- Pointer accessors for host reads ----

    pub fn strokes_ptr(&self) -> *const f32 {
        self.strokes.instances_ptr()
    }

    pub fn stroke_count(&self) -> u32 {
        self.strokes.instance_count()
    }

    pub fn curve_vertices_ptr(&self) -> *const f32 {
        self.strokes.curve_vertices_ptr()
    }

    pub fn curve_vertex_count(&self) -> u32 {
        self.strokes.curve_vertex_count()
    }

    /// Curve vertices as a flat `x, y, x, y, ...` slice.
    pub fn curve_vertices(&self) -> &[f32] {
        self.strokes.curve_vertices().as_flattened()
    }

    pub fn particle_count(&self) -> u32 {
        self.ctx.garden.particle_count() as u32
    }

    pub fn frame(&self) -> u32 {
        self.ctx.garden.frame() as u32
    }

    // ---- Capacity accessors ----

    pub fn max_strokes(&self) -> u32 {
        self.config.max_strokes as u32
    }
}
