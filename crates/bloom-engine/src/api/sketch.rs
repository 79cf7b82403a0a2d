use std::collections::HashMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::core::garden::Garden;
use crate::renderer::view::ViewParams;
use crate::systems::field::PlantingRequest;
use crate::systems::growth::SpeciesProfile;

/// Configuration for a garden, provided by the sketch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GardenConfig {
    /// Simulation frame duration in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Seed for both the random stream and the noise field.
    pub seed: u64,
    /// Initial view orientation and camera.
    pub view: ViewParams,
    /// Maximum strokes recorded per frame (default: 16384).
    pub max_strokes: usize,
    /// Initial particle storage (default: 1024).
    pub max_particles: usize,
}

impl Default for GardenConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            seed: 42,
            view: ViewParams::default(),
            max_strokes: 16384,
            max_particles: 1024,
        }
    }
}

impl GardenConfig {
    /// Parse a config from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    // -- Builder pattern --

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_view(mut self, view: ViewParams) -> Self {
        self.view = view;
        self
    }

    pub fn with_max_strokes(mut self, max: usize) -> Self {
        self.max_strokes = max;
        self
    }
}

/// The contract every sketch must fulfil.
pub trait Sketch {
    /// Return garden configuration. Called once before init.
    fn config(&self) -> GardenConfig {
        GardenConfig::default()
    }

    /// Register species and plant the initial field.
    fn init(&mut self, ctx: &mut SketchContext);

    /// Called once per simulation frame, before the garden steps.
    fn update(&mut self, _ctx: &mut SketchContext) {}
}

/// Mutable access to the garden and its known species, passed to Sketch hooks.
pub struct SketchContext {
    pub garden: Garden,
    species: HashMap<String, Rc<SpeciesProfile>>,
}

impl SketchContext {
    pub fn new(config: &GardenConfig) -> Self {
        Self {
            garden: Garden::new(config),
            species: HashMap::new(),
        }
    }

    /// Register a species under its profile name, replacing any previous one.
    pub fn register_species(&mut self, profile: SpeciesProfile) -> Rc<SpeciesProfile> {
        let profile = Rc::new(profile);
        self.species.insert(profile.name.clone(), profile.clone());
        profile
    }

    /// Look up a registered species by name.
    pub fn species(&self, name: &str) -> Option<Rc<SpeciesProfile>> {
        self.species.get(name).cloned()
    }

    /// Plant a field of a registered species. Unknown names plant nothing.
    pub fn plant(&mut self, species: &str, request: &PlantingRequest) -> usize {
        match self.species(species) {
            Some(profile) => self.garden.plant(request, &profile),
            None => {
                log::warn!("unknown species '{}', nothing planted", species);
                0
            }
        }
    }
}
