use std::f64::consts::{FRAC_PI_2, FRAC_PI_3, PI};

use serde::{Deserialize, Serialize};

use crate::api::types::Rgba;
use crate::extensions::easing::Easing;
use crate::math::Rng;

/// Inclusive-exclusive sampling range, written `[min, max]` in JSON.
pub type Span = (f64, f64);

#[inline]
pub(crate) fn sample(rng: &mut Rng, span: Span) -> f64 {
    rng.range(span.0, span.1)
}

/// Integer count in `[min, max)`, truncated like the float draw it replaces.
#[inline]
pub(crate) fn sample_count(rng: &mut Rng, span: Span) -> u32 {
    sample(rng, span).max(0.0) as u32
}

/// Per-species style data for the whole growth chain.
///
/// Everything that differs between flower kinds lives here: counts, radii,
/// tilt signs, palettes. The generators themselves are shared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesProfile {
    pub name: String,
    pub stem: StemProfile,
    /// Present for plants that carry several flower heads along the stem.
    #[serde(default)]
    pub spikes: Option<SpikeProfile>,
    pub flower: FlowerProfile,
    pub petals: PetalProfile,
    #[serde(default)]
    pub stamens: Option<StamenProfile>,
    #[serde(default)]
    pub pollen: Option<PollenProfile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StemProfile {
    pub palette: String,
    pub color: Rgba,
    /// Upward speed; the initial direction is `(0, -(lift + 1), 0)`.
    pub lift: Span,
    /// Upper bound of the random lean applied to the initial direction.
    pub max_tilt: f64,
    pub radius: Span,
    pub lifespan: Span,
    pub velocity_shrink: f64,
    pub radius_shrink: f64,
    /// Downward pull per tick (world `+y` is down).
    pub gravity: f64,
    pub speed_limit: f64,
    pub jitter: f64,
    pub segments: u32,
    pub wind: WindProfile,
}

/// Noise-driven sway added to the stem position every tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindProfile {
    /// Frames per unit of noise time.
    pub period: f64,
    /// Peak displacement per tick on each axis.
    pub amplitude: [f64; 3],
    /// Noise-space offset decorrelating the y and z axes.
    pub offset: f64,
}

/// Flower heads spread over the top of a stem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpikeProfile {
    pub count: Span,
    /// Fraction of the stem path where the lowest head sits.
    pub start: f64,
    /// Fraction of the path covered from `start` to the tip.
    pub span: f64,
    /// Ticks between consecutive heads opening, lowest first.
    pub stagger_ticks: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowerProfile {
    pub scale: Span,
    /// Upper bound of the random lean of the flower centre.
    pub center_tilt: f64,
    /// Lerp factor from the perpendicular basis toward the stem axis.
    /// Negative values tilt the petals away from the axis.
    pub petal_tilt: Span,
    pub petal_count: Span,
    pub radius: Span,
    /// Upper bound of the random start angle; 0 keeps every flower aligned.
    pub start_angle: f64,
    pub rotate_factor: Span,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PetalProfile {
    /// One palette is drawn per petal, then two brushes from it.
    pub palettes: Vec<String>,
    pub color: Rgba,
    /// Initial speed along the petal direction; the sign picks outward or inward curl.
    pub speed: f64,
    /// Upper bound of the cone scatter applied to each petal direction.
    pub scatter: f64,
    pub radius_shrink: f64,
    pub velocity_shrink: f64,
    /// Lifespan as a multiple of radius.
    pub lifespan_factor: f64,
    pub segments: u32,
    pub easing: Easing,
    pub easing_passes: u32,
    pub shape_scale: f64,
    /// Strength of the bend toward the flower centre.
    pub bend: f64,
    /// Per-axis wobble amplitude in radians. 0 disables it.
    pub wobble: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StamenProfile {
    pub palettes: Vec<String>,
    pub color: Rgba,
    pub count: Span,
    pub radius: Span,
    /// Signed lerp toward the stem axis, drawn per stamen.
    pub tilt: Span,
    /// Signed speed; negative retracts toward the centre.
    pub speed: Span,
    pub radius_shrink: f64,
    pub velocity_shrink: f64,
    pub lifespan_factor: f64,
    pub segments: u32,
    pub bend: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollenProfile {
    pub palette: String,
    pub color: Rgba,
    pub radius: Span,
    pub lifespan_factor: f64,
    /// Fraction of the stamen's direction kept as initial velocity.
    pub speed: Span,
    pub scatter: f64,
    pub radius_shrink: f64,
    pub velocity_shrink: f64,
    pub segments: u32,
    pub easing: Easing,
}

const GREEN: Rgba = [0.33, 1.0, 0.0, 1.0];
const RED: Rgba = [1.0, 0.0, 0.0, 1.0];
const PURPLE: Rgba = [0.6, 0.4, 0.8, 1.0];
const WHITE: Rgba = [1.0, 1.0, 1.0, 1.0];
const YELLOW: Rgba = [1.0, 0.83, 0.0, 1.0];

impl SpeciesProfile {
    /// Parse a profile from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize for editing or shipping to a host.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Red spider lily: a tall leaning stem, one wide crown of long curled
    /// petals, a ring of stamens tipped with pollen.
    pub fn lycoris() -> Self {
        let petal_palettes = vec![
            "red_black".to_string(),
            "red_white".to_string(),
            "red".to_string(),
        ];
        Self {
            name: "lycoris".into(),
            stem: StemProfile {
                palette: "plant".into(),
                color: GREEN,
                lift: (0.9, 1.0),
                max_tilt: FRAC_PI_2,
                radius: (15.0, 25.0),
                lifespan: (40.0, 250.0),
                velocity_shrink: 0.995,
                radius_shrink: 0.995,
                gravity: 0.01,
                speed_limit: 5.0,
                jitter: 5.0,
                segments: 10,
                wind: WindProfile {
                    period: 30.0,
                    amplitude: [1.1, 1.1, 1.1],
                    offset: 1000.0,
                },
            },
            spikes: None,
            flower: FlowerProfile {
                scale: (0.25, 0.4),
                center_tilt: FRAC_PI_2,
                petal_tilt: (0.3, 0.5),
                petal_count: (20.0, 40.0),
                radius: (30.0, 50.0),
                start_angle: PI,
                rotate_factor: (0.3, 1.2),
            },
            petals: PetalProfile {
                palettes: petal_palettes.clone(),
                color: RED,
                speed: 1.2,
                scatter: FRAC_PI_3,
                radius_shrink: 0.995,
                velocity_shrink: 1.02,
                lifespan_factor: 2.0,
                segments: 5,
                easing: Easing::SineOut,
                easing_passes: 2,
                shape_scale: 1.4,
                bend: 0.1,
                wobble: 1.0 / 30.0,
            },
            stamens: Some(StamenProfile {
                palettes: petal_palettes,
                color: WHITE,
                count: (35.0, 40.0),
                radius: (30.0, 40.0),
                tilt: (-0.21, 0.0),
                speed: (-3.0, -2.0),
                radius_shrink: 0.975,
                velocity_shrink: 1.02,
                lifespan_factor: 2.0,
                segments: 8,
                bend: 0.04,
            }),
            pollen: Some(PollenProfile {
                palette: "yellow".into(),
                color: YELLOW,
                radius: (4.0, 8.0),
                lifespan_factor: 2.5,
                speed: (0.8, 1.0),
                scatter: PI,
                radius_shrink: 0.98,
                velocity_shrink: 0.9,
                segments: 5,
                easing: Easing::QuadInOut,
            }),
        }
    }

    /// Lavender: a stiffer, gentler stem whose top third carries a column of
    /// small inward-curling heads. No stamens.
    pub fn lavender() -> Self {
        Self {
            name: "lavender".into(),
            stem: StemProfile {
                palette: "plant".into(),
                color: GREEN,
                lift: (0.9, 1.0),
                max_tilt: 35f64.to_radians(),
                radius: (15.0, 25.0),
                lifespan: (60.0, 200.0),
                velocity_shrink: 0.998,
                radius_shrink: 0.997,
                gravity: 0.005,
                speed_limit: 3.0,
                jitter: 3.0,
                segments: 12,
                wind: WindProfile {
                    period: 50.0,
                    amplitude: [0.3, 0.12, 0.3],
                    offset: 1500.0,
                },
            },
            spikes: Some(SpikeProfile {
                count: (4.0, 9.0),
                start: 0.7,
                span: 0.3,
                stagger_ticks: 9,
            }),
            flower: FlowerProfile {
                scale: (0.25, 0.4),
                center_tilt: FRAC_PI_2,
                petal_tilt: (-0.4, -0.2),
                petal_count: (6.0, 12.0),
                radius: (20.0, 50.0),
                start_angle: 0.0,
                rotate_factor: (0.3, 1.0),
            },
            petals: PetalProfile {
                palettes: vec![
                    "purple_black".into(),
                    "purple_white".into(),
                    "purple".into(),
                    "white".into(),
                ],
                color: PURPLE,
                speed: -0.8,
                scatter: FRAC_PI_3,
                radius_shrink: 0.995,
                velocity_shrink: 1.02,
                lifespan_factor: 2.0,
                segments: 5,
                easing: Easing::SineOut,
                easing_passes: 2,
                shape_scale: 1.4,
                bend: 0.1,
                wobble: 1.0 / 30.0,
            },
            stamens: None,
            pollen: None,
        }
    }

    /// Look up a built-in profile by name.
    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            "lycoris" => Some(Self::lycoris()),
            "lavender" => Some(Self::lavender()),
            _ => None,
        }
    }
}
