use std::collections::HashMap;
use crate::api::types::BrushHandle;
use crate::assets::manifest::BrushManifest;
use crate::math::Rng;

/// Source of brush heads for the growth generators.
///
/// `None` means the palette is unknown, empty or not rasterized yet; callers
/// skip the slot that needed it.
pub trait BrushProvider {
    fn pick(&mut self, palette: &str, rng: &mut Rng) -> Option<BrushHandle>;
}

/// Registry of named brush palettes, built from a BrushManifest.
pub struct BrushRegistry {
    palettes: HashMap<String, Vec<BrushHandle>>,
}

impl BrushRegistry {
    pub fn new() -> Self {
        Self {
            palettes: HashMap::new(),
        }
    }

    /// Build a registry from a parsed manifest. Palette entries naming
    /// unknown brushes are dropped with a warning.
    pub fn from_manifest(manifest: &BrushManifest) -> Self {
        let mut palettes = HashMap::with_capacity(manifest.palettes.len());
        for (palette, names) in &manifest.palettes {
            let handles: Vec<BrushHandle> = names
                .iter()
                .filter_map(|name| match manifest.index_of(name) {
                    Some(idx) => Some(BrushHandle(idx as u32)),
                    None => {
                        log::warn!("palette '{}' names unknown brush '{}'", palette, name);
                        None
                    }
                })
                .collect();
            palettes.insert(palette.clone(), handles);
        }
        Self { palettes }
    }

    /// Register (or replace) a palette directly.
    pub fn insert(&mut self, palette: &str, handles: Vec<BrushHandle>) {
        self.palettes.insert(palette.to_string(), handles);
    }

    /// Brushes in a palette. Returns None if not found.
    pub fn palette(&self, name: &str) -> Option<&[BrushHandle]> {
        self.palettes.get(name).map(Vec::as_slice)
    }
}

impl BrushProvider for BrushRegistry {
    fn pick(&mut self, palette: &str, rng: &mut Rng) -> Option<BrushHandle> {
        let handles = self.palettes.get(palette)?;
        rng.pick(handles).copied()
    }
}

impl Default for BrushRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_from_manifest() {
        let json = r#"{
            "brushes": [ { "name": "a" }, { "name": "b" } ],
            "palettes": { "petal": ["b", "missing", "a"] }
        }"#;
        let manifest = BrushManifest::from_json(json).unwrap();
        let reg = BrushRegistry::from_manifest(&manifest);
        let petal = reg.palette("petal").expect("petal palette should exist");
        assert_eq!(petal, &[BrushHandle(1), BrushHandle(0)]);
    }

    #[test]
    fn pick_stays_inside_palette() {
        let mut reg = BrushRegistry::new();
        reg.insert("plant", vec![BrushHandle(4), BrushHandle(9)]);
        let mut rng = Rng::new(11);
        for _ in 0..20 {
            let h = reg.pick("plant", &mut rng).unwrap();
            assert!(h == BrushHandle(4) || h == BrushHandle(9));
        }
    }

    #[test]
    fn unknown_or_empty_palette_returns_none() {
        let mut reg = BrushRegistry::new();
        reg.insert("empty", Vec::new());
        let mut rng = Rng::new(1);
        assert!(reg.pick("nonexistent", &mut rng).is_none());
        assert!(reg.pick("empty", &mut rng).is_none());
    }
}
