pub mod runner;

pub use runner::SketchRunner;

// Used by code generated in `export_sketch!`.
#[doc(hidden)]
pub use js_sys;

/// Generate all `#[wasm_bindgen]` exports for a sketch.
///
/// Generates:
/// - `thread_local!` storage for the SketchRunner
/// - a `with_runner()` helper that is a no-op before `sketch_init()`
/// - all wasm-bindgen exports (init, tick, loaders, buffer accessors)
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
///
/// mod sketch;
/// use sketch::Meadow;
///
/// bloom_web::export_sketch!(Meadow, "meadow");
/// ```
///
/// # Arguments
///
/// - `$sketch_type`: a type implementing `bloom_engine::Sketch` with a `new()` constructor
/// - `$sketch_name`: a string literal used in log messages
#[macro_export]
macro_rules! export_sketch {
    ($sketch_type:ty, $sketch_name:literal) => {
        use std::cell::RefCell;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::SketchRunner<$sketch_type>>> = RefCell::new(None);
        }

        fn with_runner<R>(f: impl FnOnce(&mut $crate::SketchRunner<$sketch_type>) -> R) -> Option<R> {
            RUNNER.with(|cell| {
                let mut borrow = cell.borrow_mut();
                match borrow.as_mut() {
                    Some(runner) => Some(f(runner)),
                    None => {
                        log::warn!("{}: not initialized, call sketch_init() first", $sketch_name);
                        None
                    }
                }
            })
        }

        #[wasm_bindgen]
        pub fn sketch_init() {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            let sketch = <$sketch_type>::new();
            let runner = $crate::SketchRunner::new(sketch);

            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });

            with_runner(|r| r.init());
            log::info!("{}: initialized", $sketch_name);
        }

        #[wasm_bindgen]
        pub fn sketch_tick(dt: f32) {
            with_runner(|r| r.tick(dt));
        }

        #[wasm_bindgen]
        pub fn sketch_load_manifest(json: &str) {
            with_runner(|r| r.load_manifest(json));
        }

        #[wasm_bindgen]
        pub fn sketch_load_species(json: &str) {
            with_runner(|r| r.load_species(json));
        }

        #[wasm_bindgen]
        pub fn sketch_clear() {
            with_runner(|r| r.clear());
        }

        #[wasm_bindgen]
        pub fn sketch_set_view(angle_x: f32, angle_y: f32, angle_z: f32) {
            with_runner(|r| r.set_view_angles(angle_x, angle_y, angle_z));
        }

        #[wasm_bindgen]
        pub fn sketch_particle_count() -> u32 {
            with_runner(|r| r.particle_count()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn sketch_frame() -> u32 {
            with_runner(|r| r.frame()).unwrap_or(0)
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn get_strokes_ptr() -> *const f32 {
            with_runner(|r| r.strokes_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_stroke_count() -> u32 {
            with_runner(|r| r.stroke_count()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn get_stroke_floats() -> u32 {
            bloom_engine::StrokeInstance::FLOATS as u32
        }

        #[wasm_bindgen]
        pub fn get_curve_vertices_ptr() -> *const f32 {
            with_runner(|r| r.curve_vertices_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_curve_vertex_count() -> u32 {
            with_runner(|r| r.curve_vertex_count()).unwrap_or(0)
        }

        /// Copy of this tick's curve vertices for hosts without shared memory.
        #[wasm_bindgen]
        pub fn get_curve_vertices() -> $crate::js_sys::Float32Array {
            with_runner(|r| $crate::js_sys::Float32Array::from(r.curve_vertices()))
                .unwrap_or_else(|| $crate::js_sys::Float32Array::new_with_length(0))
        }

        // ---- Capacity accessors ----

        #[wasm_bindgen]
        pub fn get_max_strokes() -> u32 {
            with_runner(|r| r.max_strokes()).unwrap_or(0)
        }
    };
}
