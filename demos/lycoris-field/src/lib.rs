use wasm_bindgen::prelude::*;

mod sketch;
use sketch::LycorisField;

bloom_web::export_sketch!(LycorisField, "lycoris-field");
