use js_sys::{Array, Object, Reflect};
use wasm_bindgen::prelude::*;

use crate::{ColorTable, PaletteOptions, extract_palette_with};

/// Extract the dominant colors of an encoded image for JavaScript callers.
///
/// Returns an array of `{ rgb: [r, g, b], hex, name, weight }` objects, most
/// prevalent first. `seed` defaults to the same fixed seed the native API uses.
#[wasm_bindgen(js_name = extractPalette)]
pub fn extract_palette_js(
    input: Vec<u8>,
    num_colors: usize,
    seed: Option<u32>,
) -> Result<Array, JsValue> {
    let mut options = PaletteOptions::default();
    if let Some(seed) = seed {
        options.seed = u64::from(seed);
    }

    let colors = extract_palette_with(&input, num_colors, &options, ColorTable::css3())
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let out = Array::new();
    for color in colors {
        let rgb = Array::new();
        for channel in color.rgb {
            rgb.push(&JsValue::from(channel));
        }

        let entry = Object::new();
        Reflect::set(&entry, &JsValue::from_str("rgb"), &rgb)?;
        Reflect::set(&entry, &JsValue::from_str("hex"), &JsValue::from_str(&color.hex))?;
        Reflect::set(&entry, &JsValue::from_str("name"), &JsValue::from_str(&color.name))?;
        Reflect::set(&entry, &JsValue::from_str("weight"), &JsValue::from(color.weight))?;
        out.push(&entry);
    }

    Ok(out)
}
