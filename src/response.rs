//! JSON envelopes handed back to callers of the color recognition API.

use serde::Serialize;

use crate::{ColorEntry, ExtractError};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PaletteResponse {
    pub success: bool,
    pub filename: Option<String>,
    pub num_colors: usize,
    pub colors: Vec<ColorEntry>,
}

impl PaletteResponse {
    pub fn new(filename: Option<String>, colors: Vec<ColorEntry>) -> Self {
        Self {
            success: true,
            filename,
            num_colors: colors.len(),
            colors,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub filename: Option<String>,
    pub error: ErrorDetail,
}

impl ErrorResponse {
    pub fn new(filename: Option<String>, err: &ExtractError) -> Self {
        Self::with_code(filename, err.code(), err.to_string())
    }

    /// The input could not be read at all, before any decoding.
    pub fn read_failure(filename: Option<String>, err: &std::io::Error) -> Self {
        Self::with_code(filename, "read_error", format!("unable to read input: {err}"))
    }

    fn with_code(filename: Option<String>, code: &'static str, message: String) -> Self {
        Self {
            success: false,
            filename,
            error: ErrorDetail { code, message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_palette_response_shape() {
        let colors = vec![ColorEntry {
            rgb: [0, 0, 255],
            hex: "#0000ff".to_string(),
            name: "Blue".to_string(),
            weight: 1.0,
        }];
        let response = PaletteResponse::new(Some("sky.png".to_string()), colors);
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "success": true,
                "filename": "sky.png",
                "num_colors": 1,
                "colors": [{"rgb": [0, 0, 255], "hex": "#0000ff", "name": "Blue", "weight": 1.0}],
            })
        );
    }

    #[test]
    fn test_error_response_shape() {
        let err = ExtractError::Decode("bad header".to_string());
        let response = ErrorResponse::new(None, &err);
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "success": false,
                "filename": null,
                "error": {"code": "decode_error", "message": "unable to decode image: bad header"},
            })
        );
    }

    #[test]
    fn test_read_failure_response_shape() {
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let response = ErrorResponse::read_failure(Some("gone.png".to_string()), &err);
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "success": false,
                "filename": "gone.png",
                "error": {"code": "read_error", "message": "unable to read input: no such file"},
            })
        );
    }
}
