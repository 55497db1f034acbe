// Version information for the Fabstir Vision Node

/// Full version string with feature description
pub const VERSION: &str = "v1.0.0-object-detection-2025-08-29";

/// Semantic version number
pub const VERSION_NUMBER: &str = "1.0.0";

/// Build date
pub const BUILD_DATE: &str = "2025-08-29";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "object-detection",
    "yolo-onnx",
    "multipart-upload",
    "cpu-inference",
    "cors-mobile-clients",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Fabstir Vision Node {} ({})", VERSION_NUMBER, BUILD_DATE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_constants() {
        assert!(FEATURES.contains(&"object-detection"));
        assert!(FEATURES.contains(&"yolo-onnx"));
        assert_eq!(VERSION_NUMBER, "1.0.0");
    }

    #[test]
    fn test_version_string() {
        let version = get_version_string();
        assert!(version.contains("1.0.0"));
        assert!(version.contains("2025-08-29"));
    }
}
