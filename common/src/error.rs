//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown field `{field}` on {kind}")]
    UnknownField { kind: String, field: String },

    #[error("Record is not a JSON object: {0}")]
    NotAnObject(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let error = Error::Json(json_error);
        assert!(format!("{}", error).contains("JSON error"));
    }

    #[test]
    fn test_error_display_unknown_field() {
        let error = Error::UnknownField {
            kind: "order".to_string(),
            field: "colour".to_string(),
        };
        assert_eq!(format!("{}", error), "Unknown field `colour` on order");
    }

    #[test]
    fn test_error_from_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: Error = json_error.into();
        assert!(matches!(error, Error::Json(_)));
    }

    #[test]
    fn test_error_debug() {
        let error = Error::InvalidValue("テスト".to_string());
        let debug = format!("{:?}", error);
        assert!(debug.contains("InvalidValue"));
        assert!(debug.contains("テスト"));
    }
}
