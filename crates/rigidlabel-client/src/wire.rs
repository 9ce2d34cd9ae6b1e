#![forbid(unsafe_code)]

//! JSON bodies exchanged with the transform service.
//!
//! Every response uses the same envelope:
//!
//! ```json
//! { "status": "ok" | "error", "message": "...", "error_code": "...", "data": { ... } }
//! ```
//!
//! Points are sent in whatever frame the caller converted them to; the
//! service does not know about origin modes.

use rigidlabel_core::{Matrix3, OriginMode, Point2, RigidParams, TransformMode, TransformResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ErrorCode, Result, ServiceError};

pub const MIN_BOARD_SIZE: u32 = 2;
pub const MAX_BOARD_SIZE: u32 = 64;
pub const DEFAULT_BOARD_SIZE: u32 = 8;

/// One correspondence as sent over the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TiePointDto {
    pub fixed: Point2,
    pub moving: Point2,
}

impl From<(Point2, Point2)> for TiePointDto {
    fn from((fixed, moving): (Point2, Point2)) -> Self {
        Self { fixed, moving }
    }
}

/// Body of `POST /compute/rigid`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputeRequest {
    pub tie_points: Vec<TiePointDto>,
    pub transform_mode: TransformMode,
    pub min_points_required: usize,
}

/// `data` of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthInfo {
    pub version: String,
    #[serde(default)]
    pub backend: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Frame of `tie_points` and `matrix_3x3`. Absent on labels written
    /// before origin modes existed, which are top-left.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_center_origin: Option<bool>,
}

/// A stored label: the image pair, its transform, and the points used.
///
/// Doubles as the body of `POST /labels/save`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub image_fixed: String,
    pub image_moving: String,
    pub rigid: RigidParams,
    pub matrix_3x3: Matrix3,
    #[serde(default)]
    pub tie_points: Vec<TiePointDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<LabelMeta>,
}

impl Label {
    /// Build a label from a computed transform.
    #[must_use]
    pub fn from_result(
        image_fixed: impl Into<String>,
        image_moving: impl Into<String>,
        result: &TransformResult,
        tie_points: Vec<TiePointDto>,
    ) -> Self {
        Self {
            image_fixed: image_fixed.into(),
            image_moving: image_moving.into(),
            rigid: result.rigid,
            matrix_3x3: result.matrix,
            tie_points,
            meta: None,
        }
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        let comment = comment.into();
        if !comment.is_empty() {
            self.meta.get_or_insert_with(LabelMeta::default).comment = Some(comment);
        }
        self
    }

    /// Record the frame the points and matrix are expressed in.
    #[must_use]
    pub fn with_origin(mut self, mode: OriginMode) -> Self {
        self.meta
            .get_or_insert_with(LabelMeta::default)
            .use_center_origin = Some(mode.is_center());
        self
    }

    /// Frame of the stored points and matrix.
    #[must_use]
    pub fn origin_mode(&self) -> OriginMode {
        match self.meta.as_ref().and_then(|meta| meta.use_center_origin) {
            Some(true) => OriginMode::Center,
            Some(false) | None => OriginMode::TopLeft,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSaveResult {
    pub label_path: String,
    pub label_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelListItem {
    pub label_id: String,
    pub label_path: String,
    pub image_fixed: String,
    pub image_moving: String,
}

/// Body of `POST /warp/checkerboard`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckerboardRequest {
    pub image_fixed: String,
    pub image_moving: String,
    pub matrix_3x3: Matrix3,
    pub board_size: u32,
    pub use_center_origin: bool,
}

impl CheckerboardRequest {
    /// A request with the default board size.
    #[must_use]
    pub fn new(
        image_fixed: impl Into<String>,
        image_moving: impl Into<String>,
        matrix_3x3: Matrix3,
        use_center_origin: bool,
    ) -> Self {
        Self {
            image_fixed: image_fixed.into(),
            image_moving: image_moving.into(),
            matrix_3x3,
            board_size: DEFAULT_BOARD_SIZE,
            use_center_origin,
        }
    }

    #[must_use]
    pub fn with_board_size(mut self, board_size: u32) -> Self {
        self.board_size = board_size;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&self.board_size) {
            return Err(ServiceError::invalid(format!(
                "board_size must be within {MIN_BOARD_SIZE}..={MAX_BOARD_SIZE}, got {}",
                self.board_size
            )));
        }
        Ok(())
    }
}

/// `data` of `POST /warp/checkerboard`: a base64 encoded PNG.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckerboardPreview {
    pub image_base64: String,
    pub width: u32,
    pub height: u32,
}

// ============================================================================
// Envelope
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl Envelope {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }

    /// Unwrap `data` into `T`, or turn an error envelope into
    /// [`ServiceError::Api`].
    pub fn into_data<T: DeserializeOwned>(self, endpoint: &str) -> Result<T> {
        if !self.is_ok() {
            let code = self
                .error_code
                .as_deref()
                .map_or(ErrorCode::InternalError, ErrorCode::from);
            let message = self
                .message
                .unwrap_or_else(|| format!("{endpoint} failed ({code})"));
            return Err(ServiceError::Api { code, message });
        }
        let data = self.data.ok_or_else(|| ServiceError::MissingData {
            endpoint: endpoint.to_string(),
        })?;
        serde_json::from_value(data).map_err(|source| ServiceError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }
}

/// Decode a response body. Non-2xx statuses still carry an envelope when
/// the service produced the error itself.
pub fn decode_response<T: DeserializeOwned>(endpoint: &str, status: u16, body: &str) -> Result<T> {
    match serde_json::from_str::<Envelope>(body) {
        Ok(envelope) => envelope.into_data(endpoint),
        Err(_) if !(200..300).contains(&status) => Err(ServiceError::Http {
            endpoint: endpoint.to_string(),
            status,
            body: body.chars().take(512).collect(),
        }),
        Err(source) => Err(ServiceError::Decode {
            endpoint: endpoint.to_string(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compute_success_decodes_with_defaults() {
        let body = r#"{
            "status": "ok",
            "message": null,
            "error_code": null,
            "data": {
                "rigid": {"theta_deg": 1.0, "tx": 2.0, "ty": 3.0},
                "matrix_3x3": [[1,0,2],[0,1,3],[0,0,1]],
                "rms_error": 0.25,
                "num_points": 4
            }
        }"#;
        let result: TransformResult = decode_response("/compute/rigid", 200, body).expect("ok");
        assert_eq!(result.num_points, 4);
        assert_eq!(result.rigid.scale_x, 1.0);
        assert_eq!(result.matrix[0][2], 2.0);
    }

    #[test]
    fn error_envelope_becomes_api_error_even_on_4xx() {
        let body = r#"{"status":"error","error_code":"NOT_ENOUGH_POINTS","message":"need 3 points"}"#;
        let err = decode_response::<TransformResult>("/compute/rigid", 400, body)
            .expect_err("api error");
        assert_eq!(err.code(), Some(&ErrorCode::NotEnoughPoints));
        assert_eq!(err.to_string(), "need 3 points");
    }

    #[test]
    fn non_json_error_page_reports_status() {
        let err = decode_response::<HealthInfo>("/health", 502, "<html>Bad Gateway</html>")
            .expect_err("http error");
        assert!(matches!(err, ServiceError::Http { status: 502, .. }));
    }

    #[test]
    fn ok_without_data_is_an_error() {
        let err = decode_response::<HealthInfo>("/health", 200, r#"{"status":"ok"}"#)
            .expect_err("missing data");
        assert!(matches!(err, ServiceError::MissingData { .. }));
    }

    #[test]
    fn compute_request_serializes_mode_lowercase() {
        let request = ComputeRequest {
            tie_points: vec![(Point2::new(1.0, 2.0), Point2::new(3.0, 4.0)).into()],
            transform_mode: TransformMode::Similarity,
            min_points_required: 2,
        };
        let json = serde_json::to_value(&request).expect("serialize");
        assert_eq!(json["transform_mode"], "similarity");
        assert_eq!(json["tie_points"][0]["moving"]["y"], 4.0);
    }

    #[test]
    fn label_comment_goes_into_meta() {
        let result = TransformResult {
            rigid: RigidParams::default(),
            matrix: rigidlabel_core::IDENTITY,
            rms_error: 0.0,
            num_points: 2,
        };
        let label = Label::from_result("a.png", "b.png", &result, Vec::new()).with_comment("ok");
        let json = serde_json::to_value(&label).expect("serialize");
        assert_eq!(json["meta"]["comment"], "ok");
        assert!(json["meta"].get("timestamp").is_none());

        let bare = Label::from_result("a.png", "b.png", &result, Vec::new()).with_comment("");
        assert!(serde_json::to_value(&bare).expect("serialize").get("meta").is_none());
    }

    #[test]
    fn label_records_its_origin() {
        let result = TransformResult {
            rigid: RigidParams::default(),
            matrix: rigidlabel_core::IDENTITY,
            rms_error: 0.0,
            num_points: 0,
        };
        let label = Label::from_result("a.png", "b.png", &result, Vec::new())
            .with_origin(OriginMode::Center);
        let json = serde_json::to_value(&label).expect("serialize");
        assert_eq!(json["meta"]["use_center_origin"], true);
        assert_eq!(label.origin_mode(), OriginMode::Center);

        let legacy: Label = serde_json::from_value(serde_json::json!({
            "image_fixed": "a.png",
            "image_moving": "b.png",
            "rigid": {"theta_deg": 0.0, "tx": 0.0, "ty": 0.0},
            "matrix_3x3": [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            "meta": {"comment": "old"}
        }))
        .expect("deserialize");
        assert_eq!(legacy.origin_mode(), OriginMode::TopLeft);
    }

    #[test]
    fn board_size_bounds() {
        let request = CheckerboardRequest::new("a", "b", rigidlabel_core::IDENTITY, true);
        assert_eq!(request.board_size, 8);
        assert!(request.validate().is_ok());
        assert!(request.clone().with_board_size(1).validate().is_err());
        assert!(request.clone().with_board_size(64).validate().is_ok());
        assert!(request.with_board_size(65).validate().is_err());
    }
}
