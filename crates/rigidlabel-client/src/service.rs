#![forbid(unsafe_code)]

use rigidlabel_core::TransformResult;

use crate::error::Result;
use crate::wire::{
    CheckerboardPreview, CheckerboardRequest, ComputeRequest, HealthInfo, Label, LabelListItem,
    LabelSaveResult,
};

/// The operations offered by the transform service.
///
/// Calls block. Callers that must stay responsive run them through a
/// background worker and match the answer against a request ticket.
pub trait TransformService: Send + Sync {
    fn health(&self) -> Result<HealthInfo>;

    /// Fit a transform to the given correspondences.
    fn compute(&self, request: &ComputeRequest) -> Result<TransformResult>;

    fn save_label(&self, label: &Label) -> Result<LabelSaveResult>;

    /// Stored label for an image pair. `Ok(None)` when none exists.
    fn load_label(&self, image_fixed: &str, image_moving: &str) -> Result<Option<Label>>;

    fn list_labels(&self) -> Result<Vec<LabelListItem>>;

    /// Render a checkerboard overlay of the warped moving image.
    fn checkerboard(&self, request: &CheckerboardRequest) -> Result<CheckerboardPreview>;
}
