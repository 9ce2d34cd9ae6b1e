#![forbid(unsafe_code)]

//! The labeling controller.
//!
//! [`Labeler`] is everything the main window does except drawing: it owns
//! the tie-point model, the row-level history, the coordinate converter,
//! and the transform session, and enforces the rules that tie them
//! together.
//!
//! # Invariants
//!
//! - Every mutation of the points invalidates the transform session.
//! - Points are stored canonically; display coordinates are produced on
//!   demand through the converter.
//! - Actions that need a transform check validity right before acting.
//! - Undo and redo consult the point log first and the row-level history
//!   only when the point log is empty.
//! - Opening an image file remembers its directory so [`Labeler::next_pair`]
//!   can step through a dataset.

use std::path::{Path, PathBuf};

use rigidlabel_client::{
    CheckerboardPreview, CheckerboardRequest, ComputeRequest, Label, ServiceError, TiePointDto,
    TransformService,
};
use rigidlabel_core::io::{
    CsvDocument, CsvError, GtExporter, ImportSummary, MatrixError, csv, matrix,
};
use rigidlabel_core::{
    CoordinateConverter, ImageSize, ModelEvent, OriginMode, PairIndex, Point2, RequestKind,
    Rect, RequestTicket, ResponseOutcome, Side, TiePointModel, TiePointPair, TransformMode,
    TransformResult, TransformSession, UndoEntry,
};

use crate::folder::ImageFolder;
use crate::undo::{
    CommandBatch, CommandError, CommandMetadata, HistoryConfig, HistoryManager, RemovePairCmd,
};

/// User-actionable refusals and failures.
#[derive(Debug, thiserror::Error)]
pub enum LabelerError {
    #[error("please load the {0} image first")]
    ImageNotLoaded(Side),

    #[error("please load both fixed and moving images first")]
    ImagesNotLoaded,

    #[error(
        "need at least {required} complete tie points for a {mode} transform, currently have {available}"
    )]
    NotEnoughPoints {
        required: usize,
        available: usize,
        mode: TransformMode,
    },

    #[error("no valid transform, compute the transform first")]
    NoValidTransform,

    #[error("no tie point selected")]
    NoSelection,

    #[error("no tie point in row {0}")]
    RowNotFound(usize),

    #[error("failed to read image {}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Csv(#[from] CsvError),

    #[error(transparent)]
    Matrix(#[from] MatrixError),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

pub type Result<T> = std::result::Result<T, LabelerError>;

/// Distance in image pixels within which a click picks an existing point.
pub const HIT_RADIUS: f64 = 10.0;

/// A loaded image: where it came from and how big it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    pub path: String,
    pub size: ImageSize,
}

impl ImageInfo {
    #[must_use]
    pub fn new(path: impl Into<String>, size: ImageSize) -> Self {
        Self {
            path: path.into(),
            size,
        }
    }
}

/// Startup settings for a [`Labeler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelerSettings {
    pub origin_mode: OriginMode,
    pub transform_mode: TransformMode,
    /// Optional floor on top of the per-mode minimum.
    pub min_points_floor: Option<usize>,
    pub checkerboard_size: u32,
    pub history: HistoryConfig,
}

impl Default for LabelerSettings {
    fn default() -> Self {
        Self {
            origin_mode: OriginMode::Center,
            transform_mode: TransformMode::Rigid,
            min_points_floor: None,
            checkerboard_size: rigidlabel_client::wire::DEFAULT_BOARD_SIZE,
            history: HistoryConfig::default(),
        }
    }
}

/// Result of a click on one of the images.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedPoint {
    pub index: PairIndex,
    pub side: Side,
    /// `X: .., Y: ..` in the current origin mode.
    pub label: String,
    pub completed_pair: bool,
}

/// What an undo or redo request did.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryOutcome {
    /// A single point add was undone or redone.
    Point(UndoEntry),
    /// A row-level command was undone or redone.
    Command(String),
    Nothing,
}

pub struct Labeler {
    model: TiePointModel,
    history: HistoryManager<TiePointModel>,
    converter: CoordinateConverter,
    session: TransformSession,
    fixed_image: Option<ImageInfo>,
    moving_image: Option<ImageInfo>,
    fixed_folder: Option<ImageFolder>,
    moving_folder: Option<ImageFolder>,
    transform_mode: TransformMode,
    min_points_floor: Option<usize>,
    checkerboard_size: u32,
    gt: Option<GtExporter>,
    next_batch_id: u64,
}

impl std::fmt::Debug for Labeler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Labeler")
            .field("pairs", &self.model.pair_count())
            .field("history", &self.history)
            .field("converter", &self.converter)
            .field("valid_transform", &self.session.has_valid_transform())
            .field("transform_mode", &self.transform_mode)
            .finish_non_exhaustive()
    }
}

impl Default for Labeler {
    fn default() -> Self {
        Self::new(LabelerSettings::default())
    }
}

impl Labeler {
    #[must_use]
    pub fn new(settings: LabelerSettings) -> Self {
        Self {
            model: TiePointModel::new(),
            history: HistoryManager::new(settings.history),
            converter: CoordinateConverter::new(settings.origin_mode),
            session: TransformSession::new(),
            fixed_image: None,
            moving_image: None,
            fixed_folder: None,
            moving_folder: None,
            transform_mode: settings.transform_mode,
            min_points_floor: settings.min_points_floor,
            checkerboard_size: settings.checkerboard_size,
            gt: None,
            next_batch_id: 0,
        }
    }

    // ========================================================================
    // Images
    // ========================================================================

    /// Load (or replace) one image. Existing points are kept.
    pub fn load_image(&mut self, side: Side, image: ImageInfo) {
        tracing::info!(
            target: "rigidlabel.labeler",
            side = %side,
            path = %image.path,
            size = %image.size,
            "image loaded"
        );
        self.converter.set_image_size(side, Some(image.size));
        *self.image_slot(side) = Some(image);
        self.session.invalidate("image loaded");
    }

    /// Switch to a new image pair. Points and history start over.
    pub fn load_pair(&mut self, fixed: ImageInfo, moving: ImageInfo) {
        self.reset_points();
        self.load_image(Side::Fixed, fixed);
        self.load_image(Side::Moving, moving);
    }

    /// Unload both images and drop every point.
    pub fn clear_images(&mut self) {
        self.fixed_image = None;
        self.moving_image = None;
        self.fixed_folder = None;
        self.moving_folder = None;
        self.converter.set_image_size(Side::Fixed, None);
        self.converter.set_image_size(Side::Moving, None);
        self.reset_points();
        self.session.invalidate("images cleared");
    }

    #[must_use]
    pub fn image(&self, side: Side) -> Option<&ImageInfo> {
        match side {
            Side::Fixed => self.fixed_image.as_ref(),
            Side::Moving => self.moving_image.as_ref(),
        }
    }

    #[must_use]
    pub fn has_both_images(&self) -> bool {
        self.fixed_image.is_some() && self.moving_image.is_some()
    }

    /// Read an image file's size, load it, and remember its directory.
    pub fn open_image(&mut self, side: Side, path: impl AsRef<Path>) -> Result<ImageSize> {
        let path = path.as_ref();
        let size = read_image_size(path)?;
        self.load_image(side, ImageInfo::new(path.display().to_string(), size));
        *self.folder_slot(side) = match ImageFolder::containing(path) {
            Ok(folder) => Some(folder),
            Err(error) => {
                tracing::warn!(
                    target: "rigidlabel.labeler",
                    path = %path.display(),
                    %error,
                    "cannot list image directory"
                );
                None
            }
        };
        Ok(size)
    }

    #[must_use]
    pub fn folder(&self, side: Side) -> Option<&ImageFolder> {
        match side {
            Side::Fixed => self.fixed_folder.as_ref(),
            Side::Moving => self.moving_folder.as_ref(),
        }
    }

    /// Whether the directory of the `side` image has a file after it.
    #[must_use]
    pub fn has_next_image(&self, side: Side) -> bool {
        self.folder(side).is_some_and(ImageFolder::has_next)
    }

    /// Whether [`next_pair`](Self::next_pair) would advance either side.
    #[must_use]
    pub fn has_next_pair(&self) -> bool {
        self.has_next_image(Side::Fixed) || self.has_next_image(Side::Moving)
    }

    /// Load the next file of the `side` directory. Points are kept.
    ///
    /// Returns `false` when the current image is the last one.
    pub fn next_image(&mut self, side: Side) -> Result<bool> {
        let Some((index, path)) = self
            .folder(side)
            .and_then(|folder| Some((folder.index()? + 1, folder.peek_next()?)))
        else {
            return Ok(false);
        };
        let size = read_image_size(&path)?;
        self.load_image(side, ImageInfo::new(path.display().to_string(), size));
        if let Some(folder) = self.folder_slot(side) {
            folder.select(index);
        }
        Ok(true)
    }

    /// Move on to the next image pair of the dataset.
    ///
    /// Points and both histories are dropped, then each side that has a
    /// following file advances. Returns whether any side advanced.
    pub fn next_pair(&mut self) -> Result<bool> {
        self.reset_points();
        self.session.invalidate("next pair");
        let fixed = self.next_image(Side::Fixed)?;
        let moving = self.next_image(Side::Moving)?;
        tracing::info!(
            target: "rigidlabel.labeler",
            fixed_advanced = fixed,
            moving_advanced = moving,
            "next pair"
        );
        Ok(fixed || moving)
    }

    fn folder_slot(&mut self, side: Side) -> &mut Option<ImageFolder> {
        match side {
            Side::Fixed => &mut self.fixed_folder,
            Side::Moving => &mut self.moving_folder,
        }
    }

    fn image_slot(&mut self, side: Side) -> &mut Option<ImageInfo> {
        match side {
            Side::Fixed => &mut self.fixed_image,
            Side::Moving => &mut self.moving_image,
        }
    }

    fn require_images(&self) -> Result<(&ImageInfo, &ImageInfo)> {
        match (&self.fixed_image, &self.moving_image) {
            (Some(fixed), Some(moving)) => Ok((fixed, moving)),
            _ => Err(LabelerError::ImagesNotLoaded),
        }
    }

    // ========================================================================
    // Point editing
    // ========================================================================

    /// Place a point at canonical image coordinates.
    pub fn click(&mut self, side: Side, canonical: Point2) -> Result<PlacedPoint> {
        if self.image(side).is_none() {
            return Err(LabelerError::ImageNotLoaded(side));
        }
        let index = self.model.add_point(side, canonical);
        self.session.invalidate("point added");
        Ok(PlacedPoint {
            index,
            side,
            label: self.converter.coordinate_label(side, canonical),
            completed_pair: self.model.has_both_points(index),
        })
    }

    pub fn click_fixed(&mut self, canonical: Point2) -> Result<PlacedPoint> {
        self.click(Side::Fixed, canonical)
    }

    pub fn click_moving(&mut self, canonical: Point2) -> Result<PlacedPoint> {
        self.click(Side::Moving, canonical)
    }

    /// Table row of the point under a click at canonical coordinates.
    #[must_use]
    pub fn row_at(&self, side: Side, canonical: Point2) -> Option<usize> {
        self.model.row_at(side, canonical, HIT_RADIUS)
    }

    /// Table rows of the points inside a dragged selection rectangle.
    #[must_use]
    pub fn rows_in_rect(&self, side: Side, corner: Point2, opposite: Point2) -> Vec<usize> {
        self.model.rows_in_rect(side, Rect::from_corners(corner, opposite))
    }

    /// Set a point from a table edit given in display coordinates.
    pub fn edit_point(&mut self, row: usize, side: Side, display: Point2) -> Result<()> {
        let pair = self
            .model
            .pair_at_row(row)
            .ok_or(LabelerError::RowNotFound(row))?;
        let canonical = self.converter.to_canonical(side, display);
        if !self.model.update_point(pair.index, side, canonical) {
            return Err(LabelerError::RowNotFound(row));
        }
        self.session.invalidate("point edited");
        Ok(())
    }

    /// Delete the pairs shown in `rows` as one undoable step.
    ///
    /// Returns the number of pairs removed.
    pub fn delete_rows(&mut self, rows: &[usize]) -> Result<usize> {
        let mut rows: Vec<usize> = rows.to_vec();
        rows.sort_unstable_by(|a, b| b.cmp(a));
        rows.dedup();
        let indices: Vec<PairIndex> = rows
            .iter()
            .filter_map(|&row| self.model.pair_at_row(row).map(|p| p.index))
            .collect();
        if indices.is_empty() {
            return Err(LabelerError::NoSelection);
        }

        self.next_batch_id += 1;
        let batch_id = self.next_batch_id;
        let mut batch = CommandBatch::new(format!("Delete {} tie point(s)", indices.len()))
            .with_batch_id(batch_id);
        for &index in &indices {
            let cmd = RemovePairCmd::new(index)
                .with_metadata(CommandMetadata::new("Delete Tie Point").with_batch(batch_id));
            batch.push(Box::new(cmd));
        }
        self.history.execute(Box::new(batch), &mut self.model)?;
        self.session.invalidate("pairs deleted");

        tracing::info!(
            target: "rigidlabel.labeler",
            count = indices.len(),
            "tie points deleted"
        );
        Ok(indices.len())
    }

    /// Drop every point and both histories. Returns how many pairs existed.
    pub fn clear_all(&mut self) -> usize {
        let count = self.model.pair_count();
        if count == 0 {
            return 0;
        }
        self.reset_points();
        self.session.invalidate("points cleared");
        count
    }

    fn reset_points(&mut self) {
        self.history.clear();
        self.model.clear_all();
    }

    // ========================================================================
    // Undo / redo
    // ========================================================================

    pub fn undo(&mut self) -> Result<HistoryOutcome> {
        if let Some(entry) = self.model.undo_last_point() {
            self.session.invalidate("undo");
            return Ok(HistoryOutcome::Point(entry));
        }
        match self.history.undo(&mut self.model) {
            Some(Ok(description)) => {
                self.session.invalidate("undo");
                Ok(HistoryOutcome::Command(description))
            }
            Some(Err(error)) => Err(error.into()),
            None => Ok(HistoryOutcome::Nothing),
        }
    }

    pub fn redo(&mut self) -> Result<HistoryOutcome> {
        if let Some(entry) = self.model.redo_last_point() {
            self.session.invalidate("redo");
            return Ok(HistoryOutcome::Point(entry));
        }
        match self.history.redo(&mut self.model) {
            Some(Ok(description)) => {
                self.session.invalidate("redo");
                Ok(HistoryOutcome::Command(description))
            }
            Some(Err(error)) => Err(error.into()),
            None => Ok(HistoryOutcome::Nothing),
        }
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.model.can_undo() || self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.model.can_redo() || self.history.can_redo()
    }

    // ========================================================================
    // Modes
    // ========================================================================

    /// Change the origin used for display, export, and requests.
    ///
    /// A computed transform is expressed in the frame it was requested in,
    /// so switching frames invalidates it.
    pub fn set_origin_mode(&mut self, mode: OriginMode) {
        if self.converter.mode() == mode {
            return;
        }
        self.converter.set_mode(mode);
        self.session.invalidate("origin mode changed");
    }

    pub fn set_transform_mode(&mut self, mode: TransformMode) {
        self.transform_mode = mode;
    }

    #[must_use]
    pub fn transform_mode(&self) -> TransformMode {
        self.transform_mode
    }

    /// Complete pairs needed before a compute request may be sent.
    #[must_use]
    pub fn min_points_required(&self) -> usize {
        self.transform_mode
            .min_points()
            .max(self.min_points_floor.unwrap_or(0))
    }

    #[must_use]
    pub fn can_compute(&self) -> bool {
        self.has_both_images() && self.model.complete_pair_count() >= self.min_points_required()
    }

    // ========================================================================
    // Compute
    // ========================================================================

    /// Complete pairs in display coordinates, ready to send.
    #[must_use]
    pub fn compute_request(&self) -> ComputeRequest {
        ComputeRequest {
            tie_points: self.display_complete_pairs(),
            transform_mode: self.transform_mode,
            min_points_required: self.min_points_required(),
        }
    }

    /// Check preconditions and stamp a compute request.
    ///
    /// Nothing is issued when the check fails.
    pub fn begin_compute(&mut self) -> Result<(RequestTicket, ComputeRequest)> {
        self.require_images()?;
        let required = self.min_points_required();
        let available = self.model.complete_pair_count();
        if available < required {
            return Err(LabelerError::NotEnoughPoints {
                required,
                available,
                mode: self.transform_mode,
            });
        }
        let request = self.compute_request();
        let ticket = self.session.issue(RequestKind::Compute);
        tracing::debug!(
            target: "rigidlabel.labeler",
            request_id = ticket.id,
            generation = ticket.generation,
            points = request.tie_points.len(),
            mode = %request.transform_mode,
            origin = %self.converter.mode(),
            "compute requested"
        );
        Ok((ticket, request))
    }

    /// Hand the service's answer for `ticket` to the session.
    pub fn finish_compute(
        &mut self,
        ticket: RequestTicket,
        result: std::result::Result<TransformResult, ServiceError>,
    ) -> Result<ResponseOutcome> {
        match result {
            Ok(result) => {
                let rms_error = result.rms_error;
                let outcome = self.session.accept(ticket, result);
                if outcome == ResponseOutcome::Applied {
                    tracing::info!(
                        target: "rigidlabel.labeler",
                        request_id = ticket.id,
                        rms_error,
                        "transform ready"
                    );
                }
                Ok(outcome)
            }
            Err(error) => {
                tracing::warn!(
                    target: "rigidlabel.labeler",
                    request_id = ticket.id,
                    %error,
                    "compute failed"
                );
                Err(error.into())
            }
        }
    }

    /// Issue, run, and apply a compute request on the calling thread.
    pub fn compute_with(&mut self, service: &dyn TransformService) -> Result<ResponseOutcome> {
        let (ticket, request) = self.begin_compute()?;
        let result = service.compute(&request);
        self.finish_compute(ticket, result)
    }

    /// The current transform, or an error when it is missing or stale.
    pub fn require_transform(&self) -> Result<&TransformResult> {
        self.session
            .valid_transform()
            .ok_or(LabelerError::NoValidTransform)
    }

    // ========================================================================
    // Preview and labels
    // ========================================================================

    pub fn preview_request(&mut self) -> Result<(RequestTicket, CheckerboardRequest)> {
        let (fixed, moving) = self.require_images()?;
        let transform = self.require_transform()?;
        let request = CheckerboardRequest::new(
            fixed.path.clone(),
            moving.path.clone(),
            transform.matrix,
            self.converter.mode().is_center(),
        )
        .with_board_size(self.checkerboard_size);
        request.validate()?;
        let ticket = self.session.issue(RequestKind::Preview);
        Ok((ticket, request))
    }

    /// Accept a preview. Previews for points that changed since are still
    /// returned, with a warning.
    pub fn finish_preview(
        &self,
        ticket: RequestTicket,
        result: std::result::Result<CheckerboardPreview, ServiceError>,
    ) -> Result<CheckerboardPreview> {
        let preview = result?;
        if !self.session.is_current(&ticket) {
            tracing::warn!(
                target: "rigidlabel.labeler",
                request_id = ticket.id,
                "preview belongs to an older point set"
            );
        }
        Ok(preview)
    }

    /// Label for the current pair, ready for `save_label`.
    ///
    /// Tie points are written in the same frame as the compute request, so
    /// the stored matrix maps its own points. The frame is recorded in the
    /// label's metadata.
    pub fn label_to_save(&mut self, comment: &str) -> Result<(RequestTicket, Label)> {
        let (fixed, moving) = self.require_images()?;
        let transform = self.require_transform()?;
        let label = Label::from_result(
            fixed.path.clone(),
            moving.path.clone(),
            transform,
            self.display_complete_pairs(),
        )
        .with_origin(self.converter.mode())
        .with_comment(comment);
        let ticket = self.session.issue(RequestKind::SaveLabel);
        Ok((ticket, label))
    }

    /// Paths for a `load_label` request.
    pub fn label_query(&mut self) -> Result<(RequestTicket, String, String)> {
        let (fixed, moving) = self.require_images()?;
        let (fixed, moving) = (fixed.path.clone(), moving.path.clone());
        Ok((self.session.issue(RequestKind::LoadLabel), fixed, moving))
    }

    /// Replace the points with a stored label and restore its transform.
    ///
    /// Points are converted from the label's recorded frame. The transform
    /// is restored only when that frame matches the current origin mode.
    /// Returns `false` when no label exists for the pair.
    pub fn apply_loaded_label(&mut self, label: Option<Label>) -> bool {
        let Some(label) = label else {
            tracing::info!(target: "rigidlabel.labeler", "no label stored for this pair");
            return false;
        };
        let frame = label.origin_mode();
        let mut reader = self.converter;
        reader.set_mode(frame);

        self.reset_points();
        for tp in &label.tie_points {
            self.model.add_complete_pair(
                reader.to_canonical(Side::Fixed, tp.fixed),
                reader.to_canonical(Side::Moving, tp.moving),
            );
        }
        self.session.invalidate("label loaded");
        if frame == self.converter.mode() {
            self.session.restore(TransformResult {
                rigid: label.rigid,
                matrix: label.matrix_3x3,
                rms_error: 0.0,
                num_points: label.tie_points.len(),
            });
        } else {
            tracing::warn!(
                target: "rigidlabel.labeler",
                label_origin = %frame,
                current_origin = %self.converter.mode(),
                "label saved in another origin mode, transform not restored"
            );
        }
        tracing::info!(
            target: "rigidlabel.labeler",
            points = label.tie_points.len(),
            "label restored"
        );
        true
    }

    // ========================================================================
    // Files
    // ========================================================================

    pub fn export_matrix(&self, path: impl AsRef<Path>) -> Result<()> {
        let transform = self.require_transform()?;
        matrix::write(path, &transform.matrix)?;
        Ok(())
    }

    /// Write the matrix to the next free `<root>/GT/NNNN.txt`.
    pub fn export_gt(&mut self, root: impl AsRef<Path>) -> Result<PathBuf> {
        let matrix = self.require_transform()?.matrix;
        let root = root.as_ref();
        let reuse = self
            .gt
            .as_ref()
            .is_some_and(|gt| gt.dir().parent() == Some(root));
        if !reuse {
            self.gt = Some(GtExporter::new(root));
        }
        let exporter = self.gt.get_or_insert_with(|| GtExporter::new(root));
        let path = exporter.export(&matrix)?;
        tracing::info!(target: "rigidlabel.labeler", path = %path.display(), "GT exported");
        Ok(path)
    }

    pub fn export_csv(&self, path: impl AsRef<Path>) -> Result<usize> {
        Ok(csv::export(path, &self.model, &self.converter)?)
    }

    /// Replace the points with the rows of a CSV file.
    pub fn import_csv(&mut self, path: impl AsRef<Path>) -> Result<ImportSummary> {
        let document = csv::read(path)?;
        self.import_document(&document)
    }

    /// Replace the points with the rows of an already parsed CSV file.
    ///
    /// Imported rows cannot be undone and both histories start over.
    pub fn import_document(&mut self, document: &CsvDocument) -> Result<ImportSummary> {
        let summary = document.apply_to(&mut self.model, &self.converter)?;
        self.history.clear();
        self.session.invalidate("points imported");
        tracing::info!(
            target: "rigidlabel.labeler",
            imported = summary.imported,
            skipped = summary.skipped,
            mode = %summary.mode,
            "tie points imported"
        );
        Ok(summary)
    }

    // ========================================================================
    // Views
    // ========================================================================

    /// All pairs in display coordinates, for the table.
    #[must_use]
    pub fn display_pairs(&self) -> Vec<TiePointPair> {
        self.model
            .pairs()
            .iter()
            .map(|pair| self.converter.pair_to_display(pair))
            .collect()
    }

    fn display_complete_pairs(&self) -> Vec<TiePointDto> {
        self.model
            .complete_pairs()
            .filter_map(|pair| self.converter.pair_to_display(pair).complete_points())
            .map(TiePointDto::from)
            .collect()
    }

    #[must_use]
    pub fn model(&self) -> &TiePointModel {
        &self.model
    }

    #[must_use]
    pub fn history(&self) -> &HistoryManager<TiePointModel> {
        &self.history
    }

    #[must_use]
    pub fn converter(&self) -> &CoordinateConverter {
        &self.converter
    }

    #[must_use]
    pub fn session(&self) -> &TransformSession {
        &self.session
    }

    pub fn take_events(&mut self) -> Vec<ModelEvent> {
        self.model.take_events()
    }
}

fn read_image_size(path: &Path) -> Result<ImageSize> {
    let (width, height) = image::image_dimensions(path).map_err(|source| LabelerError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(ImageSize::new(width, height))
}
