#![forbid(unsafe_code)]

//! Transform session state.
//!
//! Tracks whether the last computed transform still describes the current
//! tie points. Every point mutation and image reload calls
//! [`TransformSession::invalidate`], which clears the flag and bumps the
//! generation counter. Requests to the solver carry the generation they were
//! built from; a response is only allowed to mark the transform valid when
//! its generation is still current.
//!
//! ```text
//! issue(Compute) ─► ticket{gen=4} ──── solver ────► accept(ticket, result)
//!        user clicks again ─► invalidate() gen=5        │
//!                                                      ▼
//!                                      Stale{issued: 4, current: 5}
//! ```

use std::fmt::{self, Write as _};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of transform the solver should fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformMode {
    /// Rotation and translation.
    #[default]
    Rigid,
    /// Rotation, translation and uniform scale.
    Similarity,
    /// Full 2D affine.
    Affine,
}

impl TransformMode {
    pub const ALL: [Self; 3] = [Self::Rigid, Self::Similarity, Self::Affine];

    /// Complete pairs needed before a request may be sent.
    #[must_use]
    pub const fn min_points(self) -> usize {
        match self {
            Self::Rigid | Self::Similarity => 2,
            Self::Affine => 3,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rigid => "rigid",
            Self::Similarity => "similarity",
            Self::Affine => "affine",
        }
    }
}

impl fmt::Display for TransformMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown transform mode: {0:?}")]
pub struct ParseTransformModeError(pub String);

impl FromStr for TransformMode {
    type Err = ParseTransformModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseTransformModeError(s.to_string()))
    }
}

/// Row-major 3x3 homogeneous matrix.
pub type Matrix3 = [[f64; 3]; 3];

pub const IDENTITY: Matrix3 = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

fn one() -> f64 {
    1.0
}

/// Decomposed transform parameters as reported by the solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigidParams {
    /// Counter-clockwise rotation in degrees.
    pub theta_deg: f64,
    pub tx: f64,
    pub ty: f64,
    #[serde(default = "one")]
    pub scale_x: f64,
    #[serde(default = "one")]
    pub scale_y: f64,
    #[serde(default)]
    pub shear: f64,
}

impl Default for RigidParams {
    fn default() -> Self {
        Self {
            theta_deg: 0.0,
            tx: 0.0,
            ty: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            shear: 0.0,
        }
    }
}

/// A successfully computed transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformResult {
    pub rigid: RigidParams,
    #[serde(rename = "matrix_3x3")]
    pub matrix: Matrix3,
    pub rms_error: f64,
    pub num_points: usize,
}

impl TransformResult {
    /// Human-readable summary shown after a compute.
    #[must_use]
    pub fn summary(&self) -> String {
        let r = &self.rigid;
        let mut out = String::new();
        let _ = writeln!(out, "Rotation: {:.4}°", r.theta_deg);
        let _ = writeln!(out, "Translation: ({:.4}, {:.4})", r.tx, r.ty);
        let _ = writeln!(out, "Scale: ({:.6}, {:.6})", r.scale_x, r.scale_y);
        let _ = writeln!(out, "Shear: {:.6}", r.shear);
        let _ = writeln!(out, "RMS Error: {:.4} px", self.rms_error);
        let _ = writeln!(out, "Points Used: {}\n\nMatrix:", self.num_points);
        for row in &self.matrix {
            let _ = writeln!(out, "  [{:10.6}, {:10.6}, {:10.6}]", row[0], row[1], row[2]);
        }
        out
    }
}

/// What an outgoing request is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Compute,
    Preview,
    SaveLabel,
    LoadLabel,
    Health,
}

/// Identity of an in-flight request and the point-set generation it saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestTicket {
    pub id: u64,
    pub generation: u64,
    pub kind: RequestKind,
}

/// Result of handing a compute response to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseOutcome {
    /// The response matched the current points; the transform is now valid.
    Applied,
    /// The points changed after the request was issued. The result is kept
    /// as the answer to that request but does not validate the session.
    Stale { issued: u64, current: u64 },
}

/// Validity flag, cached result, and request generations.
#[derive(Debug, Clone, Default)]
pub struct TransformSession {
    generation: u64,
    next_request_id: u64,
    valid: bool,
    current: Option<TransformResult>,
    stale: Option<(RequestTicket, TransformResult)>,
}

impl TransformSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the transform out of date. Called on every point or image change.
    pub fn invalidate(&mut self, reason: &str) {
        self.generation += 1;
        if self.valid {
            tracing::debug!(
                target: "rigidlabel.session",
                reason,
                generation = self.generation,
                "transform invalidated"
            );
        }
        self.valid = false;
    }

    /// Stamp a new request with the current generation.
    pub fn issue(&mut self, kind: RequestKind) -> RequestTicket {
        self.next_request_id += 1;
        RequestTicket {
            id: self.next_request_id,
            generation: self.generation,
            kind,
        }
    }

    /// Whether nothing changed since `ticket` was issued.
    #[must_use]
    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Hand a successful compute response to the session.
    pub fn accept(&mut self, ticket: RequestTicket, result: TransformResult) -> ResponseOutcome {
        if !self.is_current(&ticket) {
            tracing::warn!(
                target: "rigidlabel.session",
                request_id = ticket.id,
                issued = ticket.generation,
                current = self.generation,
                "discarding stale transform response"
            );
            self.stale = Some((ticket, result));
            return ResponseOutcome::Stale {
                issued: ticket.generation,
                current: self.generation,
            };
        }
        self.valid = true;
        self.current = Some(result);
        self.stale = None;
        ResponseOutcome::Applied
    }

    /// Restore a previously saved transform for the current points, e.g.
    /// after loading a stored label.
    pub fn restore(&mut self, result: TransformResult) {
        self.valid = true;
        self.current = Some(result);
    }

    #[must_use]
    pub fn has_valid_transform(&self) -> bool {
        self.valid
    }

    /// The current transform, only while it is valid.
    #[must_use]
    pub fn valid_transform(&self) -> Option<&TransformResult> {
        if self.valid {
            self.current.as_ref()
        } else {
            None
        }
    }

    /// Last computed transform, valid or not.
    #[must_use]
    pub fn last_result(&self) -> Option<&TransformResult> {
        self.current.as_ref()
    }

    /// Most recent response that arrived after the points had changed.
    #[must_use]
    pub fn last_stale_result(&self) -> Option<&(RequestTicket, TransformResult)> {
        self.stale.as_ref()
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
