#![forbid(unsafe_code)]

//! Background execution of service calls.
//!
//! The model lives on the event thread and is never shared. Service calls
//! block, so each one runs on its own thread and reports back over a
//! channel:
//!
//! ```text
//! event thread                         request thread
//! ────────────                         ──────────────
//! ticket = session.issue(kind)
//! worker.submit(ticket, job) ────────► service.compute(..)
//!   ... keeps handling input ...              │
//! worker.poll() ◄──────── Completion { ticket, reply }
//! labeler.finish_compute(ticket, result)
//! ```
//!
//! Completions carry their ticket unchanged; deciding whether an answer is
//! still current is the session's job, not the worker's.

use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use rigidlabel_client::{
    CheckerboardPreview, CheckerboardRequest, ComputeRequest, HealthInfo, Label, LabelListItem,
    LabelSaveResult, Result, TransformService,
};
use rigidlabel_core::{RequestTicket, TransformResult};

/// A unit of work for the service.
#[derive(Debug, Clone)]
pub enum ServiceJob {
    Health,
    Compute(ComputeRequest),
    SaveLabel(Label),
    LoadLabel {
        image_fixed: String,
        image_moving: String,
    },
    ListLabels,
    Checkerboard(CheckerboardRequest),
}

impl ServiceJob {
    fn name(&self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::Compute(_) => "compute",
            Self::SaveLabel(_) => "save_label",
            Self::LoadLabel { .. } => "load_label",
            Self::ListLabels => "list_labels",
            Self::Checkerboard(_) => "checkerboard",
        }
    }

    fn run(self, service: &dyn TransformService) -> ServiceReply {
        match self {
            Self::Health => ServiceReply::Health(service.health()),
            Self::Compute(request) => ServiceReply::Computed(service.compute(&request)),
            Self::SaveLabel(label) => ServiceReply::Saved(service.save_label(&label)),
            Self::LoadLabel {
                image_fixed,
                image_moving,
            } => ServiceReply::Loaded(service.load_label(&image_fixed, &image_moving)),
            Self::ListLabels => ServiceReply::Listed(service.list_labels()),
            Self::Checkerboard(request) => {
                ServiceReply::Checkerboard(service.checkerboard(&request))
            }
        }
    }
}

/// The answer to a [`ServiceJob`], one variant per job.
#[derive(Debug)]
pub enum ServiceReply {
    Health(Result<HealthInfo>),
    Computed(Result<TransformResult>),
    Saved(Result<LabelSaveResult>),
    Loaded(Result<Option<Label>>),
    Listed(Result<Vec<LabelListItem>>),
    Checkerboard(Result<CheckerboardPreview>),
}

#[derive(Debug)]
pub struct Completion {
    pub ticket: RequestTicket,
    pub reply: ServiceReply,
}

/// Runs service jobs off the event thread.
pub struct ServiceWorker {
    service: Arc<dyn TransformService>,
    sender: mpsc::Sender<Completion>,
    receiver: mpsc::Receiver<Completion>,
    in_flight: usize,
}

impl std::fmt::Debug for ServiceWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceWorker")
            .field("in_flight", &self.in_flight)
            .finish()
    }
}

impl ServiceWorker {
    #[must_use]
    pub fn new(service: Arc<dyn TransformService>) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            service,
            sender,
            receiver,
            in_flight: 0,
        }
    }

    /// Start `job` on a background thread.
    pub fn submit(&mut self, ticket: RequestTicket, job: ServiceJob) {
        let service = Arc::clone(&self.service);
        let sender = self.sender.clone();
        let name = job.name();
        tracing::debug!(
            target: "rigidlabel.worker",
            job = name,
            request_id = ticket.id,
            generation = ticket.generation,
            "submitting request"
        );
        self.in_flight += 1;
        thread::spawn(move || {
            let reply = job.run(service.as_ref());
            if sender.send(Completion { ticket, reply }).is_err() {
                tracing::debug!(
                    target: "rigidlabel.worker",
                    job = name,
                    "worker dropped before completion"
                );
            }
        });
    }

    /// Completions that have arrived so far. Never blocks.
    pub fn poll(&mut self) -> Vec<Completion> {
        let done: Vec<Completion> = self.receiver.try_iter().collect();
        self.in_flight = self.in_flight.saturating_sub(done.len());
        done
    }

    /// Block until the next completion, or `None` when nothing is pending.
    pub fn wait(&mut self) -> Option<Completion> {
        if self.in_flight == 0 {
            return None;
        }
        let completion = self.receiver.recv().ok()?;
        self.in_flight -= 1;
        Some(completion)
    }

    /// Like [`wait`](Self::wait) but gives up after `timeout`.
    pub fn wait_timeout(&mut self, timeout: Duration) -> Option<Completion> {
        if self.in_flight == 0 {
            return None;
        }
        let completion = self.receiver.recv_timeout(timeout).ok()?;
        self.in_flight -= 1;
        Some(completion)
    }

    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}
