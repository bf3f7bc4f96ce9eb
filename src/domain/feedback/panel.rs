//! Feedback panel state machine.
//!
//! Models an on-demand feedback panel independent of any UI framework. The
//! caller drives it with `open`, `close`, `retry` and `resolve`, performs the
//! fetch whenever a transition returns [`PanelCommand::Fetch`], and renders
//! whatever [`FeedbackPanel::view`] returns.
//!
//! ```text
//! Closed --open--> Idle --(auto)--> Loading --ok--> Success
//!                                     |  ^
//!                                   err  retry
//!                                     v  |
//!                                     Error
//! ```

use serde::Serialize;
use thiserror::Error;

use crate::domain::cycle::Stage;
use crate::domain::foundation::{Rating, StarBreakdown};

use super::{FeedbackOutcome, FeedbackResult};

/// Message shown when a fetch fails.
pub const ERROR_MESSAGE: &str = "Error getting AI feedback. Please try again later.";

/// Message shown while a fetch is outstanding.
pub const LOADING_MESSAGE: &str = "Analyzing your learning cycle...";

/// Label of the retry affordance.
pub const RETRY_LABEL: &str = "Try Again";

/// Observable panel state.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelState {
    Closed,
    Idle,
    Loading,
    Success(FeedbackOutcome),
    Error(String),
}

/// Side effect the caller must perform after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelCommand {
    /// Issue the feedback request and report back through `resolve`.
    Fetch,
    None,
}

/// Rejected transitions. The panel state is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PanelError {
    #[error("panel is already open")]
    AlreadyOpen,

    #[error("retry is only possible after a failed request")]
    NotInError,

    #[error("no feedback request is in flight")]
    NothingInFlight,
}

/// One feedback panel instance with its in-memory result cache.
#[derive(Debug, Clone)]
pub struct FeedbackPanel {
    state: PanelState,
    cached: Option<FeedbackOutcome>,
    in_flight: bool,
}

impl Default for FeedbackPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedbackPanel {
    pub fn new() -> Self {
        Self {
            state: PanelState::Closed,
            cached: None,
            in_flight: false,
        }
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != PanelState::Closed
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Opens the panel, fetching only when nothing is cached or in flight.
    pub fn open(&mut self) -> Result<PanelCommand, PanelError> {
        if self.is_open() {
            return Err(PanelError::AlreadyOpen);
        }
        if let Some(outcome) = &self.cached {
            self.state = PanelState::Success(outcome.clone());
            return Ok(PanelCommand::None);
        }
        if self.in_flight {
            self.state = PanelState::Loading;
            return Ok(PanelCommand::None);
        }
        self.state = PanelState::Idle;
        Ok(self.begin_fetch())
    }

    /// Closes the panel. An outstanding request keeps running.
    pub fn close(&mut self) {
        self.state = PanelState::Closed;
    }

    /// Retries after a failed request.
    pub fn retry(&mut self) -> Result<PanelCommand, PanelError> {
        if matches!(self.state, PanelState::Error(_)) {
            Ok(self.begin_fetch())
        } else {
            Err(PanelError::NotInError)
        }
    }

    /// Delivers the outcome of the outstanding request.
    ///
    /// The error detail is for logging only; users always see the same
    /// message. A result arriving after `close` is cached but the panel
    /// stays closed.
    pub fn resolve<E>(&mut self, outcome: Result<FeedbackOutcome, E>) -> Result<(), PanelError> {
        if !self.in_flight {
            return Err(PanelError::NothingInFlight);
        }
        self.in_flight = false;

        let next = match outcome {
            Ok(result) => {
                self.cached = Some(result.clone());
                PanelState::Success(result)
            }
            Err(_) => PanelState::Error(ERROR_MESSAGE.to_string()),
        };
        if self.is_open() {
            self.state = next;
        }
        Ok(())
    }

    /// Builds the view model for the current state.
    pub fn view(&self) -> PanelView {
        match &self.state {
            PanelState::Closed => PanelView::Hidden,
            PanelState::Idle | PanelState::Loading => PanelView::Loading {
                message: LOADING_MESSAGE,
            },
            PanelState::Error(message) => PanelView::Error {
                message: message.clone(),
                retry_label: RETRY_LABEL,
            },
            PanelState::Success(outcome) => feedback_view(outcome.result()),
        }
    }

    fn begin_fetch(&mut self) -> PanelCommand {
        self.in_flight = true;
        self.state = PanelState::Loading;
        PanelCommand::Fetch
    }
}

/// Renderable representation of the panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PanelView {
    Hidden,
    Loading {
        message: &'static str,
    },
    #[serde(rename_all = "camelCase")]
    Error {
        message: String,
        retry_label: &'static str,
    },
    #[serde(rename_all = "camelCase")]
    Feedback {
        overall_feedback: Option<String>,
        sections: Vec<SectionView>,
    },
}

/// One stage section of the feedback view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionView {
    pub stage: Stage,
    pub title: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub rating: Option<Rating>,
    pub stars: Option<StarBreakdown>,
    /// `None` when the reply carried no feedback for this stage.
    pub feedback: Option<String>,
}

fn feedback_view(result: Option<&FeedbackResult>) -> PanelView {
    let sections = Stage::ALL
        .iter()
        .map(|&stage| {
            let entry = result.map(|r| r.stage(stage));
            SectionView {
                stage,
                title: stage.title(),
                label: stage.short_label(),
                description: stage.description(),
                rating: entry.map(|e| e.rating),
                stars: entry.map(|e| e.rating.stars()),
                feedback: entry.map(|e| e.feedback.clone()),
            }
        })
        .collect();

    PanelView::Feedback {
        overall_feedback: result.map(|r| r.overall_feedback.clone()),
        sections,
    }
}
