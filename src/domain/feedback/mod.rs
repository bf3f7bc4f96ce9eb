//! Feedback module - AI coaching feedback on a learning cycle.
//!
//! - `prompt` - validated request and the fixed coaching prompt
//! - `result` - decoding the model's JSON reply
//! - `panel` - client-side panel state machine and its view model

mod panel;
mod prompt;
mod result;

pub use panel::{
    FeedbackPanel, PanelCommand, PanelError, PanelState, PanelView, SectionView, ERROR_MESSAGE,
    LOADING_MESSAGE, RETRY_LABEL,
};
pub use prompt::{
    FeedbackParameters, FeedbackRequest, DEFAULT_MODEL, DEFAULT_TEMPERATURE, SKILL_PLACEHOLDER,
    SYSTEM_INSTRUCTION,
};
pub use result::{
    FeedbackOutcome, FeedbackParseError, FeedbackResult, StageFeedback, UnparseablePolicy,
};
