//! GenerateFeedbackHandler - Produces AI feedback for a learning cycle.
//!
//! The one place a feedback prompt is sent to the model: both the draft
//! feedback endpoint and stored-cycle analysis go through `generate`, so the
//! model, temperature and response mode come from a single
//! `FeedbackParameters`.

use std::sync::Arc;

use crate::domain::cycle::CycleDraft;
use crate::domain::feedback::{
    FeedbackOutcome, FeedbackParameters, FeedbackRequest, UnparseablePolicy,
};
use crate::domain::foundation::CommandMetadata;
use crate::ports::{
    AIError, AIProvider, CompletionRequest, MessageRole, RequestMetadata, ResponseFormat,
};

use super::{FeedbackError, InFlightRequests};

type FeedbackReply = Result<FeedbackOutcome, FeedbackError>;

/// Command to generate feedback on unsaved cycle text.
#[derive(Debug, Clone, Default)]
pub struct GenerateFeedbackCommand {
    pub draft: CycleDraft,
    pub skill_name: Option<String>,
}

/// Handler for feedback generation.
pub struct GenerateFeedbackHandler {
    ai_provider: Arc<dyn AIProvider>,
    parameters: FeedbackParameters,
    policy: UnparseablePolicy,
    enabled: bool,
    in_flight: Option<InFlightRequests<FeedbackReply>>,
}

impl GenerateFeedbackHandler {
    pub fn new(
        ai_provider: Arc<dyn AIProvider>,
        parameters: FeedbackParameters,
        policy: UnparseablePolicy,
    ) -> Self {
        Self {
            ai_provider,
            parameters,
            policy,
            enabled: true,
            in_flight: Some(InFlightRequests::new()),
        }
    }

    /// Turns the feature on or off; disabled handlers answer `Disabled`.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Enables or disables sharing one model call between identical requests.
    pub fn with_coalescing(mut self, coalesce: bool) -> Self {
        self.in_flight = coalesce.then(InFlightRequests::new);
        self
    }

    pub fn parameters(&self) -> &FeedbackParameters {
        &self.parameters
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Validates the draft and generates feedback for it.
    ///
    /// Validation happens before any model call.
    pub async fn handle(
        &self,
        cmd: GenerateFeedbackCommand,
        metadata: CommandMetadata,
    ) -> Result<FeedbackOutcome, FeedbackError> {
        if !self.enabled {
            return Err(FeedbackError::Disabled);
        }

        let content = cmd.draft.validate()?;
        self.generate(FeedbackRequest::new(content, cmd.skill_name), &metadata)
            .await
    }

    /// Generates feedback for an already validated request.
    pub async fn generate(
        &self,
        request: FeedbackRequest,
        metadata: &CommandMetadata,
    ) -> Result<FeedbackOutcome, FeedbackError> {
        if !self.enabled {
            return Err(FeedbackError::Disabled);
        }

        let prompt = request.render_prompt();
        let correlation_id = metadata.correlation_id();
        let completion = self.completion_request(&prompt, metadata, &correlation_id);
        let ai_provider = self.ai_provider.clone();
        let policy = self.policy;

        tracing::info!(
            user_id = %metadata.user_id,
            correlation_id = %correlation_id,
            model = %self.parameters.model,
            "Generating cycle feedback"
        );

        let call = move || call_model(ai_provider, completion, policy);

        match &self.in_flight {
            Some(in_flight) => {
                let key = self.request_key(metadata, &prompt);
                in_flight.run(key, call).await.unwrap_or_else(|| {
                    Err(FeedbackError::Upstream(AIError::unavailable(
                        "feedback call did not complete",
                    )))
                })
            }
            None => call().await,
        }
    }

    fn completion_request(
        &self,
        prompt: &str,
        metadata: &CommandMetadata,
        correlation_id: &str,
    ) -> CompletionRequest {
        let mut request = CompletionRequest::new(RequestMetadata::new(
            metadata.user_id.clone(),
            correlation_id,
        ))
        .with_system_prompt(&self.parameters.system_instruction)
        .with_message(MessageRole::User, prompt)
        .with_model(&self.parameters.model)
        .with_response_format(ResponseFormat::JsonObject);

        if let Some(temperature) = self.parameters.temperature {
            request = request.with_temperature(temperature);
        }
        if let Some(max_tokens) = self.parameters.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }
        request
    }

    fn request_key(&self, metadata: &CommandMetadata, prompt: &str) -> String {
        let temperature = self
            .parameters
            .temperature
            .map(|t| t.to_string())
            .unwrap_or_default();
        let max_tokens = self
            .parameters
            .max_tokens
            .map(|t| t.to_string())
            .unwrap_or_default();

        InFlightRequests::<FeedbackReply>::key([
            metadata.user_id.as_str(),
            self.parameters.model.as_str(),
            temperature.as_str(),
            max_tokens.as_str(),
            self.parameters.system_instruction.as_str(),
            prompt,
        ])
    }
}

async fn call_model(
    ai_provider: Arc<dyn AIProvider>,
    request: CompletionRequest,
    policy: UnparseablePolicy,
) -> FeedbackReply {
    let trace_id = request.metadata.trace_id.clone();

    let response = ai_provider.complete(request).await.map_err(|e| {
        tracing::error!(correlation_id = %trace_id, error = %e, "Error generating feedback");
        FeedbackError::Upstream(e)
    })?;

    tracing::debug!(
        correlation_id = %trace_id,
        model = %response.model,
        prompt_tokens = response.usage.prompt_tokens,
        completion_tokens = response.usage.completion_tokens,
        "Feedback completion usage"
    );

    match policy.decode(response.content.as_deref()) {
        Ok(FeedbackOutcome::Empty) => {
            tracing::warn!(
                correlation_id = %trace_id,
                "Model reply was not a feedback object; answering with empty feedback"
            );
            Ok(FeedbackOutcome::Empty)
        }
        Ok(outcome) => Ok(outcome),
        Err(e) => {
            tracing::error!(correlation_id = %trace_id, error = %e, "Error parsing feedback");
            Err(FeedbackError::Parse(e))
        }
    }
}
