use crate::{ChatCompletionRequest, ChatCompletionResponse, GeneratorConfig, Message};
use marginalia_core::{GenerateRequest, GenerateResponse};
use marginalia_error::{GenerationError, GenerationErrorKind, MarginaliaResult};
use marginalia_interface::TextGenerator;
use std::time::Duration;
use tracing::instrument;

/// Client for an OpenAI-compatible inference server
#[derive(Debug, Clone)]
pub struct ServerClient {
    config: GeneratorConfig,
    client: reqwest::Client,
}

impl ServerClient {
    /// Create a new server client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    #[instrument(skip(config), fields(base_url = %config.base_url(), model = %config.model()))]
    pub fn new(config: GeneratorConfig) -> Result<Self, GenerationError> {
        tracing::debug!("Creating server client");
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(*config.timeout_secs()))
            .build()
            .map_err(|e| {
                GenerationError::new(GenerationErrorKind::Http(format!(
                    "Failed to build HTTP client: {}",
                    e
                )))
            })?;
        Ok(Self { config, client })
    }

    /// Get the server configuration
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Check if the server is running and responding
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), GenerationError> {
        let url = format!("{}/health", self.config.base_url().trim_end_matches('/'));
        tracing::debug!("Checking server health at {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            tracing::error!("Health check failed: {}", e);
            GenerationError::new(GenerationErrorKind::Http(format!(
                "Health check failed: {}",
                e
            )))
        })?;

        if response.status().is_success() {
            tracing::debug!("Server is healthy");
            Ok(())
        } else {
            let status = response.status();
            tracing::error!("Server health check returned error: {}", status);
            Err(GenerationError::new(GenerationErrorKind::Api(format!(
                "Server returned: {}",
                status
            ))))
        }
    }

    /// Send a chat completion request
    #[instrument(skip(self, request), fields(model = %request.model))]
    pub async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, GenerationError> {
        let url = format!(
            "{}/v1/chat/completions",
            self.config.base_url().trim_end_matches('/')
        );
        tracing::debug!("Sending chat completion request to {}", url);

        let mut req = self.client.post(&url).json(request);

        if let Some(api_key) = self.config.api_key() {
            req = req.bearer_auth(api_key);
        }

        let response = req.send().await.map_err(|e| {
            tracing::error!("Request failed: {}", e);
            GenerationError::new(GenerationErrorKind::Http(format!("Request failed: {}", e)))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!("Server returned error: {}", status);
            return Err(GenerationError::new(GenerationErrorKind::Api(format!(
                "Server returned: {}",
                status
            ))));
        }

        let result = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse response: {}", e);
            GenerationError::new(GenerationErrorKind::Deserialization(format!(
                "Failed to parse response: {}",
                e
            )))
        })?;

        tracing::debug!("Chat completion successful");
        Ok(result)
    }

    fn to_chat_request(&self, req: &GenerateRequest) -> ChatCompletionRequest {
        let options = req.options();
        ChatCompletionRequest {
            model: req
                .model()
                .clone()
                .unwrap_or_else(|| self.config.model().clone()),
            messages: vec![Message::user(req.prompt().as_str())],
            max_tokens: Some(*options.max_new_tokens()),
            temperature: Some(options.effective_temperature()),
            top_p: if *options.deterministic() { Some(1.0) } else { None },
            stream: Some(false),
        }
    }
}

#[async_trait::async_trait]
impl TextGenerator for ServerClient {
    #[instrument(skip(self, req), fields(prompt_length = req.prompt().len()))]
    async fn generate(&self, req: &GenerateRequest) -> MarginaliaResult<GenerateResponse> {
        let chat_request = self.to_chat_request(req);
        let response = self.chat_completion(&chat_request).await?;

        let choice = response.choices.into_iter().next().ok_or_else(|| {
            GenerationError::new(GenerationErrorKind::Api("No choices in response".into()))
        })?;

        Ok(GenerateResponse::new(choice.message.content))
    }

    fn provider_name(&self) -> &'static str {
        "openai-compatible"
    }

    fn model_name(&self) -> String {
        self.config.model().clone()
    }
}
