use async_trait::async_trait;
use log::debug;
use reqwest::{ Client as HttpClient, header::{ HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION } };
use serde::Serialize;
use std::time::Duration;

use super::{ InferenceClient, InferenceResponse };
use crate::llm::{ GenerationParameters, InferenceError, ProviderConfig };

/// Client for the Hugging Face hosted inference API (`POST /models/<id>`).
pub struct HuggingFaceClient {
    http: HttpClient,
    endpoint: String,
    parameters: Option<GenerationParameters>,
}

#[derive(Serialize)]
struct TextGenerationRequest<'a> {
    inputs: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<&'a GenerationParameters>,
}

impl HuggingFaceClient {
    pub fn new(
        endpoint: String,
        api_token: Option<String>,
        parameters: Option<GenerationParameters>,
        timeout: Duration
    ) -> Result<Self, InferenceError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = api_token.filter(|t| !t.trim().is_empty()) {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|e|
                    InferenceError::Config(format!("Invalid API token format: {}", e))
                )?
            );
        }

        let http = HttpClient::builder().default_headers(headers).timeout(timeout).build()?;

        Ok(Self { http, endpoint, parameters })
    }

    pub fn from_config(config: &ProviderConfig) -> Result<Self, InferenceError> {
        if config.timeout.is_zero() {
            return Err(
                InferenceError::Config(format!("{} provider timeout must be non-zero", config.role))
            );
        }

        Self::new(
            config.endpoint.clone(),
            config.api_token.clone(),
            config.parameters.clone(),
            config.timeout
        )
    }
}

#[async_trait]
impl InferenceClient for HuggingFaceClient {
    async fn generate(&self, prompt: &str) -> Result<InferenceResponse, InferenceError> {
        let req = TextGenerationRequest {
            inputs: prompt,
            parameters: self.parameters.as_ref(),
        };

        let resp = self.http.post(&self.endpoint).json(&req).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(InferenceError::Status {
                endpoint: self.endpoint.clone(),
                status: status.as_u16(),
            });
        }

        let body = resp.bytes().await?;
        debug!("{} answered {} bytes", self.endpoint, body.len());
        Ok(serde_json::from_slice::<InferenceResponse>(&body)?)
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{ body_json, header, method, path };
    use wiremock::{ Mock, MockServer, ResponseTemplate };

    fn client_for(server: &MockServer, parameters: Option<GenerationParameters>) -> HuggingFaceClient {
        HuggingFaceClient::new(
            format!("{}/models/test", server.uri()),
            None,
            parameters,
            Duration::from_secs(5)
        ).unwrap()
    }

    #[tokio::test]
    async fn primary_body_carries_generation_parameters() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/test"))
            .and(
                body_json(
                    json!({
                        "inputs": "hello",
                        "parameters": {
                            "max_new_tokens": 500,
                            "temperature": 0.7,
                            "top_p": 0.95,
                            "return_full_text": false
                        }
                    })
                )
            )
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "generated_text": "hi" }])))
            .expect(1)
            .mount(&server).await;

        let client = client_for(&server, Some(GenerationParameters::default()));
        let resp = client.generate("hello").await.unwrap();
        assert_eq!(resp.generated_text(), Some("hi"));
    }

    #[tokio::test]
    async fn fallback_body_is_inputs_only() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_json(json!({ "inputs": "hello" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "generated_text": "ok" })))
            .expect(1)
            .mount(&server).await;

        let client = client_for(&server, None);
        let resp = client.generate("hello").await.unwrap();
        assert_eq!(resp.generated_text(), Some("ok"));
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server).await;

        let err = client_for(&server, None).generate("x").await.unwrap_err();
        assert!(matches!(err, InferenceError::Status { status: 429, .. }));
    }

    #[tokio::test]
    async fn invalid_json_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server).await;

        let err = client_for(&server, None).generate("x").await.unwrap_err();
        assert!(matches!(err, InferenceError::Decode(_)));
    }

    #[tokio::test]
    async fn token_is_sent_as_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("authorization", "Bearer hf_secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server).await;

        let client = HuggingFaceClient::new(
            server.uri(),
            Some("hf_secret".into()),
            None,
            Duration::from_secs(5)
        ).unwrap();
        client.generate("x").await.unwrap();
    }

    #[tokio::test]
    async fn slow_upstream_hits_the_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .set_delay(Duration::from_millis(500))
            )
            .mount(&server).await;

        let client = HuggingFaceClient::new(server.uri(), None, None, Duration::from_millis(50)).unwrap();
        let err = client.generate("x").await.unwrap_err();
        match err {
            InferenceError::Transport(e) => assert!(e.is_timeout()),
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut cfg = ProviderConfig::primary("http://localhost:1");
        cfg.timeout = Duration::ZERO;
        assert!(matches!(HuggingFaceClient::from_config(&cfg), Err(InferenceError::Config(_))));
    }
}
