use thiserror::Error;

pub type Result<T> = std::result::Result<T, OpenAiError>;

#[derive(Debug, Error)]
pub enum OpenAiError {
    /// Connection failed or the request could not be sent
    #[error("model request failed: {0}")]
    Network(String),

    /// Non-2xx response or a response without a completion
    #[error("model API error: {0}")]
    Api(String),

    /// Response body was not a chat completion
    #[error("model response parse error: {0}")]
    Parse(String),
}
