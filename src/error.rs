use thiserror::Error;

#[derive(Error, Debug)]
pub enum GptMyPrError {
    #[error("{0}")]
    Config(String),

    #[error("{0}")]
    GithubAuth(String),

    #[error("{0}")]
    OpenAiAuth(String),

    #[error("{0}")]
    Git(String),

    #[error("{0}")]
    NotFound(String),

    #[error("An unexpected error occurred: {0}")]
    CompletionShape(String),

    #[error("{0}")]
    GitProvider(String),

    #[error("{0}")]
    AiHandler(String),

    #[error("{0}")]
    Prompt(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Template rendering error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("{0}")]
    Other(String),
}

impl From<figment::Error> for GptMyPrError {
    fn from(err: figment::Error) -> Self {
        GptMyPrError::Config(err.to_string())
    }
}

impl From<git2::Error> for GptMyPrError {
    fn from(err: git2::Error) -> Self {
        GptMyPrError::Git(err.message().to_string())
    }
}

impl GptMyPrError {
    /// Completion returned no choice or no tool call.
    pub fn empty_completion() -> Self {
        GptMyPrError::CompletionShape(
            "Received an empty completion from the OpenAI API. Just run gptmypr again.".into(),
        )
    }

    /// Tool call carried no usable source code.
    pub fn empty_generated_code() -> Self {
        GptMyPrError::CompletionShape(
            "The generated source code is empty. Please try running the command again.".into(),
        )
    }

    /// Completion stopped at the token limit, so its arguments are cut off.
    pub fn truncated_completion() -> Self {
        GptMyPrError::CompletionShape(
            "The completion was cut off at the model's token limit. The file may be too large for openai_model.".into(),
        )
    }

    /// Short kind label used when reporting unclassified errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            GptMyPrError::Config(_) => "ConfigError",
            GptMyPrError::GithubAuth(_) => "GithubAuthError",
            GptMyPrError::OpenAiAuth(_) => "OpenAiAuthError",
            GptMyPrError::Git(_) => "GitError",
            GptMyPrError::NotFound(_) => "LookupError",
            GptMyPrError::CompletionShape(_) => "CompletionError",
            GptMyPrError::GitProvider(_) => "GithubError",
            GptMyPrError::AiHandler(_) => "OpenAiError",
            GptMyPrError::Prompt(_) => "PromptError",
            GptMyPrError::Http(_) => "HttpError",
            GptMyPrError::Template(_) => "TemplateError",
            GptMyPrError::Io(_) => "IoError",
            GptMyPrError::Json(_) => "JsonError",
            GptMyPrError::Toml(_) => "TomlError",
            GptMyPrError::Other(_) => "Error",
        }
    }

    /// Single-line message shown to the user for this error.
    ///
    /// Credential and local repository problems get a corrective hint; every
    /// other kind is reported as `<Kind>: <message>`.
    pub fn user_message(&self) -> String {
        match self {
            GptMyPrError::GithubAuth(e) => {
                format!("GitHub credentials issue: {e}. Change github_token in config")
            }
            GptMyPrError::OpenAiAuth(e) => {
                format!("OpenAI credentials issue: {e}. Change openai_apikey in config")
            }
            GptMyPrError::Git(e) => {
                format!("Git repository issue: {e}. Make sure that repo was initialized.")
            }
            GptMyPrError::Config(e) => e.clone(),
            other => format!("{}: {other}", other.kind_name()),
        }
    }
}
