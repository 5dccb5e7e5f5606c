use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::config::ReactionKind;
use crate::error::GptMyPrError;
use crate::git::GitProvider;
use crate::git::types::*;

/// Captured calls made to the mock provider, for test assertions.
#[derive(Debug, Default)]
pub struct MockCalls {
    pub created_reactions: Vec<(u64, ReactionKind)>,
    /// `(path, git_ref)` of every content fetch.
    pub content_fetches: Vec<(String, String)>,
}

/// Mock git provider bound to `acme/widgets`, authenticated as `mock-user`.
///
/// Pull requests, comments, reactions and file contents are pre-configured;
/// reaction creation and content fetches are captured for assertions.
pub struct MockGitProvider {
    pub login: String,
    pub repository_exists: bool,
    pub bad_credentials: bool,
    pub pull_requests: HashMap<u64, PullRequest>,
    pub review_comments: Vec<ReviewComment>,
    pub reactions: HashMap<u64, Vec<CommentReaction>>,
    pub files: HashMap<String, String>,
    pub failing_reaction_fetch: bool,
    pub failing_reaction_create: HashSet<u64>,
    pub calls: Mutex<MockCalls>,
}

impl MockGitProvider {
    pub fn new() -> Self {
        Self {
            login: "mock-user".into(),
            repository_exists: true,
            bad_credentials: false,
            pull_requests: HashMap::new(),
            review_comments: Vec::new(),
            reactions: HashMap::new(),
            files: HashMap::new(),
            failing_reaction_fetch: false,
            failing_reaction_create: HashSet::new(),
            calls: Mutex::new(MockCalls::default()),
        }
    }

    pub fn with_pull_request(mut self, pr: PullRequest) -> Self {
        self.pull_requests.insert(pr.number, pr);
        self
    }

    pub fn with_review_comments(mut self, comments: Vec<ReviewComment>) -> Self {
        self.review_comments = comments;
        self
    }

    pub fn with_reactions(mut self, comment_id: u64, reactions: Vec<CommentReaction>) -> Self {
        self.reactions.insert(comment_id, reactions);
        self
    }

    pub fn with_file(mut self, path: &str, content: &str) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }

    pub fn with_failing_reaction_fetch(mut self) -> Self {
        self.failing_reaction_fetch = true;
        self
    }

    /// Make adding a reaction to `comment_id` fail.
    pub fn with_failing_reaction_create(mut self, comment_id: u64) -> Self {
        self.failing_reaction_create.insert(comment_id);
        self
    }

    pub fn without_repository(mut self) -> Self {
        self.repository_exists = false;
        self
    }

    pub fn with_bad_credentials(mut self) -> Self {
        self.bad_credentials = true;
        self
    }

    pub fn get_calls(&self) -> std::sync::MutexGuard<'_, MockCalls> {
        self.calls.lock().unwrap()
    }

    fn check_auth(&self) -> Result<(), GptMyPrError> {
        if self.bad_credentials {
            return Err(GptMyPrError::GithubAuth("Bad credentials".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl GitProvider for MockGitProvider {
    fn repo_full_name(&self) -> &str {
        "acme/widgets"
    }

    async fn get_user_login(&self) -> Result<String, GptMyPrError> {
        self.check_auth()?;
        Ok(self.login.clone())
    }

    async fn get_repository(&self) -> Result<(), GptMyPrError> {
        self.check_auth()?;
        if self.repository_exists {
            Ok(())
        } else {
            Err(GptMyPrError::NotFound("Not Found".into()))
        }
    }

    async fn get_pull_request(&self, number: u64) -> Result<PullRequest, GptMyPrError> {
        self.check_auth()?;
        self.pull_requests
            .get(&number)
            .cloned()
            .ok_or_else(|| GptMyPrError::NotFound("Not Found".into()))
    }

    async fn get_review_comments(&self, _number: u64) -> Result<Vec<ReviewComment>, GptMyPrError> {
        self.check_auth()?;
        Ok(self.review_comments.clone())
    }

    async fn get_comment_reactions(
        &self,
        comment_id: u64,
    ) -> Result<Vec<CommentReaction>, GptMyPrError> {
        self.check_auth()?;
        if self.failing_reaction_fetch {
            return Err(GptMyPrError::GitProvider("reactions unavailable".into()));
        }
        Ok(self.reactions.get(&comment_id).cloned().unwrap_or_default())
    }

    async fn create_comment_reaction(
        &self,
        comment_id: u64,
        reaction: ReactionKind,
    ) -> Result<(), GptMyPrError> {
        self.check_auth()?;
        if self.failing_reaction_create.contains(&comment_id) {
            return Err(GptMyPrError::GitProvider("Validation Failed".into()));
        }
        self.calls
            .lock()
            .unwrap()
            .created_reactions
            .push((comment_id, reaction));
        Ok(())
    }

    async fn get_file_content(&self, path: &str, git_ref: &str) -> Result<String, GptMyPrError> {
        self.check_auth()?;
        self.calls
            .lock()
            .unwrap()
            .content_fetches
            .push((path.into(), git_ref.into()));
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| GptMyPrError::NotFound("Not Found".into()))
    }
}
