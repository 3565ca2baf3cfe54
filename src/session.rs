//! Interactive session state machine.
//!
//! A session holds at most one indexed video. Submitting a URL fetches,
//! chunks and indexes its transcript; questions are answered from that index
//! until another video (or language) is submitted.

use crate::chunking::{annotate_timestamps, create_chunker, Chunker, ChunkingStrategy};
use crate::config::{Prompts, Settings};
use crate::embedding::{create_embedder, Embedder};
use crate::error::{Result, TubetalkError, UnavailableReason};
use crate::llm::{ChatCompletionsGenerator, Generator};
use crate::rag::{retrieve, Answer, AnswerComposer};
use crate::transcript::{Language, Transcript, TranscriptFetcher, VideoReference, YoutubeTranscriptFetcher};
use crate::vector_store::{build_index, VectorIndex};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No video loaded.
    Idle,
    /// Fetching and indexing a transcript.
    Fetching,
    /// A video is indexed and questions can be asked.
    Ready,
    /// Answering a question.
    Answering,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Idle => write!(f, "idle"),
            SessionState::Fetching => write!(f, "fetching"),
            SessionState::Ready => write!(f, "ready"),
            SessionState::Answering => write!(f, "answering"),
        }
    }
}

/// Result of submitting a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The same video and language were already indexed; nothing was done.
    Cached,
    /// The transcript was fetched and indexed.
    Indexed { chunks: usize, segments: usize },
}

/// Pipeline parameters for a session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub chunking_strategy: ChunkingStrategy,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    /// Number of chunks retrieved per question.
    pub k: usize,
    pub embedding_batch_size: usize,
    pub max_concurrent_requests: usize,
    pub prompts: Prompts,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            chunking_strategy: ChunkingStrategy::Window,
            chunk_size: 1000,
            chunk_overlap: 200,
            k: 4,
            embedding_batch_size: 100,
            max_concurrent_requests: 4,
            prompts: Prompts::default(),
        }
    }
}

impl SessionOptions {
    /// Options from settings, loading custom prompts if configured.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        Ok(Self {
            chunking_strategy: settings.chunking.strategy,
            chunk_size: settings.chunking.chunk_size,
            chunk_overlap: settings.chunking.chunk_overlap,
            k: settings.retrieval.k,
            embedding_batch_size: settings.embedding.batch_size,
            max_concurrent_requests: settings.embedding.max_concurrent_requests,
            prompts,
        })
    }
}

/// The indexed video of a ready session.
struct LoadedVideo {
    video: VideoReference,
    language: Language,
    transcript: Transcript,
    index: VectorIndex,
}

/// A single user's question-answering session.
pub struct Session {
    id: Uuid,
    state: SessionState,
    loaded: Option<LoadedVideo>,
    fetcher: Arc<dyn TranscriptFetcher>,
    embedder: Arc<dyn Embedder>,
    chunker: Box<dyn Chunker>,
    composer: AnswerComposer,
    options: SessionOptions,
}

impl Session {
    /// Create a session from its components.
    ///
    /// Fails with `Config` if the chunking parameters are invalid.
    pub fn new(
        fetcher: Arc<dyn TranscriptFetcher>,
        embedder: Arc<dyn Embedder>,
        generator: Arc<dyn Generator>,
        options: SessionOptions,
    ) -> Result<Self> {
        let chunker = create_chunker(
            options.chunking_strategy,
            options.chunk_size,
            options.chunk_overlap,
        )?;
        let composer = AnswerComposer::new(generator).with_prompts(options.prompts.clone());

        let id = Uuid::new_v4();
        info!(session = %id, "Session created");

        Ok(Self {
            id,
            state: SessionState::Idle,
            loaded: None,
            fetcher,
            embedder,
            chunker,
            composer,
            options,
        })
    }

    /// Create a session wired to YouTube and the configured embedder and generator.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let fetcher = Arc::new(YoutubeTranscriptFetcher::from_settings(&settings.transcript)?);
        let embedder = create_embedder(&settings.embedding)?;
        let generator = Arc::new(ChatCompletionsGenerator::from_settings(&settings.llm)?);
        Self::new(fetcher, embedder, generator, SessionOptions::from_settings(settings)?)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The loaded video, if ready.
    pub fn video(&self) -> Option<&VideoReference> {
        self.loaded.as_ref().map(|l| &l.video)
    }

    /// Language of the loaded transcript, if ready.
    pub fn language(&self) -> Option<Language> {
        self.loaded.as_ref().map(|l| l.language)
    }

    pub fn transcript(&self) -> Option<&Transcript> {
        self.loaded.as_ref().map(|l| &l.transcript)
    }

    pub fn index(&self) -> Option<&VectorIndex> {
        self.loaded.as_ref().map(|l| &l.index)
    }

    /// Number of chunks retrieved per question.
    pub fn k(&self) -> usize {
        self.options.k
    }

    pub fn set_k(&mut self, k: usize) {
        self.options.k = k;
    }

    /// Load a video, reusing the current index if it is the same video and language.
    ///
    /// The new index is built before it replaces the current one. On failure
    /// the previous video stays loaded, or the session stays `Idle` if there
    /// was none.
    #[instrument(skip(self), fields(session = %self.id))]
    pub async fn submit_url(&mut self, url: &str, language: Language) -> Result<SubmitOutcome> {
        if self.state == SessionState::Ready {
            if let (Ok(video), Some(loaded)) = (VideoReference::parse(url), &self.loaded) {
                if video.video_id == loaded.video.video_id && language == loaded.language {
                    info!("Video {} already indexed, reusing", video.video_id);
                    return Ok(SubmitOutcome::Cached);
                }
            }
        }

        self.state = SessionState::Fetching;

        match self.load(url, language).await {
            Ok(loaded) => {
                let outcome = SubmitOutcome::Indexed {
                    chunks: loaded.index.len(),
                    segments: loaded.transcript.segments.len(),
                };
                info!(
                    "Video {} ready ({} segments, {} chunks)",
                    loaded.video.video_id,
                    loaded.transcript.segments.len(),
                    loaded.index.len()
                );
                self.loaded = Some(loaded);
                self.state = SessionState::Ready;
                Ok(outcome)
            }
            Err(e) => {
                warn!("Failed to load video: {}", e);
                self.state = if self.loaded.is_some() {
                    SessionState::Ready
                } else {
                    SessionState::Idle
                };
                Err(e)
            }
        }
    }

    /// Fetch, chunk and index a video without touching session state.
    async fn load(&self, url: &str, language: Language) -> Result<LoadedVideo> {
        let video = VideoReference::parse(url)?;
        let transcript = self.fetcher.fetch(&video, language).await?;

        let mut chunks = self.chunker.chunk(&transcript.full_text())?;
        if chunks.is_empty() {
            return Err(TubetalkError::unavailable(&video.video_id, UnavailableReason::Empty));
        }
        annotate_timestamps(&mut chunks, &transcript);

        let index = build_index(
            chunks,
            self.embedder.as_ref(),
            self.options.embedding_batch_size,
            self.options.max_concurrent_requests,
        )
        .await?;

        Ok(LoadedVideo {
            video,
            language,
            transcript,
            index,
        })
    }

    /// Answer a question about the loaded video.
    ///
    /// A failed answer keeps the video loaded.
    #[instrument(skip(self), fields(session = %self.id))]
    pub async fn ask(&mut self, question: &str) -> Result<Answer> {
        if self.state != SessionState::Ready || self.loaded.is_none() {
            return Err(TubetalkError::NotReady);
        }

        let question = question.trim();
        if question.is_empty() {
            return Err(TubetalkError::InvalidInput("Question is empty".to_string()));
        }

        self.state = SessionState::Answering;
        let result = self.answer(question).await;
        self.state = SessionState::Ready;
        result
    }

    async fn answer(&self, question: &str) -> Result<Answer> {
        let loaded = self.loaded.as_ref().ok_or(TubetalkError::NotReady)?;
        let chunks = retrieve(
            &loaded.index,
            self.embedder.as_ref(),
            question,
            self.options.k,
        )
        .await?;
        self.composer.answer(chunks, question).await
    }
}
