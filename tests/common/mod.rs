//! Deterministic fakes for the pipeline ports.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tubetalk::embedding::{Embedder, HashingEmbedder};
use tubetalk::error::{Result, TubetalkError, UnavailableReason};
use tubetalk::llm::Generator;
use tubetalk::session::{Session, SessionOptions};
use tubetalk::transcript::{Language, Transcript, TranscriptFetcher, TranscriptSegment, VideoReference};

pub const SENTENCES: [&str; 3] = [
    "Rust is a systems programming language.",
    "Its ownership model prevents data races.",
    "Cargo builds and tests every project.",
];

/// Serves canned transcripts keyed by video id and records every fetch.
#[derive(Default)]
pub struct FakeFetcher {
    transcripts: HashMap<String, Vec<TranscriptSegment>>,
    calls: Mutex<Vec<(String, Language)>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sentences(mut self, video_id: &str, sentences: &[&str]) -> Self {
        let segments = sentences
            .iter()
            .enumerate()
            .map(|(i, s)| TranscriptSegment::new(*s, i as f64 * 4.0, 4.0))
            .collect();
        self.transcripts.insert(video_id.to_string(), segments);
        self
    }

    pub fn calls(&self) -> Vec<(String, Language)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl TranscriptFetcher for FakeFetcher {
    async fn fetch(&self, video: &VideoReference, language: Language) -> Result<Transcript> {
        self.calls
            .lock()
            .unwrap()
            .push((video.video_id.clone(), language));

        match self.transcripts.get(&video.video_id) {
            Some(segments) => Ok(Transcript::new(&video.video_id, language, segments.clone())),
            None => Err(TubetalkError::TranscriptUnavailable {
                video_id: video.video_id.clone(),
                reason: UnavailableReason::TranscriptsDisabled,
            }),
        }
    }
}

/// Hashing embedder that counts batch calls (one or more per index build).
/// Batch calls can be switched to fail.
pub struct CountingEmbedder {
    inner: HashingEmbedder,
    batch_calls: AtomicUsize,
    query_calls: AtomicUsize,
    failing: AtomicBool,
}

impl CountingEmbedder {
    pub fn new() -> Self {
        Self {
            inner: HashingEmbedder::new(128).unwrap(),
            batch_calls: AtomicUsize::new(0),
            query_calls: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }

    pub fn query_calls(&self) -> usize {
        self.query_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for CountingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.embed(text).await
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(TubetalkError::Embedding("embedding service unavailable".to_string()));
        }
        self.inner.embed_batch(texts).await
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }

    fn name(&self) -> String {
        self.inner.name()
    }
}

/// Returns a fixed reply (or error) and records every prompt.
pub struct RecordingGenerator {
    reply: std::result::Result<String, String>,
    prompts: Mutex<Vec<String>>,
}

impl RecordingGenerator {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Generator for RecordingGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply
            .clone()
            .map_err(TubetalkError::Generation)
    }

    fn model(&self) -> &str {
        "recording"
    }
}

/// A session over fakes, with handles to inspect them.
pub struct Harness {
    pub session: Session,
    pub fetcher: Arc<FakeFetcher>,
    pub embedder: Arc<CountingEmbedder>,
    pub generator: Arc<RecordingGenerator>,
}

pub fn harness(fetcher: FakeFetcher, generator: RecordingGenerator) -> Harness {
    harness_with_options(fetcher, generator, SessionOptions::default())
}

pub fn harness_with_options(
    fetcher: FakeFetcher,
    generator: RecordingGenerator,
    options: SessionOptions,
) -> Harness {
    let fetcher = Arc::new(fetcher);
    let embedder = Arc::new(CountingEmbedder::new());
    let generator = Arc::new(generator);

    let session = Session::new(fetcher.clone(), embedder.clone(), generator.clone(), options).unwrap();

    Harness {
        session,
        fetcher,
        embedder,
        generator,
    }
}
