//! Fake collaborators shared by the integration tests.

#![allow(dead_code)]

use arcana_application::{DeckGenerator, InterpretationComposer, TarotUseCase};
use arcana_core::card::Deck;
use arcana_core::draw::DrawResult;
use arcana_core::generator::{
    CardImageRequest, GenerationError, ImageGenerator, ImagePayload, TextGenerator,
};
use arcana_core::presenter::{Activity, Notice, Presenter};
use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

/// Image generator that fails for a fixed set of card names.
#[derive(Default)]
pub struct FakeImageGenerator {
    failing: HashSet<String>,
    gate: Option<Arc<Semaphore>>,
    calls: AtomicUsize,
}

impl FakeImageGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            failing: names.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Every request waits for a permit of `gate` before answering.
    pub fn gated(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

/// The card name is the first quoted string of every card prompt.
fn card_name(request: &CardImageRequest) -> String {
    request
        .prompt()
        .split('"')
        .nth(1)
        .unwrap_or_default()
        .to_string()
}

#[async_trait]
impl ImageGenerator for FakeImageGenerator {
    async fn generate_image(
        &self,
        request: &CardImageRequest,
    ) -> Result<ImagePayload, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            let _permit = gate
                .acquire()
                .await
                .map_err(|e| GenerationError::Unavailable(e.to_string()))?;
        }

        let name = card_name(request);
        if self.failing.contains(&name) {
            return Err(GenerationError::Api {
                status_code: 500,
                message: format!("could not draw {name}"),
                is_retryable: true,
                retry_after: None,
            });
        }
        Ok(ImagePayload::new("image/jpeg", "AAAA"))
    }
}

/// Text generator with a canned answer that records its prompts.
pub struct FakeTextGenerator {
    answer: Result<String, GenerationError>,
    prompts: Mutex<Vec<String>>,
}

impl FakeTextGenerator {
    pub fn answering(text: impl Into<String>) -> Self {
        Self {
            answer: Ok(text.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            answer: Err(GenerationError::Api {
                status_code: 503,
                message: "UNAVAILABLE: The model is overloaded".to_string(),
                is_retryable: true,
                retry_after: None,
            }),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for FakeTextGenerator {
    async fn generate_text(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answer.clone()
    }
}

/// What the presenter was asked to show, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Shown {
    Busy(Activity, bool),
    Deck(usize),
    Spread(Vec<(String, String)>),
    Interpretation(String),
    Notice(Notice),
}

#[derive(Default)]
pub struct RecordingPresenter {
    shown: Mutex<Vec<Shown>>,
}

impl RecordingPresenter {
    pub fn shown(&self) -> Vec<Shown> {
        self.shown.lock().unwrap().clone()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.shown()
            .into_iter()
            .filter_map(|shown| match shown {
                Shown::Notice(notice) => Some(notice),
                _ => None,
            })
            .collect()
    }

    fn record(&self, shown: Shown) {
        self.shown.lock().unwrap().push(shown);
    }
}

impl Presenter for RecordingPresenter {
    fn set_busy(&self, activity: Activity, busy: bool) {
        self.record(Shown::Busy(activity, busy));
    }

    fn show_deck(&self, deck: &Deck) {
        self.record(Shown::Deck(deck.len()));
    }

    fn show_spread(&self, draw: &DrawResult) {
        self.record(Shown::Spread(
            draw.iter()
                .map(|placed| (placed.position.to_string(), placed.card.name.clone()))
                .collect(),
        ));
    }

    fn show_interpretation(&self, text: &str) {
        self.record(Shown::Interpretation(text.to_string()));
    }

    fn show_notice(&self, notice: &Notice) {
        self.record(Shown::Notice(notice.clone()));
    }
}

pub struct Harness {
    pub usecase: Arc<TarotUseCase>,
    pub images: Arc<FakeImageGenerator>,
    pub text: Arc<FakeTextGenerator>,
    pub presenter: Arc<RecordingPresenter>,
}

pub fn harness(images: FakeImageGenerator, text: FakeTextGenerator) -> Harness {
    let images = Arc::new(images);
    let text = Arc::new(text);
    let presenter = Arc::new(RecordingPresenter::default());

    let usecase = TarotUseCase::new(
        DeckGenerator::new(images.clone(), ImagePayload::new("image/jpeg", "cmVm")),
        InterpretationComposer::new(text.clone()),
        presenter.clone(),
    )
    .unwrap()
    .with_rng(StdRng::seed_from_u64(42));

    Harness {
        usecase: Arc::new(usecase),
        images,
        text,
        presenter,
    }
}
