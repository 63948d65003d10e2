//! Tarot use case: turns user events into deck generations and readings.
//!
//! Every failure is caught here and handed to the presenter as a notice.
//! Per-card generation failures only surface as the aggregate
//! [`IncompleteDeck`](arcana_core::error::IncompleteDeck) warning, and the
//! busy indicator of an operation is cleared on every exit path.

use crate::deck_generator::{DeckGenerator, DeckReport};
use crate::interpretation::InterpretationComposer;
use crate::session::TarotSession;
use arcana_core::draw::DrawResult;
use arcana_core::error::{Result, TarotError};
use arcana_core::presenter::{Activity, Notice, Presenter, UserEvent};
use arcana_core::spread::get_spread;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use tokio::sync::Mutex;

/// A completed reading.
#[derive(Debug, Clone)]
pub struct Reading {
    pub draw_result: DrawResult,
    pub narrative: String,
}

/// Shows a busy indicator until dropped.
struct BusyIndicator<'a> {
    presenter: &'a dyn Presenter,
    activity: Activity,
}

impl<'a> BusyIndicator<'a> {
    fn show(presenter: &'a dyn Presenter, activity: Activity) -> Self {
        presenter.set_busy(activity, true);
        Self {
            presenter,
            activity,
        }
    }
}

impl Drop for BusyIndicator<'_> {
    fn drop(&mut self) {
        self.presenter.set_busy(self.activity, false);
    }
}

/// Orchestrates one tarot session.
pub struct TarotUseCase {
    session: TarotSession,
    deck_generator: DeckGenerator,
    composer: InterpretationComposer,
    presenter: Arc<dyn Presenter>,
    rng: Mutex<StdRng>,
}

impl TarotUseCase {
    /// Creates a use case with a fresh session and an entropy-seeded RNG.
    pub fn new(
        deck_generator: DeckGenerator,
        composer: InterpretationComposer,
        presenter: Arc<dyn Presenter>,
    ) -> Result<Self> {
        Ok(Self {
            session: TarotSession::new()?,
            deck_generator,
            composer,
            presenter,
            rng: Mutex::new(StdRng::from_entropy()),
        })
    }

    /// Replaces the random source used for draws.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = Mutex::new(rng);
        self
    }

    pub fn session(&self) -> &TarotSession {
        &self.session
    }

    /// Dispatches a user event. Outcomes reach the user through the presenter.
    pub async fn handle(&self, event: UserEvent) {
        match event {
            UserEvent::GenerateDeckRequested => {
                let _ = self.generate_deck().await;
            }
            UserEvent::ReadingRequested { spread_id, query } => {
                let _ = self.request_reading(&spread_id, &query).await;
            }
        }
    }

    /// Generates a new deck and commits it unless it was superseded.
    pub async fn generate_deck(&self) -> Result<DeckReport> {
        let run = match self.session.begin_generation() {
            Ok(run) => run,
            Err(err) => {
                self.notify(&err);
                return Err(err);
            }
        };

        let report = {
            let _busy = BusyIndicator::show(self.presenter.as_ref(), Activity::GeneratingDeck);
            let outcome = self.deck_generator.generate().await;
            let committed = self.session.commit(&run, outcome.deck.clone());
            DeckReport {
                deck: outcome.deck,
                failures: outcome.failures,
                epoch: run.epoch(),
                committed,
            }
        };
        drop(run);

        if report.committed {
            self.presenter.show_deck(&report.deck);
            if let Some(warning) = report.warning() {
                tracing::warn!(
                    target: "deck",
                    generated = warning.generated,
                    expected = warning.expected,
                    missing = ?warning.missing,
                    "{}",
                    warning
                );
                self.presenter.show_notice(&Notice::from(&warning));
            }
        }
        Ok(report)
    }

    /// Draws a spread from the active deck and asks for its interpretation.
    ///
    /// When the interpretation fails the spread stays shown and only the
    /// narrative is missing.
    pub async fn request_reading(&self, spread_id: &str, query: &str) -> Result<Reading> {
        let result = self.perform_reading(spread_id, query).await;
        if let Err(err) = &result {
            self.notify(err);
        }
        result
    }

    /// Renders the active deck.
    pub fn show_deck(&self) {
        self.presenter.show_deck(&self.session.deck());
    }

    /// Drops the active deck. A generation in flight will not be committed.
    pub fn discard_deck(&self) {
        self.session.discard_deck();
        tracing::info!(target: "deck", "Deck discarded");
        self.show_deck();
    }

    async fn perform_reading(&self, spread_id: &str, query: &str) -> Result<Reading> {
        let spread = get_spread(spread_id)?;
        let _in_flight = self.session.begin_reading()?;
        let _busy = BusyIndicator::show(self.presenter.as_ref(), Activity::ConsultingReading);

        let draw_result = {
            let mut rng = self.rng.lock().await;
            self.session.draw(spread, &mut *rng)?
        };
        tracing::info!(
            target: "reading",
            spread = %spread.id,
            cards = draw_result.len(),
            "Spread drawn"
        );
        self.presenter.show_spread(&draw_result);

        let narrative = self.composer.compose(&draw_result, query).await?;
        self.presenter.show_interpretation(&narrative);

        Ok(Reading {
            draw_result,
            narrative,
        })
    }

    fn notify(&self, err: &TarotError) {
        tracing::warn!(target: "reading", "{}", err);
        self.presenter.show_notice(&Notice::from(err));
    }
}
