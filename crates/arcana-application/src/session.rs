//! Session state: the active deck and the in-flight guards.

use arcana_core::card::Deck;
use arcana_core::draw::{DrawResult, draw};
use arcana_core::error::{Result, TarotError};
use arcana_core::spread::{SpreadDefinition, validate_catalog};
use rand::Rng;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

/// State of one reading session.
///
/// Owns the active deck, one in-flight flag per long-running operation and
/// the generation epoch. The deck lock is never held across an await.
#[derive(Debug, Default)]
pub struct TarotSession {
    deck: RwLock<Deck>,
    generating: AtomicBool,
    reading: AtomicBool,
    epoch: AtomicU64,
}

/// Clears an in-flight flag when dropped.
#[derive(Debug)]
pub struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool, busy: TarotError) -> Result<Self> {
        if flag.swap(true, Ordering::SeqCst) {
            return Err(busy);
        }
        Ok(Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// A running deck generation. Holds the generation flag until dropped.
#[derive(Debug)]
pub struct GenerationRun<'a> {
    epoch: u64,
    _guard: InFlightGuard<'a>,
}

impl GenerationRun<'_> {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

impl TarotSession {
    /// Creates an empty session after checking the spread catalog.
    pub fn new() -> Result<Self> {
        validate_catalog()?;
        Ok(Self::default())
    }

    /// Starts a generation run under a fresh epoch.
    pub fn begin_generation(&self) -> Result<GenerationRun<'_>> {
        let guard = InFlightGuard::acquire(&self.generating, TarotError::GenerationInProgress)?;
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(target: "deck", epoch, "Generation run started");
        Ok(GenerationRun {
            epoch,
            _guard: guard,
        })
    }

    /// Replaces the deck with the run's result unless a newer epoch exists.
    pub fn commit(&self, run: &GenerationRun<'_>, deck: Deck) -> bool {
        let mut active = self.deck.write().unwrap_or_else(PoisonError::into_inner);
        if self.epoch.load(Ordering::SeqCst) != run.epoch {
            tracing::info!(target: "deck", epoch = run.epoch, "Generation run superseded, deck dropped");
            return false;
        }
        *active = deck;
        true
    }

    /// Marks a reading in flight.
    ///
    /// Refused while a deck is being generated or another reading runs.
    pub fn begin_reading(&self) -> Result<InFlightGuard<'_>> {
        if self.is_generating() {
            return Err(TarotError::GenerationInProgress);
        }
        InFlightGuard::acquire(&self.reading, TarotError::ReadingInProgress)
    }

    /// Draws from the active deck.
    pub fn draw<R>(&self, spread: &SpreadDefinition, rng: &mut R) -> Result<DrawResult>
    where
        R: Rng + ?Sized,
    {
        let deck = self.deck.read().unwrap_or_else(PoisonError::into_inner);
        draw(&deck, spread, rng)
    }

    /// Drops the active deck and supersedes any run in flight.
    pub fn discard_deck(&self) {
        let mut active = self.deck.write().unwrap_or_else(PoisonError::into_inner);
        self.epoch.fetch_add(1, Ordering::SeqCst);
        *active = Deck::new();
    }

    /// A copy of the active deck.
    pub fn deck(&self) -> Deck {
        self.deck
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn deck_len(&self) -> usize {
        self.deck.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_generating(&self) -> bool {
        self.generating.load(Ordering::SeqCst)
    }

    pub fn is_reading(&self) -> bool {
        self.reading.load(Ordering::SeqCst)
    }

    pub fn current_epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcana_core::card::{ArcanaType, GeneratedCard};
    use arcana_core::spread::get_spread;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn deck_of(count: usize) -> Deck {
        Deck::from_cards((0..count).map(|i| GeneratedCard {
            name: format!("Card {i}"),
            image_url: "data:image/jpeg;base64,AAAA".to_string(),
            arcana: ArcanaType::Minor,
        }))
    }

    #[test]
    fn test_second_generation_is_rejected() {
        let session = TarotSession::new().unwrap();
        let run = session.begin_generation().unwrap();
        assert!(session.is_generating());
        assert_eq!(
            session.begin_generation().unwrap_err(),
            TarotError::GenerationInProgress
        );

        drop(run);
        assert!(!session.is_generating());
        assert!(session.begin_generation().is_ok());
    }

    #[test]
    fn test_commit_replaces_deck() {
        let session = TarotSession::new().unwrap();
        let run = session.begin_generation().unwrap();
        assert!(session.commit(&run, deck_of(3)));
        assert_eq!(session.deck_len(), 3);

        drop(run);
        let run = session.begin_generation().unwrap();
        assert!(session.commit(&run, deck_of(5)));
        assert_eq!(session.deck_len(), 5);
    }

    #[test]
    fn test_discard_supersedes_running_generation() {
        let session = TarotSession::new().unwrap();
        let run = session.begin_generation().unwrap();
        session.discard_deck();

        assert!(!session.commit(&run, deck_of(78)));
        assert!(session.deck().is_empty());
        assert!(session.current_epoch() > run.epoch());
    }

    #[test]
    fn test_reading_guards() {
        let session = TarotSession::new().unwrap();
        {
            let _generation = session.begin_generation().unwrap();
            assert_eq!(
                session.begin_reading().unwrap_err(),
                TarotError::GenerationInProgress
            );
        }

        let reading = session.begin_reading().unwrap();
        assert_eq!(
            session.begin_reading().unwrap_err(),
            TarotError::ReadingInProgress
        );
        drop(reading);
        assert!(!session.is_reading());
    }

    #[test]
    fn test_draw_from_empty_session() {
        let session = TarotSession::new().unwrap();
        let spread = get_spread("single").unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            session.draw(spread, &mut rng).unwrap_err(),
            TarotError::InsufficientDeck {
                required: 1,
                available: 0
            }
        );
    }
}
