//! Application layer for ARCANA.
//!
//! Wires the domain pipeline to the generator collaborators and the
//! presenter: deck generation, draws and interpretations, with the
//! session-wide in-flight rules and the error propagation policy.

pub mod deck_generator;
pub mod interpretation;
pub mod reading_usecase;
pub mod session;

pub use deck_generator::{DeckGenerator, DeckReport, GenerationOutcome};
pub use interpretation::InterpretationComposer;
pub use reading_usecase::{Reading, TarotUseCase};
pub use session::{GenerationRun, TarotSession};
