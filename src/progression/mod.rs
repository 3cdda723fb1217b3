//! Demo session state and the store that mutates it.

mod state;
mod store;

#[allow(unused_imports)]
pub use state::{
    CompletedTask, Interaction, Modal, ModalFlags, Persona, ProgressionState, SubmittedWork,
    Visibility,
};
#[allow(unused_imports)]
pub use store::{
    BonusAward, CompletionOutcome, Diploma, GenerationOutcome, ProgressionError,
    ProgressionStore, SelectionChange, DEFAULT_LEARNER_NAME, MAX_SELECTED_QUESTS,
};
