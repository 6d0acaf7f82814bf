//! Genetic search over weekly schedules.

pub mod crossover;
pub mod initialization;
pub mod mutation;
pub mod runner;

pub use self::initialization::{CandidateGenerator, GeneratedSchedule, LessonRequest};
pub use self::runner::{
    DropTally, EvolutionResult, GenerationStats, GeneticEngine, ProgressCallback, SilentProgress,
};
