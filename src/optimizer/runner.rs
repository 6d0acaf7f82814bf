use super::crossover;
use super::initialization::CandidateGenerator;
use super::mutation;
use crate::config::{FitnessWeights, GaParams};
use crate::constraints::{self, DroppedLesson, Violation};
use crate::domain::DataService;
use crate::error::SchedResult;
use crate::schedule::WeeklySchedule;
use crate::scorer::Scorer;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationStats {
    /// 0 is the freshly initialized population.
    pub generation: usize,
    pub best_fitness: f64,
    pub mean_fitness: f64,
    pub events_in_best: usize,
}

/// Lessons lost over a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DropTally {
    /// Repair drops, keyed by the rule that first flagged the event.
    pub by_violation: BTreeMap<Violation, usize>,
    /// Initial-population occurrences no cell could take.
    pub unplaced: usize,
}

impl DropTally {
    pub fn record(&mut self, dropped: &[DroppedLesson]) {
        for d in dropped {
            *self.by_violation.entry(d.violation).or_insert(0) += 1;
        }
    }

    pub fn repair_drops(&self) -> usize {
        self.by_violation.values().sum()
    }

    pub fn total(&self) -> usize {
        self.repair_drops() + self.unplaced
    }
}

#[derive(Debug, Clone)]
pub struct EvolutionResult {
    /// Fittest individual of the final population.
    pub best: WeeklySchedule,
    /// Fittest individual seen in any generation; only with `track_best_ever`.
    pub best_ever: Option<WeeklySchedule>,
    pub history: Vec<GenerationStats>,
    pub dropped: DropTally,
}

/// Receives per-generation statistics. The run always completes.
pub trait ProgressCallback {
    fn on_generation(&self, stats: &GenerationStats);
}

pub struct SilentProgress;

impl ProgressCallback for SilentProgress {
    fn on_generation(&self, _stats: &GenerationStats) {}
}

pub struct GeneticEngine<'a> {
    data: &'a DataService,
    params: GaParams,
    scorer: Scorer,
    generator: CandidateGenerator<'a>,
    rng: fastrand::Rng,
}

impl<'a> GeneticEngine<'a> {
    /// `seed: None` draws from system entropy, so runs are not reproducible.
    pub fn new(
        data: &'a DataService,
        params: GaParams,
        weights: FitnessWeights,
        semester_weeks: u32,
        seed: Option<u64>,
    ) -> SchedResult<Self> {
        params.validate()?;
        let rng = if let Some(s) = seed {
            fastrand::Rng::with_seed(s)
        } else {
            fastrand::Rng::new()
        };

        Ok(Self {
            data,
            params,
            scorer: Scorer::new(weights, semester_weeks),
            generator: CandidateGenerator::new(data, semester_weeks),
            rng,
        })
    }

    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    pub fn run<CB: ProgressCallback>(&mut self, callback: &CB) -> EvolutionResult {
        let mut tally = DropTally::default();

        // 1. Initialize
        let mut population: Vec<WeeklySchedule> = (0..self.params.population_size)
            .map(|_| {
                let generated = self.generator.generate(&mut self.rng);
                tally.unplaced += generated.unplaced.len();
                let repaired = constraints::repair(generated.events, self.data);
                tally.record(&repaired.dropped);
                let mut individual = WeeklySchedule::new(repaired.events);
                self.scorer.evaluate(&mut individual, self.data);
                individual
            })
            .collect();

        let mut history = Vec::with_capacity(self.params.generations + 1);
        let mut best_ever = None;
        self.observe(0, &population, &mut history, &mut best_ever, callback);

        // 2. Evolve
        for generation in 1..=self.params.generations {
            population = self.select(&population);
            population = self.crossover(population, &mut tally);
            self.mutate(&mut population, &mut tally);

            for individual in population.iter_mut().filter(|i| i.fitness.is_none()) {
                self.scorer.evaluate(individual, self.data);
            }

            self.observe(generation, &population, &mut history, &mut best_ever, callback);
        }

        let best = fittest(&population).cloned().unwrap_or_default();
        info!(
            "Evolution finished: best fitness {:.2} with {} events, {} lessons dropped",
            best.fitness_or_min(),
            best.events.len(),
            tally.total()
        );

        EvolutionResult {
            best,
            best_ever,
            history,
            dropped: tally,
        }
    }

    /// Binary tournament with replacement; ties keep the first draw.
    fn select(&mut self, population: &[WeeklySchedule]) -> Vec<WeeklySchedule> {
        let n = population.len();
        (0..n)
            .map(|_| {
                let a = &population[self.rng.usize(..n)];
                let b = &population[self.rng.usize(..n)];
                if b.fitness_or_min() > a.fitness_or_min() {
                    b.clone()
                } else {
                    a.clone()
                }
            })
            .collect()
    }

    fn crossover(
        &mut self,
        population: Vec<WeeklySchedule>,
        tally: &mut DropTally,
    ) -> Vec<WeeklySchedule> {
        let mut next = Vec::with_capacity(population.len());
        let mut parents = population.into_iter();

        while let Some(first) = parents.next() {
            let Some(second) = parents.next() else {
                next.push(first);
                break;
            };

            if self.rng.f64() < self.params.crossover_rate {
                let (left, right) =
                    crossover::single_point(&mut self.rng, &first.events, &second.events);
                for child in [left, right] {
                    let repaired = constraints::repair(child, self.data);
                    tally.record(&repaired.dropped);
                    next.push(WeeklySchedule::new(repaired.events));
                }
            } else {
                next.push(first);
                next.push(second);
            }
        }

        next
    }

    fn mutate(&mut self, population: &mut [WeeklySchedule], tally: &mut DropTally) {
        for individual in population.iter_mut() {
            if self.rng.f64() >= self.params.mutation_rate {
                continue;
            }
            let mut events = std::mem::take(&mut individual.events);
            mutation::mutate(&mut self.rng, &mut events, &self.generator);
            let repaired = constraints::repair(events, self.data);
            tally.record(&repaired.dropped);
            individual.set_events(repaired.events);
        }
    }

    fn observe<CB: ProgressCallback>(
        &self,
        generation: usize,
        population: &[WeeklySchedule],
        history: &mut Vec<GenerationStats>,
        best_ever: &mut Option<WeeklySchedule>,
        callback: &CB,
    ) {
        let Some(best) = fittest(population) else {
            return;
        };
        let mean_fitness = population.iter().map(|i| i.fitness_or_min()).sum::<f64>()
            / population.len() as f64;

        let stats = GenerationStats {
            generation,
            best_fitness: best.fitness_or_min(),
            mean_fitness,
            events_in_best: best.events.len(),
        };
        debug!(
            "Gen {:>3}: best {:.2}, mean {:.2}, {} events",
            generation, stats.best_fitness, stats.mean_fitness, stats.events_in_best
        );

        if self.params.track_best_ever {
            let improved = best_ever
                .as_ref()
                .map_or(true, |b: &WeeklySchedule| best.fitness_or_min() > b.fitness_or_min());
            if improved {
                *best_ever = Some(best.clone());
            }
        }

        callback.on_generation(&stats);
        history.push(stats);
    }
}

/// First individual with the maximum fitness.
pub fn fittest(population: &[WeeklySchedule]) -> Option<&WeeklySchedule> {
    population.iter().fold(None, |best, candidate| match best {
        Some(b) if b.fitness_or_min() >= candidate.fitness_or_min() => Some(b),
        _ => Some(candidate),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fittest_prefers_first_on_ties() {
        let mut a = WeeklySchedule::new(vec![]);
        a.fitness = Some(-5.0);
        let mut b = a.clone();
        b.fitness = Some(-1.0);
        let mut c = b.clone();
        c.fitness = Some(-1.0);
        c.events = Vec::with_capacity(1);
        let pop = vec![a, b, c];
        let best = fittest(&pop).unwrap();
        assert!(std::ptr::eq(best, &pop[1]));
        assert!(fittest(&[]).is_none());
    }

    #[test]
    fn test_drop_tally_totals() {
        let mut t = DropTally::default();
        t.unplaced = 2;
        assert_eq!(t.total(), 2);
        assert_eq!(t.repair_drops(), 0);
    }
}
