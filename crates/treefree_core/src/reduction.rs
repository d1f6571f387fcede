//! The reduction loop deciding discreteness and freeness at a prime.
//!
//! `ReductionRunner` owns the whole state of one run: the current matrix
//! tuple, its word shadow, the iteration counter and the potential. Each
//! `step` either applies one improving rewrite or settles on a verdict, so
//! callers can drive it in batches (see `run_steps`) or to completion.

use crate::error::InputError;
use crate::matrix::Sl2;
use crate::pingpong::{verify_ping_pong, PingPongFailure};
use crate::potential::potential;
use crate::search::{
    candidate_count, find_improving_rewrite, SearchOutcome, MAX_SEARCHABLE_GENERATORS,
};
use crate::translation::is_elliptic;
use crate::valuation::Prime;
use crate::word::Word;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReductionSettings {
    /// Rewrites allowed before the run reports `CapExceeded`.
    pub max_iterations: usize,
    /// Largest tuple accepted; the search visits `n · 4^(n-1)` candidates per step.
    pub max_generators: usize,
}

impl Default for ReductionSettings {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            max_generators: 8,
        }
    }
}

/// Terminal outcome of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome")]
pub enum Verdict {
    /// The reduced tuple passes Ping-Pong: the group is free and discrete.
    DiscreteFree,
    /// A current generator fixes a vertex; `word` spells it in the original generators.
    Elliptic {
        index: usize,
        generator: Sl2,
        word: Word,
    },
    /// The iteration budget ran out while rewrites were still improving.
    CapExceeded { iterations: usize },
    /// Reduced, but the Ping-Pong conditions do not hold for this tuple.
    Inconclusive {
        generators: Vec<Sl2>,
        words: Vec<Word>,
        failure: PingPongFailure,
    },
}

impl Verdict {
    pub fn kind(&self) -> &'static str {
        match self {
            Verdict::DiscreteFree => "discrete_free",
            Verdict::Elliptic { .. } => "elliptic",
            Verdict::CapExceeded { .. } => "cap_exceeded",
            Verdict::Inconclusive { .. } => "inconclusive",
        }
    }
}

/// Progress payload for batched runs.
#[derive(Debug, Clone, Serialize)]
pub struct ReductionProgress {
    pub done: bool,
    pub iterations: usize,
    pub max_iterations: usize,
    pub potential: u64,
}

pub struct ReductionRunner {
    prime: Prime,
    settings: ReductionSettings,
    original: Vec<Sl2>,
    generators: Vec<Sl2>,
    words: Vec<Word>,
    iterations: usize,
    potential: u64,
    history: Vec<u64>,
    verdict: Option<Verdict>,
}

impl ReductionRunner {
    pub fn new(
        generators: Vec<Sl2>,
        prime: Prime,
        settings: ReductionSettings,
    ) -> Result<Self, InputError> {
        validate(&generators, &settings)?;

        let current = potential(&generators, &prime);
        let words = Word::generators(generators.len());
        debug!(
            generators = generators.len(),
            prime = %prime,
            potential = current,
            candidates_per_search = %candidate_count(generators.len()),
            "starting reduction"
        );

        Ok(Self {
            prime,
            settings,
            original: generators.clone(),
            generators,
            words,
            iterations: 0,
            potential: current,
            history: vec![current],
            verdict: None,
        })
    }

    pub fn is_done(&self) -> bool {
        self.verdict.is_some()
    }

    pub fn verdict(&self) -> Option<&Verdict> {
        self.verdict.as_ref()
    }

    pub fn prime(&self) -> &Prime {
        &self.prime
    }

    pub fn settings(&self) -> ReductionSettings {
        self.settings
    }

    pub fn original_generators(&self) -> &[Sl2] {
        &self.original
    }

    pub fn generators(&self) -> &[Sl2] {
        &self.generators
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn potential(&self) -> u64 {
        self.potential
    }

    /// Potential before the first rewrite and after each applied one.
    pub fn potential_history(&self) -> &[u64] {
        &self.history
    }

    /// Performs one iteration. Returns `true` once a verdict is reached.
    pub fn step(&mut self) -> bool {
        if self.verdict.is_some() {
            return true;
        }

        if let Some(index) = self
            .generators
            .iter()
            .position(|g| is_elliptic(g, &self.prime))
        {
            self.finish(Verdict::Elliptic {
                index,
                generator: self.generators[index].clone(),
                word: self.words[index].clone(),
            });
            return true;
        }

        match find_improving_rewrite(&self.generators, &self.prime, self.potential) {
            SearchOutcome::Exhausted => {
                let verdict =
                    classify_reduced(self.generators.clone(), self.words.clone(), &self.prime);
                self.finish(verdict);
                true
            }
            SearchOutcome::Improved { .. } if self.iterations >= self.settings.max_iterations => {
                self.finish(Verdict::CapExceeded {
                    iterations: self.iterations,
                });
                true
            }
            SearchOutcome::Improved {
                instruction,
                potential,
            } => {
                // Both snapshots are built before either tuple is replaced.
                let generators = instruction.apply(&self.generators);
                let n = generators.len();
                let words = instruction.apply(&self.words);
                self.generators = generators;
                self.words = words;
                self.iterations += 1;
                self.potential = potential;
                self.history.push(potential);
                debug!(
                    iteration = self.iterations,
                    pivot = instruction.pivot,
                    left = ?instruction.left_indices(n),
                    right = ?instruction.right_indices(n),
                    potential,
                    "applied rewrite"
                );
                false
            }
        }
    }

    /// Runs at most `batch_size` iterations.
    pub fn run_steps(&mut self, batch_size: usize) -> ReductionProgress {
        for _ in 0..batch_size {
            if self.step() {
                break;
            }
        }
        self.progress()
    }

    pub fn progress(&self) -> ReductionProgress {
        ReductionProgress {
            done: self.is_done(),
            iterations: self.iterations,
            max_iterations: self.settings.max_iterations,
            potential: self.potential,
        }
    }

    pub fn run_to_completion(mut self) -> Verdict {
        loop {
            if let Some(verdict) = self.verdict.take() {
                return verdict;
            }
            self.step();
        }
    }

    fn finish(&mut self, verdict: Verdict) {
        info!(
            verdict = verdict.kind(),
            iterations = self.iterations,
            potential = self.potential,
            "reduction finished"
        );
        self.verdict = Some(verdict);
    }
}

fn validate(generators: &[Sl2], settings: &ReductionSettings) -> Result<(), InputError> {
    if settings.max_iterations == 0 {
        return Err(InputError::InvalidSettings(
            "max_iterations must be greater than zero.".to_string(),
        ));
    }
    if settings.max_generators == 0 || settings.max_generators > MAX_SEARCHABLE_GENERATORS {
        return Err(InputError::InvalidSettings(format!(
            "max_generators must lie in 1..={}.",
            MAX_SEARCHABLE_GENERATORS
        )));
    }
    if generators.is_empty() {
        return Err(InputError::NoGenerators);
    }
    if generators.len() > settings.max_generators {
        return Err(InputError::TooManyGenerators {
            count: generators.len(),
            limit: settings.max_generators,
        });
    }
    Ok(())
}

/// Verdict for a tuple the search can no longer improve.
pub fn classify_reduced(generators: Vec<Sl2>, words: Vec<Word>, p: &Prime) -> Verdict {
    match verify_ping_pong(&generators, p) {
        Ok(()) => Verdict::DiscreteFree,
        Err(failure) => Verdict::Inconclusive {
            generators,
            words,
            failure,
        },
    }
}

/// Decides whether `generators` generate a free group acting discretely on the tree of `prime`.
pub fn decide_discrete_free(
    generators: &[Sl2],
    prime: &Prime,
    settings: ReductionSettings,
) -> Result<Verdict, InputError> {
    let runner = ReductionRunner::new(generators.to_vec(), prime.clone(), settings)?;
    Ok(runner.run_to_completion())
}
