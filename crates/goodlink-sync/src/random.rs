//! # Random Source
//!
//! Every simulated outcome (which record the simulator nudges, by how much,
//! how long a sync takes, whether it fails) is drawn through [`SyncRandom`]
//! so tests can pin the outcomes.
//!
//! ```text
//! ┌──────────────────┬──────────────────────────────────────────────────┐
//! │ ThreadRandom     │ rand::thread_rng, used by the runner             │
//! │ SeededRandom     │ StdRng from a u64 seed, reproducible sequences   │
//! │ ScriptedRandom   │ queued answers, falls back to fixed defaults     │
//! └──────────────────┴──────────────────────────────────────────────────┘
//! ```

use std::collections::VecDeque;
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{thread_rng, Rng, SeedableRng};

/// Source of simulated outcomes.
pub trait SyncRandom: Send + Sync {
    /// Uniform index in `0..len`. `len` is never zero.
    fn pick_index(&self, len: usize) -> usize;

    /// Uniform integer in `[-max_abs, +max_abs]`.
    fn quantity_delta(&self, max_abs: i64) -> i64;

    /// Uniform delay in `[min_ms, max_ms]`.
    fn delay_ms(&self, min_ms: u64, max_ms: u64) -> u64;

    /// `true` with probability `p`.
    fn chance(&self, p: f64) -> bool;
}

// =============================================================================
// Thread RNG
// =============================================================================

/// Non-deterministic source backed by the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl SyncRandom for ThreadRandom {
    fn pick_index(&self, len: usize) -> usize {
        thread_rng().gen_range(0..len.max(1))
    }

    fn quantity_delta(&self, max_abs: i64) -> i64 {
        let max_abs = max_abs.abs();
        thread_rng().gen_range(-max_abs..=max_abs)
    }

    fn delay_ms(&self, min_ms: u64, max_ms: u64) -> u64 {
        thread_rng().gen_range(min_ms..=max_ms.max(min_ms))
    }

    fn chance(&self, p: f64) -> bool {
        thread_rng().gen::<f64>() < p
    }
}

// =============================================================================
// Seeded RNG
// =============================================================================

/// Deterministic source for reproducible runs.
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        SeededRandom {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut rng)
    }
}

impl SyncRandom for SeededRandom {
    fn pick_index(&self, len: usize) -> usize {
        self.with_rng(|rng| rng.gen_range(0..len.max(1)))
    }

    fn quantity_delta(&self, max_abs: i64) -> i64 {
        let max_abs = max_abs.abs();
        self.with_rng(|rng| rng.gen_range(-max_abs..=max_abs))
    }

    fn delay_ms(&self, min_ms: u64, max_ms: u64) -> u64 {
        self.with_rng(|rng| rng.gen_range(min_ms..=max_ms.max(min_ms)))
    }

    fn chance(&self, p: f64) -> bool {
        self.with_rng(|rng| rng.gen::<f64>() < p)
    }
}

// =============================================================================
// Scripted
// =============================================================================

/// Replays queued answers in order.
///
/// An exhausted queue falls back to index `0`, delta `0`, the minimum delay
/// and `false`.
#[derive(Debug, Default)]
pub struct ScriptedRandom {
    indices: Mutex<VecDeque<usize>>,
    deltas: Mutex<VecDeque<i64>>,
    delays: Mutex<VecDeque<u64>>,
    chances: Mutex<VecDeque<bool>>,
}

impl ScriptedRandom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_indices(self, values: impl IntoIterator<Item = usize>) -> Self {
        push_all(&self.indices, values);
        self
    }

    pub fn with_deltas(self, values: impl IntoIterator<Item = i64>) -> Self {
        push_all(&self.deltas, values);
        self
    }

    pub fn with_delays(self, values: impl IntoIterator<Item = u64>) -> Self {
        push_all(&self.delays, values);
        self
    }

    pub fn with_chances(self, values: impl IntoIterator<Item = bool>) -> Self {
        push_all(&self.chances, values);
        self
    }
}

fn push_all<T>(queue: &Mutex<VecDeque<T>>, values: impl IntoIterator<Item = T>) {
    let mut queue = queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    queue.extend(values);
}

fn pop<T>(queue: &Mutex<VecDeque<T>>) -> Option<T> {
    queue
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .pop_front()
}

impl SyncRandom for ScriptedRandom {
    fn pick_index(&self, len: usize) -> usize {
        pop(&self.indices).unwrap_or(0) % len.max(1)
    }

    fn quantity_delta(&self, max_abs: i64) -> i64 {
        let max_abs = max_abs.abs();
        pop(&self.deltas).unwrap_or(0).clamp(-max_abs, max_abs)
    }

    fn delay_ms(&self, min_ms: u64, max_ms: u64) -> u64 {
        pop(&self.delays)
            .unwrap_or(min_ms)
            .clamp(min_ms, max_ms.max(min_ms))
    }

    fn chance(&self, _p: f64) -> bool {
        pop(&self.chances).unwrap_or(false)
    }
}
