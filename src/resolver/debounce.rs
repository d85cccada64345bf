use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

use crate::models::ResolutionResult;
use crate::resolver::AddressResolver;

#[derive(Debug, Clone, PartialEq)]
pub enum DebounceEvent {
    /// The input field changed.
    Input { value: String, at: Instant },
    /// Time advanced; fires the pending resolution once the field is quiet.
    Tick { at: Instant },
    /// A resolution triggered with `generation` finished.
    Resolved { generation: u64, value: String, result: ResolutionResult },
}

#[derive(Debug, Clone, PartialEq)]
pub enum DebounceEffect {
    None,
    /// Start resolving `value`; report back with the same generation.
    Resolve { generation: u64, value: String },
    /// Show this result next to the field.
    Publish { value: String, result: ResolutionResult },
    /// The field was emptied; drop whatever is shown.
    Clear,
    /// A result from a superseded resolution arrived and was ignored.
    Discarded { generation: u64 },
}

/// State of one debounced input field.
#[derive(Debug, Clone, PartialEq)]
pub struct DebounceState {
    delay: Duration,
    pending_value: Option<String>,
    deadline: Option<Instant>,
    latest_generation: u64,
    last_committed_generation: u64,
}

impl DebounceState {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending_value: None,
            deadline: None,
            latest_generation: 0,
            last_committed_generation: 0,
        }
    }

    pub fn pending_value(&self) -> Option<&str> {
        self.pending_value.as_deref()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn latest_generation(&self) -> u64 {
        self.latest_generation
    }

    pub fn last_committed_generation(&self) -> u64 {
        self.last_committed_generation
    }

    pub fn reduce(mut self, event: DebounceEvent) -> (Self, DebounceEffect) {
        let effect = match event {
            DebounceEvent::Input { value, at } => {
                if value.trim().is_empty() {
                    // Invalidate anything still in flight
                    self.pending_value = None;
                    self.deadline = None;
                    self.latest_generation += 1;
                    DebounceEffect::Clear
                } else {
                    self.pending_value = Some(value);
                    self.deadline = Some(at + self.delay);
                    DebounceEffect::None
                }
            }
            DebounceEvent::Tick { at } => match (self.deadline, self.pending_value.take()) {
                (Some(deadline), Some(value)) if at >= deadline => {
                    self.deadline = None;
                    self.latest_generation += 1;
                    DebounceEffect::Resolve {
                        generation: self.latest_generation,
                        value,
                    }
                }
                (_, pending) => {
                    self.pending_value = pending;
                    DebounceEffect::None
                }
            },
            DebounceEvent::Resolved { generation, value, result } => {
                if generation == self.latest_generation && generation > self.last_committed_generation {
                    self.last_committed_generation = generation;
                    DebounceEffect::Publish { value, result }
                } else {
                    DebounceEffect::Discarded { generation }
                }
            }
        };

        (self, effect)
    }
}

/// Drive a `DebounceState` from a stream of input values, resolving each value
/// once the input has been quiet for the delay. Only results from the newest
/// resolution are forwarded. Returns when `inputs` closes.
pub async fn run_debounced(
    resolver: Arc<AddressResolver>,
    delay: Duration,
    mut inputs: mpsc::Receiver<String>,
    outputs: mpsc::Sender<(String, ResolutionResult)>,
) {
    let mut state = DebounceState::new(delay);
    let (done_tx, mut done_rx) = mpsc::channel::<(u64, String, ResolutionResult)>(16);

    loop {
        let deadline = state.deadline();

        let event = tokio::select! {
            input = inputs.recv() => match input {
                Some(value) => DebounceEvent::Input { value, at: Instant::now() },
                None => break,
            },
            _ = async { sleep_until(deadline.unwrap_or_else(Instant::now)).await }, if deadline.is_some() => {
                DebounceEvent::Tick { at: Instant::now() }
            }
            Some((generation, value, result)) = done_rx.recv() => {
                DebounceEvent::Resolved { generation, value, result }
            }
        };

        let (next, effect) = state.reduce(event);
        state = next;

        match effect {
            DebounceEffect::Resolve { generation, value } => {
                let resolver = resolver.clone();
                let done_tx = done_tx.clone();
                tokio::spawn(async move {
                    let result = resolver.resolve(&value).await;
                    let _ = done_tx.send((generation, value, result)).await;
                });
            }
            DebounceEffect::Publish { value, result } => {
                if outputs.send((value, result)).await.is_err() {
                    break;
                }
            }
            DebounceEffect::Discarded { generation } => {
                debug!("Discarding stale resolution from generation {}", generation);
            }
            DebounceEffect::Clear | DebounceEffect::None => {}
        }
    }
}
