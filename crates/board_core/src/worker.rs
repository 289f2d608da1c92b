//! Background search on a dedicated thread.
//!
//! The worker owns its engine and a private clone of the board; nothing
//! mutable is shared with the caller except the stop flag inside
//! [`TimeControl`].

use std::any::Any;
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use crate::board::BoardState;
use crate::error::InvariantViolation;
use crate::time_control::{SearchLimits, TimeControl};
use crate::{Engine, SearchResult};

/// What a finished worker hands back.
pub struct Finished<E, M> {
    /// The engine, unless the worker panicked
    pub engine: Option<E>,
    pub result: Result<SearchResult<M>, InvariantViolation>,
}

type WorkerOutput<E, M> = (E, Result<SearchResult<M>, InvariantViolation>);

/// Handle to a search running on its own thread.
pub struct SearchHandle<E, M> {
    time_control: TimeControl,
    thread: JoinHandle<WorkerOutput<E, M>>,
}

/// Clone `board` and run `engine` on it in a new thread.
pub fn spawn_search<B, E>(mut engine: E, board: &B, limits: SearchLimits) -> SearchHandle<E, B::Move>
where
    B: BoardState,
    E: Engine<B> + 'static,
{
    let copy = board.clone();
    let time_control = limits.time_control.clone();
    let thread = thread::spawn(move || {
        let result = engine.search(&copy, limits);
        (engine, result)
    });
    SearchHandle {
        time_control,
        thread,
    }
}

impl<E, M> SearchHandle<E, M> {
    /// Ask the worker to stop. It returns its best move so far.
    pub fn abort(&self) {
        debug!("search abort requested");
        self.time_control.stop();
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Wait for the worker to finish.
    pub fn join(self) -> Finished<E, M> {
        match self.thread.join() {
            Ok((engine, result)) => Finished {
                engine: Some(engine),
                result,
            },
            Err(payload) => Finished {
                engine: None,
                result: Err(InvariantViolation::WorkerPanicked(panic_message(payload))),
            },
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Safe default when a search produced no move: the first legal move.
pub fn fallback_move<B: BoardState>(board: &B) -> Option<B::Move> {
    let mv = board.legal_moves().into_iter().next();
    if let Some(mv) = &mv {
        warn!(mv = %mv, "search returned no move, falling back to first legal move");
    }
    mv
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod worker_tests;
