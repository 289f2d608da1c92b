//! Match runner for playing games between engines

use std::thread;
use std::time::{Duration, Instant};

use alphabeta_engine::AlphaBetaEngine;
use board_core::{
    BoardState, Engine, GameSession, PlayerId, SearchHandle, SearchLimits, fallback_move, settle,
    spawn_search,
};
use mcts_engine::MctsEngine;
use random_engine::RandomEngine;
use tracing::{error, info, warn};
use tzaar::{TzaarBoard, TzaarEvaluator, TzaarMove, TzaarPlayout};

use crate::config::{EngineKind, EngineSpec, MatchConfig};
use crate::error::ArenaError;
use crate::results::{GameRecord, MatchEntry, MatchResult, TournamentResults};

pub type BoxedEngine = Box<dyn Engine<TzaarBoard>>;

const WATCHDOG_POLL: Duration = Duration::from_millis(5);

/// Build the engine described by `spec`. Unseeded engines are seeded from
/// `salt` so runs are reproducible.
pub fn build_engine(spec: &EngineSpec, salt: u64) -> BoxedEngine {
    match &spec.kind {
        EngineKind::AlphaBeta { config } => {
            let mut config = config.clone();
            config.seed = config.seed.or(Some(salt));
            Box::new(AlphaBetaEngine::with_config(TzaarEvaluator, config))
        }
        EngineKind::Mcts { config, inhibition } => {
            let mut config = config.clone();
            config.seed = config.seed.or(Some(salt));
            Box::new(MctsEngine::with_config(
                TzaarPlayout::new(inhibition.clone()),
                config,
            ))
        }
        EngineKind::Random { seed } => Box::new(RandomEngine::seeded(seed.unwrap_or(salt))),
    }
}

/// Plays every pairing of the configured engines.
pub struct MatchRunner {
    config: MatchConfig,
}

impl MatchRunner {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Fresh limits for one move (restarts the clock).
    fn search_limits(&self) -> SearchLimits {
        match self.config.time_per_move_ms {
            Some(ms) => SearchLimits::depth_and_time(self.config.depth, Duration::from_millis(ms)),
            None => SearchLimits::depth(self.config.depth),
        }
    }

    /// Round robin over all engines.
    pub fn run(&self) -> Result<TournamentResults, ArenaError> {
        let engines = &self.config.engines;
        let mut results = TournamentResults::new(
            &self.config.variant,
            engines.iter().map(|e| e.name.clone()).collect(),
            self.config.games,
        );
        for i in 0..engines.len() {
            for j in i + 1..engines.len() {
                results.add_match(self.run_match(&engines[i], &engines[j])?);
            }
        }
        Ok(results)
    }

    /// Play `games` games between two engines.
    ///
    /// The result is from `first`'s perspective.
    pub fn run_match(
        &self,
        first: &EngineSpec,
        second: &EngineSpec,
    ) -> Result<MatchEntry, ArenaError> {
        info!(first = %first.name, second = %second.name, games = self.config.games, "match started");
        let mut engines = [
            Some(build_engine(first, self.config.seed)),
            Some(build_engine(second, self.config.seed.wrapping_add(1))),
        ];
        let mut result = MatchResult::new();
        let mut games = Vec::with_capacity(self.config.games as usize);

        for game_num in 0..self.config.games {
            let first_moves_first = !self.config.alternate_colors || game_num % 2 == 0;
            let seed = self.config.seed.wrapping_add(game_num as u64);

            let record = if first_moves_first {
                self.play_game(game_num, [first, second], &mut engines, seed)?
            } else {
                engines.swap(0, 1);
                let record = self.play_game(game_num, [second, first], &mut engines, seed);
                engines.swap(0, 1);
                record?
            };

            let own_side: PlayerId = if first_moves_first { 0 } else { 1 };
            result.record(record.result_for(own_side));
            info!(
                game = game_num + 1,
                of = self.config.games,
                winner = ?record.winner,
                plies = record.plies(),
                score = %format!("{}-{}-{}", result.wins, result.losses, result.draws),
                "game finished"
            );
            games.push(record);
        }

        Ok(MatchEntry {
            engine1: first.name.clone(),
            engine2: second.name.clone(),
            result,
            games,
        })
    }

    /// Play one game; `specs[p]` and `engines[p]` move for player `p`.
    fn play_game(
        &self,
        game_num: u32,
        specs: [&EngineSpec; 2],
        engines: &mut [Option<BoxedEngine>; 2],
        seed: u64,
    ) -> Result<GameRecord, ArenaError> {
        let started = Instant::now();
        let mut session = GameSession::new(TzaarBoard::new(&self.config.variant, seed)?);
        for engine in engines.iter_mut().flatten() {
            engine.new_game();
        }
        let mut fallbacks = 0;

        while !session.board().game_over() {
            if session.history().len() >= self.config.max_plies as usize {
                info!(plies = session.history().len(), "ply cap reached, game drawn");
                break;
            }
            let player = session.board().whose_turn();
            let engine = engines[player]
                .take()
                .unwrap_or_else(|| build_engine(specs[player], seed));

            let handle = spawn_search(engine, session.board(), self.search_limits());
            self.watch(&handle);
            let finished = handle.join();
            engines[player] = Some(finished.engine.unwrap_or_else(|| {
                warn!(engine = %specs[player].name, "search worker died, rebuilding engine");
                build_engine(specs[player], seed)
            }));

            let chosen = settle(finished.result, self.config.violation_policy)
                .and_then(|r| r.best_move)
                .filter(|mv| self.is_legal(session.board(), mv, &specs[player].name));
            let mv = match chosen {
                Some(mv) => mv,
                None => {
                    fallbacks += 1;
                    match fallback_move(session.board()) {
                        Some(mv) => mv,
                        None => {
                            error!(digest = session.board().digest(), "no legal move in a live game");
                            break;
                        }
                    }
                }
            };
            session.apply(mv)?;
        }

        if let Err(source) = session.verify() {
            error!(%source, game = game_num, "finished game failed verification");
            return Err(ArenaError::Consistency {
                game: game_num,
                first: specs[0].name.clone(),
                second: specs[1].name.clone(),
                source,
            });
        }

        let board = session.board();
        let winner = (0..board.num_players()).find(|&p| board.win_for_player(p));
        Ok(GameRecord {
            first: specs[0].name.clone(),
            second: specs[1].name.clone(),
            seed,
            winner,
            moves: session.history().iter().map(ToString::to_string).collect(),
            fallbacks,
            duration_ms: started.elapsed().as_millis() as u64,
        })
    }

    fn is_legal(&self, board: &TzaarBoard, mv: &TzaarMove, engine: &str) -> bool {
        let legal = board.legal_moves().contains(mv);
        if !legal {
            warn!(engine, mv = %mv, "engine returned an illegal move");
        }
        legal
    }

    /// Abort a search that overruns its move time by more than the grace.
    fn watch<E, M>(&self, handle: &SearchHandle<E, M>) {
        let Some(ms) = self.config.time_per_move_ms else {
            return;
        };
        let deadline = Instant::now() + Duration::from_millis(ms + self.config.abort_grace_ms);
        while !handle.is_finished() {
            if Instant::now() >= deadline {
                warn!(budget_ms = ms, "search overran its move time, aborting");
                handle.abort();
                return;
            }
            thread::sleep(WATCHDOG_POLL);
        }
    }
}

#[cfg(test)]
#[path = "match_runner_tests.rs"]
mod match_runner_tests;
