use core::time::Duration;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Valid transitions:
/// - Ready -> Playing
/// - Playing -> Won
/// - Playing -> Lost
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// No cell revealed yet
    #[default]
    Ready,
    Playing,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    /// Indicates the game has ended and no moves can be made anymore
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Everything about one game, from `reset` to the next `reset`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    config: GameConfig,
    board: Board,
    status: GameStatus,
    mine_generated: bool,
    /// Clock reading at the first reveal.
    start_time: Option<Duration>,
    elapsed_seconds: u32,
    flag_count: CellCount,
    triggered_mine: Option<Coord2>,
}

impl GameState {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            board: Board::new(config.size()),
            status: GameStatus::Ready,
            mine_generated: false,
            start_time: None,
            elapsed_seconds: 0,
            flag_count: 0,
            triggered_mine: None,
        }
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn mine_generated(&self) -> bool {
        self.mine_generated
    }

    pub fn start_time(&self) -> Option<Duration> {
        self.start_time
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }

    pub fn flag_count(&self) -> CellCount {
        self.flag_count
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }
}

/// What a chord on a cell would do, see [`BoardEngine::auto_expand`].
enum ChordPlan {
    Nothing,
    Reveal(SmallVec<[Coord2; 8]>),
    Flag(SmallVec<[Coord2; 8]>),
}

/// Owns the board and runs the rules of the game.
///
/// Every mutating call either applies completely or is a no-op. Calls that do
/// not fit the current state (wrong status, flagged or revealed target) return
/// a `NoChange` outcome instead of an error; only out-of-bounds coordinates
/// are reported as [`GameError::InvalidCoords`].
#[derive(Debug)]
pub struct BoardEngine<G = RandomMineGenerator, C = SystemClock> {
    state: GameState,
    generator: G,
    clock: C,
    ticker: Ticker,
    observers: Observers,
}

impl BoardEngine {
    /// New game with a randomly seeded generator and the system clock.
    pub fn new(config: GameConfig) -> Result<Self> {
        Self::with_seed(config, rand::random())
    }

    /// New game whose mine layouts are reproducible from `seed`.
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self> {
        Self::with_parts(config, RandomMineGenerator::new(seed), SystemClock::default())
    }
}

impl<G: MineGenerator, C: Clock> BoardEngine<G, C> {
    pub fn with_parts(config: GameConfig, generator: G, clock: C) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            state: GameState::new(config),
            generator,
            clock,
            ticker: Ticker::default(),
            observers: Observers::default(),
        })
    }

    /// Starts a new game on a fresh `width` x `height` board.
    pub fn reset(&mut self, width: Coord, height: Coord, mines: CellCount) -> Result<()> {
        self.reset_with(GameConfig::new_unchecked(width, height, mines))
    }

    /// Starts a new game. The current game is kept if `config` is rejected.
    pub fn reset_with(&mut self, config: GameConfig) -> Result<()> {
        if let Err(err) = config.validate() {
            log::warn!("Rejected game config {:?}: {}", config, err);
            return Err(err);
        }

        self.ticker.stop();
        self.state = GameState::new(config);
        log::debug!(
            "New game {}x{} with {} mines",
            config.width,
            config.height,
            config.mines
        );
        self.observers.notify(&GameEvent::Reset);
        Ok(())
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn status(&self) -> GameStatus {
        self.state.status
    }

    pub fn is_finished(&self) -> bool {
        self.state.status.is_finished()
    }

    pub fn mine_generated(&self) -> bool {
        self.state.mine_generated
    }

    pub fn start_time(&self) -> Option<Duration> {
        self.state.start_time
    }

    /// Whole seconds since the first reveal, read from the clock while the
    /// game runs and frozen once it ends. Does not emit [`GameEvent::Tick`].
    pub fn elapsed_seconds(&self) -> u32 {
        self.ticker
            .elapsed_seconds(self.clock.now())
            .map_or(self.state.elapsed_seconds, |live| {
                live.max(self.state.elapsed_seconds)
            })
    }

    pub fn config(&self) -> GameConfig {
        self.state.config
    }

    pub fn size(&self) -> Coord2 {
        self.state.config.size()
    }

    pub fn board(&self) -> &Board {
        &self.state.board
    }

    /// Flattened cell list, row by row.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.state.board.cells()
    }

    pub fn cell_at(&self, coords: Coord2) -> Option<Cell> {
        self.state.board.get(coords).copied()
    }

    pub fn total_mines(&self) -> CellCount {
        self.state.config.mines
    }

    pub fn flag_count(&self) -> CellCount {
        self.state.flag_count
    }

    /// How many mines have not been flagged yet, negative with too many flags.
    pub fn mines_left(&self) -> i64 {
        i64::from(self.state.config.mines) - i64::from(self.state.flag_count)
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.state.triggered_mine
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_active()
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&GameEvent) + 'static) -> SubscriptionId {
        self.observers.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Refreshes `elapsed_seconds` from the clock while the game runs and
    /// returns it. Hosts call this about once per [`Ticker::PERIOD`].
    pub fn tick(&mut self) -> u32 {
        self.refresh_elapsed();
        self.state.elapsed_seconds
    }

    /// Primary action: reveal a hidden cell.
    ///
    /// The first reveal starts the game and places the mines around it.
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.state.board.validate_coords(coords)?;

        if self.state.status.is_finished() {
            return Ok(RevealOutcome::NoChange);
        }

        let cell = self.state.board[coords];
        if cell.is_flagged || cell.is_revealed {
            return Ok(RevealOutcome::NoChange);
        }

        if !self.state.mine_generated {
            self.generate_mines(coords)?;
        }

        if self.state.status.is_ready() {
            self.start();
        }

        let mut outcome = self.reveal_single_cell(coords);
        if outcome == RevealOutcome::Revealed && self.check_win() {
            outcome = RevealOutcome::Won;
        }

        self.observers.notify(&GameEvent::CellsChanged);
        Ok(outcome)
    }

    /// Secondary action: flag or unflag a hidden cell.
    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.state.board.validate_coords(coords)?;

        if !self.state.status.is_playing() {
            return Ok(MarkOutcome::NoChange);
        }

        let cell = &mut self.state.board[coords];
        if cell.is_revealed {
            return Ok(MarkOutcome::NoChange);
        }

        cell.is_flagged = !cell.is_flagged;
        if cell.is_flagged {
            self.state.flag_count += 1;
        } else {
            self.state.flag_count -= 1;
        }

        self.observers.notify(&GameEvent::CellsChanged);
        Ok(MarkOutcome::Changed)
    }

    /// Chord on a revealed numbered cell.
    ///
    /// When the flags around the cell match its number, every other hidden
    /// neighbor is revealed, stopping at the first mine. Otherwise, when the
    /// hidden neighbors are exactly the missing mines, they all get flagged.
    pub fn auto_expand(&mut self, coords: Coord2) -> Result<ChordOutcome> {
        let coords = self.state.board.validate_coords(coords)?;

        let outcome = match self.chord_plan(coords) {
            ChordPlan::Nothing => ChordOutcome::NoChange,
            ChordPlan::Reveal(hidden) => {
                let mut outcome = RevealOutcome::NoChange;
                for pos in hidden {
                    outcome = outcome | self.reveal_single_cell(pos);
                    if outcome == RevealOutcome::HitMine {
                        break;
                    }
                }
                ChordOutcome::Revealed(outcome)
            }
            ChordPlan::Flag(hidden) => {
                for &pos in &hidden {
                    self.state.board[pos].is_flagged = true;
                }
                let flagged = hidden.len() as CellCount;
                self.state.flag_count += flagged;
                ChordOutcome::Flagged(flagged)
            }
        };

        if !outcome.has_update() {
            return Ok(outcome);
        }

        let won = self.check_win();
        let outcome = match outcome {
            ChordOutcome::Revealed(_) if won => ChordOutcome::Revealed(RevealOutcome::Won),
            other => other,
        };

        self.observers.notify(&GameEvent::CellsChanged);
        Ok(outcome)
    }

    /// Whether [`BoardEngine::auto_expand`] would change anything at `coords`.
    pub fn can_auto_expand_at(&self, coords: Coord2) -> bool {
        self.state.board.contains(coords) && !matches!(self.chord_plan(coords), ChordPlan::Nothing)
    }

    fn chord_plan(&self, coords: Coord2) -> ChordPlan {
        let board = &self.state.board;
        let cell = board[coords];

        if !self.state.status.is_playing() || cell.is_flagged || !cell.is_revealed {
            return ChordPlan::Nothing;
        }

        let flagged = board.count_neighbors(coords, |cell| cell.is_flagged);
        let hidden: SmallVec<[Coord2; 8]> = board
            .iter_neighbors(coords)
            .filter(|&pos| board[pos].is_hidden())
            .collect();

        if hidden.is_empty() {
            ChordPlan::Nothing
        } else if flagged == cell.adjacent_mine_count {
            ChordPlan::Reveal(hidden)
        } else if cell.adjacent_mine_count.checked_sub(flagged) == Some(hidden.len() as u8) {
            ChordPlan::Flag(hidden)
        } else {
            ChordPlan::Nothing
        }
    }

    /// Places the generator's layout, or leaves the game untouched if the
    /// layout breaks the mine count or the safe start.
    fn generate_mines(&mut self, start: Coord2) -> Result<()> {
        let config = self.state.config;
        let mines = self
            .generator
            .generate(config.size(), config.mines, start)?;
        let board = Board::from_mine_coords(config.size(), &mines)?;

        let placed = board.mine_count();
        if placed != config.mines {
            log::warn!(
                "Generated mine count mismatch, actual: {}, requested: {}",
                placed,
                config.mines
            );
            return Err(GameError::MineCountMismatch {
                requested: config.mines,
                placed,
            });
        }

        let safe_zone = SafeZone::around(start, config.size());
        if let Some(mine) = mines.iter().find(|&&pos| safe_zone.contains(pos)) {
            log::warn!("Generated mine at {:?} next to safe start {:?}", mine, start);
            return Err(GameError::MineInSafeZone);
        }

        self.state.board = board;
        self.state.mine_generated = true;
        log::debug!("Placed {} mines around safe start {:?}", placed, start);
        Ok(())
    }

    /// Reveals one hidden cell, flood-filling from it when it is a zero.
    fn reveal_single_cell(&mut self, coords: Coord2) -> RevealOutcome {
        let cell = &mut self.state.board[coords];
        if !cell.is_hidden() {
            return RevealOutcome::NoChange;
        }

        cell.is_revealed = true;
        if cell.is_mine {
            log::debug!("Hit mine at {:?}", coords);
            self.state.triggered_mine = Some(coords);
            self.on_game_over(GameStatus::Lost);
            return RevealOutcome::HitMine;
        }

        log::trace!(
            "Revealed cell at {:?}, mine count: {}",
            coords,
            cell.adjacent_mine_count
        );
        self.state.board.expand_zero(coords);
        RevealOutcome::Revealed
    }

    /// Ends the game as won once every safe cell is revealed.
    fn check_win(&mut self) -> bool {
        if !self.state.mine_generated || !self.state.status.is_playing() {
            return false;
        }

        if self.state.board.all_safe_revealed() {
            self.on_game_over(GameStatus::Won);
            true
        } else {
            false
        }
    }

    fn start(&mut self) {
        let now = self.clock.now();
        self.state.start_time = Some(now);
        self.ticker.start(now);
        self.set_status(GameStatus::Playing);
    }

    fn on_game_over(&mut self, status: GameStatus) {
        if self.state.status.is_finished() {
            return;
        }

        // freeze the timer on its final value
        self.refresh_elapsed();
        self.ticker.stop();

        if status == GameStatus::Lost {
            let revealed = self.state.board.reveal_all_mines();
            log::trace!("Revealed {} remaining mines", revealed);
        }

        log::debug!(
            "Game over: {:?} after {} seconds",
            status,
            self.state.elapsed_seconds
        );
        self.set_status(status);
    }

    fn set_status(&mut self, status: GameStatus) {
        let from = self.state.status;
        self.state.status = status;
        self.observers
            .notify(&GameEvent::StatusChanged { from, to: status });
    }

    fn refresh_elapsed(&mut self) {
        let Some(elapsed) = self.ticker.elapsed_seconds(self.clock.now()) else {
            return;
        };

        if elapsed > self.state.elapsed_seconds {
            self.state.elapsed_seconds = elapsed;
            self.observers.notify(&GameEvent::Tick(elapsed));
        }
    }
}
