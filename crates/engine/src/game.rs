//! The game state manager. `Game` owns every piece of state and is the only
//! way to change it; each public method either applies a whole action or
//! returns an error and leaves the state as it was.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::bag::TileBag;
use crate::board::{
    apply_delta, end_game_bonus, floor_penalty, Placement, Player, WallPlacement,
};
use crate::config::{GameConfig, RuleOptions};
use crate::error::GameError;
use crate::event::GameEvent;
use crate::pool::{factory_count_for, DraftPool, DraftSource, Factory, Selection};
use crate::types::{
    Color, FactoryId, PlayerIdx, Row, Tile, BOARD_SIZE, MAX_PLAYERS, MIN_PLAYERS,
};

/// Where the current player is in their turn, or where the round is
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Current player must take tiles from a factory or the center
    Drafting,
    /// Tiles are held in the selection, waiting for a pattern line or floor
    Placing,
    /// Factories and center are empty; `next_round` scores the round
    RoundEnd,
    /// Terminal; no more actions
    GameOver,
}

/// Destination for drafted tiles
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Destination {
    PatternLine(Row), // 0..4
    Floor,
}

/// A complete turn: draft a color from a source and send it somewhere
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub source: DraftSource,
    pub color: Color,
    pub dest: Destination,
}

/// Final standings
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameOutcome {
    pub final_scores: Vec<u32>,
    /// Highest score; ties go to the lowest player index
    pub winner: PlayerIdx,
    /// Every player sharing the highest score
    pub leaders: Vec<PlayerIdx>,
}

impl GameOutcome {
    fn from_scores(final_scores: Vec<u32>) -> Self {
        let best = final_scores.iter().copied().max().unwrap_or(0);
        let leaders: Vec<PlayerIdx> = final_scores
            .iter()
            .enumerate()
            .filter(|&(_, &score)| score == best)
            .map(|(i, _)| i as PlayerIdx)
            .collect();
        GameOutcome {
            winner: leaders.first().copied().unwrap_or(0),
            leaders,
            final_scores,
        }
    }

    pub fn is_tie(&self) -> bool {
        self.leaders.len() > 1
    }
}

/// Scoring for one player in one round
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerRoundSummary {
    pub player: PlayerIdx,
    pub placements: Vec<WallPlacement>,
    pub contended_rows: Vec<Row>,
    pub floor_tiles: usize,
    pub penalty: i16,
    pub bonus: u32,
    pub score: u32,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    /// The round that was scored
    pub round: u16,
    pub players: Vec<PlayerRoundSummary>,
    pub game_over: bool,
}

/// Where every tile currently is
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct TileCensus {
    pub bag: usize,
    pub lid: usize,
    pub factories: usize,
    pub center: usize,
    pub selection: usize,
    pub pattern_lines: usize,
    pub floor_lines: usize,
    pub walls: usize,
}

impl TileCensus {
    /// Tiles still moving between bag, table and boards
    pub fn in_circulation(&self) -> usize {
        self.bag
            + self.lid
            + self.factories
            + self.center
            + self.selection
            + self.pattern_lines
            + self.floor_lines
    }

    pub fn total(&self) -> usize {
        self.in_circulation() + self.walls
    }
}

/// Complete game state plus the controller operations on it
#[derive(Clone, Debug)]
pub struct Game {
    players: Vec<Player>,
    pool: DraftPool,
    bag: TileBag,
    rng: StdRng,
    rules: RuleOptions,
    current_player: PlayerIdx,
    round: u16,
    phase: Phase,
    selection: Option<Selection>,
    outcome: Option<GameOutcome>,
    events: Vec<GameEvent>,
    revision: u64,
}

impl Game {
    // =========================================================================
    // Construction
    // =========================================================================

    /// New game with default rules and an OS-seeded shuffle.
    pub fn new<I, S>(player_names: I) -> Result<Self, GameError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_rng(player_names, RuleOptions::default(), StdRng::from_os_rng())
    }

    pub fn from_config(config: &GameConfig) -> Result<Self, GameError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(config.player_names.iter().cloned(), config.rules, rng)
    }

    pub fn with_rng<I, S>(player_names: I, rules: RuleOptions, mut rng: StdRng) -> Result<Self, GameError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let bag = TileBag::new(&mut rng);
        Self::with_bag(player_names, rules, bag, rng)
    }

    /// New game drawing from a prepared bag. `rng` is used for later refills.
    pub fn with_bag<I, S>(
        player_names: I,
        rules: RuleOptions,
        bag: TileBag,
        rng: StdRng,
    ) -> Result<Self, GameError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let players: Vec<Player> = player_names
            .into_iter()
            .enumerate()
            .map(|(i, name)| Player::new(i as PlayerIdx, name))
            .collect();
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&players.len()) {
            return Err(GameError::InvalidPlayerCount(players.len()));
        }

        let mut game = Game {
            pool: DraftPool::new(factory_count_for(players.len())),
            players,
            bag,
            rng,
            rules,
            current_player: 0,
            round: 1,
            phase: Phase::Drafting,
            selection: None,
            outcome: None,
            events: Vec::new(),
            revision: 0,
        };
        game.pool.fill_all(&mut game.bag, &mut game.rng);
        game.events.push(GameEvent::RoundStarted { round: 1 });
        info!(players = game.players.len(), factories = game.pool.factories().len(), "new game");

        Ok(game)
    }

    // =========================================================================
    // Read access
    // =========================================================================

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerIdx) -> Result<&Player, GameError> {
        self.players
            .get(id as usize)
            .ok_or(GameError::PlayerNotFound(id))
    }

    pub fn current_player_index(&self) -> PlayerIdx {
        self.current_player
    }

    pub fn current_player(&self) -> &Player {
        &self.players[self.current_player as usize]
    }

    pub fn factories(&self) -> &[Factory] {
        self.pool.factories()
    }

    pub fn center(&self) -> &[Tile] {
        self.pool.center()
    }

    pub fn bag(&self) -> &TileBag {
        &self.bag
    }

    pub fn round(&self) -> u16 {
        self.round
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn rules(&self) -> RuleOptions {
        self.rules
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn outcome(&self) -> Option<&GameOutcome> {
        self.outcome.as_ref()
    }

    /// Bumped once per successful mutating call
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Take every event queued since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// True when any player has a completely filled wall row.
    pub fn is_game_over(&self) -> bool {
        self.players.iter().any(|p| p.board.has_complete_row())
    }

    pub fn tile_census(&self) -> TileCensus {
        let mut census = TileCensus {
            bag: self.bag.len(),
            lid: self.bag.lid_len(),
            factories: self.pool.factories().iter().map(|f| f.tiles.len()).sum(),
            center: self.pool.center().len(),
            selection: self.selection.as_ref().map_or(0, Selection::len),
            ..TileCensus::default()
        };
        for player in &self.players {
            census.pattern_lines += player
                .board
                .pattern_lines
                .iter()
                .map(|l| l.count as usize)
                .sum::<usize>();
            census.floor_lines += player.board.floor_line.len();
            census.walls += player.board.wall_tile_count();
        }
        census
    }

    /// Every move the current player may make from the drafting phase.
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.phase != Phase::Drafting {
            return Vec::new();
        }

        let board = &self.current_player().board;
        let sources = self
            .pool
            .factories()
            .iter()
            .map(|f| DraftSource::Factory(f.id))
            .chain(std::iter::once(DraftSource::Center));

        let mut moves = Vec::new();
        for source in sources {
            for color in self.pool.colors_at(source) {
                for row in 0..BOARD_SIZE {
                    if board.check_placement(row, color).is_ok() {
                        moves.push(Move {
                            source,
                            color,
                            dest: Destination::PatternLine(row as Row),
                        });
                    }
                }
                // Floor always allowed
                moves.push(Move {
                    source,
                    color,
                    dest: Destination::Floor,
                });
            }
        }
        moves
    }

    // =========================================================================
    // Drafting
    // =========================================================================

    /// Draft every tile of `color` from a factory, or from the center when
    /// `factory_id` is `None`, into the pending selection.
    pub fn select_tiles(
        &mut self,
        color: Color,
        factory_id: Option<FactoryId>,
    ) -> Result<&[Tile], GameError> {
        self.expect_phase(Phase::Drafting)?;

        let source = DraftSource::from_factory_id(factory_id);
        let selection = self.pool.select(color, source)?;
        debug!(player = self.current_player, %source, %color, count = selection.len(), "tiles selected");

        self.events.push(GameEvent::TilesSelected {
            player: self.current_player,
            source,
            color,
            count: selection.len(),
        });
        self.phase = Phase::Placing;
        self.touch();

        Ok(&self.selection.insert(selection).tiles)
    }

    /// Put the pending selection back where it came from.
    pub fn cancel_selection(&mut self) -> Result<(), GameError> {
        let selection = self.take_selection()?;
        self.events.push(GameEvent::SelectionCancelled {
            player: self.current_player,
            source: selection.source,
            color: selection.color,
        });
        self.pool.restore(selection);
        self.phase = Phase::Drafting;
        self.touch();
        Ok(())
    }

    // =========================================================================
    // Placement
    // =========================================================================

    /// Check that `tiles` may go onto pattern line `row` of `player_id`.
    pub fn can_place_tiles(
        &self,
        player_id: PlayerIdx,
        row: Row,
        tiles: &[Tile],
    ) -> Result<(), GameError> {
        let player = self.player(player_id)?;
        let row = check_row(row)?;
        let first = tiles.first().ok_or(GameError::NothingToPlace)?;
        player.board.check_placement(row, first.color)?;
        Ok(())
    }

    pub fn is_placement_legal(&self, player_id: PlayerIdx, row: Row, tiles: &[Tile]) -> bool {
        self.can_place_tiles(player_id, row, tiles).is_ok()
    }

    /// Put `tiles` onto pattern line `row`, overflowing to the floor line.
    /// Only the player and row are validated; see `can_place_tiles` for the
    /// placement rules.
    pub fn place_tiles(
        &mut self,
        player_id: PlayerIdx,
        row: Row,
        tiles: Vec<Tile>,
    ) -> Result<Placement, GameError> {
        let r = check_row(row)?;
        let player = self
            .players
            .get_mut(player_id as usize)
            .ok_or(GameError::PlayerNotFound(player_id))?;

        let color = tiles.first().map(|t| t.color);
        let report = player.board.place_tiles(r, tiles);
        self.pool.release_center();

        if let Some(color) = color {
            debug!(player = player_id, row, %color, placed = report.placed, overflowed = report.overflowed, "tiles placed");
            self.events.push(GameEvent::TilesPlaced {
                player: player_id,
                row,
                color,
                placed: report.placed,
                overflowed: report.overflowed,
            });
        }
        self.touch();
        Ok(report)
    }

    /// Append tiles to a player's floor line.
    pub fn add_to_floor_line(
        &mut self,
        player_id: PlayerIdx,
        tiles: Vec<Tile>,
    ) -> Result<(), GameError> {
        let player = self
            .players
            .get_mut(player_id as usize)
            .ok_or(GameError::PlayerNotFound(player_id))?;

        let count = tiles.len();
        player.board.add_to_floor_line(tiles);
        self.events.push(GameEvent::TilesFloored {
            player: player_id,
            count,
        });
        self.touch();
        Ok(())
    }

    /// Place the pending selection on the current player's pattern line `row`
    /// and end the turn. A rule violation leaves the selection pending.
    pub fn place_selection(&mut self, row: Row) -> Result<Placement, GameError> {
        let pending = self.pending()?;
        self.can_place_tiles(self.current_player, row, &pending.tiles)?;

        let selection = self.take_selection()?;
        let report = self.place_tiles(self.current_player, row, selection.tiles)?;
        self.end_turn();
        Ok(report)
    }

    /// Send the pending selection to the current player's floor line and end
    /// the turn. Returns the number of tiles floored.
    pub fn discard_selection(&mut self) -> Result<usize, GameError> {
        let selection = self.take_selection()?;
        let count = selection.len();
        self.add_to_floor_line(self.current_player, selection.tiles)?;
        self.pool.release_center();
        self.end_turn();
        Ok(count)
    }

    /// Draft and place in one step. The move is validated before anything is
    /// drafted, so an illegal move changes nothing.
    pub fn play(&mut self, mv: Move) -> Result<Placement, GameError> {
        self.expect_phase(Phase::Drafting)?;
        if let Destination::PatternLine(row) = mv.dest {
            let r = check_row(row)?;
            self.current_player().board.check_placement(r, mv.color)?;
        }

        self.select_tiles(mv.color, mv.source.factory_id())?;
        match mv.dest {
            Destination::PatternLine(row) => self.place_selection(row),
            Destination::Floor => {
                let count = self.discard_selection()?;
                Ok(Placement {
                    placed: 0,
                    overflowed: count,
                })
            }
        }
    }

    // =========================================================================
    // Turn and round flow
    // =========================================================================

    /// Pass the turn to the next player in seat order.
    pub fn advance_to_next_player(&mut self) -> Result<PlayerIdx, GameError> {
        match self.phase {
            Phase::Placing | Phase::GameOver => Err(GameError::WrongPhase {
                expected: Phase::Drafting,
                actual: self.phase,
            }),
            _ => {
                self.rotate_player();
                self.touch();
                Ok(self.current_player)
            }
        }
    }

    /// Score the finished round: move completed lines to the walls, apply
    /// floor penalties, clear the boards, then either set up the next round or
    /// end the game.
    pub fn next_round(&mut self) -> Result<RoundSummary, GameError> {
        match self.phase {
            Phase::RoundEnd => {}
            Phase::Drafting if self.pool.is_exhausted() => {}
            Phase::Drafting => return Err(GameError::RoundInProgress),
            actual => {
                return Err(GameError::WrongPhase {
                    expected: Phase::RoundEnd,
                    actual,
                })
            }
        }

        let mut summary = RoundSummary {
            round: self.round,
            ..RoundSummary::default()
        };

        for player in &mut self.players {
            let id = player.id;

            // Step 1: wall tiling and placement scoring
            let tiling = player.board.tile_wall(self.rules.keep_partial_lines);
            player.score += tiling.points();
            for p in &tiling.placements {
                self.events.push(GameEvent::WallTilePlaced {
                    player: id,
                    row: p.row,
                    col: p.col,
                    color: p.color,
                    points: p.points,
                });
            }
            for &row in &tiling.contended_rows {
                self.events.push(GameEvent::WallContention { player: id, row });
            }
            self.bag.discard(tiling.spent.iter().copied().map(Tile::new));

            // Step 2: floor penalties, then clear the floor
            let floor = player.board.clear_floor_line();
            let penalty = floor_penalty(floor.len());
            player.score = apply_delta(player.score, penalty as i32);
            if !floor.is_empty() {
                self.events.push(GameEvent::FloorPenalty {
                    player: id,
                    tiles: floor.len(),
                    points: penalty,
                });
            }
            let floor_tiles = floor.len();
            self.bag.discard(floor);

            debug!(player = id, points = tiling.points(), penalty, score = player.score, "round scored");
            summary.players.push(PlayerRoundSummary {
                player: id,
                placements: tiling.placements,
                contended_rows: tiling.contended_rows,
                floor_tiles,
                penalty,
                bonus: 0,
                score: player.score,
            });
        }

        // Step 3: game end or next round
        if self.is_game_over() {
            self.finish(&mut summary);
        } else {
            self.current_player = 0;
            self.pool.fill_all(&mut self.bag, &mut self.rng);
            self.round += 1;
            self.phase = Phase::Drafting;
            self.events.push(GameEvent::RoundStarted { round: self.round });
            info!(round = self.round, bag = self.bag.len(), lid = self.bag.lid_len(), "round started");
        }

        self.touch();
        Ok(summary)
    }

    fn finish(&mut self, summary: &mut RoundSummary) {
        if self.rules.end_game_bonuses {
            for (player, line) in self.players.iter_mut().zip(summary.players.iter_mut()) {
                let bonus = end_game_bonus(&player.board.wall);
                player.score += bonus;
                line.bonus = bonus;
                line.score = player.score;
            }
        }

        let outcome = GameOutcome::from_scores(self.players.iter().map(|p| p.score).collect());
        let winner = outcome.winner;
        let score = outcome.final_scores[winner as usize];
        info!(
            winner,
            name = %self.players[winner as usize].name,
            score,
            tie = outcome.is_tie(),
            "game over"
        );

        self.events.push(GameEvent::GameOver { winner, score });
        self.outcome = Some(outcome);
        self.phase = Phase::GameOver;
        summary.game_over = true;
    }

    fn end_turn(&mut self) {
        if self.pool.is_exhausted() {
            self.phase = Phase::RoundEnd;
            self.events.push(GameEvent::RoundEnded { round: self.round });
            info!(round = self.round, "round over; ready to score");
        } else {
            self.phase = Phase::Drafting;
            self.rotate_player();
        }
    }

    fn rotate_player(&mut self) {
        self.current_player = ((self.current_player as usize + 1) % self.players.len()) as PlayerIdx;
        self.events.push(GameEvent::TurnPassed {
            player: self.current_player,
        });
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn expect_phase(&self, expected: Phase) -> Result<(), GameError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(GameError::WrongPhase {
                expected,
                actual: self.phase,
            })
        }
    }

    fn pending(&self) -> Result<&Selection, GameError> {
        self.selection.as_ref().ok_or(GameError::WrongPhase {
            expected: Phase::Placing,
            actual: self.phase,
        })
    }

    fn take_selection(&mut self) -> Result<Selection, GameError> {
        self.expect_phase(Phase::Placing)?;
        self.selection.take().ok_or(GameError::WrongPhase {
            expected: Phase::Placing,
            actual: self.phase,
        })
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    #[cfg(test)]
    pub(crate) fn players_mut(&mut self) -> &mut [Player] {
        &mut self.players
    }
}

fn check_row(row: Row) -> Result<usize, GameError> {
    let r = row as usize;
    if r < BOARD_SIZE {
        Ok(r)
    } else {
        Err(GameError::RowOutOfRange(row as i16))
    }
}
