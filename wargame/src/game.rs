//! Core game state and the turn manager.
//!
//! [`Game`] owns the board, both rosters and the turn counters, and is the
//! only place where occupancy changes. A round is a hero phase driven by
//! [`Intent`]s followed by a monster phase driven by [`Game::tick`].

use log::{debug, info, trace};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use wargame_core::{Cell, Dims, Point, chebyshev};

use crate::ai::{self, MonsterPlan};
use crate::board::Board;
use crate::combat::{self, CombatOutcome, CombatReport};
use crate::config::GameConfig;
use crate::effects::{Effects, Sound};
use crate::error::Result;
use crate::history::History;
use crate::mapgen;
use crate::motion::{self, Kinematics};
use crate::rest::{self, RestOutcome};
use crate::terrain::Tileset;
use crate::unit::{Archetype, Facing, Faction, Unit, UnitId};

/// A player command, independent of the input device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Select(Point),
    MoveTo(Point),
    Attack(Point),
    Rest,
    /// Pointer click, interpreted from context.
    Click(Point),
    EndTurn,
}

/// Whose turn it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Heroes,
    /// Monsters act in roster order; `next` is the roster slot to try next.
    Monsters { next: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    Victory,
    Defeat,
}

/// How a unit is drawn this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitView {
    pub id: UnitId,
    pub archetype: Archetype,
    /// Cell the sprite is anchored on. While moving, the cell it left.
    pub cell: Point,
    pub facing: Facing,
    /// Pixel offset from `cell`.
    pub offset: Point,
    pub frame: u8,
    pub health_percent: f64,
    pub visible: bool,
    pub acted: bool,
    pub selected: bool,
}

/// Read-only snapshot for a renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub dims: Dims,
    pub terrain: Vec<Cell>,
    pub units: Vec<UnitView>,
    pub turn: u32,
    pub actions_remaining: usize,
    pub phase: Phase,
    pub status: GameStatus,
}

/// A running game.
#[derive(Debug)]
pub struct Game {
    pub(crate) cfg: GameConfig,
    pub(crate) kin: Kinematics,
    pub(crate) board: Board,
    pub(crate) heroes: Vec<Unit>,
    pub(crate) monsters: Vec<Unit>,
    pub(crate) turn: u32,
    pub(crate) actions_remaining: usize,
    pub(crate) phase: Phase,
    /// Ticks left before the next monster acts.
    pacing: u32,
    selected: Option<usize>,
    heroes_left: usize,
    monsters_left: usize,
    history: History,
    fx: Effects,
    rng: SmallRng,
}

impl Game {
    /// Generate a map, spawn both rosters and start round 1.
    pub fn new_game(cfg: GameConfig) -> Result<Self> {
        cfg.validate()?;
        let mut rng = match cfg.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };

        let terrain = mapgen::generate_terrain(&cfg, &mut rng)?;
        let mut board = Board::new(terrain, Tileset::standard());
        let heroes = mapgen::spawn_roster(&mut board, Faction::Hero, cfg.heroes, &cfg, &mut rng)?;
        let monsters =
            mapgen::spawn_roster(&mut board, Faction::Monster, cfg.monsters, &cfg, &mut rng)?;
        info!(
            "new {} map with {} heroes and {} monsters",
            board.dims(),
            heroes.len(),
            monsters.len()
        );

        let mut game = Self::assemble(cfg, board, heroes, monsters, rng);
        game.start_round();
        Ok(game)
    }

    /// Build a game around existing state, in the hero phase of turn 0.
    pub(crate) fn assemble(
        cfg: GameConfig,
        board: Board,
        heroes: Vec<Unit>,
        monsters: Vec<Unit>,
        rng: SmallRng,
    ) -> Self {
        let heroes_left = heroes.iter().filter(|u| u.is_alive()).count();
        let monsters_left = monsters.iter().filter(|u| u.is_alive()).count();
        Self {
            kin: Kinematics::from(&cfg),
            history: History::new(cfg.history_capacity),
            cfg,
            board,
            heroes,
            monsters,
            turn: 0,
            actions_remaining: heroes_left,
            phase: Phase::Heroes,
            pacing: 0,
            selected: None,
            heroes_left,
            monsters_left,
            fx: Effects::new(),
            rng,
        }
    }

    /// Restore the turn counters of a saved game.
    pub(crate) fn resume(&mut self, turn: u32, actions_remaining: usize, phase: Phase) {
        self.turn = turn;
        self.actions_remaining = actions_remaining;
        self.phase = phase;
        if let Phase::Monsters { .. } = phase {
            self.pacing = self.cfg.pacing_ticks();
        }
        self.history.push(format!("Game resumed at round {turn}"));
        info!(
            "resumed round {turn} with {} heroes and {} monsters",
            self.heroes_left, self.monsters_left
        );
    }

    // Accessors

    pub fn config(&self) -> &GameConfig {
        &self.cfg
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn heroes(&self) -> &[Unit] {
        &self.heroes
    }

    pub fn monsters(&self) -> &[Unit] {
        &self.monsters
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        match id.faction {
            Faction::Hero => self.heroes.get(id.slot),
            Faction::Monster => self.monsters.get(id.slot),
        }
    }

    fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        match id.faction {
            Faction::Hero => self.heroes.get_mut(id.slot),
            Faction::Monster => self.monsters.get_mut(id.slot),
        }
    }

    /// Living unit standing on `p`.
    pub fn unit_at(&self, p: Point) -> Option<&Unit> {
        self.board.occupant(p).and_then(|id| self.unit(id))
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn actions_remaining(&self) -> usize {
        self.actions_remaining
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn heroes_left(&self) -> usize {
        self.heroes_left
    }

    pub fn monsters_left(&self) -> usize {
        self.monsters_left
    }

    pub fn status(&self) -> GameStatus {
        if self.heroes_left == 0 {
            GameStatus::Defeat
        } else if self.monsters_left == 0 {
            GameStatus::Victory
        } else {
            GameStatus::InProgress
        }
    }

    pub fn selected(&self) -> Option<UnitId> {
        self.selected.map(UnitId::hero)
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Drain pending sounds and floating texts.
    pub fn take_effects(&mut self) -> Effects {
        self.fx.drain()
    }

    // Round flow

    /// Begin a new round. Heroes that did not act rest silently, every
    /// acted flag is cleared and each living hero gets one action.
    fn start_round(&mut self) {
        let mut silent = Effects::new();
        for h in self.heroes.iter_mut().filter(|h| h.is_alive() && !h.has_acted()) {
            rest::rest(h, self.cfg.rest_max, &mut self.rng, &mut silent);
        }
        for u in self.heroes.iter_mut().chain(self.monsters.iter_mut()) {
            u.set_acted(false);
        }

        self.turn += 1;
        self.actions_remaining = self.heroes_left;
        self.phase = Phase::Heroes;
        self.selected = None;
        self.history.push(format!("Round {} begins", self.turn));
        info!(
            "round {} begins with {} heroes and {} monsters",
            self.turn, self.heroes_left, self.monsters_left
        );
    }

    fn begin_monster_phase(&mut self) {
        debug!("monster phase of round {}", self.turn);
        self.selected = None;
        self.actions_remaining = 0;
        self.phase = Phase::Monsters { next: 0 };
        self.pacing = self.cfg.pacing_ticks();
    }

    /// Spend one hero action. The monster phase starts when none are left.
    fn consume_action(&mut self) {
        self.actions_remaining = self.actions_remaining.saturating_sub(1);
        let idle = self.heroes.iter().any(|h| h.is_alive() && !h.has_acted());
        if self.actions_remaining == 0 || !idle {
            self.begin_monster_phase();
        }
    }

    /// Advance animations by one tick and, during the monster phase, let
    /// the next monster act once its pacing delay has elapsed.
    pub fn tick(&mut self) {
        for u in self.heroes.iter_mut().chain(self.monsters.iter_mut()) {
            motion::tick(u, &self.kin);
        }

        if let Phase::Monsters { .. } = self.phase {
            self.pacing = self.pacing.saturating_sub(1);
            if self.pacing == 0 {
                self.step_monster();
                self.pacing = self.cfg.pacing_ticks();
            }
        }
    }

    /// Run the rest of the monster phase without waiting.
    pub fn play_monster_phase(&mut self) {
        while let Phase::Monsters { .. } = self.phase {
            self.step_monster();
        }
    }

    /// Let the next living monster act. Starts the next round once every
    /// monster has had its turn.
    fn step_monster(&mut self) {
        let Phase::Monsters { next } = self.phase else {
            return;
        };
        let slot = (next..self.monsters.len()).find(|&i| self.monsters[i].is_alive());
        match slot {
            Some(i) => {
                self.phase = Phase::Monsters { next: i + 1 };
                self.act_monster(i);
                let more = (i + 1..self.monsters.len()).any(|j| self.monsters[j].is_alive());
                if !more {
                    self.start_round();
                }
            }
            None => self.start_round(),
        }
    }

    fn act_monster(&mut self, slot: usize) {
        let id = UnitId::monster(slot);
        let plan = ai::plan(
            &self.monsters[slot],
            &self.board,
            self.cfg.low_health_percent,
            &mut self.rng,
        );
        match plan {
            MonsterPlan::Rest => {
                let m = &mut self.monsters[slot];
                rest::rest(m, self.cfg.rest_max, &mut self.rng, &mut self.fx);
                m.set_acted(true);
                let name = m.name();
                self.history.push(format!("The {name} rests"));
            }
            MonsterPlan::Attack { target, distance } => {
                self.fight(id, target, distance);
            }
            MonsterPlan::Wander(to) => {
                if !self.move_unit(id, to) {
                    trace!("{id} could not reach {to}");
                    self.monsters[slot].set_acted(true);
                }
            }
            MonsterPlan::Idle => {
                trace!("{id} stays put");
                self.monsters[slot].set_acted(true);
            }
        }
    }

    // Shared actions

    /// Move a unit to an adjacent free cell. Occupancy is updated at once;
    /// the sprite catches up over the following ticks. A sprite still
    /// travelling from an earlier move is snapped onto its cell first.
    fn move_unit(&mut self, id: UnitId, to: Point) -> bool {
        if !self.board.is_free(to) {
            return false;
        }
        let kin = self.kin;
        let Some(unit) = (match id.faction {
            Faction::Hero => self.heroes.get_mut(id.slot),
            Faction::Monster => self.monsters.get_mut(id.slot),
        }) else {
            return false;
        };
        let Some(from) = unit.pos() else {
            return false;
        };
        if unit.is_dead() || chebyshev(from, to) != 1 {
            return false;
        }
        if !self.board.relocate(from, to) {
            return false;
        }
        if !motion::begin_move(unit, to, &kin) {
            self.board.relocate(to, from);
            return false;
        }
        unit.set_pos(Some(to));
        unit.set_acted(true);
        self.fx.sound(Sound::MoveStart);
        debug!("{id} moves {from} -> {to}");
        true
    }

    /// `attacker` strikes `defender` from `distance` cells.
    fn fight(&mut self, attacker: UnitId, defender: UnitId, distance: i32) -> Option<CombatReport> {
        let (a, d) = pair_mut(&mut self.heroes, &mut self.monsters, attacker, defender)?;
        let report = combat::resolve(
            a,
            d,
            distance,
            self.cfg.retaliation_divisor,
            &mut self.rng,
            &mut self.fx,
        );
        let (a_name, d_name) = (a.name(), d.name());
        self.history.push(format!(
            "The {a_name} hits the {d_name} for {}",
            report.damage
        ));
        if let Some(back) = report.retaliation {
            self.history
                .push(format!("The {d_name} strikes back for {back}"));
        }
        match report.outcome {
            CombatOutcome::DefenderDied => self.bury(defender),
            CombatOutcome::AttackerDied => self.bury(attacker),
            CombatOutcome::None => {}
        }
        Some(report)
    }

    /// Kill a unit outright.
    pub fn kill(&mut self, id: UnitId) -> bool {
        let Some(u) = self.unit_mut(id) else {
            return false;
        };
        if u.is_dead() {
            return false;
        }
        let idle = !u.has_acted();
        u.set_health(0);
        u.set_dead(true);
        self.fx.sound(Sound::UnitDied(id.faction));
        self.bury(id);

        // a hero lost before acting no longer owes an action
        if id.faction == Faction::Hero && idle && self.heroes_turn() {
            self.consume_action();
        }
        true
    }

    /// Remove a freshly dead unit from the board and update the counts.
    fn bury(&mut self, id: UnitId) {
        let Some(u) = self.unit(id) else {
            return;
        };
        let name = u.name();
        let cell = u.pos().filter(|&p| self.board.occupant(p) == Some(id));
        if let Some(p) = cell {
            self.board.vacate(p);
        }
        if self.selected == Some(id.slot) && id.faction == Faction::Hero {
            self.selected = None;
        }
        self.history.push(format!("The {name} dies"));
        debug!("{id} dies");

        match id.faction {
            Faction::Hero => {
                self.heroes_left = self.heroes_left.saturating_sub(1);
                if self.heroes_left == 0 {
                    self.fx.sound(Sound::Defeat);
                    self.history.push("Defeat: every hero has fallen");
                    info!("defeat on round {}", self.turn);
                }
            }
            Faction::Monster => {
                self.monsters_left = self.monsters_left.saturating_sub(1);
                if self.monsters_left == 0 {
                    self.fx.sound(Sound::Victory);
                    self.history.push("Victory: every monster is slain");
                    info!("victory on round {}", self.turn);
                }
            }
        }
    }

    // Hero intents

    /// Apply a player intent. Returns `false` when it was ignored.
    pub fn handle(&mut self, intent: Intent) -> bool {
        let applied = match intent {
            Intent::Select(p) => self.select(p),
            Intent::MoveTo(p) => self.move_selected(p),
            Intent::Attack(p) => self.attack(p),
            Intent::Rest => self.rest_selected(),
            Intent::Click(p) => self.click(p),
            Intent::EndTurn => self.end_turn(),
        };
        if !applied {
            trace!("ignored {intent:?}");
        }
        applied
    }

    fn heroes_turn(&self) -> bool {
        self.phase == Phase::Heroes
    }

    /// The selected hero, if it may still act.
    fn ready_hero(&self) -> Option<usize> {
        let slot = self.selected?;
        let h = self.heroes.get(slot)?;
        (self.heroes_turn() && h.is_alive() && !h.has_acted()).then_some(slot)
    }

    /// Select the hero standing on `p`.
    pub fn select(&mut self, p: Point) -> bool {
        if !self.heroes_turn() {
            return false;
        }
        match self.unit_at(p) {
            Some(h) if h.faction() == Faction::Hero && !h.has_acted() => {
                self.selected = Some(h.id().slot);
                true
            }
            _ => false,
        }
    }

    /// Drop the current selection, if any.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Move the selected hero to the adjacent cell `p`.
    pub fn move_selected(&mut self, p: Point) -> bool {
        let Some(slot) = self.ready_hero() else {
            return false;
        };
        if !self.move_unit(UnitId::hero(slot), p) {
            return false;
        }
        let name = self.heroes[slot].name();
        self.history.push(format!("The {name} moves to {p}"));
        self.clear_selection();
        self.consume_action();
        true
    }

    /// The selected hero attacks the monster on `p`, if within its range.
    pub fn attack(&mut self, p: Point) -> bool {
        let Some(slot) = self.ready_hero() else {
            return false;
        };
        let Some(from) = self.heroes[slot].pos() else {
            return false;
        };
        let Some(target) = self.board.occupant(p).filter(|id| id.faction == Faction::Monster)
        else {
            return false;
        };
        let distance = chebyshev(from, p);
        if distance < 1 || distance > self.heroes[slot].range() {
            return false;
        }
        if self.fight(UnitId::hero(slot), target, distance).is_none() {
            return false;
        }
        self.consume_action();
        true
    }

    /// The selected hero rests. Resting at full health still uses the
    /// hero's action.
    pub fn rest_selected(&mut self) -> bool {
        let Some(slot) = self.ready_hero() else {
            return false;
        };
        let h = &mut self.heroes[slot];
        match rest::rest(h, self.cfg.rest_max, &mut self.rng, &mut self.fx) {
            RestOutcome::Healed(n) => {
                let name = h.name();
                self.history.push(format!("The {name} rests and heals {n}"));
            }
            RestOutcome::AlreadyFull => {
                h.set_acted(true);
                let name = h.name();
                self.history.push(format!("The {name} waits"));
            }
        }
        self.clear_selection();
        self.consume_action();
        true
    }

    /// Pointer click on `p`.
    pub fn click(&mut self, p: Point) -> bool {
        if !self.heroes_turn() {
            return false;
        }
        let selected_cell = self.ready_hero().and_then(|s| self.heroes[s].pos());
        if selected_cell == Some(p) {
            return self.rest_selected();
        }
        let applied = match self.board.occupant(p) {
            Some(id) if id.faction == Faction::Hero => self.select(p),
            Some(_) => self.attack(p),
            None if selected_cell.is_some() => self.move_selected(p),
            None => false,
        };
        if !applied {
            self.clear_selection();
        }
        applied
    }

    /// Finish the hero phase. Heroes that did not act rest in place
    /// without spending actions.
    pub fn end_turn(&mut self) -> bool {
        if !self.heroes_turn() {
            return false;
        }
        for h in self.heroes.iter_mut().filter(|h| h.is_alive() && !h.has_acted()) {
            rest::rest(h, self.cfg.rest_max, &mut self.rng, &mut self.fx);
            h.set_acted(true);
        }
        self.history.push("The heroes end their turn");
        self.begin_monster_phase();
        true
    }

    // Presentation

    /// Snapshot of everything a renderer needs.
    pub fn frame(&self) -> Frame {
        let units = self
            .heroes
            .iter()
            .chain(self.monsters.iter())
            .filter_map(|u| {
                let (cell, offset) = match u.motion() {
                    Some(m) => (m.origin(), m.offset()),
                    None => (u.pos()?, Point::ZERO),
                };
                Some(UnitView {
                    id: u.id(),
                    archetype: u.archetype(),
                    cell,
                    facing: u.facing(),
                    offset,
                    frame: u.frame(),
                    health_percent: u.health_percent(),
                    visible: u.is_visible(),
                    acted: u.has_acted(),
                    selected: self.selected() == Some(u.id()),
                })
            })
            .collect();
        Frame {
            dims: self.board.dims(),
            terrain: self.board.terrain().cells().to_vec(),
            units,
            turn: self.turn,
            actions_remaining: self.actions_remaining,
            phase: self.phase,
            status: self.status(),
        }
    }
}

/// Borrow two units of opposite factions at once.
fn pair_mut<'a>(
    heroes: &'a mut [Unit],
    monsters: &'a mut [Unit],
    a: UnitId,
    b: UnitId,
) -> Option<(&'a mut Unit, &'a mut Unit)> {
    match (a.faction, b.faction) {
        (Faction::Hero, Faction::Monster) => {
            Some((heroes.get_mut(a.slot)?, monsters.get_mut(b.slot)?))
        }
        (Faction::Monster, Faction::Hero) => {
            Some((monsters.get_mut(a.slot)?, heroes.get_mut(b.slot)?))
        }
        _ => None,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::motion::Motion;
    use crate::terrain::{GRASS, ROCK};
    use wargame_core::Grid;

    /// A game on an open `w`x`h` grass field with units at fixed cells.
    pub(crate) fn scripted(
        w: i32,
        h: i32,
        heroes: &[(Archetype, Point)],
        monsters: &[(Archetype, Point)],
    ) -> Game {
        let cfg = GameConfig {
            width: w,
            height: h,
            seed: Some(42),
            ..GameConfig::default()
        };
        let mut board = Board::new(Grid::new(Dims::new(w, h), GRASS), Tileset::standard());
        let mut roster = |faction: Faction, list: &[(Archetype, Point)]| -> Vec<Unit> {
            list.iter()
                .enumerate()
                .map(|(slot, &(a, p))| {
                    let id = UnitId { faction, slot };
                    let mut u = Unit::new(id, a);
                    assert!(board.place(id, p));
                    u.set_pos(Some(p));
                    u
                })
                .collect()
        };
        let heroes = roster(Faction::Hero, heroes);
        let monsters = roster(Faction::Monster, monsters);
        let mut g = Game::assemble(cfg, board, heroes, monsters, SmallRng::seed_from_u64(42));
        g.start_round();
        g
    }

    /// Every live unit has exactly one slot, matching its position; dead
    /// units have none.
    pub(crate) fn assert_occupancy(g: &Game) {
        for u in g.heroes().iter().chain(g.monsters()) {
            let slots = g.board().slots().iter().filter(|s| **s == Some(u.id())).count();
            if u.is_alive() {
                assert_eq!(slots, 1, "{} has {slots} slots", u.id());
                let p = u.pos().unwrap();
                assert_eq!(g.board().occupant(p), Some(u.id()));
            } else {
                assert_eq!(slots, 0, "dead {} still on the board", u.id());
            }
        }
    }

    fn small_cfg(seed: u64) -> GameConfig {
        GameConfig {
            width: 10,
            height: 10,
            heroes: 4,
            monsters: 6,
            rocks: 5,
            trees: 5,
            straw: 5,
            seed: Some(seed),
            ..GameConfig::default()
        }
    }

    #[test]
    fn new_game_places_both_rosters() {
        let g = Game::new_game(small_cfg(1)).unwrap();
        assert_eq!(g.heroes().len(), 4);
        assert_eq!(g.monsters().len(), 6);
        assert_eq!(g.board().occupied_count(), 10);
        for h in g.heroes() {
            let p = h.pos().unwrap();
            assert!(p.x >= 6, "hero spawned at {p}");
            assert!(g.board().passable(p));
        }
        for m in g.monsters() {
            let p = m.pos().unwrap();
            assert!(p.x < 5, "monster spawned at {p}");
            assert!(g.board().passable(p));
        }
        assert_occupancy(&g);
        assert_eq!(g.turn(), 1);
        assert_eq!(g.actions_remaining(), 4);
        assert_eq!(g.phase(), Phase::Heroes);
        assert_eq!(g.history().current().map(|e| e.text.as_str()), Some("Round 1 begins"));
    }

    #[test]
    fn same_seed_same_game() {
        let a = Game::new_game(small_cfg(7)).unwrap();
        let b = Game::new_game(small_cfg(7)).unwrap();
        assert_eq!(a.frame(), b.frame());
    }

    #[test]
    fn overcrowded_map_fails_cleanly() {
        let cfg = GameConfig {
            width: 4,
            height: 1,
            heroes: 3,
            monsters: 0,
            rocks: 0,
            trees: 0,
            straw: 0,
            seed: Some(3),
            ..GameConfig::default()
        };
        assert!(matches!(
            Game::new_game(cfg),
            Err(crate::error::WargameError::MapGeneration(_))
        ));
    }

    #[test]
    fn each_hero_action_spends_one_credit() {
        let mut g = scripted(
            8,
            4,
            &[
                (Archetype::Dwarf, Point::new(6, 0)),
                (Archetype::Elf, Point::new(6, 2)),
                (Archetype::Archer, Point::new(7, 3)),
            ],
            &[(Archetype::Goblin, Point::new(0, 0))],
        );
        assert_eq!(g.actions_remaining(), 3);

        assert!(g.handle(Intent::Select(Point::new(6, 0))));
        assert!(g.handle(Intent::MoveTo(Point::new(5, 0))));
        assert_eq!(g.actions_remaining(), 2);
        assert_occupancy(&g);
        assert_eq!(g.board().occupant(Point::new(6, 0)), None);

        // acted heroes cannot be selected again
        assert!(!g.handle(Intent::Select(Point::new(5, 0))));

        g.heroes[1].set_health(10);
        assert!(g.handle(Intent::Select(Point::new(6, 2))));
        assert!(g.handle(Intent::Rest));
        assert_eq!(g.actions_remaining(), 1);
        assert!(g.heroes()[1].health() >= 10);

        // resting at full health is a pass that still costs the action
        assert!(g.handle(Intent::Select(Point::new(7, 3))));
        assert!(g.handle(Intent::Rest));
        assert!(g.heroes()[2].has_acted());
        assert_eq!(g.actions_remaining(), 0);
        assert_eq!(g.phase(), Phase::Monsters { next: 0 });
    }

    #[test]
    fn invalid_intents_change_nothing() {
        let mut g = scripted(
            8,
            4,
            &[(Archetype::Dwarf, Point::new(6, 1))],
            &[(Archetype::Troll, Point::new(1, 1))],
        );
        g.board = {
            let mut t = g.board.terrain().clone();
            t.set(Point::new(5, 1), ROCK);
            let mut b = Board::new(t, Tileset::standard());
            b.set_slots(g.board.slots().to_vec());
            b
        };
        let before = g.frame();
        assert!(!g.handle(Intent::MoveTo(Point::new(5, 0))), "nothing selected");
        assert!(g.handle(Intent::Select(Point::new(6, 1))));
        assert!(!g.handle(Intent::MoveTo(Point::new(5, 1))), "rock");
        assert!(!g.handle(Intent::MoveTo(Point::new(4, 1))), "not adjacent");
        assert!(!g.handle(Intent::MoveTo(Point::new(8, 1))), "off the map");
        assert!(!g.handle(Intent::Attack(Point::new(1, 1))), "out of range");
        assert!(!g.handle(Intent::Select(Point::new(1, 1))), "monster");
        assert_eq!(g.actions_remaining(), 1);
        assert_eq!(g.heroes()[0].pos(), Some(Point::new(6, 1)));
        assert_eq!(g.monsters()[0].health(), 100);
        let mut after = g.frame();
        for v in &mut after.units {
            v.selected = false;
        }
        assert_eq!(before, after);
    }

    #[test]
    fn hero_kill_updates_board_and_counts() {
        let mut g = scripted(
            6,
            3,
            &[
                (Archetype::Elf, Point::new(4, 1)),
                (Archetype::Dwarf, Point::new(5, 2)),
            ],
            &[
                (Archetype::Goblin, Point::new(2, 1)),
                (Archetype::Orc, Point::new(0, 0)),
            ],
        );
        g.monsters[0].set_health(6);
        assert!(g.handle(Intent::Select(Point::new(4, 1))));
        assert!(g.handle(Intent::Attack(Point::new(2, 1))));
        let goblin = &g.monsters()[0];
        assert!(goblin.is_dead());
        assert_eq!(goblin.pos(), Some(Point::new(2, 1)));
        assert_eq!(g.board().occupant(Point::new(2, 1)), None);
        assert_eq!(g.monsters_left(), 1);
        assert_eq!(g.status(), GameStatus::InProgress);
        assert_occupancy(&g);

        let fx = g.take_effects();
        assert!(fx.sounds.contains(&Sound::RangedHit));
        assert!(fx.sounds.contains(&Sound::UnitDied(Faction::Monster)));
        assert!(g.take_effects().is_empty());
    }

    #[test]
    fn victory_reported_once() {
        let mut g = scripted(
            6,
            3,
            &[(Archetype::Dwarf, Point::new(5, 0))],
            &[(Archetype::Goblin, Point::new(4, 0))],
        );
        assert!(g.kill(UnitId::monster(0)));
        assert!(!g.kill(UnitId::monster(0)));
        assert_eq!(g.status(), GameStatus::Victory);
        let fx = g.take_effects();
        assert_eq!(fx.sounds.iter().filter(|s| **s == Sound::Victory).count(), 1);
        assert!(g.history().entries().any(|e| e.text.starts_with("Victory")));
    }

    #[test]
    fn round_cycles_through_monster_phase() {
        let mut g = scripted(
            10,
            5,
            &[
                (Archetype::Dwarf, Point::new(9, 0)),
                (Archetype::Hobbit, Point::new(9, 4)),
            ],
            &[
                (Archetype::Troll, Point::new(0, 0)),
                (Archetype::Orc, Point::new(0, 4)),
            ],
        );
        assert!(g.handle(Intent::EndTurn));
        assert!(g.heroes().iter().all(Unit::has_acted));
        assert_eq!(g.phase(), Phase::Monsters { next: 0 });
        // hero intents are refused while monsters play
        assert!(!g.handle(Intent::Select(Point::new(9, 0))));
        g.play_monster_phase();
        assert_eq!(g.phase(), Phase::Heroes);
        assert_eq!(g.turn(), 2);
        assert_eq!(g.actions_remaining(), 2);
        assert!(g.heroes().iter().chain(g.monsters()).all(|u| !u.has_acted()));
        assert_occupancy(&g);
    }

    #[test]
    fn monster_phase_is_paced_by_ticks() {
        let mut g = scripted(
            10,
            5,
            &[(Archetype::Dwarf, Point::new(9, 0))],
            &[
                (Archetype::Troll, Point::new(0, 0)),
                (Archetype::Orc, Point::new(0, 4)),
            ],
        );
        let pacing = g.config().pacing_ticks();
        g.handle(Intent::EndTurn);
        for _ in 0..pacing - 1 {
            g.tick();
        }
        assert_eq!(g.phase(), Phase::Monsters { next: 0 });
        g.tick();
        assert_eq!(g.phase(), Phase::Monsters { next: 1 });
        for _ in 0..pacing {
            g.tick();
        }
        assert_eq!(g.phase(), Phase::Heroes);
        assert_eq!(g.turn(), 2);
    }

    #[test]
    fn monster_attacks_first_hero_in_sight() {
        let mut g = scripted(
            6,
            3,
            &[(Archetype::Elf, Point::new(3, 1))],
            &[(Archetype::Orc, Point::new(1, 1))],
        );
        g.handle(Intent::EndTurn);
        let elf_before = g.heroes()[0].health();
        g.play_monster_phase();
        // the elf rested on end of turn, then took a ranged 3 from the orc
        assert_eq!(g.heroes()[0].health(), elf_before - 3);
        // elf reach 5 answers with 3 / 2
        assert_eq!(g.monsters()[0].health(), 39);
        assert!(g.history().entries().any(|e| e.text == "The orc hits the elf for 3"));
    }

    #[test]
    fn dead_monsters_are_skipped() {
        let mut g = scripted(
            10,
            5,
            &[(Archetype::Dwarf, Point::new(9, 0))],
            &[
                (Archetype::Troll, Point::new(0, 0)),
                (Archetype::Orc, Point::new(0, 4)),
            ],
        );
        g.kill(UnitId::monster(0));
        g.handle(Intent::EndTurn);
        g.tick();
        g.tick();
        g.tick();
        // only the orc had to act
        assert_eq!(g.phase(), Phase::Heroes);
        assert_eq!(g.turn(), 2);
    }

    #[test]
    fn click_semantics() {
        let mut g = scripted(
            8,
            4,
            &[
                (Archetype::Archer, Point::new(5, 1)),
                (Archetype::Dwarf, Point::new(7, 3)),
            ],
            &[(Archetype::Goblin, Point::new(3, 1))],
        );
        // empty cell without a selection
        assert!(!g.handle(Intent::Click(Point::new(6, 0))));
        assert!(g.handle(Intent::Click(Point::new(5, 1))));
        assert_eq!(g.selected(), Some(UnitId::hero(0)));
        // attack keeps the selection
        assert!(g.handle(Intent::Click(Point::new(3, 1))));
        assert_eq!(g.selected(), Some(UnitId::hero(0)));
        assert_eq!(g.actions_remaining(), 1);

        assert!(g.handle(Intent::Click(Point::new(7, 3))));
        assert_eq!(g.selected(), Some(UnitId::hero(1)));
        // far cell: ignored and selection dropped
        assert!(!g.handle(Intent::Click(Point::new(4, 3))));
        assert_eq!(g.selected(), None);
        assert!(g.handle(Intent::Click(Point::new(7, 3))));
        // own cell: rest
        assert!(g.handle(Intent::Click(Point::new(7, 3))));
        assert!(matches!(g.phase(), Phase::Monsters { .. }));
    }

    #[test]
    fn moves_animate_then_land() {
        let mut g = scripted(
            8,
            4,
            &[
                (Archetype::Dwarf, Point::new(6, 1)),
                (Archetype::Elf, Point::new(7, 3)),
            ],
            &[(Archetype::Goblin, Point::new(0, 0))],
        );
        g.handle(Intent::Select(Point::new(6, 1)));
        g.handle(Intent::MoveTo(Point::new(5, 1)));
        assert_eq!(g.take_effects().sounds, vec![Sound::MoveStart]);
        let view = &g.frame().units[0];
        assert_eq!(view.cell, Point::new(6, 1));
        assert_eq!(view.facing, Facing::Left);
        assert_eq!(view.offset, Point::new(-2, 0));
        // destination is reserved while the sprite travels
        assert_eq!(g.board().occupant(Point::new(5, 1)), Some(UnitId::hero(0)));
        for _ in 0..8 {
            g.tick();
        }
        let view = &g.frame().units[0];
        assert_eq!(view.cell, Point::new(5, 1));
        assert_eq!(view.offset, Point::ZERO);
        assert!(!g.heroes()[0].is_moving());
    }

    #[test]
    fn hero_moves_again_before_sprite_lands() {
        let mut g = scripted(
            10,
            5,
            &[(Archetype::Dwarf, Point::new(8, 2))],
            &[(Archetype::Troll, Point::new(0, 4))],
        );
        assert!(g.handle(Intent::Select(Point::new(8, 2))));
        assert!(g.handle(Intent::MoveTo(Point::new(7, 2))));
        assert!(matches!(g.phase(), Phase::Monsters { .. }));
        g.play_monster_phase();
        assert_eq!(g.turn(), 2);
        assert!(g.heroes()[0].is_moving());

        assert!(g.handle(Intent::Select(Point::new(7, 2))));
        assert!(g.handle(Intent::MoveTo(Point::new(6, 2))));
        let dwarf = &g.heroes()[0];
        assert_eq!(dwarf.pos(), Some(Point::new(6, 2)));
        assert_eq!(dwarf.motion().map(Motion::origin), Some(Point::new(7, 2)));
        assert!(g.board().is_free(Point::new(7, 2)));
        assert_occupancy(&g);

        for _ in 0..8 {
            g.tick();
        }
        assert!(!g.heroes()[0].is_moving());
        assert_eq!(g.frame().units[0].cell, Point::new(6, 2));
    }

    #[test]
    fn monsters_keep_wandering_without_ticks() {
        let mut g = scripted(
            20,
            5,
            &[(Archetype::Dwarf, Point::new(19, 0))],
            &[(Archetype::Troll, Point::new(2, 2))],
        );
        let mut moves = 0;
        let mut last = g.monsters()[0].pos();
        for _ in 0..6 {
            g.handle(Intent::EndTurn);
            g.play_monster_phase();
            assert_eq!(g.phase(), Phase::Heroes);
            let now = g.monsters()[0].pos();
            if now != last {
                moves += 1;
            }
            last = now;
            assert_occupancy(&g);
        }
        assert!(moves >= 2, "troll moved {moves} times");
    }

    #[test]
    fn cleared_selection_blocks_orders() {
        let mut g = scripted(
            6,
            3,
            &[(Archetype::Elf, Point::new(4, 1))],
            &[(Archetype::Goblin, Point::new(0, 0))],
        );
        assert!(g.handle(Intent::Select(Point::new(4, 1))));
        g.clear_selection();
        assert_eq!(g.selected(), None);
        assert!(!g.handle(Intent::MoveTo(Point::new(3, 1))));
        assert_eq!(g.actions_remaining(), 1);
    }

    #[test]
    fn long_seeded_match_keeps_invariants() {
        let mut g = Game::new_game(small_cfg(99)).unwrap();
        for _ in 0..30 {
            if g.status() != GameStatus::InProgress {
                break;
            }
            g.handle(Intent::EndTurn);
            g.play_monster_phase();
            assert_occupancy(&g);
            assert_eq!(
                g.heroes_left(),
                g.heroes().iter().filter(|u| u.is_alive()).count()
            );
            assert_eq!(
                g.monsters_left(),
                g.monsters().iter().filter(|u| u.is_alive()).count()
            );
            for _ in 0..10 {
                g.tick();
            }
        }
    }
}
