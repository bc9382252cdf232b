//! Event-driven stepping.
//!
//! Only cells in the update queue are re-evaluated each step. A cell whose
//! state flips schedules its 8 neighbors for the following step, so activity
//! spreads outward as a wave instead of sweeping the whole grid. Once the
//! queue drains the automaton sits at a fixed point until it is perturbed.

use rand::Rng;

use crate::config::SimConfig;
use crate::error::ConfigError;
use crate::simulation::grid::{Coord, ToroidalGrid};
use crate::simulation::history::QueueHistory;
use crate::simulation::neighbors::{live_neighbor_count, neighbors, neighbors_of};
use crate::simulation::patterns::Pattern;
use crate::simulation::queue::UpdateQueue;
use crate::simulation::rules::RuleTable;

/// Advance one step.
///
/// Every queued cell is evaluated against the pre-step `grid`; writes go to a
/// separate copy, so queue order never changes the resulting grid. The next
/// queue holds the neighbors of every cell that changed, deduplicated.
pub fn step(grid: &ToroidalGrid, queue: &UpdateQueue, rules: &RuleTable) -> (ToroidalGrid, UpdateQueue) {
    let (next_grid, next_queue, _) = advance(grid, queue, rules);
    (next_grid, next_queue)
}

fn advance(
    grid: &ToroidalGrid,
    queue: &UpdateQueue,
    rules: &RuleTable,
) -> (ToroidalGrid, UpdateQueue, usize) {
    let mut next_grid = grid.clone();
    let mut next_queue = UpdateQueue::with_capacity(queue.len() * 8);
    let mut changed = 0;

    for &coord in queue {
        let (x, y) = (coord.x() as i64, coord.y() as i64);
        let old_state = grid.get(x, y);
        let count = live_neighbor_count(x, y, grid);
        let new_state = rules.next_state(old_state, count);

        if new_state != old_state {
            next_grid.set(x, y, new_state);
            next_queue.extend(neighbors(x, y, grid.width(), grid.height()));
            changed += 1;
        }
    }

    (next_grid, next_queue, changed)
}

/// Summary of a single [`Simulation::step`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepReport {
    /// Generation reached by this step
    pub generation: u64,
    /// Cells taken from the queue and evaluated
    pub evaluated: usize,
    /// Cells whose state flipped
    pub changed: usize,
    /// Length of the queue for the next step
    pub queued: usize,
}

/// A simulation session: the grid, the pending queue and the rule table,
/// threaded through [`step`] one tick at a time.
#[derive(Clone, Debug)]
pub struct Simulation {
    grid: ToroidalGrid,
    queue: UpdateQueue,
    rules: RuleTable,
    generation: u64,
    history: QueueHistory,
}

impl Simulation {
    /// An all-dead grid with an empty queue.
    pub fn new(config: &SimConfig) -> Result<Self, ConfigError> {
        let grid = ToroidalGrid::new(config.width, config.height)?;
        Ok(Self::from_parts(grid, UpdateQueue::new(), config.rules, config.history_len))
    }

    /// Resume from an existing grid and queue.
    pub fn from_parts(
        grid: ToroidalGrid,
        queue: UpdateQueue,
        rules: RuleTable,
        history_len: usize,
    ) -> Self {
        let mut history = QueueHistory::new(history_len);
        history.push(queue.len());
        Self {
            grid,
            queue,
            rules,
            generation: 0,
            history,
        }
    }

    pub fn step(&mut self) -> StepReport {
        let evaluated = self.queue.len();
        let (grid, queue, changed) = advance(&self.grid, &self.queue, &self.rules);
        self.grid = grid;
        self.queue = queue;
        self.generation += 1;
        self.history.push(self.queue.len());

        let report = StepReport {
            generation: self.generation,
            evaluated,
            changed,
            queued: self.queue.len(),
        };
        log::debug!(
            "generation {}: evaluated {}, changed {}, queued {}",
            report.generation,
            report.evaluated,
            report.changed,
            report.queued
        );
        report
    }

    pub fn cell_state(&self, x: i64, y: i64) -> bool {
        self.grid.get(x, y)
    }

    /// Cells that will be evaluated by the next step, in evaluation order.
    pub fn queue_snapshot(&self) -> &[Coord] {
        self.queue.as_slice()
    }

    /// Flip a cell without scheduling anything. Returns the new state.
    pub fn toggle_cell(&mut self, x: i64, y: i64) -> bool {
        let state = self.grid.toggle(x, y);
        log::trace!("toggled ({}, {}) -> {}", x, y, state);
        state
    }

    /// Schedule a cell for the next step.
    pub fn enqueue(&mut self, x: i64, y: i64) {
        let coord = self.grid.normalize(x, y);
        self.queue.push(coord);
    }

    /// Flip a cell and schedule it along with its neighbors, whose counts
    /// just changed. This is what a pointer click does.
    pub fn perturb(&mut self, x: i64, y: i64) -> bool {
        let state = self.toggle_cell(x, y);
        self.schedule_around(self.grid.normalize(x, y));
        state
    }

    /// Stamp a pattern with its origin at `(x, y)` and schedule the affected area.
    pub fn place_pattern(&mut self, pattern: Pattern, x: i64, y: i64) {
        for &(dx, dy) in pattern.cells() {
            let coord = self.grid.normalize(x.wrapping_add(dx), y.wrapping_add(dy));
            self.grid.set_at(coord, true);
            self.schedule_around(coord);
        }
        log::info!("placed {} at ({}, {})", pattern.name(), x, y);
    }

    /// Fill the grid at random and schedule every cell.
    pub fn seed_random<R: Rng + ?Sized>(&mut self, rng: &mut R, density: f64) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&density) {
            return Err(ConfigError::InvalidDensity(density));
        }
        let coords: Vec<Coord> = self.grid.coords().collect();
        for &coord in &coords {
            self.grid.set_at(coord, rng.gen_bool(density));
        }
        self.queue = UpdateQueue::from_candidates(coords);
        self.reset_counters();
        log::info!(
            "seeded {} live cells at density {:.2}",
            self.grid.population(),
            density
        );
        Ok(())
    }

    /// Kill every cell and drop the queue.
    pub fn clear(&mut self) {
        self.grid.clear();
        self.queue.clear();
        self.reset_counters();
    }

    pub fn grid(&self) -> &ToroidalGrid {
        &self.grid
    }

    pub fn queue(&self) -> &UpdateQueue {
        &self.queue
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn history(&self) -> &QueueHistory {
        &self.history
    }

    pub fn population(&self) -> usize {
        self.grid.population()
    }

    fn schedule_around(&mut self, coord: Coord) {
        self.queue.push(coord);
        self.queue
            .extend(neighbors_of(coord, self.grid.width(), self.grid.height()));
    }

    fn reset_counters(&mut self) {
        self.generation = 0;
        self.history.clear();
        self.history.push(self.queue.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn grid_with(width: usize, height: usize, alive: &[(i64, i64)]) -> ToroidalGrid {
        let mut grid = ToroidalGrid::new(width, height).unwrap();
        for &(x, y) in alive {
            grid.set(x, y, true);
        }
        grid
    }

    fn alive_set(grid: &ToroidalGrid) -> HashSet<(usize, usize)> {
        grid.alive().map(|c| (c.x(), c.y())).collect()
    }

    fn queue_around(grid: &ToroidalGrid, cells: &[(i64, i64)]) -> UpdateQueue {
        let mut queue = UpdateQueue::new();
        for &(x, y) in cells {
            queue.push(grid.normalize(x, y));
            queue.extend(neighbors(x, y, grid.width(), grid.height()));
        }
        queue
    }

    #[test]
    fn test_blinker_flips_to_vertical() {
        let tri = [(1, 2), (2, 2), (3, 2)];
        let grid = grid_with(5, 5, &tri);
        let queue = queue_around(&grid, &tri);

        let (next, _) = step(&grid, &queue, &RuleTable::conway());
        let expected: HashSet<_> = [(2, 1), (2, 2), (2, 3)].into_iter().collect();
        assert_eq!(alive_set(&next), expected);
    }

    #[test]
    fn test_blinker_oscillates() {
        let tri = [(1, 2), (2, 2), (3, 2)];
        let mut sim = Simulation::from_parts(
            grid_with(5, 5, &tri),
            queue_around(&grid_with(5, 5, &[]), &tri),
            RuleTable::conway(),
            16,
        );
        let horizontal = alive_set(sim.grid());
        sim.step();
        sim.step();
        assert_eq!(alive_set(sim.grid()), horizontal);
    }

    #[test]
    fn test_isolated_cell_dies_and_wakes_neighbors() {
        let grid = grid_with(5, 5, &[(2, 2)]);
        let queue = UpdateQueue::from_candidates([Coord::new(2, 2)]);

        let (next, next_queue) = step(&grid, &queue, &RuleTable::conway());
        assert_eq!(next.population(), 0);
        assert_eq!(next_queue.as_slice(), &neighbors(2, 2, 5, 5));
    }

    #[test]
    fn test_empty_queue_is_fixed_point() {
        let grid = grid_with(6, 6, &[(0, 0), (3, 4), (5, 5)]);
        let (next, next_queue) = step(&grid, &UpdateQueue::new(), &RuleTable::conway());
        assert_eq!(next, grid);
        assert!(next_queue.is_empty());
    }

    #[test]
    fn test_unchanged_cells_enqueue_nothing() {
        // A block is still life: every cell survives, nothing is scheduled
        let block = [(1, 1), (2, 1), (1, 2), (2, 2)];
        let grid = grid_with(6, 6, &block);
        let queue = queue_around(&grid, &block);

        let (next, next_queue) = step(&grid, &queue, &RuleTable::conway());
        assert_eq!(next, grid);
        assert!(next_queue.is_empty());
    }

    #[test]
    fn test_step_is_deterministic() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut sim = Simulation::new(&SimConfig::default()).unwrap();
        sim.seed_random(&mut rng, 0.3).unwrap();

        let a = step(sim.grid(), sim.queue(), sim.rules());
        let b = step(sim.grid(), sim.queue(), sim.rules());
        assert_eq!(a, b);
    }

    #[test]
    fn test_queue_order_does_not_change_grid() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut sim = Simulation::new(&SimConfig::default()).unwrap();
        sim.seed_random(&mut rng, 0.4).unwrap();

        let forward = sim.queue().clone();
        let reversed: UpdateQueue = forward.iter().rev().copied().collect();

        let (grid_a, queue_a) = step(sim.grid(), &forward, sim.rules());
        let (grid_b, queue_b) = step(sim.grid(), &reversed, sim.rules());
        assert_eq!(grid_a, grid_b);

        let set_a: HashSet<_> = queue_a.iter().copied().collect();
        let set_b: HashSet<_> = queue_b.iter().copied().collect();
        assert_eq!(set_a, set_b);
    }

    #[test]
    fn test_changed_cells_schedule_all_neighbors() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut sim = Simulation::new(&SimConfig::default()).unwrap();
        sim.seed_random(&mut rng, 0.35).unwrap();

        let before = sim.grid().clone();
        let (after, next_queue) = step(sim.grid(), sim.queue(), sim.rules());

        let unique: HashSet<_> = next_queue.iter().copied().collect();
        assert_eq!(unique.len(), next_queue.len());

        let mut expected = HashSet::new();
        for coord in before.coords() {
            if before.get_at(coord) != after.get_at(coord) {
                expected.extend(neighbors_of(coord, before.width(), before.height()));
            }
        }
        assert!(!expected.is_empty());
        assert_eq!(unique, expected);
    }

    #[test]
    fn test_matches_full_recompute() {
        // With every cell queued, one step equals a classic synchronous update
        let mut rng = StdRng::seed_from_u64(17);
        let mut sim = Simulation::new(&SimConfig::default()).unwrap();
        sim.seed_random(&mut rng, 0.3).unwrap();

        let before = sim.grid().clone();
        sim.step();
        for coord in before.coords() {
            let (x, y) = (coord.x() as i64, coord.y() as i64);
            let count = live_neighbor_count(x, y, &before);
            let expected = RuleTable::conway().next_state(before.get_at(coord), count);
            assert_eq!(sim.cell_state(x, y), expected, "cell ({}, {})", x, y);
        }
    }

    #[test]
    fn test_step_report_and_history() {
        let mut sim = Simulation::new(&SimConfig::default()).unwrap();
        sim.toggle_cell(10, 10);
        sim.enqueue(10, 10);
        sim.enqueue(60, 60);
        assert_eq!(sim.queue_snapshot(), &[Coord::new(10, 10)]);

        let report = sim.step();
        assert_eq!(
            report,
            StepReport {
                generation: 1,
                evaluated: 1,
                changed: 1,
                queued: 8,
            }
        );
        assert_eq!(sim.history().iter().collect::<Vec<_>>(), vec![0, 8]);

        // Neighbors of an empty region stay dead and the wave dies out
        let report = sim.step();
        assert_eq!(report.changed, 0);
        assert_eq!(report.queued, 0);
        assert_eq!(sim.generation(), 2);
    }

    #[test]
    fn test_perturb_schedules_neighborhood() {
        let mut sim = Simulation::new(&SimConfig::default()).unwrap();
        assert!(sim.perturb(-1, 0));
        assert!(sim.cell_state(49, 0));
        assert_eq!(sim.queue_snapshot().len(), 9);
        assert_eq!(sim.queue_snapshot()[0], Coord::new(49, 0));
    }

    #[test]
    fn test_place_glider_moves() {
        let mut sim = Simulation::new(&SimConfig::default()).unwrap();
        sim.place_pattern(Pattern::Glider, 10, 10);
        let start: HashSet<_> = alive_set(sim.grid());
        for _ in 0..4 {
            sim.step();
        }
        let shifted: HashSet<_> = start.iter().map(|&(x, y)| (x + 1, y + 1)).collect();
        assert_eq!(alive_set(sim.grid()), shifted);
    }

    #[test]
    fn test_glider_crosses_the_seam() {
        let mut sim = Simulation::new(&SimConfig::default()).unwrap();
        sim.place_pattern(Pattern::Glider, 48, 48);
        for _ in 0..8 {
            sim.step();
        }
        assert_eq!(sim.population(), 5);
        let expected: HashSet<_> = Pattern::Glider
            .cells()
            .iter()
            .map(|&(dx, dy)| (((48 + 2 + dx) % 50) as usize, ((48 + 2 + dy) % 50) as usize))
            .collect();
        assert_eq!(alive_set(sim.grid()), expected);
    }

    #[test]
    fn test_seed_random_rejects_bad_density() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut sim = Simulation::new(&SimConfig::default()).unwrap();
        assert_eq!(
            sim.seed_random(&mut rng, 1.5),
            Err(ConfigError::InvalidDensity(1.5))
        );
        assert!(sim.seed_random(&mut rng, f64::NAN).is_err());
    }

    #[test]
    fn test_seed_random_queues_every_cell() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut sim = Simulation::new(&SimConfig::default()).unwrap();
        sim.step();
        sim.seed_random(&mut rng, 0.5).unwrap();
        assert_eq!(sim.queue_snapshot().len(), 2500);
        assert_eq!(sim.generation(), 0);
        assert_eq!(sim.history().latest(), Some(2500));
    }

    #[test]
    fn test_clear_resets_session() {
        let mut sim = Simulation::new(&SimConfig::default()).unwrap();
        sim.place_pattern(Pattern::RPentomino, 25, 25);
        sim.step();
        sim.clear();
        assert_eq!(sim.population(), 0);
        assert!(sim.queue_snapshot().is_empty());
        assert_eq!(sim.generation(), 0);
        assert_eq!(sim.history().iter().collect::<Vec<_>>(), vec![0]);
    }
}
