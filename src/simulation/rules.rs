//! Outer-totalistic transition tables.
//!
//! A rule maps the current state of a cell and its live-neighbor count
//! (`0..=8`) to the next state. Rules are written in the usual
//! birth/survival notation, e.g. `B3/S23` for Conway's Game of Life.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Number of possible live-neighbor counts in a Moore neighborhood.
pub const NEIGHBOR_STATES: usize = 9;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RuleTable {
    /// Next state of a dead cell, indexed by live-neighbor count
    dead: [bool; NEIGHBOR_STATES],
    /// Next state of a live cell, indexed by live-neighbor count
    alive: [bool; NEIGHBOR_STATES],
}

impl RuleTable {
    pub const fn new(dead: [bool; NEIGHBOR_STATES], alive: [bool; NEIGHBOR_STATES]) -> Self {
        Self { dead, alive }
    }

    /// Build a table from runtime vectors, rejecting anything that is not
    /// exactly one entry per neighbor count.
    pub fn from_slices(dead: &[bool], alive: &[bool]) -> Result<Self, ConfigError> {
        Ok(Self {
            dead: to_array("dead", dead)?,
            alive: to_array("alive", alive)?,
        })
    }

    /// Build a table from the neighbor counts that cause birth and survival.
    pub fn from_counts(birth: &[u8], survival: &[u8]) -> Result<Self, ConfigError> {
        let mut table = Self::new([false; NEIGHBOR_STATES], [false; NEIGHBOR_STATES]);
        for (counts, row) in [(birth, &mut table.dead), (survival, &mut table.alive)] {
            for &count in counts {
                let slot = row
                    .get_mut(count as usize)
                    .ok_or_else(|| ConfigError::InvalidRule(format!("neighbor count {}", count)))?;
                *slot = true;
            }
        }
        Ok(table)
    }

    /// Conway's Game of Life, B3/S23.
    pub const fn conway() -> Self {
        let mut dead = [false; NEIGHBOR_STATES];
        let mut alive = [false; NEIGHBOR_STATES];
        dead[3] = true;
        alive[2] = true;
        alive[3] = true;
        Self::new(dead, alive)
    }

    /// HighLife, B36/S23.
    pub const fn high_life() -> Self {
        let mut table = Self::conway();
        table.dead[6] = true;
        table
    }

    /// Seeds, B2/S. Every live cell dies each step.
    pub const fn seeds() -> Self {
        let mut dead = [false; NEIGHBOR_STATES];
        dead[2] = true;
        Self::new(dead, [false; NEIGHBOR_STATES])
    }

    /// Day & Night, B3678/S34678.
    pub const fn day_and_night() -> Self {
        let mut dead = [false; NEIGHBOR_STATES];
        let mut alive = [false; NEIGHBOR_STATES];
        dead[3] = true;
        dead[6] = true;
        dead[7] = true;
        dead[8] = true;
        alive[3] = true;
        alive[4] = true;
        alive[6] = true;
        alive[7] = true;
        alive[8] = true;
        Self::new(dead, alive)
    }

    /// Next state of a cell. `live_neighbors` is at most 8.
    #[inline]
    pub fn next_state(&self, current: bool, live_neighbors: u8) -> bool {
        debug_assert!(live_neighbors as usize <= 8, "live neighbor count {}", live_neighbors);
        let row = if current { &self.alive } else { &self.dead };
        row[live_neighbors as usize]
    }

    pub fn dead_row(&self) -> &[bool; NEIGHBOR_STATES] {
        &self.dead
    }

    pub fn alive_row(&self) -> &[bool; NEIGHBOR_STATES] {
        &self.alive
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::conway()
    }
}

fn to_array(case: &'static str, row: &[bool]) -> Result<[bool; NEIGHBOR_STATES], ConfigError> {
    row.try_into().map_err(|_| ConfigError::RuleLength {
        case,
        len: row.len(),
    })
}

fn parse_counts(part: &str, prefix: char, rule: &str) -> Result<Vec<u8>, ConfigError> {
    let invalid = || ConfigError::InvalidRule(rule.to_string());
    let mut chars = part.chars();
    match chars.next() {
        Some(c) if c.eq_ignore_ascii_case(&prefix) => {}
        _ => return Err(invalid()),
    }
    chars
        .map(|c| match c.to_digit(10) {
            Some(d) if d <= 8 => Ok(d as u8),
            _ => Err(invalid()),
        })
        .collect()
}

impl FromStr for RuleTable {
    type Err = ConfigError;

    fn from_str(rule: &str) -> Result<Self, Self::Err> {
        let trimmed = rule.trim();
        let (birth, survival) = trimmed
            .split_once('/')
            .ok_or_else(|| ConfigError::InvalidRule(rule.to_string()))?;
        let birth = parse_counts(birth, 'B', rule)?;
        let survival = parse_counts(survival, 'S', rule)?;
        Self::from_counts(&birth, &survival)
    }
}

impl fmt::Display for RuleTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("B")?;
        for (count, _) in self.dead.iter().enumerate().filter(|&(_, on)| *on) {
            write!(f, "{}", count)?;
        }
        f.write_str("/S")?;
        for (count, _) in self.alive.iter().enumerate().filter(|&(_, on)| *on) {
            write!(f, "{}", count)?;
        }
        Ok(())
    }
}
