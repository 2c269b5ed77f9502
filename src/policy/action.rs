//! The discrete action space.

use std::fmt;

/// One of the two moves an agent can make per tick.
///
/// The discriminants match the output indices of trained Q-networks:
/// `Up = 0`, `Right = 1`. Enumeration order matters: vote ties are broken
/// toward the first variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Up = 0,
    Right = 1,
}

impl Action {
    /// All actions in discriminant order.
    pub fn all() -> [Action; 2] {
        [Action::Up, Action::Right]
    }

    /// Discrete index of this action.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Action for a discrete index, if in range.
    pub fn from_index(index: usize) -> Option<Action> {
        match index {
            0 => Some(Action::Up),
            1 => Some(Action::Right),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Up => write!(f, "up"),
            Action::Right => write!(f, "right"),
        }
    }
}

/// Per-tick tally of the actions chosen by the active models.
#[derive(Debug, Clone, Default)]
pub struct VoteTally {
    counts: [u32; 2],
}

impl VoteTally {
    /// Fresh tally with zero votes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one vote for an action.
    pub fn record(&mut self, action: Action) {
        self.counts[action.index()] += 1;
    }

    /// Total number of recorded votes.
    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// The majority action. Ties go to the action enumerated first (`Up`),
    /// because the scan only replaces the leader on a strictly greater
    /// count.
    pub fn winner(&self) -> Action {
        let mut winner = Action::Up;
        let mut best = self.counts[winner.index()];
        for action in Action::all() {
            if self.counts[action.index()] > best {
                best = self.counts[action.index()];
                winner = action;
            }
        }
        winner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trip() {
        for action in Action::all() {
            assert_eq!(Action::from_index(action.index()), Some(action));
        }
        assert_eq!(Action::from_index(2), None);
    }

    #[test]
    fn majority_wins() {
        let mut tally = VoteTally::new();
        tally.record(Action::Right);
        tally.record(Action::Right);
        tally.record(Action::Up);
        assert_eq!(tally.winner(), Action::Right);
    }

    #[test]
    fn tie_goes_to_up() {
        let mut tally = VoteTally::new();
        tally.record(Action::Up);
        tally.record(Action::Right);
        assert_eq!(tally.winner(), Action::Up);
    }

    #[test]
    fn empty_tally_defaults_to_up() {
        assert_eq!(VoteTally::new().winner(), Action::Up);
    }
}
