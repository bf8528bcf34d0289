use crate::puzzle::MoveSource;

/// Replays a fixed list of picks, then keeps choosing the first candidate.
pub(crate) struct ScriptedMoves {
    picks: Vec<usize>,
    consumed: usize,
}

impl ScriptedMoves {
    pub(crate) fn new(picks: Vec<usize>) -> Self {
        Self { picks, consumed: 0 }
    }

    pub(crate) fn consumed(&self) -> usize {
        self.consumed
    }
}

impl MoveSource for ScriptedMoves {
    fn pick(&mut self, len: usize) -> usize {
        let choice = self.picks.get(self.consumed).copied().unwrap_or(0);
        self.consumed += 1;
        choice % len
    }
}
