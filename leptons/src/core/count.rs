//! Lepton counting and the closed-range accept decision.

/// Which lepton collections contribute to the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountFlags {
    pub electrons: bool,
    pub muons: bool,
    pub taus: bool,
}

impl CountFlags {
    pub const ALL: Self = Self {
        electrons: true,
        muons: true,
        taus: true,
    };
}

/// Closed range `[min, max]` of accepted lepton totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountRange {
    pub min: u32,
    pub max: u32,
}

impl CountRange {
    pub fn contains(&self, total: usize) -> bool {
        let total = total as u64;
        u64::from(self.min) <= total && total <= u64::from(self.max)
    }

    /// Accept decision over the counted collections.
    pub fn accepts(&self, counts: &LeptonCounts) -> bool {
        self.contains(counts.total())
    }
}

/// Sizes of the counted collections; `None` marks a collection that is
/// excluded and was never looked up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LeptonCounts {
    pub electrons: Option<usize>,
    pub muons: Option<usize>,
    pub taus: Option<usize>,
}

impl LeptonCounts {
    pub fn total(&self) -> usize {
        [self.electrons, self.muons, self.taus]
            .into_iter()
            .flatten()
            .sum()
    }
}

/// Count the enabled collections and test the total against `range`.
pub fn lepton_count_decision<E, M, T>(
    electrons: &[E],
    muons: &[M],
    taus: &[T],
    flags: CountFlags,
    range: CountRange,
) -> bool {
    let counts = LeptonCounts {
        electrons: flags.electrons.then_some(electrons.len()),
        muons: flags.muons.then_some(muons.len()),
        taus: flags.taus.then_some(taus.len()),
    };
    range.accepts(&counts)
}
