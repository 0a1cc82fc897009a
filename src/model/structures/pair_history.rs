use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::model::structures::competitor::CompetitorId;

/// Canonical unordered pair: (lower id, higher id)
pub type PairKey = (CompetitorId, CompetitorId);

pub fn pair_key(a: CompetitorId, b: CompetitorId) -> PairKey {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Last date each pair of competitors in a division fought
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PairHistory {
    last_fought: BTreeMap<PairKey, NaiveDate>
}

impl PairHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_fought(&self, a: CompetitorId, b: CompetitorId) -> Option<NaiveDate> {
        self.last_fought.get(&pair_key(a, b)).copied()
    }

    pub fn record(&mut self, a: CompetitorId, b: CompetitorId, date: NaiveDate) {
        self.last_fought.insert(pair_key(a, b), date);
    }

    pub fn len(&self) -> usize {
        self.last_fought.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_fought.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PairKey, &NaiveDate)> {
        self.last_fought.iter()
    }
}
