/// Running min/max/sum/count for one key, in tenths.
///
/// An empty record (`count == 0`) holds `min = i64::MAX` and
/// `max = i64::MIN` so the first observation replaces both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub count: u64,
    pub sum: i64,
    pub min: i64,
    pub max: i64,
}

impl Stats {
    pub const EMPTY: Stats = Stats {
        count: 0,
        sum: 0,
        min: i64::MAX,
        max: i64::MIN,
    };

    #[inline(always)]
    pub fn record(&mut self, value: i64) {
        self.sum += value;
        self.count += 1;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    pub fn merge(&mut self, other: &Stats) {
        self.sum += other.sum;
        self.count += other.count;
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Mean in tenths, rounded half towards positive infinity. `None` when
    /// nothing was recorded.
    pub fn mean_tenths(&self) -> Option<i64> {
        if self.count == 0 {
            return None;
        }
        let count = self.count as i64;
        Some((2 * self.sum + count).div_euclid(2 * count))
    }
}

impl Default for Stats {
    fn default() -> Self {
        Stats::EMPTY
    }
}
