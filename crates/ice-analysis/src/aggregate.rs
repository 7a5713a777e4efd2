//! Grouping and summarizing an [`AnalysisTable`].
//!
//! Every grouping keeps its keys in first-encountered order, so results are
//! deterministic for a given table. Rows are never dropped because of their
//! key: `unknown` markers and unevaluated scores form their own groups.

use std::{collections::HashMap, hash::Hash};

use ice_stats::descriptive::DescriptiveStats;
use serde::Serialize;

use crate::{
    dimension::{Dimension, GroupKey, Measure, Region},
    features::{AnalysisRow, AnalysisTable},
};

/// How the values of one group are reduced to a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub enum Summary {
    Sum,
    Mean,
    Count,
    Min,
    Max,
}

impl Summary {
    /// Reduces a non-empty group.
    #[expect(clippy::cast_precision_loss)]
    fn apply(self, values: &[f64]) -> f64 {
        match self {
            Summary::Sum => values.iter().sum(),
            Summary::Mean => values.iter().sum::<f64>() / values.len() as f64,
            Summary::Count => values.len() as f64,
            Summary::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            Summary::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

/// One key and its summary value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateEntry<K> {
    pub key: K,
    pub value: f64,
}

/// An ordered mapping from group key to a numeric summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Aggregate<K> {
    entries: Vec<AggregateEntry<K>>,
}

impl<K> Default for Aggregate<K> {
    fn default() -> Self {
        Self { entries: vec![] }
    }
}

impl<K> FromIterator<(K, f64)> for Aggregate<K> {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let entries = iter
            .into_iter()
            .map(|(key, value)| AggregateEntry { key, value })
            .collect();
        Self { entries }
    }
}

impl<K> Aggregate<K> {
    #[must_use]
    pub fn entries(&self) -> &[AggregateEntry<K>] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.entries.iter().map(|e| &e.key)
    }

    /// Sum of all values.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.value).sum()
    }

    /// The value of `key`, if present.
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<f64>
    where
        K: PartialEq<Q>,
        Q: ?Sized,
    {
        self.entries.iter().find(|e| e.key == *key).map(|e| e.value)
    }

    /// The entries for which `predicate` holds, order preserved.
    #[must_use]
    pub fn filter<F>(&self, mut predicate: F) -> Self
    where
        K: Clone,
        F: FnMut(&AggregateEntry<K>) -> bool,
    {
        let entries = self.entries.iter().filter(|e| predicate(e)).cloned().collect();
        Self { entries }
    }

    /// The `n` entries with the largest values, largest first.
    ///
    /// Ties keep their current order. Returns `min(n, len)` entries.
    ///
    /// ```
    /// use ice_analysis::aggregate::Aggregate;
    ///
    /// let sales = [("DS", 1.0), ("PS4", 3.0), ("Wii", 1.0)]
    ///     .into_iter()
    ///     .collect::<Aggregate<_>>();
    /// let top = sales.top_n(2);
    /// assert_eq!(top.keys().copied().collect::<Vec<_>>(), ["PS4", "DS"]);
    /// ```
    #[must_use]
    pub fn top_n(&self, n: usize) -> Self
    where
        K: Clone,
    {
        let mut entries = self.entries.clone();
        entries.sort_by(|a, b| b.value.total_cmp(&a.value));
        entries.truncate(n);
        Self { entries }
    }

    /// All entries, largest value first, ties in current order.
    #[must_use]
    pub fn sorted_by_value(&self) -> Self
    where
        K: Clone,
    {
        self.top_n(self.len())
    }

    /// Each value as a fraction of the total. A zero total yields zero shares.
    #[must_use]
    pub fn percentage_share(&self) -> Self
    where
        K: Clone,
    {
        let total = self.total();
        self.map_values(|value| if total == 0.0 { 0.0 } else { value / total })
    }

    /// Relative change of each value against the previous entry.
    ///
    /// The first entry and entries whose predecessor is zero have no change
    /// and are left out.
    ///
    /// ```
    /// use ice_analysis::aggregate::Aggregate;
    ///
    /// let means = [(2014, 0.5), (2015, 0.6), (2016, 0.3)]
    ///     .into_iter()
    ///     .collect::<Aggregate<_>>();
    /// let change = means.pct_change();
    /// assert_eq!(change.len(), 2);
    /// assert!((change.get(&2015).unwrap() - 0.2).abs() < 1e-12);
    /// assert!((change.get(&2016).unwrap() + 0.5).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn pct_change(&self) -> Self
    where
        K: Clone,
    {
        let entries = self
            .entries
            .windows(2)
            .filter(|pair| pair[0].value != 0.0)
            .map(|pair| AggregateEntry {
                key: pair[1].key.clone(),
                value: (pair[1].value - pair[0].value) / pair[0].value,
            })
            .collect();
        Self { entries }
    }

    /// The same entries ordered by key.
    #[must_use]
    pub fn sorted_by_key(&self) -> Self
    where
        K: Clone + Ord,
    {
        let mut entries = self.entries.clone();
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        Self { entries }
    }

    fn map_values<F>(&self, mut f: F) -> Self
    where
        K: Clone,
        F: FnMut(f64) -> f64,
    {
        let entries = self
            .entries
            .iter()
            .map(|e| AggregateEntry {
                key: e.key.clone(),
                value: f(e.value),
            })
            .collect();
        Self { entries }
    }
}

/// Collects `measure` per key, keys in first-encountered order.
fn collect_groups<K, F>(table: &AnalysisTable, mut key: F, measure: Measure) -> Vec<(K, Vec<f64>)>
where
    K: Eq + Hash + Clone,
    F: FnMut(&AnalysisRow) -> K,
{
    let mut positions = HashMap::<K, usize>::new();
    let mut groups = Vec::<(K, Vec<f64>)>::new();
    for row in table.rows() {
        let key = key(row);
        let index = *positions.entry(key.clone()).or_insert_with(|| {
            groups.push((key, vec![]));
            groups.len() - 1
        });
        groups[index].1.push(measure.value(row));
    }
    groups
}

/// Groups rows by an arbitrary key and summarizes `measure` per group.
pub fn group_by<K, F>(table: &AnalysisTable, key: F, measure: Measure, summary: Summary) -> Aggregate<K>
where
    K: Eq + Hash + Clone,
    F: FnMut(&AnalysisRow) -> K,
{
    collect_groups(table, key, measure)
        .into_iter()
        .map(|(key, values)| (key, summary.apply(&values)))
        .collect()
}

/// Sum of `measure` per distinct value of `by`.
///
/// ```
/// use ice_analysis::{
///     aggregate::group_sum,
///     dimension::{Dimension, GroupKey, Measure},
///     features::derive_features,
///     record::{GameRecord, GameTable, RegionalSales, Score},
/// };
///
/// let game = |platform: &str, na| GameRecord {
///     name: "x".into(),
///     platform: platform.into(),
///     year_of_release: 2015,
///     genre: "Action".into(),
///     sales: RegionalSales { na, ..RegionalSales::default() },
///     critic_score: Score::NotEvaluated,
///     user_score: Score::NotEvaluated,
///     rating: "E".into(),
/// };
/// let table = derive_features(GameTable {
///     records: vec![game("A", 1.0), game("A", 2.0), game("B", 0.5)],
/// });
/// let sums = group_sum(&table, Dimension::Platform, Measure::NaSales);
/// assert_eq!(sums.get(&GroupKey::from("A")), Some(3.0));
/// assert_eq!(sums.get(&GroupKey::from("B")), Some(0.5));
/// ```
#[must_use]
pub fn group_sum(table: &AnalysisTable, by: Dimension, measure: Measure) -> Aggregate<GroupKey> {
    group_by(table, |row| by.key(row), measure, Summary::Sum)
}

#[must_use]
pub fn group_mean(table: &AnalysisTable, by: Dimension, measure: Measure) -> Aggregate<GroupKey> {
    group_by(table, |row| by.key(row), measure, Summary::Mean)
}

/// Number of rows per distinct value of `by`.
#[must_use]
pub fn group_count(table: &AnalysisTable, by: Dimension) -> Aggregate<GroupKey> {
    group_by(table, |row| by.key(row), Measure::TotalSales, Summary::Count)
}

#[must_use]
pub fn group_min(table: &AnalysisTable, by: Dimension, measure: Measure) -> Aggregate<GroupKey> {
    group_by(table, |row| by.key(row), measure, Summary::Min)
}

#[must_use]
pub fn group_max(table: &AnalysisTable, by: Dimension, measure: Measure) -> Aggregate<GroupKey> {
    group_by(table, |row| by.key(row), measure, Summary::Max)
}

/// Groups by a tuple of dimensions, e.g. platform and year.
#[must_use]
pub fn group_by_dimensions(
    table: &AnalysisTable,
    by: &[Dimension],
    measure: Measure,
    summary: Summary,
) -> Aggregate<Vec<GroupKey>> {
    group_by(
        table,
        |row| by.iter().map(|d| d.key(row)).collect(),
        measure,
        summary,
    )
}

/// Total sales of each region over the whole table.
#[must_use]
pub fn regional_totals(table: &AnalysisTable) -> Aggregate<Region> {
    Region::ALL
        .into_iter()
        .map(|region| {
            let measure = region.measure();
            let total = table.rows().iter().map(|row| measure.value(row)).sum();
            (region, total)
        })
        .collect()
}

/// Distribution of a measure within one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupDistribution {
    pub key: GroupKey,
    pub stats: DescriptiveStats,
}

/// Descriptive statistics of `measure` per distinct value of `by`.
#[must_use]
pub fn group_distribution(
    table: &AnalysisTable,
    by: Dimension,
    measure: Measure,
) -> Vec<GroupDistribution> {
    collect_groups(table, |row| by.key(row), measure)
        .into_iter()
        .filter_map(|(key, values)| {
            let stats = DescriptiveStats::new(values)?;
            Some(GroupDistribution { key, stats })
        })
        .collect()
}
