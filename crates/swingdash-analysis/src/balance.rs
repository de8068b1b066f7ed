//! Shot-count balancing (standardisation)
//!
//! Downsamples two sessions so that neither dominates the comparison:
//!
//! - [`BalanceMode::Simple`]: both sessions are cut to `min(|old|, |new|)` rows
//! - [`BalanceMode::Stratified`]: within every stratum (by default
//!   `Club Type` × `Side`) both sessions are cut to the smaller stratum size
//!
//! # Determinism
//!
//! Every sampling call builds its own [`Pcg32`] from the caller's seed, so the
//! same inputs, mode and seed always select the same rows. Selected rows keep
//! their original relative order.

use std::fmt;

use rand::SeedableRng as _;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::{
    catalogue::columns,
    dataset::{Dataset, Value},
};

/// Strata used when none are configured.
pub const DEFAULT_STRATIFY_COLUMNS: [&str; 2] = [columns::CLUB_TYPE, columns::SIDE];

/// How sessions are balanced.
///
/// Parsing is lenient: strings that name no known mode become
/// [`BalanceMode::Unrecognized`], which balances nothing. This keeps a typo in
/// a configuration from aborting a comparison; callers that want to reject it
/// can check [`BalanceMode::is_unrecognized`].
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(from = "String", into = "String")]
pub enum BalanceMode {
    #[default]
    Simple,
    Stratified,
    Unrecognized(String),
}

impl BalanceMode {
    /// Resolves a mode label. `"Simple"`, `"Stratified"` and
    /// `"Stratified: Club Type + Side"` are recognized.
    #[must_use]
    pub fn parse(label: &str) -> Self {
        match label.trim() {
            "Simple" => Self::Simple,
            "Stratified" | "Stratified: Club Type + Side" => Self::Stratified,
            other => Self::Unrecognized(other.to_owned()),
        }
    }
}

impl From<String> for BalanceMode {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<BalanceMode> for String {
    fn from(value: BalanceMode) -> Self {
        value.to_string()
    }
}

impl fmt::Display for BalanceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple => f.write_str("Simple"),
            Self::Stratified => f.write_str("Stratified"),
            Self::Unrecognized(label) => f.write_str(label),
        }
    }
}

/// Balances `old` and `new` according to `mode`.
///
/// Disabled balancing, an empty input or an unrecognized mode return both
/// datasets unchanged. `stratify_columns` is only used by
/// [`BalanceMode::Stratified`] and is restricted to columns both datasets have.
#[must_use]
pub fn balance_samples<S>(
    old: &Dataset,
    new: &Dataset,
    enabled: bool,
    mode: &BalanceMode,
    seed: u64,
    stratify_columns: &[S],
) -> (Dataset, Dataset)
where
    S: AsRef<str>,
{
    if !enabled || old.is_empty() || new.is_empty() {
        return (old.clone(), new.clone());
    }
    let (old_rows, new_rows) = match mode {
        BalanceMode::Simple => {
            let n = old.len().min(new.len());
            (
                sample_indices(&all_rows(old), n, seed),
                sample_indices(&all_rows(new), n, seed),
            )
        }
        BalanceMode::Stratified => {
            let by = old
                .present_columns(stratify_columns)
                .into_iter()
                .filter(|name| new.has_column(name))
                .collect::<Vec<_>>();
            if by.is_empty() {
                log::warn!("no stratification column present in both sessions; not balancing");
                return (old.clone(), new.clone());
            }
            stratified_indices(old, new, &by, seed)
        }
        BalanceMode::Unrecognized(label) => {
            log::warn!("unrecognized balance mode '{label}'; not balancing");
            return (old.clone(), new.clone());
        }
    };
    log::debug!(
        "balanced ({mode}, seed {seed}): {} -> {}, {} -> {}",
        old.len(),
        old_rows.len(),
        new.len(),
        new_rows.len()
    );
    (old.take(&old_rows), new.take(&new_rows))
}

fn all_rows(dataset: &Dataset) -> Vec<usize> {
    (0..dataset.len()).collect()
}

/// Picks `n` of `rows` without replacement, preserving their order.
///
/// Asking for at least as many rows as there are returns all of them.
#[must_use]
pub fn sample_indices(rows: &[usize], n: usize, seed: u64) -> Vec<usize> {
    if n >= rows.len() {
        return rows.to_vec();
    }
    let mut rng = Pcg32::seed_from_u64(seed);
    let mut picked = rand::seq::index::sample(&mut rng, rows.len(), n).into_vec();
    picked.sort_unstable();
    picked.into_iter().map(|i| rows[i]).collect()
}

fn row_keys(dataset: &Dataset, by: &[&str]) -> Vec<Vec<Value>> {
    let key_columns = by
        .iter()
        .filter_map(|name| dataset.column(name))
        .collect::<Vec<_>>();
    (0..dataset.len())
        .map(|row| key_columns.iter().map(|column| column[row].clone()).collect())
        .collect()
}

/// Per-stratum `min` downsampling. Strata are visited in first-seen order,
/// old session before new, and the sampled groups are concatenated.
fn stratified_indices(
    old: &Dataset,
    new: &Dataset,
    by: &[&str],
    seed: u64,
) -> (Vec<usize>, Vec<usize>) {
    let old_keys = row_keys(old, by);
    let new_keys = row_keys(new, by);

    let mut strata: Vec<&Vec<Value>> = Vec::new();
    for key in old_keys.iter().chain(&new_keys) {
        if !strata.contains(&key) {
            strata.push(key);
        }
    }

    let members = |keys: &[Vec<Value>], stratum: &Vec<Value>| {
        keys.iter()
            .enumerate()
            .filter_map(|(row, key)| (key == stratum).then_some(row))
            .collect::<Vec<_>>()
    };

    let mut old_rows = Vec::new();
    let mut new_rows = Vec::new();
    for stratum in strata {
        let old_group = members(&old_keys, stratum);
        let new_group = members(&new_keys, stratum);
        let n = old_group.len().min(new_group.len());
        if n == 0 {
            continue;
        }
        old_rows.extend(sample_indices(&old_group, n, seed));
        new_rows.extend(sample_indices(&new_group, n, seed));
    }
    (old_rows, new_rows)
}
