//! Aggregation over the roster table: chart data, summaries and filtering
//!
//! All functions are pure passes over an in-memory slice. Grouped results are
//! returned in a deterministic order so output is stable between runs.

use std::collections::BTreeMap;

use itertools::Itertools;

use crate::domain::MemberRecord;

/// One slice of the budget pie chart.
#[derive(Debug, Clone, PartialEq)]
pub struct DivisionShare {
    pub division: String,
    pub total: u64,
    /// Fraction of the grand total, in `0.0..=1.0`
    pub share: f64,
}

/// One bar of the role chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleCount {
    pub role: String,
    pub count: usize,
}

/// Budget summary row for one division.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DivisionSummary {
    pub division: String,
    pub total: u64,
    pub count: usize,
    /// `total / count`, rounded to whole units
    pub average: u64,
}

/// Quick statistics for the whole table (or a filtered subset).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Overview {
    pub members: usize,
    pub total_budget: u64,
    pub average: u64,
    pub divisions: usize,
}

/// Integer division rounded to nearest, ties to even.
///
/// Matches the rounding of the numeric library the figures were originally
/// reported with, so `5 / 2` gives 2 and `3 / 2` gives 2.
pub fn round_div(total: u64, count: u64) -> u64 {
    if count == 0 {
        return 0;
    }
    let quotient = total / count;
    let remainder = total % count;
    // remainder < count, so comparing against count - remainder avoids overflow
    match remainder.cmp(&(count - remainder)) {
        std::cmp::Ordering::Less => quotient,
        std::cmp::Ordering::Greater => quotient + 1,
        std::cmp::Ordering::Equal => quotient + (quotient & 1),
    }
}

fn totals_by_division(table: &[MemberRecord]) -> BTreeMap<&str, (u64, usize)> {
    let mut totals: BTreeMap<&str, (u64, usize)> = BTreeMap::new();
    for member in table {
        let entry = totals.entry(member.division.as_str()).or_default();
        entry.0 = entry.0.saturating_add(member.amount);
        entry.1 += 1;
    }
    totals
}

/// Sum of amounts per division, with each division's share of the total.
///
/// Returns `None` for an empty table (nothing to chart).
pub fn budget_share_by_division(table: &[MemberRecord]) -> Option<Vec<DivisionShare>> {
    if table.is_empty() {
        return None;
    }
    let totals = totals_by_division(table);
    let grand_total = totals
        .values()
        .fold(0u64, |acc, (total, _)| acc.saturating_add(*total));

    Some(
        totals
            .into_iter()
            .map(|(division, (total, _))| DivisionShare {
                division: division.to_string(),
                total,
                share: if grand_total == 0 {
                    0.0
                } else {
                    total as f64 / grand_total as f64
                },
            })
            .collect(),
    )
}

/// Number of members per role, most common first.
///
/// Returns `None` for an empty table.
pub fn count_by_role(table: &[MemberRecord]) -> Option<Vec<RoleCount>> {
    if table.is_empty() {
        return None;
    }
    Some(
        table
            .iter()
            .counts_by(|m| m.role.as_str())
            .into_iter()
            .sorted_by(|(a_role, a_count), (b_role, b_count)| {
                b_count.cmp(a_count).then_with(|| a_role.cmp(b_role))
            })
            .map(|(role, count)| RoleCount {
                role: role.to_string(),
                count,
            })
            .collect(),
    )
}

/// Total, member count and rounded average amount per division.
pub fn summary_by_division(table: &[MemberRecord]) -> Vec<DivisionSummary> {
    totals_by_division(table)
        .into_iter()
        .map(|(division, (total, count))| DivisionSummary {
            division: division.to_string(),
            total,
            count,
            average: round_div(total, count as u64),
        })
        .collect()
}

/// Rows whose division is in `divisions` and whose role is in `roles`.
///
/// Plain set membership: an empty set matches nothing. Row order is kept.
pub fn filter<D, R>(table: &[MemberRecord], divisions: &[D], roles: &[R]) -> Vec<MemberRecord>
where
    D: AsRef<str>,
    R: AsRef<str>,
{
    table
        .iter()
        .filter(|m| divisions.iter().any(|d| d.as_ref() == m.division))
        .filter(|m| roles.iter().any(|r| r.as_ref() == m.role))
        .cloned()
        .collect()
}

/// Member count, total budget, average amount and number of divisions.
pub fn overview(table: &[MemberRecord]) -> Overview {
    let total_budget = table
        .iter()
        .fold(0u64, |acc, m| acc.saturating_add(m.amount));
    Overview {
        members: table.len(),
        total_budget,
        average: round_div(total_budget, table.len() as u64),
        divisions: table.iter().map(|m| m.division.as_str()).unique().count(),
    }
}

/// Divisions present in the table, in order of first appearance.
pub fn distinct_divisions(table: &[MemberRecord]) -> Vec<String> {
    table
        .iter()
        .map(|m| m.division.clone())
        .unique()
        .collect()
}

/// Roles present in the table, in order of first appearance.
pub fn distinct_roles(table: &[MemberRecord]) -> Vec<String> {
    table.iter().map(|m| m.role.clone()).unique().collect()
}
