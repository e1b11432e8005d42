//! Tests for roster aggregation and filtering

use rstest::{fixture, rstest};

use masjid_roster::domain::report::{
    budget_share_by_division, count_by_role, distinct_divisions, distinct_roles, filter, overview,
    round_div, summary_by_division, DivisionSummary, Overview, RoleCount,
};
use masjid_roster::domain::{MemberFields, MemberRecord};

fn member(id: u64, role: &str, division: &str, amount: u64) -> MemberRecord {
    MemberRecord::new(
        id,
        MemberFields::new(format!("Member {id}"), role, division, amount, ""),
        "2024-01-01",
    )
}

#[fixture]
fn table() -> Vec<MemberRecord> {
    vec![
        member(1, "Ketua", "Takmir", 5_000_000),
        member(2, "Anggota", "Dakwah", 1_000_000),
        member(3, "Anggota", "Dakwah", 2_000_001),
        member(4, "Sekretaris", "Takmir", 3_000_000),
        member(5, "Anggota", "Remaja", 500_000),
    ]
}

#[rstest]
fn given_table_when_budget_share_then_sums_per_division(table: Vec<MemberRecord>) {
    let shares = budget_share_by_division(&table).unwrap();

    let divisions: Vec<(&str, u64)> = shares
        .iter()
        .map(|s| (s.division.as_str(), s.total))
        .collect();
    assert_eq!(
        divisions,
        vec![
            ("Dakwah", 3_000_001),
            ("Remaja", 500_000),
            ("Takmir", 8_000_000)
        ]
    );
    let share_sum: f64 = shares.iter().map(|s| s.share).sum();
    assert!((share_sum - 1.0).abs() < 1e-9);
}

#[test]
fn given_empty_table_when_charting_then_none() {
    assert!(budget_share_by_division(&[]).is_none());
    assert!(count_by_role(&[]).is_none());
}

#[test]
fn given_zero_amounts_when_budget_share_then_zero_shares() {
    let table = vec![member(1, "Ketua", "Takmir", 0)];

    let shares = budget_share_by_division(&table).unwrap();

    assert_eq!(shares[0].share, 0.0);
}

#[test]
fn given_amounts_near_u64_max_when_budget_share_then_saturates_without_panic() {
    let table = vec![
        member(1, "Ketua", "Takmir", u64::MAX),
        member(2, "Anggota", "Dakwah", 1),
    ];

    let shares = budget_share_by_division(&table).unwrap();

    assert_eq!(shares.len(), 2);
    let takmir = shares.iter().find(|s| s.division == "Takmir").unwrap();
    assert_eq!(takmir.total, u64::MAX);
    assert!((takmir.share - 1.0).abs() < 1e-9);
    assert!(shares.iter().all(|s| (0.0..=1.0).contains(&s.share)));
}

#[rstest]
fn given_table_when_count_by_role_then_most_common_first(table: Vec<MemberRecord>) {
    let counts = count_by_role(&table).unwrap();

    assert_eq!(
        counts,
        vec![
            RoleCount {
                role: "Anggota".to_string(),
                count: 3
            },
            RoleCount {
                role: "Ketua".to_string(),
                count: 1
            },
            RoleCount {
                role: "Sekretaris".to_string(),
                count: 1
            },
        ]
    );
}

#[rstest]
fn given_table_when_summary_then_totals_counts_and_rounded_averages(table: Vec<MemberRecord>) {
    let summary = summary_by_division(&table);

    assert_eq!(
        summary,
        vec![
            DivisionSummary {
                division: "Dakwah".to_string(),
                total: 3_000_001,
                count: 2,
                // 1_500_000.5 rounds to even
                average: 1_500_000,
            },
            DivisionSummary {
                division: "Remaja".to_string(),
                total: 500_000,
                count: 1,
                average: 500_000,
            },
            DivisionSummary {
                division: "Takmir".to_string(),
                total: 8_000_000,
                count: 2,
                average: 4_000_000,
            },
        ]
    );
}

#[rstest]
fn given_table_when_summary_then_totals_add_up_to_all_amounts(table: Vec<MemberRecord>) {
    let summary = summary_by_division(&table);

    let per_division: u64 = summary.iter().map(|s| s.total).sum();
    let all: u64 = table.iter().map(|m| m.amount).sum();
    assert_eq!(per_division, all);
    for s in &summary {
        assert_eq!(s.average, round_div(s.total, s.count as u64));
    }
}

#[test]
fn given_empty_table_when_summary_then_empty() {
    assert!(summary_by_division(&[]).is_empty());
}

#[rstest]
#[case(&["Takmir"], &["Ketua", "Sekretaris", "Anggota"], &[1, 4])]
#[case(&["Dakwah", "Remaja"], &["Anggota"], &[2, 3, 5])]
#[case(&["Takmir", "Dakwah", "Remaja"], &["Ketua"], &[1])]
#[case(&["Takmir"], &["Anggota"], &[])]
#[case(&[], &["Anggota"], &[])]
#[case(&["Dakwah"], &[], &[])]
#[case(&["Sosial"], &["Ketua"], &[])]
fn given_sets_when_filtering_then_selects_by_membership(
    table: Vec<MemberRecord>,
    #[case] divisions: &[&str],
    #[case] roles: &[&str],
    #[case] expected_ids: &[u64],
) {
    let selected = filter(&table, divisions, roles);

    let ids: Vec<u64> = selected.iter().map(|m| m.id).collect();
    assert_eq!(ids, expected_ids);
}

#[rstest]
#[case(&["Takmir", "Dakwah"], &["Anggota", "Ketua"])]
#[case(&["Remaja"], &["Anggota"])]
#[case(&[], &[])]
fn given_filtered_table_when_filtering_again_then_same_rows(
    table: Vec<MemberRecord>,
    #[case] divisions: &[&str],
    #[case] roles: &[&str],
) {
    let once = filter(&table, divisions, roles);
    let twice = filter(&once, divisions, roles);

    assert_eq!(once, twice);
}

#[rstest]
fn given_table_when_overview_then_quick_stats(table: Vec<MemberRecord>) {
    let stats = overview(&table);

    assert_eq!(
        stats,
        Overview {
            members: 5,
            total_budget: 11_500_001,
            average: 2_300_000,
            divisions: 3,
        }
    );
}

#[test]
fn given_empty_table_when_overview_then_zeroes() {
    assert_eq!(overview(&[]), Overview::default());
}

#[rstest]
fn given_table_when_distinct_values_then_first_appearance_order(table: Vec<MemberRecord>) {
    assert_eq!(distinct_divisions(&table), vec!["Takmir", "Dakwah", "Remaja"]);
    assert_eq!(distinct_roles(&table), vec!["Ketua", "Anggota", "Sekretaris"]);
}

#[rstest]
fn given_distinct_values_as_filter_when_filtering_then_everything_selected(
    table: Vec<MemberRecord>,
) {
    let selected = filter(&table, &distinct_divisions(&table), &distinct_roles(&table));

    assert_eq!(selected, table);
}
