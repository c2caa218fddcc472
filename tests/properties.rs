use cgpa_dashboard::{
    compute_aggregates, filter, rank, sort_by, Cgpa, Direction, Scope, SortKey, StudentRecord,
};
use proptest::prelude::*;

const BRANCHES: [&str; 4] = ["IFI", "IIT", "IIB", "XYZ"];

fn cgpa_strategy() -> impl Strategy<Value = Cgpa> {
    prop_oneof![
        4 => (0u32..=1000).prop_map(|hundredths| Cgpa::Value(f64::from(hundredths) / 100.0)),
        1 => Just(Cgpa::Unavailable),
    ]
}

fn record_strategy() -> impl Strategy<Value = StudentRecord> {
    ("[A-Za-z ]{1,12}", "[0-9]{4}", "[0-9]{6}", cgpa_strategy(), 0..BRANCHES.len()).prop_map(
        |(name, serial, apaar, cgpa, branch)| StudentRecord {
            name,
            enrolment_no: format!("{}2023{serial}", BRANCHES[branch]),
            apaar_id: apaar,
            cgpa,
            branch: BRANCHES[branch].to_string(),
        },
    )
}

fn known_branches() -> Vec<String> {
    BRANCHES[..3].iter().map(|b| b.to_string()).collect()
}

proptest! {
    #[test]
    fn overall_ranks_are_dense_and_ordered(records in prop::collection::vec(record_strategy(), 0..40)) {
        let ranked = rank(&records, &Scope::Overall);
        prop_assert_eq!(ranked.len(), records.len());
        for (index, row) in ranked.iter().enumerate() {
            prop_assert_eq!(row.rank, index + 1);
        }
        for pair in ranked.windows(2) {
            prop_assert!(pair[0].record.cgpa.compare(pair[1].record.cgpa).is_ge());
        }
    }

    #[test]
    fn branch_ranking_stays_in_branch(
        records in prop::collection::vec(record_strategy(), 0..40),
        branch in 0..BRANCHES.len(),
    ) {
        let code = BRANCHES[branch];
        let ranked = rank(&records, &Scope::Branch(code.to_string()));
        prop_assert!(ranked.iter().all(|row| row.record.branch == code));
        prop_assert_eq!(
            ranked.len(),
            records.iter().filter(|r| r.branch == code).count()
        );
    }

    #[test]
    fn branch_counts_skip_unavailable(records in prop::collection::vec(record_strategy(), 0..40)) {
        let aggregates = compute_aggregates(&records, &known_branches());
        for average in &aggregates.per_branch {
            let graded = records
                .iter()
                .filter(|r| r.branch == average.branch && r.cgpa.is_available())
                .count();
            prop_assert_eq!(average.student_count, graded);
        }
        prop_assert_eq!(aggregates.overall.total_students, records.len());
    }

    #[test]
    fn empty_filter_is_identity(records in prop::collection::vec(record_strategy(), 0..40)) {
        prop_assert_eq!(filter(&records, ""), records);
    }

    #[test]
    fn sorting_is_idempotent(records in prop::collection::vec(record_strategy(), 0..40)) {
        for key in [SortKey::Name, SortKey::EnrolmentNo, SortKey::ApaarId, SortKey::Cgpa, SortKey::Branch] {
            for direction in [Direction::Ascending, Direction::Descending] {
                let once = sort_by(&records, key, direction);
                let twice = sort_by(&once, key, direction);
                prop_assert_eq!(once, twice);
            }
        }
    }

    #[test]
    fn flipping_direction_reverses_distinct_keys(
        serials in prop::collection::btree_set(0u32..100_000, 0..30),
    ) {
        let records: Vec<StudentRecord> = serials
            .iter()
            .rev()
            .map(|serial| StudentRecord {
                name: format!("Student {serial}"),
                enrolment_no: format!("IIT{serial:06}"),
                apaar_id: format!("{serial:06}"),
                cgpa: Cgpa::Value(f64::from(*serial) / 10_000.0),
                branch: "IIT".to_string(),
            })
            .collect();

        for key in [SortKey::EnrolmentNo, SortKey::ApaarId, SortKey::Cgpa] {
            let ascending = sort_by(&records, key, Direction::Ascending);
            let mut descending = sort_by(&ascending, key, Direction::Descending);
            descending.reverse();
            prop_assert_eq!(&ascending, &descending);
        }
    }
}
