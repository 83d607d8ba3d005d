//! End-to-end resolution properties over generated and hand-built orgs.

use orgchain_hierarchy::{Employee, HierarchyIndex, Level};
use orgchain_resolve::{
    execute, load_snapshot, walk_all, walk_chain, JsonFileSource, Mode, Resolver, RunConfig,
    WalkOutcome,
};
use proptest::prelude::*;
use std::io::Write;

fn emp(id: &str, sup: &str, sect: &str, dept: &str, div: &str, func: &str) -> Employee {
    Employee::new(id, "").reporting_to(sup).in_units(sect, dept, div, func)
}

/// The four-person example: two staff under UB in section SA, UB sitting
/// directly in department DA, UD above them in division DDA.
fn example() -> HierarchyIndex {
    HierarchyIndex::new(vec![
        emp("UA", "UB", "SA", "DA", "DDA", "FA"),
        emp("UC", "UB", "SA", "DA", "DDA", "FA"),
        emp("UB", "UD", "DA", "DA", "DDA", "FA"),
        emp("UD", "UF", "DDA", "DDA", "DDA", "FA"),
    ])
}

#[test]
fn example_resolves_in_both_modes() {
    let index = example();
    for mode in Mode::ALL {
        let resolver = Resolver::new(&index, mode);
        assert_eq!(
            resolver.resolve(Level::Section, "SA").as_deref(),
            Some("UB"),
            "{mode}"
        );
        assert_eq!(
            resolver.resolve(Level::Department, "DA").as_deref(),
            Some("UD"),
            "{mode}"
        );
    }
}

#[test]
fn unknown_unit_is_empty_in_both_modes() {
    let index = example();
    for mode in Mode::ALL {
        assert_eq!(Resolver::new(&index, mode).resolve(Level::Section, "ZZ"), None);
    }
}

#[test]
fn tie_goes_to_first_member_in_input_order() {
    let index = HierarchyIndex::new(vec![
        emp("E2", "M2", "S", "D", "V", "F"),
        emp("E1", "M1", "S", "D", "V", "F"),
    ]);
    let resolver = Resolver::new(&index, Mode::Promotion);
    assert_eq!(resolver.resolve(Level::Section, "S").as_deref(), Some("M2"));
}

#[test]
fn injected_cycle_falls_back_to_self() {
    let index = HierarchyIndex::new(vec![
        emp("A", "B", "S", "D", "V", "F"),
        emp("B", "C", "S", "D", "V", "F"),
        emp("C", "A", "S", "D", "V", "F"),
    ]);
    for walk in walk_all(&index) {
        assert!(matches!(walk.outcome, WalkOutcome::Cycle { .. }));
        for level in Level::ALL {
            assert!(walk.is_self(level));
        }
    }
    let resolution = Resolver::new(&index, Mode::ChainWalk).resolve_all();
    assert_eq!(resolution.supervisor(Level::Section, "S"), Some("A"));
}

#[test]
fn manager_without_a_manager_does_not_hide_their_report_line() {
    let index = HierarchyIndex::new(vec![
        emp("P", "", "S", "D", "V", "F"),
        emp("Q", "R", "S", "D", "V", "F"),
        emp("R", "", "S2", "D", "V", "F"),
    ]);
    for mode in Mode::ALL {
        let resolution = Resolver::new(&index, mode).resolve_all();
        assert_eq!(resolution.supervisor(Level::Section, "S"), Some("R"), "{mode}");
    }
}

#[test]
fn runs_over_different_snapshots_do_not_share_results() {
    let before = example();
    let after = HierarchyIndex::new(vec![
        emp("UA", "UX", "SA", "DA", "DDA", "FA"),
        emp("UC", "UX", "SA", "DA", "DDA", "FA"),
    ]);
    assert_ne!(before.snapshot(), after.snapshot());

    let first = Resolver::new(&before, Mode::Promotion);
    let second = Resolver::new(&after, Mode::Promotion);
    assert_eq!(first.resolve(Level::Section, "SA").as_deref(), Some("UB"));
    assert_eq!(second.resolve(Level::Section, "SA").as_deref(), Some("UX"));
    assert_eq!(first.resolve(Level::Section, "SA").as_deref(), Some("UB"));
}

#[test]
fn json_file_round_trip_through_execute() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[
            {{"userId":"UA","supervisor":"UB","sectId":"SA","deptId":"DA","divisionId":"DDA","functionId":"FA"}},
            {{"userId":"UC","supervisor":"UB","sectId":"SA","deptId":"DA","divisionId":"DDA","functionId":"FA"}},
            {{"userId":"UB","supervisor":"UD","sectId":"DA","deptId":"DA","divisionId":"DDA","functionId":"FA"}},
            {{"userId":"UD","supervisor":"UF","sectId":"DDA","deptId":"DDA","divisionId":"DDA","functionId":"FA"}}
        ]"#
    )
    .unwrap();

    let index = load_snapshot(&JsonFileSource::new(file.path())).unwrap();
    assert_eq!(index.snapshot(), example().snapshot());

    let report = execute(&index, &RunConfig::default());
    for resolution in &report.resolutions {
        assert_eq!(resolution.supervisor(Level::Department, "DA"), Some("UD"));
    }
}

/// Small random orgs. Ids are drawn from one shared pool at every level so
/// placeholder levels, dangling managers and cycles all show up.
fn arb_org() -> impl Strategy<Value = Vec<Employee>> {
    (1usize..24).prop_flat_map(|n| {
        prop::collection::vec(
            (0..n + 3, 0u8..4, 0u8..4, 0u8..3, 0u8..2),
            n,
        )
        .prop_map(move |rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (sup, s, d, v, f))| {
                    let sup = match sup {
                        m if m < n => format!("E{m}"),
                        m if m == n => String::new(),
                        m => format!("X{m}"),
                    };
                    emp(
                        &format!("E{i}"),
                        &sup,
                        &format!("U{s}"),
                        &format!("U{d}"),
                        &format!("U{v}"),
                        &format!("U{f}"),
                    )
                })
                .collect()
        })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn promotion_depth_is_bounded_by_level_count(records in arb_org()) {
        let index = HierarchyIndex::new(records);
        let resolver = Resolver::new(&index, Mode::Promotion);
        let resolution = resolver.resolve_all();
        prop_assert!(resolution.stats.max_depth <= Level::COUNT);
    }

    #[test]
    fn every_unit_gets_exactly_one_entry(records in arb_org()) {
        let index = HierarchyIndex::new(records);
        for mode in Mode::ALL {
            let resolution = Resolver::new(&index, mode).resolve_all();
            for level in Level::ALL {
                prop_assert_eq!(resolution.units(level).len(), index.unit_count(level));
            }
        }
    }

    #[test]
    fn chain_walks_terminate_within_the_org(records in arb_org()) {
        let index = HierarchyIndex::new(records);
        for employee in index.employees() {
            let walk = walk_chain(&index, employee);
            prop_assert!(walk.chain.len() < index.len());
            prop_assert!(!walk.chain.contains(&employee.user_id));
        }
    }

    #[test]
    fn second_resolve_is_served_from_cache(records in arb_org()) {
        let index = HierarchyIndex::new(records);
        for mode in Mode::ALL {
            let resolver = Resolver::new(&index, mode);
            let keys: Vec<_> = index.units().collect();
            let first: Vec<_> = keys.iter().map(|k| resolver.resolve_key(k)).collect();
            let misses = resolver.stats().cache.misses;
            let second: Vec<_> = keys.iter().map(|k| resolver.resolve_key(k)).collect();

            prop_assert_eq!(first, second);
            prop_assert_eq!(resolver.stats().cache.misses, misses);
            prop_assert_eq!(misses, keys.len());
        }
    }

    #[test]
    fn parallel_resolution_matches_sequential(records in arb_org()) {
        let index = HierarchyIndex::new(records);
        for mode in Mode::ALL {
            let sequential = Resolver::new(&index, mode).resolve_all();
            let parallel = Resolver::new(&index, mode).resolve_all_parallel();
            prop_assert_eq!(&sequential.units, &parallel.units);
            prop_assert_eq!(parallel.stats.cache.misses, index.units().count());
        }
    }
}
