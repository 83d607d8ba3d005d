//! Majority Voting for Supervisor Resolution
//!
//! No level of the hierarchy carries an explicit manager field. A unit's
//! supervisor is inferred from the people in it: every member cites their
//! direct manager, and the most-cited manager wins.
//!
//! # Determinism
//!
//! Counting is order-stable. When two candidates tie, the one cited first
//! in member order wins:
//!
//! ```text
//! winner = first c in citation order with votes(c) = max votes
//! ```
//!
//! Member order is ingestion order, so the same snapshot always produces
//! the same winner.
//!
//! The vote knows nothing about levels. It aggregates one column.

mod tally;
mod vote;

pub use tally::{Tally, Winner};
pub use vote::majority_supervisor;

#[cfg(test)]
mod tests {
    use super::*;
    use orgchain_hierarchy::{Employee, HierarchyIndex, Level};

    #[test]
    fn vote_over_indexed_unit() {
        let index = HierarchyIndex::new(vec![
            Employee::new("UA", "").reporting_to("UB").in_units("SA", "DA", "DDA", "FA"),
            Employee::new("UC", "").reporting_to("UB").in_units("SA", "DA", "DDA", "FA"),
            Employee::new("UB", "").reporting_to("UD").in_units("DA", "DA", "DDA", "FA"),
        ]);

        let section = majority_supervisor(index.members_of(Level::Section, "SA").iter());
        assert_eq!(section, Some(Winner { candidate: "UB", votes: 2 }));

        let missing = majority_supervisor(index.members_of(Level::Section, "ZZ").iter());
        assert!(missing.is_none());
    }
}
