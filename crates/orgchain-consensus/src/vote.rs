//! Votes over employee columns.

use crate::tally::{Tally, Winner};
use orgchain_hierarchy::Employee;

/// Most-cited direct manager among `members`.
///
/// Empty manager references do not vote. Ties go to the manager cited
/// first in member order. `None` when nobody has a manager.
pub fn majority_supervisor<'a, I>(members: I) -> Option<Winner<'a>>
where
    I: IntoIterator<Item = &'a Employee>,
{
    members
        .into_iter()
        .filter_map(Employee::supervisor)
        .collect::<Tally<'a>>()
        .winner()
}
