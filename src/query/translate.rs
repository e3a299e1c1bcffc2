use chrono::Duration;

use super::{Bound, Clause, SearchQuery};
use crate::filter::MachineFilter;

/// Translate a filter into a search query.
///
/// One clause per set field, always in the order floor, pos, type, status,
/// duration, so equal filters render identical query strings.
pub fn translate(filter: &MachineFilter) -> SearchQuery {
    let mut clauses = Vec::new();

    if let Some(floor) = filter.floor {
        clauses.push(Clause::point("floor", i64::from(floor)));
    }
    if let Some(pos) = filter.pos {
        clauses.push(Clause::point("pos", i64::from(pos)));
    }
    if let Some(machine_type) = filter.machine_type {
        clauses.push(Clause::tag("type", machine_type.as_str()));
    }
    if let Some(status) = filter.status {
        clauses.push(Clause::tag("status", status.as_str()));
    }
    if filter.min_duration.is_some() || filter.max_duration.is_some() {
        clauses.push(Clause::range(
            "duration",
            bound_or(filter.min_duration, Bound::NegInfinity),
            bound_or(filter.max_duration, Bound::PosInfinity),
        ));
    }

    SearchQuery::new(clauses)
}

fn bound_or(duration: Option<Duration>, open: Bound) -> Bound {
    duration.map_or(open, |d| Bound::Value(d.num_seconds()))
}
