//! Translation of HiGHS model-status codes into canonical states.

use highs_sys::HighsInt;
use tether_solver::State;
use tracing::warn;

pub(crate) const MODEL_STATUS_MODEL_EMPTY: HighsInt = 6;

/// Every HiGHS model status, indexed by its code.
pub const MODEL_STATUS_TABLE: [(&str, State); 19] = [
    ("not_set", State::Unexplored),
    ("load_error", State::Failed),
    ("model_error", State::Failed),
    ("presolve_error", State::Failed),
    ("solve_error", State::Failed),
    ("postsolve_error", State::Failed),
    ("model_empty", State::Optimal),
    ("optimal", State::Optimal),
    ("infeasible", State::Infeasible),
    ("unbounded_or_infeasible", State::Invalid),
    ("unbounded", State::Unbounded),
    ("objective_bound", State::Approximate),
    ("objective_target", State::Approximate),
    ("time_limit", State::Approximate),
    ("iteration_limit", State::Approximate),
    ("unknown", State::Failed),
    ("solution_limit", State::Approximate),
    ("interrupt", State::Unexplored),
    ("memory_limit", State::Failed),
];

fn entry(code: HighsInt) -> Option<&'static (&'static str, State)> {
    usize::try_from(code)
        .ok()
        .and_then(|index| MODEL_STATUS_TABLE.get(index))
}

/// Map a HiGHS model-status code to a canonical state.
///
/// Codes outside the table map to [`State::Failed`].
pub fn translate(code: HighsInt) -> State {
    match entry(code) {
        Some(&(_, state)) => state,
        None => {
            warn!(
                component = "status",
                operation = "translate",
                status = "warn",
                status_code = code,
                "Unmapped HiGHS model status; treating as failed"
            );
            State::Failed
        }
    }
}

/// HiGHS name of a model-status code, for logs.
pub fn status_name(code: HighsInt) -> &'static str {
    entry(code).map_or("unmapped", |&(name, _)| name)
}
