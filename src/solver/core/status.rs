// ---------------------------------
// Solver status type
// ---------------------------------

/// Status of solver at termination.  The numeric codes returned by
/// [`code`](SolverStatus::code) are those used by lp_solve.

#[repr(i32)]
#[derive(PartialEq, Eq, Clone, Debug, Copy, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolverStatus {
    /// Not enough memory to build the working problem.
    NoMemory = -2,
    /// Problem is not solved (solver hasn't run, or the model changed since).
    #[default]
    NotRun = -1,
    /// Solver terminated with an optimal solution.
    Optimal = 0,
    /// A feasible solution was found but optimality was not proven
    /// (break at first / break at value, timeout or abort with an incumbent,
    /// truncated branch-and-bound tree).
    SubOptimal = 1,
    /// Problem is infeasible.
    Infeasible = 2,
    /// Problem is unbounded.
    Unbounded = 3,
    /// Reserved.   Degeneracy is always handled internally.
    Degenerate = 4,
    /// Solver terminated with a numerical failure.
    NumFailure = 5,
    /// The abort callback requested termination.
    UserAborted = 6,
    /// Time limit reached before a solution was found.
    TimedOut = 7,
    /// Presolve eliminated the whole problem.   The solution is complete.
    PreSolved = 9,
    /// The final solution failed the accuracy check.
    AccuracyError = 25,
}

impl SolverStatus {
    /// lp_solve compatible numeric code
    pub fn code(self) -> i32 {
        self as i32
    }

    /// true if primal values of a feasible solution are available
    pub fn has_solution(self) -> bool {
        matches!(
            self,
            SolverStatus::Optimal | SolverStatus::SubOptimal | SolverStatus::PreSolved
        )
    }
}

impl std::fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[test]
fn test_status_codes() {
    assert_eq!(SolverStatus::default(), SolverStatus::NotRun);
    assert_eq!(SolverStatus::NotRun.code(), -1);
    assert_eq!(SolverStatus::Infeasible.code(), 2);
    assert_eq!(SolverStatus::PreSolved.code(), 9);
    assert_eq!(SolverStatus::AccuracyError.code(), 25);
    assert!(SolverStatus::SubOptimal.has_solution());
    assert!(!SolverStatus::TimedOut.has_solution());
}
