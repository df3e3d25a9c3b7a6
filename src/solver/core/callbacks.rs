use super::options::{BranchMode, MsgMask};

// ---------------------------------
// progress information passed to callbacks
// ---------------------------------

/// Snapshot of the solve progress handed to the abort and message callbacks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolveProgress {
    /// simplex iterations so far, over all branch-and-bound nodes
    pub iterations: u64,
    /// branch-and-bound nodes solved so far
    pub nodes: u64,
    /// depth of the node currently being solved
    pub depth: u32,
    /// objective of the best integer feasible solution found so far
    pub incumbent: Option<f64>,
    /// number of improved or equal solutions found
    pub solution_count: u32,
    /// seconds since the solve started
    pub elapsed: f64,
}

/// Kind of variable offered to the node selector callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    Integer,
    SemiContinuous,
}

/// A column violating its integrality or semi-continuity requirement
/// in the current relaxation.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchCandidate {
    /// 1-based column index
    pub column: usize,
    /// value in the current relaxation
    pub value: f64,
    /// current lower bound of the column in this node
    pub lower: f64,
    /// current upper bound of the column in this node
    pub upper: f64,
    pub kind: CandidateKind,
}

// ---------------------------------
// callback storage
// ---------------------------------

pub(crate) type AbortFn = Box<dyn FnMut(&SolveProgress) -> bool + Send>;
pub(crate) type LogFn = Box<dyn FnMut(&str) + Send>;
pub(crate) type MessageFn = Box<dyn FnMut(&SolveProgress, MsgMask) + Send>;
pub(crate) type NodeSelectorFn = Box<dyn FnMut(&[BranchCandidate]) -> Option<usize> + Send>;
pub(crate) type BranchSelectorFn = Box<dyn FnMut(usize) -> BranchMode + Send>;

/// User callbacks invoked while solving.
///
/// A model keeps one set of callbacks that is used by
/// [`solve`](crate::solver::Model::solve).   A separate set can be injected
/// for a single solve with [`solve_with`](crate::solver::Model::solve_with).
#[derive(Default)]
pub struct SolverCallbacks {
    abort: Option<AbortFn>,
    log: Option<LogFn>,
    message: Option<(MsgMask, MessageFn)>,
    node_selector: Option<NodeSelectorFn>,
    branch_selector: Option<BranchSelectorFn>,
}

impl std::fmt::Debug for SolverCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolverCallbacks")
            .field("abort", &self.abort.is_some())
            .field("log", &self.log.is_some())
            .field("message", &self.message.as_ref().map(|(mask, _)| *mask))
            .field("node_selector", &self.node_selector.is_some())
            .field("branch_selector", &self.branch_selector.is_some())
            .finish()
    }
}

impl SolverCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a predicate polled at fixed iteration intervals.  Returning
    /// `true` stops the solve with status `UserAborted` (or `SubOptimal`
    /// if an integer solution is already known).
    pub fn set_abort_callback<F>(&mut self, f: F)
    where
        F: FnMut(&SolveProgress) -> bool + Send + 'static,
    {
        self.abort = Some(Box::new(f));
    }

    /// Install a receiver for every printed solver message
    pub fn set_log_callback<F>(&mut self, f: F)
    where
        F: FnMut(&str) + Send + 'static,
    {
        self.log = Some(Box::new(f));
    }

    /// Install a receiver for the solver events selected by `mask`
    pub fn set_message_callback<F>(&mut self, mask: MsgMask, f: F)
    where
        F: FnMut(&SolveProgress, MsgMask) + Send + 'static,
    {
        self.message = Some((mask, Box::new(f)));
    }

    /// Install a branching variable selector.  It receives every candidate
    /// of the current node and returns the chosen 1-based column, or `None`
    /// to fall back to the configured node rule.
    pub fn set_node_selector<F>(&mut self, f: F)
    where
        F: FnMut(&[BranchCandidate]) -> Option<usize> + Send + 'static,
    {
        self.node_selector = Some(Box::new(f));
    }

    /// Install a branching direction selector.  It receives the 1-based
    /// column about to be branched on.   Returning `BranchMode::Default`
    /// keeps the configured direction.
    pub fn set_branch_selector<F>(&mut self, f: F)
    where
        F: FnMut(usize) -> BranchMode + Send + 'static,
    {
        self.branch_selector = Some(Box::new(f));
    }

    /// remove every callback
    pub fn unset_all(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn check_abort(&mut self, progress: &SolveProgress) -> bool {
        match self.abort {
            Some(ref mut f) => f(progress),
            None => false,
        }
    }

    pub(crate) fn log(&mut self, message: &str) {
        if let Some(ref mut f) = self.log {
            f(message);
        }
    }

    pub(crate) fn message(&mut self, progress: &SolveProgress, msg: MsgMask) {
        if let Some((mask, ref mut f)) = self.message {
            if mask.intersects(msg) {
                f(progress, msg);
            }
        }
    }

    pub(crate) fn has_node_selector(&self) -> bool {
        self.node_selector.is_some()
    }

    pub(crate) fn select_node(&mut self, candidates: &[BranchCandidate]) -> Option<usize> {
        let f = self.node_selector.as_mut()?;
        let column = f(candidates)?;
        // only accept columns that were actually offered
        candidates.iter().any(|c| c.column == column).then_some(column)
    }

    pub(crate) fn select_branch(&mut self, column: usize) -> Option<BranchMode> {
        let f = self.branch_selector.as_mut()?;
        match f(column) {
            BranchMode::Default => None,
            mode => Some(mode),
        }
    }
}

#[test]
fn test_callbacks_dispatch() {
    use std::sync::{Arc, Mutex};

    let mut callbacks = SolverCallbacks::new();
    let progress = SolveProgress::default();
    assert!(!callbacks.check_abort(&progress));
    assert_eq!(callbacks.select_branch(1), None);

    callbacks.set_abort_callback(|p| p.iterations > 10);
    assert!(!callbacks.check_abort(&progress));
    let busy = SolveProgress {
        iterations: 11,
        ..SolveProgress::default()
    };
    assert!(callbacks.check_abort(&busy));

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    callbacks.set_message_callback(MsgMask::MILPBETTER, move |_, msg| {
        sink.lock().unwrap().push(msg);
    });
    callbacks.message(&progress, MsgMask::MILPEQUAL);
    callbacks.message(&progress, MsgMask::MILPBETTER);
    assert_eq!(*seen.lock().unwrap(), vec![MsgMask::MILPBETTER]);

    let candidates = vec![BranchCandidate {
        column: 3,
        value: 0.5,
        lower: 0.,
        upper: 1.,
        kind: CandidateKind::Integer,
    }];
    callbacks.set_node_selector(|_| Some(7));
    assert_eq!(callbacks.select_node(&candidates), None);
    callbacks.set_node_selector(|c| Some(c[0].column));
    assert_eq!(callbacks.select_node(&candidates), Some(3));

    callbacks.set_branch_selector(|_| BranchMode::Default);
    assert_eq!(callbacks.select_branch(3), None);

    callbacks.unset_all();
    assert!(!callbacks.has_node_selector());
}
