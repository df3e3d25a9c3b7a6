use super::callbacks::{SolveProgress, SolverCallbacks};
use super::options::{MsgMask, Verbosity};
use super::settings::SolverSettings;
use super::status::SolverStatus;
use crate::io::PrintTarget;
use std::fmt;
use std::io::Write;
use std::time::Duration;

#[cfg(not(target_family = "wasm"))]
use std::time::Instant;
#[cfg(target_family = "wasm")]
use web_time::Instant;

/// Per-solve environment shared by the presolve, simplex and
/// branch-and-bound stages: print stream, callbacks, clock and the
/// progress counters reported to the user.
pub(crate) struct SolveContext<'a> {
    pub callbacks: &'a mut SolverCallbacks,
    pub stream: &'a mut PrintTarget,
    pub verbose: Verbosity,
    pub progress: SolveProgress,
    start: Instant,
    timeout: Option<Duration>,
    stop: Option<SolverStatus>,
}

impl<'a> SolveContext<'a> {
    pub fn new(
        callbacks: &'a mut SolverCallbacks,
        stream: &'a mut PrintTarget,
        settings: &SolverSettings,
    ) -> Self {
        let timeout = (settings.timeout > 0).then(|| Duration::from_secs(settings.timeout));
        Self {
            callbacks,
            stream,
            verbose: settings.verbose,
            progress: SolveProgress::default(),
            start: Instant::now(),
            timeout,
            stop: None,
        }
    }

    /// print a message at print level `level` and forward it to the log callback
    pub fn report(&mut self, level: Verbosity, args: fmt::Arguments<'_>) {
        if level > self.verbose || level == Verbosity::Neutral {
            return;
        }
        let text = args.to_string();
        // output failures never abort a solve
        let _ = writeln!(self.stream, "{}", text);
        self.callbacks.log(&text);
    }

    pub fn is_verbose(&self, level: Verbosity) -> bool {
        level <= self.verbose && level != Verbosity::Neutral
    }

    /// seconds since the solve started
    pub fn elapsed(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    /// Poll the timeout and the abort callback.  Once a stop has been
    /// requested it stays requested for the remainder of the solve.
    pub fn check_stop(&mut self) -> Option<SolverStatus> {
        if self.stop.is_some() {
            return self.stop;
        }
        self.progress.elapsed = self.elapsed();

        if let Some(limit) = self.timeout {
            if self.start.elapsed() >= limit {
                self.stop = Some(SolverStatus::TimedOut);
                return self.stop;
            }
        }
        if self.callbacks.check_abort(&self.progress) {
            self.stop = Some(SolverStatus::UserAborted);
        }
        self.stop
    }

    /// forward a solver event to the message callback
    pub fn message(&mut self, msg: MsgMask) {
        self.progress.elapsed = self.elapsed();
        self.callbacks.message(&self.progress, msg);
    }
}

macro_rules! report {
    ($ctx:expr, $level:expr, $($arg:tt)+) => {
        $ctx.report($level, format_args!($($arg)+))
    };
}
pub(crate) use report;

#[test]
fn test_context_stop_and_report() {
    use crate::io::ConfigurablePrintTarget;
    use std::sync::{Arc, Mutex};

    let mut callbacks = SolverCallbacks::new();
    let lines = Arc::new(Mutex::new(Vec::<String>::new()));
    let sink = lines.clone();
    callbacks.set_log_callback(move |s| sink.lock().unwrap().push(s.to_string()));
    callbacks.set_abort_callback(|p| p.nodes >= 2);

    let mut stream = PrintTarget::default();
    stream.print_to_buffer();

    let settings = SolverSettings {
        verbose: Verbosity::Normal,
        ..SolverSettings::default()
    };
    let mut ctx = SolveContext::new(&mut callbacks, &mut stream, &settings);

    report!(ctx, Verbosity::Normal, "rows {}", 3);
    report!(ctx, Verbosity::Detailed, "hidden");
    assert!(ctx.check_stop().is_none());
    ctx.progress.nodes = 2;
    assert_eq!(ctx.check_stop(), Some(SolverStatus::UserAborted));
    ctx.progress.nodes = 0;
    assert_eq!(ctx.check_stop(), Some(SolverStatus::UserAborted));

    assert_eq!(*lines.lock().unwrap(), vec!["rows 3".to_string()]);
    assert_eq!(stream.get_print_buffer().unwrap(), "rows 3\n");
}
