use std::collections::BTreeMap;
use std::io::Write;
use std::time::Duration;

#[cfg(not(target_family = "wasm"))]
use std::time::Instant;
#[cfg(target_family = "wasm")]
use web_time::Instant;

#[derive(Debug, Default)]
struct PhaseTimer {
    started: Option<Instant>,
    elapsed: Duration,
    children: BTreeMap<&'static str, PhaseTimer>,
}

impl PhaseTimer {
    fn stop(&mut self) {
        if let Some(t) = self.started.take() {
            self.elapsed += t.elapsed();
        }
    }

    fn print(&self, out: &mut dyn Write, depth: usize) -> std::io::Result<()> {
        for (name, t) in self.children.iter() {
            writeln!(out, "{:indent$}{} : {:?}", "", name, t.elapsed, indent = 4 * depth)?;
            t.print(out, depth + 1)?;
        }
        Ok(())
    }
}

/// Wall-clock time per solve phase. A phase started while another is
/// running is recorded as its child.
#[derive(Debug, Default)]
pub struct Timers {
    root: PhaseTimer,
    stack: Vec<&'static str>,
}

impl Timers {
    fn current(&mut self) -> &mut PhaseTimer {
        let mut t = &mut self.root;
        for key in self.stack.iter() {
            t = t.children.entry(*key).or_default();
        }
        t
    }

    pub fn start_as_current(&mut self, key: &'static str) {
        let t = self.current().children.entry(key).or_default();
        t.started = Some(Instant::now());
        self.stack.push(key);
    }

    pub fn stop_current(&mut self) {
        self.current().stop();
        self.stack.pop();
    }

    /// time accumulated in the top level phase `key`
    pub fn elapsed(&self, key: &'static str) -> Duration {
        self.root
            .children
            .get(key)
            .map_or(Duration::ZERO, |t| t.elapsed)
    }

    /// one line per phase, children indented under their parent
    pub fn print(&self, out: &mut dyn Write) -> std::io::Result<()> {
        self.root.print(out, 0)
    }
}

macro_rules! timeit {
    ($timer:ident => $key:literal; $($tt:tt)+) => {
        $timer.start_as_current($key);
        $(
            $tt
        )+
        $timer.stop_current();
    }
}
pub(crate) use timeit;

#[test]
fn test_nested_timers() {
    let mut timers = Timers::default();

    timeit! {timers => "solve";
        timeit! {timers => "presolve";
            std::thread::sleep(Duration::from_millis(2));
        }
    }

    assert!(timers.elapsed("solve") >= Duration::from_millis(2));
    assert_eq!(timers.elapsed("presolve"), Duration::ZERO);
    assert_eq!(timers.elapsed("missing"), Duration::ZERO);

    let mut buffer = Vec::new();
    timers.print(&mut buffer).unwrap();
    let text = String::from_utf8(buffer).unwrap();
    assert!(text.starts_with("solve : "));
    assert!(text.contains("\n    presolve : "));
}
