use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Accumulated timings for one named scope.
#[derive(Debug, Clone)]
pub struct ScopeStats {
    pub name: &'static str,
    pub calls: u64,
    pub total: Duration,
    pub max: Duration,
    pub last: Duration,
}

impl ScopeStats {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            calls: 0,
            total: Duration::ZERO,
            max: Duration::ZERO,
            last: Duration::ZERO,
        }
    }

    pub fn mean(&self) -> Duration {
        if self.calls == 0 {
            return Duration::ZERO;
        }
        self.total.div_f64(self.calls as f64)
    }
}

/// Collects scope timings in first-seen order.
#[derive(Debug)]
pub struct Profiler {
    enabled: bool,
    scopes: Vec<ScopeStats>,
    index: HashMap<&'static str, usize>,
}

impl Default for Profiler {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Profiler {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            scopes: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Runs `f` and records its duration under `name`.
    pub fn measure<R>(&mut self, name: &'static str, f: impl FnOnce() -> R) -> R {
        if !self.enabled {
            return f();
        }
        let start = Instant::now();
        let out = f();
        self.record(name, start.elapsed());
        out
    }

    pub fn record(&mut self, name: &'static str, elapsed: Duration) {
        let i = match self.index.get(name) {
            Some(&i) => i,
            None => {
                self.scopes.push(ScopeStats::new(name));
                self.index.insert(name, self.scopes.len() - 1);
                self.scopes.len() - 1
            }
        };

        let s = &mut self.scopes[i];
        s.calls += 1;
        s.total += elapsed;
        s.last = elapsed;
        s.max = s.max.max(elapsed);
    }

    pub fn scope(&self, name: &str) -> Option<&ScopeStats> {
        self.index.get(name).map(|&i| &self.scopes[i])
    }

    pub fn scopes(&self) -> &[ScopeStats] {
        &self.scopes
    }

    /// Logs every scope at debug level and starts a new window.
    pub fn report(&mut self) {
        if !self.enabled {
            return;
        }
        for s in &self.scopes {
            log::debug!(
                target: "profiler",
                "{}: {} calls, mean {:?}, max {:?}",
                s.name,
                s.calls,
                s.mean(),
                s.max
            );
        }
        for s in &mut self.scopes {
            let name = s.name;
            *s = ScopeStats::new(name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_first_seen_order() {
        let mut p = Profiler::default();
        p.record("b", Duration::from_millis(2));
        p.record("a", Duration::from_millis(1));
        p.record("b", Duration::from_millis(4));

        let names: Vec<_> = p.scopes().iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["b", "a"]);

        let b = p.scope("b").unwrap();
        assert_eq!(b.calls, 2);
        assert_eq!(b.max, Duration::from_millis(4));
        assert_eq!(b.mean(), Duration::from_millis(3));
    }

    #[test]
    fn mean_survives_call_counts_past_u32() {
        let stats = ScopeStats {
            calls: 1 << 32,
            total: Duration::from_secs(1 << 32),
            ..ScopeStats::new("hot")
        };
        assert_eq!(stats.mean(), Duration::from_secs(1));
    }

    #[test]
    fn disabled_profiler_still_runs_closure() {
        let mut p = Profiler::new(false);
        let v = p.measure("x", || 7);
        assert_eq!(v, 7);
        assert!(p.scope("x").is_none());
    }

    #[test]
    fn report_resets_window() {
        let mut p = Profiler::default();
        p.measure("physics", || ());
        p.report();
        assert_eq!(p.scope("physics").unwrap().calls, 0);
    }
}
