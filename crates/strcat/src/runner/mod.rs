pub mod config;
pub mod report;
pub mod suite;


use crate::alloc::{AllocSource, AllocStats};
use crate::error::{Error, Result};
use crate::input;
use config::{BenchTime, RunnerConfig};
use regex::Regex;
use report::BenchResult;
use std::hint::black_box;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};
use suite::{Benchmark, Suite};
use tracing::{debug, info, warn};

pub const MAX_ITERATIONS: u64 = 1_000_000_000;

/// Timing state handed to a benchmark body for one run of `n` iterations.
pub struct Bencher<'a> {
    n: u64,
    timer_on: bool,
    start: Instant,
    duration: Duration,
    alloc_source: Option<&'a dyn AllocSource>,
    start_allocs: AllocStats,
    net_allocs: AllocStats,
}

impl<'a> Bencher<'a> {
    fn new(n: u64, alloc_source: Option<&'a dyn AllocSource>) -> Self {
        Self {
            n,
            timer_on: false,
            start: Instant::now(),
            duration: Duration::ZERO,
            alloc_source,
            start_allocs: AllocStats::default(),
            net_allocs: AllocStats::default(),
        }
    }

    pub fn iterations(&self) -> u64 {
        self.n
    }

    fn allocs_now(&self) -> AllocStats {
        self.alloc_source.map(AllocSource::snapshot).unwrap_or_default()
    }

    pub fn start_timer(&mut self) {
        if !self.timer_on {
            self.start_allocs = self.allocs_now();
            self.start = Instant::now();
            self.timer_on = true;
        }
    }

    pub fn stop_timer(&mut self) {
        if self.timer_on {
            self.duration += self.start.elapsed();
            let delta = self.allocs_now().since(self.start_allocs);
            self.net_allocs.allocs += delta.allocs;
            self.net_allocs.bytes += delta.bytes;
            self.timer_on = false;
        }
    }

    /// Zeroes elapsed time and allocation counters without stopping the timer.
    pub fn reset_timer(&mut self) {
        if self.timer_on {
            self.start_allocs = self.allocs_now();
            self.start = Instant::now();
        }
        self.duration = Duration::ZERO;
        self.net_allocs = AllocStats::default();
    }

    /// Runs `routine` exactly `n` times, discarding each result through `black_box`.
    pub fn iter<T>(&mut self, mut routine: impl FnMut() -> T) {
        for _ in 0..self.n {
            black_box(routine());
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measurement {
    pub iterations: u64,
    pub duration: Duration,
    pub allocs: Option<AllocStats>,
}

fn run_n<F>(n: u64, alloc_source: Option<&dyn AllocSource>, body: &mut F) -> Measurement
where
    F: FnMut(&mut Bencher<'_>),
{
    let mut b = Bencher::new(n, alloc_source);
    b.start_timer();
    body(&mut b);
    b.stop_timer();

    Measurement {
        iterations: n,
        duration: b.duration,
        allocs: alloc_source.map(|_| b.net_allocs),
    }
}

/// Predicts the next iteration count from the previous run, growing at most 100x per round.
fn next_iterations(goal: Duration, last: &Measurement) -> u64 {
    let prev_ns = last.duration.as_nanos().max(1);
    let predicted = goal.as_nanos() * u128::from(last.iterations) / prev_ns;
    let predicted = u64::try_from(predicted).unwrap_or(MAX_ITERATIONS);

    let n = predicted.saturating_add(predicted / 5);
    n.min(last.iterations.saturating_mul(100))
        .max(last.iterations + 1)
        .min(MAX_ITERATIONS)
}

/// Runs `body` with increasing iteration counts until the benchtime is reached.
pub fn launch<F>(
    benchtime: BenchTime,
    alloc_source: Option<&dyn AllocSource>,
    mut body: F,
) -> Measurement
where
    F: FnMut(&mut Bencher<'_>),
{
    let mut last = run_n(1, alloc_source, &mut body);

    match benchtime {
        BenchTime::Iterations(n) => {
            if n > 1 {
                last = run_n(n, alloc_source, &mut body);
            }
        }
        BenchTime::Duration(goal) => {
            while last.duration < goal && last.iterations < MAX_ITERATIONS {
                let n = next_iterations(goal, &last);
                debug!(
                    previous = last.iterations,
                    elapsed_ns = last.duration.as_nanos() as u64,
                    next = n,
                    "calibrating iteration count"
                );
                last = run_n(n, alloc_source, &mut body);
            }
        }
    }

    last
}

/// Setup is excluded: input is generated before the timer is reset.
pub fn run_benchmark(b: &mut Bencher<'_>, bench: &Benchmark) {
    let parts = input::generate(bench.size);
    b.reset_timer();
    b.iter(|| bench.strategy.concat(&parts));
}

pub struct Runner {
    config: RunnerConfig,
    pattern: Regex,
    alloc_source: Option<&'static dyn AllocSource>,
    procs: usize,
}

impl Runner {
    pub fn new(config: RunnerConfig) -> Result<Self> {
        config.validate()?;

        let pattern = Regex::new(&config.pattern).map_err(|source| Error::InvalidPattern {
            pattern: config.pattern.clone(),
            source,
        })?;

        let procs = std::thread::available_parallelism().map_or(1, NonZeroUsize::get);

        Ok(Self { config, pattern, alloc_source: None, procs })
    }

    #[must_use]
    pub fn with_alloc_source(mut self, alloc_source: &'static dyn AllocSource) -> Self {
        self.alloc_source = Some(alloc_source);
        self
    }

    pub fn suite(&self) -> Suite {
        Suite::new(&self.config.sizes)
    }

    pub fn selected(&self) -> Vec<Benchmark> {
        self.suite().select(&self.pattern)
    }

    pub fn display_name(&self, bench: &Benchmark) -> String {
        if self.procs > 1 { format!("{}-{}", bench.name(), self.procs) } else { bench.name() }
    }

    pub fn name_width(&self, benchmarks: &[Benchmark]) -> usize {
        benchmarks.iter().map(|bench| self.display_name(bench).len()).max().unwrap_or(0)
    }

    pub fn run_one(&self, bench: &Benchmark) -> BenchResult {
        let measurement =
            launch(self.config.benchtime, self.alloc_source, |b| run_benchmark(b, bench));
        let result = BenchResult::new(
            self.display_name(bench),
            measurement.iterations,
            measurement.duration,
            measurement.allocs,
        );

        info!(
            benchmark = %result.name,
            iterations = result.iterations,
            ns_per_op = result.ns_per_op,
            "benchmark finished"
        );

        result
    }

    /// Runs every selected benchmark `count` times, handing each result to `on_result`
    /// as it completes.
    pub fn run<F>(&self, mut on_result: F) -> Result<Vec<BenchResult>>
    where
        F: FnMut(&BenchResult) -> Result<()>,
    {
        let selected = self.selected();
        if selected.is_empty() {
            warn!(pattern = %self.config.pattern, "no benchmarks match the selection");
            return Ok(Vec::new());
        }

        debug!(
            selected = selected.len(),
            benchtime = %self.config.benchtime,
            count = self.config.count,
            "running benchmarks"
        );

        let mut results = Vec::with_capacity(selected.len() * self.config.count as usize);
        for bench in &selected {
            for _ in 0..self.config.count {
                let result = self.run_one(bench);
                on_result(&result)?;
                results.push(result);
            }
        }

        Ok(results)
    }
}
