use crate::runner::config::DEFAULT_SIZES;
use crate::strategy::Strategy;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Benchmark {
    pub strategy: Strategy,
    pub size: usize,
}

impl Benchmark {
    pub fn new(strategy: Strategy, size: usize) -> Self {
        Self { strategy, size }
    }

    pub fn name(&self) -> String {
        format!("Benchmark{}{}", self.strategy, self.size)
    }
}

/// Every strategy crossed with every size, strategy-major.
#[derive(Debug, Clone)]
pub struct Suite {
    benchmarks: Vec<Benchmark>,
}

impl Default for Suite {
    fn default() -> Self {
        Self::new(&DEFAULT_SIZES)
    }
}

impl Suite {
    pub fn new(sizes: &[usize]) -> Self {
        let benchmarks = Strategy::ALL
            .iter()
            .flat_map(|&strategy| sizes.iter().map(move |&size| Benchmark::new(strategy, size)))
            .collect();

        Self { benchmarks }
    }

    pub fn select(&self, pattern: &Regex) -> Vec<Benchmark> {
        self.benchmarks.iter().filter(|bench| pattern.is_match(&bench.name())).copied().collect()
    }
}
