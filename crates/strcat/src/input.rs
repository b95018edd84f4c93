use std::sync::atomic::{AtomicU64, Ordering};

static NEXT: AtomicU64 = AtomicU64::new(0);

/// Returns a short token that differs from the previous call's.
pub fn next_string() -> String {
    let id = NEXT.fetch_add(1, Ordering::Relaxed);
    format!("s{id}")
}

/// Builds the input sequence for one benchmark by calling [`next_string`] `n` times.
pub fn generate(n: usize) -> Vec<String> {
    let mut parts = Vec::with_capacity(n);
    for _ in 0..n {
        parts.push(next_string());
    }
    parts
}

pub fn repeat(part: &str, n: usize) -> Vec<String> {
    vec![part.to_string(); n]
}
