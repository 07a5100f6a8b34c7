//! Lexicographic k-combinations of positions `0..n`

/// Walks every `k`-element combination of `0..n` in lexicographic order,
/// reusing one index buffer.
#[derive(Debug, Clone)]
pub struct Combinations {
    n: usize,
    indices: Vec<usize>,
    started: bool,
    done: bool,
}

impl Combinations {
    /// Combinations of size `k` drawn from `0..n`; empty when `k == 0` or `k > n`
    pub fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            indices: (0..k).collect(),
            started: false,
            done: k == 0 || k > n,
        }
    }

    /// Advance to the next combination, or `None` once all have been produced
    pub fn next_combination(&mut self) -> Option<&[usize]> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(&self.indices);
        }

        let k = self.indices.len();
        // Rightmost index that has not reached its final value n - k + i
        let mut i = k;
        loop {
            if i == 0 {
                self.done = true;
                return None;
            }
            i -= 1;
            if self.indices[i] < self.n - k + i {
                break;
            }
        }

        self.indices[i] += 1;
        for j in i + 1..k {
            self.indices[j] = self.indices[j - 1] + 1;
        }
        Some(&self.indices)
    }
}
