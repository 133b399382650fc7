use crate::dictionary::Dictionary;
use rand::rngs::ThreadRng;
use rand::seq::SliceRandom;
use rand::Rng;
use std::num::NonZeroUsize;
use std::ops::Index;

/// Ordered words a session is typed against. Immutable once generated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WordStream(Vec<String>);

impl WordStream {
    pub fn words(&self) -> &[String] {
        &self.0
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.0.get(idx).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Index<usize> for WordStream {
    type Output = str;

    fn index(&self, idx: usize) -> &str {
        &self.0[idx]
    }
}

impl From<Vec<String>> for WordStream {
    fn from(words: Vec<String>) -> Self {
        Self(words)
    }
}

/// Strategy for drawing a session's words out of a dictionary
pub trait WordSource {
    fn generate(&mut self, count: NonZeroUsize, dictionary: &Dictionary) -> WordStream;
}

/// Uniform draws with replacement: duplicates allowed, order as drawn.
#[derive(Debug)]
pub struct RandomWordSource<R: Rng = ThreadRng> {
    rng: R,
}

impl RandomWordSource<ThreadRng> {
    pub fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }
}

impl Default for RandomWordSource<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> RandomWordSource<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> WordSource for RandomWordSource<R> {
    fn generate(&mut self, count: NonZeroUsize, dictionary: &Dictionary) -> WordStream {
        let words = dictionary.words();
        (0..count.get())
            .filter_map(|_| words.choose(&mut self.rng).cloned())
            .collect::<Vec<_>>()
            .into()
    }
}

/// Replays a fixed sequence of dictionary indices, cycling when exhausted.
/// Indices wrap modulo the dictionary size.
#[derive(Clone, Debug)]
pub struct IndexedWordSource {
    indices: Vec<usize>,
    next: usize,
}

impl IndexedWordSource {
    pub fn new(indices: Vec<usize>) -> Self {
        Self { indices, next: 0 }
    }
}

impl WordSource for IndexedWordSource {
    fn generate(&mut self, count: NonZeroUsize, dictionary: &Dictionary) -> WordStream {
        let words = dictionary.words();
        let mut stream = Vec::with_capacity(count.get());
        for _ in 0..count.get() {
            let idx = if self.indices.is_empty() {
                0
            } else {
                let idx = self.indices[self.next % self.indices.len()];
                self.next += 1;
                idx
            };
            stream.push(words[idx % words.len()].clone());
        }
        stream.into()
    }
}
