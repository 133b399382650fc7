/// Outcome of comparing one submitted word against its target
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WordScore {
    pub error_count: usize,
    /// characters in the submitted word
    pub length: usize,
}

/// Positional mismatches plus the length difference, counted in chars.
pub fn score(expected: &str, submitted: &str) -> WordScore {
    let positional = expected
        .chars()
        .zip(submitted.chars())
        .filter(|(e, s)| e != s)
        .count();

    let expected_len = expected.chars().count();
    let submitted_len = submitted.chars().count();

    WordScore {
        error_count: positional + expected_len.abs_diff(submitted_len),
        length: submitted_len,
    }
}

/// Running totals for one session
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    pub typed_word_count: usize,
    pub error_count: usize,
    pub total_chars_typed: usize,
}

impl Tally {
    pub fn record(&mut self, word: WordScore) {
        self.typed_word_count += 1;
        self.error_count += word.error_count;
        self.total_chars_typed += word.length;
    }
}

/// Final figures, frozen when the session ends
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionResults {
    pub wpm: u32,
    pub accuracy: u8,
}

impl SessionResults {
    pub fn compute(tally: &Tally, elapsed_secs: u32) -> Self {
        Self {
            wpm: words_per_minute(tally.typed_word_count, elapsed_secs),
            accuracy: accuracy(tally.total_chars_typed, tally.error_count),
        }
    }
}

pub fn words_per_minute(typed_words: usize, elapsed_secs: u32) -> u32 {
    let minutes = f64::from(elapsed_secs) / 60.0;
    if minutes > 0.0 {
        (typed_words as f64 / minutes).round() as u32
    } else {
        0
    }
}

/// Percentage of typed chars that were right. Clamped at 0 when the error
/// count outgrows the typed chars (short submissions for long targets).
pub fn accuracy(total_chars_typed: usize, error_count: usize) -> u8 {
    if total_chars_typed == 0 {
        return 100;
    }

    let correct = total_chars_typed as f64 - error_count as f64;
    (100.0 * correct / total_chars_typed as f64)
        .round()
        .clamp(0.0, 100.0) as u8
}
