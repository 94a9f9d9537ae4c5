//! Fuzzy keyword matching against the knowledge base.

use std::collections::HashSet;

use chatbox_model::Entry;

use crate::error::Error;

/// Similarity cutoffs tried by [`Matcher::find`], strictest first.
pub const DEFAULT_THRESHOLDS: [f64; 12] = [
    1.0, 0.98, 0.95, 0.92, 0.9, 0.85, 0.8, 0.75, 0.7, 0.65, 0.6, 0.55,
];

/// A strictly descending sequence of similarity cutoffs in `(0, 1]`.
///
/// The lower bound is exclusive so that a query sharing no word with a
/// keyword can never match it.
#[derive(Clone, Debug, PartialEq)]
pub struct ThresholdLadder(Vec<f64>);

impl ThresholdLadder {
    /// Creates a ladder, validating the thresholds.
    pub fn new<I: Into<Vec<f64>>>(thresholds: I) -> Result<Self, Error> {
        let thresholds = thresholds.into();
        if thresholds.is_empty() {
            return Err(
                Error::invalid_config().with_reason("threshold ladder is empty")
            );
        }
        if let Some(t) = thresholds.iter().find(|t| !(**t > 0.0 && **t <= 1.0))
        {
            return Err(Error::invalid_config()
                .with_reason(format!("threshold {t} is not in (0, 1]")));
        }
        if thresholds.windows(2).any(|w| w[0] <= w[1]) {
            return Err(Error::invalid_config()
                .with_reason("thresholds must be strictly descending"));
        }
        Ok(Self(thresholds))
    }

    /// Returns the thresholds, strictest first.
    #[inline]
    pub fn thresholds(&self) -> &[f64] {
        &self.0
    }
}

impl Default for ThresholdLadder {
    #[inline]
    fn default() -> Self {
        Self(DEFAULT_THRESHOLDS.to_vec())
    }
}

/// Lowercases `text`, drops everything but ASCII letters, digits and
/// whitespace, and splits it into words.
pub fn normalize(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| {
            c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace()
        })
        .collect();
    cleaned.split_whitespace().map(str::to_owned).collect()
}

/// Jaccard similarity of two word sets.
///
/// Two empty sets score `0`.
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}

struct IndexedEntry {
    entry: Entry,
    words: HashSet<String>,
    word_count: usize,
}

/// The best entry for a query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Match<'a> {
    /// The matched entry.
    pub entry: &'a Entry,
    /// Position of the entry in the knowledge base.
    pub index: usize,
    /// Jaccard similarity between the query and the entry's keyword.
    pub score: f64,
    /// The first threshold of the ladder this match satisfied.
    pub threshold: f64,
}

impl<'a> Match<'a> {
    /// Returns the answer of the matched entry.
    #[inline]
    pub fn answer(&self) -> &'a str {
        &self.entry.answer
    }
}

/// Picks answers from a fixed knowledge base.
///
/// Thresholds are tried from strictest to loosest, and the first one that
/// any entry satisfies decides the result, even if a looser threshold
/// would have admitted another entry. Within a threshold the highest score
/// wins, then the keyword with more words, then the earlier entry.
pub struct Matcher {
    entries: Vec<IndexedEntry>,
    ladder: ThresholdLadder,
}

impl Matcher {
    /// Creates a matcher over `entries`, keeping their order.
    pub fn new<I>(entries: I, ladder: ThresholdLadder) -> Self
    where
        I: IntoIterator<Item = Entry>,
    {
        let entries = entries
            .into_iter()
            .map(|entry| {
                let words = normalize(&entry.keyword);
                IndexedEntry {
                    word_count: words.len(),
                    words: words.into_iter().collect(),
                    entry,
                }
            })
            .collect();
        Self { entries, ladder }
    }

    /// Returns the number of entries in the knowledge base.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the knowledge base is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finds the best entry for `query`, or `None` if no threshold of the
    /// ladder is satisfied by any entry.
    pub fn find(&self, query: &str) -> Option<Match<'_>> {
        let query_words: HashSet<String> = normalize(query).into_iter().collect();
        let scores: Vec<f64> = self
            .entries
            .iter()
            .map(|e| jaccard(&e.words, &query_words))
            .collect();

        for &threshold in self.ladder.thresholds() {
            let mut best: Option<(usize, f64)> = None;
            for (idx, &score) in scores.iter().enumerate() {
                if score < threshold {
                    continue;
                }
                let better = match best {
                    None => true,
                    Some((best_idx, best_score)) => {
                        score > best_score
                            || (score == best_score
                                && self.entries[idx].word_count
                                    > self.entries[best_idx].word_count)
                    }
                };
                if better {
                    best = Some((idx, score));
                }
            }

            if let Some((index, score)) = best {
                trace!("matched entry {index} with score {score} at {threshold}");
                return Some(Match {
                    entry: &self.entries[index].entry,
                    index,
                    score,
                    threshold,
                });
            }
        }

        trace!("no entry matched");
        None
    }
}
