//! Rectangular alignments and per-column symbol counts.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::alphabet::{Alphabet, Resolution};
use crate::error::AlignmentError;

/// What to do with symbols the alphabet rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolPolicy {
    /// Fail the count at the first rejected symbol.
    #[default]
    Strict,
    /// Tally rejected symbols per column and carry on.
    Tolerant,
}

/// A multiple sequence alignment over one alphabet.
///
/// All rows have the same, non-zero length. Never mutated after construction.
#[derive(Debug, Clone)]
pub struct Alignment {
    alphabet: Arc<Alphabet>,
    rows: Vec<Vec<u8>>,
    weights: Option<Vec<f64>>,
    policy: SymbolPolicy,
}

impl Alignment {
    /// Create a new alignment, checking that it is non-empty and rectangular.
    pub fn new<I, S, A>(rows: I, alphabet: A) -> Result<Self, AlignmentError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
        A: Into<Arc<Alphabet>>,
    {
        let rows: Vec<Vec<u8>> = rows.into_iter().map(|r| r.as_ref().to_vec()).collect();
        let columns = rows.first().map(Vec::len).unwrap_or(0);
        if rows.is_empty() || columns == 0 {
            return Err(AlignmentError::Empty {
                rows: rows.len(),
                columns,
            });
        }
        if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != columns) {
            return Err(AlignmentError::Shape {
                row,
                expected: columns,
                found: r.len(),
            });
        }
        Ok(Self {
            alphabet: alphabet.into(),
            rows,
            weights: None,
            policy: SymbolPolicy::default(),
        })
    }

    /// Attach one weight per sequence. Weights must be finite and non-negative.
    pub fn with_weights(mut self, weights: Vec<f64>) -> Result<Self, AlignmentError> {
        if weights.len() != self.rows.len() {
            return Err(AlignmentError::Weights {
                message: format!(
                    "{} weights given for {} sequences",
                    weights.len(),
                    self.rows.len()
                ),
            });
        }
        if let Some((i, w)) = weights
            .iter()
            .enumerate()
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            return Err(AlignmentError::Weights {
                message: format!("weight {} of sequence {} is not a finite non-negative number", w, i),
            });
        }
        self.weights = Some(weights);
        Ok(self)
    }

    pub fn with_policy(mut self, policy: SymbolPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// Number of sequences.
    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of aligned positions.
    pub fn columns(&self) -> usize {
        self.rows[0].len()
    }

    fn weight(&self, row: usize) -> f64 {
        self.weights.as_ref().map(|w| w[row]).unwrap_or(1.0)
    }

    /// Count the symbols of every column.
    pub fn counts(&self) -> Result<CountMatrix, AlignmentError> {
        let k = self.alphabet.len();
        let mut columns = vec![ColumnCounts::new(k); self.columns()];
        let mut rejected = 0usize;

        for (i, row) in self.rows.iter().enumerate() {
            let w = self.weight(i);
            for (j, &symbol) in row.iter().enumerate() {
                let column = &mut columns[j];
                match self.alphabet.resolve(symbol) {
                    Ok(Resolution::Letter(x)) => column.letters[x] += w,
                    Ok(Resolution::Unknown) => column.unknown += w,
                    Ok(Resolution::Gap) => column.gap += w,
                    Err(invalid) => match self.policy {
                        SymbolPolicy::Strict => {
                            return Err(AlignmentError::Symbol {
                                row: i,
                                column: j,
                                symbol: invalid.0,
                            })
                        }
                        SymbolPolicy::Tolerant => {
                            column.rejected += w;
                            rejected += 1;
                        }
                    },
                }
            }
        }

        if rejected > 0 {
            log::warn!(
                "{} symbols outside the {} alphabet were ignored",
                rejected,
                self.alphabet.name()
            );
        }
        log::debug!(
            "counted {} sequences x {} columns over {}",
            self.rows(),
            self.columns(),
            self.alphabet.as_str()
        );

        Ok(CountMatrix {
            alphabet: self.alphabet.clone(),
            columns,
        })
    }
}

/// Symbol tallies for one alignment column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnCounts {
    /// Count of each canonical letter, in alphabet order.
    pub letters: Vec<f64>,
    /// Ambiguity codes.
    pub unknown: f64,
    pub gap: f64,
    /// Symbols rejected under [`SymbolPolicy::Tolerant`].
    pub rejected: f64,
}

impl ColumnCounts {
    fn new(k: usize) -> Self {
        Self {
            letters: vec![0.0; k],
            unknown: 0.0,
            gap: 0.0,
            rejected: 0.0,
        }
    }

    /// Sum of defined-letter counts, `N`.
    pub fn total(&self) -> f64 {
        self.letters.iter().sum()
    }

    /// Letters plus ambiguity codes: every non-gap symbol seen.
    pub fn depth(&self) -> f64 {
        self.total() + self.unknown
    }
}

/// Column counts for a whole alignment.
#[derive(Debug, Clone)]
pub struct CountMatrix {
    alphabet: Arc<Alphabet>,
    columns: Vec<ColumnCounts>,
}

impl CountMatrix {
    /// Build a count matrix from a table of letter counts, one row per column.
    pub fn from_counts<A, I, R>(alphabet: A, rows: I) -> Result<Self, AlignmentError>
    where
        A: Into<Arc<Alphabet>>,
        I: IntoIterator<Item = R>,
        R: AsRef<[f64]>,
    {
        let alphabet = alphabet.into();
        let k = alphabet.len();
        let mut columns = Vec::new();
        for (row, counts) in rows.into_iter().enumerate() {
            let counts = counts.as_ref();
            if counts.len() != k {
                return Err(AlignmentError::CountWidth {
                    row,
                    expected: k,
                    found: counts.len(),
                });
            }
            if counts.iter().any(|c| !c.is_finite() || *c < 0.0) {
                return Err(AlignmentError::Weights {
                    message: format!("count table row {} has a negative or non-finite entry", row),
                });
            }
            let mut column = ColumnCounts::new(k);
            column.letters.copy_from_slice(counts);
            columns.push(column);
        }
        if columns.is_empty() {
            return Err(AlignmentError::Empty { rows: 0, columns: 0 });
        }
        Ok(Self { alphabet, columns })
    }

    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column(&self, index: usize) -> &ColumnCounts {
        &self.columns[index]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColumnCounts> {
        self.columns.iter()
    }
}

impl<'a> IntoIterator for &'a CountMatrix {
    type Item = &'a ColumnCounts;
    type IntoIter = std::slice::Iter<'a, ColumnCounts>;
    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}
