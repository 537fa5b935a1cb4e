use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use ndarray::prelude::*;

use crate::error::Error;
use crate::nn::norm_l2;

/// Vocabulary with one dense vector per word. Rows of `vecs` line up with
/// `id2str`; `str2id` is the reverse lexicon mapping.
#[derive(Debug)]
pub struct WordVectors {
    pub vecs: Array2<f32>,
    pub id2str: Vec<String>,
    pub str2id: HashMap<String, u32>,
    pub normed: bool,
}

impl WordVectors {
    pub fn load_text(path: impl AsRef<Path>, header: bool) -> Result<WordVectors, Error> {
        let rf = BufReader::new(File::open(path)?);
        WordVectors::read_text(rf, header)
    }

    /// Parse whitespace-separated rows of `word v1 .. vd`. The first row fixes
    /// the dimensionality; any row of a different length is fatal. With
    /// `header`, a leading word2vec-style `rows dims` count line is skipped.
    pub fn read_text(rf: impl BufRead, header: bool) -> Result<WordVectors, Error> {
        let mut data = Vec::<f32>::new();
        let mut id2str = Vec::<String>::new();
        let mut str2id = HashMap::<String, u32>::new();
        let mut dim = 0usize;

        // a first line of two integer tokens is held back until the shape of
        // the rest of the file tells whether it was a count header or a
        // one-dimensional row with a numeric word
        let mut pending: Option<(String, f32, usize, usize)> = None;

        for (lineno, line) in rf.lines().enumerate() {
            let line = line?;
            let parts: Vec<_> = line.split_whitespace().collect();
            if parts.is_empty() {
                continue;
            }
            if header && lineno == 0 && parts.len() == 2 {
                if let (Ok(rows), Ok(d)) =
                    (parts[0].parse::<usize>(), parts[1].parse::<usize>())
                {
                    pending = Some((parts[0].to_string(), d as f32, rows, d));
                    continue;
                }
            }

            let word = parts[0];
            if dim == 0 {
                dim = parts.len() - 1;
                if dim == 0 {
                    return Err(Error::DimensionMismatch {
                        line: lineno + 1,
                        expected: 1,
                        found: 0,
                    });
                }
            } else if parts.len() - 1 != dim {
                return Err(Error::DimensionMismatch {
                    line: lineno + 1,
                    expected: dim,
                    found: parts.len() - 1,
                });
            }

            for p in &parts[1..] {
                data.push(p.parse::<f32>().map_err(|e| Error::BadNumber {
                    line: lineno + 1,
                    source: e,
                })?);
            }
            if str2id.insert(word.to_string(), id2str.len() as u32).is_some() {
                return Err(Error::DuplicateWord {
                    line: lineno + 1,
                    word: word.to_string(),
                });
            }
            id2str.push(word.to_string());
        }

        if let Some((word, val, rows, d)) = pending {
            // only plausible as a header if its counts fit what followed;
            // wider rows settle it by themselves
            if dim <= 1 && !(rows == id2str.len() && d == dim) {
                if str2id.contains_key(&word) {
                    return Err(Error::DuplicateWord { line: 1, word });
                }
                for id in str2id.values_mut() {
                    *id += 1;
                }
                str2id.insert(word.clone(), 0);
                id2str.insert(0, word);
                data.insert(0, val);
                dim = 1;
            }
        }

        if id2str.is_empty() {
            return Err(Error::Empty);
        }

        let vecs = Array2::from_shape_vec((id2str.len(), dim), data)?;
        Ok(WordVectors {
            vecs,
            id2str,
            str2id,
            normed: false,
        })
    }

    pub fn len(&self) -> usize {
        self.id2str.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id2str.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.vecs.len_of(Axis(1))
    }

    /// make all vectors unit length; all-zero rows are left alone
    pub fn norm(&mut self) {
        for mut row in self.vecs.rows_mut() {
            let n = norm_l2(&row);
            if n > 0. {
                row.iter_mut().for_each(|e| *e /= n);
            }
        }
        self.normed = true;
    }

    /// PPMI shift: subtract `shift` from every entry and clip at zero.
    pub fn shift_clip(&mut self, shift: f32) {
        self.vecs.mapv_inplace(|e| (e - shift).max(0.));
    }

    /// scale every row elementwise, e.g. by singular value weights
    pub fn scale_columns(&mut self, weights: &Array1<f32>) {
        for mut row in self.vecs.rows_mut() {
            row *= weights;
        }
    }

    /// Sum a context matrix into this one (w+c ensemble). The vocabularies
    /// must match exactly, in order.
    pub fn add(&mut self, other: &WordVectors) -> Result<(), Error> {
        if self.id2str != other.id2str {
            let row = std::iter::zip(&self.id2str, &other.id2str)
                .position(|(a, b)| a != b)
                .unwrap_or(self.len().min(other.len()));
            return Err(Error::VocabularyMismatch { row: row + 1 });
        }
        if self.dim() != other.dim() {
            return Err(Error::EnsembleDimensions {
                words: self.dim(),
                contexts: other.dim(),
            });
        }
        self.vecs += &other.vecs;
        Ok(())
    }
}

pub fn load_values(path: impl AsRef<Path>) -> Result<Array1<f32>, Error> {
    let rf = BufReader::new(File::open(path)?);
    read_values(rf)
}

/// one float per line, blank lines ignored
pub fn read_values(rf: impl BufRead) -> Result<Array1<f32>, Error> {
    let mut vals = Vec::new();
    for (lineno, line) in rf.lines().enumerate() {
        let line = line?;
        let t = line.trim();
        if t.is_empty() {
            continue;
        }
        vals.push(t.parse::<f32>().map_err(|e| Error::BadNumber {
            line: lineno + 1,
            source: e,
        })?);
    }
    Ok(Array1::from_vec(vals))
}
