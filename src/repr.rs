use std::path::{Path, PathBuf};

use ndarray::prelude::*;

use crate::error::Error;
use crate::nn;
use crate::vectors::{load_values, WordVectors};

/// Backing format of a precomputed word representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepresentationKind {
    /// dense rows of (shifted, clipped) PMI statistics
    Ppmi,
    /// left singular vectors weighted by the singular values
    Svd,
    /// trained embedding matrix, optionally summed with context vectors
    Embedding,
}

/// Everything the factory needs to turn files on disk into a queryable index.
#[derive(Debug, Clone)]
pub struct RepresentationConfig {
    pub kind: RepresentationKind,
    /// path (ppmi) or path stem (svd, embedding) of the representation data
    pub path: PathBuf,
    /// number of negative samples; ln of it is subtracted from each PMI entry
    pub negative: u32,
    /// w+c ensemble of word and context vectors
    pub ensemble: bool,
    /// exponent applied to the singular values
    pub eig: f32,
}

/// Read-only word similarity queries over one loaded representation.
/// Vectors are unit length after construction, so scoring is a dot product.
#[derive(Debug)]
pub struct SimilarityIndex {
    vecs: WordVectors,
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut s = path.as_os_str().to_owned();
    s.push(".");
    s.push(suffix);
    PathBuf::from(s)
}

fn sigma_weights(sigma: &Array1<f32>, eig: f32, dim: usize) -> Result<Array1<f32>, Error> {
    if sigma.len() != dim {
        return Err(Error::SingularValueCount {
            found: sigma.len(),
            dim,
        });
    }
    Ok(sigma.mapv(|v| v.powf(eig)))
}

impl SimilarityIndex {
    /// Load vectors according to `config.kind`; the queries are agnostic to
    /// which variant produced them.
    pub fn build(config: &RepresentationConfig) -> Result<SimilarityIndex, Error> {
        let wv = match config.kind {
            RepresentationKind::Ppmi => {
                if config.ensemble {
                    return Err(Error::EnsembleUnsupported);
                }
                let mut wv = WordVectors::load_text(&config.path, false)?;
                // with the default of one negative sample the shift is zero
                // and this just clips raw PMI to its positive part
                wv.shift_clip((config.negative.max(1) as f32).ln());
                wv
            }
            RepresentationKind::Svd => {
                let mut wv = WordVectors::load_text(with_suffix(&config.path, "ut"), false)?;
                let sigma = load_values(with_suffix(&config.path, "s"))?;
                let weights = sigma_weights(&sigma, config.eig, wv.dim())?;
                wv.scale_columns(&weights);
                if config.ensemble {
                    let mut cv = WordVectors::load_text(with_suffix(&config.path, "vt"), false)?;
                    cv.scale_columns(&weights);
                    wv.add(&cv)?;
                }
                wv
            }
            RepresentationKind::Embedding => {
                let mut wv = WordVectors::load_text(with_suffix(&config.path, "words"), true)?;
                if config.ensemble {
                    let cv = WordVectors::load_text(with_suffix(&config.path, "contexts"), true)?;
                    wv.add(&cv)?;
                }
                wv
            }
        };
        Ok(SimilarityIndex::from_vectors(wv))
    }

    /// Build an index straight from already loaded vectors.
    pub fn from_vectors(mut vecs: WordVectors) -> SimilarityIndex {
        if !vecs.normed {
            vecs.norm();
        }
        SimilarityIndex { vecs }
    }

    pub fn vocab(&self) -> &[String] {
        &self.vecs.id2str
    }

    /// The `top_k` words most similar to `word` by cosine, descending, the
    /// word itself excluded. Absent words fail with `Error::UnknownWord` and
    /// leave the index untouched for further queries.
    pub fn closest(&self, word: &str, top_k: usize) -> Result<Vec<(String, f32)>, Error> {
        let head_id = *self
            .vecs
            .str2id
            .get(word)
            .ok_or_else(|| Error::UnknownWord(word.to_string()))?;
        let hv = nn::nearest(&self.vecs, head_id as usize, top_k);
        Ok(hv
            .into_iter()
            .map(|(i, sim)| (self.vecs.id2str[i as usize].clone(), sim))
            .collect())
    }
}
