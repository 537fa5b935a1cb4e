use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Query word absent from the vocabulary; skippable per word.
    #[error("word not in vocabulary: {0}")]
    UnknownWord(String),

    /// A vector row whose length differs from the rest; fatal at load time.
    #[error("line {line}: expected {expected} vector components, found {found}")]
    DimensionMismatch { line: usize, expected: usize, found: usize },

    #[error("line {line}: duplicate word {word:?}")]
    DuplicateWord { line: usize, word: String },

    #[error("line {line}: bad numeric value")]
    BadNumber {
        line: usize,
        source: std::num::ParseFloatError,
    },

    #[error("no vector rows found")]
    Empty,

    #[error("{found} singular values for dimension {dim}")]
    SingularValueCount { found: usize, dim: usize },

    #[error("word/context vocabulary mismatch at row {row}")]
    VocabularyMismatch { row: usize },

    #[error("word and context dimensions differ: {words} vs {contexts}")]
    EnsembleDimensions { words: usize, contexts: usize },

    #[error("w+c ensemble is not applicable to the ppmi representation")]
    EnsembleUnsupported,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),
}
