use std::path::PathBuf;

use clap::Parser;

use wordsim::error::Error;
use wordsim::repr::{RepresentationConfig, RepresentationKind, SimilarityIndex};

const VERSION: &str =
    git_version::git_version!(args = ["--tags", "--always", "--dirty"], fallback = "unreleased");

/// Print the most similar words for each query word
#[derive(Parser, Debug)]
#[clap(author, version = VERSION, about)]
struct Args {
    /// representation backing format
    #[clap(value_enum)]
    representation: Kind,

    /// path (ppmi) or path stem (svd, embedding) of the representation data
    path: PathBuf,

    /// underscore-separated query words
    words: String,

    /// number of negative samples; subtracts its log from each PMI entry (ppmi only)
    #[clap(long, default_value_t = 1u32)]
    neg: u32,

    /// use the ensemble of word and context vectors (not applicable to ppmi)
    #[clap(long)]
    ensemble: bool,

    /// weighting exponent of the singular values (svd only)
    #[clap(long, default_value_t = 0.5f32)]
    eig: f32,

    /// number of neighbors to print per word
    #[clap(long, default_value_t = 10usize)]
    neighbors: usize,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy)]
enum Kind {
    Ppmi,
    Svd,
    Embedding,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = RepresentationConfig {
        kind: match args.representation {
            Kind::Ppmi => RepresentationKind::Ppmi,
            Kind::Svd => RepresentationKind::Svd,
            Kind::Embedding => RepresentationKind::Embedding,
        },
        path: args.path,
        negative: args.neg,
        ensemble: args.ensemble,
        eig: args.eig,
    };
    let index = SimilarityIndex::build(&config)?;

    for word in args.words.split('_').filter(|w| !w.is_empty()) {
        println!("{}", word);
        match index.closest(word, args.neighbors) {
            Ok(hv) => {
                for (w, sim) in hv {
                    println!("{}\t{}", w, sim);
                }
            }
            Err(Error::UnknownWord(_)) => {
                eprintln!("Warning: skipping {} not in lexicon", word);
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
