//! Static word corpus: domains of canonical words with similar decoys.

use std::path::Path;

use rand::Rng;
use serde::Deserialize;
use thiserror::Error;

const EMBEDDED_CORPUS: &str = include_str!("../../data/words.json");

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read word corpus: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse word corpus: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("word corpus has no domains")]
    Empty,
    #[error("domain '{0}' has no words")]
    EmptyDomain(String),
    #[error("word '{word}' in domain '{domain}' has no similar words")]
    NoAlternates { domain: String, word: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WordEntry {
    pub word: String,
    pub similar: Vec<String>,
}

impl WordEntry {
    /// One of the decoys, uniformly at random.
    pub fn pick_alternate<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        &self.similar[rng.random_range(0..self.similar.len())]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WordDomain {
    pub name: String,
    pub words: Vec<WordEntry>,
}

/// A validated corpus. Every domain has at least one entry and every entry
/// has at least one alternate, so picking never fails.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawCorpus")]
pub struct WordCorpus {
    domains: Vec<WordDomain>,
}

#[derive(Deserialize)]
struct RawCorpus {
    domains: Vec<WordDomain>,
}

impl TryFrom<RawCorpus> for WordCorpus {
    type Error = CorpusError;

    fn try_from(raw: RawCorpus) -> Result<Self, Self::Error> {
        WordCorpus::new(raw.domains)
    }
}

impl WordCorpus {
    pub fn new(domains: Vec<WordDomain>) -> Result<Self, CorpusError> {
        if domains.is_empty() {
            return Err(CorpusError::Empty);
        }
        for domain in &domains {
            if domain.words.is_empty() {
                return Err(CorpusError::EmptyDomain(domain.name.clone()));
            }
            if let Some(entry) = domain.words.iter().find(|e| e.similar.is_empty()) {
                return Err(CorpusError::NoAlternates {
                    domain: domain.name.clone(),
                    word: entry.word.clone(),
                });
            }
        }
        Ok(Self { domains })
    }

    /// The corpus compiled into the binary.
    pub fn embedded() -> Result<Self, CorpusError> {
        Self::from_json(EMBEDDED_CORPUS)
    }

    pub fn from_json(json: &str) -> Result<Self, CorpusError> {
        let raw: RawCorpus = serde_json::from_str(json)?;
        Self::try_from(raw)
    }

    pub fn from_path(path: &Path) -> Result<Self, CorpusError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn domains(&self) -> &[WordDomain] {
        &self.domains
    }

    pub fn entry_count(&self) -> usize {
        self.domains.iter().map(|d| d.words.len()).sum()
    }

    /// Random domain, then a random entry within it.
    pub fn pick_entry<R: Rng + ?Sized>(&self, rng: &mut R) -> &WordEntry {
        let domain = &self.domains[rng.random_range(0..self.domains.len())];
        &domain.words[rng.random_range(0..domain.words.len())]
    }
}
