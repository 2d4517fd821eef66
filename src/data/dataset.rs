use burn::data::dataset::Dataset;

use crate::domain::document::TokenizedDocument;
use crate::domain::error::{PipelineError, PipelineResult};
use crate::domain::traits::Corpus;

/// In-memory tokenized corpus, loaded once and shared read-only.
#[derive(Debug, Clone, Default)]
pub struct TokenCorpus {
    documents: Vec<TokenizedDocument>,
}

impl TokenCorpus {
    pub fn new(documents: Vec<TokenizedDocument>) -> Self { Self { documents } }

    pub fn total_tokens(&self) -> usize {
        self.documents.iter().map(TokenizedDocument::len).sum()
    }
}

impl Corpus for TokenCorpus {
    fn len(&self) -> usize {
        self.documents.len()
    }

    fn document(&self, index: usize) -> PipelineResult<&TokenizedDocument> {
        self.documents.get(index).ok_or(PipelineError::CorpusAccess {
            index,
            len: self.documents.len(),
        })
    }
}

impl Dataset<TokenizedDocument> for TokenCorpus {
    fn get(&self, index: usize) -> Option<TokenizedDocument> {
        self.documents.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.documents.len()
    }
}
