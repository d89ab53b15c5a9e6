//! In-memory vector retrieval over the loaded course material

mod chunker;

pub use chunker::{chunk_by_chars, Chunk, CHUNK_OVERLAP_CHARS, CHUNK_SIZE_CHARS};

use crate::error::{Result, StudyDeskError};
use crate::llm::Embedder;

/// Compute cosine similarity between two embeddings
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

/// A retrieved passage with its similarity score
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

/// Embedded chunks of one document set
#[derive(Debug, Clone)]
pub struct VectorIndex {
    chunks: Vec<Chunk>,
    embeddings: Vec<Vec<f32>>,
    model: String,
}

impl VectorIndex {
    /// Chunk and embed `text` with the default chunk size
    pub async fn build(text: &str, embedder: &dyn Embedder) -> Result<Self> {
        Self::build_with(text, embedder, CHUNK_SIZE_CHARS, CHUNK_OVERLAP_CHARS).await
    }

    pub async fn build_with(
        text: &str,
        embedder: &dyn Embedder,
        chunk_size: usize,
        overlap: usize,
    ) -> Result<Self> {
        let chunks = chunk_by_chars(text, chunk_size, overlap);
        if chunks.is_empty() {
            return Err(StudyDeskError::InvalidInput(
                "nothing to index".to_string(),
            ));
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = embedder.embed_batch(&texts).await?;
        if embeddings.len() != chunks.len() {
            return Err(StudyDeskError::Provider(format!(
                "embedder returned {} vectors for {} chunks",
                embeddings.len(),
                chunks.len()
            )));
        }

        tracing::debug!(
            "Indexed {} chunks with {}",
            chunks.len(),
            embedder.model_name()
        );

        Ok(Self {
            chunks,
            embeddings,
            model: embedder.model_name().to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Top `k` chunks by similarity to `query`, best first
    pub async fn search(
        &self,
        query: &str,
        embedder: &dyn Embedder,
        k: usize,
    ) -> Result<Vec<ScoredChunk>> {
        let query_embedding = embedder.embed(query).await?;

        let mut scored: Vec<ScoredChunk> = self
            .chunks
            .iter()
            .zip(&self.embeddings)
            .map(|(chunk, embedding)| ScoredChunk {
                chunk: chunk.clone(),
                score: cosine_similarity(&query_embedding, embedding),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.chunk.position.cmp(&b.chunk.position))
        });
        scored.truncate(k);
        Ok(scored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Counts a few marker words, one dimension each
    struct KeywordEmbedder;

    const MARKERS: [&str; 3] = ["ratio", "variance", "contrat"];

    #[async_trait]
    impl Embedder for KeywordEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            let lower = text.to_lowercase();
            Ok(MARKERS
                .iter()
                .map(|m| lower.matches(m).count() as f32)
                .collect())
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            let mut out = Vec::with_capacity(texts.len());
            for text in texts {
                out.push(self.embed(text).await?);
            }
            Ok(out)
        }

        fn model_name(&self) -> &str {
            "keywords"
        }
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
    }

    #[tokio::test]
    async fn test_search_ranks_relevant_chunk_first() {
        let text = "Le ratio de liquidité compare actif et passif.\n\n\
                    La variance mesure la dispersion.\n\n\
                    Un contrat engage les parties.";
        let index = VectorIndex::build_with(text, &KeywordEmbedder, 40, 0)
            .await
            .unwrap();
        assert!(index.len() >= 3);
        assert_eq!(index.model(), "keywords");

        let hits = index.search("quelle variance ?", &KeywordEmbedder, 1).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert!(hits[0].chunk.text.contains("variance"));
    }

    #[tokio::test]
    async fn test_empty_text_is_rejected() {
        let result = VectorIndex::build("   ", &KeywordEmbedder).await;
        assert!(matches!(result, Err(StudyDeskError::InvalidInput(_))));
    }
}
