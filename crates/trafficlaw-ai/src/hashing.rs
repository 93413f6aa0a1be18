//! Deterministic hashed bag-of-words embedder.
//!
//! No model files, no network: terms hash into fixed-dimension buckets
//! weighted by in-text frequency, and the result is L2-normalised. The same
//! text always produces the same unit vector, so a catalog description
//! queried back verbatim scores cosine 1.0.
//!
//! Retrieval quality is token-overlap only. This is the last-resort fallback
//! when no ONNX model or endpoint is configured, and the provider of choice
//! in tests.

use crate::provider::{EmbedError, EmbeddingProvider};

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

pub struct HashingEmbedder {
    dim: usize,
}

impl HashingEmbedder {
    /// Default bucket count.
    pub const DEFAULT_DIM: usize = 256;

    /// Clamps `dim` to at least one bucket.
    pub fn new(dim: usize) -> Self {
        Self { dim: dim.max(1) }
    }

    /// FNV-1a over the term bytes, folded into a bucket index.
    fn bucket(term: &str, dim: usize) -> usize {
        let mut hash = FNV_OFFSET;
        for byte in term.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(FNV_PRIME);
        }
        (hash % dim as u64) as usize
    }

    fn vector(&self, text: &str) -> Vec<f32> {
        let mut out = vec![0.0f32; self.dim];
        for term in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            out[Self::bucket(&term.to_lowercase(), self.dim)] += 1.0;
        }
        let norm = out.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut out {
                *v /= norm;
            }
        }
        out
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DIM)
    }
}

impl EmbeddingProvider for HashingEmbedder {
    fn embed(&mut self, text: &str) -> Result<Vec<f32>, EmbedError> {
        Ok(self.vector(text))
    }

    fn embed_batch(&mut self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbedError> {
        Ok(texts.iter().map(|t| self.vector(t)).collect())
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn name(&self) -> &str {
        "hashed-bag-of-words"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Dot product; inputs are unit vectors, so this is cosine similarity.
    fn cosine(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    #[test]
    fn same_text_same_unit_vector() {
        let mut e = HashingEmbedder::default();
        let a = e.embed("xe máy vượt đèn đỏ").unwrap();
        let b = e.embed("xe máy vượt đèn đỏ").unwrap();
        assert_eq!(a, b);
        assert!((cosine(&a, &b) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn casing_and_punctuation_do_not_change_the_vector() {
        let mut e = HashingEmbedder::default();
        let plain = e.embed("xe máy vượt đèn đỏ").unwrap();
        let noisy = e.embed("Xe Máy, vượt đèn đỏ!").unwrap();
        assert_eq!(plain, noisy);
    }

    #[test]
    fn empty_text_is_the_zero_vector() {
        let mut e = HashingEmbedder::default();
        let v = e.embed("").unwrap();
        assert_eq!(v.len(), HashingEmbedder::DEFAULT_DIM);
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn overlapping_text_scores_higher_than_unrelated_text() {
        let mut e = HashingEmbedder::default();
        let anchor = e.embed("xe máy vượt đèn đỏ").unwrap();
        let related = e.embed("xe máy vượt đèn đỏ tại ngã tư").unwrap();
        let unrelated = e.embed("nồng độ cồn khi lái").unwrap();
        assert!(cosine(&anchor, &related) > cosine(&anchor, &unrelated));
    }

    #[test]
    fn respects_requested_dimension() {
        let mut e = HashingEmbedder::new(32);
        assert_eq!(e.dim(), 32);
        assert_eq!(e.embed("đi bộ qua đường").unwrap().len(), 32);
    }

    #[test]
    fn zero_dimension_clamps_to_one_bucket() {
        let mut e = HashingEmbedder::new(0);
        assert_eq!(e.dim(), 1);
        // Every term lands in the single bucket; the result normalises to 1.0.
        assert_eq!(e.embed("xe máy vượt đèn đỏ").unwrap(), vec![1.0]);
    }

    #[test]
    fn batch_matches_single_embeds() {
        let mut e = HashingEmbedder::default();
        let texts = ["xe đạp đi vào cao tốc", "ô tô đỗ sai quy định"];
        let batch = e.embed_batch(&texts).unwrap();
        assert_eq!(batch.len(), 2);
        for (text, vector) in texts.iter().zip(&batch) {
            assert_eq!(&e.embed(text).unwrap(), vector);
        }
    }
}
