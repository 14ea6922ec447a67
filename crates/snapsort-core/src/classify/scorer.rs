//! Temperature-scaled similarity scoring of an image against all labels.
//!
//! Both sides are unit-norm, so a dot product is cosine similarity. The
//! similarities are multiplied by `exp(logit_scale)` and pushed through a
//! softmax, the same pattern the model was trained with. Raw cosines
//! without the temperature would flatten the distribution and break parity
//! with the reference model.

use crate::classify::LabelEmbeddings;
use crate::math;

/// Probability distribution over labels for one image embedding.
///
/// Normalizes `image_embedding`, computes cosine similarity against every
/// label row, scales by `exp(logit_scale)`, and applies a softmax. The
/// result has one entry per label, in label-set order, summing to 1.
pub fn score(image_embedding: &[f32], labels: &LabelEmbeddings, logit_scale: f32) -> Vec<f32> {
    debug_assert_eq!(image_embedding.len(), labels.embedding_dim());

    let image = math::l2_normalize(image_embedding);
    let scale = logit_scale.exp();

    let mut logits: Vec<f32> = Vec::with_capacity(labels.label_count());
    for i in 0..labels.label_count() {
        let row = labels.row(i);
        let cosine: f32 = image.iter().zip(row).map(|(a, b)| a * b).sum();
        logits.push(cosine * scale);
    }

    math::softmax(&logits)
}

/// Index of the winning label: argmax of the probabilities, ties broken by
/// the lowest label index.
pub fn best_index(probabilities: &[f32]) -> Option<usize> {
    math::argmax(probabilities)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two orthogonal unit-norm labels in 2D.
    fn orthogonal_labels() -> LabelEmbeddings {
        LabelEmbeddings::from_raw(vec![1.0, 0.0, 0.0, 1.0], 2, 2)
    }

    #[test]
    fn test_score_sums_to_one() {
        let labels = orthogonal_labels();
        let probs = score(&[0.3, 0.7], &labels, 4.6052);
        assert_eq!(probs.len(), 2);
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_score_prefers_nearest_label() {
        let labels = orthogonal_labels();
        // Closer to the second label's axis.
        let probs = score(&[0.2, 0.9], &labels, 4.6052);
        assert!(probs[1] > probs[0]);
        assert!(probs[1] > 0.5);
    }

    #[test]
    fn test_score_normalizes_image_embedding() {
        let labels = orthogonal_labels();
        // Same direction, different magnitudes: identical distributions.
        let a = score(&[0.1, 0.3], &labels, 4.6052);
        let b = score(&[1.0, 3.0], &labels, 4.6052);
        for (x, y) in a.iter().zip(&b) {
            assert!((x - y).abs() < 1e-5);
        }
    }

    #[test]
    fn test_temperature_sharpens_distribution() {
        let labels = orthogonal_labels();
        let flat = score(&[0.6, 0.8], &labels, 0.0);
        let sharp = score(&[0.6, 0.8], &labels, 4.6052);
        // Higher temperature scale concentrates mass on the winner.
        assert!(sharp[1] > flat[1]);
    }

    #[test]
    fn test_tie_breaks_to_lowest_index() {
        let labels = orthogonal_labels();
        // Equidistant from both labels: probabilities are equal, first wins.
        let probs = score(&[1.0, 1.0], &labels, 4.6052);
        assert!((probs[0] - probs[1]).abs() < 1e-6);
        assert_eq!(best_index(&probs), Some(0));
    }

    #[test]
    fn test_best_index_empty() {
        assert_eq!(best_index(&[]), None);
    }
}
