use crate::types::CandidateSite;

/// Collects every position whose probability is strictly above `min_prob`,
/// ordered by transcript and then by position.
pub fn select_sites(ids: &[String], predictions: &[Vec<f32>], min_prob: f32) -> Vec<CandidateSite> {
    ids.iter()
        .zip(predictions)
        .enumerate()
        .flat_map(|(transcript, (id, probs))| {
            probs
                .iter()
                .enumerate()
                .filter(move |&(_, &p)| p > min_prob)
                .map(move |(position, &probability)| CandidateSite {
                    transcript,
                    id: id.clone(),
                    position,
                    probability,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_strict() {
        let ids = vec!["a".to_string()];
        let predictions = vec![vec![0.01, 0.010_001, 0.5, 0.0]];
        let sites = select_sites(&ids, &predictions, 0.01);
        let positions: Vec<usize> = sites.iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![1, 2]);
    }

    #[test]
    fn sites_follow_transcript_then_position_order() {
        let ids = vec!["x".to_string(), "y".to_string()];
        let predictions = vec![vec![0.9, 0.0, 0.8], vec![0.7]];
        let sites = select_sites(&ids, &predictions, 0.5);
        let order: Vec<(&str, usize, usize)> = sites
            .iter()
            .map(|s| (s.id.as_str(), s.transcript, s.position))
            .collect();
        assert_eq!(order, vec![("x", 0, 0), ("x", 0, 2), ("y", 1, 0)]);
        assert!((sites[1].probability - 0.8).abs() < f32::EPSILON);
    }

    #[test]
    fn nothing_above_threshold_yields_no_sites() {
        let ids = vec!["a".to_string()];
        assert!(select_sites(&ids, &[vec![0.001, 0.002]], 0.01).is_empty());
    }
}
