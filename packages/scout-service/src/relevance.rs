use crate::SimilarityMatch;

/// Positions of the matches whose distance is strictly below `max_distance`, in input order.
pub fn relevant_indices(matches: &[SimilarityMatch], max_distance: f32) -> Vec<usize> {
	matches
		.iter()
		.enumerate()
		.filter(|(_, item)| item.distance < max_distance)
		.map(|(position, _)| position)
		.collect()
}
