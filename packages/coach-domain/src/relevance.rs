/// Single source of truth for every relevance number the system reports.
///
/// Distances are normalized cosine distances in [0, 2]; relevance is
/// `1 - distance` rounded to three decimals, so identical chunks score 1.0 and
/// opposite chunks score -1.0.
pub fn relevance(distance: f32) -> f32 {
	(((1.0 - f64::from(distance)) * 1_000.0).round() / 1_000.0) as f32
}

#[cfg(test)]
mod tests {
	use super::*;

	fn assert_close(actual: f32, expected: f32) {
		assert!(
			(actual - expected).abs() < 1e-6,
			"Expected {expected}, got {actual}"
		);
	}

	#[test]
	fn relevance_spans_the_distance_range() {
		assert_close(relevance(0.0), 1.0);
		assert_close(relevance(0.5), 0.5);
		assert_close(relevance(1.0), 0.0);
		assert_close(relevance(2.0), -1.0);
	}

	#[test]
	fn relevance_rounds_to_three_decimals() {
		assert_close(relevance(0.123_4), 0.877);
		assert_close(relevance(0.000_4), 1.0);
		assert_close(relevance(1.765_4), -0.765);
	}
}
