//! Scoring arithmetic.

/// Rank-weighted precision of useful passages.
///
/// For each useful passage at rank k, adds the fraction of useful passages
/// among the first k, then divides by the number of useful passages.
/// Returns 0.0 when nothing was retrieved or nothing was useful.
pub fn context_precision(usefulness: &[bool]) -> f64 {
    let total_useful = usefulness.iter().filter(|u| **u).count();
    if total_useful == 0 {
        return 0.0;
    }

    let mut useful_so_far = 0usize;
    let mut numerator = 0.0;
    for (i, useful) in usefulness.iter().enumerate() {
        if *useful {
            useful_so_far += 1;
            numerator += useful_so_far as f64 / (i + 1) as f64;
        }
    }

    numerator / total_useful as f64
}

/// Arithmetic mean, 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Whether a retrieved passage contains any expected passage.
pub fn matches_expected(passage: &str, expected_passages: &[String]) -> bool {
    let passage = passage.to_lowercase();
    expected_passages
        .iter()
        .map(|e| e.trim().to_lowercase())
        .any(|e| !e.is_empty() && passage.contains(&e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_precision_examples() {
        // useful at ranks 1 and 3: (1/1 + 2/3) / 2
        assert!(close(
            context_precision(&[true, false, true, false]),
            (1.0 + 2.0 / 3.0) / 2.0
        ));
        assert!(close(context_precision(&[true, true, false]), 1.0));
        assert!(close(context_precision(&[false, true]), 0.5));
    }

    #[test]
    fn test_precision_degenerate() {
        assert_eq!(context_precision(&[]), 0.0);
        assert_eq!(context_precision(&[false, false]), 0.0);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), 0.0);
        assert!(close(mean(&[1.0, 0.5, 0.0]), 0.5));
    }

    #[test]
    fn test_matches_expected() {
        let expected = vec!["First Governor of Utah".to_string()];
        assert!(matches_expected("The first governor of Utah was Blue Bayou.", &expected));
        assert!(!matches_expected("Utah is a state.", &expected));
        assert!(!matches_expected("anything", &["  ".to_string()]));
    }
}
