//! Bounded fuzzy matching between a person's name or login and the local-part
//! of an email address.
//!
//! The score is the larger of two signals, both in `[0, 1]`:
//!
//! - normalized Levenshtein similarity of the separator-free strings, which
//!   catches `jane.doe` vs `Jane Doe` and small typos;
//! - token coverage: the share of the local-part made up of reference tokens
//!   (three characters or longer), which catches `jdoe` vs `Jane Doe`.

/// Default accept/reject boundary used by the commit miner. A score must be
/// strictly greater than this to count as a match.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.4;

/// Tokens shorter than this do not contribute to coverage.
const MIN_TOKEN_LEN: usize = 3;

/// Score `candidate_local_part` against `reference`. Deterministic and pure;
/// not necessarily symmetric.
pub fn score(reference: &str, candidate_local_part: &str) -> f64 {
    let reference_flat = normalize(reference);
    let candidate = normalize(candidate_local_part);
    if reference_flat.is_empty() || candidate.is_empty() {
        return 0.0;
    }

    let edit = strsim::normalized_levenshtein(&reference_flat, &candidate);
    let coverage = token_coverage(reference, &candidate);
    edit.max(coverage).clamp(0.0, 1.0)
}

/// Lowercase and drop everything that is not alphanumeric.
fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Split on anything non-alphanumeric and lowercase each piece.
fn tokens(s: &str) -> Vec<String> {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

fn token_coverage(reference: &str, candidate: &str) -> f64 {
    let candidate_len = candidate.chars().count();
    let mut matched = 0usize;
    let mut seen: Vec<String> = Vec::new();
    for token in tokens(reference) {
        if token.chars().count() < MIN_TOKEN_LEN || seen.contains(&token) {
            continue;
        }
        if candidate.contains(token.as_str()) {
            matched += token.chars().count();
        }
        seen.push(token);
    }
    (matched as f64 / candidate_len as f64).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separator_and_case_insensitive_match() {
        assert!(score("Jane Doe", "jane.doe") > DEFAULT_SIMILARITY_THRESHOLD);
        assert!((score("Jane Doe", "JANE_DOE") - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unrelated_local_part_rejected() {
        assert!(score("Jane Doe", "xk92qq") <= DEFAULT_SIMILARITY_THRESHOLD);
        assert!(score("octocat", "zz7781") <= DEFAULT_SIMILARITY_THRESHOLD);
    }

    #[test]
    fn test_initial_plus_surname_matches() {
        assert!(score("Jane Doe", "jdoe") > DEFAULT_SIMILARITY_THRESHOLD);
    }

    #[test]
    fn test_login_inside_noreply_local_part() {
        assert!(score("octocat", "583231+octocat") > DEFAULT_SIMILARITY_THRESHOLD);
    }

    #[test]
    fn test_empty_inputs_score_zero() {
        assert_eq!(score("", "jane"), 0.0);
        assert_eq!(score("Jane", ""), 0.0);
        assert_eq!(score("...", "---"), 0.0);
    }

    #[test]
    fn test_bounded_and_deterministic() {
        let pairs = [
            ("Jane Doe", "jane.doe"),
            ("a", "aaaaaaaaaaaaaaaa"),
            ("Zoë Ålander", "zoe.alander"),
            ("octocat", "octocat"),
        ];
        for (a, b) in pairs {
            let s = score(a, b);
            assert!((0.0..=1.0).contains(&s), "{a} vs {b} = {s}");
            assert_eq!(s, score(a, b));
        }
    }
}
