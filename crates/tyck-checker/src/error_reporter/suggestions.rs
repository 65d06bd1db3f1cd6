//! Spelling suggestions for unresolved names and missing properties.

/// Closest candidate to `name`, or `None` when nothing is close enough.
///
/// Candidates may differ in length by at most `max(2, floor(0.34 * len))`.
/// Candidates shorter than three characters only match when they differ from
/// `name` by case alone.
pub(crate) fn get_spelling_suggestion<'c>(
    name: &str,
    candidates: impl IntoIterator<Item = &'c str>,
) -> Option<String> {
    let name_len = name.chars().count();
    let maximum_length_difference = (name_len * 34 / 100).max(2);
    let mut best_distance = (name_len * 4 / 10 + 1) as f64;
    let mut best_candidate: Option<&str> = None;
    let name_lower = name.to_lowercase();

    for candidate in candidates {
        let candidate_len = candidate.chars().count();
        if name_len.abs_diff(candidate_len) > maximum_length_difference {
            continue;
        }
        if candidate == name {
            continue;
        }
        if candidate_len < 3 && candidate.to_lowercase() != name_lower {
            continue;
        }
        if let Some(distance) = levenshtein_with_max(name, candidate, best_distance - 0.1) {
            best_distance = distance;
            best_candidate = Some(candidate);
        }
    }
    best_candidate.map(str::to_string)
}

fn chars_equal_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Edit distance where a case-only substitution costs 0.1 and any other
/// substitution 2. Returns `None` once the distance exceeds `max`.
fn levenshtein_with_max(s1: &str, s2: &str, max: f64) -> Option<f64> {
    let s1: Vec<char> = s1.chars().collect();
    let s2: Vec<char> = s2.chars().collect();
    let mut previous: Vec<f64> = (0..=s2.len()).map(|i| i as f64).collect();
    let mut current = vec![0.0; s2.len() + 1];
    let big = max + 0.01;

    for i in 1..=s1.len() {
        let c1 = s1[i - 1];
        let min_j = if i as f64 > max { (i as f64 - max).ceil() as usize } else { 1 };
        let max_j = if s2.len() as f64 > max + i as f64 {
            (max + i as f64).floor() as usize
        } else {
            s2.len()
        };
        current[0] = i as f64;
        let mut col_min = i as f64;
        for value in current.iter_mut().take(min_j).skip(1) {
            *value = big;
        }
        for j in min_j..=max_j {
            let substitution = if chars_equal_ignore_case(c1, s2[j - 1]) {
                previous[j - 1] + 0.1
            } else {
                previous[j - 1] + 2.0
            };
            let dist = if c1 == s2[j - 1] {
                previous[j - 1]
            } else {
                (previous[j] + 1.0).min(current[j - 1] + 1.0).min(substitution)
            };
            current[j] = dist;
            col_min = col_min.min(dist);
        }
        for value in current.iter_mut().skip(max_j + 1) {
            *value = big;
        }
        if col_min > max {
            return None;
        }
        std::mem::swap(&mut previous, &mut current);
    }

    let result = previous[s2.len()];
    (result <= max).then_some(result)
}

#[cfg(test)]
#[path = "../tests/suggestions_tests.rs"]
mod tests;
