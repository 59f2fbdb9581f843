/*!
 * Fuzzy matching for translation memory lookups.
 *
 * Provides Levenshtein distance and the normalized similarity score used to
 * find near-duplicate source strings. Comparison is over Unicode scalar
 * values and is case-sensitive: "Save" and "save" are one edit apart.
 */

/// Calculate Levenshtein distance between two strings
///
/// Unit cost for insertion, deletion and substitution. Memory is
/// proportional to the shorter string.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    // Keep the row over the shorter sequence
    let (long, short) = if a_chars.len() >= b_chars.len() {
        (a_chars, b_chars)
    } else {
        (b_chars, a_chars)
    };
    let long_len = long.len();
    let short_len = short.len();

    if short_len == 0 {
        return long_len;
    }

    let mut prev_row: Vec<usize> = (0..=short_len).collect();
    let mut curr_row: Vec<usize> = vec![0; short_len + 1];

    for i in 1..=long_len {
        curr_row[0] = i;

        for j in 1..=short_len {
            let cost = if long[i - 1] == short[j - 1] { 0 } else { 1 };

            curr_row[j] = (prev_row[j] + 1)                  // deletion
                .min(curr_row[j - 1] + 1)                    // insertion
                .min(prev_row[j - 1] + cost);                // substitution
        }

        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[short_len]
}

/// Calculate similarity between two strings (0.0-1.0)
///
/// `1 - distance / max(len(a), len(b))` over character counts. Two empty
/// strings are identical and score 1.0.
pub fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }

    let distance = levenshtein_distance(a, b);
    1.0 - (distance as f64 / max_len as f64)
}
