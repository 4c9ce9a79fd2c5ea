//! Manager display-name matching.
//!
//! Activity rows are keyed by the manager's display name rather than a user
//! id, and historical data contains CJK compatibility characters that are
//! visually identical to — but codepoint-distinct from — their canonical
//! forms (e.g. 﨑 U+FA11 vs 崎 U+5D0E in surnames). Matching is exact
//! first, then retried through a small documented fold table.

/// Known look-alike codepoints folded to their canonical form.
const LOOKALIKES: &[(char, char)] = &[
    ('\u{FA11}', '\u{5D0E}'), // 﨑 -> 崎
    ('\u{9AD9}', '\u{9AD8}'), // 髙 -> 高
    ('\u{FA4A}', '\u{6FF1}'), // 濵 -> 濱
];

/// Trim and fold look-alike codepoints to a canonical spelling.
pub fn canonical(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| {
            LOOKALIKES
                .iter()
                .find(|(from, _)| *from == c)
                .map(|(_, to)| *to)
                .unwrap_or(c)
        })
        .collect()
}

/// SQL expression applying the same fold to a stored column, so queries
/// can compare canonical-to-canonical. Expands to nested `REPLACE` calls
/// over `TRIM(column)`, one per look-alike pair.
pub fn fold_sql(column: &str) -> String {
    LOOKALIKES
        .iter()
        .fold(format!("TRIM({column})"), |expr, (from, to)| {
            format!("REPLACE({expr}, '{from}', '{to}')")
        })
}

/// Whether two display names refer to the same person: exact match on the
/// trimmed spelling, or equal after look-alike folding.
pub fn names_match(a: &str, b: &str) -> bool {
    let a_trimmed = a.trim();
    let b_trimmed = b.trim();
    a_trimmed == b_trimmed || canonical(a_trimmed) == canonical(b_trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_wins_without_folding() {
        assert!(names_match("山田太郎", "山田太郎"));
        assert!(names_match(" 山田太郎 ", "山田太郎"));
    }

    #[test]
    fn lookalike_saki_variants_match() {
        assert!(names_match("\u{FA11}田", "\u{5D0E}田"));
        assert!(names_match("\u{9AD9}橋", "\u{9AD8}橋"));
    }

    #[test]
    fn distinct_names_do_not_match() {
        assert!(!names_match("山田", "田山"));
        assert!(!names_match("\u{5D0E}田", "\u{9AD8}田"));
    }

    #[test]
    fn canonical_folds_only_listed_codepoints() {
        assert_eq!(canonical("\u{FA11}\u{5D0E}"), "\u{5D0E}\u{5D0E}");
        assert_eq!(canonical("abc"), "abc");
    }

    #[test]
    fn fold_sql_replaces_every_lookalike_pair() {
        let expr = fold_sql("manager_name");
        assert!(expr.contains("TRIM(manager_name)"));
        for (from, to) in LOOKALIKES {
            assert!(expr.contains(&format!("'{from}', '{to}'")));
        }
    }
}
