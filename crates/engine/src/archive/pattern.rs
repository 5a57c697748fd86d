/// Glob-style member-name matching.
///
/// `?` matches any single character except `/`. `*` matches any run of
/// characters; it stops at `/` unless `match_path_components` is set.
pub(super) fn matches(pattern: &str, name: &str, match_path_components: bool) -> bool {
    matches_inner(
        pattern.as_bytes(),
        name.as_bytes(),
        match_path_components,
    )
}

fn matches_inner(pattern: &[u8], name: &[u8], cross: bool) -> bool {
    match pattern.split_first() {
        None => name.is_empty(),
        Some((b'*', rest)) => {
            // Try every split point the star could cover, shortest first.
            for i in 0..=name.len() {
                if matches_inner(rest, &name[i..], cross) {
                    return true;
                }
                if i < name.len() && name[i] == b'/' && !cross {
                    return false;
                }
            }
            false
        }
        Some((b'?', rest)) => match name.split_first() {
            Some((&c, name_rest)) if c != b'/' => matches_inner(rest, name_rest, cross),
            _ => false,
        },
        Some((&p, rest)) => match name.split_first() {
            Some((&c, name_rest)) if c.eq_ignore_ascii_case(&p) => {
                matches_inner(rest, name_rest, cross)
            }
            _ => false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::matches;

    #[test]
    fn literal_match_is_case_insensitive() {
        assert!(matches("rooms/101.bin", "rooms/101.bin", false));
        assert!(matches("ROOMS/101.BIN", "rooms/101.bin", false));
        assert!(!matches("rooms/102.bin", "rooms/101.bin", false));
    }

    #[test]
    fn star_stays_within_component() {
        assert!(matches("*.bin", "101.bin", false));
        assert!(!matches("*.bin", "rooms/101.bin", false));
        assert!(matches("*.bin", "rooms/101.bin", true));
    }

    #[test]
    fn question_mark_matches_single_char() {
        assert!(matches("10?.bin", "101.bin", false));
        assert!(!matches("10?.bin", "10.bin", false));
        assert!(!matches("??", "a/", false));
    }

    #[test]
    fn star_in_middle() {
        assert!(matches("rooms/*.bin", "rooms/owl_hollow.bin", false));
        assert!(!matches("rooms/*.bin", "rooms/deep/owl_hollow.bin", false));
    }
}
