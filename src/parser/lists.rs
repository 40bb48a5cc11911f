/// Collect `*` bullet items in document order. Anything else is skipped.
pub fn bullet_items(section: &str) -> Vec<String> {
    section
        .lines()
        .map(str::trim)
        .filter_map(|line| line.strip_prefix('*'))
        .map(|item| item.trim().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bullets_in_order() {
        let items = bullet_items("\n* first\n  *   second  \n* third");
        assert_eq!(items, vec!["first", "second", "third"]);
    }

    #[test]
    fn prose_and_blank_lines_skipped() {
        let items = bullet_items("Intro text\n\n* only item\n- dash item\n1. numbered");
        assert_eq!(items, vec!["only item"]);
    }

    #[test]
    fn crlf_lines() {
        let items = bullet_items("* a\r\n* b\r\n");
        assert_eq!(items, vec!["a", "b"]);
    }

    #[test]
    fn empty_section() {
        assert!(bullet_items("").is_empty());
    }
}
