use std::fs;
use std::io::Read;
use std::path::Path;

use crate::error::{PslError, Result};
use crate::idna::{domain_to_ascii, Idna};
use crate::tree::RuleTree;
use crate::types::Terminal;

/// Marker closing the ICANN section of the public suffix list.
pub const ICANN_END_MARKER: &str = "// ===END ICANN DOMAINS===";

/// Parse PSL-format rules from text into a [`RuleTree`].
///
/// Lines are read up to the first `//` comment and the first whitespace.
/// Blank lines are skipped, as are lines containing an empty label (for
/// example `.com` or `a..b`). A leading `!` marks an exception rule.
/// Non-ASCII rules are converted to ASCII through `idna` as a whole before
/// they are split, so Unicode full stops such as `。` separate labels.
pub fn parse_rules(text: &str, idna: &dyn Idna) -> Result<RuleTree> {
    let mut tree = RuleTree::new();
    let mut skipped = 0usize;

    for (line_num, line) in text.lines().enumerate() {
        let line_num = line_num + 1; // 1-based line numbers

        // Remove comments and trim whitespace
        let line = match line.find("//") {
            Some(comment_pos) => &line[..comment_pos],
            None => line,
        };
        let rule = match line.split_whitespace().next() {
            Some(rule) => rule,
            None => continue,
        };

        let (rule, terminal) = match rule.strip_prefix('!') {
            Some(rest) => (rest, Terminal::Exception),
            None => (rule, Terminal::Normal),
        };

        let ascii = domain_to_ascii(idna, &rule.to_lowercase())?;
        if ascii.split('.').any(str::is_empty) {
            log::debug!("skipping malformed rule at line {}: {}", line_num, rule);
            skipped += 1;
            continue;
        }

        let labels = ascii.split('.').collect::<Vec<_>>();
        tree.insert(&labels, terminal);
    }

    log::debug!(
        "loaded {} public suffix rules ({} skipped)",
        tree.rule_count(),
        skipped
    );

    Ok(tree)
}

/// Parse PSL-format rules from a reader.
///
/// Fails with [`PslError::IoError`] if the reader fails and with
/// [`PslError::MalformedInput`] if the content is not UTF-8.
pub fn parse_rules_from_reader<R: Read>(mut reader: R, idna: &dyn Idna) -> Result<RuleTree> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let text = String::from_utf8(bytes)
        .map_err(|e| PslError::MalformedInput(format!("rule text is not UTF-8: {}", e)))?;
    parse_rules(&text, idna)
}

/// Parse PSL-format rules from a file.
pub fn parse_rules_from_file(path: impl AsRef<Path>, idna: &dyn Idna) -> Result<RuleTree> {
    let path = path.as_ref();
    let file = fs::File::open(path).map_err(|e| read_error(path, e))?;
    parse_rules_from_reader(file, idna).map_err(|e| match e {
        PslError::IoError(io) => read_error(path, io),
        other => other,
    })
}

fn read_error(path: &Path, e: std::io::Error) -> PslError {
    PslError::IoError(std::io::Error::new(
        e.kind(),
        format!("Failed to read rules file '{}': {}", path.display(), e),
    ))
}

/// Return the ICANN part of a public suffix list, dropping private domains.
///
/// Text without the end marker is returned whole.
pub fn icann_section(text: &str) -> &str {
    match text.find(ICANN_END_MARKER) {
        Some(end) => &text[..end],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::idna::UnavailableIdna;

    fn terminal_at(tree: &RuleTree, labels: &[&str]) -> Option<Terminal> {
        let mut node = tree.root();
        for label in labels.iter().rev() {
            node = node.child(label)?;
        }
        node.terminal()
    }

    #[test]
    fn test_parse_simple_rules() {
        let text = "com\nco.uk\nuk\n";
        let tree = parse_rules(text, &UnavailableIdna).unwrap();
        assert_eq!(tree.rule_count(), 3);
        assert_eq!(terminal_at(&tree, &["com"]), Some(Terminal::Normal));
        assert_eq!(terminal_at(&tree, &["co", "uk"]), Some(Terminal::Normal));
        assert_eq!(terminal_at(&tree, &["uk"]), Some(Terminal::Normal));
    }

    #[test]
    fn test_parse_comments_and_blank_lines() {
        let text = r#"
// ===BEGIN ICANN DOMAINS===

// ac : https://en.wikipedia.org/wiki/.ac
ac
com.ac   // trailing comment
   edu.ac
"#;
        let tree = parse_rules(text, &UnavailableIdna).unwrap();
        assert_eq!(tree.rule_count(), 3);
        assert_eq!(terminal_at(&tree, &["com", "ac"]), Some(Terminal::Normal));
        assert_eq!(terminal_at(&tree, &["edu", "ac"]), Some(Terminal::Normal));
    }

    #[test]
    fn test_parse_only_first_token() {
        let tree = parse_rules("foo.com extra words", &UnavailableIdna).unwrap();
        assert_eq!(tree.rule_count(), 1);
        assert_eq!(terminal_at(&tree, &["foo", "com"]), Some(Terminal::Normal));
    }

    #[test]
    fn test_parse_exception_and_wildcard() {
        let text = "*.kawasaki.jp\n!city.kawasaki.jp\n";
        let tree = parse_rules(text, &UnavailableIdna).unwrap();
        assert_eq!(
            terminal_at(&tree, &["*", "kawasaki", "jp"]),
            Some(Terminal::Normal)
        );
        assert_eq!(
            terminal_at(&tree, &["city", "kawasaki", "jp"]),
            Some(Terminal::Exception)
        );
        // Intermediate nodes carry no marker
        assert_eq!(terminal_at(&tree, &["kawasaki", "jp"]), None);
        assert_eq!(terminal_at(&tree, &["jp"]), None);
    }

    #[test]
    fn test_parse_lowercases_rules() {
        let tree = parse_rules("CO.UK", &UnavailableIdna).unwrap();
        assert_eq!(terminal_at(&tree, &["co", "uk"]), Some(Terminal::Normal));
    }

    #[test]
    fn test_parse_skips_malformed_lines() {
        let text = ".com\na..b\n!\nnet\n";
        let tree = parse_rules(text, &UnavailableIdna).unwrap();
        assert_eq!(tree.rule_count(), 1);
        assert_eq!(terminal_at(&tree, &["net"]), Some(Terminal::Normal));
    }

    #[test]
    fn test_parse_duplicate_rule_last_write_wins() {
        let text = "foo.com\n!foo.com\n";
        let tree = parse_rules(text, &UnavailableIdna).unwrap();
        assert_eq!(terminal_at(&tree, &["foo", "com"]), Some(Terminal::Exception));
    }

    #[test]
    fn test_parse_unicode_rule_without_idna_fails() {
        let result = parse_rules("com\n公司.cn\n", &UnavailableIdna);
        assert!(matches!(result, Err(PslError::UnsupportedEncoding(_))));
    }

    #[test]
    fn test_parse_ascii_rules_without_idna_succeeds() {
        let result = parse_rules("xn--55qx5d.cn\n", &UnavailableIdna);
        assert!(result.is_ok());
    }

    #[cfg(feature = "idna")]
    #[test]
    fn test_parse_unicode_rule_with_idna() {
        let tree = parse_rules("公司.cn\n", &crate::idna::Uts46Idna).unwrap();
        assert_eq!(
            terminal_at(&tree, &["xn--55qx5d", "cn"]),
            Some(Terminal::Normal)
        );
    }

    #[cfg(feature = "idna")]
    #[test]
    fn test_parse_unicode_full_stop_separates_labels() {
        let text = "公司。cn\n!www．公司．cn\nbücher。\n";
        let tree = parse_rules(text, &crate::idna::Uts46Idna).unwrap();
        assert_eq!(
            terminal_at(&tree, &["xn--55qx5d", "cn"]),
            Some(Terminal::Normal)
        );
        assert_eq!(
            terminal_at(&tree, &["www", "xn--55qx5d", "cn"]),
            Some(Terminal::Exception)
        );
        // `bücher。` ends in an empty label and is skipped
        assert_eq!(tree.rule_count(), 2);
    }

    #[test]
    fn test_parse_from_reader_rejects_invalid_utf8() {
        let bytes: &[u8] = &[b'c', b'o', b'm', b'\n', 0xff, 0xfe];
        let result = parse_rules_from_reader(bytes, &UnavailableIdna);
        assert!(matches!(result, Err(PslError::MalformedInput(_))));
    }

    #[test]
    fn test_parse_from_file() {
        use std::io::Write;
        let dir = std::env::temp_dir().join("psl_engine_test_parser");
        let _ = fs::create_dir_all(&dir);
        let file_path = dir.join("rules.dat");
        let mut f = fs::File::create(&file_path).unwrap();
        writeln!(f, "// test list").unwrap();
        writeln!(f, "com").unwrap();
        writeln!(f, "*.ck").unwrap();
        drop(f);

        let tree = parse_rules_from_file(&file_path, &UnavailableIdna).unwrap();
        assert_eq!(tree.rule_count(), 2);
        assert_eq!(terminal_at(&tree, &["*", "ck"]), Some(Terminal::Normal));

        let _ = fs::remove_file(&file_path);
        let _ = fs::remove_dir(&dir);
    }

    #[test]
    fn test_parse_from_file_not_found() {
        let result = parse_rules_from_file("/nonexistent/path/rules.dat", &UnavailableIdna);
        match result {
            Err(PslError::IoError(e)) => {
                assert!(e.to_string().contains("/nonexistent/path/rules.dat"))
            }
            other => panic!("expected IoError, got {:?}", other),
        }
    }

    #[test]
    fn test_icann_section_strips_private_domains() {
        let text = "com\n// ===END ICANN DOMAINS===\n// ===BEGIN PRIVATE DOMAINS===\ngithub.io\n";
        let icann = icann_section(text);
        assert!(icann.contains("com"));
        assert!(!icann.contains("github.io"));

        let tree = parse_rules(icann, &UnavailableIdna).unwrap();
        assert_eq!(tree.rule_count(), 1);
    }

    #[test]
    fn test_icann_section_without_marker() {
        assert_eq!(icann_section("com\nnet\n"), "com\nnet\n");
    }
}
