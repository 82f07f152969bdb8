use std::collections::HashMap;

/// One decoded ACMI line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// Blank lines, `#` comments, and comma-less lines without `=`.
    Ignore,
    /// Header line such as `FileType=text/acmi/tacview`.
    Metadata { key: String, value: String },
    /// `<id>,key=value,...` where the fields may be empty.
    Object {
        id: String,
        fields: HashMap<String, String>,
    },
}

impl Line {
    /// Object lines carrying a `T` field are timestamped events, the rest are
    /// definitions / property updates.
    pub fn is_event(&self) -> bool {
        match self {
            Line::Object { fields, .. } => fields.contains_key("T"),
            _ => false,
        }
    }
}

/// Classify and decode one line of text. Never fails.
pub fn decode_line(raw: &str) -> Line {
    let line = raw.trim();
    if line.is_empty() || line.starts_with('#') {
        return Line::Ignore;
    }

    if !line.contains(',') {
        //header lines split on the first '=' only
        return match line.find('=') {
            Some(eq) => Line::Metadata {
                key: line[..eq].trim().to_string(),
                value: strip_quotes(line[eq + 1..].trim()).to_string(),
            },
            None => Line::Ignore,
        };
    }

    let mut tok_iter = line.split(',');
    //split always yields at least one item
    let id = tok_iter.next().unwrap_or("").to_string();
    let mut fields = HashMap::new();
    for fragment in tok_iter {
        match split_pair(fragment) {
            Some((key, value)) => {
                fields.insert(key.to_string(), value.to_string());
            }
            None => log::debug!("Skipping fragment without key=value: '{}'", fragment),
        }
    }
    Line::Object { id, fields }
}

/// Split `key=value` on the first `=`. The key must have at least one
/// character before the `=` (it may be whitespace, which trims to empty).
/// Any further `=` stays in the value.
pub fn split_pair(fragment: &str) -> Option<(&str, &str)> {
    let eq = fragment.find('=')?;
    if eq == 0 {
        return None;
    }
    let key = fragment[..eq].trim();
    let value = strip_quotes(fragment[eq + 1..].trim());
    Some((key, value))
}

/// Remove at most one leading and at most one trailing double quote. The
/// ends are handled separately, so a quoted value cut in two by a comma
/// loses its stray quote on either side.
pub fn strip_quotes(s: &str) -> &str {
    let s = s.strip_prefix('"').unwrap_or(s);
    s.strip_suffix('"').unwrap_or(s)
}

fn is_line_break(c: char) -> bool {
    match c {
        '\n' | '\r' | '\u{0b}' | '\u{0c}' | '\u{1c}' | '\u{1d}' | '\u{1e}' | '\u{85}'
        | '\u{2028}' | '\u{2029}' => true,
        _ => false,
    }
}

/// Split a document into lines on `\n`, `\r\n`, a bare `\r`, and the other
/// ASCII and Unicode line separators. A trailing break does not produce an
/// extra empty line.
pub fn split_lines<'a>(text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        match rest.char_indices().find(|(_, c)| is_line_break(*c)) {
            Some((i, c)) => {
                let line = &rest[..i];
                let mut next = i + c.len_utf8();
                if c == '\r' && rest[next..].starts_with('\n') {
                    next += 1;
                }
                rest = &rest[next..];
                Some(line)
            }
            None => {
                let line = rest;
                rest = "";
                Some(line)
            }
        }
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use claim::{assert_matches, assert_none, assert_some_eq};

    #[test]
    fn blank_and_comment_lines_are_ignored() {
        assert_eq!(decode_line(""), Line::Ignore);
        assert_eq!(decode_line("   \t "), Line::Ignore);
        assert_eq!(decode_line("# some comment, with=commas"), Line::Ignore);
        assert_eq!(decode_line("   #indented comment"), Line::Ignore);
        assert_eq!(decode_line("just words"), Line::Ignore);
    }

    #[test]
    fn header_line_splits_on_first_equals() {
        assert_eq!(
            decode_line(" FileType = text/acmi/tacview "),
            Line::Metadata {
                key: "FileType".to_string(),
                value: "text/acmi/tacview".to_string()
            }
        );
        assert_eq!(
            decode_line("Title=\"a=b\""),
            Line::Metadata {
                key: "Title".to_string(),
                value: "a=b".to_string()
            }
        );
        assert_eq!(
            decode_line("Empty="),
            Line::Metadata {
                key: "Empty".to_string(),
                value: "".to_string()
            }
        );
    }

    #[test]
    fn object_line_collects_pairs() {
        let line = decode_line("101,Pilot=\"Viper\", Group = Red ,junk,=nokey,T=0|1|2");
        match line {
            Line::Object { id, fields } => {
                assert_eq!(id, "101");
                assert_eq!(fields.len(), 3);
                assert_some_eq!(fields.get("Pilot").map(|s| s.as_str()), "Viper");
                assert_some_eq!(fields.get("Group").map(|s| s.as_str()), "Red");
                assert_some_eq!(fields.get("T").map(|s| s.as_str()), "0|1|2");
                assert_none!(fields.get("junk"));
            }
            other => panic!("Expected object line, got {:?}", other),
        }
    }

    #[test]
    fn object_line_without_pairs_is_still_an_object() {
        assert_matches!(
            decode_line("202,nothing,here"),
            Line::Object { ref id, ref fields } if id.as_str() == "202" && fields.is_empty()
        );
        assert_matches!(
            decode_line("303,"),
            Line::Object { ref id, ref fields } if id.as_str() == "303" && fields.is_empty()
        );
    }

    #[test]
    fn object_id_is_kept_verbatim() {
        assert_matches!(
            decode_line("\"q\",Pilot=X"),
            Line::Object { ref id, .. } if id.as_str() == "\"q\""
        );
    }

    #[test]
    fn only_one_quote_layer_is_stripped() {
        assert_eq!(strip_quotes("\"\"double\"\""), "\"double\"");
        assert_eq!(strip_quotes("\"Viper\""), "Viper");
        assert_eq!(strip_quotes("plain"), "plain");
    }

    #[test]
    fn quote_ends_are_stripped_independently() {
        assert_eq!(strip_quotes("\"half"), "half");
        assert_eq!(strip_quotes("half\""), "half");
        assert_eq!(strip_quotes("\""), "");
        assert_eq!(strip_quotes(""), "");
    }

    #[test]
    fn comma_inside_quoted_value_leaves_no_stray_quotes() {
        match decode_line("101,Name=\"F-16C, Block 50\",Pilot=\"Viper,Group=Red\"") {
            Line::Object { fields, .. } => {
                assert_some_eq!(fields.get("Name").map(|s| s.as_str()), "F-16C");
                assert_some_eq!(fields.get("Pilot").map(|s| s.as_str()), "Viper");
                assert_some_eq!(fields.get("Group").map(|s| s.as_str()), "Red");
            }
            other => panic!("Expected object line, got {:?}", other),
        }
    }

    #[test]
    fn lines_split_on_every_break_style() {
        let lines: Vec<&str> = split_lines("a\nb\r\nc\rd\u{2028}e\u{0c}f\n").collect();
        assert_eq!(lines, vec!["a", "b", "c", "d", "e", "f"]);
        let blank: Vec<&str> = split_lines("a\r\rb").collect();
        assert_eq!(blank, vec!["a", "", "b"]);
        assert_eq!(split_lines("").count(), 0);
        assert_eq!(split_lines("single").collect::<Vec<_>>(), vec!["single"]);
    }

    #[test]
    fn split_pair_edge_cases() {
        assert_none!(split_pair("novalue"));
        assert_none!(split_pair("=x"));
        assert_some_eq!(split_pair(" =x"), ("", "x"));
        assert_some_eq!(split_pair("Event=Shot=Fox2"), ("Event", "Shot=Fox2"));
        assert_some_eq!(split_pair("Name="), ("Name", ""));
    }

    #[test]
    fn event_detection_uses_t_field() {
        assert!(decode_line("101,T=5,Event=Shot").is_event());
        assert!(!decode_line("101,Pilot=Viper").is_event());
        assert!(!decode_line("A=1").is_event());
    }
}
