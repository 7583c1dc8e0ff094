//! Dataset synthesis.
//!
//! Example rows fetched for one request are re-serialized as a single
//! `dataset` block with a deterministic name derived from the query. Rows
//! sharing the same target code collapse into one example carrying every
//! utterance.

use std::collections::HashMap;

use tp_core::entities::ExampleRow;

/// Replace every run of non-alphanumeric characters with one underscore.
#[must_use]
pub fn sanitize(part: &str) -> String {
    let mut out = String::with_capacity(part.len());
    let mut in_run = false;
    for c in part.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c);
            in_run = false;
        } else if !in_run {
            out.push('_');
            in_run = true;
        }
    }
    out
}

/// Dataset name for a keyword search.
#[must_use]
pub fn name_for_key(key: &str) -> String {
    format!("org.thingpedia.dynamic.by_key.{}", sanitize(key))
}

/// Dataset name for a kind-list fetch.
#[must_use]
pub fn name_for_kinds(kinds: &[String]) -> String {
    let parts: Vec<String> = kinds.iter().map(|k| sanitize(k)).collect();
    format!("org.thingpedia.dynamic.by_kinds.{}", parts.join("__"))
}

/// Dataset name for the full base set.
#[must_use]
pub fn name_for_everything() -> String {
    "org.thingpedia.dynamic.everything".to_string()
}

/// Render example rows as one `dataset` block.
///
/// Rows with identical target code are merged, first occurrence wins the
/// position and the id/click-count annotations.
#[must_use]
pub fn examples_to_dataset(name: &str, language: &str, rows: &[ExampleRow]) -> String {
    let mut order: Vec<usize> = Vec::new();
    let mut groups: HashMap<&str, usize> = HashMap::new();
    let mut utterances: Vec<Vec<&str>> = Vec::new();

    for (idx, row) in rows.iter().enumerate() {
        match groups.get(row.target_code.as_str()) {
            Some(&slot) => utterances[slot].push(&row.utterance),
            None => {
                let slot = utterances.len();
                groups.insert(&row.target_code, slot);
                order.push(idx);
                utterances.push(vec![&row.utterance]);
            }
        }
    }

    let mut out = format!("dataset @{name} language \"{language}\" {{\n");
    for (slot, &idx) in order.iter().enumerate() {
        let row = &rows[idx];
        let code = row.target_code.trim_end().trim_end_matches(';');
        let quoted: Vec<String> = utterances[slot]
            .iter()
            .map(|u| serde_json::to_string(u).unwrap_or_default())
            .collect();
        out.push_str(&format!(
            "  {code}\n  #_[utterances=[{}]]\n  #[id={}]\n  #[click_count={}];\n",
            quoted.join(", "),
            row.id,
            row.click_count
        ));
    }
    out.push_str("}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn example(id: i64, utterance: &str, code: &str) -> ExampleRow {
        ExampleRow {
            id,
            language: "en".to_string(),
            utterance: utterance.to_string(),
            target_code: code.to_string(),
            click_count: id * 2,
            name: None,
        }
    }

    #[rstest]
    #[case("cat videos", "org.thingpedia.dynamic.by_key.cat_videos")]
    #[case("c++!", "org.thingpedia.dynamic.by_key.c_")]
    #[case("tweet", "org.thingpedia.dynamic.by_key.tweet")]
    fn key_names_are_sanitized(#[case] key: &str, #[case] expected: &str) {
        assert_eq!(name_for_key(key), expected);
    }

    #[test]
    fn kind_names_join_with_double_underscore() {
        let kinds = vec!["com.twitter".to_string(), "com.bing".to_string()];
        assert_eq!(
            name_for_kinds(&kinds),
            "org.thingpedia.dynamic.by_kinds.com_twitter__com_bing"
        );
    }

    #[test]
    fn renders_annotated_block() {
        let rows = vec![example(7, "when someone tweets", "stream := monitor @com.twitter.home_timeline();")];
        let out = examples_to_dataset("org.thingpedia.dynamic.everything", "en", &rows);
        assert_eq!(
            out,
            "dataset @org.thingpedia.dynamic.everything language \"en\" {\n  \
             stream := monitor @com.twitter.home_timeline()\n  \
             #_[utterances=[\"when someone tweets\"]]\n  \
             #[id=7]\n  \
             #[click_count=14];\n}\n"
        );
    }

    #[test]
    fn identical_code_collapses_into_one_example() {
        let rows = vec![
            example(1, "tweet something", "action (p : String) := @com.twitter.post(status=p);"),
            example(2, "post on twitter", "action (p : String) := @com.twitter.post(status=p);"),
        ];
        let out = examples_to_dataset("org.thingpedia.dynamic.by_key.tweet", "en", &rows);
        assert_eq!(out.matches("#_[utterances=").count(), 1);
        assert!(out.contains("utterances=[\"tweet something\", \"post on twitter\"]"));
        // first row wins the id annotation
        assert!(out.contains("#[id=1]"));
    }

    #[test]
    fn utterances_with_quotes_are_escaped() {
        let rows = vec![example(3, "say \"hi\"", "action := @a.b();")];
        let out = examples_to_dataset("org.thingpedia.dynamic.by_key.hi", "en", &rows);
        assert!(out.contains(r#"utterances=["say \"hi\""]"#));
    }
}
