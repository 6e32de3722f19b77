use std::collections::BTreeMap;

use startpage::KnowledgePanel;
use startpage::parser::{extract_instant_answers, resolve_duplicates};

fn panel(title: &str, description: &str) -> KnowledgePanel {
    KnowledgePanel {
        title: title.to_string(),
        description: description.to_string(),
        facts: BTreeMap::new(),
        source: "Knowledge Panel".to_string(),
    }
}

#[cfg(test)]
mod duplicates {
    use super::*;

    #[test]
    fn test_titled_panel_wins_over_contained_answer() {
        let bundle = resolve_duplicates(
            Some("Paris".to_string()),
            Some(panel("France", "The capital of France is Paris.")),
        );
        assert_eq!(bundle.instant_answer, None);
        assert_eq!(bundle.knowledge_panel.map(|p| p.title).as_deref(), Some("France"));
    }

    #[test]
    fn test_answer_wins_over_untitled_panel() {
        let bundle = resolve_duplicates(
            Some("The capital of France is Paris. It is large.".to_string()),
            Some(panel("", "The capital of France is Paris.")),
        );
        assert!(bundle.instant_answer.is_some());
        assert!(bundle.knowledge_panel.is_none());
    }

    #[test]
    fn test_unrelated_texts_are_both_kept() {
        let bundle = resolve_duplicates(Some("42".to_string()), Some(panel("Towel", "Bring one.")));
        assert_eq!(bundle.instant_answer.as_deref(), Some("42"));
        assert!(bundle.knowledge_panel.is_some());
    }

    #[test]
    fn test_empty_panel_description_never_duplicates() {
        let bundle = resolve_duplicates(Some("anything".to_string()), Some(panel("Title", "")));
        assert!(bundle.instant_answer.is_some());
        assert!(bundle.knowledge_panel.is_some());
    }

    #[test]
    fn test_missing_halves_pass_through() {
        assert!(resolve_duplicates(None, None).is_empty());
        let only_answer = resolve_duplicates(Some("x".to_string()), None);
        assert_eq!(only_answer.instant_answer.as_deref(), Some("x"));
    }
}

#[cfg(test)]
mod detectors {
    use super::*;

    #[test]
    fn test_calculator_result() {
        let html = r#"<html><body><div class="vk_ans">42</div></body></html>"#;
        let bundle = extract_instant_answers(html, "6*7");
        assert_eq!(bundle.instant_answer.as_deref(), Some("42"));
        assert!(bundle.knowledge_panel.is_none());
    }

    #[test]
    fn test_clock_reading_needs_a_time_query() {
        let html = r#"<div class="clock">14:35</div>"#;
        let bundle = extract_instant_answers(html, "time in tokyo");
        assert_eq!(bundle.instant_answer.as_deref(), Some("14:35"));

        let unrelated = extract_instant_answers(html, "tokyo restaurants");
        assert_eq!(unrelated.instant_answer, None);
    }

    #[test]
    fn test_weather_card() {
        let html = r#"<div class="weather-card"><span class="temp-now">18°C</span> Cloudy</div>"#;
        let bundle = extract_instant_answers(html, "weather in berlin");
        assert_eq!(bundle.instant_answer.as_deref(), Some("18°C Cloudy"));
    }

    #[test]
    fn test_expander_panel_absorbs_identical_answer() {
        let html = r#"<html><body>
            <div class="sx-kp-container">
              <h2>Ada Lovelace</h2>
              <p>English mathematician and writer, chiefly known for her work on the Analytical Engine.</p>
            </div>
        </body></html>"#;
        let bundle = extract_instant_answers(html, "who is ada lovelace");
        assert_eq!(bundle.instant_answer, None);

        let panel = bundle.knowledge_panel.expect("panel expected");
        assert_eq!(panel.title, "Ada Lovelace");
        assert!(panel.description.starts_with("Ada Lovelace English mathematician"));
        assert_eq!(panel.source, "Startpage Knowledge");
        assert!(panel.facts.is_empty());
    }

    #[test]
    fn test_infobox_panel_with_facts() {
        let html = r#"<html><body>
            <aside class="infobox">
              <h2 role="heading">Rust (programming language)</h2>
              <p>Rust is a general-purpose programming language emphasizing performance, type safety, and concurrency. It enforces memory safety, meaning that all references point to valid memory, without requiring the use of automated memory management techniques such as garbage collection.</p>
              <table>
                <tr><th>Designed by:</th><td>Graydon Hoare</td></tr>
                <tr><th>First appeared</th><td>2015</td></tr>
              </table>
            </aside>
        </body></html>"#;
        let bundle = extract_instant_answers(html, "rust language");

        let panel = bundle.knowledge_panel.expect("panel expected");
        assert_eq!(panel.title, "Rust (programming language)");
        assert!(panel.description.starts_with("Rust is a general-purpose"));
        assert_eq!(panel.source, "Knowledge Panel");
        assert_eq!(panel.facts.get("Designed by").map(String::as_str), Some("Graydon Hoare"));
        assert_eq!(panel.facts.get("First appeared").map(String::as_str), Some("2015"));
    }

    #[test]
    fn test_short_infobox_is_ignored() {
        let html = r#"<div class="infobox"><h2>Tiny</h2><p>Too short to be a panel.</p></div>"#;
        assert!(extract_instant_answers(html, "tiny").knowledge_panel.is_none());
    }

    #[test]
    fn test_plain_page_has_nothing() {
        let html = r#"<html><body><p>Just some results.</p></body></html>"#;
        assert!(extract_instant_answers(html, "anything").is_empty());
    }
}
