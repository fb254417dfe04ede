//! Keyword selection and declaration-block patterns

use peano_csd::csd::blocks::Keyword;
use peano_csd::csd::config::{CompletionConfig, GrammarMode};
use peano_csd::csd::domain::Completion;
use peano_csd::csd::error::CompletionError;
use peano_csd::csd::testing::{engine, engine_with};
use rstest::rstest;

#[test]
fn test_free_text_pattern() {
    let pattern = engine().complete("Context: Sally is a tumpus.").unwrap();
    insta::assert_snapshot!(pattern.as_str(), @r"(?:[^\[]|\[[^\[])*\[\[");

    assert!(pattern.is_match(" Formalized: [["));
    assert!(!pattern.is_match(" [[ twice [["));
}

#[test]
fn test_keyword_pattern_before_any_axiom() {
    let pattern = engine().complete("Formalized: [[").unwrap();
    insta::assert_snapshot!(pattern.as_str(), @"(?:prop|object|relation|var|axiom):");
}

#[test]
fn test_custom_markers() {
    let mut config = CompletionConfig::default();
    config.markers.start = "<<".into();
    config.markers.end = ">>".into();
    let engine = engine_with(config);

    let free_text = engine.complete("Context: [[not a block]]").unwrap();
    assert!(free_text.is_match(" then <<"));

    let keyword = engine.complete("Context: <<").unwrap();
    assert!(keyword.is_match("axiom:"));

    let object = engine.complete("Context: <<object:").unwrap();
    assert!(object.is_match("sally>>"));
    assert!(!object.is_match("sally]]"));
}

#[rstest]
#[case::nothing_declared("[[", Keyword::Prop, true)]
#[case::eq_needs_a_var("[[", Keyword::Eq, false)]
#[case::infer_needs_an_axiom("[[", Keyword::Infer, false)]
#[case::goal_needs_an_axiom("[[prop:p]] [[", Keyword::Goal, false)]
#[case::eq_after_var("[[var:x]] [[", Keyword::Eq, true)]
#[case::infer_after_axiom("[[axiom:(p a)]] [[", Keyword::Infer, true)]
#[case::goal_after_axiom("[[axiom:(p a)]] [[", Keyword::Goal, true)]
#[case::relation_always("[[axiom:(p a)]] [[", Keyword::Relation, true)]
fn test_keyword_legality(#[case] prefix: &str, #[case] keyword: Keyword, #[case] legal: bool) {
    let pattern = engine().complete(prefix).unwrap();
    assert_eq!(pattern.is_match(&format!("{}:", keyword)), legal);
}

#[rstest]
#[case(Keyword::Infer)]
#[case(Keyword::Goal)]
fn test_allow_early_inference(#[case] keyword: Keyword) {
    let mut config = CompletionConfig::default();
    config.inference.allow_early = true;
    let pattern = engine_with(config).complete("Reasoning: [[").unwrap();
    assert!(pattern.is_match(&format!("{}:", keyword)));
}

fn enumerated() -> CompletionConfig {
    CompletionConfig::default().with_mode(GrammarMode::Enumerated)
}

#[test]
fn test_enumerated_axiom_grammar() {
    let prefix = "[[prop:vumpus]] [[prop:zumpus]] [[object:sally]] [[axiom:";
    let pattern = engine_with(enumerated()).complete(prefix).unwrap();

    assert!(pattern.is_match("(vumpus 'x) -> (zumpus 'x)]]"));
    assert!(pattern.is_match("(vumpus sally)]]"));
    assert!(!pattern.is_match("(vumpus 'x)]]"));
    assert!(!pattern.is_match("(rompus sally)]]"));
}

#[test]
fn test_enumerated_transcript_is_proved() {
    let declared = "[[prop:vumpus]] [[prop:zumpus]] [[object:sally]] \
        [[axiom:(vumpus 'x) -> (zumpus 'x)]] [[axiom:(vumpus sally)]] [[goal:(zumpus sally)]]";
    let engine = engine_with(enumerated());

    let completions = engine.complete(&format!("{} [[infer:", declared)).unwrap();
    assert!(completions.is_match("(zumpus sally)]]"));
    assert!(completions.is_match("(vumpus sally)]]"));

    let finished = format!("{} [[infer:(zumpus sally)]]", declared);
    assert_eq!(
        engine.is_complete(&finished).unwrap(),
        Some(Completion::proved())
    );
}

#[test]
fn test_enumerated_relations() {
    let declared = "[[relation:likes]] [[object:ann]] [[object:bob]] \
        [[axiom:(likes 'x bob) -> (likes bob 'x)]] [[axiom:(likes ann bob)]] [[goal:(likes bob ann)]]";
    let engine = engine_with(enumerated());

    let completions = engine.complete(&format!("{} [[infer:", declared)).unwrap();
    assert!(completions.is_match("(likes bob ann)]]"));

    let finished = format!("{} [[infer:(likes bob ann)]]", declared);
    assert_eq!(
        engine.is_complete(&finished).unwrap(),
        Some(Completion::proved())
    );
}

#[test]
fn test_enumerated_without_predicates() {
    let result = engine_with(enumerated()).complete("[[object:sally]] [[axiom:");
    assert!(matches!(result, Err(CompletionError::EmptyTheory)));
}

#[test]
fn test_free_form_axiom_pattern() {
    let pattern = engine().complete("[[prop:floral]] [[axiom:").unwrap();

    assert!(pattern.is_match("(jompus 'x) -> (not (sweet 'x))]]"));
    assert!(pattern.is_match("(tumpus sally)]]"));
    assert!(!pattern.is_match("tumpus sally]]"));
}

#[test]
fn test_free_form_goal_pattern() {
    let pattern = engine().complete("[[axiom:(p a)]] [[goal:").unwrap();

    assert!(pattern.is_match("(not (floral sally))]]"));
    assert!(!pattern.is_match("(floral 'x)]]"));
}
