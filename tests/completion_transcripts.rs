//! End-to-end completion over curated syllogism transcripts
//!
//! Every transcript is loaded from `tests/fixtures/` and run against the
//! reference Horn engine with the default configuration.

use peano_csd::csd::config::{CompletionConfig, ExhaustedPolicy, GrammarMode};
use peano_csd::csd::domain::{Answer, Completion};
use peano_csd::csd::error::{ArityError, CompletionError, FormatError};
use peano_csd::csd::testing::{engine, engine_with, Transcripts};

#[test]
fn test_first_inference_is_a_known_fact() {
    let prefix = Transcripts::must_get("sally-start");
    let engine = engine();

    assert_eq!(engine.is_complete(&prefix).unwrap(), Some(Completion::open()));

    let completions = engine.complete(&prefix).unwrap();
    assert!(completions.is_match("(tumpus sally)]]"));
    assert!(completions.is_match("(wumpus sally)]]"));
    assert!(!completions.is_match("(rompus sally)]]"));
}

#[test]
fn test_chain_reaches_the_contradiction() {
    let prefix = Transcripts::must_get("sally-midway");
    let engine = engine();

    let completions = engine.complete(&prefix).unwrap();
    assert_eq!(engine.is_complete(&prefix).unwrap(), Some(Completion::open()));

    assert!(completions.is_match("(floral sally)]]"));
    assert!(!completions.is_match("(not (floral sally))]]"));
}

#[test]
fn test_refuted_goal_is_complete() {
    let transcript = Transcripts::must_get("sally-refuted");
    let verdict = engine().is_complete(&transcript).unwrap();

    assert_eq!(verdict, Some(Completion::refuted()));
}

#[test]
fn test_stated_inferences_are_not_offered_again() {
    let prefix = Transcripts::must_get("sally-duplicate");
    let completions = engine().complete(&prefix).unwrap();

    assert!(completions.is_match("(vumpus sally)]]"));
    assert!(!completions.is_match("(wumpus sally)]]"));
}

#[test]
fn test_vumpus_chain() {
    let prefix = Transcripts::must_get("vumpus-chain");
    let engine = engine();
    let completions = engine.complete(&prefix).unwrap();

    assert!(completions.is_match("(zumpus sally)]]"));
    assert!(!completions.is_match("(rompus sally)]]"));
    assert!(!completions.is_match("(vumpus sally)]]"));

    let finished = format!("{}(zumpus sally)]] [[infer:(rompus sally)]]", prefix);
    assert_eq!(
        engine.is_complete(&finished).unwrap(),
        Some(Completion::proved())
    );
}

#[test]
fn test_exhausted_chain_offers_the_sentinel() {
    let prefix = format!(
        "{}(zumpus sally)]] [[infer:(rompus sally)]] [[infer:",
        Transcripts::must_get("vumpus-chain")
    );
    let completions = engine().complete(&prefix).unwrap();

    assert!(completions.is_match("nothing]]"));
    assert!(!completions.is_match("(rompus sally)]]"));
}

#[test]
fn test_underivable_inference_is_a_replay_inconsistency() {
    let prefix = format!(
        "{}(rompus sally)]] [[infer:",
        Transcripts::must_get("vumpus-chain")
    );
    let engine = engine();

    match engine.complete(&prefix) {
        Err(CompletionError::ReplayInconsistency { index, content }) => {
            assert_eq!(index, 5);
            assert_eq!(content, "(rompus sally)");
        }
        other => panic!("expected a replay inconsistency, got {:?}", other.map(|p| p.to_string())),
    }
    assert!(engine.is_complete(&prefix).is_err());
}

#[test]
fn test_sentinel_policies() {
    let transcript = "[[axiom:(vumpus 'x) -> (zumpus 'x)]] [[goal:(zumpus sally)]] [[infer:nothing]]";

    assert_eq!(engine().is_complete(transcript).unwrap(), None);

    let mut config = CompletionConfig::default();
    config.inference.on_exhausted = ExhaustedPolicy::Done;
    assert_eq!(
        engine_with(config).is_complete(transcript).unwrap(),
        Some(Completion {
            done: true,
            answer: Answer::Unknown,
        })
    );
}

#[test]
fn test_custom_sentinel() {
    let mut config = CompletionConfig::default();
    config.inference.no_inference = "no further steps".into();
    let completions = engine_with(config)
        .complete("[[axiom:(vumpus 'x) -> (zumpus 'x)]] [[infer:")
        .unwrap();

    assert!(completions.is_match("no further steps]]"));
    assert!(!completions.is_match("nothing]]"));
}

#[test]
fn test_conflicting_axiom_is_skipped() {
    let prefix = "[[axiom:(p a)]] [[axiom:(p a b) -> (q a)]] [[axiom:(r a)]] [[infer:";
    let engine = engine();
    let completions = engine.complete(prefix).unwrap();

    assert!(completions.is_match("(p a)]]"));
    assert!(completions.is_match("(r a)]]"));
    assert!(!completions.is_match("(q a)]]"));
}

#[test]
fn test_equations_replay() {
    let transcript = "[[var:x]] [[eq:x + 1 = 3]] [[axiom:(even two)]] [[goal:(even two)]]";
    assert_eq!(
        engine().is_complete(transcript).unwrap(),
        Some(Completion::proved())
    );
}

#[test]
fn test_formatter_shapes_candidates() {
    let engine = engine().with_formatter(|value| value.replace(' ', "  "));
    let prefix = "[[axiom:(p a)]] [[infer:";
    let completions = engine.complete(prefix).unwrap();

    assert!(completions.is_match("(p  a)]]"));
    assert!(!completions.is_match("(p a)]]"));

    let replayed = "[[axiom:(p a)]] [[goal:(p a)]] [[infer:(p  a)]]";
    assert_eq!(
        engine.is_complete(replayed).unwrap(),
        Some(Completion::proved())
    );
}

#[test]
fn test_variable_named_like_an_axiom_symbol_is_skipped() {
    let transcript = "[[axiom:(p x)]] [[var:x]] [[goal:(p x)]]";
    assert_eq!(
        engine().is_complete(transcript).unwrap(),
        Some(Completion::proved())
    );
}

#[test]
fn test_variable_pattern_excludes_taken_names() {
    let pattern = engine().complete("[[axiom:(p x)]] [[var:y]] [[var:").unwrap();

    assert!(pattern.is_match("xy]]"));
    assert!(pattern.is_match("z]]"));
    for taken in ["x", "p", "y", "object", "not"] {
        assert!(!pattern.is_match(&format!("{}]]", taken)), "{} is taken", taken);
    }
}

#[test]
fn test_free_form_annotations_may_repeat_axiom_symbols() {
    let pattern = engine().complete("[[axiom:(tumpus sally)]] [[prop:").unwrap();
    assert!(pattern.is_match("tumpus]]"));
}

#[test]
fn test_enumerated_redeclarations_are_skipped() {
    let config = CompletionConfig::default().with_mode(GrammarMode::Enumerated);
    let engine = engine_with(config);

    let transcript = "[[prop:p]] [[object:sally]] [[var:sally]] [[object:p]] \
        [[axiom:(p sally)]] [[goal:(p sally)]]";
    assert_eq!(
        engine.is_complete(transcript).unwrap(),
        Some(Completion::proved())
    );

    let object = engine.complete("[[prop:p]] [[var:y]] [[object:").unwrap();
    assert!(object.is_match("sally]]"));
    assert!(!object.is_match("p]]"));
    assert!(!object.is_match("y]]"));
}

#[test]
fn test_malformed_free_form_axiom() {
    let result = engine().is_complete("[[axiom:(p a]]");
    assert!(matches!(
        result,
        Err(CompletionError::Arity(ArityError::Format(
            FormatError::MalformedExpression { .. }
        )))
    ));
}

#[test]
fn test_fact_derived_twice_is_offered_once() {
    let prefix = "[[axiom:(a 'x) -> (c 'x)]] [[axiom:(b 'x) -> (c 'x)]] \
        [[axiom:(a s)]] [[axiom:(b s)]] [[infer:";
    let completions = engine().complete(prefix).unwrap();

    assert!(completions.is_match("(c s)]]"));
    assert!(completions.is_match("(a s)]]"));
    assert_eq!(completions.as_str().matches(r"\(c s\)").count(), 1);
}
