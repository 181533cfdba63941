//! Unit tests for deployment configuration synthesis.

use super::*;
use mockall::predicate::function;
use rstest::rstest;

#[rstest]
fn prompt_embeds_docs_and_component() {
    let prompt = render_prompt("Deploy with asgard.", "billing").expect("render");
    assert!(prompt.starts_with("Based on the following documentation:\nDeploy with asgard.\n"));
    assert!(prompt.contains("config.yaml for the component billing look like"));
}

#[rstest]
fn prompt_does_not_escape_markup() {
    let prompt = render_prompt("<b>&</b>", "c").expect("render");
    assert!(prompt.contains("<b>&</b>"));
}

#[rstest]
#[case("service: billing\nreplicas: 2\n")]
#[case("```yaml\nservice: billing\nreplicas: 2\n```")]
#[case("\n```\nservice: billing\nreplicas: 2\n```\n")]
fn yaml_answers_are_parsed(#[case] answer: &str) {
    let config = DeployConfig::from_answer(answer);
    assert!(!config.is_fallback());
    assert_eq!(
        config.value(),
        &json!({ "service": "billing", "replicas": 2 })
    );
}

#[rstest]
fn invalid_yaml_falls_back_to_raw_answer() {
    let config = DeployConfig::from_answer("  service: [billing, \n");
    assert!(config.is_fallback());
    assert_eq!(config.value()["error"], UNPARSEABLE_ANSWER);
    assert_eq!(config.value()["raw"], "service: [billing,");
}

#[rstest]
fn yaml_output_round_trips() {
    let config = DeployConfig::from_answer("service: billing\nports:\n  - 8080\n");
    let yaml = config.to_yaml().expect("yaml");
    let reparsed: Value = serde_saphyr::from_str(&yaml).expect("reparse");
    assert_eq!(&reparsed, config.value());
}

#[rstest]
#[case::fallback("I cannot answer: [unclosed")]
#[case::colon_in_value("key: \"a: b\"")]
#[case::numeric_string("port: \"8080\"")]
#[case::comment_marker("note: \"a #b\"\nnested:\n  - \"x: y\"\n")]
fn written_yaml_reads_back_unchanged(#[case] answer: &str) {
    let config = DeployConfig::from_answer(answer);
    let yaml = config.to_yaml().expect("yaml");
    let reparsed: Value = serde_saphyr::from_str(&yaml).expect("reparse");
    assert_eq!(&reparsed, config.value(), "{yaml}");
}

#[rstest]
fn fallback_mapping_survives_serialisation() {
    let config = DeployConfig::from_answer("I cannot answer: [unclosed");
    assert!(config.is_fallback());
    let yaml = config.to_yaml().expect("yaml");
    let reparsed: Value = serde_saphyr::from_str(&yaml).expect("reparse");
    assert_eq!(
        reparsed,
        json!({ "error": UNPARSEABLE_ANSWER, "raw": "I cannot answer: [unclosed" })
    );
}

#[rstest]
fn plain_configuration_is_written_in_block_style() {
    let yaml = DeployConfig::from_answer("service: billing\nreplicas: 2\n")
        .to_yaml()
        .expect("yaml");
    assert!(yaml.contains("service: billing\n"), "{yaml}");
    assert!(!yaml.trim_start().starts_with('{'), "{yaml}");
}

#[rstest]
fn generate_config_sends_rendered_prompt() {
    let mut generator = MockTextGenerator::new();
    generator
        .expect_generate()
        .with(function(|prompt: &str| {
            prompt.contains("## Deploying") && prompt.contains("component billing")
        }))
        .times(1)
        .returning(|_| Ok("service: billing".into()));

    let config = generate_config(&generator, "## Deploying", "billing").expect("config");
    assert_eq!(config.value(), &json!({ "service": "billing" }));
}

#[rstest]
fn generator_failure_is_propagated() {
    let mut generator = MockTextGenerator::new();
    generator
        .expect_generate()
        .returning(|_| Err(GenerateError::EmptyAnswer));

    let err = generate_config(&generator, "", "billing").expect_err("failure");
    assert!(matches!(
        err,
        DeployError::Generate(GenerateError::EmptyAnswer)
    ));
}
