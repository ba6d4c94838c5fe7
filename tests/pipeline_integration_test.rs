//! Integration tests for the prompt generation pipeline, run against a
//! deterministic scripted model client.

mod common;

use std::collections::HashMap;
use std::sync::Arc;

use common::{dev_support_config, sample_template_source, ScriptedModelClient};
use promptforge::application::{
    ChainStage, CritiqueStage, PipelineConfig, PipelineError, PromptPipeline,
    TemplateSynthesisStage,
};
use promptforge::domain::models::PromptTemplate;
use promptforge::{ModelClient, ModelError};

fn pipeline_over(client: &Arc<ScriptedModelClient>) -> PromptPipeline {
    let model_client: Arc<dyn ModelClient> = client.clone();
    PromptPipeline::new(model_client, &PipelineConfig::default())
}

fn config_json() -> String {
    serde_json::to_string_pretty(&dev_support_config()).unwrap()
}

#[tokio::test]
async fn test_generate_prompt_happy_path() {
    let client = Arc::new(ScriptedModelClient::new(vec![
        Ok(config_json()),
        Ok(sample_template_source()),
        Ok("The template is syntactically valid Jinja2.".to_string()),
    ]));
    let pipeline = pipeline_over(&client);

    let result = pipeline
        .generate_prompt("I need an agent for project management and development support")
        .await
        .unwrap();

    assert_eq!(result.config, dev_support_config());
    assert_eq!(result.template_source, sample_template_source());
    assert!(result.critique.contains("valid"));
    assert!(!result.id.is_empty());
    assert_eq!(client.call_count(), 3);
}

#[tokio::test]
async fn test_model_failure_in_analysis_aborts_before_later_stages() {
    let client = Arc::new(ScriptedModelClient::new(vec![Err(ModelError::Network(
        "connection refused".to_string(),
    ))]));
    let pipeline = pipeline_over(&client);

    let err = pipeline.generate_prompt("some request").await.unwrap_err();

    assert!(matches!(err, PipelineError::Model(_)));
    // Synthesis and critique must never have been invoked.
    assert_eq!(client.call_count(), 1);
}

#[tokio::test]
async fn test_model_failure_in_synthesis_aborts_before_critique() {
    let client = Arc::new(ScriptedModelClient::new(vec![
        Ok(config_json()),
        Err(ModelError::Timeout),
    ]));
    let pipeline = pipeline_over(&client);

    let err = pipeline.generate_prompt("some request").await.unwrap_err();

    assert!(matches!(err, PipelineError::Model(ModelError::Timeout)));
    assert_eq!(client.call_count(), 2);
}

#[tokio::test]
async fn test_unparseable_analysis_output_preserves_raw_text() {
    let raw = "Sorry, I cannot produce a configuration for that.";
    let client = Arc::new(ScriptedModelClient::new(vec![Ok(raw.to_string())]));
    let pipeline = pipeline_over(&client);

    let err = pipeline.generate_prompt("some request").await.unwrap_err();

    match err {
        PipelineError::SchemaParse(parse_err) => {
            assert_eq!(parse_err.raw_output, raw);
            assert!(!parse_err.diagnostics.is_empty());
        }
        other => panic!("expected schema parse error, got: {other:?}"),
    }
    assert_eq!(client.call_count(), 1);
}

#[tokio::test]
async fn test_invalid_config_in_analysis_output_fails_with_diagnostics() {
    // Valid JSON, but missing the tools field entirely.
    let raw = r#"{
        "role_name": "Agent",
        "responsibilities": ["one"],
        "principles": [],
        "constraints": ["one"]
    }"#;
    let client = Arc::new(ScriptedModelClient::new(vec![Ok(raw.to_string())]));
    let pipeline = pipeline_over(&client);

    let err = pipeline.generate_prompt("some request").await.unwrap_err();

    match err {
        PipelineError::SchemaParse(parse_err) => {
            assert!(parse_err.diagnostics.iter().any(|d| d.contains("tools")));
        }
        other => panic!("expected schema parse error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_input_rejected_without_network_calls() {
    let client = Arc::new(ScriptedModelClient::new(vec![]));
    let pipeline = pipeline_over(&client);

    let err = pipeline.generate_prompt("   ").await.unwrap_err();

    assert!(matches!(err, PipelineError::EmptyInput));
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn test_analysis_prompt_embeds_input_and_format_instructions() {
    let client = Arc::new(ScriptedModelClient::new(vec![
        Ok(config_json()),
        Ok(sample_template_source()),
        Ok("fine".to_string()),
    ]));
    let pipeline = pipeline_over(&client);

    pipeline
        .generate_prompt("タスク管理エージェントが必要です")
        .await
        .unwrap();

    let prompts = client.prompts();
    assert!(prompts[0].contains("タスク管理エージェントが必要です"));
    assert!(prompts[0].contains(r#""role_name""#));
}

#[tokio::test]
async fn test_synthesis_prompt_embeds_role_and_tool_names() {
    let client = Arc::new(ScriptedModelClient::new(vec![Ok(
        sample_template_source()
    )]));
    let model_client: Arc<dyn ModelClient> = client.clone();
    let stage = TemplateSynthesisStage::new(model_client, 0.7, 4096);

    let output = stage.synthesize(&dev_support_config()).await.unwrap();
    assert!(!output.is_empty());

    let prompts = client.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("開発支援エージェント"));
    assert!(prompts[0].contains("task_manager"));
    // The structural grammar the model is told to follow
    assert!(prompts[0].contains("{{ role.name }}"));
    assert!(prompts[0].contains("{% for tool in tools %}"));
}

#[tokio::test]
async fn test_critique_stage_returns_review_text() {
    let client = Arc::new(ScriptedModelClient::new(vec![Ok(
        "1. Syntax is correct. 2. Macros unused.".to_string(),
    )]));
    let model_client: Arc<dyn ModelClient> = client.clone();
    let stage = CritiqueStage::new(model_client, 0.7, 4096);

    let review = stage.critique(&sample_template_source()).await.unwrap();
    assert!(!review.is_empty());

    let prompts = client.prompts();
    assert!(prompts[0].contains("{{ role.name }}"));
    assert!(prompts[0].contains("Jinja2"));
}

#[tokio::test]
async fn test_critique_rejects_empty_template() {
    let client = Arc::new(ScriptedModelClient::new(vec![]));
    let model_client: Arc<dyn ModelClient> = client.clone();
    let stage = CritiqueStage::new(model_client, 0.7, 4096);

    let err = stage.critique("  ").await.unwrap_err();
    assert!(matches!(err, PipelineError::EmptyInput));
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn test_chain_stage_missing_variable_names_placeholder() {
    let client = Arc::new(ScriptedModelClient::new(vec![]));
    let model_client: Arc<dyn ModelClient> = client.clone();
    let stage = ChainStage::new(
        model_client,
        PromptTemplate::new("Analyze: {user_input}", &["user_input"]),
        0.7,
        4096,
    );

    let err = stage.invoke(&HashMap::new()).await.unwrap_err();

    match err {
        PipelineError::MissingVariables(missing) => {
            assert_eq!(missing.names, vec!["user_input".to_string()]);
        }
        other => panic!("expected missing variables error, got: {other:?}"),
    }
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn test_concurrent_invocations_share_nothing() {
    // Two pipelines over independent clients running interleaved must not
    // interfere with each other's artifacts.
    let first_client = Arc::new(ScriptedModelClient::new(vec![
        Ok(config_json()),
        Ok(sample_template_source()),
        Ok("first critique".to_string()),
    ]));
    let second_client = Arc::new(ScriptedModelClient::new(vec![
        Ok(config_json()),
        Ok(sample_template_source()),
        Ok("second critique".to_string()),
    ]));
    let first = pipeline_over(&first_client);
    let second = pipeline_over(&second_client);

    let (a, b) = tokio::join!(
        first.generate_prompt("agent one"),
        second.generate_prompt("agent two"),
    );

    assert_eq!(a.unwrap().critique, "first critique");
    assert_eq!(b.unwrap().critique, "second critique");
}
