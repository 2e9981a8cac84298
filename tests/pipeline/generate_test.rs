//! End-to-end `generate` ordering, commit, and failure semantics.

use std::sync::Arc;

use langbot::pipeline::{
    build_prompt, GenerationError, GenerationInvoker, GenerationRequest, Pipeline, PipelineError,
    Session, Stage,
};
use langbot::template::{TemplateCatalog, TemplateError, TemplateFields};
use langbot::translate::{LanguageNormalizer, Translator};
use langbot::types::{Language, Tone};

use crate::stubs::{pipeline, Reply, StubProvider, UppercaseTranslator};

fn stubs(reply: Reply) -> (Arc<UppercaseTranslator>, Arc<StubProvider>) {
    (
        Arc::new(UppercaseTranslator::default()),
        Arc::new(StubProvider::new(reply)),
    )
}

#[tokio::test]
async fn english_to_spanish_skips_inbound_and_applies_outbound() {
    let (translator, provider) = stubs(Reply::Uppercase);
    let pipeline = pipeline(&translator, &provider);
    let mut session = Session::new();

    let request = GenerationRequest::new(
        "Please approve the budget",
        Language::English,
        Language::Spanish,
        Tone::Professional,
    );
    let output = match pipeline.generate(&mut session, &request).await {
        Ok(output) => output,
        Err(err) => panic!("generation should succeed: {err}"),
    };

    let expected_prompt = build_prompt(
        "Please approve the budget",
        Language::English,
        Language::Spanish,
        Tone::Professional,
        None,
        &TemplateFields::new(),
        &[],
    )
    .expect("prompt should build");

    assert_eq!(provider.last_prompt(), expected_prompt);
    assert_eq!(output, expected_prompt.to_uppercase());
    assert_eq!(translator.calls(), 1, "only the outbound leg translates");
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn non_pivot_input_is_translated_before_prompting() {
    let (translator, provider) = stubs(Reply::Uppercase);
    let pipeline = pipeline(&translator, &provider);
    let mut session = Session::new();

    let request = GenerationRequest::new(
        "por favor",
        Language::Spanish,
        Language::English,
        Tone::Friendly,
    );
    pipeline
        .generate(&mut session, &request)
        .await
        .expect("generation should succeed");

    assert!(provider.last_prompt().contains("Message:\nPOR FAVOR\n"));
    assert!(provider
        .last_prompt()
        .contains("Input language: Spanish. Output language: English."));
    assert_eq!(translator.calls(), 1, "only the inbound leg translates");
}

#[tokio::test]
async fn success_appends_request_then_result() {
    let (translator, provider) = stubs(Reply::Uppercase);
    let pipeline = pipeline(&translator, &provider);
    let mut session = Session::new();
    assert!(session.history().is_empty());

    let request = GenerationRequest::new(
        "hi",
        Language::English,
        Language::English,
        Tone::Casual,
    );
    let output = pipeline
        .generate(&mut session, &request)
        .await
        .expect("generation should succeed");

    let entries = session.history().entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0], "User request: hi");
    assert_eq!(entries[1], format!("Generated: {output}"));
    assert_eq!(session.last_generated(), output);
}

#[tokio::test]
async fn history_feeds_following_prompts() {
    let (translator, provider) = stubs(Reply::Uppercase);
    let pipeline = pipeline(&translator, &provider);
    let mut session = Session::new();

    let first = GenerationRequest::new(
        "first",
        Language::English,
        Language::English,
        Tone::Neutral,
    );
    pipeline
        .generate(&mut session, &first)
        .await
        .expect("generation should succeed");
    assert!(!provider.last_prompt().contains("Previous conversation:"));

    let second = GenerationRequest::new(
        "second",
        Language::English,
        Language::English,
        Tone::Neutral,
    );
    pipeline
        .generate(&mut session, &second)
        .await
        .expect("generation should succeed");
    assert!(provider
        .last_prompt()
        .contains("Previous conversation:\nUser request: first\nGenerated: "));
    assert_eq!(session.history().len(), 4);
}

#[tokio::test]
async fn prompt_sees_only_trailing_window_of_long_history() {
    let (translator, provider) = stubs(Reply::Uppercase);
    let pipeline = pipeline(&translator, &provider);
    let mut session = Session::new();
    for i in 0..25 {
        session.append(format!("entry-{i:02}"));
    }

    let request = GenerationRequest::new(
        "next",
        Language::English,
        Language::English,
        Tone::Formal,
    );
    pipeline
        .generate(&mut session, &request)
        .await
        .expect("generation should succeed");

    let prompt = provider.last_prompt();
    assert!(!prompt.contains("entry-14"));
    assert!(prompt.contains("entry-15"));
    assert!(prompt.contains("entry-24"));
    assert_eq!(session.history().len(), 27, "storage keeps everything");
}

#[tokio::test]
async fn generation_failure_leaves_session_untouched() {
    let (translator, provider) = stubs(Reply::Fail);
    let pipeline = pipeline(&translator, &provider);
    let mut session = Session::new();
    session.commit("earlier", "Earlier output");
    let before = session.clone();

    let request = GenerationRequest::new(
        "hello",
        Language::English,
        Language::French,
        Tone::Assertive,
    );
    let err = match pipeline.generate(&mut session, &request).await {
        Ok(output) => panic!("generation should fail, got: {output}"),
        Err(err) => err,
    };

    assert_eq!(err.stage(), Stage::Generate);
    assert!(matches!(
        err,
        PipelineError::Generation(GenerationError::Provider(_))
    ));
    assert_eq!(session, before);
    assert_eq!(translator.calls(), 0, "outbound leg never runs after failure");
}

#[tokio::test]
async fn empty_response_is_a_generation_failure() {
    let (translator, provider) = stubs(Reply::Empty);
    let pipeline = pipeline(&translator, &provider);
    let mut session = Session::new();

    let request = GenerationRequest::new(
        "hello",
        Language::English,
        Language::English,
        Tone::Concise,
    );
    let result = pipeline.generate(&mut session, &request).await;

    assert!(matches!(
        result,
        Err(PipelineError::Generation(GenerationError::EmptyResponse))
    ));
    assert!(session.history().is_empty());
    assert_eq!(session.last_generated(), "");
}

#[tokio::test]
async fn unconfigured_generation_stops_before_outbound_leg() {
    let translator = Arc::new(UppercaseTranslator::default());
    let shared: Arc<dyn Translator> = translator.clone();
    let normalizer = LanguageNormalizer::new(Some(shared));
    let pipeline = Pipeline::new(normalizer, GenerationInvoker::default());
    let mut session = Session::new();

    let request = GenerationRequest::new(
        "hola",
        Language::Spanish,
        Language::German,
        Tone::Formal,
    );
    let result = pipeline.generate(&mut session, &request).await;

    assert!(matches!(
        result,
        Err(PipelineError::Generation(GenerationError::NotConfigured))
    ));
    assert_eq!(translator.calls(), 1, "inbound leg runs, outbound does not");
    assert!(session.history().is_empty());
}

#[tokio::test]
async fn missing_template_field_fails_before_any_call() {
    let (translator, provider) = stubs(Reply::Uppercase);
    let pipeline = pipeline(&translator, &provider);
    let mut session = Session::new();

    let fields = TemplateFields::new()
        .with("recipient", "Team")
        .with("sender", "Alex")
        .with("subject", "Roadmap");
    let request = GenerationRequest::new(
        "body",
        Language::Spanish,
        Language::French,
        Tone::Formal,
    )
    .with_template("Meeting Request", fields);

    let err = match pipeline.generate(&mut session, &request).await {
        Ok(output) => panic!("template validation should fail, got: {output}"),
        Err(err) => err,
    };

    assert_eq!(err.stage(), Stage::Template);
    match err {
        PipelineError::Template(TemplateError::FieldMissing { template, field }) => {
            assert_eq!(template, "Meeting Request");
            assert_eq!(field, "times");
        }
        other => panic!("expected missing field, got: {other}"),
    }
    assert_eq!(translator.calls(), 0);
    assert_eq!(provider.calls(), 0);
    assert!(session.history().is_empty());
}

#[tokio::test]
async fn templated_body_reaches_prompt_but_history_keeps_raw_text() {
    let (translator, provider) = stubs(Reply::Uppercase);
    let pipeline = pipeline(&translator, &provider);
    let mut session = Session::new();

    let fields = TemplateFields::new()
        .with("recipient", "Team")
        .with("sender", "Alex");
    let request = GenerationRequest::new(
        "Status update",
        Language::English,
        Language::English,
        Tone::Professional,
    )
    .with_template("General Professional Email", fields);
    pipeline
        .generate(&mut session, &request)
        .await
        .expect("generation should succeed");

    assert!(provider
        .last_prompt()
        .contains("Message:\nDear Team,\n\nStatus update\n\nBest regards,\nAlex\n"));
    assert_eq!(session.history().entries()[0], "User request: Status update");
}

#[tokio::test]
async fn sentinel_template_uses_raw_body() {
    let (translator, provider) = stubs(Reply::Uppercase);
    let pipeline = pipeline(&translator, &provider);
    let mut session = Session::new();

    let request = GenerationRequest::new(
        "Just this",
        Language::English,
        Language::English,
        Tone::Neutral,
    )
    .with_template("(none)", TemplateFields::new());
    pipeline
        .generate(&mut session, &request)
        .await
        .expect("generation should succeed");

    assert!(provider.last_prompt().contains("Message:\nJust this\n"));
}

#[tokio::test]
async fn reset_after_generation_clears_everything() {
    let (translator, provider) = stubs(Reply::Uppercase);
    let pipeline = pipeline(&translator, &provider);
    let mut session = Session::new();

    let request = GenerationRequest::new(
        "one",
        Language::English,
        Language::English,
        Tone::Neutral,
    );
    pipeline
        .generate(&mut session, &request)
        .await
        .expect("generation should succeed");
    session.reset();

    assert!(session.history().is_empty());
    assert_eq!(session.last_generated(), "");

    pipeline
        .generate(&mut session, &request)
        .await
        .expect("generation should succeed");
    assert!(!provider.last_prompt().contains("Previous conversation:"));
}

#[tokio::test]
async fn custom_catalog_replaces_builtin_templates() {
    let (translator, provider) = stubs(Reply::Uppercase);
    let catalog = TemplateCatalog::from_sources([("Short Note", "{sender}: {body}")])
        .expect("catalog should parse");
    let pipeline = pipeline(&translator, &provider).with_templates(catalog);
    assert!(pipeline.templates().get("Short Note").is_some());
    assert!(pipeline.templates().get("Meeting Request").is_none());

    let mut session = Session::new();
    let request = GenerationRequest::new(
        "ship it",
        Language::English,
        Language::English,
        Tone::Casual,
    )
    .with_template("Short Note", TemplateFields::new().with("sender", "Alex"));
    pipeline
        .generate(&mut session, &request)
        .await
        .expect("generation should succeed");

    assert!(provider.last_prompt().contains("Message:\nAlex: ship it\n"));
}
