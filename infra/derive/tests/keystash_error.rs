use keystash_derive::keystash_error;
use std::borrow::Cow;

#[keystash_error]
pub enum SampleError {
    #[error("Parse error{}: {source}", format_context(.context))]
    Parse { source: std::num::ParseIntError, context: Option<Cow<'static, str>> },

    #[error("Missing key {key}{}", format_context(.context))]
    Missing { key: String, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn parse(raw: &str) -> Result<u32, SampleError> {
    Ok(raw.parse::<u32>()?)
}

#[test]
fn keystash_error_ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/keystash_error_pass.rs");
}

#[test]
fn source_errors_convert_with_question_mark() {
    let err = parse("not-a-number").unwrap_err();
    assert!(matches!(err, SampleError::Parse { context: None, .. }));
}

#[test]
fn context_is_attached_to_upstream_errors() {
    let err = "x".parse::<u32>().context("reading port").unwrap_err();
    assert!(err.to_string().starts_with("Parse error (reading port): "));
}

#[test]
fn context_is_attached_to_own_errors() {
    let result: Result<(), SampleError> =
        Err(SampleError::Missing { key: "db".to_owned(), context: None });

    let err = result.context("lookup").unwrap_err();
    assert_eq!(err.to_string(), "Missing key db (lookup)");
}

#[test]
fn strings_fall_back_to_internal() {
    let borrowed: SampleError = "static failure".into();
    let owned: SampleError = format!("failure #{}", 2).into();

    assert_eq!(borrowed.to_string(), "Internal error: static failure");
    assert!(matches!(owned, SampleError::Internal { message, .. } if message == "failure #2"));
}
