use keystash_derive::keystash_error;
use std::borrow::Cow;

#[keystash_error]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Unreadable file {path}{}: {source}", format_context(.context))]
    Unreadable { path: String, source: std::fmt::Error, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn main() {
    let _io: DemoError = std::io::Error::other("boom").into();
    let _internal: DemoError = "fallback".into();
}
