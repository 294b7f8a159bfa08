use crate::scan::error::ScanError;

/// Tag boundary reported by a [`TokenSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    StartTag(String),
    EndTag(String),
}

/// Forward-only stream of tag events over one html document.
pub trait TokenSource {
    /// Pulls the next tag event. Running out of input is an error:
    /// callers stop on their own end tag well before that.
    fn next_token(&mut self) -> Result<Token, ScanError>;

    /// Yields the attributes of the last [`Token::StartTag`] one at a time,
    /// in document order. `None` means the tag has no more attributes.
    fn next_attr(&mut self) -> Option<(String, String)>;
}
