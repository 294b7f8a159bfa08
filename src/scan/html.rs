//! Token source over a raw html byte stream, driven by the html5ever tokenizer.
//!
//! Only the tokenizer runs: no tree is built, and input is pulled from the
//! reader one chunk at a time, only when the consumer asks for more tokens.
//! Bytes are decoded as utf-8, with invalid sequences replaced by U+FFFD.

use std::{
    borrow::Cow,
    collections::VecDeque,
    io::{ErrorKind, Read},
};

use html5ever::{
    tendril::{
        ByteTendril, StrTendril, fmt,
        stream::{TendrilSink, Utf8LossyDecoder},
    },
    tokenizer::{
        BufferQueue, TagKind, Token as RawToken, TokenSink, TokenSinkResult, Tokenizer,
        TokenizerOpts, TokenizerResult, states::RawKind,
    },
};
use log::trace;

use crate::scan::{
    error::ScanError,
    token::{Token, TokenSource},
};

pub const DEFAULT_CHUNK_SIZE: usize = 8192;

#[derive(Debug)]
enum Event {
    Start {
        name: String,
        attrs: Vec<(String, String)>,
    },
    End(String),
    Eof,
}

/// Collects tag events emitted while the tokenizer runs over one chunk
#[derive(Default)]
struct EventSink {
    events: VecDeque<Event>,
}

/// Tokenizer state to enter after a start tag, for elements whose content is text
fn content_state(tag: &str) -> TokenSinkResult<()> {
    match tag {
        "script" => TokenSinkResult::RawData(RawKind::ScriptData),
        "title" | "textarea" => TokenSinkResult::RawData(RawKind::Rcdata),
        "style" | "xmp" | "iframe" | "noembed" | "noframes" | "noscript" => {
            TokenSinkResult::RawData(RawKind::Rawtext)
        }
        "plaintext" => TokenSinkResult::Plaintext,
        _ => TokenSinkResult::Continue,
    }
}

impl TokenSink for EventSink {
    type Handle = ();

    fn process_token(&mut self, token: RawToken, line_number: u64) -> TokenSinkResult<()> {
        match token {
            RawToken::TagToken(tag) => {
                let name = tag.name.to_string();
                match tag.kind {
                    TagKind::StartTag => {
                        let state = content_state(&name);
                        let attrs = tag
                            .attrs
                            .into_iter()
                            .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                            .collect();
                        self.events.push_back(Event::Start { name, attrs });
                        return state;
                    }
                    TagKind::EndTag => self.events.push_back(Event::End(name)),
                }
            }
            RawToken::ParseError(msg) => trace!("html parse error at line {line_number}: {msg}"),
            RawToken::EOFToken => self.events.push_back(Event::Eof),
            _ => {}
        }
        TokenSinkResult::Continue
    }
}

/// Receives decoded text and runs the tokenizer over it
struct TokenizerFeed {
    tokenizer: Tokenizer<EventSink>,
    input: BufferQueue,
}

impl TokenizerFeed {
    fn take_events(&mut self) -> VecDeque<Event> {
        std::mem::take(&mut self.tokenizer.sink.events)
    }
}

impl TendrilSink<fmt::UTF8> for TokenizerFeed {
    type Output = VecDeque<Event>;

    fn process(&mut self, text: StrTendril) {
        self.input.push_back(text);
        match self.tokenizer.feed(&mut self.input) {
            TokenizerResult::Done => {}
            // only a tree builder suspends for scripts, EventSink never does
            TokenizerResult::Script(()) => {}
        }
    }

    fn error(&mut self, desc: Cow<'static, str>) {
        trace!("replacing invalid utf-8 in html: {desc}");
    }

    fn finish(mut self) -> VecDeque<Event> {
        self.tokenizer.end();
        self.take_events()
    }
}

pub struct HtmlTokenSource<R> {
    reader: R,
    /// `None` once the reader is exhausted and the tokenizer flushed
    decoder: Option<Utf8LossyDecoder<TokenizerFeed>>,
    chunk: Vec<u8>,
    events: VecDeque<Event>,
    attrs: VecDeque<(String, String)>,
}

impl<R: Read> HtmlTokenSource<R> {
    pub fn new(reader: R) -> Self {
        Self::with_chunk_size(reader, DEFAULT_CHUNK_SIZE)
    }

    /// `chunk_size` is the read buffer length, clamped to at least one byte
    pub fn with_chunk_size(reader: R, chunk_size: usize) -> Self {
        let feed = TokenizerFeed {
            tokenizer: Tokenizer::new(EventSink::default(), TokenizerOpts::default()),
            input: BufferQueue::default(),
        };
        Self {
            reader,
            decoder: Some(Utf8LossyDecoder::new(feed)),
            chunk: vec![0; chunk_size.max(1)],
            events: VecDeque::new(),
            attrs: VecDeque::new(),
        }
    }

    fn read_chunk(&mut self) -> Result<usize, ScanError> {
        loop {
            match self.reader.read(&mut self.chunk) {
                Ok(n) => return Ok(n),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Reads one chunk and runs the tokenizer over it.
    /// On end of input flushes the decoder and tokenizer, which reports EOF.
    fn fill(&mut self) -> Result<(), ScanError> {
        let n = self.read_chunk()?;
        if n == 0 {
            if let Some(decoder) = self.decoder.take() {
                self.events.extend(decoder.finish());
            }
            return Ok(());
        }

        if let Some(decoder) = self.decoder.as_mut() {
            decoder.process(ByteTendril::from_slice(&self.chunk[..n]));
            self.events.extend(decoder.inner_sink.take_events());
        }
        Ok(())
    }
}

impl<R: Read> TokenSource for HtmlTokenSource<R> {
    fn next_token(&mut self) -> Result<Token, ScanError> {
        loop {
            match self.events.pop_front() {
                Some(Event::Start { name, attrs }) => {
                    self.attrs = attrs.into();
                    return Ok(Token::StartTag(name));
                }
                Some(Event::End(name)) => {
                    self.attrs.clear();
                    return Ok(Token::EndTag(name));
                }
                Some(Event::Eof) => return Err(ScanError::UnexpectedEof),
                None if self.decoder.is_none() => return Err(ScanError::UnexpectedEof),
                None => self.fill()?,
            }
        }
    }

    fn next_attr(&mut self) -> Option<(String, String)> {
        self.attrs.pop_front()
    }
}
