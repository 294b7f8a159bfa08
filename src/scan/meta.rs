//! Extraction of artwork and catalog links from the `<meta>` tags of a page head

use std::io::Read;

use log::{debug, trace, warn};

use crate::{
    domain::info::Info,
    scan::{
        error::ScanError,
        html::HtmlTokenSource,
        token::{Token, TokenSource},
    },
};

/// Parses the `<head>` of an html page, e.g. an album preview page such as
/// `https://itunes.apple.com/us/album/651871544?i=651871679`.
pub fn parse_html<R: Read>(reader: R) -> Result<Info, ScanError> {
    parse_head(&mut HtmlTokenSource::new(reader))
}

/// Scans tokens up to and including `</head>`, collecting recognized `<meta>` tags.
///
/// Later tags overwrite earlier ones. Running out of tokens before `</head>`
/// is an error: every page of interest has a head, so a missing one means
/// truncated input or a changed page layout.
pub fn parse_head<S: TokenSource>(source: &mut S) -> Result<Info, ScanError> {
    let mut info = Info::default();

    loop {
        match source.next_token()? {
            Token::EndTag(name) if name.eq_ignore_ascii_case("head") => {
                debug!("reached </head>, scan done");
                return Ok(info);
            }
            // <meta> has no end tag, all of its data is in the attributes
            Token::StartTag(name) if name.eq_ignore_ascii_case("meta") => {
                let attrs = std::iter::from_fn(|| source.next_attr()).collect::<Vec<_>>();
                apply_meta(&mut info, &attrs);
            }
            _ => {}
        }
    }
}

/// Returns the value of the first attribute named exactly `key`, or `""`
pub fn lookup<'a>(attrs: &'a [(String, String)], key: &str) -> &'a str {
    attrs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
        .unwrap_or("")
}

/// Updates `info` from one `<meta>` tag, returns whether any field was set
fn apply_meta(info: &mut Info, attrs: &[(String, String)]) -> bool {
    let property = lookup(attrs, "property");
    let name = lookup(attrs, "name");
    let content = lookup(attrs, "content");

    if (property.is_empty() && name.is_empty()) || content.is_empty() {
        trace!("skipping meta tag without key or content: {attrs:?}");
        return false;
    }

    // property and name are independent, one tag may carry both
    let mut applied = match property {
        "og:image" => set_text(&mut info.artwork.http_url, content),
        "og:image:secure_url" => set_text(&mut info.artwork.https_url, content),
        "og:image:type" => set_text(&mut info.artwork.mime_type, content),
        "og:image:width" => set_dimension(&mut info.artwork.width, property, content),
        "og:image:height" => set_dimension(&mut info.artwork.height, property, content),
        "music:musician" => set_text(&mut info.artist_url, content),
        _ => false,
    };

    if name == "music:album" {
        applied |= set_text(&mut info.album_url, content);
    }

    if applied {
        debug!("meta property={property:?} name={name:?} content={content:?}");
    } else {
        trace!("ignoring meta property={property:?} name={name:?}");
    }
    applied
}

fn set_text(field: &mut String, content: &str) -> bool {
    *field = content.to_string();
    true
}

/// Unparseable values leave the previous value in place
fn set_dimension(field: &mut i64, property: &str, content: &str) -> bool {
    match content.parse::<i64>() {
        Ok(value) => {
            *field = value;
            true
        }
        Err(e) => {
            warn!("ignoring {property} with non-numeric content {content:?}: {e}");
            false
        }
    }
}
