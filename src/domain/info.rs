use serde::Serialize;

/// Metadata scanned from the `<head>` of an album or track page.
///
/// Text fields are empty when the page carries no matching `<meta>` tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Info {
    pub artwork: Artwork,
    pub album_url: String,
    pub artist_url: String,
}

/// Cover image advertised through the Open Graph `og:image*` tags.
///
/// `width` and `height` stay zero when the tag is missing or not a number,
/// so a zero value does not tell the two cases apart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Artwork {
    pub http_url: String,
    pub https_url: String,
    /// MIME type, e.g. `image/jpg`
    #[serde(rename = "type")]
    pub mime_type: String,
    pub width: i64,
    pub height: i64,
}
