//! Links to the external video site for the song being played.

use url::Url;

/// Player parameters for an audio-only style embed: autoplay, no controls, no related videos.
const EMBED_PARAMS: [(&str, &str); 6] = [
    ("autoplay", "1"),
    ("controls", "0"),
    ("disablekb", "1"),
    ("fs", "0"),
    ("modestbranding", "1"),
    ("rel", "0"),
];

/// Search results page for `hint` on `host`.
///
/// The hint is form-encoded, so spaces become `+`.
pub fn search_url(host: &str, hint: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(&format!("https://{host}/results"))?;
    url.query_pairs_mut().append_pair("search_query", hint);
    Ok(url)
}

/// Embeddable player URL for a known video id.
pub fn embed_url(host: &str, video_id: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(&format!("https://{host}/embed/"))?.join(video_id)?;
    url.query_pairs_mut().extend_pairs(EMBED_PARAMS);
    Ok(url)
}
