//! Resume parameters and history notation carried in the show URL.
//!
//! The show URL looks like `base#<scene>?query`: the fragment sits before the query string.

/// URL the show was opened from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShowLocation {
    url: String,
}

const RESTART_PARAM: &str = "restartingSceneIndex";

impl ShowLocation {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }

    /// Loaded from the local file system; history is left alone.
    pub fn is_file(&self) -> bool {
        self.url
            .get(..5)
            .is_some_and(|scheme| scheme.eq_ignore_ascii_case("file:"))
    }

    /// Raw value of the first `name=` parameter following `?` or `&`.
    pub fn param(&self, name: &str) -> Option<&str> {
        let needle = format!("{name}=");
        let bytes = self.url.as_bytes();
        let mut from = 0;
        while let Some(pos) = self.url[from..].find(&needle) {
            let at = from + pos;
            if at > 0 && matches!(bytes[at - 1], b'?' | b'&') {
                let start = at + needle.len();
                let end = self.url[start..]
                    .find(['&', '#'])
                    .map_or(self.url.len(), |e| start + e);
                return Some(&self.url[start..end]);
            }
            from = at + 1;
        }
        None
    }

    /// Non-empty fragment between `#` and the query string.
    pub fn fragment(&self) -> Option<&str> {
        let before_query = self.url.split('?').next().unwrap_or_default();
        before_query.split('#').nth(1).filter(|f| !f.is_empty())
    }

    /// Scene to resume at after a forced reload or from a bookmarked fragment.
    ///
    /// The fragment wins over the query parameter. Zero, negative and unparsable values mean
    /// "no resume point".
    pub fn resume_scene(&self) -> Option<usize> {
        let raw = match self.fragment() {
            Some(fragment) => leading_int(fragment),
            None => self.param(RESTART_PARAM).and_then(leading_int),
        }?;
        usize::try_from(raw).ok().filter(|&scene| scene > 0)
    }

    /// 1-based slide requested with `currentSlide`.
    pub fn starting_slide(&self) -> Option<i64> {
        self.param("currentSlide")
            .filter(|s| !s.is_empty())
            .and_then(leading_int)
    }

    /// History entry recording `scene_index` as the fragment, keeping the query string.
    pub fn history_url(&self, scene_index: usize) -> String {
        let mut parts = self.url.splitn(2, '?');
        let head = parts.next().unwrap_or_default();
        let query = parts.next();
        let base = head.split('#').next().unwrap_or_default();
        match query {
            Some(q) if !q.is_empty() => format!("{base}#{scene_index}?{q}"),
            _ => format!("{base}#{scene_index}"),
        }
    }

    /// Reload address resuming at `scene_index`, replacing any earlier resume marker.
    pub fn restart_url(&self, scene_index: usize) -> String {
        let marker = format!("&{RESTART_PARAM}");
        let cropped = match self.url.find(&marker) {
            Some(at) => &self.url[..at],
            None => self.url.as_str(),
        };
        format!("{cropped}&{RESTART_PARAM}={scene_index}")
    }
}

/// Integer prefix of `s`, accepting an optional sign and leading whitespace.
fn leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, digits) = match s.as_bytes().first() {
        Some(b'-') => (-1, &s[1..]),
        Some(b'+') => (1, &s[1..]),
        _ => (1, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|v| sign * v)
}

#[cfg(test)]
#[path = "../../tests/unit/show/location.rs"]
mod tests;
