use ictcf_common::Result;
use url::{form_urlencoded, Url};

/// Build a request URL from `base` with its path replaced by `path`.
///
/// When `params` is non-empty the query is replaced by the pairs in the
/// given order, percent-encoded with spaces as `%20`. Scheme, host, port,
/// fragment (and, without params, the original query) come from `base`.
///
/// ```
/// use ictcf_scraper::urls::build_url;
///
/// let url = build_url("http://ictcf.biocuckoo.cn/", "Resource.php", None).unwrap();
/// assert_eq!(url.as_str(), "http://ictcf.biocuckoo.cn/Resource.php");
///
/// let params = [("id", "Patient 1")];
/// let url = build_url("http://ictcf.biocuckoo.cn/", "view.php", Some(&params[..])).unwrap();
/// assert_eq!(url.as_str(), "http://ictcf.biocuckoo.cn/view.php?id=Patient%201");
/// ```
pub fn build_url(base: &str, path: &str, params: Option<&[(&str, &str)]>) -> Result<Url> {
    let mut url = Url::parse(base)?;
    url.set_path(path);

    if let Some(params) = params.filter(|p| !p.is_empty()) {
        let query = params
            .iter()
            .map(|(k, v)| format!("{}={}", quote(k), quote(v)))
            .collect::<Vec<_>>()
            .join("&");
        url.set_query(Some(&query));
    }

    Ok(url)
}

/// Form-encode, then swap `+` for `%20`. A literal `+` was already
/// emitted as `%2B`, so every remaining `+` stands for a space.
fn quote(s: &str) -> String {
    form_urlencoded::byte_serialize(s.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
