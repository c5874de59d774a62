//! URL assembly for dispatch and discovery.

/// Strip at most one leading and one trailing path separator.
fn strip_edge_slash(part: &str) -> &str {
    let part = part.strip_prefix('/').unwrap_or(part);
    part.strip_suffix('/').unwrap_or(part)
}

/// Compose `base/version/resource/endpoint` into a single absolute URL.
///
/// Redundant separators on `base`, `version` and `resource` are tolerated;
/// `endpoint` is taken verbatim (it may carry a query string). Trailing
/// separators produced by an empty endpoint are collapsed. The base is not
/// validated beyond the caller's responsibility to supply a scheme; a
/// malformed base yields a malformed URL that fails at the transport layer.
pub(crate) fn assemble_url(base: &str, version: &str, resource: &str, endpoint: &str) -> String {
    let base = strip_edge_slash(base);
    let version = strip_edge_slash(version);
    let resource = strip_edge_slash(resource);
    let url = format!("{base}/{version}/{resource}/{endpoint}");
    url.trim_end_matches('/').to_owned()
}

/// Turn a gateway domain into an absolute base URL, prefixing `https://`
/// when the domain carries no scheme.
pub(crate) fn url_from_domain(domain: &str) -> String {
    if domain.starts_with("http") {
        domain.to_owned()
    } else {
        format!("https://{domain}")
    }
}
