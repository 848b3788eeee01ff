//! `Link` response header parsing (RFC 8288), enough for GitHub pagination.

/// Target of the `rel="next"` relation, if any.
pub fn next_link(header: &str) -> Option<String> {
    find_rel(header, "next")
}

fn find_rel(header: &str, rel: &str) -> Option<String> {
    header.split(',').find_map(|link_value| {
        let mut parts = link_value.split(';');
        let target = parts
            .next()?
            .trim()
            .strip_prefix('<')?
            .strip_suffix('>')?;

        let has_rel = parts.any(|param| match param.split_once('=') {
            Some((key, value)) if key.trim().eq_ignore_ascii_case("rel") => value
                .trim()
                .trim_matches('"')
                .split_whitespace()
                .any(|r| r.eq_ignore_ascii_case(rel)),
            _ => false,
        });

        has_rel.then(|| target.to_string())
    })
}
