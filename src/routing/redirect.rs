//! Redirect synthesis: `Location` construction and cache headers.
//!
//! [`location`] applies the construction rules in order: base path,
//! query string, fragment. Everything taken from the request (the path
//! remainder and the query) is appended byte-for-byte as received.

use chrono::{DateTime, TimeDelta, Utc};

use super::route::Redirect;
use crate::store::model::RouteType;

/// Fixed TTL downstream caches may keep a redirect for.
pub const CACHE_TTL_SECS: i64 = 1800;

pub const CACHE_CONTROL: &str = "max-age=1800, public";

/// IMF-fixdate, the preferred HTTP-date format (RFC 9110 §5.6.7).
const HTTP_DATE: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Build the `Location` value for a matched redirect route.
///
/// `remainder` is the part of the request path beyond the matched prefix
/// (empty for exact routes); `query` is the raw request query string.
#[must_use]
pub fn location(
    route_type: RouteType,
    redirect: &Redirect,
    remainder: &str,
    query: Option<&str>,
) -> String {
    let target = &redirect.target;
    let mut out = String::with_capacity(
        target.origin.len() + target.path.len() + remainder.len() + query.map_or(0, str::len) + 2,
    );

    out.push_str(&target.origin);
    out.push_str(&target.path);

    let carry_request_data = match route_type {
        RouteType::Exact => false,
        RouteType::Prefix => !redirect.ignore_extra_path,
    };

    if carry_request_data {
        out.push_str(remainder);
    }

    let source_query = match route_type {
        RouteType::Exact => redirect.preserve_query,
        RouteType::Prefix => carry_request_data,
    }
    .then_some(query)
    .flatten()
    .filter(|q| !q.is_empty());

    if let Some(ref q) = target.query {
        out.push('?');
        out.push_str(q);
    } else if let Some(q) = source_query {
        out.push('?');
        out.push_str(q);
    }

    if let Some(ref f) = target.fragment {
        out.push('#');
        out.push_str(f);
    }

    out
}

/// `Cache-Control` and `Expires` values for a redirect sent at `now`.
#[must_use]
pub fn cache_headers(now: DateTime<Utc>) -> (&'static str, String) {
    let expires = now + TimeDelta::seconds(CACHE_TTL_SECS);
    (CACHE_CONTROL, expires.format(HTTP_DATE).to_string())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::routing::target::Target;
    use crate::store::model::RedirectType;

    fn redirect(target: &str) -> Redirect {
        Redirect {
            target: Target::parse(target).unwrap(),
            redirect_type: RedirectType::Permanent,
            preserve_query: false,
            ignore_extra_path: false,
        }
    }

    #[test]
    fn exact_drops_query_by_default() {
        let r = redirect("/bar");
        assert_eq!(location(RouteType::Exact, &r, "", Some("baz=qux")), "/bar");
    }

    #[test]
    fn exact_preserves_query_when_asked() {
        let r = Redirect {
            preserve_query: true,
            ..redirect("/qux")
        };
        assert_eq!(
            location(RouteType::Exact, &r, "", Some("foo=bar")),
            "/qux?foo=bar"
        );
        assert_eq!(location(RouteType::Exact, &r, "", None), "/qux");
        assert_eq!(location(RouteType::Exact, &r, "", Some("")), "/qux");
    }

    #[test]
    fn target_query_wins() {
        let r = Redirect {
            preserve_query: true,
            ..redirect("/bar?query=true")
        };
        assert_eq!(
            location(RouteType::Exact, &r, "", Some("other=1")),
            "/bar?query=true"
        );
        let r = redirect("/bar?query=true");
        assert_eq!(
            location(RouteType::Prefix, &r, "/x", Some("other=1")),
            "/bar/x?query=true"
        );
    }

    #[test]
    fn target_fragment_is_kept() {
        let r = redirect("/bar#section");
        assert_eq!(location(RouteType::Exact, &r, "", None), "/bar#section");
        assert_eq!(
            location(RouteType::Prefix, &r, "/x", Some("q=1")),
            "/bar/x?q=1#section"
        );
    }

    #[test]
    fn prefix_keeps_remainder_and_query() {
        let r = redirect("/bar");
        assert_eq!(
            location(RouteType::Prefix, &r, "/baz", Some("x=1")),
            "/bar/baz?x=1"
        );
        assert_eq!(location(RouteType::Prefix, &r, "", Some("baz=qux")), "/bar?baz=qux");
    }

    #[test]
    fn prefix_ignore_drops_remainder_and_query() {
        let r = Redirect {
            ignore_extra_path: true,
            ..redirect("/baz")
        };
        assert_eq!(
            location(RouteType::Prefix, &r, "/quux", Some("foo=bar")),
            "/baz"
        );
    }

    #[test]
    fn encoded_remainder_is_verbatim() {
        let r = redirect("/bar%20baz");
        assert_eq!(
            location(RouteType::Prefix, &r, "/something%2fel%2Fse", None),
            "/bar%20baz/something%2fel%2Fse"
        );
    }

    #[test]
    fn external_targets() {
        let r = redirect("http://bar.example.com/bar");
        assert_eq!(
            location(RouteType::Prefix, &r, "/baz", Some("q=1")),
            "http://bar.example.com/bar/baz?q=1"
        );
        let r = Redirect {
            preserve_query: true,
            ..redirect("http://foo.example.com/baz")
        };
        assert_eq!(
            location(RouteType::Exact, &r, "", Some("foo=qux")),
            "http://foo.example.com/baz?foo=qux"
        );
    }

    #[test]
    fn status_codes() {
        let r = redirect("/bar");
        assert_eq!(r.status().as_u16(), 301);
        let r = Redirect {
            redirect_type: RedirectType::Temporary,
            ..r
        };
        assert_eq!(r.status().as_u16(), 302);
    }

    #[test]
    fn expires_is_thirty_minutes_later() {
        let now = Utc.with_ymd_and_hms(1994, 11, 6, 8, 19, 37).unwrap();
        let (cache_control, expires) = cache_headers(now);
        assert_eq!(cache_control, "max-age=1800, public");
        assert_eq!(expires, "Sun, 06 Nov 1994 08:49:37 GMT");
    }
}
