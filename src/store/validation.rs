//! Route snapshot validation with detailed error reporting.
//!
//! The [`validate`] function checks a parsed [`RouteSet`] for structural
//! errors such as malformed paths, duplicate routes, unparseable redirect
//! targets, missing backend identifiers, and options set on the wrong
//! route type. Returns a list of [`ValidationError`] values with per-field
//! suggestions.

use std::collections::HashSet;

use super::model::{Handler, RedirectType, RouteRecord, RouteSet, RouteType};
use crate::error::ValidationError;
use crate::routing::path::normalize;
use crate::routing::target::Target;

/// Validate a single incoming path. Returns `Ok(())` or a human-readable error.
pub fn validate_path(path: &str) -> Result<(), String> {
    if path.is_empty() {
        return Err("path cannot be empty".into());
    }
    if !path.starts_with('/') {
        return Err("path must start with '/'".into());
    }
    if path.contains('?') || path.contains('#') {
        return Err("path cannot contain a query string or fragment".into());
    }
    Ok(())
}

/// Validate a redirect target. Returns `Ok(())` or a human-readable error.
pub fn validate_target(target: &str) -> Result<(), String> {
    Target::parse(target).map(|_| ()).map_err(|e| e.to_string())
}

pub fn validate(set: &RouteSet) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (i, route) in set.routes.iter().enumerate() {
        let route_id = if route.incoming_path.is_empty() {
            format!("routes[{i}]")
        } else {
            format!("{} ({})", route.incoming_path, route.route_type.as_str())
        };

        if let Err(msg) = validate_path(&route.incoming_path) {
            errors.push(ValidationError {
                route: route_id.clone(),
                field: "incoming_path".into(),
                message: msg,
                suggestion: if !route.incoming_path.is_empty()
                    && !route.incoming_path.starts_with('/')
                {
                    Some(format!("did you mean '/{}'?", route.incoming_path))
                } else {
                    None
                },
            });
        } else if !seen.insert((
            normalize(&route.incoming_path).into_owned(),
            route.route_type,
        )) {
            errors.push(ValidationError {
                route: route_id.clone(),
                field: "incoming_path".into(),
                message: format!(
                    "duplicate {} route for this path",
                    route.route_type.as_str()
                ),
                suggestion: None,
            });
        }

        match route.handler {
            Handler::Redirect => validate_redirect(route, &route_id, &mut errors),
            Handler::Backend => validate_backend(route, &route_id, &mut errors),
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_redirect(route: &RouteRecord, route_id: &str, errors: &mut Vec<ValidationError>) {
    match route.redirect_to.as_deref() {
        None => errors.push(ValidationError {
            route: route_id.into(),
            field: "redirect_to".into(),
            message: "redirect routes need a target".into(),
            suggestion: Some("set redirect_to, or use handler: backend".into()),
        }),
        Some(target) => {
            if let Err(msg) = validate_target(target) {
                errors.push(ValidationError {
                    route: route_id.into(),
                    field: "redirect_to".into(),
                    message: msg,
                    suggestion: (!target.starts_with('/') && !target.contains("://"))
                        .then(|| format!("did you mean '/{target}'?")),
                });
            }
        }
    }

    if route.preserve_query && route.route_type == RouteType::Prefix {
        errors.push(ValidationError {
            route: route_id.into(),
            field: "preserve_query".into(),
            message: "only applies to exact routes".into(),
            suggestion: Some("prefix routes keep the query unless ignore_extra_path is set".into()),
        });
    }

    if route.ignore_extra_path && route.route_type == RouteType::Exact {
        errors.push(ValidationError {
            route: route_id.into(),
            field: "ignore_extra_path".into(),
            message: "only applies to prefix routes".into(),
            suggestion: None,
        });
    }
}

fn validate_backend(route: &RouteRecord, route_id: &str, errors: &mut Vec<ValidationError>) {
    if route.backend_id.as_deref().map_or(true, str::is_empty) {
        errors.push(ValidationError {
            route: route_id.into(),
            field: "backend_id".into(),
            message: "backend routes need a backend_id".into(),
            suggestion: None,
        });
    }
    if route.redirect_to.is_some() {
        errors.push(ValidationError {
            route: route_id.into(),
            field: "redirect_to".into(),
            message: "backend routes cannot have a redirect target".into(),
            suggestion: Some("use handler: redirect".into()),
        });
    }
}

#[must_use]
pub fn format_validation_report(path: &str, set: &RouteSet) -> String {
    let mut lines = vec![format!(
        "  {} routes ({} redirects, {} backend)\n",
        set.routes.len(),
        set.redirect_count(),
        set.routes.len() - set.redirect_count()
    )];

    for route in &set.routes {
        let action = match route.handler {
            Handler::Redirect => format!(
                "{} {}",
                status_label(route.redirect_type),
                route.redirect_to.as_deref().unwrap_or("?")
            ),
            Handler::Backend => format!("backend {}", route.backend_id.as_deref().unwrap_or("?")),
        };
        lines.push(format!(
            "  {:<6} {}  -> {}",
            route.route_type.as_str(),
            route.incoming_path,
            action
        ));
    }

    format!("{} is valid\n{}", path, lines.join("\n"))
}

const fn status_label(redirect_type: RedirectType) -> &'static str {
    match redirect_type {
        RedirectType::Permanent => "301",
        RedirectType::Temporary => "302",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(routes: Vec<RouteRecord>) -> RouteSet {
        RouteSet::new(routes)
    }

    #[test]
    fn valid_routes_pass() {
        let s = set(vec![
            RouteRecord::redirect("/foo", RouteType::Exact, "/bar"),
            RouteRecord::redirect("/foo", RouteType::Prefix, "http://example.com/x"),
            RouteRecord::backend("/api", RouteType::Prefix, "frontend"),
        ]);
        assert!(validate(&s).is_ok());
    }

    #[test]
    fn empty_set_is_valid() {
        assert!(validate(&RouteSet::default()).is_ok());
    }

    #[test]
    fn path_without_slash_fails() {
        let s = set(vec![RouteRecord::redirect("foo", RouteType::Exact, "/bar")]);
        let errors = validate(&s).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.suggestion.as_deref() == Some("did you mean '/foo'?")));
    }

    #[test]
    fn path_with_query_fails() {
        let s = set(vec![RouteRecord::redirect("/foo?x=1", RouteType::Exact, "/bar")]);
        assert!(validate(&s).is_err());
    }

    #[test]
    fn duplicates_within_a_type_fail() {
        let s = set(vec![
            RouteRecord::redirect("/foo bar", RouteType::Prefix, "/a"),
            RouteRecord::redirect("/foo%20bar", RouteType::Prefix, "/b"),
        ]);
        let errors = validate(&s).unwrap_err();
        assert!(errors[0].message.contains("duplicate prefix route"));
    }

    #[test]
    fn bad_target_fails() {
        let s = set(vec![RouteRecord::redirect("/foo", RouteType::Exact, "bar")]);
        let errors = validate(&s).unwrap_err();
        assert_eq!(errors[0].field, "redirect_to");
        assert_eq!(errors[0].suggestion.as_deref(), Some("did you mean '/bar'?"));
    }

    #[test]
    fn missing_target_fails() {
        let mut r = RouteRecord::redirect("/foo", RouteType::Exact, "/bar");
        r.redirect_to = None;
        assert!(validate(&set(vec![r])).is_err());
    }

    #[test]
    fn options_on_wrong_route_type_fail() {
        let s = set(vec![
            RouteRecord::redirect("/a", RouteType::Prefix, "/b").preserving_query(),
            RouteRecord::redirect("/c", RouteType::Exact, "/d").ignoring_extra_path(),
        ]);
        let errors = validate(&s).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.message.starts_with("only applies")));
    }

    #[test]
    fn backend_without_id_fails() {
        let s = set(vec![RouteRecord::backend("/api", RouteType::Prefix, "")]);
        let errors = validate(&s).unwrap_err();
        assert_eq!(errors[0].field, "backend_id");
    }

    #[test]
    fn report_lists_routes() {
        let s = set(vec![
            RouteRecord::redirect("/foo", RouteType::Exact, "/bar").temporary(),
            RouteRecord::backend("/api", RouteType::Prefix, "frontend"),
        ]);
        let report = format_validation_report("signpost.yaml", &s);
        assert!(report.starts_with("signpost.yaml is valid"));
        assert!(report.contains("1 redirects, 1 backend"));
        assert!(report.contains("/foo  -> 302 /bar"));
        assert!(report.contains("/api  -> backend frontend"));
    }
}
