//! Request middleware.

use axum::{
    body::Body,
    http::{uri::PathAndQuery, Request, Uri},
    middleware::Next,
    response::Response,
};
use url::form_urlencoded;

/// Re-encode a query string with every parameter name uppercased.
///
/// Values and parameter order are preserved.
pub fn uppercase_query(query: &str) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (name, value) in form_urlencoded::parse(query.as_bytes()) {
        serializer.append_pair(&name.to_uppercase(), &value);
    }
    serializer.finish()
}

fn with_query(uri: &Uri, query: &str) -> Option<Uri> {
    let path_and_query = PathAndQuery::try_from(format!("{}?{}", uri.path(), query)).ok()?;
    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(path_and_query);
    Uri::from_parts(parts).ok()
}

/// DALI parameter names are case-insensitive; handlers only ever see
/// uppercase names.
pub async fn uppercase_query_params(mut req: Request<Body>, next: Next) -> Response {
    if let Some(query) = req.uri().query() {
        let normalized = uppercase_query(query);
        match with_query(req.uri(), &normalized) {
            Some(uri) => *req.uri_mut() = uri,
            None => tracing::warn!(uri = %req.uri(), "could not normalise query parameter names"),
        }
    }
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_uppercased_values_untouched() {
        assert_eq!(
            uppercase_query("pos=CIRCLE+10+20+1&Band=0.1%200.2&maxrec=5"),
            "POS=CIRCLE+10+20+1&BAND=0.1+0.2&MAXREC=5"
        );
    }

    #[test]
    fn test_repeated_names_keep_order() {
        assert_eq!(
            uppercase_query("collection=b&COLLECTION=a&target=m31"),
            "COLLECTION=b&COLLECTION=a&TARGET=m31"
        );
    }

    #[test]
    fn test_with_query_keeps_path() {
        let uri: Uri = "/sia?pos=x".parse().unwrap();
        let rewritten = with_query(&uri, "POS=x").unwrap();
        assert_eq!(rewritten.path(), "/sia");
        assert_eq!(rewritten.query(), Some("POS=x"));
    }
}
