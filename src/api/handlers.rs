use axum::response::Html;

/// Tuner page, compiled into the binary. The page pulls its script and styles
/// from `/static/`.
const INDEX_HTML: &str = include_str!("../../templates/index.html");

pub(crate) async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
