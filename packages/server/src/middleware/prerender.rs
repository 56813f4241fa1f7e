use axum::{
    body::Body,
    extract::{Request, State},
    http::{
        HeaderMap, HeaderName, HeaderValue, Method, Uri,
        header::{CONNECTION, CONTENT_LENGTH, TRANSFER_ENCODING, USER_AGENT},
    },
    middleware::Next,
    response::Response,
};
use tracing::{info, warn};

use crate::config::PrerenderConfig;
use crate::state::AppState;

/// Lowercased User-Agent fragments identifying crawlers that need server-rendered HTML.
const CRAWLER_USER_AGENTS: &[&str] = &[
    "googlebot",
    "bingbot",
    "yandex",
    "baiduspider",
    "facebookexternalhit",
    "twitterbot",
    "linkedinbot",
    "embedly",
    "slackbot",
    "discordbot",
];

const PRERENDER_TOKEN_HEADER: &str = "x-prerender-token";

/// Whether a request should be answered by the prerendering service.
pub fn should_prerender(method: &Method, headers: &HeaderMap, uri: &Uri) -> bool {
    if method != Method::GET {
        return false;
    }

    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    CRAWLER_USER_AGENTS
        .iter()
        .any(|bot| user_agent.contains(bot))
        || has_escaped_fragment(uri)
}

fn has_escaped_fragment(uri: &Uri) -> bool {
    uri.query().is_some_and(|q| {
        q.split('&')
            .any(|pair| pair.split('=').next() == Some("_escaped_fragment_"))
    })
}

/// Forward crawler GETs to the prerender service; everything else passes through.
///
/// If the service cannot be reached the request is served normally.
pub async fn prerender(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let config = &state.config.prerender;
    if !config.enabled || !should_prerender(request.method(), request.headers(), request.uri()) {
        return next.run(request).await;
    }

    let path = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let url = format!("{}{}", config.service_url.trim_end_matches('/'), path);
    let user_agent = request.headers().get(USER_AGENT).cloned();

    match fetch_prerendered(&state.http, config, &url, user_agent).await {
        Ok(response) => {
            info!(%url, status = %response.status(), "Served prerendered page");
            response
        }
        Err(e) => {
            warn!(%url, "Prerender service unavailable, serving directly: {}", e);
            next.run(request).await
        }
    }
}

async fn fetch_prerendered(
    client: &reqwest::Client,
    config: &PrerenderConfig,
    url: &str,
    user_agent: Option<HeaderValue>,
) -> Result<Response, reqwest::Error> {
    let mut upstream = client.get(url);
    if let Some(ua) = user_agent {
        upstream = upstream.header(USER_AGENT, ua);
    }
    if let Some(token) = &config.token {
        upstream = upstream.header(PRERENDER_TOKEN_HEADER, token);
    }

    let resp = upstream.send().await?;
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = resp.bytes().await?;

    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    for (name, value) in headers.iter() {
        if !is_hop_by_hop(name) {
            response.headers_mut().append(name.clone(), value.clone());
        }
    }
    Ok(response)
}

fn is_hop_by_hop(name: &HeaderName) -> bool {
    matches!(
        name.as_str(),
        "keep-alive" | "proxy-authenticate" | "proxy-authorization" | "te" | "trailer" | "upgrade"
    ) || *name == CONNECTION
        || *name == TRANSFER_ENCODING
        || *name == CONTENT_LENGTH
}
