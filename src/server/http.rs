use std::io::Read as _;

use crate::{
    assets::source::AssetResolver,
    config::OverprintConfig,
    export::png::encode_png,
    foundation::error::{OverprintError, OverprintResult},
    prepare::resolve::DecodePolicy,
    render::pipeline::Renderer,
    server::request::GenerateRequest,
};

/// Route served by [`GenerateService`].
pub const GENERATE_PATH: &str = "/api/generate";

/// Transport-independent HTTP response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpReply {
    /// Status code.
    pub status: u16,
    /// `Content-Type` header value.
    pub content_type: &'static str,
    /// Extra headers.
    pub headers: Vec<(&'static str, String)>,
    /// Response body.
    pub body: Vec<u8>,
}

impl HttpReply {
    fn png(body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type: "image/png",
            headers: Vec::new(),
            body,
        }
    }

    fn error(status: u16, message: impl Into<String>) -> Self {
        let body = serde_json::json!({ "error": message.into() });
        Self {
            status,
            content_type: "application/json",
            headers: Vec::new(),
            body: body.to_string().into_bytes(),
        }
    }
}

/// Stateless request handler for `POST /api/generate`.
///
/// Each request builds its own scene and surface; only fonts and configuration are shared.
pub struct GenerateService {
    cfg: OverprintConfig,
    renderer: Renderer,
    loader: AssetResolver,
}

impl GenerateService {
    /// Load fonts and set up the asset resolver from `cfg`.
    pub fn new(cfg: OverprintConfig) -> OverprintResult<Self> {
        let renderer = Renderer::new(cfg.font_library()?);
        let loader = cfg
            .asset_resolver()
            .with_max_bytes(cfg.server.max_body_bytes);
        Ok(Self {
            cfg,
            renderer,
            loader,
        })
    }

    /// Configuration in use.
    pub fn config(&self) -> &OverprintConfig {
        &self.cfg
    }

    /// Route one request. `url` may carry a query string.
    pub fn handle(&mut self, method: &str, url: &str, body: &[u8]) -> HttpReply {
        let path = url.split('?').next().unwrap_or_default();
        if path != GENERATE_PATH {
            return HttpReply::error(404, format!("no route for '{path}'"));
        }
        if !method.eq_ignore_ascii_case("POST") {
            let mut reply = HttpReply::error(405, format!("method {method} not allowed"));
            reply.headers.push(("Allow", "POST".to_owned()));
            return reply;
        }
        if body.len() > self.cfg.server.max_body_bytes {
            return too_large(self.cfg.server.max_body_bytes);
        }

        match self.generate(body) {
            Ok(png) => HttpReply::png(png),
            Err(err) if err.is_client_error() => {
                tracing::info!(error = %err, "rejected generate request");
                HttpReply::error(400, err.to_string())
            }
            Err(err) => {
                tracing::error!(error = %err, "generate request failed");
                HttpReply::error(500, err.to_string())
            }
        }
    }

    #[tracing::instrument(skip_all, fields(body_len = body.len()))]
    fn generate(&mut self, body: &[u8]) -> OverprintResult<Vec<u8>> {
        let request = GenerateRequest::from_json(body)?;
        let scene = request.to_scene(&self.cfg, &self.loader)?;
        let surface = self
            .renderer
            .render_scene(&scene, &self.loader, DecodePolicy::FailFast)?;
        encode_png(&surface)
    }
}

/// Bind `cfg.server.bind` and serve requests one at a time until the listener closes.
pub fn serve(cfg: OverprintConfig) -> OverprintResult<()> {
    let bind = cfg.server.bind.clone();
    let server = tiny_http::Server::http(bind.as_str())
        .map_err(|e| OverprintError::config(format!("bind '{bind}': {e}")))?;
    let mut service = GenerateService::new(cfg)?;
    tracing::info!(bind = %bind, "listening");

    for request in server.incoming_requests() {
        respond(&mut service, request);
    }
    Ok(())
}

fn respond(service: &mut GenerateService, mut request: tiny_http::Request) {
    let method = request.method().to_string();
    let url = request.url().to_owned();
    let limit = service.config().server.max_body_bytes;

    let reply = if request.body_length().is_some_and(|len| len > limit) {
        too_large(limit)
    } else {
        let mut body = Vec::new();
        match request
            .as_reader()
            .take(limit as u64 + 1)
            .read_to_end(&mut body)
        {
            Ok(_) => service.handle(&method, &url, &body),
            Err(e) => HttpReply::error(400, format!("failed to read body: {e}")),
        }
    };
    tracing::debug!(%method, %url, status = reply.status, "handled request");

    let mut response = tiny_http::Response::from_data(reply.body).with_status_code(reply.status);
    for (name, value) in std::iter::once(("Content-Type", reply.content_type.to_owned()))
        .chain(reply.headers)
    {
        match tiny_http::Header::from_bytes(name.as_bytes(), value.as_bytes()) {
            Ok(h) => response = response.with_header(h),
            Err(()) => tracing::warn!(header = name, "invalid response header"),
        }
    }
    if let Err(e) = request.respond(response) {
        tracing::warn!(error = %e, "failed to send response");
    }
}

fn too_large(limit: usize) -> HttpReply {
    HttpReply::error(413, format!("request body exceeds {limit} bytes"))
}

#[cfg(test)]
#[path = "../../tests/unit/server/http.rs"]
mod tests;
