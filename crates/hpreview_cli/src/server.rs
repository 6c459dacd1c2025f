//! Demo frontend: preview entry/exit endpoints and draft-aware pages

use std::io::Read;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Context, Result};
use subtle::ConstantTimeEq;
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::blocks::render_blocks;
use crate::content::ContentStore;
use crate::page::{PageRenderer, PageView};
use crate::query::{QueryParams, split_target};

pub const DRAFT_COOKIE: &str = "__hpreview_draft";
pub const DEFAULT_ENDPOINT: &str = "/api/preview";

type BoxedResponse = Response<Box<dyn Read + Send>>;

pub struct ServeOpts {
    pub host: String,
    pub port: u16,
    pub secret: String,
    pub endpoint: String,
    pub content: Option<PathBuf>,
    pub no_open: bool,
}

pub struct ServerHandle {
    pub url: String,
    shutdown: Arc<AtomicBool>,
    join: JoinHandle<Result<()>>,
}

impl ServerHandle {
    pub fn stop(self) -> Result<()> {
        self.shutdown.store(true, Ordering::SeqCst);
        match self.join.join() {
            Ok(result) => result,
            Err(_) => anyhow::bail!("frontend server thread panicked"),
        }
    }
}

/// Request-independent state of the frontend.
pub struct Site {
    secret: String,
    endpoint: String,
    exit_endpoint: String,
    draft_token: String,
    content: Option<ContentStore>,
    pages: PageRenderer,
}

impl Site {
    pub fn new(secret: String, endpoint: &str, content: Option<ContentStore>) -> Result<Self> {
        if secret.is_empty() {
            anyhow::bail!("preview secret must not be empty (pass --secret or set PREVIEW_SECRET)");
        }
        let endpoint = format!("/{}", endpoint.trim_matches('/'));
        Ok(Self {
            secret,
            exit_endpoint: format!("{endpoint}/exit"),
            endpoint,
            draft_token: Uuid::new_v4().simple().to_string(),
            content,
            pages: PageRenderer::new()?,
        })
    }

    fn secret_matches(&self, candidate: Option<&str>) -> bool {
        let Some(candidate) = candidate else {
            return false;
        };
        candidate.as_bytes().ct_eq(self.secret.as_bytes()).into()
    }

    fn is_draft(&self, request: &Request) -> bool {
        cookie_value(request, DRAFT_COOKIE)
            .is_some_and(|value| bool::from(value.as_bytes().ct_eq(self.draft_token.as_bytes())))
    }
}

pub fn run_server(opts: ServeOpts) -> Result<()> {
    let site = build_site(&opts)?;
    let (server, addr) = bind_server(&opts.host, opts.port)?;
    let url = server_url(&opts.host, addr);

    println!("Frontend: {url}");
    println!("Preview endpoint: {url}{}", site.endpoint.trim_start_matches('/'));

    if !opts.no_open {
        if let Err(err) = webbrowser::open(&url) {
            warn!(error = %err, "failed to open browser");
        }
    }

    serve_loop(server, site, None)
}

pub fn spawn_server(opts: ServeOpts) -> Result<ServerHandle> {
    let site = build_site(&opts)?;
    let (server, addr) = bind_server(&opts.host, opts.port)?;
    let url = server_url(&opts.host, addr);
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_thread = shutdown.clone();
    let join = thread::spawn(move || serve_loop(server, site, Some(shutdown_thread)));

    Ok(ServerHandle {
        url,
        shutdown,
        join,
    })
}

fn build_site(opts: &ServeOpts) -> Result<Site> {
    let content = match &opts.content {
        Some(path) => Some(ContentStore::load(path)?),
        None => None,
    };
    Site::new(opts.secret.clone(), &opts.endpoint, content)
}

fn bind_server(host: &str, port: u16) -> Result<(Server, SocketAddr)> {
    let addr = format!("{host}:{port}");
    let server =
        Server::http(&addr).map_err(|err| anyhow::anyhow!("failed to bind to {addr}: {err}"))?;
    let actual = server
        .server_addr()
        .to_ip()
        .ok_or_else(|| anyhow::anyhow!("failed to resolve socket address"))?;
    Ok((server, actual))
}

fn server_url(host: &str, addr: SocketAddr) -> String {
    format!("http://{host}:{}/", addr.port())
}

fn serve_loop(server: Server, site: Site, shutdown: Option<Arc<AtomicBool>>) -> Result<()> {
    loop {
        if let Some(flag) = &shutdown {
            if flag.load(Ordering::SeqCst) {
                break;
            }
        }

        let request = match server.recv_timeout(Duration::from_millis(200)) {
            Ok(Some(request)) => request,
            Ok(None) => continue,
            Err(err) => return Err(err.into()),
        };

        let response = match handle_request(&request, &site) {
            Ok(response) => response,
            Err(err) => {
                warn!(url = request.url(), error = %err, "request failed");
                text_response(500, "Internal Server Error")
            }
        };

        if let Err(err) = request.respond(response) {
            warn!(error = %err, "failed to send response");
        }
    }
    Ok(())
}

pub fn handle_request(request: &Request, site: &Site) -> Result<BoxedResponse> {
    if request.method() != &Method::Get && request.method() != &Method::Head {
        return Ok(text_response(405, "Method Not Allowed"));
    }

    let (raw_path, raw_query) = split_target(request.url());
    let query = QueryParams::parse(raw_query);
    let path = urlencoding::decode(raw_path)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| raw_path.to_string());

    if path == site.endpoint {
        enter_preview(site, &query)
    } else if path == site.exit_endpoint {
        exit_preview(&query)
    } else {
        render_page(site, &path, site.is_draft(request))
    }
}

fn enter_preview(site: &Site, query: &QueryParams) -> Result<BoxedResponse> {
    if !site.secret_matches(query.get("secret")) {
        warn!("rejected preview request with invalid secret");
        return Ok(text_response(401, "Invalid token"));
    }
    let target = safe_redirect_target(query.get("path"));
    info!(
        id = query.get("id").unwrap_or_default(),
        path = %target,
        "enabled draft mode"
    );
    let cookie = format!(
        "{DRAFT_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax",
        site.draft_token
    );
    redirect(&target, &cookie)
}

fn exit_preview(query: &QueryParams) -> Result<BoxedResponse> {
    let target = safe_redirect_target(query.get("path"));
    info!(path = %target, "disabled draft mode");
    let cookie = format!("{DRAFT_COOKIE}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax");
    redirect(&target, &cookie)
}

fn render_page(site: &Site, path: &str, draft: bool) -> Result<BoxedResponse> {
    let exit_href = format!(
        "{}?path={}",
        site.exit_endpoint,
        urlencoding::encode(path)
    );
    let (status, heading, body_html) = match &site.content {
        None => (200, None, String::new()),
        Some(store) => match store.find(path) {
            Some(item) => (200, Some(item.name.as_str()), render_blocks(item.blocks_for(draft))),
            None => {
                debug!(path, "no content at path");
                (404, Some("Page not found"), String::new())
            }
        },
    };
    let html = site.pages.render(PageView {
        title: heading.unwrap_or("Headless Preview"),
        heading,
        path,
        draft,
        exit_href: &exit_href,
        body_html,
    })?;
    Ok(Response::from_string(html)
        .with_status_code(StatusCode(status))
        .with_header(static_header("Content-Type", "text/html; charset=utf-8"))
        .boxed())
}

/// Same-origin absolute path to redirect to; anything else becomes `/`.
pub fn safe_redirect_target(path: Option<&str>) -> String {
    let Some(path) = path.filter(|path| !path.is_empty()) else {
        return "/".to_string();
    };
    if !path.starts_with('/') || path.starts_with("//") || path.contains('\\') {
        warn!(path, "refusing redirect outside the site");
        return "/".to_string();
    }
    path.to_string()
}

/// Percent-encodes bytes that may not appear in a `Location` header value.
pub fn encode_location(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for byte in path.bytes() {
        if byte.is_ascii_graphic() {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}

fn redirect(target: &str, cookie: &str) -> Result<BoxedResponse> {
    let location = Header::from_bytes("Location", encode_location(target))
        .map_err(|_| anyhow::anyhow!("invalid redirect location: {target}"))?;
    let set_cookie = Header::from_bytes("Set-Cookie", cookie)
        .map_err(|_| anyhow::anyhow!("invalid cookie header"))?;
    Ok(Response::empty(307)
        .with_header(location)
        .with_header(set_cookie)
        .boxed())
}

fn text_response(status: u16, body: &str) -> BoxedResponse {
    Response::from_string(body)
        .with_status_code(StatusCode(status))
        .with_header(static_header("Content-Type", "text/plain; charset=utf-8"))
        .boxed()
}

fn static_header(name: &str, value: &str) -> Header {
    Header::from_bytes(name, value).expect("valid header")
}

fn cookie_value<'r>(request: &'r Request, name: &str) -> Option<&'r str> {
    request
        .headers()
        .iter()
        .filter(|header| header.field.equiv("Cookie"))
        .flat_map(|header| header.value.as_str().split(';'))
        .find_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key == name).then_some(value)
        })
}
