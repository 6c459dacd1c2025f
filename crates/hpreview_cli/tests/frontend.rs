use std::fs;
use std::time::{Duration, Instant};

use hpreview_cli::server::{DRAFT_COOKIE, ServeOpts, ServerHandle, spawn_server};
use tempfile::TempDir;

const SECRET: &str = "s3cr3t!";

const CONTENT: &str = r#"{
    "items": [
        {
            "path": "/about",
            "name": "About",
            "blocks": [
                { "contentType": "richTextRow", "properties": { "content": "<p>Published copy</p>" } }
            ],
            "draft_blocks": [
                { "contentType": "richTextRow", "properties": { "content": "<p>Draft copy</p>" } },
                { "contentType": "carouselRow", "properties": {} }
            ]
        }
    ]
}"#;

fn agent() -> ureq::Agent {
    ureq::AgentBuilder::new().redirects(0).build()
}

fn wait_for_ready(url: &str) {
    let start = Instant::now();
    loop {
        match agent().get(url).call() {
            Ok(_) => return,
            Err(ureq::Error::Status(_, _)) => return,
            Err(_) => {
                if start.elapsed() > Duration::from_secs(2) {
                    panic!("frontend server did not start in time");
                }
                std::thread::sleep(Duration::from_millis(50));
            }
        }
    }
}

fn with_server(test: impl FnOnce(&str) + std::panic::UnwindSafe) {
    let temp = TempDir::new().expect("tempdir");
    let content = temp.path().join("content.json");
    fs::write(&content, CONTENT).expect("write content");

    let handle: ServerHandle = spawn_server(ServeOpts {
        host: "127.0.0.1".to_string(),
        port: 0,
        secret: SECRET.to_string(),
        endpoint: "/api/preview".to_string(),
        content: Some(content),
        no_open: true,
    })
    .expect("spawn server");

    let url = handle.url.clone();
    let result = std::panic::catch_unwind(move || {
        wait_for_ready(&url);
        test(&url);
    });

    handle.stop().expect("stop server");
    if let Err(err) = result {
        std::panic::resume_unwind(err);
    }
}

fn status_of(result: Result<ureq::Response, ureq::Error>) -> (u16, ureq::Response) {
    match result {
        Ok(response) => (response.status(), response),
        Err(ureq::Error::Status(code, response)) => (code, response),
        Err(err) => panic!("transport error: {err}"),
    }
}

fn draft_cookie(response: &ureq::Response) -> String {
    let header = response.header("Set-Cookie").expect("set-cookie header");
    let pair = header.split(';').next().expect("cookie pair").trim();
    assert!(pair.starts_with(&format!("{DRAFT_COOKIE}=")));
    pair.to_string()
}

#[test]
fn wrong_secret_is_unauthorized() {
    with_server(|url| {
        let (status, response) = status_of(
            agent()
                .get(&format!("{url}api/preview?secret=nope&path=%2Fabout&id=abc"))
                .call(),
        );
        assert_eq!(status, 401);
        assert!(response.header("Location").is_none());
        assert!(response.header("Set-Cookie").is_none());
        assert_eq!(response.into_string().expect("body"), "Invalid token");

        let (status, _) = status_of(agent().get(&format!("{url}api/preview?path=%2Fabout")).call());
        assert_eq!(status, 401);
    });
}

#[test]
fn valid_secret_enables_draft_mode_and_redirects() {
    with_server(|url| {
        let (status, response) = status_of(
            agent()
                .get(&format!(
                    "{url}api/preview?id=123e4567-e89b-12d3-a456-426614174000&path=%2Fabout&secret=s3cr3t%21"
                ))
                .call(),
        );
        assert_eq!(status, 307);
        assert_eq!(response.header("Location"), Some("/about"));
        let cookie = draft_cookie(&response);

        let published = agent()
            .get(&format!("{url}about"))
            .call()
            .expect("published page")
            .into_string()
            .expect("body");
        assert!(published.contains("Published copy"));
        assert!(!published.contains("preview-banner"));

        let draft = agent()
            .get(&format!("{url}about"))
            .set("Cookie", &cookie)
            .call()
            .expect("draft page")
            .into_string()
            .expect("body");
        assert!(draft.contains("Draft copy"));
        assert!(draft.contains("Unknown content type"));
        assert!(draft.contains("preview-banner"));
        assert!(draft.contains("/api/preview/exit?path=%2Fabout"));
    });
}

#[test]
fn missing_path_redirects_to_root() {
    with_server(|url| {
        let (status, response) =
            status_of(agent().get(&format!("{url}api/preview?secret=s3cr3t%21")).call());
        assert_eq!(status, 307);
        assert_eq!(response.header("Location"), Some("/"));
    });
}

#[test]
fn redirect_location_is_encoded_and_stays_on_site() {
    with_server(|url| {
        let (_, response) = status_of(
            agent()
                .get(&format!("{url}api/preview?secret=s3cr3t%21&path=%2Ffr%2Fcaf%C3%A9-life"))
                .call(),
        );
        assert_eq!(response.header("Location"), Some("/fr/caf%C3%A9-life"));

        let (_, response) = status_of(
            agent()
                .get(&format!(
                    "{url}api/preview?secret=s3cr3t%21&path=https%3A%2F%2Fevil.example"
                ))
                .call(),
        );
        assert_eq!(response.header("Location"), Some("/"));
    });
}

#[test]
fn forged_cookie_is_not_draft_mode() {
    with_server(|url| {
        let body = agent()
            .get(&format!("{url}about"))
            .set("Cookie", &format!("{DRAFT_COOKIE}=guess"))
            .call()
            .expect("page")
            .into_string()
            .expect("body");
        assert!(body.contains("Published copy"));
        assert!(!body.contains("preview-banner"));
    });
}

#[test]
fn exit_clears_draft_cookie() {
    with_server(|url| {
        let (status, response) = status_of(
            agent()
                .get(&format!("{url}api/preview/exit?path=%2Fabout"))
                .call(),
        );
        assert_eq!(status, 307);
        assert_eq!(response.header("Location"), Some("/about"));
        let header = response.header("Set-Cookie").expect("set-cookie");
        assert!(header.starts_with(&format!("{DRAFT_COOKIE}=;")));
        assert!(header.contains("Max-Age=0"));

        let (_, response) = status_of(agent().get(&format!("{url}api/preview/exit")).call());
        assert_eq!(response.header("Location"), Some("/"));
    });
}

#[test]
fn unknown_pages_and_methods() {
    with_server(|url| {
        let (status, response) = status_of(agent().get(&format!("{url}missing")).call());
        assert_eq!(status, 404);
        assert!(response.into_string().expect("body").contains("Page not found"));

        let (status, _) = status_of(agent().post(&format!("{url}api/preview")).call());
        assert_eq!(status, 405);
    });
}
