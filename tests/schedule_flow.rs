//! Drives the router through a full browser session: gate, extract, filter,
//! export and logout, with an in-memory page source and model.

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use schedule_reader::csv::parse_rows;
use schedule_reader::error::ScheduleError;
use schedule_reader::fetch::PageSource;
use schedule_reader::openai::{CompletionModel, OpenAiError};
use schedule_reader::pipeline::ScheduleReader;
use schedule_reader::state::AppState;
use schedule_reader::web::create_router;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tower::ServiceExt;
use url::Url;

const PASSWORD: &str = "hunter2";
const DUKE_URL: &str = "https://goduke.com/sports/football/schedule";
const DEAD_URL: &str = "https://unreachable.example/schedule";

const DUKE_PAGE: &str = r#"<html><head><style>.x { color: red }</style></head><body>
    <h1>Duke Blue Devils Football</h1>
    <a href="/tickets">Tickets</a>
    <a href="https://goduke.com/roster">Roster</a>
    <a href="https://www.elonphoenix.com/">Elon</a>
    <a href="https://navysports.com/">Navy</a>
    <a href="https://gotulane.com/">Tulane</a>
</body></html>"#;

const DUKE_ROWS: &str = r#"[
    {"Date": "29-08-2025", "Time": "19:30", "Team Name": "Duke", "Ground": "Home",
     "Opponent Team Name": "Elon Phoenix", "Venue": "Wallace Wade Stadium",
     "Location": "Durham, NC", "Conference": "", "Promo": "Fan Day"},
    {"Date": "13-09-2025", "Time": "12:00", "Team Name": "Duke", "Ground": "Away",
     "Opponent Team Name": "Navy", "Venue": "Navy-Marine Corps Memorial Stadium",
     "Location": "Annapolis, MD", "Conference": "", "Promo": ""},
    {"Date": "20-09-2025", "Time": "15:30", "Team Name": "Duke", "Ground": "Home",
     "Opponent Team Name": "Tulane", "Venue": "Wallace Wade Stadium",
     "Location": "Durham, NC", "Conference": "", "Promo": ""}
]"#;

struct Pages {
    requests: AtomicUsize,
}

#[async_trait]
impl PageSource for Pages {
    async fn fetch(&self, url: &Url) -> Result<String, ScheduleError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if url.as_str() == DUKE_URL {
            Ok(DUKE_PAGE.to_string())
        } else {
            Err(ScheduleError::Status(503))
        }
    }
}

struct Model {
    calls: AtomicUsize,
}

#[async_trait]
impl CompletionModel for Model {
    async fn complete(&self, _system: &str, user: &str) -> Result<String, OpenAiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if user.contains("Duke Blue Devils Football") {
            Ok(DUKE_ROWS.to_string())
        } else {
            Ok("Sorry, I could not find a schedule.".to_string())
        }
    }
}

struct Harness {
    router: Router,
    pages: Arc<Pages>,
    model: Arc<Model>,
}

impl Harness {
    fn new() -> Self {
        let pages = Arc::new(Pages {
            requests: AtomicUsize::new(0),
        });
        let model = Arc::new(Model {
            calls: AtomicUsize::new(0),
        });
        let reader = ScheduleReader::new(pages.clone(), model.clone());
        Self {
            router: create_router(AppState::new(reader, PASSWORD)),
            pages,
            model,
        }
    }

    async fn get(&self, path: &str, cookie: Option<&str>) -> Response {
        let mut req = Request::get(path);
        if let Some(cookie) = cookie {
            req = req.header(header::COOKIE, cookie);
        }
        self.router
            .clone()
            .oneshot(req.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn post(&self, path: &str, cookie: &str, fields: &[(&str, &str)]) -> Response {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        let req = Request::post(path)
            .header(header::COOKIE, cookie)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        self.router.clone().oneshot(req).await.unwrap()
    }

    /// Opens a session and returns its `name=value` cookie pair.
    async fn open_session(&self) -> String {
        let resp = self.get("/", None).await;
        let set_cookie = resp.headers()[header::SET_COOKIE].to_str().unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }
}

async fn text(resp: Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn assert_redirect_home(resp: &Response) {
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()[header::LOCATION], "/");
}

#[tokio::test]
async fn test_gate_blocks_everything_until_password() {
    let h = Harness::new();
    let cookie = h.open_session().await;

    let resp = h.post("/extract", &cookie, &[("urls", DUKE_URL)]).await;
    assert_redirect_home(&resp);
    assert_eq!(h.pages.requests.load(Ordering::SeqCst), 0);

    let resp = h.post("/login", &cookie, &[("password", "wrong")]).await;
    assert_redirect_home(&resp);
    let page = text(h.get("/", Some(&cookie)).await).await;
    assert!(page.contains("Incorrect password"));
    assert!(page.contains("type=\"password\""));

    // The rejection notice is shown once.
    let page = text(h.get("/", Some(&cookie)).await).await;
    assert!(!page.contains("Incorrect password"));

    assert_eq!(
        h.get("/export.csv", Some(&cookie)).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn test_full_session_round_trip() {
    let h = Harness::new();
    let cookie = h.open_session().await;

    let resp = h.post("/login", &cookie, &[("password", PASSWORD)]).await;
    assert_redirect_home(&resp);
    let page = text(h.get("/", Some(&cookie)).await).await;
    assert!(page.contains("Access granted."));
    assert!(page.contains("Get Schedule"));

    // Nothing extracted yet.
    assert_eq!(
        h.get("/export.csv", Some(&cookie)).await.status(),
        StatusCode::NOT_FOUND
    );

    let urls = format!("\n{DEAD_URL}\n\n  {DUKE_URL}  \n");
    let resp = h.post("/extract", &cookie, &[("urls", urls.as_str())]).await;
    assert_redirect_home(&resp);
    assert_eq!(h.pages.requests.load(Ordering::SeqCst), 2);
    assert_eq!(h.model.calls.load(Ordering::SeqCst), 1);

    let page = text(h.get("/", Some(&cookie)).await).await;
    assert!(page.contains("Extracted 3 rows from 1 of 2 links."));
    assert!(page.contains("<td>Elon Phoenix</td>"));
    assert!(page.contains("<td>Tulane</td>"));
    assert!(!page.contains("<td>Navy</td>"));

    // Default view: Home only.
    let resp = h.get("/export.csv", Some(&cookie)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"combined_schedule.csv\""
    );
    assert!(
        resp.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/csv")
    );
    let rows = parse_rows(&text(resp).await, ',');
    assert_eq!(
        rows[0],
        vec![
            "Date",
            "Time",
            "Team Name",
            "Opponent Team Name",
            "Team Domain",
            "Opponent Domain",
            "Ground",
            "Venue",
            "Location",
            "Conference",
            "Promo",
        ]
    );
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1][3], "Elon Phoenix");
    assert_eq!(rows[1][4], "goduke.com");
    assert_eq!(rows[1][5], "elonphoenix.com");
    assert_eq!(rows[1][8], "Durham, NC");
    assert_eq!(rows[2][3], "Tulane");
    assert_eq!(rows[2][5], "gotulane.com");

    // Away only; no re-extraction.
    let resp = h.post("/filter", &cookie, &[("away", "true")]).await;
    assert_redirect_home(&resp);
    let rows = parse_rows(&text(h.get("/export.csv", Some(&cookie)).await).await, ',');
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1][3], "Navy");
    assert_eq!(rows[1][5], "navysports.com");
    assert_eq!(h.model.calls.load(Ordering::SeqCst), 1);

    let page = text(h.get("/", Some(&cookie)).await).await;
    assert!(page.contains("name=\"away\" value=\"true\" checked"));
    assert!(page.contains("name=\"home\" value=\"true\">"));

    // Logout discards everything tied to the old cookie.
    let resp = h.post("/logout", &cookie, &[]).await;
    assert_redirect_home(&resp);
    let cleared = resp.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cleared.contains("Max-Age=0"));
    assert_eq!(
        h.get("/export.csv", Some(&cookie)).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn test_blank_input_warns_without_fetching() {
    let h = Harness::new();
    let cookie = h.open_session().await;
    h.post("/login", &cookie, &[("password", PASSWORD)]).await;

    h.post("/extract", &cookie, &[("urls", "  \n\n \t")]).await;
    let page = text(h.get("/", Some(&cookie)).await).await;
    assert!(page.contains("Please paste at least one valid schedule URL."));
    assert_eq!(h.pages.requests.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_all_failures_keep_previous_table() {
    let h = Harness::new();
    let cookie = h.open_session().await;
    h.post("/login", &cookie, &[("password", PASSWORD)]).await;

    h.post("/extract", &cookie, &[("urls", DUKE_URL)]).await;
    h.post("/extract", &cookie, &[("urls", DEAD_URL)]).await;

    let page = text(h.get("/", Some(&cookie)).await).await;
    assert!(page.contains("No data extracted from any URL."));
    assert!(page.contains("<td>Elon Phoenix</td>"));
}
