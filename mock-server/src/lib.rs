//! In-memory stand-in for the SmugMug 1.2.x JSON endpoint.
//!
//! Accepts form-encoded `method=` calls on `/services/api/json/{version}/` and
//! raw uploads on `/upload/{file_name}`, and answers with the `stat` envelope.
//! 1.2.0 albums carry their `Category`; 1.2.1 albums carry `LastUpdated`
//! instead, and 1.2.1 transfer statistics add video counters.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Form, Path, Query, State},
    routing::{post, put},
    Json, Router,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use md5::{Digest, Md5};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};

pub const API_KEY: &str = "test-api-key";
pub const EMAIL: &str = "tester@example.com";
pub const PASSWORD: &str = "secret";
pub const NICK_NAME: &str = "tester";

/// Base of the fake clock used for `LastUpdated`.
pub const EPOCH: i64 = 1_700_000_000;

pub const ERR_INVALID_LOGIN: i64 = 1;
pub const ERR_INVALID_SESSION: i64 = 3;
pub const ERR_NOT_FOUND: i64 = 5;
pub const ERR_BAD_UPLOAD: i64 = 6;
pub const ERR_INVALID_METHOD: i64 = 17;
pub const ERR_INVALID_API_KEY: i64 = 18;

type Params = HashMap<String, String>;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CategoryRow {
    #[serde(rename = "id")]
    pub id: i64,
    pub name: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TemplateRow {
    #[serde(rename = "id")]
    pub id: i64,
    pub album_template_name: String,
    pub public: bool,
}

#[derive(Clone, Debug)]
pub struct AlbumRow {
    pub id: i64,
    pub key: String,
    pub title: String,
    pub category_id: i64,
    pub public: bool,
    pub last_updated: i64,
}

#[derive(Clone, Debug)]
pub struct ImageRow {
    pub id: i64,
    pub album_id: i64,
    pub file_name: String,
    pub size: usize,
}

#[derive(Debug)]
pub struct Store {
    next_id: i64,
    sessions: HashSet<String>,
    pub categories: Vec<CategoryRow>,
    pub templates: Vec<TemplateRow>,
    pub albums: Vec<AlbumRow>,
    pub images: Vec<ImageRow>,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            next_id: 100,
            sessions: HashSet::new(),
            categories: vec![CategoryRow {
                id: 0,
                name: "Other".to_string(),
            }],
            templates: vec![TemplateRow {
                id: 1,
                album_template_name: "Default".to_string(),
                public: true,
            }],
            albums: Vec::new(),
            images: Vec::new(),
        }
    }
}

impl Store {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/services/api/json/{version}/", post(api))
        .route("/upload/{file_name}", put(binary_upload))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock server listening");
    }
    axum::serve(listener, app()).await
}

async fn api(State(db): State<Db>, Path(version): Path<String>, Form(params): Form<Params>) -> Json<Value> {
    let method = params.get("method").cloned().unwrap_or_default();
    debug!(%version, %method, "api call");
    let mut store = db.write().await;
    Json(dispatch(&mut store, &version, &method, &params))
}

async fn binary_upload(
    State(db): State<Db>,
    Path(file_name): Path<String>,
    Query(params): Query<Params>,
    body: Bytes,
) -> Json<Value> {
    let method = params.get("method").cloned().unwrap_or_default();
    debug!(%file_name, bytes = body.len(), "binary upload");
    let mut store = db.write().await;
    if method != "smugmug.images.upload" {
        return Json(fail(&method, ERR_INVALID_METHOD, "invalid method"));
    }
    if let Err(e) = check_session(&store, &method, &params) {
        return Json(e);
    }
    if let Some(declared) = params.get("ByteCount") {
        if declared.parse::<usize>().ok() != Some(body.len()) {
            return Json(fail(&method, ERR_BAD_UPLOAD, "wrong byte count"));
        }
    }
    Json(store_image(&mut store, &method, &params, &file_name, body.len()))
}

fn dispatch(store: &mut Store, version: &str, method: &str, params: &Params) -> Value {
    match method {
        "smugmug.login.withPassword" => login_with_password(store, method, params),
        "smugmug.login.anonymously" => login_anonymously(store, method, params),
        _ => {
            if let Err(e) = check_session(store, method, params) {
                return e;
            }
            authenticated(store, version, method, params)
        }
    }
}

fn authenticated(store: &mut Store, version: &str, method: &str, params: &Params) -> Value {
    match method {
        "smugmug.logout" => {
            if let Some(s) = params.get("SessionID") {
                store.sessions.remove(s);
            }
            ok(method, json!({}))
        }
        "smugmug.albums.get" => {
            let heavy = flag(params, "Heavy");
            let since = params.get("LastUpdated").and_then(|v| v.parse::<i64>().ok());
            let albums: Vec<Value> = store
                .albums
                .iter()
                .filter(|a| since.is_none_or(|s| a.last_updated >= s))
                .map(|a| album_json(store, version, a, heavy))
                .collect();
            ok(method, json!({ "Albums": albums }))
        }
        "smugmug.albums.create" => {
            let Some(title) = params.get("Title").cloned() else {
                return fail(method, ERR_NOT_FOUND, "missing title");
            };
            let category_id = int(params, "CategoryID").unwrap_or(0);
            if !store.categories.iter().any(|c| c.id == category_id) {
                return fail(method, ERR_NOT_FOUND, "invalid category");
            }
            let id = store.next_id();
            let key = format!("k{id}");
            store.albums.push(AlbumRow {
                id,
                key: key.clone(),
                title,
                category_id,
                public: flag(params, "Public"),
                last_updated: EPOCH + id,
            });
            ok(method, json!({ "Album": { "id": id, "Key": key } }))
        }
        "smugmug.albums.delete" => {
            let id = int(params, "AlbumID");
            let before = store.albums.len();
            store.albums.retain(|a| Some(a.id) != id);
            if store.albums.len() == before {
                return fail(method, ERR_NOT_FOUND, "invalid album");
            }
            store.images.retain(|i| Some(i.album_id) != id);
            ok(method, json!({}))
        }
        "smugmug.albumtemplates.get" => ok(method, json!({ "AlbumTemplates": store.templates })),
        "smugmug.categories.get" => ok(method, json!({ "Categories": store.categories })),
        "smugmug.categories.create" => {
            let Some(name) = params.get("Name").cloned() else {
                return fail(method, ERR_NOT_FOUND, "missing name");
            };
            let id = store.next_id();
            store.categories.push(CategoryRow { id, name });
            ok(method, json!({ "Category": { "id": id } }))
        }
        "smugmug.categories.delete" => {
            let id = int(params, "CategoryID");
            let before = store.categories.len();
            store.categories.retain(|c| Some(c.id) != id);
            if store.categories.len() == before {
                return fail(method, ERR_NOT_FOUND, "invalid category");
            }
            ok(method, json!({}))
        }
        "smugmug.users.getTree" => {
            let heavy = flag(params, "Heavy");
            let since = params.get("LastUpdated").and_then(|v| v.parse::<i64>().ok());
            let categories: Vec<Value> = store
                .categories
                .iter()
                .map(|c| {
                    let albums: Vec<Value> = store
                        .albums
                        .iter()
                        .filter(|a| a.category_id == c.id && since.is_none_or(|s| a.last_updated >= s))
                        .map(|a| album_json(store, version, a, heavy))
                        .collect();
                    json!({ "id": c.id, "Name": c.name, "Albums": albums, "SubCategories": [] })
                })
                .collect();
            ok(method, json!({ "Categories": categories }))
        }
        "smugmug.users.getTransferStats" => {
            let albums: Vec<Value> = store
                .albums
                .iter()
                .map(|a| {
                    let bytes: usize = store.images.iter().filter(|i| i.album_id == a.id).map(|i| i.size).sum();
                    let mut stats = json!({
                        "id": a.id, "Key": a.key, "Bytes": bytes,
                        "Hits": 0.0, "Small": 0.0, "Medium": 0.0, "Large": 0.0, "Original": 0.0
                    });
                    if version != "1.2.0" {
                        stats["Video320"] = json!(0.0);
                        stats["Video640"] = json!(0.0);
                        stats["Video960"] = json!(0.0);
                        stats["Video1280"] = json!(0.0);
                    }
                    stats
                })
                .collect();
            ok(method, json!({ "Albums": albums }))
        }
        "smugmug.images.upload" => {
            let Some(data) = params.get("Data") else {
                return fail(method, ERR_BAD_UPLOAD, "missing data");
            };
            let Ok(bytes) = STANDARD.decode(data) else {
                return fail(method, ERR_BAD_UPLOAD, "data is not base64");
            };
            if int(params, "ByteCount") != Some(bytes.len() as i64) {
                return fail(method, ERR_BAD_UPLOAD, "wrong byte count");
            }
            let digest = hex::encode(Md5::digest(&bytes));
            if params.get("MD5Sum") != Some(&digest) {
                return fail(method, ERR_BAD_UPLOAD, "wrong checksum");
            }
            let file_name = params.get("FileName").cloned().unwrap_or_default();
            store_image(store, method, params, &file_name, bytes.len())
        }
        _ => fail(method, ERR_INVALID_METHOD, "invalid method"),
    }
}

fn login_with_password(store: &mut Store, method: &str, params: &Params) -> Value {
    if params.get("APIKey").map(String::as_str) != Some(API_KEY) {
        return fail(method, ERR_INVALID_API_KEY, "invalid API key");
    }
    let email = params.get("EmailAddress").map(String::as_str);
    let password = params.get("Password").map(String::as_str);
    if email != Some(EMAIL) || password != Some(PASSWORD) {
        return fail(method, ERR_INVALID_LOGIN, "invalid login");
    }
    let session = new_session(store);
    ok(
        method,
        json!({
            "Login": {
                "Session": { "id": session },
                "User": { "id": 1, "NickName": NICK_NAME, "DisplayName": "Test User" },
                "PasswordHash": "5f4dcc3b5aa765d61d8327deb882cf99",
                "AccountType": "Pro",
                "FileSizeLimit": 52_428_800
            }
        }),
    )
}

fn login_anonymously(store: &mut Store, method: &str, params: &Params) -> Value {
    if params.get("APIKey").map(String::as_str) != Some(API_KEY) {
        return fail(method, ERR_INVALID_API_KEY, "invalid API key");
    }
    let session = new_session(store);
    ok(method, json!({ "Login": { "Session": { "id": session } } }))
}

fn new_session(store: &mut Store) -> String {
    let session = format!("session-{}", store.next_id());
    store.sessions.insert(session.clone());
    session
}

fn check_session(store: &Store, method: &str, params: &Params) -> Result<(), Value> {
    match params.get("SessionID") {
        Some(s) if store.sessions.contains(s) => Ok(()),
        _ => Err(fail(method, ERR_INVALID_SESSION, "invalid session")),
    }
}

fn store_image(store: &mut Store, method: &str, params: &Params, file_name: &str, size: usize) -> Value {
    let Some(album_id) = int(params, "AlbumID") else {
        return fail(method, ERR_NOT_FOUND, "invalid album");
    };
    if !store.albums.iter().any(|a| a.id == album_id) {
        return fail(method, ERR_NOT_FOUND, "invalid album");
    }
    let id = store.next_id();
    store.images.push(ImageRow {
        id,
        album_id,
        file_name: file_name.to_string(),
        size,
    });
    ok(method, json!({ "Image": { "id": id, "Key": format!("i{id}") } }))
}

fn album_json(store: &Store, version: &str, album: &AlbumRow, heavy: bool) -> Value {
    let mut v = json!({ "id": album.id, "Key": album.key, "Title": album.title });
    if version == "1.2.0" {
        if let Some(c) = store.categories.iter().find(|c| c.id == album.category_id) {
            v["Category"] = json!({ "id": c.id, "Name": c.name });
        }
    } else {
        v["LastUpdated"] = json!(album.last_updated.to_string());
    }
    if heavy {
        v["Public"] = json!(album.public);
        v["ImageCount"] = json!(store.images.iter().filter(|i| i.album_id == album.id).count());
    }
    v
}

fn ok(method: &str, payload: Value) -> Value {
    let mut v = json!({ "stat": "ok", "method": method });
    if let (Some(obj), Value::Object(extra)) = (v.as_object_mut(), payload) {
        obj.extend(extra);
    }
    v
}

fn fail(method: &str, code: i64, message: &str) -> Value {
    json!({ "stat": "fail", "method": method, "code": code, "message": message })
}

fn flag(params: &Params, name: &str) -> bool {
    params.get(name).map(String::as_str) == Some("1")
}

fn int(params: &Params, name: &str) -> Option<i64> {
    params.get(name).and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn logged_in(store: &mut Store) -> String {
        let r = dispatch(
            store,
            "1.2.0",
            "smugmug.login.withPassword",
            &params(&[("APIKey", API_KEY), ("EmailAddress", EMAIL), ("Password", PASSWORD)]),
        );
        r["Login"]["Session"]["id"].as_str().unwrap().to_string()
    }

    #[test]
    fn ok_merges_payload_into_envelope() {
        let v = ok("m", json!({ "Albums": [] }));
        assert_eq!(v, json!({ "stat": "ok", "method": "m", "Albums": [] }));
    }

    #[test]
    fn wrong_password_fails() {
        let mut store = Store::default();
        let r = dispatch(
            &mut store,
            "1.2.0",
            "smugmug.login.withPassword",
            &params(&[("APIKey", API_KEY), ("EmailAddress", EMAIL), ("Password", "nope")]),
        );
        assert_eq!(r["stat"], "fail");
        assert_eq!(r["code"], ERR_INVALID_LOGIN);
    }

    #[test]
    fn unknown_session_is_rejected() {
        let mut store = Store::default();
        let r = dispatch(&mut store, "1.2.0", "smugmug.albums.get", &params(&[("SessionID", "x")]));
        assert_eq!(r["code"], ERR_INVALID_SESSION);
    }

    #[test]
    fn album_shape_depends_on_version() {
        let mut store = Store::default();
        let s = logged_in(&mut store);
        let s = s.as_str();
        dispatch(
            &mut store,
            "1.2.0",
            "smugmug.albums.create",
            &params(&[("SessionID", s), ("Title", "T"), ("CategoryID", "0")]),
        );
        let v0 = dispatch(&mut store, "1.2.0", "smugmug.albums.get", &params(&[("SessionID", s)]));
        assert_eq!(v0["Albums"][0]["Category"]["Name"], "Other");
        assert!(v0["Albums"][0].get("LastUpdated").is_none());
        let v1 = dispatch(&mut store, "1.2.1", "smugmug.albums.get", &params(&[("SessionID", s)]));
        assert!(v1["Albums"][0].get("Category").is_none());
        assert!(v1["Albums"][0]["LastUpdated"].is_string());
    }

    #[test]
    fn text_upload_checks_md5() {
        let mut store = Store::default();
        let s = logged_in(&mut store);
        let s = s.as_str();
        let created = dispatch(
            &mut store,
            "1.2.0",
            "smugmug.albums.create",
            &params(&[("SessionID", s), ("Title", "T"), ("CategoryID", "0")]),
        );
        let album_id = created["Album"]["id"].to_string();
        let album_id = album_id.as_str();
        let r = dispatch(
            &mut store,
            "1.2.0",
            "smugmug.images.upload",
            &params(&[
                ("SessionID", s),
                ("AlbumID", album_id),
                ("Data", "aGVsbG8="),
                ("ByteCount", "5"),
                ("MD5Sum", "00000000000000000000000000000000"),
            ]),
        );
        assert_eq!(r["message"], "wrong checksum");
    }
}
