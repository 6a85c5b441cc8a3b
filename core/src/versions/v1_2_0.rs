//! Typed entry points for API 1.2.0.
//!
//! Each method collects its typed parameters as named arguments and hands
//! them to [`Core`], which binds them against the running version's
//! descriptor. The same entry points serve as the base that later versions
//! delegate to.

use std::path::Path;
use std::sync::Arc;

use crate::args::Arguments;
use crate::config::ClientConfig;
use crate::envelope::Response;
use crate::error::ApiError;
use crate::http::Transport;
use crate::payloads::{
    AlbumCreated, AlbumList, AlbumTemplateList, CategoryCreated, CategoryList, LoginResult, Tree, TransferStats,
    UploadedImage,
};
use crate::upload::{EncodedUpload, UploadOptions};
use crate::versions::{ApiVersion, Core, Method};

/// Client for API 1.2.0.
///
/// Holds no session state; the session id returned by a login call is passed
/// back explicitly to every authenticated method.
#[derive(Debug, Clone)]
pub struct Api {
    core: Core,
}

impl Api {
    /// Client with its own pooled transport built from `config`.
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_transport(config, Arc::new(config.transport()))
    }

    pub fn with_transport(config: &ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self::on_core(Core::new(ApiVersion::V1_2_0, config, transport))
    }

    /// Entry points running against an arbitrary version's descriptors.
    pub(crate) fn on_core(core: Core) -> Self {
        Self { core }
    }

    pub fn core(&self) -> &Core {
        &self.core
    }

    pub fn login_with_password(
        &self,
        api_key: &str,
        email: &str,
        password: &str,
    ) -> Result<Response<LoginResult>, ApiError> {
        self.core.call(
            Method::LoginWithPassword,
            Arguments::new()
                .with("APIKey", api_key)
                .with("EmailAddress", email)
                .with("Password", password),
        )
    }

    pub fn login_anonymously(&self, api_key: &str) -> Result<Response<LoginResult>, ApiError> {
        self.core
            .call(Method::LoginAnonymously, Arguments::new().with("APIKey", api_key))
    }

    pub fn logout(&self, session_id: &str) -> Result<Response<()>, ApiError> {
        self.core
            .call(Method::Logout, Arguments::new().with("SessionID", session_id))
    }

    /// Albums of `nick_name`, or of the session's user when `None`.
    pub fn albums_get(
        &self,
        session_id: &str,
        nick_name: Option<&str>,
        heavy: bool,
        site_password: Option<&str>,
    ) -> Result<Response<AlbumList>, ApiError> {
        self.core.call(Method::AlbumsGet, albums_args(session_id, nick_name, heavy, site_password))
    }

    pub fn albums_create(
        &self,
        session_id: &str,
        title: &str,
        category_id: i64,
        template_id: Option<i64>,
        public: bool,
    ) -> Result<Response<AlbumCreated>, ApiError> {
        self.core.call(
            Method::AlbumsCreate,
            Arguments::new()
                .with("SessionID", session_id)
                .with("Title", title)
                .with("CategoryID", category_id)
                .with("AlbumTemplateID", template_id)
                .with("Public", public),
        )
    }

    pub fn albums_delete(&self, session_id: &str, album_id: i64) -> Result<Response<()>, ApiError> {
        self.core.call(
            Method::AlbumsDelete,
            Arguments::new().with("SessionID", session_id).with("AlbumID", album_id),
        )
    }

    pub fn album_templates_get(&self, session_id: &str) -> Result<Response<AlbumTemplateList>, ApiError> {
        self.core
            .call(Method::AlbumTemplatesGet, Arguments::new().with("SessionID", session_id))
    }

    pub fn categories_get(
        &self,
        session_id: &str,
        nick_name: Option<&str>,
        site_password: Option<&str>,
    ) -> Result<Response<CategoryList>, ApiError> {
        self.core.call(
            Method::CategoriesGet,
            Arguments::new()
                .with("SessionID", session_id)
                .with("NickName", nick_name)
                .with("SitePassword", site_password),
        )
    }

    pub fn categories_create(&self, session_id: &str, name: &str) -> Result<Response<CategoryCreated>, ApiError> {
        self.core.call(
            Method::CategoriesCreate,
            Arguments::new().with("SessionID", session_id).with("Name", name),
        )
    }

    pub fn categories_delete(&self, session_id: &str, category_id: i64) -> Result<Response<()>, ApiError> {
        self.core.call(
            Method::CategoriesDelete,
            Arguments::new()
                .with("SessionID", session_id)
                .with("CategoryID", category_id),
        )
    }

    /// Categories, sub-categories and albums in one call.
    pub fn users_get_tree(
        &self,
        session_id: &str,
        nick_name: Option<&str>,
        heavy: bool,
        site_password: Option<&str>,
    ) -> Result<Response<Tree>, ApiError> {
        self.core.call(Method::UsersGetTree, albums_args(session_id, nick_name, heavy, site_password))
    }

    pub fn users_get_transfer_stats(
        &self,
        session_id: &str,
        month: u32,
        year: u32,
    ) -> Result<Response<TransferStats>, ApiError> {
        self.core.call(Method::UsersGetTransferStats, transfer_stats_args(session_id, month, year))
    }

    /// Upload through the text endpoint: Base64 data plus an MD5 checksum.
    pub fn images_upload(
        &self,
        session_id: &str,
        album_id: i64,
        file_name: &str,
        data: &[u8],
        options: &UploadOptions,
    ) -> Result<Response<UploadedImage>, ApiError> {
        let encoded = EncodedUpload::new(data);
        self.core.call(
            Method::ImagesUpload,
            upload_args(session_id, album_id, file_name, data.len(), options)
                .with("Data", encoded.data)
                .with("MD5Sum", encoded.md5_sum),
        )
    }

    /// Upload through the binary endpoint: the bytes are the request body.
    pub fn images_upload_binary(
        &self,
        session_id: &str,
        album_id: i64,
        file_name: &str,
        data: Vec<u8>,
        options: &UploadOptions,
    ) -> Result<Response<UploadedImage>, ApiError> {
        let args = upload_args(session_id, album_id, file_name, data.len(), options);
        self.core
            .call_binary(Method::ImagesUploadBinary, args, file_name, data)
    }

    /// Read `path` and upload it through the binary endpoint under its file name.
    pub fn upload_file(
        &self,
        session_id: &str,
        album_id: i64,
        path: &Path,
        options: &UploadOptions,
    ) -> Result<Response<UploadedImage>, ApiError> {
        let data = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.images_upload_binary(session_id, album_id, &file_name, data, options)
    }
}

pub(crate) fn albums_args(
    session_id: &str,
    nick_name: Option<&str>,
    heavy: bool,
    site_password: Option<&str>,
) -> Arguments {
    Arguments::new()
        .with("SessionID", session_id)
        .with("NickName", nick_name)
        .with("Heavy", heavy)
        .with("SitePassword", site_password)
}

pub(crate) fn transfer_stats_args(session_id: &str, month: u32, year: u32) -> Arguments {
    Arguments::new()
        .with("SessionID", session_id)
        .with("Month", month)
        .with("Year", year)
}

fn upload_args(
    session_id: &str,
    album_id: i64,
    file_name: &str,
    byte_count: usize,
    options: &UploadOptions,
) -> Arguments {
    Arguments::new()
        .with("SessionID", session_id)
        .with("AlbumID", album_id)
        .with("FileName", file_name)
        .with("ByteCount", byte_count)
        .with("Caption", options.caption.as_deref())
        .with("Keywords", options.keywords.as_deref())
        .with("Hidden", options.hidden)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use url::form_urlencoded;

    use super::*;
    use crate::error::TransportError;
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};

    struct Recorder {
        seen: Mutex<Vec<HttpRequest>>,
        body: &'static str,
    }

    impl Transport for Recorder {
        fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(HttpResponse {
                status: 200,
                headers: Vec::new(),
                body: self.body.to_string(),
            })
        }
    }

    fn api(body: &'static str) -> (Api, Arc<Recorder>) {
        let recorder = Arc::new(Recorder {
            seen: Mutex::new(Vec::new()),
            body,
        });
        (Api::with_transport(&ClientConfig::default(), recorder.clone()), recorder)
    }

    fn form(req: &HttpRequest) -> Vec<(String, String)> {
        form_urlencoded::parse(req.body.as_deref().unwrap()).into_owned().collect()
    }

    #[test]
    fn albums_get_sends_positional_form() {
        let (api, rec) = api(r#"{"stat":"ok","Albums":[{"id":1,"Title":"A"}]}"#);
        let r = api.albums_get("sess", None, true, None).unwrap();
        assert_eq!(r.payload.albums.len(), 1);

        let seen = rec.seen.lock().unwrap();
        assert_eq!(seen[0].url, "https://api.smugmug.com/services/api/json/1.2.0/");
        assert_eq!(
            form(&seen[0]),
            vec![
                ("method".to_string(), "smugmug.albums.get".to_string()),
                ("SessionID".to_string(), "sess".to_string()),
                ("Heavy".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn albums_create_normalizes_public_flag() {
        let (api, rec) = api(r#"{"stat":"ok","Album":{"id":5,"Key":"k"}}"#);
        let r = api.albums_create("s", "Trip", 3, None, false).unwrap();
        assert_eq!(r.payload.album.as_ref().and_then(|a| a.id), Some(5));
        let pairs = form(&rec.seen.lock().unwrap()[0]);
        assert!(pairs.contains(&("Public".to_string(), "0".to_string())));
        assert!(!pairs.iter().any(|(k, _)| k == "AlbumTemplateID"));
    }

    #[test]
    fn text_upload_frames_base64_and_md5() {
        let (api, rec) = api(r#"{"stat":"ok","Image":{"id":9,"Key":"x"}}"#);
        let options = UploadOptions {
            caption: Some("sunset".to_string()),
            ..UploadOptions::default()
        };
        api.images_upload("s", 4, "a.jpg", b"hello", &options).unwrap();
        let seen = rec.seen.lock().unwrap();
        assert_eq!(seen[0].url, "https://upload.smugmug.com/services/api/json/1.2.0/");
        let pairs = form(&seen[0]);
        let get = |k: &str| pairs.iter().find(|(n, _)| n == k).map(|(_, v)| v.as_str());
        assert_eq!(get("Data"), Some("aGVsbG8="));
        assert_eq!(get("ByteCount"), Some("5"));
        assert_eq!(get("MD5Sum"), Some("5d41402abc4b2a76b9719d911017c592"));
        assert_eq!(get("Caption"), Some("sunset"));
        assert_eq!(get("Hidden"), Some("0"));
        assert_eq!(get("Keywords"), None);
    }

    #[test]
    fn binary_upload_sends_raw_body() {
        let (api, rec) = api(r#"{"stat":"ok","Image":{"id":9}}"#);
        let r = api
            .images_upload_binary("s", 4, "a.jpg", vec![0xff, 0xd8], &UploadOptions::default())
            .unwrap();
        assert_eq!(r.payload.image.and_then(|i| i.id), Some(9));
        let seen = rec.seen.lock().unwrap();
        assert_eq!(seen[0].method, HttpMethod::Put);
        assert!(seen[0].url.starts_with("https://upload.smugmug.com/a.jpg?method=smugmug.images.upload&"));
        assert!(!seen[0].url.contains("MD5Sum"));
        assert_eq!(seen[0].body.as_deref(), Some(&[0xffu8, 0xd8][..]));
    }

    #[test]
    fn missing_upload_file_is_io_error() {
        let (api, rec) = api("");
        let err = api
            .upload_file("s", 1, Path::new("/nonexistent/definitely/missing.jpg"), &UploadOptions::default())
            .unwrap_err();
        assert!(matches!(err, ApiError::Io(_)));
        assert!(rec.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn service_error_is_a_value() {
        let (api, _) = api(r#"{"stat":"fail","method":"smugmug.logout","code":3,"message":"invalid session"}"#);
        let r = api.logout("expired").unwrap();
        assert!(r.is_error());
        assert_eq!(r.error_code(), Some(3));
    }
}
