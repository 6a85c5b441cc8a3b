//! API versions, the method catalog and the mechanics shared by every version.
//!
//! # Design
//! A version is data, not a type hierarchy. `VersionProfile::for_version`
//! starts from the 1.2.0 descriptor table and applies each version's argument
//! deltas along its lineage. `Core` owns the transport and binds named
//! convenience arguments to whichever descriptor the profile holds, so an
//! entry point written for 1.2.0 automatically routes through a 1.2.1
//! descriptor when it runs on a 1.2.1 core.
//!
//! The typed entry points live in [`v1_2_0`] and [`v1_2_1`].

pub mod v1_2_0;
pub mod v1_2_1;

use std::fmt;
use std::sync::Arc;

use tracing::warn;

use crate::args::Arguments;
use crate::config::{ClientConfig, Endpoints};
use crate::descriptor::MethodDescriptor;
use crate::envelope::{Payload, Response};
use crate::error::ApiError;
use crate::http::Transport;
use crate::invoker::MethodInvoker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiVersion {
    V1_2_0,
    V1_2_1,
}

impl ApiVersion {
    pub fn as_str(self) -> &'static str {
        match self {
            ApiVersion::V1_2_0 => "1.2.0",
            ApiVersion::V1_2_1 => "1.2.1",
        }
    }

    /// The version this one is defined against.
    pub fn parent(self) -> Option<ApiVersion> {
        match self {
            ApiVersion::V1_2_0 => None,
            ApiVersion::V1_2_1 => Some(ApiVersion::V1_2_0),
        }
    }

    fn deltas(self) -> &'static [ArgumentDelta] {
        match self {
            ApiVersion::V1_2_0 => &[],
            ApiVersion::V1_2_1 => V1_2_1_DELTAS,
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which endpoint a method is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointKind {
    Api,
    Upload,
    BinaryUpload,
}

/// Every remote operation the client knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    LoginWithPassword,
    LoginAnonymously,
    Logout,
    AlbumsGet,
    AlbumsCreate,
    AlbumsDelete,
    AlbumTemplatesGet,
    CategoriesGet,
    CategoriesCreate,
    CategoriesDelete,
    UsersGetTree,
    UsersGetTransferStats,
    ImagesUpload,
    ImagesUploadBinary,
}

impl Method {
    pub const COUNT: usize = 14;

    /// Every method in declaration order, so `ALL[m as usize] == m`.
    pub const ALL: [Method; Method::COUNT] = [
        Method::LoginWithPassword,
        Method::LoginAnonymously,
        Method::Logout,
        Method::AlbumsGet,
        Method::AlbumsCreate,
        Method::AlbumsDelete,
        Method::AlbumTemplatesGet,
        Method::CategoriesGet,
        Method::CategoriesCreate,
        Method::CategoriesDelete,
        Method::UsersGetTree,
        Method::UsersGetTransferStats,
        Method::ImagesUpload,
        Method::ImagesUploadBinary,
    ];

    pub fn endpoint(self) -> EndpointKind {
        match self {
            Method::ImagesUpload => EndpointKind::Upload,
            Method::ImagesUploadBinary => EndpointKind::BinaryUpload,
            _ => EndpointKind::Api,
        }
    }

    /// Wire name and argument slots as of 1.2.0.
    fn base_descriptor(self) -> MethodDescriptor {
        match self {
            Method::LoginWithPassword => {
                MethodDescriptor::new("smugmug.login.withPassword", ["APIKey", "EmailAddress", "Password"])
            }
            Method::LoginAnonymously => MethodDescriptor::new("smugmug.login.anonymously", ["APIKey"]),
            Method::Logout => MethodDescriptor::new("smugmug.logout", ["SessionID"]),
            Method::AlbumsGet => {
                MethodDescriptor::new("smugmug.albums.get", ["SessionID", "NickName", "Heavy", "SitePassword"])
            }
            Method::AlbumsCreate => MethodDescriptor::new(
                "smugmug.albums.create",
                ["SessionID", "Title", "CategoryID", "AlbumTemplateID", "Public"],
            ),
            Method::AlbumsDelete => MethodDescriptor::new("smugmug.albums.delete", ["SessionID", "AlbumID"]),
            Method::AlbumTemplatesGet => MethodDescriptor::new("smugmug.albumtemplates.get", ["SessionID"]),
            Method::CategoriesGet => {
                MethodDescriptor::new("smugmug.categories.get", ["SessionID", "NickName", "SitePassword"])
            }
            Method::CategoriesCreate => MethodDescriptor::new("smugmug.categories.create", ["SessionID", "Name"]),
            Method::CategoriesDelete => {
                MethodDescriptor::new("smugmug.categories.delete", ["SessionID", "CategoryID"])
            }
            Method::UsersGetTree => {
                MethodDescriptor::new("smugmug.users.getTree", ["SessionID", "NickName", "Heavy", "SitePassword"])
            }
            Method::UsersGetTransferStats => {
                MethodDescriptor::new("smugmug.users.getTransferStats", ["SessionID", "Month", "Year"])
            }
            Method::ImagesUpload => MethodDescriptor::new(
                "smugmug.images.upload",
                [
                    "SessionID",
                    "AlbumID",
                    "FileName",
                    "Data",
                    "ByteCount",
                    "MD5Sum",
                    "Caption",
                    "Keywords",
                    "Hidden",
                ],
            ),
            Method::ImagesUploadBinary => MethodDescriptor::new(
                "smugmug.images.upload",
                ["SessionID", "AlbumID", "FileName", "ByteCount", "Caption", "Keywords", "Hidden"],
            ),
        }
    }
}

/// Argument slots a version appends to a method.
struct ArgumentDelta {
    method: Method,
    append: &'static [&'static str],
}

const V1_2_1_DELTAS: &[ArgumentDelta] = &[
    ArgumentDelta {
        method: Method::AlbumsGet,
        append: &["LastUpdated"],
    },
    ArgumentDelta {
        method: Method::UsersGetTree,
        append: &["LastUpdated"],
    },
];

/// Descriptor table of one API version.
#[derive(Debug, Clone)]
pub struct VersionProfile {
    version: ApiVersion,
    /// Indexed by `Method as usize`.
    descriptors: [MethodDescriptor; Method::COUNT],
}

impl VersionProfile {
    pub fn for_version(version: ApiVersion) -> Self {
        let mut descriptors = match version.parent() {
            Some(parent) => VersionProfile::for_version(parent).descriptors,
            None => Method::ALL.map(Method::base_descriptor),
        };
        for delta in version.deltas() {
            let slot = &mut descriptors[delta.method as usize];
            *slot = slot.extended(delta.append.iter().copied());
        }
        Self { version, descriptors }
    }

    pub fn version(&self) -> ApiVersion {
        self.version
    }

    pub fn descriptor(&self, method: Method) -> &MethodDescriptor {
        &self.descriptors[method as usize]
    }
}

/// Request/response mechanics shared by every version's entry points.
#[derive(Clone)]
pub struct Core {
    profile: Arc<VersionProfile>,
    endpoints: Endpoints,
    transport: Arc<dyn Transport>,
    user_agent: String,
}

impl fmt::Debug for Core {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Core")
            .field("version", &self.profile.version)
            .field("endpoints", &self.endpoints)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

impl Core {
    pub fn new(version: ApiVersion, config: &ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            profile: Arc::new(VersionProfile::for_version(version)),
            endpoints: config.endpoints.clone(),
            transport,
            user_agent: config.user_agent.clone(),
        }
    }

    pub fn version(&self) -> ApiVersion {
        self.profile.version
    }

    pub fn profile(&self) -> &VersionProfile {
        &self.profile
    }

    pub fn invoker(&self, method: Method) -> MethodInvoker {
        MethodInvoker::new(self.profile.descriptor(method).clone(), Arc::clone(&self.transport))
            .with_user_agent(self.user_agent.clone())
    }

    /// Server URL for a form-encoded method; `None` for the raw upload,
    /// whose URL depends on the file name (see [`Core::binary_upload_url`]).
    pub fn server_url(&self, method: Method) -> Option<String> {
        let base = match method.endpoint() {
            EndpointKind::Api => &self.endpoints.api_base,
            EndpointKind::Upload => &self.endpoints.upload_base,
            EndpointKind::BinaryUpload => return None,
        };
        Some(format!("{base}{}/", self.version()))
    }

    pub fn binary_upload_url(&self, file_name: &str) -> String {
        // Form encoding turns spaces into `+`, which a path does not decode.
        let name = url::form_urlencoded::byte_serialize(file_name.as_bytes())
            .collect::<String>()
            .replace('+', "%20");
        format!("{}{name}", self.endpoints.binary_upload_base)
    }

    pub fn call<P: Payload>(&self, method: Method, args: Arguments) -> Result<Response<P>, ApiError> {
        let server_url = self
            .server_url(method)
            .ok_or_else(|| self.wrong_mode(method, "form"))?;
        let invoker = self.invoker(method);
        let values = args.bind(invoker.descriptor());
        let response = invoker.invoke(&server_url, &values)?;
        log_service_error(invoker.descriptor(), &response);
        Ok(response)
    }

    pub fn call_binary<P: Payload>(
        &self,
        method: Method,
        args: Arguments,
        file_name: &str,
        body: Vec<u8>,
    ) -> Result<Response<P>, ApiError> {
        if method.endpoint() != EndpointKind::BinaryUpload {
            return Err(self.wrong_mode(method, "binary"));
        }
        let invoker = self.invoker(method);
        let values = args.bind(invoker.descriptor());
        let response = invoker.invoke_binary(&self.binary_upload_url(file_name), &values, body)?;
        log_service_error(invoker.descriptor(), &response);
        Ok(response)
    }

    fn wrong_mode(&self, method: Method, mode: &'static str) -> ApiError {
        ApiError::WrongMode {
            method: self.profile.descriptor(method).name().to_string(),
            mode,
        }
    }
}

fn log_service_error<P: Payload>(descriptor: &MethodDescriptor, response: &Response<P>) {
    if response.is_error() {
        warn!(
            method = descriptor.name(),
            code = response.error_code(),
            message = response.error_message(),
            "service reported an error"
        );
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::TransportError;
    use crate::http::{HttpRequest, HttpResponse};

    #[test]
    fn base_profile_matches_catalog() {
        let p = VersionProfile::for_version(ApiVersion::V1_2_0);
        let d = p.descriptor(Method::AlbumsGet);
        assert_eq!(d.name(), "smugmug.albums.get");
        assert_eq!(d.argument_names(), ["SessionID", "NickName", "Heavy", "SitePassword"]);
        for m in Method::ALL {
            assert!(p.descriptor(m).name().starts_with("smugmug."));
        }
    }

    #[test]
    fn v1_2_1_appends_filter_slots() {
        let p = VersionProfile::for_version(ApiVersion::V1_2_1);
        assert_eq!(
            p.descriptor(Method::AlbumsGet).argument_names(),
            ["SessionID", "NickName", "Heavy", "SitePassword", "LastUpdated"]
        );
        assert_eq!(p.descriptor(Method::UsersGetTree).arity(), 5);
        assert_eq!(
            p.descriptor(Method::Logout),
            VersionProfile::for_version(ApiVersion::V1_2_0).descriptor(Method::Logout)
        );
    }

    #[test]
    fn lineage() {
        assert_eq!(ApiVersion::V1_2_1.parent(), Some(ApiVersion::V1_2_0));
        assert_eq!(ApiVersion::V1_2_0.parent(), None);
        assert_eq!(ApiVersion::V1_2_1.to_string(), "1.2.1");
    }

    #[test]
    fn endpoints_per_kind() {
        let config = ClientConfig::default();
        let core = Core::new(
            ApiVersion::V1_2_0,
            &config,
            Arc::new(crate::http::UreqTransport::default()),
        );
        assert_eq!(
            core.server_url(Method::AlbumsGet).as_deref(),
            Some("https://api.smugmug.com/services/api/json/1.2.0/")
        );
        assert_eq!(
            core.server_url(Method::ImagesUpload).as_deref(),
            Some("https://upload.smugmug.com/services/api/json/1.2.0/")
        );
        assert_eq!(core.server_url(Method::ImagesUploadBinary), None);
        assert_eq!(core.binary_upload_url("my photo.jpg"), "https://upload.smugmug.com/my%20photo.jpg");
    }

    #[test]
    fn all_is_in_declaration_order() {
        for (i, m) in Method::ALL.into_iter().enumerate() {
            assert_eq!(m as usize, i, "{m:?}");
        }
    }

    struct Counting(AtomicUsize);

    impl Transport for Counting {
        fn send(&self, _: &HttpRequest) -> Result<HttpResponse, TransportError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(HttpResponse {
                status: 200,
                headers: Vec::new(),
                body: r#"{"stat":"ok"}"#.to_string(),
            })
        }
    }

    fn counting_core() -> (Core, Arc<Counting>) {
        let transport = Arc::new(Counting(AtomicUsize::new(0)));
        let core = Core::new(ApiVersion::V1_2_0, &ClientConfig::default(), transport.clone());
        (core, transport)
    }

    #[test]
    fn binary_upload_is_refused_as_form_call() {
        let (core, transport) = counting_core();
        let err = core
            .call::<()>(Method::ImagesUploadBinary, Arguments::new().with("SessionID", "s"))
            .unwrap_err();
        assert!(
            matches!(&err, ApiError::WrongMode { method, mode: "form" } if method == "smugmug.images.upload"),
            "{err}"
        );
        assert_eq!(transport.0.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn form_method_is_refused_as_binary_call() {
        let (core, transport) = counting_core();
        let err = core
            .call_binary::<()>(Method::ImagesUpload, Arguments::new(), "a.jpg", vec![1])
            .unwrap_err();
        assert!(matches!(err, ApiError::WrongMode { mode: "binary", .. }), "{err}");
        assert_eq!(transport.0.load(Ordering::SeqCst), 0);

        core.call_binary::<()>(Method::ImagesUploadBinary, Arguments::new().with("SessionID", "s"), "a.jpg", vec![1])
            .unwrap();
        assert_eq!(transport.0.load(Ordering::SeqCst), 1);
    }
}
