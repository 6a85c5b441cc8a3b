//! Typed entry points for API 1.2.1.
//!
//! 1.2.1 is 1.2.0 plus an optional `LastUpdated` filter on `albums.get` and
//! `users.getTree`, and video rendition counters in transfer statistics.
//! Everything else delegates to the 1.2.0 entry points, which run against the
//! 1.2.1 descriptor table.

use std::path::Path;
use std::sync::Arc;

use crate::config::ClientConfig;
use crate::envelope::Response;
use crate::error::ApiError;
use crate::http::Transport;
use crate::payloads::{
    AlbumCreated, AlbumList, AlbumTemplateList, CategoryCreated, CategoryList, LoginResult, Tree, UploadedImage,
    VideoTransferStats,
};
use crate::upload::UploadOptions;
use crate::versions::v1_2_0::{self, albums_args, transfer_stats_args};
use crate::versions::{ApiVersion, Core, Method};

#[derive(Debug, Clone)]
pub struct Api {
    base: v1_2_0::Api,
}

impl Api {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_transport(config, Arc::new(config.transport()))
    }

    pub fn with_transport(config: &ClientConfig, transport: Arc<dyn Transport>) -> Self {
        let core = Core::new(ApiVersion::V1_2_1, config, transport);
        Self {
            base: v1_2_0::Api::on_core(core),
        }
    }

    pub fn core(&self) -> &Core {
        self.base.core()
    }

    /// `last_updated` is a Unix timestamp; only albums changed since then are returned.
    pub fn albums_get(
        &self,
        session_id: &str,
        nick_name: Option<&str>,
        heavy: bool,
        site_password: Option<&str>,
        last_updated: Option<i64>,
    ) -> Result<Response<AlbumList>, ApiError> {
        let args = albums_args(session_id, nick_name, heavy, site_password).with("LastUpdated", last_updated);
        self.core().call(Method::AlbumsGet, args)
    }

    pub fn users_get_tree(
        &self,
        session_id: &str,
        nick_name: Option<&str>,
        heavy: bool,
        site_password: Option<&str>,
        last_updated: Option<i64>,
    ) -> Result<Response<Tree>, ApiError> {
        let args = albums_args(session_id, nick_name, heavy, site_password).with("LastUpdated", last_updated);
        self.core().call(Method::UsersGetTree, args)
    }

    pub fn users_get_transfer_stats(
        &self,
        session_id: &str,
        month: u32,
        year: u32,
    ) -> Result<Response<VideoTransferStats>, ApiError> {
        self.core()
            .call(Method::UsersGetTransferStats, transfer_stats_args(session_id, month, year))
    }

    pub fn login_with_password(
        &self,
        api_key: &str,
        email: &str,
        password: &str,
    ) -> Result<Response<LoginResult>, ApiError> {
        self.base.login_with_password(api_key, email, password)
    }

    pub fn login_anonymously(&self, api_key: &str) -> Result<Response<LoginResult>, ApiError> {
        self.base.login_anonymously(api_key)
    }

    pub fn logout(&self, session_id: &str) -> Result<Response<()>, ApiError> {
        self.base.logout(session_id)
    }

    pub fn albums_create(
        &self,
        session_id: &str,
        title: &str,
        category_id: i64,
        template_id: Option<i64>,
        public: bool,
    ) -> Result<Response<AlbumCreated>, ApiError> {
        self.base
            .albums_create(session_id, title, category_id, template_id, public)
    }

    pub fn albums_delete(&self, session_id: &str, album_id: i64) -> Result<Response<()>, ApiError> {
        self.base.albums_delete(session_id, album_id)
    }

    pub fn album_templates_get(&self, session_id: &str) -> Result<Response<AlbumTemplateList>, ApiError> {
        self.base.album_templates_get(session_id)
    }

    pub fn categories_get(
        &self,
        session_id: &str,
        nick_name: Option<&str>,
        site_password: Option<&str>,
    ) -> Result<Response<CategoryList>, ApiError> {
        self.base.categories_get(session_id, nick_name, site_password)
    }

    pub fn categories_create(&self, session_id: &str, name: &str) -> Result<Response<CategoryCreated>, ApiError> {
        self.base.categories_create(session_id, name)
    }

    pub fn categories_delete(&self, session_id: &str, category_id: i64) -> Result<Response<()>, ApiError> {
        self.base.categories_delete(session_id, category_id)
    }

    pub fn images_upload(
        &self,
        session_id: &str,
        album_id: i64,
        file_name: &str,
        data: &[u8],
        options: &UploadOptions,
    ) -> Result<Response<UploadedImage>, ApiError> {
        self.base
            .images_upload(session_id, album_id, file_name, data, options)
    }

    pub fn images_upload_binary(
        &self,
        session_id: &str,
        album_id: i64,
        file_name: &str,
        data: Vec<u8>,
        options: &UploadOptions,
    ) -> Result<Response<UploadedImage>, ApiError> {
        self.base
            .images_upload_binary(session_id, album_id, file_name, data, options)
    }

    pub fn upload_file(
        &self,
        session_id: &str,
        album_id: i64,
        path: &Path,
        options: &UploadOptions,
    ) -> Result<Response<UploadedImage>, ApiError> {
        self.base.upload_file(session_id, album_id, path, options)
    }
}
