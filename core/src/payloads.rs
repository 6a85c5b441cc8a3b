//! Typed payloads of each remote method's success response.

use serde::Serialize;

use crate::decode::EntityReader;
use crate::envelope::Payload;
use crate::types::{
    Album, AlbumTemplate, AlbumTransferStats, AlbumVideoTransferStats, Category, EntityRef, TreeCategory, User,
};

/// `smugmug.login.*`
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct LoginResult {
    pub session_id: Option<String>,
    pub user: Option<User>,
    pub password_hash: Option<String>,
    pub account_type: Option<String>,
    pub file_size_limit: Option<i64>,
}

impl Payload for LoginResult {
    fn decode(root: &EntityReader<'_>) -> Self {
        let login = root.child("Login", "Login");
        Self {
            session_id: login.child("Session", "Session").string("id"),
            user: login.entity("User"),
            password_hash: login.string("PasswordHash"),
            account_type: login.string("AccountType"),
            file_size_limit: login.int("FileSizeLimit"),
        }
    }

    fn counts(&self) -> Vec<(&'static str, usize)> {
        vec![("session", usize::from(self.session_id.is_some()))]
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AlbumList {
    pub albums: Vec<Album>,
}

impl Payload for AlbumList {
    fn decode(root: &EntityReader<'_>) -> Self {
        Self {
            albums: root.entities("Albums"),
        }
    }

    fn counts(&self) -> Vec<(&'static str, usize)> {
        vec![("albums", self.albums.len())]
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AlbumTemplateList {
    pub templates: Vec<AlbumTemplate>,
}

impl Payload for AlbumTemplateList {
    fn decode(root: &EntityReader<'_>) -> Self {
        Self {
            templates: root.entities("AlbumTemplates"),
        }
    }

    fn counts(&self) -> Vec<(&'static str, usize)> {
        vec![("templates", self.templates.len())]
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CategoryList {
    pub categories: Vec<Category>,
}

impl Payload for CategoryList {
    fn decode(root: &EntityReader<'_>) -> Self {
        Self {
            categories: root.entities("Categories"),
        }
    }

    fn counts(&self) -> Vec<(&'static str, usize)> {
        vec![("categories", self.categories.len())]
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AlbumCreated {
    pub album: Option<EntityRef>,
}

impl Payload for AlbumCreated {
    fn decode(root: &EntityReader<'_>) -> Self {
        Self {
            album: root.entity("Album"),
        }
    }

    fn counts(&self) -> Vec<(&'static str, usize)> {
        vec![("album", usize::from(self.album.is_some()))]
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CategoryCreated {
    pub category: Option<EntityRef>,
}

impl Payload for CategoryCreated {
    fn decode(root: &EntityReader<'_>) -> Self {
        Self {
            category: root.entity("Category"),
        }
    }

    fn counts(&self) -> Vec<(&'static str, usize)> {
        vec![("category", usize::from(self.category.is_some()))]
    }
}

/// `smugmug.users.getTree`: categories with their sub-categories and albums.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Tree {
    pub categories: Vec<TreeCategory>,
}

impl Payload for Tree {
    fn decode(root: &EntityReader<'_>) -> Self {
        Self {
            categories: root.entities("Categories"),
        }
    }

    fn counts(&self) -> Vec<(&'static str, usize)> {
        vec![
            ("categories", self.categories.len()),
            ("albums", self.categories.iter().map(TreeCategory::album_count).sum()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TransferStats {
    pub albums: Vec<AlbumTransferStats>,
}

impl Payload for TransferStats {
    fn decode(root: &EntityReader<'_>) -> Self {
        Self {
            albums: root.entities("Albums"),
        }
    }

    fn counts(&self) -> Vec<(&'static str, usize)> {
        vec![("albums", self.albums.len())]
    }
}

/// 1.2.1 transfer statistics, which add video rendition counters.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct VideoTransferStats {
    pub albums: Vec<AlbumVideoTransferStats>,
}

impl Payload for VideoTransferStats {
    fn decode(root: &EntityReader<'_>) -> Self {
        Self {
            albums: root.entities("Albums"),
        }
    }

    fn counts(&self) -> Vec<(&'static str, usize)> {
        vec![("albums", self.albums.len())]
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct UploadedImage {
    pub image: Option<EntityRef>,
}

impl Payload for UploadedImage {
    fn decode(root: &EntityReader<'_>) -> Self {
        Self {
            image: root.entity("Image"),
        }
    }

    fn counts(&self) -> Vec<(&'static str, usize)> {
        vec![("image", usize::from(self.image.is_some()))]
    }
}
