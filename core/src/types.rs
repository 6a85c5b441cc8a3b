//! Entities decoded from response payloads.
//!
//! # Design
//! Every field is optional because the service leaves out whatever it has
//! nothing to report, and what it reports differs between API versions.
//! Entities are read only through `EntityReader`; none of them derive
//! `Deserialize`, so one misshapen field cannot fail a whole record.

use serde::Serialize;

use crate::decode::{Entity, EntityReader};

/// The account a session belongs to.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct User {
    pub id: Option<i64>,
    pub nick_name: Option<String>,
    pub display_name: Option<String>,
}

impl Entity for User {
    const NAME: &'static str = "User";

    fn decode(r: &EntityReader<'_>) -> Self {
        Self {
            id: r.int("id"),
            nick_name: r.string("NickName"),
            display_name: r.string("DisplayName"),
        }
    }
}

/// Short reference to a category or sub-category embedded in an album.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CategoryRef {
    pub id: Option<i64>,
    pub name: Option<String>,
}

impl Entity for CategoryRef {
    const NAME: &'static str = "CategoryRef";

    fn decode(r: &EntityReader<'_>) -> Self {
        Self {
            id: r.int("id"),
            name: r.string("Name"),
        }
    }
}

/// Id and key of a newly created object.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct EntityRef {
    pub id: Option<i64>,
    pub key: Option<String>,
}

impl Entity for EntityRef {
    const NAME: &'static str = "EntityRef";

    fn decode(r: &EntityReader<'_>) -> Self {
        Self {
            id: r.int("id"),
            key: r.string("Key"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Album {
    pub id: Option<i64>,
    pub key: Option<String>,
    pub title: Option<String>,
    /// Reported by 1.2.0; later versions may leave it out.
    pub category: Option<CategoryRef>,
    pub sub_category: Option<CategoryRef>,
    pub image_count: Option<i64>,
    pub public: Option<bool>,
    /// Reported from 1.2.1.
    pub last_updated: Option<String>,
}

impl Entity for Album {
    const NAME: &'static str = "Album";

    fn decode(r: &EntityReader<'_>) -> Self {
        Self {
            id: r.int("id"),
            key: r.string("Key"),
            title: r.string("Title"),
            category: r.entity("Category"),
            sub_category: r.entity("SubCategory"),
            image_count: r.int("ImageCount"),
            public: r.bool("Public"),
            last_updated: r.string("LastUpdated"),
        }
    }
}

/// Saved album settings applied when creating albums.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AlbumTemplate {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub public: Option<bool>,
    pub sort_method: Option<String>,
    pub sort_direction: Option<bool>,
    pub watermarking: Option<bool>,
}

impl Entity for AlbumTemplate {
    const NAME: &'static str = "AlbumTemplate";

    fn decode(r: &EntityReader<'_>) -> Self {
        Self {
            id: r.int("id"),
            name: r.string("AlbumTemplateName"),
            public: r.bool("Public"),
            sort_method: r.string("SortMethod"),
            sort_direction: r.bool("SortDirection"),
            watermarking: r.bool("Watermarking"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Category {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub nice_name: Option<String>,
    pub kind: Option<String>,
}

impl Entity for Category {
    const NAME: &'static str = "Category";

    fn decode(r: &EntityReader<'_>) -> Self {
        Self {
            id: r.int("id"),
            name: r.string("Name"),
            nice_name: r.string("NiceName"),
            kind: r.string("Type"),
        }
    }
}

/// Second level of the user tree.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SubCategory {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub albums: Vec<Album>,
}

impl Entity for SubCategory {
    const NAME: &'static str = "SubCategory";

    fn decode(r: &EntityReader<'_>) -> Self {
        Self {
            id: r.int("id"),
            name: r.string("Name"),
            albums: r.entities("Albums"),
        }
    }
}

/// Top level of the user tree.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TreeCategory {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub sub_categories: Vec<SubCategory>,
    pub albums: Vec<Album>,
}

impl Entity for TreeCategory {
    const NAME: &'static str = "TreeCategory";

    fn decode(r: &EntityReader<'_>) -> Self {
        Self {
            id: r.int("id"),
            name: r.string("Name"),
            sub_categories: r.entities("SubCategories"),
            albums: r.entities("Albums"),
        }
    }
}

impl TreeCategory {
    /// Albums directly in this category plus those in its sub-categories.
    pub fn album_count(&self) -> usize {
        self.albums.len() + self.sub_categories.iter().map(|s| s.albums.len()).sum::<usize>()
    }
}

/// Monthly transfer counters for one album.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AlbumTransferStats {
    pub id: Option<i64>,
    pub key: Option<String>,
    pub bytes: Option<i64>,
    pub hits: Option<f64>,
    pub small: Option<f64>,
    pub medium: Option<f64>,
    pub large: Option<f64>,
    pub original: Option<f64>,
}

impl Entity for AlbumTransferStats {
    const NAME: &'static str = "AlbumTransferStats";

    fn decode(r: &EntityReader<'_>) -> Self {
        Self {
            id: r.int("id"),
            key: r.string("Key"),
            bytes: r.int("Bytes"),
            hits: r.float("Hits"),
            small: r.float("Small"),
            medium: r.float("Medium"),
            large: r.float("Large"),
            original: r.float("Original"),
        }
    }
}

/// 1.2.1 album transfer counters: the image counters plus video renditions.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AlbumVideoTransferStats {
    pub stats: AlbumTransferStats,
    pub video320: Option<f64>,
    pub video640: Option<f64>,
    pub video960: Option<f64>,
    pub video1280: Option<f64>,
}

impl Entity for AlbumVideoTransferStats {
    const NAME: &'static str = "AlbumVideoTransferStats";

    fn decode(r: &EntityReader<'_>) -> Self {
        Self {
            stats: AlbumTransferStats::decode(r),
            video320: r.float("Video320"),
            video640: r.float("Video640"),
            video960: r.float("Video960"),
            video1280: r.float("Video1280"),
        }
    }
}
