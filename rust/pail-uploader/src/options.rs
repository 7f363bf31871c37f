//! Caller overrides for the upload widget and their defaults.

use chrono::Duration;
use pail_policy::{Acl, expiration_after};
use serde::{Deserialize, Serialize};

/// Folder inside the bucket that uploads land in.
pub const DEFAULT_KEY_PREFIX: &str = "uploads";
/// How long an issued policy stays valid.
pub const DEFAULT_LIFETIME_HOURS: i64 = 10;
/// 100 MiB.
pub const DEFAULT_MAX_FILESIZE: u64 = 104_857_600;
/// Content-Type sent with each upload. Use `binary/octet-stream` for video.
pub const DEFAULT_CONTENT_TYPE: &str = "image/";
/// Title of the browse dialog filter.
pub const DEFAULT_FILTER_TITLE: &str = "Images";
/// Extensions accepted by the browse dialog filter.
pub const DEFAULT_FILTER_EXTENSIONS: &str = "jpg,jpeg,gif,png,bmp";
/// plupload runtimes, in order of preference.
pub const DEFAULT_RUNTIMES: &str = "html5";
/// Id of the browse button.
pub const DEFAULT_SELECT_ID: &str = "selectfile";
/// Id of the cancel button.
pub const DEFAULT_CANCEL_ID: &str = "resetupload";
/// Id of the widget container.
pub const DEFAULT_CONTAINER_ID: &str = "uploadcontainer";
/// Id of the file list.
pub const DEFAULT_FILE_LIST_ID: &str = "uploadfile";
/// Bootstrap classes of a running progress bar.
pub const DEFAULT_PROGRESS_BAR_CLASS: &str = "progress-bar progress-bar-striped active";
/// Storage endpoint; buckets are addressed path-style below it.
pub const DEFAULT_ENDPOINT: &str = "https://s3.amazonaws.com";
/// Files kept in the widget queue; extra files are dropped as they are added.
pub const DEFAULT_QUEUE_LIMIT: usize = 1;
/// Flash runtime shipped with plupload.
pub const DEFAULT_FLASH_SWF_URL: &str = "/assets/plupload/Moxie.swf";
/// Silverlight runtime shipped with plupload.
pub const DEFAULT_SILVERLIGHT_XAP_URL: &str = "/assets/plupload/Moxie.xap";

/// File type filter shown in the browse dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    /// Label of the filter, e.g. `Images`.
    pub title: String,
    /// Comma separated extensions without dots, e.g. `jpg,png`.
    pub extensions: String,
}

impl Filter {
    /// Create a filter from a title and its extensions.
    pub fn new(title: impl Into<String>, extensions: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            extensions: extensions.into(),
        }
    }
}

/// Options for a single widget render.
///
/// Every field is optional; unset fields fall back to the `DEFAULT_*`
/// constants of this module when [`UploadOptions::resolve`] runs. Options
/// also deserialize from any serde format with missing fields left unset.
///
/// ```
/// use pail_uploader::UploadOptions;
///
/// let options = UploadOptions::new()
///     .with_key("avatars")
///     .with_max_filesize(5 * 1024 * 1024);
/// let resolved = options.resolve();
///
/// assert_eq!(resolved.key, "avatars");
/// assert_eq!(resolved.acl, "public-read");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadOptions {
    /// Key prefix (folder) uploads are stored under.
    pub key: Option<String>,
    /// Canned ACL or any provider ACL string.
    pub acl: Option<String>,
    /// ISO-8601 UTC expiration of the policy.
    pub expiration: Option<String>,
    /// Largest accepted upload in bytes.
    pub max_filesize: Option<u64>,
    /// Content type stored with each upload.
    pub content_type: Option<String>,
    /// Title of the single default filter.
    pub filter_title: Option<String>,
    /// Extensions of the single default filter.
    pub filter_extensions: Option<String>,
    /// Replaces the filter built from `filter_title` and `filter_extensions`.
    pub filters: Option<Vec<Filter>>,
    /// plupload runtimes, in order of preference.
    pub runtimes: Option<String>,
    /// Id of the browse button.
    pub select_id: Option<String>,
    /// Id of the cancel button.
    pub cancel_id: Option<String>,
    /// Id of the widget container.
    pub container_id: Option<String>,
    /// Id of the file list.
    pub file_list_id: Option<String>,
    /// Class list of each progress bar.
    pub progress_bar_class: Option<String>,
    /// Instance id, appended as `_<id>` to the container id, the file list
    /// id and the global uploader name.
    pub id: Option<String>,
    /// Storage endpoint the bucket URL is built from.
    pub endpoint: Option<String>,
    /// Files kept in the widget queue.
    pub queue_limit: Option<usize>,
    /// Location of the Flash runtime.
    pub flash_swf_url: Option<String>,
    /// Location of the Silverlight runtime.
    pub silverlight_xap_url: Option<String>,
}

macro_rules! with {
    ($($(#[$meta:meta])* $method:ident => $field:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            pub fn $method(mut self, value: impl Into<String>) -> Self {
                self.$field = Some(value.into());
                self
            }
        )*
    };
}

impl UploadOptions {
    /// Options with every field unset.
    pub fn new() -> Self {
        Self::default()
    }

    with! {
        /// Set the key prefix (folder) uploads are stored under.
        with_key => key,
        /// Set the ACL; accepts an [`Acl`] or any provider string.
        with_acl => acl,
        /// Set the ISO-8601 UTC expiration of the policy.
        with_expiration => expiration,
        /// Set the content type stored with each upload.
        with_content_type => content_type,
        /// Set the title of the default filter.
        with_filter_title => filter_title,
        /// Set the extensions of the default filter.
        with_filter_extensions => filter_extensions,
        /// Set the plupload runtimes.
        with_runtimes => runtimes,
        /// Set the browse button id.
        with_select_id => select_id,
        /// Set the cancel button id.
        with_cancel_id => cancel_id,
        /// Set the widget container id.
        with_container_id => container_id,
        /// Set the file list id.
        with_file_list_id => file_list_id,
        /// Set the progress bar classes.
        with_progress_bar_class => progress_bar_class,
        /// Set the instance id used to scope element ids.
        with_id => id,
        /// Set the storage endpoint, e.g. `http://localhost:9000` for MinIO.
        with_endpoint => endpoint,
        /// Set the Flash runtime location.
        with_flash_swf_url => flash_swf_url,
        /// Set the Silverlight runtime location.
        with_silverlight_xap_url => silverlight_xap_url,
    }

    /// Set the largest accepted upload in bytes.
    pub fn with_max_filesize(mut self, bytes: u64) -> Self {
        self.max_filesize = Some(bytes);
        self
    }

    /// Set how many files the widget queue holds.
    pub fn with_queue_limit(mut self, limit: usize) -> Self {
        self.queue_limit = Some(limit);
        self
    }

    /// Add a file type filter. Once any filter is added, `filter_title` and
    /// `filter_extensions` are ignored.
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.get_or_insert_with(Vec::new).push(filter);
        self
    }

    /// Apply defaults to every unset field.
    ///
    /// Reads the clock when no expiration was given.
    pub fn resolve(&self) -> ResolvedOptions {
        fn or(value: &Option<String>, default: &str) -> String {
            value.clone().unwrap_or_else(|| default.to_string())
        }

        let filters = self.filters.clone().unwrap_or_else(|| {
            vec![Filter::new(
                or(&self.filter_title, DEFAULT_FILTER_TITLE),
                or(&self.filter_extensions, DEFAULT_FILTER_EXTENSIONS),
            )]
        });

        ResolvedOptions {
            key: or(&self.key, DEFAULT_KEY_PREFIX),
            acl: self
                .acl
                .clone()
                .unwrap_or_else(|| Acl::default().into()),
            expiration: self.expiration.clone().unwrap_or_else(|| {
                expiration_after(Duration::hours(DEFAULT_LIFETIME_HOURS))
            }),
            max_filesize: self.max_filesize.unwrap_or(DEFAULT_MAX_FILESIZE),
            content_type: or(&self.content_type, DEFAULT_CONTENT_TYPE),
            filters,
            runtimes: or(&self.runtimes, DEFAULT_RUNTIMES),
            select_id: or(&self.select_id, DEFAULT_SELECT_ID),
            cancel_id: or(&self.cancel_id, DEFAULT_CANCEL_ID),
            container_id: or(&self.container_id, DEFAULT_CONTAINER_ID),
            file_list_id: or(&self.file_list_id, DEFAULT_FILE_LIST_ID),
            progress_bar_class: or(&self.progress_bar_class, DEFAULT_PROGRESS_BAR_CLASS),
            id: self.id.clone().filter(|id| !id.is_empty()),
            endpoint: or(&self.endpoint, DEFAULT_ENDPOINT),
            queue_limit: self.queue_limit.unwrap_or(DEFAULT_QUEUE_LIMIT).max(1),
            flash_swf_url: or(&self.flash_swf_url, DEFAULT_FLASH_SWF_URL),
            silverlight_xap_url: or(&self.silverlight_xap_url, DEFAULT_SILVERLIGHT_XAP_URL),
        }
    }
}

/// Options with every default applied.
///
/// Fields mirror [`UploadOptions`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOptions {
    /// Key prefix.
    pub key: String,
    /// ACL string.
    pub acl: String,
    /// ISO-8601 UTC expiration.
    pub expiration: String,
    /// Size cap in bytes.
    pub max_filesize: u64,
    /// Content type.
    pub content_type: String,
    /// Explicit filters, or the one built from title and extensions.
    pub filters: Vec<Filter>,
    /// plupload runtimes.
    pub runtimes: String,
    /// Browse button id, never scoped.
    pub select_id: String,
    /// Cancel button id, never scoped.
    pub cancel_id: String,
    /// Unscoped container id.
    pub container_id: String,
    /// Unscoped file list id.
    pub file_list_id: String,
    /// Progress bar classes.
    pub progress_bar_class: String,
    /// Instance id; empty ids resolve to `None`.
    pub id: Option<String>,
    /// Storage endpoint.
    pub endpoint: String,
    /// Never below one.
    pub queue_limit: usize,
    /// Flash runtime location.
    pub flash_swf_url: String,
    /// Silverlight runtime location.
    pub silverlight_xap_url: String,
}

impl ResolvedOptions {
    /// Append the instance suffix, if any, to an element id or name.
    pub fn scoped(&self, name: &str) -> String {
        match &self.id {
            Some(id) => format!("{}_{}", name, id),
            None => name.to_string(),
        }
    }
}
