//! Widget configuration carrying a signed upload policy.

use pail_policy::{ConfigurationError, Credentials, SUCCESS_ACTION_STATUS, UploadPolicy};
use serde::Serialize;
use url::Url;

use crate::options::{Filter, UploadOptions};

/// Name of the global the uploader object is exported under.
pub const GLOBAL_NAME: &str = "uploader";

/// Everything the browser needs to upload straight to the bucket.
///
/// Serializes to the settings object embedded in the rendered script:
/// `uploader` is handed to `plupload.Uploader` as is, `ui` drives the event
/// wiring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploaderConfig {
    /// Settings handed to `plupload.Uploader`.
    pub uploader: PluploadSettings,
    /// Elements and limits used by the event handlers.
    pub ui: UiBindings,
    /// Expiration embedded in the policy.
    #[serde(skip)]
    pub expiration: String,
}

/// Settings object passed to `plupload.Uploader`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluploadSettings {
    /// Id of the element that opens the browse dialog.
    pub browse_button: String,
    /// Id of the widget container, scoped by instance.
    pub container: String,
    /// Comma separated plupload runtimes, in order of preference.
    pub runtimes: String,
    /// Bucket URL the form is posted to.
    pub url: String,
    /// Largest accepted upload in bytes.
    pub max_file_size: u64,
    /// Always `true`; the policy only accepts multipart form posts.
    pub multipart: bool,
    /// Form fields posted with every file.
    pub multipart_params: MultipartParams,
    /// Name of the form field holding the file bytes.
    pub file_data_name: String,
    /// Always `true`.
    pub multiple_queues: bool,
    /// Filters offered by the browse dialog.
    pub filters: Vec<Filter>,
    /// Location of the Flash runtime.
    pub flash_swf_url: String,
    /// Location of the Silverlight runtime.
    pub silverlight_xap_url: String,
}

/// Form fields sent along with the file.
///
/// Field names are fixed by the storage service's browser upload contract.
/// `${filename}` is substituted by the service with the uploaded file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MultipartParams {
    /// Object key, `<prefix>/${filename}`.
    pub key: String,
    /// Always `${filename}`.
    #[serde(rename = "Filename")]
    pub filename: String,
    /// Canned ACL applied to the stored object.
    pub acl: String,
    /// Content type stored with the object.
    #[serde(rename = "Content-Type")]
    pub content_type: String,
    /// Status the service answers a successful upload with.
    pub success_action_status: String,
    /// Public half of the key pair; the secret never leaves the server.
    #[serde(rename = "AWSAccessKeyId")]
    pub access_key_id: String,
    /// Base64 policy document.
    pub policy: String,
    /// Base64 HMAC-SHA1 of `policy`.
    pub signature: String,
}

/// Page elements the event handlers update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiBindings {
    /// Id of the widget container, scoped by instance.
    pub container: String,
    /// Id of the element listing queued files, scoped by instance.
    pub file_list: String,
    /// Id of the element that cancels the upload.
    pub cancel_button: String,
    /// Class list given to each file's progress bar.
    pub progress_bar_class: String,
    /// Files kept in the queue, at least one.
    pub queue_limit: usize,
    /// Global the uploader object is exported under, scoped by instance.
    pub global_name: String,
}

/// Merge `options` over the defaults, issue a signed policy and assemble the
/// widget configuration.
///
/// # Errors
///
/// Fails with a [`ConfigurationError`] when the bucket, the access key id or
/// the secret access key is empty, before any policy is built, or when the
/// endpoint is not an absolute URL or the bucket is a dot segment.
pub fn configure(
    options: &UploadOptions,
    credentials: &Credentials,
) -> Result<UploaderConfig, ConfigurationError> {
    credentials.validate()?;

    let options = options.resolve();
    let url = bucket_url(&options.endpoint, credentials.bucket())?;

    let signed = UploadPolicy::new(
        credentials.bucket(),
        options.expiration.as_str(),
        options.acl.as_str(),
        options.max_filesize,
    )
    .sign(credentials.secret_access_key());

    let container = options.scoped(&options.container_id);

    Ok(UploaderConfig {
        uploader: PluploadSettings {
            browse_button: options.select_id.clone(),
            container: container.clone(),
            runtimes: options.runtimes.clone(),
            url: url.to_string(),
            max_file_size: options.max_filesize,
            multipart: true,
            multipart_params: MultipartParams {
                key: format!("{}/${{filename}}", options.key),
                filename: "${filename}".to_string(),
                acl: options.acl.clone(),
                content_type: options.content_type.clone(),
                success_action_status: SUCCESS_ACTION_STATUS.to_string(),
                access_key_id: credentials.access_key_id().to_string(),
                policy: signed.policy,
                signature: signed.signature,
            },
            file_data_name: "file".to_string(),
            multiple_queues: true,
            filters: options.filters.clone(),
            flash_swf_url: options.flash_swf_url.clone(),
            silverlight_xap_url: options.silverlight_xap_url.clone(),
        },
        ui: UiBindings {
            container,
            file_list: options.scoped(&options.file_list_id),
            cancel_button: options.cancel_id.clone(),
            progress_bar_class: options.progress_bar_class.clone(),
            queue_limit: options.queue_limit,
            global_name: options.scoped(GLOBAL_NAME),
        },
        expiration: options.expiration,
    })
}

/// Path-style bucket URL: `https://endpoint/bucket/`.
///
/// Any path already on the endpoint is kept as a prefix. The bucket is
/// appended as a single segment, so `/` or `?` in it are escaped.
pub fn bucket_url(endpoint: &str, bucket: &str) -> Result<Url, ConfigurationError> {
    if matches!(bucket, "." | "..") {
        return Err(ConfigurationError::InvalidBucket(bucket.to_string()));
    }

    let mut url =
        Url::parse(endpoint).map_err(|e| ConfigurationError::InvalidEndpoint(e.to_string()))?;
    if url.host_str().is_none() {
        return Err(ConfigurationError::InvalidEndpoint(format!(
            "{} has no host",
            endpoint
        )));
    }

    url.path_segments_mut()
        .map_err(|_| {
            ConfigurationError::InvalidEndpoint(format!("{} cannot be a base URL", endpoint))
        })?
        .pop_if_empty()
        .push(bucket)
        .push("");
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}
