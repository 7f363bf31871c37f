//! Command line interface of the `pail` binary.

use clap::{Args, Parser, Subcommand};
use pail_policy::Credentials;
use serde::Serialize;

use crate::config::{MultipartParams, UploaderConfig};
use crate::options::{Filter, UploadOptions};

/// `pail` arguments: credentials shared by every subcommand, then the command.
#[derive(Debug, Parser)]
#[command(name = "pail")]
#[command(bin_name = "pail")]
#[command(about = "Signed direct-to-S3 browser upload configuration", long_about = None)]
pub struct PailCli {
    /// Bucket and key pair.
    #[command(flatten)]
    pub credentials: CredentialArgs,

    /// What to print.
    #[command(subcommand)]
    pub command: Command,
}

/// `pail` subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the uploader <script> block
    Script(OptionArgs),
    /// Print the bucket URL and signed form fields as JSON
    Policy(OptionArgs),
}

/// Credentials from flags, falling back to the usual environment variables.
#[derive(Debug, Args)]
pub struct CredentialArgs {
    /// Bucket uploads are posted to
    #[arg(long, env = "S3_BUCKET", global = true)]
    pub bucket: Option<String>,

    /// Access key id embedded in the form
    #[arg(long, env = "AWS_ACCESS_KEY_ID", global = true)]
    pub access_key_id: Option<String>,

    /// Secret key the policy is signed with
    #[arg(long, env = "AWS_SECRET_ACCESS_KEY", global = true, hide_env_values = true)]
    pub secret_access_key: Option<String>,
}

impl From<CredentialArgs> for Credentials {
    fn from(args: CredentialArgs) -> Self {
        Credentials::new(
            args.bucket.unwrap_or_default(),
            args.access_key_id.unwrap_or_default(),
            args.secret_access_key.unwrap_or_default(),
        )
    }
}

/// Widget options; each maps to the [`UploadOptions`] field of the same name.
#[derive(Debug, Default, Args)]
pub struct OptionArgs {
    /// Key prefix (folder) uploads are stored under
    #[arg(long)]
    pub key: Option<String>,

    /// Canned ACL of the stored objects
    #[arg(long)]
    pub acl: Option<String>,

    /// ISO-8601 UTC expiration, defaults to ten hours from now
    #[arg(long)]
    pub expiration: Option<String>,

    /// Largest accepted upload in bytes
    #[arg(long)]
    pub max_filesize: Option<u64>,

    /// Content type stored with each upload
    #[arg(long)]
    pub content_type: Option<String>,

    /// Title of the default file filter
    #[arg(long)]
    pub filter_title: Option<String>,

    /// Extensions of the default file filter
    #[arg(long)]
    pub filter_extensions: Option<String>,

    /// Extra filter as TITLE=EXTENSIONS; replaces the title/extensions pair
    #[arg(long = "filter", value_parser = parse_filter)]
    pub filters: Vec<Filter>,

    /// plupload runtimes, in order of preference
    #[arg(long)]
    pub runtimes: Option<String>,

    /// Id of the browse button
    #[arg(long)]
    pub select_id: Option<String>,

    /// Id of the cancel button
    #[arg(long)]
    pub cancel_id: Option<String>,

    /// Id of the widget container
    #[arg(long)]
    pub container_id: Option<String>,

    /// Id of the file list
    #[arg(long)]
    pub file_list_id: Option<String>,

    /// Classes of each progress bar
    #[arg(long)]
    pub progress_bar_class: Option<String>,

    /// Widget instance id appended to element ids
    #[arg(long)]
    pub id: Option<String>,

    /// Storage endpoint, e.g. http://localhost:9000
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Files kept in the widget queue
    #[arg(long)]
    pub queue_limit: Option<usize>,
}

impl From<OptionArgs> for UploadOptions {
    fn from(args: OptionArgs) -> Self {
        UploadOptions {
            key: args.key,
            acl: args.acl,
            expiration: args.expiration,
            max_filesize: args.max_filesize,
            content_type: args.content_type,
            filter_title: args.filter_title,
            filter_extensions: args.filter_extensions,
            filters: (!args.filters.is_empty()).then_some(args.filters),
            runtimes: args.runtimes,
            select_id: args.select_id,
            cancel_id: args.cancel_id,
            container_id: args.container_id,
            file_list_id: args.file_list_id,
            progress_bar_class: args.progress_bar_class,
            id: args.id,
            endpoint: args.endpoint,
            queue_limit: args.queue_limit,
            ..UploadOptions::default()
        }
    }
}

/// Output of `pail policy`: where to post and which fields to send.
#[derive(Debug, Serialize)]
pub struct PolicyOutput<'a> {
    /// Bucket URL the form is posted to.
    pub url: &'a str,
    /// Expiration embedded in the policy.
    pub expiration: &'a str,
    /// Form fields, under the storage service's names.
    pub fields: &'a MultipartParams,
}

/// Select the parts of a configuration a server-side form needs.
pub fn policy_output(config: &UploaderConfig) -> PolicyOutput<'_> {
    PolicyOutput {
        url: &config.uploader.url,
        expiration: &config.expiration,
        fields: &config.uploader.multipart_params,
    }
}

fn parse_filter(value: &str) -> Result<Filter, String> {
    let (title, extensions) = value
        .split_once('=')
        .ok_or_else(|| format!("expected TITLE=EXTENSIONS, got {}", value))?;
    Ok(Filter::new(title, extensions))
}
