use std::io::Write;
use std::str::FromStr;

use clap::{Args, Subcommand};
use strum::VariantNames;
use tracing::{debug, info};

use crate::client::VolumeApi;
use crate::error::CliError;
use crate::model::{SortDir, SortKey};
use crate::render::{
    print_list, print_record, OutputFormat, CREATE_FIELDS, EXTEND_FIELDS, LIST_FIELDS,
    SHOW_FIELDS, UPDATE_FIELDS,
};
use crate::request::{create_request, delete_request, extend_request, list_filter, update_request};
use crate::validate::{check_arity, check_id, parse_size};

const CREATE_USAGE: &str = "osdsctl volume create <size> [OPTIONS]";
const SHOW_USAGE: &str = "osdsctl volume show <id>";
const LIST_USAGE: &str = "osdsctl volume list [OPTIONS]";
const DELETE_USAGE: &str = "osdsctl volume delete <id>";
const UPDATE_USAGE: &str = "osdsctl volume update <id> [OPTIONS]";
const EXTEND_USAGE: &str = "osdsctl volume extend <id> <new size>";

#[derive(Args, Debug)]
pub struct VolumeArgs {
    /// The id of profile configured by admin
    #[arg(short, long, global = true, default_value = "")]
    pub profile: String,

    #[command(subcommand)]
    pub command: VolumeCommands,
}

#[derive(Subcommand, Debug)]
pub enum VolumeCommands {
    /// Create a volume in the cluster
    #[command(
        override_usage = CREATE_USAGE,
        after_help = "Example: osdsctl volume create 1 --name vol-name"
    )]
    Create(CreateArgs),
    /// Show a volume in the cluster
    #[command(override_usage = SHOW_USAGE)]
    Show(IdArgs),
    /// List all volumes in the cluster
    #[command(override_usage = LIST_USAGE)]
    List(ListArgs),
    /// Delete a volume in the cluster
    #[command(override_usage = DELETE_USAGE)]
    Delete(IdArgs),
    /// Update a volume in the cluster
    #[command(override_usage = UPDATE_USAGE)]
    Update(UpdateArgs),
    /// Extend a volume in the cluster
    #[command(override_usage = EXTEND_USAGE)]
    Extend(ExtendArgs),
}

/// Positional arguments are collected raw and checked by the dispatcher.
#[derive(Args, Debug)]
pub struct IdArgs {
    #[arg(value_name = "ID")]
    pub args: Vec<String>,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    #[arg(value_name = "SIZE", allow_negative_numbers = true)]
    pub args: Vec<String>,

    /// The name of created volume
    #[arg(short, long, default_value = "")]
    pub name: String,

    /// The description of created volume
    #[arg(short, long, default_value = "")]
    pub description: String,

    /// The availability zone of created volume
    #[arg(short, long, default_value = "")]
    pub az: String,

    /// The snapshot to create volume
    #[arg(short, long, default_value = "")]
    pub snapshot: String,

    /// The pool to create volume
    #[arg(short = 'l', long, default_value = "")]
    pub pool: String,

    /// Download snapshot from cloud
    #[arg(short = 'c', long = "snapshotFromCloud")]
    pub snapshot_from_cloud: bool,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    #[arg(value_name = "ID")]
    pub args: Vec<String>,

    /// The name of updated volume
    #[arg(short, long, default_value = "")]
    pub name: String,

    /// The description of updated volume
    #[arg(short, long, default_value = "")]
    pub description: String,
}

#[derive(Args, Debug)]
pub struct ExtendArgs {
    #[arg(value_name = "ARGS", allow_negative_numbers = true)]
    pub args: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[arg(hide = true)]
    pub args: Vec<String>,

    /// The number of entries displayed per page
    #[arg(long, default_value_t = 50)]
    pub limit: u32,

    /// All requested data offsets
    #[arg(long, default_value_t = 0)]
    pub offset: u32,

    /// The sort direction of all requested data. supports asc or desc(default)
    #[arg(long = "sortDir", default_value_t = SortDir::Desc, value_parser = parse_sort_dir)]
    pub sort_dir: SortDir,

    /// The sort key of all requested data. supports id(default), name, status,
    /// availabilityzone, profileid, tenantid, size, poolid, description
    #[arg(long = "sortKey", default_value_t = SortKey::Id, value_parser = parse_sort_key)]
    pub sort_key: SortKey,

    /// List volume by id
    #[arg(long, default_value = "")]
    pub id: String,

    /// List volume by name
    #[arg(long, default_value = "")]
    pub name: String,

    /// List volume by description
    #[arg(long, default_value = "")]
    pub description: String,

    /// List volume by tenantId
    #[arg(long = "tenantId", default_value = "")]
    pub tenant_id: String,

    /// List volume by storage userId
    #[arg(long = "userId", default_value = "")]
    pub user_id: String,

    /// List volume by status
    #[arg(long, default_value = "")]
    pub status: String,

    /// List volume by poolId
    #[arg(long = "poolId", default_value = "")]
    pub pool_id: String,

    /// List volume by availability zone
    #[arg(long = "availabilityZone", default_value = "")]
    pub availability_zone: String,

    /// List volume by profile id
    #[arg(long = "profileId", default_value = "")]
    pub profile_id: String,

    /// List volume by volume group id
    #[arg(long = "groupId", default_value = "")]
    pub group_id: String,
}

fn parse_sort_key(raw: &str) -> Result<SortKey, String> {
    SortKey::from_str(raw).map_err(|_| format!("supports {}", SortKey::VARIANTS.join(", ")))
}

fn parse_sort_dir(raw: &str) -> Result<SortDir, String> {
    SortDir::from_str(raw).map_err(|_| format!("supports {}", SortDir::VARIANTS.join(", ")))
}

pub async fn handle_volume_command<C: VolumeApi>(
    client: &C,
    volume: VolumeArgs,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let profile = volume.profile;
    match volume.command {
        VolumeCommands::Create(opts) => {
            check_arity(&opts.args, 1, CREATE_USAGE)?;
            let size = parse_size(&opts.args[0])?;
            let request = create_request(size, &profile, &opts);
            debug!(?request, "built create request");

            let created = client.create_volume(&request).await?;
            info!(id = %created.id, "volume created");
            print_record(out, &created, CREATE_FIELDS, format)?;
        }
        VolumeCommands::Show(opts) => {
            check_arity(&opts.args, 1, SHOW_USAGE)?;
            check_id(&opts.args[0])?;
            let found = client.get_volume(&opts.args[0]).await?;
            print_record(out, &found, SHOW_FIELDS, format)?;
        }
        VolumeCommands::List(opts) => {
            check_arity(&opts.args, 0, LIST_USAGE)?;
            let filter = list_filter(&opts);
            debug!(?filter, "built list filter");

            let volumes = client.list_volumes(&filter).await?;
            info!(count = volumes.len(), "volumes listed");
            print_list(out, &volumes, LIST_FIELDS, format)?;
        }
        VolumeCommands::Delete(opts) => {
            check_arity(&opts.args, 1, DELETE_USAGE)?;
            check_id(&opts.args[0])?;
            let request = delete_request(&profile);
            client.delete_volume(&opts.args[0], &request).await?;
            info!(id = %opts.args[0], "volume deleted");
        }
        VolumeCommands::Update(opts) => {
            check_arity(&opts.args, 1, UPDATE_USAGE)?;
            check_id(&opts.args[0])?;
            let request = update_request(&opts);
            debug!(?request, "built update request");

            let updated = client.update_volume(&opts.args[0], &request).await?;
            print_record(out, &updated, UPDATE_FIELDS, format)?;
        }
        VolumeCommands::Extend(opts) => {
            check_arity(&opts.args, 2, EXTEND_USAGE)?;
            let new_size = parse_size(&opts.args[1])?;
            check_id(&opts.args[0])?;
            let request = extend_request(new_size);

            let extended = client.extend_volume(&opts.args[0], &request).await?;
            info!(id = %extended.id, size = extended.size, "volume extended");
            print_record(out, &extended, EXTEND_FIELDS, format)?;
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::commands::Commands;
    use crate::error::ApiError;
    use crate::model::{ExtendRequest, VolumeFilter, VolumeRecord, VolumeRequest};
    use clap::{CommandFactory, Parser};
    use reqwest::StatusCode;
    use rstest::rstest;

    #[derive(Parser, Debug)]
    #[command(name = "osdsctl")]
    struct Harness {
        #[command(subcommand)]
        command: Commands,
    }

    /// Parses `volume ...` arguments into the profile and the subcommand.
    pub(crate) fn parse(argv: &[&str]) -> (String, VolumeCommands) {
        let Commands::Volume(volume) = parse_volume(argv).unwrap_or_else(|err| panic!("parse: {err}"));
        (volume.profile, volume.command)
    }

    fn parse_volume(argv: &[&str]) -> Result<Commands, clap::Error> {
        let argv = std::iter::once("osdsctl").chain(argv.iter().copied());
        Harness::try_parse_from(argv).map(|harness| harness.command)
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Create(VolumeRequest),
        Get(String),
        List(VolumeFilter),
        Delete(String, VolumeRequest),
        Update(String, VolumeRequest),
        Extend(String, ExtendRequest),
    }

    #[derive(Default)]
    struct SpyClient {
        calls: Mutex<Vec<Call>>,
        failure: Option<ApiError>,
    }

    impl SpyClient {
        fn failing(failure: ApiError) -> Self {
            Self {
                failure: Some(failure),
                ..Self::default()
            }
        }

        fn record(&self, call: Call) -> Result<(), ApiError> {
            self.calls
                .lock()
                .unwrap_or_else(|err| panic!("spy lock: {err}"))
                .push(call);
            match &self.failure {
                Some(err) => Err(err.clone()),
                None => Ok(()),
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls
                .lock()
                .unwrap_or_else(|err| panic!("spy lock: {err}"))
                .clone()
        }
    }

    fn volume(id: &str) -> VolumeRecord {
        VolumeRecord {
            id: id.to_string(),
            name: String::from("foo"),
            size: 100,
            status: String::from("available"),
            ..VolumeRecord::default()
        }
    }

    impl VolumeApi for SpyClient {
        async fn create_volume(&self, request: &VolumeRequest) -> Result<VolumeRecord, ApiError> {
            self.record(Call::Create(request.clone()))?;
            Ok(volume("vol-new"))
        }

        async fn get_volume(&self, id: &str) -> Result<VolumeRecord, ApiError> {
            self.record(Call::Get(id.to_string()))?;
            Ok(volume(id))
        }

        async fn list_volumes(
            &self,
            filter: &VolumeFilter,
        ) -> Result<Vec<VolumeRecord>, ApiError> {
            self.record(Call::List(filter.clone()))?;
            Ok(vec![volume("vol-1"), volume("vol-2")])
        }

        async fn delete_volume(&self, id: &str, request: &VolumeRequest) -> Result<(), ApiError> {
            self.record(Call::Delete(id.to_string(), request.clone()))
        }

        async fn update_volume(
            &self,
            id: &str,
            request: &VolumeRequest,
        ) -> Result<VolumeRecord, ApiError> {
            self.record(Call::Update(id.to_string(), request.clone()))?;
            Ok(volume(id))
        }

        async fn extend_volume(
            &self,
            id: &str,
            request: &ExtendRequest,
        ) -> Result<VolumeRecord, ApiError> {
            self.record(Call::Extend(id.to_string(), *request))?;
            let mut extended = volume(id);
            extended.size = request.new_size;
            Ok(extended)
        }
    }

    async fn run(client: &SpyClient, argv: &[&str]) -> (Result<(), CliError>, String) {
        run_with_format(client, argv, OutputFormat::Table).await
    }

    async fn run_with_format(
        client: &SpyClient,
        argv: &[&str],
        format: OutputFormat,
    ) -> (Result<(), CliError>, String) {
        let Commands::Volume(volume) =
            parse_volume(argv).unwrap_or_else(|err| panic!("parse: {err}"));
        let mut out = Vec::new();
        let result = handle_volume_command(client, volume, format, &mut out).await;
        let text = String::from_utf8(out).unwrap_or_else(|err| panic!("utf8: {err}"));
        (result, text)
    }

    #[test]
    fn verify_cmd_structure() {
        Harness::command().debug_assert();
    }

    #[test]
    fn volume_requires_a_subcommand() {
        assert!(parse_volume(&["volume"]).is_err());
    }

    #[test]
    fn unknown_sort_key_is_a_parse_error() {
        let err = parse_volume(&["volume", "list", "--sortKey", "created"])
            .expect_err("sort key should be rejected");
        assert!(err.to_string().contains("availabilityzone"));
    }

    #[test]
    fn non_numeric_limit_is_a_parse_error() {
        assert!(parse_volume(&["volume", "list", "--limit", "ten"]).is_err());
    }

    #[test]
    fn profile_is_accepted_after_the_subcommand() {
        let (profile, _) = parse(&["volume", "delete", "vol-1", "--profile", "prf-1"]);
        assert_eq!(profile, "prf-1");
    }

    #[rstest]
    #[case(&["volume", "create"])]
    #[case(&["volume", "create", "1", "2"])]
    #[case(&["volume", "show"])]
    #[case(&["volume", "show", "vol-1", "vol-2"])]
    #[case(&["volume", "list", "extra"])]
    #[case(&["volume", "delete"])]
    #[case(&["volume", "update", "vol-1", "vol-2"])]
    #[case(&["volume", "extend", "vol-1"])]
    #[case(&["volume", "extend", "vol-1", "10", "20"])]
    #[tokio::test]
    async fn wrong_arity_is_a_usage_error_without_remote_call(#[case] argv: &[&str]) {
        let client = SpyClient::default();

        let (result, text) = run(&client, argv).await;

        let err = result.expect_err("arity mismatch should fail");
        assert!(matches!(err, CliError::Usage { .. }), "unexpected error: {err}");
        assert_eq!(err.exit_code(), 2);
        assert!(client.calls().is_empty());
        assert!(text.is_empty());
    }

    #[rstest]
    #[case(&["volume", "show", ""])]
    #[case(&["volume", "delete", ".."])]
    #[case(&["volume", "update", ".", "--name", "bar"])]
    #[case(&["volume", "extend", "", "10"])]
    #[tokio::test]
    async fn unusable_id_fails_before_remote_call(#[case] argv: &[&str]) {
        let client = SpyClient::default();

        let (result, _) = run(&client, argv).await;

        let err = result.expect_err("id should be rejected");
        assert!(matches!(err, CliError::InvalidInput(_)), "unexpected error: {err}");
        assert!(client.calls().is_empty());
    }

    #[rstest]
    #[case(&["volume", "create", "abc"])]
    #[case(&["volume", "create", "0"])]
    #[case(&["volume", "extend", "vol-1", "xyz"])]
    #[case(&["volume", "extend", "no-such-volume", "1.5"])]
    #[tokio::test]
    async fn invalid_size_fails_before_remote_call(#[case] argv: &[&str]) {
        let client = SpyClient::default();

        let (result, _) = run(&client, argv).await;

        let err = result.expect_err("size should be rejected");
        assert!(matches!(err, CliError::InvalidInput(_)), "unexpected error: {err}");
        assert_eq!(err.exit_code(), 1);
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn create_sends_built_request_and_prints_record() {
        let client = SpyClient::default();

        let (result, text) = run(&client, &["volume", "create", "100", "--name", "foo"]).await;

        result.unwrap();
        assert_eq!(
            client.calls(),
            vec![Call::Create(VolumeRequest {
                name: String::from("foo"),
                size: 100,
                ..VolumeRequest::default()
            })]
        );
        assert!(text.contains("vol-new"));
        assert!(text.contains("MultiAttach"));
        assert!(!text.contains("UpdatedAt"));
    }

    #[tokio::test]
    async fn show_fetches_by_id() {
        let client = SpyClient::default();

        let (result, text) = run(&client, &["volume", "show", "vol-1"]).await;

        result.unwrap();
        assert_eq!(client.calls(), vec![Call::Get(String::from("vol-1"))]);
        assert!(text.contains("SnapshotId"));
    }

    #[tokio::test]
    async fn list_prints_a_table_row_per_volume() {
        let client = SpyClient::default();

        let (result, text) = run(&client, &["volume", "list", "--name", "foo"]).await;

        result.unwrap();
        let calls = client.calls();
        assert!(matches!(calls.as_slice(), [Call::List(filter)] if filter.name == "foo"));
        assert!(text.contains("vol-1"));
        assert!(text.contains("vol-2"));
    }

    #[tokio::test]
    async fn delete_is_silent_on_success() {
        let client = SpyClient::default();

        let (result, text) = run(&client, &["volume", "-p", "prf-1", "delete", "vol-1"]).await;

        result.unwrap();
        assert!(text.is_empty());
        assert_eq!(
            client.calls(),
            vec![Call::Delete(
                String::from("vol-1"),
                VolumeRequest {
                    profile_id: String::from("prf-1"),
                    ..VolumeRequest::default()
                }
            )]
        );
    }

    #[tokio::test]
    async fn delete_failure_reports_stripped_message() {
        let client = SpyClient::failing(ApiError::from_response(
            StatusCode::BAD_REQUEST,
            r#"{"code":400,"message":"volume vol-1 is in use"}"#,
        ));

        let (result, text) = run(&client, &["volume", "delete", "vol-1"]).await;

        let err = result.expect_err("delete should fail");
        assert_eq!(err.to_string(), "volume vol-1 is in use");
        assert_eq!(err.exit_code(), 1);
        assert!(text.is_empty());
    }

    #[tokio::test]
    async fn update_sends_partial_request() {
        let client = SpyClient::default();

        let (result, text) = run(
            &client,
            &["volume", "-p", "prf-1", "update", "vol-1", "--name", "bar"],
        )
        .await;

        result.unwrap();
        assert_eq!(
            client.calls(),
            vec![Call::Update(
                String::from("vol-1"),
                VolumeRequest {
                    name: String::from("bar"),
                    ..VolumeRequest::default()
                }
            )]
        );
        assert!(text.contains("UpdatedAt"));
        assert!(!text.contains("CreatedAt"));
    }

    #[tokio::test]
    async fn extend_sends_new_size() {
        let client = SpyClient::default();

        let (result, _) = run(&client, &["volume", "extend", "vol-1", "200"]).await;

        result.unwrap();
        assert_eq!(
            client.calls(),
            vec![Call::Extend(
                String::from("vol-1"),
                ExtendRequest { new_size: 200 }
            )]
        );
    }

    #[tokio::test]
    async fn remote_failure_stops_before_output() {
        let client = SpyClient::failing(ApiError::Transport(String::from("connection refused")));

        let (result, text) = run(&client, &["volume", "show", "vol-1"]).await;

        let err = result.expect_err("show should fail");
        assert_eq!(err.to_string(), "connection refused");
        assert!(text.is_empty());
    }

    #[tokio::test]
    async fn json_output_uses_projected_fields() {
        let client = SpyClient::default();

        let (result, text) =
            run_with_format(&client, &["volume", "show", "vol-1"], OutputFormat::Json).await;

        result.unwrap();
        let rendered: serde_json::Value =
            serde_json::from_str(&text).unwrap_or_else(|err| panic!("json: {err}"));
        assert_eq!(rendered["Id"], "vol-1");
        assert_eq!(rendered.as_object().map(|object| object.len()), Some(SHOW_FIELDS.len()));
    }
}
