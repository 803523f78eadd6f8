use clap::{ArgAction, Args};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:50040";
pub const DEFAULT_TENANT_ID: &str = "e93b4c0934da416eb9c8d120c5d04d96";
const API_VERSION: &str = "v1beta";

/// Connection and output settings shared by every command.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Control-plane endpoint
    #[arg(long, global = true, env = "OPENSDS_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Tenant the requests are scoped to
    #[arg(
        long = "tenant-id",
        global = true,
        env = "OPENSDS_TENANT_ID",
        default_value = DEFAULT_TENANT_ID
    )]
    pub tenant: String,

    /// User for HTTP basic authentication
    #[arg(long, global = true, env = "OPENSDS_USER")]
    pub user: Option<String>,

    /// Password for HTTP basic authentication
    #[arg(long, global = true, env = "OPENSDS_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Skip TLS certificate verification
    #[arg(long, global = true)]
    pub insecure: bool,

    /// Output the displayed fields as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Settings consumed by the HTTP client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub endpoint: String,
    pub tenant_id: String,
    pub basic_auth: Option<(String, String)>,
    pub accept_invalid_certs: bool,
}

impl ClientConfig {
    pub fn from_args(args: &GlobalArgs) -> Self {
        let basic_auth = match (&args.user, &args.password) {
            (Some(user), Some(password)) => Some((user.clone(), password.clone())),
            _ => None,
        };
        Self {
            endpoint: args.endpoint.clone(),
            tenant_id: args.tenant.clone(),
            basic_auth,
            accept_invalid_certs: args.insecure,
        }
    }

    /// Collection URL of the volume resource.
    pub fn volumes_url(&self) -> String {
        format!(
            "{}/{}/{}/block/volumes",
            self.endpoint.trim_end_matches('/'),
            API_VERSION,
            self.tenant_id
        )
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            tenant_id: DEFAULT_TENANT_ID.to_string(),
            basic_auth: None,
            accept_invalid_certs: false,
        }
    }
}

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
