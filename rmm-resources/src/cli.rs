//! `rmm-cli` argument parsing and command dispatch.

use crate::api::{Listing, RmmApi};
use crate::query::DeviceQuery;
use crate::resources::account::DeviceSearch;
use crate::resources::device::{QuickJob, UdfFields};
use crate::resources::site::SiteDetails;
use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use rmm::config::load_config;
use rmm::{CombineMode, FilterSet, RmmConfig};
use serde_json::Value;
use std::path::PathBuf;
use tracing::warn;

/// Command line client for the RMM REST API.
#[derive(Parser, Debug)]
#[command(name = "rmm-cli", version, about)]
pub struct Cli {
    /// TOML config file; `RMM_*` env vars override it.
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Loads the config file (if any) and overlays the environment.
    pub fn load_config(&self) -> Result<RmmConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(&path.to_string_lossy())?,
            None => RmmConfig::default(),
        };
        config.apply_env();
        Ok(config)
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Account-wide listings.
    #[command(subcommand)]
    Account(AccountCommand),
    /// Device lookup, search and actions.
    #[command(subcommand)]
    Devices(DeviceCommand),
    /// Site lookup and management.
    #[command(subcommand)]
    Sites(SiteCommand),
    /// Single alerts.
    #[command(subcommand)]
    Alerts(AlertCommand),
    /// Job status and output.
    #[command(subcommand)]
    Jobs(JobCommand),
    /// Hardware and software audits.
    #[command(subcommand)]
    Audit(AuditCommand),
    /// Server-side device filters.
    #[command(subcommand)]
    Filters(FilterCommand),
    /// Platform status.
    #[command(subcommand)]
    System(SystemCommand),
}

#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Maximum records to return (default: all).
    #[arg(long)]
    pub limit: Option<usize>,
}

impl ListArgs {
    fn listing(&self) -> Listing {
        Listing::from_limit(self.limit)
    }
}

#[derive(Subcommand, Debug)]
pub enum AccountCommand {
    /// Show the account.
    Get,
    /// List users.
    Users(ListArgs),
    /// List sites.
    Sites {
        /// Partial site name.
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        list: ListArgs,
    },
    /// List account variables.
    Variables(ListArgs),
    /// List components.
    Components(ListArgs),
    /// List open (or resolved) alerts.
    Alerts {
        #[arg(long)]
        resolved: bool,
        #[arg(long)]
        muted: Option<bool>,
        #[command(flatten)]
        list: ListArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum DeviceCommand {
    /// Search devices, optionally filtering and projecting client-side.
    List {
        #[arg(long)]
        hostname: Option<String>,
        #[arg(long)]
        device_type: Option<String>,
        #[arg(long)]
        os: Option<String>,
        #[arg(long)]
        site_name: Option<String>,
        /// Server-side filter id.
        #[arg(long)]
        filter_id: Option<i64>,
        /// JSON file holding an array of filter conditions.
        #[arg(long)]
        filters: Option<PathBuf>,
        /// How conditions combine: and | or.
        #[arg(long, default_value = "and")]
        mode: CombineMode,
        /// Comma-separated field paths to keep, e.g. `hostname,deviceType.category`.
        #[arg(long)]
        fields: Option<String>,
        #[command(flatten)]
        list: ListArgs,
    },
    /// Show one device by uid, numeric id or MAC address.
    Get {
        #[arg(required_unless_present_any = ["id", "mac"])]
        uid: Option<String>,
        #[arg(long, conflicts_with_all = ["uid", "mac"])]
        id: Option<i64>,
        #[arg(long, conflicts_with = "uid")]
        mac: Option<String>,
    },
    /// List a device's open (or resolved) alerts.
    Alerts {
        uid: String,
        #[arg(long)]
        resolved: bool,
        #[command(flatten)]
        list: ListArgs,
    },
    /// Move a device to another site.
    Move { uid: String, site_uid: String },
    /// Run a component on a device.
    QuickJob {
        uid: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        component: String,
        /// Component variable, `name=value`; repeatable.
        #[arg(long = "var", value_parser = parse_key_val)]
        vars: Vec<(String, String)>,
    },
    /// Set user-defined fields.
    Udf {
        uid: String,
        /// `udfN=value`; repeatable.
        #[arg(long = "set", value_parser = parse_key_val, required = true)]
        fields: Vec<(String, String)>,
    },
    /// Set or clear the warranty expiry date.
    Warranty {
        uid: String,
        /// Expiry date, YYYY-MM-DD.
        #[arg(long, required_unless_present = "clear", conflicts_with = "clear")]
        date: Option<NaiveDate>,
        #[arg(long)]
        clear: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum SiteCommand {
    Get { uid: String },
    Devices {
        uid: String,
        #[command(flatten)]
        list: ListArgs,
    },
    Alerts {
        uid: String,
        #[command(flatten)]
        list: ListArgs,
    },
    Variables {
        uid: String,
        #[command(flatten)]
        list: ListArgs,
    },
    Settings { uid: String },
    /// Create a site.
    Create(SiteArgs),
    /// Update a site.
    Update {
        uid: String,
        #[command(flatten)]
        site: SiteArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct SiteArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
    #[arg(long)]
    pub on_demand: Option<bool>,
    #[arg(long)]
    pub splashtop_auto_install: Option<bool>,
}

impl From<SiteArgs> for SiteDetails {
    fn from(args: SiteArgs) -> Self {
        SiteDetails {
            name: args.name,
            description: args.description,
            notes: args.notes,
            on_demand: args.on_demand,
            splashtop_auto_install: args.splashtop_auto_install,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum AlertCommand {
    Get { uid: String },
    Resolve { uid: String },
}

#[derive(Subcommand, Debug)]
pub enum JobCommand {
    Get { uid: String },
    Components {
        uid: String,
        #[command(flatten)]
        list: ListArgs,
    },
    Results { uid: String, device_uid: String },
    Stdout { uid: String, device_uid: String },
    Stderr { uid: String, device_uid: String },
}

#[derive(Subcommand, Debug)]
pub enum AuditCommand {
    Device { uid: String },
    Software {
        uid: String,
        #[command(flatten)]
        list: ListArgs,
    },
    Esxi { uid: String },
    Printer { uid: String },
    Mac { mac: String },
}

#[derive(Subcommand, Debug)]
pub enum FilterCommand {
    Default(ListArgs),
    Custom(ListArgs),
}

#[derive(Subcommand, Debug)]
pub enum SystemCommand {
    Status,
    RequestRate,
    Pagination,
}

/// Runs one command and returns its JSON result.
pub async fn run(api: &RmmApi, command: Command) -> Result<Value> {
    let value = match command {
        Command::Account(cmd) => run_account(api, cmd).await?,
        Command::Devices(cmd) => run_devices(api, cmd).await?,
        Command::Sites(cmd) => run_sites(api, cmd).await?,
        Command::Alerts(cmd) => match cmd {
            AlertCommand::Get { uid } => api.alerts().get(&uid).await?,
            AlertCommand::Resolve { uid } => api.alerts().resolve(&uid).await?,
        },
        Command::Jobs(cmd) => run_jobs(api, cmd).await?,
        Command::Audit(cmd) => run_audit(api, cmd).await?,
        Command::Filters(cmd) => match cmd {
            FilterCommand::Default(list) => {
                Value::Array(api.filters().default_filters(list.listing()).await?)
            }
            FilterCommand::Custom(list) => {
                Value::Array(api.filters().custom_filters(list.listing()).await?)
            }
        },
        Command::System(cmd) => match cmd {
            SystemCommand::Status => api.system().status().await?,
            SystemCommand::RequestRate => api.system().request_rate().await?,
            SystemCommand::Pagination => api.system().pagination().await?,
        },
    };
    Ok(value)
}

async fn run_account(api: &RmmApi, cmd: AccountCommand) -> Result<Value> {
    let account = api.account();
    let value = match cmd {
        AccountCommand::Get => account.get().await?,
        AccountCommand::Users(list) => Value::Array(account.users(list.listing()).await?),
        AccountCommand::Sites { name, list } => {
            Value::Array(account.sites(name.as_deref(), list.listing()).await?)
        }
        AccountCommand::Variables(list) => Value::Array(account.variables(list.listing()).await?),
        AccountCommand::Components(list) => {
            Value::Array(account.components(list.listing()).await?)
        }
        AccountCommand::Alerts {
            resolved,
            muted,
            list,
        } => {
            let alerts = if resolved {
                account.resolved_alerts(muted, list.listing()).await?
            } else {
                account.open_alerts(muted, list.listing()).await?
            };
            Value::Array(alerts)
        }
    };
    Ok(value)
}

async fn run_devices(api: &RmmApi, cmd: DeviceCommand) -> Result<Value> {
    let devices = api.devices();
    let value = match cmd {
        DeviceCommand::List {
            hostname,
            device_type,
            os,
            site_name,
            filter_id,
            filters,
            mode,
            fields,
            list,
        } => {
            let search = DeviceSearch {
                hostname,
                device_type,
                operating_system: os,
                site_name,
                filter_id,
            };
            let filters = match filters {
                Some(path) => load_filters(&path, mode)?,
                None => FilterSet::default(),
            };
            let fields = fields
                .as_deref()
                .map(DeviceQuery::parse_fields)
                .unwrap_or_default();
            let result = if filters.is_empty() && fields.is_empty() {
                api.account().devices(&search, list.listing()).await?
            } else {
                let query = DeviceQuery::new(filters, fields);
                api.account()
                    .query_devices(&search, &query, list.listing())
                    .await?
            };
            Value::Array(result)
        }
        DeviceCommand::Get { uid, id, mac } => match (uid, id, mac) {
            (Some(uid), _, _) => devices.get(&uid).await?,
            (None, Some(id), _) => devices.get_by_id(id).await?,
            (None, None, Some(mac)) => devices.get_by_mac(&mac).await?,
            (None, None, None) => bail!("device uid, --id or --mac is required"),
        },
        DeviceCommand::Alerts {
            uid,
            resolved,
            list,
        } => {
            let alerts = if resolved {
                devices.resolved_alerts(&uid, list.listing()).await?
            } else {
                devices.open_alerts(&uid, list.listing()).await?
            };
            Value::Array(alerts)
        }
        DeviceCommand::Move { uid, site_uid } => devices.move_to_site(&uid, &site_uid).await?,
        DeviceCommand::QuickJob {
            uid,
            name,
            component,
            vars,
        } => {
            let job = vars
                .into_iter()
                .fold(QuickJob::new(name, component), |job, (k, v)| {
                    job.with_variable(k, v)
                });
            devices.create_quick_job(&uid, &job).await?
        }
        DeviceCommand::Udf { uid, fields } => {
            let fields: UdfFields = fields
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect();
            devices.set_udf(&uid, &fields).await?
        }
        DeviceCommand::Warranty { uid, date, clear } => {
            let date = if clear { None } else { date };
            devices.set_warranty(&uid, date).await?
        }
    };
    Ok(value)
}

async fn run_sites(api: &RmmApi, cmd: SiteCommand) -> Result<Value> {
    let sites = api.sites();
    let value = match cmd {
        SiteCommand::Get { uid } => sites.get(&uid).await?,
        SiteCommand::Devices { uid, list } => Value::Array(sites.devices(&uid, list.listing()).await?),
        SiteCommand::Alerts { uid, list } => {
            Value::Array(sites.open_alerts(&uid, list.listing()).await?)
        }
        SiteCommand::Variables { uid, list } => {
            Value::Array(sites.variables(&uid, list.listing()).await?)
        }
        SiteCommand::Settings { uid } => sites.settings(&uid).await?,
        SiteCommand::Create(args) => sites.create(&args.into()).await?,
        SiteCommand::Update { uid, site } => sites.update(&uid, &site.into()).await?,
    };
    Ok(value)
}

async fn run_jobs(api: &RmmApi, cmd: JobCommand) -> Result<Value> {
    let jobs = api.jobs();
    let value = match cmd {
        JobCommand::Get { uid } => jobs.get(&uid).await?,
        JobCommand::Components { uid, list } => {
            Value::Array(jobs.components(&uid, list.listing()).await?)
        }
        JobCommand::Results { uid, device_uid } => jobs.results(&uid, &device_uid).await?,
        JobCommand::Stdout { uid, device_uid } => jobs.stdout(&uid, &device_uid).await?,
        JobCommand::Stderr { uid, device_uid } => jobs.stderr(&uid, &device_uid).await?,
    };
    Ok(value)
}

async fn run_audit(api: &RmmApi, cmd: AuditCommand) -> Result<Value> {
    let audit = api.audit();
    let value = match cmd {
        AuditCommand::Device { uid } => audit.device(&uid).await?,
        AuditCommand::Software { uid, list } => {
            Value::Array(audit.software(&uid, list.listing()).await?)
        }
        AuditCommand::Esxi { uid } => audit.esxi_host(&uid).await?,
        AuditCommand::Printer { uid } => audit.printer(&uid).await?,
        AuditCommand::Mac { mac } => audit.by_mac(&mac).await?,
    };
    Ok(value)
}

/// Reads a JSON array of filter conditions; malformed entries are dropped.
pub fn load_filters(path: &std::path::Path, mode: CombineMode) -> Result<FilterSet> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read filter file {}", path.display()))?;
    let raw: Value = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse filter file {}", path.display()))?;
    if !raw.is_array() {
        bail!("Filter file {} must hold a JSON array", path.display());
    }
    let filters = FilterSet::from_raw(&raw, mode);
    let supplied = raw.as_array().map_or(0, Vec::len);
    if filters.conditions.len() < supplied {
        warn!(
            supplied = supplied,
            kept = filters.conditions.len(),
            "Dropped malformed filter conditions"
        );
    }
    Ok(filters)
}

fn parse_key_val(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected name=value, got '{}'", s)),
    }
}
