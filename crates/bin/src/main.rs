//! farmview CLI binary.
//!
//! Runs the dashboard controllers against the survey data backend and prints
//! the resulting section.

mod error;

use clap::builder::{PossibleValue, PossibleValuesParser};
use clap::{Args, Parser, Subcommand};
use std::convert::Infallible;
use std::process;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt};

use error::{CliError, Result};
use farmview::render::{self, OutputFormat};
use farmview::{Dashboard, SectionId, SectionView, controller};
use farmview_core::report::{CATEGORIES, DEFAULT_COMPARE_REPORT};
use farmview_core::{
    ApiOutcome, ComparisonKind, CustomQuery, FarmApi, FilterSelection, MetadataKind, Record,
    ReportKind, SelectOption, StateInfo, Table, TrendRequest, Year,
};
use farmview_http::{DEFAULT_BASE_URL, HttpApi};

#[derive(Parser)]
#[command(name = "farmview")]
#[command(about = "Farm financial dashboard: survey reports from the command line", long_about = None)]
#[command(version)]
struct Cli {
    /// Backend address
    #[arg(long, global = true, env = "FARMVIEW_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Output format (text, html or json)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Request timeout in seconds (no timeout by default)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available survey years, most recent first
    Years,

    /// List available states
    States,

    /// Fetch a report
    Report {
        /// Report: income, balance, ratios, structure, government-payments or household-income
        kind: ReportKind,

        #[command(flatten)]
        filters: FilterArgs,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Compare a report across farm groups
    Compare {
        /// Survey year
        #[arg(long)]
        year: Option<Year>,

        /// Grouping: typology, economic or region
        #[arg(long = "by", default_value = "typology")]
        kind: ComparisonKind,

        /// Report short name (income, balance, ...) or full report name
        #[arg(long, default_value = DEFAULT_COMPARE_REPORT, value_parser = report_name)]
        report: String,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Follow a variable across a range of years
    Trend {
        /// Survey variable
        variable: String,

        /// First year
        #[arg(long, default_value_t = 2015)]
        start_year: Year,

        /// Last year
        #[arg(long, default_value_t = 2020)]
        end_year: Year,

        /// State code or id (all states by default)
        #[arg(long)]
        state: Option<String>,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Query survey data with any combination of filters
    Query {
        #[command(flatten)]
        query: QueryArgs,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// List reports, farm types, categories or variables
    Metadata {
        /// Listing: reports, farm-types, categories or variables
        kind: MetadataKind,

        /// Only list variables of this report
        #[arg(long, value_parser = report_name)]
        report: Option<String>,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Check backend health
    Health,
}

#[derive(Args)]
struct FilterArgs {
    /// Survey year (repeatable)
    #[arg(long = "year")]
    years: Vec<Year>,

    /// State code or id
    #[arg(long)]
    state: Option<String>,

    /// Breakdown category
    #[arg(long, value_parser = category_parser())]
    category: Option<String>,
}

#[derive(Args)]
struct QueryArgs {
    /// Survey year (repeatable)
    #[arg(long = "year", required = true)]
    years: Vec<Year>,

    /// State code or id
    #[arg(long)]
    state: Option<String>,

    /// Report short name or full report name
    #[arg(long, value_parser = report_name)]
    report: Option<String>,

    /// Survey variable
    #[arg(long)]
    variable: Option<String>,

    /// Farm type
    #[arg(long)]
    farmtype: Option<String>,

    /// Breakdown category
    #[arg(long, value_parser = category_parser())]
    category: Option<String>,

    /// Value within the breakdown category
    #[arg(long)]
    category_value: Option<String>,

    /// Second breakdown category
    #[arg(long, value_parser = category_parser())]
    category2: Option<String>,
}

impl QueryArgs {
    fn into_query(self) -> CustomQuery {
        CustomQuery {
            state: self.state,
            report: self.report,
            variable: self.variable,
            farmtype: self.farmtype,
            category: self.category,
            category_value: self.category_value,
            category2: self.category2,
            ..CustomQuery::new(self.years)
        }
    }
}

#[derive(Args)]
struct ViewArgs {
    /// Sort by column key or heading
    #[arg(long)]
    sort_by: Option<String>,

    /// Sort descending (requires --sort-by)
    #[arg(long, requires = "sort_by")]
    descending: bool,

    /// Show only rows containing this text
    #[arg(long)]
    search: Option<String>,
}

#[tokio::main]
async fn main() {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let api = match cli.timeout_secs {
        Some(secs) => HttpApi::with_timeout(&cli.base_url, Duration::from_secs(secs))?,
        None => HttpApi::new(&cli.base_url),
    };
    debug!(base_url = api.base_url(), format = %cli.format, "Using backend");

    match cli.command {
        Commands::Years => list_years(&api, cli.format).await,
        Commands::States => list_states(&api, cli.format).await,
        Commands::Report {
            kind,
            filters,
            view,
        } => match SectionId::for_report(kind) {
            Some(id) => run_section_report(api, id, filters, &view, cli.format).await,
            None => run_standalone_report(&api, kind, filters, &view, cli.format).await,
        },
        Commands::Compare {
            year,
            kind,
            report,
            view,
        } => {
            let mut dashboard = Dashboard::new(api);
            let controls = dashboard.compare_controls_mut();
            controls.select_year(year);
            controls.set_kind(kind);
            controls.set_report(report);
            dashboard.perform_comparison().await;
            print_section(dashboard.section_mut(SectionId::Compare), &view, cli.format)
        }
        Commands::Trend {
            variable,
            start_year,
            end_year,
            state,
            view,
        } => {
            let mut request = TrendRequest::new(start_year, end_year, variable);
            if let Some(state) = state {
                request = request.with_state(state);
            }
            let records = controller::fetch_trend(&api, &request)
                .await
                .map_err(CliError::Section)?;
            let title = format!("Trend: {} ({start_year}-{end_year})", request.variable);
            print_records(&title, "trend", &records, &view, cli.format)
        }
        Commands::Query { query, view } => {
            let records = controller::fetch_query(&api, &query.into_query())
                .await
                .map_err(CliError::Section)?;
            print_records("Custom Query", "query", &records, &view, cli.format)
        }
        Commands::Metadata { kind, report, view } => {
            let records = controller::fetch_metadata(&api, kind, report.as_deref())
                .await
                .map_err(CliError::Section)?;
            print_records(&kind.to_string(), kind.short_name(), &records, &view, cli.format)
        }
        Commands::Health => check_health(&api).await,
    }
}

/// Accepts a report short name and maps it to the backend's report name.
/// Anything else is passed through as a report name.
fn report_name(value: &str) -> std::result::Result<String, Infallible> {
    Ok(value.parse::<ReportKind>().map_or_else(
        |_| value.trim().to_string(),
        |kind| kind.report_name().to_string(),
    ))
}

fn category_parser() -> PossibleValuesParser {
    PossibleValuesParser::new(
        CATEGORIES
            .iter()
            .map(|(value, label)| PossibleValue::new(*value).help(*label)),
    )
}

fn into_rows<T>(outcome: ApiOutcome<T>) -> Result<Vec<T>> {
    match outcome {
        ApiOutcome::Data(rows) => Ok(rows),
        ApiOutcome::Empty => Ok(Vec::new()),
        ApiOutcome::Error(message) => Err(CliError::Section(message)),
    }
}

async fn list_years(api: &HttpApi, format: OutputFormat) -> Result<()> {
    let mut years = into_rows(api.years().await?)?;
    years.sort_unstable_by(|a, b| b.cmp(a));

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&years)?),
        OutputFormat::Text | OutputFormat::Html => {
            for year in years {
                println!("{year}");
            }
        }
    }
    Ok(())
}

async fn list_states(api: &HttpApi, format: OutputFormat) -> Result<()> {
    let options: Vec<SelectOption> = into_rows(api.states().await?)?
        .iter()
        .map(StateInfo::to_option)
        .collect();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&options)?),
        OutputFormat::Text | OutputFormat::Html => {
            for option in options {
                println!("{}  {}", option.value, option.label);
            }
        }
    }
    Ok(())
}

async fn run_section_report(
    api: HttpApi,
    id: SectionId,
    filters: FilterArgs,
    view: &ViewArgs,
    format: OutputFormat,
) -> Result<()> {
    let mut dashboard = Dashboard::new(api);
    if let Some(controls) = dashboard.report_controls_mut(id) {
        controls.select_years(filters.years);
        controls.set_state(filters.state.unwrap_or_default());
        controls.set_category(filters.category.unwrap_or_default());
    }
    dashboard.fetch(id).await;
    print_section(dashboard.section_mut(id), view, format)
}

/// Reports without a dashboard section render a bare table.
async fn run_standalone_report(
    api: &HttpApi,
    kind: ReportKind,
    filters: FilterArgs,
    view: &ViewArgs,
    format: OutputFormat,
) -> Result<()> {
    let selection = FilterSelection::new(filters.years)
        .with_state(filters.state.unwrap_or_default())
        .with_category(filters.category.unwrap_or_default());
    let records = controller::fetch_records(api, kind, &selection)
        .await
        .map_err(CliError::Section)?;
    print_records(kind.title(), kind.short_name(), &records, view, format)
}

/// Prints records that have no dashboard section as a bare table.
fn print_records(
    title: &str,
    id: &str,
    records: &[Record],
    view: &ViewArgs,
    format: OutputFormat,
) -> Result<()> {
    let mut table = Table::from_records(records);
    shape_table(&mut table, view)?;

    match format {
        OutputFormat::Text => {
            println!("{title}");
            print!("{}", render::text::render_table(&table));
            println!("Total Records: {}", table.len());
        }
        OutputFormat::Html => print!("{}", render::html::render_table(id, &table)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&table)?),
    }
    Ok(())
}

fn print_section(section: &mut SectionView, view: &ViewArgs, format: OutputFormat) -> Result<()> {
    if let Some(message) = section.error() {
        return Err(CliError::Section(message.to_string()));
    }
    if let Some(table) = section.table_mut() {
        shape_table(table, view)?;
    }
    print!("{}", render::render_section(section, format)?);
    Ok(())
}

fn shape_table(table: &mut Table, view: &ViewArgs) -> Result<()> {
    if let Some(name) = &view.sort_by {
        let column = table
            .column_index(name)
            .ok_or_else(|| CliError::UnknownColumn(name.clone()))?;
        table.sort_by_column(column);
        if view.descending {
            table.sort_by_column(column);
        }
    }
    if let Some(query) = &view.search {
        table.search(query);
    }
    Ok(())
}

async fn check_health(api: &HttpApi) -> Result<()> {
    let health = api.health().await?;
    println!("{} {} {}", health.service, health.version, health.status);
    if health.is_healthy() {
        Ok(())
    } else {
        Err(CliError::Unhealthy(health.status))
    }
}
