use anyhow::{Context, Result};
use clap::Parser;
use eventdash::config::{Config, DEFAULT_ITEMS_PER_PAGE};
use eventdash::dashboard::{
    ActiveFilters, DashboardSession, DashboardView, FilterDimension, PageMarker, SortConfig,
    SortDirection, SortField,
};
use eventdash::source::{EventSource, HttpEventSource, StaticEventSource};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "eventdash-report")]
#[command(about = "Print the event dashboard table", long_about = None)]
struct Cli {
    /// Read events from a JSON file instead of the upstream feed
    #[arg(long, conflicts_with = "url")]
    file: Option<PathBuf>,
    /// Upstream feed URL (defaults to EVENTS_URL)
    #[arg(long)]
    url: Option<String>,
    /// Only show events of this type
    #[arg(long = "type")]
    event_type: Option<String>,
    /// Only show events in this country
    #[arg(long)]
    country: Option<String>,
    /// Only show events with this status
    #[arg(long)]
    status: Option<String>,
    /// Sort column (type, country, city, date, capacity, status, booked)
    #[arg(long)]
    sort: Option<SortField>,
    /// Sort direction (asc, desc); defaults to asc when --sort is given
    #[arg(long, requires = "sort")]
    direction: Option<SortDirection>,
    #[arg(long, default_value_t = 1)]
    page: usize,
    #[arg(long, default_value_t = DEFAULT_ITEMS_PER_PAGE)]
    per_page: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    if cli.page == 0 || cli.per_page == 0 {
        anyhow::bail!("--page and --per-page must be at least 1");
    }

    let events = match &cli.file {
        Some(path) => StaticEventSource::from_file(path)
            .await
            .with_context(|| format!("Failed to read events from {}", path.display()))?
            .fetch_events()
            .await?,
        None => {
            let mut upstream = Config::from_env()?.upstream;
            if let Some(url) = &cli.url {
                upstream.events_url = url.clone();
            }
            HttpEventSource::new(&upstream)?
                .fetch_events()
                .await
                .with_context(|| format!("Failed to fetch events from {}", upstream.events_url))?
        }
    };

    let mut filters = ActiveFilters::default();
    filters.set(FilterDimension::Type, cli.event_type.as_deref());
    filters.set(FilterDimension::Country, cli.country.as_deref());
    filters.set(FilterDimension::Status, cli.status.as_deref());

    let direction = cli.sort.map(|_| cli.direction.unwrap_or(SortDirection::Asc));

    let mut session = DashboardSession::new(cli.per_page);
    session.set_sort(SortConfig::from_parts(cli.sort, direction));
    session.set_page(cli.page);

    print_view(&session.view(&events, &filters));
    Ok(())
}

fn print_view(view: &DashboardView) {
    let stats = &view.stats;
    println!(
        "Total: {}  Upcoming: {}  Live: {}  Past: {}",
        stats.total_events, stats.upcoming_events, stats.live_events, stats.past_events
    );
    println!();

    let headers: Vec<String> = view
        .columns
        .iter()
        .map(|column| match column.indicator.and_then(|i| i.arrow()) {
            Some(arrow) => format!("{} {}", column.label, arrow),
            None => column.label.to_string(),
        })
        .collect();
    print_row(&headers);
    println!("{}", "-".repeat(WIDTHS.iter().sum::<usize>() + WIDTHS.len() - 1));

    if view.visible_rows.is_empty() {
        println!("No Events to display");
    }
    for row in &view.visible_rows {
        print_row(&row.cells());
    }

    if !view.footer.is_empty() {
        println!("{}", "-".repeat(WIDTHS.iter().sum::<usize>() + WIDTHS.len() - 1));
        let footer: Vec<String> = view.footer.iter().map(|cell| cell.text.clone()).collect();
        print_row(&footer);
    }

    let summary = &view.page_summary;
    if let Some(caption) = summary.caption() {
        println!();
        println!("{caption}");
    }
    if summary.show_controls {
        let pages: Vec<String> = summary
            .pages
            .iter()
            .map(|marker| match marker {
                PageMarker::Page(n) if *n == summary.current_page => format!("[{n}]"),
                other => other.to_string(),
            })
            .collect();
        println!("Pages: {}", pages.join(" "));
    }
}

const WIDTHS: [usize; 8] = [16, 14, 14, 11, 13, 10, 14, 11];

fn print_row(cells: &[String]) {
    let line: Vec<String> = cells
        .iter()
        .zip(WIDTHS)
        .map(|(cell, width)| format!("{:<width$}", cell, width = width))
        .collect();
    println!("{}", line.join(" ").trim_end());
}
