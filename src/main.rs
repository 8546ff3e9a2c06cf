use clap::Parser;
use sitenav::layout::LayoutMetrics;
use sitenav::search::ResultsPanel;
use sitenav::{AccordionController, SearchSession, SiteConfig, SiteFetcher, SiteSearch};
use std::error::Error;
use tokio::io::{AsyncBufReadExt, BufReader};

mod args;
use args::{Args, Command, convert_backend};

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    if let Err(e) = run(args).await {
        ::log::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let mut search = SiteSearch::new(SiteConfig::default()).with_pages(args.pages.clone());
    if let Some(backend) = args.backend {
        search = search.with_backend(convert_backend(backend));
    }
    if let Some(timeout) = args.timeout {
        search = search.with_fetch_timeout(timeout);
    }
    if let Some(path) = &args.config {
        search = search.with_config_file(path)?;
    }

    match args.command {
        Command::Search { query, json } => run_search(&search, &query, json).await,
        Command::Session => run_session(search.session()?).await,
        Command::Groups { file } => list_groups(search.config(), &file),
        Command::Year => {
            println!("{}", sitenav::chrome::footer_year());
            Ok(())
        }
    }
}

async fn run_search(search: &SiteSearch, query: &str, json: bool) -> Result<(), Box<dyn Error>> {
    let aggregator = search.aggregator()?;
    let start_time = std::time::Instant::now();
    ::log::info!("Searching {} pages for {:?}", aggregator.pages().len(), query);

    let results = aggregator.collect(query).await;
    aggregator.fetcher().close().await;
    let results = results?;

    ::log::info!(
        "Search complete - {} results in {:.2} seconds",
        results.len(),
        start_time.elapsed().as_secs_f64()
    );

    if json {
        println!("{}", serde_json::to_string_pretty(results.items())?);
    } else {
        let mut panel = ResultsPanel::from_config(search.config());
        panel.show_results(results, &LayoutMetrics::default());
        println!("{}", panel.render_text());
    }
    Ok(())
}

async fn run_session(session: SearchSession<SiteFetcher>) -> Result<(), Box<dyn Error>> {
    println!("Type to search; prefix a line with ! to press Enter. Ctrl-D quits.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.strip_prefix('!') {
            Some(query) => {
                // Enter searches once, without the input handler's own search
                let outcome = session.search(query).await;
                ::log::debug!("Submitted {:?}: {:?}", query, outcome);
            }
            None => session.input(&line),
        }

        session.settle().await;
        let panel = session.panel();
        if panel.is_open() {
            println!("{}", panel.render_text());
        } else {
            println!("(closed)");
        }
    }

    session.aggregator().fetcher().close().await;
    Ok(())
}

fn list_groups(config: &SiteConfig, file: &std::path::Path) -> Result<(), Box<dyn Error>> {
    let page = std::fs::read_to_string(file)?;
    let (controller, measure) = AccordionController::from_html(config, &page);

    for group in controller.groups() {
        let container = group
            .container
            .map_or_else(|| "-".to_string(), |c| c.to_string());
        println!(
            "{:>3}  container {:>2}  ~{:>4.0}px  {}",
            group.id.0,
            container,
            sitenav::accordion::Measure::natural_height(&measure, group.id),
            group.label
        );
    }
    Ok(())
}
