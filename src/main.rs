use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use startpage::config::CONFIG;
use startpage::{AsyncStartpageClient, Category, SearchOptions, StartpageClient};

#[derive(Parser, Debug)]
#[command(name = "startpage", about = "Query Startpage from the command line")]
struct Cli {
    /// Log request and parsing details.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Proxy URL for all requests (overrides STARTPAGE_PROXY).
    #[arg(long, global = true)]
    proxy: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct SearchArgs {
    query: String,
    #[arg(long, default_value = "en")]
    language: String,
    #[arg(long, default_value = "all")]
    region: String,
    #[arg(long, default_value = "moderate")]
    safe_search: String,
    #[arg(long)]
    time_filter: Option<String>,
    #[arg(long)]
    size: Option<String>,
    #[arg(long)]
    duration: Option<String>,
    #[arg(long, requires = "lon")]
    lat: Option<f64>,
    #[arg(long, requires = "lat")]
    lon: Option<f64>,
    #[arg(long)]
    radius: Option<u32>,
    #[arg(long, default_value_t = 1)]
    page: u32,
    #[arg(long)]
    per_page: Option<u32>,
    /// Raw upstream parameter, `key=value`; may be repeated.
    #[arg(long = "param", value_parser = parse_key_value)]
    params: Vec<(String, String)>,
}

impl SearchArgs {
    fn options(&self) -> SearchOptions {
        let mut options = SearchOptions::new()
            .language(&self.language)
            .region(&self.region)
            .safe_search(&self.safe_search)
            .page(self.page);
        options.time_filter = self.time_filter.clone();
        options.size = self.size.clone();
        options.duration = self.duration.clone();
        options.latitude = self.lat;
        options.longitude = self.lon;
        options.radius = self.radius;
        options.results_per_page = self.per_page;
        options.extra = self.params.clone();
        options
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a search and print the parsed results.
    Search {
        #[arg(long, default_value = "web")]
        category: String,
        #[command(flatten)]
        args: SearchArgs,
    },
    /// Autocomplete suggestions for a partial query.
    Suggest {
        query: String,
        #[arg(long, default_value = "en")]
        language: String,
    },
    /// Instant answer and knowledge panel for a query.
    Answer {
        query: String,
        #[arg(long, default_value = "en")]
        language: String,
    },
    /// Web search with readable advanced keys, `--opt key=value`.
    Advanced {
        #[command(flatten)]
        args: SearchArgs,
        #[arg(long = "opt", value_parser = parse_key_value)]
        opts: Vec<(String, String)>,
    },
    /// Print the search URL without sending anything.
    Url {
        query: String,
        #[arg(long, default_value = "web")]
        category: String,
    },
}

fn parse_key_value(raw: &str) -> std::result::Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected key=value, got {raw:?}"))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mut config = CONFIG.clone();
    if let Some(proxy) = cli.proxy {
        config = config.with_proxy(proxy);
    }
    let client = AsyncStartpageClient::new(
        StartpageClient::new(config).context("failed to create Startpage client")?,
    );
    tracing::debug!("session {}", client.blocking().session_id());

    match cli.command {
        Command::Search { category, args } => {
            let category: Category = category.parse()?;
            let options = args.options();
            let page = match category {
                Category::Web => client.search(args.query, options).await?,
                Category::Images => client.images_search(args.query, options).await?,
                Category::Videos => client.videos_search(args.query, options).await?,
                Category::News => client.news_search(args.query, options).await?,
                Category::Places => client.places_search(args.query, options).await?,
            };
            print_json(&page)
        }
        Command::Suggest { query, language } => {
            print_json(&client.suggestions(query, language).await?)
        }
        Command::Answer { query, language } => {
            let options = SearchOptions::new().language(language);
            print_json(&client.instant_answers(query, options).await?)
        }
        Command::Advanced { args, opts } => {
            let options = args.options();
            print_json(&client.advanced_search(args.query, options, opts).await?)
        }
        Command::Url { query, category } => {
            let category: Category = category.parse()?;
            println!("{}", client.get_search_url(&query, category, &[]));
            Ok(())
        }
    }
}
