//! ranking-client binary: browse the Pi node ranking from a terminal

use std::time::Duration;

use clap::{Parser, Subcommand};
use ranking_client::{ClientBuilder, RankingClient, RankingFeed};
use ranking_core::{BrowseSession, Listing, PageToken, RankedNode, View};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ranking-client")]
#[command(about = "Browse the Pi node ranking served by ranking-server")]
struct Args {
    /// Ranking server URL
    #[arg(long, default_value = "http://localhost:3000")]
    server: String,

    /// Request timeout in seconds (0 for none)
    #[arg(long, default_value = "0")]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the top 10 nodes
    Top,
    /// Show one page of the full list
    Page {
        /// Page number, starting at 1
        page: u64,
    },
    /// Look up a node by public key (exact, then substring)
    Search {
        key: String,
        /// Ask the server instead of searching locally
        #[arg(long)]
        remote: bool,
    },
    /// Nodes with an explicit rank between START and END
    Range { start: u64, end: u64 },
    /// Make the server reload its dataset
    Refresh,
    /// Show server and cache status
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("ranking_client=warn".parse()?))
        .init();

    let args = Args::parse();

    let mut builder = ClientBuilder::new(&args.server);
    if args.timeout_secs > 0 {
        builder = builder.timeout(Duration::from_secs(args.timeout_secs));
    }
    let client = builder.build()?;

    match args.command {
        Command::Range { start, end } => show_range(&client, start, end).await,
        Command::Status => show_status(&client).await,
        Command::Search { key, remote: true } => search_remote(&client, &key).await,
        Command::Search { key, remote: false } => browse(client, Browse::Search(key)).await,
        Command::Top => browse(client, Browse::Top { refresh: false }).await,
        Command::Refresh => browse(client, Browse::Top { refresh: true }).await,
        Command::Page { page } => browse(client, Browse::Page(page)).await,
    }
}

/// Commands answered from a locally held copy of the dataset
enum Browse {
    Top { refresh: bool },
    Page(u64),
    Search(String),
}

async fn show_range(client: &RankingClient, start: u64, end: u64) -> anyhow::Result<()> {
    let nodes = client.rank_range(start, end).await?;
    println!("{} nodes ranked {}..={}", nodes.len(), start, end);
    for node in &nodes {
        println!("  #{:<6} {}  {}", node.rank.unwrap_or(0), node.public_key, node.last_active_date);
    }
    Ok(())
}

async fn show_status(client: &RankingClient) -> anyhow::Result<()> {
    let live = client.health().await;
    println!("Server {}: {}", client.server_url(), if live { "up" } else { "down" });
    if live {
        let status = client.cache_status().await?;
        println!("Cache: cached={} nodes={}", status.cached, status.node_count);
    }
    Ok(())
}

async fn search_remote(client: &RankingClient, key: &str) -> anyhow::Result<()> {
    let resp = client.search(key).await?;
    print_search(&resp.result.node.public_key, resp.result.found, resp.result.node.display_rank(0), resp.searched);
    if !resp.key_format_valid {
        println!("  note: query is not a full public key");
    }
    Ok(())
}

async fn browse(client: RankingClient, command: Browse) -> anyhow::Result<()> {
    let mut feed = RankingFeed::new(client);
    feed.fetch(matches!(command, Browse::Top { refresh: true })).await;
    if let Some(error) = feed.error() {
        println!("[WARN] {} (showing cached or fallback data)", error);
    }
    let dataset = feed.data();
    let stats = dataset.stats();
    println!(
        "{} nodes, {} pages, last updated {}",
        stats.node_count, stats.total_pages, stats.last_updated_at
    );

    let mut session = BrowseSession::default();
    match command {
        Browse::Top { .. } => {}
        Browse::Page(page) => {
            session.set_view(View::All);
            if !session.go_to_page(page, stats.total_pages) {
                anyhow::bail!("page {} is out of range 1..={}", page, stats.total_pages);
            }
        }
        Browse::Search(key) => {
            if !session.search(&key) {
                anyhow::bail!("search query must not be blank");
            }
        }
    }

    print_listing(&session.listing(&dataset));
    Ok(())
}

fn print_listing(listing: &Listing) {
    match listing {
        Listing::Search { result, display_rank, stats, .. } => {
            print_search(&result.node.public_key, result.found, *display_rank, stats.node_count);
        }
        Listing::Top { nodes, .. } => {
            println!("Top {} nodes", nodes.len());
            print_nodes(nodes);
        }
        Listing::Paged {
            nodes,
            page,
            total_pages,
            start_index,
            end_index,
            total_items,
            window,
            ..
        } => {
            println!("Page {} / {}", page, total_pages);
            print_nodes(nodes);
            println!("Showing {} to {} of {} nodes", start_index + 1, end_index, total_items);
            let pages: Vec<String> = window
                .iter()
                .map(|token| match token {
                    PageToken::Page(n) if n == page => format!("[{}]", n),
                    PageToken::Page(n) => n.to_string(),
                    PageToken::Ellipsis => "...".to_string(),
                })
                .collect();
            println!("{}", pages.join(" "));
        }
    }
}

fn print_nodes(nodes: &[RankedNode]) {
    if nodes.is_empty() {
        println!("  (no nodes)");
    }
    for ranked in nodes {
        println!(
            "  #{:<6} {}  {}",
            ranked.display_rank, ranked.node.public_key, ranked.node.last_active_date
        );
    }
}

fn print_search(key: &str, found: bool, rank: u64, searched: usize) {
    if found {
        println!("[OK] Found {} at rank #{}", key, rank);
    } else {
        println!("[MISS] {} is not in the ranking (searched {} nodes)", key, searched);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Command {
        Args::try_parse_from(std::iter::once("ranking-client").chain(args.iter().copied()))
            .unwrap()
            .command
    }

    #[test]
    fn test_search_flag_selects_remote() {
        assert!(matches!(parse(&["search", "GABC", "--remote"]), Command::Search { remote: true, .. }));
        assert!(matches!(parse(&["search", "GABC"]), Command::Search { remote: false, .. }));
    }

    #[test]
    fn test_subcommands_parse() {
        assert!(matches!(parse(&["page", "3"]), Command::Page { page: 3 }));
        assert!(matches!(parse(&["range", "1", "5"]), Command::Range { start: 1, end: 5 }));
        assert!(matches!(parse(&["refresh"]), Command::Refresh));
        assert!(Args::try_parse_from(["ranking-client", "page", "x"]).is_err());
    }
}
