//! Server-rendered HTML page
//!
//! Markup only; every figure comes from a [`Listing`].

use std::fmt::Write;

use ranking_core::{Listing, PageToken, RankedNode, SearchResult, View};

const SITE_TITLE: &str = "Pi Node Ranking";

/// Render the full page for `listing`
pub fn render_page(listing: &Listing, search: &str) -> String {
    let mut body = String::new();
    render_stats(&mut body, listing);
    render_search_form(&mut body, search);

    match listing {
        Listing::Search { result, display_rank, stats, .. } => {
            render_search_result(&mut body, result, *display_rank, stats.node_count);
        }
        Listing::Top { nodes, .. } => {
            render_view_toggle(&mut body, View::Top10);
            body.push_str("<section class=\"top\">\n<h2>Top 10 Pi Nodes</h2>\n");
            render_cards(&mut body, nodes);
            body.push_str("</section>\n");
        }
        Listing::Paged {
            nodes,
            page,
            total_pages,
            start_index,
            end_index,
            total_items,
            has_previous_page,
            has_next_page,
            window,
            ..
        } => {
            render_view_toggle(&mut body, View::All);
            let _ = writeln!(
                body,
                "<section class=\"all\">\n<h2>All Pi Nodes</h2>\n<p class=\"page-info\">Page {} / {}</p>",
                page, total_pages
            );
            render_cards(&mut body, nodes);
            if *total_pages > 1 {
                let _ = writeln!(
                    body,
                    "<p class=\"range\">Showing {} to {} of {} nodes</p>",
                    start_index + 1,
                    end_index,
                    total_items
                );
                render_pagination(&mut body, *page, *total_pages, *has_previous_page, *has_next_page, window);
            }
            body.push_str("</section>\n");
        }
    }

    format!(
        "<!DOCTYPE html>\n<html lang=\"vi\">\n<head>\n<meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         <title>{title}</title>\n</head>\n<body>\n<header><h1>{title}</h1>\
         <p class=\"updated\">Last updated {updated}</p></header>\n<main>\n{body}</main>\n</body>\n</html>\n",
        title = SITE_TITLE,
        updated = escape_html(&listing.stats().last_updated_at),
        body = body,
    )
}

fn render_stats(out: &mut String, listing: &Listing) {
    let stats = listing.stats();
    let _ = writeln!(
        out,
        "<section class=\"stats\">\n<div class=\"stat\"><span class=\"value\">{}</span> nodes</div>\n\
         <div class=\"stat\"><span class=\"value\">{}</span> pages</div>\n</section>",
        stats.node_count, stats.total_pages
    );
}

fn render_search_form(out: &mut String, search: &str) {
    let _ = writeln!(
        out,
        "<form class=\"search\" method=\"get\" action=\"/\">\n\
         <input type=\"text\" name=\"search\" value=\"{}\" placeholder=\"Public Key\">\n\
         <button type=\"submit\">Search</button>",
        escape_html(search)
    );
    if !search.is_empty() {
        out.push_str("<a class=\"clear\" href=\"/\">Clear</a>\n");
    }
    out.push_str("</form>\n");
}

fn render_search_result(out: &mut String, result: &SearchResult, display_rank: u64, searched: usize) {
    out.push_str("<section class=\"search-result\">\n");
    if result.found {
        out.push_str("<h2>Node found</h2>\n");
        render_card(out, &result.node.public_key, &result.node.last_active_date, display_rank, true);
    } else {
        let _ = writeln!(
            out,
            "<h2>Node not found</h2>\n<p>Public Key \"<code>{}</code>\" is not in the ranking.</p>\n\
             <p class=\"searched\">Searched {} nodes</p>",
            escape_html(&result.node.public_key),
            searched
        );
    }
    out.push_str("</section>\n");
}

fn render_view_toggle(out: &mut String, active: View) {
    let class = |view: View| if view == active { "active" } else { "" };
    let _ = writeln!(
        out,
        "<nav class=\"views\"><a class=\"{}\" href=\"?view=top10\">Top 10</a> \
         <a class=\"{}\" href=\"?view=all&amp;page=1\">All</a></nav>",
        class(View::Top10),
        class(View::All)
    );
}

fn render_cards(out: &mut String, nodes: &[RankedNode]) {
    if nodes.is_empty() {
        out.push_str("<p class=\"empty\">No nodes to display</p>\n");
        return;
    }
    out.push_str("<ol class=\"cards\">\n");
    for ranked in nodes {
        render_card(out, &ranked.node.public_key, &ranked.node.last_active_date, ranked.display_rank, false);
    }
    out.push_str("</ol>\n");
}

fn render_card(out: &mut String, public_key: &str, last_active: &str, rank: u64, highlighted: bool) {
    let _ = writeln!(
        out,
        "<li class=\"card{}\"><span class=\"rank\">#{}</span> \
         <code class=\"key\">{}</code> <span class=\"active\">Last active: {}</span></li>",
        if highlighted { " highlighted" } else { "" },
        rank,
        escape_html(public_key),
        escape_html(&format_date(last_active)),
    );
}

fn render_pagination(
    out: &mut String,
    page: u64,
    total_pages: u64,
    has_previous: bool,
    has_next: bool,
    window: &[PageToken],
) {
    let link = |out: &mut String, target: u64, label: &str| {
        let _ = write!(out, "<a href=\"?view=all&amp;page={}\">{}</a> ", target, label);
    };

    out.push_str("<nav class=\"pagination\">\n");
    link(out, 1, "&laquo;");
    if has_previous {
        link(out, page - 1, "&lsaquo;");
    }
    for token in window {
        match token {
            PageToken::Page(n) if *n == page => {
                let _ = write!(out, "<span class=\"current\">{}</span> ", n);
            }
            PageToken::Page(n) => link(out, *n, &n.to_string()),
            PageToken::Ellipsis => out.push_str("<span class=\"gap\">...</span> "),
        }
    }
    if has_next {
        link(out, page + 1, "&rsaquo;");
    }
    link(out, total_pages, "&raquo;");
    out.push_str("\n</nav>\n");
}

/// Date part of an ISO-8601 timestamp as `dd/mm/yyyy`; anything else is
/// shown as given
fn format_date(iso: &str) -> String {
    let date = iso.get(..10).unwrap_or(iso);
    let parts: Vec<&str> = date.split('-').collect();
    match parts.as_slice() {
        [y, m, d] if y.len() == 4 && m.len() == 2 && d.len() == 2 => format!("{}/{}/{}", d, m, y),
        _ => iso.to_string(),
    }
}

/// Escape text for HTML element content and attribute values
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use ranking_core::{build_listing, ListingRequest, NodeRanking, RankingDataset};

    fn dataset(n: usize) -> RankingDataset {
        RankingDataset::from_entries(
            (0..n)
                .map(|i| NodeRanking::new(format!("GNODE{:03}", i), "2025-06-26T00:00:00.000Z", None))
                .collect(),
        )
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<a href=\"x\">&'"), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2025-06-26T00:00:00.000Z"), "26/06/2025");
        assert_eq!(format_date(""), "");
    }

    #[test]
    fn test_search_input_is_escaped() {
        let req = ListingRequest::from_params(None, None, Some("<script>"));
        let html = render_page(&build_listing(&dataset(3), &req), &req.search);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("Node not found"));
    }

    #[test]
    fn test_paged_page_has_window() {
        let req = ListingRequest::from_params(Some("10"), Some("all"), None);
        let html = render_page(&build_listing(&dataset(1000), &req), "");
        assert!(html.contains("Page 10 / 50"));
        assert!(html.contains("<span class=\"current\">10</span>"));
        assert!(html.contains("page=12\">12</a>"));
        assert!(!html.contains("page=13\">13</a>"));
        assert!(html.contains("Showing 181 to 200 of 1000 nodes"));
        assert!(html.contains("#181"));
    }

    #[test]
    fn test_top_page_lists_ten() {
        let html = render_page(&build_listing(&dataset(30), &ListingRequest::default()), "");
        assert_eq!(html.matches("<li class=\"card\">").count(), 10);
        assert!(html.contains("26/06/2025"));
    }
}
