use super::{report_remote_failure, AppContext};
use crate::output::{self, Output};
use crate::ui::Spinner;
use catalog_sources::{CatalogCategory, CatalogSource, DiscoverFilters};
use color_eyre::Result;
use serde_json::json;
use watchlist_core::{decorate, load_category, load_trending, truncate, SearchSession};
use watchlist_models::{CatalogItem, MediaType};

fn plural(media_type: MediaType) -> &'static str {
    match media_type {
        MediaType::Movie => "movies",
        MediaType::Show => "shows",
    }
}

fn title_case(category: CatalogCategory) -> &'static str {
    match category {
        CatalogCategory::Trending => "Trending",
        CatalogCategory::Popular => "Popular",
        CatalogCategory::TopRated => "Top rated",
        CatalogCategory::Upcoming => "Upcoming",
    }
}

pub async fn run_search(
    ctx: &AppContext,
    query: &str,
    media_type: Option<MediaType>,
    output: &Output,
) -> Result<()> {
    let catalog = match ctx.catalog() {
        Ok(catalog) => catalog,
        Err(e) => {
            report_remote_failure("Search", &e, output);
            return Ok(());
        }
    };
    let store = ctx.open_store();

    let mut session = SearchSession::from_options(&ctx.config.browse).with_media_type(media_type);
    let spinner = Spinner::start(format!("Searching for '{}'...", query), output.is_human());
    session.search(&catalog, query).await;
    spinner.finish();

    if let Some(e) = session.last_error() {
        report_remote_failure("Search", e, output);
        return Ok(());
    }
    if session.results().is_empty() {
        output.empty_state(format!("No results for '{}'", session.query().trim()));
        return Ok(());
    }

    let decorated = decorate(session.results(), &store);
    if output.is_human() {
        output::section_header(&format!("Results for '{}'", session.query().trim()), output);
        output.println(output::catalog_table(&decorated).to_string());
        output.println("Add one with: watchlist add <ID> --type <movie|tv>");
    } else {
        output.json(&json!({
            "query": session.query(),
            "results": output::decorated_json(&decorated, &ctx.images()),
        }));
    }
    Ok(())
}

pub async fn run_browse(
    ctx: &AppContext,
    category: CatalogCategory,
    media_type: Option<MediaType>,
    filters: DiscoverFilters,
    limit: Option<usize>,
    output: &Output,
) -> Result<()> {
    let catalog = match ctx.catalog() {
        Ok(catalog) => catalog,
        Err(e) => {
            report_remote_failure("Browse", &e, output);
            return Ok(());
        }
    };
    let store = ctx.open_store();
    let limit = limit.unwrap_or(ctx.config.browse.trending_limit);
    let media_types = match media_type {
        Some(media_type) => vec![media_type],
        None => vec![MediaType::Movie, MediaType::Show],
    };

    let spinner = Spinner::start("Loading catalog...", output.is_human());
    let lists: Vec<(String, Vec<CatalogItem>)> = if filters != DiscoverFilters::default() {
        let mut lists = Vec::new();
        for media_type in media_types {
            let items = match catalog.discover(media_type, &filters).await {
                Ok(items) => truncate(items, limit),
                Err(e) => {
                    report_remote_failure(&format!("Discover {}", plural(media_type)), &e, output);
                    Vec::new()
                }
            };
            lists.push((format!("Discover {}", plural(media_type)), items));
        }
        lists
    } else if category == CatalogCategory::Trending && media_type.is_none() {
        let trending = load_trending(&catalog, limit).await;
        vec![
            ("Trending movies".to_string(), trending.movies),
            ("Trending shows".to_string(), trending.shows),
        ]
    } else {
        let mut lists = Vec::new();
        for media_type in media_types {
            let items = load_category(&catalog, media_type, category, limit).await;
            lists.push((format!("{} {}", title_case(category), plural(media_type)), items));
        }
        lists
    };
    spinner.finish();

    if !output.is_human() {
        let images = ctx.images();
        let sections: Vec<serde_json::Value> = lists
            .iter()
            .map(|(title, items)| {
                let decorated = decorate(items, &store);
                json!({ "title": title, "items": output::decorated_json(&decorated, &images) })
            })
            .collect();
        output.json(&json!({ "category": category.as_str(), "lists": sections }));
        return Ok(());
    }

    for (title, items) in &lists {
        output::section_header(title, output);
        if items.is_empty() {
            output.empty_state("Nothing to show right now.");
            continue;
        }
        output.println(output::catalog_table(&decorate(items, &store)).to_string());
    }
    Ok(())
}

pub async fn run_genres(ctx: &AppContext, media_type: MediaType, output: &Output) -> Result<()> {
    let catalog = match ctx.catalog() {
        Ok(catalog) => catalog,
        Err(e) => {
            report_remote_failure("Genres", &e, output);
            return Ok(());
        }
    };

    let spinner = Spinner::start("Loading genres...", output.is_human());
    let result = catalog.genres(media_type).await;
    spinner.finish();

    let genres = match result {
        Ok(genres) => genres,
        Err(e) => {
            report_remote_failure("Genres", &e, output);
            return Ok(());
        }
    };

    if output.is_human() {
        output::section_header(&format!("Genres ({})", plural(media_type)), output);
        output.println(output::genres_table(&genres).to_string());
    } else {
        output.json(&json!({ "media_type": media_type, "genres": genres }));
    }
    Ok(())
}
