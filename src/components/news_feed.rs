use cfg_if::cfg_if;
use leptos::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NewsArticle {
    pub title: String,
    pub category: String,
    pub content: String,
    #[serde(default)]
    pub date: Option<String>,
}

// Categories to filter
pub const CATEGORIES: [&str; 7] = [
    "All",
    "Digital Health",
    "Medical Technologies",
    "Pharmaceuticals",
    "Climate Change and Health",
    "AMR",
    "Others",
];

cfg_if! {
    if #[cfg(feature = "ssr")] {
        use thiserror::Error;

        const NEWS_FEED_PATH: &str = "public/assets/data/categorized_data.json";

        #[derive(Debug, Error)]
        enum NewsFeedError {
            #[error("read error: {0}")]
            Read(String),
            #[error("JSON parse error: {0}")]
            JsonParse(String),
        }

        fn to_server_error(e: NewsFeedError) -> ServerFnError {
            ServerFnError::ServerError(e.to_string())
        }
    }
}

#[server(GetNewsFeed, "/api")]
pub async fn get_news_feed() -> Result<Vec<NewsArticle>, ServerFnError> {
    use crate::server_fn::cache::{CACHE_DURATION, NEWS_CACHE};
    use log::{error, info};
    use std::time::Instant;

    {
        let cached = NEWS_CACHE.lock().unwrap().clone();
        if let (Some(articles), last_fetch) = cached {
            if last_fetch.elapsed() < CACHE_DURATION {
                info!("returning cached news feed");
                return Ok(articles);
            }
        }
    }

    info!("loading news feed from {}", NEWS_FEED_PATH);

    let body = tokio::fs::read_to_string(NEWS_FEED_PATH)
        .await
        .map_err(|e| {
            error!("error reading news feed: {}", e);
            NewsFeedError::Read(e.to_string())
        })
        .map_err(to_server_error)?;

    let articles: Vec<NewsArticle> = serde_json::from_str(&body)
        .map_err(|e| {
            error!("JSON parse error: {}", e);
            NewsFeedError::JsonParse(e.to_string())
        })
        .map_err(to_server_error)?;

    info!("successfully parsed {} news articles", articles.len());

    let mut cache = NEWS_CACHE.lock().unwrap();
    *cache = (Some(articles.clone()), Instant::now());

    Ok(articles)
}

/// Visible subset for a category pick. `"All"` disables the filter.
pub fn filter_by_category(articles: &[NewsArticle], category: &str) -> Vec<NewsArticle> {
    if category == "All" {
        return articles.to_vec();
    }
    articles
        .iter()
        .filter(|article| article.category == category)
        .cloned()
        .collect()
}

/// First 250 characters of the body, ellipsis always appended.
pub fn excerpt(content: &str) -> String {
    let mut out: String = content.chars().take(250).collect();
    out.push_str("...");
    out
}

#[component]
pub fn NewsFeed() -> impl IntoView {
    let articles = Resource::new(|| (), |_| get_news_feed());
    let (selected_category, set_selected_category) = signal("All".to_string());

    view! {
        <div class="pt-2 space-y-4">
            <div class="flex justify-start mb-2">
                <select
                    on:change=move |ev| set_selected_category.set(event_target_value(&ev))
                    prop:value=selected_category
                    class="w-64 p-2 rounded-md bg-gray-100 dark:bg-teal-800 text-gray-800 dark:text-gray-200
                           border border-teal-500 dark:border-teal-400
                           focus:outline-none focus:ring-2 focus:ring-teal-500 dark:focus:ring-teal-400"
                >
                    {CATEGORIES
                        .iter()
                        .map(|category| {
                            view! {
                                <option value=*category>{*category}</option>
                            }
                        })
                        .collect_view()
                    }
                </select>
            </div>

            <Suspense fallback=|| view! { <p class="text-center text-teal-600 dark:text-teal-300">"Loading..."</p> }>
                {move || {
                    articles.get().map(|articles_result| {
                        match articles_result {
                            Ok(articles) => {
                                let visible = filter_by_category(&articles, &selected_category.get());
                                if visible.is_empty() {
                                    view! {
                                        <p class="text-center text-gray-500 dark:text-gray-400">
                                            "No articles found for this category."
                                        </p>
                                    }
                                    .into_any()
                                } else {
                                    view! {
                                        <div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-3 gap-4">
                                            <For
                                                each=move || visible.clone()
                                                key=|article| article.title.clone()
                                                children=move |article| view! { <NewsCard article=article/> }
                                            />
                                        </div>
                                    }
                                    .into_any()
                                }
                            }
                            Err(e) => {
                                leptos::logging::error!("Error loading JSON: {}", e);
                                view! {
                                    <p class="text-center text-gray-500 dark:text-gray-400">
                                        "Failed to load news data."
                                    </p>
                                }
                                .into_any()
                            }
                        }
                    })
                }}
            </Suspense>
        </div>
    }
}

#[component]
pub fn NewsCard(article: NewsArticle) -> impl IntoView {
    view! {
        <div class="news-card flex flex-col h-full bg-white dark:bg-teal-800 border-2 border-gray-200 dark:border-teal-700 p-4 rounded-lg shadow-md">
            <h3 class="text-base lg:text-lg text-teal-700 dark:text-teal-200 font-semibold">
                {article.title.clone()}
            </h3>
            <p class="text-xs md:text-sm text-teal-600 dark:text-teal-300">
                "Category: " {article.category.clone()}
            </p>
            <p class="text-xs md:text-sm text-gray-500 dark:text-gray-400">
                "Date: " {article.date.clone().unwrap_or_else(|| "N/A".to_string())}
            </p>
            <p class="mt-2 text-sm text-gray-600 dark:text-gray-300">
                {excerpt(&article.content)}
            </p>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str, category: &str, content: &str, date: Option<&str>) -> NewsArticle {
        NewsArticle {
            title: title.to_string(),
            category: category.to_string(),
            content: content.to_string(),
            date: date.map(|d| d.to_string()),
        }
    }

    #[test]
    fn category_filter_matches_exactly() {
        let feed = vec![
            article("a", "AMR", "x", None),
            article("b", "Pharmaceuticals", "y", Some("2024-01-01")),
            article("c", "AMR", "z", None),
        ];
        let visible = filter_by_category(&feed, "AMR");
        assert_eq!(visible.len(), 2);
        assert!(visible.iter().all(|a| a.category == "AMR"));
    }

    #[test]
    fn all_sentinel_passes_everything_through() {
        let feed = vec![
            article("a", "AMR", "x", None),
            article("b", "Others", "y", None),
        ];
        assert_eq!(filter_by_category(&feed, "All"), feed);
    }

    #[test]
    fn unmatched_category_yields_empty_subset() {
        let feed = vec![article("A", "AMR", &"x".repeat(300), None)];
        assert!(filter_by_category(&feed, "Others").is_empty());
    }

    #[test]
    fn filter_preserves_feed_order_and_is_idempotent() {
        let feed = vec![
            article("first", "AMR", "x", None),
            article("second", "AMR", "y", None),
        ];
        let once = filter_by_category(&feed, "AMR");
        let twice = filter_by_category(&feed, "AMR");
        assert_eq!(once, twice);
        assert_eq!(once[0].title, "first");
        assert_eq!(once[1].title, "second");
    }

    #[test]
    fn excerpt_truncates_to_250_chars_with_ellipsis() {
        let content = "x".repeat(300);
        let out = excerpt(&content);
        assert_eq!(out.len(), 253);
        assert!(out.ends_with("..."));
        assert_eq!(&out[..250], "x".repeat(250));
    }

    #[test]
    fn excerpt_always_appends_ellipsis() {
        assert_eq!(excerpt("short"), "short...");
    }

    #[test]
    fn excerpt_counts_characters_not_bytes() {
        let content = "é".repeat(300);
        let out = excerpt(&content);
        assert_eq!(out.chars().count(), 253);
        assert!(out.ends_with("..."));
    }
}
