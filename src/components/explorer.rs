use cfg_if::cfg_if;
use chrono::{DateTime, NaiveDate};
use leptos::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::components::search::ArticleSearch;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Article {
    pub id: i32,
    pub title: String,
    pub category: String,
    #[serde(default)]
    pub summary: Option<String>,
    pub content: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

cfg_if! {
    if #[cfg(feature = "ssr")] {
        use thiserror::Error;

        const ARTICLES_PATH: &str = "public/data/articles.json";

        #[derive(Debug, Error)]
        enum ArticleFeedError {
            #[error("read error: {0}")]
            Read(String),
            #[error("JSON parse error: {0}")]
            JsonParse(String),
        }

        fn to_server_error(e: ArticleFeedError) -> ServerFnError {
            ServerFnError::ServerError(e.to_string())
        }
    }
}

#[server(GetArticles, "/api")]
pub async fn get_articles() -> Result<Vec<Article>, ServerFnError> {
    use crate::server_fn::cache::{ARTICLES_CACHE, CACHE_DURATION};
    use log::{error, info};
    use std::time::Instant;

    {
        let cached = ARTICLES_CACHE.lock().unwrap().clone();
        if let (Some(articles), last_fetch) = cached {
            if last_fetch.elapsed() < CACHE_DURATION {
                info!("returning cached articles");
                return Ok(articles);
            }
        }
    }

    info!("loading articles from {}", ARTICLES_PATH);

    let body = tokio::fs::read_to_string(ARTICLES_PATH)
        .await
        .map_err(|e| {
            error!("error reading articles: {}", e);
            ArticleFeedError::Read(e.to_string())
        })
        .map_err(to_server_error)?;

    let articles: Vec<Article> = serde_json::from_str(&body)
        .map_err(|e| {
            error!("JSON parse error: {}", e);
            ArticleFeedError::JsonParse(e.to_string())
        })
        .map_err(to_server_error)?;

    info!("successfully parsed {} articles", articles.len());

    let mut cache = ARTICLES_CACHE.lock().unwrap();
    *cache = (Some(articles.clone()), Instant::now());

    Ok(articles)
}

/// Distinct categories observed in the feed, sorted. The `"All"` sentinel is
/// rendered separately, ahead of these.
pub fn feed_categories(articles: &[Article]) -> Vec<String> {
    let mut categories: Vec<String> = articles
        .iter()
        .map(|article| article.category.clone())
        .collect();
    categories.sort();
    categories.dedup();
    categories
}

/// Sort key for the date-descending order. The feed stamps dates as
/// `YYYY-MM-DD`; RFC 3339 stamps are accepted as a fallback.
pub fn parse_feed_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?;
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// Visible subset: category equality (behind the `"All"` sentinel) AND a
/// case-insensitive substring match of the query against title or content,
/// sorted newest first. Articles without a parseable date sort last; ties keep
/// feed order.
pub fn visible_articles(articles: &[Article], category: &str, query: &str) -> Vec<Article> {
    let query = query.to_lowercase();
    let mut visible: Vec<Article> = articles
        .iter()
        .filter(|article| category == "All" || article.category == category)
        .filter(|article| {
            query.is_empty()
                || article.title.to_lowercase().contains(&query)
                || article.content.to_lowercase().contains(&query)
        })
        .cloned()
        .collect();
    visible.sort_by(|a, b| {
        let a_date = parse_feed_date(a.date.as_deref());
        let b_date = parse_feed_date(b.date.as_deref());
        match (a_date, b_date) {
            (Some(a_date), Some(b_date)) => b_date.cmp(&a_date),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
    visible
}

/// A selection survives a re-render only while its article is still visible.
pub fn retain_selection(selected: Option<i32>, visible: &[Article]) -> Option<i32> {
    selected.filter(|id| visible.iter().any(|article| article.id == *id))
}

cfg_if! {
    if #[cfg(feature = "hydrate")] {
        fn current_client_date() -> String {
            String::from(
                js_sys::Date::new_0().to_locale_string("en-US", &wasm_bindgen::JsValue::UNDEFINED),
            )
        }
    }
}

#[component]
pub fn Explorer() -> impl IntoView {
    let articles = Resource::new(|| (), |_| get_articles());

    let (search_input, set_search_input) = signal(String::new());
    let (selected_category, set_selected_category) = signal("All".to_string());
    let (selected_id, set_selected_id) = signal(None::<i32>);
    let (last_updated, set_last_updated) = signal(None::<String>);
    let (update_notice, set_update_notice) = signal(None::<String>);

    let visible = Memo::new(move |_| {
        articles
            .get()
            .and_then(|result| result.ok())
            .map(|articles| {
                visible_articles(&articles, &selected_category.get(), &search_input.get())
            })
            .unwrap_or_default()
    });

    let categories = Memo::new(move |_| {
        articles
            .get()
            .and_then(|result| result.ok())
            .map(|articles| feed_categories(&articles))
            .unwrap_or_default()
    });

    let total = Memo::new(move |_| {
        articles
            .get()
            .and_then(|result| result.ok())
            .map(|articles| articles.len())
            .unwrap_or(0)
    });

    // Detail stays resolvable against the full feed, not the filtered subset.
    let selected_article = Memo::new(move |_| {
        selected_id.get().and_then(|id| {
            articles
                .get()
                .and_then(|result| result.ok())
                .and_then(|articles| articles.iter().find(|article| article.id == id).cloned())
        })
    });

    // Drop the selection once filtering removes the selected article.
    Effect::new(move |_| {
        let retained = retain_selection(selected_id.get_untracked(), &visible.get());
        if retained != selected_id.get_untracked() {
            set_selected_id.set(retained);
        }
    });

    cfg_if! {
        if #[cfg(feature = "hydrate")] {
            // Stamps the browser's clock, not data provenance.
            Effect::new(move |_| {
                if let Some(Ok(articles)) = articles.get() {
                    if !articles.is_empty() && last_updated.get_untracked().is_none() {
                        set_last_updated.set(Some(current_client_date()));
                    }
                }
            });
        }
    }

    let on_search = Callback::new(move |query: String| set_search_input.set(query));

    view! {
        <div class="pt-2 space-y-4">
            <div class="flex flex-wrap items-center gap-4">
                <ArticleSearch on_search=on_search/>

                <select
                    on:change=move |ev| set_selected_category.set(event_target_value(&ev))
                    prop:value=selected_category
                    class="w-52 p-2 rounded-md bg-gray-100 dark:bg-teal-800 text-gray-800 dark:text-gray-200
                           border border-teal-500 dark:border-teal-400
                           focus:outline-none focus:ring-2 focus:ring-teal-500 dark:focus:ring-teal-400"
                >
                    <option value="All">"All"</option>
                    {move || {
                        categories
                            .get()
                            .into_iter()
                            .map(|category| {
                                view! {
                                    <option value=category.clone()>{category.clone()}</option>
                                }
                            })
                            .collect_view()
                    }}
                </select>

                <button
                    on:click=move |_| {
                        set_update_notice.set(Some(
                            "Update requested. The feed refreshes on the publisher's schedule.".to_string(),
                        ))
                    }
                    class="px-3 py-2 text-sm rounded-md bg-teal-600 dark:bg-teal-500 text-white
                           hover:bg-teal-700 dark:hover:bg-teal-600
                           focus:outline-none focus:ring-2 focus:ring-teal-500 dark:focus:ring-teal-400"
                >
                    "Update feed"
                </button>
            </div>

            <div class="flex flex-wrap items-center gap-4 text-sm text-gray-600 dark:text-gray-300">
                <p>
                    "Showing " {move || visible.get().len()} " of " {move || total.get()} " articles"
                </p>
                {move || {
                    last_updated
                        .get()
                        .map(|stamp| view! { <p>"Last updated: " {stamp}</p> })
                }}
                {move || {
                    update_notice
                        .get()
                        .map(|notice| {
                            view! { <p class="text-amber-600 dark:text-amber-400">{notice}</p> }
                        })
                }}
            </div>

            <div class="grid grid-cols-1 lg:grid-cols-2 gap-6">
                <Suspense fallback=|| view! { <p class="text-center text-teal-600 dark:text-teal-300">"Loading..."</p> }>
                    {move || {
                        articles.get().map(|articles_result| {
                            match articles_result {
                                Ok(_) => {
                                    if visible.get().is_empty() {
                                        view! {
                                            <p class="text-center text-gray-500 dark:text-gray-400">
                                                "No articles found matching your criteria."
                                            </p>
                                        }
                                        .into_any()
                                    } else {
                                        view! {
                                            <div class="space-y-3">
                                                <For
                                                    each=move || visible.get()
                                                    key=|article| article.id
                                                    children=move |article| {
                                                        view! {
                                                            <ArticleCard
                                                                article=article
                                                                search_term=search_input.get()
                                                                selected_id=selected_id
                                                                set_selected_id=set_selected_id
                                                            />
                                                        }
                                                    }
                                                />
                                            </div>
                                        }
                                        .into_any()
                                    }
                                }
                                Err(e) => {
                                    leptos::logging::error!("Error loading articles: {}", e);
                                    view! {
                                        <p class="text-center text-gray-500 dark:text-gray-400">
                                            "Failed to load articles."
                                        </p>
                                    }
                                    .into_any()
                                }
                            }
                        })
                    }}
                </Suspense>

                <div class="lg:sticky lg:top-4 self-start w-full">
                    {move || {
                        match selected_article.get() {
                            Some(article) => view! { <ArticleDetail article=article/> }.into_any(),
                            None => {
                                view! {
                                    <div class="h-full flex items-center justify-center bg-white dark:bg-teal-800 border-2 border-dashed border-gray-300 dark:border-teal-700 rounded-lg p-8">
                                        <p class="text-gray-500 dark:text-gray-400">
                                            "Select an article to read the full story."
                                        </p>
                                    </div>
                                }
                                .into_any()
                            }
                        }
                    }}
                </div>
            </div>
        </div>
    }
}

#[component]
pub fn ArticleCard(
    article: Article,
    #[prop(into, optional)] search_term: String,
    selected_id: ReadSignal<Option<i32>>,
    set_selected_id: WriteSignal<Option<i32>>,
) -> impl IntoView {
    let id = article.id;

    let card_class = move || {
        if selected_id.get() == Some(id) {
            "article-card cursor-pointer w-full bg-white dark:bg-teal-800 border-2 border-teal-500 dark:border-teal-400 ring-2 ring-teal-500 dark:ring-teal-400 p-4 rounded-lg shadow-lg"
        } else {
            "article-card cursor-pointer w-full bg-white dark:bg-teal-800 border-2 border-gray-200 dark:border-teal-700 hover:border-teal-500 dark:hover:border-teal-400 p-4 rounded-lg shadow-md hover:shadow-lg transition-all"
        }
    };

    view! {
        <article class=card_class on:click=move |_| set_selected_id.set(Some(id))>
            <div class="flex items-center justify-between pb-1">
                <span class="text-xs font-semibold uppercase tracking-wide text-teal-600 dark:text-teal-300">
                    {article.category.clone()}
                </span>
                <span class="text-xs text-gray-500 dark:text-gray-400">
                    {article.date.clone().unwrap_or_else(|| "N/A".to_string())}
                </span>
            </div>
            <h2 class="text-base lg:text-lg font-medium">
                <HighlightedText
                    text=article.title.clone()
                    search_term=search_term.clone()
                    class="text-teal-700 dark:text-teal-200"
                />
            </h2>
            <div class="mt-1 w-full">
                {article
                    .summary
                    .clone()
                    .map(|summary| {
                        view! {
                            <HighlightedText
                                text=summary
                                search_term=search_term.clone()
                                class="text-sm text-gray-600 dark:text-gray-300 line-clamp-3"
                            />
                        }
                    })}
            </div>
        </article>
    }
}

#[component]
pub fn ArticleDetail(article: Article) -> impl IntoView {
    view! {
        <div class="bg-white dark:bg-teal-800 border-2 border-gray-200 dark:border-teal-700 rounded-lg shadow-md p-6">
            <div class="flex items-center justify-between pb-2">
                <span class="text-xs font-semibold uppercase tracking-wide text-teal-600 dark:text-teal-300">
                    {article.category.clone()}
                </span>
                <span class="text-xs text-gray-500 dark:text-gray-400">
                    {article.date.clone().unwrap_or_else(|| "N/A".to_string())}
                </span>
            </div>
            <h2 class="text-xl font-bold text-teal-700 dark:text-teal-200">
                {article.title.clone()}
            </h2>
            <p class="mt-3 whitespace-pre-line text-sm text-gray-700 dark:text-gray-200">
                {article.content.clone()}
            </p>
            {article
                .url
                .clone()
                .map(|url| {
                    view! {
                        <a
                            href=url
                            target="_blank"
                            rel="noopener noreferrer"
                            class="inline-block mt-4 text-sm text-teal-600 dark:text-teal-300 hover:text-teal-800 dark:hover:text-teal-100 underline"
                        >
                            "Read original"
                        </a>
                    }
                })}
        </div>
    }
}

// Helper function to get highlighted segments
fn highlight_segments(text: &str, search_term: &str) -> Vec<(String, bool)> {
    if search_term.is_empty() {
        return vec![(text.to_string(), false)];
    }

    let search_term = search_term.to_lowercase();
    let mut result = Vec::new();
    let mut last_index = 0;
    let text_lower = text.to_lowercase();

    while let Some(start_idx) = text_lower[last_index..].find(&search_term) {
        let absolute_start = last_index + start_idx;
        let absolute_end = absolute_start + search_term.len();

        // Add non-matching segment if there is one
        if absolute_start > last_index {
            result.push((text[last_index..absolute_start].to_string(), false));
        }

        // Add matching segment (using original case from text)
        result.push((text[absolute_start..absolute_end].to_string(), true));

        last_index = absolute_end;
    }

    // Add remaining text if any
    if last_index < text.len() {
        result.push((text[last_index..].to_string(), false));
    }

    result
}

#[component]
fn HighlightedText(
    #[prop(into)] text: String,
    #[prop(into)] search_term: String,
    #[prop(optional)] class: &'static str,
) -> impl IntoView {
    let segments = highlight_segments(&text, &search_term);

    view! {
        <span class=class>
            {segments
                .into_iter()
                .map(|(text, is_highlight)| {
                    if is_highlight {
                        view! {
                            <mark class="bg-teal-100 dark:bg-teal-600 text-teal-900 dark:text-teal-100 rounded px-0.5">
                                {text}
                            </mark>
                        }
                        .into_any()
                    } else {
                        view! { <span>{text}</span> }.into_any()
                    }
                })
                .collect_view()}
        </span>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(id: i32, title: &str, category: &str, content: &str, date: Option<&str>) -> Article {
        Article {
            id,
            title: title.to_string(),
            category: category.to_string(),
            summary: None,
            content: content.to_string(),
            date: date.map(|d| d.to_string()),
            url: None,
        }
    }

    #[test]
    fn category_filter_matches_exactly() {
        let feed = vec![
            article(1, "a", "Pharmaceuticals", "x", Some("2024-01-01")),
            article(2, "b", "Digital Health", "y", Some("2024-01-02")),
        ];
        let visible = visible_articles(&feed, "Digital Health", "");
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, 2);
    }

    #[test]
    fn all_sentinel_passes_everything_through() {
        let feed = vec![
            article(1, "a", "Pharmaceuticals", "x", None),
            article(2, "b", "Digital Health", "y", None),
        ];
        assert_eq!(visible_articles(&feed, "All", "").len(), 2);
    }

    #[test]
    fn search_matches_title_or_content_case_insensitively() {
        let feed = vec![
            article(1, "Vaccine rollout", "Pharmaceuticals", "doses shipped", None),
            article(2, "Telemedicine", "Digital Health", "VACCINE hesitancy studied", None),
            article(3, "Hospital funding", "Others", "new wards", None),
        ];
        let visible = visible_articles(&feed, "All", "vaccine");
        let ids: Vec<i32> = visible.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn empty_query_disables_the_text_filter() {
        let feed = vec![article(1, "a", "Others", "x", None)];
        assert_eq!(visible_articles(&feed, "All", "").len(), 1);
    }

    #[test]
    fn filters_combine_conjunctively() {
        let feed = vec![
            article(1, "Vaccine rollout", "Pharmaceuticals", "doses", None),
            article(2, "Vaccine app", "Digital Health", "tracking", None),
        ];
        let visible = visible_articles(&feed, "Digital Health", "vaccine");
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, 2);
    }

    #[test]
    fn newest_articles_sort_first() {
        let feed = vec![
            article(1, "older", "Others", "x", Some("2024-01-01")),
            article(2, "newer", "Others", "y", Some("2024-06-01")),
        ];
        let visible = visible_articles(&feed, "All", "");
        assert_eq!(visible[0].id, 2);
        assert_eq!(visible[1].id, 1);
    }

    #[test]
    fn unparseable_dates_sort_last() {
        let feed = vec![
            article(1, "bad", "Others", "x", Some("sometime in spring")),
            article(2, "missing", "Others", "y", None),
            article(3, "dated", "Others", "z", Some("2023-03-05")),
        ];
        let visible = visible_articles(&feed, "All", "");
        assert_eq!(visible[0].id, 3);
        // undated articles keep feed order among themselves
        assert_eq!(visible[1].id, 1);
        assert_eq!(visible[2].id, 2);
    }

    #[test]
    fn rfc3339_dates_are_accepted() {
        assert_eq!(
            parse_feed_date(Some("2024-06-01T12:30:00+05:30")),
            NaiveDate::from_ymd_opt(2024, 6, 1)
        );
        assert_eq!(
            parse_feed_date(Some("2024-06-01")),
            NaiveDate::from_ymd_opt(2024, 6, 1)
        );
        assert_eq!(parse_feed_date(Some("not a date")), None);
        assert_eq!(parse_feed_date(None), None);
    }

    #[test]
    fn recompute_is_idempotent() {
        let feed = vec![
            article(1, "a", "Others", "alpha", Some("2024-01-01")),
            article(2, "b", "Others", "beta", Some("2024-06-01")),
        ];
        let once = visible_articles(&feed, "Others", "a");
        let twice = visible_articles(&feed, "Others", "a");
        assert_eq!(once, twice);
    }

    #[test]
    fn selection_survives_while_article_stays_visible() {
        let feed = vec![
            article(1, "a", "Others", "x", None),
            article(2, "b", "Others", "y", None),
        ];
        let visible = visible_articles(&feed, "Others", "");
        assert_eq!(retain_selection(Some(2), &visible), Some(2));
    }

    #[test]
    fn selection_clears_when_filtering_removes_the_article() {
        let feed = vec![
            article(1, "Vaccine rollout", "Pharmaceuticals", "doses", Some("2024-01-01")),
            article(2, "Telemedicine", "Digital Health", "remote care", Some("2024-06-01")),
        ];
        let visible = visible_articles(&feed, "All", "zzz");
        assert!(visible.is_empty());
        assert_eq!(retain_selection(Some(1), &visible), None);
        assert_eq!(retain_selection(None, &visible), None);
    }

    #[test]
    fn feed_categories_are_sorted_and_deduped() {
        let feed = vec![
            article(1, "a", "Others", "x", None),
            article(2, "b", "Digital Health", "y", None),
            article(3, "c", "Others", "z", None),
        ];
        assert_eq!(
            feed_categories(&feed),
            vec!["Digital Health".to_string(), "Others".to_string()]
        );
    }

    #[test]
    fn highlight_marks_matching_segments_preserving_case() {
        let segments = highlight_segments("Vaccine for vaccines", "vaccine");
        assert_eq!(
            segments,
            vec![
                ("Vaccine".to_string(), true),
                (" for ".to_string(), false),
                ("vaccine".to_string(), true),
                ("s".to_string(), false),
            ]
        );
    }

    #[test]
    fn highlight_with_empty_term_returns_whole_text() {
        assert_eq!(
            highlight_segments("plain text", ""),
            vec![("plain text".to_string(), false)]
        );
    }
}
