use crate::components::explorer::Article;
use crate::components::news_feed::NewsArticle;
use once_cell::sync::Lazy;
use std::sync::Mutex;
use std::time::{Duration, Instant};

pub static NEWS_CACHE: Lazy<Mutex<(Option<Vec<NewsArticle>>, Instant)>> =
    Lazy::new(|| Mutex::new((None, Instant::now())));
pub static ARTICLES_CACHE: Lazy<Mutex<(Option<Vec<Article>>, Instant)>> =
    Lazy::new(|| Mutex::new((None, Instant::now())));
pub const CACHE_DURATION: Duration = Duration::from_secs(3600);
