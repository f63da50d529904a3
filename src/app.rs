use crate::components::explorer::Explorer;
use crate::components::navbar::Navbar;
use crate::components::news_feed::NewsFeed;
use crate::error_template::{AppError, ErrorTemplate};
use leptos::prelude::*;
use leptos_meta::{provide_meta_context, MetaTags, Stylesheet, Title};
use leptos_router::components::{Route, Router, Routes};
use leptos_router::StaticSegment;

pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body class="bg-gray-50 dark:bg-teal-900">
                <App/>
            </body>
        </html>
    }
}

#[component]
pub fn App() -> impl IntoView {
    // Provides context that manages stylesheets, titles, meta tags, etc.
    provide_meta_context();

    view! {
        // injects a stylesheet into the document <head>
        // id=leptos means cargo-leptos will hot-reload this stylesheet
        <Stylesheet id="leptos" href="/pkg/hb.css"/>

        // sets the document title
        <Title text="healthbeat"/>

        <Router>
            <Navbar/>
            <main>
                <Routes fallback=|| {
                    let mut outside_errors = Errors::default();
                    outside_errors.insert_with_default_key(AppError::NotFound);
                    view! {
                        <ErrorTemplate outside_errors/>
                    }
                    .into_view()
                }>
                    <Route path=StaticSegment("") view=HomePage/>
                    <Route path=StaticSegment("explorer") view=ExplorerPage/>
                </Routes>
            </main>
        </Router>
    }
}

#[component]
fn HomePage() -> impl IntoView {
    view! {
        <div class="w-full max-w-5xl mx-auto px-4">
            <h1 class="text-3xl text-left text-teal-700 dark:text-teal-200 p-4 font-bold">
                "health news"
            </h1>
            <NewsFeed/>
        </div>
    }
}

#[component]
fn ExplorerPage() -> impl IntoView {
    view! {
        <div class="w-full max-w-6xl mx-auto px-4">
            <h1 class="text-3xl text-left text-teal-700 dark:text-teal-200 p-4 font-bold">
                "article explorer"
            </h1>
            <Explorer/>
        </div>
    }
}
