use leptos::prelude::*;
use leptos_router::components::A;

#[component]
pub fn Navbar() -> impl IntoView {
    view! {
        <div class="flex justify-between items-center bg-gray-200 dark:bg-teal-800 px-6 py-4">
            <A href="/" attr:class="text-2xl text-teal-700 dark:text-teal-200 hover:text-teal-900 dark:hover:text-teal-100">"healthbeat"</A>
            <div class="items-end">
                <A href="/" attr:class="pr-4 text-teal-600 dark:text-teal-300 hover:text-teal-800 dark:hover:text-teal-100">"feed"</A>
                <A href="/explorer" attr:class="text-teal-600 dark:text-teal-300 hover:text-teal-800 dark:hover:text-teal-100">"explorer"</A>
            </div>
        </div>
    }
}
