use leptos::prelude::*;

/// 404 page
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<div class="graph-overlay">
			<h1>"Not found"</h1>
			<p class="subtitle">
				"The viewer lives at " <a href="/">"/"</a> ", optionally with "
				<code>"?step=N"</code> "."
			</p>
		</div>
	}
}
