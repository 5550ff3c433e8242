use leptos::prelude::*;
use leptos_router::components::A;

/// 404 - Not Found
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<div class="garden-missing">
			<h1>"Nothing grows here"</h1>
			<p>
				<A href="/">"Back to the garden"</A>
			</p>
		</div>
	}
}
