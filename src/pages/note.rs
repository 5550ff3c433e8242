use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_params_map;

use crate::components::note_graph::{NoteEntry, NoteIndex};
use crate::{Garden, note_href};

fn link_item(index: &NoteIndex, id: &str) -> AnyView {
	let title = index.title_of(id).to_string();
	if index.get(id).is_some() {
		view! {
			<li>
				<A href=note_href(id)>{title}</A>
			</li>
		}
		.into_any()
	} else {
		// Broken or private link: shown, not followed.
		view! { <li class="unresolved">{title}</li> }.into_any()
	}
}

fn note_card(index: &NoteIndex, entry: &NoteEntry, id: &str) -> AnyView {
	let title = index.title_of(id).to_string();
	let links = entry.links.iter().map(|link| link_item(index, link)).collect_view();
	let backlinks = entry.backlinks.iter().map(|link| link_item(index, link)).collect_view();
	let tags = entry
		.tags
		.iter()
		.map(|tag| view! { <span class="tag">{format!("#{tag}")}</span> })
		.collect_view();

	view! {
		<header>
			<h1>{title}</h1>
			<p class=format!("stage stage-{}", entry.stage.label())>{entry.stage.label()}</p>
			<p class="tags">{tags}</p>
		</header>
		<section class="links">
			<h2>"Links"</h2>
			<ul>{links}</ul>
		</section>
		<section class="backlinks">
			<h2>{format!("Linked from ({})", entry.backlinks.len())}</h2>
			<ul>{backlinks}</ul>
		</section>
	}
	.into_any()
}

/// A single note's metadata, reached from the index or the graph.
#[component]
pub fn NotePage() -> impl IntoView {
	let garden = expect_context::<Garden>();
	let params = use_params_map();
	let note_id = move || {
		params
			.with(|p| p.get("id").map(|id| id.to_string()))
			.unwrap_or_default()
			.trim_matches('/')
			.to_string()
	};
	Effect::new(move |_| garden.current_note.set(Some(note_id())));

	view! {
		<article class="garden-note">
			<nav>
				<A href="/">"← garden"</A>
				<button class="open-graph" on:click=move |_| garden.graph_open.set(true)>
					"Graph"
				</button>
			</nav>
			{move || {
				let id = note_id();
				garden
					.index
					.with(|index| match index.get(&id) {
						Some(entry) => note_card(index, entry, &id),
						None => {
							view! {
								<p class="missing">
									"This note hasn't sprouted yet: " <code>{id.clone()}</code>
								</p>
							}
								.into_any()
						}
					})
			}}
		</article>
	}
}
