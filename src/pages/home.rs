use leptos::prelude::*;
use leptos_router::components::A;

use crate::components::note_graph::{NoteIndex, Stage};
use crate::{Garden, note_href};

/// Section order on the index page, most mature first.
const STAGES: [Stage; 4] = [Stage::Evergreen, Stage::Growing, Stage::Seedling, Stage::Unknown];

/// `(id, title)` of every note in `stage`, in index order.
fn notes_in_stage(index: &NoteIndex, stage: Stage) -> Vec<(String, String)> {
	index
		.iter()
		.filter(|(_, entry)| entry.stage == stage)
		.map(|(id, _)| (id.to_string(), index.title_of(id).to_string()))
		.collect()
}

/// Garden index page
#[component]
pub fn Home() -> impl IntoView {
	let garden = expect_context::<Garden>();
	Effect::new(move |_| garden.current_note.set(None));

	let sections = move || {
		garden.index.with(|index| {
			STAGES
				.iter()
				.filter_map(|&stage| {
					let notes = notes_in_stage(index, stage);
					(!notes.is_empty()).then_some((stage, notes))
				})
				.collect::<Vec<_>>()
		})
	};

	view! {
		<div class="garden-home">
			<header class="garden-header">
				<h1>"Digital Garden"</h1>
				<p class="subtitle">
					"Open the graph to wander the links. Drag nodes to reposition, "
					"scroll to zoom, double-click to reset."
				</p>
				<button class="open-graph" on:click=move |_| garden.graph_open.set(true)>
					"Graph"
				</button>
			</header>
			<Show
				when=move || !garden.index.with(NoteIndex::is_empty)
				fallback=|| view! { <p class="empty">"No notes have been planted yet."</p> }
			>
				{move || {
					sections()
						.into_iter()
						.map(|(stage, notes)| {
							view! {
								<section class=format!("stage stage-{}", stage.label())>
									<h2>{stage.label()}</h2>
									<ul>
										{notes
											.into_iter()
											.map(|(id, title)| {
												view! {
													<li>
														<A href=note_href(&id)>{title}</A>
													</li>
												}
											})
											.collect_view()}
									</ul>
								</section>
							}
						})
						.collect_view()
				}}
			</Show>
		</div>
	}
}
