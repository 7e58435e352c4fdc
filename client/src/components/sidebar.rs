//! Dashboard sidebar with geographic filter selections.

use leptos::prelude::*;

use crate::state::geography::{GeoKind, GeoSelection, GeoSelections};

fn kind_from_value(value: &str) -> GeoKind {
    GeoKind::ALL
        .into_iter()
        .find(|kind| kind.to_string() == value)
        .unwrap_or(GeoKind::Country)
}

#[component]
pub fn Sidebar(selections: RwSignal<GeoSelections>) -> impl IntoView {
    let kind = RwSignal::new(GeoKind::Country);
    let entity_id = RwSignal::new(String::new());
    let name = RwSignal::new(String::new());

    let on_add = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let id = entity_id.get_untracked().trim().to_owned();
        let label = name.get_untracked().trim().to_owned();
        if id.is_empty() {
            return;
        }
        let label = if label.is_empty() { id.clone() } else { label };
        selections.update(|s| {
            s.add(GeoSelection::new(kind.get_untracked(), id, label));
        });
        entity_id.set(String::new());
        name.set(String::new());
    };

    let rows = move || {
        selections
            .get()
            .entities()
            .iter()
            .map(|entity| {
                let (kind, id) = (entity.kind, entity.id.clone());
                view! {
                    <li class="sidebar__selection">
                        <span class="sidebar__kind">{kind.label()}</span>
                        <span class="sidebar__name">{entity.name.clone()}</span>
                        <button
                            class="sidebar__remove"
                            type="button"
                            aria-label="Retirer"
                            on:click=move |_| selections.update(|s| s.remove(kind, &id))
                        >
                            "×"
                        </button>
                    </li>
                }
            })
            .collect_view()
    };

    view! {
        <aside class="sidebar">
            <h2 class="sidebar__title">"Zones géographiques"</h2>
            <form class="sidebar__form" on:submit=on_add>
                <select
                    class="sidebar__select"
                    on:change=move |ev| kind.set(kind_from_value(&event_target_value(&ev)))
                >
                    {GeoKind::ALL
                        .into_iter()
                        .map(|k| view! { <option value=k.to_string()>{k.label()}</option> })
                        .collect_view()}
                </select>
                <input
                    class="sidebar__input"
                    type="text"
                    placeholder="Identifiant"
                    prop:value=move || entity_id.get()
                    on:input=move |ev| entity_id.set(event_target_value(&ev))
                />
                <input
                    class="sidebar__input"
                    type="text"
                    placeholder="Nom"
                    prop:value=move || name.get()
                    on:input=move |ev| name.set(event_target_value(&ev))
                />
                <button class="sidebar__add" type="submit">"Ajouter"</button>
            </form>
            <Show
                when=move || !selections.get().is_empty()
                fallback=|| view! { <p class="sidebar__empty">"Aucune zone sélectionnée."</p> }
            >
                <ul class="sidebar__list">{rows}</ul>
                <button class="sidebar__clear" type="button" on:click=move |_| selections.update(GeoSelections::clear)>
                    "Tout effacer"
                </button>
            </Show>
        </aside>
    }
}
