use super::{ImportPanel, RegistrySummary, SearchBar};
use dd2_planner::config::{FONT_OPTIONS, PlannerSettings};
use dd2_planner::registry::{RegistryAction, build_registry};
use dd2_planner::search::{SearchAction, SearchIndex, SearchItem};
use dd2_planner::seed::SeedData;
use dd2_planner::storage::{BrowserStore, load_snapshot_blob, save_snapshot};
use serde_json::Value;
use web_sys::HtmlSelectElement;
use yew::prelude::*;

fn describe(item: &SearchItem) -> String {
    let target = match &item.action {
        Some(SearchAction::Hero(id)) => format!(" / hero {id}"),
        Some(SearchAction::Build(id)) => format!(" / build {id}"),
        Some(SearchAction::Checklist(id)) => format!(" / checklist {id}"),
        Some(SearchAction::Map(id)) => format!(" / map {id}"),
        Some(SearchAction::Encyclopedia { tab, query }) => format!(" / {tab:?} \"{query}\""),
        None => String::new(),
    };
    format!("{}{}", item.page.as_str(), target)
}

#[function_component(App)]
pub fn app() -> Html {
    let seed = use_memo((), |_| SeedData::bundled());
    let registry = {
        let seed = seed.clone();
        use_reducer(move || {
            let blob = match BrowserStore::local() {
                Ok(store) => load_snapshot_blob(&store),
                Err(err) => {
                    log::warn!("{err}");
                    None
                }
            };
            build_registry(blob.as_deref(), &seed)
        })
    };
    let settings =
        use_state(|| BrowserStore::local().map(|s| PlannerSettings::load(&s)).unwrap_or_default());
    let selected = use_state(|| None::<SearchItem>);

    // Persist every new snapshot
    {
        let registry = registry.clone();
        use_effect_with(registry.version, move |_| {
            let saved = BrowserStore::local().and_then(|store| save_snapshot(&store, &registry));
            if let Err(err) = saved {
                log::warn!("snapshot not saved: {err}");
            }
            || ()
        });
    }

    let index = {
        let registry = registry.clone();
        let seed = seed.clone();
        use_memo(registry.version, move |_| SearchIndex::build(&registry, &seed.pets))
    };

    let on_import = {
        let registry = registry.clone();
        Callback::from(move |(filename, payload): (String, Value)| {
            registry.dispatch(RegistryAction::Import { payload, filename });
        })
    };
    let on_select = {
        let selected = selected.clone();
        Callback::from(move |item: SearchItem| selected.set(Some(item)))
    };
    let new_build = {
        let registry = registry.clone();
        let selected = selected.clone();
        Callback::from(move |_| {
            if let Some(SearchItem { action: Some(SearchAction::Hero(hero_id)), .. }) = &*selected {
                let now = js_sys::Date::now() as i64;
                registry.dispatch(RegistryAction::CreateBuild { hero_id: hero_id.clone(), now });
            }
        })
    };
    let font_cb = {
        let settings = settings.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            let next = PlannerSettings { font_choice: select.value() };
            match BrowserStore::local() {
                Ok(store) => next.save(&store),
                Err(err) => log::warn!("{err}"),
            }
            settings.set(next);
        })
    };

    let font = settings.font();
    html! {
        <div style={format!("font-family:{}; background:#0d1117; color:#c9d1d9; min-height:100vh; padding:16px; display:flex; flex-direction:column; gap:16px;", font.stack)}>
            <header style="display:flex; align-items:center; gap:16px;">
                <h1 style="margin:0; font-size:20px;">{"DD2 Planner"}</h1>
                <SearchBar index={index} on_select={on_select} />
            </header>
            if let Some(item) = &*selected {
                <div style="display:flex; gap:8px; align-items:center; font-size:13px;">
                    <span style="opacity:0.8;">{ format!("{} -> {}", item.label, describe(item)) }</span>
                    if matches!(item.action, Some(SearchAction::Hero(_))) {
                        <button onclick={new_build} style="padding:2px 8px;">{"New build"}</button>
                    }
                </div>
            }
            <div style="display:flex; gap:16px; flex-wrap:wrap; align-items:flex-start;">
                <RegistrySummary registry={registry.clone()} />
                <ImportPanel on_import={on_import} />
                <div style="background:#161b22; border:1px solid #30363d; border-radius:12px; padding:16px 20px; display:flex; flex-direction:column; gap:10px;">
                    <h3 style="margin:0; font-size:18px;">{"Typography"}</h3>
                    <select onchange={font_cb}>
                        { for FONT_OPTIONS.iter().map(|opt| html! {
                            <option value={opt.id} selected={opt.id == font.id}>{ opt.label }</option>
                        }) }
                    </select>
                    <div style="font-size:13px; opacity:0.8;">{"Preview: The quick brown fox jumps over the lazy dog. 0123456789"}</div>
                </div>
            </div>
        </div>
    }
}
