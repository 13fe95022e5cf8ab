use std::rc::Rc;

use dd2_planner::search::{SearchIndex, SearchItem};
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct SearchBarProps {
    pub index: Rc<SearchIndex>,
    pub on_select: Callback<SearchItem>,
}

#[function_component]
pub fn SearchBar(props: &SearchBarProps) -> Html {
    let query = use_state(String::new);
    let results = props.index.search(&query);

    let input_cb = {
        let query = query.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            query.set(input.value());
        })
    };
    let key_cb = {
        let query = query.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Escape" {
                query.set(String::new());
            }
        })
    };

    let dropdown = if results.is_empty() {
        if query.trim().is_empty() {
            html! {}
        } else {
            html! { <div style="padding:8px 12px; font-size:12px; opacity:0.6;">{"No matches"}</div> }
        }
    } else {
        html! {
            <div style="display:flex; flex-direction:column;">
                { for results.groups.iter().map(|group| html! {
                    <div style="border-bottom:1px solid #30363d;">
                        <div style="padding:6px 12px; font-size:11px; text-transform:uppercase; opacity:0.6;">{ group.category.label() }</div>
                        { for group.items.iter().map(|item| {
                            let pick = {
                                let item = item.clone();
                                let on_select = props.on_select.clone();
                                let query = query.clone();
                                Callback::from(move |_| {
                                    on_select.emit(item.clone());
                                    query.set(String::new());
                                })
                            };
                            html! {
                                <button onclick={pick} style="display:block; width:100%; text-align:left; padding:6px 12px; background:none; border:none; color:inherit; cursor:pointer;">
                                    <div style="font-size:14px;">{ item.label.clone() }</div>
                                    <div style="font-size:11px; opacity:0.6;">{ item.caption().to_string() }</div>
                                </button>
                            }
                        }) }
                    </div>
                }) }
            </div>
        }
    };

    html! {
        <div style="position:relative; max-width:420px; width:100%;">
            <input
                type="search"
                placeholder="Search tools, heroes, shards..."
                value={(*query).clone()}
                oninput={input_cb}
                onkeydown={key_cb}
                style="width:100%; padding:6px 10px; background:#0d1117; border:1px solid #30363d; border-radius:6px; color:inherit;"
            />
            <div style="position:absolute; top:38px; left:0; right:0; background:#161b22; border-radius:8px; max-height:420px; overflow-y:auto; z-index:40;">
                { dropdown }
            </div>
        </div>
    }
}
