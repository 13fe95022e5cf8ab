use dd2_planner::model::DataRegistry;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct RegistrySummaryProps {
    pub registry: UseReducerHandle<DataRegistry>,
}

#[function_component]
pub fn RegistrySummary(props: &RegistrySummaryProps) -> Html {
    let reg = &*props.registry;
    let row_style = "display:flex; align-items:center; gap:8px;"; // label | value
    let label_style = "flex:1; font-weight:500;";
    let value_style = "min-width:50px; text-align:right; font-variant-numeric:tabular-nums; font-weight:600;";
    let rows: [(&str, usize, &str); 9] = [
        ("Heroes", reg.heroes.len(), "#d4af37"),
        ("Maps", reg.maps.len(), "#d4af37"),
        ("Defenses", reg.defenses.len(), "#58a6ff"),
        ("Towers", reg.towers.len(), "#58a6ff"),
        ("Shards", reg.shards.len(), "#a371f7"),
        ("Mods", reg.mods.len(), "#a371f7"),
        ("Abilities", reg.abilities.len(), "#3fb950"),
        ("Links", reg.links.len(), "#3fb950"),
        ("Builds", reg.builds.len(), "#f85149"),
    ];
    html! {
        <div style="background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:10px 14px; min-width:230px; display:flex; flex-direction:column; gap:8px; font-size:14px;">
            { for rows.iter().map(|(label, count, color)| html! {
                <div style={row_style}>
                    <span style={format!("{} color:{};", label_style, color)}>{ *label }</span>
                    <span style={format!("{} color:{};", value_style, color)}>{ *count }</span>
                </div>
            }) }
            <div style="font-size:11px; opacity:0.6;">{ format!("snapshot v{}", reg.version) }</div>
        </div>
    }
}
