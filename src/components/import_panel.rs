use std::rc::Rc;

use dd2_planner::import::{ImportReport, inspect_file};
use serde_json::Value;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{File, FileReader, HtmlInputElement, ProgressEvent};
use yew::prelude::*;

/// Status lines, one per finished file, newest last.
#[derive(Clone, Debug, Default, PartialEq)]
struct StatusLog {
    lines: Vec<String>,
}

enum StatusAction {
    Start(u32),
    Push(String),
}

impl Reducible for StatusLog {
    type Action = StatusAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut new = (*self).clone();
        match action {
            StatusAction::Start(n) => new.lines = vec![format!("Reading {n} file(s)...")],
            StatusAction::Push(line) => new.lines.push(line),
        }
        Rc::new(new)
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct ImportPanelProps {
    /// `(filename, payload)` of every file that parsed and classified.
    pub on_import: Callback<(String, Value)>,
}

// Each file is read independently; whichever finishes first is merged first.
fn read_file(
    file: File,
    status: UseReducerHandle<StatusLog>,
    on_import: Callback<(String, Value)>,
) {
    let filename = file.name();
    let reader = match FileReader::new() {
        Ok(r) => r,
        Err(err) => {
            let report = ImportReport::read_failed(&filename, format!("{err:?}"));
            status.dispatch(StatusAction::Push(report.status()));
            return;
        }
    };

    let reader_ct = reader.clone();
    let status_ct = status.clone();
    let name_ct = filename.clone();
    let onload = Closure::wrap(Box::new(move |_e: ProgressEvent| {
        let text = reader_ct.result().ok().and_then(|v| v.as_string()).unwrap_or_default();
        let (report, payload) = inspect_file(&name_ct, &text);
        if let Some(payload) = payload {
            on_import.emit((name_ct.clone(), payload));
        }
        status_ct.dispatch(StatusAction::Push(report.status()));
    }) as Box<dyn FnMut(_)>);

    let reader_err = reader.clone();
    let status_err = status.clone();
    let name_err = filename.clone();
    let onerror = Closure::wrap(Box::new(move |_e: ProgressEvent| {
        let message =
            reader_err.error().map(|e| e.name()).unwrap_or_else(|| "read error".to_string());
        let report = ImportReport::read_failed(&name_err, message);
        status_err.dispatch(StatusAction::Push(report.status()));
    }) as Box<dyn FnMut(_)>);

    reader.set_onload(Some(onload.as_ref().unchecked_ref()));
    reader.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    if let Err(err) = reader.read_as_text(&file) {
        let report = ImportReport::read_failed(&filename, format!("{err:?}"));
        status.dispatch(StatusAction::Push(report.status()));
    }
    onload.forget();
    onerror.forget();
}

#[function_component]
pub fn ImportPanel(props: &ImportPanelProps) -> Html {
    let status = use_reducer(StatusLog::default);
    let input_ref = use_node_ref();

    let pick_cb = {
        let input_ref = input_ref.clone();
        Callback::from(move |_| {
            if let Some(input) = input_ref.cast::<HtmlInputElement>() {
                input.click();
            }
        })
    };
    let change_cb = {
        let status = status.clone();
        let on_import = props.on_import.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let Some(files) = input.files() else { return };
            status.dispatch(StatusAction::Start(files.length()));
            for i in 0..files.length() {
                if let Some(file) = files.get(i) {
                    read_file(file, status.clone(), on_import.clone());
                }
            }
            // allow re-selecting the same files
            input.set_value("");
        })
    };

    html! {
        <div style="background:#161b22; border:1px solid #30363d; border-radius:12px; padding:16px 20px; display:flex; flex-direction:column; gap:10px;">
            <h3 style="margin:0; font-size:18px;">{"Import Data"}</h3>
            <div style="font-size:13px; opacity:0.8;">{"Import .json files with towers, defenses, shards, mods, links or abilities."}</div>
            <div style="display:flex; gap:8px; align-items:center;">
                <button onclick={pick_cb} style="padding:4px 10px;">{"Select Files"}</button>
                <input ref={input_ref} type="file" multiple=true accept=".json" style="display:none;" onchange={change_cb} />
            </div>
            <ul style="margin:0; padding-left:18px; font-size:12px; opacity:0.8;">
                { for status.lines.iter().map(|line| html! { <li>{ line.clone() }</li> }) }
            </ul>
        </div>
    }
}
