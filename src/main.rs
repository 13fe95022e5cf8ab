mod components;

use components::App;

fn main() {
    dd2_planner::util::init_console_logger(log::LevelFilter::Info);
    yew::Renderer::<App>::new().render();
}
