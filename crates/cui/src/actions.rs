use crate::app::App;
use crate::input::InputAction;
use std::time::Instant;

pub fn dispatch(app: &mut App, action: InputAction) {
    match action {
        InputAction::None => {}
        InputAction::Quit => app.should_quit = true,
        InputAction::ToggleHelp => app.show_help = !app.show_help,
        InputAction::CloseHelp => app.show_help = false,
        InputAction::Like => app.like(Instant::now()),
        InputAction::Reset => app.reset(),
        InputAction::NextImage => app.cycle_image(),
    }
}
