use crate::game_loop::Game;
use bevy::prelude::*;
use controller::InputKey;
use leafwing_input_manager::{plugin::InputManagerSystem, prelude::*};

#[derive(Reflect, Actionlike, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputAction {
    Forward,
    Back,
    Left,
    Right,
    Sprint,
    Punch,
}

impl InputAction {
    const ALL: [InputAction; 6] = [
        InputAction::Forward,
        InputAction::Back,
        InputAction::Left,
        InputAction::Right,
        InputAction::Sprint,
        InputAction::Punch,
    ];

    fn key(self) -> InputKey {
        match self {
            InputAction::Forward => InputKey::Up,
            InputAction::Back => InputKey::Down,
            InputAction::Left => InputKey::Left,
            InputAction::Right => InputKey::Right,
            InputAction::Sprint => InputKey::Sprint,
            InputAction::Punch => InputKey::Punch,
        }
    }
}

pub(super) fn plugin(app: &mut App) {
    app.add_plugins(InputManagerPlugin::<InputAction>::default());

    app.register_type::<InputAction>();

    let mut input_map = InputMap::<InputAction>::default();
    input_map.insert(InputAction::Forward, KeyCode::ArrowUp);
    input_map.insert(InputAction::Back, KeyCode::ArrowDown);
    input_map.insert(InputAction::Left, KeyCode::ArrowLeft);
    input_map.insert(InputAction::Right, KeyCode::ArrowRight);
    // Either shift key sprints.
    input_map.insert(InputAction::Sprint, KeyCode::ShiftLeft);
    input_map.insert(InputAction::Sprint, KeyCode::ShiftRight);
    input_map.insert(InputAction::Punch, KeyCode::KeyP);
    app.insert_resource(input_map);
    app.insert_resource(ActionState::<InputAction>::default());

    app.add_systems(PreUpdate, record_key_edges.after(InputManagerSystem::Update));
}

/// Forwards press/release edges into the held-key record. Keys held before focus are not replayed.
fn record_key_edges(actions: Res<ActionState<InputAction>>, mut game: ResMut<Game>) {
    for action in InputAction::ALL {
        if actions.just_pressed(&action) {
            game.0.input.press(action.key());
        } else if actions.just_released(&action) {
            game.0.input.release(action.key());
        }
    }
}
