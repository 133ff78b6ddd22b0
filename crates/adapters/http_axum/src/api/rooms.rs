//! Room listing derived from registered device identifiers.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use domo_app::registry::ROOM_ALL;

use crate::state::AppState;

/// One selectable room.
#[derive(Debug, Serialize)]
pub struct Room {
    /// Filter value for `GET /api/devices?room=`.
    pub id: String,
    /// Display name.
    pub name: String,
}

/// Response envelope for the room listing.
#[derive(Debug, Serialize)]
pub struct RoomList {
    /// The `all` sentinel followed by every room with at least one device.
    pub rooms: Vec<Room>,
}

/// `GET /api/rooms`
pub async fn list(State(state): State<AppState>) -> Json<RoomList> {
    let mut rooms = vec![Room {
        id: ROOM_ALL.to_string(),
        name: "All Rooms".to_string(),
    }];
    rooms.extend(state.registry.rooms().into_iter().map(|id| {
        let name = display_name(&id);
        Room { id, name }
    }));
    Json(RoomList { rooms })
}

/// `living-room` → `Living Room`.
fn display_name(room: &str) -> String {
    room.split('-')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<String>>()
        .join(" ")
}
