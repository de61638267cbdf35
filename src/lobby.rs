/*
 * Lobby Module
 *
 * Local placeholder for a multiplayer lobby. It keeps the room code, the
 * player list and everyone's ready state, but talks to no server: joining
 * only ever sees the players this process added itself.
 */

use nannou::color::{rgb, Rgb};
use rand::Rng;
use tracing::info;

// Easy to read aloud: no I, O, 0 or 1
pub const ROOM_CODE_CHARS: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
pub const ROOM_CODE_LEN: usize = 6;

// Colours handed out in join order
const DEFAULT_COLORS: [(u8, u8, u8); 6] = [
    (0xFF, 0x00, 0x00),
    (0x00, 0x00, 0xFF),
    (0x00, 0xFF, 0x00),
    (0xFF, 0x8C, 0x00),
    (0x8B, 0x00, 0xFF),
    (0x00, 0xFF, 0xFF),
];

pub fn default_color(index: usize) -> Rgb<u8> {
    let (r, g, b) = DEFAULT_COLORS[index % DEFAULT_COLORS.len()];
    rgb(r, g, b)
}

pub fn generate_room_code<R: Rng>(rng: &mut R) -> String {
    (0..ROOM_CODE_LEN)
        .map(|_| ROOM_CODE_CHARS[rng.gen_range(0..ROOM_CODE_CHARS.len())] as char)
        .collect()
}

// Normalise typed input: upper case, letters and digits only, at most six
pub fn sanitize_room_code(input: &str) -> String {
    input
        .chars()
        .map(|c| c.to_ascii_uppercase())
        .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        .take(ROOM_CODE_LEN)
        .collect()
}

pub fn can_join(code: &str, name: &str) -> bool {
    code.len() == ROOM_CODE_LEN && !name.trim().is_empty()
}

#[derive(Clone, Debug, PartialEq)]
pub struct LobbyPlayer {
    pub id: u32,
    pub name: String,
    pub color: Rgb<u8>,
    pub is_ready: bool,
    pub is_host: bool,
}

#[derive(Clone, Debug)]
pub struct Lobby {
    pub room_code: Option<String>,
    pub players: Vec<LobbyPlayer>,
    pub is_host: bool,
    pub my_player_id: Option<u32>,
    pub grid_size: usize,
    pub is_ready: bool,
    next_id: u32,
}

impl Default for Lobby {
    fn default() -> Self {
        Self {
            room_code: None,
            players: Vec::new(),
            is_host: false,
            my_player_id: None,
            grid_size: 5,
            is_ready: false,
            next_id: 1,
        }
    }
}

impl Lobby {
    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn my_player(&self) -> Option<&LobbyPlayer> {
        let id = self.my_player_id?;
        self.players.iter().find(|player| player.id == id)
    }

    fn me(&mut self) -> Option<&mut LobbyPlayer> {
        let id = self.my_player_id?;
        self.players.iter_mut().find(|player| player.id == id)
    }

    /// Opens a fresh room hosted by this player and returns its code.
    pub fn create_room<R: Rng>(&mut self, name: &str, rng: &mut R) -> String {
        let code = generate_room_code(rng);
        let id = self.allocate_id();

        self.room_code = Some(code.clone());
        self.is_host = true;
        self.is_ready = false;
        self.my_player_id = Some(id);
        self.players = vec![LobbyPlayer {
            id,
            name: if name.trim().is_empty() { "Host".to_string() } else { name.to_string() },
            color: default_color(0),
            is_ready: false,
            is_host: true,
        }];

        info!("Created room {}", code);
        code
    }

    pub fn join_room(&mut self, code: &str, name: &str) -> bool {
        let index = self.players.len();
        let id = self.allocate_id();

        self.room_code = Some(code.to_uppercase());
        self.is_host = false;
        self.is_ready = false;
        self.my_player_id = Some(id);
        self.players.push(LobbyPlayer {
            id,
            name: if name.trim().is_empty() { format!("Player {}", index + 1) } else { name.to_string() },
            color: default_color(index),
            is_ready: false,
            is_host: false,
        });
        true
    }

    pub fn leave_room(&mut self) {
        self.room_code = None;
        self.players.clear();
        self.is_host = false;
        self.my_player_id = None;
        self.is_ready = false;
    }

    pub fn toggle_ready(&mut self) -> bool {
        self.is_ready = !self.is_ready;
        let ready = self.is_ready;
        if let Some(me) = self.me() {
            me.is_ready = ready;
        }
        ready
    }

    pub fn update_my_color(&mut self, color: Rgb<u8>) {
        if let Some(me) = self.me() {
            me.color = color;
        }
    }

    pub fn update_my_name(&mut self, name: &str) {
        let name = if name.trim().is_empty() { "Player" } else { name.trim() };
        if let Some(me) = self.me() {
            me.name = name.to_string();
        }
    }

    // Only the host picks the board
    pub fn set_grid_size(&mut self, size: usize) -> bool {
        if self.is_host {
            self.grid_size = size;
        }
        self.is_host
    }

    pub fn can_start_game(&self) -> bool {
        self.players.len() >= 2 && self.players.iter().all(|player| player.is_ready) && self.is_host
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_room_codes_use_readable_alphabet() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..100 {
            let code = generate_room_code(&mut rng);
            assert_eq!(code.len(), ROOM_CODE_LEN);
            assert!(code.bytes().all(|c| ROOM_CODE_CHARS.contains(&c)));
        }
    }

    #[test]
    fn test_sanitize_room_code() {
        assert_eq!(sanitize_room_code("ab-c1 2z9q"), "ABC12Z");
        assert_eq!(sanitize_room_code("xy"), "XY");
        assert!(can_join("ABC123", "Sam"));
        assert!(!can_join("ABC12", "Sam"));
        assert!(!can_join("ABC123", "   "));
    }

    #[test]
    fn test_create_room_makes_caller_host() {
        let mut lobby = Lobby::default();
        let code = lobby.create_room("", &mut StdRng::seed_from_u64(1));

        assert_eq!(lobby.room_code.as_deref(), Some(code.as_str()));
        assert!(lobby.is_host);
        assert_eq!(lobby.player_count(), 1);
        assert_eq!(lobby.players[0].name, "Host");
        assert_eq!(lobby.players[0].color, default_color(0));
        assert!(lobby.set_grid_size(7));
        assert_eq!(lobby.grid_size, 7);
    }

    #[test]
    fn test_join_appends_with_next_color() {
        let mut lobby = Lobby::default();
        lobby.create_room("Ana", &mut StdRng::seed_from_u64(1));
        lobby.join_room("abc234", "");

        assert_eq!(lobby.room_code.as_deref(), Some("ABC234"));
        assert!(!lobby.is_host);
        assert_eq!(lobby.players[1].name, "Player 2");
        assert_eq!(lobby.players[1].color, default_color(1));
        assert!(!lobby.set_grid_size(9));
        assert_eq!(lobby.grid_size, 5);
    }

    #[test]
    fn test_ready_and_start_rules() {
        let mut lobby = Lobby::default();
        lobby.create_room("Ana", &mut StdRng::seed_from_u64(1));
        assert!(lobby.toggle_ready());
        // Alone in the room
        assert!(!lobby.can_start_game());

        lobby.players.push(LobbyPlayer {
            id: 99,
            name: "Ben".to_string(),
            color: default_color(1),
            is_ready: false,
            is_host: false,
        });
        assert!(!lobby.can_start_game());
        lobby.players[1].is_ready = true;
        assert!(lobby.can_start_game());

        assert!(!lobby.toggle_ready());
        assert!(!lobby.players[0].is_ready);
        assert!(!lobby.can_start_game());
    }

    #[test]
    fn test_updates_only_touch_my_player() {
        let mut lobby = Lobby::default();
        lobby.create_room("Ana", &mut StdRng::seed_from_u64(1));
        lobby.join_room("ABC234", "Ben");

        assert_eq!(lobby.my_player().map(|p| p.name.as_str()), Some("Ben"));
        lobby.update_my_name("  ");
        lobby.update_my_color(default_color(4));
        assert_eq!(lobby.players[0].name, "Ana");
        assert_eq!(lobby.players[1].name, "Player");
        assert_eq!(lobby.players[1].color, default_color(4));

        lobby.leave_room();
        assert_eq!(lobby.player_count(), 0);
        assert!(lobby.room_code.is_none());
    }
}
