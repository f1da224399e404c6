//! Static board catalogue.
//!
//! Normal boards hold threads and may group a level of sub-boards; call rooms
//! are separate and only used for video calls.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Board {
    pub name: &'static str,
    pub topic: &'static str,
    pub sub_boards: &'static [Board],
}

impl Board {
    const fn leaf(name: &'static str, topic: &'static str) -> Self {
        Self {
            name,
            topic,
            sub_boards: &[],
        }
    }

    /// Heading shown above the board's threads.
    pub fn title(&self) -> String {
        format!("{} - {}", self.name, self.topic)
    }
}

pub const NORMAL_BOARDS: &[Board] = &[
    Board::leaf("/b/", "Random"),
    Board {
        name: "/g/",
        topic: "Technology and Gadgets",
        sub_boards: &[
            Board::leaf("/g/linux/", "Linux Desktops and Servers"),
            Board::leaf("/g/hardware/", "Computer Hardware Discussions"),
            Board::leaf("/g/programming/", "Programming and Development"),
        ],
    },
    Board {
        name: "/v/",
        topic: "Video Games",
        sub_boards: &[
            Board::leaf("/v/pc/", "PC Gaming"),
            Board::leaf("/v/console/", "Console Gaming"),
            Board::leaf("/v/retro/", "Retro Gaming"),
        ],
    },
    Board::leaf("/pol/", "Politics"),
    Board::leaf("/biz/", "Business and Finance"),
    Board::leaf("/fit/", "Health and Fitness"),
    Board::leaf("/k/", "Weapons"),
];

pub const CALL_ROOMS: &[&str] = &["General Chat", "Random Fun", "Tech Talk", "Art Zone"];

/// Look up a board or sub-board by its full name.
pub fn find_board(name: &str) -> Option<&'static Board> {
    NORMAL_BOARDS.iter().find_map(|board| {
        if board.name == name {
            Some(board)
        } else {
            board.sub_boards.iter().find(|sub| sub.name == name)
        }
    })
}

/// Title for a board name, falling back to the raw name for boards outside
/// the catalogue.
pub fn board_title(name: &str) -> String {
    find_board(name)
        .map(Board::title)
        .unwrap_or_else(|| name.to_string())
}

pub fn is_call_room(name: &str) -> bool {
    CALL_ROOMS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_top_level_and_sub_board() {
        assert_eq!(find_board("/b/").unwrap().topic, "Random");
        assert_eq!(find_board("/v/retro/").unwrap().topic, "Retro Gaming");
        assert!(find_board("/nope/").is_none());
    }

    #[test]
    fn test_board_title_fallback() {
        assert_eq!(board_title("/g/linux/"), "/g/linux/ - Linux Desktops and Servers");
        assert_eq!(board_title("/custom/"), "/custom/");
    }

    #[test]
    fn test_call_rooms() {
        assert!(is_call_room("Tech Talk"));
        assert!(!is_call_room("/b/"));
    }
}
