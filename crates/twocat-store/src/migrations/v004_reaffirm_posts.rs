//! v004 -- Re-affirms the v003 layout.
//!
//! Earlier builds recreated the collection here, wiping every post. The step
//! is now additive only, so databases already at v3 keep their data.

use super::v003_posts::{BOARD_INDEX, POSTS};
use super::{Effect, Upgrade};

pub const UPGRADE: Upgrade = Upgrade {
    version: 4,
    name: "v004_reaffirm_posts",
    effects: &[Effect::EnsureCollection(POSTS), BOARD_INDEX],
};
