use std::collections::HashMap;

use tracing::info;

use twocat_media::MediaDevices;
use twocat_shared::boards::{board_title, CALL_ROOMS, NORMAL_BOARDS};
use twocat_shared::error::ValidationError;

use crate::classify::LinkClassifier;
use crate::error::ClientError;
use crate::events::{emit_event, ViewEvent};
use crate::state::AppState;
use crate::thread::assemble;
use crate::views::{BoardDirectory, BoardEntry, BoardView};
use crate::Client;

impl<C: LinkClassifier, D: MediaDevices> Client<C, D> {
    /// Publish the board catalogue with per-board post counts.
    pub fn list_boards(&self) -> Result<BoardDirectory, ClientError> {
        let counts = {
            let state = self.lock()?;
            let mut counts = HashMap::new();
            for board in NORMAL_BOARDS.iter().flat_map(|b| std::iter::once(b).chain(b.sub_boards)) {
                counts.insert(board.name, state.database.count_posts(board.name)?);
            }
            counts
        };

        let count = |name: &str| counts.get(name).copied().unwrap_or(0);
        let directory = BoardDirectory {
            boards: NORMAL_BOARDS
                .iter()
                .map(|board| BoardEntry::new(board, &count))
                .collect(),
            call_rooms: CALL_ROOMS.iter().map(|room| room.to_string()).collect(),
        };
        emit_event(&self.events, ViewEvent::BoardsListed(directory.clone()));
        Ok(directory)
    }

    pub fn select_board(&self, name: &str) -> Result<BoardView, ClientError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::UnknownBoard(name.to_string()).into());
        }

        let view = {
            let mut state = self.lock()?;
            state.current_board = Some(name.to_string());
            render_board(&mut state, name)?
        };
        info!(board = %name, posts = view.post_count, "Board selected");

        emit_event(&self.events, ViewEvent::BoardRendered(view.clone()));
        Ok(view)
    }

    pub fn back_to_boards(&self) -> Result<(), ClientError> {
        {
            let mut state = self.lock()?;
            if let Some(board) = state.current_board.take() {
                info!(board = %board, "Board closed");
            }
            state.blob_urls.revoke_all();
        }
        emit_event(&self.events, ViewEvent::BoardClosed);
        Ok(())
    }

    pub fn current_board(&self) -> Result<Option<String>, ClientError> {
        Ok(self.lock()?.current_board.clone())
    }
}

/// Load and assemble a board, replacing every display URL with a fresh set
/// for the posts now on screen.
pub(crate) fn render_board(state: &mut AppState, board: &str) -> Result<BoardView, ClientError> {
    let posts = state.database.load_posts(board)?;

    state.blob_urls.revoke_all();
    for post in posts.iter().filter(|p| p.file_type.is_some()) {
        state.blob_urls.create(post.id);
    }

    let forest = assemble(posts);
    Ok(BoardView::new(board, board_title(board), &forest, &state.blob_urls))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{drain, test_client, StaticClassifier};
    use crate::PostDraft;
    use twocat_media::NoDevices;
    use twocat_shared::types::Attachment;
    use twocat_store::NewPost;

    fn client() -> Client<StaticClassifier, NoDevices> {
        test_client(StaticClassifier::safe(), NoDevices)
    }

    #[test]
    fn test_select_board_renders_threads() {
        let client = client();
        {
            let state = client.lock().unwrap();
            state.database.add_post(&NewPost::new("/g/").comment("other board")).unwrap();
        }
        let mut rx = client.subscribe();

        client.select_board("/b/").unwrap();
        client.create_post(PostDraft::default().comment("hi")).unwrap();

        let events = drain(&mut rx);
        let views: Vec<&BoardView> = events
            .iter()
            .filter_map(|e| match e {
                ViewEvent::BoardRendered(view) => Some(view),
                _ => None,
            })
            .collect();
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].title, "/b/ - Random");
        assert!(views[0].threads.is_empty());
        assert_eq!(views[1].threads.len(), 1);
        assert_eq!(views[1].threads[0].post.comment, "hi");
        assert_eq!(client.current_board().unwrap().as_deref(), Some("/b/"));
    }

    #[test]
    fn test_unknown_board_title_falls_back_to_name() {
        let view = client().select_board("/x/").unwrap();
        assert_eq!(view.title, "/x/");
    }

    #[test]
    fn test_blank_board_name_is_rejected() {
        let err = client().select_board("  ").unwrap_err();
        assert!(matches!(
            err,
            ClientError::Validation(ValidationError::UnknownBoard(_))
        ));
    }

    #[test]
    fn test_media_urls_live_while_board_is_open() {
        let client = client();
        client.select_board("/b/").unwrap();
        client
            .create_post(PostDraft::default().file(Attachment::new("image/png", vec![1u8])))
            .unwrap();
        client
            .create_post(PostDraft::default().file(Attachment::new("application/pdf", vec![1u8])))
            .unwrap();

        let view = client.select_board("/b/").unwrap();
        let urls: Vec<Option<&str>> = view
            .threads
            .iter()
            .map(|t| t.post.media_url.as_deref())
            .collect();
        assert_eq!(urls.iter().filter(|u| u.is_some()).count(), 1);
        assert_eq!(client.lock().unwrap().blob_urls.len(), 1);

        let mut rx = client.subscribe();
        client.back_to_boards().unwrap();
        assert!(client.lock().unwrap().blob_urls.is_empty());
        assert!(client.current_board().unwrap().is_none());
        assert!(matches!(drain(&mut rx).as_slice(), [ViewEvent::BoardClosed]));
    }

    #[test]
    fn test_list_boards_counts_posts() {
        let client = client();
        client.select_board("/g/linux/").unwrap();
        client.create_post(PostDraft::default().comment("arch")).unwrap();

        let directory = client.list_boards().unwrap();
        assert_eq!(directory.boards.len(), 7);
        assert_eq!(directory.call_rooms.len(), 4);
        let g = directory.boards.iter().find(|b| b.name == "/g/").unwrap();
        assert_eq!(g.post_count, 0);
        assert_eq!(g.sub_boards[0].post_count, 1);
    }
}
