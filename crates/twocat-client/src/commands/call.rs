use tracing::{info, warn};

use twocat_media::{CaptureConstraints, MediaDevices};
use twocat_shared::boards::is_call_room;

use crate::classify::LinkClassifier;
use crate::error::ClientError;
use crate::events::{emit_event, ViewEvent};
use crate::state::CallSession;
use crate::views::CallState;
use crate::Client;

impl<C: LinkClassifier, D: MediaDevices> Client<C, D> {
    /// Acquire camera and microphone for a call room.
    pub async fn join_call(&self, room: &str) -> Result<(), ClientError> {
        if !is_call_room(room) {
            return Err(ClientError::UnknownCallRoom(room.to_string()));
        }
        let in_call = self.lock()?.call.is_some();
        if in_call {
            return Err(ClientError::AlreadyInCall);
        }

        info!(room = %room, "Joining call");
        let stream = match self.devices.open(&CaptureConstraints::audio_video()).await {
            Ok(stream) => stream,
            Err(e) => {
                warn!(room = %room, error = %e, "Could not acquire media devices");
                emit_event(
                    &self.events,
                    ViewEvent::CallFailed {
                        room: room.to_string(),
                        message: e.to_string(),
                    },
                );
                return Err(e.into());
            }
        };

        let call_state = {
            let mut state = self.lock()?;
            // Another join may have won while the devices were opening;
            // dropping our stream releases its tracks.
            if state.call.is_some() {
                return Err(ClientError::AlreadyInCall);
            }
            let call_state = CallState::active(room, &stream);
            state.call = Some(CallSession {
                room: room.to_string(),
                stream,
            });
            call_state
        };
        info!(room = %room, tracks = call_state.tracks.len(), "Call started");

        emit_event(&self.events, ViewEvent::CallStateChanged(call_state));
        Ok(())
    }

    /// Stop every local track and forget the call.
    pub fn leave_call(&self) -> Result<(), ClientError> {
        let session = self.lock()?.call.take();
        let Some(mut session) = session else {
            return Err(ClientError::NotInCall);
        };
        session.stream.stop();
        info!(room = %session.room, "Call ended");

        emit_event(&self.events, ViewEvent::CallStateChanged(CallState::idle()));
        Ok(())
    }

    pub fn call_state(&self) -> Result<CallState, ClientError> {
        let state = self.lock()?;
        Ok(match &state.call {
            Some(session) => CallState::active(&session.room, &session.stream),
            None => CallState::idle(),
        })
    }
}
