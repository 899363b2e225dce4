//! Tagged session registry
//!
//! Lets an application find a session again by a string tag, for example
//! to hand a playing video from a list into a detail page.

use crate::player::VideoSession;
use log::debug;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Sessions indexed by tag, owned by one owner thread
#[derive(Default)]
pub struct SessionRegistry {
    sessions: RefCell<HashMap<String, Rc<VideoSession>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `session` under `tag`
    ///
    /// A different session already registered under the tag is released.
    pub fn add<S: Into<String>>(&self, tag: S, session: Rc<VideoSession>) {
        let tag = tag.into();
        let previous = self.sessions.borrow_mut().insert(tag.clone(), session.clone());
        if let Some(previous) = previous {
            if !Rc::ptr_eq(&previous, &session) {
                debug!("replacing session under tag {}", tag);
                previous.release();
            }
        }
    }

    pub fn get(&self, tag: &str) -> Option<Rc<VideoSession>> {
        self.sessions.borrow().get(tag).cloned()
    }

    /// Forget the session under `tag` without releasing it
    pub fn remove(&self, tag: &str) -> Option<Rc<VideoSession>> {
        self.sessions.borrow_mut().remove(tag)
    }

    pub fn remove_all(&self) {
        self.sessions.borrow_mut().clear();
    }

    /// Release the session under `tag`, optionally forgetting it too
    pub fn release_by_tag(&self, tag: &str, remove: bool) {
        let session = if remove { self.remove(tag) } else { self.get(tag) };
        if let Some(session) = session {
            session.release();
        }
    }

    /// Forward back navigation to the session under `tag`
    pub fn on_back_pressed(&self, tag: &str) -> bool {
        self.get(tag).map_or(false, |s| s.on_back_pressed())
    }

    pub fn len(&self) -> usize {
        self.sessions.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{SimulatedBackendFactory, SimulatedMedia};
    use crate::player::{PlaybackState, PlayerContext, PlayerControl};

    fn session(ctx: &Rc<PlayerContext>) -> Rc<VideoSession> {
        let session = VideoSession::new(ctx.clone());
        session.set_url("/sdcard/a.mp4", HashMap::new());
        session
    }

    fn context() -> Rc<PlayerContext> {
        PlayerContext::builder()
            .backend_factory(Rc::new(SimulatedBackendFactory::new(SimulatedMedia::default())))
            .build()
            .unwrap()
    }

    #[test]
    fn test_replacing_a_tag_releases_the_old_session() {
        let ctx = context();
        let registry = SessionRegistry::new();
        let first = session(&ctx);
        first.start();
        assert_eq!(first.play_state(), PlaybackState::Preparing);

        registry.add("list", first.clone());
        registry.add("list", first.clone());
        assert_eq!(first.play_state(), PlaybackState::Preparing);

        let second = session(&ctx);
        registry.add("list", second.clone());
        assert_eq!(first.play_state(), PlaybackState::Idle);
        assert!(Rc::ptr_eq(&registry.get("list").unwrap(), &second));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_release_by_tag() {
        let ctx = context();
        let registry = SessionRegistry::new();
        let s = session(&ctx);
        s.start();
        registry.add("detail", s.clone());

        registry.release_by_tag("detail", false);
        assert_eq!(s.play_state(), PlaybackState::Idle);
        assert!(registry.get("detail").is_some());

        registry.release_by_tag("detail", true);
        assert!(registry.is_empty());
        assert!(!registry.on_back_pressed("detail"));
    }
}
