//! Stock overlay components
//!
//! Headless view-models for the standard player chrome. Each keeps the
//! visibility and text a view layer would render and exposes the clicks a
//! view layer would forward. None of them touch the session directly; all
//! interaction goes through the [`ControlWrapper`] they are bound with.

pub mod complete;
pub mod error;
pub mod gesture_view;
pub mod live;
pub mod prepare;
pub mod title;
pub mod vod;

pub use complete::CompleteView;
pub use error::ErrorView;
pub use gesture_view::{GestureIcon, GestureView};
pub use live::LiveControlView;
pub use prepare::PrepareView;
pub use title::TitleView;
pub use vod::VodControlView;

use crate::controller::{ControlWrapper, VideoController};
use crate::platform::ScreenOrientation;
use std::cell::RefCell;

/// Horizontal insets keeping content clear of a display cutout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Padding {
    pub left: u32,
    pub right: u32,
}

/// Insets for the current screen orientation
///
/// A cutout sits on the left in landscape and on the right in reverse
/// landscape; portrait needs no horizontal inset.
pub fn cutout_padding(wrapper: &ControlWrapper) -> Padding {
    if !wrapper.has_cutout() {
        return Padding::default();
    }
    let height = wrapper.cutout_height();
    match wrapper.requested_orientation() {
        ScreenOrientation::Landscape => Padding {
            left: height,
            right: 0,
        },
        ScreenOrientation::ReverseLandscape => Padding {
            left: 0,
            right: height,
        },
        _ => Padding::default(),
    }
}

/// Clone the bound wrapper out of its cell
pub(crate) fn bound(cell: &RefCell<Option<ControlWrapper>>) -> Option<ControlWrapper> {
    cell.borrow().clone()
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::backend::{SimulatedBackendFactory, SimulatedMedia};
    use crate::controller::{Controller, StandardController};
    use crate::platform::HeadlessPlatform;
    use crate::player::looper::{Looper, ManualClock};
    use crate::player::{PlaybackState, PlayerContext, PlayerControl, VideoSession};
    use std::collections::HashMap;
    use std::rc::Rc;

    /// A session on a simulated backend with a manual clock
    pub struct Harness {
        pub ctx: Rc<PlayerContext>,
        pub clock: Rc<ManualClock>,
        pub looper: Looper,
        pub platform: Rc<HeadlessPlatform>,
        pub factory: SimulatedBackendFactory,
        pub session: Rc<VideoSession>,
    }

    impl Harness {
        pub fn new() -> Self {
            let clock = Rc::new(ManualClock::new());
            let looper = Looper::with_clock(clock.clone());
            let platform = Rc::new(HeadlessPlatform::new());
            let factory = SimulatedBackendFactory::new(SimulatedMedia::default());
            let ctx = PlayerContext::builder()
                .looper(looper.clone())
                .platform(platform.clone())
                .container_host(platform.clone())
                .backend_factory(Rc::new(factory.clone()))
                .build()
                .unwrap();
            let session = VideoSession::new(ctx.clone());
            session.set_url("/sdcard/movie.mp4", HashMap::new());
            Self {
                ctx,
                clock,
                looper,
                platform,
                factory,
                session,
            }
        }

        /// A bare controller attached to the session
        pub fn controller(&self) -> Rc<Controller> {
            let controller = Controller::new(&self.ctx);
            self.session.set_video_controller(Some(controller.clone()));
            controller
        }

        /// A standard controller attached to the session
        pub fn standard_controller(&self) -> StandardController {
            let standard = StandardController::new(&self.ctx);
            self.session
                .set_video_controller(Some(standard.controller().clone()));
            standard
        }

        /// Start and run until the first frame is on screen
        pub fn play(&self) {
            self.session.start();
            self.looper.run_pending();
            assert_eq!(self.session.play_state(), PlaybackState::Playing);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::Controller;
    use crate::player::{PlayerControl, VideoSession};
    use std::rc::Weak;

    #[test]
    fn test_cutout_padding_follows_orientation() {
        let harness = testing::Harness::new();
        harness.platform.set_cutout(Some(80));
        let controller = harness.controller();
        let wrapper = controller.wrapper().unwrap();

        assert_eq!(cutout_padding(&wrapper), Padding::default());
        wrapper.request_orientation(ScreenOrientation::Landscape);
        assert_eq!(cutout_padding(&wrapper), Padding { left: 80, right: 0 });
        wrapper.request_orientation(ScreenOrientation::ReverseLandscape);
        assert_eq!(cutout_padding(&wrapper), Padding { left: 0, right: 80 });
    }

    #[test]
    fn test_no_cutout_no_padding() {
        let player: Weak<dyn PlayerControl> = Weak::<VideoSession>::new();
        let controller: Weak<dyn VideoController> = Weak::<Controller>::new();
        let wrapper = ControlWrapper::new(player, controller);
        assert_eq!(cutout_padding(&wrapper), Padding::default());
    }
}
