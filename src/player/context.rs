//! Process-scoped player context
//!
//! Everything a session needs from its surroundings: the owner-thread
//! looper, the configuration, and the pluggable backend, surface, platform
//! and persistence implementations. The embedder builds one context and
//! passes it to every session it creates.

use crate::backend::BackendFactory;
use crate::platform::{AudioFocusSystem, ContainerHost, HeadlessAudioFocus, HeadlessPlatform, Platform};
use crate::player::looper::Looper;
use crate::player::progress::ProgressStore;
use crate::surface::{OffscreenSurfaceFactory, SurfaceFactory};
use crate::utils::config::PlayerConfig;
use crate::utils::error::{Result, VideoViewError};
use log::{debug, warn};
use once_cell::unsync::OnceCell;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Shared environment for sessions on one owner thread
pub struct PlayerContext {
    looper: Looper,
    pending_config: RefCell<Option<PlayerConfig>>,
    config: OnceCell<PlayerConfig>,
    backend_factory: Rc<dyn BackendFactory>,
    surface_factory: Rc<dyn SurfaceFactory>,
    platform: Rc<dyn Platform>,
    container_host: Rc<dyn ContainerHost>,
    focus_system: Rc<dyn AudioFocusSystem>,
    progress_store: Option<Rc<dyn ProgressStore>>,
    play_on_mobile_network: Cell<Option<bool>>,
}

impl PlayerContext {
    pub fn builder() -> PlayerContextBuilder {
        PlayerContextBuilder::default()
    }

    /// Supply the configuration
    ///
    /// Only the first call before the configuration is first read has any
    /// effect; returns false when it was ignored.
    pub fn init_config(&self, config: PlayerConfig) -> bool {
        if self.config.get().is_some() {
            debug!("configuration already frozen, ignoring init");
            return false;
        }
        let mut pending = self.pending_config.borrow_mut();
        if pending.is_some() {
            return false;
        }
        *pending = Some(config);
        true
    }

    /// The configuration, frozen from here on
    pub fn config(&self) -> &PlayerConfig {
        self.config
            .get_or_init(|| self.pending_config.borrow_mut().take().unwrap_or_default())
    }

    /// Whether the configuration has been read yet
    pub fn is_config_frozen(&self) -> bool {
        self.config.get().is_some()
    }

    /// Whether playback may start on a metered network without asking
    pub fn play_on_mobile_network(&self) -> bool {
        self.play_on_mobile_network
            .get()
            .unwrap_or(self.config().playback.play_on_mobile_network)
    }

    /// Runtime override, typically set after the user confirmed
    pub fn set_play_on_mobile_network(&self, allow: bool) {
        self.play_on_mobile_network.set(Some(allow));
    }

    pub fn looper(&self) -> &Looper {
        &self.looper
    }

    pub fn backend_factory(&self) -> &Rc<dyn BackendFactory> {
        &self.backend_factory
    }

    pub fn surface_factory(&self) -> &Rc<dyn SurfaceFactory> {
        &self.surface_factory
    }

    pub fn platform(&self) -> &Rc<dyn Platform> {
        &self.platform
    }

    pub fn container_host(&self) -> &Rc<dyn ContainerHost> {
        &self.container_host
    }

    pub fn focus_system(&self) -> &Rc<dyn AudioFocusSystem> {
        &self.focus_system
    }

    pub fn progress_store(&self) -> Option<&Rc<dyn ProgressStore>> {
        self.progress_store.as_ref()
    }
}

/// Builder for [`PlayerContext`]
///
/// Only the backend factory is required. Surfaces default to offscreen
/// ones, the platform to a headless one, and focus requests are granted.
#[derive(Default)]
pub struct PlayerContextBuilder {
    looper: Option<Looper>,
    config: Option<PlayerConfig>,
    backend_factory: Option<Rc<dyn BackendFactory>>,
    surface_factory: Option<Rc<dyn SurfaceFactory>>,
    platform: Option<Rc<dyn Platform>>,
    container_host: Option<Rc<dyn ContainerHost>>,
    focus_system: Option<Rc<dyn AudioFocusSystem>>,
    progress_store: Option<Rc<dyn ProgressStore>>,
}

impl PlayerContextBuilder {
    pub fn looper(mut self, looper: Looper) -> Self {
        self.looper = Some(looper);
        self
    }

    pub fn config(mut self, config: PlayerConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn backend_factory(mut self, factory: Rc<dyn BackendFactory>) -> Self {
        self.backend_factory = Some(factory);
        self
    }

    pub fn surface_factory(mut self, factory: Rc<dyn SurfaceFactory>) -> Self {
        self.surface_factory = Some(factory);
        self
    }

    pub fn platform(mut self, platform: Rc<dyn Platform>) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn container_host(mut self, host: Rc<dyn ContainerHost>) -> Self {
        self.container_host = Some(host);
        self
    }

    pub fn focus_system(mut self, system: Rc<dyn AudioFocusSystem>) -> Self {
        self.focus_system = Some(system);
        self
    }

    pub fn progress_store(mut self, store: Rc<dyn ProgressStore>) -> Self {
        self.progress_store = Some(store);
        self
    }

    pub fn build(self) -> Result<Rc<PlayerContext>> {
        let backend_factory = self
            .backend_factory
            .ok_or_else(|| VideoViewError::Config("a backend factory is required".to_string()))?;

        let headless = Rc::new(HeadlessPlatform::new());
        let platform: Rc<dyn Platform> = match self.platform {
            Some(platform) => platform,
            None => headless.clone(),
        };
        let container_host: Rc<dyn ContainerHost> = match self.container_host {
            Some(host) => host,
            None => headless,
        };
        let focus_system: Rc<dyn AudioFocusSystem> = match self.focus_system {
            Some(system) => system,
            None => Rc::new(HeadlessAudioFocus::new()),
        };
        if self.progress_store.is_none() {
            warn!("no progress store configured, playback positions will not be remembered");
        }

        Ok(Rc::new(PlayerContext {
            looper: self.looper.unwrap_or_default(),
            pending_config: RefCell::new(self.config),
            config: OnceCell::new(),
            backend_factory,
            surface_factory: self
                .surface_factory
                .unwrap_or_else(|| Rc::new(OffscreenSurfaceFactory) as Rc<dyn SurfaceFactory>),
            platform,
            container_host,
            focus_system,
            progress_store: self.progress_store,
            play_on_mobile_network: Cell::new(None),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{SimulatedBackendFactory, SimulatedMedia};

    fn context() -> Rc<PlayerContext> {
        PlayerContext::builder()
            .backend_factory(Rc::new(SimulatedBackendFactory::new(SimulatedMedia::default())))
            .build()
            .unwrap()
    }

    #[test]
    fn test_backend_factory_required() {
        assert!(PlayerContext::builder().build().is_err());
    }

    #[test]
    fn test_config_frozen_after_first_read() {
        let ctx = context();
        let mut config = PlayerConfig::default();
        config.display.enable_orientation = true;

        assert!(ctx.init_config(config.clone()));
        assert!(!ctx.is_config_frozen());
        assert!(ctx.config().display.enable_orientation);
        assert!(ctx.is_config_frozen());

        config.display.enable_orientation = false;
        assert!(!ctx.init_config(config));
        assert!(ctx.config().display.enable_orientation);
    }

    #[test]
    fn test_play_on_mobile_override() {
        let ctx = context();
        assert!(!ctx.play_on_mobile_network());
        ctx.set_play_on_mobile_network(true);
        assert!(ctx.play_on_mobile_network());
    }
}
