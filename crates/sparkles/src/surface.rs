//! Overlay surface lifecycle

use tracing::{debug, info};

use crate::canvas::OverlaySurface;
use crate::error::HostError;
use crate::host::SurfaceHost;

/// Owns the overlay surface while present: `absent -> present` on
/// [`create`](Self::create), `present -> absent` on [`destroy`](Self::destroy).
pub struct SurfaceManager<S: SurfaceHost> {
    host: S,
    surface: Option<S::Surface>,
}

impl<S: SurfaceHost> SurfaceManager<S> {
    pub fn new(host: S) -> Self {
        Self {
            host,
            surface: None,
        }
    }

    /// Whether a surface currently exists
    pub fn is_present(&self) -> bool {
        self.surface.is_some()
    }

    /// Allocate the surface, size it to the viewport and watch for resizes.
    ///
    /// No-op if already present. The resize observer is removed before being
    /// registered so at most one is ever installed.
    pub fn create(&mut self) -> Result<(), HostError> {
        if self.surface.is_some() {
            debug!("Overlay surface already exists, skipping setup");
            return Ok(());
        }

        let mut surface = self.host.create_surface()?;

        self.host.unwatch_resize();
        if let Err(e) = self.host.watch_resize() {
            self.host.destroy_surface(surface);
            return Err(e);
        }

        let (width, height) = self.host.viewport();
        surface.resize(width, height);
        self.surface = Some(surface);

        info!("Overlay surface created at {}x{}", width, height);
        Ok(())
    }

    /// Detach and drop the surface. No-op if absent.
    pub fn destroy(&mut self) {
        match self.surface.take() {
            Some(surface) => {
                self.host.unwatch_resize();
                self.host.destroy_surface(surface);
                info!("Overlay surface removed");
            }
            None => debug!("No overlay surface to remove"),
        }
    }

    /// Match the surface to the current viewport. No-op if absent.
    pub fn resize_to_viewport(&mut self) {
        if let Some(surface) = self.surface.as_mut() {
            let (width, height) = self.host.viewport();
            surface.resize(width, height);
            debug!("Overlay surface resized to {}x{}", width, height);
        }
    }

    pub fn surface(&self) -> Option<&S::Surface> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S::Surface> {
        self.surface.as_mut()
    }

    pub fn host(&self) -> &S {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut S {
        &mut self.host
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessSurfaceHost;

    #[test]
    fn test_create_sizes_to_viewport() {
        let mut manager = SurfaceManager::new(HeadlessSurfaceHost::new(800, 600));
        manager.create().unwrap();

        assert!(manager.is_present());
        assert_eq!(manager.surface().map(|s| s.size()), Some((800, 600)));
        assert_eq!(manager.host().live_surfaces(), 1);
        assert_eq!(manager.host().resize_watchers(), 1);
    }

    #[test]
    fn test_create_is_idempotent() {
        let mut manager = SurfaceManager::new(HeadlessSurfaceHost::new(800, 600));
        manager.create().unwrap();
        manager.create().unwrap();

        assert_eq!(manager.host().created(), 1);
        assert_eq!(manager.host().live_surfaces(), 1);
        assert_eq!(manager.host().resize_watchers(), 1);
    }

    #[test]
    fn test_destroy_releases_everything() {
        let mut manager = SurfaceManager::new(HeadlessSurfaceHost::new(800, 600));
        manager.create().unwrap();
        manager.destroy();
        manager.destroy();

        assert!(!manager.is_present());
        assert_eq!(manager.host().live_surfaces(), 0);
        assert_eq!(manager.host().resize_watchers(), 0);
    }

    #[test]
    fn test_recreate_after_destroy_keeps_single_watcher() {
        let mut manager = SurfaceManager::new(HeadlessSurfaceHost::new(800, 600));
        for _ in 0..3 {
            manager.create().unwrap();
            manager.destroy();
        }
        manager.create().unwrap();

        assert_eq!(manager.host().created(), 4);
        assert_eq!(manager.host().live_surfaces(), 1);
        assert_eq!(manager.host().resize_watchers(), 1);
    }

    #[test]
    fn test_resize_follows_viewport() {
        let mut manager = SurfaceManager::new(HeadlessSurfaceHost::new(800, 600));
        manager.create().unwrap();

        manager.host_mut().set_viewport(1024, 768);
        manager.resize_to_viewport();

        assert_eq!(manager.surface().map(|s| s.size()), Some((1024, 768)));
    }

    #[test]
    fn test_resize_without_surface_is_noop() {
        let mut manager = SurfaceManager::new(HeadlessSurfaceHost::new(800, 600));
        manager.resize_to_viewport();
        assert!(!manager.is_present());
    }

    #[test]
    fn test_failed_creation_leaves_absent() {
        let mut host = HeadlessSurfaceHost::new(800, 600);
        host.fail_next_create();
        let mut manager = SurfaceManager::new(host);

        assert!(manager.create().is_err());
        assert!(!manager.is_present());
        assert_eq!(manager.host().live_surfaces(), 0);
    }
}
