//! Pointer listener registration

use tracing::info;

use crate::error::HostError;
use crate::host::PointerSource;

/// Keeps at most one pointer-move handler registered with the host.
pub struct InputCapture<P: PointerSource> {
    source: P,
    attached: bool,
}

impl<P: PointerSource> InputCapture<P> {
    pub fn new(source: P) -> Self {
        Self {
            source,
            attached: false,
        }
    }

    /// Register the pointer-move handler.
    ///
    /// Any previously registered handler is removed first, so repeated calls
    /// never stack handlers.
    pub fn attach(&mut self) -> Result<(), HostError> {
        self.source.detach();
        self.attached = false;

        self.source.attach()?;
        self.attached = true;
        info!("Pointer listener added");
        Ok(())
    }

    /// Remove the pointer-move handler unconditionally
    pub fn detach(&mut self) {
        self.source.detach();
        self.attached = false;
        info!("Pointer listener removed");
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn source(&self) -> &P {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut P {
        &mut self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessPointerSource;

    #[test]
    fn test_attach_twice_keeps_one_handler() {
        let mut input = InputCapture::new(HeadlessPointerSource::default());
        input.attach().unwrap();
        input.attach().unwrap();

        assert!(input.is_attached());
        assert_eq!(input.source().handlers(), 1);
    }

    #[test]
    fn test_detach_is_unconditional() {
        let mut input = InputCapture::new(HeadlessPointerSource::default());
        input.detach();
        assert_eq!(input.source().handlers(), 0);

        input.attach().unwrap();
        input.detach();
        assert!(!input.is_attached());
        assert_eq!(input.source().handlers(), 0);
    }
}
