//! Top level window holding the watch face layers

use super::{Error, WatchFace};
use crate::platform::Platform;

/// Window that owns the face layers while loaded
#[derive(Debug)]
pub struct Window<F> {
    face: Option<F>,
}

impl<F> Default for Window<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> Window<F> {
    /// Create new window without layers
    pub const fn new() -> Self {
        Self { face: None }
    }
}

impl<F: WatchFace> Window<F> {
    /// Show the window. The first push loads the layers.
    pub fn push<P: Platform>(&mut self, platform: &P) -> Result<(), Error> {
        if self.face.is_none() {
            self.face = Some(F::load(platform)?);
        }
        Ok(())
    }

    /// Destroy all layers
    pub fn unload(&mut self) {
        self.face = None;
    }

    pub fn is_loaded(&self) -> bool {
        self.face.is_some()
    }

    pub fn face(&self) -> Option<&F> {
        self.face.as_ref()
    }

    pub fn face_mut(&mut self) -> Option<&mut F> {
        self.face.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockPlatform;
    use crate::ui::DigitalFace;

    #[test]
    fn push_loads_once_and_unload_drops_layers() {
        let mut platform = MockPlatform::new();
        let mut window = Window::<DigitalFace>::new();
        assert!(!window.is_loaded());

        window.push(&platform).unwrap();
        assert_eq!(window.face().unwrap().minute.text(), "05");

        // Pushing again keeps the loaded layers
        platform.time = platform.time + chrono::Duration::minutes(1);
        window.push(&platform).unwrap();
        assert_eq!(window.face().unwrap().minute.text(), "05");

        window.unload();
        assert!(window.face().is_none());
    }
}
