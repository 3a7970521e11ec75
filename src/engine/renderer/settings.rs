// Render settings: vsync, multisampling, depth test, face culling
//
// Settings are plain state; the renderer applies pending changes at the
// start of the next frame (surface reconfigure and/or pipeline rebuild).

/// Toggleable GPU state
#[derive(Debug, Clone)]
pub struct RenderSettings {
    vsync: bool,
    msaa_samples: u32,
    depth_test: bool,
    face_culling: bool,

    surface_dirty: bool,
    pipeline_dirty: bool,
}

impl RenderSettings {
    /// Default settings: vsync on, 4x MSAA, depth test and back-face culling
    /// enabled
    pub fn new() -> Self {
        Self {
            vsync: true,
            msaa_samples: 4,
            depth_test: true,
            face_culling: true,
            surface_dirty: false,
            pipeline_dirty: false,
        }
    }

    /// Check if vsync is enabled
    pub fn vsync(&self) -> bool {
        self.vsync
    }

    /// Enable or disable vsync
    pub fn set_vsync(&mut self, enabled: bool) {
        if self.vsync != enabled {
            self.vsync = enabled;
            self.surface_dirty = true;
        }
    }

    /// Current MSAA sample count (1 = off)
    pub fn msaa_samples(&self) -> u32 {
        self.msaa_samples
    }

    /// Set the MSAA sample count; only 1 and 4 are universally supported
    pub fn set_msaa_samples(&mut self, samples: u32) {
        if samples != 1 && samples != 4 {
            log::warn!("Unsupported MSAA sample count {}, keeping {}", samples, self.msaa_samples);
            return;
        }
        if self.msaa_samples != samples {
            self.msaa_samples = samples;
            self.pipeline_dirty = true;
        }
    }

    /// Check if the depth test is enabled
    pub fn depth_test(&self) -> bool {
        self.depth_test
    }

    /// Enable or disable the depth test
    pub fn set_depth_test(&mut self, enabled: bool) {
        if self.depth_test != enabled {
            self.depth_test = enabled;
            self.pipeline_dirty = true;
        }
    }

    /// Check if back-face culling is enabled
    pub fn face_culling(&self) -> bool {
        self.face_culling
    }

    /// Enable or disable back-face culling
    pub fn set_face_culling(&mut self, enabled: bool) {
        if self.face_culling != enabled {
            self.face_culling = enabled;
            self.pipeline_dirty = true;
        }
    }

    /// The present mode for the current vsync setting
    pub(crate) fn present_mode(&self) -> wgpu::PresentMode {
        if self.vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        }
    }

    /// Consume the pending surface reconfigure flag
    pub(crate) fn take_surface_dirty(&mut self) -> bool {
        std::mem::take(&mut self.surface_dirty)
    }

    /// Consume the pending pipeline rebuild flag
    pub(crate) fn take_pipeline_dirty(&mut self) -> bool {
        std::mem::take(&mut self.pipeline_dirty)
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self::new()
    }
}
