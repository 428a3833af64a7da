//! Downstream avatar-rendering dependency.
//!
//! The legacy flow would decode the submitted mii payload, render a TGA,
//! and upload it to the image endpoint. Decoding the payload is out of
//! scope, so the only adapter reports the capability as unimplemented and
//! the registration flow records that and moves on.

/// Failures raised by avatar rendering adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MiiRenderError {
    /// No renderer for the payload format exists yet.
    #[error("mii payload rendering is not implemented")]
    NotImplemented,
    /// The payload could not be decoded by an otherwise capable renderer.
    #[error("mii payload rejected: {message}")]
    InvalidPayload { message: String },
}

/// Render a mii descriptor payload into image bytes for the cache.
pub trait MiiRenderer: Send + Sync {
    fn render(&self, mii_data: &str) -> Result<Vec<u8>, MiiRenderError>;
}

/// Stub adapter for the unfulfilled rendering dependency.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnimplementedMiiRenderer;

impl MiiRenderer for UnimplementedMiiRenderer {
    fn render(&self, _mii_data: &str) -> Result<Vec<u8>, MiiRenderError> {
        Err(MiiRenderError::NotImplemented)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_renderer_always_reports_not_implemented() {
        assert_eq!(
            UnimplementedMiiRenderer.render("AAEAQA=="),
            Err(MiiRenderError::NotImplemented)
        );
    }
}
