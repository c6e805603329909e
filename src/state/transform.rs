// Overlay transform and the image-fit formula

use serde::{Deserialize, Serialize};

use super::geometry::clamp;
use crate::config::GestureLimits;
use crate::error::{Result, TraceError};

/// Affine transform applied to the overlay image, relative to its centre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformState {
    pub tx: f64,
    pub ty: f64,
    pub scale: f64,
    /// Unbounded; repeated gestures may take it past ±360.
    pub rotation_deg: f64,
}

impl Default for TransformState {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl TransformState {
    pub const IDENTITY: TransformState = TransformState {
        tx: 0.0,
        ty: 0.0,
        scale: 1.0,
        rotation_deg: 0.0,
    };

    pub fn with_scale_clamped(mut self) -> Self {
        self.scale = clamp(self.scale, GestureLimits::MIN_SCALE, GestureLimits::MAX_SCALE);
        self
    }

    /// CSS `transform` for an element positioned with `left:50%; top:50%`.
    pub fn css_transform(&self) -> String {
        format!(
            "translate(-50%, -50%) translate({:.2}px, {:.2}px) rotate({:.3}deg) scale({:.4})",
            self.tx, self.ty, self.rotation_deg, self.scale
        )
    }

    /// Short readout for the controls panel.
    pub fn summary(&self) -> String {
        format!(
            "x {:.0} · y {:.0} · {:.0}% · {:.1}°",
            self.tx,
            self.ty,
            self.scale * 100.0,
            self.rotation_deg
        )
    }
}

fn usable(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

/// Scale that fits an image of `w`x`h` inside a `fw`x`fh` frame, with margin.
pub fn fit_scale(w: f64, h: f64, fw: f64, fh: f64) -> Result<f64> {
    if !usable(w) || !usable(h) {
        return Err(TraceError::InvalidImageSize { width: w, height: h });
    }
    if !usable(fw) || !usable(fh) {
        return Err(TraceError::InvalidFrameSize { width: fw, height: fh });
    }
    let sx = fw / w;
    let sy = fh / h;
    Ok(sx.min(sy) * GestureLimits::FIT_MARGIN)
}

/// Centred, unrotated transform showing the whole image inside the frame.
pub fn fit_to_frame(w: f64, h: f64, fw: f64, fh: f64) -> Result<TransformState> {
    let scale = fit_scale(w, h, fw, fh)?;
    Ok(TransformState {
        scale,
        ..TransformState::IDENTITY
    }
    .with_scale_clamped())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_wide_image_into_square_frame() {
        let s = fit_scale(2000.0, 1000.0, 800.0, 800.0).unwrap();
        assert!((s - 0.36).abs() < 1e-12);
        let t = fit_to_frame(2000.0, 1000.0, 800.0, 800.0).unwrap();
        assert_eq!((t.tx, t.ty, t.rotation_deg), (0.0, 0.0, 0.0));
        assert!((t.scale - 0.36).abs() < 1e-12);
    }

    #[test]
    fn fit_result_respects_scale_bounds() {
        // 1px image in a big frame would want scale 900
        let t = fit_to_frame(1.0, 1.0, 1000.0, 1000.0).unwrap();
        assert_eq!(t.scale, GestureLimits::MAX_SCALE);
    }

    #[test]
    fn fit_rejects_degenerate_sizes() {
        assert_eq!(
            fit_scale(0.0, 10.0, 100.0, 100.0),
            Err(TraceError::InvalidImageSize { width: 0.0, height: 10.0 })
        );
        assert!(matches!(
            fit_scale(10.0, 10.0, 100.0, f64::NAN),
            Err(TraceError::InvalidFrameSize { .. })
        ));
    }

    #[test]
    fn css_contains_every_component() {
        let t = TransformState {
            tx: 12.0,
            ty: -4.5,
            scale: 2.0,
            rotation_deg: 450.0,
        };
        assert_eq!(
            t.css_transform(),
            "translate(-50%, -50%) translate(12.00px, -4.50px) rotate(450.000deg) scale(2.0000)"
        );
    }
}
