//! Conversion of an assembled frame into float data for renderers.

use nalgebra::Vector3;

use kerf_ir::CsgNode;
use kerf_kernel_joints::Frame;
use kerf_kernel_math::Transform;

use crate::settings::Result;
use crate::KernelSettings;

/// One finished timber, ready for a renderer.
#[derive(Debug, Clone)]
pub struct RenderedTimber {
    /// Timber name, if it has one.
    pub name: Option<String>,
    /// Local-to-world placement.
    pub transform: Transform,
    /// Finished solid in the timber's local frame.
    pub csg_local: CsgNode,
}

/// Everything a renderer needs to draw a frame.
#[derive(Debug, Clone)]
pub struct RenderedFrame {
    /// Finished timbers in frame order.
    pub timbers: Vec<RenderedTimber>,
    /// World-space solids of pegs and wedges.
    pub accessories: Vec<CsgNode>,
    /// Padded structure extent, `None` for an empty frame.
    pub extent: Option<(Vector3<f64>, Vector3<f64>)>,
}

impl RenderedFrame {
    /// Whether a float point lies in the extent, within the settings'
    /// float tolerance.
    pub fn extent_contains(&self, p: &Vector3<f64>, settings: &KernelSettings) -> bool {
        let Some((min, max)) = &self.extent else {
            return false;
        };
        (0..3).all(|i| {
            (p[i] >= min[i] || settings.floats_equal(p[i], min[i]))
                && (p[i] <= max[i] || settings.floats_equal(p[i], max[i]))
        })
    }
}

/// Padded structure extent as float corners; `None` for an empty frame.
pub fn structure_extent_f64(
    frame: &Frame,
    settings: &KernelSettings,
) -> Result<Option<(Vector3<f64>, Vector3<f64>)>> {
    let padding = settings.padding()?;
    Ok(frame.structure_extent(&padding).map(|extent| extent.to_f64()))
}

/// Convert a frame for rendering.
///
/// Fails only when the settings hold an unusable extent padding.
pub fn render_frame(frame: &Frame, settings: &KernelSettings) -> Result<RenderedFrame> {
    let timbers: Vec<RenderedTimber> = frame
        .cut_timbers()
        .iter()
        .map(|ct| RenderedTimber {
            name: ct.timber().name().map(str::to_owned),
            transform: ct.timber().transform_f64(),
            csg_local: ct.render_csg_local(),
        })
        .collect();
    let accessories: Vec<CsgNode> = frame.accessories().iter().map(|a| a.to_csg()).collect();
    let extent = structure_extent_f64(frame, settings)?;
    tracing::debug!(
        timbers = timbers.len(),
        accessories = accessories.len(),
        "rendered frame"
    );
    Ok(RenderedFrame {
        timbers,
        accessories,
        extent,
    })
}
