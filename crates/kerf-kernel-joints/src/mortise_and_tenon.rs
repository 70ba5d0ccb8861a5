//! Mortise-and-tenon joints between two face-aligned timbers.
//!
//! The tenon is cut on one end of the tenon timber. Its shoulder sits where
//! the tenon centerline meets the mortise timber's face; the mortise is the
//! tenon's pocket carried into the mortise timber's frame.

use std::sync::Arc;

use num_traits::Signed;
use serde::{Deserialize, Serialize};

use kerf_ir::{Aabb, CsgNode};
use kerf_kernel_math::{integer, scale, vec3, Orientation, Scalar, Vec2, Vec3};
use kerf_kernel_timber::{
    DistanceFromEnd, DistanceFromLongFace, ReferenceEnd, ReferenceLongFace, Timber,
};

use crate::{
    local_bounds, Accessory, Cut, Joint, JointError, Peg, PegShape, Result, ShoulderPlane,
    StandardMortise, StandardTenon, TenonPosition, TimberOperation, Wedge,
};

/// Pegs driven across the tenon, with an optional drawbore.
///
/// Each position is `(distance_from_shoulder, distance_from_centerline)`:
/// the first runs from the shoulder toward the tenon end, the second
/// sideways across `tenon_face`. The hole in the tenon is shifted toward the
/// shoulder by `drawbore_offset`, so the peg pulls the joint tight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawborePeg {
    /// Peg cross-section.
    pub shape: PegShape,
    /// Long face of the tenon timber the pegs are perpendicular to.
    pub tenon_face: ReferenceLongFace,
    /// Peg positions on the tenon.
    pub positions: Vec<(Scalar, Scalar)>,
    /// Diameter or side length.
    pub size: Scalar,
    /// Depth from the mortise face; through the mortise timber when `None`.
    pub depth: Option<Scalar>,
    /// Shift of the tenon hole toward the shoulder.
    pub drawbore_offset: Scalar,
}

impl DrawborePeg {
    /// Pegs with no positions yet, no drawbore and a through depth.
    pub fn new(shape: PegShape, tenon_face: ReferenceLongFace, size: Scalar) -> Self {
        Self {
            shape,
            tenon_face,
            positions: Vec::new(),
            size,
            depth: None,
            drawbore_offset: integer(0),
        }
    }

    /// Add a peg position.
    pub fn with_position(mut self, distance_from_shoulder: Scalar, distance_from_centerline: Scalar) -> Self {
        self.positions
            .push((distance_from_shoulder, distance_from_centerline));
        self
    }

    /// Stop the pegs at a depth from the mortise face.
    pub fn with_depth(mut self, depth: Scalar) -> Self {
        self.depth = Some(depth);
        self
    }

    /// Offset the tenon holes toward the shoulder.
    pub fn with_drawbore_offset(mut self, offset: Scalar) -> Self {
        self.drawbore_offset = offset;
        self
    }
}

/// Wedges driven into kerfs sawn in the tenon end.
///
/// Each position is the wedge's offset from the tenon center along the
/// tenon timber's width axis. The thick end sits flush with the tenon end
/// and the taper runs back toward the shoulder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenonWedges {
    /// Width at the thick end.
    pub base_width: Scalar,
    /// Width at the tip.
    pub tip_width: Scalar,
    /// Extent along the tenon timber's height axis.
    pub height: Scalar,
    /// How far the wedge reaches into the tenon.
    pub length: Scalar,
    /// Offsets across the tenon thickness.
    pub positions: Vec<Scalar>,
}

impl TenonWedges {
    /// Wedges of one shape, with no positions yet.
    pub fn new(base_width: Scalar, tip_width: Scalar, height: Scalar, length: Scalar) -> Self {
        Self {
            base_width,
            tip_width,
            height,
            length,
            positions: Vec::new(),
        }
    }

    /// Add a wedge at an offset across the tenon.
    pub fn with_position(mut self, offset: Scalar) -> Self {
        self.positions.push(offset);
        self
    }
}

/// Parameters for [`cut_simple_mortise_and_tenon_joint`].
///
/// `tenon_thickness` runs along the tenon timber's width axis and
/// `tenon_length` along its height axis. `tenon_depth` is how far the tenon
/// reaches past the shoulder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MortiseAndTenonParams {
    /// End of the tenon timber that carries the tenon.
    pub tenon_end: ReferenceEnd,
    /// Tenon size along the tenon timber's width axis.
    pub tenon_thickness: Scalar,
    /// Tenon size along the tenon timber's height axis.
    pub tenon_length: Scalar,
    /// Tenon reach past the shoulder.
    pub tenon_depth: Scalar,
    /// Offset of the tenon from the tenon centerline, in tenon-local (x, y).
    /// Centered when `None`.
    pub tenon_offset: Option<Vec2>,
    /// Mortise depth from the mortise face; `tenon_depth` when `None`.
    pub mortise_depth: Option<Scalar>,
    /// Optional pegs.
    pub peg: Option<DrawborePeg>,
    /// Optional wedges in the tenon end.
    #[serde(default)]
    pub wedges: Option<TenonWedges>,
}

impl MortiseAndTenonParams {
    /// A centered tenon with a mortise of the same depth and no pegs.
    pub fn new(
        tenon_end: ReferenceEnd,
        tenon_thickness: Scalar,
        tenon_length: Scalar,
        tenon_depth: Scalar,
    ) -> Self {
        Self {
            tenon_end,
            tenon_thickness,
            tenon_length,
            tenon_depth,
            tenon_offset: None,
            mortise_depth: None,
            peg: None,
            wedges: None,
        }
    }

    /// Shift the tenon off the centerline.
    pub fn with_tenon_offset(mut self, offset: Vec2) -> Self {
        self.tenon_offset = Some(offset);
        self
    }

    /// Cut the mortise deeper than the tenon.
    pub fn with_mortise_depth(mut self, depth: Scalar) -> Self {
        self.mortise_depth = Some(depth);
        self
    }

    /// Peg the joint.
    pub fn with_peg(mut self, peg: DrawborePeg) -> Self {
        self.peg = Some(peg);
        self
    }

    /// Wedge the tenon.
    pub fn with_wedges(mut self, wedges: TenonWedges) -> Self {
        self.wedges = Some(wedges);
        self
    }
}

/// Cut a tenon on `tenon` and the matching mortise in `mortise`.
///
/// Fails with [`JointError::NotFaceAligned`] unless the timbers are
/// face-aligned, [`JointError::MortiseOnEndFace`] if the tenon points at an
/// end of the mortise timber, [`JointError::TenonDoesNotReachMortise`] if
/// the tenon end stops short of the mortise face and
/// [`JointError::TenonNotContained`] if the mortise pocket would leave the
/// mortise timber.
pub fn cut_simple_mortise_and_tenon_joint(
    mortise: &Arc<Timber>,
    tenon: &Arc<Timber>,
    params: &MortiseAndTenonParams,
) -> Result<Joint> {
    if Arc::ptr_eq(mortise, tenon) {
        return Err(JointError::InvalidParameter(
            "a timber cannot be joined to itself".to_string(),
        ));
    }
    if !mortise.is_face_aligned_with(tenon) {
        return Err(JointError::NotFaceAligned);
    }

    let end_dir = tenon.face_direction(params.tenon_end);
    let mortise_face = mortise
        .closest_oriented_face(&-end_dir.clone())
        .as_long_face()
        .ok_or(JointError::MortiseOnEndFace)?;

    let shoulder_distance = shoulder_distance(mortise, tenon, mortise_face, params)?;
    let mut standard = StandardTenon::new(
        ShoulderPlane::square(params.tenon_end, shoulder_distance),
        params.tenon_thickness.clone(),
        params.tenon_length.clone(),
        params.tenon_depth.clone(),
    );
    if let Some(offset) = &params.tenon_offset {
        standard = standard.with_position(TenonPosition::Centerline(offset.clone()));
    }

    let mortise_depth = params
        .mortise_depth
        .clone()
        .unwrap_or_else(|| params.tenon_depth.clone());
    if mortise_depth < params.tenon_depth {
        return Err(JointError::InvalidParameter(format!(
            "mortise depth {mortise_depth} is shallower than the tenon depth {}",
            params.tenon_depth
        )));
    }

    // the pocket is the tenon cross-section run to the mortise depth
    let pocket_world = standard
        .prism_local(tenon, &mortise_depth)?
        .transformed(tenon.orientation(), tenon.bottom_position());
    let pocket = to_local(mortise, &pocket_world).bounds()?;
    if !local_bounds(mortise).contains_aabb(&pocket) {
        return Err(JointError::TenonNotContained);
    }
    standard.check_within(tenon)?;

    let mortise_cut = mortise_from_pocket(mortise, mortise_face, &pocket, mortise_depth)
        .to_csg_local(mortise)?;
    let tenon_cut = standard.cut_local(tenon)?;

    let mut joint = Joint::new()
        .with_cut(mortise, Cut::new("mortise", mortise_cut, None))
        .with_cut(tenon, Cut::new("tenon", tenon_cut, Some(params.tenon_end)));
    if let Some(peg) = &params.peg {
        add_pegs(&mut joint, mortise, tenon, &standard, peg, params)?;
    }
    if let Some(wedges) = &params.wedges {
        add_wedges(&mut joint, tenon, &standard, wedges, params)?;
    }

    tracing::debug!(
        mortise = mortise.name().unwrap_or("<unnamed>"),
        tenon = tenon.name().unwrap_or("<unnamed>"),
        face = ?mortise_face,
        "cut mortise and tenon"
    );
    Ok(joint)
}

/// Distance from the tenon end back to the mortise face, along the tenon
/// centerline (shifted by the tenon offset).
fn shoulder_distance(
    mortise: &Timber,
    tenon: &Timber,
    mortise_face: ReferenceLongFace,
    params: &MortiseAndTenonParams,
) -> Result<Scalar> {
    let offset = params.tenon_offset.clone().unwrap_or_else(Vec2::zeros);
    let end_z = DistanceFromEnd::new(params.tenon_end, integer(0)).distance_from_bottom(tenon.length());
    let start = tenon.local_to_global(&vec3(offset.x.clone(), offset.y.clone(), end_z));

    let normal = mortise.face_direction(mortise_face);
    let back_along_tenon = -tenon.face_direction(params.tenon_end);
    let denom = back_along_tenon.dot(&normal);
    if !denom.is_positive() {
        return Err(JointError::NotFaceAligned);
    }
    let t = (mortise.face_center(mortise_face) - &start).dot(&normal) / denom;
    if !t.is_positive() {
        return Err(JointError::TenonDoesNotReachMortise);
    }
    Ok(t)
}

/// Carry a world-space node into a timber's local frame.
fn to_local(timber: &Timber, node: &CsgNode) -> CsgNode {
    let inverse = timber.orientation().invert();
    let shift = -inverse.apply(timber.bottom_position());
    node.transformed(&inverse, &shift)
}

/// The mortise that matches a pocket box in the mortise timber's frame.
fn mortise_from_pocket(
    mortise: &Timber,
    face: ReferenceLongFace,
    pocket: &Aabb,
    depth: Scalar,
) -> StandardMortise {
    let two = integer(2);
    let size = pocket.size();
    let center = (&pocket.min + &pocket.max) / two.clone();
    let (across, lateral) = match face {
        ReferenceLongFace::Right | ReferenceLongFace::Left => (
            size.y.clone(),
            DistanceFromLongFace::new(
                ReferenceLongFace::Forward,
                &mortise.size().y / &two - &center.y,
            ),
        ),
        ReferenceLongFace::Forward | ReferenceLongFace::Back => (
            size.x.clone(),
            DistanceFromLongFace::new(
                ReferenceLongFace::Right,
                &mortise.size().x / &two - &center.x,
            ),
        ),
    };
    StandardMortise::new(
        face,
        DistanceFromEnd::new(ReferenceEnd::Bottom, center.z.clone()),
        across,
        size.z.clone(),
        depth,
    )
    .with_long_face_position(lateral)
}

fn add_pegs(
    joint: &mut Joint,
    mortise: &Arc<Timber>,
    tenon: &Arc<Timber>,
    standard: &StandardTenon,
    peg: &DrawborePeg,
    params: &MortiseAndTenonParams,
) -> Result<()> {
    if !peg.size.is_positive() || peg.drawbore_offset.is_negative() {
        return Err(JointError::InvalidParameter(
            "peg size must be positive and the drawbore offset not negative".to_string(),
        ));
    }
    let face_dir = tenon.face_direction(peg.tenon_face);
    let entry_face = mortise.closest_oriented_face(&face_dir);
    if entry_face.as_long_face().is_none() {
        return Err(JointError::InvalidParameter(format!(
            "pegs through {:?} would run along the mortise timber",
            peg.tenon_face
        )));
    }

    let end_dir = tenon.face_direction(params.tenon_end);
    let sideways = tenon.face_direction(peg.tenon_face.rotate_left());
    let forward_length = peg
        .depth
        .clone()
        .unwrap_or_else(|| mortise.size_in_face_normal_axis(entry_face));
    if !forward_length.is_positive() {
        return Err(JointError::InvalidParameter(
            "peg depth must be positive".to_string(),
        ));
    }
    let orientation = Orientation::from_directions(&-face_dir, &end_dir)?;
    let shoulder = tenon.local_to_global(
        &standard
            .shoulder_plane
            .point_over(tenon, &standard.cross_section_center(tenon))?,
    );
    let draw: Vec3 = scale(&end_dir, &-peg.drawbore_offset.clone());

    for (from_shoulder, from_centerline) in &peg.positions {
        if !from_shoulder.is_positive() || from_shoulder >= &params.tenon_depth {
            return Err(JointError::InvalidParameter(format!(
                "peg at {from_shoulder} from the shoulder misses a tenon of depth {}",
                params.tenon_depth
            )));
        }
        let on_tenon = &shoulder + scale(&end_dir, from_shoulder) + scale(&sideways, from_centerline);
        let placed = Peg {
            position: mortise.project_onto_face(&on_tenon, entry_face),
            orientation: orientation.clone(),
            shape: peg.shape,
            size: peg.size.clone(),
            forward_length: forward_length.clone(),
            stickout_length: &forward_length / integer(2),
        };
        let hole = placed.hole_csg();
        let drawn = hole.transformed(&Orientation::identity(), &draw);
        joint.push(
            mortise,
            TimberOperation::Cut(Cut::new("peg hole", to_local(mortise, &hole), None)),
        );
        joint.push(
            tenon,
            TimberOperation::Cut(Cut::new("drawbore hole", to_local(tenon, &drawn), None)),
        );
        joint.push(mortise, TimberOperation::Accessory(Accessory::Peg(placed)));
    }
    Ok(())
}

fn add_wedges(
    joint: &mut Joint,
    tenon: &Arc<Timber>,
    standard: &StandardTenon,
    wedges: &TenonWedges,
    params: &MortiseAndTenonParams,
) -> Result<()> {
    if wedges.length > params.tenon_depth || wedges.height > params.tenon_length {
        return Err(JointError::InvalidParameter(
            "wedges must fit within the tenon depth and length".to_string(),
        ));
    }
    let end_dir = tenon.face_direction(params.tenon_end);
    let across = tenon.width_direction();
    let orientation = Orientation::from_directions(&-end_dir.clone(), &across)?;
    let shoulder = tenon.local_to_global(
        &standard
            .shoulder_plane
            .point_over(tenon, &standard.cross_section_center(tenon))?,
    );
    let tenon_end = &shoulder + scale(&end_dir, &params.tenon_depth);
    let half_thickness = &params.tenon_thickness / integer(2);

    for offset in &wedges.positions {
        if offset.abs() + &wedges.base_width / integer(2) > half_thickness {
            return Err(JointError::InvalidParameter(format!(
                "wedge at {offset} leaves a tenon of thickness {}",
                params.tenon_thickness
            )));
        }
        let wedge = Wedge {
            position: &tenon_end + scale(&across, offset),
            orientation: orientation.clone(),
            base_width: wedges.base_width.clone(),
            tip_width: wedges.tip_width.clone(),
            height: wedges.height.clone(),
            length: wedges.length.clone(),
        };
        wedge.validate()?;
        joint.push(
            tenon,
            TimberOperation::Cut(Cut::new("wedge kerf", to_local(tenon, &wedge.to_csg()), None)),
        );
        joint.push(tenon, TimberOperation::Accessory(Accessory::Wedge(wedge)));
    }
    tracing::debug!(count = wedges.positions.len(), "wedged tenon");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kerf_kernel_math::{east, north, rational, up, vec2, vec3i};
    use kerf_kernel_timber::create_timber;

    use crate::Frame;

    /// Sill along +X: local X north, local Y up.
    fn sill() -> Arc<Timber> {
        Arc::new(
            create_timber(
                vec3i(0, 0, 0),
                integer(4),
                vec2(rational(1, 5), rational(1, 5)),
                &east(),
                &north(),
            )
            .unwrap()
            .with_name("sill"),
        )
    }

    /// Post standing on the sill centerline: local X north, local Y west.
    fn post_at(z: Scalar) -> Arc<Timber> {
        Arc::new(
            create_timber(
                vec3(integer(2), integer(0), z),
                integer(2),
                vec2(rational(3, 20), rational(3, 20)),
                &up(),
                &north(),
            )
            .unwrap()
            .with_name("post"),
        )
    }

    fn params() -> MortiseAndTenonParams {
        MortiseAndTenonParams::new(
            ReferenceEnd::Bottom,
            rational(1, 20),
            rational(1, 10),
            rational(1, 10),
        )
    }

    fn cut_labeled<'a>(joint: &'a Joint, timber: &'a Arc<Timber>, label: &str) -> &'a Cut {
        joint
            .cuts_for(timber)
            .find(|c| c.label == label)
            .unwrap()
    }

    #[test]
    fn test_mortise_sits_in_top_face_of_sill() {
        let (s, p) = (sill(), post_at(integer(0)));
        let joint = cut_simple_mortise_and_tenon_joint(&s, &p, &params()).unwrap();
        let mortise = cut_labeled(&joint, &s, "mortise");
        let b = mortise.negative.bounds().unwrap();
        assert_eq!(b.min, vec3(rational(-1, 40), integer(0), rational(39, 20)));
        assert_eq!(b.max, vec3(rational(1, 40), rational(1, 10), rational(41, 20)));
        assert!(local_bounds(&s).contains_aabb(&b));
        assert_eq!(mortise.end_cut, None);
    }

    #[test]
    fn test_tenon_cut_shapes_post_bottom() {
        let (s, p) = (sill(), post_at(integer(0)));
        let joint = cut_simple_mortise_and_tenon_joint(&s, &p, &params()).unwrap();
        let tenon = cut_labeled(&joint, &p, "tenon");
        assert_eq!(tenon.end_cut, Some(ReferenceEnd::Bottom));

        let frame = Frame::from_joints(&[joint]);
        let rendered = frame.find(&p).unwrap().render_csg_local();
        // tenon, cheek, body
        assert!(rendered.contains_point(&vec3(integer(0), integer(0), rational(1, 20))));
        assert!(!rendered.contains_point(&vec3(rational(1, 20), integer(0), rational(1, 20))));
        assert!(rendered.contains_point(&vec3(rational(1, 20), integer(0), rational(1, 2))));
        assert!(!rendered.contains_point(&vec3(integer(0), integer(0), integer(-1))));
    }

    #[test]
    fn test_thick_tenon_is_not_contained() {
        let (s, p) = (sill(), post_at(integer(0)));
        let fat = MortiseAndTenonParams {
            tenon_thickness: rational(1, 4),
            ..params()
        };
        assert_eq!(
            cut_simple_mortise_and_tenon_joint(&s, &p, &fat).unwrap_err(),
            JointError::TenonNotContained
        );
    }

    #[test]
    fn test_mortise_depth_options() {
        let (s, p) = (sill(), post_at(integer(0)));
        let through = params().with_mortise_depth(rational(1, 5));
        let joint = cut_simple_mortise_and_tenon_joint(&s, &p, &through).unwrap();
        let b = cut_labeled(&joint, &s, "mortise").negative.bounds().unwrap();
        assert_eq!(b.min.y, rational(-1, 10));

        let too_deep = params().with_mortise_depth(rational(1, 4));
        assert_eq!(
            cut_simple_mortise_and_tenon_joint(&s, &p, &too_deep).unwrap_err(),
            JointError::TenonNotContained
        );
        let shallow = params().with_mortise_depth(rational(1, 20));
        assert!(matches!(
            cut_simple_mortise_and_tenon_joint(&s, &p, &shallow),
            Err(JointError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_offset_tenon_moves_mortise() {
        let (s, p) = (sill(), post_at(integer(0)));
        let shifted = params().with_tenon_offset(vec2(rational(1, 40), integer(0)));
        let joint = cut_simple_mortise_and_tenon_joint(&s, &p, &shifted).unwrap();
        let mortise = &cut_labeled(&joint, &s, "mortise").negative;
        assert!(mortise.contains_point(&vec3(rational(1, 25), rational(1, 20), integer(2))));
        assert!(!mortise.contains_point(&vec3(rational(-1, 100), rational(1, 20), integer(2))));
    }

    #[test]
    fn test_tenon_must_reach_mortise() {
        let s = sill();
        let floating = post_at(rational(1, 2));
        assert_eq!(
            cut_simple_mortise_and_tenon_joint(&s, &floating, &params()).unwrap_err(),
            JointError::TenonDoesNotReachMortise
        );
    }

    #[test]
    fn test_tenon_into_end_face_fails() {
        let s = sill();
        let beam = Arc::new(
            create_timber(
                vec3i(-2, 0, 0),
                rational(41, 20),
                vec2(rational(3, 20), rational(3, 20)),
                &east(),
                &north(),
            )
            .unwrap(),
        );
        let p = MortiseAndTenonParams {
            tenon_end: ReferenceEnd::Top,
            ..params()
        };
        assert_eq!(
            cut_simple_mortise_and_tenon_joint(&s, &beam, &p).unwrap_err(),
            JointError::MortiseOnEndFace
        );
    }

    #[test]
    fn test_skewed_timbers_are_not_face_aligned() {
        let s = sill();
        let leaning = Arc::new(
            create_timber(
                vec3i(2, 0, 0),
                integer(2),
                vec2(rational(3, 20), rational(3, 20)),
                &vec3i(3, 0, 4),
                &north(),
            )
            .unwrap(),
        );
        assert_eq!(
            cut_simple_mortise_and_tenon_joint(&s, &leaning, &params()).unwrap_err(),
            JointError::NotFaceAligned
        );
        assert!(matches!(
            cut_simple_mortise_and_tenon_joint(&s, &s, &params()),
            Err(JointError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_drawbore_peg_offsets_tenon_hole() {
        let (s, p) = (sill(), post_at(integer(0)));
        let pegged = params().with_peg(
            DrawborePeg::new(PegShape::Round, ReferenceLongFace::Right, rational(1, 50))
                .with_position(rational(1, 20), integer(0))
                .with_drawbore_offset(rational(1, 200)),
        );
        let joint = cut_simple_mortise_and_tenon_joint(&s, &p, &pegged).unwrap();

        let peg_hole = &cut_labeled(&joint, &s, "peg hole").negative;
        // enters on the north face and runs through the sill
        assert!(peg_hole.contains_point(&vec3(rational(9, 100), rational(1, 20), integer(2))));
        assert!(peg_hole.contains_point(&vec3(rational(-9, 100), rational(1, 20), integer(2))));

        // the tenon hole sits 5 mm closer to the shoulder
        let drawn = &cut_labeled(&joint, &p, "drawbore hole").negative;
        assert!(drawn.contains_point(&vec3(integer(0), integer(0), rational(64, 1000))));
        assert!(!drawn.contains_point(&vec3(integer(0), integer(0), rational(44, 1000))));

        let accessories: Vec<_> = joint.accessories().collect();
        assert_eq!(accessories.len(), 1);
        match accessories[0] {
            Accessory::Peg(peg) => {
                assert_eq!(peg.position, vec3(integer(2), rational(1, 10), rational(1, 20)));
                assert_eq!(peg.stickout_length, rational(1, 10));
            }
            other => panic!("expected a peg, got {other:?}"),
        }
    }

    #[test]
    fn test_peg_outside_tenon_fails() {
        let (s, p) = (sill(), post_at(integer(0)));
        let pegged = params().with_peg(
            DrawborePeg::new(PegShape::Square, ReferenceLongFace::Right, rational(1, 50))
                .with_position(rational(1, 5), integer(0)),
        );
        assert!(matches!(
            cut_simple_mortise_and_tenon_joint(&s, &p, &pegged),
            Err(JointError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_wedges_kerf_the_tenon_end() {
        let (s, p) = (sill(), post_at(integer(0)));
        let wedged = params().with_wedges(
            TenonWedges::new(rational(1, 50), integer(0), rational(1, 10), rational(1, 20))
                .with_position(integer(0)),
        );
        let joint = cut_simple_mortise_and_tenon_joint(&s, &p, &wedged).unwrap();

        let accessories: Vec<_> = joint.accessories().collect();
        assert_eq!(accessories.len(), 1);
        let wedge = match accessories[0] {
            Accessory::Wedge(wedge) => wedge,
            other => panic!("expected a wedge, got {other:?}"),
        };
        // thick end flush with the post bottom, tip pointing up
        let solid = wedge.to_csg();
        assert!(solid.contains_point(&vec3(integer(2), integer(0), rational(1, 100))));
        assert!(!solid.contains_point(&vec3(integer(2), integer(0), rational(6, 100))));

        let kerf = &cut_labeled(&joint, &p, "wedge kerf").negative;
        assert!(kerf.contains_point(&vec3(integer(0), integer(0), rational(1, 100))));

        let frame = Frame::from_joints(&[joint]);
        let rendered = frame.find(&p).unwrap().render_csg_local();
        assert!(!rendered.contains_point(&vec3(integer(0), integer(0), rational(1, 100))));
        assert!(rendered.contains_point(&vec3(rational(1, 50), integer(0), rational(1, 100))));
        assert_eq!(frame.accessories().len(), 1);
    }

    #[test]
    fn test_wedge_must_fit_the_tenon() {
        let (s, p) = (sill(), post_at(integer(0)));
        let too_wide = params().with_wedges(
            TenonWedges::new(rational(1, 20), integer(0), rational(1, 10), rational(1, 20))
                .with_position(rational(1, 50)),
        );
        assert!(matches!(
            cut_simple_mortise_and_tenon_joint(&s, &p, &too_wide),
            Err(JointError::InvalidParameter(_))
        ));
        let too_long = params().with_wedges(
            TenonWedges::new(rational(1, 50), integer(0), rational(1, 10), rational(1, 5))
                .with_position(integer(0)),
        );
        assert!(cut_simple_mortise_and_tenon_joint(&s, &p, &too_long).is_err());
    }
}
