//! End-to-end frame construction through the facade.

use std::sync::Arc;

use kerf_kernel::kerf_kernel_math::{east, integer, north, rational, up, vec2, vec3, vec3i, Vec3};
use kerf_kernel::{
    create_horizontal_timber_on_footprint_side, create_timber,
    create_vertical_timber_on_footprint_corner, cut_multi_tenon,
    cut_basic_butt_joint_on_face_aligned_timbers, cut_simple_mortise_and_tenon_joint, join_timbers,
    render_frame, Accessory, DrawborePeg, Footprint, FootprintLocation, Frame, JoinTimbersParams,
    JointError, KernelSettings, MortiseAndTenonParams, PegShape, ReferenceEnd, ReferenceLongFace,
    ShoulderPlane, StandardTenon, TenonWedges, Timber, Tolerance,
};

fn square() -> Footprint {
    Footprint::new(vec![
        vec2(integer(0), integer(0)),
        vec2(integer(4), integer(0)),
        vec2(integer(4), integer(4)),
        vec2(integer(0), integer(4)),
    ])
}

fn corner_post(corner: usize, location: FootprintLocation) -> Arc<Timber> {
    Arc::new(
        create_vertical_timber_on_footprint_corner(
            &square(),
            corner,
            rational(5, 2),
            location,
            vec2(rational(3, 20), rational(3, 20)),
        )
        .unwrap()
        .with_name(format!("post {corner}")),
    )
}

fn front_sill() -> Arc<Timber> {
    Arc::new(
        create_horizontal_timber_on_footprint_side(
            &square(),
            0,
            FootprintLocation::Inside,
            vec2(rational(1, 5), rational(3, 10)),
            None,
        )
        .unwrap()
        .with_name("front sill"),
    )
}

fn square_tenon() -> MortiseAndTenonParams {
    MortiseAndTenonParams::new(
        ReferenceEnd::Bottom,
        rational(1, 20),
        rational(1, 20),
        rational(1, 10),
    )
}

#[test]
fn test_posts_tenoned_into_sill() {
    let sill = front_sill();
    let left = corner_post(0, FootprintLocation::Inside);
    let right = corner_post(1, FootprintLocation::Inside);

    let j0 = cut_simple_mortise_and_tenon_joint(&sill, &left, &square_tenon()).unwrap();
    let j1 = cut_simple_mortise_and_tenon_joint(&sill, &right, &square_tenon()).unwrap();
    let frame = Frame::from_joints(&[j0, j1]);

    assert_eq!(frame.cut_timbers().len(), 3);
    assert!(Arc::ptr_eq(frame.cut_timbers()[0].timber(), &sill));
    assert_eq!(frame.find(&sill).unwrap().cuts().len(), 2);

    // every mortise stays inside the sill
    let sill_box = sill.bounding_box();
    for cut in frame.find(&sill).unwrap().cuts() {
        let world = cut
            .negative
            .transformed(sill.orientation(), sill.bottom_position());
        assert!(sill_box.contains_aabb(&world.bounds().unwrap()));
    }

    // left post: centerline at (0.075, 0.075), shoulder on the sill top at z = 0.1
    let sill_solid = frame.find(&sill).unwrap().render_csg_global();
    let post_solid = frame.find(&left).unwrap().render_csg_global();
    let in_pocket = vec3(rational(3, 40), rational(3, 40), rational(1, 20));
    assert!(!sill_solid.contains_point(&in_pocket));
    assert!(post_solid.contains_point(&in_pocket));
    assert!(sill_solid.contains_point(&vec3(rational(3, 40), rational(3, 40), rational(-1, 20))));

    // beside the tenon, below the shoulder, the post is cut away
    let beside = vec3(rational(3, 40), rational(3, 200), rational(1, 20));
    assert!(!post_solid.contains_point(&beside));
    assert!(post_solid.contains_point(&vec3(rational(3, 40), rational(3, 200), integer(1))));
}

#[test]
fn test_post_off_the_sill_is_not_contained() {
    let sill = front_sill();
    let outside = corner_post(0, FootprintLocation::Outside);
    assert!(matches!(
        cut_simple_mortise_and_tenon_joint(&sill, &outside, &square_tenon()),
        Err(JointError::TenonNotContained)
    ));
}

#[test]
fn test_inside_and_outside_corner_posts_swap_corners() {
    let inside = corner_post(0, FootprintLocation::Inside).bounding_box();
    let outside = corner_post(0, FootprintLocation::Outside).bounding_box();
    assert_eq!(inside.min, vec3i(0, 0, 0));
    assert_eq!(outside.max, vec3(integer(0), integer(0), rational(5, 2)));
    assert_eq!(
        inside.max,
        vec3(rational(3, 20), rational(3, 20), rational(5, 2))
    );
    assert_eq!(outside.min, vec3(rational(-3, 20), rational(-3, 20), integer(0)));
}

#[test]
fn test_girt_between_corner_posts() {
    let left = corner_post(0, FootprintLocation::Inside);
    let right = corner_post(1, FootprintLocation::Inside);
    let params = JoinTimbersParams::at(integer(2)).location_on_b(integer(2));
    let joined = join_timbers(&left, &right, &params).unwrap();
    assert!(joined.diagnostics.is_empty());
    let girt = joined.value;

    assert_eq!(girt.length(), &rational(77, 20));
    assert_eq!(girt.length_direction(), east());
    assert!(girt.orientation().is_orthonormal(&Tolerance::default()));

    // zero offset keeps the girt on the line between connection points
    let p1 = left.centerline_position_from_bottom(&integer(2));
    let p2 = right.centerline_position_from_bottom(&integer(2));
    let tol = Tolerance::default();
    assert!(tol.points_equal(girt.bottom_position(), &p1));
    assert!(tol.points_equal(&girt.top_center(), &p2));
}

#[test]
fn test_extent_contains_every_timber() {
    let sill = front_sill();
    let left = corner_post(0, FootprintLocation::Inside);
    let right = corner_post(1, FootprintLocation::Inside);
    let girt = Arc::new(
        join_timbers(
            &left,
            &right,
            &JoinTimbersParams::at(integer(2)).location_on_b(integer(2)),
        )
        .unwrap()
        .into_value(),
    );

    let mut frame = Frame::from_joints(&[
        cut_simple_mortise_and_tenon_joint(&sill, &left, &square_tenon()).unwrap(),
    ]);
    frame.add_timber(Arc::clone(&right));
    frame.add_timber(Arc::clone(&girt));
    assert_eq!(frame.cut_timbers().len(), 4);

    let settings = KernelSettings::default();
    let extent = frame.structure_extent(&settings.padding().unwrap()).unwrap();
    for t in [&sill, &left, &right, &girt] {
        for c in t.corners() {
            assert!(extent.contains(&c));
        }
    }

    let rendered = render_frame(&frame, &settings).unwrap();
    assert_eq!(rendered.timbers.len(), 4);
    assert_eq!(rendered.timbers[1].name.as_deref(), Some("post 0"));
    for t in &rendered.timbers {
        let far = t.transform.apply_point(&nalgebra::Vector3::new(0.0, 0.0, 1.0));
        assert!(rendered.extent_contains(&far, &settings));
    }
}

#[test]
fn test_multi_tenon_needs_one_shoulder() {
    let post = corner_post(2, FootprintLocation::Inside);
    let a = StandardTenon::new(
        ShoulderPlane::square(ReferenceEnd::Top, rational(1, 10)),
        rational(1, 50),
        rational(1, 20),
        rational(1, 10),
    );
    let b = StandardTenon::new(
        ShoulderPlane::square(ReferenceEnd::Top, rational(1, 5)),
        rational(1, 50),
        rational(1, 20),
        rational(1, 10),
    );
    assert!(matches!(
        cut_multi_tenon(&post, &[a.clone(), b]),
        Err(JointError::ShoulderPlaneMismatch)
    ));
    assert!(cut_multi_tenon(&post, &[a]).is_ok());
}

#[test]
fn test_pegged_joint_renders_its_peg() {
    let sill = Arc::new(
        create_timber(
            vec3i(0, 0, 0),
            integer(4),
            vec2(rational(1, 5), rational(1, 5)),
            &east(),
            &north(),
        )
        .unwrap(),
    );
    let post = Arc::new(
        create_timber(
            vec3i(2, 0, 0),
            integer(2),
            vec2(rational(3, 20), rational(3, 20)),
            &up(),
            &north(),
        )
        .unwrap(),
    );
    let params = MortiseAndTenonParams::new(
        ReferenceEnd::Bottom,
        rational(1, 20),
        rational(1, 10),
        rational(1, 10),
    )
    .with_peg(
        DrawborePeg::new(PegShape::Round, ReferenceLongFace::Right, rational(1, 50))
            .with_position(rational(1, 20), integer(0)),
    );
    let joint = cut_simple_mortise_and_tenon_joint(&sill, &post, &params).unwrap();
    let frame = Frame::from_joints(&[joint]);
    assert_eq!(frame.accessories().len(), 1);
    assert!(matches!(frame.accessories()[0], Accessory::Peg(_)));

    let rendered = render_frame(&frame, &KernelSettings::default()).unwrap();
    assert_eq!(rendered.accessories.len(), 1);
    let peg_center: Vec3 = vec3(integer(2), integer(0), rational(1, 20));
    assert!(rendered.accessories[0].contains_point(&peg_center));
    // the sill is bored where the peg passes
    assert!(!frame
        .find(&sill)
        .unwrap()
        .render_csg_global()
        .contains_point(&vec3(integer(2), rational(9, 100), rational(1, 20))));
}

#[test]
fn test_settings_drive_the_extent() {
    let settings = KernelSettings::from_toml_str(
        r#"
extent_padding = 1.0
sqrt_digits = 20
"#,
    )
    .unwrap();
    let mut frame = Frame::default();
    frame.add_timber(corner_post(0, FootprintLocation::Inside));
    let (min, max) = kerf_kernel::structure_extent_f64(&frame, &settings)
        .unwrap()
        .unwrap();
    assert!(settings.floats_equal(min.x, -1.0));
    assert!(settings.floats_equal(max.z, 3.5));
}

#[test]
fn test_settings_precision_drives_brace_length() {
    let left = corner_post(0, FootprintLocation::Inside);
    let right = corner_post(1, FootprintLocation::Inside);
    let brace = |settings: &KernelSettings| {
        let params = JoinTimbersParams::at(integer(1))
            .location_on_b(integer(2))
            .precision(settings.precision());
        join_timbers(&left, &right, &params).unwrap().into_value()
    };

    let coarse = brace(&KernelSettings::from_toml_str("sqrt_digits = 3").unwrap());
    let fine = brace(&KernelSettings::default());
    assert!((coarse.length() * integer(1000)).is_integer());
    assert!(!(fine.length() * integer(1000)).is_integer());
    assert!(coarse.length() < fine.length());
    let tol = Tolerance {
        linear: rational(1, 100),
        parallel: rational(1, 100),
    };
    assert!(tol.scalars_equal(coarse.length(), fine.length()));
}

#[test]
fn test_butted_and_wedged_posts_share_a_sill() {
    let sill = Arc::new(
        create_timber(
            vec3i(0, 0, 0),
            integer(4),
            vec2(rational(1, 5), rational(1, 5)),
            &east(),
            &north(),
        )
        .unwrap(),
    );
    let post = |x: i64| {
        Arc::new(
            create_timber(
                vec3i(x, 0, 0),
                integer(2),
                vec2(rational(3, 20), rational(3, 20)),
                &up(),
                &north(),
            )
            .unwrap(),
        )
    };
    let (butted, wedged) = (post(1), post(3));

    let butt = cut_basic_butt_joint_on_face_aligned_timbers(&sill, &butted, ReferenceEnd::Bottom).unwrap();
    let params = MortiseAndTenonParams::new(
        ReferenceEnd::Bottom,
        rational(1, 20),
        rational(1, 10),
        rational(1, 10),
    )
    .with_wedges(
        TenonWedges::new(rational(1, 50), integer(0), rational(1, 10), rational(1, 20))
            .with_position(integer(0)),
    );
    let tenon = cut_simple_mortise_and_tenon_joint(&sill, &wedged, &params).unwrap();
    let frame = Frame::from_joints(&[butt, tenon]);
    assert_eq!(frame.cut_timbers().len(), 3);
    // only the mortise touches the sill
    assert_eq!(frame.find(&sill).unwrap().cuts().len(), 1);

    let butted_solid = frame.find(&butted).unwrap().render_csg_global();
    assert!(!butted_solid.contains_point(&vec3(integer(1), integer(0), rational(1, 20))));
    assert!(butted_solid.contains_point(&vec3(integer(1), integer(0), rational(1, 5))));

    let rendered = render_frame(&frame, &KernelSettings::default()).unwrap();
    assert_eq!(rendered.accessories.len(), 1);
    assert!(matches!(frame.accessories()[0], Accessory::Wedge(_)));
    assert!(rendered.accessories[0].contains_point(&vec3(integer(3), integer(0), rational(1, 100))));
}
