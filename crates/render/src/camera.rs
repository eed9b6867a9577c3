use glam::{Mat4, Vec3};
use prism_common::Transform;
use prism_input::CameraIntent;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_4, TAU};

use crate::error::CameraError;

/// Projection mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Projection {
    #[default]
    Perspective,
    Orthographic,
}

/// Construction parameters for a [`Camera`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraDesc {
    pub position: Vec3,
    /// Pitch, yaw, roll in radians.
    pub rotation: Vec3,
    pub aspect_ratio: f32,
    /// World units per second.
    pub move_speed: f32,
    /// Radians per pixel of pointer movement.
    pub rotation_speed: f32,
    /// Vertical field of view in radians.
    pub field_of_view: f32,
    pub near_clip: f32,
    pub far_clip: f32,
    pub projection: Projection,
    /// Visible height in world units when orthographic.
    pub ortho_height: f32,
}

impl Default for CameraDesc {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, -5.0),
            rotation: Vec3::ZERO,
            aspect_ratio: 1.78,
            move_speed: 5.0,
            rotation_speed: 0.003,
            field_of_view: FRAC_PI_4,
            near_clip: 0.01,
            far_clip: 100.0,
            projection: Projection::Perspective,
            ortho_height: 10.0,
        }
    }
}

/// A free-flying camera with a left-handed view and projection.
///
/// The view matrix is rebuilt on every [`update`](Camera::update). The
/// projection is rebuilt immediately whenever one of its inputs changes.
#[derive(Debug, Clone)]
pub struct Camera {
    transform: Transform,
    view: Mat4,
    projection_matrix: Mat4,
    aspect_ratio: f32,
    move_speed: f32,
    rotation_speed: f32,
    field_of_view: f32,
    near_clip: f32,
    far_clip: f32,
    projection: Projection,
    ortho_height: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::build(CameraDesc::default())
    }
}

fn check_clip(value: f32, opposite: f32) -> Result<(), CameraError> {
    if value.is_nan() || value < 0.0 {
        return Err(CameraError::NegativeClip(value));
    }
    if value == opposite {
        return Err(CameraError::CoincidentClip(value));
    }
    Ok(())
}

impl Camera {
    /// Create a camera, rejecting negative or coincident clip planes and a
    /// non-positive orthographic height.
    pub fn new(desc: CameraDesc) -> Result<Self, CameraError> {
        check_clip(desc.near_clip, desc.far_clip)?;
        check_clip(desc.far_clip, desc.near_clip)?;
        if desc.ortho_height.is_nan() || desc.ortho_height <= 0.0 {
            return Err(CameraError::InvalidOrthoHeight(desc.ortho_height));
        }
        Ok(Self::build(desc))
    }

    fn build(desc: CameraDesc) -> Self {
        let mut camera = Self {
            transform: Transform::from_parts(desc.position, desc.rotation, Vec3::ONE),
            view: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
            aspect_ratio: desc.aspect_ratio,
            move_speed: desc.move_speed,
            rotation_speed: desc.rotation_speed,
            field_of_view: desc.field_of_view,
            near_clip: desc.near_clip,
            far_clip: desc.far_clip,
            projection: desc.projection,
            ortho_height: desc.ortho_height,
        };
        camera.update_view_matrix();
        camera.rebuild_projection();
        camera
    }

    /// Apply one frame of movement and look input, then rebuild the view.
    ///
    /// Forward and strafe move relative to the current facing, lift moves
    /// along world Y. Look deltas rotate pitch (vertical) and yaw
    /// (horizontal); pitch is then held within [-2π, 2π].
    pub fn update(&mut self, dt: f32, intent: &CameraIntent) {
        let step = self.move_speed * dt;
        if intent.forward != 0.0 || intent.strafe != 0.0 {
            self.transform
                .move_relative(Vec3::new(intent.strafe * step, 0.0, intent.forward * step));
        }
        if intent.lift != 0.0 {
            self.transform
                .move_absolute(Vec3::new(0.0, intent.lift * step, 0.0));
        }
        if let Some(delta) = intent.look {
            let delta = delta * self.rotation_speed;
            self.transform.rotate(Vec3::new(delta.y, delta.x, 0.0));
        }
        self.clamp_pitch();
        self.update_view_matrix();
    }

    fn clamp_pitch(&mut self) {
        let rotation = self.transform.rotation();
        if rotation.x > TAU {
            self.transform.set_rotation(Vec3::new(TAU, rotation.y, rotation.z));
        } else if rotation.x < -TAU {
            self.transform.set_rotation(Vec3::new(-TAU, rotation.y, rotation.z));
        }
    }

    /// Rebuild the view matrix from the transform's position and facing.
    ///
    /// World Y is the up reference. When looking straight up or down the
    /// transform's own up axis is used instead.
    pub fn update_view_matrix(&mut self) {
        let position = self.transform.position();
        let forward = self.transform.forward();
        let up = if forward.cross(Vec3::Y).length_squared() < 1e-8 {
            self.transform.up()
        } else {
            Vec3::Y
        };
        self.view = Mat4::look_to_lh(position, forward, up);
    }

    /// Store a new aspect ratio (e.g. after a resize) and rebuild the projection.
    pub fn update_projection_matrix(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
        self.rebuild_projection();
    }

    fn rebuild_projection(&mut self) {
        self.projection_matrix = match self.projection {
            Projection::Perspective => Mat4::perspective_lh(
                self.field_of_view,
                self.aspect_ratio,
                self.near_clip,
                self.far_clip,
            ),
            Projection::Orthographic => {
                let half_h = self.ortho_height * 0.5;
                let half_w = half_h * self.aspect_ratio;
                Mat4::orthographic_lh(
                    -half_w,
                    half_w,
                    -half_h,
                    half_h,
                    self.near_clip,
                    self.far_clip,
                )
            }
        };
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Mutable transform access for editors. Call
    /// [`update_view_matrix`](Camera::update_view_matrix) afterwards; the next
    /// `update` also rebuilds the view.
    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position()
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection_matrix
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix * self.view
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn move_speed(&self) -> f32 {
        self.move_speed
    }

    pub fn rotation_speed(&self) -> f32 {
        self.rotation_speed
    }

    pub fn field_of_view(&self) -> f32 {
        self.field_of_view
    }

    pub fn near_clip_distance(&self) -> f32 {
        self.near_clip
    }

    pub fn far_clip_distance(&self) -> f32 {
        self.far_clip
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn ortho_height(&self) -> f32 {
        self.ortho_height
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.update_projection_matrix(aspect_ratio);
    }

    pub fn set_move_speed(&mut self, move_speed: f32) {
        self.move_speed = move_speed;
    }

    pub fn set_rotation_speed(&mut self, rotation_speed: f32) {
        self.rotation_speed = rotation_speed;
    }

    pub fn set_field_of_view(&mut self, field_of_view: f32) {
        self.field_of_view = field_of_view;
        self.rebuild_projection();
    }

    /// Set the near plane. Rejected if negative or equal to the far plane.
    pub fn set_near_clip_distance(&mut self, near: f32) -> Result<(), CameraError> {
        if let Err(e) = check_clip(near, self.far_clip) {
            tracing::debug!(near, far = self.far_clip, "near clip rejected: {e}");
            return Err(e);
        }
        self.near_clip = near;
        self.rebuild_projection();
        Ok(())
    }

    /// Set the far plane. Rejected if negative or equal to the near plane.
    pub fn set_far_clip_distance(&mut self, far: f32) -> Result<(), CameraError> {
        if let Err(e) = check_clip(far, self.near_clip) {
            tracing::debug!(far, near = self.near_clip, "far clip rejected: {e}");
            return Err(e);
        }
        self.far_clip = far;
        self.rebuild_projection();
        Ok(())
    }

    pub fn set_projection(&mut self, projection: Projection) {
        self.projection = projection;
        self.rebuild_projection();
    }

    /// Set the orthographic view height. Non-positive heights are ignored.
    pub fn set_ortho_height(&mut self, height: f32) {
        if height.is_nan() || height <= 0.0 {
            tracing::debug!(height, "ortho height ignored");
            return;
        }
        self.ortho_height = height;
        self.rebuild_projection();
    }

    /// Current parameters as a descriptor, e.g. to save or clone a camera.
    pub fn desc(&self) -> CameraDesc {
        CameraDesc {
            position: self.transform.position(),
            rotation: self.transform.rotation(),
            aspect_ratio: self.aspect_ratio,
            move_speed: self.move_speed,
            rotation_speed: self.rotation_speed,
            field_of_view: self.field_of_view,
            near_clip: self.near_clip,
            far_clip: self.far_clip,
            projection: self.projection,
            ortho_height: self.ortho_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec4};
    use std::f32::consts::FRAC_PI_2;

    const EPS: f32 = 1e-4;

    fn scenario_camera() -> Camera {
        Camera::new(CameraDesc {
            position: Vec3::new(0.0, 0.0, -5.0),
            rotation: Vec3::ZERO,
            field_of_view: FRAC_PI_4,
            aspect_ratio: 1.0,
            near_clip: 0.1,
            far_clip: 100.0,
            ..CameraDesc::default()
        })
        .unwrap()
    }

    #[test]
    fn default_parameters() {
        let cam = Camera::default();
        assert_eq!(cam.position(), Vec3::new(0.0, 0.0, -5.0));
        assert_eq!(cam.aspect_ratio(), 1.78);
        assert_eq!(cam.move_speed(), 5.0);
        assert_eq!(cam.rotation_speed(), 0.003);
        assert_eq!(cam.field_of_view(), FRAC_PI_4);
        assert_eq!(cam.near_clip_distance(), 0.01);
        assert_eq!(cam.far_clip_distance(), 100.0);
        assert_eq!(cam.projection(), Projection::Perspective);
    }

    #[test]
    fn view_maps_origin_in_front_of_camera() {
        let cam = scenario_camera();
        let p = cam.view_matrix().transform_point3(Vec3::ZERO);
        assert!(p.abs_diff_eq(Vec3::new(0.0, 0.0, 5.0), EPS));
    }

    #[test]
    fn perspective_projection_divides_by_depth() {
        let cam = scenario_camera();
        let proj = cam.projection_matrix();
        // w' = z: clip w comes from view-space depth.
        assert_eq!(proj.z_axis.w, 1.0);
        assert_eq!(proj.w_axis.w, 0.0);
        assert_ne!(proj, Mat4::IDENTITY);

        let clip = proj * Vec4::new(0.0, 0.0, 5.0, 1.0);
        assert!((clip.w - 5.0).abs() < EPS);
        // Near plane lands on depth 0, far plane on depth 1.
        let near = proj.project_point3(Vec3::new(0.0, 0.0, 0.1));
        let far = proj.project_point3(Vec3::new(0.0, 0.0, 100.0));
        assert!(near.z.abs() < EPS);
        assert!((far.z - 1.0).abs() < EPS);
    }

    #[test]
    fn orthographic_projection_has_no_depth_divide() {
        let mut cam = scenario_camera();
        cam.set_ortho_height(4.0);
        cam.set_projection(Projection::Orthographic);
        let proj = cam.projection_matrix();
        assert_eq!(proj.w_axis.w, 1.0);
        assert_eq!(proj.z_axis.w, 0.0);
        // Top edge of the view volume maps to y = 1 regardless of depth.
        let top_near = proj.project_point3(Vec3::new(0.0, 2.0, 1.0));
        let top_far = proj.project_point3(Vec3::new(0.0, 2.0, 50.0));
        assert!((top_near.y - 1.0).abs() < EPS);
        assert!((top_far.y - 1.0).abs() < EPS);

        cam.set_projection(Projection::Perspective);
        assert_eq!(cam.projection_matrix().w_axis.w, 0.0);
    }

    #[test]
    fn coincident_far_clip_is_rejected() {
        let mut cam = scenario_camera();
        cam.set_near_clip_distance(5.0).unwrap();
        let before = cam.projection_matrix();
        assert_eq!(
            cam.set_far_clip_distance(5.0),
            Err(CameraError::CoincidentClip(5.0))
        );
        assert_eq!(cam.far_clip_distance(), 100.0);
        assert_eq!(cam.projection_matrix(), before);
    }

    #[test]
    fn negative_clip_is_rejected() {
        let mut cam = scenario_camera();
        assert_eq!(
            cam.set_far_clip_distance(-1.0),
            Err(CameraError::NegativeClip(-1.0))
        );
        assert!(cam.set_near_clip_distance(-0.5).is_err());
        assert!(cam.set_near_clip_distance(f32::NAN).is_err());
        assert_eq!(cam.far_clip_distance(), 100.0);
        assert_eq!(cam.near_clip_distance(), 0.1);
    }

    #[test]
    fn accepted_clip_rebuilds_projection() {
        let mut cam = scenario_camera();
        let before = cam.projection_matrix();
        cam.set_far_clip_distance(50.0).unwrap();
        assert_ne!(cam.projection_matrix(), before);
    }

    #[test]
    fn constructor_validates_clip_planes() {
        let desc = CameraDesc {
            near_clip: 1.0,
            far_clip: 1.0,
            ..CameraDesc::default()
        };
        assert!(Camera::new(desc).is_err());
        let desc = CameraDesc {
            near_clip: -1.0,
            ..CameraDesc::default()
        };
        assert!(Camera::new(desc).is_err());
    }

    #[test]
    fn view_stays_finite_looking_straight_up_or_down() {
        for pitch in [FRAC_PI_2, -FRAC_PI_2] {
            let mut cam = Camera::default();
            cam.transform_mut().set_rotation(Vec3::new(pitch, 0.3, 0.0));
            cam.update_view_matrix();
            assert!(cam.view_matrix().is_finite());
            let eye = cam.view_matrix().transform_point3(cam.position());
            assert!(eye.abs_diff_eq(Vec3::ZERO, 1e-4));
        }
    }

    #[test]
    fn constructor_rejects_degenerate_ortho_height() {
        for height in [0.0, -2.0, f32::NAN] {
            let desc = CameraDesc {
                projection: Projection::Orthographic,
                ortho_height: height,
                ..CameraDesc::default()
            };
            assert!(matches!(
                Camera::new(desc),
                Err(CameraError::InvalidOrthoHeight(_))
            ));
        }
        let desc = CameraDesc {
            projection: Projection::Orthographic,
            ortho_height: 4.0,
            ..CameraDesc::default()
        };
        let cam = Camera::new(desc).unwrap();
        assert!(cam.projection_matrix().is_finite());
    }

    #[test]
    fn projection_setters_rebuild_immediately() {
        let mut cam = scenario_camera();
        let p0 = cam.projection_matrix();
        cam.set_field_of_view(FRAC_PI_2);
        let p1 = cam.projection_matrix();
        assert_ne!(p0, p1);
        cam.set_aspect_ratio(2.0);
        assert_eq!(cam.aspect_ratio(), 2.0);
        assert_ne!(cam.projection_matrix(), p1);
    }

    #[test]
    fn resize_stores_aspect_ratio() {
        let mut cam = scenario_camera();
        cam.update_projection_matrix(16.0 / 9.0);
        assert_eq!(cam.aspect_ratio(), 16.0 / 9.0);
        let expected = Mat4::perspective_lh(FRAC_PI_4, 16.0 / 9.0, 0.1, 100.0);
        assert!(cam.projection_matrix().abs_diff_eq(expected, EPS));
    }

    #[test]
    fn forward_input_moves_along_facing() {
        let mut cam = scenario_camera();
        let intent = CameraIntent {
            forward: 1.0,
            ..CameraIntent::default()
        };
        cam.update(1.0, &intent);
        assert!(cam.position().abs_diff_eq(Vec3::ZERO, EPS));
        // Origin is now at the eye.
        let p = cam.view_matrix().transform_point3(Vec3::ZERO);
        assert!(p.abs_diff_eq(Vec3::ZERO, EPS));
    }

    #[test]
    fn strafe_follows_yaw_but_lift_is_world_up() {
        let mut cam = scenario_camera();
        cam.transform_mut().set_rotation(Vec3::new(0.3, FRAC_PI_2, 0.0));
        let intent = CameraIntent {
            lift: 1.0,
            ..CameraIntent::default()
        };
        cam.update(0.5, &intent);
        assert!(cam.position().abs_diff_eq(Vec3::new(0.0, 2.5, -5.0), EPS));

        let mut cam = scenario_camera();
        cam.transform_mut().set_rotation(Vec3::new(0.0, FRAC_PI_2, 0.0));
        let intent = CameraIntent {
            strafe: 1.0,
            ..CameraIntent::default()
        };
        cam.update(1.0, &intent);
        // Right of a camera facing +X is -Z.
        assert!(cam.position().abs_diff_eq(Vec3::new(0.0, 0.0, -10.0), EPS));
    }

    #[test]
    fn look_rotates_pitch_and_yaw() {
        let mut cam = scenario_camera();
        let intent = CameraIntent {
            look: Some(Vec2::new(100.0, -50.0)),
            ..CameraIntent::default()
        };
        cam.update(0.016, &intent);
        let r = cam.transform().rotation();
        assert!((r.y - 0.3).abs() < EPS);
        assert!((r.x + 0.15).abs() < EPS);
        assert_eq!(r.z, 0.0);
    }

    #[test]
    fn pitch_is_held_within_two_pi() {
        let mut cam = scenario_camera();
        let intent = CameraIntent {
            look: Some(Vec2::new(0.0, 10_000.0)),
            ..CameraIntent::default()
        };
        cam.update(0.016, &intent);
        assert_eq!(cam.transform().rotation().x, TAU);

        let intent = CameraIntent {
            look: Some(Vec2::new(0.0, -50_000.0)),
            ..CameraIntent::default()
        };
        cam.update(0.016, &intent);
        assert_eq!(cam.transform().rotation().x, -TAU);
    }

    #[test]
    fn update_refreshes_view_after_direct_transform_edit() {
        let mut cam = scenario_camera();
        cam.transform_mut().set_position(Vec3::new(0.0, 0.0, -10.0));
        cam.update(0.016, &CameraIntent::default());
        let p = cam.view_matrix().transform_point3(Vec3::ZERO);
        assert!(p.abs_diff_eq(Vec3::new(0.0, 0.0, 10.0), EPS));
    }

    #[test]
    fn desc_round_trips_parameters() {
        let cam = scenario_camera();
        let copy = Camera::new(cam.desc()).unwrap();
        assert_eq!(copy.projection_matrix(), cam.projection_matrix());
        assert_eq!(copy.view_matrix(), cam.view_matrix());
    }
}
