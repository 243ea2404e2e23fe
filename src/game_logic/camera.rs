use crate::game_logic::constants::*;

/// Smoothed chase view: position and zoom each ease toward a target derived
/// from the car's pose. Purely derived state, nothing persists beyond the
/// current frame except the easing itself.
#[derive(Clone, Debug)]
pub struct ChaseCamera {
    pub x: f32,
    pub y: f32,
    pub zoom: f32,
    target_x: f32,
    target_y: f32,
    target_zoom: f32,
    canvas_width: f32,
    canvas_height: f32,
}

impl ChaseCamera {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
            target_x: 0.0,
            target_y: 0.0,
            target_zoom: 1.0,
            canvas_width: width,
            canvas_height: height,
        }
    }

    /// Follow the car with a speed-scaled lookahead, blending by the
    /// clamped fraction `min(dt * smooth, 1)` each frame. The blend is
    /// frame-rate dependent on purpose; keep the formula as-is.
    pub fn update(&mut self, car_x: f32, car_y: f32, car_angle: f32, car_speed: f32, dt: f32) {
        let lookahead = car_speed * CAMERA_LOOKAHEAD_FACTOR;
        let heading = car_angle.to_radians();
        self.target_x = self.canvas_width / 2.0 - (car_x + heading.cos() * lookahead);
        self.target_y = self.canvas_height / 2.0 - (car_y + heading.sin() * lookahead);

        let blend = (dt * CAMERA_SMOOTH_FACTOR).min(1.0);
        self.x += (self.target_x - self.x) * blend;
        self.y += (self.target_y - self.y) * blend;

        self.target_zoom = (CAMERA_BASE_ZOOM - car_speed * CAMERA_ZOOM_FACTOR)
            .clamp(CAMERA_MIN_ZOOM, CAMERA_MAX_ZOOM);
        self.zoom += (self.target_zoom - self.zoom) * blend;
    }

    /// Only the stored extent changes; the eased position catches up on the
    /// following updates.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.canvas_width = width;
        self.canvas_height = height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_moves_half_way_at_quarter_second() {
        let mut camera = ChaseCamera::new(800.0, 600.0);
        // Stationary car at (100, 50): target is canvas center minus car.
        camera.update(100.0, 50.0, 0.0, 0.0, 0.25);
        assert!((camera.x - 150.0).abs() < 1e-4);
        assert!((camera.y - 125.0).abs() < 1e-4);
    }

    #[test]
    fn test_blend_fraction_clamps_at_one() {
        let mut camera = ChaseCamera::new(800.0, 600.0);
        camera.update(100.0, 50.0, 0.0, 0.0, 3.0);
        assert!((camera.x - 300.0).abs() < 1e-4);
        assert!((camera.y - 250.0).abs() < 1e-4);
        // A second update with the same pose stays put.
        camera.update(100.0, 50.0, 0.0, 0.0, 3.0);
        assert!((camera.x - 300.0).abs() < 1e-4);
    }

    #[test]
    fn test_lookahead_leads_the_heading() {
        let mut centered = ChaseCamera::new(800.0, 600.0);
        centered.update(0.0, 0.0, 0.0, 0.0, 1.0);
        let mut leading = ChaseCamera::new(800.0, 600.0);
        leading.update(0.0, 0.0, 0.0, 200.0, 1.0);
        // Moving along +x pushes the view 50 units further that way.
        assert!((centered.x - leading.x - 50.0).abs() < 1e-3);
        assert!((centered.y - leading.y).abs() < 1e-3);
    }

    #[test]
    fn test_zoom_stays_clamped() {
        let mut camera = ChaseCamera::new(800.0, 600.0);
        for _ in 0..20 {
            camera.update(0.0, 0.0, 0.0, 10_000.0, 1.0);
        }
        assert!((camera.zoom - CAMERA_MIN_ZOOM).abs() < 1e-4);
        for _ in 0..20 {
            camera.update(0.0, 0.0, 0.0, -10_000.0, 1.0);
        }
        assert!((camera.zoom - CAMERA_MAX_ZOOM).abs() < 1e-4);
    }

    #[test]
    fn test_resize_only_updates_the_extent() {
        let mut camera = ChaseCamera::new(800.0, 600.0);
        camera.update(100.0, 50.0, 0.0, 0.0, 1.0);
        let (x, y, zoom) = (camera.x, camera.y, camera.zoom);
        camera.resize(1024.0, 768.0);
        assert_eq!((camera.x, camera.y, camera.zoom), (x, y, zoom));
        // The new center shows up in the next target.
        camera.update(100.0, 50.0, 0.0, 0.0, 1.0);
        assert!((camera.x - 412.0).abs() < 1e-3);
        assert!((camera.y - 334.0).abs() < 1e-3);
    }
}
