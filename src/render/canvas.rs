use nalgebra::Point2;

use crate::render::Image;

/// Alpha-blend a filled disc of `color` onto `image`.
///
/// Pixels outside the image are skipped. Only the first three channels are
/// painted; single- and two-channel images receive the colour's luma.
pub fn fill_disc(image: &mut Image, center: Point2<f32>, radius: f32, color: [u8; 3], alpha: f32) {
    let (height, width, channels) = image.dim();
    if !center.x.is_finite() || !center.y.is_finite() {
        return;
    }
    if alpha <= 0.0 || radius <= 0.0 || height == 0 || width == 0 || channels == 0 {
        return;
    }
    let alpha = alpha.min(1.0);

    let x_min = (center.x - radius).floor().max(0.0) as usize;
    let y_min = (center.y - radius).floor().max(0.0) as usize;
    let x_max = (center.x + radius).ceil().min(width as f32 - 1.0);
    let y_max = (center.y + radius).ceil().min(height as f32 - 1.0);
    if x_max < 0.0 || y_max < 0.0 {
        return;
    }
    let (x_max, y_max) = (x_max as usize, y_max as usize);

    let luma = 0.299 * color[0] as f32 + 0.587 * color[1] as f32 + 0.114 * color[2] as f32;
    let r2 = radius * radius;

    for y in y_min..=y_max {
        let dy = y as f32 - center.y;
        for x in x_min..=x_max {
            let dx = x as f32 - center.x;
            if dx * dx + dy * dy > r2 {
                continue;
            }
            for c in 0..channels.min(3) {
                let src = if channels >= 3 { color[c] as f32 } else { luma };
                let dst = image[[y, x, c]] as f32;
                image[[y, x, c]] = (dst + (src - dst) * alpha).round().clamp(0.0, 255.0) as u8;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opaque_disc() {
        let mut image = Image::zeros((20, 20, 3));
        fill_disc(&mut image, Point2::new(10.0, 10.0), 3.0, [255, 165, 0], 1.0);
        assert_eq!(image[[10, 10, 0]], 255);
        assert_eq!(image[[10, 10, 1]], 165);
        assert_eq!(image[[10, 13, 0]], 255);
        // Corner of the bounding square lies outside the disc
        assert_eq!(image[[13, 13, 0]], 0);
        assert_eq!(image[[0, 0, 0]], 0);
    }

    #[test]
    fn test_half_alpha_blend() {
        let mut image = Image::from_elem((10, 10, 3), 100);
        fill_disc(&mut image, Point2::new(5.0, 5.0), 1.0, [200, 0, 100], 0.5);
        assert_eq!(image[[5, 5, 0]], 150);
        assert_eq!(image[[5, 5, 1]], 50);
        assert_eq!(image[[5, 5, 2]], 100);
    }

    #[test]
    fn test_clipped_at_border() {
        let mut image = Image::zeros((8, 8, 3));
        fill_disc(&mut image, Point2::new(-1.0, 0.0), 2.0, [255, 255, 255], 1.0);
        assert_eq!(image[[0, 0, 0]], 255);
        fill_disc(&mut image, Point2::new(-50.0, -50.0), 2.0, [255, 255, 255], 1.0);
        fill_disc(&mut image, Point2::new(500.0, 500.0), 2.0, [255, 255, 255], 1.0);
    }

    #[test]
    fn test_non_finite_center_draws_nothing() {
        let mut image = Image::zeros((8, 8, 3));
        fill_disc(&mut image, Point2::new(f32::NAN, 4.0), 2.0, [255, 255, 255], 1.0);
        fill_disc(&mut image, Point2::new(4.0, f32::INFINITY), 2.0, [255, 255, 255], 1.0);
        assert_eq!(image.sum(), 0);
    }

    #[test]
    fn test_alpha_channel_untouched() {
        let mut image = Image::zeros((5, 5, 4));
        fill_disc(&mut image, Point2::new(2.0, 2.0), 1.0, [255, 255, 255], 1.0);
        assert_eq!(image[[2, 2, 2]], 255);
        assert_eq!(image[[2, 2, 3]], 0);
    }
}
