//! Surface measurement against video aspect ratio

use super::ScaleMode;

/// Computes the size a surface should take inside its bounds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeasureHelper {
    video_width: u32,
    video_height: u32,
    rotation: u32,
    scale_mode: ScaleMode,
}

impl MeasureHelper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_video_size(&mut self, width: u32, height: u32) {
        self.video_width = width;
        self.video_height = height;
    }

    pub fn set_rotation(&mut self, degrees: u32) {
        self.rotation = degrees % 360;
    }

    pub fn set_scale_mode(&mut self, mode: ScaleMode) {
        self.scale_mode = mode;
    }

    pub fn video_size(&self) -> (u32, u32) {
        (self.video_width, self.video_height)
    }

    pub fn rotation(&self) -> u32 {
        self.rotation
    }

    pub fn scale_mode(&self) -> ScaleMode {
        self.scale_mode
    }

    /// Measure against the given bounds
    ///
    /// A rotation of 90 or 270 degrees swaps the bounds first. Without a
    /// known video size the bounds are returned unchanged.
    pub fn measure(&self, width: u32, height: u32) -> (u32, u32) {
        let (bound_w, bound_h) = if self.rotation == 90 || self.rotation == 270 {
            (height as u64, width as u64)
        } else {
            (width as u64, height as u64)
        };

        let vw = self.video_width as u64;
        let vh = self.video_height as u64;
        if vw == 0 || vh == 0 {
            return (bound_w as u32, bound_h as u32);
        }

        let (mut w, mut h) = (bound_w, bound_h);
        match self.scale_mode {
            ScaleMode::Default => {
                if vw * h < w * vh {
                    w = h * vw / vh;
                } else if vw * h > w * vh {
                    h = w * vh / vw;
                }
            }
            ScaleMode::Original => {
                w = vw;
                h = vh;
            }
            ScaleMode::Ratio16x9 => {
                if h > w / 16 * 9 {
                    h = w / 16 * 9;
                } else {
                    w = h / 9 * 16;
                }
            }
            ScaleMode::Ratio4x3 => {
                if h > w / 4 * 3 {
                    h = w / 4 * 3;
                } else {
                    w = h / 3 * 4;
                }
            }
            ScaleMode::MatchParent => {}
            ScaleMode::CenterCrop => {
                if vw * h > w * vh {
                    w = h * vw / vh;
                } else {
                    h = w * vh / vw;
                }
            }
        }

        (w as u32, h as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn helper(mode: ScaleMode, video: (u32, u32)) -> MeasureHelper {
        let mut helper = MeasureHelper::new();
        helper.set_scale_mode(mode);
        helper.set_video_size(video.0, video.1);
        helper
    }

    #[test]
    fn test_unknown_video_size_keeps_bounds() {
        let helper = helper(ScaleMode::Default, (0, 0));
        assert_eq!(helper.measure(1080, 608), (1080, 608));
    }

    #[test]
    fn test_default_fits_inside() {
        // 4:3 video in a 16:9 box gets pillarboxed.
        let helper = helper(ScaleMode::Default, (640, 480));
        assert_eq!(helper.measure(1600, 900), (1200, 900));

        // 16:9 video in a square box gets letterboxed.
        let helper = self::helper(ScaleMode::Default, (1920, 1080));
        assert_eq!(helper.measure(1000, 1000), (1000, 562));
    }

    #[test]
    fn test_fixed_ratios() {
        let helper = helper(ScaleMode::Ratio16x9, (640, 480));
        assert_eq!(helper.measure(1600, 1600), (1600, 900));
        assert_eq!(helper.measure(1600, 450), (800, 450));

        let helper = self::helper(ScaleMode::Ratio4x3, (1920, 1080));
        assert_eq!(helper.measure(1600, 1600), (1600, 1200));
        assert_eq!(helper.measure(1600, 600), (800, 600));
    }

    #[test]
    fn test_original_match_parent_and_crop() {
        assert_eq!(helper(ScaleMode::Original, (640, 480)).measure(1600, 900), (640, 480));
        assert_eq!(helper(ScaleMode::MatchParent, (640, 480)).measure(1600, 900), (1600, 900));
        // 4:3 video cropped to fill a 16:9 box overflows vertically.
        assert_eq!(helper(ScaleMode::CenterCrop, (640, 480)).measure(1600, 900), (1600, 1200));
    }

    #[test]
    fn test_rotation_swaps_bounds() {
        let mut helper = helper(ScaleMode::MatchParent, (1920, 1080));
        helper.set_rotation(90);
        assert_eq!(helper.measure(1600, 900), (900, 1600));
        helper.set_rotation(450);
        assert_eq!(helper.rotation(), 90);
    }
}
