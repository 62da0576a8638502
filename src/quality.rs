//! Slider quality to AV1 CRF mapping.

/// Best quality CRF handed to libaom.
pub const MIN_CRF: u8 = 10;
/// Worst quality CRF handed to libaom.
pub const MAX_CRF: u8 = 63;

pub const MAX_QUALITY: u8 = 100;

/// Maps a slider quality (0-100, higher is better) to a CRF (63-10, lower is better).
///
/// Computes `63 - quality / 100 * 53` and drops the fractional part, so quality 50
/// yields 36. Done in integers: truncating `63 - x` equals `63 - ceil(x)`.
pub fn quality_to_crf(quality: u8) -> u8 {
    let quality = u32::from(quality.min(MAX_QUALITY));
    let span = u32::from(MAX_CRF - MIN_CRF);
    let reduction = (quality * span).div_ceil(u32::from(MAX_QUALITY));
    MAX_CRF - reduction as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints() {
        assert_eq!(quality_to_crf(0), 63);
        assert_eq!(quality_to_crf(100), 10);
    }

    #[test]
    fn midpoint_truncates() {
        // 63 - 26.5 = 36.5
        assert_eq!(quality_to_crf(50), 36);
        // 63 - 0.53 = 62.47
        assert_eq!(quality_to_crf(1), 62);
        // 63 - 52.47 = 10.53
        assert_eq!(quality_to_crf(99), 10);
        // 63 - 39.75 = 23.25
        assert_eq!(quality_to_crf(75), 23);
    }

    #[test]
    fn stays_in_range_and_never_increases() {
        let mut previous = quality_to_crf(0);
        for quality in 0..=MAX_QUALITY {
            let crf = quality_to_crf(quality);
            assert!((MIN_CRF..=MAX_CRF).contains(&crf), "crf {crf} for quality {quality}");
            assert!(crf <= previous);
            previous = crf;
        }
    }

    #[test]
    fn out_of_range_quality_is_clamped() {
        assert_eq!(quality_to_crf(200), 10);
        assert_eq!(quality_to_crf(u8::MAX), 10);
    }
}
