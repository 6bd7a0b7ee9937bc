//! Image token cost model
//!
//! Images are billed by 32x32 patches. Anything that would need 1536 or more
//! patches is first scaled down to fit the patch budget, then the patch count
//! is multiplied by a per-model density factor and a fixed base is added.

/// Edge length of a billing patch in pixels
pub const PATCH_SIZE: f64 = 32.0;

/// Patch count at which images are scaled down
pub const MAX_PATCHES: u64 = 1536;

/// Fixed per-image token overhead
pub const IMAGE_BASE_TOKENS: f64 = 85.0;

/// Float error after snapping must not push an edge into an extra patch
const SNAP_EPSILON: f64 = 1e-9;

fn patches_for(width: f64, height: f64) -> u64 {
    let across = (width / PATCH_SIZE - SNAP_EPSILON).ceil();
    let down = (height / PATCH_SIZE - SNAP_EPSILON).ceil();
    (across * down) as u64
}

/// Number of 32x32 patches billed for a `width` x `height` image, after
/// any downscaling.
pub fn patch_count(width: u32, height: u32) -> u64 {
    if width == 0 || height == 0 {
        return 0;
    }

    let (w, h) = (width as f64, height as f64);
    let raw = patches_for(w, h);
    if raw < MAX_PATCHES {
        return raw;
    }

    let mut shrink = (PATCH_SIZE * PATCH_SIZE * MAX_PATCHES as f64 / (w * h)).sqrt();

    // Snap so the larger relative overshoot lands on a whole patch
    let w_patches = w * shrink / PATCH_SIZE;
    let h_patches = h * shrink / PATCH_SIZE;
    shrink *= (w_patches.floor() / w_patches).min(h_patches.floor() / h_patches);

    patches_for(w * shrink, h * shrink)
}

/// Tokens billed for one image: `ceil(patches * multiplier + 85)`
pub fn image_tokens(width: u32, height: u32, multiplier: f64) -> u64 {
    (patch_count(width, height) as f64 * multiplier + IMAGE_BASE_TOKENS).ceil() as u64
}
