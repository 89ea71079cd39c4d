/// Tray icon edge length in pixels.
pub const ICON_SIZE: u32 = 32;

const FILL: (u8, u8, u8) = (41, 48, 58); // slate badge
const MARK: (u8, u8, u8) = (98, 216, 78); // green ring

/// RGBA pixels for the tray icon: a filled badge with a ring and centre dot.
pub fn icon_rgba() -> Vec<u8> {
    let size = ICON_SIZE as i32;
    let mut pixels = vec![0u8; (ICON_SIZE * ICON_SIZE * 4) as usize];
    let centre = size / 2;

    let mut put = |x: i32, y: i32, (r, g, b): (u8, u8, u8)| {
        if x >= 0 && x < size && y >= 0 && y < size {
            let idx = ((y * size + x) * 4) as usize;
            pixels[idx..idx + 4].copy_from_slice(&[r, g, b, 255]);
        }
    };

    for y in 0..size {
        for x in 0..size {
            let (dx, dy) = (x - centre, y - centre);
            let d2 = dx * dx + dy * dy;
            if d2 <= 15 * 15 {
                put(x, y, FILL);
            }
            if (8 * 8..=11 * 11).contains(&d2) || d2 <= 3 * 3 {
                put(x, y, MARK);
            }
        }
    }
    pixels
}

#[cfg(any(target_os = "macos", target_os = "windows"))]
pub fn create_icon() -> anyhow::Result<tray_icon::Icon> {
    tray_icon::Icon::from_rgba(icon_rgba(), ICON_SIZE, ICON_SIZE)
        .map_err(|err| anyhow::anyhow!("failed to build icon: {err}"))
}
