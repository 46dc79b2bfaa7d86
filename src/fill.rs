use crate::buffer::PixelBuffer;

/// Patch one-pixel holes left between bent streaks.
///
/// Every interior transparent pixel whose upper and lower neighbours are
/// both visible becomes their average. Neighbours are read from the buffer
/// as it was before the pass, so a gap two pixels tall stays open.
/// Returns the number of pixels filled.
pub fn fill_gaps(buffer: &mut PixelBuffer) -> usize {
    let (w, h) = (buffer.width() as i32, buffer.height() as i32);
    if w < 3 || h < 3 {
        return 0;
    }

    let snapshot = buffer.clone();
    let mut filled = 0;

    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let (Some(center), Some(above), Some(below)) =
                (snapshot.get(x, y), snapshot.get(x, y + 1), snapshot.get(x, y - 1))
            else {
                continue;
            };
            if center.alpha() > 0.0 || above.alpha() <= 0.0 || below.alpha() <= 0.0 {
                continue;
            }
            buffer.set(x, y, above.average(below));
            filled += 1;
        }
    }

    log::trace!("fill_gaps: filled {filled} pixels");
    filled
}
