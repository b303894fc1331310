//! Finder icon layout for the installer window.
//!
//! Icons are centered vertically and spread horizontally with equal space
//! before, between, and after them (flexbox `align-items: center` plus
//! `justify-content: space-around`). All arithmetic is integer division
//! truncating toward zero, which is what keeps positions pixel-exact.

use crate::bundler::settings::Settings;

/// Horizontal inset reserved on each side of the window.
pub const HORIZONTAL_PADDING: i64 = 20;

/// Center of an icon in Finder window coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IconPosition {
    pub x: i64,
    pub y: i64,
}

/// Computes one position per item, in item order.
///
/// When `count * icon_size` exceeds the usable width the spacing goes
/// negative and icons overlap; that is accepted, not reported.
pub fn calculate_icon_positions(
    window_width: u32,
    window_height: u32,
    icon_size: u32,
    count: usize,
) -> Vec<IconPosition> {
    let width = i64::from(window_width);
    let icon = i64::from(icon_size);
    let items = i64::try_from(count).unwrap_or(i64::MAX);

    let usable_width = width - 2 * HORIZONTAL_PADDING;
    let center_y = i64::from(window_height) / 2;

    let free_space = usable_width.saturating_sub(items.saturating_mul(icon));
    let space_unit = free_space / items.saturating_add(1);

    (0..items)
        .map(|i| IconPosition {
            x: HORIZONTAL_PADDING + space_unit + i * (icon + space_unit) + icon / 2,
            y: center_y,
        })
        .collect()
}

/// Positions of the two installer icons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InstallerLayout {
    /// The `.app` bundle.
    pub app: IconPosition,
    /// The `Applications` symlink.
    pub applications: IconPosition,
}

impl InstallerLayout {
    /// Lays out the app and `Applications` icons for the configured window.
    pub fn compute(settings: &Settings) -> Self {
        let dmg = &settings.bundle_settings().dmg;
        let (width, height) = dmg.window_size;
        let positions = calculate_icon_positions(width, height, dmg.icon_size, 2);
        Self {
            app: positions[0],
            applications: positions[1],
        }
    }
}
