use crate::geometry::FloatType;

pub type Rgba = rgb::RGBA<FloatType>;

pub const WHITE: Rgba = Rgba {
    r: 1.0,
    g: 1.0,
    b: 1.0,
    a: 1.0,
};
pub const BLACK: Rgba = Rgba {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};

/// Linear interpolation between two colors, `t` is clamped to 0-1.
pub fn lerp(a: Rgba, b: Rgba, t: FloatType) -> Rgba {
    let t = t.clamp(0.0, 1.0);
    let mix = |x: FloatType, y: FloatType| x + (y - x) * t;
    Rgba::new(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b), mix(a.a, b.a))
}

/// Maps a 0-1 f32 rgba color to 8-bit channels in B, G, R, A order.
pub fn pack_bgra(color: Rgba) -> [u8; 4] {
    let to_byte = |c: FloatType| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    [
        to_byte(color.b),
        to_byte(color.g),
        to_byte(color.r),
        to_byte(color.a),
    ]
}
